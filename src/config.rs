//! Process configuration sourced from the environment.
//!
//! All settings can be overridden by CLI flags; the environment only
//! provides defaults so that `etiqueta serve` works from a plain `.env`
//! style deployment.

use std::env;
use std::path::PathBuf;

use crate::label::{DEFAULT_ID_PATTERN, DEFAULT_PAD_WIDTH};

/// Resolved process configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Homebox base URL, e.g. `https://homebox.example.com`
    pub base_url: Option<String>,
    /// Homebox account username
    pub username: Option<String>,
    /// Homebox account password
    pub password: Option<String>,
    /// Directory searched for (and populated with) font files
    pub fonts_dir: PathBuf,
    /// Two-group identifier pattern applied to record names
    pub id_pattern: String,
    /// Zero-padding width for parsed identifier numbers
    pub pad_width: usize,
}

impl Config {
    /// Build a configuration from environment variables.
    ///
    /// Missing credentials are left as `None` so that commands which never
    /// touch the Homebox API (`templates`, offline rendering in tests) work
    /// without any environment at all.
    pub fn from_env() -> Self {
        let pad_width = env::var("ETIQUETA_ID_PAD")
            .ok()
            .and_then(|raw| raw.parse::<usize>().ok())
            .filter(|width| (1..=9).contains(width))
            .unwrap_or(DEFAULT_PAD_WIDTH);

        Self {
            base_url: env_nonempty("HOMEBOX_API_URL"),
            username: env_nonempty("HOMEBOX_USERNAME"),
            password: env_nonempty("HOMEBOX_PASSWORD"),
            fonts_dir: env_nonempty("ETIQUETA_FONTS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("fonts")),
            id_pattern: env_nonempty("ETIQUETA_ID_PATTERN")
                .unwrap_or_else(|| DEFAULT_ID_PATTERN.to_string()),
            pad_width,
        }
    }
}

/// Read an environment variable, treating empty strings as unset.
fn env_nonempty(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_width_falls_back_on_garbage() {
        // SAFETY: tests in this module are the only writers of this var.
        unsafe {
            env::set_var("ETIQUETA_ID_PAD", "not-a-number");
        }
        let config = Config::from_env();
        assert_eq!(config.pad_width, DEFAULT_PAD_WIDTH);
        unsafe {
            env::remove_var("ETIQUETA_ID_PAD");
        }
    }

    #[test]
    fn test_default_pattern_used_when_unset() {
        let config = Config::from_env();
        assert_eq!(config.id_pattern, DEFAULT_ID_PATTERN);
    }
}
