//! # Font Store
//!
//! Resolves named font families for label rendering. Lookup order:
//!
//! 1. the local fonts directory (`{family}.ttf`, `{family}.otf`,
//!    `{family}-variable.ttf`)
//! 2. a one-time download from the pinned source URL, cached to the same
//!    directory for the next run
//! 3. the built-in Spleen bitmap font, which always exists
//!
//! The store is process-wide, read-only after first use, and guarded so at
//! most one load happens per missing family even when several renders race
//! on first use. Identifier text always uses the bitmap font: Spleen is
//! monospaced, so fixed-width IDs align visually across labels.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use ab_glyph::FontArc;

/// Pinned download locations for known font families.
pub const FONT_SOURCES: &[(&str, &str)] = &[(
    "inter",
    "https://raw.githubusercontent.com/google/fonts/main/ofl/inter/Inter%5Bopsz,wght%5D.ttf",
)];

/// Family used for label name text when resolvable.
pub const DEFAULT_BODY_FAMILY: &str = "inter";

/// A font usable by the renderer.
#[derive(Debug, Clone)]
pub enum FontHandle {
    /// An outline font rasterized with ab_glyph
    Ttf(FontArc),
    /// The built-in Spleen 12x24 bitmap font, integer-scaled
    Bitmap,
}

/// The fonts one render request draws with.
#[derive(Debug, Clone)]
pub struct FontSet {
    /// Identifier text: always monospaced
    pub id: FontHandle,
    /// Display-name text
    pub body: FontHandle,
}

impl FontSet {
    /// A set backed entirely by the built-in bitmap font. Needs no files
    /// and no network; used as the fallback and throughout the tests.
    pub fn builtin() -> Self {
        Self {
            id: FontHandle::Bitmap,
            body: FontHandle::Bitmap,
        }
    }
}

static GLOBAL: OnceLock<FontStore> = OnceLock::new();

/// Process-wide cache of resolved font families.
pub struct FontStore {
    dir: PathBuf,
    cache: Mutex<HashMap<String, Option<FontArc>>>,
}

impl FontStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Initialize the global store with the configured fonts directory.
    /// Later calls keep the first directory; the cache is per-process.
    pub fn init_global(dir: impl Into<PathBuf>) -> &'static FontStore {
        GLOBAL.get_or_init(|| FontStore::new(dir))
    }

    /// The global store, defaulting to `./fonts` when never initialized.
    pub fn global() -> &'static FontStore {
        GLOBAL.get_or_init(|| FontStore::new("fonts"))
    }

    /// Resolve a family to a loaded outline font, if possible.
    ///
    /// The cache lock is held across the load so a family is fetched at
    /// most once per process; failures are cached too (a family that
    /// resolved to nothing stays unresolved for the process lifetime).
    pub fn resolve(&self, family: &str) -> Option<FontArc> {
        let family = family.to_ascii_lowercase();
        let mut cache = self.cache.lock().expect("font cache poisoned");
        if let Some(cached) = cache.get(&family) {
            return cached.clone();
        }
        let loaded = self.load_family(&family);
        cache.insert(family, loaded.clone());
        loaded
    }

    /// Build the font set for a render: TTF body when resolvable, bitmap
    /// otherwise. Never fails.
    pub fn font_set(&self) -> FontSet {
        let body = match self.resolve(DEFAULT_BODY_FAMILY) {
            Some(font) => FontHandle::Ttf(font),
            None => {
                tracing::warn!(
                    family = DEFAULT_BODY_FAMILY,
                    "no outline font resolvable, using built-in bitmap font"
                );
                FontHandle::Bitmap
            }
        };
        FontSet {
            id: FontHandle::Bitmap,
            body,
        }
    }

    fn load_family(&self, family: &str) -> Option<FontArc> {
        for candidate in [
            format!("{family}.ttf"),
            format!("{family}.otf"),
            format!("{family}-variable.ttf"),
        ] {
            let path = self.dir.join(candidate);
            if let Ok(bytes) = fs::read(&path) {
                match FontArc::try_from_vec(bytes) {
                    Ok(font) => {
                        tracing::debug!(family, path = %path.display(), "loaded font");
                        return Some(font);
                    }
                    Err(err) => {
                        tracing::warn!(family, path = %path.display(), %err, "unreadable font file");
                    }
                }
            }
        }

        self.download_family(family)
    }

    fn download_family(&self, family: &str) -> Option<FontArc> {
        let url = FONT_SOURCES
            .iter()
            .find(|(name, _)| *name == family)
            .map(|(_, url)| *url)?;

        tracing::info!(family, url, "fetching font");
        let bytes = match reqwest::blocking::get(url).and_then(|resp| resp.error_for_status()) {
            Ok(resp) => match resp.bytes() {
                Ok(bytes) => bytes.to_vec(),
                Err(err) => {
                    tracing::warn!(family, %err, "font download failed");
                    return None;
                }
            },
            Err(err) => {
                tracing::warn!(family, %err, "font download failed");
                return None;
            }
        };

        let font = match FontArc::try_from_vec(bytes.clone()) {
            Ok(font) => font,
            Err(err) => {
                tracing::warn!(family, %err, "downloaded font is unreadable");
                return None;
            }
        };

        // Cache on disk for the next process; rendering proceeds either way.
        let destination = self.dir.join(format!("{family}-variable.ttf"));
        if let Err(err) = fs::create_dir_all(&self.dir).and_then(|_| fs::write(&destination, &bytes))
        {
            tracing::warn!(family, %err, "could not cache font to disk");
        }

        Some(font)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_set_needs_no_files() {
        let fonts = FontSet::builtin();
        assert!(matches!(fonts.id, FontHandle::Bitmap));
        assert!(matches!(fonts.body, FontHandle::Bitmap));
    }

    #[test]
    fn test_unknown_family_resolves_to_none() {
        let store = FontStore::new("/nonexistent/fonts");
        assert!(store.resolve("no-such-family").is_none());
        // Second lookup hits the negative cache.
        assert!(store.resolve("no-such-family").is_none());
    }
}
