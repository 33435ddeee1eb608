//! # Etiqueta CLI
//!
//! Command-line interface for generating Homebox label sheets.
//!
//! ## Usage
//!
//! ```bash
//! # List available templates and their options
//! etiqueta templates
//!
//! # Generate an Avery 5163 sheet for all locations matching box.*
//! etiqueta generate --template avery5163 -o labels.pdf
//!
//! # Tape labels for assets, two copies each, no descriptive text
//! etiqueta generate --template ptouch --assets \
//!     --template-option copies=2 --template-option detail=minimal
//!
//! # Start the label picker web UI
//! etiqueta serve --listen 0.0.0.0:8080
//! ```
//!
//! Homebox credentials come from `HOMEBOX_API_URL`, `HOMEBOX_USERNAME` and
//! `HOMEBOX_PASSWORD`, overridable with `--base`, `--username`, `--password`.

use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;

use etiqueta::{
    api::{self, HomeboxClient},
    config::Config,
    error::LabelError,
    fonts::FontStore,
    label::LabelPattern,
    pipeline::{self, RenderRequest},
    server::{self, ServerConfig},
    templates::{OptionDomain, OutputKind, Template},
};

/// Etiqueta - Homebox label generator
#[derive(Parser, Debug)]
#[command(name = "etiqueta")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a label sheet or bundle from Homebox records
    Generate {
        /// Output file (defaults to locations.pdf / locations.zip)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Label template identifier
        #[arg(short, long, default_value = "avery5163")]
        template: String,

        /// Case-insensitive regex filter applied to record names
        #[arg(short = 'n', long, default_value = "box.*")]
        name_pattern: String,

        /// Generate labels for assets instead of locations
        #[arg(long)]
        assets: bool,

        /// Number of label cells to skip at the start of the first sheet
        #[arg(short, long, default_value = "0")]
        skip: usize,

        /// Template customization option (repeatable), e.g. orientation=vertical
        #[arg(long = "template-option", value_name = "NAME=VALUE")]
        template_options: Vec<String>,

        /// Homebox base URL (defaults to HOMEBOX_API_URL)
        #[arg(long)]
        base: Option<String>,

        /// Homebox username (defaults to HOMEBOX_USERNAME)
        #[arg(long)]
        username: Option<String>,

        /// Homebox password (defaults to HOMEBOX_PASSWORD)
        #[arg(long)]
        password: Option<String>,
    },

    /// List available templates and their options
    Templates,

    /// Start the label picker web UI
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "0.0.0.0:8080")]
        listen: String,

        /// Homebox base URL (defaults to HOMEBOX_API_URL)
        #[arg(long)]
        base: Option<String>,

        /// Homebox username (defaults to HOMEBOX_USERNAME)
        #[arg(long)]
        username: Option<String>,

        /// Homebox password (defaults to HOMEBOX_PASSWORD)
        #[arg(long)]
        password: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "etiqueta=info,tower_http=info".into()),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), LabelError> {
    let cli = Cli::parse();
    let config = Config::from_env();
    FontStore::init_global(&config.fonts_dir);

    match cli.command {
        Commands::Generate {
            output,
            template,
            name_pattern,
            assets,
            skip,
            template_options,
            base,
            username,
            password,
        } => {
            let base = require(base.or(config.base_url.clone()), "Homebox base URL")?;
            let username = require(username.or(config.username.clone()), "Homebox username")?;
            let password = require(password.or(config.password.clone()), "Homebox password")?;
            let options = parse_template_options(&template_options)?;

            let pattern = LabelPattern::new(&config.id_pattern, config.pad_width)?;
            let filter = match name_pattern.trim() {
                "" => None,
                raw => Some(api::compile_name_filter(raw)?),
            };

            let client = HomeboxClient::login(&base, &username, &password).await?;
            let records = if assets {
                let items = client.list_items().await?;
                api::item_records(&items, client.base_url(), filter.as_ref(), &pattern)
            } else {
                let locations = client.list_locations().await?;
                api::location_records(&locations, client.base_url(), filter.as_ref(), &pattern)
            };

            if records.is_empty() {
                println!("No records matched the provided filters; no output generated.");
                return Ok(());
            }

            let request = RenderRequest {
                template,
                options,
                skip,
                output_stem: if assets { "assets" } else { "locations" }.to_string(),
            };

            let count = records.len();
            let result = tokio::task::spawn_blocking(move || {
                pipeline::generate_with_global_fonts(&records, &request, &pattern)
            })
            .await
            .map_err(|e| LabelError::Render(format!("render task failed: {e}")))??;

            let path = output.unwrap_or_else(|| PathBuf::from(&result.filename));
            std::fs::write(&path, &result.bytes)?;
            println!("Wrote {} ({} labels)", path.display(), count);
        }

        Commands::Templates => {
            for template in Template::ALL {
                let descriptor = template.descriptor();
                let kind = match descriptor.kind {
                    OutputKind::Document => "document",
                    OutputKind::ImageBundle => "image-bundle",
                };
                println!("{:<12} {}  [{}]", descriptor.key, descriptor.label, kind);
                for spec in descriptor.options {
                    match spec.domain {
                        OptionDomain::Choice(values) => println!(
                            "    {} = {} (default: {})",
                            spec.name,
                            values.join(" | "),
                            spec.default
                        ),
                        OptionDomain::Count { min, max } => println!(
                            "    {} = {}..={} (default: {})",
                            spec.name, min, max, spec.default
                        ),
                    }
                }
            }
        }

        Commands::Serve {
            listen,
            base,
            username,
            password,
        } => {
            let server_config = ServerConfig {
                listen_addr: listen,
                base_url: require(base.or(config.base_url.clone()), "Homebox base URL")?,
                username: require(username.or(config.username.clone()), "Homebox username")?,
                password: require(password.or(config.password.clone()), "Homebox password")?,
                id_pattern: config.id_pattern.clone(),
                pad_width: config.pad_width,
            };
            server::serve(server_config).await?;
        }
    }

    Ok(())
}

/// Parse repeated NAME=VALUE pairs into an option map.
fn parse_template_options(pairs: &[String]) -> Result<HashMap<String, String>, LabelError> {
    let mut parsed = HashMap::new();
    for pair in pairs {
        let Some((name, value)) = pair.split_once('=') else {
            return Err(LabelError::Config(format!(
                "Invalid --template-option '{pair}'. Expected format NAME=VALUE."
            )));
        };
        let name = name.trim().to_ascii_lowercase();
        if name.is_empty() {
            return Err(LabelError::Config(
                "Template option name cannot be empty.".to_string(),
            ));
        }
        parsed.insert(name, value.trim().to_string());
    }
    Ok(parsed)
}

fn require(value: Option<String>, what: &str) -> Result<String, LabelError> {
    value.ok_or_else(|| LabelError::Config(format!("{what} is required (flag or environment)")))
}
