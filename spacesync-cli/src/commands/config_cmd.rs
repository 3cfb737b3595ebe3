use clap::{Args, Subcommand, ValueEnum};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use crate::config::{Config, ConfigValue};

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Initialize configuration file
    Init,
}

const DEFAULT_CONFIG: &str = r#"# spacesync configuration

# Management API token (or set SPACESYNC_OAUTH_TOKEN)
# oauth_token: your-token

# Hosting region of both spaces: eu, us, ca, ap or cn
region: eu

# Explicit API base URL, overrides the region
# api_url: https://mapi.storyblok.com/v1

# Replace target components instead of merging into them
components_full_sync: false

# Retries for rate-limited requests
max_retries: 3
"#;

impl ConfigCommand {
    pub fn run(
        &self,
        config: &Config,
        cli_config_path: Option<PathBuf>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                let config = config.masked();
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&config)?);
                    }
                    OutputFormat::Text => print!("{}", render_text(&config)),
                }
                Ok(())
            }

            ConfigSubcommand::Init => {
                let config_path = cli_config_path.unwrap_or_else(Config::default_config_path);

                // Check if config already exists
                if config_path.exists() {
                    println!("Config file already exists: {}", config_path.display());
                    println!("Use 'spacesync config show' to view current configuration.");
                    return Ok(());
                }

                // Create parent directory
                if let Some(parent) = config_path.parent() {
                    fs::create_dir_all(parent)?;
                }

                let mut file = fs::File::create(&config_path)?;
                file.write_all(DEFAULT_CONFIG.as_bytes())?;

                println!("Created config file: {}", config_path.display());
                println!("\nEdit this file to customize your settings.");
                Ok(())
            }
        }
    }
}

fn render_entry<T: std::fmt::Display>(out: &mut String, key: &str, entry: &ConfigValue<T>) {
    out.push_str(&format!("{}: {}\n", key, entry.value));
    out.push_str(&format!("  source: {}\n\n", entry.source));
}

fn render_text(config: &Config) -> String {
    let mut out = String::from("Configuration\n=============\n\n");

    match &config.config_file {
        Some(path) => out.push_str(&format!("Config file: {}\n\n", path.display())),
        None => out.push_str(&format!(
            "Config file: {} (not found)\n\n",
            Config::default_config_path().display()
        )),
    }

    let token = ConfigValue::new(
        config
            .oauth_token
            .value
            .clone()
            .unwrap_or_else(|| "(not set)".to_string()),
        config.oauth_token.source.clone(),
    );
    render_entry(&mut out, "oauth_token", &token);
    render_entry(&mut out, "region", &config.region);

    let api_url = ConfigValue::new(config.api_base_url(), config.api_url.source.clone());
    render_entry(&mut out, "api_url", &api_url);
    render_entry(&mut out, "components_full_sync", &config.components_full_sync);
    render_entry(&mut out, "max_retries", &config.max_retries);
    out
}
