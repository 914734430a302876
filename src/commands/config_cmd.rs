use clap::{Args, Subcommand};

use super::OutputFormat;
use diary::Config;

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
}

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => {
                        println!("Configuration");
                        println!("=============\n");

                        if let Some(path) = &config.config_file {
                            println!("Config file: {}", path.display());
                        } else {
                            println!(
                                "Config file: {} (not found)",
                                Config::default_config_path().display()
                            );
                        }
                        println!();

                        println!("database_path: {}", config.database_path.value.display());
                        println!("  source: {}", config.database_path.source);
                        println!();

                        println!("user_id: {}", config.user_id.value);
                        println!("  source: {}", config.user_id.source);
                        println!();

                        println!("api.base_url: {}", config.api.base_url);
                        println!("api.timeout_secs: {}", config.api.timeout_secs);
                        println!(
                            "api.sync_on_start: {}",
                            if config.api.sync_on_start {
                                "enabled"
                            } else {
                                "disabled"
                            }
                        );
                    }
                }
                Ok(())
            }
        }
    }
}
