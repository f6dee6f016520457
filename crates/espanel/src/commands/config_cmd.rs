//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand};
use crate::config::{self, Config, Defaults, Settings};
use crate::error::CliError;
use crate::output;

/// Format config for display as TOML.
fn format_config(cfg: &Config) -> String {
    toml::to_string_pretty(cfg).unwrap_or_else(|e| format!("serialization failed: {e}"))
}

pub fn handle(args: ConfigArgs, settings: &Settings) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init { device } => {
            let cfg = Config {
                device: Some(device.clone()),
                defaults: Defaults::default(),
            };
            config::save_config(&cfg)?;
            eprintln!(
                "✓ Configuration written to {}",
                config::config_path().display()
            );
            eprintln!("  Device: {device}");
            eprintln!("\n  Test it: espanel status");
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render_single(&settings.output, &cfg, format_config, |c| {
                c.device.clone().unwrap_or_default()
            });
            output::print_output(&out, settings.quiet);
            Ok(())
        }

        ConfigCommand::SetDevice { address } => {
            let mut cfg = config::load_config_or_default();
            cfg.device = Some(address.clone());
            config::save_config(&cfg)?;
            eprintln!("✓ Device address set to {address}");
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }
    }
}
