//! Relay command handlers.

use espanel_core::{RelayState, entity_map, snapshot::on_off};
use tabled::Tabled;
use tracing::debug;

use crate::cli::{RelayArgs, RelayCommand};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct RelayRow {
    #[tabled(rename = "Relay")]
    relay: String,
    #[tabled(rename = "State")]
    state: String,
}

pub async fn handle(args: RelayArgs, settings: &Settings) -> Result<(), CliError> {
    let panel = util::oneshot_panel(settings)?;

    match args.command {
        RelayCommand::List => {
            let mut relays = Vec::with_capacity(entity_map::SWITCHES.len());
            for id in entity_map::SWITCHES {
                let on = match panel.client().switch_state(id).await {
                    Ok(on) => Some(on),
                    Err(e) => {
                        debug!(id, error = %e, "relay fetch failed");
                        None
                    }
                };
                relays.push(RelayState { id, on });
            }

            let color = output::should_color(&settings.color);
            let out = output::render_list(
                &settings.output,
                &relays,
                |r| RelayRow {
                    relay: r.id.into(),
                    state: output::paint_state(r.display(), color),
                },
                |r| format!("{} {}", r.id, r.display()),
            );
            output::print_output(&out, settings.quiet);
            Ok(())
        }

        RelayCommand::On { relay } => set(&panel, &relay, true, settings).await,
        RelayCommand::Off { relay } => set(&panel, &relay, false, settings).await,

        RelayCommand::Toggle { relay } => {
            let id = util::relay_id(&relay)?;
            let now_on = panel.toggle_relay(id).await?;
            if !settings.quiet {
                eprintln!("✓ {id} → {}", on_off(now_on));
            }
            Ok(())
        }
    }
}

async fn set(
    panel: &espanel_core::Panel,
    relay: &str,
    on: bool,
    settings: &Settings,
) -> Result<(), CliError> {
    let id = util::relay_id(relay)?;
    panel.set_relay(id, on).await?;
    if !settings.quiet {
        eprintln!("✓ {id} → {}", on_off(on));
    }
    Ok(())
}
