//! Command dispatch: bridges CLI args -> panel operations -> output formatting.

pub mod config_cmd;
pub mod params;
pub mod readings;
pub mod relays;
pub mod rf;
pub mod status;
pub mod util;

use crate::cli::Command;
use crate::config::Settings;
use crate::error::CliError;

/// Dispatch a device-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, settings: &Settings) -> Result<(), CliError> {
    match cmd {
        Command::Status => status::handle_status(settings).await,
        Command::Watch(args) => status::handle_watch(args, settings).await,
        Command::Relay(args) => relays::handle(args, settings).await,
        Command::Inputs => readings::handle_inputs(settings).await,
        Command::Sensors => readings::handle_sensors(settings).await,
        Command::Slots => readings::handle_slots(settings).await,
        Command::Params(args) => params::handle_params(args, settings).await,
        Command::Protocol(args) => params::handle_protocol(args, settings).await,
        Command::Rf(args) => rf::handle(args, settings).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
