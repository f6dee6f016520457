//! RF parameter (number) and protocol (select) handlers.
//!
//! Writes are fire-and-forget: there is no optimistic echo to roll back,
//! so a failed write surfaces as an error and nothing else changes.

use espanel_core::{ParamState, entity_map};
use tabled::Tabled;
use tracing::debug;

use crate::cli::{ParamsArgs, ParamsCommand, ProtocolArgs, ProtocolCommand};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct ParamRow {
    #[tabled(rename = "Parameter")]
    parameter: String,
    #[tabled(rename = "Value")]
    value: String,
}

fn param_row(p: &ParamState) -> ParamRow {
    ParamRow {
        parameter: p.id.into(),
        value: p.display().to_owned(),
    }
}

fn param_line(p: &ParamState) -> String {
    format!("{} {}", p.id, p.display())
}

// ── Numbers ─────────────────────────────────────────────────────────

pub async fn handle_params(args: ParamsArgs, settings: &Settings) -> Result<(), CliError> {
    let panel = util::oneshot_panel(settings)?;

    match args.command {
        ParamsCommand::Get { name: Some(name) } => {
            let value = panel.number_value(&name).await?;
            let id = entity_map::NUMBERS
                .iter()
                .find(|id| **id == name)
                .copied()
                .unwrap_or("number");
            let param = ParamState { id, value };
            let out = output::render_single(
                &settings.output,
                &param,
                |p| format!("{} = {}", p.id, p.display()),
                |p| p.display().to_owned(),
            );
            output::print_output(&out, settings.quiet);
            Ok(())
        }

        ParamsCommand::Get { name: None } => {
            let mut params = Vec::with_capacity(entity_map::NUMBERS.len());
            for id in entity_map::NUMBERS {
                let value = match panel.client().number_state(id).await {
                    Ok(v) => v,
                    Err(e) => {
                        debug!(id, error = %e, "number fetch failed");
                        None
                    }
                };
                params.push(ParamState { id, value });
            }
            let out = output::render_list(&settings.output, &params, param_row, param_line);
            output::print_output(&out, settings.quiet);
            Ok(())
        }

        ParamsCommand::Set { name, value } => {
            panel.set_number(&name, value).await?;
            if !settings.quiet {
                eprintln!("✓ {name} = {value}");
            }
            Ok(())
        }
    }
}

// ── Protocol select ─────────────────────────────────────────────────

pub async fn handle_protocol(args: ProtocolArgs, settings: &Settings) -> Result<(), CliError> {
    let panel = util::oneshot_panel(settings)?;
    let id = entity_map::SELECTS[0];

    match args.command {
        ProtocolCommand::Get => {
            let value = panel.select_value(id).await?;
            let param = ParamState { id, value };
            let out = output::render_single(
                &settings.output,
                &param,
                |p| format!("{} = {}", p.id, p.display()),
                |p| p.display().to_owned(),
            );
            output::print_output(&out, settings.quiet);
            Ok(())
        }

        ProtocolCommand::Set { option } => {
            panel.set_select(id, &option).await?;
            if !settings.quiet {
                eprintln!("✓ {id} = {option}");
            }
            Ok(())
        }
    }
}
