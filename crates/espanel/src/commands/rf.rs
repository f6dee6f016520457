//! RF-learning workflow handlers.
//!
//! Each subcommand presses one template button on the device, trying
//! every candidate identifier for it. Actions that change the stored
//! slots re-fetch the slot texts afterwards, like the panel does.

use espanel_core::ButtonAction;

use crate::cli::{RfArgs, RfCommand};
use crate::config::Settings;
use crate::error::CliError;

use super::{readings, util};

pub async fn handle(args: RfArgs, settings: &Settings) -> Result<(), CliError> {
    let panel = util::oneshot_panel(settings)?;

    let action = match args.command {
        RfCommand::StartLearning => ButtonAction::StartLearning,
        RfCommand::TxLearned => ButtonAction::TxLearned,
        RfCommand::SaveSlot => ButtonAction::SaveSlot,
        RfCommand::TxSlot => ButtonAction::TxSlot,
        RfCommand::ClearSlot => ButtonAction::ClearSlot,
        RfCommand::LearnToSlot => ButtonAction::LearnToSlot,
    };

    panel.press(action).await?;

    if !settings.quiet {
        eprintln!("✓ {action}");
        match action {
            ButtonAction::StartLearning => {
                eprintln!("  Receiver is listening — press a button on the remote now.");
            }
            ButtonAction::LearnToSlot => {
                // The device saves on its own once a code arrives; the
                // learn window on stock firmware is ~16 s.
                eprintln!("  Learning window open; the device saves to the selected slot");
                eprintln!("  once a code arrives. Check afterwards with: espanel slots");
            }
            _ => {}
        }
    }

    if action.mutates_slots() {
        let (learned_status, slots) = panel.refresh_slots().await;
        readings::print_slots(learned_status.as_deref(), &slots, settings);
    }

    Ok(())
}
