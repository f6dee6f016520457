//! Shared helpers for command handlers.

use espanel_core::{Panel, PanelConfig, entity_map};

use crate::config::Settings;
use crate::error::CliError;

/// Build a panel without a background poll task (single-shot commands).
pub fn oneshot_panel(settings: &Settings) -> Result<Panel, CliError> {
    let address = settings.require_device()?;
    let config = PanelConfig::new(address)
        .oneshot()
        .with_timeout(settings.timeout);
    Ok(Panel::new(config)?)
}

/// Resolve a relay argument to its object id: accepts a bare number
/// (`3`) or the full id (`relay3`).
pub fn relay_id(ident: &str) -> Result<&'static str, CliError> {
    let id = match ident.parse::<usize>() {
        Ok(n) if (1..=entity_map::SWITCHES.len()).contains(&n) => entity_map::SWITCHES[n - 1],
        Ok(_) => {
            return Err(CliError::Validation {
                field: "relay".into(),
                reason: format!("relay number must be 1-{}", entity_map::SWITCHES.len()),
            });
        }
        Err(_) => entity_map::SWITCHES
            .iter()
            .find(|id| **id == ident)
            .copied()
            .ok_or_else(|| CliError::NotFound {
                resource_type: "relay".into(),
                identifier: ident.into(),
                list_command: "relay list".into(),
            })?,
    };
    Ok(id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn relay_id_accepts_number_or_full_id() {
        assert_eq!(relay_id("3").unwrap(), "relay3");
        assert_eq!(relay_id("relay8").unwrap(), "relay8");
    }

    #[test]
    fn relay_id_rejects_out_of_range_and_unknown() {
        assert!(matches!(relay_id("0"), Err(CliError::Validation { .. })));
        assert!(matches!(relay_id("9"), Err(CliError::Validation { .. })));
        assert!(matches!(
            relay_id("input3"),
            Err(CliError::NotFound { .. })
        ));
    }
}
