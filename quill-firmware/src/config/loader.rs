//! Embedded configuration loader

use defmt::*;
use quill_core::config::{parse_config, MachineConfig};

/// Embedded configuration (compiled into firmware)
/// Edit machine.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../../machine.toml");

/// Parse the embedded configuration
///
/// `build.rs` already rejects malformed TOML, so a failure here means a
/// value the board-side parser does not accept. The reference machine
/// defaults are used in that case.
pub fn load_config() -> MachineConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", e);
            error!("Using reference machine defaults");
            MachineConfig::new()
        }
    }
}
