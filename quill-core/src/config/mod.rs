//! Configuration types
//!
//! Board-agnostic machine parameters and the parser for `machine.toml`.

pub mod machine;
pub mod toml;

pub use machine::*;
pub use toml::parse_config;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Unknown `[section]` header
    InvalidSection,
    /// Key not valid in its section
    UnknownKey,
    /// Line is neither a header nor `key = value`
    MalformedLine,
    /// Value could not be parsed
    InvalidValue,
    /// Value parsed but violates a machine constraint
    OutOfRange,
}
