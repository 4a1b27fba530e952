//! Simple TOML parser for machine configuration
//!
//! This is a minimal parser that handles only the subset needed for
//! `machine.toml`. It does NOT support the full TOML spec.
//!
//! Supported features:
//! - Key = value pairs (integer, float)
//! - [section] headers
//! - Comments (# ...), full line or trailing
//!
//! Keys that are not present keep their default value. Unknown sections and
//! keys are rejected so typos do not silently fall back to defaults.

use super::machine::MachineConfig;
use super::ConfigError;

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Kinematics,
    Ramp,
    Pen,
    Stepper,
    KillSwitch,
    Executor,
}

/// Parse TOML configuration into MachineConfig
///
/// The result has been checked with [`MachineConfig::validate`].
pub fn parse_config(input: &str) -> Result<MachineConfig, ConfigError> {
    let mut config = MachineConfig::new();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = strip_comment(line).trim();

        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ConfigError::MalformedLine)?;
        apply_value(section, key, value, &mut config)?;
    }

    config.validate()?;
    Ok(config)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Parse section header like "ramp" or "kill_switch"
fn parse_section_header(header: &str) -> Result<Section, ConfigError> {
    match header.trim() {
        "kinematics" => Ok(Section::Kinematics),
        "ramp" => Ok(Section::Ramp),
        "pen" => Ok(Section::Pen),
        "stepper" => Ok(Section::Stepper),
        "kill_switch" => Ok(Section::KillSwitch),
        "executor" => Ok(Section::Executor),
        _ => Err(ConfigError::InvalidSection),
    }
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse an integer value (underscores allowed as digit separators)
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ConfigError> {
    let mut digits: heapless::String<24> = heapless::String::new();
    for c in value.chars().filter(|&c| c != '_') {
        digits.push(c).map_err(|_| ConfigError::InvalidValue)?;
    }
    digits.parse().map_err(|_| ConfigError::InvalidValue)
}

/// Parse a float value (integers are accepted)
fn parse_float(value: &str) -> Result<f32, ConfigError> {
    let v: f32 = value.parse().map_err(|_| ConfigError::InvalidValue)?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(ConfigError::InvalidValue)
    }
}

/// Parse a servo angle, rejecting anything above 180 degrees
fn parse_angle(value: &str) -> Result<u8, ConfigError> {
    let angle: u16 = parse_int(value)?;
    if angle > 180 {
        return Err(ConfigError::OutOfRange);
    }
    Ok(angle as u8)
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut MachineConfig,
) -> Result<(), ConfigError> {
    match (section, key) {
        (Section::Kinematics, "steps_per_mm") => {
            config.kinematics.steps_per_mm = parse_float(value)?
        }
        (Section::Kinematics, "x_max_mm") => config.kinematics.x_max_mm = parse_float(value)?,
        (Section::Kinematics, "y_max_mm") => config.kinematics.y_max_mm = parse_float(value)?,

        (Section::Ramp, "start_period") => config.ramp.start_period = parse_int(value)?,
        (Section::Ramp, "travel_period") => config.ramp.travel_period = parse_int(value)?,
        (Section::Ramp, "drawing_period") => config.ramp.drawing_period = parse_int(value)?,
        (Section::Ramp, "accel_ceiling") => config.ramp.accel_ceiling = parse_int(value)?,

        (Section::Pen, "up_angle") => config.pen.up_angle = parse_angle(value)?,
        (Section::Pen, "down_angle") => config.pen.down_angle = parse_angle(value)?,
        (Section::Pen, "settle_ms") => config.pen.settle_ms = parse_int(value)?,

        (Section::Stepper, "pulse_width_ns") => config.stepper.pulse_width_ns = parse_int(value)?,

        (Section::KillSwitch, "debounce_ms") => config.kill_switch.debounce_ms = parse_int(value)?,

        (Section::Executor, "idle_timeout_ms") => {
            config.executor.idle_timeout_ms = parse_int(value)?
        }
        (Section::Executor, "killed_poll_ms") => config.executor.killed_poll_ms = parse_int(value)?,

        _ => return Err(ConfigError::UnknownKey),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_section_header() {
        assert_eq!(parse_section_header("ramp"), Ok(Section::Ramp));
        assert_eq!(parse_section_header(" kill_switch "), Ok(Section::KillSwitch));
        assert_eq!(parse_section_header("spindle"), Err(ConfigError::InvalidSection));
    }

    #[test]
    fn test_parse_int_with_separators() {
        assert_eq!(parse_int::<u32>("4_999"), Ok(4999));
        assert_eq!(parse_int::<u32>("-1"), Err(ConfigError::InvalidValue));
    }

    #[test]
    fn test_empty_input_gives_defaults() {
        assert_eq!(parse_config(""), Ok(MachineConfig::new()));
    }

    #[test]
    fn test_parse_full_config() {
        let config_str = r#"
# Reference plotter
[kinematics]
steps_per_mm = 40      # 1/2 microstep belts
x_max_mm = 200.5
y_max_mm = 300

[ramp]
start_period = 6000
travel_period = 800
drawing_period = 1_200
accel_ceiling = 900

[pen]
up_angle = 45
down_angle = 5
settle_ms = 150

[stepper]
pulse_width_ns = 1500

[kill_switch]
debounce_ms = 250

[executor]
idle_timeout_ms = 120
killed_poll_ms = 50
"#;

        let config = parse_config(config_str).unwrap();
        assert_eq!(config.kinematics.steps_per_mm, 40.0);
        assert_eq!(config.kinematics.x_max_mm, 200.5);
        assert_eq!(config.kinematics.y_max_mm, 300.0);
        assert_eq!(config.ramp.start_period, 6000);
        assert_eq!(config.ramp.travel_period, 800);
        assert_eq!(config.ramp.drawing_period, 1200);
        assert_eq!(config.ramp.accel_ceiling, 900);
        assert_eq!(config.pen.up_angle, 45);
        assert_eq!(config.pen.down_angle, 5);
        assert_eq!(config.pen.settle_ms, 150);
        assert_eq!(config.stepper.pulse_width_ns, 1500);
        assert_eq!(config.kill_switch.debounce_ms, 250);
        assert_eq!(config.executor.idle_timeout_ms, 120);
        assert_eq!(config.executor.killed_poll_ms, 50);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let config_str = "[ramp]\nstart_perod = 4999\n";
        assert_eq!(parse_config(config_str), Err(ConfigError::UnknownKey));
    }

    #[test]
    fn test_key_outside_section_rejected() {
        assert_eq!(parse_config("travel_period = 5\n"), Err(ConfigError::UnknownKey));
    }

    #[test]
    fn test_malformed_line() {
        assert_eq!(parse_config("[pen]\nup_angle\n"), Err(ConfigError::MalformedLine));
    }

    #[test]
    fn test_angle_range() {
        assert_eq!(parse_config("[pen]\nup_angle = 181\n"), Err(ConfigError::OutOfRange));
    }

    #[test]
    fn test_result_is_validated() {
        // Start period faster than cruise is parsed fine but fails validation
        let config_str = "[ramp]\nstart_period = 100\n";
        assert_eq!(parse_config(config_str), Err(ConfigError::OutOfRange));
    }
}
