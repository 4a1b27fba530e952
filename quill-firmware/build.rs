//! Build script for quill-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates machine.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Known sections and their keys
const SCHEMA: &[(&str, &[&str])] = &[
    ("kinematics", &["steps_per_mm", "x_max_mm", "y_max_mm"]),
    (
        "ramp",
        &["start_period", "travel_period", "drawing_period", "accel_ceiling"],
    ),
    ("pen", &["up_angle", "down_angle", "settle_ms"]),
    ("stepper", &["pulse_width_ns"]),
    ("kill_switch", &["debounce_ms"]),
    ("executor", &["idle_timeout_ms", "killed_poll_ms"]),
];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate machine.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=machine.toml");

    let config_path = Path::new("machine.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: machine.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds machine.toml from the quill-firmware        ║\n\
            ║  directory. Create one (all keys are optional).                  ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read machine.toml                              ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in machine.toml                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_schema(&config, &mut errors);
    validate_values(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid machine configuration                            ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=machine.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reject unknown sections and keys, and anything outside a section
fn validate_schema(config: &toml::Value, errors: &mut Vec<String>) {
    let root = match config.as_table() {
        Some(t) => t,
        None => return,
    };

    for (name, section) in root {
        let keys = match SCHEMA.iter().find(|(s, _)| s == name) {
            Some((_, keys)) => keys,
            None => {
                errors.push(format!("unknown section or key '{}'", name));
                continue;
            }
        };

        let table = match section.as_table() {
            Some(t) => t,
            None => {
                errors.push(format!("[{}] must be a table", name));
                continue;
            }
        };

        for (key, value) in table {
            if !keys.contains(&key.as_str()) {
                errors.push(format!("[{}] unknown key '{}'", name, key));
            }
            if value.as_integer().is_none() && value.as_float().is_none() {
                errors.push(format!("[{}] {} must be a number", name, key));
            }
        }
    }
}

/// Look up a numeric value as f64
fn number(config: &toml::Value, section: &str, key: &str) -> Option<f64> {
    let value = config.get(section)?.get(key)?;
    value
        .as_float()
        .or_else(|| value.as_integer().map(|i| i as f64))
}

/// Check value ranges the board-side parser enforces
fn validate_values(config: &toml::Value, errors: &mut Vec<String>) {
    for key in ["steps_per_mm", "x_max_mm", "y_max_mm"] {
        if let Some(v) = number(config, "kinematics", key) {
            if v <= 0.0 {
                errors.push(format!("[kinematics] {} must be positive", key));
            }
        }
    }

    let spm = number(config, "kinematics", "steps_per_mm").unwrap_or(20.0);
    let x_max = number(config, "kinematics", "x_max_mm").unwrap_or(250.0);
    let y_max = number(config, "kinematics", "y_max_mm").unwrap_or(380.0);
    if x_max.max(y_max) * spm > f64::from(i32::MAX / 2) {
        errors.push("[kinematics] bed size in steps overflows the motor deltas".to_string());
    }

    // Integer keys must fit in u32
    for (section, keys) in SCHEMA.iter().filter(|(s, _)| *s != "kinematics") {
        for key in keys.iter() {
            if let Some(toml::Value::Integer(v)) = config.get(*section).and_then(|s| s.get(*key)) {
                if *v < 0 || *v > i64::from(u32::MAX) {
                    errors.push(format!("[{}] {} out of range", section, key));
                }
            } else if let Some(toml::Value::Float(_)) =
                config.get(*section).and_then(|s| s.get(*key))
            {
                errors.push(format!("[{}] {} must be an integer", section, key));
            }
        }
    }

    for key in ["up_angle", "down_angle"] {
        if let Some(v) = number(config, "pen", key) {
            if !(0.0..=180.0).contains(&v) {
                errors.push(format!("[pen] {} must be 0-180", key));
            }
        }
    }

    // Ramps must start slower than they cruise
    let start = number(config, "ramp", "start_period").unwrap_or(4999.0);
    for key in ["travel_period", "drawing_period"] {
        if let Some(v) = number(config, "ramp", key) {
            if v == 0.0 {
                errors.push(format!("[ramp] {} must be non-zero", key));
            }
            if v > start {
                errors.push(format!("[ramp] {} must not exceed start_period", key));
            }
        }
    }

    for key in ["idle_timeout_ms", "killed_poll_ms"] {
        if number(config, "executor", key) == Some(0.0) {
            errors.push(format!("[executor] {} must be non-zero", key));
        }
    }
}
