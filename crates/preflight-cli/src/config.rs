//! Environment parsing and the optional TOML drive configuration.
//!
//! The binaries read the environment exactly once at startup and thread the
//! parsed values into the engines as explicit parameters. The parsers here
//! take raw `Option<&str>` values so every policy decision is testable
//! without mutating process state.

use std::fs;
use std::path::Path;

use preflight_drive::SequenceTiming;
use preflight_types::{DriveMode, PinAssignment};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// Truthy values accepted for boolean flags such as `REQUIRE_HARDWARE`.
const TRUTHY: [&str; 4] = ["1", "true", "yes", "on"];

/// Parse a boolean environment flag. Absent or unrecognised values are
/// false.
pub fn parse_bool_flag(raw: Option<&str>) -> bool {
    raw.is_some_and(|value| TRUTHY.contains(&value.trim().to_ascii_lowercase().as_str()))
}

/// Parse `CAMERA_INDEX`. Absent or non-integer values fall back to device 0.
pub fn parse_camera_index(raw: Option<&str>) -> u32 {
    match raw {
        None => 0,
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            warn!(value, "CAMERA_INDEX is not an integer; using device 0");
            0
        }),
    }
}

/// Drive-test configuration, loadable from a TOML file.
///
/// Every field defaults to the reference behaviour, so a missing or partial
/// file is never an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveConfig {
    #[serde(default = "default_mode")]
    pub mode: DriveMode,
    #[serde(default = "default_dwell_ms")]
    pub dwell_ms: u64,
    #[serde(default = "default_duty_percent")]
    pub duty_percent: f32,
    #[serde(default = "default_pwm_frequency_hz")]
    pub pwm_frequency_hz: u32,
    // Last so the serialized form keeps top-level keys ahead of the table.
    #[serde(default)]
    pub pins: PinAssignment,
}

fn default_mode() -> DriveMode {
    DriveMode::FixedJumper
}
fn default_dwell_ms() -> u64 {
    2000
}
fn default_duty_percent() -> f32 {
    60.0
}
fn default_pwm_frequency_hz() -> u32 {
    1000
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            dwell_ms: default_dwell_ms(),
            duty_percent: default_duty_percent(),
            pwm_frequency_hz: default_pwm_frequency_hz(),
            pins: PinAssignment::default(),
        }
    }
}

impl DriveConfig {
    /// The sequencer timing this configuration describes.
    pub fn timing(&self) -> SequenceTiming {
        SequenceTiming {
            dwell: Duration::from_millis(self.dwell_ms),
            duty_percent: self.duty_percent,
            pwm_frequency_hz: self.pwm_frequency_hz,
        }
    }
}

/// Load the drive configuration from `path`. Returns `None` when the file
/// does not exist.
pub fn load_drive_config(path: &Path) -> Result<Option<DriveConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read drive config at {}: {}", path.display(), e))?;
    let cfg: DriveConfig =
        toml::from_str(&raw).map_err(|e| format!("Failed to parse drive config: {}", e))?;
    Ok(Some(cfg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthy_values_are_accepted_case_insensitively() {
        for value in ["1", "true", "YES", "On", " true "] {
            assert!(parse_bool_flag(Some(value)), "{value:?} should be truthy");
        }
    }

    #[test]
    fn falsy_and_absent_values_default_to_false() {
        for value in [Some("0"), Some("false"), Some("off"), Some("2"), Some(""), None] {
            assert!(!parse_bool_flag(value), "{value:?} should be falsy");
        }
    }

    #[test]
    fn camera_index_parses_integers() {
        assert_eq!(parse_camera_index(Some("3")), 3);
        assert_eq!(parse_camera_index(Some(" 12 ")), 12);
    }

    #[test]
    fn camera_index_falls_back_to_device_zero() {
        assert_eq!(parse_camera_index(None), 0);
        assert_eq!(parse_camera_index(Some("not-a-number")), 0);
        assert_eq!(parse_camera_index(Some("-1")), 0);
    }

    #[test]
    fn missing_config_file_yields_none() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("preflight-drive.toml");
        assert!(load_drive_config(&path).expect("no error").is_none());
    }

    #[test]
    fn partial_config_file_keeps_defaults() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("preflight-drive.toml");
        fs::write(&path, "mode = \"pwm\"\nduty_percent = 45.0\n").expect("write");

        let cfg = load_drive_config(&path).expect("load").expect("some");
        assert_eq!(cfg.mode, DriveMode::Pwm);
        assert!((cfg.duty_percent - 45.0).abs() < f32::EPSILON);
        assert_eq!(cfg.dwell_ms, 2000);
        assert_eq!(cfg.pins, PinAssignment::default());
    }

    #[test]
    fn pin_table_overrides_apply() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("preflight-drive.toml");
        fs::write(&path, "[pins]\nena = 18\nin1 = 5\n").expect("write");

        let cfg = load_drive_config(&path).expect("load").expect("some");
        assert_eq!(cfg.pins.ena, 18);
        assert_eq!(cfg.pins.in1, 5);
        // Unspecified pins keep the wiring-table defaults.
        assert_eq!(cfg.pins.enb, 13);
        assert_eq!(cfg.pins.in4, 22);
    }

    #[test]
    fn config_roundtrips_through_toml() {
        let cfg = DriveConfig {
            mode: DriveMode::Pwm,
            dwell_ms: 500,
            ..DriveConfig::default()
        };
        let raw = toml::to_string(&cfg).expect("serialize");
        let back: DriveConfig = toml::from_str(&raw).expect("parse");
        assert_eq!(back.mode, DriveMode::Pwm);
        assert_eq!(back.dwell_ms, 500);
        assert_eq!(back.timing().dwell, Duration::from_millis(500));
    }

    #[test]
    fn garbled_config_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("preflight-drive.toml");
        fs::write(&path, "mode = [not toml").expect("write");
        assert!(load_drive_config(&path).is_err());
    }
}
