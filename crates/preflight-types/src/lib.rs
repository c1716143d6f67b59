use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Result of probing one piece of hardware.
///
/// Created once per check invocation, consumed by the policy classifier,
/// never mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// Identifier of the check, e.g. `"servo-controller"` or `"camera"`.
    pub name: String,
    /// Whether the probed hardware responded as expected.
    pub succeeded: bool,
    /// Human-readable cause when not succeeded; absent otherwise.
    pub detail: Option<String>,
}

impl CheckOutcome {
    /// A successful probe.
    pub fn pass(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            succeeded: true,
            detail: None,
        }
    }

    /// A failed probe with a human-readable cause.
    pub fn fail(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            succeeded: false,
            detail: Some(detail.into()),
        }
    }
}

/// Classification of a single check outcome under the active hardware policy.
///
/// Derived, never stored on the outcome itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Ok,
    Warn,
    Fail,
}

impl Severity {
    /// Apply the required/optional policy to a probe result.
    ///
    /// A failed check is a hard failure only when hardware is required;
    /// otherwise it degrades to a warning.
    pub fn classify(succeeded: bool, require_hardware: bool) -> Self {
        match (succeeded, require_hardware) {
            (true, _) => Severity::Ok,
            (false, true) => Severity::Fail,
            (false, false) => Severity::Warn,
        }
    }

    /// Console tag used by report rendering.
    pub fn tag(self) -> &'static str {
        match self {
            Severity::Ok => "[OK]",
            Severity::Warn => "[WARN]",
            Severity::Fail => "[FAIL]",
        }
    }
}

/// Aggregate over all [`CheckOutcome`]s for one diagnostic run.
///
/// Insertion order equals check execution order. Every check contributes to
/// exactly one of `warnings`/`failures`, or to neither if it succeeded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub warnings: Vec<String>,
    pub failures: Vec<String>,
}

impl RunSummary {
    /// Route a classified outcome's detail into the matching bucket.
    ///
    /// Successful outcomes contribute nothing.
    pub fn record(&mut self, outcome: &CheckOutcome, severity: Severity) {
        let Some(detail) = &outcome.detail else {
            return;
        };
        match severity {
            Severity::Warn => self.warnings.push(detail.clone()),
            Severity::Fail => self.failures.push(detail.clone()),
            Severity::Ok => {}
        }
    }

    /// The process exit code deployment automation depends on: `1` iff at
    /// least one required check failed, `0` otherwise.
    pub fn exit_code(&self) -> i32 {
        i32::from(!self.failures.is_empty())
    }

    /// Overall verdict for the run.
    pub fn verdict(&self) -> Severity {
        if !self.failures.is_empty() {
            Severity::Fail
        } else if !self.warnings.is_empty() {
            Severity::Warn
        } else {
            Severity::Ok
        }
    }
}

/// One rendered line of the diagnostic report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckRecord {
    pub name: String,
    pub severity: Severity,
    pub message: String,
}

/// Full structured report for one diagnostic run: per-check records in
/// execution order plus the aggregate summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub checks: Vec<CheckRecord>,
    pub summary: RunSummary,
}

impl RunReport {
    /// Start an empty report stamped with a fresh run id.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            checks: Vec::new(),
            summary: RunSummary::default(),
        }
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Static mapping from logical L298N motor-driver terminals to physical BCM
/// pin numbers. Immutable for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinAssignment {
    /// Motor A enable line.
    #[serde(default = "default_ena")]
    pub ena: u8,
    /// Motor B enable line.
    #[serde(default = "default_enb")]
    pub enb: u8,
    /// Motor A direction pair.
    #[serde(default = "default_in1")]
    pub in1: u8,
    #[serde(default = "default_in2")]
    pub in2: u8,
    /// Motor B direction pair.
    #[serde(default = "default_in3")]
    pub in3: u8,
    #[serde(default = "default_in4")]
    pub in4: u8,
}

fn default_ena() -> u8 {
    12
}
fn default_enb() -> u8 {
    13
}
fn default_in1() -> u8 {
    23
}
fn default_in2() -> u8 {
    24
}
fn default_in3() -> u8 {
    27
}
fn default_in4() -> u8 {
    22
}

impl Default for PinAssignment {
    fn default() -> Self {
        Self {
            ena: default_ena(),
            enb: default_enb(),
            in1: default_in1(),
            in2: default_in2(),
            in3: default_in3(),
            in4: default_in4(),
        }
    }
}

impl PinAssignment {
    /// All six pins, enable lines first.
    pub fn all(&self) -> [u8; 6] {
        [self.ena, self.enb, self.in1, self.in2, self.in3, self.in4]
    }

    /// The four direction pins in terminal order.
    pub fn direction(&self) -> [u8; 4] {
        [self.in1, self.in2, self.in3, self.in4]
    }
}

/// Logical state of the dual-motor drive during a manual test sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DriveState {
    /// Pins configured as outputs, enable lines armed, no drive commanded.
    Idle,
    Forward,
    Reverse,
    /// Terminal state for a normal run; all direction pins low.
    Stopped,
}

/// How motor speed is governed, selected once at start of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriveMode {
    /// Enable lines driven by software PWM channels.
    Pwm,
    /// Enable lines held permanently high; speed fixed by an external jumper.
    FixedJumper,
}

/// Error type spanning driver availability, device faults, and operator
/// interruption.
#[derive(Error, Debug, Serialize, Deserialize)]
pub enum RigError {
    /// The driver or its underlying bus cannot be loaded or initialized at
    /// all. Fatal for the component's run.
    #[error("driver unavailable for {component}: {details}")]
    DriverUnavailable { component: String, details: String },

    /// The device is reachable but refused a command or failed to deliver
    /// expected output.
    #[error("hardware fault on {component}: {details}")]
    HardwareFault { component: String, details: String },

    /// An operator interrupt was observed while a sequence was in progress.
    #[error("drive sequence interrupted by operator")]
    Interrupted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_success_is_ok_under_both_policies() {
        assert_eq!(Severity::classify(true, true), Severity::Ok);
        assert_eq!(Severity::classify(true, false), Severity::Ok);
    }

    #[test]
    fn classify_failure_follows_policy() {
        assert_eq!(Severity::classify(false, true), Severity::Fail);
        assert_eq!(Severity::classify(false, false), Severity::Warn);
    }

    #[test]
    fn summary_routes_details_by_severity() {
        let mut summary = RunSummary::default();
        let warn = CheckOutcome::fail("camera", "no frame");
        let fail = CheckOutcome::fail("servo-controller", "bus missing");

        summary.record(&warn, Severity::Warn);
        summary.record(&fail, Severity::Fail);

        assert_eq!(summary.warnings, vec!["no frame"]);
        assert_eq!(summary.failures, vec!["bus missing"]);
    }

    #[test]
    fn successful_outcome_contributes_nothing() {
        let mut summary = RunSummary::default();
        summary.record(&CheckOutcome::pass("camera"), Severity::Ok);
        assert!(summary.warnings.is_empty());
        assert!(summary.failures.is_empty());
    }

    #[test]
    fn exit_code_is_one_iff_failures_present() {
        let mut summary = RunSummary::default();
        assert_eq!(summary.exit_code(), 0);

        summary.warnings.push("degraded".to_string());
        assert_eq!(summary.exit_code(), 0);

        summary.failures.push("broken".to_string());
        assert_eq!(summary.exit_code(), 1);
    }

    #[test]
    fn verdict_tracks_worst_bucket() {
        let mut summary = RunSummary::default();
        assert_eq!(summary.verdict(), Severity::Ok);
        summary.warnings.push("w".to_string());
        assert_eq!(summary.verdict(), Severity::Warn);
        summary.failures.push("f".to_string());
        assert_eq!(summary.verdict(), Severity::Fail);
    }

    #[test]
    fn pin_assignment_defaults_match_wiring_table() {
        let pins = PinAssignment::default();
        assert_eq!(pins.all(), [12, 13, 23, 24, 27, 22]);
        assert_eq!(pins.direction(), [23, 24, 27, 22]);
    }

    #[test]
    fn run_report_serialization_roundtrip() {
        let mut report = RunReport::new();
        report.checks.push(CheckRecord {
            name: "camera".to_string(),
            severity: Severity::Warn,
            message: "camera index 0 could not be opened".to_string(),
        });
        report.summary.warnings.push("camera index 0 could not be opened".to_string());

        let json = serde_json::to_string(&report).unwrap();
        let back: RunReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, report.id);
        assert_eq!(back.checks.len(), 1);
        assert_eq!(back.checks[0].severity, Severity::Warn);
        assert_eq!(back.summary.exit_code(), 0);
    }

    #[test]
    fn severity_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Severity::Fail).unwrap(), "\"FAIL\"");
    }

    #[test]
    fn rig_error_display() {
        let err = RigError::DriverUnavailable {
            component: "servo-controller".to_string(),
            details: "I2C bus not present".to_string(),
        };
        assert!(err.to_string().contains("servo-controller"));
        assert!(err.to_string().contains("I2C bus not present"));

        assert!(RigError::Interrupted.to_string().contains("interrupted"));
    }

    #[test]
    fn drive_mode_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&DriveMode::FixedJumper).unwrap(),
            "\"fixed_jumper\""
        );
        assert_eq!(serde_json::to_string(&DriveMode::Pwm).unwrap(), "\"pwm\"");
    }
}
