//! [`DiagnosticRunner`] – executes checks in order and applies the
//! required/optional classification rule.
//!
//! The policy is threaded in at construction, never read from ambient
//! process state, so classification is testable without touching the
//! environment. An individual check failure never aborts the run; only the
//! aggregate failure count determines the final exit code.

use preflight_types::{CheckRecord, RunReport, Severity};
use tracing::{error, info, warn};

use crate::check::Check;

/// The required/optional hardware policy for one run.
#[derive(Debug, Clone, Copy, Default)]
pub struct Policy {
    /// When set, a failed check is a hard failure (exit code 1); otherwise
    /// it degrades to a warning.
    pub require_hardware: bool,
}

/// Owns an ordered set of checks and runs them under one [`Policy`].
pub struct DiagnosticRunner {
    policy: Policy,
    checks: Vec<Box<dyn Check>>,
}

impl DiagnosticRunner {
    pub fn new(policy: Policy) -> Self {
        Self {
            policy,
            checks: Vec::new(),
        }
    }

    /// Append a check. Execution order is registration order.
    pub fn with_check(mut self, check: Box<dyn Check>) -> Self {
        self.checks.push(check);
        self
    }

    /// Execute every check once, classify, and aggregate.
    pub fn run(&mut self) -> RunReport {
        let mut report = RunReport::new();
        info!(
            run_id = %report.id,
            require_hardware = self.policy.require_hardware,
            checks = self.checks.len(),
            "starting diagnostic run"
        );

        for check in &mut self.checks {
            let outcome = check.probe();
            let severity = Severity::classify(outcome.succeeded, self.policy.require_hardware);
            let message = match severity {
                Severity::Ok => check.success_line(),
                Severity::Warn => format!(
                    "{} (hardware not required)",
                    detail_of(&outcome.detail, &outcome.name)
                ),
                Severity::Fail => detail_of(&outcome.detail, &outcome.name),
            };

            match severity {
                Severity::Ok => info!(check = %outcome.name, "{message}"),
                Severity::Warn => warn!(check = %outcome.name, "{message}"),
                Severity::Fail => error!(check = %outcome.name, "{message}"),
            }

            report.summary.record(&outcome, severity);
            report.checks.push(CheckRecord {
                name: outcome.name,
                severity,
                message,
            });
        }

        info!(
            run_id = %report.id,
            verdict = ?report.summary.verdict(),
            warnings = report.summary.warnings.len(),
            failures = report.summary.failures.len(),
            "diagnostic run complete"
        );
        report
    }
}

fn detail_of(detail: &Option<String>, name: &str) -> String {
    detail
        .clone()
        .unwrap_or_else(|| format!("{name} check failed"))
}
