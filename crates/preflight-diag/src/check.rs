//! The `Check` capability each probed device exposes to the runner.

use preflight_types::CheckOutcome;

/// One named hardware check.
///
/// `probe` must not panic and has no error channel on purpose: any
/// collaborator failure is translated at the boundary into a failed
/// [`CheckOutcome`] carrying a human-readable cause, so the classification
/// logic downstream operates on data, never on unwinding.
pub trait Check {
    /// Stable identifier, e.g. `"servo-controller"` or `"camera"`.
    fn name(&self) -> &str;

    /// Probe the hardware once. Single attempt; no retry.
    fn probe(&mut self) -> CheckOutcome;

    /// Human-readable line reported when the probe succeeded.
    fn success_line(&self) -> String {
        format!("{} check passed", self.name())
    }
}
