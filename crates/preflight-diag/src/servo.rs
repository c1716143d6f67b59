//! Servo-controller reachability check.

use preflight_hal::ServoController;
use preflight_types::CheckOutcome;
use tracing::debug;

use crate::check::Check;

/// Channel count the diagnostic always initializes the board with.
pub const SERVO_CHANNELS: u8 = 16;

/// Probes the servo driver board by attempting initialization.
///
/// Success means the driver completed initialization without signaling an
/// error; a missing bus or driver library becomes the failure detail.
pub struct ServoControllerCheck {
    controller: Box<dyn ServoController>,
}

impl ServoControllerCheck {
    pub fn new(controller: Box<dyn ServoController>) -> Self {
        Self { controller }
    }
}

impl Check for ServoControllerCheck {
    fn name(&self) -> &str {
        "servo-controller"
    }

    fn probe(&mut self) -> CheckOutcome {
        debug!(driver = self.controller.id(), channels = SERVO_CHANNELS, "probing servo controller");
        match self.controller.initialize(SERVO_CHANNELS) {
            Ok(()) => CheckOutcome::pass(self.name()),
            Err(err) => CheckOutcome::fail(self.name(), format!("servo controller unavailable: {err}")),
        }
    }

    fn success_line(&self) -> String {
        format!("servo controller initialized ({SERVO_CHANNELS} channels reachable)")
    }
}
