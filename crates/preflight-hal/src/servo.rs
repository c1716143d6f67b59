//! Generic `ServoController` trait for PWM servo driver boards.

use preflight_types::RigError;

/// A multi-channel servo driver board (commonly a 16-channel I2C device).
///
/// The diagnostic runner only ever asks the board to initialize; commanding
/// individual servo channels is outside the harness's scope.
pub trait ServoController: Send + Sync {
    /// Stable identifier for this controller, e.g. `"pca9685"`.
    fn id(&self) -> &str;

    /// Bring the board up with the given channel count.
    ///
    /// # Errors
    ///
    /// Returns [`RigError::DriverUnavailable`] when the driver library or
    /// its underlying bus cannot be reached at all, and
    /// [`RigError::HardwareFault`] when the board is present but rejects
    /// initialization.
    fn initialize(&mut self, channels: u8) -> Result<(), RigError>;
}
