//! Generic `Camera` trait and supporting types for index-addressed capture
//! devices.

use preflight_types::RigError;

/// Capture configuration applied after a device is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameFormat {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Requested capture rate in frames per second.
    pub fps: u32,
}

impl Default for FrameFormat {
    /// The diagnostic default: 640×480 @ 10 fps.
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fps: 10,
        }
    }
}

/// A raw image frame returned by a camera driver.
#[derive(Debug, Clone)]
pub struct CameraFrame {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Raw pixel data (e.g. RGB24 or greyscale).
    pub data: Vec<u8>,
}

/// An index-addressed video capture device.
///
/// The driver owns at most one open handle at a time; [`release`][Camera::release]
/// must be safe to call on every path, including after a failed
/// [`open`][Camera::open].
pub trait Camera: Send + Sync {
    /// Stable identifier for this camera driver, e.g. `"v4l2"`.
    fn id(&self) -> &str;

    /// Open the capture device at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`RigError::HardwareFault`] if no device exists at the index
    /// or the device node cannot be acquired.
    fn open(&mut self, index: u32) -> Result<(), RigError>;

    /// Apply a capture format to the open device.
    ///
    /// Drivers may need a settle period before the configuration takes
    /// effect; the caller owns that delay.
    ///
    /// # Errors
    ///
    /// Returns [`RigError::HardwareFault`] if the device rejects the format.
    fn configure(&mut self, format: &FrameFormat) -> Result<(), RigError>;

    /// Capture and return one frame from the open device.
    ///
    /// # Errors
    ///
    /// Returns [`RigError::HardwareFault`] if no frame is delivered (e.g.
    /// the device is open but its pipeline is stalled).
    fn read_frame(&mut self) -> Result<CameraFrame, RigError>;

    /// Release the device handle. Idempotent; a no-op when nothing is open.
    fn release(&mut self);
}
