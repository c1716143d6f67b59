//! Camera capture check: open, configure, settle, read one frame.

use std::thread;
use std::time::Duration;

use preflight_hal::{Camera, FrameFormat};
use preflight_types::CheckOutcome;
use tracing::{debug, warn};

use crate::check::Check;

/// Delay between applying the capture format and reading the first frame,
/// so the configuration takes effect in the device pipeline.
pub const SETTLE_DELAY: Duration = Duration::from_millis(200);

/// Probes the capture device at a fixed index.
///
/// A device that cannot be opened and a device that opens but delivers no
/// frame produce distinct failure details; both classify identically under
/// the hardware policy. The handle is released on every path, including the
/// failed-open path.
pub struct CameraCheck {
    camera: Box<dyn Camera>,
    index: u32,
    format: FrameFormat,
    settle: Duration,
}

impl CameraCheck {
    pub fn new(camera: Box<dyn Camera>, index: u32) -> Self {
        Self {
            camera,
            index,
            format: FrameFormat::default(),
            settle: SETTLE_DELAY,
        }
    }

    /// Override the capture format (default 640×480 @ 10 fps).
    pub fn with_format(mut self, format: FrameFormat) -> Self {
        self.format = format;
        self
    }

    /// Override the settle delay. Tests pass [`Duration::ZERO`].
    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    fn probe_device(&mut self) -> CheckOutcome {
        debug!(driver = self.camera.id(), index = self.index, "probing camera");
        if let Err(err) = self.camera.open(self.index) {
            debug!(index = self.index, error = %err, "camera open failed");
            return CheckOutcome::fail(
                "camera",
                format!("camera index {} could not be opened", self.index),
            );
        }

        // A rejected format is not disqualifying on its own; the frame read
        // below is the functional verdict.
        if let Err(err) = self.camera.configure(&self.format) {
            warn!(index = self.index, error = %err, "camera rejected capture format");
        }

        thread::sleep(self.settle);

        match self.camera.read_frame() {
            Ok(frame) => {
                debug!(index = self.index, width = frame.width, height = frame.height, "frame delivered");
                CheckOutcome::pass("camera")
            }
            Err(err) => {
                debug!(index = self.index, error = %err, "frame read failed");
                CheckOutcome::fail(
                    "camera",
                    format!("camera index {} could not deliver a frame", self.index),
                )
            }
        }
    }
}

impl Check for CameraCheck {
    fn name(&self) -> &str {
        "camera"
    }

    fn probe(&mut self) -> CheckOutcome {
        let outcome = self.probe_device();
        // Release unconditionally, mirroring the open-failure path of the
        // underlying capture APIs.
        self.camera.release();
        outcome
    }

    fn success_line(&self) -> String {
        format!("camera index {} opened and delivered a frame", self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use preflight_hal::sim::SimCamera;
    use std::sync::atomic::Ordering;

    fn check_with(camera: SimCamera, index: u32) -> CameraCheck {
        CameraCheck::new(Box::new(camera), index).with_settle(Duration::ZERO)
    }

    #[test]
    fn working_camera_passes() {
        let mut check = check_with(SimCamera::working(), 0);
        let outcome = check.probe();
        assert!(outcome.succeeded);
        assert_eq!(check.success_line(), "camera index 0 opened and delivered a frame");
    }

    #[test]
    fn unopenable_camera_detail_identifies_index() {
        let mut check = check_with(SimCamera::failing_open(), 3);
        let outcome = check.probe();
        assert!(!outcome.succeeded);
        assert_eq!(
            outcome.detail.as_deref(),
            Some("camera index 3 could not be opened")
        );
    }

    #[test]
    fn frameless_camera_detail_is_distinct() {
        let mut check = check_with(SimCamera::failing_frame(), 0);
        let outcome = check.probe();
        assert!(!outcome.succeeded);
        assert_eq!(
            outcome.detail.as_deref(),
            Some("camera index 0 could not deliver a frame")
        );
    }

    #[test]
    fn custom_format_is_applied_to_the_device() {
        let camera = SimCamera::working();
        let mut check = check_with(camera, 0).with_format(FrameFormat {
            width: 320,
            height: 240,
            fps: 5,
        });
        assert!(check.probe().succeeded);
    }

    #[test]
    fn handle_released_after_successful_probe() {
        let camera = SimCamera::working();
        let witness = camera.release_witness();
        check_with(camera, 0).probe();
        assert!(witness.load(Ordering::SeqCst));
    }

    #[test]
    fn handle_released_even_when_open_fails() {
        let camera = SimCamera::failing_open();
        let witness = camera.release_witness();
        check_with(camera, 0).probe();
        assert!(witness.load(Ordering::SeqCst));
    }

    #[test]
    fn handle_released_when_no_frame_delivered() {
        let camera = SimCamera::failing_frame();
        let witness = camera.release_witness();
        check_with(camera, 0).probe();
        assert!(witness.load(Ordering::SeqCst));
    }
}
