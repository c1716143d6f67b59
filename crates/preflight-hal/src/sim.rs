//! In-process stub drivers for CI and headless testing without physical
//! hardware.
//!
//! Each stub records the commands it receives and can be scripted to fail at
//! a chosen point, so the policy engine and the sequencer's cleanup paths
//! can be exercised without a servo board, a camera, or a pin header.
//!
//! # Stub behaviour
//!
//! | Driver | Stub behaviour |
//! |---|---|
//! | [`SimServoController`] | Succeeds, or always reports the scripted unavailability. |
//! | [`SimCamera`] | Delivers blank frames; can fail at open or at frame delivery. Records whether `release` ran. |
//! | [`SimGpio`] | Records every pin operation into a shared [`PinLog`]; can fail a chosen write. |

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use preflight_types::RigError;
use tracing::debug;

use crate::camera::{Camera, CameraFrame, FrameFormat};
use crate::gpio::{Gpio, Level, PinNumbering, PwmChannel};
use crate::servo::ServoController;

// ────────────────────────────────────────────────────────────────────────────
// Servo controller stub
// ────────────────────────────────────────────────────────────────────────────

/// A simulated servo driver board.
pub struct SimServoController {
    unavailable: Option<String>,
    initialized_channels: Option<u8>,
}

impl SimServoController {
    /// A board that initializes successfully.
    pub fn reachable() -> Self {
        Self {
            unavailable: None,
            initialized_channels: None,
        }
    }

    /// A board whose driver cannot be reached, with the given cause.
    pub fn unavailable(details: impl Into<String>) -> Self {
        Self {
            unavailable: Some(details.into()),
            initialized_channels: None,
        }
    }

    /// Channel count from the last successful initialization.
    pub fn initialized_channels(&self) -> Option<u8> {
        self.initialized_channels
    }
}

impl ServoController for SimServoController {
    fn id(&self) -> &str {
        "sim-servo"
    }

    fn initialize(&mut self, channels: u8) -> Result<(), RigError> {
        if let Some(details) = &self.unavailable {
            return Err(RigError::DriverUnavailable {
                component: "servo-controller".to_string(),
                details: details.clone(),
            });
        }
        self.initialized_channels = Some(channels);
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Camera stub
// ────────────────────────────────────────────────────────────────────────────

/// A simulated capture device.
///
/// The release witness is shared, so a test can hand the camera to a check
/// as a `Box<dyn Camera>` and still observe whether the handle was released.
pub struct SimCamera {
    fail_open: bool,
    fail_frame: bool,
    opened: bool,
    format: Option<FrameFormat>,
    released: Arc<AtomicBool>,
}

impl SimCamera {
    /// A camera that opens, configures, and delivers frames.
    pub fn working() -> Self {
        Self {
            fail_open: false,
            fail_frame: false,
            opened: false,
            format: None,
            released: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A camera whose device node cannot be opened.
    pub fn failing_open() -> Self {
        Self {
            fail_open: true,
            ..Self::working()
        }
    }

    /// A camera that opens but never delivers a frame.
    pub fn failing_frame() -> Self {
        Self {
            fail_frame: true,
            ..Self::working()
        }
    }

    /// Handle that turns true once `release` has run.
    pub fn release_witness(&self) -> Arc<AtomicBool> {
        self.released.clone()
    }
}

impl Camera for SimCamera {
    fn id(&self) -> &str {
        "sim-camera"
    }

    fn open(&mut self, index: u32) -> Result<(), RigError> {
        if self.fail_open {
            return Err(RigError::HardwareFault {
                component: "camera".to_string(),
                details: format!("no capture device at index {index}"),
            });
        }
        self.opened = true;
        Ok(())
    }

    fn configure(&mut self, format: &FrameFormat) -> Result<(), RigError> {
        if !self.opened {
            return Err(RigError::HardwareFault {
                component: "camera".to_string(),
                details: "configure called with no open device".to_string(),
            });
        }
        self.format = Some(*format);
        Ok(())
    }

    fn read_frame(&mut self) -> Result<CameraFrame, RigError> {
        if !self.opened || self.fail_frame {
            return Err(RigError::HardwareFault {
                component: "camera".to_string(),
                details: "capture pipeline delivered no frame".to_string(),
            });
        }
        let format = self.format.unwrap_or_default();
        Ok(CameraFrame {
            width: format.width,
            height: format.height,
            data: vec![0u8; (format.width * format.height) as usize],
        })
    }

    fn release(&mut self) {
        self.opened = false;
        self.released.store(true, Ordering::SeqCst);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// GPIO stub
// ────────────────────────────────────────────────────────────────────────────

/// One recorded pin operation.
#[derive(Debug, Clone, PartialEq)]
pub enum PinEvent {
    SetNumbering(PinNumbering),
    SetupOutput(u8),
    Write(u8, Level),
    PwmStart { pin: u8, frequency_hz: u32 },
    PwmDuty { pin: u8, percent: f32 },
    PwmStop(u8),
    Cleanup,
}

/// Shared recording of everything a [`SimGpio`] controller was asked to do.
#[derive(Debug, Default)]
pub struct PinLog {
    /// Every operation in call order.
    pub events: Vec<PinEvent>,
    levels: HashMap<u8, Level>,
    duties: HashMap<u8, f32>,
    stopped: Vec<u8>,
    cleanup_count: usize,
}

impl PinLog {
    /// Last commanded level for `pin`, if it was ever written.
    pub fn level(&self, pin: u8) -> Option<Level> {
        self.levels.get(&pin).copied()
    }

    /// Last commanded duty for `pin`'s PWM channel, if any.
    pub fn duty(&self, pin: u8) -> Option<f32> {
        self.duties.get(&pin).copied()
    }

    /// Whether the PWM channel on `pin` was stopped.
    pub fn pwm_stopped(&self, pin: u8) -> bool {
        self.stopped.contains(&pin)
    }

    /// How many times the controller's global cleanup ran.
    pub fn cleanup_count(&self) -> usize {
        self.cleanup_count
    }
}

fn lock_log(log: &Arc<Mutex<PinLog>>) -> MutexGuard<'_, PinLog> {
    // The harness is single-threaded; a poisoned log only happens when a
    // test thread panicked mid-assertion, and the recorded state is still
    // the truth we want to inspect.
    log.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A simulated GPIO controller recording into a shared [`PinLog`].
pub struct SimGpio {
    log: Arc<Mutex<PinLog>>,
    fail_write: Option<(u8, usize)>,
    write_counts: HashMap<u8, usize>,
}

impl SimGpio {
    pub fn new() -> Self {
        Self {
            log: Arc::new(Mutex::new(PinLog::default())),
            fail_write: None,
            write_counts: HashMap::new(),
        }
    }

    /// Script the `nth` write (1-based) to `pin` to fail with a hardware
    /// fault. Later writes to the same pin succeed again, so cleanup can
    /// still drive the pin low.
    pub fn fail_write_on(mut self, pin: u8, nth: usize) -> Self {
        self.fail_write = Some((pin, nth));
        self
    }

    /// Handle onto the shared log for assertions after the controller has
    /// been boxed away.
    pub fn log(&self) -> Arc<Mutex<PinLog>> {
        self.log.clone()
    }
}

impl Default for SimGpio {
    fn default() -> Self {
        Self::new()
    }
}

impl Gpio for SimGpio {
    fn set_numbering(&mut self, scheme: PinNumbering) -> Result<(), RigError> {
        lock_log(&self.log).events.push(PinEvent::SetNumbering(scheme));
        Ok(())
    }

    fn setup_output(&mut self, pin: u8) -> Result<(), RigError> {
        lock_log(&self.log).events.push(PinEvent::SetupOutput(pin));
        Ok(())
    }

    fn write(&mut self, pin: u8, level: Level) -> Result<(), RigError> {
        let count = self.write_counts.entry(pin).or_insert(0);
        *count += 1;
        if self.fail_write == Some((pin, *count)) {
            debug!(pin, nth = *count, "injecting scripted write failure");
            return Err(RigError::HardwareFault {
                component: format!("gpio pin {pin}"),
                details: "output write did not take effect".to_string(),
            });
        }
        let mut log = lock_log(&self.log);
        log.events.push(PinEvent::Write(pin, level));
        log.levels.insert(pin, level);
        Ok(())
    }

    fn pwm_channel(&mut self, pin: u8, frequency_hz: u32) -> Result<Box<dyn PwmChannel>, RigError> {
        let mut log = lock_log(&self.log);
        log.events.push(PinEvent::PwmStart { pin, frequency_hz });
        log.duties.insert(pin, 0.0);
        Ok(Box::new(SimPwmChannel {
            pin,
            log: self.log.clone(),
        }))
    }

    fn cleanup(&mut self) {
        debug!("sim gpio global cleanup");
        let mut log = lock_log(&self.log);
        log.events.push(PinEvent::Cleanup);
        log.cleanup_count += 1;
    }
}

/// PWM channel handed out by [`SimGpio`]; records into the same [`PinLog`].
pub struct SimPwmChannel {
    pin: u8,
    log: Arc<Mutex<PinLog>>,
}

impl PwmChannel for SimPwmChannel {
    fn set_duty(&mut self, percent: f32) -> Result<(), RigError> {
        let mut log = lock_log(&self.log);
        log.events.push(PinEvent::PwmDuty {
            pin: self.pin,
            percent,
        });
        log.duties.insert(self.pin, percent);
        Ok(())
    }

    fn stop(&mut self) {
        let mut log = lock_log(&self.log);
        log.events.push(PinEvent::PwmStop(self.pin));
        if !log.stopped.contains(&self.pin) {
            let pin = self.pin;
            log.stopped.push(pin);
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reachable_servo_records_channel_count() {
        let mut servo = SimServoController::reachable();
        servo.initialize(16).unwrap();
        assert_eq!(servo.initialized_channels(), Some(16));
    }

    #[test]
    fn unavailable_servo_reports_driver_unavailable() {
        let mut servo = SimServoController::unavailable("I2C bus /dev/i2c-1 not present");
        let err = servo.initialize(16).unwrap_err();
        assert!(matches!(err, RigError::DriverUnavailable { .. }));
        assert!(err.to_string().contains("/dev/i2c-1"));
        assert_eq!(servo.initialized_channels(), None);
    }

    #[test]
    fn working_camera_delivers_configured_frame() {
        let mut cam = SimCamera::working();
        cam.open(0).unwrap();
        cam.configure(&FrameFormat::default()).unwrap();
        let frame = cam.read_frame().unwrap();
        assert_eq!(frame.width, 640);
        assert_eq!(frame.height, 480);
    }

    #[test]
    fn failing_open_camera_rejects_open() {
        let mut cam = SimCamera::failing_open();
        assert!(cam.open(2).is_err());
    }

    #[test]
    fn failing_frame_camera_opens_but_delivers_nothing() {
        let mut cam = SimCamera::failing_frame();
        cam.open(0).unwrap();
        assert!(cam.read_frame().is_err());
    }

    #[test]
    fn release_witness_observes_release() {
        let mut cam = SimCamera::working();
        let witness = cam.release_witness();
        assert!(!witness.load(Ordering::SeqCst));
        cam.release();
        assert!(witness.load(Ordering::SeqCst));
    }

    #[test]
    fn sim_gpio_records_writes_and_levels() {
        let mut gpio = SimGpio::new();
        let log = gpio.log();
        gpio.set_numbering(PinNumbering::Bcm).unwrap();
        gpio.setup_output(23).unwrap();
        gpio.write(23, Level::High).unwrap();
        gpio.write(23, Level::Low).unwrap();

        let log = lock_log(&log);
        assert_eq!(log.level(23), Some(Level::Low));
        assert_eq!(
            log.events[0],
            PinEvent::SetNumbering(PinNumbering::Bcm)
        );
    }

    #[test]
    fn scripted_write_failure_hits_only_the_nth_write() {
        let mut gpio = SimGpio::new().fail_write_on(23, 2);
        gpio.write(23, Level::High).unwrap();
        assert!(gpio.write(23, Level::Low).is_err());
        // Third write succeeds again, as a cleanup path would need.
        gpio.write(23, Level::Low).unwrap();
        assert_eq!(lock_log(&gpio.log()).level(23), Some(Level::Low));
    }

    #[test]
    fn pwm_channel_tracks_duty_and_stop() {
        let mut gpio = SimGpio::new();
        let log = gpio.log();
        let mut pwm = gpio.pwm_channel(12, 1000).unwrap();
        assert_eq!(lock_log(&log).duty(12), Some(0.0));

        pwm.set_duty(60.0).unwrap();
        assert_eq!(lock_log(&log).duty(12), Some(60.0));

        pwm.stop();
        pwm.stop();
        let log = lock_log(&log);
        assert!(log.pwm_stopped(12));
        // Stop is idempotent in the stopped-channel record.
        assert_eq!(log.stopped.len(), 1);
    }

    #[test]
    fn cleanup_count_tracks_invocations() {
        let mut gpio = SimGpio::new();
        let log = gpio.log();
        assert_eq!(lock_log(&log).cleanup_count(), 0);
        gpio.cleanup();
        assert_eq!(lock_log(&log).cleanup_count(), 1);
    }
}
