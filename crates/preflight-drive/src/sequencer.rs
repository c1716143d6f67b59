//! [`Sequencer`] – the timed forward/reverse/stop state machine.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use preflight_hal::Gpio;
use preflight_types::{DriveMode, DriveState, PinAssignment, RigError};
use tracing::info;

use crate::rig::DriveRig;

/// Timing and drive constants for one sequence run.
///
/// Defaults are the reference behaviour: 2 s dwell per state, 60%
/// demonstration duty, 1 kHz software PWM.
#[derive(Debug, Clone)]
pub struct SequenceTiming {
    /// How long each of `Forward` and `Reverse` is held.
    pub dwell: Duration,
    /// Demonstration duty cycle applied while driving (PWM mode only).
    pub duty_percent: f32,
    /// Software PWM frequency for the enable channels.
    pub pwm_frequency_hz: u32,
}

impl Default for SequenceTiming {
    fn default() -> Self {
        Self {
            dwell: Duration::from_secs(2),
            duty_percent: 60.0,
            pwm_frequency_hz: 1000,
        }
    }
}

/// Walks a [`DriveRig`] through `Idle → Forward → Reverse → Stopped`.
///
/// The sequence is strictly single-threaded; the dwell is a plain blocking
/// wait, sliced so an operator interrupt flag is observed promptly. On any
/// error — including an interrupt — the rig unwinds through its drop
/// cleanup before the error reaches the caller.
pub struct Sequencer {
    pins: PinAssignment,
    mode: DriveMode,
    timing: SequenceTiming,
    interrupt: Option<Arc<AtomicBool>>,
}

impl Sequencer {
    pub fn new(pins: PinAssignment, mode: DriveMode) -> Self {
        Self {
            pins,
            mode,
            timing: SequenceTiming::default(),
            interrupt: None,
        }
    }

    /// Override the default timing constants.
    pub fn with_timing(mut self, timing: SequenceTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Wire an operator interrupt flag into the dwell waits.
    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = Some(flag);
        self
    }

    /// Run the full sequence against `gpio`.
    ///
    /// The controller must already be acquired by the caller; if it cannot
    /// be acquired at all, the run fails fast before anything is energized
    /// and no cleanup is owed.
    ///
    /// # Errors
    ///
    /// Propagates the first [`RigError`] from the controller, or
    /// [`RigError::Interrupted`] when the operator flag was raised during a
    /// dwell. In every error case the pins are back in the stopped
    /// configuration and the controller's global cleanup has run before the
    /// error is returned.
    pub fn execute(&self, gpio: Box<dyn Gpio>) -> Result<(), RigError> {
        let mut rig = DriveRig::acquire(gpio, self.pins, self.mode, self.timing.pwm_frequency_hz)?;
        info!(state = ?DriveState::Idle, "drive rig armed");

        info!(state = ?DriveState::Forward, dwell_ms = self.timing.dwell.as_millis() as u64, "entering drive state");
        rig.set_direction(DriveState::Forward)?;
        rig.set_duty(self.timing.duty_percent)?;
        self.dwell()?;

        // Duty stays at the demonstration value across the inversion.
        info!(state = ?DriveState::Reverse, dwell_ms = self.timing.dwell.as_millis() as u64, "entering drive state");
        rig.set_direction(DriveState::Reverse)?;
        self.dwell()?;

        info!(state = ?DriveState::Stopped, "stopping drive");
        rig.halt()?;
        Ok(())
    }

    fn dwell(&self) -> Result<(), RigError> {
        const SLICE: Duration = Duration::from_millis(50);
        let deadline = Instant::now() + self.timing.dwell;
        loop {
            if let Some(flag) = &self.interrupt
                && flag.load(Ordering::SeqCst)
            {
                return Err(RigError::Interrupted);
            }
            let now = Instant::now();
            if now >= deadline {
                return Ok(());
            }
            thread::sleep(SLICE.min(deadline - now));
        }
    }
}
