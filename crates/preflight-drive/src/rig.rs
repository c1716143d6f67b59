//! [`DriveRig`] – scoped ownership of the energized motor driver.
//!
//! The rig takes the GPIO controller at construction and does not give it
//! back: whatever happens after that point, its `Drop` impl drives every
//! direction pin low, stops any active PWM channels, and invokes the
//! controller's global cleanup exactly once. Errors inside `Drop` are
//! logged and otherwise ignored so cleanup never masks the fault that is
//! already propagating.

use preflight_hal::{Gpio, Level, PinNumbering, PwmChannel};
use preflight_types::{DriveMode, DriveState, PinAssignment, RigError};
use tracing::{debug, warn};

enum EnableLines {
    /// Enable pins held high; speed fixed by the external jumper.
    Jumper,
    /// Enable pins driven by software PWM.
    Pwm {
        ena: Box<dyn PwmChannel>,
        enb: Box<dyn PwmChannel>,
    },
}

/// Owns the pin controller for the duration of one drive sequence.
pub struct DriveRig {
    gpio: Box<dyn Gpio>,
    pins: PinAssignment,
    enable: EnableLines,
    /// Set once `halt` has left the drive in the stopped configuration, so
    /// `Drop` only re-asserts the safe state after an abnormal exit.
    safed: bool,
}

impl DriveRig {
    /// Take ownership of the controller and bring the rig to `Idle`: pin
    /// numbering selected, all six pins configured as outputs, enable lines
    /// armed according to `mode`.
    ///
    /// # Errors
    ///
    /// Returns the first [`RigError`] from the controller. The rig is
    /// dropped on that path, so cleanup runs even for setup failures.
    pub fn acquire(
        gpio: Box<dyn Gpio>,
        pins: PinAssignment,
        mode: DriveMode,
        pwm_frequency_hz: u32,
    ) -> Result<Self, RigError> {
        let mut rig = Self {
            gpio,
            pins,
            enable: EnableLines::Jumper,
            safed: false,
        };

        rig.gpio.set_numbering(PinNumbering::Bcm)?;
        for pin in rig.pins.all() {
            rig.gpio.setup_output(pin)?;
        }

        match mode {
            DriveMode::FixedJumper => {
                rig.gpio.write(pins.ena, Level::High)?;
                rig.gpio.write(pins.enb, Level::High)?;
            }
            DriveMode::Pwm => {
                // Channels come up at 0% duty per the Gpio contract.
                let ena = rig.gpio.pwm_channel(pins.ena, pwm_frequency_hz)?;
                let enb = rig.gpio.pwm_channel(pins.enb, pwm_frequency_hz)?;
                rig.enable = EnableLines::Pwm { ena, enb };
            }
        }

        debug!(mode = ?mode, pins = ?pins, "drive rig armed");
        Ok(rig)
    }

    /// Drive the four direction pins to the pattern for `state`.
    ///
    /// # Errors
    ///
    /// Returns the first failed pin write; remaining pins are left as they
    /// were, which is why callers rely on the rig's drop cleanup.
    pub fn set_direction(&mut self, state: DriveState) -> Result<(), RigError> {
        let levels = direction_levels(state);
        for (pin, level) in self.pins.direction().into_iter().zip(levels) {
            self.gpio.write(pin, level)?;
        }
        Ok(())
    }

    /// Ramp both enable channels to `percent` duty. No-op in jumper mode.
    ///
    /// # Errors
    ///
    /// Returns [`RigError::HardwareFault`] if either channel rejects the
    /// duty value.
    pub fn set_duty(&mut self, percent: f32) -> Result<(), RigError> {
        if let EnableLines::Pwm { ena, enb } = &mut self.enable {
            ena.set_duty(percent)?;
            enb.set_duty(percent)?;
        }
        Ok(())
    }

    /// Bring the drive to the terminal stopped configuration: direction
    /// pins low, duty to zero, PWM channels stopped.
    ///
    /// # Errors
    ///
    /// Returns the first controller error; the drop cleanup then re-asserts
    /// the safe state.
    pub fn halt(&mut self) -> Result<(), RigError> {
        self.set_direction(DriveState::Stopped)?;
        if let EnableLines::Pwm { ena, enb } = &mut self.enable {
            ena.set_duty(0.0)?;
            enb.set_duty(0.0)?;
            ena.stop();
            enb.stop();
        }
        self.safed = true;
        Ok(())
    }
}

impl Drop for DriveRig {
    fn drop(&mut self) {
        if !self.safed {
            for pin in self.pins.direction() {
                if let Err(err) = self.gpio.write(pin, Level::Low) {
                    warn!(pin, error = %err, "cleanup could not drive direction pin low");
                }
            }
            if let EnableLines::Pwm { ena, enb } = &mut self.enable {
                if let Err(err) = ena.set_duty(0.0) {
                    warn!(error = %err, "cleanup could not zero ena duty");
                }
                if let Err(err) = enb.set_duty(0.0) {
                    warn!(error = %err, "cleanup could not zero enb duty");
                }
                ena.stop();
                enb.stop();
            }
        }
        self.gpio.cleanup();
    }
}

fn direction_levels(state: DriveState) -> [Level; 4] {
    use Level::{High, Low};
    match state {
        // Terminal pair A high/low, pair B low/high.
        DriveState::Forward => [High, Low, Low, High],
        DriveState::Reverse => [Low, High, High, Low],
        DriveState::Idle | DriveState::Stopped => [Low, Low, Low, Low],
    }
}
