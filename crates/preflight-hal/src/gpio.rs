//! Generic `Gpio` and `PwmChannel` traits for the pin controller the
//! actuator sequencer drives.
//!
//! The sequencer owns the controller exclusively for the duration of one
//! run. [`Gpio::cleanup`] is the controller's global reset; the sequencer
//! guarantees it is invoked exactly once per run, on every exit path.

use preflight_types::RigError;

/// Digital output level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

/// Pin numbering scheme selected before any pin is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinNumbering {
    /// Broadcom channel numbers.
    Bcm,
    /// Physical header positions.
    Board,
}

/// A software PWM channel bound to one enable pin.
///
/// Channels start at 0% duty; [`stop`][PwmChannel::stop] is idempotent and
/// must be safe to call during cleanup regardless of the channel's state.
pub trait PwmChannel: Send + Sync {
    /// Set the duty cycle as a percentage in `0.0..=100.0`.
    ///
    /// # Errors
    ///
    /// Returns [`RigError::HardwareFault`] if the channel rejects the value.
    fn set_duty(&mut self, percent: f32) -> Result<(), RigError>;

    /// Stop the channel, leaving its pin de-energized.
    fn stop(&mut self);
}

/// The GPIO pin controller.
pub trait Gpio: Send + Sync {
    /// Select the pin numbering scheme. Called once, before any pin setup.
    ///
    /// # Errors
    ///
    /// Returns [`RigError::HardwareFault`] if the controller rejects the
    /// scheme (e.g. a scheme was already fixed by another consumer).
    fn set_numbering(&mut self, scheme: PinNumbering) -> Result<(), RigError>;

    /// Configure `pin` as a digital output.
    ///
    /// # Errors
    ///
    /// Returns [`RigError::HardwareFault`] if the pin cannot be claimed.
    fn setup_output(&mut self, pin: u8) -> Result<(), RigError>;

    /// Drive an output pin to `level`.
    ///
    /// # Errors
    ///
    /// Returns [`RigError::HardwareFault`] if the write does not take
    /// effect.
    fn write(&mut self, pin: u8, level: Level) -> Result<(), RigError>;

    /// Create a software PWM channel on `pin` at `frequency_hz`, started at
    /// 0% duty.
    ///
    /// # Errors
    ///
    /// Returns [`RigError::HardwareFault`] if the pin cannot host a PWM
    /// channel.
    fn pwm_channel(&mut self, pin: u8, frequency_hz: u32) -> Result<Box<dyn PwmChannel>, RigError>;

    /// Global cleanup: reset every pin this controller touched back to its
    /// safe default. Infallible by contract; drivers log internal errors.
    fn cleanup(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockPwm {
        duty: f32,
        stopped: bool,
    }

    impl PwmChannel for MockPwm {
        fn set_duty(&mut self, percent: f32) -> Result<(), RigError> {
            self.duty = percent;
            Ok(())
        }

        fn stop(&mut self) {
            self.stopped = true;
        }
    }

    struct MockGpio {
        outputs: Vec<u8>,
        cleaned: bool,
    }

    impl Gpio for MockGpio {
        fn set_numbering(&mut self, _scheme: PinNumbering) -> Result<(), RigError> {
            Ok(())
        }

        fn setup_output(&mut self, pin: u8) -> Result<(), RigError> {
            self.outputs.push(pin);
            Ok(())
        }

        fn write(&mut self, _pin: u8, _level: Level) -> Result<(), RigError> {
            Ok(())
        }

        fn pwm_channel(
            &mut self,
            _pin: u8,
            _frequency_hz: u32,
        ) -> Result<Box<dyn PwmChannel>, RigError> {
            Ok(Box::new(MockPwm {
                duty: 0.0,
                stopped: false,
            }))
        }

        fn cleanup(&mut self) {
            self.cleaned = true;
        }
    }

    #[test]
    fn mock_gpio_setup_and_cleanup() {
        let mut gpio = MockGpio {
            outputs: Vec::new(),
            cleaned: false,
        };
        gpio.set_numbering(PinNumbering::Bcm).unwrap();
        gpio.setup_output(12).unwrap();
        gpio.write(12, Level::High).unwrap();

        let mut pwm = gpio.pwm_channel(12, 1000).unwrap();
        pwm.set_duty(60.0).unwrap();
        pwm.stop();

        gpio.cleanup();
        assert_eq!(gpio.outputs, vec![12]);
        assert!(gpio.cleaned);
    }
}
