//! `preflight-drive` – the manual-actuation sequencer for a dual-motor
//! L298N driver.
//!
//! Walks the drive through `Idle → Forward → Reverse → Stopped` with timed
//! dwell periods, and guarantees the pins are returned to the safe stopped
//! configuration on every exit path: normal completion, a mid-sequence
//! fault, or an operator interrupt observed during a dwell.
//!
//! # Modules
//!
//! - [`rig`] – [`DriveRig`][rig::DriveRig]: owns the GPIO controller and
//!   any PWM channels for the duration of one run; its `Drop` impl is the
//!   guaranteed-cleanup discipline (direction pins low, channels stopped,
//!   global cleanup exactly once).
//! - [`sequencer`] – [`Sequencer`][sequencer::Sequencer]: the timed state
//!   machine, with an interruptible dwell wired to an operator flag.

pub mod rig;
pub mod sequencer;

pub use rig::DriveRig;
pub use sequencer::{SequenceTiming, Sequencer};
