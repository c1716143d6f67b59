//! `preflight-diag` – the diagnostic runner and its policy engine.
//!
//! A run executes an ordered set of named hardware checks, classifies each
//! outcome against the required/optional policy, and aggregates the results
//! into a [`RunReport`][preflight_types::RunReport] whose exit code is the
//! contract deployment automation consumes.
//!
//! # Modules
//!
//! - [`check`] – the [`Check`][check::Check] capability each probed device
//!   exposes. A check never raises; collaborator failures become failed
//!   [`CheckOutcome`][preflight_types::CheckOutcome]s at the boundary.
//! - [`servo`] – [`ServoControllerCheck`][servo::ServoControllerCheck]:
//!   attempts to initialize the 16-channel servo driver board.
//! - [`camera`] – [`CameraCheck`][camera::CameraCheck]: opens the capture
//!   device, applies the diagnostic format, settles, and reads one frame.
//! - [`runner`] – [`DiagnosticRunner`][runner::DiagnosticRunner]: executes
//!   the checks in order and applies the classification rule.

pub mod camera;
pub mod check;
pub mod runner;
pub mod servo;

pub use camera::CameraCheck;
pub use check::Check;
pub use runner::{DiagnosticRunner, Policy};
pub use servo::{SERVO_CHANNELS, ServoControllerCheck};
