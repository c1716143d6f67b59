//! `preflight-cli` – entry points for the validation harness.
//!
//! Two independent binaries share this small library:
//!
//! - `preflight-hwtest` – the diagnostic runner. Exit code `0` when every
//!   check passed or only optional hardware was missing, `1` when a
//!   required check failed. Deployment automation depends only on that
//!   integer, never on log text.
//! - `preflight-drivetest` – the manual actuation sequencer. Drives the
//!   dual-motor rig forward, reverse, and to a stop, de-energizing the
//!   outputs on every exit path including Ctrl-C.
//!
//! # Modules
//!
//! - [`config`] – environment parsing (pure functions over raw values, so
//!   the policy is testable without mutating process state) and the
//!   optional TOML drive configuration.
//! - [`logging`] – tracing-subscriber initialisation shared by both
//!   binaries.
//! - [`render`] – colored human-readable report rendering. The binaries'
//!   user-facing output uses `println!`; `tracing` carries the structured
//!   log stream.

pub mod config;
pub mod logging;
pub mod render;
