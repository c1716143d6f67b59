//! `preflight-drivetest` – manual forward/reverse/stop actuation test.
//!
//! Runs the timed drive sequence for an operator watching the motors.
//! Ctrl-C during a dwell interrupts the run; the outputs are de-energized
//! and the controller's global cleanup executes before the process exits.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use colored::Colorize;
use preflight_cli::{config, logging};
use preflight_drive::Sequencer;
use preflight_hal::sim::SimGpio;
use preflight_types::RigError;
use tracing::warn;

fn main() {
    logging::init();

    let path = std::env::var("PREFLIGHT_DRIVE_CONFIG")
        .unwrap_or_else(|_| "preflight-drive.toml".to_string());
    let cfg = match config::load_drive_config(Path::new(&path)) {
        Ok(Some(cfg)) => cfg,
        Ok(None) => config::DriveConfig::default(),
        Err(err) => {
            warn!(error = %err, "drive config unusable; using defaults");
            config::DriveConfig::default()
        }
    };

    let interrupt = Arc::new(AtomicBool::new(false));
    let flag = interrupt.clone();
    if let Err(err) = ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
    }) {
        warn!(error = %err, "failed to install Ctrl-C handler; interrupt will not stop the sequence gracefully");
    }

    println!(
        "{} mode={:?} dwell={}ms duty={}%",
        "L298N manual drive test starting.".bold(),
        cfg.mode,
        cfg.dwell_ms,
        cfg.duty_percent
    );

    let sequencer = Sequencer::new(cfg.pins, cfg.mode)
        .with_timing(cfg.timing())
        .with_interrupt(interrupt);

    // The stub controller stands in for the pin header in headless builds;
    // a real controller that cannot be acquired ends the run here, before
    // anything is energized.
    let gpio = Box::new(SimGpio::new());

    match sequencer.execute(gpio) {
        Ok(()) => {
            println!("{}", "Drive sequence complete; outputs de-energized.".green());
        }
        Err(RigError::Interrupted) => {
            println!(
                "{}",
                "Interrupted; outputs de-energized before exit.".yellow()
            );
            std::process::exit(1);
        }
        Err(err) => {
            eprintln!("{} {err}", "Drive sequence failed:".red().bold());
            std::process::exit(1);
        }
    }
}
