//! `preflight-hwtest` – hardware-oriented sanity checks.
//!
//! Probes the servo controller and the camera, classifies each outcome
//! under the `REQUIRE_HARDWARE` policy, and exits `0` when the platform is
//! deployable (all checks OK, or optional hardware missing) or `1` when a
//! required check failed.

use preflight_cli::{config, logging, render};
use preflight_diag::{CameraCheck, DiagnosticRunner, Policy, ServoControllerCheck};
use preflight_hal::sim::{SimCamera, SimServoController};
use tracing::warn;

fn main() {
    logging::init();

    // The environment is read exactly once; everything downstream takes
    // explicit parameters.
    let require_hardware =
        config::parse_bool_flag(std::env::var("REQUIRE_HARDWARE").ok().as_deref());
    let camera_index = config::parse_camera_index(std::env::var("CAMERA_INDEX").ok().as_deref());
    let emit_json =
        config::parse_bool_flag(std::env::var("PREFLIGHT_REPORT_JSON").ok().as_deref());

    // Headless stub drivers ship by default; hardware deployments register
    // their real drivers behind the same traits.
    let mut runner = DiagnosticRunner::new(Policy { require_hardware })
        .with_check(Box::new(ServoControllerCheck::new(Box::new(
            SimServoController::reachable(),
        ))))
        .with_check(Box::new(CameraCheck::new(
            Box::new(SimCamera::working()),
            camera_index,
        )));

    let report = runner.run();
    render::print_report(&report);

    if emit_json {
        match serde_json::to_string(&report) {
            Ok(json) => println!("{json}"),
            Err(err) => warn!(error = %err, "could not serialize run report"),
        }
    }

    std::process::exit(report.summary.exit_code());
}
