//! BDD step definitions for capability selection

use std::time::Duration;

use cucumber::{given, then, when};

use dashboard::{
    create_dark_field_api, run_calibration, CalibrationState, Config, DarkFieldRequest,
};

use crate::world::DashboardWorld;

#[given(expr = "the runtime environment is {string}")]
fn runtime_environment(world: &mut DashboardWorld, environment: String) {
    world.environment = Some(environment.parse().expect("valid environment"));
}

#[when("I create the dark-field capability")]
fn create_capability(world: &mut DashboardWorld) {
    let environment = world.environment.expect("environment not set");
    world.api = Some(create_dark_field_api(environment, &Config::default()));
}

#[when(expr = "I run a calibration of {int} exposures with {int} frames each")]
async fn run_sequence(world: &mut DashboardWorld, steps: u32, frames: u32) {
    let api = world.api.as_ref().expect("capability not created");
    let request = DarkFieldRequest {
        exposure_steps: steps,
        frames_per_exposure: frames,
        ..DarkFieldRequest::default()
    };
    match run_calibration(api.as_ref(), &request, Duration::ZERO).await {
        Ok(progress) => world.last_progress = Some(progress),
        Err(e) => world.last_error = Some(e.to_string()),
    }
}

#[when("I stop the calibration")]
async fn stop_calibration(world: &mut DashboardWorld) {
    let api = world.api.as_ref().expect("capability not created");
    match api.stop().await {
        Ok(progress) => world.last_progress = Some(progress),
        Err(e) => world.last_error = Some(e.to_string()),
    }
}

#[then(expr = "the capability variant is {string}")]
fn capability_variant(world: &mut DashboardWorld, variant: String) {
    let api = world.api.as_ref().expect("capability not created");
    assert_eq!(api.variant().to_string(), variant);
}

#[then(expr = "the calibration state is {string}")]
fn calibration_state(world: &mut DashboardWorld, state: String) {
    let expected: CalibrationState =
        serde_json::from_str(&format!("\"{}\"", state)).expect("valid state name");
    let progress = world.last_progress.as_ref().expect("no progress recorded");
    assert_eq!(progress.state, expected);
}

#[then(expr = "the dark library holds {int} entries")]
async fn library_size(world: &mut DashboardWorld, entries: usize) {
    let api = world.api.as_ref().expect("capability not created");
    let status = api.status().await.expect("status should succeed");
    assert_eq!(status.library.len(), entries);
}

#[then(expr = "the error is {string}")]
fn error_is(world: &mut DashboardWorld, message: String) {
    assert_eq!(world.last_error.as_deref(), Some(message.as_str()));
}
