//! Shared fixtures for the integration tests.

use std::path::{Path, PathBuf};

use adventure_core::{Game, load_world_from_str};

pub fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("test-data")
        .join("house.toml")
}

#[allow(dead_code)]
pub fn fixture_text() -> String {
    std::fs::read_to_string(fixture_path()).expect("read fixture")
}

/// A fresh game on the house fixture, with test logging on.
#[allow(dead_code)]
pub fn house() -> Game {
    let _ = env_logger::builder().is_test(true).try_init();
    let (world, report) = load_world_from_str(&fixture_text()).expect("fixture loads");
    assert!(report.is_clean(), "skipped: {:?}", report.skipped);
    Game::new(world)
}

/// Run a list of commands, asserting each one succeeds.
#[allow(dead_code)]
pub fn run_ok(game: &mut Game, inputs: &[&str]) {
    for input in inputs {
        let r = game.step(input);
        assert!(r.success, "{input:?} failed: {}", r.message);
    }
}
