//! End-to-end simulator tests: control core + host-backed collaborators.
//!
//! Run with: cargo test -p firmware --test simulator

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::arithmetic_side_effects
)]

use std::fs;

use embassy_time::{Duration, Instant};
use tempfile::TempDir;

use control::{Catalog, Controller, InputSample, PlayerState, TrackId};
use firmware::sim::{SimEngine, SimStorage};
use platform::{AudioEngine, Storage};

const REST: InputSample = InputSample {
    phase_a: true,
    phase_b: true,
    button_pressed: false,
};

/// Create a media root holding the given catalog track files.
fn media_with_tracks(indices: &[usize]) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("music")).unwrap();
    for i in indices {
        let name = format!("music/{:02}.mp3", i + 1);
        fs::write(dir.path().join(name), b"not really audio").unwrap();
    }
    dir
}

fn controller_over(
    dir: &TempDir,
    track_length: Duration,
) -> Controller<SimEngine, SimStorage> {
    Controller::new(
        SimEngine::new(dir.path(), track_length),
        SimStorage::new(dir.path()),
        Catalog::builtin(),
        REST,
        Instant::now(),
    )
}

/// Drive the controller with a synthetic press/release on real timestamps.
fn press_button(controller: &mut Controller<SimEngine, SimStorage>) {
    let mut sample = REST;
    sample.button_pressed = true;
    let start = Instant::now();
    while Instant::now().duration_since(start) < Duration::from_millis(150) {
        controller.step(sample, Instant::now());
        std::thread::sleep(std::time::Duration::from_millis(2));
    }
    sample.button_pressed = false;
    let release = Instant::now();
    while Instant::now().duration_since(release) < Duration::from_millis(120) {
        controller.step(sample, Instant::now());
        std::thread::sleep(std::time::Duration::from_millis(2));
    }
}

fn run_idle(controller: &mut Controller<SimEngine, SimStorage>, for_ms: u64) {
    let start = Instant::now();
    while Instant::now().duration_since(start) < Duration::from_millis(for_ms) {
        controller.step(REST, Instant::now());
        std::thread::sleep(std::time::Duration::from_millis(2));
    }
}

// ── Storage over the host filesystem ─────────────────────────────────────────

#[test]
fn storage_sees_only_real_files() {
    let dir = media_with_tracks(&[0, 4]);
    let mut storage = SimStorage::new(dir.path());
    assert!(storage.ready());
    assert_eq!(storage.exists("/music/01.mp3").unwrap(), true);
    assert_eq!(storage.exists("/music/02.mp3").unwrap(), false);
    assert_eq!(storage.exists("/music/05.mp3").unwrap(), true);
}

#[test]
fn storage_missing_root_is_not_ready() {
    let dir = TempDir::new().unwrap();
    let mut storage = SimStorage::new(dir.path().join("nope"));
    assert!(!storage.ready());
}

#[test]
fn storage_lists_root_entries() {
    let dir = media_with_tracks(&[0]);
    let mut storage = SimStorage::new(dir.path());
    let mut seen = Vec::new();
    storage.list_root(&mut |name| seen.push(name.to_owned()));
    assert_eq!(seen, ["music"]);
}

// ── Engine against the host filesystem ───────────────────────────────────────

#[test]
fn engine_refuses_missing_files() {
    let dir = media_with_tracks(&[0]);
    let mut engine = SimEngine::new(dir.path(), Duration::from_secs(1));
    assert!(engine.connect("/music/01.mp3").is_ok());
    assert!(engine.connect("/music/02.mp3").is_err());
}

#[test]
fn engine_ends_track_after_its_length() {
    let dir = media_with_tracks(&[0]);
    let mut engine = SimEngine::new(dir.path(), Duration::from_millis(30));
    engine.connect("/music/01.mp3").unwrap();
    let deadline = Instant::now() + Duration::from_millis(500);
    let mut ended = false;
    while Instant::now() < deadline {
        engine.service_step();
        if engine.poll_notification() == Some(platform::Notification::TrackEnded) {
            ended = true;
            break;
        }
        std::thread::sleep(std::time::Duration::from_millis(5));
    }
    assert!(ended, "track should end after ~30 ms of streaming");
}

// ── Full loop ────────────────────────────────────────────────────────────────

#[test]
fn wake_press_plays_the_first_present_track() {
    let dir = media_with_tracks(&[0, 1, 2]);
    let mut controller = controller_over(&dir, Duration::from_secs(5));
    assert!(controller.is_asleep());
    press_button(&mut controller);
    assert_eq!(controller.state(), PlayerState::Playing);
    assert_eq!(controller.engine().current_path(), Some("/music/01.mp3"));
}

#[test]
fn missing_leading_tracks_fall_back() {
    let dir = media_with_tracks(&[5]); // only /music/06.mp3
    let mut controller = controller_over(&dir, Duration::from_secs(5));
    press_button(&mut controller);
    assert_eq!(controller.state(), PlayerState::Playing);
    assert_eq!(controller.current_track(), TrackId::new(5).unwrap());
}

#[test]
fn empty_media_root_lands_in_error() {
    let dir = TempDir::new().unwrap(); // ready, but no tracks at all
    let mut controller = controller_over(&dir, Duration::from_secs(5));
    press_button(&mut controller);
    assert_eq!(controller.state(), PlayerState::Error);
}

#[test]
fn track_end_rolls_into_the_next_file() {
    let dir = media_with_tracks(&[0, 1]);
    let mut controller = controller_over(&dir, Duration::from_millis(600));
    press_button(&mut controller);
    assert_eq!(controller.current_track(), TrackId::FIRST);
    // Let the 600 ms "track" finish; the loop should advance to track 2.
    run_idle(&mut controller, 2000);
    assert_eq!(controller.state(), PlayerState::Playing);
    assert_eq!(controller.current_track(), TrackId::new(1).unwrap());
}
