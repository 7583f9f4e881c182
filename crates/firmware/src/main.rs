//! Emberbox simulator — runs the control loop against the desktop board
//! with a scripted user session: wake, volume turns, a long-press skip, a
//! pause into sleep, and a wake-up resume.

#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![allow(missing_docs)]

use embassy_time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

use control::{Catalog, Controller};
use firmware::sim::{state_name, SimBoard, SimEngine, SimStorage};
use platform::Storage;

/// How long each simulated track "plays".
const SIM_TRACK_LENGTH: Duration = Duration::from_secs(8);

/// Total scripted session length.
const SESSION_MS: u64 = 12_000;

#[derive(Debug, Clone, Copy)]
enum Line {
    PhaseA,
    Button,
}

#[derive(Debug, Clone, Copy)]
struct ScriptEvent {
    at_ms: u64,
    line: Line,
    level: bool,
}

const fn ev(at_ms: u64, line: Line, level: bool) -> ScriptEvent {
    ScriptEvent { at_ms, line, level }
}

/// A demo session exercising every gesture.
fn demo_script() -> Vec<ScriptEvent> {
    let mut script = vec![
        // Wake from the boot sleep and play the first track.
        ev(500, Line::Button, true),
        ev(650, Line::Button, false),
        // Long press: skip to the next track.
        ev(4000, Line::Button, true),
        ev(4800, Line::Button, false),
        // Short press: pause, box goes to sleep.
        ev(7000, Line::Button, true),
        ev(7150, Line::Button, false),
        // Wake again: resume.
        ev(9500, Line::Button, true),
        ev(9650, Line::Button, false),
    ];
    // Three clockwise detents on the volume knob (phase A dips, B rests high).
    for i in 0..3u64 {
        let t = 2000 + i * 150;
        script.push(ev(t, Line::PhaseA, false));
        script.push(ev(t + 40, Line::PhaseA, true));
    }
    script.sort_by_key(|e| e.at_ms);
    script
}

fn apply(board: &mut SimBoard, event: ScriptEvent) {
    match event.line {
        Line::PhaseA => board.phase_a.set_level(event.level),
        Line::Button => board.button.set_level(event.level),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let media_root = std::env::args().nth(1).unwrap_or_else(|| "media".into());
    info!(
        app = platform::config::APP_NAME,
        version = platform::config::APP_VERSION,
        media_root = media_root.as_str(),
        "simulator starting"
    );

    let mut board = SimBoard::new();
    let engine = SimEngine::new(media_root.as_str(), SIM_TRACK_LENGTH);
    let mut storage = SimStorage::new(media_root.as_str());

    // Medium contents, for the log only — control decisions never read this.
    let mut entries = Vec::new();
    storage.list_root(&mut |name| entries.push(name.to_owned()));
    let listing = entries.join(", ");
    info!(medium = %listing, "medium contents");

    let start = Instant::now();
    let mut controller = Controller::new(
        engine,
        storage,
        Catalog::builtin(),
        board.sample(),
        start,
    );

    let script = demo_script();
    let mut next_event = 0usize;
    let mut last_state = controller.state();
    let mut was_asleep = controller.is_asleep();

    loop {
        let now = Instant::now();
        let elapsed_ms = now.duration_since(start).as_millis();

        while let Some(event) = script.get(next_event) {
            if event.at_ms > elapsed_ms {
                break;
            }
            apply(&mut board, *event);
            next_event = next_event.saturating_add(1);
        }

        let frame = controller.step(board.sample(), now);
        board.write_led(frame);

        if controller.state() != last_state {
            last_state = controller.state();
            info!(
                state = state_name(last_state),
                track = controller.current_track().index(),
                volume = controller.volume().get(),
                "state change"
            );
        }
        if controller.is_asleep() != was_asleep {
            was_asleep = controller.is_asleep();
            info!(asleep = was_asleep, "sleep flag");
        }

        if elapsed_ms > SESSION_MS {
            break;
        }
        std::thread::sleep(std::time::Duration::from_micros(
            controller.poll_interval().as_micros(),
        ));
    }

    info!(
        state = state_name(controller.state()),
        track = controller.current_track().index(),
        volume = controller.volume().get(),
        "session finished"
    );
}
