//! Property-based tests for the input path and volume laws.
//!
//! The "for all edge trains" guarantees get real quantification here
//! instead of hand-picked examples.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::arithmetic_side_effects
)]

use control::config::{BUTTON_DEBOUNCE_WINDOW, ENCODER_DEBOUNCE_WINDOW};
use control::{DebouncedLine, Edge, Gesture, GestureDecoder, InputSample};
use embassy_time::Instant;
use platform::Volume;
use proptest::prelude::*;

fn ms(v: u64) -> Instant {
    Instant::from_millis(v)
}

const REST: InputSample = InputSample {
    phase_a: true,
    phase_b: true,
    button_pressed: false,
};

proptest! {
    /// Every emitted VolumeStep corresponds to exactly one accepted falling
    /// edge of phase A — no edge inside the debounce window produces a
    /// second event.
    #[test]
    fn volume_steps_equal_accepted_falling_edges(
        train in prop::collection::vec((1u64..20, any::<bool>(), any::<bool>()), 0..300)
    ) {
        let mut decoder = GestureDecoder::new(REST);
        let mut shadow = DebouncedLine::new(true, ENCODER_DEBOUNCE_WINDOW);
        let mut t = 0u64;
        let mut steps = 0usize;
        let mut falling = 0usize;
        for (dt, a, b) in train {
            t += dt;
            if matches!(decoder.poll_rotation(a, b, ms(t)), Some(Gesture::VolumeStep(_))) {
                steps += 1;
            }
            if shadow.update(a, ms(t)) == Some(Edge::Falling) {
                falling += 1;
            }
        }
        prop_assert_eq!(steps, falling);
    }

    /// Accepted edges on one line are never closer than the debounce window.
    #[test]
    fn accepted_edges_respect_the_window(
        train in prop::collection::vec((1u64..30, any::<bool>()), 0..300)
    ) {
        let mut line = DebouncedLine::new(false, BUTTON_DEBOUNCE_WINDOW);
        let mut t = 0u64;
        let mut last_edge: Option<u64> = None;
        for (dt, level) in train {
            t += dt;
            if line.update(level, ms(t)).is_some() {
                if let Some(prev) = last_edge {
                    prop_assert!(
                        t - prev >= BUTTON_DEBOUNCE_WINDOW.as_millis(),
                        "edges {prev} and {t} are closer than the window"
                    );
                }
                last_edge = Some(t);
            }
        }
    }

    /// A hold of any length past the threshold emits exactly one LongPress
    /// and no ShortPress for that press cycle.
    #[test]
    fn any_long_hold_emits_one_long_press(
        hold_ms in 600u64..5000,
        poll_ms in 1u64..10,
    ) {
        let mut decoder = GestureDecoder::new(REST);
        let mut gestures = Vec::new();
        let mut t = 0;
        while t < hold_ms {
            if let Some(g) = decoder.poll_button(true, ms(t)) {
                gestures.push(g);
            }
            t += poll_ms;
        }
        let release_until = hold_ms + 300;
        while t < release_until {
            if let Some(g) = decoder.poll_button(false, ms(t)) {
                gestures.push(g);
            }
            t += poll_ms;
        }
        prop_assert_eq!(gestures, vec![Gesture::LongPress]);
    }

    /// Volume stepping is idempotently clamped: an up-down round trip from
    /// any non-boundary start returns to the start.
    #[test]
    fn volume_round_trip_is_identity_off_boundary(
        start in 3u8..19,
        delta in 1i8..3,
    ) {
        let v = Volume::new(start);
        prop_assert_eq!(v.stepped(delta).stepped(-delta), v);
    }

    /// No step sequence can push the volume off its scale.
    #[test]
    fn volume_never_escapes_bounds(
        start in 0u8..22,
        deltas in prop::collection::vec(-3i8..4, 0..100)
    ) {
        let mut v = Volume::new(start);
        for d in deltas {
            v = v.stepped(d);
            prop_assert!(v.get() <= Volume::MAX_RAW);
        }
    }
}

/// Boundary case of the round-trip law: from the floor, a further decrease
/// stays at the floor (and is reported unchanged so callers can suppress
/// the flash overlay).
#[test]
fn volume_floor_absorbs_further_decrease() {
    let v = Volume::MIN;
    assert_eq!(v.stepped(-1), v);
}
