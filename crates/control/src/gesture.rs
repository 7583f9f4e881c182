//! Gesture classification — encoder edges and button timing become events.
//!
//! Rotation uses single-edge quadrature decoding: one accepted falling edge
//! on phase A per detent, direction read from phase B's instantaneous level.
//! The button distinguishes short and long presses with a per-press
//! handled flag so a hold emits exactly one long press, never a repeat.

use embassy_time::Instant;

use crate::config::{
    BUTTON_DEBOUNCE_WINDOW, ENCODER_DEBOUNCE_WINDOW, LONG_PRESS_THRESHOLD,
};
use crate::debounce::{DebouncedLine, Edge};

/// One classified input gesture. Produced here, consumed once by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gesture {
    /// One encoder detent; positive = clockwise.
    VolumeStep(i8),
    /// Button tapped.
    ShortPress,
    /// Button held past the long-press threshold.
    LongPress,
}

/// Raw input levels sampled once per loop iteration.
///
/// `button_pressed` is the logical state — polarity mapping (active-low
/// switches) happens at the board layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputSample {
    /// Encoder phase A level.
    pub phase_a: bool,
    /// Encoder phase B level.
    pub phase_b: bool,
    /// Button currently pressed.
    pub button_pressed: bool,
}

#[derive(Debug)]
struct Press {
    started: Instant,
    handled: bool,
}

/// Turns debounced line activity into [`Gesture`]s.
#[derive(Debug)]
pub struct GestureDecoder {
    phase_a: DebouncedLine,
    button: DebouncedLine,
    press: Option<Press>,
}

impl GestureDecoder {
    /// Create a decoder baselined at the given levels.
    pub fn new(sample: InputSample) -> Self {
        Self {
            phase_a: DebouncedLine::new(sample.phase_a, ENCODER_DEBOUNCE_WINDOW),
            button: DebouncedLine::new(sample.button_pressed, BUTTON_DEBOUNCE_WINDOW),
            press: None,
        }
    }

    /// Classify encoder movement from this iteration's phase levels.
    ///
    /// Only falling edges of phase A count (one per detent). Phase B's level
    /// at that moment gives the direction: differing from A's new (low)
    /// level means clockwise.
    pub fn poll_rotation(&mut self, phase_a: bool, phase_b: bool, now: Instant) -> Option<Gesture> {
        match self.phase_a.update(phase_a, now) {
            Some(Edge::Falling) => Some(if phase_b {
                Gesture::VolumeStep(1)
            } else {
                Gesture::VolumeStep(-1)
            }),
            _ => None,
        }
    }

    /// Classify button activity from this iteration's level.
    pub fn poll_button(&mut self, pressed: bool, now: Instant) -> Option<Gesture> {
        match self.button.update(pressed, now) {
            Some(Edge::Rising) => {
                self.press = Some(Press {
                    started: now,
                    handled: false,
                });
                None
            }
            Some(Edge::Falling) => match self.press.take() {
                Some(p)
                    if !p.handled
                        && now.duration_since(p.started) >= BUTTON_DEBOUNCE_WINDOW =>
                {
                    Some(Gesture::ShortPress)
                }
                _ => None,
            },
            None => {
                // The long press fires while still held, exactly once per
                // press. A pending (unconfirmed) release holds it off so a
                // release racing the threshold stays a short press.
                if let Some(p) = self.press.as_mut() {
                    if !p.handled
                        && self.button.level()
                        && self.button.is_settled()
                        && now.duration_since(p.started) >= LONG_PRESS_THRESHOLD
                    {
                        p.handled = true;
                        return Some(Gesture::LongPress);
                    }
                }
                None
            }
        }
    }

    /// Re-baseline both lines to the given sample and forget any press in
    /// flight. Called on wake-from-sleep.
    pub fn rearm(&mut self, sample: InputSample) {
        self.phase_a.rearm(sample.phase_a);
        self.button.rearm(sample.button_pressed);
        self.press = None;
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::arithmetic_side_effects
)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Instant {
        Instant::from_millis(v)
    }

    fn decoder_at_rest() -> GestureDecoder {
        GestureDecoder::new(InputSample {
            phase_a: true,
            phase_b: true,
            button_pressed: false,
        })
    }

    /// Drive the button level over `from..to` at 1 ms steps, collecting
    /// whatever gestures come out.
    fn run_button(
        dec: &mut GestureDecoder,
        pressed: bool,
        from: u64,
        to: u64,
        out: &mut Vec<Gesture>,
    ) {
        for t in from..to {
            if let Some(g) = dec.poll_button(pressed, ms(t)) {
                out.push(g);
            }
        }
    }

    // ── Rotation ─────────────────────────────────────────────────────────────

    #[test]
    fn falling_edge_with_b_high_is_clockwise() {
        let mut dec = decoder_at_rest();
        // A falls while B stays high → +1
        for t in 0..5 {
            assert_eq!(dec.poll_rotation(false, true, ms(t)), None);
        }
        assert_eq!(
            dec.poll_rotation(false, true, ms(5)),
            Some(Gesture::VolumeStep(1))
        );
    }

    #[test]
    fn falling_edge_with_b_low_is_counter_clockwise() {
        let mut dec = decoder_at_rest();
        for t in 0..5 {
            assert_eq!(dec.poll_rotation(false, false, ms(t)), None);
        }
        assert_eq!(
            dec.poll_rotation(false, false, ms(5)),
            Some(Gesture::VolumeStep(-1))
        );
    }

    #[test]
    fn rising_edge_emits_nothing() {
        let mut dec = GestureDecoder::new(InputSample {
            phase_a: false,
            phase_b: true,
            button_pressed: false,
        });
        for t in 0..20 {
            assert_eq!(dec.poll_rotation(true, true, ms(t)), None);
        }
    }

    // ── Button ───────────────────────────────────────────────────────────────

    #[test]
    fn tap_emits_one_short_press() {
        let mut dec = decoder_at_rest();
        let mut out = Vec::new();
        run_button(&mut dec, true, 0, 150, &mut out); // held 150 ms
        run_button(&mut dec, false, 150, 300, &mut out);
        assert_eq!(out, [Gesture::ShortPress]);
    }

    #[test]
    fn hold_emits_exactly_one_long_press() {
        let mut dec = decoder_at_rest();
        let mut out = Vec::new();
        run_button(&mut dec, true, 0, 2000, &mut out); // held 2 s
        run_button(&mut dec, false, 2000, 2200, &mut out);
        assert_eq!(out, [Gesture::LongPress]);
    }

    #[test]
    fn sub_debounce_tap_emits_nothing() {
        let mut dec = decoder_at_rest();
        let mut out = Vec::new();
        run_button(&mut dec, true, 0, 30, &mut out); // 30 ms < 50 ms window
        run_button(&mut dec, false, 30, 300, &mut out);
        assert!(out.is_empty(), "unexpected gestures: {out:?}");
    }

    #[test]
    fn release_just_before_threshold_is_a_short_press() {
        let mut dec = decoder_at_rest();
        let mut out = Vec::new();
        // Press confirms ~50 ms in; raw release at 530 ms is 480 ms of
        // confirmed hold — under the 500 ms threshold.
        run_button(&mut dec, true, 0, 530, &mut out);
        run_button(&mut dec, false, 530, 700, &mut out);
        assert_eq!(out, [Gesture::ShortPress]);
    }

    #[test]
    fn two_taps_emit_two_short_presses() {
        let mut dec = decoder_at_rest();
        let mut out = Vec::new();
        run_button(&mut dec, true, 0, 150, &mut out);
        run_button(&mut dec, false, 150, 400, &mut out);
        run_button(&mut dec, true, 400, 550, &mut out);
        run_button(&mut dec, false, 550, 800, &mut out);
        assert_eq!(out, [Gesture::ShortPress, Gesture::ShortPress]);
    }

    #[test]
    fn rearm_forgets_a_press_in_flight() {
        let mut dec = decoder_at_rest();
        let mut out = Vec::new();
        run_button(&mut dec, true, 0, 100, &mut out);
        dec.rearm(InputSample {
            phase_a: true,
            phase_b: true,
            button_pressed: true,
        });
        // Release after rearm: no press record, so no gesture.
        run_button(&mut dec, false, 100, 300, &mut out);
        assert!(out.is_empty(), "unexpected gestures: {out:?}");
    }
}
