//! Power/sleep controller — idle detection and wake-on-input.
//!
//! Independent of the player state machine but coupled to it: the box
//! sleeps at startup before the first play, immediately when the user
//! pauses, and again after a stretch of Idle/Paused without input. While
//! asleep only a coarse level poll runs; the sleep flag clears on the first
//! observed level change.

use embassy_time::Instant;

use crate::config::IDLE_SLEEP_TIMEOUT;
use crate::gesture::InputSample;
use crate::player::PlayerState;

#[derive(Debug, Clone, Copy)]
struct WakeBaseline {
    phase_a: bool,
}

/// Sleep flag plus the input baseline captured at sleep entry.
#[derive(Debug)]
pub struct SleepController {
    asleep: bool,
    baseline: WakeBaseline,
    last_input: Instant,
}

impl SleepController {
    /// Create the controller; `start_asleep` is true for a healthy boot
    /// (the box waits for the first press) and false when the startup
    /// check already needs the LED to show an error.
    pub fn new(sample: InputSample, now: Instant, start_asleep: bool) -> Self {
        Self {
            asleep: start_asleep,
            baseline: WakeBaseline {
                phase_a: sample.phase_a,
            },
            last_input: now,
        }
    }

    /// Whether the box is in the low-power poll cycle.
    pub fn is_asleep(&self) -> bool {
        self.asleep
    }

    /// Record input activity (any classified gesture).
    pub fn note_activity(&mut self, now: Instant) {
        self.last_input = now;
    }

    /// Enter sleep now, capturing the wake baseline from `sample`.
    pub fn enter(&mut self, sample: InputSample) {
        self.asleep = true;
        self.baseline = WakeBaseline {
            phase_a: sample.phase_a,
        };
    }

    /// Coarse wake poll: a pressed button or a phase line that moved since
    /// sleep entry wakes the box. Clears the sleep flag on wake.
    pub fn check_wake(&mut self, sample: InputSample) -> bool {
        if !self.asleep {
            return false;
        }
        let wake = sample.button_pressed || sample.phase_a != self.baseline.phase_a;
        if wake {
            self.asleep = false;
        }
        wake
    }

    /// Re-enter sleep once Idle/Paused has gone without input long enough.
    /// Returns true when sleep was entered on this call.
    pub fn maybe_enter_idle(
        &mut self,
        state: PlayerState,
        sample: InputSample,
        now: Instant,
    ) -> bool {
        if self.asleep {
            return false;
        }
        let eligible = matches!(state, PlayerState::Idle | PlayerState::Paused);
        if eligible && now.duration_since(self.last_input) >= IDLE_SLEEP_TIMEOUT {
            self.enter(sample);
            return true;
        }
        false
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Instant {
        Instant::from_millis(v)
    }

    fn rest() -> InputSample {
        InputSample {
            phase_a: true,
            phase_b: true,
            button_pressed: false,
        }
    }

    #[test]
    fn healthy_boot_starts_asleep() {
        let sleep = SleepController::new(rest(), ms(0), true);
        assert!(sleep.is_asleep());
    }

    #[test]
    fn button_press_wakes() {
        let mut sleep = SleepController::new(rest(), ms(0), true);
        let mut sample = rest();
        assert!(!sleep.check_wake(sample));
        sample.button_pressed = true;
        assert!(sleep.check_wake(sample));
        assert!(!sleep.is_asleep());
    }

    #[test]
    fn phase_line_change_wakes() {
        let mut sleep = SleepController::new(rest(), ms(0), true);
        let mut sample = rest();
        sample.phase_a = false;
        assert!(sleep.check_wake(sample));
    }

    #[test]
    fn check_wake_is_a_no_op_while_awake() {
        let mut sleep = SleepController::new(rest(), ms(0), false);
        let mut sample = rest();
        sample.button_pressed = true;
        assert!(!sleep.check_wake(sample));
    }

    #[test]
    fn idle_timeout_reenters_sleep() {
        let mut sleep = SleepController::new(rest(), ms(0), false);
        sleep.note_activity(ms(1000));
        assert!(!sleep.maybe_enter_idle(PlayerState::Paused, rest(), ms(5000)));
        assert!(sleep.maybe_enter_idle(PlayerState::Paused, rest(), ms(11_000)));
        assert!(sleep.is_asleep());
    }

    #[test]
    fn playing_and_error_never_idle_sleep() {
        let mut sleep = SleepController::new(rest(), ms(0), false);
        assert!(!sleep.maybe_enter_idle(PlayerState::Playing, rest(), ms(60_000)));
        assert!(!sleep.maybe_enter_idle(PlayerState::Error, rest(), ms(60_000)));
        assert!(!sleep.is_asleep());
    }
}
