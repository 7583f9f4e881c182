//! The owning controller aggregate and its cooperative loop body.
//!
//! One [`Controller`] owns every piece of mutable state in the system —
//! decoder, player, LED renderer, sleep controller, catalog — plus the
//! engine and storage collaborators. The loop driver calls [`step`] once
//! per iteration with freshly sampled pin levels and the current time;
//! nothing here blocks.
//!
//! Iteration order (fixed): engine service + notification drain (skipped
//! asleep) → input classification → event dispatch → LED render.
//!
//! [`step`]: Controller::step

use embassy_time::{Duration, Instant};

use platform::{AudioEngine, Rgb, Storage, Volume};

use crate::catalog::{Catalog, TrackId};
use crate::config::{AWAKE_POLL_INTERVAL, SLEEP_POLL_INTERVAL};
use crate::gesture::{GestureDecoder, InputSample};
use crate::led::LedRenderer;
use crate::player::{Player, PlayerState};
use crate::sleep::SleepController;

/// The single owned aggregate threaded through every loop iteration.
pub struct Controller<E: AudioEngine, S: Storage> {
    engine: E,
    storage: S,
    catalog: Catalog,
    decoder: GestureDecoder,
    player: Player,
    leds: LedRenderer,
    sleep: SleepController,
}

impl<E: AudioEngine, S: Storage> Controller<E, S> {
    /// Build the controller and run the startup storage probe.
    ///
    /// `sample` is the initial pin reading, used to baseline the debouncers
    /// and the wake detector. A healthy boot starts asleep, waiting for the
    /// first press; a failed startup probe stays awake so the LED can show
    /// the error pattern.
    pub fn new(
        engine: E,
        mut storage: S,
        catalog: Catalog,
        sample: InputSample,
        now: Instant,
    ) -> Self {
        let mut player = Player::new();
        player.startup(&mut storage);
        let start_asleep = player.state() != PlayerState::Error;
        Self {
            engine,
            storage,
            catalog,
            decoder: GestureDecoder::new(sample),
            player,
            leds: LedRenderer::new(),
            sleep: SleepController::new(sample, now, start_asleep),
        }
    }

    /// One cooperative loop iteration. Returns the LED frame to write.
    pub fn step(&mut self, sample: InputSample, now: Instant) -> Rgb {
        if self.sleep.is_asleep() {
            if !self.sleep.check_wake(sample) {
                // Still asleep: rendering and engine polling stay suspended.
                return Rgb::OFF;
            }
            // Woke up. Re-arm the debounce baselines so the stale pre-sleep
            // levels cannot fabricate edges out of the wake reading itself,
            // then resume per the pre-sleep state.
            self.decoder.rearm(sample);
            self.sleep.note_activity(now);
            self.player.wake(
                &mut self.engine,
                &mut self.storage,
                &self.catalog,
                &mut self.leds,
                now,
            );
        }

        // Audio engine service step, then drain its polled notifications.
        self.engine.service_step();
        loop {
            let Some(n) = self.engine.poll_notification() else {
                break;
            };
            self.player.handle_notification(
                n,
                &mut self.engine,
                &mut self.storage,
                &self.catalog,
                &mut self.leds,
                now,
            );
        }

        // Input classification and dispatch.
        if let Some(g) = self.decoder.poll_rotation(sample.phase_a, sample.phase_b, now) {
            self.sleep.note_activity(now);
            self.player.handle_gesture(
                g,
                &mut self.engine,
                &mut self.storage,
                &self.catalog,
                &mut self.leds,
                now,
            );
        }
        let before = self.player.state();
        if let Some(g) = self.decoder.poll_button(sample.button_pressed, now) {
            self.sleep.note_activity(now);
            self.player.handle_gesture(
                g,
                &mut self.engine,
                &mut self.storage,
                &self.catalog,
                &mut self.leds,
                now,
            );
            if before == PlayerState::Playing && self.player.state() == PlayerState::Paused {
                // A user pause puts the box to sleep right away.
                self.enter_sleep(sample);
                return Rgb::OFF;
            }
        }

        // Idle timeout re-entry.
        if self
            .sleep
            .maybe_enter_idle(self.player.state(), sample, now)
        {
            self.leds.suspend();
            return Rgb::OFF;
        }

        self.leds.tick(self.player.state(), now)
    }

    /// How long the loop driver should wait before the next [`step`]:
    /// fast while awake, the coarse low-power interval while asleep.
    ///
    /// [`step`]: Controller::step
    pub fn poll_interval(&self) -> Duration {
        if self.sleep.is_asleep() {
            SLEEP_POLL_INTERVAL
        } else {
            AWAKE_POLL_INTERVAL
        }
    }

    /// Current player state.
    pub fn state(&self) -> PlayerState {
        self.player.state()
    }

    /// Current track index.
    pub fn current_track(&self) -> TrackId {
        self.player.current_track()
    }

    /// Current volume.
    pub fn volume(&self) -> Volume {
        self.player.volume()
    }

    /// Whether the box is in the low-power poll cycle.
    pub fn is_asleep(&self) -> bool {
        self.sleep.is_asleep()
    }

    /// Shared access to the audio engine (diagnostics, tests).
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Mutable access to the audio engine (simulators, tests).
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    fn enter_sleep(&mut self, sample: InputSample) {
        self.sleep.enter(sample);
        self.leds.suspend();
    }
}
