//! Player state machine — the central controller.
//!
//! Pure, allocation-free logic: state, current track and volume live here;
//! I/O happens only through the engine/storage collaborators passed into
//! each call. This keeps every transition host-testable against mocks.

use embassy_time::Instant;

use platform::{AudioEngine, FaultReason, Notification, Storage, Volume};

use crate::catalog::{Catalog, TrackId};
use crate::gesture::Gesture;
use crate::led::LedRenderer;

/// Current player state. Exactly one per controller; transitions only
/// through the methods below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlayerState {
    /// Powered up, nothing played yet.
    Idle,
    /// A stream was opened and is running.
    Playing,
    /// Stream suspended, position preserved.
    Paused,
    /// Playback capability lost; short press retries.
    Error,
}

/// Track selection, play/pause/stop, volume bounds and error recovery.
#[derive(Debug)]
pub struct Player {
    state: PlayerState,
    current: TrackId,
    volume: Volume,
}

impl Player {
    /// Create a player at the power-on defaults (nothing is persisted
    /// across power cycles).
    pub fn new() -> Self {
        Self {
            state: PlayerState::Idle,
            current: TrackId::FIRST,
            volume: Volume::DEFAULT,
        }
    }

    /// Startup probe: a missing medium makes playback unavailable right
    /// away, but the loop keeps running and short presses keep retrying.
    pub fn startup<S: Storage>(&mut self, storage: &mut S) {
        if !storage.ready() {
            #[cfg(feature = "defmt")]
            defmt::warn!("storage not ready at startup; playback unavailable");
            self.state = PlayerState::Error;
        }
    }

    /// Current state.
    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Current track index.
    pub fn current_track(&self) -> TrackId {
        self.current
    }

    /// Current volume.
    pub fn volume(&self) -> Volume {
        self.volume
    }

    /// Dispatch one classified gesture.
    pub fn handle_gesture<E: AudioEngine, S: Storage>(
        &mut self,
        gesture: Gesture,
        engine: &mut E,
        storage: &mut S,
        catalog: &Catalog,
        leds: &mut LedRenderer,
        now: Instant,
    ) {
        match gesture {
            Gesture::VolumeStep(delta) => self.adjust_volume(delta, engine, leds, now),
            Gesture::ShortPress => match self.state {
                PlayerState::Idle => {
                    self.start_track(self.current, engine, storage, catalog, leds, now);
                }
                PlayerState::Playing => {
                    engine.pause_resume();
                    self.state = PlayerState::Paused;
                }
                PlayerState::Paused => {
                    engine.pause_resume();
                    self.state = PlayerState::Playing;
                }
                PlayerState::Error => {
                    // Retry the current index; success clears the error.
                    self.start_track(self.current, engine, storage, catalog, leds, now);
                }
            },
            Gesture::LongPress => match self.state {
                PlayerState::Idle | PlayerState::Playing | PlayerState::Paused => {
                    self.skip_to_next(engine, storage, catalog, leds, now);
                }
                // Recoverable no-op: skipping from a fault would mask the
                // condition the LED is reporting. Retry stays on short press.
                PlayerState::Error => {}
            },
        }
    }

    /// Dispatch one polled engine notification.
    pub fn handle_notification<E: AudioEngine, S: Storage>(
        &mut self,
        notification: Notification,
        engine: &mut E,
        storage: &mut S,
        catalog: &Catalog,
        leds: &mut LedRenderer,
        now: Instant,
    ) {
        match notification {
            Notification::TrackEnded => {
                if self.state == PlayerState::Playing {
                    self.skip_to_next(engine, storage, catalog, leds, now);
                }
            }
            Notification::Fault(reason) => self.fault(reason, engine),
        }
    }

    /// Wake-from-sleep resumption: a wake edge acts like a short press from
    /// Paused or Idle.
    pub fn wake<E: AudioEngine, S: Storage>(
        &mut self,
        engine: &mut E,
        storage: &mut S,
        catalog: &Catalog,
        leds: &mut LedRenderer,
        now: Instant,
    ) {
        match self.state {
            PlayerState::Paused => {
                engine.pause_resume();
                self.state = PlayerState::Playing;
            }
            PlayerState::Idle => {
                self.start_track(self.current, engine, storage, catalog, leds, now);
            }
            PlayerState::Playing | PlayerState::Error => {}
        }
    }

    /// Stop whatever is running and start the following track.
    fn skip_to_next<E: AudioEngine, S: Storage>(
        &mut self,
        engine: &mut E,
        storage: &mut S,
        catalog: &Catalog,
        leds: &mut LedRenderer,
        now: Instant,
    ) {
        engine.stop();
        self.start_track(self.current.next(), engine, storage, catalog, leds, now);
    }

    /// Select and play the first present track at or after `start`.
    ///
    /// The state never reads `Playing` unless a stream was actually opened:
    /// an empty probe or a refused connect lands in `Error` with no play
    /// command outstanding.
    fn start_track<E: AudioEngine, S: Storage>(
        &mut self,
        start: TrackId,
        engine: &mut E,
        storage: &mut S,
        catalog: &Catalog,
        leds: &mut LedRenderer,
        now: Instant,
    ) {
        if !storage.ready() {
            #[cfg(feature = "defmt")]
            defmt::warn!("storage unavailable");
            self.state = PlayerState::Error;
            return;
        }
        let Some(id) = catalog.find_present(storage, start) else {
            #[cfg(feature = "defmt")]
            defmt::warn!("no playable track on the medium");
            self.state = PlayerState::Error;
            return;
        };
        let track = catalog.track(id);
        match engine.connect(track.path) {
            Ok(()) => {
                engine.set_volume(self.volume);
                self.current = id;
                self.state = PlayerState::Playing;
                leds.announce_track(track.color, now);
                #[cfg(feature = "defmt")]
                defmt::debug!("playing track {}", id.index());
            }
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("stream open failed for track {}", id.index());
                self.state = PlayerState::Error;
            }
        }
    }

    /// Volume step from any state; never a state transition.
    ///
    /// A clamped no-op changes nothing downstream: no engine write, no
    /// flash overlay.
    fn adjust_volume<E: AudioEngine>(
        &mut self,
        delta: i8,
        engine: &mut E,
        leds: &mut LedRenderer,
        now: Instant,
    ) {
        let next = self.volume.stepped(delta);
        if next == self.volume {
            return;
        }
        self.volume = next;
        engine.set_volume(next);
        leds.flash_volume(now);
    }

    /// Mid-stream fault: discard every assumption about the stream.
    fn fault<E: AudioEngine>(&mut self, reason: FaultReason, engine: &mut E) {
        #[cfg(feature = "defmt")]
        defmt::warn!("engine fault: {}", reason.as_str());
        #[cfg(not(feature = "defmt"))]
        let _ = reason;
        engine.stop();
        self.state = PlayerState::Error;
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;
    use platform::mocks::{EngineCommand, MockEngine, MockStorage};

    fn ms(v: u64) -> Instant {
        Instant::from_millis(v)
    }

    struct Rig {
        player: Player,
        engine: MockEngine,
        storage: MockStorage,
        catalog: Catalog,
        leds: LedRenderer,
    }

    impl Rig {
        /// Full medium: every catalog track present.
        fn new() -> Self {
            let mut storage = MockStorage::new();
            let catalog = Catalog::builtin();
            for i in 0..9u8 {
                storage.add_present(catalog.track(TrackId::new(i).unwrap()).path);
            }
            Rig {
                player: Player::new(),
                engine: MockEngine::new(),
                storage,
                catalog,
                leds: LedRenderer::new(),
            }
        }

        fn gesture(&mut self, g: Gesture, at: u64) {
            self.player.handle_gesture(
                g,
                &mut self.engine,
                &mut self.storage,
                &self.catalog,
                &mut self.leds,
                ms(at),
            );
        }

        fn notify(&mut self, n: Notification, at: u64) {
            self.player.handle_notification(
                n,
                &mut self.engine,
                &mut self.storage,
                &self.catalog,
                &mut self.leds,
                ms(at),
            );
        }
    }

    #[test]
    fn idle_short_press_plays_current_track() {
        let mut rig = Rig::new();
        rig.gesture(Gesture::ShortPress, 0);
        assert_eq!(rig.player.state(), PlayerState::Playing);
        assert_eq!(rig.engine.connected(), Some("/music/01.mp3"));
        // Volume is pushed to the engine on every stream start.
        assert!(rig
            .engine
            .commands()
            .contains(&EngineCommand::SetVolume(Volume::DEFAULT.get())));
    }

    #[test]
    fn idle_long_press_plays_next_track() {
        let mut rig = Rig::new();
        rig.gesture(Gesture::LongPress, 0);
        assert_eq!(rig.player.state(), PlayerState::Playing);
        assert_eq!(rig.player.current_track(), TrackId::new(1).unwrap());
        assert_eq!(rig.engine.connected(), Some("/music/02.mp3"));
    }

    #[test]
    fn playing_short_press_pauses() {
        let mut rig = Rig::new();
        rig.gesture(Gesture::ShortPress, 0);
        rig.engine.clear_commands();
        rig.gesture(Gesture::ShortPress, 100);
        assert_eq!(rig.player.state(), PlayerState::Paused);
        assert_eq!(rig.engine.commands(), [EngineCommand::PauseResume]);
    }

    #[test]
    fn paused_short_press_resumes_without_reconnect() {
        let mut rig = Rig::new();
        rig.gesture(Gesture::ShortPress, 0);
        rig.gesture(Gesture::ShortPress, 100); // pause
        rig.engine.clear_commands();
        rig.gesture(Gesture::ShortPress, 200); // resume
        assert_eq!(rig.player.state(), PlayerState::Playing);
        assert_eq!(rig.engine.commands(), [EngineCommand::PauseResume]);
    }

    #[test]
    fn playing_long_press_skips_with_stop_select_play() {
        let mut rig = Rig::new();
        rig.gesture(Gesture::ShortPress, 0);
        rig.engine.clear_commands();
        rig.gesture(Gesture::LongPress, 100);
        assert_eq!(rig.player.current_track(), TrackId::new(1).unwrap());
        let cmds = rig.engine.commands();
        assert_eq!(cmds[0], EngineCommand::Stop);
        assert!(matches!(cmds[1], EngineCommand::Connect(ref p) if p.as_str() == "/music/02.mp3"));
    }

    #[test]
    fn skip_wraps_at_catalog_end() {
        let mut rig = Rig::new();
        rig.gesture(Gesture::ShortPress, 0);
        for _ in 0..9 {
            rig.gesture(Gesture::LongPress, 100);
        }
        assert_eq!(rig.player.current_track(), TrackId::FIRST);
    }

    #[test]
    fn track_ended_advances_like_a_skip() {
        let mut rig = Rig::new();
        rig.gesture(Gesture::ShortPress, 0);
        rig.engine.clear_commands();
        rig.notify(Notification::TrackEnded, 5000);
        assert_eq!(rig.player.state(), PlayerState::Playing);
        assert_eq!(rig.player.current_track(), TrackId::new(1).unwrap());
    }

    #[test]
    fn track_ended_while_paused_is_ignored() {
        let mut rig = Rig::new();
        rig.gesture(Gesture::ShortPress, 0);
        rig.gesture(Gesture::ShortPress, 100); // pause
        rig.engine.clear_commands();
        rig.notify(Notification::TrackEnded, 5000);
        assert_eq!(rig.player.state(), PlayerState::Paused);
        assert!(rig.engine.commands().is_empty());
    }

    #[test]
    fn engine_fault_escalates_to_error_and_stops() {
        let mut rig = Rig::new();
        rig.gesture(Gesture::ShortPress, 0);
        rig.engine.clear_commands();
        rig.notify(Notification::Fault(FaultReason::Stream), 3000);
        assert_eq!(rig.player.state(), PlayerState::Error);
        assert_eq!(rig.engine.commands(), [EngineCommand::Stop]);
    }

    #[test]
    fn error_short_press_retries_and_recovers() {
        let mut rig = Rig::new();
        rig.gesture(Gesture::ShortPress, 0);
        rig.notify(Notification::Fault(FaultReason::Decode), 1000);
        assert_eq!(rig.player.state(), PlayerState::Error);
        rig.gesture(Gesture::ShortPress, 2000);
        assert_eq!(rig.player.state(), PlayerState::Playing);
    }

    #[test]
    fn error_retry_fails_when_connect_refused() {
        let mut rig = Rig::new();
        rig.notify(Notification::Fault(FaultReason::Device), 0);
        rig.engine.fail_connects(true);
        rig.gesture(Gesture::ShortPress, 1000);
        assert_eq!(rig.player.state(), PlayerState::Error);
    }

    #[test]
    fn error_long_press_is_a_no_op() {
        let mut rig = Rig::new();
        rig.notify(Notification::Fault(FaultReason::Stream), 0);
        rig.engine.clear_commands();
        rig.gesture(Gesture::LongPress, 1000);
        assert_eq!(rig.player.state(), PlayerState::Error);
        assert!(rig.engine.commands().is_empty());
    }

    #[test]
    fn fallback_probes_until_a_present_track() {
        let mut rig = Rig::new();
        rig.storage = MockStorage::new();
        rig.storage.add_present("/music/06.mp3"); // only index 5 exists
        rig.gesture(Gesture::ShortPress, 0);
        assert_eq!(rig.player.state(), PlayerState::Playing);
        assert_eq!(rig.player.current_track(), TrackId::new(5).unwrap());
        assert_eq!(rig.engine.connected(), Some("/music/06.mp3"));
    }

    #[test]
    fn empty_medium_gives_error_without_play_command() {
        let mut rig = Rig::new();
        rig.storage = MockStorage::new(); // ready but empty
        rig.gesture(Gesture::ShortPress, 0);
        assert_eq!(rig.player.state(), PlayerState::Error);
        assert!(rig.engine.commands().is_empty());
    }

    #[test]
    fn startup_without_medium_is_error_but_not_fatal() {
        let mut rig = Rig::new();
        rig.storage = MockStorage::unavailable();
        rig.player.startup(&mut rig.storage);
        assert_eq!(rig.player.state(), PlayerState::Error);
        // Retry keeps working once the medium appears.
        rig.storage = {
            let mut s = MockStorage::new();
            s.add_present("/music/01.mp3");
            s
        };
        rig.gesture(Gesture::ShortPress, 1000);
        assert_eq!(rig.player.state(), PlayerState::Playing);
    }

    #[test]
    fn volume_step_keeps_state_and_flashes() {
        let mut rig = Rig::new();
        rig.gesture(Gesture::ShortPress, 0);
        rig.engine.clear_commands();
        rig.gesture(Gesture::VolumeStep(1), 100);
        assert_eq!(rig.player.state(), PlayerState::Playing);
        assert_eq!(rig.player.volume().get(), Volume::DEFAULT.get() + 1);
        assert_eq!(
            rig.engine.commands(),
            [EngineCommand::SetVolume(Volume::DEFAULT.get() + 1)]
        );
    }

    #[test]
    fn clamped_volume_step_is_a_complete_no_op() {
        let mut rig = Rig::new();
        // Walk the volume down to the floor.
        for _ in 0..30 {
            rig.gesture(Gesture::VolumeStep(-1), 0);
        }
        assert_eq!(rig.player.volume(), Volume::MIN);
        rig.engine.clear_commands();
        rig.leds = LedRenderer::new();

        rig.gesture(Gesture::VolumeStep(-1), 1000);
        assert_eq!(rig.player.volume(), Volume::MIN);
        assert!(rig.engine.commands().is_empty()); // no redundant engine write
        // No flash overlay either: the next frame is plain steady state.
        assert_eq!(
            rig.leds.tick(PlayerState::Idle, ms(1010)),
            crate::led::STANDBY_COLOR
        );
    }

    #[test]
    fn volume_round_trip_returns_to_start() {
        let mut rig = Rig::new();
        let start = rig.player.volume();
        rig.gesture(Gesture::VolumeStep(1), 0);
        rig.gesture(Gesture::VolumeStep(-1), 100);
        assert_eq!(rig.player.volume(), start);
    }

    #[test]
    fn wake_from_paused_resumes() {
        let mut rig = Rig::new();
        rig.gesture(Gesture::ShortPress, 0);
        rig.gesture(Gesture::ShortPress, 100); // pause
        rig.engine.clear_commands();
        rig.player.wake(
            &mut rig.engine,
            &mut rig.storage,
            &rig.catalog,
            &mut rig.leds,
            ms(5000),
        );
        assert_eq!(rig.player.state(), PlayerState::Playing);
        assert_eq!(rig.engine.commands(), [EngineCommand::PauseResume]);
    }

    #[test]
    fn wake_from_idle_issues_a_fresh_play() {
        let mut rig = Rig::new();
        rig.player.wake(
            &mut rig.engine,
            &mut rig.storage,
            &rig.catalog,
            &mut rig.leds,
            ms(5000),
        );
        assert_eq!(rig.player.state(), PlayerState::Playing);
        assert!(matches!(
            rig.engine.commands().first(),
            Some(EngineCommand::Connect(_))
        ));
    }
}
