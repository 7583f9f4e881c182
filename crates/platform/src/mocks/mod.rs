//! Mock implementations for testing
//!
//! This module provides mock implementations of all platform traits
//! for use in unit and integration tests. Everything here is heap-free so
//! the mocks stay usable from `no_std` test harnesses.

#![cfg(any(test, feature = "std"))]
#![allow(clippy::arithmetic_side_effects)] // test counters

use heapless::{Deque, String, Vec};

use crate::audio::{AudioEngine, Notification};
use crate::audio_types::Volume;
use crate::gpio::{DigitalInput, PwmChannel};
use crate::storage::Storage;

fn path_buf(path: &str) -> String<64> {
    let mut buf = String::new();
    // Truncate silently if the path exceeds the buffer capacity.
    let trimmed = path.get(..64).unwrap_or(path);
    let _ = buf.push_str(trimmed);
    buf
}

// ── MockPin ──────────────────────────────────────────────────────────────────

/// Mock input pin with a directly settable level.
#[derive(Debug, Default)]
pub struct MockPin {
    level: bool,
}

impl MockPin {
    /// Create a pin at the given level.
    pub fn new(level: bool) -> Self {
        Self { level }
    }

    /// Drive the pin to `level`.
    pub fn set_level(&mut self, level: bool) {
        self.level = level;
    }
}

impl DigitalInput for MockPin {
    type Error = core::convert::Infallible;

    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level)
    }
}

// ── MockPwm ──────────────────────────────────────────────────────────────────

/// Mock PWM channel recording the last duty written.
#[derive(Debug, Default)]
pub struct MockPwm {
    last_duty: Option<u8>,
    writes: usize,
}

impl MockPwm {
    /// Create a channel with no duty written yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last duty written, if any.
    pub fn last_duty(&self) -> Option<u8> {
        self.last_duty
    }

    /// Number of duty writes performed.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl PwmChannel for MockPwm {
    type Error = core::convert::Infallible;

    fn set_duty(&mut self, duty: u8) -> Result<(), Self::Error> {
        self.last_duty = Some(duty);
        self.writes += 1;
        Ok(())
    }
}

// ── MockEngine ───────────────────────────────────────────────────────────────

/// One recorded engine command, for asserting call order in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    /// `connect(path)`
    Connect(String<64>),
    /// `stop()`
    Stop,
    /// `pause_resume()`
    PauseResume,
    /// `set_volume(raw)`
    SetVolume(u8),
}

/// Error returned by [`MockEngine::connect`] when failures are scripted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectRefused;

/// Mock audio engine recording commands and replaying scripted notifications.
#[derive(Debug, Default)]
pub struct MockEngine {
    commands: Vec<EngineCommand, 32>,
    notifications: Deque<Notification, 8>,
    fail_connects: bool,
    connected: Option<String<64>>,
    paused: bool,
    service_steps: usize,
}

impl MockEngine {
    /// Create an idle engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `connect` fail with [`ConnectRefused`].
    pub fn fail_connects(&mut self, fail: bool) {
        self.fail_connects = fail;
    }

    /// Queue a notification for the next `poll_notification`.
    pub fn push_notification(&mut self, n: Notification) {
        let _ = self.notifications.push_back(n);
    }

    /// Commands recorded so far, in call order.
    pub fn commands(&self) -> &[EngineCommand] {
        &self.commands
    }

    /// Forget recorded commands.
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Path of the currently connected stream, if any.
    pub fn connected(&self) -> Option<&str> {
        self.connected.as_deref()
    }

    /// Whether the stream is connected and not paused.
    pub fn is_streaming(&self) -> bool {
        self.connected.is_some() && !self.paused
    }

    /// Number of `service_step` calls seen.
    pub fn service_steps(&self) -> usize {
        self.service_steps
    }

    fn record(&mut self, cmd: EngineCommand) {
        // Bounded log; tests keep sequences short.
        let _ = self.commands.push(cmd);
    }
}

impl AudioEngine for MockEngine {
    type Error = ConnectRefused;

    fn connect(&mut self, path: &str) -> Result<(), Self::Error> {
        self.record(EngineCommand::Connect(path_buf(path)));
        if self.fail_connects {
            return Err(ConnectRefused);
        }
        self.connected = Some(path_buf(path));
        self.paused = false;
        Ok(())
    }

    fn stop(&mut self) {
        self.record(EngineCommand::Stop);
        self.connected = None;
        self.paused = false;
    }

    fn pause_resume(&mut self) {
        self.record(EngineCommand::PauseResume);
        self.paused = !self.paused;
    }

    fn set_volume(&mut self, volume: Volume) {
        self.record(EngineCommand::SetVolume(volume.get()));
    }

    fn service_step(&mut self) {
        self.service_steps += 1;
    }

    fn poll_notification(&mut self) -> Option<Notification> {
        self.notifications.pop_front()
    }
}

// ── MockStorage ──────────────────────────────────────────────────────────────

/// Mock storage with a configurable set of present paths.
///
/// Records every `exists` query so tests can assert fallback probe order.
#[derive(Debug)]
pub struct MockStorage {
    ready: bool,
    present: Vec<String<64>, 16>,
    probes: Vec<String<64>, 64>,
}

impl MockStorage {
    /// Create a ready medium with no files on it.
    pub fn new() -> Self {
        Self {
            ready: true,
            present: Vec::new(),
            probes: Vec::new(),
        }
    }

    /// Create an absent/unmounted medium.
    pub fn unavailable() -> Self {
        let mut s = Self::new();
        s.ready = false;
        s
    }

    /// Mark `path` as existing on the medium.
    pub fn add_present(&mut self, path: &str) {
        let _ = self.present.push(path_buf(path));
    }

    /// `exists` queries recorded so far, in call order.
    pub fn probes(&self) -> &[String<64>] {
        &self.probes
    }

    /// Forget recorded queries.
    pub fn clear_probes(&mut self) {
        self.probes.clear();
    }
}

impl Default for MockStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for MockStorage {
    type Error = core::convert::Infallible;

    fn ready(&mut self) -> bool {
        self.ready
    }

    fn exists(&mut self, path: &str) -> Result<bool, Self::Error> {
        let _ = self.probes.push(path_buf(path));
        Ok(self.present.iter().any(|p| p.as_str() == path))
    }

    fn list_root(&mut self, visit: &mut dyn FnMut(&str)) {
        for p in &self.present {
            visit(p.as_str());
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_pin_level() {
        let mut pin = MockPin::new(false);
        assert_eq!(pin.is_high(), Ok(false));
        pin.set_level(true);
        assert_eq!(pin.is_high(), Ok(true));
        assert_eq!(pin.is_low(), Ok(false));
    }

    #[test]
    fn test_mock_pwm_records_last_duty() {
        let mut pwm = MockPwm::new();
        pwm.set_duty(0).unwrap();
        pwm.set_duty(128).unwrap();
        assert_eq!(pwm.last_duty(), Some(128));
        assert_eq!(pwm.writes(), 2);
    }

    #[test]
    fn test_mock_engine_records_command_order() {
        let mut engine = MockEngine::new();
        engine.connect("/music/01.mp3").unwrap();
        engine.set_volume(Volume::new(7));
        engine.stop();
        assert_eq!(
            engine.commands(),
            [
                EngineCommand::Connect(path_buf("/music/01.mp3")),
                EngineCommand::SetVolume(7),
                EngineCommand::Stop,
            ]
        );
    }

    #[test]
    fn test_mock_engine_scripted_connect_failure() {
        let mut engine = MockEngine::new();
        engine.fail_connects(true);
        assert_eq!(engine.connect("/music/01.mp3"), Err(ConnectRefused));
        assert!(engine.connected().is_none());
    }

    #[test]
    fn test_mock_engine_pause_resume_toggles() {
        let mut engine = MockEngine::new();
        engine.connect("/music/01.mp3").unwrap();
        assert!(engine.is_streaming());
        engine.pause_resume();
        assert!(!engine.is_streaming());
        engine.pause_resume();
        assert!(engine.is_streaming());
    }

    #[test]
    fn test_mock_engine_notification_queue_drains_fifo() {
        let mut engine = MockEngine::new();
        engine.push_notification(Notification::TrackEnded);
        assert_eq!(engine.poll_notification(), Some(Notification::TrackEnded));
        assert_eq!(engine.poll_notification(), None);
    }

    #[test]
    fn test_mock_storage_exists_and_probe_log() {
        let mut storage = MockStorage::new();
        storage.add_present("/music/03.mp3");
        assert_eq!(storage.exists("/music/01.mp3"), Ok(false));
        assert_eq!(storage.exists("/music/03.mp3"), Ok(true));
        let probes: std::vec::Vec<&str> = storage.probes().iter().map(|p| p.as_str()).collect();
        assert_eq!(probes, ["/music/01.mp3", "/music/03.mp3"]);
    }

    #[test]
    fn test_mock_storage_unavailable() {
        let mut storage = MockStorage::unavailable();
        assert!(!storage.ready());
    }
}
