//! Desktop simulator board.
//!
//! Implements every platform trait against host resources: a media
//! directory stands in for the removable medium, the "engine" burns
//! wall-clock time instead of decoding audio, and the LED channels land in
//! the log instead of on PWM pins. Control-core behavior is identical to a
//! hardware build because everything flows through the same traits.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use embassy_time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

use control::InputSample;
use platform::{AudioEngine, DigitalInput, Notification, PwmChannel, Rgb, Storage, Volume};

/// Strip the leading `/` so catalog paths resolve inside the media root.
fn resolve(root: &Path, path: &str) -> PathBuf {
    root.join(path.trim_start_matches('/'))
}

// ── Pins ─────────────────────────────────────────────────────────────────────

/// Simulated input pin; the session script drives its level.
#[derive(Debug)]
pub struct SimPin {
    name: &'static str,
    level: bool,
}

impl SimPin {
    /// Create a pin resting at `level`.
    pub fn new(name: &'static str, level: bool) -> Self {
        Self { name, level }
    }

    /// Drive the pin.
    pub fn set_level(&mut self, level: bool) {
        if self.level != level {
            trace!(pin = self.name, level, "pin change");
        }
        self.level = level;
    }
}

impl DigitalInput for SimPin {
    type Error = core::convert::Infallible;

    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level)
    }
}

/// Simulated LED channel; duty changes go to the log.
#[derive(Debug)]
pub struct SimPwm {
    name: &'static str,
    duty: u8,
}

impl SimPwm {
    /// Create a dark channel.
    pub fn new(name: &'static str) -> Self {
        Self { name, duty: 0 }
    }

    /// Last duty written.
    pub fn duty(&self) -> u8 {
        self.duty
    }
}

impl PwmChannel for SimPwm {
    type Error = core::convert::Infallible;

    fn set_duty(&mut self, duty: u8) -> Result<(), Self::Error> {
        if self.duty != duty {
            trace!(channel = self.name, duty, "pwm duty");
        }
        self.duty = duty;
        Ok(())
    }
}

// ── Board ────────────────────────────────────────────────────────────────────

/// The simulator's pin complement: encoder phases, button, RGB channels.
#[derive(Debug)]
pub struct SimBoard {
    /// Encoder phase A (detent-high at rest).
    pub phase_a: SimPin,
    /// Encoder phase B.
    pub phase_b: SimPin,
    /// Push-button, already polarity-mapped (true = pressed).
    pub button: SimPin,
    led_r: SimPwm,
    led_g: SimPwm,
    led_b: SimPwm,
}

impl SimBoard {
    /// A board at rest: encoder lines high, button released, LED dark.
    pub fn new() -> Self {
        Self {
            phase_a: SimPin::new("enc_a", true),
            phase_b: SimPin::new("enc_b", true),
            button: SimPin::new("button", false),
            led_r: SimPwm::new("led_r"),
            led_g: SimPwm::new("led_g"),
            led_b: SimPwm::new("led_b"),
        }
    }

    /// Sample all input levels for one loop iteration.
    pub fn sample(&mut self) -> InputSample {
        InputSample {
            phase_a: self.phase_a.is_high().unwrap_or_default(),
            phase_b: self.phase_b.is_high().unwrap_or_default(),
            button_pressed: self.button.is_high().unwrap_or_default(),
        }
    }

    /// Write one LED frame to the three channels.
    pub fn write_led(&mut self, frame: Rgb) {
        let _ = self.led_r.set_duty(frame.r);
        let _ = self.led_g.set_duty(frame.g);
        let _ = self.led_b.set_duty(frame.b);
    }

    /// Current LED frame, for assertions and status lines.
    pub fn led_frame(&self) -> Rgb {
        Rgb::new(self.led_r.duty(), self.led_g.duty(), self.led_b.duty())
    }
}

impl Default for SimBoard {
    fn default() -> Self {
        Self::new()
    }
}

// ── Storage ──────────────────────────────────────────────────────────────────

/// Storage backed by a host directory.
#[derive(Debug)]
pub struct SimStorage {
    root: PathBuf,
}

impl SimStorage {
    /// Use `root` as the medium's mount point.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Storage for SimStorage {
    type Error = std::io::Error;

    fn ready(&mut self) -> bool {
        self.root.is_dir()
    }

    fn exists(&mut self, path: &str) -> Result<bool, Self::Error> {
        Ok(resolve(&self.root, path).is_file())
    }

    fn list_root(&mut self, visit: &mut dyn FnMut(&str)) {
        let Ok(entries) = std::fs::read_dir(&self.root) else {
            return;
        };
        for entry in entries.flatten() {
            if let Some(name) = entry.file_name().to_str() {
                visit(name);
            }
        }
    }
}

// ── Engine ───────────────────────────────────────────────────────────────────

#[derive(Debug)]
struct SimStream {
    path: String,
    remaining: Duration,
}

/// Playback engine that burns wall-clock time against a fixed track length.
///
/// `service_step` decrements the remaining time while streaming; hitting
/// zero queues [`Notification::TrackEnded`] exactly like a real engine's
/// polled end-of-track event.
#[derive(Debug)]
pub struct SimEngine {
    root: PathBuf,
    track_length: Duration,
    stream: Option<SimStream>,
    paused: bool,
    volume: Volume,
    last_service: Option<Instant>,
    pending: VecDeque<Notification>,
}

impl SimEngine {
    /// Create an engine playing `track_length` of "audio" per track out of
    /// the `root` media directory.
    pub fn new(root: impl Into<PathBuf>, track_length: Duration) -> Self {
        Self {
            root: root.into(),
            track_length,
            stream: None,
            paused: false,
            volume: Volume::DEFAULT,
            last_service: None,
            pending: VecDeque::new(),
        }
    }

    /// Whether a stream is open and running.
    pub fn is_streaming(&self) -> bool {
        self.stream.is_some() && !self.paused
    }

    /// Path of the open stream, if any.
    pub fn current_path(&self) -> Option<&str> {
        self.stream.as_ref().map(|s| s.path.as_str())
    }

    /// Volume last pushed by the controller.
    pub fn volume(&self) -> Volume {
        self.volume
    }

    /// Inject a fault, as a real engine would after a mid-stream failure.
    pub fn inject_fault(&mut self, reason: platform::FaultReason) {
        self.pending.push_back(Notification::Fault(reason));
    }
}

impl AudioEngine for SimEngine {
    type Error = std::io::Error;

    fn connect(&mut self, path: &str) -> Result<(), Self::Error> {
        let host_path = resolve(&self.root, path);
        if !host_path.is_file() {
            warn!(path, "connect refused: no such file");
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "track file missing",
            ));
        }
        info!(path, "stream connected");
        self.stream = Some(SimStream {
            path: path.to_owned(),
            remaining: self.track_length,
        });
        self.paused = false;
        self.last_service = None;
        Ok(())
    }

    fn stop(&mut self) {
        if self.stream.take().is_some() {
            info!("stream stopped");
        }
        self.paused = false;
    }

    fn pause_resume(&mut self) {
        self.paused = !self.paused;
        info!(paused = self.paused, "pause/resume");
    }

    fn set_volume(&mut self, volume: Volume) {
        self.volume = volume;
        debug!(volume = volume.get(), "volume");
    }

    fn service_step(&mut self) {
        let now = Instant::now();
        let elapsed = self
            .last_service
            .map_or(Duration::from_ticks(0), |t| now.duration_since(t));
        self.last_service = Some(now);

        if self.paused {
            return;
        }
        let Some(stream) = self.stream.as_mut() else {
            return;
        };
        match stream.remaining.checked_sub(elapsed) {
            Some(rest) if rest.as_ticks() > 0 => stream.remaining = rest,
            _ => {
                info!(path = stream.path.as_str(), "track ended");
                self.stream = None;
                self.pending.push_back(Notification::TrackEnded);
            }
        }
    }

    fn poll_notification(&mut self) -> Option<Notification> {
        self.pending.pop_front()
    }
}

/// Player state as a log-friendly tag.
pub fn state_name(state: control::PlayerState) -> &'static str {
    match state {
        control::PlayerState::Idle => "idle",
        control::PlayerState::Playing => "playing",
        control::PlayerState::Paused => "paused",
        control::PlayerState::Error => "error",
    }
}
