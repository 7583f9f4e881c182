//! Audio engine abstraction
//!
//! The playback engine is a black box behind this trait: the control core
//! issues commands and drains notifications; decoding and streaming live
//! entirely on the other side of the seam.

use crate::audio_types::Volume;

/// Command interface of the black-box audio engine.
///
/// All methods are synchronous and bounded — the core calls them from a
/// cooperative loop iteration and must never be blocked for more than a few
/// milliseconds. Asynchronous engine events (end of track, faults) are not
/// delivered by callback; they are queued inside the engine and drained via
/// [`poll_notification`] after each [`service_step`], preserving the
/// deterministic single-threaded ordering of the control loop.
///
/// [`poll_notification`]: AudioEngine::poll_notification
/// [`service_step`]: AudioEngine::service_step
pub trait AudioEngine {
    /// Error type
    type Error: core::fmt::Debug;

    /// Open the stream for `path` and start playback.
    fn connect(&mut self, path: &str) -> Result<(), Self::Error>;

    /// Stop playback and drop the current stream. Idempotent.
    fn stop(&mut self);

    /// Toggle between paused and running without dropping the stream.
    fn pause_resume(&mut self);

    /// Set the output volume.
    fn set_volume(&mut self, volume: Volume);

    /// Keep the stream alive. Must be called every non-sleeping loop
    /// iteration.
    fn service_step(&mut self);

    /// Drain the next queued engine notification, if any.
    fn poll_notification(&mut self) -> Option<Notification>;
}

/// Asynchronous engine events, polled rather than callback-delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Notification {
    /// The current track finished on its own.
    TrackEnded,
    /// The engine hit a mid-stream error; the stream is no longer valid.
    Fault(FaultReason),
}

/// Why the engine faulted mid-stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaultReason {
    /// The underlying stream broke (storage removed, read error).
    Stream,
    /// The payload could not be decoded.
    Decode,
    /// The output device rejected the data.
    Device,
}

impl FaultReason {
    /// Short diagnostic tag for log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            FaultReason::Stream => "stream",
            FaultReason::Decode => "decode",
            FaultReason::Device => "device",
        }
    }
}
