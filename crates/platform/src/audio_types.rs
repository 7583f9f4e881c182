//! Audio domain newtypes for compile-time safety.
//!
//! [`Volume`] wraps the user-facing volume scale so that out-of-range values
//! cannot reach the engine and so that bounded step adjustments live in one
//! place instead of being re-clamped at every call site.

// ── Error type ───────────────────────────────────────────────────────────────

/// Error returned when a value is out of the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror_no_std::Error)]
#[error("value {value} outside [{min}, {max}]")]
pub struct OutOfRangeError {
    /// The value that was out of range.
    pub value: u32,
    /// The inclusive minimum allowed value.
    pub min: u32,
    /// The inclusive maximum allowed value.
    pub max: u32,
}

// ── Volume ───────────────────────────────────────────────────────────────────

/// Playback volume on the appliance's fixed scale, clamped to `0..=21`.
///
/// Wraps a `u8` with the invariant `0 <= value <= 21`.
/// Construct with [`Volume::new`] (clamping) or [`Volume::try_new`]
/// (fallible, strict); adjust with [`Volume::stepped`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct Volume(u8);

impl Volume {
    /// Top of the volume scale.
    pub const MAX_RAW: u8 = 21;

    /// Muted.
    pub const MIN: Volume = Volume(0);

    /// Loudest.
    pub const MAX: Volume = Volume(Self::MAX_RAW);

    /// Power-on default (mid-scale; nothing is persisted across power cycles).
    pub const DEFAULT: Volume = Volume(12);

    /// Create a `Volume`, clamping values above the scale top.
    #[must_use]
    pub fn new(value: u8) -> Self {
        Self(value.min(Self::MAX_RAW))
    }

    /// Create a `Volume`, returning an error if `value` is off-scale.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `value > 21`.
    pub fn try_new(value: u8) -> Result<Self, OutOfRangeError> {
        if value > Self::MAX_RAW {
            Err(OutOfRangeError {
                value: u32::from(value),
                min: 0,
                max: u32::from(Self::MAX_RAW),
            })
        } else {
            Ok(Self(value))
        }
    }

    /// Return the inner volume value (0–21).
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }

    /// Return this volume moved by `delta` steps, clamped at both bounds.
    ///
    /// A step past a bound returns the bound itself; callers compare the
    /// result against the current value to detect clamped no-ops.
    #[must_use]
    pub fn stepped(self, delta: i8) -> Self {
        let next = i16::from(self.0)
            .saturating_add(i16::from(delta))
            .clamp(0, i16::from(Self::MAX_RAW));
        // Range is 0..=21 after the clamp above.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Self(next as u8)
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::DEFAULT
    }
}
