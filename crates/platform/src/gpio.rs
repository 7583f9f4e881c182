//! Pin-level I/O abstraction
//!
//! Level reads for the encoder/button lines and duty-cycle writes for the
//! LED channels. Pins are configured once at startup with fixed directions
//! and pull resistors; the traits here only cover the operations the control
//! core performs every loop iteration.

/// Digital input pin operations.
pub trait DigitalInput {
    /// Error type
    type Error: core::fmt::Debug;

    /// Read pin level.
    fn is_high(&mut self) -> Result<bool, Self::Error>;

    /// Read pin level (inverted).
    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|v| !v)
    }
}

/// PWM duty-cycle output for one LED channel.
pub trait PwmChannel {
    /// Error type
    type Error: core::fmt::Debug;

    /// Set the duty cycle, 0 (off) to 255 (fully on).
    fn set_duty(&mut self, duty: u8) -> Result<(), Self::Error>;
}

/// Pin state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinState {
    /// High (logic 1)
    High,
    /// Low (logic 0)
    Low,
}

impl From<bool> for PinState {
    fn from(value: bool) -> Self {
        if value {
            Self::High
        } else {
            Self::Low
        }
    }
}

impl From<PinState> for bool {
    fn from(value: PinState) -> Self {
        matches!(value, PinState::High)
    }
}

/// One RGB duty triple as written to the three LED channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb {
    /// Red duty, 0–255
    pub r: u8,
    /// Green duty, 0–255
    pub g: u8,
    /// Blue duty, 0–255
    pub b: u8,
}

impl Rgb {
    /// All channels off.
    pub const OFF: Rgb = Rgb::new(0, 0, 0);

    /// Build a color from channel duties.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Scale every channel by `brightness / 255`.
    #[must_use]
    pub fn scaled(self, brightness: u8) -> Self {
        let scale = |c: u8| -> u8 {
            // u8 * u8 fits in u16; the division brings it back to 0..=255.
            #[allow(clippy::cast_possible_truncation, clippy::arithmetic_side_effects)]
            let v = (u16::from(c) * u16::from(brightness) / 255) as u8;
            v
        };
        Self {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
        }
    }
}
