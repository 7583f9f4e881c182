//! Adapters binding `embedded-hal` 1.0 drivers to the platform traits.
//!
//! Board support crates hand out pins implementing
//! [`embedded_hal::digital::InputPin`] and timer channels implementing
//! [`embedded_hal::pwm::SetDutyCycle`]; wrapping them here lets the rest of
//! the stack stay generic over [`DigitalInput`] / [`PwmChannel`] without
//! caring which HAL produced them.

use crate::gpio::{DigitalInput, PwmChannel};

/// [`DigitalInput`] over any `embedded-hal` input pin.
pub struct HalInput<P> {
    pin: P,
}

impl<P> HalInput<P> {
    /// Wrap an `embedded-hal` input pin.
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Return the wrapped pin.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: embedded_hal::digital::InputPin> DigitalInput for HalInput<P> {
    type Error = P::Error;

    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.pin.is_high()
    }
}

/// Logical view of an active-low input.
///
/// Buttons are wired to ground with an internal pull-up, so the pin reads
/// low while pressed. Wrapping the pin here lets the control core treat
/// "high" as "asserted" everywhere.
pub struct ActiveLow<P> {
    pin: P,
}

impl<P> ActiveLow<P> {
    /// Wrap an active-low input.
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Return the wrapped input.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: DigitalInput> DigitalInput for ActiveLow<P> {
    type Error = P::Error;

    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.pin.is_low()
    }
}

/// [`PwmChannel`] over any `embedded-hal` duty-cycle output.
///
/// Maps the 0–255 duty scale onto the channel's own resolution via
/// `set_duty_cycle_fraction`, so 8-bit and 16-bit timers behave alike.
pub struct HalPwm<C> {
    channel: C,
}

impl<C> HalPwm<C> {
    /// Wrap an `embedded-hal` PWM channel.
    pub fn new(channel: C) -> Self {
        Self { channel }
    }

    /// Return the wrapped channel.
    pub fn into_inner(self) -> C {
        self.channel
    }
}

impl<C: embedded_hal::pwm::SetDutyCycle> PwmChannel for HalPwm<C> {
    type Error = C::Error;

    fn set_duty(&mut self, duty: u8) -> Result<(), Self::Error> {
        self.channel.set_duty_cycle_fraction(u16::from(duty), 255)
    }
}
