//! Adapter tests — platform traits over `embedded-hal` 1.x drivers.
//!
//! embedded-hal-mock 0.11 supports embedded-hal 1.x via the `eh1` module.

use embedded_hal_mock::eh1::digital::{
    Mock as PinMock, State as PinLevel, Transaction as PinTransaction,
};
use platform::hal::{ActiveLow, HalInput, HalPwm};
use platform::{DigitalInput, PinState, PwmChannel};

#[test]
fn hal_input_forwards_levels() {
    let expectations = [
        PinTransaction::get(PinLevel::High),
        PinTransaction::get(PinLevel::Low),
    ];
    let mut pin = HalInput::new(PinMock::new(&expectations));

    assert_eq!(pin.is_high().unwrap(), true);
    assert_eq!(pin.is_high().unwrap(), false);

    pin.into_inner().done();
}

#[test]
fn hal_input_is_low_inverts() {
    let expectations = [PinTransaction::get(PinLevel::Low)];
    let mut pin = HalInput::new(PinMock::new(&expectations));

    assert_eq!(pin.is_low().unwrap(), true);

    pin.into_inner().done();
}

#[test]
fn active_low_inverts_the_electrical_level() {
    // Button pressed: the pull-up is overridden and the pin reads low.
    let expectations = [
        PinTransaction::get(PinLevel::Low),
        PinTransaction::get(PinLevel::High),
    ];
    let mut button = ActiveLow::new(HalInput::new(PinMock::new(&expectations)));

    assert!(button.is_high().unwrap(), "low level means pressed");
    assert!(!button.is_high().unwrap(), "high level means released");

    button.into_inner().into_inner().done();
}

#[test]
fn pin_state_round_trips_through_bool() {
    assert_eq!(PinState::from(true), PinState::High);
    assert_eq!(PinState::from(false), PinState::Low);
    assert!(bool::from(PinState::High));
    assert!(!bool::from(PinState::Low));
}

/// Fake 10-bit timer channel; records raw duty writes.
struct FakeTimerChannel {
    max: u16,
    written: Vec<u16>,
}

impl embedded_hal::pwm::ErrorType for FakeTimerChannel {
    type Error = core::convert::Infallible;
}

impl embedded_hal::pwm::SetDutyCycle for FakeTimerChannel {
    fn max_duty_cycle(&self) -> u16 {
        self.max
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.written.push(duty);
        Ok(())
    }
}

#[test]
fn hal_pwm_scales_to_channel_resolution() {
    let mut ch = HalPwm::new(FakeTimerChannel {
        max: 1000,
        written: Vec::new(),
    });

    ch.set_duty(0).unwrap();
    ch.set_duty(255).unwrap();
    ch.set_duty(128).unwrap();

    let inner = ch.into_inner();
    // set_duty_cycle_fraction: duty * max / 255
    assert_eq!(inner.written, vec![0, 1000, 501]);
}
