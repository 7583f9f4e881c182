//! Control loop timing constants.
//!
//! Reference values for the target hardware; boards with stiffer encoders or
//! softer switches tune these in one place.

use embassy_time::Duration;

/// Debounce window for the encoder phase lines. Rotary detents bounce for a
/// millisecond or two at most.
pub const ENCODER_DEBOUNCE_WINDOW: Duration = Duration::from_millis(5);

/// Debounce window for the push-button. Mechanical bounce on a push switch
/// is longer-lived than on a rotary detent.
pub const BUTTON_DEBOUNCE_WINDOW: Duration = Duration::from_millis(50);

/// Hold duration after which a press becomes a long press.
pub const LONG_PRESS_THRESHOLD: Duration = Duration::from_millis(500);

/// How long the volume-flash overlay stays visible.
pub const VOLUME_FLASH_DURATION: Duration = Duration::from_millis(200);

/// How long the track-color announcement overlay stays visible.
pub const TRACK_ANNOUNCE_DURATION: Duration = Duration::from_millis(1500);

/// Loop poll interval while awake. Must stay well under the encoder
/// debounce window or fast detents are lost.
pub const AWAKE_POLL_INTERVAL: Duration = Duration::from_millis(2);

/// Coarse poll interval while asleep — the one deliberate low-power wait.
pub const SLEEP_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Without input for this long in Idle/Paused, the box goes back to sleep.
pub const IDLE_SLEEP_TIMEOUT: Duration = Duration::from_secs(10);
