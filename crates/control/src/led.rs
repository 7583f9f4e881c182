//! LED feedback engine — priority-layered animation renderer.
//!
//! Each render tick resolves an explicit, ordered list of overlay candidates
//! and falls through to the steady-state pattern for the current player
//! state. Only one layer is ever visible:
//!
//! 1. volume flash (highest, ~200 ms)
//! 2. track-color announcement (~1.5 s)
//! 3. steady-state animation (state-dependent, lowest)
//!
//! Overlay expiry is pure timestamp comparison, checked every tick.
//! Re-triggering an active overlay restarts its window; it never stacks.

use embassy_time::Instant;

use platform::Rgb;

use crate::config::{TRACK_ANNOUNCE_DURATION, VOLUME_FLASH_DURATION};
use crate::player::PlayerState;

/// Fixed color of the volume-flash overlay.
pub const VOLUME_FLASH_COLOR: Rgb = Rgb::new(255, 255, 255);

/// Dim steady color for Idle/Paused (low-power-friendly).
pub const STANDBY_COLOR: Rgb = Rgb::new(14, 6, 0);

/// Error pulse channel color.
pub const ERROR_COLOR: Rgb = Rgb::new(255, 0, 0);

/// Breathing animation brightness floor.
pub const BREATH_MIN: u8 = 40;

/// Breathing animation brightness ceiling.
pub const BREATH_MAX: u8 = 255;

/// Breathing brightness period.
pub const BREATH_PERIOD_MS: u32 = 3000;

/// Hue rotation period while playing.
pub const HUE_PERIOD_MS: u32 = 12_000;

/// Error pulse period — noticeably faster than breathing.
pub const ERROR_PULSE_PERIOD_MS: u32 = 500;

/// Overlay candidates in priority order; the first active one renders.
const OVERLAY_PRIORITY: [OverlaySlot; 2] = [OverlaySlot::VolumeFlash, OverlaySlot::TrackAnnounce];

#[derive(Debug, Clone, Copy)]
enum OverlaySlot {
    VolumeFlash,
    TrackAnnounce,
}

/// Renders the status LED from player state plus transient overlays.
#[derive(Debug)]
pub struct LedRenderer {
    flash_until: Option<Instant>,
    announce: Option<(Rgb, Instant)>,
    phase_ms: u32,
    last_tick: Option<Instant>,
}

impl LedRenderer {
    /// Create a renderer with no overlays and the animation phase at zero.
    pub fn new() -> Self {
        Self {
            flash_until: None,
            announce: None,
            phase_ms: 0,
            last_tick: None,
        }
    }

    /// Arm (or re-arm) the volume-flash overlay.
    pub fn flash_volume(&mut self, now: Instant) {
        self.flash_until = Some(now + VOLUME_FLASH_DURATION);
    }

    /// Arm (or re-arm) the track-color announcement overlay.
    pub fn announce_track(&mut self, color: Rgb, now: Instant) {
        self.announce = Some((color, now + TRACK_ANNOUNCE_DURATION));
    }

    /// Forget tick history across a sleep period so the animation does not
    /// leap forward on wake.
    pub fn suspend(&mut self) {
        self.last_tick = None;
    }

    /// Render one frame for the current state.
    pub fn tick(&mut self, state: PlayerState, now: Instant) -> Rgb {
        let delta = self
            .last_tick
            .map_or(0, |t| saturating_ms(now, t));
        self.last_tick = Some(now);
        self.phase_ms = self.phase_ms.wrapping_add(delta);

        if let Some(color) = self.resolve_overlays(now) {
            return color;
        }

        match state {
            PlayerState::Playing => {
                let breadth = u16::from(BREATH_MAX.saturating_sub(BREATH_MIN));
                let wave = u16::from(sine01(self.phase_ms, BREATH_PERIOD_MS));
                // wave * breadth / 255 <= breadth, so the sum stays in u8 range.
                #[allow(clippy::cast_possible_truncation, clippy::arithmetic_side_effects)]
                let brightness = BREATH_MIN.saturating_add((wave * breadth / 255) as u8);
                hue_wheel(self.phase_ms, HUE_PERIOD_MS).scaled(brightness)
            }
            PlayerState::Idle | PlayerState::Paused => STANDBY_COLOR,
            PlayerState::Error => ERROR_COLOR.scaled(sine01(self.phase_ms, ERROR_PULSE_PERIOD_MS)),
        }
    }

    /// Walk the candidates in priority order; first active one wins.
    fn resolve_overlays(&mut self, now: Instant) -> Option<Rgb> {
        for slot in OVERLAY_PRIORITY {
            match slot {
                OverlaySlot::VolumeFlash => {
                    if let Some(until) = self.flash_until {
                        if now < until {
                            return Some(VOLUME_FLASH_COLOR);
                        }
                        self.flash_until = None;
                    }
                }
                OverlaySlot::TrackAnnounce => {
                    if let Some((color, until)) = self.announce {
                        if now < until {
                            return Some(color);
                        }
                        self.announce = None;
                        // Restart the animation from phase zero so the
                        // steady pattern does not jump mid-cycle.
                        self.phase_ms = 0;
                    }
                }
            }
        }
        None
    }
}

impl Default for LedRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn saturating_ms(now: Instant, earlier: Instant) -> u32 {
    let ms = now.duration_since(earlier).as_millis();
    u32::try_from(ms).unwrap_or(u32::MAX)
}

/// Quarter-wave sine lookup, `round(255 * sin(90° * i / 16))`.
const QUARTER_SINE: [u8; 17] = [
    0, 25, 50, 74, 98, 120, 142, 162, 180, 197, 212, 225, 236, 244, 250, 254, 255,
];

/// Sinusoidal brightness envelope: 0 → 255 → 0 over `period_ms`, from a
/// quarter-wave table mirrored over 32 steps. Integer-only; no libm.
fn sine01(phase_ms: u32, period_ms: u32) -> u8 {
    debug_assert!(period_ms > 0);
    let pos = phase_ms.checked_rem(period_ms).unwrap_or(0);
    #[allow(clippy::cast_possible_truncation, clippy::arithmetic_side_effects)]
    let step = ((u64::from(pos) * 32) / u64::from(period_ms)) as u32; // 0..=31
    let idx = if step <= 16 { step } else { 32u32.saturating_sub(step) };
    QUARTER_SINE.get(idx as usize).copied().unwrap_or(255)
}

/// Slow hue rotation over the classic 768-position color wheel.
fn hue_wheel(phase_ms: u32, period_ms: u32) -> Rgb {
    debug_assert!(period_ms > 0);
    let pos = phase_ms.checked_rem(period_ms).unwrap_or(0);
    #[allow(clippy::cast_possible_truncation, clippy::arithmetic_side_effects)]
    let wheel = ((u64::from(pos) * 768) / u64::from(period_ms)) as u32; // 0..=767
    #[allow(clippy::cast_possible_truncation, clippy::arithmetic_side_effects)]
    let offset = (wheel % 256) as u8;
    match wheel / 256 {
        0 => Rgb::new(255u8.wrapping_sub(offset), offset, 0),
        1 => Rgb::new(0, 255u8.wrapping_sub(offset), offset),
        _ => Rgb::new(offset, 0, 255u8.wrapping_sub(offset)),
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::arithmetic_side_effects
)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Instant {
        Instant::from_millis(v)
    }

    #[test]
    fn steady_standby_when_idle_or_paused() {
        let mut leds = LedRenderer::new();
        assert_eq!(leds.tick(PlayerState::Idle, ms(0)), STANDBY_COLOR);
        assert_eq!(leds.tick(PlayerState::Paused, ms(50)), STANDBY_COLOR);
    }

    #[test]
    fn error_pulse_is_single_channel() {
        let mut leds = LedRenderer::new();
        for t in (0..2000).step_by(50) {
            let c = leds.tick(PlayerState::Error, ms(t));
            assert_eq!(c.g, 0);
            assert_eq!(c.b, 0);
        }
    }

    #[test]
    fn error_pulse_brightness_varies() {
        let mut leds = LedRenderer::new();
        let mut seen = std::collections::BTreeSet::new();
        for t in (0..500).step_by(50) {
            seen.insert(leds.tick(PlayerState::Error, ms(t)).r);
        }
        assert!(seen.len() > 2, "pulse should sweep brightness: {seen:?}");
    }

    #[test]
    fn breathing_stays_within_envelope() {
        let mut leds = LedRenderer::new();
        for t in (0..6000).step_by(50) {
            let c = leds.tick(PlayerState::Playing, ms(t));
            let peak = c.r.max(c.g).max(c.b);
            assert!(peak <= BREATH_MAX);
            // At least one channel carries the envelope brightness.
            assert!(peak > 0);
        }
    }

    #[test]
    fn volume_flash_takes_priority_over_announce() {
        let mut leds = LedRenderer::new();
        leds.announce_track(Rgb::new(0, 255, 0), ms(0));
        leds.flash_volume(ms(10));
        assert_eq!(leds.tick(PlayerState::Playing, ms(20)), VOLUME_FLASH_COLOR);
    }

    #[test]
    fn announce_resumes_after_flash_expires() {
        let mut leds = LedRenderer::new();
        let green = Rgb::new(0, 255, 0);
        leds.announce_track(green, ms(0));
        leds.flash_volume(ms(10)); // expires at 210
        assert_eq!(leds.tick(PlayerState::Playing, ms(100)), VOLUME_FLASH_COLOR);
        // Flash gone, announcement still inside its 1.5 s window.
        assert_eq!(leds.tick(PlayerState::Playing, ms(300)), green);
    }

    #[test]
    fn steady_state_resumes_after_both_expire() {
        let mut leds = LedRenderer::new();
        leds.announce_track(Rgb::new(0, 255, 0), ms(0)); // expires at 1500
        assert_eq!(leds.tick(PlayerState::Idle, ms(1600)), STANDBY_COLOR);
    }

    #[test]
    fn announce_expiry_resets_animation_phase() {
        let mut leds = LedRenderer::new();
        leds.announce_track(Rgb::new(0, 255, 0), ms(0));
        let _ = leds.tick(PlayerState::Playing, ms(1000));
        let _ = leds.tick(PlayerState::Playing, ms(1600)); // announce expires here
        assert_eq!(leds.phase_ms, 0);
    }

    #[test]
    fn retrigger_restarts_the_flash_window() {
        let mut leds = LedRenderer::new();
        leds.flash_volume(ms(0)); // would expire at 200
        leds.flash_volume(ms(150)); // restarted: expires at 350
        assert_eq!(leds.tick(PlayerState::Idle, ms(300)), VOLUME_FLASH_COLOR);
        assert_eq!(leds.tick(PlayerState::Idle, ms(400)), STANDBY_COLOR);
    }

    #[test]
    fn sine01_covers_full_range() {
        assert_eq!(sine01(0, 1000), 0);
        assert_eq!(sine01(500, 1000), 255);
        assert!(sine01(999, 1000) < 30);
    }
}
