//! Type system enforcement tests for the volume newtype.
//! The bounded scale prevents off-scale register writes at compile time.

use platform::audio_types::Volume;

// ── Construction ─────────────────────────────────────────────────────────────

#[test]
fn volume_new_clamps_over_max() {
    let v = Volume::new(200);
    assert_eq!(v.get(), 21, "Volume::new(200) should clamp to 21");
}

#[test]
fn volume_new_allows_bounds() {
    assert_eq!(Volume::new(0).get(), 0);
    assert_eq!(Volume::new(21).get(), 21);
}

#[test]
fn volume_try_new_rejects_over_max() {
    assert!(Volume::try_new(22).is_err());
    assert!(Volume::try_new(255).is_err());
}

#[test]
fn volume_try_new_accepts_valid_range() {
    assert!(Volume::try_new(0).is_ok());
    assert!(Volume::try_new(12).is_ok());
    assert!(Volume::try_new(21).is_ok());
}

#[test]
fn volume_is_one_byte() {
    assert_eq!(core::mem::size_of::<Volume>(), 1);
}

// ── Stepping ─────────────────────────────────────────────────────────────────

#[test]
fn volume_stepped_moves_within_bounds() {
    let v = Volume::new(10);
    assert_eq!(v.stepped(1).get(), 11);
    assert_eq!(v.stepped(-1).get(), 9);
}

#[test]
fn volume_stepped_clamps_at_top() {
    assert_eq!(Volume::MAX.stepped(1), Volume::MAX);
    assert_eq!(Volume::new(20).stepped(5), Volume::MAX);
}

#[test]
fn volume_stepped_clamps_at_zero() {
    assert_eq!(Volume::MIN.stepped(-1), Volume::MIN);
    assert_eq!(Volume::new(1).stepped(-5), Volume::MIN);
}

#[test]
fn volume_stepped_round_trip_off_boundary() {
    let v = Volume::new(7);
    assert_eq!(v.stepped(3).stepped(-3), v);
}

#[test]
fn volume_default_is_mid_scale() {
    assert_eq!(Volume::default(), Volume::DEFAULT);
    assert!(Volume::DEFAULT > Volume::MIN && Volume::DEFAULT < Volume::MAX);
}
