//! Emberbox control core
//!
//! A cooperative, single-threaded control loop for a battery-operated music
//! box: one rotary encoder with a push-button in, one RGB status LED out,
//! playback commands to a black-box audio engine in between.
//!
//! # Architecture
//!
//! ```text
//! pin levels → debounce → gesture → player FSM → audio engine commands
//!                                       ↓
//!                              LED feedback engine → PWM duties
//!                                       ↓
//!                              sleep controller (idle/wake)
//! ```
//!
//! Everything is owned by a single [`Controller`] aggregate threaded through
//! each loop iteration — no globals, no locking, no allocation. All timeouts
//! are monotonic [`embassy_time::Instant`] comparisons; the only deliberate
//! wait in the system is the coarse 50 ms poll while asleep, which lives in
//! the loop driver, not here.

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
// Pedantic lints suppressed for this crate:
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod catalog;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod gesture;
pub mod led;
pub mod player;
pub mod sleep;

pub use catalog::{Catalog, Track, TrackId};
pub use controller::Controller;
pub use debounce::{DebouncedLine, Edge};
pub use gesture::{Gesture, GestureDecoder, InputSample};
pub use led::LedRenderer;
pub use player::{Player, PlayerState};
pub use sleep::SleepController;
