//! Hardware Abstraction Layer (HAL) for the Emberbox music box
//!
//! This crate provides trait-based abstractions for every collaborator the
//! control core talks to, enabling development and testing without physical
//! hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Application Layer (firmware crate)
//!         ↓
//! Control Core (control crate)
//!         ↓
//! Platform HAL (this crate - trait abstractions)
//!         ↓
//! Hardware Layer (board HAL / host simulator)
//! ```
//!
//! # Abstraction Levels
//!
//! - [`AudioEngine`] - black-box playback engine (connect / stop / volume)
//! - [`Storage`] - removable-storage existence queries
//! - [`DigitalInput`] / [`PwmChannel`] - pin-level I/O
//! - [`Volume`] - bounded volume newtype shared across the stack
//!
//! # Features
//!
//! - `std`: expose the mock peripherals outside of `cfg(test)`
//! - `defmt`: enable defmt `Format` derives on all platform types

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
// Pedantic lints suppressed for this HAL crate:
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)] // hardware accessors — callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod audio;
pub mod audio_types;
pub mod config;
pub mod gpio;
pub mod hal;
pub mod storage;

#[cfg(any(test, feature = "std"))]
pub mod mocks;

// Re-export main high-level traits
pub use audio::{AudioEngine, FaultReason, Notification};
pub use storage::Storage;

// Re-export pin-level types
pub use gpio::{DigitalInput, PinState, PwmChannel, Rgb};
pub use hal::ActiveLow;

// Re-export domain newtypes
pub use audio_types::{OutOfRangeError, Volume};
