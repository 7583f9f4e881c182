//! Emberbox firmware application layer
//!
//! Wires the control core to a concrete board. The in-tree board is the
//! desktop simulator ([`sim`]): storage backed by a host directory, a
//! playback engine that counts wall-clock time against a fixed track
//! length, and pins driven by a scripted user session. A hardware board
//! binds the same [`platform`] traits through `platform::hal` adapters.
//!
//! # Running the simulator
//!
//! ```bash
//! cargo run -p firmware --bin emberbox -- ./media
//! ```
//!
//! `./media/music/01.mp3 … 09.mp3` is the expected track layout; missing
//! files exercise the fallback search, a missing directory exercises the
//! startup error path.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(unsafe_op_in_unsafe_fn)]
// Pedantic lints too noisy for application code:
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod sim;

pub use sim::{SimBoard, SimEngine, SimStorage};
