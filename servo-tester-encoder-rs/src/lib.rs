//! Interrupt-safe decoder for a two-pin mechanical rotary encoder.
//!
//! This crate turns raw CLK/DT edge activity into a signed, unbounded
//! detent count that a polling loop can read at any cadence.
//!
//! # Architecture
//!
//! The crate is split into three layers:
//!
//! - **`transitions`** (crate-private): the Gray-code state table. Pure
//!   data, no hardware and no synchronisation.
//! - **[`QuadratureDecoder`]** (public): owns the [`EncoderState`] behind a
//!   critical-section mutex. [`on_edge()`](QuadratureDecoder::on_edge) is
//!   called from interrupt context, [`position()`](QuadratureDecoder::position)
//!   from anywhere.
//! - **[`watch_edges`]** (public): async loop that waits for an edge on
//!   either pin via [`embedded_hal_async::digital::Wait`], samples both
//!   levels, and feeds the decoder. Run it on a high-priority
//!   interrupt executor so it preempts the main loop.
//!
//! # Quick start
//!
//! ```no_run
//! use quadrature_encoder::{watch_edges, Direction, QuadratureDecoder};
//!
//! static ENCODER: QuadratureDecoder = QuadratureDecoder::new(Direction::Normal);
//!
//! # async fn task<P>(mut clk: P, mut dt: P)
//! # where P: embedded_hal::digital::InputPin + embedded_hal_async::digital::Wait {
//! // Interrupt-priority task: never returns unless a pin read fails.
//! let _ = watch_edges(&mut clk, &mut dt, &ENCODER).await;
//! # }
//!
//! // Main loop: diff successive snapshots.
//! let last = ENCODER.position();
//! let delta = ENCODER.position().wrapping_sub(last);
//! # let _ = delta;
//! ```
//!
//! # Features
//!
//! - **`defmt`**: Enable [`defmt::Format`] implementations on public types
//!   for embedded logging.

#![no_std]

pub use decoder::{Direction, EncoderState, PinLevels, QuadratureDecoder};
pub use error::EncoderError;
pub use transitions::Phase;
pub use watcher::watch_edges;

mod decoder;
mod error;
mod transitions;
mod watcher;
