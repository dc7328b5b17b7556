//! Two LED keypad games for a Pico with a 4×3 key matrix and a 12-LED WS2812 strip.
//!
//! - **Sequence recall** ([`game::sequence`]): one key lights red at a time along a fixed path.
//!   Press it before its step runs out. Ten levels, each faster.
//! - **Speed push** ([`game::speed_push`]): six random keys light red. Clear them all as fast as
//!   you can without pressing a white key.
//!
//! # Layers
//!
//! - [`matrix`]: drives columns, samples rows, reports key presses.
//! - [`keymap`]: `(column, row)` ↔ key slot ↔ LED index.
//! - [`led_strip`]: the 12-LED frame and the transport that sends it.
//! - [`display`]: banner and result screens.
//! - [`game`]: the two rule sets and the engines that run them.
//! - `board`: Pico wiring (device builds only).
//!
//! # Glossary
//!
//! - **Armed**: lit red, waiting to be pressed.
//! - **Idle**: lit white.
//! - **PIO ([Programmable I/O](https://medium.com/data-science/nine-pico-pio-wats-with-rust-part-1-9d062067dc25)):**
//!   drives the WS2812 strip. Pico 1 has 2, Pico 2 has 3.
//! - **DMA ([Direct Memory Access](https://en.wikipedia.org/wiki/Direct_memory_access)):** feeds
//!   the PIO without the CPU.
#![cfg_attr(not(feature = "host"), no_std)]
#![allow(async_fn_in_trait, reason = "single-threaded embedded")]

// Compile-time checks: exactly one board must be selected (unless testing with host feature)
#[cfg(all(not(any(feature = "pico1", feature = "pico2")), not(feature = "host")))]
compile_error!("Must enable exactly one board feature: 'pico1' or 'pico2'");

#[cfg(all(feature = "pico1", feature = "pico2"))]
compile_error!("Cannot enable both 'pico1' and 'pico2' features simultaneously");

#[cfg(all(not(feature = "arm"), not(feature = "host")))]
compile_error!("Device builds need the 'arm' feature");

pub(crate) mod fmt;

#[cfg(not(feature = "host"))]
pub mod board;
pub mod clock;
pub mod config;
pub mod display;
mod error;
pub mod game;
pub mod keymap;
pub mod led_strip;
pub mod matrix;

// Re-export error types and result (used throughout)
pub use crate::error::{Error, Result};
