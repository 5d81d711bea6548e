//! Signal types and the sampling contract.
//!
//! This module provides the core abstractions used throughout the library:
//! - `Signal` trait for every continuous-time signal
//! - `sample` for bounds-checked queries
//! - `FnSignal` / `make_signal` for signals built from a closure

mod signal;
mod function;

pub use signal::{BoxedSignal, Frame, Signal, channel_count, sample};
pub use function::{FnSignal, make_signal};
