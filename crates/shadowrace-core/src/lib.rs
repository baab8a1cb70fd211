//! # shadowrace-core
//!
//! Replays recovered panics in a shadow thread so that global state changed
//! before the panic shows up as a data race under a race detector.
//!
//! Wrap a function with [`wrap_fn`] or [`wrap_fn_r`]. When a panic from the
//! wrapped function is caught and handed to [`wrap_recover`], the function is
//! re-executed in a shadow thread that was spawned *before* the first run.
//! The two executions never overlap in time, but the replay order travels
//! over relaxed atomics the detector cannot see a happens-before edge in, so
//! re-applied writes to shared state are reported as races.
//!
//! Divergence between the original run and the replay (no panic, no recover,
//! multiple recovers, a different payload) is reported through [`report`].

#![deny(unsafe_code)]

mod frame;
mod relay;
pub mod report;
pub mod suppressions;
mod wrap;

pub use report::{Finding, with_capture};
pub use wrap::{Payload, wrap_fn, wrap_fn_r, wrap_recover};
