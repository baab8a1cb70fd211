#![feature(linkage)]
#![allow(internal_features)]
#![feature(core_intrinsics)]
//! # shadowrace-abi
//!
//! Weak-symbol bridge to two ThreadSanitizer runtime entry points.
//!
//! A build that links the real sanitizer runtime gets the runtime's strong
//! definitions of the mangled suppression symbols; a build that omits it gets
//! this crate's weak trap stubs instead of unresolved-symbol link errors.
//! Calling a stub terminates the process with a trap instruction: when the
//! runtime a caller assumed to exist is absent, crashing loudly beats handing
//! back a fabricated suppression context.
//!
//! # Architecture
//!
//! ```text
//! caller -> plain forwarder -> mangled symbol -> { strong runtime def | weak trap stub }
//! ```
//!
//! [`suppressions`] layers a safe Rust API over the forwarders.

pub mod suppression_abi;
pub mod suppressions;
