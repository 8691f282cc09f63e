//! Nullable infrastructure for deterministic testing.
//!
//! External dependencies of the election core are abstracted behind traits
//! in `ballot-types`. This crate provides test-friendly implementations that
//! return deterministic values, can be steered programmatically, and never
//! touch the operating system.

pub mod clock;

pub use clock::NullClock;
