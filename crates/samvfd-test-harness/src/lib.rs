//! samvfd-test-harness: Test utilities for samvfd.
//!
//! This crate provides [`MockTransport`] for deterministic unit testing of
//! the display controller without a real display attached.

pub mod mock_serial;

pub use mock_serial::MockTransport;
