//! samvfd-core: Core traits and error definitions for samvfd.
//!
//! This crate holds the pieces shared by the display controller, the serial
//! transport, and the test harness, so none of them depends on the others.
//!
//! # Key types
//!
//! - [`Transport`] -- byte-level communication channel
//! - [`Error`] / [`Result`] -- error handling

pub mod error;
pub mod transport;

pub use error::{Error, Result};
pub use transport::Transport;
