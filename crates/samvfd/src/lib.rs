//! Command encoder and controller for serial 2x20 vacuum-fluorescent displays.
//!
//! This crate speaks the single-byte command protocol of Samsung-style VFD
//! modules (20 columns, 2 rows, 9600 baud, 8N2). It provides:
//!
//! - **Command catalog** ([`commands`]) -- the command bytes, the legal
//!   values of every parameter (cursor mode, dim level, display mode, font),
//!   position arithmetic, custom glyph validation, and pure builders that
//!   produce the exact wire bytes for each operation.
//! - **Controller** ([`controller`]) -- [`SamVfd`], which validates each
//!   operation and only then writes its bytes to a
//!   [`Transport`](samvfd_core::Transport).
//! - **Builder** ([`builder`]) -- fluent builder API for constructing
//!   [`SamVfd`] instances on a serial port or a caller-provided transport.
//!
//! # Example
//!
//! ```
//! use samvfd::commands::{cmd_set_dim_level, cmd_set_position, DimLevel, Position};
//!
//! assert_eq!(cmd_set_dim_level(DimLevel::Percent60), vec![0x04, 0x60]);
//!
//! let pos = Position::new(3, 1).unwrap();
//! assert_eq!(cmd_set_position(pos), vec![0x10, 23]);
//!
//! // Row 2 does not exist on a two-row display.
//! assert!(Position::new(0, 2).is_err());
//! ```

pub mod builder;
pub mod commands;
pub mod controller;

pub use builder::SamVfdBuilder;
pub use commands::{CursorMode, CustomGlyph, DimLevel, DisplayMode, Font, Position};
pub use controller::SamVfd;
pub use samvfd_core::{Error, Result, Transport};
