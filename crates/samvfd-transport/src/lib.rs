//! Transport implementations for samvfd.
//!
//! This crate provides [`SerialTransport`], the concrete implementation of
//! the [`Transport`](samvfd_core::Transport) trait from `samvfd-core` for
//! serial-attached displays.
//!
//! # Example
//!
//! ```no_run
//! use samvfd_transport::SerialTransport;
//! use samvfd_core::transport::Transport;
//!
//! # async fn example() -> samvfd_core::Result<()> {
//! let mut transport = SerialTransport::open("/dev/ttyUSB0", 9600).await?;
//! transport.write(&[0x1F]).await?;
//! transport.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod serial;

pub use serial::{
    DataBits, FlowControl, Parity, SerialConfig, SerialTransport, StopBits, DEFAULT_BAUD_RATE,
};
