//! Transport trait for display communication.
//!
//! The [`Transport`] trait abstracts over the physical link to the display.
//! The display protocol is an open-loop byte stream with no framing or
//! acknowledgment, so the only data-path operation is [`write`](Transport::write).
//!
//! The controller in the `samvfd` crate operates on a `Transport` rather than
//! directly on a serial port, enabling both real hardware control and
//! deterministic unit testing with `MockTransport` from the
//! `samvfd-test-harness` crate.

use async_trait::async_trait;

use crate::error::Result;

/// Asynchronous byte-level transport to a display.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Write raw bytes to the display.
    ///
    /// Returns the number of bytes the underlying link actually accepted,
    /// which may be fewer than `data.len()`. Callers detect short writes by
    /// comparing the two; implementations must not retry on their own.
    async fn write(&mut self, data: &[u8]) -> Result<usize>;

    /// Open the connection again, closing it first if it is still open.
    ///
    /// Returns [`Error::Connection`](crate::error::Error::Connection) if the
    /// link cannot be opened.
    async fn reopen(&mut self) -> Result<()>;

    /// Close the transport connection.
    ///
    /// After calling `close()`, subsequent `write()` calls should return
    /// [`Error::NotConnected`](crate::error::Error::NotConnected).
    async fn close(&mut self) -> Result<()>;

    /// Check whether the transport is currently connected.
    fn is_connected(&self) -> bool;
}
