//! SamVfdBuilder -- fluent builder for constructing [`SamVfd`] instances.
//!
//! Separates configuration from construction so that callers can set up
//! serial port parameters, the reset settle delay, and the logging span
//! before establishing the transport connection.
//!
//! # Example
//!
//! ```no_run
//! use samvfd::builder::SamVfdBuilder;
//!
//! # async fn example() -> samvfd_core::Result<()> {
//! let vfd = SamVfdBuilder::new()
//!     .serial_port("/dev/ttyUSB0")
//!     .baud_rate(9600)
//!     .build()
//!     .await?;
//! vfd.reset().await?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use tracing::Span;

use samvfd_core::error::{Error, Result};
use samvfd_core::transport::Transport;
use samvfd_transport::{SerialConfig, SerialTransport, StopBits};

use crate::commands::RESET_SETTLE_DELAY;
use crate::controller::SamVfd;

/// Fluent builder for [`SamVfd`].
///
/// Defaults: 9600 baud, two stop bits, 10 ms reset settle delay, and a
/// `samvfd` debug span for the controller's log events.
#[derive(Debug)]
pub struct SamVfdBuilder {
    serial_port: Option<String>,
    serial_config: SerialConfig,
    reset_settle_delay: Duration,
    span: Option<Span>,
}

impl SamVfdBuilder {
    pub fn new() -> Self {
        SamVfdBuilder {
            serial_port: None,
            serial_config: SerialConfig::default(),
            reset_settle_delay: RESET_SETTLE_DELAY,
            span: None,
        }
    }

    /// Set the serial port path (e.g. `/dev/ttyUSB0` or `COM3`).
    pub fn serial_port(mut self, port: &str) -> Self {
        self.serial_port = Some(port.to_string());
        self
    }

    /// Override the default baud rate (9600).
    pub fn baud_rate(mut self, baud: u32) -> Self {
        self.serial_config.baud_rate = baud;
        self
    }

    /// Override the default stop bits (two).
    pub fn stop_bits(mut self, stop_bits: StopBits) -> Self {
        self.serial_config.stop_bits = stop_bits;
        self
    }

    /// Wait longer than the 10 ms minimum after each reset.
    ///
    /// Values below the minimum are raised to it.
    pub fn reset_settle_delay(mut self, delay: Duration) -> Self {
        self.reset_settle_delay = delay.max(RESET_SETTLE_DELAY);
        self
    }

    /// Set the span every controller log event is recorded under.
    ///
    /// Pass [`Span::none()`] to silence the controller entirely.
    pub fn span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Build a [`SamVfd`] with a caller-provided transport.
    ///
    /// This is the primary entry point for testing (pass a `MockTransport`
    /// from `samvfd-test-harness`) and for custom links.
    pub async fn build_with_transport(self, transport: Box<dyn Transport>) -> Result<SamVfd> {
        let span = self
            .span
            .unwrap_or_else(|| tracing::debug_span!("samvfd"));
        Ok(SamVfd::new(transport, self.reset_settle_delay, span))
    }

    /// Build a [`SamVfd`] on a freshly opened serial port.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if no serial port was set, and
    /// [`Error::Connection`] if the port cannot be opened.
    pub async fn build(mut self) -> Result<SamVfd> {
        let port = self
            .serial_port
            .take()
            .ok_or_else(|| Error::InvalidParameter("serial_port is required for build()".into()))?;

        let transport = SerialTransport::open_with_config(&port, self.serial_config.clone()).await?;
        if self.span.is_none() {
            self.span = Some(tracing::debug_span!("samvfd", port = %port));
        }
        self.build_with_transport(Box::new(transport)).await
    }
}

impl Default for SamVfdBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use samvfd_test_harness::MockTransport;

    #[tokio::test]
    async fn builder_defaults() {
        let vfd = SamVfdBuilder::new()
            .build_with_transport(Box::new(MockTransport::new()))
            .await
            .unwrap();
        assert_eq!(vfd.reset_settle_delay(), Duration::from_millis(10));
        assert!(vfd.is_connected().await);
    }

    #[tokio::test]
    async fn builder_custom_settle_delay() {
        let vfd = SamVfdBuilder::new()
            .reset_settle_delay(Duration::from_millis(50))
            .span(Span::none())
            .build_with_transport(Box::new(MockTransport::new()))
            .await
            .unwrap();
        assert_eq!(vfd.reset_settle_delay(), Duration::from_millis(50));
    }

    #[tokio::test]
    async fn builder_settle_delay_has_floor() {
        let vfd = SamVfdBuilder::new()
            .reset_settle_delay(Duration::ZERO)
            .build_with_transport(Box::new(MockTransport::new()))
            .await
            .unwrap();
        assert_eq!(vfd.reset_settle_delay(), RESET_SETTLE_DELAY);
    }

    #[test]
    fn builder_serial_settings() {
        let builder = SamVfdBuilder::new()
            .serial_port("/dev/ttyUSB0")
            .baud_rate(19_200)
            .stop_bits(StopBits::One);
        assert_eq!(builder.serial_port.as_deref(), Some("/dev/ttyUSB0"));
        assert_eq!(builder.serial_config.baud_rate, 19_200);
        assert_eq!(builder.serial_config.stop_bits, StopBits::One);
    }

    #[tokio::test]
    async fn builder_serial_port_required_for_build() {
        let result = SamVfdBuilder::new().build().await;
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
    }

    #[tokio::test]
    async fn builder_missing_port_is_connection_error() {
        let result = SamVfdBuilder::new()
            .serial_port("/dev/samvfd-does-not-exist")
            .build()
            .await;
        assert!(matches!(result, Err(Error::Connection(_))));
    }

    #[tokio::test]
    async fn builder_drives_mock_end_to_end() {
        let mock = MockTransport::new();
        let vfd = SamVfdBuilder::new()
            .build_with_transport(Box::new(mock.clone()))
            .await
            .unwrap();
        vfd.reset().await.unwrap();
        vfd.set_position(0, 1).await.unwrap();
        assert_eq!(mock.sent_bytes(), vec![0x1F, 0x10, 20]);
    }
}
