//! Serial port transport for display communication.
//!
//! This module provides [`SerialTransport`], which implements the [`Transport`]
//! trait for USB-to-serial adapters and physical RS-232 links to the display.
//!
//! The display expects 9600 baud, 8 data bits, no parity and two stop bits,
//! which is what [`SerialConfig::default()`] produces.
//!
//! # Example
//!
//! ```no_run
//! use samvfd_transport::SerialTransport;
//! use samvfd_core::transport::Transport;
//!
//! # async fn example() -> samvfd_core::Result<()> {
//! let mut transport = SerialTransport::open("/dev/ttyUSB0", 9600).await?;
//!
//! // Reset the display.
//! let written = transport.write(&[0x1F]).await?;
//! assert_eq!(written, 1);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use samvfd_core::error::{Error, Result};
use samvfd_core::transport::Transport;
use tokio::io::AsyncWriteExt;
use tokio_serial::{SerialPortBuilderExt, SerialStream};

/// Default baud rate of the display.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Serial port configuration.
///
/// Defaults match the display's fixed line settings:
/// - 9600 baud
/// - 8 data bits
/// - 2 stop bits
/// - No parity
/// - No flow control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    /// Baud rate (the display ships at 9600)
    pub baud_rate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Number of stop bits (the display requires 2)
    pub stop_bits: StopBits,
    /// Parity checking (typically None)
    pub parity: Parity,
    /// Flow control (typically None)
    pub flow_control: FlowControl,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            data_bits: DataBits::Eight,
            stop_bits: StopBits::Two,
            parity: Parity::None,
            flow_control: FlowControl::None,
        }
    }
}

/// Number of data bits per character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataBits {
    Five,
    Six,
    Seven,
    Eight,
}

impl From<DataBits> for tokio_serial::DataBits {
    fn from(bits: DataBits) -> Self {
        match bits {
            DataBits::Five => tokio_serial::DataBits::Five,
            DataBits::Six => tokio_serial::DataBits::Six,
            DataBits::Seven => tokio_serial::DataBits::Seven,
            DataBits::Eight => tokio_serial::DataBits::Eight,
        }
    }
}

/// Number of stop bits per character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopBits {
    One,
    Two,
}

impl From<StopBits> for tokio_serial::StopBits {
    fn from(bits: StopBits) -> Self {
        match bits {
            StopBits::One => tokio_serial::StopBits::One,
            StopBits::Two => tokio_serial::StopBits::Two,
        }
    }
}

/// Parity checking mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    None,
    Odd,
    Even,
}

impl From<Parity> for tokio_serial::Parity {
    fn from(parity: Parity) -> Self {
        match parity {
            Parity::None => tokio_serial::Parity::None,
            Parity::Odd => tokio_serial::Parity::Odd,
            Parity::Even => tokio_serial::Parity::Even,
        }
    }
}

/// Flow control mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowControl {
    None,
    Software,
    Hardware,
}

impl From<FlowControl> for tokio_serial::FlowControl {
    fn from(flow: FlowControl) -> Self {
        match flow {
            FlowControl::None => tokio_serial::FlowControl::None,
            FlowControl::Software => tokio_serial::FlowControl::Software,
            FlowControl::Hardware => tokio_serial::FlowControl::Hardware,
        }
    }
}

/// Serial port transport for display communication.
///
/// Implements the [`Transport`] trait for USB-to-serial adapters and
/// physical RS-232 connections. The configuration is kept so the port can
/// be re-opened with [`Transport::reopen`].
pub struct SerialTransport {
    /// The underlying serial port stream
    port: Option<SerialStream>,
    /// Port name for logging/debugging
    port_name: String,
    config: SerialConfig,
}

impl SerialTransport {
    /// Open a serial port with the given baud rate and the display's default
    /// line settings (8N2, no flow control).
    ///
    /// # Arguments
    ///
    /// * `port` - Serial port path (e.g., "/dev/ttyUSB0" on Linux, "COM3" on Windows)
    /// * `baud_rate` - Baud rate (the display ships at 9600)
    pub async fn open(port: &str, baud_rate: u32) -> Result<Self> {
        let config = SerialConfig {
            baud_rate,
            ..Default::default()
        };
        Self::open_with_config(port, config).await
    }

    /// Open a serial port with full configuration control.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if the port cannot be opened.
    pub async fn open_with_config(port: &str, config: SerialConfig) -> Result<Self> {
        let stream = open_stream(port, &config)?;
        Ok(Self {
            port: Some(stream),
            port_name: port.to_string(),
            config,
        })
    }

    /// Get the name of the serial port.
    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    /// Get the line settings this port was opened with.
    pub fn config(&self) -> &SerialConfig {
        &self.config
    }
}

fn open_stream(port: &str, config: &SerialConfig) -> Result<SerialStream> {
    tracing::debug!(
        port = %port,
        baud_rate = config.baud_rate,
        data_bits = ?config.data_bits,
        stop_bits = ?config.stop_bits,
        parity = ?config.parity,
        flow_control = ?config.flow_control,
        "Opening serial port"
    );

    let stream = tokio_serial::new(port, config.baud_rate)
        .data_bits(config.data_bits.into())
        .stop_bits(config.stop_bits.into())
        .parity(config.parity.into())
        .flow_control(config.flow_control.into())
        .open_native_async()
        .map_err(|e| {
            tracing::error!(port = %port, error = %e, "Failed to open serial port");
            Error::Connection(format!("failed to open serial port {port}: {e}"))
        })?;

    tracing::info!(port = %port, baud_rate = config.baud_rate, "Serial port opened successfully");
    Ok(stream)
}

fn map_write_error(e: std::io::Error) -> Error {
    if e.kind() == std::io::ErrorKind::BrokenPipe || e.kind() == std::io::ErrorKind::NotConnected {
        Error::ConnectionLost
    } else {
        Error::Io(e)
    }
}

#[async_trait]
impl Transport for SerialTransport {
    async fn write(&mut self, data: &[u8]) -> Result<usize> {
        let port = self.port.as_mut().ok_or(Error::NotConnected)?;

        tracing::trace!(
            port = %self.port_name,
            bytes = data.len(),
            data = ?data,
            "Writing data"
        );

        // A single write call, so a partial write is reported to the caller
        // instead of being completed behind its back.
        let written = port.write(data).await.map_err(|e| {
            tracing::error!(port = %self.port_name, error = %e, "Failed to write data");
            map_write_error(e)
        })?;

        port.flush().await.map_err(|e| {
            tracing::error!(port = %self.port_name, error = %e, "Failed to flush serial port");
            map_write_error(e)
        })?;

        tracing::trace!(port = %self.port_name, written, "Data written");

        Ok(written)
    }

    async fn reopen(&mut self) -> Result<()> {
        if self.port.is_some() {
            self.close().await?;
        }
        let stream = open_stream(&self.port_name, &self.config)?;
        self.port = Some(stream);
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(mut port) = self.port.take() {
            tracing::debug!(port = %self.port_name, "Closing serial port");

            if let Err(e) = port.flush().await {
                tracing::warn!(
                    port = %self.port_name,
                    error = %e,
                    "Failed to flush before closing (continuing anyway)"
                );
            }

            tracing::info!(port = %self.port_name, "Serial port closed");
        }

        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.port.is_some()
    }
}

impl Drop for SerialTransport {
    fn drop(&mut self) {
        if self.port.is_some() {
            tracing::debug!(port = %self.port_name, "SerialTransport dropped, closing port");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serial_config_default_is_8n2_at_9600() {
        let config = SerialConfig::default();
        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.data_bits, DataBits::Eight);
        assert_eq!(config.stop_bits, StopBits::Two);
        assert_eq!(config.parity, Parity::None);
        assert_eq!(config.flow_control, FlowControl::None);
    }

    #[test]
    fn stop_bits_conversion() {
        assert_eq!(
            tokio_serial::StopBits::from(StopBits::Two),
            tokio_serial::StopBits::Two
        );
        assert_eq!(
            tokio_serial::StopBits::from(StopBits::One),
            tokio_serial::StopBits::One
        );
    }

    #[test]
    fn data_bits_and_parity_conversion() {
        assert_eq!(
            tokio_serial::DataBits::from(DataBits::Eight),
            tokio_serial::DataBits::Eight
        );
        assert_eq!(
            tokio_serial::Parity::from(Parity::Even),
            tokio_serial::Parity::Even
        );
        let _: tokio_serial::FlowControl = FlowControl::Hardware.into();
    }

    #[test]
    fn write_error_mapping() {
        let broken = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone");
        assert!(matches!(map_write_error(broken), Error::ConnectionLost));

        let other = std::io::Error::new(std::io::ErrorKind::Other, "weird");
        assert!(matches!(map_write_error(other), Error::Io(_)));
    }

    #[tokio::test]
    async fn open_missing_port_is_connection_error() {
        let result = SerialTransport::open("/dev/samvfd-does-not-exist", 9600).await;
        assert!(matches!(result, Err(Error::Connection(_))));
    }
}
