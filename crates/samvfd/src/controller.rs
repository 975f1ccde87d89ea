//! SamVfd -- the controller that turns display operations into bytes.
//!
//! This module ties the command catalog ([`commands`]) to a [`Transport`].
//! Every operation validates its arguments first and only then writes. A
//! rejected operation writes nothing.
//!
//! The transport sits behind a [`tokio::sync::Mutex`] that each operation
//! holds for its whole byte sequence, so a `SamVfd` shared between tasks
//! never interleaves two commands on the wire.

use std::time::Duration;

use tokio::sync::Mutex;
use tracing::Span;

use samvfd_core::error::{Error, Result};
use samvfd_core::transport::Transport;

use crate::commands::{
    self, CursorMode, CustomGlyph, DimLevel, DisplayMode, Font, Position, RESET_SETTLE_DELAY,
};

/// A connected display.
///
/// Constructed via [`SamVfdBuilder`](crate::builder::SamVfdBuilder). All
/// display communication goes through the [`Transport`] provided at build
/// time. The controller keeps no record of the modes it has set.
pub struct SamVfd {
    transport: Mutex<Box<dyn Transport>>,
    reset_settle_delay: Duration,
    span: Span,
}

impl SamVfd {
    /// Create a new `SamVfd` from its constituent parts.
    ///
    /// This is called by [`SamVfdBuilder`](crate::builder::SamVfdBuilder);
    /// callers should use the builder API instead.
    pub(crate) fn new(
        transport: Box<dyn Transport>,
        reset_settle_delay: Duration,
        span: Span,
    ) -> Self {
        SamVfd {
            transport: Mutex::new(transport),
            reset_settle_delay: reset_settle_delay.max(RESET_SETTLE_DELAY),
            span,
        }
    }

    /// The wait applied after every reset.
    pub fn reset_settle_delay(&self) -> Duration {
        self.reset_settle_delay
    }

    /// Reset the display and wait for it to settle.
    ///
    /// Does not return until the settle delay (at least 10 ms) has elapsed.
    /// The transport stays locked during the wait so no other command can
    /// reach the display before it is ready.
    pub async fn reset(&self) -> Result<()> {
        tracing::debug!(parent: &self.span, "reset");
        let mut transport = self.transport.lock().await;
        self.write_commands(&mut **transport, &commands::cmd_reset()).await?;
        tokio::time::sleep(self.reset_settle_delay).await;
        Ok(())
    }

    /// Set the cursor to on, off, or blinking.
    ///
    /// Accepts a [`CursorMode`] or a raw byte. A byte that is not a cursor
    /// mode code fails with [`Error::InvalidParameter`].
    pub async fn set_cursor_mode<M>(&self, mode: M) -> Result<()>
    where
        M: TryInto<CursorMode>,
        Error: From<M::Error>,
    {
        let mode = self.validated(mode.try_into(), "set_cursor_mode")?;
        tracing::debug!(parent: &self.span, %mode, code = mode.code(), "set_cursor_mode");
        self.emit_commands(&commands::cmd_set_cursor_mode(mode)).await
    }

    /// Set the display brightness.
    ///
    /// Accepts a [`DimLevel`] or a raw byte. Either both bytes of the command
    /// go out or, for an unknown level, neither does.
    pub async fn set_dim_level<L>(&self, level: L) -> Result<()>
    where
        L: TryInto<DimLevel>,
        Error: From<L::Error>,
    {
        let level = self.validated(level.try_into(), "set_dim_level")?;
        tracing::debug!(parent: &self.span, %level, code = level.code(), "set_dim_level");
        self.emit_commands(&commands::cmd_set_dim_level(level)).await
    }

    /// Set the whole-display write mode.
    pub async fn set_display_mode<M>(&self, mode: M) -> Result<()>
    where
        M: TryInto<DisplayMode>,
        Error: From<M::Error>,
    {
        let mode = self.validated(mode.try_into(), "set_display_mode")?;
        tracing::debug!(parent: &self.span, %mode, code = mode.code(), "set_display_mode");
        self.emit_commands(&commands::cmd_set_display_mode(mode)).await
    }

    /// Move the cursor to `(col, row)`.
    ///
    /// Only the composite index `row * 20 + col` is checked; it must be in
    /// `0..40`, otherwise [`Error::InvalidPosition`] is returned.
    pub async fn set_position(&self, col: i32, row: i32) -> Result<()> {
        tracing::debug!(parent: &self.span, col, row, "set_position");
        let position = self.validated(Position::new(col, row), "set_position")?;
        self.emit_commands(&commands::cmd_set_position(position)).await
    }

    /// Select the built-in character set.
    pub async fn set_font<F>(&self, font: F) -> Result<()>
    where
        F: TryInto<Font>,
        Error: From<F::Error>,
    {
        let font = self.validated(font.try_into(), "set_font")?;
        tracing::debug!(parent: &self.span, %font, code = font.code(), "set_font");
        self.emit_commands(&commands::cmd_set_font(font)).await
    }

    /// Program custom glyph `slot` (0-4) with a 5-byte pixel-column pattern.
    ///
    /// Sends `DEFINE_CHAR` and the slot as commands, then the pattern as one
    /// raw write. The display stores the glyph; the controller does not.
    pub async fn define_char(&self, slot: u8, pattern: &[u8]) -> Result<()> {
        tracing::debug!(parent: &self.span, slot, data_len = pattern.len(), "define_char");
        let glyph = self.validated(CustomGlyph::new(slot, pattern), "define_char")?;

        let cmd = commands::cmd_define_char(&glyph);
        let (header, data) = cmd.split_at(2);

        let mut transport = self.transport.lock().await;
        self.write_commands(&mut **transport, header).await?;
        self.write_data(&mut **transport, data).await
    }

    /// Send a single command byte.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TransportShortWrite`] if the transport did not accept
    /// the byte.
    pub async fn send_command(&self, command: u8) -> Result<()> {
        let mut transport = self.transport.lock().await;
        self.write_command(&mut **transport, command).await
    }

    /// Send raw bytes in a single write.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TransportShortWrite`] if the transport accepted fewer
    /// bytes than `data.len()`.
    pub async fn send(&self, data: &[u8]) -> Result<()> {
        let mut transport = self.transport.lock().await;
        self.write_data(&mut **transport, data).await
    }

    /// Open the connection again, closing it first if it is open.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if the port cannot be opened.
    pub async fn reopen(&self) -> Result<()> {
        tracing::debug!(parent: &self.span, "reopen");
        let mut transport = self.transport.lock().await;
        transport.reopen().await.inspect_err(|e| {
            tracing::error!(parent: &self.span, error = %e, "reopen: port cannot be opened");
        })
    }

    /// Close the connection. Closing twice is harmless.
    pub async fn close(&self) -> Result<()> {
        tracing::debug!(parent: &self.span, "close");
        self.transport.lock().await.close().await
    }

    /// Whether the underlying transport is connected.
    pub async fn is_connected(&self) -> bool {
        self.transport.lock().await.is_connected()
    }

    // ---------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------

    /// Log a validation failure before handing it back to the caller.
    fn validated<T, E>(&self, value: std::result::Result<T, E>, op: &str) -> Result<T>
    where
        Error: From<E>,
    {
        value.map_err(Error::from).inspect_err(|e| {
            tracing::warn!(parent: &self.span, op, error = %e, "rejected, nothing sent");
        })
    }

    /// Lock the transport once and send `cmds` one command byte at a time.
    async fn emit_commands(&self, cmds: &[u8]) -> Result<()> {
        let mut transport = self.transport.lock().await;
        self.write_commands(&mut **transport, cmds).await
    }

    /// Send each byte as its own command. Stops at the first failure so the
    /// display never sees the tail of a broken sequence.
    async fn write_commands(&self, transport: &mut dyn Transport, cmds: &[u8]) -> Result<()> {
        for &command in cmds {
            self.write_command(transport, command).await?;
        }
        Ok(())
    }

    async fn write_command(&self, transport: &mut dyn Transport, command: u8) -> Result<()> {
        tracing::trace!(parent: &self.span, "send_command: 0x{command:02X}");
        let written = transport.write(&[command]).await?;
        if written != 1 {
            tracing::error!(parent: &self.span, written, "send_command: short write");
            return Err(Error::TransportShortWrite {
                expected: 1,
                written,
            });
        }
        Ok(())
    }

    async fn write_data(&self, transport: &mut dyn Transport, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        let written = transport.write(data).await?;
        tracing::trace!(
            parent: &self.span,
            data_len = data.len(),
            written,
            "send: {:02X?}",
            data
        );
        if written != data.len() {
            tracing::error!(
                parent: &self.span,
                expected = data.len(),
                written,
                "send: written bytes != data length"
            );
            return Err(Error::TransportShortWrite {
                expected: data.len(),
                written,
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for SamVfd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SamVfd")
            .field("reset_settle_delay", &self.reset_settle_delay)
            .finish_non_exhaustive()
    }
}
