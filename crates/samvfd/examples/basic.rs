//! Basic display setup example.
//!
//! Resets the display, dims it, picks a font, programs a custom glyph and
//! moves the cursor to the start of the second row.
//!
//! # Requirements
//!
//! - A 2x20 serial VFD connected through a USB-serial adapter
//! - The serial port path adjusted for your system (e.g., `/dev/ttyUSB0`
//!   on Linux, `COM3` on Windows)
//!
//! # Usage
//!
//! ```sh
//! cargo run -p samvfd --example basic
//! ```

use samvfd::{CursorMode, DimLevel, DisplayMode, Font, SamVfdBuilder};

#[tokio::main]
async fn main() -> samvfd::Result<()> {
    // Adjust this to match your system's serial port.
    let serial_port = "/dev/ttyUSB0";

    println!("Opening display on {}...", serial_port);
    let vfd = SamVfdBuilder::new().serial_port(serial_port).build().await?;

    vfd.reset().await?;
    vfd.set_display_mode(DisplayMode::Normal).await?;
    vfd.set_cursor_mode(CursorMode::Off).await?;
    vfd.set_dim_level(DimLevel::Percent60).await?;
    vfd.set_font(Font::GeneralEu).await?;

    // A hollow box in slot 0.
    vfd.define_char(0, &[0x7F, 0x41, 0x41, 0x41, 0x7F]).await?;

    vfd.set_position(0, 1).await?;

    vfd.close().await?;
    println!("Done.");
    Ok(())
}
