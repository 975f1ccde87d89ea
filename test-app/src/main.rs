// samvfd test application -- CLI tool for driving a serial VFD (or a mock
// transport) one command at a time.
//
// Usage:
//   samvfd-test-app --port /dev/ttyUSB0 reset
//   samvfd-test-app --port /dev/ttyUSB0 dim 40
//   samvfd-test-app --port /dev/ttyUSB0 position 5 1
//   samvfd-test-app --mock define-char 2 01 02 04 08 10
//   SAMVFD_PORT=/dev/ttyUSB0 samvfd-test-app cursor blink
//   samvfd-test-app codes

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use samvfd::commands::{
    CursorMode, DimLevel, DisplayMode, Font, CMD_DEFINE_CHAR, CMD_RESET, CMD_SET_DIM_LEVEL,
    CMD_SET_POSITION,
};
use samvfd::{SamVfd, SamVfdBuilder};
use samvfd_test_harness::MockTransport;
use samvfd_transport::DEFAULT_BAUD_RATE;

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// samvfd test application -- sends display commands from the command line.
#[derive(Parser)]
#[command(name = "samvfd-test-app", version, about)]
struct Cli {
    /// Serial port path (e.g. /dev/ttyUSB0, COM3).
    /// Required unless --mock is used.
    #[arg(long, env = "SAMVFD_PORT")]
    port: Option<String>,

    /// Baud rate of the display.
    #[arg(long, default_value_t = DEFAULT_BAUD_RATE)]
    baud: u32,

    /// Use a mock transport instead of a real serial port and print the
    /// bytes that would have been sent.
    #[arg(long)]
    mock: bool,

    /// Increase log verbosity (-v debug, -vv trace). Overrides RUST_LOG.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the command catalog. Does not open a port.
    Codes,

    #[command(flatten)]
    Display(DisplayCommand),
}

/// Subcommands that talk to the display.
#[derive(Subcommand)]
enum DisplayCommand {
    /// Reset the display.
    Reset,

    /// Set the cursor mode: on, off, blink.
    Cursor { mode: CursorMode },

    /// Set the brightness in percent: 20, 40, 60, 100.
    Dim { level: DimLevel },

    /// Set the display mode: normal, v-scroll, h-scroll.
    DisplayMode { mode: DisplayMode },

    /// Move the cursor. Only row * 20 + col is range-checked.
    #[command(allow_negative_numbers = true)]
    Position { col: i32, row: i32 },

    /// Select the font: general-eu, katakana.
    Font { font: Font },

    /// Define custom glyph SLOT (0-4) from five hex pattern bytes.
    DefineChar {
        slot: u8,
        #[arg(value_parser = parse_hex_u8, num_args = 1..)]
        pattern: Vec<u8>,
    },

    /// Send raw hex bytes as a single write.
    Raw {
        #[arg(value_parser = parse_hex_u8, num_args = 1..)]
        bytes: Vec<u8>,
    },
}

/// Parse a hex string like "0x1F" or "1f" into a u8.
fn parse_hex_u8(s: &str) -> std::result::Result<u8, String> {
    let s = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u8::from_str_radix(s, 16).map_err(|e| format!("invalid hex byte: {e}"))
}

fn format_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("0x{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_codes() -> Result<()> {
    println!("Commands:");
    println!("  reset          0x{CMD_RESET:02X}");
    println!("  set dim level  0x{CMD_SET_DIM_LEVEL:02X} <level>");
    println!("  set position   0x{CMD_SET_POSITION:02X} <row * 20 + col>");
    println!("  define char    0x{CMD_DEFINE_CHAR:02X} <slot> <5 pattern bytes>");
    println!("Cursor modes:");
    for mode in CursorMode::ALL {
        println!("  {:<14} 0x{:02X}", mode.to_string(), mode.code());
    }
    println!("Dim levels:");
    for level in DimLevel::ALL {
        println!("  {:<14} 0x{:02X}", level.to_string(), level.code());
    }
    println!("Display modes:");
    for mode in DisplayMode::ALL {
        println!("  {:<14} 0x{:02X}", mode.to_string(), mode.code());
    }
    println!("Fonts:");
    for font in Font::ALL {
        println!("  {:<14} 0x{:02X}", font.to_string(), font.code());
    }
    Ok(())
}

async fn create_vfd(cli: &Cli, mock: &MockTransport) -> Result<SamVfd> {
    let builder = SamVfdBuilder::new().baud_rate(cli.baud);
    if cli.mock {
        return Ok(builder.build_with_transport(Box::new(mock.clone())).await?);
    }
    let Some(port) = cli.port.as_deref() else {
        bail!("--port (or SAMVFD_PORT) is required unless --mock is used");
    };
    builder
        .serial_port(port)
        .build()
        .await
        .with_context(|| format!("cannot open display on {port}"))
}

async fn run(vfd: &SamVfd, command: &DisplayCommand) -> samvfd::Result<()> {
    match command {
        DisplayCommand::Reset => vfd.reset().await,
        DisplayCommand::Cursor { mode } => vfd.set_cursor_mode(*mode).await,
        DisplayCommand::Dim { level } => vfd.set_dim_level(*level).await,
        DisplayCommand::DisplayMode { mode } => vfd.set_display_mode(*mode).await,
        DisplayCommand::Position { col, row } => vfd.set_position(*col, *row).await,
        DisplayCommand::Font { font } => vfd.set_font(*font).await,
        DisplayCommand::DefineChar { slot, pattern } => vfd.define_char(*slot, pattern).await,
        DisplayCommand::Raw { bytes } => vfd.send(bytes).await,
    }
}

/// Close the display, logging rather than failing if the port complains.
async fn close_vfd(vfd: &SamVfd) {
    if let Err(e) = vfd.close().await {
        tracing::warn!(error = %e, "Failed to close display (continuing anyway)");
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let command = match &cli.command {
        Command::Codes => return cmd_codes(),
        Command::Display(command) => command,
    };

    let mock = MockTransport::new();
    let vfd = create_vfd(&cli, &mock).await?;

    let result = run(&vfd, command).await;
    close_vfd(&vfd).await;
    result.context("display command failed")?;

    if cli.mock {
        println!("{}", format_hex(&mock.sent_bytes()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_accepts_prefixes() {
        assert_eq!(parse_hex_u8("0x1F"), Ok(0x1F));
        assert_eq!(parse_hex_u8("0X1f"), Ok(0x1F));
        assert_eq!(parse_hex_u8("80"), Ok(0x80));
        assert!(parse_hex_u8("100").is_err());
        assert!(parse_hex_u8("zz").is_err());
    }

    #[test]
    fn format_hex_bytes() {
        assert_eq!(format_hex(&[0x04, 0x40]), "0x04 0x40");
        assert_eq!(format_hex(&[]), "");
    }

    #[test]
    fn cli_parses_position_with_negative_column() {
        let cli =
            Cli::try_parse_from(["samvfd-test-app", "--mock", "position", "-1", "1"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Display(DisplayCommand::Position { col: -1, row: 1 })
        ));
    }

    #[test]
    fn cli_parses_define_char_pattern() {
        let cli = Cli::try_parse_from([
            "samvfd-test-app",
            "--mock",
            "define-char",
            "2",
            "01",
            "02",
            "04",
            "08",
            "10",
        ])
        .unwrap();
        match cli.command {
            Command::Display(DisplayCommand::DefineChar { slot, pattern }) => {
                assert_eq!(slot, 2);
                assert_eq!(pattern, vec![0x01, 0x02, 0x04, 0x08, 0x10]);
            }
            _ => panic!("expected define-char"),
        }
    }

    #[test]
    fn cli_rejects_unknown_dim_level() {
        assert!(Cli::try_parse_from(["samvfd-test-app", "dim", "50"]).is_err());
    }

    #[tokio::test]
    async fn mock_run_sends_dim_command() {
        let cli = Cli::try_parse_from(["samvfd-test-app", "--mock", "dim", "60"]).unwrap();
        let mock = MockTransport::new();
        let vfd = create_vfd(&cli, &mock).await.unwrap();
        let Command::Display(command) = &cli.command else {
            panic!("expected a display command");
        };
        run(&vfd, command).await.unwrap();
        assert_eq!(mock.sent_bytes(), vec![0x04, 0x60]);
    }

    #[test]
    fn cli_parses_codes_without_port() {
        let cli = Cli::try_parse_from(["samvfd-test-app", "codes"]).unwrap();
        assert!(matches!(cli.command, Command::Codes));
    }

    #[tokio::test]
    async fn close_vfd_after_close_does_not_panic() {
        let cli = Cli::try_parse_from(["samvfd-test-app", "--mock", "reset"]).unwrap();
        let mock = MockTransport::new();
        let vfd = create_vfd(&cli, &mock).await.unwrap();
        close_vfd(&vfd).await;
        close_vfd(&vfd).await;
        assert!(!vfd.is_connected().await);
    }

    #[tokio::test]
    async fn missing_port_without_mock_is_an_error() {
        let cli = Cli {
            port: None,
            baud: DEFAULT_BAUD_RATE,
            mock: false,
            verbose: 0,
            command: Command::Display(DisplayCommand::Reset),
        };
        let mock = MockTransport::new();
        let err = create_vfd(&cli, &mock).await.err().expect("missing port must fail");
        assert!(err.to_string().contains("--port"));
        assert!(mock.sent_bytes().is_empty());
    }
}
