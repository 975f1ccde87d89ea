//! Command catalog and pure command builders for the display.
//!
//! This module holds the fixed command bytes, the legal value sets of every
//! parameterized command, and functions that produce the exact wire bytes
//! for each operation.
//!
//! All functions are pure -- they validate and produce byte vectors without
//! performing any I/O. The [`SamVfd`](crate::controller::SamVfd) controller
//! sends the result over a transport.
//!
//! # Wire format
//!
//! Every command is one or more raw bytes. There is no framing, checksum,
//! or acknowledgment.
//!
//! | Operation     | Bytes                               |
//! |---------------|-------------------------------------|
//! | reset         | `1F`                                |
//! | cursor mode   | `13` / `14` / `15`                  |
//! | dim level     | `04 <level>`                        |
//! | display mode  | `11` / `12` / `16`                  |
//! | position      | `10 <row * 20 + col>`               |
//! | font          | `18` / `19`                         |
//! | define char   | `1B <slot> <p0> <p1> <p2> <p3> <p4>`|

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use samvfd_core::{Error, Result};

// ---------------------------------------------------------------
// Command bytes
// ---------------------------------------------------------------

/// Reset the display to its power-on state.
pub const CMD_RESET: u8 = 0x1F;
/// Prefix of the two-byte dim level command.
pub const CMD_SET_DIM_LEVEL: u8 = 0x04;
/// Prefix of the two-byte cursor position command.
pub const CMD_SET_POSITION: u8 = 0x10;
/// Prefix of the seven-byte custom character command.
pub const CMD_DEFINE_CHAR: u8 = 0x1B;

// ---------------------------------------------------------------
// Device geometry
// ---------------------------------------------------------------

/// Characters per row.
pub const DISPLAY_COLUMNS: i32 = 20;
/// Number of rows.
pub const DISPLAY_ROWS: i32 = 2;
/// Number of addressable character cells.
pub const DISPLAY_POSITIONS: i32 = DISPLAY_COLUMNS * DISPLAY_ROWS;
/// Number of programmable glyph slots.
pub const GLYPH_SLOTS: u8 = 5;
/// Number of pixel-column bytes in a glyph pattern.
pub const GLYPH_PATTERN_LEN: usize = 5;
/// Minimum wait after a reset before the display accepts further commands.
pub const RESET_SETTLE_DELAY: Duration = Duration::from_millis(10);

/// Error returned when a name cannot be parsed into one of the catalog enums.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCodeError {
    kind: &'static str,
    input: String,
}

impl fmt::Display for ParseCodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: {}", self.kind, self.input)
    }
}

impl std::error::Error for ParseCodeError {}

fn parse_error(kind: &'static str, input: &str) -> ParseCodeError {
    ParseCodeError {
        kind,
        input: input.to_string(),
    }
}

fn invalid_code(kind: &str, code: u8) -> Error {
    Error::InvalidParameter(format!("unknown {kind} code 0x{code:02X}"))
}

// ---------------------------------------------------------------
// Display mode
// ---------------------------------------------------------------

/// Whole-display write mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayMode {
    /// Characters overwrite in place; the cursor wraps to the first cell.
    Normal,
    /// When the last row is full, rows scroll up.
    VerticalScroll,
    /// When the row is full, text scrolls left.
    HorizontalScroll,
}

impl DisplayMode {
    /// All display modes, in code order.
    pub const ALL: [DisplayMode; 3] = [
        DisplayMode::Normal,
        DisplayMode::VerticalScroll,
        DisplayMode::HorizontalScroll,
    ];

    /// The wire byte for this mode.
    pub const fn code(self) -> u8 {
        match self {
            DisplayMode::Normal => 0x11,
            DisplayMode::VerticalScroll => 0x12,
            DisplayMode::HorizontalScroll => 0x16,
        }
    }
}

impl TryFrom<u8> for DisplayMode {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            0x11 => Ok(DisplayMode::Normal),
            0x12 => Ok(DisplayMode::VerticalScroll),
            0x16 => Ok(DisplayMode::HorizontalScroll),
            _ => Err(invalid_code("display mode", code)),
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DisplayMode::Normal => "normal",
            DisplayMode::VerticalScroll => "v-scroll",
            DisplayMode::HorizontalScroll => "h-scroll",
        };
        write!(f, "{s}")
    }
}

impl FromStr for DisplayMode {
    type Err = ParseCodeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "normal" => Ok(DisplayMode::Normal),
            "v-scroll" | "vscroll" | "vertical" => Ok(DisplayMode::VerticalScroll),
            "h-scroll" | "hscroll" | "horizontal" => Ok(DisplayMode::HorizontalScroll),
            _ => Err(parse_error("display mode", s)),
        }
    }
}

// ---------------------------------------------------------------
// Cursor mode
// ---------------------------------------------------------------

/// Cursor visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorMode {
    On,
    Off,
    Blink,
}

impl CursorMode {
    /// All cursor modes, in code order.
    pub const ALL: [CursorMode; 3] = [CursorMode::On, CursorMode::Off, CursorMode::Blink];

    /// The wire byte for this mode.
    pub const fn code(self) -> u8 {
        match self {
            CursorMode::On => 0x13,
            CursorMode::Off => 0x14,
            CursorMode::Blink => 0x15,
        }
    }
}

impl TryFrom<u8> for CursorMode {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            0x13 => Ok(CursorMode::On),
            0x14 => Ok(CursorMode::Off),
            0x15 => Ok(CursorMode::Blink),
            _ => Err(invalid_code("cursor mode", code)),
        }
    }
}

impl fmt::Display for CursorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CursorMode::On => "on",
            CursorMode::Off => "off",
            CursorMode::Blink => "blink",
        };
        write!(f, "{s}")
    }
}

impl FromStr for CursorMode {
    type Err = ParseCodeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "on" => Ok(CursorMode::On),
            "off" => Ok(CursorMode::Off),
            "blink" => Ok(CursorMode::Blink),
            _ => Err(parse_error("cursor mode", s)),
        }
    }
}

// ---------------------------------------------------------------
// Dim level
// ---------------------------------------------------------------

/// Display brightness. The display accepts exactly these four levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DimLevel {
    Percent20,
    Percent40,
    Percent60,
    Percent100,
}

impl DimLevel {
    /// All dim levels, dimmest first.
    pub const ALL: [DimLevel; 4] = [
        DimLevel::Percent20,
        DimLevel::Percent40,
        DimLevel::Percent60,
        DimLevel::Percent100,
    ];

    /// The wire byte for this level.
    pub const fn code(self) -> u8 {
        match self {
            DimLevel::Percent20 => 0x00,
            DimLevel::Percent40 => 0x40,
            DimLevel::Percent60 => 0x60,
            DimLevel::Percent100 => 0x80,
        }
    }

    /// Brightness in percent.
    pub const fn percent(self) -> u8 {
        match self {
            DimLevel::Percent20 => 20,
            DimLevel::Percent40 => 40,
            DimLevel::Percent60 => 60,
            DimLevel::Percent100 => 100,
        }
    }
}

impl TryFrom<u8> for DimLevel {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            0x00 => Ok(DimLevel::Percent20),
            0x40 => Ok(DimLevel::Percent40),
            0x60 => Ok(DimLevel::Percent60),
            0x80 => Ok(DimLevel::Percent100),
            _ => Err(invalid_code("dim level", code)),
        }
    }
}

impl fmt::Display for DimLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

impl FromStr for DimLevel {
    type Err = ParseCodeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim_end_matches('%') {
            "20" => Ok(DimLevel::Percent20),
            "40" => Ok(DimLevel::Percent40),
            "60" => Ok(DimLevel::Percent60),
            "100" => Ok(DimLevel::Percent100),
            _ => Err(parse_error("dim level", s)),
        }
    }
}

// ---------------------------------------------------------------
// Font
// ---------------------------------------------------------------

/// Built-in character set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Font {
    GeneralEu,
    JapaneseKatakana,
}

impl Font {
    /// All fonts, in code order.
    pub const ALL: [Font; 2] = [Font::GeneralEu, Font::JapaneseKatakana];

    /// The wire byte for this font.
    pub const fn code(self) -> u8 {
        match self {
            Font::GeneralEu => 0x18,
            Font::JapaneseKatakana => 0x19,
        }
    }
}

impl TryFrom<u8> for Font {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            0x18 => Ok(Font::GeneralEu),
            0x19 => Ok(Font::JapaneseKatakana),
            _ => Err(invalid_code("font", code)),
        }
    }
}

impl fmt::Display for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Font::GeneralEu => "general-eu",
            Font::JapaneseKatakana => "katakana",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Font {
    type Err = ParseCodeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "general-eu" | "eu" => Ok(Font::GeneralEu),
            "katakana" | "japanese-katakana" => Ok(Font::JapaneseKatakana),
            _ => Err(parse_error("font", s)),
        }
    }
}

// ---------------------------------------------------------------
// Position
// ---------------------------------------------------------------

/// A validated cursor position: the flat cell index `row * 20 + col`.
///
/// Only the composite index is range-checked. `col` and `row` individually
/// may be negative or exceed the row width as long as the sum lands inside
/// `0..40`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position(u8);

impl Position {
    /// Compute and validate the position for `(col, row)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPosition`] if `row * 20 + col` is outside
    /// `0..40` or overflows.
    pub fn new(col: i32, row: i32) -> Result<Self> {
        row.checked_mul(DISPLAY_COLUMNS)
            .and_then(|base| base.checked_add(col))
            .filter(|index| (0..DISPLAY_POSITIONS).contains(index))
            .and_then(|index| u8::try_from(index).ok())
            .map(Position)
            .ok_or(Error::InvalidPosition { col, row })
    }

    /// The flat cell index, `0..40`.
    pub const fn index(self) -> u8 {
        self.0
    }
}

// ---------------------------------------------------------------
// Custom glyph
// ---------------------------------------------------------------

/// A user-defined character: a slot and a 5-byte pixel-column pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CustomGlyph {
    slot: u8,
    pattern: [u8; GLYPH_PATTERN_LEN],
}

impl CustomGlyph {
    /// Validate a glyph definition.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `slot` is not in `0..=4` or
    /// `pattern` is not exactly 5 bytes long.
    pub fn new(slot: u8, pattern: &[u8]) -> Result<Self> {
        if slot >= GLYPH_SLOTS {
            return Err(Error::InvalidParameter(format!(
                "glyph slot {slot} out of range 0..={}",
                GLYPH_SLOTS - 1
            )));
        }
        let pattern: [u8; GLYPH_PATTERN_LEN] = pattern.try_into().map_err(|_| {
            Error::InvalidParameter(format!(
                "glyph pattern must be {GLYPH_PATTERN_LEN} bytes, got {}",
                pattern.len()
            ))
        })?;
        Ok(CustomGlyph { slot, pattern })
    }

    pub const fn slot(&self) -> u8 {
        self.slot
    }

    pub const fn pattern(&self) -> &[u8; GLYPH_PATTERN_LEN] {
        &self.pattern
    }
}

// ---------------------------------------------------------------
// Command builders
// ---------------------------------------------------------------

/// Build the reset command (`1F`).
pub fn cmd_reset() -> Vec<u8> {
    vec![CMD_RESET]
}

/// Build a cursor mode command (one byte).
pub fn cmd_set_cursor_mode(mode: CursorMode) -> Vec<u8> {
    vec![mode.code()]
}

/// Build a dim level command (`04 <level>`).
pub fn cmd_set_dim_level(level: DimLevel) -> Vec<u8> {
    vec![CMD_SET_DIM_LEVEL, level.code()]
}

/// Build a display mode command (one byte).
pub fn cmd_set_display_mode(mode: DisplayMode) -> Vec<u8> {
    vec![mode.code()]
}

/// Build a cursor position command (`10 <index>`).
pub fn cmd_set_position(position: Position) -> Vec<u8> {
    vec![CMD_SET_POSITION, position.index()]
}

/// Build a font selection command (one byte).
pub fn cmd_set_font(font: Font) -> Vec<u8> {
    vec![font.code()]
}

/// Build a custom character command (`1B <slot> <5 pattern bytes>`).
pub fn cmd_define_char(glyph: &CustomGlyph) -> Vec<u8> {
    let mut cmd = Vec::with_capacity(2 + GLYPH_PATTERN_LEN);
    cmd.push(CMD_DEFINE_CHAR);
    cmd.push(glyph.slot());
    cmd.extend_from_slice(glyph.pattern());
    cmd
}
