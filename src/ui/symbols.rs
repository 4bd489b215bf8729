//! Symbols - box drawing characters and graph glyph tables
//!
//! Graph glyphs encode two samples per cell. Every family has 25 glyphs
//! indexed by `prev * 5 + cur`, where both levels are in 0..=4, so the graph
//! algorithm never needs to know which family it draws with.

use std::str::FromStr;

use crate::core::SettingsError;

pub const H_LINE: &str = "─";
pub const V_LINE: &str = "│";
pub const LEFT_UP: &str = "┌";
pub const RIGHT_UP: &str = "┐";
pub const LEFT_DOWN: &str = "└";
pub const RIGHT_DOWN: &str = "┘";
pub const ROUND_LEFT_UP: &str = "╭";
pub const ROUND_RIGHT_UP: &str = "╮";
pub const ROUND_LEFT_DOWN: &str = "╰";
pub const ROUND_RIGHT_DOWN: &str = "╯";
pub const TITLE_LEFT_DOWN: &str = "┘";
pub const TITLE_RIGHT_DOWN: &str = "└";
pub const TITLE_LEFT: &str = "┐";
pub const TITLE_RIGHT: &str = "┌";
pub const DIV_RIGHT: &str = "┤";
pub const DIV_LEFT: &str = "├";
pub const DIV_UP: &str = "┬";
pub const DIV_DOWN: &str = "┴";

pub const UP: &str = "↑";
pub const DOWN: &str = "↓";
pub const ENTER: &str = "↲";

/// Filled cell used by meters
pub const METER: &str = "■";

/// Cursor / scrollbar block
pub const BLOCK: &str = "█";

pub const SUPERSCRIPT: [&str; 10] = ["⁰", "¹", "²", "³", "⁴", "⁵", "⁶", "⁷", "⁸", "⁹"];

/// Badge number for box titles: superscript digits, plain digits in tty mode
pub fn superscript(num: usize, tty_mode: bool) -> String {
    if tty_mode {
        num.to_string()
    } else {
        num.to_string()
            .bytes()
            .map(|b| SUPERSCRIPT[(b - b'0') as usize])
            .collect()
    }
}

/// Glyph family used to draw graphs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphSymbol {
    /// 2x4 dot sub-grid per cell
    Braille,
    /// Quadrant blocks
    Block,
    /// Shade blocks, for terminals without Unicode fonts
    Tty,
}

impl FromStr for GraphSymbol {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "braille" => Ok(GraphSymbol::Braille),
            "block" => Ok(GraphSymbol::Block),
            "tty" => Ok(GraphSymbol::Tty),
            _ => Err(SettingsError::UnknownGraphSymbol(s.to_string())),
        }
    }
}

impl GraphSymbol {
    /// Resolve a configured symbol name.
    ///
    /// "default" means `fallback` (the global graph_symbol setting), tty mode
    /// forces the tty family, unknown names fall back to braille.
    pub fn resolve(name: &str, fallback: &str, tty_mode: bool) -> Self {
        if tty_mode {
            return GraphSymbol::Tty;
        }
        let name = if name == "default" { fallback } else { name };
        name.parse().unwrap_or(GraphSymbol::Braille)
    }
}

/// Fill direction of a graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Up,
    Down,
}

const BRAILLE_UP: [char; 25] = [
    ' ', '⢀', '⢠', '⢰', '⢸',
    '⡀', '⣀', '⣠', '⣰', '⣸',
    '⡄', '⣄', '⣤', '⣴', '⣼',
    '⡆', '⣆', '⣦', '⣶', '⣾',
    '⡇', '⣇', '⣧', '⣷', '⣿',
];

const BRAILLE_DOWN: [char; 25] = [
    ' ', '⠈', '⠘', '⠸', '⢸',
    '⠁', '⠉', '⠙', '⠹', '⢹',
    '⠃', '⠋', '⠛', '⠻', '⢻',
    '⠇', '⠏', '⠟', '⠿', '⢿',
    '⡇', '⡏', '⡟', '⡿', '⣿',
];

const BLOCK_UP: [char; 25] = [
    ' ', '▗', '▗', '▐', '▐',
    '▖', '▄', '▄', '▟', '▟',
    '▖', '▄', '▄', '▟', '▟',
    '▌', '▙', '▙', '█', '█',
    '▌', '▙', '▙', '█', '█',
];

const BLOCK_DOWN: [char; 25] = [
    ' ', '▝', '▝', '▐', '▐',
    '▘', '▀', '▀', '▜', '▜',
    '▘', '▀', '▀', '▜', '▜',
    '▌', '▛', '▛', '█', '█',
    '▌', '▛', '▛', '█', '█',
];

// Tty graphs have no notion of direction, both orientations share one table
const TTY: [char; 25] = [
    ' ', '░', '░', '▒', '▒',
    '░', '░', '▒', '▒', '█',
    '░', '▒', '▒', '▒', '█',
    '▒', '▒', '▒', '█', '█',
    '▒', '█', '█', '█', '█',
];

/// The 25 glyphs of one family and orientation
pub fn glyph_table(symbol: GraphSymbol, orientation: Orientation) -> &'static [char; 25] {
    match (symbol, orientation) {
        (GraphSymbol::Braille, Orientation::Up) => &BRAILLE_UP,
        (GraphSymbol::Braille, Orientation::Down) => &BRAILLE_DOWN,
        (GraphSymbol::Block, Orientation::Up) => &BLOCK_UP,
        (GraphSymbol::Block, Orientation::Down) => &BLOCK_DOWN,
        (GraphSymbol::Tty, _) => &TTY,
    }
}

/// Look up the glyph for a pair of levels
#[inline]
pub fn glyph(table: &[char; 25], prev: i32, cur: i32) -> char {
    debug_assert!((0..=4).contains(&prev), "graph level {} out of range", prev);
    debug_assert!((0..=4).contains(&cur), "graph level {} out of range", cur);
    table[(prev.clamp(0, 4) * 5 + cur.clamp(0, 4)) as usize]
}
