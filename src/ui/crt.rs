//! CRT - Terminal escape sequences
//!
//! Everything the panels emit is plain text with embedded ANSI sequences;
//! this module builds those sequences and holds the terminal geometry and
//! the mouse hit regions written during drawing.

use std::collections::HashMap;

/// Cursor movement sequences
pub mod mv {
    /// Move the cursor to (line, col), 1-based
    #[inline]
    pub fn to(line: i32, col: i32) -> String {
        format!("\x1b[{};{}f", line, col)
    }

    /// Move the cursor right
    #[inline]
    pub fn r(n: i32) -> String {
        format!("\x1b[{}C", n)
    }

    /// Move the cursor left
    #[inline]
    pub fn l(n: i32) -> String {
        format!("\x1b[{}D", n)
    }

    /// Move the cursor down
    #[inline]
    pub fn d(n: i32) -> String {
        format!("\x1b[{}B", n)
    }
}

/// Text attribute sequences
pub mod fx {
    pub const RESET: &str = "\x1b[0m";
    pub const B: &str = "\x1b[1m";
    pub const UB: &str = "\x1b[22m";
    pub const BL: &str = "\x1b[5m";
    pub const UBL: &str = "\x1b[25m";
}

/// One column cursor skip, used for transparent graph cells
pub const SKIP: &str = "\x1b[1C";

/// Terminal size in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermSize {
    pub width: i32,
    pub height: i32,
}

impl Default for TermSize {
    fn default() -> Self {
        TermSize {
            width: 80,
            height: 24,
        }
    }
}

/// A clickable region on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseRegion {
    pub line: i32,
    pub col: i32,
    pub height: i32,
    pub width: i32,
}

impl MouseRegion {
    pub fn new(line: i32, col: i32, height: i32, width: i32) -> Self {
        MouseRegion {
            line,
            col,
            height,
            width,
        }
    }

    /// Whether a 1-based (line, col) position falls inside the region
    pub fn contains(&self, line: i32, col: i32) -> bool {
        line >= self.line
            && line < self.line + self.height
            && col >= self.col
            && col < self.col + self.width
    }
}

/// Key name to hit region, filled while drawing and read by the input layer
#[derive(Debug, Clone, Default)]
pub struct MouseMappings {
    regions: HashMap<String, MouseRegion>,
}

impl MouseMappings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, region: MouseRegion) {
        self.regions.insert(key.to_string(), region);
    }

    pub fn remove(&mut self, key: &str) {
        self.regions.remove(key);
    }

    pub fn clear(&mut self) {
        self.regions.clear();
    }

    pub fn contains(&self, key: &str) -> bool {
        self.regions.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Key whose region contains the position, if any
    pub fn key_at(&self, line: i32, col: i32) -> Option<&str> {
        self.regions
            .iter()
            .find(|(_, r)| r.contains(line, col))
            .map(|(k, _)| k.as_str())
    }
}

/// Remove every escape sequence from a rendered string
///
/// Handles CSI sequences only, which is all this crate emits.
pub fn strip_escapes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for c in chars.by_ref() {
                if c.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            out.push(ch);
        }
    }
    out
}
