//! TextEdit - single line editor with a Unicode aware cursor
//!
//! The editor tracks the cursor twice: `pos` as a byte offset into `text`
//! and `upos` as a codepoint count. Every command keeps
//! `upos == text[..pos].chars().count()`.

use thiserror::Error;
use tracing::error;

use super::crt::fx;
use super::row_print::{byte_offset, luresize, ulen, uresize, uwidth};
use super::symbols::BLOCK;

/// Failure while computing the visible window
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TextEditError {
    #[error("window of {limit} columns cannot fit {used} columns of text")]
    Window { limit: usize, used: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextEdit {
    pub text: String,
    pos: usize,
    upos: usize,
}

impl TextEdit {
    /// Editor holding `text` with the cursor at the end
    pub fn new(text: &str) -> Self {
        TextEdit {
            text: text.to_string(),
            pos: text.len(),
            upos: ulen(text),
        }
    }

    /// Byte offset of the cursor
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Codepoint offset of the cursor
    pub fn upos(&self) -> usize {
        self.upos
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.pos = 0;
        self.upos = 0;
    }

    /// Apply one editing key. Returns false when the key was not handled,
    /// including movement past either end of the text.
    pub fn command(&mut self, key: &str) -> bool {
        match key {
            "left" if self.upos > 0 => {
                self.upos -= 1;
                self.pos = byte_offset(&self.text, self.upos);
            }
            "right" if self.pos < self.text.len() => {
                self.upos += 1;
                self.pos = byte_offset(&self.text, self.upos);
            }
            "home" if self.pos > 0 => {
                self.pos = 0;
                self.upos = 0;
            }
            "end" if self.pos < self.text.len() => {
                self.pos = self.text.len();
                self.upos = ulen(&self.text);
            }
            "backspace" if self.pos > 0 => {
                self.upos -= 1;
                let start = byte_offset(&self.text, self.upos);
                self.text.replace_range(start..self.pos, "");
                self.pos = start;
            }
            "delete" if self.pos < self.text.len() => {
                let end = byte_offset(&self.text, self.upos + 1);
                self.text.replace_range(self.pos..end, "");
            }
            "space" => self.insert(" "),
            _ if ulen(key) == 1 => self.insert(key),
            _ => return false,
        }
        true
    }

    fn insert(&mut self, s: &str) {
        self.text.insert_str(self.pos, s);
        self.pos += s.len();
        self.upos += 1;
    }

    /// Text with the cursor block spliced in, clipped to `limit` columns
    /// around the cursor. A `limit` of 0 never clips.
    pub fn render(&self, limit: usize) -> String {
        let (first, rest) = (&self.text[..self.pos], &self.text[self.pos..]);
        if limit > 0 && uwidth(&self.text) + 1 > limit {
            match self.window(limit) {
                Ok((first, rest)) => return Self::with_cursor(&first, &rest),
                Err(e) => error!("TextEdit render: {}", e),
            }
        }
        Self::with_cursor(first, rest)
    }

    fn with_cursor(first: &str, rest: &str) -> String {
        format!("{}{}{}{}{}", first, fx::BL, BLOCK, fx::UBL, rest)
    }

    /// Visible slices before and after the cursor for a `limit` column
    /// window, one column of which is the cursor itself.
    fn window(&self, limit: usize) -> Result<(String, String), TextEditError> {
        let avail = limit - 1;
        let half = (limit as f64 / 2.0).round() as usize;
        let prefix = &self.text[..self.pos];
        let suffix = &self.text[self.pos..];
        let remaining = ulen(&self.text) - self.upos;

        let first = if remaining < half {
            // Close to the end: show all of the tail
            let room = avail
                .checked_sub(uwidth(suffix))
                .ok_or(TextEditError::Window {
                    limit,
                    used: uwidth(suffix) + 1,
                })?;
            luresize(prefix, room, true)
        } else if self.upos <= half {
            luresize(prefix, avail, true)
        } else {
            luresize(prefix, half, true)
        };

        let room = avail
            .checked_sub(uwidth(&first))
            .ok_or(TextEditError::Window {
                limit,
                used: uwidth(&first) + 1,
            })?;
        Ok((first, uresize(suffix, room, true)))
    }
}
