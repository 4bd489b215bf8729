//! Graph - scrolling multi-row sprite packing two samples per cell
//!
//! A graph keeps two cell buffers. Each new sample pairs with the previous
//! one, and consecutive pairs land in alternating buffers, so each buffer
//! always holds a complete picture offset by one sample from the other.
//! Appending a sample therefore only trims one cell off the front of the
//! buffer about to become active and paints one new cell at its end.
//!
//! The tty glyph family draws one pair per cell from a single buffer.

use std::collections::VecDeque;

use super::crt::{fx, mv, SKIP};
use super::symbols::{glyph, glyph_table, GraphSymbol, Orientation};
use super::theme::Theme;
use crate::core::Series;

/// One rendered column of one row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GraphCell {
    Glyph(char),
    /// Transparent cell, emitted as a cursor skip
    Skip,
}

/// Rendering options that rarely differ from the defaults
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphOptions {
    /// Fill from the top instead of the bottom
    pub invert: bool,
    /// Keep a one-level baseline on the bottom row for zero samples
    pub no_zero: bool,
    /// Value mapped to 100%; 0 means samples are already percentages
    pub max_value: i64,
    /// Added to every sample before scaling
    pub offset: i64,
}

#[derive(Debug, Clone)]
pub struct Graph {
    width: i32,
    height: i32,
    gradient: Option<String>,
    symbol: GraphSymbol,
    opts: GraphOptions,
    /// Previous sample, already normalised
    last: i64,
    /// Front and back buffers, one deque of cells per row
    buffers: [Vec<VecDeque<GraphCell>>; 2],
    active: usize,
    out: String,
}

impl Default for Graph {
    fn default() -> Self {
        Graph {
            width: 0,
            height: 0,
            gradient: None,
            symbol: GraphSymbol::Braille,
            opts: GraphOptions::default(),
            last: 0,
            buffers: [Vec::new(), Vec::new()],
            active: 0,
            out: String::new(),
        }
    }
}

impl Graph {
    /// Create a graph and paint the tail of `data` that fits in `width` cells.
    ///
    /// An empty `gradient` draws without colors.
    pub fn new(
        theme: &dyn Theme,
        width: i32,
        height: i32,
        gradient: &str,
        data: &Series,
        symbol: GraphSymbol,
        opts: GraphOptions,
    ) -> Self {
        let mut opts = opts;
        if opts.max_value == 0 && opts.offset > 0 {
            opts.max_value = 100;
        }
        let width = width.max(0);
        let height = height.max(1);

        let len = data.len() as i64;
        let value_width = (len + 1) / 2;
        let mut data_offset = if value_width > i64::from(width) {
            len - i64::from(width) * 2
        } else {
            0
        };
        if (len - data_offset) % 2 != 0 {
            data_offset -= 1;
        }

        let filler = if height == 1 {
            GraphCell::Skip
        } else {
            GraphCell::Glyph(' ')
        };
        let pad = (i64::from(width) - value_width).max(0) as usize;
        let tty = symbol == GraphSymbol::Tty;
        let rows = |n: usize| -> Vec<VecDeque<GraphCell>> {
            (0..height)
                .map(|_| std::iter::repeat(filler).take(n).collect())
                .collect()
        };

        let mut graph = Graph {
            width,
            height,
            gradient: (!gradient.is_empty()).then(|| gradient.to_string()),
            symbol,
            opts,
            last: 0,
            buffers: [rows(pad), rows(if tty { 0 } else { pad })],
            active: 0,
            out: String::new(),
        };

        if !data.is_empty() {
            graph.paint(theme, data, data_offset);
        }
        graph
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    /// The last rendered output
    pub fn output(&self) -> &str {
        &self.out
    }

    /// Scroll in the newest sample of `data`.
    ///
    /// With `unchanged` set, nothing is recomputed and the previous output is
    /// returned as is.
    pub fn append(&mut self, theme: &dyn Theme, data: &Series, unchanged: bool) -> &str {
        if unchanged {
            return &self.out;
        }

        let next = if self.symbol == GraphSymbol::Tty {
            self.active
        } else {
            self.active ^ 1
        };
        for row in &mut self.buffers[next] {
            row.pop_front();
        }
        self.active = next;

        self.paint(theme, data, data.len() as i64 - 1);
        &self.out
    }

    #[inline]
    fn normalize(&self, value: i64) -> i64 {
        if self.opts.max_value > 0 {
            ((value + self.opts.offset) * 100 / self.opts.max_value).clamp(0, 100)
        } else {
            value
        }
    }

    /// Quantize one sample into a level 0..=4 for the row spanning
    /// `[low, high]`
    #[inline]
    fn level(value: i64, low: i64, high: i64, clamp_min: i32, bias: f32) -> i32 {
        if value >= high {
            4
        } else if value <= low {
            clamp_min
        } else {
            let scaled = (value - low) as f32 * 4.0 / (high - low) as f32 + bias;
            (scaled.round() as i32).clamp(clamp_min, 4)
        }
    }

    /// Paint cells for `data[data_offset..]`; index -1 is an empty leading
    /// sample
    fn paint(&mut self, theme: &dyn Theme, data: &Series, data_offset: i64) {
        let len = data.len() as i64;
        let mult = len - data_offset > 1;
        let tty = self.symbol == GraphSymbol::Tty;
        let orientation = if self.opts.invert {
            Orientation::Down
        } else {
            Orientation::Up
        };
        let table = glyph_table(self.symbol, orientation);
        let height = i64::from(self.height);
        let bias = if self.height == 1 { 0.3 } else { 0.1 };

        if mult && data_offset > 0 {
            self.last = self.normalize(data[(data_offset - 1) as usize]);
        }

        let mut value = 0;
        for i in data_offset..len {
            if tty && mult && i % 2 != 0 {
                continue;
            } else if !tty && mult {
                self.active ^= 1;
            }

            if i < 0 {
                value = 0;
                self.last = 0;
            } else {
                value = self.normalize(data[i as usize]);
            }

            for row in 0..height {
                let (high, low) = if height > 1 {
                    (
                        (100.0 * (height - row) as f64 / height as f64).round() as i64,
                        (100.0 * (height - row - 1) as f64 / height as f64).round() as i64,
                    )
                } else {
                    (100, 0)
                };
                let clamp_min = if self.opts.no_zero && row == height - 1 && i != -1 {
                    1
                } else {
                    0
                };

                let prev = Self::level(self.last, low, high, clamp_min, bias);
                let cur = Self::level(value, low, high, clamp_min, bias);
                let cell = if height == 1 && prev + cur == 0 {
                    GraphCell::Skip
                } else {
                    GraphCell::Glyph(glyph(table, prev, cur))
                };
                self.buffers[self.active][row as usize].push_back(cell);
            }

            if mult && i >= 0 {
                self.last = value;
            }
        }
        self.last = value;

        self.render(theme);
    }

    fn render(&mut self, theme: &dyn Theme) {
        let mut out = String::with_capacity((self.width * self.height) as usize * 4 + 64);
        let gradient = self.gradient.as_deref().map(|g| theme.gradient(g));
        let rows = &self.buffers[self.active];

        if self.height == 1 {
            if let Some(g) = gradient {
                if self.last < 1 {
                    out.push_str(theme.color("inactive_fg"));
                } else {
                    out.push_str(&g[self.last.clamp(0, 100) as usize]);
                }
            }
            push_cells(&mut out, &rows[0]);
        } else {
            for i in 0..self.height {
                if i > 0 {
                    out.push_str(&mv::d(1));
                    out.push_str(&mv::l(self.width));
                }
                if let Some(g) = gradient {
                    let step = i * 100 / (self.height - 1);
                    let index = if self.opts.invert { step } else { 100 - step };
                    out.push_str(&g[index as usize]);
                }
                let row = if self.opts.invert {
                    self.height - 1 - i
                } else {
                    i
                };
                push_cells(&mut out, &rows[row as usize]);
            }
        }

        if self.gradient.is_some() {
            out.push_str(fx::RESET);
        }
        self.out = out;
    }
}

fn push_cells(out: &mut String, cells: &VecDeque<GraphCell>) {
    for cell in cells {
        match cell {
            GraphCell::Glyph(ch) => out.push(*ch),
            GraphCell::Skip => out.push_str(SKIP),
        }
    }
}
