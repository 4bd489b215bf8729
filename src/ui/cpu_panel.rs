//! CpuPanel - total usage graph and the per-core box
//!
//! The frame and the menu button are static and only drawn on redraw. The
//! graph, the frequency badge and every core line are drawn each tick.

use super::crt::{fx, mv, MouseMappings, MouseRegion};
use super::graph::{Graph, GraphOptions};
use super::layout::{CoreColumn, CpuLayout};
use super::meter::Meter;
use super::row_print::{ljust, rjust};
use super::symbols::{self, GraphSymbol};
use super::theme::Theme;
use crate::core::{CpuInfo, Series, Settings};

/// Columns of the CPU line that are not meter
const CPU_LINE_TEXT: i32 = 11;

/// Extra columns taken by a temperature suffix on the CPU line
const TEMP_TEXT: i32 = 12;

#[derive(Debug, Clone, Default)]
pub struct CpuPanel {
    pub layout: CpuLayout,
    graph: Graph,
    total_meter: Meter,
    core_meter: Meter,
}

impl CpuPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Width of the total graph left of the core box
    fn graph_width(&self) -> i32 {
        (self.layout.inner.x - self.layout.geometry.rect.x - 2).max(0)
    }

    pub fn draw(
        &mut self,
        theme: &dyn Theme,
        settings: &Settings,
        mouse: &mut MouseMappings,
        cpu: &CpuInfo,
        force_redraw: bool,
        data_same: bool,
    ) -> String {
        if !self.layout.geometry.shown {
            return String::new();
        }
        let rect = self.layout.geometry.rect;
        let inner = self.layout.inner;
        let empty = Series::new();
        let total = cpu.total().unwrap_or(&empty);
        let mut out = String::with_capacity((rect.width * rect.height).max(0) as usize * 4);

        let redraw = self.layout.geometry.redraw || force_redraw;
        if let Some(frame) = self.layout.geometry.take_redraw(force_redraw) {
            out.push_str(frame);
            let button_y = if settings.cpu_bottom {
                rect.y + rect.height - 1
            } else {
                rect.y
            };
            let (title_left, title_right) = if settings.cpu_bottom {
                (symbols::TITLE_LEFT_DOWN, symbols::TITLE_RIGHT_DOWN)
            } else {
                (symbols::TITLE_LEFT, symbols::TITLE_RIGHT)
            };
            out.push_str(&format!(
                "{}{}{}{}{}m{}enu{}{}{}",
                mv::to(button_y, rect.x + 10),
                theme.color("cpu_box"),
                title_left,
                theme.color("hi_fg"),
                fx::B,
                theme.color("title"),
                fx::UB,
                theme.color("cpu_box"),
                title_right
            ));
            mouse.set("m", MouseRegion::new(button_y, rect.x + 11, 1, 4));

            let symbol =
                GraphSymbol::resolve(&settings.graph_symbol, "braille", settings.tty_mode);
            self.graph = Graph::new(
                theme,
                self.graph_width(),
                rect.height - 2,
                "cpu",
                total,
                symbol,
                GraphOptions {
                    no_zero: true,
                    ..Default::default()
                },
            );
            let temp_text = if self.layout.show_temp { TEMP_TEXT } else { 0 };
            self.total_meter = Meter::new(
                (inner.width - CPU_LINE_TEXT - temp_text).max(0),
                "cpu",
                false,
            );
            self.core_meter = Meter::new(self.layout.column.meter_width(), "cpu", false);
        }

        // Total graph
        if self.graph.width() > 0 && !total.is_empty() {
            out.push_str(&mv::to(rect.y + 1, rect.x + 1));
            out.push_str(self.graph.append(theme, total, redraw || data_same));
        }

        // Frequency badge
        if settings.show_cpu_freq && !cpu.frequency.is_empty() {
            out.push_str(&format!(
                "{}{}{}{}{}{}{}{}{}{}{}",
                mv::to(inner.y, inner.x + inner.width - 10),
                fx::UB,
                theme.color("div_line"),
                symbols::H_LINE.repeat(7usize.saturating_sub(cpu.frequency.len())),
                symbols::TITLE_LEFT,
                fx::B,
                theme.color("title"),
                cpu.frequency,
                fx::UB,
                theme.color("div_line"),
                symbols::TITLE_RIGHT
            ));
        }

        // CPU line
        let total_now = total.back().copied().unwrap_or(0).clamp(0, 100);
        out.push_str(&mv::to(inner.y + 1, inner.x + 1));
        out.push_str(theme.color("main_fg"));
        out.push_str(fx::B);
        out.push_str("CPU ");
        out.push_str(self.total_meter.render(theme, total_now as i32));
        out.push_str(&theme.gradient("cpu")[total_now as usize]);
        out.push_str(&rjust(&total_now.to_string(), 4));
        out.push_str(theme.color("main_fg"));
        out.push('%');
        if self.layout.show_temp {
            if let Some(&temp) = cpu.temps.first() {
                self.push_temp(theme, temp, &mut out);
            }
        }
        out.push_str(fx::UB);

        self.draw_cores(theme, cpu, &mut out);

        out.push_str(fx::RESET);
        out
    }

    /// Core lines, filled column by column
    fn draw_cores(&mut self, theme: &dyn Theme, cpu: &CpuInfo, out: &mut String) {
        let inner = self.layout.inner;
        let columns = self.layout.columns.max(1);
        let cores = cpu.core_percent.len() as i32;
        let per_column = ((cores + columns - 1) / columns).max(1);
        let rows = (inner.height - 3).max(0);
        let column_width = inner.width / columns;
        let label_width = if self.layout.column == CoreColumn::Narrow {
            2
        } else {
            3
        };

        for (n, series) in cpu.core_percent.iter().enumerate() {
            let n = n as i32;
            let (col, row) = (n / per_column, n % per_column);
            if col >= columns || row >= rows {
                continue;
            }
            let value = series.back().copied().unwrap_or(0).clamp(0, 100);
            out.push_str(&mv::to(inner.y + 2 + row, inner.x + 1 + col * column_width));
            out.push_str(theme.color("main_fg"));
            if n < 100 {
                out.push_str(fx::B);
                out.push('C');
                out.push_str(fx::UB);
            }
            out.push_str(&ljust(&n.to_string(), label_width));
            out.push_str(self.core_meter.render(theme, value as i32));
            out.push_str(&theme.gradient("cpu")[value as usize]);
            out.push_str(&rjust(&value.to_string(), 4));
            out.push_str(theme.color("main_fg"));
            out.push('%');
            if self.layout.show_temp {
                if let Some(&temp) = cpu.temps.get(n as usize + 1) {
                    self.push_temp(theme, temp, out);
                }
            }
            if col + 1 < columns {
                out.push_str(theme.color("div_line"));
                out.push_str(symbols::V_LINE);
            }
        }
    }

    fn push_temp(&self, theme: &dyn Theme, temp: i64, out: &mut String) {
        out.push_str(&theme.gradient("temp")[temp.clamp(0, 100) as usize]);
        out.push_str(&rjust(&temp.to_string(), 4));
        out.push_str(theme.color("main_fg"));
        out.push_str("°C");
    }
}
