//! ProcPanel - the process list
//!
//! Drawing is split in two tiers. The static tier runs after a layout pass
//! or on request: frame, column sizes, toggle buttons, column labels and the
//! structure of the detailed sub-panel. The dynamic tier runs every tick:
//! detailed values, the visible rows with their mini graphs, the scrollbar
//! and the position footer.

use tracing::{debug, trace};

use super::crt::{fx, mv, MouseMappings, MouseRegion};
use super::graph::{Graph, GraphOptions};
use super::graph_pool::{GraphPool, GRAPH_WIDTH};
use super::layout::ProcLayout;
use super::row_print::{
    cjust, floating_humanizer, ljust, luresize, rjust, short_percent, ulen, uresize, uwidth,
};
use super::selection::{Selection, DETAILED_ROWS};
use super::symbols::{self, glyph_table, superscript, GraphSymbol, Orientation};
use super::text_edit::TextEdit;
use super::theme::Theme;
use crate::core::{DetailedInfo, FieldWidths, ProcInfo, ProcSnapshot, ProcStatus, Settings};

/// Placement of the detailed sub-panel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct DetailedBox {
    /// Column and width of the CPU graph area
    graph_x: i32,
    graph_width: i32,
    /// Origin and width of the info area
    x: i32,
    y: i32,
    width: i32,
}

impl DetailedBox {
    fn new(x: i32, y: i32, width: i32) -> Self {
        let graph_width = (width / 3).max(width - 121);
        DetailedBox {
            graph_x: x,
            graph_width,
            x: x + graph_width + 1,
            y,
            width: width - graph_width - 1,
        }
    }

    /// Number of info columns and the width of each
    fn items(&self) -> (i32, i32) {
        let item_fit = ((self.width - 2) / 10).max(1);
        (item_fit, (self.width - 2) / item_fit.min(8))
    }
}

/// Colors of one process row
#[derive(Debug, Default)]
struct RowColors<'a> {
    cpu: &'a str,
    mem: &'a str,
    threads: &'a str,
    gradient: &'a str,
    end: String,
}

#[derive(Debug, Clone, Default)]
pub struct ProcPanel {
    pub layout: ProcLayout,
    /// Line editor used while the filter is being typed
    pub filter: TextEdit,
    /// Pid under the selection, 0 when nothing is selected
    pub selected_pid: u64,
    start: i32,
    selected: i32,
    widths: Option<FieldWidths>,
    detailed: DetailedBox,
    /// Whether the last draw included the detailed sub-panel
    detailed_shown: bool,
    detailed_cpu_graph: Graph,
    detailed_mem_graph: Graph,
    pool: GraphPool,
    /// Glyph family the pooled graphs were built with
    pool_symbol: Option<GraphSymbol>,
}

impl ProcPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// First visible row as of the last draw
    pub fn start(&self) -> i32 {
        self.start
    }

    /// Selected row as of the last draw
    pub fn selected(&self) -> i32 {
        self.selected
    }

    pub fn pool(&self) -> &GraphPool {
        &self.pool
    }

    /// Selection state seeded from the persisted position
    pub fn selection(&self, settings: &Settings) -> Selection {
        Selection::new(
            settings.proc_start,
            settings.proc_selected,
            settings.proc_last_selected,
            self.layout.select_max,
        )
    }

    /// Draw the panel for one tick.
    ///
    /// `data_same` means the snapshot carries no new samples since the last
    /// call, so graphs are not advanced.
    pub fn draw(
        &mut self,
        theme: &dyn Theme,
        settings: &Settings,
        mouse: &mut MouseMappings,
        snapshot: &ProcSnapshot,
        force_redraw: bool,
        data_same: bool,
    ) -> String {
        if !self.layout.geometry.shown {
            return String::new();
        }
        let detailed = snapshot
            .detailed
            .as_ref()
            .filter(|d| settings.show_detailed && d.last_pid == settings.detailed_pid.max(0) as u64);
        let symbol = GraphSymbol::resolve(
            &settings.graph_symbol_proc,
            &settings.graph_symbol,
            settings.tty_mode,
        );
        if matches!(self.pool_symbol, Some(prev) if prev != symbol) {
            debug!("graph symbol changed to {:?}, dropping process graphs", symbol);
            self.pool.clear();
        }
        self.pool_symbol = Some(symbol);

        self.start = settings.proc_start;
        self.selected = settings.proc_selected;
        // Showing or hiding the detailed box moves the whole list
        if force_redraw || detailed.is_some() != self.detailed_shown {
            self.layout.geometry.redraw = true;
        }
        self.detailed_shown = detailed.is_some();
        let redraw = self.layout.geometry.redraw;

        let rect = self.layout.geometry.rect;
        let mut out = String::with_capacity((rect.width * rect.height).max(0) as usize * 4);

        if redraw {
            self.draw_static(theme, settings, mouse, snapshot, detailed, symbol, &mut out);
        }
        if let Some(info) = detailed {
            self.draw_detailed(theme, snapshot, info, symbol, redraw, data_same, &mut out);
        }
        self.draw_rows(theme, settings, snapshot, detailed.is_some(), symbol, data_same, &mut out);

        if self.pool.tick(data_same, &snapshot.processes) {
            trace!("process graph pool holds {} graphs", self.pool.len());
        }
        if self.selected == 0 && self.selected_pid != 0 {
            self.selected_pid = 0;
        }
        self.layout.geometry.redraw = false;
        out.push_str(fx::RESET);
        out
    }

    /// Panel origin, height and row capacity with or without the detailed box
    fn list_area(&self, show_detailed: bool) -> (i32, i32, i32) {
        let rect = self.layout.geometry.rect;
        if show_detailed {
            (
                rect.y + DETAILED_ROWS,
                rect.height - DETAILED_ROWS,
                self.layout.select_max - DETAILED_ROWS,
            )
        } else {
            (rect.y, rect.height, self.layout.select_max)
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_static(
        &mut self,
        theme: &dyn Theme,
        settings: &Settings,
        mouse: &mut MouseMappings,
        snapshot: &ProcSnapshot,
        detailed: Option<&DetailedInfo>,
        symbol: GraphSymbol,
        out: &mut String,
    ) {
        let rect = self.layout.geometry.rect;
        let (x, width) = (rect.x, rect.width);
        let (y, height, select_max) = self.list_area(detailed.is_some());
        let numpids = snapshot.processes.len() as i32;
        let proc_box = theme.color("proc_box");
        let title_left = format!("{}{}", proc_box, symbols::TITLE_LEFT);
        let title_right = format!("{}{}", proc_box, symbols::TITLE_RIGHT);
        let title_left_down = format!("{}{}", proc_box, symbols::TITLE_LEFT_DOWN);
        let title_right_down = format!("{}{}", proc_box, symbols::TITLE_RIGHT_DOWN);

        out.push_str(&self.layout.geometry.frame);
        for key in ["t", "k", "s", "enter"] {
            mouse.remove(key);
        }

        let widths = FieldWidths::for_width(width);
        self.widths = Some(widths);

        if let Some(info) = detailed {
            self.draw_detailed_static(theme, settings, mouse, info, symbol, y, out);
        }

        // Filter
        let filter_width = (width - 58).max(6) as usize;
        let filter_text = if settings.proc_filtering {
            self.filter.render(filter_width)
        } else {
            uresize(&settings.proc_filter, filter_width, true)
        };
        out.push_str(&mv::to(y, x + 9));
        out.push_str(&title_left);
        if !filter_text.is_empty() {
            out.push_str(fx::B);
        }
        out.push_str(theme.color("hi_fg"));
        out.push('f');
        out.push_str(theme.color("title"));
        if filter_text.is_empty() {
            out.push_str("ilter");
        } else {
            out.push(' ');
            out.push_str(&filter_text);
        }
        if !settings.proc_filtering && !filter_text.is_empty() {
            out.push_str(theme.color("hi_fg"));
            out.push_str(" del");
        }
        if settings.proc_filtering {
            out.push_str(theme.color("hi_fg"));
            out.push(' ');
            out.push_str(symbols::ENTER);
        }
        out.push_str(fx::UB);
        out.push_str(&title_right);
        if !settings.proc_filtering {
            let f_len = if filter_text.is_empty() {
                6
            } else {
                ulen(&filter_text) as i32 + 2
            };
            mouse.set("f", MouseRegion::new(y, x + 10, 1, f_len));
            if filter_text.is_empty() {
                mouse.remove("delete");
            } else {
                mouse.set("delete", MouseRegion::new(y, x + 11 + f_len, 1, 3));
            }
        }

        // Per-core, reverse, tree and sorting toggles
        let sorting = &settings.proc_sorting;
        let sort_len = ulen(sorting) as i32;
        let sort_pos = x + width - sort_len - 8;
        let bold = |on: bool| if on { fx::B } else { "" };

        if width > 55 + sort_len {
            out.push_str(&format!(
                "{}{}{}{}per-{}c{}ore{}{}",
                mv::to(y, sort_pos - 25),
                title_left,
                bold(settings.proc_per_core),
                theme.color("title"),
                theme.color("hi_fg"),
                theme.color("title"),
                fx::UB,
                title_right
            ));
            mouse.set("c", MouseRegion::new(y, sort_pos - 24, 1, 8));
        }
        if width > 45 + sort_len {
            out.push_str(&format!(
                "{}{}{}{}r{}everse{}{}",
                mv::to(y, sort_pos - 15),
                title_left,
                bold(settings.proc_reversed),
                theme.color("hi_fg"),
                theme.color("title"),
                fx::UB,
                title_right
            ));
            mouse.set("r", MouseRegion::new(y, sort_pos - 14, 1, 7));
        }
        if width > 35 + sort_len {
            out.push_str(&format!(
                "{}{}{}{}tre{}e{}{}",
                mv::to(y, sort_pos - 6),
                title_left,
                bold(settings.proc_tree),
                theme.color("title"),
                theme.color("hi_fg"),
                fx::UB,
                title_right
            ));
            mouse.set("e", MouseRegion::new(y, sort_pos - 5, 1, 4));
        }
        out.push_str(&format!(
            "{}{}{}{}< {}{}{} >{}{}",
            mv::to(y, sort_pos),
            title_left,
            fx::B,
            theme.color("hi_fg"),
            theme.color("title"),
            sorting,
            theme.color("hi_fg"),
            fx::UB,
            title_right
        ));
        mouse.set("left", MouseRegion::new(y, sort_pos + 1, 1, 2));
        mouse.set("right", MouseRegion::new(y, sort_pos + sort_len + 3, 1, 2));

        // Select, info and signal buttons
        let selected = self.selected;
        let at_end = selected == select_max && self.start == numpids - select_max;
        let down_button = format!(
            "{}{}",
            if at_end {
                theme.color("inactive_fg")
            } else {
                theme.color("hi_fg")
            },
            symbols::DOWN
        );
        let (t_color, hi_color) = if selected == 0 {
            (theme.color("inactive_fg"), theme.color("inactive_fg"))
        } else {
            (theme.color("title"), theme.color("hi_fg"))
        };
        let bottom = y + height - 1;
        let mut mouse_x = x + 14;
        out.push_str(&format!(
            "{}{}{}{}{}{} select {}{}{}{}{}{}info {}{}{}{}",
            mv::to(bottom, x + 1),
            title_left_down,
            fx::B,
            hi_color,
            symbols::UP,
            theme.color("title"),
            down_button,
            fx::UB,
            title_right_down,
            title_left_down,
            fx::B,
            t_color,
            hi_color,
            symbols::ENTER,
            fx::UB,
            title_right_down
        ));
        if selected > 0 {
            mouse.set("enter", MouseRegion::new(bottom, mouse_x, 1, 6));
        }
        mouse_x += 8;
        let mut button = |out: &mut String, key: char, rest: &str, width: i32, mouse_x: &mut i32| {
            out.push_str(&format!(
                "{}{}{}{}{}{}{}",
                title_left_down,
                fx::B,
                hi_color,
                key,
                t_color,
                rest,
                fx::UB
            ));
            out.push_str(&title_right_down);
            if selected > 0 {
                mouse.set(&key.to_string(), MouseRegion::new(bottom, *mouse_x, 1, width));
            }
            *mouse_x += width + 2;
        };
        if width > 60 {
            button(out, 't', "erminate", 9, &mut mouse_x);
        }
        if width > 55 {
            button(out, 'k', "ill", 4, &mut mouse_x);
        }
        button(out, 's', "ignals", 7, &mut mouse_x);

        // Column labels
        out.push_str(&mv::to(y + 1, x + 1));
        out.push_str(theme.color("title"));
        out.push_str(fx::B);
        if settings.proc_tree {
            out.push_str(&ljust("Tree:", widths.tree.max(0) as usize));
            out.push(' ');
        } else {
            out.push_str(&rjust("Pid:", 8));
            out.push(' ');
            out.push_str(&ljust("Program:", widths.prog.max(0) as usize));
            out.push(' ');
            if widths.has_cmd() {
                out.push_str(&ljust("Command:", widths.cmd as usize));
            }
            out.push(' ');
        }
        if widths.has_threads() {
            out.push_str(&mv::l(4));
            out.push_str("Threads: ");
        }
        out.push_str(&ljust("User:", widths.user as usize));
        out.push(' ');
        out.push_str(&rjust(
            if settings.proc_mem_bytes { "MemB" } else { "Mem%" },
            5,
        ));
        out.push(' ');
        out.push_str(&rjust("Cpu%", 10));
        out.push_str(fx::UB);
    }

    /// Structure of the detailed sub-panel: titles, buttons, labels and the
    /// command line
    #[allow(clippy::too_many_arguments)]
    fn draw_detailed_static(
        &mut self,
        theme: &dyn Theme,
        settings: &Settings,
        mouse: &mut MouseMappings,
        info: &DetailedInfo,
        symbol: GraphSymbol,
        list_y: i32,
        out: &mut String,
    ) {
        let rect = self.layout.geometry.rect;
        let (x, width) = (rect.x, rect.width);
        let d = DetailedBox::new(x, rect.y, width);
        self.detailed = d;
        let alive = info.status.is_alive();
        let selected = self.selected;

        if alive {
            self.detailed_cpu_graph = Graph::new(
                theme,
                d.graph_width - 1,
                7,
                "cpu",
                &info.cpu_percent,
                symbol,
                GraphOptions::default(),
            );
            self.detailed_mem_graph = Graph::new(
                theme,
                d.width / 3,
                1,
                "",
                &info.mem_bytes,
                symbol,
                GraphOptions {
                    max_value: info.first_mem,
                    ..Default::default()
                },
            );
        }

        let proc_box = theme.color("proc_box");
        let title_left = format!("{}{}", proc_box, symbols::TITLE_LEFT);
        let title_right = format!("{}{}", proc_box, symbols::TITLE_RIGHT);
        let pid_str = info.entry.pid.to_string();
        let name_width = (d.graph_width - pid_str.len() as i32 - 7).max(0) as usize;

        out.push_str(&format!(
            "{}{}{}{}{}{}{}{}{}proc{}{}{}{}",
            mv::to(list_y, x),
            proc_box,
            symbols::DIV_LEFT,
            symbols::H_LINE,
            title_left,
            theme.color("hi_fg"),
            fx::B,
            superscript(4, settings.tty_mode),
            theme.color("title"),
            fx::UB,
            title_right,
            symbols::H_LINE.repeat((width - 10).max(0) as usize),
            symbols::DIV_RIGHT
        ));
        out.push_str(&format!(
            "{}{}{}{}{}{}{}{}{}{}{}{}{}",
            mv::to(d.y, d.graph_x + 2),
            title_left,
            fx::B,
            theme.color("title"),
            pid_str,
            fx::UB,
            title_right,
            title_left,
            fx::B,
            theme.color("title"),
            uresize(&info.entry.name, name_width, true),
            fx::UB,
            title_right
        ));

        out.push_str(&format!(
            "{}{}{}{}{}{}",
            mv::to(d.y, d.x - 1),
            proc_box,
            symbols::DIV_UP,
            mv::to(list_y, d.x - 1),
            symbols::DIV_DOWN,
            theme.color("div_line")
        ));
        for i in 1..DETAILED_ROWS {
            out.push_str(&mv::to(d.y + i, d.x - 1));
            out.push_str(symbols::V_LINE);
        }

        let t_color = if !alive || selected > 0 {
            theme.color("inactive_fg")
        } else {
            theme.color("title")
        };
        let hi_color = if !alive || selected > 0 {
            t_color
        } else {
            theme.color("hi_fg")
        };
        let hide = if selected > 0 {
            format!("{}hide ", t_color)
        } else {
            format!("{}hide {}", theme.color("title"), theme.color("hi_fg"))
        };
        let mut mouse_x = d.x + 2;
        out.push_str(&mv::to(d.y, d.x + 1));
        let button = |key: char, rest: &str| {
            format!(
                "{}{}{}{}{}{}{}{}",
                title_left,
                hi_color,
                fx::B,
                key,
                t_color,
                rest,
                fx::UB,
                title_right
            )
        };
        if width > 55 {
            out.push_str(&button('t', "erminate"));
            if alive && selected == 0 {
                mouse.set("t", MouseRegion::new(d.y, mouse_x, 1, 9));
            }
            mouse_x += 11;
        }
        out.push_str(&button('k', "ill"));
        out.push_str(&button('s', "ignals"));
        out.push_str(&format!(
            "{}{}{}{}{}{}{}{}",
            mv::to(d.y, d.x + d.width - 10),
            title_left,
            t_color,
            fx::B,
            hide,
            symbols::ENTER,
            fx::UB,
            title_right
        ));
        if alive && selected == 0 {
            mouse.set("k", MouseRegion::new(d.y, mouse_x, 1, 4));
            mouse_x += 6;
            mouse.set("s", MouseRegion::new(d.y, mouse_x, 1, 7));
        }
        if selected == 0 {
            mouse.set("enter", MouseRegion::new(d.y, d.x + d.width - 9, 1, 6));
        }

        // Labels
        let (item_fit, item_width) = d.items();
        let item_width = item_width.max(0) as usize;
        out.push_str(&mv::to(d.y + 1, d.x + 1));
        out.push_str(fx::B);
        out.push_str(theme.color("title"));
        let labels = [
            "Status:", "Elapsed:", "IO/R:", "IO/W:", "Parent:", "User:", "Nice:", "Threads:",
        ];
        for (i, label) in labels.iter().enumerate() {
            if i < 2 || item_fit > i as i32 {
                out.push_str(&cjust(label, item_width));
            }
        }

        // Command line, wrapped over at most three lines
        for (i, letter) in ['C', 'M', 'D'].iter().enumerate() {
            out.push_str(&mv::to(d.y + 5 + i as i32, d.x + 1));
            out.push(*letter);
        }
        out.push_str(theme.color("main_fg"));
        out.push_str(fx::UB);
        let line_width = (d.width - 5).max(1);
        let cmd_size = uwidth(&info.entry.cmd) as i32;
        let num_lines = 3.min((f64::from(cmd_size) / f64::from(line_width)).ceil() as i32);
        for i in 0..num_lines {
            let line = if num_lines == 1 { 1 } else { i };
            let tail = luresize(
                &info.entry.cmd,
                (cmd_size - line_width * i).max(0) as usize,
                true,
            );
            out.push_str(&mv::to(d.y + 5 + line, d.x + 3));
            out.push_str(&cjust(&tail, line_width as usize));
        }
    }

    /// Values of the detailed sub-panel
    #[allow(clippy::too_many_arguments)]
    fn draw_detailed(
        &mut self,
        theme: &dyn Theme,
        snapshot: &ProcSnapshot,
        info: &DetailedInfo,
        symbol: GraphSymbol,
        redraw: bool,
        data_same: bool,
        out: &mut String,
    ) {
        let d = self.detailed;
        let alive = info.status.is_alive();
        let (item_fit, item_width) = d.items();
        let item_width = item_width.max(0) as usize;
        let unchanged = redraw || data_same || !alive;
        let graph_bg = glyph_table(symbol, Orientation::Up)[1];

        // Graph part
        let cpu_str = if alive {
            format!(
                "{}%{}{}{}",
                short_percent(info.entry.cpu_p),
                mv::r(1),
                if d.graph_width < 20 { "C" } else { "Core" },
                info.entry.cpu_n + 1
            )
        } else {
            String::new()
        };
        out.push_str(&mv::to(d.y + 1, d.graph_x + 1));
        out.push_str(fx::UB);
        out.push_str(self.detailed_cpu_graph.append(theme, &info.cpu_percent, unchanged));
        out.push_str(&mv::to(d.y + 1, d.graph_x + 1));
        out.push_str(theme.color("title"));
        out.push_str(fx::B);
        out.push_str(&cpu_str);
        for (i, letter) in ['C', 'P', 'U'].iter().enumerate() {
            out.push_str(&mv::to(d.y + 3 + i as i32, d.graph_x + 1));
            out.push(*letter);
        }

        // Info part
        let stat_color = if !alive {
            theme.color("inactive_fg")
        } else if info.status == ProcStatus::Running {
            theme.color("proc_misc")
        } else {
            theme.color("main_fg")
        };
        out.push_str(&mv::to(d.y + 2, d.x + 1));
        out.push_str(stat_color);
        out.push_str(fx::UB);
        out.push_str(&cjust(info.status.as_str(), item_width));
        out.push_str(theme.color("main_fg"));
        let values = [
            info.elapsed.clone(),
            info.io_read.clone(),
            info.io_write.clone(),
            info.parent.clone(),
            info.entry.user.clone(),
            info.entry.p_nice.to_string(),
            info.entry.threads.to_string(),
        ];
        for (i, value) in values.iter().enumerate() {
            // Elapsed is always shown, the rest as far as they fit
            if i == 0 || item_fit > i as i32 + 1 {
                out.push_str(&cjust(value, item_width));
            }
        }

        let mem_now = info.mem_bytes.back().copied().unwrap_or(0);
        let mem_p = mem_now as f64 * 100.0 / snapshot.total_mem.max(1) as f64;
        let mem_label = format!(
            "{}{}% ",
            if item_fit > 4 { "Memory: " } else { "M:" },
            short_percent(mem_p)
        );
        let third = (d.width / 3).max(0);
        out.push_str(&mv::to(d.y + 4, d.x + 1));
        out.push_str(theme.color("title"));
        out.push_str(fx::B);
        out.push_str(&rjust(&mem_label, (third - 2).max(0) as usize));
        out.push_str(theme.color("inactive_fg"));
        out.push_str(fx::UB);
        out.push_str(&graph_bg.to_string().repeat(third as usize));
        out.push_str(&mv::l(third));
        out.push_str(theme.color("proc_misc"));
        out.push_str(self.detailed_mem_graph.append(theme, &info.mem_bytes, unchanged));
        out.push(' ');
        out.push_str(theme.color("title"));
        out.push_str(fx::B);
        out.push_str(&info.memory);
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_rows(
        &mut self,
        theme: &dyn Theme,
        settings: &Settings,
        snapshot: &ProcSnapshot,
        show_detailed: bool,
        symbol: GraphSymbol,
        data_same: bool,
        out: &mut String,
    ) {
        let rect = self.layout.geometry.rect;
        let (x, width) = (rect.x, rect.width);
        let (y, height, select_max) = self.list_area(show_detailed);
        let widths = match self.widths {
            Some(w) => w,
            None => FieldWidths::for_width(width),
        };
        let numpids = snapshot.processes.len() as i32;
        let total_mem = snapshot.total_mem.max(1);
        let proc_gradient =
            settings.proc_gradient && !settings.lowcolor && theme.has_gradient("proc");
        let graph_bg = glyph_table(symbol, Orientation::Up)[1]
            .to_string()
            .repeat(GRAPH_WIDTH as usize);

        // Bounds of the current view
        if self.start > 0 && numpids <= select_max {
            self.start = 0;
        }
        if self.start > numpids - select_max {
            self.start = (numpids - select_max).max(0);
        }
        self.selected = self.selected.min(select_max).min(numpids);

        let mut lc = 0;
        for p in snapshot
            .processes
            .iter()
            .skip(self.start.max(0) as usize)
            .take(select_max.max(0) as usize)
        {
            let is_selected = lc + 1 == self.selected;
            if is_selected {
                self.selected_pid = p.pid;
            }

            out.push_str(fx::RESET);
            let colors = if is_selected {
                out.push_str(theme.color("selected_bg"));
                out.push_str(theme.color("selected_fg"));
                out.push_str(fx::B);
                RowColors {
                    cpu: fx::B,
                    mem: fx::B,
                    threads: fx::B,
                    gradient: fx::B,
                    end: fx::UB.to_string(),
                }
            } else {
                Self::row_colors(
                    theme,
                    settings,
                    p,
                    total_mem,
                    (self.selected - lc).abs(),
                    select_max,
                    proc_gradient,
                )
            };

            out.push_str(&mv::to(y + 2 + lc, x + 1));
            if settings.proc_tree {
                Self::push_tree_line(out, p, &colors, widths.tree);
            } else {
                out.push_str(colors.gradient);
                out.push_str(&rjust(&p.pid.to_string(), 8));
                out.push(' ');
                out.push_str(colors.cpu);
                out.push_str(&ljust(&p.name, widths.prog.max(0) as usize));
                out.push(' ');
                out.push_str(&colors.end);
                if widths.has_cmd() {
                    out.push_str(colors.gradient);
                    out.push_str(&ljust(&p.cmd, widths.cmd as usize));
                    out.push(' ');
                }
            }

            // Common end of line
            let mem_str = if settings.proc_mem_bytes {
                floating_humanizer(p.mem, true)
            } else {
                format!("{}%", short_percent(p.mem as f64 * 100.0 / total_mem as f64))
            };
            if widths.has_threads() {
                out.push_str(colors.threads);
                out.push_str(&rjust(&p.threads.min(9999).to_string(), widths.thread as usize));
                out.push(' ');
                out.push_str(&colors.end);
            }
            let user_size = widths.user as usize;
            let user = if uwidth(&p.user) > user_size {
                format!("{}+", uresize(&p.user, user_size.saturating_sub(1), true))
            } else {
                p.user.clone()
            };
            out.push_str(colors.gradient);
            out.push_str(&ljust(&user, user_size));
            out.push(' ');
            out.push_str(colors.mem);
            out.push_str(&rjust(&mem_str, 5));
            out.push_str(&colors.end);
            out.push(' ');
            if !is_selected {
                out.push_str(theme.color("inactive_fg"));
            }
            out.push_str(&graph_bg);
            if let Some(graph) = self.pool.update(theme, p, symbol, data_same) {
                out.push_str(&mv::l(GRAPH_WIDTH));
                out.push_str(colors.cpu);
                out.push_str(graph);
            }
            out.push_str(&colors.end);
            out.push(' ');
            out.push_str(colors.cpu);
            out.push_str(&rjust(&short_percent(p.cpu_p), 4));
            out.push_str("  ");
            out.push_str(&colors.end);

            lc += 1;
        }

        // Blank the rows below the list
        out.push_str(fx::RESET);
        let blank = " ".repeat((width - 2).max(0) as usize);
        for row in lc..select_max {
            out.push_str(&mv::to(y + 2 + row, x + 1));
            out.push_str(&blank);
        }

        // Scrollbar
        if numpids > select_max {
            let scroll_pos = (f64::from(self.start) * f64::from(select_max - 2)
                / f64::from((numpids - (select_max - 2)).max(1)))
            .round() as i32;
            let scroll_pos = scroll_pos.clamp(0, (height - 5).max(0));
            out.push_str(&format!(
                "{}{}{}{}{}{}{}{}",
                mv::to(y + 1, x + width - 2),
                fx::B,
                theme.color("main_fg"),
                symbols::UP,
                mv::to(y + height - 2, x + width - 2),
                symbols::DOWN,
                mv::to(y + 2 + scroll_pos, x + width - 2),
                symbols::BLOCK
            ));
        }

        // Current position and number of processes
        let location = format!("{}/{}", self.start + self.selected, numpids);
        let loc_len = location.len() as i32;
        out.push_str(&format!(
            "{}{}{}{}{}{}{}{}{}{}",
            mv::to(y + height - 1, x + width - 3 - loc_len.max(9)),
            theme.color("proc_box"),
            symbols::H_LINE.repeat((9 - loc_len).max(0) as usize),
            symbols::TITLE_LEFT_DOWN,
            theme.color("title"),
            fx::B,
            location,
            fx::UB,
            theme.color("proc_box"),
            symbols::TITLE_RIGHT_DOWN
        ));
    }

    /// Colors for an unselected row `distance` rows away from the selection
    fn row_colors<'a>(
        theme: &'a dyn Theme,
        settings: &Settings,
        p: &ProcInfo,
        total_mem: u64,
        distance: i32,
        select_max: i32,
        proc_gradient: bool,
    ) -> RowColors<'a> {
        let fade = (distance * 100 / select_max.max(1)).clamp(0, 100);
        let mut colors = if settings.proc_colors {
            let pick = |v: i64| -> &'a str {
                let v = v.clamp(0, 100) as i32;
                if proc_gradient {
                    let val = (v + 100 - fade).clamp(0, 200);
                    if val < 100 {
                        theme.gradient("proc_color")[val as usize].as_str()
                    } else {
                        theme.gradient("process")[(val - 100).min(100) as usize].as_str()
                    }
                } else {
                    theme.gradient("process")[v as usize].as_str()
                }
            };
            RowColors {
                cpu: pick(p.cpu_p.round() as i64),
                mem: pick((p.mem as f64 * 100.0 / total_mem as f64).round() as i64),
                threads: pick((p.threads / 3) as i64),
                gradient: "",
                end: format!("{}{}", theme.color("main_fg"), fx::UB),
            }
        } else {
            RowColors {
                cpu: fx::B,
                mem: fx::B,
                threads: fx::B,
                gradient: "",
                end: fx::UB.to_string(),
            }
        };
        if proc_gradient {
            colors.gradient = theme.gradient("proc")[fade as usize].as_str();
        }
        colors
    }

    /// Tree view part of a row: indentation, pid, name and as much of the
    /// command as fits
    fn push_tree_line(out: &mut String, p: &ProcInfo, colors: &RowColors, tree_size: i32) {
        let prefix_pid = format!("{}{}", p.prefix, p.pid);
        let mut width_left = tree_size;
        out.push_str(colors.gradient);
        out.push_str(&uresize(&prefix_pid, width_left.max(0) as usize, true));
        out.push(' ');
        width_left -= uwidth(&prefix_pid) as i32;
        if width_left > 0 {
            out.push_str(colors.cpu);
            out.push_str(&uresize(&p.name, (width_left - 1) as usize, true));
            out.push_str(&colors.end);
            out.push(' ');
            width_left -= uwidth(&p.name) as i32 + 1;
        }
        if width_left > 7 && !p.cmd.is_empty() {
            out.push_str(colors.gradient);
            out.push_str(&uresize(&p.cmd, (width_left - 1) as usize, true));
            out.push(' ');
            width_left -= uwidth(&p.cmd) as i32 + 1;
        }
        out.push_str(&" ".repeat(width_left.max(0) as usize));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Series, SystemInfo};
    use crate::ui::crt::{strip_escapes, TermSize};
    use crate::ui::layout::LayoutSolver;
    use crate::ui::panel::Rect;
    use crate::ui::theme::DefaultTheme;

    fn processes(n: u64) -> Vec<ProcInfo> {
        (1..=n)
            .map(|pid| ProcInfo {
                pid,
                name: format!("proc{}", pid),
                cmd: format!("/usr/bin/proc{} --flag", pid),
                user: "root".to_string(),
                cpu_p: (pid % 7) as f64 * 3.5,
                mem: pid * 1024 * 1024,
                threads: pid % 5 + 1,
                ..Default::default()
            })
            .collect()
    }

    fn setup(settings: &Settings) -> (DefaultTheme, ProcPanel, MouseMappings) {
        setup_sized(
            settings,
            TermSize {
                width: 120,
                height: 40,
            },
        )
    }

    fn setup_sized(settings: &Settings, term: TermSize) -> (DefaultTheme, ProcPanel, MouseMappings) {
        let theme = DefaultTheme::default();
        let mut mouse = MouseMappings::new();
        let layout = LayoutSolver::recompute(settings, &theme, term, &SystemInfo::default(), &mut mouse);
        let panel = ProcPanel {
            layout: layout.proc,
            ..Default::default()
        };
        (theme, panel, mouse)
    }

    fn snapshot(n: u64) -> ProcSnapshot {
        ProcSnapshot {
            processes: processes(n),
            total_mem: 16 * 1024 * 1024 * 1024,
            detailed: None,
        }
    }

    // ==== Static Tier Tests ====

    #[test]
    fn test_static_tier_only_on_redraw() {
        let settings = Settings::default();
        let (theme, mut panel, mut mouse) = setup(&settings);
        let snap = snapshot(10);
        let first = panel.draw(&theme, &settings, &mut mouse, &snap, false, false);
        assert!(first.contains("Program:"));
        assert!(mouse.contains("f"));
        assert!(mouse.contains("left") && mouse.contains("right"));
        let second = panel.draw(&theme, &settings, &mut mouse, &snap, false, true);
        assert!(!second.contains("Program:"));
        let forced = panel.draw(&theme, &settings, &mut mouse, &snap, true, true);
        assert!(forced.contains("Program:"));
    }

    #[test]
    fn test_tree_labels() {
        let settings = Settings {
            proc_tree: true,
            ..Default::default()
        };
        let (theme, mut panel, mut mouse) = setup(&settings);
        let out = panel.draw(&theme, &settings, &mut mouse, &snapshot(3), false, false);
        assert!(out.contains("Tree:"));
        assert!(!out.contains("Program:"));
    }

    #[test]
    fn test_filter_title() {
        let settings = Settings {
            proc_filter: "fire".to_string(),
            ..Default::default()
        };
        let (theme, mut panel, mut mouse) = setup(&settings);
        let out = panel.draw(&theme, &settings, &mut mouse, &snapshot(3), false, false);
        assert!(strip_escapes(&out).contains("f fire del"));
        assert!(mouse.contains("delete"));

        let settings = Settings {
            proc_filtering: true,
            ..Default::default()
        };
        let (theme, mut panel, mut mouse) = setup(&settings);
        panel.filter = TextEdit::new("abc");
        let out = panel.draw(&theme, &settings, &mut mouse, &snapshot(3), false, false);
        assert!(strip_escapes(&out).contains(&format!("f abc{}", symbols::BLOCK)));
        assert!(!mouse.contains("f"));
    }

    // ==== Row Tests ====

    #[test]
    fn test_rows_and_footer() {
        let settings = Settings::default();
        let (theme, mut panel, mut mouse) = setup(&settings);
        let out = panel.draw(&theme, &settings, &mut mouse, &snapshot(5), false, false);
        let plain = strip_escapes(&out);
        for pid in 1..=5 {
            assert!(plain.contains(&format!("proc{}", pid)));
        }
        assert!(plain.contains("0/5"));
        // No scrollbar for a list that fits
        assert!(!plain.contains(symbols::BLOCK));
    }

    #[test]
    fn test_scrollbar_and_selection() {
        let settings = Settings {
            proc_start: 3,
            proc_selected: 2,
            ..Default::default()
        };
        let (theme, mut panel, mut mouse) = setup(&settings);
        let out = panel.draw(&theme, &settings, &mut mouse, &snapshot(100), false, false);
        assert_eq!(panel.selected_pid, 5);
        assert!(out.contains(theme.color("selected_bg")));
        assert!(strip_escapes(&out).contains("5/100"));
        assert!(out.contains(symbols::BLOCK));
        assert!(mouse.contains("enter"));
    }

    #[test]
    fn test_selection_reset_clears_pid() {
        let settings = Settings {
            proc_selected: 1,
            ..Default::default()
        };
        let (theme, mut panel, mut mouse) = setup(&settings);
        panel.draw(&theme, &settings, &mut mouse, &snapshot(4), false, false);
        assert_eq!(panel.selected_pid, 1);
        let settings = Settings::default();
        panel.draw(&theme, &settings, &mut mouse, &snapshot(4), false, false);
        assert_eq!(panel.selected_pid, 0);
    }

    #[test]
    fn test_out_of_range_view_is_clamped() {
        let settings = Settings {
            proc_start: 50,
            proc_selected: 90,
            ..Default::default()
        };
        let (theme, mut panel, mut mouse) = setup(&settings);
        panel.draw(&theme, &settings, &mut mouse, &snapshot(8), false, false);
        assert_eq!(panel.start(), 0);
        assert_eq!(panel.selected(), 8);
        assert_eq!(panel.selected_pid, 8);
    }

    #[test]
    fn test_mini_graphs_follow_activity() {
        let settings = Settings::default();
        let (theme, mut panel, mut mouse) = setup(&settings);
        let snap = snapshot(7);
        panel.draw(&theme, &settings, &mut mouse, &snap, false, false);
        // pid 7 has 0% cpu and never gets a graph
        assert!(!panel.pool().contains(7));
        assert!(panel.pool().contains(1));
    }

    #[test]
    fn test_symbol_switch_rebuilds_mini_graphs() {
        let is_braille = |c: char| ('\u{2800}'..='\u{28ff}').contains(&c);
        let settings = Settings::default();
        let (theme, mut panel, mut mouse) = setup(&settings);
        let mut snap = snapshot(3);
        for p in &mut snap.processes {
            p.cpu_p = 100.0;
        }
        panel.draw(&theme, &settings, &mut mouse, &snap, false, false);
        let out = panel.draw(&theme, &settings, &mut mouse, &snap, false, false);
        assert!(out.chars().any(is_braille));

        let tty = Settings {
            tty_mode: true,
            ..Default::default()
        };
        let out = panel.draw(&theme, &tty, &mut mouse, &snap, false, false);
        assert!(panel.pool().contains(1));
        assert!(!out.chars().any(is_braille));
    }

    #[test]
    fn test_long_user_is_marked() {
        let settings = Settings::default();
        let (theme, mut panel, mut mouse) = setup(&settings);
        let mut snap = snapshot(1);
        snap.processes[0].user = "averyveryverylongname".to_string();
        let out = panel.draw(&theme, &settings, &mut mouse, &snap, false, false);
        // Panel is 66 wide, so the user column holds 5 columns
        assert!(strip_escapes(&out).contains("aver+"));
    }

    // ==== Detailed View Tests ====

    fn detailed(pid: u64, status: ProcStatus) -> DetailedInfo {
        DetailedInfo {
            last_pid: pid,
            entry: ProcInfo {
                pid,
                name: "firefox".to_string(),
                cmd: "/usr/lib/firefox/firefox -contentproc".to_string(),
                user: "me".to_string(),
                cpu_p: 12.5,
                threads: 42,
                ..Default::default()
            },
            status,
            elapsed: "01:02:03".to_string(),
            parent: "systemd".to_string(),
            io_read: "1.0M".to_string(),
            io_write: "2.0M".to_string(),
            memory: "512M".to_string(),
            cpu_percent: Series::from(vec![10, 20, 30]),
            mem_bytes: Series::from(vec![400, 512]),
            first_mem: 1024,
        }
    }

    #[test]
    fn test_detailed_view() {
        let settings = Settings {
            show_detailed: true,
            detailed_pid: 42,
            ..Default::default()
        };
        let (theme, mut panel, mut mouse) = setup(&settings);
        let mut snap = snapshot(30);
        snap.detailed = Some(detailed(42, ProcStatus::Running));
        snap.total_mem = 1024;
        let out = panel.draw(&theme, &settings, &mut mouse, &snap, false, false);
        let plain = strip_escapes(&out);
        assert!(plain.contains("42"));
        assert!(plain.contains("firefox"));
        assert!(plain.contains("Status:"));
        assert!(plain.contains("Running"));
        assert!(plain.contains("01:02:03"));
        assert!(plain.contains("50.0% "));
        assert!(mouse.contains("k") && mouse.contains("s") && mouse.contains("t"));
        // The list shrinks by the height of the detailed box
        assert!(plain.contains("0/30"));
        assert!(!plain.contains("proc17"));
    }

    #[test]
    fn test_detailed_view_at_minimum_size() {
        let settings = Settings {
            shown_boxes: "proc".to_string(),
            show_detailed: true,
            detailed_pid: 42,
            proc_selected: 5,
            ..Default::default()
        };
        let (theme, mut panel, mut mouse) = setup_sized(
            &settings,
            TermSize {
                width: 44,
                height: 16,
            },
        );
        assert_eq!(panel.layout.geometry.rect, Rect::new(1, 1, 44, 16));
        assert_eq!(panel.list_area(true).2, 5);

        let mut snap = snapshot(30);
        snap.detailed = Some(detailed(42, ProcStatus::Running));
        for data_same in [false, true] {
            let out = panel.draw(&theme, &settings, &mut mouse, &snap, false, data_same);
            let plain = strip_escapes(&out);
            assert!(plain.contains("Running"));
            assert!(plain.contains("proc1 "));
            assert!(plain.contains("proc5"));
            assert!(!plain.contains("proc6"));
            assert!(plain.contains("5/30"));
        }
        assert_eq!(panel.selected_pid, 5);
    }

    #[test]
    fn test_detailed_hidden_for_other_pid() {
        let settings = Settings {
            show_detailed: true,
            detailed_pid: 7,
            ..Default::default()
        };
        let (theme, mut panel, mut mouse) = setup(&settings);
        let mut snap = snapshot(3);
        snap.detailed = Some(detailed(42, ProcStatus::Running));
        let out = panel.draw(&theme, &settings, &mut mouse, &snap, false, false);
        assert!(!strip_escapes(&out).contains("Status:"));
    }

    #[test]
    fn test_dead_process_keeps_buttons_inactive() {
        let settings = Settings {
            show_detailed: true,
            detailed_pid: 42,
            ..Default::default()
        };
        let (theme, mut panel, mut mouse) = setup(&settings);
        let mut snap = snapshot(3);
        snap.detailed = Some(detailed(42, ProcStatus::Dead));
        let out = panel.draw(&theme, &settings, &mut mouse, &snap, false, false);
        assert!(strip_escapes(&out).contains("Dead"));
        assert!(!mouse.contains("k"));
        assert!(mouse.contains("enter"));
    }
}
