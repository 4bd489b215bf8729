//! Layout - partitions the terminal into the four panels
//!
//! The solver runs after every resize or layout-affecting settings change.
//! It places the panels by percentage weights and placement toggles, derives
//! the inner boxes of the CPU, memory and network panels, renders every
//! static frame once and marks all panels for redraw.
//!
//! For any terminal at least `min_size()` large, the shown rectangles tile
//! the terminal exactly.

use tracing::debug;

use super::box_frame::create_box;
use super::crt::{fx, mv, MouseMappings, TermSize};
use super::panel::{PanelGeometry, Rect};
use super::row_print::uresize;
use super::symbols;
use super::theme::Theme;
use crate::core::{Boxes, Settings, SystemInfo};

/// Size weights of one panel, in percent of the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxWeights {
    pub width_p: i32,
    pub height_p: i32,
    pub min_width: i32,
    pub min_height: i32,
}

pub const CPU_WEIGHTS: BoxWeights = BoxWeights {
    width_p: 100,
    height_p: 32,
    min_width: 60,
    min_height: 8,
};

pub const MEM_WEIGHTS: BoxWeights = BoxWeights {
    width_p: 45,
    height_p: 38,
    min_width: 36,
    min_height: 10,
};

pub const NET_WEIGHTS: BoxWeights = BoxWeights {
    width_p: 45,
    height_p: 30,
    min_width: 3,
    min_height: 6,
};

pub const PROC_WEIGHTS: BoxWeights = BoxWeights {
    width_p: 55,
    height_p: 68,
    min_width: 44,
    min_height: 16,
};

/// Width of one per-core column
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum CoreColumn {
    /// Label and percentage only
    #[default]
    Narrow,
    /// Adds a short meter
    Medium,
    /// Adds a long meter
    Wide,
}

impl CoreColumn {
    /// Columns used by one core line, with or without a temperature suffix
    pub fn preset(self, show_temp: bool) -> i32 {
        let temp = i32::from(show_temp);
        match self {
            CoreColumn::Wide => 21 + 12 * temp,
            CoreColumn::Medium => 15 + 6 * temp,
            CoreColumn::Narrow => 8 + 6 * temp,
        }
    }

    /// Meter width inside one core line
    pub fn meter_width(self) -> i32 {
        match self {
            CoreColumn::Wide => 10,
            CoreColumn::Medium => 5,
            CoreColumn::Narrow => 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CpuLayout {
    pub geometry: PanelGeometry,
    /// The per-core box inside the panel
    pub inner: Rect,
    pub columns: i32,
    pub column: CoreColumn,
    pub show_temp: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemLayout {
    pub geometry: PanelGeometry,
    pub mem_width: i32,
    pub disks_width: i32,
    /// Column of the divider between memory and disks
    pub divider: i32,
    pub item_height: i32,
    /// 1 compact, 2 normal, 3 spacious
    pub mem_size: i32,
    pub mem_meter: i32,
    pub graph_height: i32,
    pub disk_meter: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetLayout {
    pub geometry: PanelGeometry,
    /// The download/upload box
    pub inner: Rect,
    pub d_graph_height: i32,
    pub u_graph_height: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcLayout {
    pub geometry: PanelGeometry,
    /// Visible row capacity
    pub select_max: i32,
}

/// Result of one layout pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    pub cpu: CpuLayout,
    pub mem: MemLayout,
    pub net: NetLayout,
    pub proc: ProcLayout,
}

impl Layout {
    /// Rectangles of the shown panels
    pub fn shown_rects(&self) -> Vec<Rect> {
        [
            &self.cpu.geometry,
            &self.mem.geometry,
            &self.net.geometry,
            &self.proc.geometry,
        ]
        .into_iter()
        .filter(|g| g.shown)
        .map(|g| g.rect)
        .collect()
    }
}

/// Smallest terminal the given panel set can be drawn in, as (width, height)
pub fn min_size(boxes: Boxes) -> (i32, i32) {
    let cpu = boxes.contains(Boxes::CPU);
    let mem = boxes.contains(Boxes::MEM);
    let net = boxes.contains(Boxes::NET);
    let proc = boxes.contains(Boxes::PROC);

    // Memory and network share one column
    let mut width = if mem || net { MEM_WEIGHTS.min_width } else { 0 };
    if proc {
        width += PROC_WEIGHTS.min_width;
    }
    if cpu {
        width = width.max(CPU_WEIGHTS.min_width);
    }

    let mut height = if cpu { CPU_WEIGHTS.min_height } else { 0 };
    let mut side = 0;
    if mem {
        side += MEM_WEIGHTS.min_height;
    }
    if net {
        side += NET_WEIGHTS.min_height;
    }
    height += if proc {
        side.max(PROC_WEIGHTS.min_height)
    } else {
        side
    };

    (width, height)
}

#[inline]
fn percent(total: i32, p: i32) -> i32 {
    (f64::from(total) * f64::from(p) / 100.0).round() as i32
}

#[inline]
fn ceil_div(a: i32, b: i32) -> i32 {
    (f64::from(a) / f64::from(b)).ceil() as i32
}

/// Computes the panel layout
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutSolver;

impl LayoutSolver {
    /// Recompute every panel from the current settings and terminal size.
    ///
    /// Clears the mouse mappings; the panels re-register their buttons on
    /// the next draw.
    pub fn recompute(
        settings: &Settings,
        theme: &dyn Theme,
        term: TermSize,
        system: &SystemInfo,
        mouse: &mut MouseMappings,
    ) -> Layout {
        mouse.clear();

        let boxes = settings.boxes();
        let mut layout = Layout::default();
        layout.cpu.geometry.shown = boxes.contains(Boxes::CPU);
        layout.mem.geometry.shown = boxes.contains(Boxes::MEM);
        layout.net.geometry.shown = boxes.contains(Boxes::NET);
        layout.proc.geometry.shown = boxes.contains(Boxes::PROC);

        for geometry in [
            &mut layout.cpu.geometry,
            &mut layout.mem.geometry,
            &mut layout.net.geometry,
            &mut layout.proc.geometry,
        ] {
            geometry.rect = Rect::new(1, 1, 0, 0);
            geometry.redraw = true;
        }

        if layout.cpu.geometry.shown {
            layout.cpu = Self::cpu(settings, theme, term, system, boxes);
        }
        if layout.mem.geometry.shown {
            layout.mem = Self::mem(settings, theme, term, system, &layout);
        }
        if layout.net.geometry.shown {
            layout.net = Self::net(settings, theme, term, &layout);
        }
        if layout.proc.geometry.shown {
            layout.proc = Self::proc(settings, theme, term, &layout);
        }

        debug!(
            "layout {}x{}: cpu {:?} mem {:?} net {:?} proc {:?}",
            term.width,
            term.height,
            layout.cpu.geometry.rect,
            layout.mem.geometry.rect,
            layout.net.geometry.rect,
            layout.proc.geometry.rect
        );
        layout
    }

    fn cpu(
        settings: &Settings,
        theme: &dyn Theme,
        term: TermSize,
        system: &SystemInfo,
        boxes: Boxes,
    ) -> CpuLayout {
        let show_temp = settings.check_temp && system.has_sensors;
        let cores = system.core_count.max(1) as i32;

        let width = percent(term.width, CPU_WEIGHTS.width_p);
        let height_p = if boxes == Boxes::CPU {
            100
        } else {
            CPU_WEIGHTS.height_p
        };
        let height = CPU_WEIGHTS.min_height.max(percent(term.height, height_p));
        let x = 1;
        let y = if settings.cpu_bottom {
            term.height - height + 1
        } else {
            1
        };

        let room = width - width / 3;
        let mut columns = ceil_div(cores + 1, (height - 5).max(1)).max(1);
        let column = [CoreColumn::Wide, CoreColumn::Medium, CoreColumn::Narrow]
            .into_iter()
            .find(|c| columns * c.preset(show_temp) < room)
            .unwrap_or_else(|| {
                columns = (room / CoreColumn::Narrow.preset(show_temp)).max(1);
                CoreColumn::Narrow
            });
        let preset = column.preset(show_temp);
        let b_width = if column == CoreColumn::Narrow {
            preset * columns + 1
        } else {
            preset * columns - (columns - 1)
        };
        let b_height = (height - 2).min(ceil_div(cores, columns) + 4);
        let b_x = x + width - b_width - 1;
        let b_y = y + ceil_div(height - 2, 2) - ceil_div(b_height, 2) + 1;

        let rect = Rect::new(x, y, width, height);
        let inner = Rect::new(b_x, b_y, b_width, b_height);
        let (title, title2) = if settings.cpu_bottom {
            ("", "cpu")
        } else {
            ("cpu", "")
        };
        let mut frame = create_box(
            theme,
            settings.tty_mode,
            rect,
            Some(theme.color("cpu_box")),
            true,
            title,
            title2,
            1,
        );
        let name = if settings.custom_cpu_name.is_empty() {
            &system.cpu_name
        } else {
            &settings.custom_cpu_name
        };
        let cpu_title = uresize(name, (b_width - 14).max(0) as usize, true);
        frame.push_str(&create_box(
            theme,
            settings.tty_mode,
            inner,
            None,
            false,
            &cpu_title,
            "",
            0,
        ));

        CpuLayout {
            geometry: PanelGeometry {
                rect,
                frame,
                redraw: true,
                shown: true,
            },
            inner,
            columns,
            column,
            show_temp,
        }
    }

    fn mem(
        settings: &Settings,
        theme: &dyn Theme,
        term: TermSize,
        system: &SystemInfo,
        layout: &Layout,
    ) -> MemLayout {
        let cpu = &layout.cpu.geometry;
        let cpu_height = if cpu.shown { cpu.rect.height } else { 0 };
        let net_shown = layout.net.geometry.shown;
        let proc_shown = layout.proc.geometry.shown;

        let width = percent(
            term.width,
            if proc_shown { MEM_WEIGHTS.width_p } else { 100 },
        );
        let used_p = CPU_WEIGHTS.height_p * i32::from(cpu.shown)
            + NET_WEIGHTS.height_p * i32::from(net_shown);
        let mut height = percent(term.height, 100 - used_p) + 1;
        if height + cpu_height > term.height {
            height = term.height - cpu_height;
        }
        let x = if settings.proc_left && proc_shown {
            term.width - width + 1
        } else {
            1
        };
        let y = if settings.mem_below_net && net_shown {
            term.height - height + 1 - if settings.cpu_bottom { cpu_height } else { 0 }
        } else if settings.cpu_bottom {
            1
        } else {
            cpu_height + 1
        };

        let mut mem = MemLayout::default();
        if settings.show_disks {
            mem.mem_width = ceil_div(width - 3, 2);
            mem.disks_width = width - mem.mem_width - 3;
            mem.mem_width += mem.mem_width % 2;
            mem.divider = x + mem.mem_width;
        } else {
            mem.mem_width = width - 1;
        }

        let swap_items = system.has_swap && !settings.swap_disk;
        mem.item_height = if swap_items { 6 } else { 4 };
        mem.mem_size = if height - (if swap_items { 3 } else { 2 }) > 2 * mem.item_height {
            3
        } else if mem.mem_width > 25 {
            2
        } else {
            1
        };

        let disks = if settings.show_disks { mem.disks_width } else { 0 };
        mem.mem_meter = (width - disks - if mem.mem_size > 2 { 9 } else { 20 }).max(0);
        if mem.mem_size == 1 {
            mem.mem_meter += 6;
        }

        if settings.mem_graphs {
            let rows = height - if swap_items { 2 } else { 1 };
            let items = (if mem.mem_size == 3 { 2 } else { 1 }) * mem.item_height;
            mem.graph_height =
                ((f64::from(rows - items) / f64::from(mem.item_height)).round() as i32).max(1);
            if mem.graph_height > 1 {
                mem.mem_meter += 6;
            }
        }

        if settings.show_disks {
            mem.disk_meter = (width - mem.mem_width - 23).max(0);
            if mem.disks_width < 25 {
                mem.disk_meter += 10;
            }
        }

        let rect = Rect::new(x, y, width, height);
        let mem_box = theme.color("mem_box");
        let mut frame = create_box(
            theme,
            settings.tty_mode,
            rect,
            Some(mem_box),
            true,
            "mem",
            "",
            2,
        );
        let toggle_col = if settings.show_disks {
            mem.divider + 2
        } else {
            x + width - 9
        };
        frame.push_str(&format!(
            "{}{}{}{}{}d{}isks{}{}{}",
            mv::to(y, toggle_col),
            mem_box,
            symbols::TITLE_LEFT,
            if settings.show_disks { fx::B } else { "" },
            theme.color("hi_fg"),
            theme.color("title"),
            fx::UB,
            mem_box,
            symbols::TITLE_RIGHT
        ));
        if settings.show_disks {
            frame.push_str(&mv::to(y, mem.divider));
            frame.push_str(symbols::DIV_UP);
            frame.push_str(&mv::to(y + height - 1, mem.divider));
            frame.push_str(symbols::DIV_DOWN);
            frame.push_str(theme.color("div_line"));
            for i in 1..height - 1 {
                frame.push_str(&mv::to(y + i, mem.divider));
                frame.push_str(symbols::V_LINE);
            }
        }

        mem.geometry = PanelGeometry {
            rect,
            frame,
            redraw: true,
            shown: true,
        };
        mem
    }

    fn net(settings: &Settings, theme: &dyn Theme, term: TermSize, layout: &Layout) -> NetLayout {
        let cpu = &layout.cpu.geometry;
        let cpu_height = if cpu.shown { cpu.rect.height } else { 0 };
        let mem = &layout.mem.geometry;
        let mem_height = if mem.shown { mem.rect.height } else { 0 };
        let proc_shown = layout.proc.geometry.shown;

        let width = percent(
            term.width,
            if proc_shown { NET_WEIGHTS.width_p } else { 100 },
        );
        let height = term.height - cpu_height - mem_height;
        let x = if settings.proc_left && proc_shown {
            term.width - width + 1
        } else {
            1
        };
        let y = if settings.mem_below_net && mem.shown {
            if settings.cpu_bottom {
                1
            } else {
                cpu_height + 1
            }
        } else {
            term.height - height + 1 - if settings.cpu_bottom { cpu_height } else { 0 }
        };

        let b_width = if width > 45 { 27 } else { 19 };
        let b_height = if height > 10 { 9 } else { height - 2 };
        let b_x = x + width - b_width - 1;
        let b_y = y + (height - 2) / 2 - b_height / 2 + 1;
        let d_graph_height = (f64::from(height - 2) / 2.0).round() as i32;
        let u_graph_height = height - 2 - d_graph_height;

        let rect = Rect::new(x, y, width, height);
        let inner = Rect::new(b_x, b_y, b_width, b_height);
        let mut frame = create_box(
            theme,
            settings.tty_mode,
            rect,
            Some(theme.color("net_box")),
            true,
            "net",
            "",
            3,
        );
        frame.push_str(&create_box(
            theme,
            settings.tty_mode,
            inner,
            None,
            false,
            "download",
            "upload",
            0,
        ));

        NetLayout {
            geometry: PanelGeometry {
                rect,
                frame,
                redraw: true,
                shown: true,
            },
            inner,
            d_graph_height,
            u_graph_height,
        }
    }

    fn proc(settings: &Settings, theme: &dyn Theme, term: TermSize, layout: &Layout) -> ProcLayout {
        let cpu = &layout.cpu.geometry;
        let cpu_height = if cpu.shown { cpu.rect.height } else { 0 };
        let side_width = if layout.mem.geometry.shown {
            layout.mem.geometry.rect.width
        } else if layout.net.geometry.shown {
            layout.net.geometry.rect.width
        } else {
            0
        };

        let width = term.width - side_width;
        let height = term.height - cpu_height;
        let x = if settings.proc_left {
            1
        } else {
            term.width - width + 1
        };
        let y = if settings.cpu_bottom && cpu.shown {
            1
        } else {
            cpu_height + 1
        };

        let rect = Rect::new(x, y, width, height);
        let frame = create_box(
            theme,
            settings.tty_mode,
            rect,
            Some(theme.color("proc_box")),
            true,
            "proc",
            "",
            4,
        );

        ProcLayout {
            geometry: PanelGeometry {
                rect,
                frame,
                redraw: true,
                shown: true,
            },
            select_max: height - 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::crt::MouseRegion;
    use crate::ui::theme::DefaultTheme;
    use proptest::prelude::*;

    fn solve(settings: &Settings, width: i32, height: i32, cores: usize) -> Layout {
        let theme = DefaultTheme::default();
        let system = SystemInfo {
            core_count: cores,
            cpu_name: "Test CPU".to_string(),
            ..Default::default()
        };
        let mut mouse = MouseMappings::new();
        LayoutSolver::recompute(
            settings,
            &theme,
            TermSize { width, height },
            &system,
            &mut mouse,
        )
    }

    fn assert_tiles(layout: &Layout, width: i32, height: i32) {
        let rects = layout.shown_rects();
        let area: i64 = rects.iter().map(Rect::area).sum();
        assert_eq!(area, i64::from(width) * i64::from(height), "{:?}", rects);
        for (i, a) in rects.iter().enumerate() {
            if !a.is_empty() {
                assert!(a.x >= 1 && a.y >= 1, "{:?}", a);
                assert!(a.right() <= width && a.bottom() <= height, "{:?}", a);
            }
            for b in &rects[i + 1..] {
                assert!(!a.intersects(b), "{:?} overlaps {:?}", a, b);
            }
        }
    }

    // ==== Placement Tests ====

    #[test]
    fn test_default_layout() {
        let settings = Settings::default();
        let layout = solve(&settings, 120, 40, 8);
        assert_eq!(layout.cpu.geometry.rect, Rect::new(1, 1, 120, 13));
        assert_eq!(layout.mem.geometry.rect, Rect::new(1, 14, 54, 16));
        assert_eq!(layout.net.geometry.rect, Rect::new(1, 30, 54, 11));
        assert_eq!(layout.proc.geometry.rect, Rect::new(55, 14, 66, 27));
        assert_eq!(layout.proc.select_max, 24);
        assert_tiles(&layout, 120, 40);
    }

    #[test]
    fn test_cpu_only_takes_whole_terminal() {
        let settings = Settings {
            shown_boxes: "cpu".to_string(),
            ..Default::default()
        };
        let layout = solve(&settings, 60, 8, 4);
        assert_eq!(layout.cpu.geometry.rect, Rect::new(1, 1, 60, 8));
        assert!(!layout.proc.geometry.shown);
        assert_tiles(&layout, 60, 8);
    }

    #[test]
    fn test_flipped_placement() {
        let settings = Settings {
            cpu_bottom: true,
            proc_left: true,
            mem_below_net: true,
            ..Default::default()
        };
        let layout = solve(&settings, 120, 40, 8);
        assert_eq!(layout.cpu.geometry.rect.y, 28);
        assert_eq!(layout.proc.geometry.rect.x, 1);
        assert_eq!(layout.proc.geometry.rect.y, 1);
        assert_eq!(layout.net.geometry.rect.y, 1);
        assert_eq!(layout.mem.geometry.rect.x, 67);
        assert_eq!(layout.mem.geometry.rect.bottom(), 27);
        assert_tiles(&layout, 120, 40);
    }

    #[test]
    fn test_recompute_marks_redraw_and_clears_mouse() {
        let theme = DefaultTheme::default();
        let mut mouse = MouseMappings::new();
        mouse.set("f", MouseRegion::new(1, 1, 1, 1));
        let layout = LayoutSolver::recompute(
            &Settings::default(),
            &theme,
            TermSize {
                width: 100,
                height: 30,
            },
            &SystemInfo::default(),
            &mut mouse,
        );
        assert!(mouse.is_empty());
        assert!(layout.cpu.geometry.redraw && layout.proc.geometry.redraw);
        assert!(layout.proc.geometry.frame.contains("proc"));
        assert!(layout.net.geometry.frame.contains("download"));
    }

    // ==== CPU Grid Tests ====

    #[test]
    fn test_cpu_grid_presets() {
        let settings = Settings::default();
        let layout = solve(&settings, 120, 40, 8);
        // 9 lines over 8 usable rows need two columns of the wide preset
        assert_eq!(layout.cpu.columns, 2);
        assert_eq!(layout.cpu.column, CoreColumn::Wide);
        assert_eq!(layout.cpu.inner.width, 41);
        assert_eq!(layout.cpu.inner.height, 8);
        assert_eq!(layout.cpu.inner.right(), 119);

        let layout = solve(&settings, 80, 30, 64);
        assert_eq!(layout.cpu.column, CoreColumn::Narrow);
        assert_eq!(layout.cpu.columns, 6);
        assert_eq!(layout.cpu.inner.width, 49);
    }

    #[test]
    fn test_cpu_title_uses_custom_name() {
        let settings = Settings {
            custom_cpu_name: "My CPU".to_string(),
            ..Default::default()
        };
        let layout = solve(&settings, 120, 40, 4);
        assert!(layout.cpu.geometry.frame.contains("My CPU"));
        assert!(!layout.cpu.geometry.frame.contains("Test CPU"));
    }

    // ==== Memory Tests ====

    #[test]
    fn test_mem_derived_sizes() {
        let settings = Settings::default();
        let layout = solve(&settings, 120, 40, 8);
        let mem = &layout.mem;
        assert_eq!(mem.mem_width, 26);
        assert_eq!(mem.disks_width, 25);
        assert_eq!(mem.divider, 27);
        assert_eq!(mem.item_height, 4);
        assert_eq!(mem.mem_size, 3);
        assert!(mem.geometry.frame.contains("isks"));
    }

    #[test]
    fn test_min_size() {
        assert_eq!(min_size(Boxes::CPU), (60, 8));
        assert_eq!(min_size(Boxes::PROC), (44, 16));
        assert_eq!(min_size(Boxes::all()), (80, 24));
        let (w1, h1) = min_size(Boxes::CPU | Boxes::MEM);
        let (w2, h2) = min_size(Boxes::CPU | Boxes::MEM | Boxes::NET);
        assert!(w2 >= w1 && h2 > h1);
    }

    fn boxes_strategy() -> impl Strategy<Value = Boxes> {
        (1u8..16).prop_map(Boxes::from_bits_truncate)
    }

    proptest! {
        #[test]
        fn prop_panels_tile_terminal(
            boxes in boxes_strategy(),
            extra_w in 0i32..200,
            extra_h in 0i32..80,
            cores in 1usize..129,
            cpu_bottom in any::<bool>(),
            mem_below_net in any::<bool>(),
            proc_left in any::<bool>(),
        ) {
            let names: Vec<&str> = [
                (Boxes::CPU, "cpu"),
                (Boxes::MEM, "mem"),
                (Boxes::NET, "net"),
                (Boxes::PROC, "proc"),
            ]
            .into_iter()
            .filter(|(b, _)| boxes.contains(*b))
            .map(|(_, n)| n)
            .collect();
            let settings = Settings {
                shown_boxes: names.join(" "),
                cpu_bottom,
                mem_below_net,
                proc_left,
                ..Default::default()
            };
            let (min_w, min_h) = min_size(boxes);
            let (width, height) = (min_w + extra_w, min_h + extra_h);
            let layout = solve(&settings, width, height, cores);
            assert_tiles(&layout, width, height);
        }
    }
}
