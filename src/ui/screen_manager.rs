//! ScreenManager - owns the render context and every panel
//!
//! The caller feeds it terminal sizes, keys and samples; it keeps the
//! layout current, routes draws to the panels and writes selection and
//! filter state back into the settings.

use tracing::debug;

use super::cpu_panel::CpuPanel;
use super::crt::{MouseMappings, TermSize};
use super::layout::{min_size, LayoutSolver};
use super::proc_panel::ProcPanel;
use super::selection::SelectAction;
use super::stub_panels::{MemPanel, NetPanel};
use super::text_edit::TextEdit;
use super::theme::Theme;
use crate::core::{CpuInfo, MemInfo, NetInfo, ProcSnapshot, Settings, SystemInfo};

/// Samples for one full frame
#[derive(Debug, Clone, Copy)]
pub struct FrameData<'a> {
    pub cpu: &'a CpuInfo,
    pub mem: &'a MemInfo,
    pub net: &'a NetInfo,
    pub proc: &'a ProcSnapshot,
}

/// Screen manager state
pub struct ScreenManager {
    /// Settings, updated in place by selection and filter edits
    settings: Settings,
    theme: Box<dyn Theme>,
    term: TermSize,
    system: SystemInfo,
    mouse: MouseMappings,

    cpu: CpuPanel,
    mem: MemPanel,
    net: NetPanel,
    proc: ProcPanel,

    /// Filter text to restore when editing is cancelled
    filter_backup: String,
}

impl ScreenManager {
    /// Create a screen manager and run the first layout pass
    pub fn new(settings: Settings, theme: Box<dyn Theme>, term: TermSize, system: SystemInfo) -> Self {
        let mut manager = ScreenManager {
            settings,
            theme,
            term,
            system,
            mouse: MouseMappings::new(),
            cpu: CpuPanel::new(),
            mem: MemPanel::default(),
            net: NetPanel::default(),
            proc: ProcPanel::new(),
            filter_backup: String::new(),
        };
        manager.recompute_layout();
        manager
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Mutable settings; call `recompute_layout` after layout relevant changes
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn mouse(&self) -> &MouseMappings {
        &self.mouse
    }

    pub fn term(&self) -> TermSize {
        self.term
    }

    pub fn proc_panel(&self) -> &ProcPanel {
        &self.proc
    }

    /// Whether the terminal can hold the shown panels
    pub fn fits(&self) -> bool {
        let (width, height) = min_size(self.settings.boxes());
        self.term.width >= width && self.term.height >= height
    }

    /// Apply a new terminal size and redo the layout
    pub fn resize(&mut self, term: TermSize) {
        self.term = term;
        self.recompute_layout();
    }

    /// Recompute every panel's placement and cached frame
    pub fn recompute_layout(&mut self) {
        let layout = LayoutSolver::recompute(
            &self.settings,
            self.theme.as_ref(),
            self.term,
            &self.system,
            &mut self.mouse,
        );
        debug!(
            "layout for {}x{}: {} panels shown",
            self.term.width,
            self.term.height,
            layout.shown_rects().len()
        );
        self.cpu.layout = layout.cpu;
        self.mem.layout = layout.mem;
        self.net.layout = layout.net;
        self.proc.layout = layout.proc;
    }

    pub fn draw_cpu(&mut self, cpu: &CpuInfo, force_redraw: bool, data_same: bool) -> String {
        self.cpu.draw(
            self.theme.as_ref(),
            &self.settings,
            &mut self.mouse,
            cpu,
            force_redraw,
            data_same,
        )
    }

    pub fn draw_mem(&mut self, mem: &MemInfo, force_redraw: bool, data_same: bool) -> String {
        if !self.mem.layout.geometry.shown {
            return String::new();
        }
        self.mem.draw(mem, force_redraw, data_same)
    }

    pub fn draw_net(&mut self, net: &NetInfo, force_redraw: bool, data_same: bool) -> String {
        if !self.net.layout.geometry.shown {
            return String::new();
        }
        self.net.draw(net, force_redraw, data_same)
    }

    pub fn draw_proc(&mut self, snapshot: &ProcSnapshot, force_redraw: bool, data_same: bool) -> String {
        self.proc.draw(
            self.theme.as_ref(),
            &self.settings,
            &mut self.mouse,
            snapshot,
            force_redraw,
            data_same,
        )
    }

    /// Draw every shown panel for one tick
    pub fn draw_all(&mut self, data: FrameData, force_redraw: bool, data_same: bool) -> String {
        let mut out = self.draw_cpu(data.cpu, force_redraw, data_same);
        out.push_str(&self.draw_mem(data.mem, force_redraw, data_same));
        out.push_str(&self.draw_net(data.net, force_redraw, data_same));
        out.push_str(&self.draw_proc(data.proc, force_redraw, data_same));
        out
    }

    /// Move the process selection by one navigation key.
    ///
    /// Returns the new selected row, or `None` when the key is not a
    /// navigation key or nothing moved.
    pub fn proc_selection(&mut self, key: &str, num_items: usize) -> Option<i32> {
        let action: SelectAction = key.parse().ok()?;
        let mut selection = self.proc.selection(&self.settings);
        let changed = selection.apply(
            action,
            i32::try_from(num_items).unwrap_or(i32::MAX),
            self.settings.show_detailed,
        );
        self.settings.set_proc_position(
            selection.start,
            selection.selected,
            selection.last_selected,
        );
        changed
    }

    /// Open or close the detailed view for the selected process
    pub fn toggle_detailed(&mut self) {
        let pid = i32::try_from(self.proc.selected_pid).unwrap_or(0);
        if self.settings.show_detailed && (pid == 0 || pid == self.settings.detailed_pid) {
            self.settings.show_detailed = false;
        } else if pid > 0 {
            self.settings.show_detailed = true;
            self.settings.detailed_pid = pid;
        }
        self.proc.layout.geometry.redraw = true;
    }

    /// Start editing the process filter
    pub fn filter_start(&mut self) {
        self.filter_backup = self.settings.proc_filter.clone();
        self.proc.filter = TextEdit::new(&self.settings.proc_filter);
        self.settings.proc_filtering = true;
        self.proc.layout.geometry.redraw = true;
    }

    /// Feed one key to the filter editor. Returns whether the key was used.
    pub fn filter_command(&mut self, key: &str) -> bool {
        if !self.settings.proc_filtering || !self.proc.filter.command(key) {
            return false;
        }
        self.settings.proc_filter = self.proc.filter.text.clone();
        self.proc.layout.geometry.redraw = true;
        true
    }

    /// Stop editing; `accept` keeps the edited text, otherwise the filter
    /// from before editing is restored
    pub fn filter_stop(&mut self, accept: bool) {
        if !accept {
            self.settings.proc_filter = std::mem::take(&mut self.filter_backup);
        }
        debug!("process filter set to {:?}", self.settings.proc_filter);
        self.settings.proc_filtering = false;
        self.proc.layout.geometry.redraw = true;
    }

    /// Drop the filter altogether
    pub fn filter_clear(&mut self) {
        self.settings.proc_filter.clear();
        self.proc.filter.clear();
        self.proc.layout.geometry.redraw = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ProcInfo;
    use crate::ui::crt::strip_escapes;
    use crate::ui::theme::DefaultTheme;

    fn manager(settings: Settings) -> ScreenManager {
        ScreenManager::new(
            settings,
            Box::new(DefaultTheme::default()),
            TermSize {
                width: 120,
                height: 40,
            },
            SystemInfo {
                core_count: 4,
                ..Default::default()
            },
        )
    }

    fn snapshot(n: u64) -> ProcSnapshot {
        ProcSnapshot {
            processes: (1..=n)
                .map(|pid| ProcInfo {
                    pid,
                    name: format!("p{}", pid),
                    cpu_p: 1.0,
                    ..Default::default()
                })
                .collect(),
            total_mem: 1 << 30,
            detailed: None,
        }
    }

    // ==== Layout Tests ====

    #[test]
    fn test_resize_redoes_layout() {
        let mut sm = manager(Settings::default());
        assert!(sm.fits());
        let before = sm.proc.layout.geometry.rect;
        sm.resize(TermSize {
            width: 100,
            height: 30,
        });
        assert_ne!(sm.proc.layout.geometry.rect, before);
        assert_eq!(sm.term().width, 100);
        assert!(sm.proc.layout.geometry.redraw);
        sm.resize(TermSize {
            width: 20,
            height: 5,
        });
        assert!(!sm.fits());
    }

    #[test]
    fn test_draw_all_emits_frames_once() {
        let mut sm = manager(Settings::default());
        let (cpu, mem, net) = (CpuInfo::default(), MemInfo::default(), NetInfo::default());
        let proc = snapshot(3);
        let data = FrameData {
            cpu: &cpu,
            mem: &mem,
            net: &net,
            proc: &proc,
        };
        let first = sm.draw_all(data, false, false);
        assert!(strip_escapes(&first).contains("menu"));
        assert!(sm.mouse().contains("m"));
        let second = sm.draw_all(data, false, false);
        assert!(!strip_escapes(&second).contains("menu"));
        assert!(strip_escapes(&second).contains("p3"));
    }

    #[test]
    fn test_settings_change_needs_recompute() {
        let mut sm = manager(Settings::default());
        let right = sm.proc.layout.geometry.rect.x;
        sm.settings_mut().proc_left = true;
        assert_eq!(sm.proc.layout.geometry.rect.x, right);
        sm.recompute_layout();
        assert_eq!(sm.proc.layout.geometry.rect.x, 1);
    }

    // ==== Selection Tests ====

    #[test]
    fn test_selection_is_persisted() {
        let mut sm = manager(Settings::default());
        assert_eq!(sm.proc_selection("down", 50), Some(1));
        assert_eq!(sm.proc_selection("down", 50), Some(2));
        assert_eq!(sm.settings().proc_selected, 2);
        assert_eq!(sm.proc_selection("end", 50), Some(24));
        assert_eq!(sm.settings().proc_start, 26);
        assert_eq!(sm.proc_selection("nonsense", 50), None);
    }

    #[test]
    fn test_toggle_detailed_follows_selection() {
        let mut sm = manager(Settings::default());
        sm.proc_selection("down", 3);
        sm.draw_proc(&snapshot(3), false, false);
        assert_eq!(sm.proc_panel().selected_pid, 1);
        sm.toggle_detailed();
        assert!(sm.settings().show_detailed);
        assert_eq!(sm.settings().detailed_pid, 1);
        sm.toggle_detailed();
        assert!(!sm.settings().show_detailed);
    }

    // ==== Filter Tests ====

    #[test]
    fn test_filter_editing() {
        let mut sm = manager(Settings::default());
        assert!(!sm.filter_command("a"));
        sm.filter_start();
        assert!(sm.filter_command("f"));
        assert!(sm.filter_command("o"));
        assert!(!sm.filter_command("f1"));
        assert_eq!(sm.settings().proc_filter, "fo");
        sm.filter_stop(true);
        assert!(!sm.settings().proc_filtering);
        assert_eq!(sm.settings().proc_filter, "fo");

        sm.filter_start();
        sm.filter_command("backspace");
        assert_eq!(sm.settings().proc_filter, "f");
        sm.filter_stop(false);
        assert_eq!(sm.settings().proc_filter, "fo");
        sm.filter_clear();
        assert!(sm.settings().proc_filter.is_empty());
    }
}
