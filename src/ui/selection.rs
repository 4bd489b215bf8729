//! Selection - scroll and selection state of the process list
//!
//! `start` is the index of the first visible row and `selected` a 1-based
//! offset into the visible window, 0 meaning nothing is selected.
//! `last_selected` remembers a selection that was temporarily cleared so
//! that the next `Down` restores it.

use std::str::FromStr;

/// Rows added to or removed from `start` by one wheel step
const SCROLL_STEP: i32 = 3;

/// Rows taken from the list by the detailed sub-panel
pub const DETAILED_ROWS: i32 = 8;

/// One navigation action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectAction {
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    ScrollUp,
    ScrollDown,
    /// Click on the scrollbar at the given row offset
    MouseY(i32),
}

impl FromStr for SelectAction {
    type Err = ();

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        Ok(match key {
            "up" => SelectAction::Up,
            "down" => SelectAction::Down,
            "page_up" => SelectAction::PageUp,
            "page_down" => SelectAction::PageDown,
            "home" => SelectAction::Home,
            "end" => SelectAction::End,
            "mouse_scroll_up" => SelectAction::ScrollUp,
            "mouse_scroll_down" => SelectAction::ScrollDown,
            _ => {
                let row = key.strip_prefix("mousey").ok_or(())?;
                SelectAction::MouseY(row.parse().map_err(|_| ())?)
            }
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub start: i32,
    pub selected: i32,
    pub last_selected: i32,
    /// Visible row capacity without the detailed sub-panel
    pub select_max: i32,
}

impl Selection {
    pub fn new(start: i32, selected: i32, last_selected: i32, select_max: i32) -> Self {
        Selection {
            start,
            selected,
            last_selected,
            select_max,
        }
    }

    /// Rows available for the list
    pub fn capacity(&self, show_detailed: bool) -> i32 {
        if show_detailed {
            self.select_max - DETAILED_ROWS
        } else {
            self.select_max
        }
    }

    /// Apply one action over a list of `num_items` rows.
    ///
    /// Returns the new `selected` value, or `None` when neither `start` nor
    /// `selected` changed.
    pub fn apply(&mut self, action: SelectAction, num_items: i32, show_detailed: bool) -> Option<i32> {
        let cap = self.capacity(show_detailed);
        let n = num_items.max(0);
        let bottom = (n - cap).max(0);
        let (old_start, old_selected) = (self.start, self.selected);
        let mut start = self.start;
        let mut selected = self.selected;

        match action {
            SelectAction::Up if selected > 0 => {
                if start > 0 && selected == 1 {
                    start -= 1;
                } else {
                    selected -= 1;
                }
                self.last_selected = 0;
            }
            SelectAction::ScrollUp if start > 0 => {
                start = (start - SCROLL_STEP).max(0);
            }
            SelectAction::ScrollDown if start < n - cap => {
                start = (start + SCROLL_STEP).min(n - cap);
            }
            SelectAction::Down => {
                if start < n - cap && selected == cap {
                    start += 1;
                } else if selected == 0 && self.last_selected > 0 {
                    selected = self.last_selected;
                    self.last_selected = 0;
                } else {
                    selected += 1;
                }
            }
            SelectAction::PageUp => {
                if selected > 0 && start == 0 {
                    selected = 0;
                } else {
                    start = (start - cap).max(0);
                }
            }
            SelectAction::PageDown => {
                if selected > 0 && start >= n - cap {
                    selected = cap;
                } else {
                    start = (start + cap).clamp(0, bottom);
                }
            }
            SelectAction::Home => {
                start = 0;
                if selected > 0 {
                    selected = 1;
                }
            }
            SelectAction::End => {
                start = bottom;
                if selected > 0 {
                    selected = cap;
                }
            }
            SelectAction::MouseY(row) => {
                let scaled = f64::from(row) * f64::from(n - cap - 2) / f64::from((cap - 2).max(1));
                start = (scaled.round() as i32).clamp(0, bottom);
            }
            _ => {}
        }

        self.start = start.clamp(0, bottom);
        self.selected = selected.clamp(0, cap.min(n).max(0));

        if self.start == old_start && self.selected == old_selected {
            None
        } else {
            Some(self.selected)
        }
    }
}
