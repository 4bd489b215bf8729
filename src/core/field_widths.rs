//! Column width allocation for the process list
//!
//! Widths are chosen from the panel width by fixed breakpoints:
//! - User column: 5 below 75 columns, 10 otherwise
//! - Thread column: hidden below 75 columns (width -1), 4 otherwise
//! - Program column: 16 above 70, 8 above 55, whatever is left otherwise
//! - Command column: the rest above 55 columns, hidden otherwise
//! - Tree column (tree view): everything not used by the fixed columns

/// Width of the fixed part of a flat row (pid, mem, graph, cpu and separators)
const FIXED_COLUMNS: i32 = 33;

/// Width of the fixed part of a tree row
const TREE_FIXED_COLUMNS: i32 = 23;

/// Column widths for one process panel width. Negative means hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldWidths {
    pub user: i32,
    pub thread: i32,
    pub prog: i32,
    pub cmd: i32,
    pub tree: i32,
}

impl FieldWidths {
    /// Compute column widths for a panel `width` columns wide
    pub fn for_width(width: i32) -> Self {
        let user = if width < 75 { 5 } else { 10 };
        let thread = if width < 75 { -1 } else { 4 };
        let prog = if width > 70 {
            16
        } else if width > 55 {
            8
        } else {
            width - user - thread - FIXED_COLUMNS
        };
        let cmd = if width > 55 {
            width - prog - user - thread - FIXED_COLUMNS
        } else {
            -1
        };
        let tree = width - user - thread - TREE_FIXED_COLUMNS;

        FieldWidths {
            user,
            thread,
            prog,
            cmd,
            tree,
        }
    }

    /// Whether the thread count column is shown
    pub fn has_threads(&self) -> bool {
        self.thread > 0
    }

    /// Whether the command column is shown
    pub fn has_cmd(&self) -> bool {
        self.cmd > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_panel() {
        let fw = FieldWidths::for_width(120);
        assert_eq!(fw.user, 10);
        assert_eq!(fw.thread, 4);
        assert_eq!(fw.prog, 16);
        assert_eq!(fw.cmd, 120 - 16 - 10 - 4 - 33);
        assert_eq!(fw.tree, 120 - 10 - 4 - 23);
        assert!(fw.has_threads());
        assert!(fw.has_cmd());
    }

    #[test]
    fn test_medium_panel() {
        let fw = FieldWidths::for_width(60);
        assert_eq!(fw.user, 5);
        assert_eq!(fw.thread, -1);
        assert_eq!(fw.prog, 8);
        assert_eq!(fw.cmd, 60 - 8 - 5 + 1 - 33);
        assert!(!fw.has_threads());
    }

    #[test]
    fn test_narrow_panel() {
        let fw = FieldWidths::for_width(50);
        assert_eq!(fw.prog, 50 - 5 + 1 - 33);
        assert_eq!(fw.cmd, -1);
        assert!(!fw.has_cmd());
    }

    #[test]
    fn test_breakpoints() {
        assert_eq!(FieldWidths::for_width(74).user, 5);
        assert_eq!(FieldWidths::for_width(75).user, 10);
        assert_eq!(FieldWidths::for_width(70).prog, 8);
        assert_eq!(FieldWidths::for_width(71).prog, 16);
        assert_eq!(FieldWidths::for_width(55).cmd, -1);
        assert!(FieldWidths::for_width(56).cmd > 0);
    }
}
