//! Panel - geometry and cached frame shared by every panel
//!
//! Each panel owns one `PanelGeometry`. The layout solver fills it in after a
//! resize or a configuration change and sets `redraw`; the panel's `draw`
//! emits the cached frame on the next tick and clears the flag.

/// A rectangle in 1-based terminal coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// Last column inside the rectangle
    pub fn right(&self) -> i32 {
        self.x + self.width - 1
    }

    /// Last line inside the rectangle
    pub fn bottom(&self) -> i32 {
        self.y + self.height - 1
    }

    pub fn area(&self) -> i64 {
        i64::from(self.width.max(0)) * i64::from(self.height.max(0))
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Whether the cell at (col, line) lies inside
    pub fn contains(&self, col: i32, line: i32) -> bool {
        col >= self.x && col <= self.right() && line >= self.y && line <= self.bottom()
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }
}

/// Placement, cached static frame and redraw state of one panel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelGeometry {
    pub rect: Rect,
    pub frame: String,
    pub redraw: bool,
    pub shown: bool,
}

impl PanelGeometry {
    /// Frame to emit this tick, clearing `redraw`.
    ///
    /// Returns `None` when neither the panel nor the caller asked for a
    /// redraw.
    pub fn take_redraw(&mut self, force_redraw: bool) -> Option<&str> {
        if self.redraw || force_redraw {
            self.redraw = false;
            Some(&self.frame)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(3, 2, 10, 4);
        assert_eq!(r.right(), 12);
        assert_eq!(r.bottom(), 5);
        assert_eq!(r.area(), 40);
        assert!(r.contains(3, 2));
        assert!(r.contains(12, 5));
        assert!(!r.contains(13, 5));
    }

    #[test]
    fn test_rect_intersects() {
        let a = Rect::new(1, 1, 10, 5);
        let b = Rect::new(11, 1, 10, 5);
        let c = Rect::new(10, 5, 2, 2);
        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
        assert!(b.intersects(&c));
        assert!(!a.intersects(&Rect::default()));
    }

    #[test]
    fn test_take_redraw() {
        let mut geometry = PanelGeometry {
            frame: "frame".to_string(),
            redraw: true,
            shown: true,
            ..Default::default()
        };
        assert_eq!(geometry.take_redraw(false), Some("frame"));
        assert_eq!(geometry.take_redraw(false), None);
        assert_eq!(geometry.take_redraw(true), Some("frame"));
    }
}
