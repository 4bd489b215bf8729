//! Box frame rendering
//!
//! A frame is drawn as two horizontal rules, the verticals, four corners and
//! up to two titles. Interior cells are either blanked or skipped so a frame
//! can be laid over content that is already on screen.

use super::crt::{fx, mv};
use super::panel::Rect;
use super::symbols::{self, superscript};
use super::theme::Theme;

/// Draw a frame around `rect`.
///
/// `line_color` defaults to the theme's `div_line`. `title` sits on the top
/// rule and `title2` on the bottom rule, both at column `x + 2`; a non-zero
/// `num` prefixes them with a badge number.
#[allow(clippy::too_many_arguments)]
pub fn create_box(
    theme: &dyn Theme,
    tty_mode: bool,
    rect: Rect,
    line_color: Option<&str>,
    fill: bool,
    title: &str,
    title2: &str,
    num: usize,
) -> String {
    let Rect {
        x,
        y,
        width,
        height,
    } = rect;
    let line_color = line_color.unwrap_or_else(|| theme.color("div_line"));
    let numbering = if num == 0 {
        String::new()
    } else {
        format!("{}{}", theme.color("hi_fg"), superscript(num, tty_mode))
    };
    let (left_up, right_up, left_down, right_down) = if tty_mode {
        (
            symbols::LEFT_UP,
            symbols::RIGHT_UP,
            symbols::LEFT_DOWN,
            symbols::RIGHT_DOWN,
        )
    } else {
        (
            symbols::ROUND_LEFT_UP,
            symbols::ROUND_RIGHT_UP,
            symbols::ROUND_LEFT_DOWN,
            symbols::ROUND_RIGHT_DOWN,
        )
    };

    let mut out = String::with_capacity((width * height).max(0) as usize * 2);
    out.push_str(fx::RESET);
    out.push_str(line_color);

    let rule = symbols::H_LINE.repeat((width - 1).max(0) as usize);
    for line in [y, y + height - 1] {
        out.push_str(&mv::to(line, x));
        out.push_str(&rule);
    }

    let inner = (width - 2).max(0);
    let interior = if fill {
        " ".repeat(inner as usize)
    } else {
        mv::r(inner)
    };
    for line in y + 1..y + height - 1 {
        out.push_str(&mv::to(line, x));
        out.push_str(symbols::V_LINE);
        out.push_str(&interior);
        out.push_str(symbols::V_LINE);
    }

    out.push_str(&mv::to(y, x));
    out.push_str(left_up);
    out.push_str(&mv::to(y, x + width - 1));
    out.push_str(right_up);
    out.push_str(&mv::to(y + height - 1, x));
    out.push_str(left_down);
    out.push_str(&mv::to(y + height - 1, x + width - 1));
    out.push_str(right_down);

    if !title.is_empty() {
        out.push_str(&mv::to(y, x + 2));
        push_title(
            &mut out,
            theme,
            line_color,
            &numbering,
            title,
            (symbols::TITLE_LEFT, symbols::TITLE_RIGHT),
        );
    }
    if !title2.is_empty() {
        out.push_str(&mv::to(y + height - 1, x + 2));
        push_title(
            &mut out,
            theme,
            line_color,
            &numbering,
            title2,
            (symbols::TITLE_LEFT_DOWN, symbols::TITLE_RIGHT_DOWN),
        );
    }

    out.push_str(fx::RESET);
    out.push_str(&mv::to(y + 1, x + 1));
    out
}

fn push_title(
    out: &mut String,
    theme: &dyn Theme,
    line_color: &str,
    numbering: &str,
    title: &str,
    (open, close): (&str, &str),
) {
    out.push_str(open);
    out.push_str(fx::B);
    out.push_str(numbering);
    out.push_str(theme.color("title"));
    out.push_str(title);
    out.push_str(fx::UB);
    out.push_str(line_color);
    out.push_str(close);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::crt::strip_escapes;
    use crate::ui::theme::DefaultTheme;

    #[test]
    fn test_rounded_corners() {
        let theme = DefaultTheme::default();
        let out = create_box(&theme, false, Rect::new(1, 1, 10, 4), None, false, "", "", 0);
        let plain = strip_escapes(&out);
        assert!(plain.starts_with(symbols::H_LINE));
        assert!(plain.contains(symbols::ROUND_LEFT_UP));
        assert!(plain.contains(symbols::ROUND_RIGHT_DOWN));
        assert!(!plain.contains(symbols::LEFT_UP));
        assert!(out.starts_with(&format!("{}{}", fx::RESET, theme.color("div_line"))));
        assert!(out.ends_with(&format!("{}{}", fx::RESET, mv::to(2, 2))));
    }

    #[test]
    fn test_tty_square_corners() {
        let theme = DefaultTheme::default();
        let out = create_box(&theme, true, Rect::new(1, 1, 10, 4), None, false, "", "", 0);
        let plain = strip_escapes(&out);
        assert!(plain.contains(symbols::LEFT_UP));
        assert!(!plain.contains(symbols::ROUND_LEFT_UP));
    }

    #[test]
    fn test_fill_and_skip() {
        let theme = DefaultTheme::default();
        let rect = Rect::new(1, 1, 6, 3);
        let filled = create_box(&theme, false, rect, None, true, "", "", 0);
        assert!(filled.contains(&format!("{}    {}", symbols::V_LINE, symbols::V_LINE)));
        let skipped = create_box(&theme, false, rect, None, false, "", "", 0);
        assert!(skipped.contains(&format!("{}{}{}", symbols::V_LINE, mv::r(4), symbols::V_LINE)));
    }

    #[test]
    fn test_titles_and_badge() {
        let theme = DefaultTheme::default();
        let out = create_box(
            &theme,
            false,
            Rect::new(5, 3, 30, 10),
            Some("<c>"),
            false,
            "proc",
            "filter",
            4,
        );
        assert!(out.contains(&format!("{}{}", mv::to(3, 7), symbols::TITLE_LEFT)));
        assert!(out.contains(&format!("{}{}", mv::to(12, 7), symbols::TITLE_LEFT_DOWN)));
        assert!(out.contains(&format!("{}⁴{}proc", theme.color("hi_fg"), theme.color("title"))));
        assert!(out.contains(&format!("filter{}<c>{}", fx::UB, symbols::TITLE_RIGHT_DOWN)));

        let tty = create_box(&theme, true, Rect::new(5, 3, 30, 10), None, false, "proc", "", 4);
        assert!(tty.contains(&format!("{}4{}", theme.color("hi_fg"), theme.color("title"))));
    }
}
