//! Meter - horizontal percentage bar
//!
//! Rendered bars are cached per integer percentage; the cache lives as long
//! as the meter, so a meter is rebuilt whenever its width or theme changes.

use super::crt::fx;
use super::symbols::METER;
use super::theme::Theme;

#[derive(Debug, Clone)]
pub struct Meter {
    width: i32,
    gradient: String,
    invert: bool,
    cache: Vec<Option<String>>,
}

impl Default for Meter {
    fn default() -> Self {
        Meter::new(0, "cpu", false)
    }
}

impl Meter {
    pub fn new(width: i32, gradient: &str, invert: bool) -> Self {
        Meter {
            width,
            gradient: gradient.to_string(),
            invert,
            cache: vec![None; 101],
        }
    }

    /// Bar for `value` percent; values outside 0..=100 are clamped
    pub fn render(&mut self, theme: &dyn Theme, value: i32) -> &str {
        if self.width < 1 {
            return "";
        }
        let value = value.clamp(0, 100) as usize;
        if self.cache[value].is_none() {
            self.cache[value] = Some(self.build(theme, value as i32));
        }
        self.cache[value].as_deref().unwrap_or("")
    }

    fn build(&self, theme: &dyn Theme, value: i32) -> String {
        let gradient = theme.gradient(&self.gradient);
        let mut out = String::with_capacity(self.width as usize * 24);
        for i in 1..=self.width {
            let y = (f64::from(i) * 100.0 / f64::from(self.width)).round() as i32;
            if value >= y {
                let index = if self.invert { 100 - y } else { y };
                out.push_str(&gradient[index as usize]);
                out.push_str(METER);
            } else {
                out.push_str(theme.color("meter_bg"));
                out.push_str(&METER.repeat((self.width + 1 - i) as usize));
                break;
            }
        }
        out.push_str(fx::RESET);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::crt::strip_escapes;
    use crate::ui::theme::DefaultTheme;

    #[test]
    fn test_zero_width_is_empty() {
        let theme = DefaultTheme::default();
        let mut meter = Meter::new(0, "cpu", false);
        assert_eq!(meter.render(&theme, 50), "");
        let mut meter = Meter::new(-3, "cpu", false);
        assert_eq!(meter.render(&theme, 100), "");
    }

    #[test]
    fn test_render_is_cached_and_stable() {
        let theme = DefaultTheme::default();
        let mut meter = Meter::new(10, "cpu", false);
        let first = meter.render(&theme, 42).to_string();
        let second = meter.render(&theme, 42).to_string();
        assert_eq!(first, second);
        assert!(meter.cache[42].is_some());
        assert!(meter.cache[43].is_none());
    }

    #[test]
    fn test_clamping() {
        let theme = DefaultTheme::default();
        let mut meter = Meter::new(8, "cpu", false);
        let low = meter.render(&theme, 0).to_string();
        let high = meter.render(&theme, 100).to_string();
        assert_eq!(meter.render(&theme, -5), low);
        assert_eq!(meter.render(&theme, 150), high);
    }

    #[test]
    fn test_bar_always_full_width() {
        let theme = DefaultTheme::default();
        let mut meter = Meter::new(10, "cpu", false);
        for value in [0, 7, 50, 99, 100] {
            let plain = strip_escapes(meter.render(&theme, value));
            assert_eq!(plain.chars().count(), 10, "value {}", value);
        }
    }

    #[test]
    fn test_fill_uses_gradient() {
        let theme = DefaultTheme::default();
        let gradient = theme.gradient("cpu");
        let mut meter = Meter::new(4, "cpu", false);
        let full = meter.render(&theme, 100).to_string();
        let expected: String = [25, 50, 75, 100]
            .iter()
            .map(|&y| format!("{}{}", gradient[y], METER))
            .collect::<String>()
            + fx::RESET;
        assert_eq!(full, expected);

        let half = meter.render(&theme, 50).to_string();
        let expected = format!(
            "{}{}{}{}{}{}",
            gradient[25],
            METER,
            gradient[50],
            METER,
            theme.color("meter_bg"),
            METER.repeat(2)
        ) + fx::RESET;
        assert_eq!(half, expected);
    }

    #[test]
    fn test_inverted_gradient() {
        let theme = DefaultTheme::default();
        let gradient = theme.gradient("cpu");
        let mut meter = Meter::new(2, "cpu", true);
        let full = meter.render(&theme, 100).to_string();
        assert!(full.starts_with(&format!("{}{}", gradient[50], METER)));
        assert!(full.contains(&format!("{}{}", gradient[0], METER)));
    }

    #[test]
    fn test_empty_cells_are_dim_glyphs() {
        let theme = DefaultTheme::default();
        let gradient = theme.gradient("cpu");
        let meter_bg = theme.color("meter_bg");
        assert!(meter_bg.starts_with("\x1b[38;"));

        let mut meter = Meter::new(4, "cpu", false);
        let empty = meter.render(&theme, 0).to_string();
        assert_eq!(empty, format!("{}{}{}", meter_bg, METER.repeat(4), fx::RESET));

        let mut inverted = Meter::new(4, "cpu", true);
        let quarter = inverted.render(&theme, 30).to_string();
        let expected = format!(
            "{}{}{}{}{}",
            gradient[75],
            METER,
            meter_bg,
            METER.repeat(3),
            fx::RESET
        );
        assert_eq!(quarter, expected);
        assert!(!quarter.contains("\x1b[48;"));
    }
}
