//! Theme - named colors and 101 step gradients
//!
//! Panels only ever ask for a color by semantic name or for a gradient by
//! name; the `Theme` trait is the seam where a theme loader plugs in.
//! `DefaultTheme` carries the built-in palette.

use std::collections::HashMap;

use lazy_static::lazy_static;

/// Color lookup used by every widget
pub trait Theme {
    /// Escape sequence for a named color; empty when unknown
    fn color(&self, name: &str) -> &str;

    /// 101 escape sequences indexed 0..=100
    fn gradient(&self, name: &str) -> &[String];

    /// Whether a gradient with this name exists
    fn has_gradient(&self, name: &str) -> bool;
}

/// Names emitted as background escapes; every other color is a foreground
const BACKGROUND_COLORS: [&str; 2] = ["main_bg", "selected_bg"];

lazy_static! {
    /// Built-in named colors (hex, two digit values are gray levels)
    static ref DEFAULT_COLORS: HashMap<&'static str, &'static str> = [
        ("main_bg", "#00"),
        ("main_fg", "#cc"),
        ("title", "#ee"),
        ("hi_fg", "#b54040"),
        ("selected_bg", "#6a2f2f"),
        ("selected_fg", "#ee"),
        ("inactive_fg", "#40"),
        ("graph_text", "#60"),
        ("meter_bg", "#40"),
        ("proc_misc", "#0de756"),
        ("cpu_box", "#3d7b46"),
        ("mem_box", "#8a882e"),
        ("net_box", "#423ba5"),
        ("proc_box", "#923535"),
        ("div_line", "#30"),
    ]
    .into_iter()
    .collect();

    /// Built-in gradients as start, optional middle, end
    static ref DEFAULT_GRADIENTS: HashMap<&'static str, (&'static str, Option<&'static str>, &'static str)> = [
        ("cpu", ("#50f095", Some("#f2e266"), "#fa1e1e")),
        ("temp", ("#4897d4", Some("#5474e8"), "#ff40b6")),
        ("process", ("#80d0a3", Some("#dcd179"), "#d45454")),
        ("proc", ("#cc", None, "#40")),
        ("proc_color", ("#40", None, "#80d0a3")),
        ("used", ("#592b26", Some("#d9626d"), "#ff4769")),
        ("free", ("#384f21", Some("#b5e685"), "#dcff85")),
    ]
    .into_iter()
    .collect();
}

/// Parse "#rrggbb" or "#gg" into an RGB triple
fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    match hex.len() {
        2 => {
            let v = u8::from_str_radix(hex, 16).ok()?;
            Some((v, v, v))
        }
        6 => Some((
            u8::from_str_radix(&hex[0..2], 16).ok()?,
            u8::from_str_radix(&hex[2..4], 16).ok()?,
            u8::from_str_radix(&hex[4..6], 16).ok()?,
        )),
        _ => None,
    }
}

/// Escape sequence for an RGB color, foreground or background
fn escape(rgb: (u8, u8, u8), background: bool, lowcolor: bool) -> String {
    let depth = if background { 48 } else { 38 };
    if lowcolor {
        let scale = |c: u8| (f64::from(c) / 255.0 * 5.0).round() as u16;
        let index = 16 + 36 * scale(rgb.0) + 6 * scale(rgb.1) + scale(rgb.2);
        format!("\x1b[{};5;{}m", depth, index)
    } else {
        format!("\x1b[{};2;{};{};{}m", depth, rgb.0, rgb.1, rgb.2)
    }
}

fn lerp(a: (u8, u8, u8), b: (u8, u8, u8), t: f64) -> (u8, u8, u8) {
    let mix = |x: u8, y: u8| (f64::from(x) + (f64::from(y) - f64::from(x)) * t).round() as u8;
    (mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

/// Build 101 steps from start through an optional middle to end
fn build_gradient(
    start: (u8, u8, u8),
    mid: Option<(u8, u8, u8)>,
    end: (u8, u8, u8),
    lowcolor: bool,
) -> Vec<String> {
    (0..=100)
        .map(|i| {
            let rgb = match mid {
                Some(mid) if i <= 50 => lerp(start, mid, f64::from(i) / 50.0),
                Some(mid) => lerp(mid, end, f64::from(i - 50) / 50.0),
                None => lerp(start, end, f64::from(i) / 100.0),
            };
            escape(rgb, false, lowcolor)
        })
        .collect()
}

/// The built-in theme
#[derive(Debug, Clone)]
pub struct DefaultTheme {
    colors: HashMap<String, String>,
    gradients: HashMap<String, Vec<String>>,
    /// Returned for unknown gradient names
    fallback: Vec<String>,
}

impl DefaultTheme {
    /// Build the palette, using 256 color escapes when `lowcolor` is set
    pub fn new(lowcolor: bool) -> Self {
        let gray = (0xcc, 0xcc, 0xcc);
        let colors = DEFAULT_COLORS
            .iter()
            .map(|(name, hex)| {
                let rgb = parse_hex(hex).unwrap_or(gray);
                let value = escape(rgb, BACKGROUND_COLORS.contains(name), lowcolor);
                (name.to_string(), value)
            })
            .collect();

        let gradients = DEFAULT_GRADIENTS
            .iter()
            .map(|(name, (start, mid, end))| {
                let start = parse_hex(start).unwrap_or(gray);
                let mid = mid.and_then(parse_hex);
                let end = parse_hex(end).unwrap_or(gray);
                (name.to_string(), build_gradient(start, mid, end, lowcolor))
            })
            .collect();

        DefaultTheme {
            colors,
            gradients,
            fallback: vec![escape(gray, false, lowcolor); 101],
        }
    }
}

impl Default for DefaultTheme {
    fn default() -> Self {
        Self::new(false)
    }
}

impl Theme for DefaultTheme {
    fn color(&self, name: &str) -> &str {
        self.colors.get(name).map(String::as_str).unwrap_or("")
    }

    fn gradient(&self, name: &str) -> &[String] {
        self.gradients
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&self.fallback)
    }

    fn has_gradient(&self, name: &str) -> bool {
        self.gradients.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#ff0080"), Some((255, 0, 128)));
        assert_eq!(parse_hex("#40"), Some((64, 64, 64)));
        assert_eq!(parse_hex("ff0080"), None);
        assert_eq!(parse_hex("#zz"), None);
    }

    #[test]
    fn test_gradient_endpoints() {
        let theme = DefaultTheme::new(false);
        let cpu = theme.gradient("cpu");
        assert_eq!(cpu.len(), 101);
        assert_eq!(cpu[0], "\x1b[38;2;80;240;149m");
        assert_eq!(cpu[100], "\x1b[38;2;250;30;30m");
        assert_eq!(cpu[50], "\x1b[38;2;242;226;102m");
    }

    #[test]
    fn test_unknown_names() {
        let theme = DefaultTheme::default();
        assert_eq!(theme.color("nope"), "");
        assert!(!theme.has_gradient("nope"));
        assert_eq!(theme.gradient("nope").len(), 101);
        assert!(theme.has_gradient("proc"));
    }

    #[test]
    fn test_background_and_lowcolor() {
        let theme = DefaultTheme::new(false);
        assert!(theme.color("selected_bg").starts_with("\x1b[48;2;"));
        assert!(theme.color("main_bg").starts_with("\x1b[48;2;"));
        let low = DefaultTheme::new(true);
        assert!(low.color("main_fg").starts_with("\x1b[38;5;"));
        assert!(low.gradient("cpu")[0].starts_with("\x1b[38;5;"));
    }

    #[test]
    fn test_meter_bg_is_foreground() {
        assert_eq!(DefaultTheme::new(false).color("meter_bg"), "\x1b[38;2;64;64;64m");
        assert!(DefaultTheme::new(true).color("meter_bg").starts_with("\x1b[38;5;"));
    }
}
