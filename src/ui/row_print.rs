//! Row printing utilities - width-aware text formatting
//!
//! All widths are terminal columns as measured by `unicode-width`, except
//! where a function says it counts codepoints:
//! - ulen / uwidth: codepoint count and display width
//! - uresize / luresize: keep the head or the tail of a string
//! - ljust / rjust / cjust: pad (and clip) to a fixed width
//! - floating_humanizer / short_percent: value formatting for process rows

use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

/// Number of codepoints
#[inline]
pub fn ulen(s: &str) -> usize {
    s.chars().count()
}

/// Display width in terminal columns
#[inline]
pub fn uwidth(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

#[inline]
fn char_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(0)
}

/// Byte offset of the first `n` codepoints
#[inline]
pub fn byte_offset(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map(|(i, _)| i).unwrap_or(s.len())
}

/// Keep the first `len` codepoints, or the first `len` columns when `wide`
pub fn uresize(s: &str, len: usize, wide: bool) -> String {
    if !wide {
        return s[..byte_offset(s, len)].to_string();
    }
    let mut used = 0;
    let mut out = String::with_capacity(s.len().min(len * 4));
    for ch in s.chars() {
        let w = char_width(ch);
        if used + w > len {
            break;
        }
        used += w;
        out.push(ch);
    }
    out
}

/// Keep the last `len` codepoints, or the last `len` columns when `wide`
pub fn luresize(s: &str, len: usize, wide: bool) -> String {
    if !wide {
        let skip = ulen(s).saturating_sub(len);
        return s[byte_offset(s, skip)..].to_string();
    }
    let mut used = 0;
    let mut start = s.len();
    for (i, ch) in s.char_indices().rev() {
        let w = char_width(ch);
        if used + w > len {
            break;
        }
        used += w;
        start = i;
    }
    s[start..].to_string()
}

/// Left align in `width` columns, clipping longer text
pub fn ljust(s: &str, width: usize) -> String {
    let clipped = uresize(s, width, true);
    let pad = width.saturating_sub(uwidth(&clipped));
    format!("{}{}", clipped, " ".repeat(pad))
}

/// Right align in `width` columns, clipping longer text
pub fn rjust(s: &str, width: usize) -> String {
    let clipped = uresize(s, width, true);
    let pad = width.saturating_sub(uwidth(&clipped));
    format!("{}{}", " ".repeat(pad), clipped)
}

/// Center in `width` columns, clipping longer text
pub fn cjust(s: &str, width: usize) -> String {
    let clipped = uresize(s, width, true);
    let pad = width.saturating_sub(uwidth(&clipped));
    let left = pad / 2;
    format!("{}{}{}", " ".repeat(left), clipped, " ".repeat(pad - left))
}

/// Unit suffixes for byte values
const UNITS: [&str; 7] = ["B", "K", "M", "G", "T", "P", "E"];

/// Format a byte count with a binary unit.
///
/// The short form fits in five columns ("1.2G", " 512M"), the long form
/// keeps two decimals and spells the unit with a "iB" suffix.
pub fn floating_humanizer(bytes: u64, short: bool) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    let limit = if short { 1000.0 } else { 1024.0 };
    while value >= limit && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if short {
        if value < 10.0 && unit > 0 {
            format!("{:.1}{}", value, UNITS[unit])
        } else {
            format!("{:.0}{}", value, UNITS[unit])
        }
    } else if unit == 0 {
        format!("{:.0} Byte", value)
    } else {
        format!("{:.2} {}iB", value, UNITS[unit])
    }
}

/// Percentage with three significant characters ("5.2", "45.6", "123")
pub fn short_percent(value: f64) -> String {
    let full = format!("{:.6}", value);
    let keep = if !(10.0..100.0).contains(&value) { 3 } else { 4 };
    full.chars().take(keep).collect()
}
