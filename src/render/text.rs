//! Text measurement and ellipsis truncation.

use std::borrow::Cow;

use super::cache::LruCache;

/// Horizontal room reserved around cell text (8px each side).
pub const CELL_TEXT_INSET: f64 = 16.0;

const ELLIPSIS: &str = "\u{2026}";

/// Build a CSS font shorthand.
pub fn font_string(size: f64, family: &str) -> String {
    format!("{size}px {family}")
}

/// Measures rendered text width.
pub trait TextMeasurer {
    fn measure(&mut self, text: &str, font: &str) -> f64;
}

/// Font-metric-free approximation used off the browser.
///
/// Narrow characters count 0.6 em, wide (CJK, full-width) characters 1 em.
#[derive(Debug)]
pub struct EstimatedTextMeasurer {
    cache: LruCache<(String, String), f64>,
}

const MEASURE_CACHE_CAP: usize = 4096;

impl Default for EstimatedTextMeasurer {
    fn default() -> Self {
        Self {
            cache: LruCache::new(MEASURE_CACHE_CAP),
        }
    }
}

impl EstimatedTextMeasurer {
    pub fn new() -> Self {
        Self::default()
    }
}

fn is_wide(c: char) -> bool {
    matches!(c as u32,
        0x1100..=0x115F
        | 0x2E80..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6
        | 0x20000..=0x3FFFD)
}

/// Pixel size parsed from the front of a font shorthand (`13px Arial`).
fn font_size(font: &str) -> f64 {
    font.split_whitespace()
        .find_map(|part| part.strip_suffix("px"))
        .and_then(|n| n.parse::<f64>().ok())
        .unwrap_or(13.0)
}

impl TextMeasurer for EstimatedTextMeasurer {
    fn measure(&mut self, text: &str, font: &str) -> f64 {
        let key = (font.to_string(), text.to_string());
        if let Some(width) = self.cache.get(&key) {
            return *width;
        }
        let size = font_size(font);
        let width = text
            .chars()
            .map(|c| if is_wide(c) { size } else { size * 0.6 })
            .sum();
        self.cache.insert(key, width);
        width
    }
}

/// Fit `text` into a cell of `cell_width` pixels.
///
/// Text that fits within `cell_width - 16` is returned as is. Otherwise the
/// longest prefix (by characters) whose `prefix + "…"` fits is used, or `"…"`
/// alone when nothing fits.
pub fn truncate_text<'a>(
    measurer: &mut dyn TextMeasurer,
    text: &'a str,
    cell_width: f64,
    font: &str,
) -> Cow<'a, str> {
    let max_width = cell_width - CELL_TEXT_INSET;
    if text.is_empty() || measurer.measure(text, font) <= max_width {
        return Cow::Borrowed(text);
    }

    let chars: Vec<char> = text.chars().collect();
    let mut low = 0;
    let mut high = chars.len();
    let mut candidate = String::with_capacity(text.len() + ELLIPSIS.len());

    // Largest `low` such that the first `low` chars plus the ellipsis fit.
    while low < high {
        let mid = (low + high).div_ceil(2);
        candidate.clear();
        candidate.extend(chars.iter().take(mid));
        candidate.push_str(ELLIPSIS);
        if measurer.measure(&candidate, font) <= max_width {
            low = mid;
        } else {
            high = mid - 1;
        }
    }

    if low == 0 {
        return Cow::Borrowed(ELLIPSIS);
    }
    let mut truncated: String = chars.iter().take(low).collect();
    truncated.push_str(ELLIPSIS);
    Cow::Owned(truncated)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    /// 10px per character.
    struct Fixed;

    impl TextMeasurer for Fixed {
        fn measure(&mut self, text: &str, _font: &str) -> f64 {
            #[allow(clippy::cast_precision_loss)]
            let n = text.chars().count() as f64;
            n * 10.0
        }
    }

    #[test]
    fn fitting_text_is_borrowed() {
        let out = truncate_text(&mut Fixed, "abc", 46.0, "13px Arial");
        assert!(matches!(out, Cow::Borrowed("abc")));
    }

    #[test]
    fn long_text_gets_ellipsis() {
        // max width 50 -> four chars + ellipsis
        let out = truncate_text(&mut Fixed, "abcdefghij", 66.0, "13px Arial");
        assert_eq!(out, "abcd\u{2026}");
    }

    #[test]
    fn nothing_fits_yields_ellipsis() {
        let out = truncate_text(&mut Fixed, "abcdefghij", 20.0, "13px Arial");
        assert_eq!(out, "\u{2026}");
    }

    #[test]
    fn estimate_scales_with_font_size() {
        let mut m = EstimatedTextMeasurer::new();
        assert_eq!(m.measure("ab", "10px Arial"), 12.0);
        assert_eq!(m.measure("中", "20px Arial"), 20.0);
    }
}
