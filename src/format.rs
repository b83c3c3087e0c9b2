use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn truncate_unicode(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width.saturating_sub(1) {
            if max_width > 0 {
                result.push('\u{2026}');
            }
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

/// Render a permille value as a percentage with one decimal, right-aligning
/// the integer part to `int_width` columns: `342` -> `" 34.2"` for width 3.
pub fn format_permille(permille: u64, int_width: usize) -> String {
    format!("{:>int_width$}.{}", permille / 10, permille % 10)
}

/// `part / whole` scaled by `scale`, floored. Zero when `whole` is zero.
pub fn scaled_ratio(part: u64, whole: u64, scale: u64) -> u64 {
    if whole == 0 {
        return 0;
    }
    let value = u128::from(part) * u128::from(scale) / u128::from(whole);
    u64::try_from(value).unwrap_or(u64::MAX)
}
