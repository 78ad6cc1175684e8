use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Utc};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const FALLBACK_DATE_FORMAT: &str = "%-m/%-d/%Y";

/// Truncate string to a display width, adding an ellipsis when truncated.
pub fn truncate_with_ellipsis(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }

    let budget = max_width - 3;
    let mut width = 0;
    let mut truncated = String::new();
    for grapheme in s.graphemes(true) {
        let w = grapheme.width();
        if width + w > budget {
            break;
        }
        truncated.push_str(grapheme);
        width += w;
    }
    truncated.push_str("...");
    truncated
}

/// Local calendar date of `timestamp`. An unusable `pattern` falls back to
/// month/day/year instead of failing the render.
pub fn format_date(timestamp: &DateTime<Utc>, pattern: &str) -> String {
    let pattern = if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        FALLBACK_DATE_FORMAT
    } else {
        pattern
    };
    timestamp
        .with_timezone(&Local)
        .format(pattern)
        .to_string()
}
