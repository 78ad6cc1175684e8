// Bell icon with the unread badge, shown at the right end of the header

use ratatui::text::Span;
use unicode_width::UnicodeWidthStr;

use crate::ui::theme;

const BELL: &str = "🔔";

/// Badge label, or `None` when nothing is unread (the badge is hidden).
pub fn badge_label(unread_count: usize) -> Option<String> {
    (unread_count > 0).then(|| format!("({})", unread_count))
}

pub fn bell_spans(unread_count: usize, open: bool) -> Vec<Span<'static>> {
    let bell_style = if open {
        theme::hint_key()
    } else {
        theme::text_primary()
    };
    let mut spans = vec![Span::styled(BELL, bell_style)];
    if let Some(label) = badge_label(unread_count) {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(label, theme::badge()));
    }
    spans
}

/// Columns taken by [`bell_spans`].
pub fn bell_width(unread_count: usize) -> u16 {
    let badge = badge_label(unread_count).map_or(0, |label| label.width() + 1);
    (BELL.width() + badge) as u16
}
