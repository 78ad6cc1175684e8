use postbell_core::models::Notification;
use postbell_core::{FeedConfig, NotificationStore};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::ui::format::{format_date, truncate_with_ellipsis};
use crate::ui::theme;

/// Widest the dropdown gets, borders included.
pub const DROPDOWN_MAX_WIDTH: u16 = 52;

const TITLE: &str = "Notifications";
const MARK_ALL_HINT: &str = "Mark all read [a]";
const EMPTY_MESSAGE: &str = "No notifications yet";
/// Marker column plus unread-dot column.
const ITEM_INDENT: &str = "    ";
/// Rows per notification: summary, title, date.
const ITEM_HEIGHT: usize = 3;

/// Render the dropdown anchored under the right end of the header.
pub fn render_notification_dropdown(
    f: &mut Frame,
    area: Rect,
    store: &NotificationStore,
    selected: usize,
    config: &FeedConfig,
) {
    let width = DROPDOWN_MAX_WIDTH.min(area.width);
    let inner_width = width.saturating_sub(2) as usize;
    let lines = dropdown_lines(store, selected, config, inner_width);
    let height = (lines.len() as u16 + 2).min(area.height.saturating_sub(1));
    let lines = scroll_to_selected(lines, selected, height.saturating_sub(2) as usize);

    let dropdown_area = Rect::new(
        area.x + area.width.saturating_sub(width),
        area.y + 1,
        width,
        height,
    );

    let block = Block::bordered()
        .border_style(theme::border_active())
        .style(Style::default().bg(theme::BG_DROPDOWN));

    f.render_widget(Clear, dropdown_area);
    f.render_widget(Paragraph::new(lines).block(block), dropdown_area);
}

/// Content lines of the dropdown: the header, then either the empty state
/// or three lines per visible notification.
pub fn dropdown_lines(
    store: &NotificationStore,
    selected: usize,
    config: &FeedConfig,
    width: usize,
) -> Vec<Line<'static>> {
    let mut lines = vec![header_line(store.unread_count(), width)];

    if store.is_empty() {
        lines.push(Line::from(Span::styled(
            format!(" {}", EMPTY_MESSAGE),
            theme::text_muted(),
        )));
        return lines;
    }

    for (index, notification) in store.visible(config.visible_window).iter().enumerate() {
        lines.extend(item_lines(notification, index == selected, config, width));
    }
    lines
}

/// Drop leading items until the selected one fits below the header in
/// `inner_height` rows. The header always stays.
pub fn scroll_to_selected(
    mut lines: Vec<Line<'static>>,
    selected: usize,
    inner_height: usize,
) -> Vec<Line<'static>> {
    let items_fit = (inner_height.saturating_sub(1) / ITEM_HEIGHT).max(1);
    if selected < items_fit {
        return lines;
    }
    let skip = (selected + 1 - items_fit) * ITEM_HEIGHT;
    lines.drain(1..(1 + skip).min(lines.len()));
    lines
}

fn header_line(unread_count: usize, width: usize) -> Line<'static> {
    let title = format!(" {}", TITLE);
    if unread_count == 0 {
        return Line::from(Span::styled(title, theme::text_bold()));
    }
    let padding = width.saturating_sub(title.width() + MARK_ALL_HINT.width() + 1);
    Line::from(vec![
        Span::styled(title, theme::text_bold()),
        Span::raw(" ".repeat(padding)),
        Span::styled(MARK_ALL_HINT, theme::hint_key()),
    ])
}

fn item_lines(
    notification: &Notification,
    is_selected: bool,
    config: &FeedConfig,
    width: usize,
) -> Vec<Line<'static>> {
    let marker = if is_selected { "▌ " } else { "  " };
    let (dot, name_style, text_style) = if notification.is_unread() {
        (
            Span::styled("● ", Style::default().fg(theme::ACCENT_UNREAD)),
            theme::text_bold(),
            theme::text_primary(),
        )
    } else {
        (Span::raw("  "), theme::text_muted(), theme::text_muted())
    };

    let text_width = width.saturating_sub(ITEM_INDENT.width());
    let summary = notification.summary();
    let name = truncate_with_ellipsis(&notification.commenter_name, text_width);
    let rest = summary
        .strip_prefix(notification.commenter_name.as_str())
        .unwrap_or(&summary);
    let rest = truncate_with_ellipsis(rest, text_width.saturating_sub(name.width()));
    let title = truncate_with_ellipsis(&format!("\"{}\"", notification.post_title), text_width);
    let date = format_date(&notification.timestamp, &config.date_format);

    let line_style = if is_selected {
        Style::default().bg(theme::BG_SELECTED)
    } else {
        Style::default()
    };

    vec![
        Line::from(vec![
            Span::styled(marker, Style::default().fg(theme::ACCENT_PRIMARY)),
            dot,
            Span::styled(name, name_style),
            Span::styled(rest, text_style),
        ])
        .style(line_style),
        Line::from(vec![Span::raw(ITEM_INDENT), Span::styled(title, text_style)]).style(line_style),
        Line::from(vec![Span::raw(ITEM_INDENT), Span::styled(date, theme::text_dim())])
            .style(line_style),
    ]
}
