use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

use crate::ui::components::{bell_spans, bell_width};
use crate::ui::{self, theme, App};

const KEY_HINTS: [(&str, &str); 6] = [
    ("n", "notifications"),
    ("a", "mark all read"),
    ("s", "sign in/out"),
    ("w", "switch user"),
    ("c", "simulate comment"),
    ("q", "quit"),
];

pub(crate) fn render(f: &mut Frame, app: &App) {
    let bg_block = Block::default().style(Style::default().bg(theme::BG_APP));
    f.render_widget(bg_block, f.area());

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .split(f.area());

    render_header(f, app, chunks[0]);
    ui::views::render_page(f, app, chunks[1]);
    render_footer(f, chunks[2]);

    if app.dropdown_open {
        let store = app.store();
        ui::views::render_notification_dropdown(f, f.area(), &store, app.selected, &app.config);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let unread_count = app.unread_count();
    let chunks = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(bell_width(unread_count) + 2),
    ])
    .split(area);

    let title = Paragraph::new(Line::from(Span::styled(" postbell", theme::text_bold())))
        .style(Style::default().bg(theme::BG_HEADER));
    f.render_widget(title, chunks[0]);

    let bell = Paragraph::new(Line::from(bell_spans(unread_count, app.dropdown_open)))
        .style(Style::default().bg(theme::BG_HEADER));
    f.render_widget(bell, chunks[1]);
}

fn render_footer(f: &mut Frame, area: Rect) {
    let mut spans = Vec::with_capacity(KEY_HINTS.len() * 2);
    for (key, label) in KEY_HINTS {
        spans.push(Span::styled(format!(" {}", key), theme::hint_key()));
        spans.push(Span::styled(format!(" {} ", label), theme::text_dim()));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
