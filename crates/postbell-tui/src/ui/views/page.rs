use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::ui::{theme, App, View};

/// Main area behind the dropdown: home or the post a notification opened.
pub fn render_page(f: &mut Frame, app: &App, area: Rect) {
    let lines = match (&app.view, app.identity()) {
        (_, None) => vec![
            Line::from(Span::styled("Signed out.", theme::text_primary())),
            Line::from(""),
            Line::from(vec![
                Span::styled("s", theme::hint_key()),
                Span::styled(" to sign in", theme::text_muted()),
            ]),
        ],
        (View::Home, Some(identity)) => vec![
            Line::from(vec![
                Span::styled("Signed in as ", theme::text_muted()),
                Span::styled(identity.label().to_string(), theme::text_bold()),
                Span::styled(format!(" ({})", identity.uid), theme::text_dim()),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("n", theme::hint_key()),
                Span::styled(" to open notifications", theme::text_muted()),
            ]),
        ],
        (View::Post { post_id, title }, Some(_)) => vec![
            Line::from(Span::styled(title.clone(), theme::text_bold())),
            Line::from(Span::styled(format!("/post/{}", post_id), theme::text_dim())),
            Line::from(""),
            Line::from(vec![
                Span::styled("h", theme::hint_key()),
                Span::styled(" to go back", theme::text_muted()),
            ]),
        ],
    };

    let padded = Rect {
        x: area.x + 2,
        y: area.y + 1,
        width: area.width.saturating_sub(4),
        height: area.height.saturating_sub(1),
    };
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), padded);
}
