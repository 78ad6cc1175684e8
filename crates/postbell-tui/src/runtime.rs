use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;

use crate::input::handle_key;
use crate::render::render;
use crate::ui::{App, Tui};

pub(crate) async fn run_app(terminal: &mut Tui, app: &mut App) -> Result<()> {
    let mut event_stream = EventStream::new();
    let mut feed_rx = app.feed_watch();

    while app.running {
        terminal.draw(|f| render(f, app))?;

        tokio::select! {
            maybe_event = event_stream.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => handle_key(app, key),
                // Resize and other events only need a redraw
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            changed = feed_rx.changed() => {
                if changed.is_err() {
                    tracing::warn!("Notification feed closed");
                    break;
                }
                feed_rx.borrow_and_update();
                app.clamp_selection();
            }
        }
    }
    Ok(())
}
