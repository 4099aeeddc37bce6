//! Async event loop for the TUI — interleaves crossterm, stream, and timer events.

use client::{ChatController, Submission};
use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::debug;

use super::app::TuiApp;
use super::chat;

/// RAII guard that restores the terminal on drop (even on panic).
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(std::io::stdout(), LeaveAlternateScreen);
    }
}

/// Run the full-screen TUI until the user quits.
pub async fn run_tui(mut controller: ChatController) -> anyhow::Result<()> {
    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard; // Drop restores terminal

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    debug!(endpoint = %controller.endpoint(), "TUI started");

    let mut app = TuiApp::new(controller.endpoint());
    let mut revision = controller.conversation().subscribe();

    // Crossterm event stream (async)
    let mut crossterm_stream = EventStream::new();

    // Spinner tick interval (100ms)
    let mut spinner_interval = tokio::time::interval(std::time::Duration::from_millis(100));
    spinner_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        // Render
        terminal.draw(|frame| chat::render(&mut app, controller.conversation(), frame))?;

        // Event select
        tokio::select! {
            // Branch 1: crossterm terminal events
            maybe_event = crossterm_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        if key.code == KeyCode::Enter {
                            let raw = controller.conversation().input().to_string();
                            if controller.submit(&raw) == Submission::Accepted {
                                debug!(message_len = raw.trim().len(), "Message submitted");
                                app.cursor_pos = 0;
                                app.scroll_to_bottom();
                            }
                        } else {
                            app.handle_key(key, controller.conversation_mut());
                        }
                    }
                    Some(Ok(Event::Resize(_, _))) => {
                        // Terminal will redraw on next loop iteration
                    }
                    Some(Err(_)) | None => {
                        break; // stream ended or error
                    }
                    _ => {}
                }
            }

            // Branch 2: completion stream events
            event = controller.next_event(), if controller.is_streaming() => {
                controller.apply_event(event);
                app.scroll_to_bottom();
            }

            // Branch 3: store revision bumped outside this loop's handlers
            _ = revision.changed() => {}

            _ = spinner_interval.tick(), if controller.conversation().is_busy() => {
                app.spinner_tick = app.spinner_tick.wrapping_add(1);
            }
        }

        if app.should_quit {
            break;
        }
    }

    // TerminalGuard::drop handles cleanup
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_guard_drop_path_is_safe() {
        let guard = TerminalGuard;
        drop(guard);
    }
}
