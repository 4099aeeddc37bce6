//! Chat screen rendering: title, history, status line, and input box.

use client::Conversation;
use proto::Sender;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::app::TuiApp;
use super::markdown::render_markdown;

/// Render the entire chat screen into the given frame.
pub fn render(app: &mut TuiApp, conversation: &Conversation, frame: &mut Frame<'_>) {
    let area = frame.area();

    // Layout: title(1) | history(fill) | status(1) | input(3)
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(3),
    ])
    .split(area);

    render_title(app, frame, chunks[0]);
    render_history(app, conversation, frame, chunks[1]);
    render_status(app, conversation, frame, chunks[2]);
    render_input(app, conversation, frame, chunks[3]);
}

fn render_title(app: &TuiApp, frame: &mut Frame<'_>, area: Rect) {
    let title = Line::from(vec![
        Span::styled(
            " chainchat ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {} ", app.endpoint_label),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(title), area);
}

/// Builds the styled history lines for the conversation.
pub fn history_lines(conversation: &Conversation) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();

    for msg in conversation.messages() {
        lines.push(Line::from(""));
        match msg.sender {
            Sender::User => {
                lines.push(Line::from(vec![
                    Span::styled(
                        "You: ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(msg.text.clone()),
                ]));
            }
            Sender::Assistant => {
                let rendered = render_markdown(&msg.text);
                let mut first = true;
                for line in rendered {
                    if first {
                        let mut spans = vec![Span::styled(
                            "Bot: ",
                            Style::default()
                                .fg(Color::Green)
                                .add_modifier(Modifier::BOLD),
                        )];
                        spans.extend(line.spans);
                        lines.push(Line::from(spans));
                        first = false;
                    } else {
                        let mut spans = vec![Span::raw("     ")];
                        spans.extend(line.spans);
                        lines.push(Line::from(spans));
                    }
                }
            }
        }
    }
    lines
}

fn render_history(
    app: &mut TuiApp,
    conversation: &Conversation,
    frame: &mut Frame<'_>,
    area: Rect,
) {
    let lines = history_lines(conversation);

    let content_height = lines.len() as u16;
    let visible_height = area.height.saturating_sub(2);
    let max_scroll = content_height.saturating_sub(visible_height);
    // scroll_to_bottom sets u16::MAX; pin to the real maximum here.
    app.history_scroll = app.history_scroll.min(max_scroll);

    let history = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.history_scroll, 0));

    frame.render_widget(history, area);
}

fn render_status(app: &TuiApp, conversation: &Conversation, frame: &mut Frame<'_>, area: Rect) {
    let status = if conversation.is_busy() {
        Line::from(Span::styled(
            format!(" {} Thinking...", app.spinner_frame()),
            Style::default().fg(Color::Yellow),
        ))
    } else {
        Line::from(Span::styled(
            " Enter to send · ↑/↓ to scroll · Esc to quit",
            Style::default().fg(Color::DarkGray),
        ))
    };
    frame.render_widget(Paragraph::new(status), area);
}

fn render_input(app: &TuiApp, conversation: &Conversation, frame: &mut Frame<'_>, area: Rect) {
    let busy = conversation.is_busy();
    let border_style = if busy {
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
    } else {
        Style::default().fg(Color::Cyan)
    };

    let input = Paragraph::new(conversation.input())
        .style(if busy {
            Style::default().add_modifier(Modifier::DIM)
        } else {
            Style::default()
        })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(" Message "),
        );
    frame.render_widget(input, area);

    if !busy {
        let cursor_cols = conversation.input()[..app.cursor_pos].chars().count() as u16;
        frame.set_cursor_position(Position {
            x: area.x + 1 + cursor_cols,
            y: area.y + 1,
        });
    }
}
