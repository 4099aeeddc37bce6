//! TUI session state and input handling.

use client::Conversation;

/// Spinner animation frames (Braille pattern).
const SPINNER: &[char] = &['⣾', '⣽', '⣻', '⢿', '⡿', '⣟', '⣯', '⣷'];

/// Display-only state for the TUI session. Conversation content lives in the
/// [`Conversation`] store; this struct only tracks what the terminal needs.
pub struct TuiApp {
    /// Endpoint label shown in the title bar.
    pub endpoint_label: String,
    /// Cursor position within the input text (byte offset).
    pub cursor_pos: usize,
    /// Vertical scroll offset for the history panel.
    pub history_scroll: u16,
    /// Spinner animation tick counter.
    pub spinner_tick: u8,
    /// Whether the user requested exit.
    pub should_quit: bool,
}

impl TuiApp {
    /// Create a new TUI application state.
    pub fn new(endpoint_label: impl Into<String>) -> Self {
        Self {
            endpoint_label: endpoint_label.into(),
            cursor_pos: 0,
            history_scroll: 0,
            spinner_tick: 0,
            should_quit: false,
        }
    }

    /// Current spinner frame for the status line.
    pub fn spinner_frame(&self) -> char {
        SPINNER[self.spinner_tick as usize % SPINNER.len()]
    }

    /// Pins the history view to the newest message on the next render.
    pub fn scroll_to_bottom(&mut self) {
        // Clamped to the real maximum during rendering.
        self.history_scroll = u16::MAX;
    }

    /// Handle a keyboard event. Typing and quitting are disabled while a
    /// response is streaming; scrolling always works.
    pub fn handle_key(&mut self, key: crossterm::event::KeyEvent, conversation: &mut Conversation) {
        use crossterm::event::{KeyCode, KeyModifiers};

        let idle = !conversation.is_busy();
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) | (_, KeyCode::Esc) => {
                if idle {
                    self.should_quit = true;
                }
            }
            (_, KeyCode::Char(c)) if idle => {
                let mut input = conversation.input().to_string();
                input.insert(self.cursor_pos, c);
                self.cursor_pos += c.len_utf8();
                conversation.set_input(input);
            }
            (_, KeyCode::Backspace) if idle => {
                if self.cursor_pos > 0 {
                    let mut input = conversation.input().to_string();
                    // Find the previous character boundary
                    let prev = input[..self.cursor_pos]
                        .char_indices()
                        .last()
                        .map(|(i, _)| i)
                        .unwrap_or(0);
                    input.drain(prev..self.cursor_pos);
                    self.cursor_pos = prev;
                    conversation.set_input(input);
                }
            }
            (_, KeyCode::Left) if idle => {
                if self.cursor_pos > 0 {
                    self.cursor_pos = conversation.input()[..self.cursor_pos]
                        .char_indices()
                        .last()
                        .map(|(i, _)| i)
                        .unwrap_or(0);
                }
            }
            (_, KeyCode::Right) if idle => {
                let input = conversation.input();
                if self.cursor_pos < input.len() {
                    self.cursor_pos = input[self.cursor_pos..]
                        .char_indices()
                        .nth(1)
                        .map(|(i, _)| self.cursor_pos + i)
                        .unwrap_or(input.len());
                }
            }
            (_, KeyCode::Up) => {
                self.history_scroll = self.history_scroll.saturating_sub(1);
            }
            (_, KeyCode::Down) => {
                self.history_scroll = self.history_scroll.saturating_add(1);
            }
            (_, KeyCode::PageUp) => {
                self.history_scroll = self.history_scroll.saturating_sub(10);
            }
            (_, KeyCode::PageDown) => {
                self.history_scroll = self.history_scroll.saturating_add(10);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn typing_inserts_at_cursor() {
        let mut app = TuiApp::new("endpoint");
        let mut conv = Conversation::new();

        app.handle_key(press(KeyCode::Char('h')), &mut conv);
        app.handle_key(press(KeyCode::Char('i')), &mut conv);
        assert_eq!(conv.input(), "hi");
        assert_eq!(app.cursor_pos, 2);

        app.handle_key(press(KeyCode::Left), &mut conv);
        app.handle_key(press(KeyCode::Char('a')), &mut conv);
        assert_eq!(conv.input(), "hai");
    }

    #[test]
    fn backspace_removes_previous_char() {
        let mut app = TuiApp::new("endpoint");
        let mut conv = Conversation::new();
        conv.set_input("ab");
        app.cursor_pos = 2;

        app.handle_key(press(KeyCode::Backspace), &mut conv);
        assert_eq!(conv.input(), "a");
        assert_eq!(app.cursor_pos, 1);
    }

    #[test]
    fn backspace_handles_multibyte_chars() {
        let mut app = TuiApp::new("endpoint");
        let mut conv = Conversation::new();
        conv.set_input("é");
        app.cursor_pos = "é".len();

        app.handle_key(press(KeyCode::Backspace), &mut conv);
        assert_eq!(conv.input(), "");
        assert_eq!(app.cursor_pos, 0);
    }

    #[test]
    fn typing_is_ignored_while_busy() {
        let mut app = TuiApp::new("endpoint");
        let mut conv = Conversation::new();
        conv.set_busy(true);

        app.handle_key(press(KeyCode::Char('x')), &mut conv);
        assert_eq!(conv.input(), "");
    }

    #[test]
    fn esc_quits_only_when_idle() {
        let mut app = TuiApp::new("endpoint");
        let mut conv = Conversation::new();

        conv.set_busy(true);
        app.handle_key(press(KeyCode::Esc), &mut conv);
        assert!(!app.should_quit);

        conv.set_busy(false);
        app.handle_key(press(KeyCode::Esc), &mut conv);
        assert!(app.should_quit);
    }

    #[test]
    fn ctrl_c_quits_when_idle() {
        let mut app = TuiApp::new("endpoint");
        let mut conv = Conversation::new();

        app.handle_key(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            &mut conv,
        );
        assert!(app.should_quit);
    }

    #[test]
    fn scroll_keys_adjust_history_offset() {
        let mut app = TuiApp::new("endpoint");
        let mut conv = Conversation::new();
        app.history_scroll = 20;

        app.handle_key(press(KeyCode::Up), &mut conv);
        assert_eq!(app.history_scroll, 19);
        app.handle_key(press(KeyCode::PageDown), &mut conv);
        assert_eq!(app.history_scroll, 29);
        app.handle_key(press(KeyCode::PageUp), &mut conv);
        assert_eq!(app.history_scroll, 19);
    }

    #[test]
    fn scrolling_works_while_busy() {
        let mut app = TuiApp::new("endpoint");
        let mut conv = Conversation::new();
        conv.set_busy(true);
        app.history_scroll = 5;

        app.handle_key(press(KeyCode::Down), &mut conv);
        assert_eq!(app.history_scroll, 6);
    }

    #[test]
    fn spinner_frame_cycles() {
        let mut app = TuiApp::new("endpoint");
        let first = app.spinner_frame();
        app.spinner_tick = app.spinner_tick.wrapping_add(1);
        assert_ne!(first, app.spinner_frame());
    }
}
