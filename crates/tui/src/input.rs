use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// Input events that the application can handle
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    // Navigation
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    PageUp,
    PageDown,
    Home,
    End,
    SwitchPane,
    Confirm,

    // Pickers
    OpenCharacterPicker,
    OpenDeckPicker,
    OpenSinglePicker,
    NextCardType,
    ClosePicker,

    // Search
    StartSearch,
    SearchChar(char),
    SearchBackspace,
    FinishSearch,
    ClearSearch,

    // Application control
    Reset,
    ShowHelp,
    Quit,

    // System
    Resize,
    Tick,

    // Unknown/unhandled
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    Search,
    Picker,
}

/// Input handler that converts crossterm events to application events
pub struct InputHandler {
    mode: Mode,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    pub fn new() -> Self {
        Self { mode: Mode::Normal }
    }

    /// Poll for input events with a timeout
    pub fn poll_event(&mut self, timeout: Duration) -> anyhow::Result<Option<InputEvent>> {
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key_event) if key_event.kind != KeyEventKind::Release => {
                    Ok(Some(self.handle_key_event(key_event)))
                }
                Event::Resize(_, _) => Ok(Some(InputEvent::Resize)),
                _ => Ok(Some(InputEvent::Unknown)),
            }
        } else {
            Ok(Some(InputEvent::Tick))
        }
    }

    /// Handle keyboard input
    pub fn handle_key_event(&mut self, key_event: KeyEvent) -> InputEvent {
        if key_event.modifiers.contains(KeyModifiers::CONTROL) {
            if let KeyCode::Char('c') = key_event.code {
                return InputEvent::Quit;
            }
        }

        match self.mode {
            Mode::Search => self.handle_search_input(key_event),
            Mode::Picker => self.handle_picker_input(key_event),
            Mode::Normal => self.handle_normal_input(key_event),
        }
    }

    fn handle_normal_input(&mut self, key_event: KeyEvent) -> InputEvent {
        match key_event.code {
            // Navigation
            KeyCode::Up | KeyCode::Char('k') => InputEvent::MoveUp,
            KeyCode::Down | KeyCode::Char('j') => InputEvent::MoveDown,
            KeyCode::Left | KeyCode::Char('h') => InputEvent::MoveLeft,
            KeyCode::Right | KeyCode::Char('l') => InputEvent::MoveRight,
            KeyCode::PageUp => InputEvent::PageUp,
            KeyCode::PageDown => InputEvent::PageDown,
            KeyCode::Home => InputEvent::Home,
            KeyCode::End => InputEvent::End,
            KeyCode::Tab => InputEvent::SwitchPane,
            KeyCode::Enter | KeyCode::Char(' ') => InputEvent::Confirm,

            // Pickers
            KeyCode::Char('c') => InputEvent::OpenCharacterPicker,
            KeyCode::Char('d') => InputEvent::OpenDeckPicker,
            KeyCode::Char('s') => InputEvent::OpenSinglePicker,

            // Search
            KeyCode::Char('/') => {
                self.mode = Mode::Search;
                InputEvent::StartSearch
            }
            KeyCode::Esc => InputEvent::ClearSearch,

            // Application control
            KeyCode::Char('R') => InputEvent::Reset,
            KeyCode::Char('?') => InputEvent::ShowHelp,
            KeyCode::Char('q') => InputEvent::Quit,

            _ => InputEvent::Unknown,
        }
    }

    fn handle_search_input(&mut self, key_event: KeyEvent) -> InputEvent {
        match key_event.code {
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                InputEvent::ClearSearch
            }
            KeyCode::Enter => {
                self.mode = Mode::Normal;
                InputEvent::FinishSearch
            }
            KeyCode::Backspace => InputEvent::SearchBackspace,
            KeyCode::Char(c) => InputEvent::SearchChar(c),
            _ => InputEvent::Unknown,
        }
    }

    fn handle_picker_input(&mut self, key_event: KeyEvent) -> InputEvent {
        match key_event.code {
            KeyCode::Up | KeyCode::Char('k') => InputEvent::MoveUp,
            KeyCode::Down | KeyCode::Char('j') => InputEvent::MoveDown,
            KeyCode::PageUp => InputEvent::PageUp,
            KeyCode::PageDown => InputEvent::PageDown,
            KeyCode::Home => InputEvent::Home,
            KeyCode::End => InputEvent::End,
            KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => InputEvent::NextCardType,
            KeyCode::Enter | KeyCode::Char(' ') => InputEvent::Confirm,
            KeyCode::Esc | KeyCode::Char('q') => InputEvent::ClosePicker,
            _ => InputEvent::Unknown,
        }
    }

    /// Check if currently typing into the search box
    pub fn is_in_search_mode(&self) -> bool {
        self.mode == Mode::Search
    }

    pub fn is_in_picker_mode(&self) -> bool {
        self.mode == Mode::Picker
    }

    pub fn enter_picker_mode(&mut self) {
        self.mode = Mode::Picker;
    }

    /// Back to normal key handling
    pub fn exit_mode(&mut self) {
        self.mode = Mode::Normal;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn slash_enters_search_and_enter_leaves() {
        let mut handler = InputHandler::new();
        assert_eq!(handler.handle_key_event(key(KeyCode::Char('/'))), InputEvent::StartSearch);
        assert!(handler.is_in_search_mode());

        // Picker shortcuts are plain text while searching.
        assert_eq!(
            handler.handle_key_event(key(KeyCode::Char('c'))),
            InputEvent::SearchChar('c')
        );
        assert_eq!(handler.handle_key_event(key(KeyCode::Enter)), InputEvent::FinishSearch);
        assert!(!handler.is_in_search_mode());
    }

    #[test]
    fn escape_in_search_clears() {
        let mut handler = InputHandler::new();
        handler.handle_key_event(key(KeyCode::Char('/')));
        assert_eq!(handler.handle_key_event(key(KeyCode::Esc)), InputEvent::ClearSearch);
        assert!(!handler.is_in_search_mode());
    }

    #[test]
    fn picker_mode_keys() {
        let mut handler = InputHandler::new();
        handler.enter_picker_mode();
        assert!(handler.is_in_picker_mode());
        assert_eq!(handler.handle_key_event(key(KeyCode::Tab)), InputEvent::NextCardType);
        assert_eq!(handler.handle_key_event(key(KeyCode::Enter)), InputEvent::Confirm);
        assert_eq!(handler.handle_key_event(key(KeyCode::Esc)), InputEvent::ClosePicker);

        handler.exit_mode();
        assert_eq!(handler.handle_key_event(key(KeyCode::Tab)), InputEvent::SwitchPane);
    }

    #[test]
    fn ctrl_c_quits_in_every_mode() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let mut handler = InputHandler::new();
        assert_eq!(handler.handle_key_event(ctrl_c), InputEvent::Quit);
        handler.handle_key_event(key(KeyCode::Char('/')));
        assert_eq!(handler.handle_key_event(ctrl_c), InputEvent::Quit);
        handler.enter_picker_mode();
        assert_eq!(handler.handle_key_event(ctrl_c), InputEvent::Quit);
    }
}
