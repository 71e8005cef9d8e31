use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Which part of the screen receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    Label,
    Symbol,
    #[default]
    Board,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Self::Label => Self::Symbol,
            Self::Symbol => Self::Board,
            Self::Board => Self::Label,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Label => Self::Board,
            Self::Symbol => Self::Label,
            Self::Board => Self::Symbol,
        }
    }

    pub fn is_input(self) -> bool {
        !matches!(self, Self::Board)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    Quit,
    TogglePolling,
    FocusNext,
    FocusPrev,
    FocusBoard,
    FocusForm,
    Submit,
    Backspace,
    Input(char),
}

/// Ctrl+C arrives as a key event while the terminal is in raw mode.
pub fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
}

pub fn parse_command(key_code: &KeyCode, focus: Focus) -> Option<UiCommand> {
    match key_code {
        KeyCode::Tab => Some(UiCommand::FocusNext),
        KeyCode::BackTab => Some(UiCommand::FocusPrev),
        KeyCode::Enter if focus.is_input() => Some(UiCommand::Submit),
        KeyCode::Esc if focus.is_input() => Some(UiCommand::FocusBoard),
        KeyCode::Backspace if focus.is_input() => Some(UiCommand::Backspace),
        KeyCode::Char(c) if focus.is_input() => Some(UiCommand::Input(*c)),
        KeyCode::Esc => Some(UiCommand::Quit),
        KeyCode::Char(' ') => Some(UiCommand::TogglePolling),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'q' => Some(UiCommand::Quit),
            'p' | 's' => Some(UiCommand::TogglePolling),
            'a' => Some(UiCommand::FocusForm),
            _ => None,
        },
        _ => None,
    }
}
