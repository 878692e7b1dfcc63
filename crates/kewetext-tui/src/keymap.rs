//! Key decoding: crossterm key events to editor events.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use kewetext_core::{EditorEvent, Motion};

/// What a key press means while editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Editor(EditorEvent),
    Save,
    SaveAs,
    Ignore,
}

/// What a key press means while a prompt line is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKey {
    Push(char),
    Pop,
    Accept,
    Abort,
    Next,
    Prev,
    Ignore,
}

fn motion_for(code: KeyCode) -> Option<Motion> {
    Some(match code {
        KeyCode::Left => Motion::Left,
        KeyCode::Right => Motion::Right,
        KeyCode::Up => Motion::Up,
        KeyCode::Down => Motion::Down,
        KeyCode::Home => Motion::Home,
        KeyCode::End => Motion::End,
        KeyCode::PageUp => Motion::PageUp,
        KeyCode::PageDown => Motion::PageDown,
        _ => return None,
    })
}

pub fn normal_key(key: KeyEvent) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    if let Some(motion) = motion_for(key.code) {
        return KeyAction::Editor(if shift {
            EditorEvent::Extend(motion)
        } else {
            EditorEvent::Move(motion)
        });
    }

    let event = match key.code {
        KeyCode::Char(c) if ctrl => match c.to_ascii_lowercase() {
            'q' => EditorEvent::Quit,
            's' => return KeyAction::Save,
            'n' => return KeyAction::SaveAs,
            'f' => EditorEvent::StartSearch,
            'h' => EditorEvent::Backspace,
            _ => return KeyAction::Ignore,
        },
        KeyCode::Char(c) => EditorEvent::Insert(c),
        KeyCode::Tab => EditorEvent::Insert('\t'),
        KeyCode::Enter => EditorEvent::Newline,
        KeyCode::Backspace => EditorEvent::Backspace,
        KeyCode::Delete => EditorEvent::Delete,
        KeyCode::Esc => EditorEvent::Cancel,
        _ => return KeyAction::Ignore,
    };
    KeyAction::Editor(event)
}

pub fn prompt_key(key: KeyEvent) -> PromptKey {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('h') if ctrl => PromptKey::Pop,
        KeyCode::Char(_) if ctrl => PromptKey::Ignore,
        KeyCode::Char(c) => PromptKey::Push(c),
        KeyCode::Backspace | KeyCode::Delete => PromptKey::Pop,
        KeyCode::Enter => PromptKey::Accept,
        KeyCode::Esc => PromptKey::Abort,
        KeyCode::Right | KeyCode::Down => PromptKey::Next,
        KeyCode::Left | KeyCode::Up => PromptKey::Prev,
        _ => PromptKey::Ignore,
    }
}
