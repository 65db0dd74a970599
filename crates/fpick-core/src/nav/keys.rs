//! Keyboard transitions over the displayed result set.

use crate::fs::entry::FileEntry;
use crate::nav::cursor::Cursor;

/// Keys the browser reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavKey {
    Escape,
    Enter,
    Up,
    Down,
    Right,
    Left,
}

/// What a key press asks the browser to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Close the browser.
    Close,
    /// Emit the entry as the user's pick. Files and directories alike.
    Select(FileEntry),
    /// Move the cursor.
    Move(Cursor),
    /// Descend into the directory at this path.
    Descend(String),
    /// Pop one level of path history.
    Ascend,
    /// The key does nothing in the current state.
    Ignore,
}

/// Maps `key` to a transition given the cursor, the active entries and
/// whether path history can be popped. Pure; the caller applies it.
///
/// `Enter` never descends, even on a directory; `Right` does.
pub fn transition(
    key: NavKey,
    cursor: Cursor,
    entries: &[FileEntry],
    can_go_back: bool,
) -> Transition {
    let selected = entries.get(cursor.index());
    match key {
        NavKey::Escape => Transition::Close,
        NavKey::Enter => match selected {
            Some(entry) => Transition::Select(entry.clone()),
            None => Transition::Ignore,
        },
        NavKey::Up => Transition::Move(cursor.move_up()),
        NavKey::Down => Transition::Move(cursor.move_down(entries.len())),
        NavKey::Right => match selected {
            Some(entry) if entry.is_directory() => Transition::Descend(entry.path().to_string()),
            _ => Transition::Ignore,
        },
        NavKey::Left if can_go_back => Transition::Ascend,
        NavKey::Left => Transition::Ignore,
    }
}
