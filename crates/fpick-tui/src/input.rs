use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use fpick_core::{Command, FileEntry, NavKey};
use ratatui::layout::Rect;

/// Two clicks on the same row within this window count as a double click.
const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(400);

/// Actions that can result from a key press.
#[derive(Debug, PartialEq, Eq)]
pub enum InputAction {
    /// Dispatch a core Command.
    Command(Command),
    /// Leave immediately without a selection.
    Quit,
    /// Key is not bound.
    None,
}

/// Query text being typed, owned by the host and sent whole to the core.
///
/// Immutable: each key press yields a new `InputState`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    query: String,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

/// Maps a key press to an action and the next input state.
pub fn handle_key(key: KeyEvent, state: &InputState) -> (InputAction, InputState) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let nav = |k| (InputAction::Command(Command::Key(k)), state.clone());

    match key.code {
        KeyCode::Char('c') if ctrl => (InputAction::Quit, state.clone()),
        KeyCode::Char('u') if ctrl => edit(state, String::new()),
        KeyCode::Char(_) if ctrl => (InputAction::None, state.clone()),
        KeyCode::Char(c) => {
            let mut query = state.query.clone();
            query.push(c);
            edit(state, query)
        }
        KeyCode::Backspace => {
            let mut query = state.query.clone();
            if query.pop().is_none() {
                return (InputAction::None, state.clone());
            }
            edit(state, query)
        }
        KeyCode::Esc => nav(NavKey::Escape),
        KeyCode::Enter => nav(NavKey::Enter),
        KeyCode::Up => nav(NavKey::Up),
        KeyCode::Down => nav(NavKey::Down),
        KeyCode::Left => nav(NavKey::Left),
        KeyCode::Right => nav(NavKey::Right),
        _ => (InputAction::None, state.clone()),
    }
}

fn edit(state: &InputState, query: String) -> (InputAction, InputState) {
    if query == state.query {
        return (InputAction::None, state.clone());
    }
    (
        InputAction::Command(Command::SetQuery(query.clone())),
        InputState { query },
    )
}

/// Where the entry list was last drawn, for mapping pointer rows to indices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListViewport {
    /// Inner area of the list, without borders.
    pub area: Rect,
    /// Index of the first visible entry.
    pub offset: usize,
}

impl ListViewport {
    /// Entry index under the given terminal cell, if any.
    pub fn index_at(&self, column: u16, row: u16) -> Option<usize> {
        let inside = column >= self.area.x
            && column < self.area.x + self.area.width
            && row >= self.area.y
            && row < self.area.y + self.area.height;
        inside.then(|| self.offset + usize::from(row - self.area.y))
    }
}

/// Turns raw pointer events into click, double click and hover commands.
#[derive(Debug, Default)]
pub struct MouseTracker {
    last_click: Option<(usize, Instant)>,
}

impl MouseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&mut self, event: MouseEvent, viewport: &ListViewport) -> Option<Command> {
        self.handle_at(event, viewport, Instant::now())
    }

    fn handle_at(
        &mut self,
        event: MouseEvent,
        viewport: &ListViewport,
        now: Instant,
    ) -> Option<Command> {
        let index = viewport.index_at(event.column, event.row)?;
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let repeated = matches!(
                    self.last_click,
                    Some((last, at)) if last == index && now.duration_since(at) <= DOUBLE_CLICK_WINDOW
                );
                if repeated {
                    self.last_click = None;
                    Some(Command::DoubleClick(index))
                } else {
                    self.last_click = Some((index, now));
                    Some(Command::Click(index))
                }
            }
            MouseEventKind::Moved => Some(Command::Hover(index)),
            _ => None,
        }
    }
}

/// Adapts pointer commands to a host that exits on the first selection.
///
/// A single click only highlights, so the second click of a double click
/// can still land. A double click on a file picks it and a double click on
/// a directory descends.
pub fn pointer_command(command: Command, target: Option<&FileEntry>) -> Command {
    match command {
        Command::Click(index) => Command::Hover(index),
        Command::DoubleClick(index) if target.is_some_and(|e| !e.is_directory()) => {
            Command::Click(index)
        }
        other => other,
    }
}
