//! Selection cursor over the displayed result set.

/// Index of the highlighted entry.
///
/// Immutable: every move returns a new `Cursor`. All moves take the
/// current result length and keep the index in `0..len`, or at `0` when
/// the result set is empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    index: usize,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(self) -> usize {
        self.index
    }

    /// Moves up by one. No-op at the top.
    pub fn move_up(self) -> Self {
        Self {
            index: self.index.saturating_sub(1),
        }
    }

    /// Moves down by one. No-op at the bottom.
    pub fn move_down(self, len: usize) -> Self {
        Self { index: self.index + 1 }.clamped(len)
    }

    /// Jumps to `index`, clamped to bounds.
    pub fn with_index(self, index: usize, len: usize) -> Self {
        Self { index }.clamped(len)
    }

    /// Pulls the index back inside `0..len`.
    pub fn clamped(self, len: usize) -> Self {
        let index = if len == 0 {
            0
        } else {
            self.index.min(len - 1)
        };
        Self { index }
    }

    /// Back to the first entry.
    pub fn reset(self) -> Self {
        Self::default()
    }
}
