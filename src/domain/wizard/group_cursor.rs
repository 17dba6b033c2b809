//! GroupCursor - which option group of a paged step is on screen.
//!
//! The brand step shows its groups one at a time; "continue" on any group but
//! the last just moves the cursor.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupCursor {
    index: usize,
    total: usize,
}

impl GroupCursor {
    /// Cursor on the first of `total` groups (at least one).
    pub fn new(total: usize) -> Self {
        Self {
            index: 0,
            total: total.max(1),
        }
    }

    /// 0-based index of the visible group.
    pub fn index(&self) -> usize {
        self.index
    }

    /// 1-based position for display ("group 2 of 4").
    pub fn position(&self) -> usize {
        self.index + 1
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.total
    }

    /// Moves forward. Returns false if already on the last group.
    pub fn advance(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.index += 1;
        true
    }

    /// Moves back. Returns false if already on the first group.
    pub fn retreat(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }
}
