//! Shuffle history
//!
//! Bounded record of playlist indices left by shuffled "next" presses, so
//! "previous" can walk back to what actually played.

use std::collections::VecDeque;

/// Bounded index history (most recent = back)
#[derive(Debug, Clone)]
pub struct History {
    indices: VecDeque<usize>,
    max_size: usize,
}

impl History {
    /// Create history holding at most `max_size` entries
    pub fn new(max_size: usize) -> Self {
        Self {
            indices: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    /// Record an index, discarding the oldest when full
    pub fn push(&mut self, index: usize) {
        if self.max_size == 0 {
            return;
        }
        if self.indices.len() >= self.max_size {
            self.indices.pop_front();
        }
        self.indices.push_back(index);
    }

    /// Pop most recent index
    pub fn pop(&mut self) -> Option<usize> {
        self.indices.pop_back()
    }

    /// Keep recorded indices pointing at the same tracks after an insert at `position`
    pub fn shift_from(&mut self, position: usize) {
        for index in &mut self.indices {
            if *index >= position {
                *index += 1;
            }
        }
    }

    /// Number of recorded entries
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Check if history is empty
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.indices.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(50)
    }
}
