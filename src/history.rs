//! Undo/redo history of full model snapshots.
//!
//! Every entry is a complete, immutable copy of the masks, text boxes and
//! image bytes. The stack is linear: committing after an undo discards the
//! redo branch.

use crate::image_source::EncodedImage;
use crate::model::{Mask, TextBox};

// ============================================================================
// Snapshot
// ============================================================================

/// One undo/redo-able state of the session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    pub masks: Vec<Mask>,
    pub text_boxes: Vec<TextBox>,
    /// Image at the time of the snapshot. Bytes are shared, not copied.
    pub image: Option<EncodedImage>,
}

impl Snapshot {
    pub fn new(masks: Vec<Mask>, text_boxes: Vec<TextBox>, image: Option<EncodedImage>) -> Self {
        Self {
            masks,
            text_boxes,
            image,
        }
    }

    /// Whether restoring this entry needs the image swapped.
    pub fn image_differs(&self, current: Option<&EncodedImage>) -> bool {
        match (&self.image, current) {
            (Some(a), Some(b)) => !a.same_as(b),
            (None, None) => false,
            _ => true,
        }
    }
}

// ============================================================================
// History
// ============================================================================

/// Configuration for the history stack
#[derive(Debug, Clone)]
pub struct HistoryConfig {
    /// Maximum number of entries to keep
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: crate::constants::HISTORY_CAPACITY,
        }
    }
}

/// Index-addressed snapshot stack.
///
/// `index` points at the entry matching the live model. Entries before it can
/// be undone to, entries after it redone to.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<Snapshot>,
    index: usize,
    config: HistoryConfig,
}

impl History {
    /// Create a new empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom configuration. Capacity is at least one entry.
    pub fn with_config(config: HistoryConfig) -> Self {
        Self {
            config: HistoryConfig {
                capacity: config.capacity.max(1),
            },
            ..Default::default()
        }
    }

    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// Append a snapshot as the new current entry.
    ///
    /// Anything after the current index is dropped first; the oldest entry is
    /// evicted when over capacity.
    pub fn commit(&mut self, snapshot: Snapshot) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.index + 1);
        }
        self.entries.push(snapshot);

        let overflow = self.entries.len().saturating_sub(self.config.capacity);
        if overflow > 0 {
            self.entries.drain(..overflow);
        }
        self.index = self.entries.len() - 1;
        log::debug!(
            "📝 History: committed entry {} of {}",
            self.index + 1,
            self.entries.len()
        );
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// Entry an undo would restore, without moving.
    pub fn peek_undo(&self) -> Option<&Snapshot> {
        if self.can_undo() {
            self.entries.get(self.index - 1)
        } else {
            None
        }
    }

    /// Entry a redo would restore, without moving.
    pub fn peek_redo(&self) -> Option<&Snapshot> {
        if self.can_redo() {
            self.entries.get(self.index + 1)
        } else {
            None
        }
    }

    /// Step back and return the entry to restore, or None at the first entry.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        log::debug!("⏪ Undo: now at entry {} of {}", self.index + 1, self.entries.len());
        self.entries.get(self.index)
    }

    /// Step forward and return the entry to restore, or None at the last entry.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        log::debug!("⏩ Redo: now at entry {} of {}", self.index + 1, self.entries.len());
        self.entries.get(self.index)
    }

    /// Entry matching the live model, if any has been committed.
    pub fn current(&self) -> Option<&Snapshot> {
        self.entries.get(self.index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = 0;
        log::debug!("🗑️ History cleared");
    }
}

// ============================================================================
// Tests
// ============================================================================
