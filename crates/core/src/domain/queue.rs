// Lane Domain Model (one barber's ordered queue)

use super::entry::{BarberId, EntryId, QueueEntry};

/// One barber's queue, in join order
///
/// Append/remove only. `joined_at` never decreases along the lane: an entry
/// stamped earlier than the current tail (clock stepped back) is clamped to
/// the tail's timestamp on push.
#[derive(Debug, Clone)]
pub struct Lane {
    barber_id: BarberId,
    entries: Vec<QueueEntry>,
}

impl Lane {
    pub fn new(barber_id: BarberId) -> Self {
        Self {
            barber_id,
            entries: Vec::new(),
        }
    }

    pub fn barber_id(&self) -> BarberId {
        self.barber_id
    }

    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Timestamp of the last entry, if any
    pub fn tail_joined_at(&self) -> Option<i64> {
        self.entries.last().map(|e| e.joined_at)
    }

    /// Append an entry to the end of the lane
    pub fn push(&mut self, mut entry: QueueEntry) -> &QueueEntry {
        debug_assert_eq!(entry.barber_id, self.barber_id);
        if let Some(tail) = self.tail_joined_at() {
            entry.joined_at = entry.joined_at.max(tail);
        }
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    pub fn head(&self) -> Option<&QueueEntry> {
        self.entries.first()
    }

    pub fn head_mut(&mut self) -> Option<&mut QueueEntry> {
        self.entries.first_mut()
    }

    /// Zero-based position of an entry (number of entries ahead of it)
    pub fn position_of(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    pub fn get(&self, id: EntryId) -> Option<&QueueEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Remove an entry, preserving the order of the rest
    pub fn remove(&mut self, id: EntryId) -> Option<QueueEntry> {
        let index = self.position_of(id)?;
        Some(self.entries.remove(index))
    }

    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        removed
    }
}
