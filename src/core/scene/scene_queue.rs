//=========================================================================
// Scene Queue
//=========================================================================
//
// FIFO buffer for deferred scene work (records waiting to be created,
// ids waiting to be destroyed).
//
// Requests are pushed at any time; the scene manager flushes the queue
// at the tick boundary, handling every entry exactly once in the order
// it was requested.
//
//=========================================================================

//=== SceneQueue ==========================================================

/// FIFO queue flushed once per tick.
pub(crate) struct SceneQueue<T> {
    queue: Vec<T>,
}

impl<T> SceneQueue<T> {
    /// Creates a new empty queue.
    pub(crate) fn new() -> Self {
        Self { queue: Vec::new() }
    }

    /// Queues an entry for the next flush.
    pub(crate) fn push(&mut self, entry: T) {
        self.queue.push(entry);
    }

    /// Returns an iterator over the queued entries, oldest first.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &T> {
        self.queue.iter()
    }

    /// Returns a mutable iterator over the queued entries, oldest first.
    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.queue.iter_mut()
    }

    /// Returns true if the queue is empty.
    pub(crate) fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of queued entries.
    pub(crate) fn len(&self) -> usize {
        self.queue.len()
    }

    /// Drops every entry matching the predicate.
    pub(crate) fn discard(&mut self, mut predicate: impl FnMut(&T) -> bool) {
        self.queue.retain(|entry| !predicate(entry));
    }

    /// Takes all entries from the queue, leaving it empty.
    pub(crate) fn take(&mut self) -> Vec<T> {
        std::mem::take(&mut self.queue)
    }
}

impl<T: PartialEq> SceneQueue<T> {
    /// Returns true if an equal entry is already queued.
    pub(crate) fn contains(&self, entry: &T) -> bool {
        self.queue.contains(entry)
    }

    /// Queues the entry unless an equal one is already waiting.
    pub(crate) fn push_unique(&mut self, entry: T) -> bool {
        if self.contains(&entry) {
            return false;
        }
        self.queue.push(entry);
        true
    }
}

impl<T> Default for SceneQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
