//! Ordered, write-once slots for the overlay textures.

/// Progress of the background loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Pending,
    Loaded,
    /// Slot `index` exhausted its retries; no later slot will be filled.
    Failed { index: usize },
    Cancelled,
}

/// Fixed-length sequence filled strictly in order by the loader.
///
/// Readers only get a slot once every slot is present, so a partially loaded
/// sequence is never sampled.
#[derive(Debug)]
pub struct FrameSequence<T> {
    capacity: usize,
    slots: Vec<T>,
    status: LoadStatus,
}

impl<T> FrameSequence<T> {
    pub fn new(capacity: usize) -> Self {
        FrameSequence {
            capacity,
            slots: Vec::with_capacity(capacity),
            status: LoadStatus::Pending,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn filled(&self) -> usize {
        self.slots.len()
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }

    pub fn is_loaded(&self) -> bool {
        self.status == LoadStatus::Loaded
    }

    /// Publish the next slot. Returns the value back if the sequence is
    /// already full or no longer accepting frames.
    pub fn push(&mut self, value: T) -> Result<usize, T> {
        if self.status != LoadStatus::Pending || self.slots.len() >= self.capacity {
            return Err(value);
        }
        let index = self.slots.len();
        self.slots.push(value);
        if self.slots.len() == self.capacity {
            self.status = LoadStatus::Loaded;
        }
        Ok(index)
    }

    pub fn fail(&mut self, index: usize) {
        if self.status == LoadStatus::Pending {
            self.status = LoadStatus::Failed { index };
        }
    }

    /// Stop accepting frames and hand back whatever was published.
    pub fn drain(&mut self) -> Vec<T> {
        if !matches!(self.status, LoadStatus::Failed { .. }) {
            self.status = LoadStatus::Cancelled;
        }
        std::mem::take(&mut self.slots)
    }

    /// Slot `index` clamped to the sequence, only once fully loaded.
    pub fn get(&self, index: usize) -> Option<&T> {
        if !self.is_loaded() {
            return None;
        }
        self.slots.get(index.min(self.capacity.saturating_sub(1)))
    }
}
