use std::{collections::VecDeque, num::NonZeroUsize};

use sonolux_core::Sample;

/// A fixed-capacity FIFO window of the most recent samples.
///
/// Pushing into a full buffer evicts the oldest sample, so the memory held by
/// a long-running session never exceeds `capacity` samples.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    samples: VecDeque<Sample>,
    capacity: NonZeroUsize,
}

impl SampleBuffer {
    /// Creates an empty buffer holding at most `capacity` samples.
    #[must_use]
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity.get()),
            capacity,
        }
    }

    /// Appends a sample, returning the evicted oldest sample if the buffer was full.
    pub fn push(&mut self, sample: Sample) -> Option<Sample> {
        let evicted = if self.samples.len() == self.capacity.get() {
            self.samples.pop_front()
        } else {
            None
        };
        self.samples.push_back(sample);
        evicted
    }

    /// Returns the most recent sample.
    #[must_use]
    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    /// Returns the oldest retained sample.
    #[must_use]
    pub fn oldest(&self) -> Option<&Sample> {
        self.samples.front()
    }

    /// Iterates from the oldest to the most recent sample.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Sample> + ExactSizeIterator {
        self.samples.iter()
    }

    /// Copies the retained samples, oldest first.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Sample> {
        self.samples.iter().copied().collect()
    }

    /// Removes every sample while keeping the capacity.
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.samples.len() == self.capacity.get()
    }

    #[must_use]
    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }
}
