//! Fixed-capacity sample history for moving averages.
//!
//! Samples are kept most-recent-first: index 0 is the newest reading. Once the
//! history is full, pushing a new sample drops the oldest one. Backed by a
//! [`heapless::Deque`], so a push is O(1) instead of shifting the whole array.

use heapless::Deque;

/// Maximum number of samples kept, and therefore the largest averaging window.
pub const HISTORY_CAPACITY: usize = 100;

/// Ring of the most recent concentration samples.
#[derive(Debug, Clone)]
pub struct SampleHistory<const N: usize = HISTORY_CAPACITY> {
    samples: Deque<i16, N>,
}

impl<const N: usize> Default for SampleHistory<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SampleHistory<N> {
    pub const fn new() -> Self {
        Self {
            samples: Deque::new(),
        }
    }

    /// Insert a sample at index 0, evicting the oldest sample when full.
    pub fn push(&mut self, sample: i16) {
        if self.samples.is_full() {
            self.samples.pop_back();
        }
        // A slot is always free at this point unless N == 0.
        let _ = self.samples.push_front(sample);
    }

    /// Overwrite the newest sample without shifting the history.
    ///
    /// An empty history gains its first entry instead.
    pub fn replace_latest(&mut self, sample: i16) {
        match self.samples.front_mut() {
            Some(latest) => *latest = sample,
            None => self.push(sample),
        }
    }

    pub fn latest(&self) -> Option<i16> {
        self.samples.front().copied()
    }

    /// Sample at `index`, where 0 is the most recent.
    pub fn get(&self, index: usize) -> Option<i16> {
        self.samples.iter().nth(index).copied()
    }

    /// Iterate from the most recent sample to the oldest.
    pub fn iter(&self) -> impl Iterator<Item = i16> + '_ {
        self.samples.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Integer mean of the `count` most recent samples, truncated toward zero.
    ///
    /// Only samples actually held are averaged, so `count` larger than
    /// [`len`](Self::len) averages everything. Returns `None` when there is
    /// nothing to average.
    pub fn average(&self, count: usize) -> Option<i16> {
        let n = count.min(self.samples.len());
        if n == 0 {
            return None;
        }

        let sum: i32 = self.samples.iter().take(n).map(|&s| s as i32).sum();
        Some((sum / n as i32) as i16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_keeps_most_recent_first() {
        let mut history = SampleHistory::<4>::new();
        history.push(10);
        history.push(20);
        history.push(30);

        assert_eq!(history.latest(), Some(30));
        assert_eq!(history.get(0), Some(30));
        assert_eq!(history.get(1), Some(20));
        assert_eq!(history.get(2), Some(10));
        assert_eq!(history.get(3), None);
    }

    #[test]
    fn test_push_evicts_oldest_when_full() {
        let mut history = SampleHistory::<3>::new();
        for sample in [1, 2, 3, 4, 5] {
            history.push(sample);
        }

        assert_eq!(history.len(), 3);
        let mut collected = [0i16; 3];
        for (slot, sample) in collected.iter_mut().zip(history.iter()) {
            *slot = sample;
        }
        assert_eq!(collected, [5, 4, 3]);
    }

    #[test]
    fn test_replace_latest_does_not_shift() {
        let mut history = SampleHistory::<4>::new();
        history.replace_latest(7);
        assert_eq!(history.len(), 1);

        history.push(8);
        history.replace_latest(9);

        assert_eq!(history.len(), 2);
        assert_eq!(history.get(0), Some(9));
        assert_eq!(history.get(1), Some(7));
    }

    #[test]
    fn test_average_truncates() {
        let mut history = SampleHistory::<8>::new();
        history.push(10);
        history.push(20);
        history.push(31);

        assert_eq!(history.average(3), Some(20)); // 61 / 3
        assert_eq!(history.average(2), Some(25)); // (31 + 20) / 2
        assert_eq!(history.average(1), Some(31));
    }

    #[test]
    fn test_average_limits_to_held_samples() {
        let mut history = SampleHistory::<8>::new();
        assert_eq!(history.average(5), None);

        history.push(4);
        history.push(8);
        assert_eq!(history.average(5), Some(6));
        assert_eq!(history.average(0), None);
    }

    #[test]
    fn test_average_does_not_overflow() {
        let mut history = SampleHistory::<HISTORY_CAPACITY>::new();
        for _ in 0..HISTORY_CAPACITY {
            history.push(i16::MAX);
        }
        assert_eq!(history.average(HISTORY_CAPACITY), Some(i16::MAX));

        history.push(-3);
        history.push(-4);
        assert_eq!(history.average(2), Some(-3)); // -7 / 2 truncates toward zero
    }

    #[test]
    fn test_clear() {
        let mut history = SampleHistory::<2>::new();
        history.push(1);
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.capacity(), 2);
    }
}
