use std::collections::{vec_deque, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

/// Default number of retained samples: 5 seconds at 60 samples per second.
pub const DEFAULT_CAPACITY: usize = 60 * 5;

/// One brightness measurement taken from a single camera frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Light intensity in [0, 1].
    pub value: f64,
    /// Milliseconds since an arbitrary epoch; non-decreasing across pushes.
    pub timestamp_ms: i64,
}

impl Sample {
    pub fn new(value: f64, timestamp_ms: i64) -> Self {
        Self {
            value,
            timestamp_ms,
        }
    }
}

/// Bounded, insertion-ordered FIFO of samples (oldest first).
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    samples: VecDeque<Sample>,
    capacity: usize,
}

impl Default for SampleBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl SampleBuffer {
    /// Create an empty buffer. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest one once the buffer is over capacity.
    pub fn push(&mut self, value: f64, timestamp_ms: i64) {
        self.samples.push_back(Sample::new(value, timestamp_ms));
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Read-only, oldest-first view of the current contents.
    pub fn snapshot(&self) -> vec_deque::Iter<'_, Sample> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }
}

/// Cloneable, thread-safe handle around a [`SampleBuffer`].
///
/// Use this when frames are captured on a different thread than the one
/// running the estimator. Each operation holds the lock for its whole
/// duration, so a snapshot never observes a half-applied push or clear.
#[derive(Clone, Default)]
pub struct SharedSampleBuffer {
    inner: Arc<Mutex<SampleBuffer>>,
}

impl SharedSampleBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SampleBuffer::new(capacity))),
        }
    }

    pub fn push(&self, value: f64, timestamp_ms: i64) {
        self.lock().push(value, timestamp_ms);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Copy of the current contents, taken under the lock.
    pub fn snapshot(&self) -> Vec<Sample> {
        self.lock().snapshot().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic in another holder cannot leave the buffer half-mutated, so a
    // poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, SampleBuffer> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
