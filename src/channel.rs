use std::collections::VecDeque;

use crate::condvar::Condvar;
use crate::mutex::Mutex;

/// Unbounded blocking channel for handing values between threads.
///
/// Any number of threads may send and receive concurrently. `send` never
/// blocks; `receive` sleeps (no busy-polling) until a value is available.
/// Nothing bounds the buffer: a producer that permanently outpaces its
/// consumers grows it without limit.
///
/// Note the removal order: values are inserted and removed at the *same*
/// end of the buffer, so `receive` returns the most recently sent value
/// first. That is stack discipline, not the FIFO a "channel" might
/// suggest. With a single producer and consumers that drain until they
/// see the value they want, the difference is not observable, but
/// generic reuse should not assume FIFO.
pub struct Channel<T> {
    queue: Mutex<VecDeque<T>>,
    item_ready: Condvar,
}

impl<T> Channel<T> {
    pub const fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            item_ready: Condvar::new(),
        }
    }

    /// Appends a value and wakes at most one blocked receiver.
    pub fn send(&self, message: T) {
        self.queue.lock().push_back(message);
        self.item_ready.notify_one();
    }

    /// Removes and returns the newest pending value, blocking until one
    /// exists. A receive with no matching send blocks forever.
    pub fn receive(&self) -> T {
        let mut queue = self.queue.lock();
        loop {
            if let Some(message) = queue.pop_back() {
                return message;
            }
            queue = self.item_ready.wait(queue);
        }
    }

    /// Number of values currently pending. Momentary snapshot; another
    /// thread may change it before the caller acts on it.
    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for Channel<T> {
    fn default() -> Self {
        Self::new()
    }
}
