use atomic_wait::{wait, wake_all, wake_one};
use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering::Relaxed;

use crate::mutex::Guard;

pub struct Condvar {
    counter: AtomicU32,
}

impl Condvar {
    pub const fn new() -> Self {
        Self {
            counter: AtomicU32::new(0),
        }
    }

    pub fn notify_one(&self) {
        self.counter.fetch_add(1, Relaxed);
        wake_one(&self.counter);
    }
    pub fn notify_all(&self) {
        self.counter.fetch_add(1, Relaxed);
        wake_all(&self.counter);
    }

    /// Atomically releases the guard and sleeps until notified, then
    /// reacquires the lock. Spurious wakeups are possible; callers must
    /// re-check their predicate in a loop.
    pub fn wait<'a, T>(&self, guard: Guard<'a, T>) -> Guard<'a, T> {
        let value = self.counter.load(Relaxed);

        let mutex = guard.mutex;
        drop(guard);

        // No wakeup is lost between the unlock and the sleep: a notify in
        // that window bumps the counter, so the futex compare fails and
        // wait returns immediately.
        wait(&self.counter, value);

        mutex.lock()
    }
}
