use std::sync::atomic::{AtomicU8, Ordering};

/// The two phases a light cycles through. `Red` is the phase every light
/// starts in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Red,
    Green,
}

impl Phase {
    /// The opposite phase. The only legal transition in either direction.
    pub fn toggled(self) -> Self {
        match self {
            Phase::Red => Phase::Green,
            Phase::Green => Phase::Red,
        }
    }
}

/// Lock-free cell holding the latest known phase.
///
/// A load is a snapshot, never a synchronization point: the updater may
/// flip the phase right after the load returns. Waiters that need to
/// observe a transition go through the channel instead.
pub struct AtomicPhase {
    /// 0: red
    /// 1: green
    bits: AtomicU8,
}

impl AtomicPhase {
    pub const fn new(phase: Phase) -> Self {
        Self {
            bits: AtomicU8::new(phase as u8),
        }
    }

    pub fn load(&self) -> Phase {
        match self.bits.load(Ordering::Acquire) {
            0 => Phase::Red,
            _ => Phase::Green,
        }
    }

    pub fn store(&self, phase: Phase) {
        self.bits.store(phase as u8, Ordering::Release);
    }
}
