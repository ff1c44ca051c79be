//! Concurrency core for a simulated traffic-light intersection.
//!
//! A background updater thread flips a two-phase light on a randomized
//! interval and publishes each flip through a blocking channel built on
//! the crate's own futex-based mutex and condition variable. Any number
//! of threads can block in [`TrafficLight::wait_for_green`] until they
//! observe a transition, without busy-polling.

pub mod channel;
pub mod condvar;
pub mod light;
pub mod mutex;
pub mod phase;

pub use channel::Channel;
pub use light::{CycleTiming, TrafficLight, Updater};
pub use phase::Phase;
