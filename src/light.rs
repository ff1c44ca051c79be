use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::channel::Channel;
use crate::phase::{AtomicPhase, Phase};

/// Timing of the update loop.
///
/// Each cycle duration is drawn uniformly from `[min, max]`, both
/// endpoints included. `quantum` is how long the loop sleeps between
/// checks of the elapsed time, so an actual cycle can overshoot the drawn
/// duration by up to one quantum plus scheduling slack.
#[derive(Clone, Copy, Debug)]
pub struct CycleTiming {
    pub min: Duration,
    pub max: Duration,
    pub quantum: Duration,
}

impl Default for CycleTiming {
    fn default() -> Self {
        Self {
            min: Duration::from_millis(4000),
            max: Duration::from_millis(6000),
            quantum: Duration::from_millis(1),
        }
    }
}

struct Shared {
    phase: AtomicPhase,
    events: Channel<Phase>,
    timing: CycleTiming,
}

/// A single intersection light alternating between `Red` and `Green`.
///
/// The handle is cheap to clone; all clones observe the same light.
/// `simulate` starts the background updater, after which any number of
/// threads may block in [`wait_for_green`](Self::wait_for_green) or poll
/// [`current_phase`](Self::current_phase).
#[derive(Clone)]
pub struct TrafficLight {
    shared: Arc<Shared>,
}

impl TrafficLight {
    pub fn new() -> Self {
        Self::with_timing(CycleTiming::default())
    }

    pub fn with_timing(timing: CycleTiming) -> Self {
        Self {
            shared: Arc::new(Shared {
                phase: AtomicPhase::new(Phase::Red),
                events: Channel::new(),
                timing,
            }),
        }
    }

    /// Spawns the background updater thread and returns its handle.
    ///
    /// Call at most once per light. A second call starts a second loop
    /// toggling the same phase cell and feeding the same channel, which
    /// breaks the alternation the waiters rely on.
    pub fn simulate(&self) -> Updater {
        let shared = Arc::clone(&self.shared);
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let handle = thread::spawn(move || shared.cycle_through_phases(&flag));
        Updater { stop, handle }
    }

    /// Latest known phase. A snapshot, not a synchronization point; the
    /// updater may flip the phase at any moment. To act on a transition,
    /// use [`wait_for_green`](Self::wait_for_green).
    pub fn current_phase(&self) -> Phase {
        self.shared.phase.load()
    }

    /// Blocks until this caller observes a green transition.
    ///
    /// Drains phase events one at a time, discarding reds. Each event
    /// wakes exactly one waiter, so with several threads blocked here a
    /// red event may be consumed by a waiter it does nothing for; every
    /// waiter still returns once it personally receives a green.
    pub fn wait_for_green(&self) {
        loop {
            if self.shared.events.receive() == Phase::Green {
                return;
            }
        }
    }
}

impl Default for TrafficLight {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to a running updater thread, returned by
/// [`simulate`](TrafficLight::simulate).
///
/// Dropping the handle detaches the thread and lets it run for the rest
/// of the process. Call [`stop`](Self::stop) to shut it down and join it
/// deterministically.
pub struct Updater {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl Updater {
    /// Asks the update loop to exit at its next quantum and joins the
    /// thread. Propagates a panic from the updater, the only way this
    /// core can surface a failure.
    pub fn stop(self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Err(panic) = self.handle.join() {
            std::panic::resume_unwind(panic);
        }
    }
}

impl Shared {
    fn cycle_through_phases(&self, stop: &AtomicBool) {
        let mut rng = SmallRng::from_os_rng();
        let mut cycle = self.draw_cycle(&mut rng);
        let mut epoch = Instant::now();

        log::debug!("updater started, first cycle {cycle:?}");

        while !stop.load(Ordering::Relaxed) {
            thread::sleep(self.timing.quantum);

            if epoch.elapsed() >= cycle {
                let next = self.phase.load().toggled();
                self.phase.store(next);
                self.events.send(next);
                log::debug!("phase change: {next:?} after {:?}", epoch.elapsed());

                epoch = Instant::now();
                cycle = self.draw_cycle(&mut rng);
            }
        }

        log::trace!("updater stopped");
    }

    fn draw_cycle(&self, rng: &mut SmallRng) -> Duration {
        let min = self.timing.min.as_millis() as u64;
        let max = self.timing.max.as_millis() as u64;
        Duration::from_millis(rng.random_range(min..=max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn fast() -> CycleTiming {
        CycleTiming {
            min: ms(80),
            max: ms(150),
            quantum: ms(1),
        }
    }

    #[test]
    fn starts_red() {
        assert_eq!(TrafficLight::new().current_phase(), Phase::Red);
    }

    #[test]
    fn phases_strictly_alternate() {
        let light = TrafficLight::with_timing(fast());
        let updater = light.simulate();

        // single consumer keeping up with the updater, so each receive
        // observes the flips in the order they happened
        let mut seen = Vec::new();
        for _ in 0..5 {
            seen.push(light.shared.events.receive());
        }
        updater.stop();

        use Phase::{Green, Red};
        assert_eq!(seen, [Green, Red, Green, Red, Green]);
    }

    #[test]
    fn cycle_interval_stays_in_range() {
        let timing = CycleTiming {
            min: ms(200),
            max: ms(350),
            quantum: ms(1),
        };
        let light = TrafficLight::with_timing(timing);
        let updater = light.simulate();

        light.shared.events.receive();
        let mut prev = Instant::now();

        let mut intervals = Vec::new();
        for _ in 0..3 {
            light.shared.events.receive();
            let now = Instant::now();
            intervals.push(now - prev);
            prev = now;
        }
        updater.stop();

        // generous slack for receive-side latency and loaded CI machines
        for dt in intervals {
            assert!(dt >= ms(150), "interval {dt:?} below cycle range");
            assert!(dt <= ms(500), "interval {dt:?} above cycle range");
        }
    }

    #[test]
    fn waiters_all_observe_green() {
        // cycle long enough that the phase cannot flip back between a
        // waiter returning and its snapshot assertion
        let light = TrafficLight::with_timing(CycleTiming {
            min: ms(300),
            max: ms(500),
            quantum: ms(1),
        });
        let updater = light.simulate();

        thread::scope(|s| {
            for _ in 0..3 {
                s.spawn(|| {
                    light.wait_for_green();
                    assert_eq!(light.current_phase(), Phase::Green);
                });
            }
        });
        updater.stop();
    }

    #[test]
    fn stop_joins_the_updater() {
        let light = TrafficLight::with_timing(fast());
        let updater = light.simulate();

        thread::sleep(ms(150));
        updater.stop();

        // the loop is gone; whatever events it left behind stay put
        let pending = light.shared.events.len();
        thread::sleep(ms(150));
        assert_eq!(light.shared.events.len(), pending);
    }
}
