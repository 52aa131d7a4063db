//! Reusable N-party rendezvous with leader election.
//!
//! Every party calls [`CyclicBarrier::arrive`] once per cycle. The call that
//! completes the cycle (the N-th arrival) returns `true` and is the cycle's
//! leader; the other N-1 calls return `false` once they are released. The
//! generation counter advances on every release, so a party that is still
//! waking up from cycle `k` can never be confused with an arrival for `k + 1`.

use parking_lot::{Condvar, Mutex};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BarrierError {
    #[error("Barrier needs at least 2 parties to elect a leader, got {0}")]
    TooFewParties(usize),
}

#[derive(Debug, Default)]
struct BarrierState {
    arrived: usize,
    generation: u64,
    broken: bool,
}

#[derive(Debug)]
pub struct CyclicBarrier {
    parties: usize,
    state: Mutex<BarrierState>,
    released: Condvar,
}

impl CyclicBarrier {
    pub const MIN_PARTIES: usize = 2;

    pub fn new(parties: usize) -> Result<Self, BarrierError> {
        if parties < Self::MIN_PARTIES {
            return Err(BarrierError::TooFewParties(parties));
        }

        Ok(Self {
            parties,
            state: Mutex::new(BarrierState::default()),
            released: Condvar::new(),
        })
    }

    pub fn parties(&self) -> usize {
        self.parties
    }

    /// Number of completed cycles.
    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    pub fn is_broken(&self) -> bool {
        self.state.lock().broken
    }

    /// Blocks until all parties of the current cycle have arrived.
    ///
    /// Returns `true` for exactly one caller per cycle: the one whose arrival
    /// moved the counter from `parties - 1` to `parties`. Everything a party
    /// wrote before arriving is visible to every party after the release.
    ///
    /// On a broken barrier this returns `false` immediately.
    pub fn arrive(&self) -> bool {
        let mut state = self.state.lock();
        if state.broken {
            return false;
        }

        let generation = state.generation;
        state.arrived += 1;

        if state.arrived == self.parties {
            state.arrived = 0;
            state.generation = state.generation.wrapping_add(1);
            self.released.notify_all();
            return true;
        }

        while state.generation == generation && !state.broken {
            self.released.wait(&mut state);
        }

        false
    }

    /// Releases every waiting party and makes all later arrivals return at once.
    ///
    /// Used when one of the parties can never arrive, e.g. its thread failed
    /// to start. No party of the interrupted cycle is reported as leader.
    pub fn break_barrier(&self) {
        let mut state = self.state.lock();
        state.broken = true;
        state.arrived = 0;
        self.released.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn new_rejects_fewer_than_two_parties() {
        assert_eq!(
            CyclicBarrier::new(0).unwrap_err(),
            BarrierError::TooFewParties(0)
        );
        assert_eq!(
            CyclicBarrier::new(1).unwrap_err(),
            BarrierError::TooFewParties(1)
        );
        assert!(CyclicBarrier::new(2).is_ok());
    }

    #[test]
    fn exactly_one_leader_per_cycle() {
        const CYCLES: usize = 5;

        for parties in 2..=8 {
            let barrier = CyclicBarrier::new(parties).unwrap();
            let leaders: Vec<AtomicUsize> = (0..CYCLES).map(|_| AtomicUsize::new(0)).collect();

            std::thread::scope(|scope| {
                for _ in 0..parties {
                    scope.spawn(|| {
                        for leader_count in &leaders {
                            if barrier.arrive() {
                                leader_count.fetch_add(1, Ordering::SeqCst);
                            }
                        }
                    });
                }
            });

            for (cycle, leader_count) in leaders.iter().enumerate() {
                assert_eq!(
                    leader_count.load(Ordering::SeqCst),
                    1,
                    "parties {parties}, cycle {cycle}"
                );
            }
            assert_eq!(barrier.generation(), CYCLES as u64);
        }
    }

    #[test]
    fn followers_wait_for_last_arrival() {
        let barrier = CyclicBarrier::new(3).unwrap();
        let passed = AtomicUsize::new(0);

        std::thread::scope(|scope| {
            for _ in 0..2 {
                scope.spawn(|| {
                    assert!(!barrier.arrive());
                    passed.fetch_add(1, Ordering::SeqCst);
                });
            }

            std::thread::sleep(Duration::from_millis(50));
            assert_eq!(passed.load(Ordering::SeqCst), 0, "followers should block");

            assert!(barrier.arrive(), "last arrival should lead");
        });

        assert_eq!(passed.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn writes_before_arrival_are_visible_after_release() {
        let barrier = CyclicBarrier::new(4).unwrap();
        let slots: Vec<AtomicUsize> = (0..4).map(|_| AtomicUsize::new(0)).collect();

        std::thread::scope(|scope| {
            for index in 0..4 {
                let barrier = &barrier;
                let slots = &slots;
                scope.spawn(move || {
                    slots[index].store(index + 1, Ordering::Relaxed);
                    barrier.arrive();
                    let sum: usize = slots.iter().map(|s| s.load(Ordering::Relaxed)).sum();
                    assert_eq!(sum, 10);
                });
            }
        });
    }

    #[test]
    fn break_releases_waiters() {
        let barrier = CyclicBarrier::new(3).unwrap();

        std::thread::scope(|scope| {
            let waiter = scope.spawn(|| barrier.arrive());

            std::thread::sleep(Duration::from_millis(20));
            barrier.break_barrier();

            assert!(!waiter.join().unwrap());
        });

        assert!(barrier.is_broken());
        assert!(!barrier.arrive());
        assert_eq!(barrier.generation(), 0);
    }
}
