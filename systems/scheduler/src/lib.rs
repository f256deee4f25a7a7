#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Named countdown scheduler that drives game phases and ticks.
//!
//! [`TimeControl`] is an explicitly owned registry of named countdowns,
//! created once per running game instance and torn down with it. Each
//! entry fires at most once; periodic ticking is achieved by a callback
//! that re-registers its own name before returning, which creates a fresh
//! unfired entry. Time is read through the [`Clock`] seam so tests can
//! advance it manually.

use std::time::{Duration, Instant};

/// Source of elapsed time for the scheduler.
pub trait Clock {
    /// Time elapsed since the clock's epoch.
    fn now(&self) -> Duration;
}

/// Wall clock anchored to a monotonic instant captured at construction.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    /// Creates a wall clock whose epoch is the moment of construction.
    #[must_use]
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }
}

/// Callback invoked when a countdown fires.
///
/// The callback receives the registry itself so it may register further
/// countdowns, including a replacement for its own name.
pub type Callback<C> = Box<dyn FnMut(&mut TimeControl<C>) + Send>;

struct Countdown<C: Clock> {
    name: String,
    start: Duration,
    duration: Duration,
    fired: bool,
    callback: Callback<C>,
}

/// Registry of named countdowns over an injected clock.
pub struct TimeControl<C: Clock> {
    clock: C,
    countdowns: Vec<Countdown<C>>,
}

impl<C: Clock> TimeControl<C> {
    /// Creates an empty registry reading time from the provided clock.
    #[must_use]
    pub const fn new(clock: C) -> Self {
        Self {
            clock,
            countdowns: Vec::new(),
        }
    }

    /// Registers a countdown under the given name, replacing any existing
    /// entry. The fresh entry starts now and has not fired.
    pub fn register(&mut self, name: &str, duration: Duration, callback: Callback<C>) {
        let entry = Countdown {
            name: name.to_owned(),
            start: self.clock.now(),
            duration,
            fired: false,
            callback,
        };
        if let Some(index) = self.index_of(name) {
            self.countdowns[index] = entry;
        } else {
            self.countdowns.push(entry);
        }
    }

    /// Seconds until the named countdown is due; negative once overdue.
    /// `None` when no countdown holds the name.
    #[must_use]
    pub fn remaining(&self, name: &str) -> Option<f64> {
        self.index_of(name).map(|index| {
            let entry = &self.countdowns[index];
            let elapsed = self.clock.now().saturating_sub(entry.start);
            entry.duration.as_secs_f64() - elapsed.as_secs_f64()
        })
    }

    /// Fires the named countdown regardless of elapsed time: marks it as
    /// fired and invokes its callback. Returns whether an entry existed.
    ///
    /// The entry is detached while its callback runs so the callback may
    /// re-register the same name; when it does, the replacement wins and
    /// the spent entry is discarded.
    pub fn fire(&mut self, name: &str) -> bool {
        let Some(index) = self.index_of(name) else {
            return false;
        };
        let mut entry = self.countdowns.remove(index);
        entry.fired = true;
        (entry.callback)(self);
        if self.index_of(&entry.name).is_none() {
            let slot = index.min(self.countdowns.len());
            self.countdowns.insert(slot, entry);
        }
        true
    }

    /// Fires every countdown that is due and has not fired yet.
    pub fn check_due(&mut self) {
        let due: Vec<String> = self
            .countdowns
            .iter()
            .filter(|entry| !entry.fired)
            .filter(|entry| {
                let elapsed = self.clock.now().saturating_sub(entry.start);
                elapsed >= entry.duration
            })
            .map(|entry| entry.name.clone())
            .collect();
        for name in due {
            let _ = self.fire(&name);
        }
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.countdowns.iter().position(|entry| entry.name == name)
    }
}
