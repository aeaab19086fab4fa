//! Tick-counted release of a creep batch.

/// Countdown that releases a fixed number of creeps at a fixed cadence.
///
/// The first creep of a batch leaves on the first poll after the batch
/// starts and the rest follow `interval` polls apart.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct SpawnSchedule {
    remaining: u32,
    interval: u32,
    countdown: u32,
}

impl SpawnSchedule {
    /// Replaces whatever is left of the current batch with a fresh one.
    pub(crate) fn start(&mut self, count: u32, interval: u32) {
        self.remaining = count;
        self.interval = interval;
        self.countdown = 0;
    }

    /// Creeps still waiting to be released.
    pub(crate) const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Advances the countdown by one tick, reporting whether a creep is due.
    pub(crate) fn poll(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }

        if self.countdown > 0 {
            self.countdown -= 1;
            return false;
        }

        self.remaining -= 1;
        if self.remaining > 0 {
            self.countdown = self.interval.saturating_sub(1);
        }
        true
    }
}
