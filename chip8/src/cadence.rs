use std::time::{Duration, Instant};

/// Most ticks a cadence hands out at once; a longer stall drops the backlog instead
const MAX_BURST: u32 = 32;

/// The fastest supported rate
pub const MAX_HZ: u32 = 1_000_000;

/// # Cadence
/// A fixed-rate clock for the control loop. Each call to `due` reports how many ticks have come
/// due since the last call, so the loop can run that many steps (or timer ticks) and then sleep.
#[derive(Debug, Clone, Copy)]
pub struct Cadence {
    interval: Duration,
    next: Instant,
}

impl Cadence {
    /// A cadence ticking `hz` times per second, with its first tick due one interval after `now`
    ///
    /// `hz` is clamped to `1..=MAX_HZ`.
    pub fn from_hz(hz: u32, now: Instant) -> Self {
        let interval = Duration::from_secs(1) / hz.clamp(1, MAX_HZ);
        Cadence {
            interval,
            next: now + interval,
        }
    }

    /// The number of ticks due at `now`
    pub fn due(&mut self, now: Instant) -> u32 {
        if now < self.next {
            return 0;
        }
        let behind = (now - self.next).as_nanos() / self.interval.as_nanos();
        let ticks = u32::try_from(behind + 1).unwrap_or(u32::MAX);
        if ticks > MAX_BURST {
            self.resync(now);
            return MAX_BURST;
        }
        self.next += self.interval * ticks;
        ticks
    }

    /// Forgets any backlog, e.g. after the loop stopped stepping for a while
    pub fn resync(&mut self, now: Instant) {
        self.next = now + self.interval;
    }

    #[cfg(test)]
    pub fn interval(&self) -> Duration {
        self.interval
    }
}
