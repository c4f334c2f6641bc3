/// Frame pacing. `end_cycle(n)` marks frame n complete and blocks until
/// the next scheduled tick; it is the loop's only synchronization point.
/// The deadline advances by a fixed period with drift correction; after
/// a long stall it resynchronizes instead of racing to catch up.

use std::time::{Duration, Instant};

pub struct FrameClock {
    period: Duration,
    deadline: Instant,
}

impl FrameClock {
    pub fn new(tick_rate_ms: u64) -> FrameClock {
        let period = Duration::from_millis(tick_rate_ms.max(1));
        FrameClock {
            period,
            deadline: Instant::now() + period,
        }
    }

    /// Block until frame `n`'s tick boundary.
    pub fn end_cycle(&mut self, _n: u64) {
        let now = Instant::now();
        if now < self.deadline {
            std::thread::sleep(self.deadline - now);
        } else if now > self.deadline + self.period * 4 {
            // Stalled (debugger, suspend): resync rather than sprint.
            self.deadline = now;
        }
        self.deadline += self.period;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_cycle_paces_at_the_period() {
        let mut clock = FrameClock::new(10);
        let start = Instant::now();
        for n in 0..3 {
            clock.end_cycle(n);
        }
        // Three 10ms cycles take at least ~30ms, minus scheduler slack.
        assert!(start.elapsed() >= Duration::from_millis(25));
    }

    #[test]
    fn stall_resyncs_instead_of_sprinting() {
        let mut clock = FrameClock::new(5);
        std::thread::sleep(Duration::from_millis(60));
        let t = Instant::now();
        clock.end_cycle(0);
        clock.end_cycle(1);
        // The second cycle still waits a full period.
        assert!(t.elapsed() >= Duration::from_millis(4));
        assert!(t.elapsed() < Duration::from_millis(40));
    }
}
