//! Wall-clock sampling.
//!
//! The engine asks its [`TimeSource`] for a fresh [`TimeSample`] on every frame.
//! Production code reads local time through chrono; tests script the readings.

use crate::TimeSample;
use chrono::Local;
use std::collections::VecDeque;

/// Anything that can produce the current time once per frame.
///
/// Implementations must not have side effects beyond reading their clock.
/// Readings are taken as they come: a clock that jumps backwards simply
/// produces an earlier sample and the affected units re-render.
pub trait TimeSource {
    fn sample(&mut self) -> TimeSample;
}

/// Reads the system clock in local time.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalClock;

impl TimeSource for LocalClock {
    fn sample(&mut self) -> TimeSample {
        TimeSample::from_time(&Local::now())
    }
}

/// Always returns the same reading.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub TimeSample);

impl TimeSource for FixedClock {
    fn sample(&mut self) -> TimeSample {
        self.0
    }
}

/// Replays a queue of readings, then keeps returning the last one.
#[derive(Clone, Debug)]
pub struct ScriptedClock {
    pending: VecDeque<TimeSample>,
    last: TimeSample,
}

impl ScriptedClock {
    /// Create a script that starts at `first` and then walks through `rest`.
    pub fn new(first: TimeSample, rest: impl IntoIterator<Item = TimeSample>) -> Self {
        let mut pending: VecDeque<_> = rest.into_iter().collect();
        pending.push_front(first);
        Self {
            pending,
            last: first,
        }
    }

    /// Append another reading to the end of the script.
    pub fn push(&mut self, sample: TimeSample) {
        self.pending.push_back(sample);
    }
}

impl TimeSource for ScriptedClock {
    fn sample(&mut self) -> TimeSample {
        if let Some(next) = self.pending.pop_front() {
            self.last = next;
        }
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hms(h: u8, m: u8, s: u8) -> TimeSample {
        TimeSample::from_hms(h, m, s).unwrap()
    }

    #[test]
    fn scripted_clock_repeats_last_reading() {
        let mut clock = ScriptedClock::new(hms(1, 2, 3), [hms(1, 2, 4)]);
        assert_eq!(clock.sample(), hms(1, 2, 3));
        assert_eq!(clock.sample(), hms(1, 2, 4));
        assert_eq!(clock.sample(), hms(1, 2, 4));

        clock.push(hms(0, 0, 0));
        assert_eq!(clock.sample(), hms(0, 0, 0), "backward jumps are passed through");
    }

    #[test]
    fn local_clock_is_in_range() {
        let sample = LocalClock.sample();
        assert!(TimeSample::from_hms(sample.hours, sample.minutes, sample.seconds).is_some());
    }
}
