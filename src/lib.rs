//! # Digit Clock Core Library
//!
//! This library provides the frame-driven rendering engine behind the digit
//! clock faces. It samples wall-clock time once per animation frame, works out
//! which time units changed, and turns those changes into the smallest set of
//! visual mutations a rendering backend has to perform.
//!
//! ## Design Philosophy
//!
//! ### Frame Loop, Not Timers
//! The engine never sleeps or schedules a one-second timer. The host calls
//! [`engine::Engine::tick`] once per animation frame (typically 60 Hz) and
//! every tick samples the clock again:
//! - **Cheap ticks**: a tick with no changed unit issues zero backend calls
//! - **Per-unit gating**: seconds, minutes and hours each own a
//!   [`change::UnitState`], so a seconds change never touches the hours digits
//! - **Smooth animation**: transitions start on the exact frame the value
//!   changes instead of up to a second late
//!
//! ### Two Digit Styles
//! - **Flip columns** ([`flip`]): a strip of digits slides behind a window while
//!   a focus marker fades out, jumps and fades back in on the new row
//! - **Needle digits** ([`needle`]): each digit is drawn by six small analog
//!   dials whose needle angles come from a fixed lookup table
//!
//! ### Backend Boundary
//! All visual work goes through the [`backend::RenderBackend`] trait. The
//! engine only issues commands; it never reads back from the backend. The
//! bundled [`scene::SceneBackend`] keeps a retained node tree in memory and is
//! what the terminal and raster renderers in [`renderer`] draw from.
//!
//! ## Core Types
//! - [`TimeSample`]: one hours/minutes/seconds snapshot
//! - [`Unit`]: which of the three fields a value belongs to

use chrono::Timelike;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Module declarations
pub mod backend;
pub mod change;
pub mod config;
pub mod engine;
pub mod face;
pub mod flip;
pub mod group;
pub mod needle;
pub mod renderer;
pub mod scene;
pub mod time_source;

/// A single wall-clock reading at one-second resolution.
///
/// Taken once per frame and never modified afterwards. Fields are plain `u8`
/// because every value fits comfortably and the digit math stays in integers.
///
/// # Example
/// ```
/// use digit_clock_lib::TimeSample;
///
/// let sample = TimeSample::from_hms(12, 34, 56).unwrap();
/// assert_eq!(sample.minutes, 34);
///
/// // Out-of-range fields are rejected rather than wrapped
/// assert!(TimeSample::from_hms(24, 0, 0).is_none());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTimeSample")]
pub struct TimeSample {
    /// Hours, 0 to 23
    pub hours: u8,
    /// Minutes, 0 to 59
    pub minutes: u8,
    /// Seconds, 0 to 59
    pub seconds: u8,
}

/// A time field outside its unit's range.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("time {hours}:{minutes}:{seconds} is out of range")]
pub struct OutOfRangeTime {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

/// Unchecked wire form; deserialized samples go through [`TimeSample::from_hms`].
#[derive(Deserialize)]
struct RawTimeSample {
    hours: u8,
    minutes: u8,
    seconds: u8,
}

impl TryFrom<RawTimeSample> for TimeSample {
    type Error = OutOfRangeTime;

    fn try_from(raw: RawTimeSample) -> Result<Self, Self::Error> {
        TimeSample::from_hms(raw.hours, raw.minutes, raw.seconds).ok_or(OutOfRangeTime {
            hours: raw.hours,
            minutes: raw.minutes,
            seconds: raw.seconds,
        })
    }
}

impl TimeSample {
    /// Build a sample from explicit fields, returning `None` if any field is
    /// outside its range.
    pub fn from_hms(hours: u8, minutes: u8, seconds: u8) -> Option<Self> {
        let sample = Self {
            hours,
            minutes,
            seconds,
        };
        Unit::ALL
            .iter()
            .all(|unit| unit.value_of(&sample) <= unit.max_value())
            .then_some(sample)
    }

    /// Extract hours, minutes and seconds from any chrono time value.
    ///
    /// Leap seconds are folded into second 59 by chrono itself, so the
    /// result is always in range.
    pub fn from_time<T: Timelike>(time: &T) -> Self {
        Self {
            hours: time.hour() as u8,
            minutes: time.minute() as u8,
            seconds: time.second() as u8,
        }
    }

    /// Read the field for one unit.
    pub fn get(&self, unit: Unit) -> u8 {
        unit.value_of(self)
    }
}

impl std::fmt::Display for TimeSample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds
        )
    }
}

/// One of the three independently tracked time fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Seconds,
    Minutes,
    Hours,
}

impl Unit {
    /// Units in the order a tick checks them.
    pub const ALL: [Unit; 3] = [Unit::Seconds, Unit::Minutes, Unit::Hours];

    /// Largest value the field can hold.
    pub fn max_value(self) -> u8 {
        match self {
            Unit::Seconds | Unit::Minutes => 59,
            Unit::Hours => 23,
        }
    }

    /// Largest digit the tens slot of this unit can show (5 or 2).
    pub fn max_tens_digit(self) -> u8 {
        self.max_value() / 10
    }

    fn value_of(self, sample: &TimeSample) -> u8 {
        match self {
            Unit::Seconds => sample.seconds,
            Unit::Minutes => sample.minutes,
            Unit::Hours => sample.hours,
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Unit::Seconds => "seconds",
            Unit::Minutes => "minutes",
            Unit::Hours => "hours",
        };
        f.write_str(name)
    }
}

/// Split a two-digit field into `(tens, ones)`.
///
/// ```
/// use digit_clock_lib::split_digits;
///
/// assert_eq!(split_digits(56), (5, 6));
/// assert_eq!(split_digits(7), (0, 7));
/// ```
pub fn split_digits(value: u8) -> (u8, u8) {
    (value / 10, value % 10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_decomposition_reconstructs_every_value() {
        for unit in Unit::ALL {
            for v in 0..=unit.max_value() {
                let (tens, ones) = split_digits(v);
                assert_eq!(tens * 10 + ones, v);
                assert!(tens <= unit.max_tens_digit(), "{unit} tens {tens} for {v}");
                assert!(ones <= 9);
            }
        }
    }

    #[test]
    fn test_from_hms_bounds() {
        assert!(TimeSample::from_hms(23, 59, 59).is_some());
        assert!(TimeSample::from_hms(0, 60, 0).is_none());
        assert!(TimeSample::from_hms(0, 0, 60).is_none());
    }

    #[test]
    fn deserialize_checks_ranges() {
        let sample: TimeSample = toml::from_str("hours = 23\nminutes = 5\nseconds = 9").unwrap();
        assert_eq!(sample, TimeSample::from_hms(23, 5, 9).unwrap());

        let err = toml::from_str::<TimeSample>("hours = 24\nminutes = 0\nseconds = 0").unwrap_err();
        assert!(err.to_string().contains("out of range"), "{err}");
    }

    #[test]
    fn test_from_chrono_time() {
        let time = chrono::NaiveTime::from_hms_opt(12, 34, 56).unwrap();
        let sample = TimeSample::from_time(&time);
        assert_eq!(sample, TimeSample::from_hms(12, 34, 56).unwrap());
        assert_eq!(sample.to_string(), "12:34:56");
        assert_eq!(sample.get(Unit::Hours), 12);
    }
}
