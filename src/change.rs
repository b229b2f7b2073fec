//! Per-unit change detection.
//!
//! Sixty identical samples a second must not turn into sixty renders. Each unit
//! remembers the value it last rendered and only lets a different one through.

use crate::Unit;

/// Last rendered value of one time unit.
///
/// Starts unset so that the very first sample always renders.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UnitState {
    last_rendered: Option<u8>,
}

impl UnitState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` and report whether it differs from the previous one.
    ///
    /// ```
    /// use digit_clock_lib::change::UnitState;
    ///
    /// let mut state = UnitState::new();
    /// assert!(state.update(56));
    /// assert!(!state.update(56));
    /// assert!(state.update(57));
    /// ```
    pub fn update(&mut self, value: u8) -> bool {
        if self.last_rendered == Some(value) {
            return false;
        }
        self.last_rendered = Some(value);
        true
    }

    pub fn last_rendered(&self) -> Option<u8> {
        self.last_rendered
    }
}

/// Which units re-rendered during one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub seconds: bool,
    pub minutes: bool,
    pub hours: bool,
}

impl ChangeSet {
    /// Mark `unit` as changed when `changed` is true.
    pub fn record(&mut self, unit: Unit, changed: bool) {
        let slot = match unit {
            Unit::Seconds => &mut self.seconds,
            Unit::Minutes => &mut self.minutes,
            Unit::Hours => &mut self.hours,
        };
        *slot |= changed;
    }

    pub fn contains(&self, unit: Unit) -> bool {
        match unit {
            Unit::Seconds => self.seconds,
            Unit::Minutes => self.minutes,
            Unit::Hours => self.hours,
        }
    }

    /// True when nothing re-rendered.
    pub fn is_empty(&self) -> bool {
        !(self.seconds || self.minutes || self.hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_value_changes_once() {
        let mut state = UnitState::new();
        let changes = (0..60).filter(|_| state.update(56)).count();
        assert_eq!(changes, 1);
        assert_eq!(state.last_rendered(), Some(56));
    }

    #[test]
    fn zero_renders_on_first_sample() {
        // An unset state must not be confused with a stored zero
        let mut state = UnitState::new();
        assert!(state.update(0));
        assert!(!state.update(0));
    }

    #[test]
    fn test_change_set_record() {
        let mut set = ChangeSet::default();
        assert!(set.is_empty());
        set.record(Unit::Minutes, true);
        set.record(Unit::Seconds, false);
        assert!(set.contains(Unit::Minutes));
        assert!(!set.contains(Unit::Seconds));
        assert!(!set.is_empty());
    }
}
