//! Two-digit display groups.
//!
//! A [`DisplayGroup`] pairs a tens slot with a ones slot and owns the
//! [`UnitState`] of the unit it shows, so each group decides on its own whether
//! a new sample is worth rendering.

use crate::backend::{AnimationId, RenderBackend};
use crate::change::UnitState;
use crate::{split_digits, Unit};
use tracing::debug;

/// A single digit position that a group can drive.
pub trait DigitSlot {
    /// Show `digit`. Returns whether any backend call was made.
    fn show_digit<B: RenderBackend + ?Sized>(&mut self, digit: u8, backend: &mut B) -> bool;

    /// Put the slot into its "no value yet" look.
    fn reset<B: RenderBackend + ?Sized>(&mut self, _backend: &mut B) {}

    /// Offer a finished animation to the slot. Returns `true` if it was
    /// the slot's own, current animation.
    fn animation_finished<B: RenderBackend + ?Sized>(
        &mut self,
        _animation: AnimationId,
        _backend: &mut B,
    ) -> bool {
        false
    }
}

/// Tens and ones slot for one time unit.
#[derive(Debug)]
pub struct DisplayGroup<S> {
    unit: Unit,
    tens: S,
    ones: S,
    state: UnitState,
}

impl<S: DigitSlot> DisplayGroup<S> {
    pub fn new(unit: Unit, tens: S, ones: S) -> Self {
        Self {
            unit,
            tens,
            ones,
            state: UnitState::new(),
        }
    }

    /// Render `value` if it differs from the last rendered value.
    ///
    /// Returns whether the group re-rendered.
    pub fn update<B: RenderBackend + ?Sized>(&mut self, value: u8, backend: &mut B) -> bool {
        if !self.state.update(value) {
            return false;
        }
        debug!(unit = %self.unit, value, "rendering unit");
        self.set_time(value, backend);
        true
    }

    /// Push both digits of `value` to the slots unconditionally.
    ///
    /// # Panics
    /// If `value` is larger than the unit allows.
    pub fn set_time<B: RenderBackend + ?Sized>(&mut self, value: u8, backend: &mut B) {
        assert!(
            value <= self.unit.max_value(),
            "{} value {value} out of range",
            self.unit
        );
        let (tens, ones) = split_digits(value);
        self.tens.show_digit(tens, backend);
        self.ones.show_digit(ones, backend);
    }

    pub fn reset<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) {
        self.tens.reset(backend);
        self.ones.reset(backend);
    }

    pub fn animation_finished<B: RenderBackend + ?Sized>(
        &mut self,
        animation: AnimationId,
        backend: &mut B,
    ) -> bool {
        self.tens.animation_finished(animation, backend)
            || self.ones.animation_finished(animation, backend)
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn tens(&self) -> &S {
        &self.tens
    }

    pub fn ones(&self) -> &S {
        &self.ones
    }

    pub fn last_rendered(&self) -> Option<u8> {
        self.state.last_rendered()
    }
}
