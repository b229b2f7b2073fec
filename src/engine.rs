//! # Frame-Driven Update Loop
//!
//! [`Engine`] ties a [`TimeSource`] to a [`ClockFace`]. The host calls
//! [`Engine::tick`] once per animation frame:
//!
//! 1. **Sample**: read the clock once
//! 2. **Render**: let the face re-render whichever units changed
//! 3. **Reschedule**: ask the backend for the next frame
//!
//! Ticks are cheap when nothing changed, so the host can call them at any rate
//! of 1 Hz or more. Everything runs on the calling thread and every method
//! takes `&mut self`; the engine is never shared, so it needs no locks.

use crate::backend::{AnimationId, RenderBackend};
use crate::change::ChangeSet;
use crate::face::ClockFace;
use crate::time_source::TimeSource;
use crate::TimeSample;
use tracing::{debug, trace};

/// Owns the time source and the face it renders.
#[derive(Debug)]
pub struct Engine<T, F> {
    source: T,
    face: F,
    ticks: u64,
    last_sample: Option<TimeSample>,
}

impl<T: TimeSource, F: ClockFace> Engine<T, F> {
    pub fn new(source: T, face: F) -> Self {
        Self {
            source,
            face,
            ticks: 0,
            last_sample: None,
        }
    }

    /// Render the current time right away and schedule the first frame.
    pub fn start<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) -> ChangeSet {
        debug!("starting clock engine");
        self.tick(backend)
    }

    /// One frame: sample, render what changed, request the next frame.
    pub fn tick<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) -> ChangeSet {
        let sample = self.source.sample();
        let changes = self.face.render(sample, backend);
        if !changes.is_empty() {
            trace!(%sample, ?changes, "frame rendered changes");
        }
        self.ticks += 1;
        self.last_sample = Some(sample);
        backend.request_frame();
        changes
    }

    /// Hand a finished backend animation to the face.
    ///
    /// Returns `false` for ids nobody is waiting on any more, which is the
    /// normal outcome for a transition that was superseded mid-flight.
    pub fn animation_finished<B: RenderBackend + ?Sized>(
        &mut self,
        animation: AnimationId,
        backend: &mut B,
    ) -> bool {
        let current = self.face.animation_finished(animation, backend);
        if !current {
            trace!(?animation, "ignoring stale animation completion");
        }
        current
    }

    /// Number of ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Sample taken by the most recent tick.
    pub fn last_sample(&self) -> Option<TimeSample> {
        self.last_sample
    }

    pub fn face(&self) -> &F {
        &self.face
    }

    pub fn source_mut(&mut self) -> &mut T {
        &mut self.source
    }
}
