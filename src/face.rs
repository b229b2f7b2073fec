//! # Clock Faces
//!
//! A face is a set of [`DisplayGroup`]s hung under one page node:
//!
//! - [`FlipClock`]: hours, minutes and seconds as flip columns, laid out
//!   right to left around the page centre
//! - [`NeedleWatch`]: minutes and seconds as needle digits
//!
//! Every group is gated by its own unit state, so a seconds change re-renders
//! the seconds group and nothing else. Within a frame the units are visited
//! seconds first, then minutes, then hours.

use crate::backend::{AnimationId, NodeAttrs, NodeId, NodeKind, RenderBackend};
use crate::change::ChangeSet;
use crate::config::{Config, FlipConfig};
use crate::flip::FlipColumn;
use crate::group::DisplayGroup;
use crate::needle::NeedleDigit;
use crate::{TimeSample, Unit};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Something the engine can render a [`TimeSample`] onto.
pub trait ClockFace {
    /// Render whatever changed since the previous sample.
    fn render<B: RenderBackend + ?Sized>(
        &mut self,
        sample: TimeSample,
        backend: &mut B,
    ) -> ChangeSet;

    /// Route a finished animation to whichever digit is waiting for it.
    fn animation_finished<B: RenderBackend + ?Sized>(
        &mut self,
        animation: AnimationId,
        backend: &mut B,
    ) -> bool;

    /// Root node of the face.
    fn page(&self) -> NodeId;
}

/// Flip-column face showing `HH MM SS`.
#[derive(Debug)]
pub struct FlipClock {
    page: NodeId,
    seconds: DisplayGroup<FlipColumn>,
    minutes: DisplayGroup<FlipColumn>,
    hours: DisplayGroup<FlipColumn>,
}

impl FlipClock {
    pub fn new<B: RenderBackend + ?Sized>(config: &Config, backend: &mut B) -> Self {
        let page = backend.create_node(NodeKind::Page, NodeAttrs::default());
        let spacing = config.flip.group_spacing_px as f32;
        let seconds = flip_group(backend, page, Unit::Seconds, spacing, &config.flip);
        let minutes = flip_group(backend, page, Unit::Minutes, 0.0, &config.flip);
        let hours = flip_group(backend, page, Unit::Hours, -spacing, &config.flip);
        Self {
            page,
            seconds,
            minutes,
            hours,
        }
    }

    pub fn group(&self, unit: Unit) -> &DisplayGroup<FlipColumn> {
        match unit {
            Unit::Seconds => &self.seconds,
            Unit::Minutes => &self.minutes,
            Unit::Hours => &self.hours,
        }
    }
}

/// Build the two columns of one unit centred `at_x` pixels from the page
/// centre.
fn flip_group<B: RenderBackend + ?Sized>(
    backend: &mut B,
    page: NodeId,
    unit: Unit,
    at_x: f32,
    layout: &FlipConfig,
) -> DisplayGroup<FlipColumn> {
    let offset = layout.row_height_px as f32 / 2.0 + layout.column_gap_px as f32;
    let tens = FlipColumn::new(backend, page, unit.max_tens_digit(), at_x - offset, layout);
    let ones = FlipColumn::new(backend, page, 9, at_x + offset, layout);
    DisplayGroup::new(unit, tens, ones)
}

impl ClockFace for FlipClock {
    fn render<B: RenderBackend + ?Sized>(
        &mut self,
        sample: TimeSample,
        backend: &mut B,
    ) -> ChangeSet {
        let mut changes = ChangeSet::default();
        changes.record(Unit::Seconds, self.seconds.update(sample.seconds, backend));
        changes.record(Unit::Minutes, self.minutes.update(sample.minutes, backend));
        changes.record(Unit::Hours, self.hours.update(sample.hours, backend));
        changes
    }

    fn animation_finished<B: RenderBackend + ?Sized>(
        &mut self,
        animation: AnimationId,
        backend: &mut B,
    ) -> bool {
        self.seconds.animation_finished(animation, backend)
            || self.minutes.animation_finished(animation, backend)
            || self.hours.animation_finished(animation, backend)
    }

    fn page(&self) -> NodeId {
        self.page
    }
}

/// Needle-digit face showing `MM SS`.
#[derive(Debug)]
pub struct NeedleWatch {
    page: NodeId,
    minutes: DisplayGroup<NeedleDigit>,
    seconds: DisplayGroup<NeedleDigit>,
}

impl NeedleWatch {
    /// Build the face with every dial parked.
    pub fn new<B: RenderBackend + ?Sized>(config: &Config, backend: &mut B) -> Self {
        let page = backend.create_node(NodeKind::Page, NodeAttrs::default());
        let mut build = |unit| {
            let tens = NeedleDigit::new(backend, page, &config.needle);
            let ones = NeedleDigit::new(backend, page, &config.needle);
            let mut group = DisplayGroup::new(unit, tens, ones);
            group.reset(backend);
            group
        };
        let minutes = build(Unit::Minutes);
        let seconds = build(Unit::Seconds);
        Self {
            page,
            minutes,
            seconds,
        }
    }

    /// The group for `unit`, `None` for hours which this face does not show.
    pub fn group(&self, unit: Unit) -> Option<&DisplayGroup<NeedleDigit>> {
        match unit {
            Unit::Seconds => Some(&self.seconds),
            Unit::Minutes => Some(&self.minutes),
            Unit::Hours => None,
        }
    }
}

impl ClockFace for NeedleWatch {
    fn render<B: RenderBackend + ?Sized>(
        &mut self,
        sample: TimeSample,
        backend: &mut B,
    ) -> ChangeSet {
        let mut changes = ChangeSet::default();
        changes.record(Unit::Seconds, self.seconds.update(sample.seconds, backend));
        changes.record(Unit::Minutes, self.minutes.update(sample.minutes, backend));
        changes
    }

    fn animation_finished<B: RenderBackend + ?Sized>(&mut self, _: AnimationId, _: &mut B) -> bool {
        // Needle rotations are plain style transitions with nothing chained
        false
    }

    fn page(&self) -> NodeId {
        self.page
    }
}

/// Which face to build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaceStyle {
    #[default]
    Flip,
    Needle,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown face style {0:?}, expected \"flip\" or \"needle\"")]
pub struct UnknownStyle(pub String);

impl FromStr for FaceStyle {
    type Err = UnknownStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "flip" => Ok(FaceStyle::Flip),
            "needle" | "analog" => Ok(FaceStyle::Needle),
            _ => Err(UnknownStyle(s.to_string())),
        }
    }
}

/// Either face, chosen at runtime.
#[derive(Debug)]
pub enum Face {
    Flip(FlipClock),
    Needle(NeedleWatch),
}

impl Face {
    pub fn build<B: RenderBackend + ?Sized>(
        style: FaceStyle,
        config: &Config,
        backend: &mut B,
    ) -> Self {
        match style {
            FaceStyle::Flip => Face::Flip(FlipClock::new(config, backend)),
            FaceStyle::Needle => Face::Needle(NeedleWatch::new(config, backend)),
        }
    }

    pub fn style(&self) -> FaceStyle {
        match self {
            Face::Flip(_) => FaceStyle::Flip,
            Face::Needle(_) => FaceStyle::Needle,
        }
    }
}

impl ClockFace for Face {
    fn render<B: RenderBackend + ?Sized>(
        &mut self,
        sample: TimeSample,
        backend: &mut B,
    ) -> ChangeSet {
        match self {
            Face::Flip(face) => face.render(sample, backend),
            Face::Needle(face) => face.render(sample, backend),
        }
    }

    fn animation_finished<B: RenderBackend + ?Sized>(
        &mut self,
        animation: AnimationId,
        backend: &mut B,
    ) -> bool {
        match self {
            Face::Flip(face) => face.animation_finished(animation, backend),
            Face::Needle(face) => face.animation_finished(animation, backend),
        }
    }

    fn page(&self) -> NodeId {
        match self {
            Face::Flip(face) => face.page(),
            Face::Needle(face) => face.page(),
        }
    }
}
