//! # End-to-End Clock Scenarios
//!
//! These tests drive the engine the way the binary does: a time source, a face
//! and a backend, ticked frame by frame. A recording backend wraps the scene so
//! tests can check not only the final state but the order of backend calls.

use digit_clock_lib::backend::{
    AnimationId, Keyframes, NodeAttrs, NodeId, NodeKind, RenderBackend, Style,
};
use digit_clock_lib::config::Config;
use digit_clock_lib::engine::Engine;
use digit_clock_lib::face::{FlipClock, NeedleWatch};
use digit_clock_lib::flip::MarkerPhase;
use digit_clock_lib::needle::encode;
use digit_clock_lib::scene::SceneBackend;
use digit_clock_lib::time_source::{FixedClock, ScriptedClock};
use digit_clock_lib::{TimeSample, Unit};
use std::time::Duration;

fn hms(h: u8, m: u8, s: u8) -> TimeSample {
    TimeSample::from_hms(h, m, s).unwrap()
}

/// One entry in the recorded call log.
#[derive(Clone, Debug, PartialEq)]
enum Call {
    Style(NodeId, Style),
    Animate(NodeId, Keyframes, AnimationId),
    /// Not a backend call: marks where the host delivered a completion
    Finished(AnimationId),
    Other,
}

/// Scene backend that also keeps a log of every call.
#[derive(Default)]
struct Recorder {
    scene: SceneBackend,
    calls: Vec<Call>,
}

impl RenderBackend for Recorder {
    fn create_node(&mut self, kind: NodeKind, attrs: NodeAttrs) -> NodeId {
        self.calls.push(Call::Other);
        self.scene.create_node(kind, attrs)
    }

    fn set_style(&mut self, node: NodeId, style: Style) {
        self.calls.push(Call::Style(node, style));
        self.scene.set_style(node, style);
    }

    fn add_class(&mut self, node: NodeId, class: &'static str) {
        self.calls.push(Call::Other);
        self.scene.add_class(node, class);
    }

    fn remove_class(&mut self, node: NodeId, class: &'static str) {
        self.calls.push(Call::Other);
        self.scene.remove_class(node, class);
    }

    fn animate(&mut self, node: NodeId, keyframes: Keyframes, duration: Duration) -> AnimationId {
        let id = self.scene.animate(node, keyframes, duration);
        self.calls.push(Call::Animate(node, keyframes, id));
        id
    }

    fn request_frame(&mut self) {
        self.scene.request_frame();
    }
}

/// Scenario: the clock reads 12:34:56 and every group shows its digits.
#[test]
fn first_tick_shows_full_time() {
    let mut scene = SceneBackend::new();
    let face = FlipClock::new(&Config::default(), &mut scene);
    let mut engine = Engine::new(FixedClock(hms(12, 34, 56)), face);

    let changes = engine.start(&mut scene);
    assert!(changes.seconds && changes.minutes && changes.hours);

    let shown = |unit| {
        let group = engine.face().group(unit);
        (
            group.tens().current_digit().unwrap(),
            group.ones().current_digit().unwrap(),
        )
    };
    assert_eq!(shown(Unit::Seconds), (5, 6));
    assert_eq!(shown(Unit::Minutes), (3, 4));
    assert_eq!(shown(Unit::Hours), (1, 2));
}

/// Scenario: two frames inside the same second render the seconds group once.
#[test]
fn repeated_second_renders_once() {
    let mut scene = SceneBackend::new();
    let face = FlipClock::new(&Config::default(), &mut scene);
    let clock = ScriptedClock::new(hms(12, 34, 56), [hms(12, 34, 56)]);
    let mut engine = Engine::new(clock, face);

    let renders = (0..2)
        .filter(|_| engine.tick(&mut scene).seconds)
        .count();
    assert_eq!(renders, 1);
}

/// A minute rollover re-renders seconds and minutes, never hours.
#[test]
fn rollover_touches_only_changed_units() {
    let mut scene = SceneBackend::new();
    let face = FlipClock::new(&Config::default(), &mut scene);
    let clock = ScriptedClock::new(hms(9, 59, 59), [hms(9, 59, 59), hms(10, 0, 0), hms(10, 0, 0)]);
    let mut engine = Engine::new(clock, face);

    engine.tick(&mut scene);
    assert!(engine.tick(&mut scene).is_empty());
    let rollover = engine.tick(&mut scene);
    assert!(rollover.seconds && rollover.minutes && rollover.hours);
    assert!(engine.tick(&mut scene).is_empty());
    assert_eq!(engine.face().group(Unit::Hours).last_rendered(), Some(10));
}

/// The marker must not move until the backend reports the fade-out finished.
#[test]
fn marker_reposition_follows_fade_out_completion() {
    let mut backend = Recorder::default();
    let face = FlipClock::new(&Config::default(), &mut backend);
    let clock = ScriptedClock::new(hms(0, 0, 1), [hms(0, 0, 2)]);
    let mut engine = Engine::new(clock, face);

    engine.tick(&mut backend);
    let marker = engine.face().group(Unit::Seconds).ones().marker_node();
    backend.calls.clear();
    engine.tick(&mut backend);

    let fade_out = backend
        .calls
        .iter()
        .find_map(|call| match call {
            Call::Animate(node, keys, id) if *node == marker && *keys == Keyframes::FADE_OUT => {
                Some(*id)
            }
            _ => None,
        })
        .expect("fade-out should start on the digit change");
    let moved = |calls: &[Call]| {
        calls
            .iter()
            .any(|call| matches!(call, Call::Style(node, Style::Top(_)) if *node == marker))
    };
    assert!(!moved(&backend.calls), "marker moved before fade-out finished");

    let finished = backend.scene.advance(Duration::from_millis(500));
    assert_eq!(finished, vec![fade_out]);
    backend.calls.push(Call::Finished(fade_out));
    assert!(engine.animation_finished(fade_out, &mut backend));

    let completion = backend
        .calls
        .iter()
        .position(|call| *call == Call::Finished(fade_out))
        .unwrap();
    assert!(moved(&backend.calls[completion..]));
    assert!(backend.calls[completion..]
        .iter()
        .any(|call| matches!(
            call,
            Call::Animate(node, keys, _) if *node == marker && *keys == Keyframes::FADE_IN
        )));
}

/// Quick successive changes: the last one decides where the marker ends up.
#[test]
fn superseded_fade_out_is_ignored() {
    let mut scene = SceneBackend::new();
    let face = FlipClock::new(&Config::default(), &mut scene);
    let clock = ScriptedClock::new(hms(0, 0, 1), [hms(0, 0, 2), hms(0, 0, 3)]);
    let mut engine = Engine::new(clock, face);

    engine.tick(&mut scene);
    engine.tick(&mut scene);
    scene.advance(Duration::from_millis(50));
    engine.tick(&mut scene);

    let finished = scene.advance(Duration::from_millis(150));
    assert_eq!(finished.len(), 1, "only the first fade-out has ended");
    assert!(!engine.animation_finished(finished[0], &mut scene));

    let ones = engine.face().group(Unit::Seconds).ones();
    assert_eq!(ones.marker_row(), Some(1));
    assert!(matches!(ones.marker_phase(), MarkerPhase::FadingOut { target: 3, .. }));

    for id in scene.advance(Duration::from_millis(100)) {
        engine.animation_finished(id, &mut scene);
    }
    let ones = engine.face().group(Unit::Seconds).ones();
    assert_eq!(ones.marker_row(), Some(3));
    assert!(matches!(ones.marker_phase(), MarkerPhase::FadingIn { .. }));

    for id in scene.advance(Duration::from_millis(500)) {
        engine.animation_finished(id, &mut scene);
    }
    assert_eq!(engine.face().group(Unit::Seconds).ones().marker_phase(), MarkerPhase::Idle);
}

/// Scenario: the needle table is complete, distinct and referentially stable.
#[test]
fn needle_table_is_complete_and_stable() {
    for digit in 0..=9u8 {
        assert_eq!(encode(digit).len(), 6);
        for other in 0..digit {
            assert_ne!(encode(digit), encode(other), "digits {digit} and {other} collide");
        }
    }
    assert_eq!(encode(5), encode(5));
}

/// The needle face applies the table rows of each digit it shows.
#[test]
fn needle_watch_renders_minutes_and_seconds() {
    let mut scene = SceneBackend::new();
    let face = NeedleWatch::new(&Config::default(), &mut scene);
    let clock = ScriptedClock::new(hms(8, 5, 9), [hms(8, 5, 10)]);
    let mut engine = Engine::new(clock, face);

    let first = engine.tick(&mut scene);
    assert!(first.seconds && first.minutes && !first.hours);

    let second = engine.tick(&mut scene);
    assert!(second.seconds && !second.minutes);
    let seconds = engine.face().group(Unit::Seconds).unwrap();
    assert_eq!(seconds.tens().shown_digit(), Some(1));
    assert_eq!(seconds.ones().shown_digit(), Some(0));
}
