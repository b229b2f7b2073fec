//! # Needle-Digit Encoder
//!
//! Each decimal digit is drawn by six small analog dials arranged two wide and
//! three high. Every dial has a minutes and a seconds needle; the angles of all
//! twelve needles together trace the outline of the digit.
//!
//! The digit shapes are an authored table ([`DIGIT_ENCODINGS`]), not derived from
//! any rule. Dials that take no part in a digit park both needles at the
//! 36-minute mark, slightly left of straight down.
//!
//! Needle angles are written as clock-minute marks (0 = up, 15 = right,
//! 30 = down, 45 = left). A needle node at zero rotation points at 3 o'clock,
//! so a mark becomes `(mark - 15) * 6` degrees.
//!
//! Unlike a flip column, a needle digit does not suppress repeated values; the
//! unit's change detector one layer up already does that.

use crate::backend::{NodeAttrs, NodeId, NodeKind, RenderBackend, Style};
use crate::config::NeedleConfig;
use crate::group::DigitSlot;

/// Number of dials in one digit.
pub const DIALS_PER_DIGIT: usize = 6;

/// Direction a single needle points in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Hand {
    Up,
    Right,
    Down,
    Left,
    /// Resting position of a dial that is not part of the digit
    Parked,
}

impl Hand {
    /// Clock-minute mark the needle points at.
    pub const fn minute_mark(self) -> u8 {
        match self {
            Hand::Up => 0,
            Hand::Right => 15,
            Hand::Down => 30,
            Hand::Left => 45,
            Hand::Parked => 36,
        }
    }

    /// Clockwise rotation of a needle node for this hand.
    pub fn degrees(self) -> f32 {
        (f32::from(self.minute_mark()) - 15.0) * (360.0 / 60.0)
    }
}

/// Angles of the two needles of one dial.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NeedleConfiguration {
    pub minutes: Hand,
    pub seconds: Hand,
}

impl NeedleConfiguration {
    /// Both needles parked.
    pub const INACTIVE: NeedleConfiguration = NeedleConfiguration::new(Hand::Parked, Hand::Parked);

    pub const fn new(minutes: Hand, seconds: Hand) -> Self {
        Self { minutes, seconds }
    }

    pub fn is_inactive(&self) -> bool {
        *self == Self::INACTIVE
    }
}

/// The six dial configurations that draw one digit, in dial order
/// (top-left, top-right, middle-left, middle-right, bottom-left, bottom-right).
pub type DigitEncoding = [NeedleConfiguration; DIALS_PER_DIGIT];

/// Needle configurations for digits 0 through 9, indexed by digit.
pub static DIGIT_ENCODINGS: [DigitEncoding; 10] = {
    use Hand::{Down as D, Left as L, Right as R, Up as U};
    const fn n(minutes: Hand, seconds: Hand) -> NeedleConfiguration {
        NeedleConfiguration::new(minutes, seconds)
    }
    const OFF: NeedleConfiguration = NeedleConfiguration::INACTIVE;
    [
        // 0
        [n(D, R), n(L, D), n(D, U), n(D, U), n(U, R), n(L, U)],
        // 1
        [OFF, n(D, D), OFF, n(D, U), OFF, n(U, U)],
        // 2
        [n(R, R), n(L, D), n(D, R), n(L, U), n(U, R), n(L, L)],
        // 3
        [n(R, R), n(L, D), n(R, R), n(L, U), n(R, R), n(U, L)],
        // 4
        [n(D, D), n(D, D), n(U, R), n(L, U), OFF, n(U, U)],
        // 5
        [n(R, D), n(L, L), n(U, R), n(L, D), n(R, R), n(U, L)],
        // 6
        [n(R, D), n(L, L), n(U, R), n(L, D), n(U, R), n(U, L)],
        // 7
        [n(R, R), n(L, D), OFF, n(D, U), OFF, n(U, U)],
        // 8
        [n(R, D), n(L, D), n(U, R), n(L, D), n(U, R), n(U, L)],
        // 9
        [n(R, D), n(L, D), n(U, R), n(U, D), n(R, R), n(U, L)],
    ]
};

/// Look up the dial configurations for `digit`.
///
/// # Panics
/// If `digit` is not in `0..=9`.
pub fn encode(digit: u8) -> &'static DigitEncoding {
    assert!(digit <= 9, "digit {digit} out of range for needle encoding");
    &DIGIT_ENCODINGS[usize::from(digit)]
}

#[derive(Clone, Copy, Debug)]
struct Dial {
    minutes: NodeId,
    seconds: NodeId,
}

impl Dial {
    fn apply<B: RenderBackend + ?Sized>(&self, config: NeedleConfiguration, backend: &mut B) {
        backend.set_style(self.minutes, Style::RotateZ(config.minutes.degrees()));
        backend.set_style(self.seconds, Style::RotateZ(config.seconds.degrees()));
    }
}

/// One digit drawn by six dials.
#[derive(Debug)]
pub struct NeedleDigit {
    cluster: NodeId,
    dials: [Dial; DIALS_PER_DIGIT],
    shown: Option<u8>,
}

impl NeedleDigit {
    /// Build the dial cluster under `parent`. Needles start unrotated; call
    /// [`reset`](Self::reset) to park them.
    pub fn new<B: RenderBackend + ?Sized>(
        backend: &mut B,
        parent: NodeId,
        layout: &NeedleConfig,
    ) -> Self {
        let cluster = backend.create_node(NodeKind::DigitCluster, NodeAttrs::child_of(parent));
        let dials = std::array::from_fn(|_| {
            let dial = backend.create_node(NodeKind::Dial, NodeAttrs::child_of(cluster));
            let mut needle = || {
                let node = backend.create_node(NodeKind::Needle, NodeAttrs::child_of(dial));
                backend.set_style(node, Style::Transition(layout.transition()));
                node
            };
            let seconds = needle();
            let minutes = needle();
            Dial { minutes, seconds }
        });
        Self {
            cluster,
            dials,
            shown: None,
        }
    }

    /// Park every dial. Used before the first real value is known.
    pub fn reset<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) {
        self.apply(&[NeedleConfiguration::INACTIVE; DIALS_PER_DIGIT], backend);
        self.shown = None;
    }

    /// Point the needles at the shape of `digit`. Always re-applies every
    /// angle, even when the digit is already shown.
    pub fn set_digit<B: RenderBackend + ?Sized>(&mut self, digit: u8, backend: &mut B) {
        self.apply(encode(digit), backend);
        self.shown = Some(digit);
    }

    /// Digit last applied, `None` after construction or reset.
    pub fn shown_digit(&self) -> Option<u8> {
        self.shown
    }

    pub fn cluster(&self) -> NodeId {
        self.cluster
    }

    fn apply<B: RenderBackend + ?Sized>(&self, encoding: &DigitEncoding, backend: &mut B) {
        for (dial, config) in self.dials.iter().zip(encoding) {
            dial.apply(*config, backend);
        }
    }
}

impl DigitSlot for NeedleDigit {
    fn show_digit<B: RenderBackend + ?Sized>(&mut self, digit: u8, backend: &mut B) -> bool {
        self.set_digit(digit, backend);
        true
    }

    fn reset<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) {
        NeedleDigit::reset(self, backend);
    }
}
