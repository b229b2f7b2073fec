//! # Rendering Backend Contract
//!
//! The engine never touches pixels. Everything visual goes through
//! [`RenderBackend`], a write-only command interface:
//!
//! - **Nodes**: [`create_node`](RenderBackend::create_node) builds the retained
//!   tree (columns, digits, dials, needles) once, when a face is constructed
//! - **Styles and classes**: per-frame mutations such as a column slide or a
//!   needle rotation
//! - **Animations**: time-based transitions the backend runs on its own clock;
//!   when one ends the host reports its [`AnimationId`] back to the engine
//! - **Frames**: [`request_frame`](RenderBackend::request_frame) asks the host
//!   to call `tick` again on the next animation frame
//!
//! Completion is an event rather than a callback: the host collects finished
//! animation ids from its backend and passes them to
//! [`Engine::animation_finished`](crate::engine::Engine::animation_finished).
//! The engine decides whether the id is still relevant.

use std::time::Duration;

/// Class applied to the digit that currently sits in a column's window.
pub const HIGHLIGHT_CLASS: &str = "digit-highlighted";

/// Handle to a node owned by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle to a running animation.
///
/// Backends hand these out from a counter that only goes up, so an id is
/// never reused and doubles as the token that tells a fresh completion from
/// a stale one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationId(u64);

impl AnimationId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// What a node represents. Backends use it to pick default styling and
/// renderers use it to find the parts of a face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Root of a clock face
    Page,
    /// Fixed window of a flip column
    Column,
    /// Sliding strip holding every digit of a column
    ColumnContent,
    /// One digit row inside a strip
    Digit,
    /// Highlight circle travelling between rows
    FocusMarker,
    /// Six dials that together draw one needle digit
    DigitCluster,
    /// One analog dial holding two needles
    Dial,
    /// A single needle; zero rotation points at 3 o'clock
    Needle,
}

/// Construction attributes for a node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeAttrs {
    pub parent: Option<NodeId>,
    pub text: Option<String>,
}

impl NodeAttrs {
    pub fn child_of(parent: NodeId) -> Self {
        Self {
            parent: Some(parent),
            text: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// One style property together with its value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Style {
    /// Horizontal offset from the page centre, pixels
    Left(f32),
    /// Vertical offset inside the parent, pixels
    Top(f32),
    /// Height in pixels
    Height(f32),
    /// Vertical translation, pixels
    TranslateY(f32),
    /// Rotation around the node origin, degrees clockwise
    RotateZ(f32),
    /// Opacity in `0.0..=1.0`
    Opacity(f32),
    /// Length of the eased transition the backend applies to later
    /// transform changes on this node
    Transition(Duration),
}

/// Start and end values of an animation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Keyframes {
    Opacity { from: f32, to: f32 },
}

impl Keyframes {
    pub const FADE_OUT: Keyframes = Keyframes::Opacity { from: 1.0, to: 0.0 };
    pub const FADE_IN: Keyframes = Keyframes::Opacity { from: 0.0, to: 1.0 };
}

/// Write-only command interface the engine renders through.
///
/// Every call is assumed to succeed. Implementations own the nodes; the
/// engine only ever holds [`NodeId`] handles to them.
pub trait RenderBackend {
    /// Create a node, attached to `attrs.parent` when given.
    fn create_node(&mut self, kind: NodeKind, attrs: NodeAttrs) -> NodeId;

    /// Set one style property on a node.
    fn set_style(&mut self, node: NodeId, style: Style);

    fn add_class(&mut self, node: NodeId, class: &'static str);

    fn remove_class(&mut self, node: NodeId, class: &'static str);

    /// Start an animation. Its completion is reported later, out of band,
    /// using the returned id.
    fn animate(&mut self, node: NodeId, keyframes: Keyframes, duration: Duration) -> AnimationId;

    /// Ask the host for another tick on the next animation frame.
    fn request_frame(&mut self);
}
