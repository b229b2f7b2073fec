//! # In-Memory Scene Backend
//!
//! [`SceneBackend`] is a retained node tree that implements
//! [`RenderBackend`]. It is what the binary renders into, what the terminal
//! and raster renderers read from, and what the tests inspect.
//!
//! ## Animation Clock
//! The scene has no clock of its own. The host moves it forward with
//! [`advance`](SceneBackend::advance), which returns every animation that
//! reached its end, oldest first. Each id is reported exactly once. Animations
//! have no fill: when one ends, the node shows its base style again.
//!
//! ## Mutation Counting
//! Every command that changes the tree bumps a counter, which makes "this
//! frame changed nothing" directly checkable.

use crate::backend::{AnimationId, Keyframes, NodeAttrs, NodeId, NodeKind, RenderBackend, Style};
use std::collections::BTreeSet;
use std::time::Duration;

/// One node of the retained tree with its current base styles.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneNode {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub text: Option<String>,
    pub classes: BTreeSet<&'static str>,
    pub left: f32,
    pub top: f32,
    pub height: f32,
    pub translate_y: f32,
    pub rotate: f32,
    pub opacity: f32,
    pub transition: Option<Duration>,
}

impl SceneNode {
    fn new(kind: NodeKind, attrs: NodeAttrs) -> Self {
        Self {
            kind,
            parent: attrs.parent,
            children: Vec::new(),
            text: attrs.text,
            classes: BTreeSet::new(),
            left: 0.0,
            top: 0.0,
            height: 0.0,
            translate_y: 0.0,
            rotate: 0.0,
            opacity: 1.0,
            transition: None,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct RunningAnimation {
    id: AnimationId,
    node: NodeId,
    keyframes: Keyframes,
    started: Duration,
    duration: Duration,
}

impl RunningAnimation {
    fn ends_at(&self) -> Duration {
        self.started + self.duration
    }

    fn opacity_at(&self, now: Duration) -> f32 {
        let Keyframes::Opacity { from, to } = self.keyframes;
        if self.duration.is_zero() {
            return to;
        }
        let progress = (now.saturating_sub(self.started).as_secs_f32()
            / self.duration.as_secs_f32())
        .clamp(0.0, 1.0);
        from + (to - from) * progress
    }
}

/// Retained node tree with a manually advanced animation clock.
#[derive(Debug, Default)]
pub struct SceneBackend {
    nodes: Vec<SceneNode>,
    animations: Vec<RunningAnimation>,
    next_animation: u64,
    now: Duration,
    frame_requested: bool,
    mutations: u64,
}

impl SceneBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.index())
    }

    /// Children of `id` in creation order; empty for unknown ids.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    /// Nodes without a parent, in creation order.
    pub fn roots(&self) -> Vec<NodeId> {
        self.ids().filter(|id| self.nodes[id.index()].parent.is_none()).collect()
    }

    /// Every node of `kind` under `root`, depth first.
    pub fn descendants_of_kind(&self, root: NodeId, kind: NodeKind) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.node(id) else { continue };
            if id != root && node.kind == kind {
                found.push(id);
            }
            stack.extend(node.children.iter().rev());
        }
        found
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.node(id).is_some_and(|node| node.classes.contains(class))
    }

    /// Opacity as currently displayed: the newest running animation on the
    /// node wins over its base style.
    pub fn effective_opacity(&self, id: NodeId) -> f32 {
        self.animations
            .iter()
            .rev()
            .find(|animation| animation.node == id)
            .map(|animation| animation.opacity_at(self.now))
            .or_else(|| self.node(id).map(|node| node.opacity))
            .unwrap_or(0.0)
    }

    /// Move the animation clock forward and collect finished animations.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<AnimationId> {
        self.now += elapsed;
        let now = self.now;
        let mut finished: Vec<_> = self
            .animations
            .iter()
            .filter(|animation| animation.ends_at() <= now)
            .copied()
            .collect();
        self.animations.retain(|animation| animation.ends_at() > now);
        finished.sort_by_key(|animation| (animation.ends_at(), animation.id));
        finished.into_iter().map(|animation| animation.id).collect()
    }

    /// Current position of the animation clock.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn running_animations(&self) -> usize {
        self.animations.len()
    }

    /// Consume a pending frame request, returning whether there was one.
    pub fn take_frame_request(&mut self) -> bool {
        std::mem::take(&mut self.frame_requested)
    }

    /// Total number of tree-changing commands received.
    pub fn mutation_count(&self) -> u64 {
        self.mutations
    }

    fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId::new)
    }

    fn node_mut(&mut self, id: NodeId) -> &mut SceneNode {
        self.mutations += 1;
        &mut self.nodes[id.index()]
    }
}

impl RenderBackend for SceneBackend {
    fn create_node(&mut self, kind: NodeKind, attrs: NodeAttrs) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        if let Some(parent) = attrs.parent {
            self.nodes[parent.index()].children.push(id);
        }
        self.nodes.push(SceneNode::new(kind, attrs));
        self.mutations += 1;
        id
    }

    fn set_style(&mut self, node: NodeId, style: Style) {
        let node = self.node_mut(node);
        match style {
            Style::Left(px) => node.left = px,
            Style::Top(px) => node.top = px,
            Style::Height(px) => node.height = px,
            Style::TranslateY(px) => node.translate_y = px,
            Style::RotateZ(deg) => node.rotate = deg,
            Style::Opacity(value) => node.opacity = value,
            Style::Transition(duration) => node.transition = Some(duration),
        }
    }

    fn add_class(&mut self, node: NodeId, class: &'static str) {
        self.node_mut(node).classes.insert(class);
    }

    fn remove_class(&mut self, node: NodeId, class: &'static str) {
        self.node_mut(node).classes.remove(class);
    }

    fn animate(&mut self, node: NodeId, keyframes: Keyframes, duration: Duration) -> AnimationId {
        self.next_animation += 1;
        let id = AnimationId::new(self.next_animation);
        self.animations.push(RunningAnimation {
            id,
            node,
            keyframes,
            started: self.now,
            duration,
        });
        self.mutations += 1;
        id
    }

    fn request_frame(&mut self) {
        self.frame_requested = true;
    }
}
