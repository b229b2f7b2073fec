//! # Flip-Column Digit Encoder
//!
//! A flip column shows one digit by sliding a vertical strip of all its digits
//! (`0..=last`) so the wanted row sits in the column window. A round focus
//! marker travels with the highlighted row.
//!
//! ## Marker Transition
//!
//! Moving the marker is a two-phase animation that must never show the marker
//! jumping across rows while it is visible:
//!
//! ```text
//!   Idle ──highlight──▶ FadingOut ──fade-out done──▶ (reposition) ──▶ FadingIn ──done──▶ Idle
//!                          ▲  │                                          │
//!                          └──┴──────────── highlight ◀───────────────────┘
//! ```
//!
//! The reposition happens inside the completion handler of the fade-out, so
//! it can't be observed before the backend reports the fade-out finished.
//! Each phase remembers the [`AnimationId`] it waits for; a completion for any
//! other id belongs to a superseded transition and is dropped.
//!
//! The strip slide and the highlight class swap are independent of the marker
//! and happen on the same call that starts the fade-out.

use crate::backend::{
    AnimationId, Keyframes, NodeAttrs, NodeId, NodeKind, RenderBackend, Style, HIGHLIGHT_CLASS,
};
use crate::config::FlipConfig;
use crate::group::DigitSlot;
use tracing::trace;

/// Where the focus marker is in its two-phase move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerPhase {
    /// Nothing highlighted yet; the marker is transparent
    Hidden,
    /// Resting on its row, fully visible
    Idle,
    /// Fading out on the old row; moves to `target` when `animation` ends
    FadingOut { animation: AnimationId, target: u8 },
    /// Fading in on its new row
    FadingIn { animation: AnimationId },
}

#[derive(Debug)]
struct FocusMarker {
    node: NodeId,
    row: Option<u8>,
    phase: MarkerPhase,
}

/// One column of a flip display.
#[derive(Debug)]
pub struct FlipColumn {
    root: NodeId,
    strip: NodeId,
    digits: Vec<NodeId>,
    marker: FocusMarker,
    current: Option<u8>,
    layout: FlipConfig,
}

impl FlipColumn {
    /// Build a column for digits `0..=last_digit`, horizontally offset by
    /// `left` pixels from the page centre.
    pub fn new<B: RenderBackend + ?Sized>(
        backend: &mut B,
        page: NodeId,
        last_digit: u8,
        left: f32,
        layout: &FlipConfig,
    ) -> Self {
        assert!(last_digit <= 9, "flip column cannot hold digit {last_digit}");
        let row = layout.row_height_px as f32;

        let root = backend.create_node(NodeKind::Column, NodeAttrs::child_of(page));
        backend.set_style(root, Style::Left(left));
        backend.set_style(root, Style::Height(f32::from(last_digit + 1) * row));

        let strip = backend.create_node(NodeKind::ColumnContent, NodeAttrs::child_of(root));
        backend.set_style(strip, Style::Transition(layout.transition()));

        let digits = (0..=last_digit)
            .map(|digit| {
                let node = backend.create_node(
                    NodeKind::Digit,
                    NodeAttrs::child_of(strip).with_text(digit.to_string()),
                );
                backend.set_style(node, Style::Top(f32::from(digit) * row));
                node
            })
            .collect();

        let marker = backend.create_node(NodeKind::FocusMarker, NodeAttrs::child_of(strip));
        backend.set_style(marker, Style::Opacity(0.0));

        Self {
            root,
            strip,
            digits,
            marker: FocusMarker {
                node: marker,
                row: None,
                phase: MarkerPhase::Hidden,
            },
            current: None,
            layout: *layout,
        }
    }

    /// Make `digit` the highlighted row.
    ///
    /// Returns `false` without touching the backend when `digit` is already
    /// highlighted.
    ///
    /// # Panics
    /// If `digit` is beyond the last row of this column. That is a caller bug
    /// in time decomposition and is never clamped.
    pub fn highlight_digit<B: RenderBackend + ?Sized>(
        &mut self,
        digit: u8,
        backend: &mut B,
    ) -> bool {
        assert!(
            digit <= self.last_digit(),
            "digit {digit} out of range for column 0..={}",
            self.last_digit()
        );
        if self.current == Some(digit) {
            return false;
        }

        match self.current {
            None => {
                // First value: no previous row to fade away from
                backend.set_style(self.marker.node, Style::Top(self.marker_top(digit)));
                backend.set_style(self.marker.node, Style::Opacity(1.0));
                self.marker.row = Some(digit);
                self.marker.phase = MarkerPhase::Idle;
            }
            Some(previous) => {
                let animation =
                    backend.animate(self.marker.node, Keyframes::FADE_OUT, self.layout.fade_out());
                trace!(?animation, from = previous, to = digit, "marker fading out");
                self.marker.phase = MarkerPhase::FadingOut {
                    animation,
                    target: digit,
                };
                backend.remove_class(self.digits[usize::from(previous)], HIGHLIGHT_CLASS);
            }
        }

        self.current = Some(digit);
        backend.add_class(self.digits[usize::from(digit)], HIGHLIGHT_CLASS);
        backend.set_style(self.strip, Style::TranslateY(-self.row_offset(digit)));
        true
    }

    /// Feed a finished animation to the marker state machine.
    ///
    /// Returns `true` when the id belonged to the transition in progress.
    pub fn animation_finished<B: RenderBackend + ?Sized>(
        &mut self,
        finished: AnimationId,
        backend: &mut B,
    ) -> bool {
        match self.marker.phase {
            MarkerPhase::FadingOut { animation, target } if animation == finished => {
                backend.set_style(self.marker.node, Style::Top(self.marker_top(target)));
                self.marker.row = Some(target);
                let animation =
                    backend.animate(self.marker.node, Keyframes::FADE_IN, self.layout.fade_in());
                trace!(?animation, row = target, "marker repositioned, fading in");
                self.marker.phase = MarkerPhase::FadingIn { animation };
                true
            }
            MarkerPhase::FadingIn { animation } if animation == finished => {
                self.marker.phase = MarkerPhase::Idle;
                true
            }
            _ => false,
        }
    }

    /// Digit currently highlighted, `None` before the first call.
    pub fn current_digit(&self) -> Option<u8> {
        self.current
    }

    /// Row the marker node is positioned on. Lags behind
    /// [`current_digit`](Self::current_digit) while a fade-out is running.
    pub fn marker_row(&self) -> Option<u8> {
        self.marker.row
    }

    pub fn marker_phase(&self) -> MarkerPhase {
        self.marker.phase
    }

    pub fn last_digit(&self) -> u8 {
        (self.digits.len() - 1) as u8
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn marker_node(&self) -> NodeId {
        self.marker.node
    }

    fn row_offset(&self, digit: u8) -> f32 {
        f32::from(digit) * self.layout.row_height_px as f32
    }

    fn marker_top(&self, digit: u8) -> f32 {
        self.row_offset(digit) - self.layout.focus_padding_px as f32
    }
}

impl DigitSlot for FlipColumn {
    fn show_digit<B: RenderBackend + ?Sized>(&mut self, digit: u8, backend: &mut B) -> bool {
        self.highlight_digit(digit, backend)
    }

    fn animation_finished<B: RenderBackend + ?Sized>(
        &mut self,
        animation: AnimationId,
        backend: &mut B,
    ) -> bool {
        FlipColumn::animation_finished(self, animation, backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneBackend;

    fn column(scene: &mut SceneBackend, last_digit: u8) -> FlipColumn {
        let page = scene.create_node(NodeKind::Page, NodeAttrs::default());
        FlipColumn::new(scene, page, last_digit, 0.0, &FlipConfig::default())
    }

    #[test]
    fn first_highlight_places_marker_without_animation() {
        let mut scene = SceneBackend::new();
        let mut col = column(&mut scene, 9);

        assert!(col.highlight_digit(7, &mut scene));
        assert_eq!(col.marker_phase(), MarkerPhase::Idle);
        assert_eq!(col.marker_row(), Some(7));
        assert_eq!(scene.running_animations(), 0);

        let marker = scene.node(col.marker_node()).unwrap();
        assert_eq!(marker.top, 7.0 * 45.0 - 4.0);
        assert_eq!(marker.opacity, 1.0);
    }

    #[test]
    fn same_digit_twice_is_a_no_op() {
        let mut scene = SceneBackend::new();
        let mut col = column(&mut scene, 9);

        col.highlight_digit(3, &mut scene);
        let after_first = scene.mutation_count();
        assert!(!col.highlight_digit(3, &mut scene));
        assert_eq!(scene.mutation_count(), after_first);
    }

    #[test]
    fn marker_moves_only_after_fade_out_completes() {
        let mut scene = SceneBackend::new();
        let mut col = column(&mut scene, 5);
        col.highlight_digit(1, &mut scene);
        col.highlight_digit(2, &mut scene);

        let MarkerPhase::FadingOut { animation, target } = col.marker_phase() else {
            panic!("expected fade-out, got {:?}", col.marker_phase());
        };
        assert_eq!(target, 2);
        // Strip and class already moved, marker still on the old row
        assert_eq!(col.current_digit(), Some(2));
        assert_eq!(col.marker_row(), Some(1));
        assert_eq!(scene.node(col.marker_node()).unwrap().top, 45.0 - 4.0);

        assert!(col.animation_finished(animation, &mut scene));
        assert_eq!(col.marker_row(), Some(2));
        assert_eq!(scene.node(col.marker_node()).unwrap().top, 90.0 - 4.0);
        assert!(matches!(col.marker_phase(), MarkerPhase::FadingIn { .. }));
    }

    #[test]
    fn stale_fade_out_does_not_reposition() {
        let mut scene = SceneBackend::new();
        let mut col = column(&mut scene, 9);
        col.highlight_digit(1, &mut scene);
        col.highlight_digit(2, &mut scene);
        let MarkerPhase::FadingOut { animation: stale, .. } = col.marker_phase() else {
            panic!("expected fade-out");
        };
        col.highlight_digit(3, &mut scene);
        let MarkerPhase::FadingOut { animation: fresh, target } = col.marker_phase() else {
            panic!("expected fade-out");
        };
        assert_ne!(stale, fresh);
        assert_eq!(target, 3);

        assert!(!col.animation_finished(stale, &mut scene));
        assert_eq!(col.marker_row(), Some(1));

        assert!(col.animation_finished(fresh, &mut scene));
        assert_eq!(col.marker_row(), Some(3));
    }

    #[test]
    fn highlight_during_fade_in_drops_old_fade_in() {
        let mut scene = SceneBackend::new();
        let mut col = column(&mut scene, 9);
        col.highlight_digit(1, &mut scene);
        col.highlight_digit(2, &mut scene);
        let MarkerPhase::FadingOut { animation: fade_out, .. } = col.marker_phase() else {
            panic!("expected fade-out");
        };
        assert!(col.animation_finished(fade_out, &mut scene));
        let MarkerPhase::FadingIn { animation: fade_in } = col.marker_phase() else {
            panic!("expected fade-in, got {:?}", col.marker_phase());
        };

        col.highlight_digit(3, &mut scene);
        let MarkerPhase::FadingOut { animation: next, target } = col.marker_phase() else {
            panic!("expected fade-out");
        };
        assert_eq!(target, 3);

        assert!(!col.animation_finished(fade_in, &mut scene));
        assert_eq!(col.marker_row(), Some(2));
        assert!(matches!(col.marker_phase(), MarkerPhase::FadingOut { .. }));

        assert!(col.animation_finished(next, &mut scene));
        assert_eq!(col.marker_row(), Some(3));
    }

    #[test]
    fn highlight_class_follows_current_digit() {
        let mut scene = SceneBackend::new();
        let mut col = column(&mut scene, 2);
        col.highlight_digit(0, &mut scene);
        col.highlight_digit(2, &mut scene);

        let highlighted: Vec<_> = scene
            .children(col.root())
            .iter()
            .flat_map(|strip| scene.children(*strip))
            .filter(|node| scene.has_class(*node, HIGHLIGHT_CLASS))
            .filter_map(|node| scene.node(node).and_then(|n| n.text.clone()))
            .collect();
        assert_eq!(highlighted, vec!["2".to_string()]);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn out_of_range_digit_panics() {
        let mut scene = SceneBackend::new();
        let mut col = column(&mut scene, 2);
        col.highlight_digit(3, &mut scene);
    }
}
