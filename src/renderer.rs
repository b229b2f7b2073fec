//! # Clock Face Rendering
//!
//! This module turns the retained tree of a [`SceneBackend`] into something a
//! person can look at. It supports two outputs:
//!
//! - **ASCII**: a few lines of text for the terminal, used by the binary's
//!   development mode
//! - **Raster**: any `embedded-graphics` [`DrawTarget`] with binary colour,
//!   scaled to fit the target's bounding box
//!
//! Both read only what the engine wrote: highlight classes, marker opacity and
//! needle rotations. Neither knows anything about the time itself.

use crate::backend::{NodeId, NodeKind, HIGHLIGHT_CLASS};
use crate::needle::DIALS_PER_DIGIT;
use crate::scene::SceneBackend;
use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Circle, Line, PrimitiveStyle, Rectangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};

/// Opacity above which the focus marker counts as visible.
const MARKER_VISIBLE: f32 = 0.5;

/// What a renderer needs to know about one flip column.
#[derive(Debug)]
struct ColumnView {
    left: f32,
    digits: Vec<String>,
    highlighted: Option<usize>,
    marker_visible: bool,
}

/// Needle rotations of one dial, in degrees.
#[derive(Debug)]
struct DialView {
    hands: Vec<f32>,
}

fn flip_columns(scene: &SceneBackend, page: NodeId) -> Vec<ColumnView> {
    let mut columns: Vec<ColumnView> = scene
        .descendants_of_kind(page, NodeKind::Column)
        .into_iter()
        .filter_map(|column| {
            let left = scene.node(column)?.left;
            let digit_nodes = scene.descendants_of_kind(column, NodeKind::Digit);
            let digits = digit_nodes
                .iter()
                .map(|id| {
                    scene
                        .node(*id)
                        .and_then(|node| node.text.clone())
                        .unwrap_or_default()
                })
                .collect();
            let highlighted = digit_nodes
                .iter()
                .position(|id| scene.has_class(*id, HIGHLIGHT_CLASS));
            let marker_visible = scene
                .descendants_of_kind(column, NodeKind::FocusMarker)
                .first()
                .is_some_and(|marker| scene.effective_opacity(*marker) > MARKER_VISIBLE);
            Some(ColumnView {
                left,
                digits,
                highlighted,
                marker_visible,
            })
        })
        .collect();
    columns.sort_by(|a, b| a.left.total_cmp(&b.left));
    columns
}

fn needle_clusters(scene: &SceneBackend, page: NodeId) -> Vec<Vec<DialView>> {
    scene
        .descendants_of_kind(page, NodeKind::DigitCluster)
        .into_iter()
        .map(|cluster| {
            scene
                .children(cluster)
                .into_iter()
                .map(|dial| DialView {
                    hands: scene
                        .children(dial)
                        .into_iter()
                        .filter_map(|needle| scene.node(needle).map(|node| node.rotate))
                        .collect(),
                })
                .collect()
        })
        .collect()
}

/// Render the face rooted at `page` as text.
///
/// Flip faces show three rows per column (the digit above, the highlighted
/// digit, the digit below) with the focus marker drawn as brackets. Needle
/// faces draw every dial as a 3×3 character cell.
pub fn render_ascii(scene: &SceneBackend, page: NodeId) -> String {
    let columns = flip_columns(scene, page);
    if !columns.is_empty() {
        return render_flip_ascii(&columns);
    }
    render_needle_ascii(&needle_clusters(scene, page))
}

fn render_flip_ascii(columns: &[ColumnView]) -> String {
    let cell = |column: &ColumnView, offset: isize| -> String {
        let Some(current) = column.highlighted else {
            return if offset == 0 { " - ".into() } else { "   ".into() };
        };
        let row = current as isize + offset;
        let Some(text) = usize::try_from(row).ok().and_then(|row| column.digits.get(row)) else {
            return "   ".into();
        };
        if offset == 0 && column.marker_visible {
            format!("[{text}]")
        } else {
            format!(" {text} ")
        }
    };

    [-1, 0, 1]
        .iter()
        .map(|offset| {
            columns
                .chunks(2)
                .map(|group| {
                    group
                        .iter()
                        .map(|column| cell(column, *offset))
                        .collect::<Vec<_>>()
                        .join("")
                })
                .collect::<Vec<_>>()
                .join(if *offset == 0 { " : " } else { "   " })
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Map a rotation to one of eight compass steps, 0 = right, clockwise.
fn compass_step(degrees: f32) -> usize {
    ((degrees / 45.0).round() as i32).rem_euclid(8) as usize
}

fn render_needle_ascii(clusters: &[Vec<DialView>]) -> String {
    // (row offset, column offset, glyph) for each compass step
    const STEPS: [(usize, usize, char); 8] = [
        (1, 2, '-'),
        (2, 2, '\\'),
        (2, 1, '|'),
        (2, 0, '/'),
        (1, 0, '-'),
        (0, 0, '\\'),
        (0, 1, '|'),
        (0, 2, '/'),
    ];
    const DIAL_ROWS: usize = DIALS_PER_DIGIT / 2;

    let mut lines = vec![String::new(); DIAL_ROWS * 3];
    for (index, cluster) in clusters.iter().enumerate() {
        if index > 0 {
            let gap = if index % 2 == 0 { "     " } else { " " };
            lines.iter_mut().for_each(|line| line.push_str(gap));
        }
        for dial_row in 0..DIAL_ROWS {
            let mut cells = [[' '; 7]; 3];
            for dial_col in 0..2 {
                let mut grid = [[' '; 3]; 3];
                grid[1][1] = '+';
                if let Some(dial) = cluster.get(dial_row * 2 + dial_col) {
                    for hand in &dial.hands {
                        let (r, c, glyph) = STEPS[compass_step(*hand)];
                        grid[r][c] = glyph;
                    }
                }
                for (r, row) in grid.iter().enumerate() {
                    cells[r][dial_col * 4..dial_col * 4 + 3].copy_from_slice(row);
                }
            }
            for (r, row) in cells.iter().enumerate() {
                lines[dial_row * 3 + r].extend(row.iter());
            }
        }
    }
    lines
        .iter()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Draw the face rooted at `page` onto a binary-colour display.
///
/// The face is scaled to the target's bounding box: flip columns share the
/// width evenly, needle dials are sized to fit two per digit across and three
/// down. Shapes touch, so targets that reject overdraw need to allow it.
pub fn draw_raster<D>(scene: &SceneBackend, page: NodeId, display: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let columns = flip_columns(scene, page);
    if !columns.is_empty() {
        return draw_flip_raster(&columns, display);
    }
    draw_needle_raster(&needle_clusters(scene, page), display)
}

fn draw_flip_raster<D>(columns: &[ColumnView], display: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let area = display.bounding_box();
    let cell_width = area.size.width / columns.len() as u32;
    if cell_width < 3 {
        return Ok(());
    }
    let frame = PrimitiveStyle::with_stroke(BinaryColor::On, 1);
    let text_style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
    let centered = TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Middle)
        .build();
    let center_y = area.top_left.y + area.size.height as i32 / 2;

    for (index, column) in columns.iter().enumerate() {
        let x0 = area.top_left.x + (index as u32 * cell_width) as i32;
        Rectangle::new(Point::new(x0, area.top_left.y), Size::new(cell_width, area.size.height))
            .into_styled(frame)
            .draw(display)?;

        let center_x = x0 + cell_width as i32 / 2;
        if column.marker_visible {
            let diameter = (cell_width - 2).min(area.size.height.saturating_sub(2));
            Circle::with_center(Point::new(center_x, center_y), diameter)
                .into_styled(frame)
                .draw(display)?;
        }
        if let Some(text) = column.highlighted.and_then(|row| column.digits.get(row)) {
            Text::with_text_style(text, Point::new(center_x, center_y), text_style, centered)
                .draw(display)?;
        }
    }
    Ok(())
}

fn draw_needle_raster<D>(clusters: &[Vec<DialView>], display: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    if clusters.is_empty() {
        return Ok(());
    }
    let area = display.bounding_box();
    let dial = (area.size.width / (clusters.len() as u32 * 2)).min(area.size.height / 3);
    if dial < 4 {
        return Ok(());
    }
    let stroke = PrimitiveStyle::with_stroke(BinaryColor::On, 1);
    let radius = (dial / 2) as f32 - 1.0;

    for (index, cluster) in clusters.iter().enumerate() {
        for (slot, view) in cluster.iter().enumerate() {
            let top_left = area.top_left
                + Point::new(
                    ((index * 2 + slot % 2) as u32 * dial) as i32,
                    ((slot / 2) as u32 * dial) as i32,
                );
            let circle = Circle::new(top_left, dial);
            circle.into_styled(stroke).draw(display)?;

            let center = circle.center();
            for hand in &view.hands {
                let radians = hand.to_radians();
                let tip = center
                    + Point::new(
                        (radius * radians.cos()).round() as i32,
                        (radius * radians.sin()).round() as i32,
                    );
                Line::new(center, tip).into_styled(stroke).draw(display)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::face::{ClockFace, FlipClock, NeedleWatch};
    use crate::TimeSample;
    use embedded_graphics::mock_display::MockDisplay;

    fn hms(h: u8, m: u8, s: u8) -> TimeSample {
        TimeSample::from_hms(h, m, s).unwrap()
    }

    #[test]
    fn test_flip_ascii_rendering() {
        let mut scene = SceneBackend::new();
        let mut face = FlipClock::new(&Config::default(), &mut scene);
        face.render(hms(12, 34, 56), &mut scene);

        let text = render_ascii(&scene, face.page());
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "[1][2] : [3][4] : [5][6]");
        assert_eq!(lines[0], " 0  1     2  3     4  5");
        assert_eq!(lines[2], " 2  3     4  5        7");
    }

    #[test]
    fn test_flip_ascii_hides_marker_while_fading() {
        let mut scene = SceneBackend::new();
        let mut face = FlipClock::new(&Config::default(), &mut scene);
        face.render(hms(0, 0, 1), &mut scene);
        face.render(hms(0, 0, 2), &mut scene);
        // Fade-out runs for a third of 500 ms
        scene.advance(std::time::Duration::from_millis(150));

        let text = render_ascii(&scene, face.page());
        assert!(text.lines().nth(1).unwrap().ends_with("[0] 2"), "{text}");
    }

    #[test]
    fn test_needle_ascii_rendering() {
        let mut scene = SceneBackend::new();
        let mut face = NeedleWatch::new(&Config::default(), &mut scene);
        face.render(hms(0, 11, 11), &mut scene);

        let text = render_ascii(&scene, face.page());
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        // A "1" parks its left dials and points the top-right dial down
        assert!(lines[1].starts_with(" +   +   +   +"), "{text}");
        assert!(lines[2].starts_with("/    |  /    |"), "{text}");
    }

    #[test]
    fn test_compass_step() {
        assert_eq!(compass_step(0.0), 0);
        assert_eq!(compass_step(90.0), 2);
        assert_eq!(compass_step(-90.0), 6);
        assert_eq!(compass_step(126.0), 3);
        assert_eq!(compass_step(180.0), 4);
    }

    #[test]
    fn test_flip_raster_rendering() {
        let mut scene = SceneBackend::new();
        let mut face = FlipClock::new(&Config::default(), &mut scene);
        face.render(hms(12, 34, 56), &mut scene);

        let mut display = MockDisplay::<BinaryColor>::new();
        display.set_allow_overdraw(true);
        draw_raster(&scene, face.page(), &mut display).unwrap();

        let pixels_drawn = display.affected_area().size;
        assert!(pixels_drawn.width > 0, "No pixels were drawn to the display");
    }

    #[test]
    fn test_needle_raster_rendering() {
        let mut scene = SceneBackend::new();
        let mut face = NeedleWatch::new(&Config::default(), &mut scene);
        face.render(hms(0, 42, 7), &mut scene);

        let mut display = MockDisplay::<BinaryColor>::new();
        display.set_allow_overdraw(true);
        draw_raster(&scene, face.page(), &mut display).unwrap();

        assert!(display.affected_area().size.width > 0, "No dials were drawn");
    }
}
