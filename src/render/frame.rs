use crate::core::board::format_cm;
use crate::core::sample::grams_to_kg;
use crate::playback::FrameSnapshot;

use super::geometry::{BoardGeometry, Point};
use super::painter::{Painter, TextAnchor};
use super::theme::{Color, Theme};

pub const SENSOR_RADIUS: f32 = 12.0;
pub const CROSS_SIZE: f32 = 14.0;
pub const CROSS_THICKNESS: f32 = 2.0;
pub const OUTLINE_THICKNESS: f32 = 2.0;
pub const DASH_LENGTH: f32 = 6.0;
pub const DASH_GAP: f32 = 4.0;

/// Weight label offset from a sensor marker, toward the board horizontally
/// and away from it vertically
const WEIGHT_LABEL_DX: f32 = 28.0;
const WEIGHT_LABEL_DY: f32 = 18.0;

/// Color and radius of trail dot `i` (0 = oldest) for a trail of `trail_len`
pub fn trail_dot(i: usize, trail_len: usize, background: Color, accent: Color) -> (Color, f32) {
    let alpha = i as f32 / trail_len.max(1) as f32;
    (background.lerp(accent, alpha), 1.5 + 3.0 * alpha)
}

/// Paints one complete frame of the replay
#[derive(Debug, Clone)]
pub struct FrameRenderer<'t> {
    theme: &'t Theme,
}

impl<'t> FrameRenderer<'t> {
    pub fn new(theme: &'t Theme) -> Self {
        Self { theme }
    }

    /// Surface with nothing to show yet
    pub fn paint_empty(&self, painter: &mut impl Painter, width: f32, height: f32) {
        painter.fill_rect(Point::new(0.0, 0.0), Point::new(width, height), self.theme.canvas);
    }

    pub fn paint(&self, painter: &mut impl Painter, frame: &FrameSnapshot<'_>) {
        let g = frame.geometry;
        let theme = self.theme;

        painter.fill_rect(
            Point::new(0.0, 0.0),
            Point::new(g.surface_width, g.surface_height),
            theme.canvas,
        );
        painter.fill_rect(Point::new(g.left, g.top), Point::new(g.right, g.bottom), theme.board_fill);

        self.paint_grid(painter, g);

        painter.dashed_line(
            Point::new(g.center_x, g.top),
            Point::new(g.center_x, g.bottom),
            theme.board_outline,
            1.0,
            DASH_LENGTH,
            DASH_GAP,
        );
        painter.dashed_line(
            Point::new(g.left, g.center_y),
            Point::new(g.right, g.center_y),
            theme.board_outline,
            1.0,
            DASH_LENGTH,
            DASH_GAP,
        );

        painter.stroke_rect(
            Point::new(g.left, g.top),
            Point::new(g.right, g.bottom),
            theme.board_outline,
            OUTLINE_THICKNESS,
        );

        for (idx, &anchor) in g.sensors.iter().enumerate() {
            painter.fill_circle(anchor, SENSOR_RADIUS, theme.sensors[idx]);
            painter.stroke_circle(anchor, SENSOR_RADIUS, theme.text_primary, 1.0);
            painter.text(anchor, TextAnchor::Center, Color::WHITE, &(idx + 1).to_string());
        }

        for (idx, (&anchor, grams)) in g.sensors.iter().zip(frame.sample.weights()).enumerate() {
            let dx = if idx % 2 == 0 { -WEIGHT_LABEL_DX } else { WEIGHT_LABEL_DX };
            let dy = if idx < 2 { -WEIGHT_LABEL_DY } else { WEIGHT_LABEL_DY };
            painter.text(
                anchor.offset(dx, dy),
                TextAnchor::Center,
                theme.sensors[idx],
                &format!("{:.2} kg", grams_to_kg(grams)),
            );
        }

        painter.text(
            Point::new(g.center_x, g.top - 18.0),
            TextAnchor::TopCenter,
            theme.text_dim,
            &format_cm(frame.board.width_cm),
        );
        painter.text(
            Point::new(g.right + 24.0, g.center_y),
            TextAnchor::Center,
            theme.text_dim,
            &format_cm(frame.board.height_cm),
        );
        painter.text(Point::new(g.left, g.bottom + 12.0), TextAnchor::TopLeft, theme.text_dim, "Left");
        painter.text(Point::new(g.right, g.bottom + 12.0), TextAnchor::TopRight, theme.text_dim, "Right");

        // Newest point is under the cross
        if !frame.trail.is_empty() {
            let trail_len = frame.trail.capacity();
            let older = frame.trail.len() - 1;
            for (i, &point) in frame.trail.iter().take(older).enumerate() {
                let (color, radius) = trail_dot(i, trail_len, theme.canvas, theme.accent);
                painter.fill_circle(point, radius, color);
            }
        }

        let p = frame.position;
        painter.line(p.offset(-CROSS_SIZE, 0.0), p.offset(CROSS_SIZE, 0.0), theme.accent, CROSS_THICKNESS);
        painter.line(p.offset(0.0, -CROSS_SIZE), p.offset(0.0, CROSS_SIZE), theme.accent, CROSS_THICKNESS);
        painter.text(
            p.offset(0.0, -CROSS_SIZE - 4.0),
            TextAnchor::BottomCenter,
            theme.accent,
            "CoP",
        );
    }

    fn paint_grid(&self, painter: &mut impl Painter, g: &BoardGeometry) {
        for i in 1..g.columns {
            let x = g.left + i as f32 * g.cell_width;
            painter.line(Point::new(x, g.top), Point::new(x, g.bottom), self.theme.grid, 1.0);
        }
        for i in 1..g.rows {
            let y = g.top + i as f32 * g.cell_height;
            painter.line(Point::new(g.left, y), Point::new(g.right, y), self.theme.grid, 1.0);
        }
    }
}
