use super::geometry::Point;
use super::theme::Color;

/// Which point of the text box a text position refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Center,
    TopCenter,
    BottomCenter,
    TopLeft,
    TopRight,
}

impl TextAnchor {
    /// Top-left corner of a `size` text box anchored at `pos`
    pub fn top_left(self, pos: Point, size: [f32; 2]) -> Point {
        let [w, h] = size;
        match self {
            TextAnchor::Center => pos.offset(-w / 2.0, -h / 2.0),
            TextAnchor::TopCenter => pos.offset(-w / 2.0, 0.0),
            TextAnchor::BottomCenter => pos.offset(-w / 2.0, -h),
            TextAnchor::TopLeft => pos,
            TextAnchor::TopRight => pos.offset(-w, 0.0),
        }
    }
}

/// Drawing primitives the frame renderer paints with.
///
/// Coordinates are surface pixels; implementations translate them to
/// wherever the surface lives.
pub trait Painter {
    fn fill_rect(&mut self, min: Point, max: Point, color: Color);

    fn stroke_rect(&mut self, min: Point, max: Point, color: Color, thickness: f32);

    fn line(&mut self, from: Point, to: Point, color: Color, thickness: f32);

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color);

    fn stroke_circle(&mut self, center: Point, radius: f32, color: Color, thickness: f32);

    fn text(&mut self, pos: Point, anchor: TextAnchor, color: Color, text: &str);

    /// Dashed line made of `dash`-long segments separated by `gap`
    fn dashed_line(&mut self, from: Point, to: Point, color: Color, thickness: f32, dash: f32, gap: f32) {
        let (dx, dy) = (to.x - from.x, to.y - from.y);
        let length = (dx * dx + dy * dy).sqrt();
        if length <= 0.0 {
            return;
        }
        if dash <= 0.0 || gap <= 0.0 {
            self.line(from, to, color, thickness);
            return;
        }

        let (ux, uy) = (dx / length, dy / length);
        let mut start = 0.0;
        while start < length {
            let end = (start + dash).min(length);
            self.line(
                from.offset(ux * start, uy * start),
                from.offset(ux * end, uy * end),
                color,
                thickness,
            );
            start += dash + gap;
        }
    }
}
