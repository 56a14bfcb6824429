use imgui::{DrawListMut, Ui};

use crate::render::{Color, Painter, Point, TextAnchor};

/// Paints onto the current imgui window's draw list.
///
/// Surface coordinates are relative to `origin`, the screen position of the
/// canvas' top-left corner.
pub struct ImguiPainter<'ui> {
    ui: &'ui Ui,
    draw_list: DrawListMut<'ui>,
    origin: [f32; 2],
}

impl<'ui> ImguiPainter<'ui> {
    pub fn new(ui: &'ui Ui, origin: [f32; 2]) -> Self {
        Self {
            ui,
            draw_list: ui.get_window_draw_list(),
            origin,
        }
    }

    fn screen(&self, point: Point) -> [f32; 2] {
        [self.origin[0] + point.x, self.origin[1] + point.y]
    }
}

impl Painter for ImguiPainter<'_> {
    fn fill_rect(&mut self, min: Point, max: Point, color: Color) {
        self.draw_list
            .add_rect(self.screen(min), self.screen(max), color.to_rgba(1.0))
            .filled(true)
            .build();
    }

    fn stroke_rect(&mut self, min: Point, max: Point, color: Color, thickness: f32) {
        self.draw_list
            .add_rect(self.screen(min), self.screen(max), color.to_rgba(1.0))
            .thickness(thickness)
            .build();
    }

    fn line(&mut self, from: Point, to: Point, color: Color, thickness: f32) {
        self.draw_list
            .add_line(self.screen(from), self.screen(to), color.to_rgba(1.0))
            .thickness(thickness)
            .build();
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color) {
        self.draw_list
            .add_circle(self.screen(center), radius, color.to_rgba(1.0))
            .filled(true)
            .build();
    }

    fn stroke_circle(&mut self, center: Point, radius: f32, color: Color, thickness: f32) {
        self.draw_list
            .add_circle(self.screen(center), radius, color.to_rgba(1.0))
            .thickness(thickness)
            .build();
    }

    fn text(&mut self, pos: Point, anchor: TextAnchor, color: Color, text: &str) {
        let size = self.ui.calc_text_size(text);
        let top_left = anchor.top_left(pos, size);
        self.draw_list
            .add_text(self.screen(top_left), color.to_rgba(1.0), text);
    }
}
