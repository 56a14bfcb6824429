use imgui::{Condition, StyleColor, Ui, WindowFlags};
use tracing::{trace, warn};

use crate::core::{Session, SENSOR_LABELS};
use crate::playback::engine::TickOutcome;
use crate::playback::{Clock, PlaybackEngine, ALLOWED_SPEEDS};
use crate::render::{FrameRenderer, Painter, Theme};
use super::ImguiPainter;

const READOUT_PANEL_WIDTH: f32 = 200.0;
const CONTROL_BAR_HEIGHT: f32 = 44.0;

/// Requests the replay window hands back to the application
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReplayAction {
    None,
    OpenFile,
}

/// Main replay view: session header, readouts, board canvas and controls
pub struct ReplayWindow;

impl ReplayWindow {
    pub fn new() -> Self {
        Self
    }

    /// Render the replay view below the main menu bar
    pub fn render<C: Clock>(
        &mut self,
        ui: &Ui,
        engine: &mut PlaybackEngine<C>,
        session: Option<&Session>,
        theme: &Theme,
        status: Option<&str>,
    ) -> ReplayAction {
        let mut action = ReplayAction::None;

        let top = ui.frame_height();
        let [display_w, display_h] = ui.io().display_size;

        let _bg = ui.push_style_color(StyleColor::WindowBg, theme.background.to_rgba(1.0));
        let _child_bg = ui.push_style_color(StyleColor::ChildBg, theme.panel.to_rgba(1.0));
        let _text = ui.push_style_color(StyleColor::Text, theme.text_primary.to_rgba(1.0));

        ui.window("Replay")
            .position([0.0, top], Condition::Always)
            .size([display_w, (display_h - top).max(0.0)], Condition::Always)
            .flags(
                WindowFlags::NO_DECORATION
                    | WindowFlags::NO_MOVE
                    | WindowFlags::NO_RESIZE
                    | WindowFlags::NO_BRING_TO_FRONT_ON_FOCUS
                    | WindowFlags::NO_SAVED_SETTINGS,
            )
            .build(|| {
                self.render_header(ui, session, theme, status);

                ui.child_window("Readouts")
                    .size([READOUT_PANEL_WIDTH, -CONTROL_BAR_HEIGHT])
                    .border(true)
                    .build(|| self.render_readouts(ui, engine, theme));

                ui.same_line();

                {
                    let _canvas_bg =
                        ui.push_style_color(StyleColor::ChildBg, theme.canvas.to_rgba(1.0));
                    ui.child_window("Board")
                        .size([0.0, -CONTROL_BAR_HEIGHT])
                        .border(false)
                        .build(|| self.render_canvas(ui, engine, theme));
                }

                if self.render_controls(ui, engine, theme) {
                    action = ReplayAction::OpenFile;
                }
            });

        action
    }

    fn render_header(&self, ui: &Ui, session: Option<&Session>, theme: &Theme, status: Option<&str>) {
        match session {
            Some(session) => {
                ui.text(session.title());
                let summary = session.summary();
                if !summary.is_empty() {
                    ui.same_line();
                    ui.text_colored(theme.text_secondary.to_rgba(1.0), summary);
                }
            }
            None => ui.text_colored(
                theme.text_secondary.to_rgba(1.0),
                "No session loaded (File > Open...)",
            ),
        }

        if let Some(status) = status {
            ui.same_line();
            ui.text_colored(theme.text_dim.to_rgba(1.0), format!("  {}", status));
        }
    }

    fn render_readouts<C: Clock>(&self, ui: &Ui, engine: &PlaybackEngine<C>, theme: &Theme) {
        let readout = engine.readout();

        for (idx, label) in SENSOR_LABELS.iter().enumerate() {
            ui.text_colored(theme.sensors[idx].to_rgba(1.0), format!("{} {}", idx + 1, label));
            ui.text(readout.sensor_label(idx));
            ui.spacing();
        }

        ui.separator();
        ui.text_colored(theme.text_secondary.to_rgba(1.0), "Total");
        ui.text_colored(theme.highlight.to_rgba(1.0), readout.total_label());

        ui.spacing();
        ui.text_colored(theme.text_secondary.to_rgba(1.0), "Center of pressure");
        ui.text_colored(theme.coordinates.to_rgba(1.0), readout.coordinates_label());

        ui.spacing();
        ui.text_colored(theme.text_secondary.to_rgba(1.0), "Time");
        ui.text(readout.time_label());

        ui.spacing();
        ui.text_colored(theme.text_secondary.to_rgba(1.0), "Frame");
        ui.text(readout.frame_label());
    }

    fn render_canvas<C: Clock>(&self, ui: &Ui, engine: &mut PlaybackEngine<C>, theme: &Theme) {
        let size = ui.content_region_avail();
        let origin = ui.cursor_screen_pos();
        let renderer = FrameRenderer::new(theme);
        {
            let mut painter = ImguiPainter::new(ui, origin);
            drive_canvas(engine, &renderer, &mut painter, size);
        }
        ui.dummy(size);
    }

    /// Returns true when the open button was pressed
    fn render_controls<C: Clock>(&self, ui: &Ui, engine: &mut PlaybackEngine<C>, theme: &Theme) -> bool {
        let mut open_requested = false;
        ui.spacing();

        let empty = engine.is_empty();
        let _disabled = if empty {
            Some(ui.begin_disabled(true))
        } else {
            None
        };

        let (label, color) = if engine.is_playing() {
            ("PAUSE", theme.pause)
        } else {
            ("PLAY", theme.play)
        };
        {
            let _button = ui.push_style_color(StyleColor::Button, color.to_rgba(1.0));
            if ui.button_with_size(label, [72.0, 0.0]) {
                engine.toggle_play();
            }
        }

        ui.same_line();
        if ui.button("START") {
            engine.seek(0);
        }

        for speed in ALLOWED_SPEEDS {
            ui.same_line();
            let active = (engine.speed() - speed).abs() < f64::EPSILON;
            let _highlight = if active {
                Some(ui.push_style_color(StyleColor::Button, theme.highlight.to_rgba(1.0)))
            } else {
                None
            };
            if ui.small_button(format!("{}x", speed)) {
                if let Err(e) = engine.set_speed(speed) {
                    warn!("Speed preset not applied: {}", e);
                }
            }
        }

        ui.same_line();
        let last = engine.total_samples().saturating_sub(1);
        // Follows the frame on screen, which lags the playback index by one
        let mut index = engine.shown_index().unwrap_or(0).min(last) as i32;
        ui.set_next_item_width(-90.0);
        if ui
            .slider_config("##timeline", 0, last as i32)
            .display_format("")
            .build(&mut index)
        {
            engine.on_slider_change(index.max(0) as usize);
        }

        drop(_disabled);

        ui.same_line();
        if ui.button_with_size("Open...", [-1.0, 0.0]) {
            open_requested = true;
        }

        open_requested
    }
}

impl Default for ReplayWindow {
    fn default() -> Self {
        Self::new()
    }
}

/// Refit the board to the canvas, advance playback, then paint the shown
/// frame. An empty session leaves the canvas to the window background.
fn drive_canvas<C: Clock>(
    engine: &mut PlaybackEngine<C>,
    renderer: &FrameRenderer<'_>,
    painter: &mut impl Painter,
    size: [f32; 2],
) {
    // Refit first so a tick never maps a point with the previous geometry
    engine.resize(size[0], size[1]);
    if let TickOutcome::Advanced { painted } = engine.tick() {
        trace!("Advanced past frame {}", painted);
    }

    if engine.is_empty() {
        return;
    }
    match engine.snapshot() {
        Some(frame) => renderer.paint(painter, &frame),
        None => renderer.paint_empty(painter, size[0], size[1]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BoardDimensions, Sample};
    use crate::playback::PlaybackConfig;
    use crate::render::painter::recording::RecordingPainter;
    use crate::render::theme::DARK;

    fn engine_with(count: usize) -> PlaybackEngine {
        // Equal timestamps make every frame due immediately
        let samples = (0..count)
            .map(|i| Sample::new(0.0, [1000.0, 1000.0, 1000.0, 1000.0], 0.1 * i as f64, -0.1 * i as f64))
            .collect();
        PlaybackEngine::new(samples, BoardDimensions::default(), PlaybackConfig::default())
    }

    #[test]
    fn test_empty_session_is_never_painted() {
        let mut engine = engine_with(0);
        let renderer = FrameRenderer::new(&DARK);
        let mut painter = RecordingPainter::default();

        drive_canvas(&mut engine, &renderer, &mut painter, [800.0, 600.0]);
        drive_canvas(&mut engine, &renderer, &mut painter, [40.0, 40.0]);
        assert!(painter.ops.is_empty());
    }

    #[test]
    fn test_loaded_session_is_painted() {
        let mut engine = engine_with(2);
        let renderer = FrameRenderer::new(&DARK);
        let mut painter = RecordingPainter::default();

        drive_canvas(&mut engine, &renderer, &mut painter, [800.0, 600.0]);
        assert_eq!(painter.texts().last(), Some(&"CoP"));
    }

    #[test]
    fn test_tick_after_resize_uses_new_surface() {
        let mut engine = engine_with(3);
        let renderer = FrameRenderer::new(&DARK);
        let mut painter = RecordingPainter::default();

        drive_canvas(&mut engine, &renderer, &mut painter, [800.0, 600.0]);
        engine.play();
        drive_canvas(&mut engine, &renderer, &mut painter, [1200.0, 900.0]);

        let frame = engine.snapshot().unwrap();
        assert_eq!(frame.geometry.surface_width, 1200.0);
        let newest = *frame.trail.iter().next_back().unwrap();
        assert_eq!(newest, frame.position);
        assert_eq!(newest, frame.geometry.center_of_pressure(frame.sample));
    }
}
