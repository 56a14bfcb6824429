mod config;
mod core;
mod input;
mod playback;
mod render;
mod ui;

use anyhow::anyhow;
use clap::Parser;
use imgui::{Context, FontConfig, FontSource};
use imgui_winit_support::{HiDpiMode, WinitPlatform};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use winit::event::{Event, WindowEvent};
use winit::event_loop::EventLoop;
use winit::keyboard::ModifiersState;
use winit::window::WindowBuilder;

use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin_winit::{DisplayBuilder, GlWindow};
use glow::HasContext;
use raw_window_handle::HasRawWindowHandle;

use std::sync::mpsc::{channel, Receiver};
use std::time::{Duration, Instant};

use config::{AppSettings, Cli, ThemeKind};
use crate::core::Session;
use input::Source;
use playback::PlaybackEngine;
use ui::{AboutDialog, FileDialogs, ReplayAction, ReplayWindow, ShortcutAction, ShortcutManager};

const SETTINGS_SAVE_INTERVAL: Duration = Duration::from_secs(30);

/// Messages from the loader thread
enum LoadingUpdate {
    Complete(Session),
    Error(String),
}

struct AppState {
    engine: PlaybackEngine,
    session: Option<Session>,
    settings: AppSettings,
    replay_window: ReplayWindow,
    shortcuts: ShortcutManager,
    about_dialog: AboutDialog,
    show_shortcuts: bool,
    show_file_open_pending: bool,
    status_message: Option<String>,
    loading_receiver: Option<Receiver<LoadingUpdate>>,
    modifiers: ModifiersState,
    /// Theme the imgui style was last switched to
    applied_theme: Option<ThemeKind>,
}

impl AppState {
    fn new(settings: AppSettings) -> Self {
        Self {
            engine: PlaybackEngine::new(Vec::new(), settings.board(), settings.playback_config()),
            session: None,
            settings,
            replay_window: ReplayWindow::new(),
            shortcuts: ShortcutManager::new(),
            about_dialog: AboutDialog::new(),
            show_shortcuts: false,
            show_file_open_pending: false,
            status_message: None,
            loading_receiver: None,
            modifiers: ModifiersState::empty(),
            applied_theme: None,
        }
    }

    fn is_loading(&self) -> bool {
        self.loading_receiver.is_some()
    }

    fn save_settings(&mut self) {
        self.settings.speed = self.engine.speed();
        self.settings.save();
    }

    /// Read the session on a worker thread
    fn start_loading(&mut self, source: Source) {
        info!("Loading session from {}", source.describe());
        self.status_message = Some(format!("Loading {}...", source.describe()));

        let (tx, rx) = channel();
        self.loading_receiver = Some(rx);

        std::thread::spawn(move || {
            let update = match input::load(&source) {
                Ok(session) => LoadingUpdate::Complete(session),
                Err(e) => LoadingUpdate::Error(e.to_string()),
            };
            let _ = tx.send(update);
        });
    }

    /// Process loading updates from background thread
    fn process_loading(&mut self) {
        let Some(receiver) = self.loading_receiver.take() else {
            return;
        };

        match receiver.try_recv() {
            Ok(LoadingUpdate::Complete(session)) => self.finish_loading(session),
            Ok(LoadingUpdate::Error(e)) => {
                error!("Failed to load session: {}", e);
                self.status_message = Some(format!("Failed to load session: {}", e));
            }
            Err(std::sync::mpsc::TryRecvError::Empty) => self.loading_receiver = Some(receiver),
            Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                self.status_message = Some("Loader stopped unexpectedly".to_string());
            }
        }
    }

    fn finish_loading(&mut self, session: Session) {
        let board = session.board(self.settings.board());
        let mut config = self.settings.playback_config();
        config.speed = self.engine.speed();

        self.engine = PlaybackEngine::new(session.samples.clone(), board, config);
        self.status_message = Some(if session.samples.is_empty() {
            "Session has no samples".to_string()
        } else {
            format!("Loaded {} samples", session.samples.len())
        });
        self.session = Some(session);
    }

    fn process_file_dialogs(&mut self) {
        if self.show_file_open_pending {
            self.show_file_open_pending = false;
            if let Some(path) = FileDialogs::open_session_file() {
                self.start_loading(Source::File(path));
            }
        }
    }

    /// Apply a keyboard shortcut; returns true when the app should quit
    fn apply_shortcut(&mut self, action: ShortcutAction) -> bool {
        match action {
            ShortcutAction::OpenFile => self.show_file_open_pending = true,
            ShortcutAction::TogglePlay => self.engine.toggle_play(),
            ShortcutAction::SeekStart => self.engine.seek(0),
            ShortcutAction::Stop => self.engine.stop(),
            ShortcutAction::StepForward => self.engine.step_forward(),
            ShortcutAction::StepBackward => self.engine.step_back(),
            ShortcutAction::SpeedUp => self.engine.speed_up(),
            ShortcutAction::SpeedDown => self.engine.speed_down(),
            ShortcutAction::ToggleTheme => self.settings.theme = self.settings.theme.toggled(),
            ShortcutAction::ShowShortcuts => self.show_shortcuts = true,
            ShortcutAction::Quit => return true,
        }
        false
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let settings = cli.apply(AppSettings::load());

    let event_loop = EventLoop::new().map_err(|e| anyhow!("failed to create event loop: {e}"))?;

    // Build the window and GL display using glutin-winit
    let (window, gl_config) = DisplayBuilder::new()
        .with_window_builder(Some(
            WindowBuilder::new()
                .with_title("CoP Replay")
                .with_inner_size(winit::dpi::LogicalSize::new(1200.0, 800.0)),
        ))
        .build(&event_loop, glutin::config::ConfigTemplateBuilder::new(), |mut iter| {
            iter.next().expect("no GL config available")
        })
        .map_err(|e| anyhow!("failed to create window and display: {e}"))?;

    let window = window.ok_or_else(|| anyhow!("failed to create window"))?;
    let gl_display = gl_config.display();

    let context = unsafe {
        gl_display.create_context(
            &gl_config,
            &glutin::context::ContextAttributesBuilder::new()
                .build(Some(window.raw_window_handle())),
        )
    }
    .map_err(|e| anyhow!("failed to create GL context: {e}"))?;

    let attrs = window.build_surface_attributes(
        glutin::surface::SurfaceAttributesBuilder::<glutin::surface::WindowSurface>::new(),
    );

    let surface = unsafe { gl_display.create_window_surface(&gl_config, &attrs) }
        .map_err(|e| anyhow!("failed to create surface: {e}"))?;

    let context = context
        .make_current(&surface)
        .map_err(|e| anyhow!("failed to make context current: {e}"))?;

    // Create glow context for renderer
    let gl = unsafe {
        glow::Context::from_loader_function(|ptr| {
            let name = std::ffi::CString::new(ptr).expect("GL symbol name contains NUL");
            gl_display.get_proc_address(&name) as *const _
        })
    };

    let mut imgui = Context::create();
    imgui.set_log_filename(None::<std::path::PathBuf>);

    let ini_path = dirs::config_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("cop-replay")
        .join("layout.ini");
    if let Some(parent) = ini_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    imgui.set_ini_filename(Some(ini_path));

    let hidpi_factor = window.scale_factor();
    let font_size = (14.0 * hidpi_factor) as f32;
    imgui.fonts().add_font(&[FontSource::DefaultFontData {
        config: Some(FontConfig {
            size_pixels: font_size,
            ..FontConfig::default()
        }),
    }]);
    imgui.io_mut().font_global_scale = (1.0 / hidpi_factor) as f32;

    let mut platform = WinitPlatform::init(&mut imgui);
    platform.attach_window(imgui.io_mut(), &window, HiDpiMode::Default);

    let mut renderer = imgui_glow_renderer::AutoRenderer::initialize(gl, &mut imgui)
        .map_err(|e| anyhow!("failed to initialize renderer: {e}"))?;

    // Second glow context over the same GL context, used for clearing
    let gl_clear = unsafe {
        glow::Context::from_loader_function(|ptr| {
            let name = std::ffi::CString::new(ptr).expect("GL symbol name contains NUL");
            gl_display.get_proc_address(&name) as *const _
        })
    };

    let mut state = AppState::new(settings);
    if let Some(source) = cli.source() {
        state.start_loading(source);
    }

    let mut last_frame_time = Instant::now();
    let mut last_settings_save = Instant::now();

    event_loop
        .run(move |event, window_target| {
            match &event {
                Event::NewEvents(_) => {
                    let now = Instant::now();
                    imgui.io_mut().update_delta_time(now - last_frame_time);
                    last_frame_time = now;
                }
                Event::AboutToWait => {
                    state.process_file_dialogs();
                    state.process_loading();

                    if state.applied_theme != Some(state.settings.theme) {
                        match state.settings.theme {
                            ThemeKind::Dark => imgui.style_mut().use_dark_colors(),
                            ThemeKind::Light => imgui.style_mut().use_light_colors(),
                        };
                        state.applied_theme = Some(state.settings.theme);
                    }

                    if last_settings_save.elapsed() >= SETTINGS_SAVE_INTERVAL {
                        state.save_settings();
                        last_settings_save = Instant::now();
                    }

                    if let Err(e) = platform.prepare_frame(imgui.io_mut(), &window) {
                        error!("Failed to prepare frame: {}", e);
                    }
                    window.request_redraw();
                }
                Event::WindowEvent { event: WindowEvent::ModifiersChanged(modifiers), .. } => {
                    state.modifiers = modifiers.state();
                }
                Event::WindowEvent { event: WindowEvent::KeyboardInput { event: key_event, .. }, .. } => {
                    if !imgui.io().want_capture_keyboard {
                        let mods = state.modifiers;
                        let action = state.shortcuts.process_event(
                            key_event,
                            mods.control_key(),
                            mods.shift_key(),
                            mods.alt_key(),
                        );
                        if let Some(action) = action {
                            if state.apply_shortcut(action) {
                                state.save_settings();
                                window_target.exit();
                            }
                        }
                    }
                }
                Event::WindowEvent { event: WindowEvent::RedrawRequested, .. } => {
                    let ui = imgui.new_frame();
                    let mut quit = false;

                    ui.main_menu_bar(|| {
                        ui.menu("File", || {
                            if ui.menu_item_config("Open...").shortcut("Ctrl+O").build() {
                                state.show_file_open_pending = true;
                            }
                            ui.separator();
                            if ui.menu_item_config("Exit").shortcut("Ctrl+Q").build() {
                                quit = true;
                            }
                        });

                        ui.menu("Playback", || {
                            let label = if state.engine.is_playing() { "Pause" } else { "Play" };
                            if ui.menu_item_config(label).shortcut("Space").build() {
                                state.engine.toggle_play();
                            }
                            if ui.menu_item_config("Stop").shortcut("Esc").build() {
                                state.engine.stop();
                            }
                            if ui.menu_item_config("Jump to start").shortcut("Home").build() {
                                state.engine.seek(0);
                            }
                            ui.separator();
                            if ui.menu_item_config("Faster").shortcut("+").build() {
                                state.engine.speed_up();
                            }
                            if ui.menu_item_config("Slower").shortcut("-").build() {
                                state.engine.speed_down();
                            }
                            ui.text(format!("Speed: {}x", state.engine.speed()));
                        });

                        ui.menu("View", || {
                            ui.menu("Theme", || {
                                for (kind, name) in [(ThemeKind::Dark, "Dark"), (ThemeKind::Light, "Light")] {
                                    if ui
                                        .menu_item_config(name)
                                        .selected(state.settings.theme == kind)
                                        .build()
                                    {
                                        state.settings.theme = kind;
                                    }
                                }
                            });
                            ui.separator();
                            let mut trail_len = state.settings.trail_len as i32;
                            if ui.slider("Trail length", 1, config::MAX_TRAIL_LEN as i32, &mut trail_len) {
                                state.settings.trail_len = trail_len.max(1) as usize;
                                state.engine.set_trail_len(state.settings.trail_len);
                            }
                        });

                        ui.menu("Help", || {
                            if ui.menu_item_config("Keyboard Shortcuts").shortcut("F1").build() {
                                state.show_shortcuts = true;
                            }
                            ui.separator();
                            if ui.menu_item("About CoP Replay") {
                                state.about_dialog.show();
                            }
                        });
                    });

                    let status = if state.is_loading() {
                        Some("Loading...")
                    } else {
                        state.status_message.as_deref()
                    };
                    let theme = state.settings.theme.theme();
                    let action = state.replay_window.render(
                        ui,
                        &mut state.engine,
                        state.session.as_ref(),
                        theme,
                        status,
                    );
                    if action == ReplayAction::OpenFile {
                        state.show_file_open_pending = true;
                    }

                    if state.show_shortcuts {
                        state.shortcuts.render_help(ui, &mut state.show_shortcuts);
                    }
                    state.about_dialog.render(ui);

                    platform.prepare_render(ui, &window);
                    let draw_data = imgui.render();

                    let [r, g, b, a] = theme.background.to_rgba(1.0);
                    unsafe {
                        gl_clear.clear_color(r, g, b, a);
                        gl_clear.clear(glow::COLOR_BUFFER_BIT);
                    }

                    if let Err(e) = renderer.render(draw_data) {
                        error!("Rendering failed: {}", e);
                    }
                    if let Err(e) = surface.swap_buffers(&context) {
                        error!("Failed to swap buffers: {}", e);
                    }

                    if quit {
                        state.save_settings();
                        window_target.exit();
                    }
                }
                Event::WindowEvent { event: WindowEvent::Resized(size), .. } => {
                    if let (Some(width), Some(height)) = (
                        std::num::NonZeroU32::new(size.width),
                        std::num::NonZeroU32::new(size.height),
                    ) {
                        surface.resize(&context, width, height);
                    }
                }
                Event::WindowEvent { event: WindowEvent::CloseRequested, .. } => {
                    state.save_settings();
                    window_target.exit();
                }
                _ => {}
            }

            platform.handle_event(imgui.io_mut(), &window, &event);
        })
        .map_err(|e| anyhow!("event loop error: {e}"))
}
