use imgui::{Condition, Ui};
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Keyboard shortcut manager
pub struct ShortcutManager {
    shortcuts: Vec<Shortcut>,
}

#[derive(Clone)]
pub struct Shortcut {
    pub key: PhysicalKey,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub action: ShortcutAction,
    pub description: &'static str,
    /// Listed in the help window; aliases of another binding are not
    pub listed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    OpenFile,
    TogglePlay,
    SeekStart,
    Stop,
    StepForward,
    StepBackward,
    SpeedUp,
    SpeedDown,
    ToggleTheme,
    ShowShortcuts,
    Quit,
}

impl ShortcutAction {
    fn category(self) -> &'static str {
        match self {
            ShortcutAction::OpenFile => "File",
            ShortcutAction::TogglePlay
            | ShortcutAction::SeekStart
            | ShortcutAction::Stop
            | ShortcutAction::StepForward
            | ShortcutAction::StepBackward
            | ShortcutAction::SpeedUp
            | ShortcutAction::SpeedDown => "Playback",
            ShortcutAction::ToggleTheme | ShortcutAction::ShowShortcuts => "View",
            ShortcutAction::Quit => "General",
        }
    }
}

impl ShortcutManager {
    pub fn new() -> Self {
        let mut manager = Self {
            shortcuts: Vec::new(),
        };
        manager.register_defaults();
        manager
    }

    fn register_defaults(&mut self) {
        use ShortcutAction::*;

        self.bind(KeyCode::KeyO, true, false, OpenFile, "Open session");

        self.bind(KeyCode::Space, false, false, TogglePlay, "Play/Pause");
        self.bind(KeyCode::Home, false, false, SeekStart, "Jump to start");
        self.bind(KeyCode::Escape, false, false, Stop, "Stop");
        self.bind(KeyCode::ArrowRight, false, false, StepForward, "Next frame");
        self.bind(KeyCode::ArrowLeft, false, false, StepBackward, "Previous frame");
        self.bind(KeyCode::Equal, false, false, SpeedUp, "Faster");
        self.alias(KeyCode::Equal, true, SpeedUp);
        self.alias(KeyCode::NumpadAdd, false, SpeedUp);
        self.bind(KeyCode::Minus, false, false, SpeedDown, "Slower");
        self.alias(KeyCode::NumpadSubtract, false, SpeedDown);

        self.bind(KeyCode::KeyT, false, false, ToggleTheme, "Toggle dark/light theme");
        self.bind(KeyCode::F1, false, false, ShowShortcuts, "Show this help");

        self.bind(KeyCode::KeyQ, true, false, Quit, "Quit");
    }

    fn bind(&mut self, code: KeyCode, ctrl: bool, shift: bool, action: ShortcutAction, description: &'static str) {
        self.shortcuts.push(Shortcut {
            key: PhysicalKey::Code(code),
            ctrl,
            shift,
            alt: false,
            action,
            description,
            listed: true,
        });
    }

    fn alias(&mut self, code: KeyCode, shift: bool, action: ShortcutAction) {
        self.shortcuts.push(Shortcut {
            key: PhysicalKey::Code(code),
            ctrl: false,
            shift,
            alt: false,
            action,
            description: "",
            listed: false,
        });
    }

    /// Process a key event and return the matching action (if any)
    pub fn process_event(&self, event: &KeyEvent, ctrl: bool, shift: bool, alt: bool) -> Option<ShortcutAction> {
        if event.state != ElementState::Pressed {
            return None;
        }
        self.lookup(event.physical_key, ctrl, shift, alt)
    }

    /// Action bound to a key and modifier combination
    pub fn lookup(&self, key: PhysicalKey, ctrl: bool, shift: bool, alt: bool) -> Option<ShortcutAction> {
        self.shortcuts
            .iter()
            .find(|s| s.key == key && s.ctrl == ctrl && s.shift == shift && s.alt == alt)
            .map(|s| s.action)
    }

    /// Render a shortcuts help window
    pub fn render_help(&self, ui: &Ui, is_open: &mut bool) {
        ui.window("Keyboard Shortcuts")
            .size([320.0, 340.0], Condition::FirstUseEver)
            .position([500.0, 200.0], Condition::FirstUseEver)
            .opened(is_open)
            .build(|| {
                let mut current_category = "";

                for shortcut in self.shortcuts.iter().filter(|s| s.listed) {
                    let category = shortcut.action.category();
                    if category != current_category {
                        if !current_category.is_empty() {
                            ui.separator();
                        }
                        ui.text(category);
                        current_category = category;
                    }

                    let mut combo = String::new();
                    if shortcut.ctrl {
                        combo.push_str("Ctrl+");
                    }
                    if shortcut.shift {
                        combo.push_str("Shift+");
                    }
                    combo.push_str(&key_to_string(shortcut.key));

                    ui.text(format!("  {:10} - {}", combo, shortcut.description));
                }
            });
    }
}

fn key_to_string(key: PhysicalKey) -> String {
    match key {
        PhysicalKey::Code(code) => match code {
            KeyCode::Space => "Space".to_string(),
            KeyCode::Escape => "Esc".to_string(),
            KeyCode::Home => "Home".to_string(),
            KeyCode::ArrowLeft => "Left".to_string(),
            KeyCode::ArrowRight => "Right".to_string(),
            KeyCode::Equal => "+".to_string(),
            KeyCode::Minus => "-".to_string(),
            KeyCode::F1 => "F1".to_string(),
            KeyCode::KeyO => "O".to_string(),
            KeyCode::KeyQ => "Q".to_string(),
            KeyCode::KeyT => "T".to_string(),
            _ => format!("{:?}", code),
        },
        _ => "?".to_string(),
    }
}

impl Default for ShortcutManager {
    fn default() -> Self {
        Self::new()
    }
}

/// About dialog
pub struct AboutDialog {
    show: bool,
}

impl AboutDialog {
    pub fn new() -> Self {
        Self { show: false }
    }

    pub fn show(&mut self) {
        self.show = true;
    }

    pub fn render(&mut self, ui: &Ui) {
        if !self.show {
            return;
        }

        ui.window("About CoP Replay")
            .size([380.0, 240.0], Condition::FirstUseEver)
            .build(|| {
                ui.text("CoP Replay");
                ui.text_colored([0.7, 0.7, 0.7, 1.0], format!("Version {}", env!("CARGO_PKG_VERSION")));
                ui.separator();
                ui.text("Replays recorded four-sensor balance sessions");
                ui.text("and draws the center of pressure over the board.");
                ui.separator();
                ui.bullet_text("JSON, CSV or HTTP session sources");
                ui.bullet_text("Recorded-pace playback at 0.25x to 4x");
                ui.bullet_text("Fading center-of-pressure trail");
                ui.separator();
                if ui.button("Close") {
                    self.show = false;
                }
            });
    }
}

impl Default for AboutDialog {
    fn default() -> Self {
        Self::new()
    }
}
