pub mod dialogs;
pub mod imgui_painter;
pub mod replay_window;
pub mod shortcuts;

pub use dialogs::FileDialogs;
pub use imgui_painter::ImguiPainter;
pub use replay_window::{ReplayAction, ReplayWindow};
pub use shortcuts::{AboutDialog, ShortcutAction, ShortcutManager};
