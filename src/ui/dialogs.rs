use rfd::FileDialog;
use std::path::PathBuf;

/// Supported file types for recorded sessions
pub const SESSION_FILE_FILTERS: &[(&str, &[&str])] = &[
    ("Session Files", &["json", "csv"]),
    ("JSON Files", &["json"]),
    ("CSV Files", &["csv"]),
    ("All Files", &["*"]),
];

/// File dialog helper
pub struct FileDialogs;

impl FileDialogs {
    /// Open a file dialog for selecting a recorded session
    pub fn open_session_file() -> Option<PathBuf> {
        SESSION_FILE_FILTERS
            .iter()
            .fold(FileDialog::new(), |dialog, (name, extensions)| {
                dialog.add_filter(*name, *extensions)
            })
            .set_title("Open Session")
            .pick_file()
    }
}
