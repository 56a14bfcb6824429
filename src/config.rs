use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::core::BoardDimensions;
use crate::input::Source;
use crate::playback::{PlaybackConfig, DEFAULT_TRAIL_LEN};
use crate::render::theme::{self, Theme};

/// Longest trail accepted from settings or the command line
pub const MAX_TRAIL_LEN: usize = 240;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKind {
    #[default]
    Dark,
    Light,
}

impl ThemeKind {
    pub fn theme(self) -> &'static Theme {
        match self {
            ThemeKind::Dark => &theme::DARK,
            ThemeKind::Light => &theme::LIGHT,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeKind::Dark => ThemeKind::Light,
            ThemeKind::Light => ThemeKind::Dark,
        }
    }
}

/// Persistent application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub theme: ThemeKind,
    pub speed: f64,
    pub board_width_cm: f64,
    pub board_height_cm: f64,
    pub trail_len: usize,
}

impl Default for AppSettings {
    fn default() -> Self {
        let board = BoardDimensions::default();
        Self {
            theme: ThemeKind::Dark,
            speed: 1.0,
            board_width_cm: board.width_cm,
            board_height_cm: board.height_cm,
            trail_len: DEFAULT_TRAIL_LEN,
        }
    }
}

impl AppSettings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cop-replay").join("settings.json"))
    }

    /// Settings from the user config directory, defaults when missing or unreadable
    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(path).map(|contents| serde_json::from_str::<Self>(&contents)) {
            Ok(Ok(settings)) => {
                debug!("Loaded settings from {}", path.display());
                settings.sanitized()
            }
            Ok(Err(e)) => {
                warn!("Ignoring malformed settings file {}: {}", path.display(), e);
                Self::default()
            }
            Err(e) => {
                warn!("Cannot read settings file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        if let Some(path) = Self::config_path() {
            if let Err(e) = self.save_to(&path) {
                warn!("Failed to save settings to {}: {}", path.display(), e);
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Replace out-of-range values with their defaults
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let board = self.board();
        Self {
            theme: self.theme,
            speed: if self.speed.is_finite() && self.speed > 0.0 {
                self.speed
            } else {
                defaults.speed
            },
            board_width_cm: board.width_cm,
            board_height_cm: board.height_cm,
            trail_len: if (1..=MAX_TRAIL_LEN).contains(&self.trail_len) {
                self.trail_len
            } else {
                defaults.trail_len
            },
        }
    }

    pub fn board(&self) -> BoardDimensions {
        BoardDimensions::new(self.board_width_cm, self.board_height_cm).or_default()
    }

    pub fn playback_config(&self) -> PlaybackConfig {
        PlaybackConfig {
            speed: self.speed,
            trail_len: self.trail_len,
        }
    }
}

/// Replay recorded four-sensor balance sessions
#[derive(Debug, Parser)]
#[command(name = "cop-replay", version)]
#[command(about = "Replay recorded center-of-pressure sessions")]
pub struct Cli {
    /// Session file to open (JSON or CSV)
    pub path: Option<PathBuf>,

    /// Fetch the session from an HTTP endpoint instead of a file
    #[arg(long, conflicts_with = "path")]
    pub url: Option<String>,

    /// Physical board width in centimeters
    #[arg(long = "board-width-cm")]
    pub board_width_cm: Option<f64>,

    /// Physical board height in centimeters
    #[arg(long = "board-height-cm")]
    pub board_height_cm: Option<f64>,

    /// Number of recent positions drawn as the trail
    #[arg(long = "trail-len")]
    pub trail_len: Option<usize>,

    #[arg(long, value_enum)]
    pub theme: Option<ThemeKind>,
}

impl Cli {
    /// Session to load at startup, if any
    pub fn source(&self) -> Option<Source> {
        match (&self.path, &self.url) {
            (Some(path), _) => Some(Source::File(path.clone())),
            (None, Some(url)) => Some(Source::Url(url.clone())),
            (None, None) => None,
        }
    }

    /// Settings with the command line applied on top
    pub fn apply(&self, settings: AppSettings) -> AppSettings {
        AppSettings {
            theme: self.theme.unwrap_or(settings.theme),
            board_width_cm: self.board_width_cm.unwrap_or(settings.board_width_cm),
            board_height_cm: self.board_height_cm.unwrap_or(settings.board_height_cm),
            trail_len: self.trail_len.unwrap_or(settings.trail_len),
            ..settings
        }
        .sanitized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_settings_round_trip_through_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = AppSettings {
            theme: ThemeKind::Light,
            speed: 2.0,
            board_width_cm: 60.0,
            board_height_cm: 40.0,
            trail_len: 30,
        };
        settings.save_to(&path).unwrap();
        assert_eq!(AppSettings::load_from(&path), settings);
    }

    #[test]
    fn test_missing_or_malformed_settings_fall_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        assert_eq!(AppSettings::load_from(&path), AppSettings::default());

        fs::write(&path, "{ not json").unwrap();
        assert_eq!(AppSettings::load_from(&path), AppSettings::default());
    }

    #[test]
    fn test_partial_settings_use_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"theme": "light", "trail_len": 0, "speed": -3}"#).unwrap();

        let settings = AppSettings::load_from(&path);
        assert_eq!(settings.theme, ThemeKind::Light);
        assert_eq!(settings.trail_len, DEFAULT_TRAIL_LEN);
        assert_eq!(settings.speed, 1.0);
        assert_eq!(settings.board(), BoardDimensions::default());
    }

    #[test]
    fn test_cli_overrides_settings() {
        let cli = Cli::parse_from([
            "cop-replay",
            "--board-width-cm",
            "40",
            "--trail-len",
            "20",
            "--theme",
            "light",
            "session.json",
        ]);
        let settings = cli.apply(AppSettings::default());
        assert_eq!(settings.board(), BoardDimensions::new(40.0, 30.0));
        assert_eq!(settings.trail_len, 20);
        assert_eq!(settings.theme, ThemeKind::Light);
        assert!(matches!(cli.source(), Some(Source::File(path)) if path == PathBuf::from("session.json")));
    }

    #[test]
    fn test_cli_url_source() {
        let cli = Cli::parse_from(["cop-replay", "--url", "http://localhost:5000/api/session/3/samples"]);
        assert!(matches!(cli.source(), Some(Source::Url(_))));
        assert!(Cli::try_parse_from(["cop-replay", "a.json", "--url", "http://x"]).is_err());
    }

    #[test]
    fn test_theme_toggle() {
        assert_eq!(ThemeKind::Dark.toggled(), ThemeKind::Light);
        assert_eq!(ThemeKind::Light.theme().name, "light");
    }
}
