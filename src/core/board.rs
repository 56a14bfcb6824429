use serde::{Deserialize, Serialize};

/// Default physical board width in centimeters
pub const DEFAULT_BOARD_WIDTH_CM: f64 = 50.0;
/// Default physical board height in centimeters
pub const DEFAULT_BOARD_HEIGHT_CM: f64 = 30.0;

/// Display names of the four load cells, in sensor order
pub const SENSOR_LABELS: [&str; 4] = ["Top-Right", "Top-Left", "Bottom-Right", "Bottom-Left"];

/// Physical size of the sensing board
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoardDimensions {
    pub width_cm: f64,
    pub height_cm: f64,
}

impl BoardDimensions {
    pub const fn new(width_cm: f64, height_cm: f64) -> Self {
        Self { width_cm, height_cm }
    }

    /// Both sides positive and finite
    pub fn is_valid(&self) -> bool {
        self.width_cm.is_finite()
            && self.height_cm.is_finite()
            && self.width_cm > 0.0
            && self.height_cm > 0.0
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width_cm / self.height_cm
    }

    /// Keep valid dimensions, fall back to the defaults otherwise
    pub fn or_default(self) -> Self {
        if self.is_valid() {
            self
        } else {
            Self::default()
        }
    }
}

impl Default for BoardDimensions {
    fn default() -> Self {
        Self::new(DEFAULT_BOARD_WIDTH_CM, DEFAULT_BOARD_HEIGHT_CM)
    }
}

/// Format a board length for labels ("50 cm", "42.5 cm")
pub fn format_cm(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0} cm", value)
    } else {
        format!("{:.1} cm", value)
    }
}
