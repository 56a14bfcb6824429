use serde::{Deserialize, Serialize};

/// Combined load (grams) at or below which the board is considered empty
pub const NOISE_FLOOR_GRAMS: f64 = 1.0;

/// One recorded reading of the four load cells
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Milliseconds since the session started
    #[serde(alias = "t_ms")]
    pub t: f64,

    /// Sensor 1 (top-right), grams
    pub w0: f64,
    /// Sensor 2 (top-left), grams
    pub w1: f64,
    /// Sensor 3 (bottom-right), grams
    pub w2: f64,
    /// Sensor 4 (bottom-left), grams
    pub w3: f64,

    /// Normalized horizontal offset from the board center, nominally [-1, 1]
    #[serde(alias = "com_x")]
    pub cx: f64,
    /// Normalized vertical offset from the board center, nominally [-1, 1]
    #[serde(alias = "com_y")]
    pub cy: f64,
}

/// Whether a reading carries enough load to locate a center of pressure
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadCondition {
    /// Total at or below [`NOISE_FLOOR_GRAMS`]
    Unloaded,
    Loaded { total_grams: f64 },
}

impl Sample {
    pub fn new(t: f64, weights: [f64; 4], cx: f64, cy: f64) -> Self {
        Self {
            t,
            w0: weights[0],
            w1: weights[1],
            w2: weights[2],
            w3: weights[3],
            cx,
            cy,
        }
    }

    /// Sensor readings in sensor order
    pub fn weights(&self) -> [f64; 4] {
        [self.w0, self.w1, self.w2, self.w3]
    }

    /// Sum of the four readings in grams
    pub fn total_weight(&self) -> f64 {
        self.weights().iter().sum()
    }

    pub fn load(&self) -> LoadCondition {
        let total = self.total_weight();
        // NaN totals fall through to Unloaded as well
        if total > NOISE_FLOOR_GRAMS {
            LoadCondition::Loaded { total_grams: total }
        } else {
            LoadCondition::Unloaded
        }
    }

    /// Timestamp in seconds
    pub fn elapsed_secs(&self) -> f64 {
        self.t / 1000.0
    }
}

pub fn grams_to_kg(grams: f64) -> f64 {
    grams / 1000.0
}
