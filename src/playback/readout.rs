use crate::core::sample::grams_to_kg;
use crate::core::Sample;

/// Numeric readouts for the frame currently on screen
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReadout {
    /// 1-based, 0 when there is nothing to show
    pub frame: usize,
    pub total_frames: usize,
    pub sensor_kg: [f64; 4],
    pub total_kg: f64,
    pub cx_percent: f64,
    pub cy_percent: f64,
    pub elapsed_secs: f64,
}

impl FrameReadout {
    /// Readout shown before anything has been painted
    pub fn empty(total_frames: usize) -> Self {
        Self {
            frame: 0,
            total_frames,
            sensor_kg: [0.0; 4],
            total_kg: 0.0,
            cx_percent: 0.0,
            cy_percent: 0.0,
            elapsed_secs: 0.0,
        }
    }

    pub fn from_sample(sample: &Sample, index: usize, total_frames: usize) -> Self {
        Self {
            frame: index + 1,
            total_frames,
            sensor_kg: sample.weights().map(grams_to_kg),
            total_kg: grams_to_kg(sample.total_weight()),
            cx_percent: sample.cx * 100.0,
            cy_percent: sample.cy * 100.0,
            elapsed_secs: sample.elapsed_secs(),
        }
    }

    pub fn frame_label(&self) -> String {
        format!("{} / {}", self.frame, self.total_frames)
    }

    pub fn sensor_label(&self, sensor: usize) -> String {
        format!("{:.3} kg", self.sensor_kg.get(sensor).copied().unwrap_or_default())
    }

    pub fn total_label(&self) -> String {
        format!("{:.3} kg", self.total_kg)
    }

    pub fn coordinates_label(&self) -> String {
        format!("X: {:+.1}%   Y: {:+.1}%", self.cx_percent, self.cy_percent)
    }

    pub fn time_label(&self) -> String {
        format!("{:.3} s", self.elapsed_secs)
    }
}
