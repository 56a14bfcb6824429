use crate::core::{BoardDimensions, LoadCondition, Sample};

/// Gap kept between the drawing surface edge and the board, in pixels
pub const BOARD_MARGIN_PX: f32 = 50.0;

/// Physical size of one grid cell, in centimeters
pub const GRID_CELL_CM: f64 = 5.0;

/// A position on the drawing surface, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Pixel placement of the board on the current drawing surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardGeometry {
    /// Surface size this geometry was computed for
    pub surface_width: f32,
    pub surface_height: f32,

    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    pub center_x: f32,
    pub center_y: f32,

    /// Sensor anchors: top-right, top-left, bottom-right, bottom-left
    pub sensors: [Point; 4],

    /// Number of grid cells along each axis
    pub columns: u32,
    pub rows: u32,
    /// Grid pitch in pixels
    pub cell_width: f32,
    pub cell_height: f32,
}

impl BoardGeometry {
    /// Fit the board into the surface.
    ///
    /// Returns the largest rectangle with the board's aspect ratio that fits
    /// inside the surface minus [`BOARD_MARGIN_PX`] on every side, centered on
    /// the surface. `None` when no positive area is left or the board
    /// dimensions are unusable.
    pub fn compute(surface_width: f32, surface_height: f32, board: BoardDimensions) -> Option<Self> {
        if !board.is_valid() {
            return None;
        }

        let avail_w = surface_width - 2.0 * BOARD_MARGIN_PX;
        let avail_h = surface_height - 2.0 * BOARD_MARGIN_PX;
        if !(avail_w > 0.0 && avail_h > 0.0) {
            return None;
        }

        let ratio = board.aspect_ratio() as f32;
        let (width, height) = if avail_w / avail_h > ratio {
            (avail_h * ratio, avail_h)
        } else {
            (avail_w, avail_w / ratio)
        };

        let center_x = surface_width / 2.0;
        let center_y = surface_height / 2.0;
        let left = center_x - width / 2.0;
        let right = center_x + width / 2.0;
        let top = center_y - height / 2.0;
        let bottom = center_y + height / 2.0;

        let columns = (board.width_cm / GRID_CELL_CM).floor() as u32;
        let rows = (board.height_cm / GRID_CELL_CM).floor() as u32;

        Some(Self {
            surface_width,
            surface_height,
            left,
            right,
            top,
            bottom,
            center_x,
            center_y,
            sensors: [
                Point::new(right, top),
                Point::new(left, top),
                Point::new(right, bottom),
                Point::new(left, bottom),
            ],
            columns,
            rows,
            cell_width: if columns > 0 { width / columns as f32 } else { width },
            cell_height: if rows > 0 { height / rows as f32 } else { height },
        })
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Point {
        Point::new(self.center_x, self.center_y)
    }

    /// Map a reading's center of pressure onto the board.
    ///
    /// Unloaded readings sit at the exact center. Otherwise the normalized
    /// offsets scale to half the board size and are clamped to the board,
    /// whatever the recorded values were.
    pub fn center_of_pressure(&self, sample: &Sample) -> Point {
        match sample.load() {
            LoadCondition::Unloaded => self.center(),
            LoadCondition::Loaded { .. } => {
                let cx = if sample.cx.is_finite() { sample.cx as f32 } else { 0.0 };
                let cy = if sample.cy.is_finite() { sample.cy as f32 } else { 0.0 };
                let x = self.center_x + cx * self.width() / 2.0;
                let y = self.center_y + cy * self.height() / 2.0;
                Point::new(x.clamp(self.left, self.right), y.clamp(self.top, self.bottom))
            }
        }
    }
}
