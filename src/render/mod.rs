pub mod frame;
pub mod geometry;
pub mod painter;
pub mod theme;

pub use frame::FrameRenderer;
pub use geometry::{BoardGeometry, Point};
pub use painter::{Painter, TextAnchor};
pub use theme::{Color, Theme};
