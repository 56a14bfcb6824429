pub mod board;
pub mod sample;
pub mod session;

pub use board::{BoardDimensions, SENSOR_LABELS};
pub use sample::{LoadCondition, Sample};
pub use session::{Session, SessionInfo};
