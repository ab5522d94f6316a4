pub mod noise_floor;
pub mod periodogram;
pub mod unpack;
pub mod window;

pub use noise_floor::NoiseFloorExtractor;
pub use periodogram::PeriodogramEstimator;
pub use unpack::{spectrum_length, unpack_power};
pub use window::{Window, WindowSource};
