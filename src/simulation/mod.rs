mod noise;
mod signal;

pub use noise::{NoiseConfig, add_white_noise, signal_power, white_noise};
pub use signal::{interleave, sine, to_f32};
