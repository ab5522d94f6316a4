use clap::Parser;

use welchfloor::save_wav;
use welchfloor::simulation::{NoiseConfig, add_white_noise, interleave, sine, to_f32};

#[derive(Parser, Debug)]
#[command(name = "generate_wav")]
#[command(about = "Generate a multichannel test WAV: a tone plus white noise per channel", long_about = None)]
struct Args {
    /// Output WAV file
    output: String,

    /// Number of channels
    #[arg(short = 'c', long, default_value = "2")]
    channels: u16,

    /// Sample rate in Hz
    #[arg(short = 'r', long, default_value = "1970")]
    sample_rate: u32,

    /// Duration in seconds
    #[arg(short = 'd', long, default_value = "10.0")]
    duration: f64,

    /// Tone frequency in Hz
    #[arg(long, default_value = "50.0")]
    tone_hz: f64,

    /// Tone amplitude
    #[arg(long, default_value = "0.5")]
    tone_amplitude: f64,

    /// Noise standard deviation
    #[arg(long, default_value = "0.01")]
    noise: f64,

    /// Random seed
    #[arg(long, default_value = "42")]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let num_samples = (args.duration * args.sample_rate as f64) as usize;
    let channels: Vec<Vec<f64>> = (0..args.channels)
        .map(|ch| {
            let phase = ch as f64 * std::f64::consts::FRAC_PI_4;
            let mut signal = sine(
                num_samples,
                args.sample_rate as f64,
                args.tone_hz,
                args.tone_amplitude,
                phase,
            );
            add_white_noise(
                &mut signal,
                &NoiseConfig::new(args.seed + ch as u64, args.noise),
            );
            signal
        })
        .collect();

    let samples = to_f32(&interleave(&channels));
    save_wav(&args.output, &samples, args.channels, args.sample_rate)?;

    log::info!(
        "Wrote {} frames x {} channels to {}",
        num_samples,
        args.channels,
        args.output
    );
    println!("Wrote {}", args.output);
    Ok(())
}
