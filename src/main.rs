use std::path::PathBuf;
use std::thread;

use anyhow::Context;
use clap::Parser;

use welchfloor::config::{
    AppConfig, NoiseFloorConfig, OutputTransform, Preset, TransformKind, read_window_file,
};
use welchfloor::input::{SampleSource, SegmentAccumulator, WavFileSource, feed_batches};
use welchfloor::output::{EstimateOutput, OutputFormat, create_formatter};
use welchfloor::worker::{Resequencer, ShutdownToken, WorkerPool, queue};
use welchfloor::{Batch, NoiseEstimate};

#[derive(Parser, Debug)]
#[command(name = "welchfloor")]
#[command(about = "Estimate the noise floor of a multichannel WAV file", long_about = None)]
struct Args {
    /// WAV file to analyze (every channel is one frame of each batch)
    file: PathBuf,

    /// TOML configuration file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Samples per segment (FFT length)
    #[arg(short = 'n', long)]
    seg_length: Option<usize>,

    /// Number of worker threads
    #[arg(short = 'w', long)]
    workers: Option<usize>,

    /// Estimator preset: amplitude, band-power
    #[arg(short = 'p', long, value_enum)]
    preset: Option<Preset>,

    /// Fraction of the spectrum tail to average (0-1]
    #[arg(long)]
    tail_fraction: Option<f64>,

    /// Linear scale applied to the estimate
    #[arg(long)]
    scale: Option<f64>,

    /// Output transform: sqrt-half, linear
    #[arg(short = 't', long, value_enum)]
    transform: Option<TransformKind>,

    /// Bandwidth in Hz for the linear transform (default: half the sample rate)
    #[arg(long)]
    bandwidth: Option<f64>,

    /// Window weights file (whitespace or comma separated)
    #[arg(long)]
    window: Option<PathBuf>,

    /// Print estimates in input order
    #[arg(long)]
    ordered: bool,

    /// Output format: text, json, csv
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn apply_overrides(config: &mut AppConfig, args: &Args, sample_rate: u32) -> anyhow::Result<()> {
    let estimator = &mut config.estimator;

    if let Some(preset) = args.preset {
        estimator.set_noise_floor(NoiseFloorConfig::from_preset(preset));
    }
    if let Some(n) = args.seg_length {
        estimator.seg_length = n;
    }
    if let Some(fraction) = args.tail_fraction {
        estimator.tail_fraction = fraction;
    }
    if let Some(scale) = args.scale {
        estimator.scale_factor = scale;
    }
    if let Some(kind) = args.transform {
        estimator.transform = match kind {
            TransformKind::SqrtHalf => OutputTransform::SqrtHalf,
            TransformKind::Linear => OutputTransform::Linear {
                bandwidth: sample_rate as f64 / 2.0,
            },
        };
    }
    if let (Some(bw), OutputTransform::Linear { bandwidth }) =
        (args.bandwidth, &mut estimator.transform)
    {
        *bandwidth = bw;
    }
    if let Some(path) = &args.window {
        estimator.window = Some(
            read_window_file(path)
                .with_context(|| format!("reading window file {}", path.display()))?,
        );
    }
    if let Some(workers) = args.workers {
        config.worker.workers = workers;
    }

    config.validate()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AppConfig::default(),
    };

    let seg_length_hint = args.seg_length.unwrap_or(config.estimator.seg_length);
    let mut source = WavFileSource::new(&args.file, seg_length_hint)
        .with_context(|| format!("opening {}", args.file.display()))?;
    let sample_rate = source.sample_rate();
    let channels = source.channels();

    apply_overrides(&mut config, &args, sample_rate)?;
    let seg_length = config.estimator.seg_length;

    log::info!(
        "Estimator: segment {} samples x {} channels, tail {:.2}, scale {}, {:?}",
        seg_length,
        channels,
        config.estimator.tail_fraction,
        config.estimator.scale_factor,
        config.estimator.transform
    );

    let token = ShutdownToken::new();
    let poll = config.worker.poll_interval();
    let (batch_tx, batch_rx) = queue::<Batch>(config.worker.queue_capacity, poll);
    let (estimate_tx, estimate_rx) = queue::<NoiseEstimate>(config.worker.queue_capacity, poll);

    let mut accumulator = SegmentAccumulator::new(channels, seg_length)?;
    let pool = WorkerPool::spawn(
        &config.estimator,
        config.worker.workers,
        batch_rx,
        estimate_tx,
        token.clone(),
    )?;

    let producer_token = token.clone();
    let producer = thread::Builder::new()
        .name("welch-producer".into())
        .spawn(move || feed_batches(&mut source, &mut accumulator, &batch_tx, &producer_token))?;

    let formatter = create_formatter(args.format, args.verbose > 0);
    if let Some(header) = formatter.header() {
        println!("{}", header);
    }

    let emit = |estimate: NoiseEstimate| {
        let output = EstimateOutput {
            sequence: estimate.sequence,
            offset_secs: estimate.sequence as f64 * seg_length as f64 / sample_rate as f64,
            value: estimate.value,
        };
        println!("{}", formatter.format(&output));
    };

    let mut resequencer = args.ordered.then(Resequencer::new);

    // Ends when every worker has exited and dropped its sender
    while let Ok(received) = estimate_rx.recv(&token) {
        let Some(estimate) = received else {
            continue;
        };
        match resequencer.as_mut() {
            Some(r) => r.push(estimate).into_iter().for_each(&emit),
            None => emit(estimate),
        }
    }
    if let Some(r) = resequencer.as_mut() {
        r.flush().into_iter().for_each(&emit);
    }

    let queued = producer
        .join()
        .map_err(|_| anyhow::anyhow!("producer thread panicked"))??;
    let stats = pool.join();

    log::info!(
        "Done: {} batches queued, {} processed, {} published, {} rejected",
        queued,
        stats.batches,
        stats.published,
        stats.rejected
    );

    Ok(())
}
