use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use hound::WavReader;

use crate::error::Result;

/// A stream of interleaved multichannel samples
pub trait SampleSource: Send {
    /// Next chunk of interleaved samples, or `None` at end of stream.
    fn next_buffer(&mut self) -> Result<Option<Vec<f64>>>;
    fn channels(&self) -> usize;
    fn sample_rate(&self) -> u32;
}

/// In-memory interleaved samples, handed out in fixed-size chunks
pub struct MemorySource {
    samples: Vec<f64>,
    position: usize,
    chunk_size: usize,
    channels: usize,
    sample_rate: u32,
}

impl MemorySource {
    pub fn new(samples: Vec<f64>, channels: usize, sample_rate: u32, chunk_frames: usize) -> Self {
        Self {
            samples,
            position: 0,
            chunk_size: chunk_frames.max(1) * channels.max(1),
            channels,
            sample_rate,
        }
    }

    /// Total number of multichannel frames.
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels.max(1)
    }
}

impl SampleSource for MemorySource {
    fn next_buffer(&mut self) -> Result<Option<Vec<f64>>> {
        if self.position >= self.samples.len() {
            return Ok(None);
        }

        let end = (self.position + self.chunk_size).min(self.samples.len());
        let chunk = self.samples[self.position..end].to_vec();
        self.position = end;

        Ok(Some(chunk))
    }

    fn channels(&self) -> usize {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

/// Reads a whole WAV file and hands it out in fixed-size chunks
pub struct WavFileSource {
    inner: MemorySource,
}

impl WavFileSource {
    /// Open `path`; `chunk_frames` is the number of multichannel frames per
    /// buffer.
    pub fn new<P: AsRef<Path>>(path: P, chunk_frames: usize) -> Result<Self> {
        let reader = WavReader::open(path.as_ref())?;
        let spec = reader.spec();

        log::info!(
            "{}: {} channels, {} Hz, {} bits {:?}",
            path.as_ref().display(),
            spec.channels,
            spec.sample_rate,
            spec.bits_per_sample,
            spec.sample_format
        );

        let samples = Self::read_samples(reader, &spec)?;

        Ok(Self {
            inner: MemorySource::new(
                samples,
                spec.channels as usize,
                spec.sample_rate,
                chunk_frames,
            ),
        })
    }

    fn read_samples(
        mut reader: WavReader<BufReader<File>>,
        spec: &hound::WavSpec,
    ) -> Result<Vec<f64>> {
        let samples = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .map(|s| s.map(f64::from))
                .collect::<std::result::Result<Vec<_>, _>>()?,
            hound::SampleFormat::Int => {
                let max_val = 2_i64.pow(spec.bits_per_sample as u32 - 1) as f64;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f64 / max_val))
                    .collect::<std::result::Result<Vec<_>, _>>()?
            }
        };
        Ok(samples)
    }

    /// Total number of multichannel frames in the file.
    pub fn frames(&self) -> usize {
        self.inner.frames()
    }
}

impl SampleSource for WavFileSource {
    fn next_buffer(&mut self) -> Result<Option<Vec<f64>>> {
        self.inner.next_buffer()
    }

    fn channels(&self) -> usize {
        self.inner.channels()
    }

    fn sample_rate(&self) -> u32 {
        self.inner.sample_rate()
    }
}
