mod csv;
mod json;
mod text;

use chrono::Utc;
use serde::Serialize;

pub use self::csv::CsvFormatter;
pub use self::json::JsonFormatter;
pub use self::text::TextFormatter;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

/// A published estimate with its position in the input stream
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EstimateOutput {
    pub sequence: u64,
    /// Start of the batch in seconds from the beginning of the input
    pub offset_secs: f64,
    pub value: f64,
}

impl EstimateOutput {
    /// Value in decibels relative to 1, or `None` for a zero estimate.
    pub fn value_db(&self) -> Option<f64> {
        (self.value > 0.0).then(|| 20.0 * self.value.log10())
    }
}

pub trait Formatter: Send {
    fn format(&self, output: &EstimateOutput) -> String;

    fn header(&self) -> Option<&'static str> {
        None
    }
}

pub fn create_formatter(format: OutputFormat, verbose: bool) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(verbose)),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}

pub fn iso8601_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
