use super::{EstimateOutput, Formatter};

pub struct TextFormatter {
    verbose: bool,
}

impl TextFormatter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, output: &EstimateOutput) -> String {
        if self.verbose {
            let db = output
                .value_db()
                .map_or("-inf".to_string(), |db| format!("{:.1}", db));
            format!(
                "Batch {:>6} @ {:>9.3}s  noise: {:.6e} ({} dB)",
                output.sequence, output.offset_secs, output.value, db
            )
        } else {
            format!("Noise: {:.6e}", output.value)
        }
    }
}
