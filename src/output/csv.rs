use super::{EstimateOutput, Formatter, iso8601_timestamp};

pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format(&self, output: &EstimateOutput) -> String {
        format!(
            "{},{},{:.6},{:.9e}",
            iso8601_timestamp(),
            output.sequence,
            output.offset_secs,
            output.value
        )
    }

    fn header(&self) -> Option<&'static str> {
        Some("ts,sequence,offset_secs,value")
    }
}
