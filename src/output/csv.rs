use super::{CalculationOutput, Formatter, iso8601_timestamp};
use crate::scenarios::Response;

/// One row per metric; rows of a run share the timestamp
pub struct CsvFormatter;

fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

impl Formatter for CsvFormatter {
    fn format(&self, output: &CalculationOutput) -> String {
        let ts = iso8601_timestamp();
        let row = |metric: &str, value: &str| {
            format!("{},{},{},{}", ts, output.scenario, quote(metric), quote(value))
        };

        let mut rows: Vec<String> = match &output.response {
            Response::Metrics(report) => report.iter().map(|(l, v)| row(l, v)).collect(),
            Response::Error { error } => vec![row("error", error)],
        };
        if let Some(explanation) = &output.explanation {
            rows.push(row("explanation", explanation));
        }
        rows.join("\n")
    }

    fn header(&self) -> Option<&'static str> {
        Some("ts,scenario,metric,value")
    }
}
