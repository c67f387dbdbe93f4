use serde_json::{Value, json};

use super::{CalculationOutput, Formatter, iso8601_timestamp};
use crate::scenarios::Response;

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format(&self, output: &CalculationOutput) -> String {
        let mut record = json!({
            "ts": iso8601_timestamp(),
            "scenario": output.scenario,
        });
        match &output.response {
            Response::Metrics(report) => {
                record["numericalResults"] = json!(report);
                if let Some(explanation) = &output.explanation {
                    record["aiExplanation"] = Value::String(explanation.clone());
                }
            }
            Response::Error { error } => {
                record["error"] = Value::String(error.clone());
            }
        }
        record.to_string()
    }
}
