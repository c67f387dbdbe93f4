mod csv;
mod json;
mod text;

use chrono::Utc;

use crate::explain::AnalysisResponse;
use crate::scenarios::{Response, Scenario};

pub use self::csv::CsvFormatter;
pub use self::json::JsonFormatter;
pub use self::text::TextFormatter;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

/// One calculator run ready for display
pub struct CalculationOutput {
    pub scenario: Scenario,
    pub response: Response,
    pub explanation: Option<String>,
}

impl CalculationOutput {
    pub fn new(scenario: Scenario, response: Response) -> Self {
        Self {
            scenario,
            response,
            explanation: None,
        }
    }

    pub fn from_analysis(scenario: Scenario, analysis: AnalysisResponse) -> Self {
        match analysis {
            AnalysisResponse::Analysis(a) => Self {
                scenario,
                response: Response::Metrics(a.numerical_results),
                explanation: Some(a.ai_explanation),
            },
            AnalysisResponse::Error { error } => Self::new(scenario, Response::Error { error }),
        }
    }
}

pub trait Formatter: Send {
    fn format(&self, output: &CalculationOutput) -> String;

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
