use super::{CalculationOutput, Formatter};
use crate::scenarios::Response;

pub struct TextFormatter {
    verbose: bool,
}

impl TextFormatter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, output: &CalculationOutput) -> String {
        let mut text = if self.verbose {
            format!(
                "=== {} (POST {}) ===\n",
                output.scenario.title(),
                output.scenario.route()
            )
        } else {
            format!("=== {} ===\n", output.scenario.title())
        };

        match &output.response {
            Response::Metrics(report) => {
                let width = report.labels().map(str::len).max().unwrap_or(0);
                for (label, value) in report.iter() {
                    text.push_str(&format!("{:<width$} : {}\n", label, value, width = width));
                }
            }
            Response::Error { error } => {
                text.push_str(&format!("Error: {}\n", error));
            }
        }

        if let Some(explanation) = &output.explanation {
            text.push_str("\nExplanation:\n");
            text.push_str(explanation);
            text.push('\n');
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Report;
    use crate::scenarios::Scenario;

    #[test]
    fn test_aligned_metrics() {
        let output = CalculationOutput::new(
            Scenario::CellularDesign,
            Response::Metrics(
                Report::new()
                    .with("Number of Cells", "97")
                    .with("Required Cluster Size (N)", "3"),
            ),
        );
        let text = TextFormatter::new(false).format(&output);
        assert_eq!(
            text,
            "=== Cellular System Design ===\n\
             Number of Cells           : 97\n\
             Required Cluster Size (N) : 3\n"
        );
    }

    #[test]
    fn test_verbose_shows_route_and_explanation() {
        let output = CalculationOutput {
            scenario: Scenario::WirelessSystem,
            response: Response::Error {
                error: "oops".to_string(),
            },
            explanation: Some("why".to_string()),
        };
        let text = TextFormatter::new(true).format(&output);
        assert!(text.starts_with("=== Wireless Communication System (POST /wireless-system) ===\n"));
        assert!(text.contains("Error: oops\n"));
        assert!(text.ends_with("\nExplanation:\nwhy\n"));
    }
}
