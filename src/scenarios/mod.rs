pub mod cellular;
pub mod erlang;
pub mod link_budget;
pub mod ofdm;
pub mod wireless_system;

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::config::CalcConfig;
use crate::constants::ERROR_PREFIX;
use crate::error::Result;
use crate::report::Report;
use crate::request::Fields;

pub use cellular::{CellularDesign, CellularRequest};
pub use erlang::{ChannelSearch, erlang_b, find_required_channels};
pub use link_budget::{LinkBudget, LinkBudgetRequest};
pub use ofdm::{OfdmMetrics, OfdmRequest};
pub use wireless_system::{RateCascade, WirelessSystemRequest};

/// The four calculators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Scenario {
    /// Rate through sampler, quantizer, source/channel coders and interleaver
    WirelessSystem,
    /// OFDM resource block throughput and spectral efficiency
    OfdmSystems,
    /// Required transmit power from a receiver-side link budget
    LinkBudget,
    /// Cell count, Erlang-B channel dimensioning and reuse cluster size
    CellularDesign,
}

impl Scenario {
    pub const ALL: [Scenario; 4] = [
        Scenario::WirelessSystem,
        Scenario::OfdmSystems,
        Scenario::LinkBudget,
        Scenario::CellularDesign,
    ];

    /// Route under which the scenario is served
    pub fn route(self) -> &'static str {
        match self {
            Self::WirelessSystem => "/wireless-system",
            Self::OfdmSystems => "/ofdm-systems",
            Self::LinkBudget => "/link-budget",
            Self::CellularDesign => "/cellular-design",
        }
    }

    /// Human readable name
    pub fn title(self) -> &'static str {
        match self {
            Self::WirelessSystem => "Wireless Communication System",
            Self::OfdmSystems => "OFDM Systems",
            Self::LinkBudget => "Link Budget",
            Self::CellularDesign => "Cellular System Design",
        }
    }

    /// Coerce `fields` and run the calculator
    pub fn try_compute(self, fields: &Fields, config: &CalcConfig) -> Result<Report> {
        let report = match self {
            Self::WirelessSystem => {
                let request = WirelessSystemRequest::from_fields(fields)?;
                wireless_system::calculate(&request).to_report()
            }
            Self::OfdmSystems => {
                let request = OfdmRequest::from_fields(fields)?;
                ofdm::calculate(&request).to_report()
            }
            Self::LinkBudget => {
                let request = LinkBudgetRequest::from_fields(fields, &config.link_budget)?;
                link_budget::calculate(&request)?.to_report()
            }
            Self::CellularDesign => {
                let request = CellularRequest::from_fields(fields, &config.cellular)?;
                cellular::calculate(&request, &config.cellular)?.to_report()
            }
        };
        Ok(report)
    }

    /// Run the calculator, turning any failure into an error record
    pub fn compute(self, fields: &Fields, config: &CalcConfig) -> Response {
        match self.try_compute(fields, config) {
            Ok(report) => Response::Metrics(report),
            Err(e) => {
                log::info!("{} rejected request: {}", self.title(), e);
                Response::Error {
                    error: format!("{}: {}", ERROR_PREFIX, e),
                }
            }
        }
    }

    /// Value used for every field a request leaves out
    pub fn defaults(self, config: &CalcConfig) -> Value {
        let defaults = match self {
            Self::WirelessSystem => serde_json::to_value(WirelessSystemRequest::default()),
            Self::OfdmSystems => serde_json::to_value(OfdmRequest::default()),
            Self::LinkBudget => {
                serde_json::to_value(LinkBudgetRequest::defaults(&config.link_budget))
            }
            Self::CellularDesign => {
                serde_json::to_value(CellularRequest::defaults(&config.cellular))
            }
        };
        // Plain structs of numbers always serialize
        defaults.unwrap_or(Value::Null)
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.route()[1..])
    }
}

/// Calculator output: either the metric report or an error record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Metrics(Report),
    Error { error: String },
}

impl Response {
    pub fn report(&self) -> Option<&Report> {
        match self {
            Self::Metrics(report) => Some(report),
            Self::Error { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Metrics(_) => None,
            Self::Error { error } => Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_display_matches_route() {
        assert_eq!(Scenario::OfdmSystems.to_string(), "ofdm-systems");
        assert_eq!(Scenario::CellularDesign.route(), "/cellular-design");
        assert_eq!(
            serde_json::to_value(Scenario::LinkBudget).unwrap(),
            json!("link-budget")
        );
    }

    #[test]
    fn test_cli_and_json_names_match_routes() {
        use clap::ValueEnum;

        for scenario in Scenario::ALL {
            let name = &scenario.route()[1..];
            assert_eq!(serde_json::to_value(scenario).unwrap(), json!(name));
            assert_eq!(Scenario::from_str(name, false), Ok(scenario));
        }
    }

    #[test]
    fn test_error_record() {
        let config = CalcConfig::default();
        let response =
            Scenario::WirelessSystem.compute(&fields(json!({"quantizerBits": "8.5"})), &config);
        assert_eq!(
            response.error(),
            Some("Invalid input or calculation error: field `quantizerBits` expects an integer, got \"8.5\"")
        );
        assert_eq!(
            serde_json::to_value(&response).unwrap().as_object().unwrap().len(),
            1
        );
    }

    #[test]
    fn test_empty_requests_never_fail() {
        let config = CalcConfig::default();
        for scenario in Scenario::ALL {
            let response = scenario.compute(&Fields::new(), &config);
            assert!(response.report().is_some(), "{} failed", scenario);
        }
    }

    #[test]
    fn test_defaults_are_complete_requests() {
        let config = CalcConfig::default();
        for scenario in Scenario::ALL {
            let defaults = scenario.defaults(&config);
            let defaults = defaults.as_object().unwrap();
            assert_eq!(
                scenario.compute(defaults, &config),
                scenario.compute(&Fields::new(), &config),
            );
        }
        let cellular = Scenario::CellularDesign.defaults(&config);
        assert_eq!(cellular["blockingProb"], json!(0.02));
        assert_eq!(cellular["pathLossExp"], json!(4.0));
    }
}
