pub mod config;
pub mod constants;
pub mod error;
pub mod explain;
pub mod output;
pub mod report;
pub mod request;
pub mod scenarios;
pub mod units;

pub use config::CalcConfig;
pub use error::{CalcError, Result};
pub use explain::{AnalysisResponse, Explainer, analyze};
pub use report::Report;
pub use request::Fields;
pub use scenarios::{Response, Scenario};
