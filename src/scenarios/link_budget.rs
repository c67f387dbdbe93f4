//! Required transmit power from a receiver-side link budget.
//!
//! All terms are summed in the dB domain; only the final transmit power is
//! converted to Watts.

use serde::Serialize;

use crate::config::LinkBudgetConfig;
use crate::constants::{BOLTZMANN_DBW_PER_HZ_K, NOISE_FLOOR_UNDEFINED_DBW};
use crate::error::{CalcError, Result};
use crate::report::Report;
use crate::request::{FieldReader, Fields};
use crate::units::{dbw_to_dbm, dbw_to_watts, linear_to_db};

/// Inputs to the link budget
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkBudgetRequest {
    pub data_rate_bps: f64,
    pub system_temp_k: f64,
    pub noise_figure_db: f64,
    pub eb_no_db: f64,
    pub fade_margin_db: f64,
    pub path_loss_db: f64,
    pub tx_gain_dbi: f64,
    pub rx_gain_dbi: f64,
    pub other_losses_db: f64,
}

impl LinkBudgetRequest {
    pub fn defaults(config: &LinkBudgetConfig) -> Self {
        Self {
            data_rate_bps: 0.0,
            system_temp_k: config.default_system_temp_k,
            noise_figure_db: 0.0,
            eb_no_db: 0.0,
            fade_margin_db: 0.0,
            path_loss_db: 0.0,
            tx_gain_dbi: 0.0,
            rx_gain_dbi: 0.0,
            other_losses_db: 0.0,
        }
    }

    pub fn from_fields(fields: &Fields, config: &LinkBudgetConfig) -> Result<Self> {
        let d = Self::defaults(config);
        let r = FieldReader::new(fields);
        Ok(Self {
            data_rate_bps: r.float("dataRateBps", d.data_rate_bps)?,
            system_temp_k: r.float("systemTempK", d.system_temp_k)?,
            noise_figure_db: r.float("noiseFigureDb", d.noise_figure_db)?,
            eb_no_db: r.float("ebNoDb", d.eb_no_db)?,
            fade_margin_db: r.float("fadeMarginDb", d.fade_margin_db)?,
            path_loss_db: r.float("pathLossDb", d.path_loss_db)?,
            tx_gain_dbi: r.float("txGainDbi", d.tx_gain_dbi)?,
            rx_gain_dbi: r.float("rxGainDbi", d.rx_gain_dbi)?,
            other_losses_db: r.float("otherLossesDb", d.other_losses_db)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkBudget {
    pub thermal_noise_dbw: f64,
    pub receiver_sensitivity_dbw: f64,
    pub required_rx_power_dbw: f64,
    pub required_tx_power_dbw: f64,
    pub required_tx_power_watts: f64,
}

/// Thermal noise power kTB in dBW
///
/// Returns [`NOISE_FLOOR_UNDEFINED_DBW`] when either argument is non-positive.
pub fn thermal_noise_dbw(system_temp_k: f64, data_rate_bps: f64) -> f64 {
    match (linear_to_db(system_temp_k), linear_to_db(data_rate_bps)) {
        (Some(temp_db), Some(rate_db)) => BOLTZMANN_DBW_PER_HZ_K + temp_db + rate_db,
        _ => NOISE_FLOOR_UNDEFINED_DBW,
    }
}

/// Fails when the transmit power in Watts is not representable.
pub fn calculate(request: &LinkBudgetRequest) -> Result<LinkBudget> {
    let thermal_noise_dbw = thermal_noise_dbw(request.system_temp_k, request.data_rate_bps);
    let receiver_sensitivity_dbw = thermal_noise_dbw + request.noise_figure_db + request.eb_no_db;
    let required_rx_power_dbw = receiver_sensitivity_dbw + request.fade_margin_db;
    let required_tx_power_dbw = required_rx_power_dbw + request.path_loss_db
        + request.other_losses_db
        - request.tx_gain_dbi
        - request.rx_gain_dbi;

    let required_tx_power_watts = dbw_to_watts(required_tx_power_dbw);
    if !required_tx_power_watts.is_finite() {
        log::warn!("Transmit power overflowed at {} dBW", required_tx_power_dbw);
        return Err(CalcError::OutOfRange {
            quantity: "Required Transmitted Power",
            value: required_tx_power_watts,
        });
    }

    let budget = LinkBudget {
        thermal_noise_dbw,
        receiver_sensitivity_dbw,
        required_rx_power_dbw,
        required_tx_power_dbw,
        required_tx_power_watts,
    };
    log::debug!("Link budget: {:?}", budget);
    Ok(budget)
}

impl LinkBudget {
    pub fn to_report(&self) -> Report {
        Report::new()
            .with("Thermal Noise", format!("{:.2} dBW", self.thermal_noise_dbw))
            .with(
                "Receiver Sensitivity",
                format!("{:.2} dBW", self.receiver_sensitivity_dbw),
            )
            .with(
                "Required Receiver Power",
                format!("{:.2} dBm", dbw_to_dbm(self.required_rx_power_dbw)),
            )
            .with(
                "Required Transmitted Power",
                format!("{:.4} W", self.required_tx_power_watts),
            )
    }
}
