//! Cellular system dimensioning.
//!
//! Covers the service area with hexagonal cells, spreads subscriber traffic
//! evenly over them, sizes each cell's trunk group with Erlang-B and picks the
//! frequency reuse cluster meeting the required signal-to-interference ratio
//! (six first-tier co-channel interferers).

use serde::Serialize;

use crate::config::CellularConfig;
use crate::error::{CalcError, Result};
use crate::report::Report;
use crate::request::{FieldReader, Fields};
use crate::units::db_to_linear;

use super::erlang::{ChannelSearch, find_required_channels};

/// Inputs to the cellular design
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellularRequest {
    pub total_area_sqkm: f64,
    pub cell_radius_km: f64,
    pub num_subscribers: i64,
    /// Busy-hour call attempts per subscriber
    pub calls_per_hour: f64,
    /// Mean holding time in minutes
    pub call_duration_min: f64,
    /// Target grade of service
    pub blocking_prob: f64,
    pub sir_db: f64,
    pub path_loss_exp: f64,
}

impl CellularRequest {
    pub fn defaults(config: &CellularConfig) -> Self {
        Self {
            total_area_sqkm: 0.0,
            cell_radius_km: 0.0,
            num_subscribers: 0,
            calls_per_hour: 0.0,
            call_duration_min: 0.0,
            blocking_prob: config.default_blocking_probability,
            sir_db: 0.0,
            path_loss_exp: config.default_path_loss_exponent,
        }
    }

    pub fn from_fields(fields: &Fields, config: &CellularConfig) -> Result<Self> {
        let d = Self::defaults(config);
        let r = FieldReader::new(fields);
        Ok(Self {
            total_area_sqkm: r.float("totalAreaSqkm", d.total_area_sqkm)?,
            cell_radius_km: r.float("cellRadiusKm", d.cell_radius_km)?,
            num_subscribers: r.integer("numSubscribers", d.num_subscribers)?,
            calls_per_hour: r.float("callsPerHour", d.calls_per_hour)?,
            call_duration_min: r.float("callDurationMin", d.call_duration_min)?,
            blocking_prob: r.float("blockingProb", d.blocking_prob)?,
            sir_db: r.float("sirDb", d.sir_db)?,
            path_loss_exp: r.float("pathLossExp", d.path_loss_exp)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellularDesign {
    pub cell_area_sqkm: f64,
    pub num_cells: i64,
    pub traffic_per_user_erlangs: f64,
    pub total_traffic_erlangs: f64,
    pub traffic_per_cell_erlangs: f64,
    pub channels_per_cell: ChannelSearch,
    pub cluster_size: i64,
}

/// Area of a regular hexagon with circumradius `radius`
pub fn hexagon_area(radius: f64) -> f64 {
    (3.0 * 3f64.sqrt() / 2.0) * (radius * radius)
}

/// Round `value` up to a whole count, failing when it does not fit an `i64`
fn ceil_count(quantity: &'static str, value: f64) -> Result<i64> {
    let count = value.ceil();
    if count.is_finite() && count.abs() < i64::MAX as f64 {
        Ok(count as i64)
    } else {
        log::warn!("{} overflowed: {}", quantity, value);
        Err(CalcError::OutOfRange { quantity, value })
    }
}

/// Cells needed to cover `total_area`, zero when a cell has no area
pub fn number_of_cells(total_area: f64, cell_area: f64) -> Result<i64> {
    if cell_area > 0.0 {
        ceil_count("Number of Cells", total_area / cell_area)
    } else {
        Ok(0)
    }
}

/// Traffic offered by one subscriber, in Erlangs
pub fn traffic_per_user(calls_per_hour: f64, call_duration_min: f64) -> f64 {
    (calls_per_hour * call_duration_min) / 60.0
}

/// Smallest reuse cluster size N with `(3N)^(n/2) / 6 >= SIR`
///
/// Zero when the path-loss exponent is non-positive.
pub fn cluster_size(sir_db: f64, path_loss_exponent: f64) -> Result<i64> {
    if path_loss_exponent <= 0.0 {
        return Ok(0);
    }
    let sir_linear = db_to_linear(sir_db);
    ceil_count(
        "Required Cluster Size (N)",
        (1.0 / 3.0) * (6.0 * sir_linear).powf(2.0 / path_loss_exponent),
    )
}

pub fn calculate(request: &CellularRequest, config: &CellularConfig) -> Result<CellularDesign> {
    let cell_area_sqkm = hexagon_area(request.cell_radius_km);
    let num_cells = number_of_cells(request.total_area_sqkm, cell_area_sqkm)?;

    let traffic_per_user_erlangs =
        traffic_per_user(request.calls_per_hour, request.call_duration_min);
    let total_traffic_erlangs = request.num_subscribers as f64 * traffic_per_user_erlangs;
    let traffic_per_cell_erlangs = if num_cells > 0 {
        total_traffic_erlangs / num_cells as f64
    } else {
        0.0
    };

    let channels_per_cell = find_required_channels(
        traffic_per_cell_erlangs,
        request.blocking_prob,
        config.max_channels,
        config.erlang_method,
    );

    let design = CellularDesign {
        cell_area_sqkm,
        num_cells,
        traffic_per_user_erlangs,
        total_traffic_erlangs,
        traffic_per_cell_erlangs,
        channels_per_cell,
        cluster_size: cluster_size(request.sir_db, request.path_loss_exp)?,
    };
    log::debug!("Cellular design: {:?}", design);
    Ok(design)
}

impl CellularDesign {
    pub fn to_report(&self) -> Report {
        Report::new()
            .with("Number of Cells", self.num_cells.to_string())
            .with(
                "Traffic per Cell",
                format!("{:.2} Erlangs", self.traffic_per_cell_erlangs),
            )
            .with("Channels per Cell (GoS)", self.channels_per_cell.to_string())
            .with("Required Cluster Size (N)", self.cluster_size.to_string())
    }
}
