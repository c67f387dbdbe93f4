//! OFDM resource block throughput.
//!
//! Resource block bandwidth and subcarrier spacing are in kHz, block
//! duration in milliseconds. Any quotient with a non-positive divisor is
//! reported as zero so that partially filled requests still produce a
//! well-formed result.

use serde::Serialize;

use crate::error::Result;
use crate::report::{Report, format_grouped};
use crate::request::{FieldReader, Fields};
use crate::units::{khz_to_hz, ms_to_seconds};

/// Inputs to the OFDM throughput calculation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfdmRequest {
    /// Constellation size M (4 for QPSK, 16 for 16-QAM, ...)
    pub modulation_order: i64,
    /// Resource block bandwidth in kHz
    pub rb_bw: f64,
    /// Subcarrier spacing in kHz
    pub subcarrier_spacing: f64,
    /// OFDM symbols per resource block
    pub symbols_per_rb: i64,
    /// Resource blocks transmitted in parallel
    pub parallel_rbs: i64,
    /// Resource block duration in milliseconds
    pub rb_duration_ms: f64,
}

impl OfdmRequest {
    pub fn from_fields(fields: &Fields) -> Result<Self> {
        let d = Self::default();
        let r = FieldReader::new(fields);
        Ok(Self {
            modulation_order: r.integer("modulationOrder", d.modulation_order)?,
            rb_bw: r.float("rbBw", d.rb_bw)?,
            subcarrier_spacing: r.float("subcarrierSpacing", d.subcarrier_spacing)?,
            symbols_per_rb: r.integer("symbolsPerRb", d.symbols_per_rb)?,
            parallel_rbs: r.integer("parallelRbs", d.parallel_rbs)?,
            rb_duration_ms: r.float("rbDurationMs", d.rb_duration_ms)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OfdmMetrics {
    pub bits_per_symbol: f64,
    pub subcarriers_per_rb: f64,
    pub bits_per_rb: f64,
    pub max_data_rate_bps: f64,
    pub total_bandwidth_khz: f64,
    /// bps/Hz
    pub spectral_efficiency: f64,
}

/// Bits carried by one symbol of an M-ary constellation, zero for M <= 0
pub fn bits_per_symbol(modulation_order: i64) -> f64 {
    if modulation_order > 0 {
        (modulation_order as f64).log2()
    } else {
        0.0
    }
}

pub fn calculate(request: &OfdmRequest) -> OfdmMetrics {
    let bits_per_symbol = bits_per_symbol(request.modulation_order);

    let subcarriers_per_rb = if request.subcarrier_spacing > 0.0 {
        request.rb_bw / request.subcarrier_spacing
    } else {
        0.0
    };

    let bits_per_rb = bits_per_symbol * subcarriers_per_rb * request.symbols_per_rb as f64;

    let rb_duration_s = ms_to_seconds(request.rb_duration_ms);
    let max_data_rate_bps = if rb_duration_s > 0.0 {
        (request.parallel_rbs as f64 * bits_per_rb) / rb_duration_s
    } else {
        0.0
    };

    let total_bandwidth_khz = request.parallel_rbs as f64 * request.rb_bw;
    let spectral_efficiency = if total_bandwidth_khz > 0.0 {
        max_data_rate_bps / khz_to_hz(total_bandwidth_khz)
    } else {
        0.0
    };

    let metrics = OfdmMetrics {
        bits_per_symbol,
        subcarriers_per_rb,
        bits_per_rb,
        max_data_rate_bps,
        total_bandwidth_khz,
        spectral_efficiency,
    };
    log::debug!("OFDM metrics: {:?}", metrics);
    metrics
}

impl OfdmMetrics {
    pub fn to_report(&self) -> Report {
        Report::new()
            .with("Bits per Symbol", format!("{:.2}", self.bits_per_symbol))
            .with("Subcarriers per RB", format!("{:.2}", self.subcarriers_per_rb))
            .with("Bits per RB", format_grouped(self.bits_per_rb, 2))
            .with(
                "Maximum Data Rate",
                format!("{:.2} Mbps", self.max_data_rate_bps / 1_000_000.0),
            )
            .with(
                "Total Bandwidth",
                format!("{:.2} MHz", self.total_bandwidth_khz / 1000.0),
            )
            .with(
                "Spectral Efficiency",
                format!("{:.2} bps/Hz", self.spectral_efficiency),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn lte_64qam() -> OfdmRequest {
        OfdmRequest {
            modulation_order: 64,
            rb_bw: 180.0,
            subcarrier_spacing: 15.0,
            symbols_per_rb: 7,
            parallel_rbs: 100,
            rb_duration_ms: 0.5,
        }
    }

    #[test]
    fn test_bits_per_symbol() {
        assert_eq!(bits_per_symbol(4), 2.0);
        assert_eq!(bits_per_symbol(16), 4.0);
        assert_eq!(bits_per_symbol(64), 6.0);
        assert_eq!(bits_per_symbol(0), 0.0);
        assert_eq!(bits_per_symbol(-4), 0.0);
    }

    #[test]
    fn test_lte_resource_grid() {
        let m = calculate(&lte_64qam());
        assert_relative_eq!(m.subcarriers_per_rb, 12.0);
        assert_relative_eq!(m.bits_per_rb, 504.0);
        assert_relative_eq!(m.max_data_rate_bps, 100.8e6, max_relative = 1e-12);
        assert_relative_eq!(m.total_bandwidth_khz, 18_000.0);
        assert_relative_eq!(m.spectral_efficiency, 5.6, max_relative = 1e-12);
    }

    #[test]
    fn test_non_positive_divisors_degrade_to_zero() {
        let m = calculate(&OfdmRequest {
            subcarrier_spacing: 0.0,
            ..lte_64qam()
        });
        assert_eq!(m.subcarriers_per_rb, 0.0);
        assert_eq!(m.bits_per_rb, 0.0);

        let m = calculate(&OfdmRequest {
            rb_duration_ms: 0.0,
            ..lte_64qam()
        });
        assert_eq!(m.max_data_rate_bps, 0.0);
        assert_eq!(m.spectral_efficiency, 0.0);

        let m = calculate(&OfdmRequest {
            parallel_rbs: 0,
            ..lte_64qam()
        });
        assert_eq!(m.total_bandwidth_khz, 0.0);
        assert_eq!(m.spectral_efficiency, 0.0);
    }

    #[test]
    fn test_report_formatting() {
        let report = calculate(&lte_64qam()).to_report();
        assert_eq!(report.get("Bits per Symbol"), Some("6.00"));
        assert_eq!(report.get("Subcarriers per RB"), Some("12.00"));
        assert_eq!(report.get("Bits per RB"), Some("504.00"));
        assert_eq!(report.get("Maximum Data Rate"), Some("100.80 Mbps"));
        assert_eq!(report.get("Total Bandwidth"), Some("18.00 MHz"));
        assert_eq!(report.get("Spectral Efficiency"), Some("5.60 bps/Hz"));
    }

    #[test]
    fn test_field_names_round_trip() {
        let request = lte_64qam();
        let value = serde_json::to_value(&request).unwrap();
        let fields = value.as_object().unwrap();
        assert_eq!(OfdmRequest::from_fields(fields).unwrap(), request);
    }
}
