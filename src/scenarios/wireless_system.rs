//! Data rate through the blocks of a digital wireless transmitter.
//!
//! Sampler -> quantizer -> source encoder -> channel encoder -> interleaver,
//! followed by the air time of one burst at the channel-encoded rate.

use serde::Serialize;

use crate::error::Result;
use crate::report::{Report, format_grouped};
use crate::request::{FieldReader, Fields};

/// Inputs to the rate cascade
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WirelessSystemRequest {
    /// Analog signal bandwidth in Hz
    pub bandwidth: f64,
    /// Quantizer resolution in bits per sample
    pub quantizer_bits: i64,
    /// Source coder output/input ratio (0.25 for 4:1 compression)
    pub source_coder_rate: f64,
    /// Channel code rate (0.5 for rate-1/2 coding)
    pub channel_coder_rate: f64,
    /// Burst length in bits
    pub burst_size_bits: i64,
}

impl Default for WirelessSystemRequest {
    fn default() -> Self {
        Self {
            bandwidth: 0.0,
            quantizer_bits: 0,
            source_coder_rate: 1.0,
            channel_coder_rate: 1.0,
            burst_size_bits: 0,
        }
    }
}

impl WirelessSystemRequest {
    pub fn from_fields(fields: &Fields) -> Result<Self> {
        let d = Self::default();
        let r = FieldReader::new(fields);
        Ok(Self {
            bandwidth: r.float("bandwidth", d.bandwidth)?,
            quantizer_bits: r.integer("quantizerBits", d.quantizer_bits)?,
            source_coder_rate: r.float("sourceCoderRate", d.source_coder_rate)?,
            channel_coder_rate: r.float("channelCoderRate", d.channel_coder_rate)?,
            burst_size_bits: r.integer("burstSizeBits", d.burst_size_bits)?,
        })
    }
}

/// Rate at the output of each block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateCascade {
    pub sampler_rate_sps: f64,
    pub quantizer_rate_bps: f64,
    pub source_encoder_rate_bps: f64,
    pub channel_encoder_rate_bps: f64,
    pub interleaver_rate_bps: f64,
    pub burst_duration_s: f64,
}

pub fn calculate(request: &WirelessSystemRequest) -> RateCascade {
    // Nyquist
    let sampler_rate_sps = 2.0 * request.bandwidth;
    let quantizer_rate_bps = sampler_rate_sps * request.quantizer_bits as f64;
    let source_encoder_rate_bps = quantizer_rate_bps * request.source_coder_rate;

    let channel_encoder_rate_bps = if request.channel_coder_rate != 0.0 {
        source_encoder_rate_bps / request.channel_coder_rate
    } else {
        0.0
    };

    // Interleaving reorders bits without changing throughput
    let interleaver_rate_bps = channel_encoder_rate_bps;

    let burst_duration_s = if channel_encoder_rate_bps != 0.0 {
        request.burst_size_bits as f64 / channel_encoder_rate_bps
    } else {
        0.0
    };

    let cascade = RateCascade {
        sampler_rate_sps,
        quantizer_rate_bps,
        source_encoder_rate_bps,
        channel_encoder_rate_bps,
        interleaver_rate_bps,
        burst_duration_s,
    };
    log::debug!("Rate cascade: {:?}", cascade);
    cascade
}

impl RateCascade {
    pub fn to_report(&self) -> Report {
        Report::new()
            .with(
                "Sampler Rate",
                format!("{} Sps", format_grouped(self.sampler_rate_sps, 0)),
            )
            .with(
                "Quantizer Rate",
                format!("{} bps", format_grouped(self.quantizer_rate_bps, 0)),
            )
            .with(
                "Source Encoder Rate",
                format!("{} bps", format_grouped(self.source_encoder_rate_bps, 0)),
            )
            .with(
                "Channel Encoder Rate",
                format!("{} bps", format_grouped(self.channel_encoder_rate_bps, 0)),
            )
            .with(
                "Interleaver Output Rate",
                format!("{} bps", format_grouped(self.interleaver_rate_bps, 0)),
            )
            .with(
                "Burst Duration",
                format!("{:.6} s", self.burst_duration_s),
            )
    }
}
