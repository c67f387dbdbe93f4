use crate::constants::DBW_TO_DBM_OFFSET;

/// Convert a power ratio in dB to a linear ratio
pub fn db_to_linear(db: f64) -> f64 {
    10f64.powf(db / 10.0)
}

/// Convert a linear power ratio to dB
///
/// Returns `None` for non-positive input, which has no logarithm.
pub fn linear_to_db(linear: f64) -> Option<f64> {
    if linear > 0.0 {
        Some(10.0 * linear.log10())
    } else {
        None
    }
}

/// Convert power in dBW to dBm
pub fn dbw_to_dbm(dbw: f64) -> f64 {
    dbw + DBW_TO_DBM_OFFSET
}

/// Convert power in dBW to Watts
pub fn dbw_to_watts(dbw: f64) -> f64 {
    db_to_linear(dbw)
}

/// Convert kHz to Hz
pub fn khz_to_hz(khz: f64) -> f64 {
    khz * 1000.0
}

/// Convert milliseconds to seconds
pub fn ms_to_seconds(ms: f64) -> f64 {
    ms / 1000.0
}
