//! Physical constants and sentinel values shared by the calculators.

/// Boltzmann's constant expressed in dBW/Hz/K.
pub const BOLTZMANN_DBW_PER_HZ_K: f64 = -228.6;

/// Offset between dBW and dBm.
pub const DBW_TO_DBM_OFFSET: f64 = 30.0;

/// Thermal noise reported when temperature or data rate is non-positive
/// and the noise floor cannot be computed.
pub const NOISE_FLOOR_UNDEFINED_DBW: f64 = -999.0;

/// Reference temperature in Kelvin used when a request omits the system temperature.
pub const REFERENCE_TEMPERATURE_K: f64 = 290.0;

/// Conventional 2% grade of service.
pub const DEFAULT_BLOCKING_PROBABILITY: f64 = 0.02;

/// Urban path-loss exponent.
pub const DEFAULT_PATH_LOSS_EXPONENT: f64 = 4.0;

/// Upper bound on the number of channels tried by the Erlang-B search.
pub const DEFAULT_MAX_CHANNELS: u32 = 1000;

/// Rendering of a channel search that exhausted its cap.
pub const CHANNELS_NOT_FOUND: &str = "Not Found (High Traffic)";

/// Prefix carried by every error record returned to callers.
pub const ERROR_PREFIX: &str = "Invalid input or calculation error";
