//! Erlang-B blocking probability and channel dimensioning.

use std::fmt;

use crate::config::ErlangMethod;
use crate::constants::CHANNELS_NOT_FOUND;

/// Outcome of the required-channel search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelSearch {
    /// Smallest channel count meeting the grade of service (0 when there is no traffic)
    Found(u32),
    /// No channel count up to the search cap meets the grade of service
    NotFound,
}

impl ChannelSearch {
    pub fn channels(&self) -> Option<u32> {
        match self {
            Self::Found(c) => Some(*c),
            Self::NotFound => None,
        }
    }
}

impl fmt::Display for ChannelSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found(c) => write!(f, "{}", c),
            Self::NotFound => f.write_str(CHANNELS_NOT_FOUND),
        }
    }
}

/// Erlang-B blocking probability for `traffic` Erlangs offered to `channels` trunks
pub fn erlang_b(traffic: f64, channels: i64, method: ErlangMethod) -> f64 {
    match method {
        ErlangMethod::Direct => erlang_b_direct(traffic, channels),
        ErlangMethod::Recursive => erlang_b_recursive(traffic, channels),
    }
}

/// Closed form `(a^c / c!) / sum_{i=0..c} (a^i / i!)`
///
/// Full blocking (1.0) is reported for a non-positive channel count, negative
/// traffic, or as soon as a power or factorial term overflows `f64`. With
/// `f64` the factorial overflows at 171, so this form never finds more than
/// 170 channels.
pub fn erlang_b_direct(traffic: f64, channels: i64) -> f64 {
    if traffic < 0.0 || channels <= 0 {
        return 1.0;
    }

    let mut factorial = 1.0_f64;
    let mut term = 0.0;
    let mut sum = 0.0;
    for i in 0..=channels {
        if i > 0 {
            factorial *= i as f64;
        }
        let power = traffic.powf(i as f64);
        if !power.is_finite() || !factorial.is_finite() {
            return 1.0;
        }
        term = power / factorial;
        sum += term;
    }

    if sum > 0.0 { term / sum } else { 1.0 }
}

/// Recurrence `B(a,0) = 1`, `B(a,c) = a*B(a,c-1) / (c + a*B(a,c-1))`
///
/// Numerically stable for any channel count.
pub fn erlang_b_recursive(traffic: f64, channels: i64) -> f64 {
    if traffic < 0.0 || channels <= 0 {
        return 1.0;
    }
    (1..=channels).fold(1.0, |b, c| erlang_b_step(traffic, b, c))
}

fn erlang_b_step(traffic: f64, previous: f64, channels: i64) -> f64 {
    let ab = traffic * previous;
    ab / (channels as f64 + ab)
}

/// Smallest channel count whose blocking probability does not exceed `target`
///
/// Channel counts `1..=max_channels` are tried in order. No traffic needs no
/// channels.
pub fn find_required_channels(
    traffic: f64,
    target: f64,
    max_channels: u32,
    method: ErlangMethod,
) -> ChannelSearch {
    if traffic <= 0.0 {
        return ChannelSearch::Found(0);
    }

    let found = match method {
        ErlangMethod::Direct => {
            (1..=max_channels).find(|&c| erlang_b_direct(traffic, i64::from(c)) <= target)
        }
        ErlangMethod::Recursive => {
            // Carry B(a, c-1) forward instead of recomputing from scratch
            let mut blocking = 1.0;
            (1..=max_channels).find(|&c| {
                blocking = erlang_b_step(traffic, blocking, i64::from(c));
                blocking <= target
            })
        }
    };

    match found {
        Some(c) => ChannelSearch::Found(c),
        None => {
            log::warn!(
                "No channel count up to {} gives blocking <= {} for {:.2} Erlangs",
                max_channels,
                target,
                traffic
            );
            ChannelSearch::NotFound
        }
    }
}
