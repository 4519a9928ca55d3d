//! ETA projection from remaining work and throughput.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

/// Display form of an ETA that cannot be computed.
pub const NOT_APPLICABLE: &str = "N/A";

/// Projected time until all new tasks are closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eta {
    /// Nothing left to do, or no usable throughput estimate.
    NotApplicable,
    Remaining(Duration),
}

impl Eta {
    /// Project an ETA from the remaining task count and a rate in tasks per second.
    ///
    /// Zero remaining work, a missing rate, or a rate that is not strictly
    /// positive all give `NotApplicable`, as does a projection too large to
    /// represent.
    pub fn project(remaining: u64, rate_per_second: Option<f64>) -> Self {
        if remaining == 0 {
            return Eta::NotApplicable;
        }
        let Some(rate) = rate_per_second.filter(|r| r.is_finite() && *r > 0.0) else {
            return Eta::NotApplicable;
        };

        match Duration::try_from_secs_f64(remaining as f64 / rate) {
            Ok(d) => Eta::Remaining(Duration::from_secs(d.as_secs())),
            Err(_) => Eta::NotApplicable,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Eta::Remaining(_))
    }
}

impl fmt::Display for Eta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Eta::NotApplicable => f.write_str(NOT_APPLICABLE),
            Eta::Remaining(d) => f.write_str(&format_eta(*d)),
        }
    }
}

/// Format a duration as `D[d] HH[h]mm[m]ss[s]`, truncating sub-second parts.
pub fn format_eta(d: Duration) -> String {
    let total = d.as_secs();
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;
    format!("{}d {:02}h{:02}m{:02}s", days, hours, minutes, seconds)
}

/// ETA as handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedEta {
    pub formatted: String,
    pub valid: bool,
}

impl From<Eta> for DerivedEta {
    fn from(eta: Eta) -> Self {
        Self {
            formatted: eta.to_string(),
            valid: eta.is_valid(),
        }
    }
}

impl Default for DerivedEta {
    fn default() -> Self {
        Eta::NotApplicable.into()
    }
}
