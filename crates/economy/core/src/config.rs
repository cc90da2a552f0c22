/// Engine configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EconomyConfig {
    /// Seconds after which the rate estimator treats its baseline snapshot
    /// as stale and reports a zero mean rate.
    pub rate_stale_secs: f64,

    /// Maximum number of samples retained in a rate estimator window.
    /// Older samples are evicted FIFO once the window is full.
    pub max_rate_samples: usize,
}

impl EconomyConfig {
    // ===== compile-time constants =====
    /// Rolling-window capacity for rate estimation.
    pub const MAX_RATE_SAMPLES: usize = 20;
    /// Decimal-exponent gap beyond which Magnitude addition treats the
    /// smaller operand as negligible (matches f64 mantissa precision).
    pub const MAX_ALIGN_DIGITS: i64 = 17;
    /// Exponent bounds within which Magnitude displays as a plain number.
    /// Outside this range scientific notation is used.
    pub const PLAIN_DISPLAY_MIN_EXP: i64 = -4;
    pub const PLAIN_DISPLAY_MAX_EXP: i64 = 5;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_RATE_STALE_SECS: f64 = 10.0;

    pub fn new() -> Self {
        Self {
            rate_stale_secs: Self::DEFAULT_RATE_STALE_SECS,
            max_rate_samples: Self::MAX_RATE_SAMPLES,
        }
    }
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self::new()
    }
}
