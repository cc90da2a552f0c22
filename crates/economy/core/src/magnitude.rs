//! Arbitrary-range numeric values for currency quantities.
//!
//! [`Magnitude`] stores a value as a normalized decimal mantissa plus an
//! `i64` exponent, so quantities can grow (or shrink) hundreds of orders of
//! magnitude beyond native floating-point range while keeping ordering and
//! comparison exact.
//!
//! # Precision policy
//!
//! The mantissa is an `f64`, giving ~15-17 significant decimal digits.
//! When two operands are added and their exponents differ by more than
//! [`EconomyConfig::MAX_ALIGN_DIGITS`], the smaller operand is negligible at
//! the larger's scale and the larger is returned unchanged. This is a
//! documented, tested property rather than an accident: formatting is stable
//! and comparison stays monotonic at every scale.
//!
//! # Value semantics
//!
//! `Magnitude` is `Copy`; every operation returns a new value. No operation
//! panics: non-finite inputs normalize to zero and degenerate divisions
//! resolve to zero (use [`Magnitude::checked_div`] / [`Magnitude::checked_log`]
//! when the caller wants to observe the domain error instead).

use core::cmp::Ordering;
use core::fmt;

use crate::config::EconomyConfig;

/// A non-negative-or-signed quantity with an arbitrary decimal exponent.
///
/// Invariant: `mantissa` is either exactly `0.0` (with `exponent == 0`) or
/// has absolute value in `[1, 10)`. All constructors normalize, so two equal
/// values always have identical representations and `Eq` is exact-value
/// equality.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "MagnitudeRepr", into = "MagnitudeRepr")
)]
pub struct Magnitude {
    mantissa: f64,
    exponent: i64,
}

impl Magnitude {
    pub const ZERO: Self = Self {
        mantissa: 0.0,
        exponent: 0,
    };

    pub const ONE: Self = Self {
        mantissa: 1.0,
        exponent: 0,
    };

    /// Builds a normalized magnitude from a raw mantissa/exponent pair.
    ///
    /// Non-finite mantissas normalize to zero.
    pub fn from_parts(mantissa: f64, exponent: i64) -> Self {
        if !mantissa.is_finite() || mantissa == 0.0 {
            return Self::ZERO;
        }

        let mut mantissa = mantissa;
        let mut exponent = exponent;

        // Bring |mantissa| into [1, 10) in one step, then fix boundary drift
        // from the floating-point log/pow round trip.
        let shift = mantissa.abs().log10().floor();
        if shift != 0.0 {
            mantissa /= 10f64.powf(shift);
            exponent += shift as i64;
        }
        if mantissa.abs() >= 10.0 {
            mantissa /= 10.0;
            exponent += 1;
        } else if mantissa.abs() < 1.0 {
            mantissa *= 10.0;
            exponent -= 1;
        }

        Self { mantissa, exponent }
    }

    /// `10^exponent`, handy for thresholds like `Magnitude::ten_pow(33)`.
    pub const fn ten_pow(exponent: i64) -> Self {
        Self {
            mantissa: 1.0,
            exponent,
        }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.mantissa == 0.0
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.mantissa < 0.0
    }

    /// Sign as -1, 0, or 1.
    #[inline]
    fn sign(&self) -> i8 {
        if self.mantissa > 0.0 {
            1
        } else if self.mantissa < 0.0 {
            -1
        } else {
            0
        }
    }

    pub fn abs(self) -> Self {
        Self {
            mantissa: self.mantissa.abs(),
            exponent: self.exponent,
        }
    }

    pub fn neg(self) -> Self {
        if self.is_zero() {
            return Self::ZERO;
        }
        Self {
            mantissa: -self.mantissa,
            exponent: self.exponent,
        }
    }

    /// Adds two magnitudes, aligning exponents.
    ///
    /// When the exponents differ by more than
    /// [`EconomyConfig::MAX_ALIGN_DIGITS`] the smaller operand is below the
    /// representable precision of the larger and the larger is returned
    /// unchanged.
    pub fn add(self, rhs: Self) -> Self {
        if self.is_zero() {
            return rhs;
        }
        if rhs.is_zero() {
            return self;
        }

        // Normalized mantissas mean the higher exponent always carries the
        // larger absolute value.
        let (hi, lo) = if self.exponent >= rhs.exponent {
            (self, rhs)
        } else {
            (rhs, self)
        };
        let gap = hi.exponent - lo.exponent;
        if gap > EconomyConfig::MAX_ALIGN_DIGITS {
            return hi;
        }

        let aligned = lo.mantissa / 10f64.powi(gap as i32);
        Self::from_parts(hi.mantissa + aligned, hi.exponent)
    }

    /// Signed subtraction. Total over the whole domain; the result may be
    /// negative (rate-estimator deltas rely on this).
    pub fn sub(self, rhs: Self) -> Self {
        self.add(rhs.neg())
    }

    /// Currency-style subtraction: floors at zero instead of going negative.
    ///
    /// This is the uniform policy for bundle amounts - a currency balance
    /// never drops below zero, it empties.
    pub fn saturating_sub(self, rhs: Self) -> Self {
        if rhs >= self { Self::ZERO } else { self.sub(rhs) }
    }

    pub fn mul(self, rhs: Self) -> Self {
        if self.is_zero() || rhs.is_zero() {
            return Self::ZERO;
        }
        Self::from_parts(self.mantissa * rhs.mantissa, self.exponent + rhs.exponent)
    }

    /// Division with neutral-value resolution: a zero divisor yields zero so
    /// a misconfigured content definition cannot poison unrelated
    /// evaluations. Use [`Magnitude::checked_div`] to observe the error.
    pub fn div(self, rhs: Self) -> Self {
        self.checked_div(rhs).unwrap_or(Self::ZERO)
    }

    /// Division returning `None` on a zero divisor.
    pub fn checked_div(self, rhs: Self) -> Option<Self> {
        if rhs.is_zero() {
            return None;
        }
        if self.is_zero() {
            return Some(Self::ZERO);
        }
        Some(Self::from_parts(
            self.mantissa / rhs.mantissa,
            self.exponent - rhs.exponent,
        ))
    }

    /// Raises the value to a real exponent.
    ///
    /// Defined for non-negative bases: `0^0 == 1`, `0^p == 0`, and a
    /// negative base resolves to zero (currency quantities are never raised
    /// from below zero).
    pub fn pow(self, exponent: f64) -> Self {
        if exponent == 0.0 {
            return Self::ONE;
        }
        if self.is_zero() || self.is_negative() {
            return Self::ZERO;
        }

        // x^p = 10^(p * log10(x)), split into integer exponent + mantissa.
        let log10 = self.exponent as f64 + self.mantissa.log10();
        let scaled = log10 * exponent;
        if !scaled.is_finite() {
            return Self::ZERO;
        }
        let int_part = scaled.floor();
        Self::from_parts(10f64.powf(scaled - int_part), int_part as i64)
    }

    /// Logarithm in an arbitrary base. `None` for non-positive values or a
    /// base that is non-positive or one.
    pub fn checked_log(self, base: f64) -> Option<Self> {
        if self.is_zero() || self.is_negative() || !(base > 0.0) || base == 1.0 {
            return None;
        }
        let log10 = self.exponent as f64 + self.mantissa.log10();
        Some(Self::from(log10 / base.log10()))
    }

    /// Best-effort native conversion. Values beyond f64 range saturate to
    /// infinity (or zero on the small side).
    pub fn to_f64(self) -> f64 {
        let exponent = self.exponent.clamp(-400, 400) as i32;
        self.mantissa * 10f64.powi(exponent)
    }

    /// Display form used by the presentation collaborator.
    pub fn to_display_string(&self) -> String {
        self.to_string()
    }
}

impl PartialEq for Magnitude {
    fn eq(&self, other: &Self) -> bool {
        // Normalization makes representation canonical; NaN is never stored.
        self.exponent == other.exponent && self.mantissa == other.mantissa
    }
}

impl Eq for Magnitude {}

impl PartialOrd for Magnitude {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Magnitude {
    fn cmp(&self, other: &Self) -> Ordering {
        let sign = self.sign();
        match sign.cmp(&other.sign()) {
            Ordering::Equal if sign == 0 => Ordering::Equal,
            Ordering::Equal => match self.exponent.cmp(&other.exponent) {
                // Same exponent: signed mantissas compare directly.
                Ordering::Equal => self
                    .mantissa
                    .partial_cmp(&other.mantissa)
                    .unwrap_or(Ordering::Equal),
                // A higher exponent means further from zero, which for
                // negative values means smaller.
                ord if sign < 0 => ord.reverse(),
                ord => ord,
            },
            ord => ord,
        }
    }
}

impl Default for Magnitude {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<f64> for Magnitude {
    fn from(value: f64) -> Self {
        Self::from_parts(value, 0)
    }
}

impl From<u64> for Magnitude {
    fn from(value: u64) -> Self {
        Self::from_parts(value as f64, 0)
    }
}

impl From<u32> for Magnitude {
    fn from(value: u32) -> Self {
        Self::from_parts(f64::from(value), 0)
    }
}

impl fmt::Display for Magnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        if (EconomyConfig::PLAIN_DISPLAY_MIN_EXP..=EconomyConfig::PLAIN_DISPLAY_MAX_EXP)
            .contains(&self.exponent)
        {
            return write!(f, "{}", self.to_f64());
        }

        // Scientific form with the mantissa rounded to two decimals.
        let mut mantissa = (self.mantissa * 100.0).round() / 100.0;
        let mut exponent = self.exponent;
        if mantissa.abs() >= 10.0 {
            mantissa /= 10.0;
            exponent += 1;
        }
        write!(f, "{}e{}", mantissa, exponent)
    }
}

/// Raw serialized form; deserialization re-normalizes through
/// [`Magnitude::from_parts`] so persisted values can never violate the
/// mantissa invariant.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct MagnitudeRepr {
    mantissa: f64,
    exponent: i64,
}

#[cfg(feature = "serde")]
impl From<MagnitudeRepr> for Magnitude {
    fn from(repr: MagnitudeRepr) -> Self {
        Self::from_parts(repr.mantissa, repr.exponent)
    }
}

#[cfg(feature = "serde")]
impl From<Magnitude> for MagnitudeRepr {
    fn from(value: Magnitude) -> Self {
        Self {
            mantissa: value.mantissa,
            exponent: value.exponent,
        }
    }
}
