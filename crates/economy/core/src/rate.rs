//! Rolling-window estimation of per-second gain.
//!
//! [`RateEstimator`] consumes irregularly spaced balance snapshots and
//! reports a mean per-second delta for display ("+1.2e9 funds/s"). Time is
//! caller-supplied seconds, never read from a clock, so the estimator stays
//! deterministic and testable like the rest of the engine.

use std::collections::VecDeque;

use crate::config::EconomyConfig;
use crate::magnitude::Magnitude;

/// One windowed observation: how much changed, over how long.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RateSample {
    pub delta: Magnitude,
    pub elapsed: f64,
}

#[derive(Clone, Copy, Debug)]
struct Snapshot {
    amount: Magnitude,
    time: f64,
}

/// Size-bounded FIFO window of deltas plus the last raw snapshot.
///
/// Two feeding styles:
/// - [`RateEstimator::record_absolute`] for polled totals ("funds is now X"),
///   which differences against the previous snapshot;
/// - [`RateEstimator::record_relative`] for event-driven gains ("+X just
///   happened"), appended unconditioned.
#[derive(Clone, Debug)]
pub struct RateEstimator {
    window: VecDeque<RateSample>,
    baseline: Option<Snapshot>,
    max_samples: usize,
    stale_after: f64,
}

impl RateEstimator {
    pub fn new() -> Self {
        Self::with_config(&EconomyConfig::default())
    }

    pub fn with_config(config: &EconomyConfig) -> Self {
        Self {
            window: VecDeque::with_capacity(config.max_rate_samples),
            baseline: None,
            max_samples: config.max_rate_samples,
            stale_after: config.rate_stale_secs,
        }
    }

    /// Records a polled absolute total at `now` (seconds).
    ///
    /// The first call only establishes the baseline. A zero delta produces
    /// no sample but refreshes the baseline to `(amount, now)`, so an idle
    /// stretch shortens the next sample's elapsed window instead of
    /// inflating it.
    pub fn record_absolute(&mut self, amount: Magnitude, now: f64) {
        let Some(baseline) = self.baseline else {
            self.baseline = Some(Snapshot { amount, time: now });
            return;
        };

        let delta = amount.sub(baseline.amount);
        if delta.is_zero() {
            self.baseline = Some(Snapshot { amount, time: now });
            return;
        }

        self.push_sample(RateSample {
            delta,
            elapsed: now - baseline.time,
        });
        self.baseline = Some(Snapshot { amount, time: now });
    }

    /// Records an event-driven gain at `now` (seconds), unconditioned.
    ///
    /// Elapsed is measured from the previous snapshot (zero for the very
    /// first event); the baseline advances so staleness tracking keeps
    /// working for event-only feeds.
    pub fn record_relative(&mut self, delta: Magnitude, now: f64) {
        let elapsed = self.baseline.map_or(0.0, |baseline| now - baseline.time);
        self.push_sample(RateSample { delta, elapsed });
        self.baseline = Some(match self.baseline {
            Some(baseline) => Snapshot {
                amount: baseline.amount.add(delta),
                time: now,
            },
            None => Snapshot {
                amount: delta,
                time: now,
            },
        });
    }

    /// Mean per-second rate over the window.
    ///
    /// Zero when nothing has been recorded or the last snapshot is older
    /// than the staleness bound (the feed went idle). Samples with a zero
    /// elapsed window contribute their raw delta.
    pub fn mean_rate(&self, now: f64) -> Magnitude {
        let Some(baseline) = self.baseline else {
            return Magnitude::ZERO;
        };
        if now - baseline.time > self.stale_after || self.window.is_empty() {
            return Magnitude::ZERO;
        }

        let sum = self.window.iter().fold(Magnitude::ZERO, |acc, sample| {
            let rate = if sample.elapsed > 0.0 {
                sample.delta.div(Magnitude::from(sample.elapsed))
            } else {
                sample.delta
            };
            acc.add(rate)
        });
        sum.div(Magnitude::from(self.window.len() as u64))
    }

    /// Plain arithmetic mean of the windowed deltas, elapsed time ignored.
    ///
    /// For callers that want "average recent event size" rather than a rate.
    pub fn mean_amount(&self) -> Magnitude {
        if self.window.is_empty() {
            return Magnitude::ZERO;
        }
        let sum = self
            .window
            .iter()
            .fold(Magnitude::ZERO, |acc, sample| acc.add(sample.delta));
        sum.div(Magnitude::from(self.window.len() as u64))
    }

    /// Number of samples currently in the window.
    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    fn push_sample(&mut self, sample: RateSample) {
        if self.window.len() == self.max_samples {
            self.window.pop_front();
        }
        self.window.push_back(sample);
    }
}

impl Default for RateEstimator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Magnitude, b: f64) {
        let av = a.to_f64();
        assert!(
            (av - b).abs() <= b.abs().max(1.0) * 1e-9,
            "expected {b}, got {av}"
        );
    }

    #[test]
    fn first_absolute_sample_is_only_a_baseline() {
        let mut estimator = RateEstimator::new();
        estimator.record_absolute(Magnitude::from(100.0), 0.0);
        assert!(estimator.is_empty());
        assert_eq!(estimator.mean_rate(0.0), Magnitude::ZERO);
    }

    #[test]
    fn polled_feed_with_idle_gap() {
        let mut estimator = RateEstimator::new();
        estimator.record_absolute(Magnitude::ZERO, 0.0);
        estimator.record_absolute(Magnitude::from(10.0), 1.0);
        // No change at t=2: discarded, but the baseline timestamp advances.
        estimator.record_absolute(Magnitude::from(10.0), 2.0);

        assert_eq!(estimator.len(), 1);
        close(estimator.mean_rate(2.0), 10.0);

        // The refreshed baseline means the next delta spans 2.0..=3.0 only.
        estimator.record_absolute(Magnitude::from(30.0), 3.0);
        assert_eq!(estimator.len(), 2);
        // Samples: 10/1s and 20/1s -> mean 15/s.
        close(estimator.mean_rate(3.0), 15.0);
    }

    #[test]
    fn stale_baseline_reports_zero() {
        let mut estimator = RateEstimator::new();
        estimator.record_absolute(Magnitude::ZERO, 0.0);
        estimator.record_absolute(Magnitude::from(10.0), 1.0);
        close(estimator.mean_rate(5.0), 10.0);
        assert_eq!(estimator.mean_rate(11.5), Magnitude::ZERO);
        // mean_amount is not staleness-gated.
        close(estimator.mean_amount(), 10.0);
    }

    #[test]
    fn window_evicts_oldest_past_capacity() {
        let mut estimator = RateEstimator::new();
        // A huge first sample, then 20 small ones push it out.
        estimator.record_relative(Magnitude::from(1.0e6), 0.0);
        for i in 0..EconomyConfig::MAX_RATE_SAMPLES {
            estimator.record_relative(Magnitude::from(2.0), i as f64 + 1.0);
        }
        assert_eq!(estimator.len(), EconomyConfig::MAX_RATE_SAMPLES);
        // Every surviving sample is 2/1s.
        close(estimator.mean_rate(EconomyConfig::MAX_RATE_SAMPLES as f64), 2.0);
        close(estimator.mean_amount(), 2.0);
    }

    #[test]
    fn relative_feed_measures_elapsed_between_events() {
        let mut estimator = RateEstimator::new();
        estimator.record_relative(Magnitude::from(5.0), 0.0);
        estimator.record_relative(Magnitude::from(10.0), 2.0);

        // First event: zero elapsed, contributes its delta (5).
        // Second: 10 over 2s -> 5/s. Mean = 5/s.
        close(estimator.mean_rate(2.0), 5.0);
        close(estimator.mean_amount(), 7.5);
    }

    #[test]
    fn falling_balance_yields_negative_rate() {
        let mut estimator = RateEstimator::new();
        estimator.record_absolute(Magnitude::from(100.0), 0.0);
        estimator.record_absolute(Magnitude::from(40.0), 2.0);
        close(estimator.mean_rate(2.0), -30.0);
    }

    #[test]
    fn custom_config_window_and_staleness() {
        let config = EconomyConfig {
            rate_stale_secs: 1.0,
            max_rate_samples: 2,
        };
        let mut estimator = RateEstimator::with_config(&config);
        estimator.record_relative(Magnitude::from(100.0), 0.0);
        estimator.record_relative(Magnitude::from(4.0), 1.0);
        estimator.record_relative(Magnitude::from(6.0), 2.0);

        assert_eq!(estimator.len(), 2);
        close(estimator.mean_amount(), 5.0);
        assert_eq!(estimator.mean_rate(3.5), Magnitude::ZERO);
    }
}
