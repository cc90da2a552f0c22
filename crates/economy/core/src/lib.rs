//! Deterministic economy engine for an incremental/tycoon simulation.
//!
//! `economy-core` defines the quantity algebra ([`Magnitude`],
//! [`CurrencyBundle`]), the formula-evaluation pipeline ([`Formula`],
//! [`Softcap`]), the modifier-aggregation engine ([`ModifierAggregator`])
//! and the display-rate estimator ([`RateEstimator`]). Everything is a
//! synchronous pure (or near-pure) computation: the surrounding world
//! simulation, UI and persistence layers are thin consumers of the types
//! re-exported here.
pub mod boost;
pub mod bundle;
pub mod config;
pub mod currency;
pub mod error;
pub mod formula;
pub mod magnitude;
pub mod node;
pub mod oracle;
pub mod rate;
pub mod softcap;
pub use boost::{
    BoostContribution, BoostScope, ContributorId, ModifierAggregator, ScopeMask, TargetId,
};
pub use bundle::CurrencyBundle;
pub use config::EconomyConfig;
pub use currency::Currency;
pub use error::{EconomyError, ErrorSeverity};
pub use formula::{Formula, FormulaError, FormulaStep};
pub use magnitude::Magnitude;
pub use node::{NodeCapabilities, NodeProfile};
pub use oracle::BalanceOracle;
pub use rate::{RateEstimator, RateSample};
pub use softcap::{Softcap, SoftcapCurve};
