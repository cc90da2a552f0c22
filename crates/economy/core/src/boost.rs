//! Boost contributions and the modifier-aggregation engine.
//!
//! World objects and timed effects offer boosts to aggregation targets
//! (production nodes, upgrade nodes, units in flight). Each contributor
//! holds at most one live contribution per target; re-registering under the
//! same id replaces the prior offer atomically, so there is never a
//! transient double-count.
//!
//! The aggregator owns its contribution table outright. Contributors only
//! ever name their own [`ContributorId`] - there is no shared mutable boost
//! object for unrelated call sites to observe, and evaluation reads through
//! `&self` while registration requires `&mut self`.

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use crate::bundle::CurrencyBundle;

/// Identity of a boost source (a node, effect, or content object).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContributorId(pub u32);

impl fmt::Display for ContributorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "contributor#{}", self.0)
    }
}

/// Identity of an aggregation target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetId(pub u32);

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "target#{}", self.0)
    }
}

/// Elevation scope of a contribution.
///
/// Units flagged as elevated are boosted only by elevated-scope
/// contributions; ground units only by ground scope. The caller selects
/// participating scopes per evaluation via [`ScopeMask`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BoostScope {
    #[default]
    Ground,
    Elevated,
}

bitflags::bitflags! {
    /// Which scopes participate in an evaluation pass.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ScopeMask: u8 {
        const GROUND = 1;
        const ELEVATED = 1 << 1;
    }
}

impl ScopeMask {
    /// True when `scope` is selected by this mask.
    pub fn selects(&self, scope: BoostScope) -> bool {
        match scope {
            BoostScope::Ground => self.contains(Self::GROUND),
            BoostScope::Elevated => self.contains(Self::ELEVATED),
        }
    }
}

impl From<BoostScope> for ScopeMask {
    fn from(scope: BoostScope) -> Self {
        match scope {
            BoostScope::Ground => Self::GROUND,
            BoostScope::Elevated => Self::ELEVATED,
        }
    }
}

/// One contributor's offer to an aggregation target.
///
/// All bundle fields default to empty (no effect). `ignores_limitations`
/// marks the contribution as exempt from caller-side dampening (softcaps);
/// the aggregator itself only exposes it to evaluation filters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoostContribution {
    pub additive: CurrencyBundle,
    pub multiplicative: CurrencyBundle,
    pub exponent: CurrencyBundle,
    pub ignores_limitations: bool,
    pub scope: BoostScope,
}

impl BoostContribution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the additive bundle (builder pattern).
    pub fn with_additive(mut self, additive: CurrencyBundle) -> Self {
        self.additive = additive;
        self
    }

    /// Sets the multiplicative bundle.
    pub fn with_multiplicative(mut self, multiplicative: CurrencyBundle) -> Self {
        self.multiplicative = multiplicative;
        self
    }

    /// Sets the exponent bundle.
    pub fn with_exponent(mut self, exponent: CurrencyBundle) -> Self {
        self.exponent = exponent;
        self
    }

    pub fn with_scope(mut self, scope: BoostScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn ignoring_limitations(mut self) -> Self {
        self.ignores_limitations = true;
        self
    }

    /// True when the contribution would not change any evaluation.
    pub fn is_empty(&self) -> bool {
        self.additive.is_empty() && self.multiplicative.is_empty() && self.exponent.is_empty()
    }
}

/// Collects boost contributions per target and reduces them on demand.
///
/// Reduction formula per evaluation:
///
/// ```text
/// result = ((base + Σ additive) × Π multiplicative) ^ (Σ exponent, missing ≡ 1)
/// ```
///
/// Nothing is cached between calls; callers decide evaluation cadence
/// (per-unit pass, per display tick, ...). Evaluating a target with no
/// registered contributions returns `base` unchanged.
#[derive(Clone, Debug, Default)]
pub struct ModifierAggregator {
    contributions: BTreeMap<TargetId, BTreeMap<ContributorId, BoostContribution>>,
}

impl ModifierAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) a contributor's offer for a target.
    ///
    /// Replacement is atomic: the old contribution is gone the moment the
    /// new one is visible. Registering an all-empty contribution is a no-op
    /// rather than an error, so partially-initialized content cannot leave
    /// ghost entries behind.
    pub fn register(
        &mut self,
        target: TargetId,
        contributor: ContributorId,
        contribution: BoostContribution,
    ) {
        if contribution.is_empty() {
            debug!(target_id = %target, %contributor, "skipped empty boost contribution");
            return;
        }
        debug!(target_id = %target, %contributor, scope = %contribution.scope, "registered boost contribution");
        self.contributions
            .entry(target)
            .or_default()
            .insert(contributor, contribution);
    }

    /// Removes a contributor's offer for a target; no-op if absent.
    pub fn unregister(&mut self, target: TargetId, contributor: ContributorId) {
        if let Some(entries) = self.contributions.get_mut(&target) {
            if entries.remove(&contributor).is_some() {
                debug!(target_id = %target, %contributor, "unregistered boost contribution");
            }
            if entries.is_empty() {
                self.contributions.remove(&target);
            }
        }
    }

    /// Number of live contributions for a target.
    pub fn contribution_count(&self, target: TargetId) -> usize {
        self.contributions
            .get(&target)
            .map_or(0, |entries| entries.len())
    }

    /// Reduces every live contribution for `target` over `base`.
    pub fn evaluate(&self, target: TargetId, base: &CurrencyBundle) -> CurrencyBundle {
        self.evaluate_filtered(target, base, |_| true)
    }

    /// Reduces only contributions whose scope is selected by `scopes`.
    pub fn evaluate_scoped(
        &self,
        target: TargetId,
        base: &CurrencyBundle,
        scopes: ScopeMask,
    ) -> CurrencyBundle {
        self.evaluate_filtered(target, base, |contribution| {
            scopes.selects(contribution.scope)
        })
    }

    /// Reduces contributions passing an arbitrary caller predicate.
    ///
    /// This is how callers express scope selection or limitation handling
    /// (e.g. evaluate `ignores_limitations` contributions separately from
    /// softcapped ones). Never mutates aggregator state.
    pub fn evaluate_filtered(
        &self,
        target: TargetId,
        base: &CurrencyBundle,
        mut filter: impl FnMut(&BoostContribution) -> bool,
    ) -> CurrencyBundle {
        let Some(entries) = self.contributions.get(&target) else {
            return base.clone();
        };

        let mut additive = CurrencyBundle::zero();
        let mut multiplicative = CurrencyBundle::ones();
        let mut exponent = CurrencyBundle::zero();
        let mut selected = 0usize;
        for contribution in entries.values() {
            if !filter(contribution) {
                continue;
            }
            additive = additive.add(&contribution.additive);
            multiplicative = multiplicative.mul(&contribution.multiplicative);
            exponent = exponent.add(&contribution.exponent);
            selected += 1;
        }
        if selected == 0 {
            return base.clone();
        }

        let result = base.add(&additive).mul(&multiplicative);
        if exponent.is_empty() {
            result
        } else {
            result.pow(&exponent)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::Currency;
    use crate::magnitude::Magnitude;

    fn funds(amount: f64) -> CurrencyBundle {
        CurrencyBundle::zero().set(Currency::Funds, Magnitude::from(amount))
    }

    #[test]
    fn additive_then_multiplicative() {
        let mut aggregator = ModifierAggregator::new();
        let target = TargetId(1);
        aggregator.register(
            target,
            ContributorId(1),
            BoostContribution::new().with_multiplicative(funds(2.0)),
        );
        aggregator.register(
            target,
            ContributorId(2),
            BoostContribution::new().with_additive(funds(50.0)),
        );

        // (100 + 50) * 2 = 300
        let result = aggregator.evaluate(target, &funds(100.0));
        assert_eq!(result.get(Currency::Funds), Magnitude::from(300.0));
    }

    #[test]
    fn no_contributions_returns_base_unchanged() {
        let aggregator = ModifierAggregator::new();
        let base = funds(100.0);
        assert_eq!(aggregator.evaluate(TargetId(9), &base), base);
    }

    #[test]
    fn reregistration_replaces_not_stacks() {
        let mut aggregator = ModifierAggregator::new();
        let target = TargetId(1);
        let contributor = ContributorId(7);
        aggregator.register(
            target,
            contributor,
            BoostContribution::new().with_additive(funds(50.0)),
        );
        aggregator.register(
            target,
            contributor,
            BoostContribution::new().with_additive(funds(20.0)),
        );

        assert_eq!(aggregator.contribution_count(target), 1);
        let result = aggregator.evaluate(target, &funds(100.0));
        // 100 + 20, never 100 + 50 + 20
        assert_eq!(result.get(Currency::Funds), Magnitude::from(120.0));
    }

    #[test]
    fn unregister_restores_the_unboosted_result() {
        let mut aggregator = ModifierAggregator::new();
        let target = TargetId(1);
        let base = funds(100.0);
        let untouched = aggregator.evaluate(target, &base);

        aggregator.register(
            target,
            ContributorId(3),
            BoostContribution::new().with_multiplicative(funds(5.0)),
        );
        assert_ne!(aggregator.evaluate(target, &base), untouched);

        aggregator.unregister(target, ContributorId(3));
        assert_eq!(aggregator.evaluate(target, &base), untouched);
        assert_eq!(aggregator.contribution_count(target), 0);
    }

    #[test]
    fn unregister_unknown_is_a_no_op() {
        let mut aggregator = ModifierAggregator::new();
        aggregator.unregister(TargetId(1), ContributorId(1));
        assert_eq!(aggregator.contribution_count(TargetId(1)), 0);
    }

    #[test]
    fn empty_contribution_is_not_registered() {
        let mut aggregator = ModifierAggregator::new();
        aggregator.register(TargetId(1), ContributorId(1), BoostContribution::new());
        assert_eq!(aggregator.contribution_count(TargetId(1)), 0);
    }

    #[test]
    fn exponents_sum_across_contributors() {
        let mut aggregator = ModifierAggregator::new();
        let target = TargetId(1);
        let half = CurrencyBundle::zero().set(Currency::Funds, Magnitude::from(0.5));
        aggregator.register(
            target,
            ContributorId(1),
            BoostContribution::new().with_exponent(half.clone()),
        );
        aggregator.register(
            target,
            ContributorId(2),
            BoostContribution::new().with_exponent(half),
        );

        // Exponents sum to 1.0: base passes through unchanged.
        let result = aggregator.evaluate(target, &funds(100.0));
        assert_eq!(result.get(Currency::Funds), Magnitude::from(100.0));
    }

    #[test]
    fn scope_mask_filters_contributions() {
        let mut aggregator = ModifierAggregator::new();
        let target = TargetId(1);
        aggregator.register(
            target,
            ContributorId(1),
            BoostContribution::new().with_multiplicative(funds(2.0)),
        );
        aggregator.register(
            target,
            ContributorId(2),
            BoostContribution::new()
                .with_multiplicative(funds(10.0))
                .with_scope(BoostScope::Elevated),
        );

        let base = funds(100.0);
        let ground = aggregator.evaluate_scoped(target, &base, ScopeMask::GROUND);
        assert_eq!(ground.get(Currency::Funds), Magnitude::from(200.0));

        let elevated = aggregator.evaluate_scoped(target, &base, ScopeMask::ELEVATED);
        assert_eq!(elevated.get(Currency::Funds), Magnitude::from(1000.0));

        let both = aggregator.evaluate_scoped(target, &base, ScopeMask::all());
        assert_eq!(both.get(Currency::Funds), Magnitude::from(2000.0));
    }

    #[test]
    fn limitation_exempt_contributions_selectable_by_filter() {
        let mut aggregator = ModifierAggregator::new();
        let target = TargetId(1);
        aggregator.register(
            target,
            ContributorId(1),
            BoostContribution::new()
                .with_multiplicative(funds(3.0))
                .ignoring_limitations(),
        );
        aggregator.register(
            target,
            ContributorId(2),
            BoostContribution::new().with_multiplicative(funds(2.0)),
        );

        let base = funds(10.0);
        let capped_part = aggregator.evaluate_filtered(target, &base, |c| !c.ignores_limitations);
        assert_eq!(capped_part.get(Currency::Funds), Magnitude::from(20.0));

        let exempt_part = aggregator.evaluate_filtered(target, &base, |c| c.ignores_limitations);
        assert_eq!(exempt_part.get(Currency::Funds), Magnitude::from(30.0));
    }

    #[test]
    fn targets_are_isolated() {
        let mut aggregator = ModifierAggregator::new();
        aggregator.register(
            TargetId(1),
            ContributorId(1),
            BoostContribution::new().with_multiplicative(funds(2.0)),
        );

        let base = funds(100.0);
        assert_eq!(
            aggregator.evaluate(TargetId(2), &base).get(Currency::Funds),
            Magnitude::from(100.0)
        );
    }
}
