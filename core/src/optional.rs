//! Probabilistic wrapper: a delegate's value some of the time, None otherwise.
//!
//! Each call draws `p` uniformly from [0, 100) and compares it with the
//! inclusion percent. The default rule is `p <= percent`, under which a
//! percent of 0 still includes the delegate once in a hundred calls and
//! 100 always includes it. `InclusionRule::Exclusive` switches to
//! `p < percent`, where 0 means never and 100 still means always.

use crate::{randomizer::Randomizer, rng::SharedSource};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::num::NonZeroU64;

pub const MAX_PERCENT: i32 = 100;

// Draw space for the percent roll.
const HUNDRED: NonZeroU64 = match NonZeroU64::new(MAX_PERCENT as u64) {
    Some(n) => n,
    None    => unreachable!(),
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InclusionRule {
    /// `p <= percent`: 0% still includes 1 draw in 100.
    #[default]
    Inclusive,
    /// `p < percent`: 0% never includes.
    Exclusive,
}

impl InclusionRule {
    fn includes(self, draw: i32, percent: i32) -> bool {
        match self {
            Self::Inclusive => draw <= percent,
            Self::Exclusive => draw < percent,
        }
    }
}

pub struct OptionalRandomizer<T, R> {
    source:   SharedSource,
    delegate: R,
    percent:  i32,
    rule:     InclusionRule,
    _value:   PhantomData<fn() -> T>,
}

impl<T, R: Randomizer<T>> OptionalRandomizer<T, R> {
    /// Wrap `delegate`. `inclusion_percent` is clamped into [0, 100].
    pub fn new(source: &SharedSource, delegate: R, inclusion_percent: i32) -> Self {
        let percent = inclusion_percent.clamp(0, MAX_PERCENT);
        if percent != inclusion_percent {
            log::debug!("Inclusion percent {inclusion_percent} clamped to {percent}");
        }
        Self {
            source: source.clone(),
            delegate,
            percent,
            rule: InclusionRule::default(),
            _value: PhantomData,
        }
    }

    pub fn with_rule(mut self, rule: InclusionRule) -> Self {
        self.rule = rule;
        self
    }

    /// The effective (clamped) percent.
    pub fn percent(&self) -> i32 {
        self.percent
    }

    pub fn rule(&self) -> InclusionRule {
        self.rule
    }

    pub fn delegate(&self) -> &R {
        &self.delegate
    }
}

impl<T, R: Randomizer<T>> Randomizer<Option<T>> for OptionalRandomizer<T, R> {
    fn random_value(&self) -> Option<T> {
        let draw = self.source.next_below(HUNDRED) as i32;
        if self.rule.includes(draw, self.percent) {
            Some(self.delegate.random_value())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::randomizer::ConstantRandomizer;

    fn wrap(percent: i32) -> OptionalRandomizer<u32, ConstantRandomizer<u32>> {
        OptionalRandomizer::new(&SharedSource::from_seed(17), ConstantRandomizer::new(1), percent)
    }

    #[test]
    fn percent_is_clamped() {
        assert_eq!(wrap(150).percent(), 100);
        assert_eq!(wrap(-5).percent(), 0);
        assert_eq!(wrap(42).percent(), 42);
    }

    #[test]
    fn full_percent_never_absent() {
        let r = wrap(100);
        assert!((0..1_000).all(|_| r.random_value() == Some(1)));
    }

    #[test]
    fn zero_percent_inclusive_is_one_in_a_hundred() {
        let r = wrap(0);
        let hits = (0..20_000).filter(|_| r.random_value().is_some()).count();
        // Expected 200; generous band for a fixed seed.
        assert!((100..=320).contains(&hits), "Got {hits} inclusions out of 20000");
    }

    #[test]
    fn zero_percent_exclusive_is_never() {
        let r = wrap(0).with_rule(InclusionRule::Exclusive);
        assert!((0..5_000).all(|_| r.random_value().is_none()));
    }

    #[test]
    fn exclusive_rule_still_always_includes_at_full_percent() {
        let r = wrap(100).with_rule(InclusionRule::Exclusive);
        assert!((0..1_000).all(|_| r.random_value().is_some()));
    }

    #[test]
    fn rule_comparisons() {
        assert!(InclusionRule::Inclusive.includes(0, 0));
        assert!(!InclusionRule::Exclusive.includes(0, 0));
        assert!(InclusionRule::Inclusive.includes(50, 50));
        assert!(!InclusionRule::Exclusive.includes(50, 50));
    }
}
