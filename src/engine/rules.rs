//! Per-tier passive payout rules.

use super::EngineError;
use crate::domain::Tier;
use std::collections::BTreeMap;
use std::str::FromStr;
use thiserror::Error;

/// Passive rule attached to a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierRule {
    /// Maximum descendants inspected per passive computation.
    pub cap: usize,
    /// Floor applied to the observed depth in the payout divisor.
    pub min_depth: u32,
}

impl TierRule {
    pub fn new(cap: usize, min_depth: u32) -> Self {
        TierRule { cap, min_depth }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleTableParseError {
    #[error("expected tier:cap:min_depth, got {0:?}")]
    Malformed(String),
    #[error("tier {0} listed more than once")]
    DuplicateTier(Tier),
    #[error("no tier rules given")]
    Empty,
}

/// Tier → rule lookup. Tiers missing from the table are rejected, never
/// defaulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    rules: BTreeMap<Tier, TierRule>,
}

impl RuleTable {
    pub fn new() -> Self {
        RuleTable {
            rules: BTreeMap::new(),
        }
    }

    /// The reference packages. Caps are `2^min_depth`, kept as given.
    pub fn reference() -> Self {
        let mut table = Self::new();
        table.insert(Tier::new(100), TierRule::new(1 << 10, 10));
        table.insert(Tier::new(250), TierRule::new(1 << 15, 15));
        table.insert(Tier::new(500), TierRule::new(1 << 20, 20));
        table
    }

    pub fn insert(&mut self, tier: Tier, rule: TierRule) -> Option<TierRule> {
        self.rules.insert(tier, rule)
    }

    pub fn rule_for(&self, tier: Tier) -> Result<TierRule, EngineError> {
        self.rules
            .get(&tier)
            .copied()
            .ok_or(EngineError::UnknownTier(tier))
    }

    pub fn contains(&self, tier: Tier) -> bool {
        self.rules.contains_key(&tier)
    }

    /// Tiers in ascending order.
    pub fn tiers(&self) -> impl Iterator<Item = Tier> + '_ {
        self.rules.keys().copied()
    }

    /// The next tier up, or None when `tier` is the top tier.
    pub fn next_tier(&self, tier: Tier) -> Option<Tier> {
        use std::ops::Bound::{Excluded, Unbounded};
        self.rules
            .range((Excluded(tier), Unbounded))
            .next()
            .map(|(t, _)| *t)
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::reference()
    }
}

impl FromStr for RuleTable {
    type Err = RuleTableParseError;

    /// Parses `tier:cap:min_depth` entries separated by commas,
    /// e.g. `100:1024:10,250:32768:15`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut table = RuleTable::new();

        for entry in s.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let parts: Vec<&str> = entry.split(':').map(str::trim).collect();
            let [tier, cap, min_depth] = parts.as_slice() else {
                return Err(RuleTableParseError::Malformed(entry.to_string()));
            };
            let malformed = || RuleTableParseError::Malformed(entry.to_string());
            let tier = tier.parse::<Tier>().map_err(|_| malformed())?;
            let cap = cap.parse::<usize>().map_err(|_| malformed())?;
            let min_depth = min_depth.parse::<u32>().map_err(|_| malformed())?;
            if min_depth == 0 {
                return Err(malformed());
            }

            if table.insert(tier, TierRule::new(cap, min_depth)).is_some() {
                return Err(RuleTableParseError::DuplicateTier(tier));
            }
        }

        if table.rules.is_empty() {
            return Err(RuleTableParseError::Empty);
        }
        Ok(table)
    }
}
