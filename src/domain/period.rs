//! Per-period aggregates, payout ledger and history records.

use crate::domain::{Channel, Decimal, MemberId, Wallet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregates of the payout run currently held by the network.
///
/// Reset at the start of every run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodStats {
    pub revenue: Decimal,
    pub cv_volume: Decimal,
    pub self_payout: Decimal,
    pub direct_payout: Decimal,
    pub passive_payout: Decimal,
}

impl PeriodStats {
    /// The stats after recording `amount`, or None if a channel total or
    /// the overall payout would leave the decimal range.
    pub fn checked_record_payout(&self, channel: Channel, amount: Decimal) -> Option<PeriodStats> {
        let mut next = *self;
        let slot = match channel {
            Channel::SelfRebate => &mut next.self_payout,
            Channel::Direct => &mut next.direct_payout,
            Channel::Passive => &mut next.passive_payout,
        };
        *slot = slot.checked_add(amount)?;
        next.self_payout
            .checked_add(next.direct_payout)?
            .checked_add(next.passive_payout)?;
        Some(next)
    }

    pub fn total_payout(&self) -> Decimal {
        self.self_payout + self.direct_payout + self.passive_payout
    }

    /// CV retained after all commissions.
    pub fn margin(&self) -> Decimal {
        self.cv_volume - self.total_payout()
    }
}

/// Per-member amounts credited during one payout run.
///
/// Keyed by id, so iteration follows registration order. Members credited
/// nothing have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayoutLedger {
    entries: BTreeMap<MemberId, Wallet>,
}

impl PayoutLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn credit(&mut self, member: MemberId, channel: Channel, amount: Decimal) {
        self.entries.entry(member).or_default().credit(channel, amount);
    }

    pub fn get(&self, member: MemberId) -> Option<&Wallet> {
        self.entries.get(&member)
    }

    pub fn iter(&self) -> impl Iterator<Item = (MemberId, &Wallet)> {
        self.entries.iter().map(|(id, wallet)| (*id, wallet))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn total(&self) -> Decimal {
        self.entries.values().map(Wallet::total).sum()
    }
}

/// Immutable summary appended to history once per simulated period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSummary {
    pub period: u32,
    pub members: usize,
    pub revenue: Decimal,
    pub cv_volume: Decimal,
    pub self_payout: Decimal,
    pub direct_payout: Decimal,
    pub passive_payout: Decimal,
    pub total_payout: Decimal,
    pub margin: Decimal,
    pub upgrades: usize,
}

impl PeriodSummary {
    pub fn from_stats(period: u32, members: usize, stats: &PeriodStats, upgrades: usize) -> Self {
        PeriodSummary {
            period,
            members,
            revenue: stats.revenue,
            cv_volume: stats.cv_volume,
            self_payout: stats.self_payout,
            direct_payout: stats.direct_payout,
            passive_payout: stats.passive_payout,
            total_payout: stats.total_payout(),
            margin: stats.margin(),
            upgrades,
        }
    }
}
