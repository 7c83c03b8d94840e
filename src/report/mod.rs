//! Read-only projections of a network for display and export.

use crate::domain::{Decimal, MemberId, Tier, Wallet};
use crate::network::{Network, NetworkError};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

pub mod export;

pub use export::{export_payout_csv, payout_csv_string, write_payout_csv};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything a member lookup shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberSummary {
    pub id: MemberId,
    pub name: String,
    pub tier: Tier,
    pub sponsor: Option<MemberId>,
    pub left: Option<MemberId>,
    pub right: Option<MemberId>,
    pub wallet: Wallet,
    pub total_earned: Decimal,
    /// Members anywhere below in the binary tree.
    pub team_size: usize,
    /// Members this one sponsored directly.
    pub direct_recruits: usize,
}

impl MemberSummary {
    pub fn build(network: &Network, id: MemberId) -> Result<Self, NetworkError> {
        let member = network.get(id)?;
        Ok(MemberSummary {
            id,
            name: member.name.clone(),
            tier: member.tier,
            sponsor: member.sponsor,
            left: member.left,
            right: member.right,
            wallet: member.wallet,
            total_earned: member.wallet.total(),
            team_size: network.subtree_size(id)?,
            direct_recruits: network.direct_recruits(id)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EarnerRow {
    pub rank: usize,
    pub id: MemberId,
    pub tier: Tier,
    pub total: Decimal,
    pub passive: Decimal,
    pub direct: Decimal,
}

/// Highest lifetime earners. Equal totals keep registration order.
pub fn top_earners(network: &Network, limit: usize) -> Vec<EarnerRow> {
    let mut members: Vec<_> = network.members().collect();
    members.sort_by(|a, b| b.wallet.total().cmp(&a.wallet.total()));

    members
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, m)| EarnerRow {
            rank: i + 1,
            id: m.id,
            tier: m.tier,
            total: m.wallet.total(),
            passive: m.wallet.passive,
            direct: m.wallet.direct,
        })
        .collect()
}

/// Network-wide totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStats {
    pub members: usize,
    pub periods: usize,
    pub members_by_tier: BTreeMap<Tier, usize>,
    /// Sum of every wallet, per channel.
    pub lifetime_payout: Wallet,
    pub lifetime_total: Decimal,
    pub lifetime_revenue: Decimal,
    pub lifetime_cv_volume: Decimal,
}

impl NetworkStats {
    pub fn collect(network: &Network) -> Self {
        let mut members_by_tier = BTreeMap::new();
        let mut lifetime_payout = Wallet::new();
        for m in network.members() {
            *members_by_tier.entry(m.tier).or_insert(0) += 1;
            lifetime_payout.self_rebate += m.wallet.self_rebate;
            lifetime_payout.direct += m.wallet.direct;
            lifetime_payout.passive += m.wallet.passive;
        }

        NetworkStats {
            members: network.len(),
            periods: network.history().len(),
            members_by_tier,
            lifetime_total: lifetime_payout.total(),
            lifetime_payout,
            lifetime_revenue: network.history().iter().map(|h| h.revenue).sum(),
            lifetime_cv_volume: network.history().iter().map(|h| h.cv_volume).sum(),
        }
    }
}

/// One member's credits in the latest payout run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutRow {
    pub member_id: MemberId,
    #[serde(rename = "self")]
    pub self_rebate: Decimal,
    pub direct: Decimal,
    pub passive: Decimal,
    pub total: Decimal,
}

/// Ledger of the latest run as rows, ascending by member id.
pub fn payout_rows(network: &Network) -> Vec<PayoutRow> {
    network
        .ledger()
        .iter()
        .map(|(id, w)| PayoutRow {
            member_id: id,
            self_rebate: w.self_rebate,
            direct: w.direct,
            passive: w.passive,
            total: w.total(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Transaction;
    use crate::engine::CommissionEngine;

    fn id(n: u64) -> MemberId {
        MemberId::new(n)
    }

    fn paid_network() -> Network {
        let mut network = Network::with_root("root", Tier::new(100));
        let a = network.register("a", Tier::new(100), Some(id(1)));
        network.register("b", Tier::new(250), Some(a));
        CommissionEngine::default()
            .run_payouts(&mut network, &[Transaction::new(id(3), Decimal::from_int(40))])
            .unwrap();
        network
    }

    #[test]
    fn test_member_summary() {
        let network = paid_network();
        let summary = MemberSummary::build(&network, id(2)).unwrap();
        assert_eq!(summary.sponsor, Some(id(1)));
        assert_eq!(summary.left, Some(id(3)));
        assert_eq!(summary.team_size, 1);
        assert_eq!(summary.direct_recruits, 1);
        assert_eq!(summary.total_earned, Decimal::from_int(8));

        assert!(MemberSummary::build(&network, id(4)).is_err());
    }

    #[test]
    fn test_top_earners_sorted_with_stable_ties() {
        let network = paid_network();
        let rows = top_earners(&network, 10);
        // a: direct 6 + passive 2; b: self 4; root: passive 2.
        let ids: Vec<_> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![id(2), id(3), id(1)]);
        assert_eq!(rows[0].rank, 1);

        assert_eq!(top_earners(&network, 1).len(), 1);
    }

    #[test]
    fn test_network_stats() {
        let network = paid_network();
        let stats = NetworkStats::collect(&network);
        assert_eq!(stats.members, 3);
        assert_eq!(stats.members_by_tier[&Tier::new(100)], 2);
        assert_eq!(stats.members_by_tier[&Tier::new(250)], 1);
        assert_eq!(stats.lifetime_total, Decimal::from_int(14));
    }

    #[test]
    fn test_payout_rows_from_ledger() {
        let network = paid_network();
        let rows = payout_rows(&network);
        let ids: Vec<_> = rows.iter().map(|r| r.member_id).collect();
        assert_eq!(ids, vec![id(1), id(2), id(3)]);
        assert_eq!(rows[1].direct, Decimal::from_int(6));
        assert_eq!(rows[1].total, Decimal::from_int(8));
    }
}
