//! Batch commission run: self rebate, direct bonus and passive pool.

use super::{EngineError, RuleTable};
use crate::domain::{Channel, Decimal, MemberId, Transaction};
use crate::network::Network;
use std::collections::HashMap;

/// Share of CV rebated to the buyer.
pub fn self_rate() -> Decimal {
    Decimal::from_scaled(10, 2)
}

/// Share of CV paid to the buyer's sponsor.
pub fn direct_rate() -> Decimal {
    Decimal::from_scaled(15, 2)
}

/// Share of team CV that funds a member's passive payout before the depth
/// divisor is applied.
pub fn pool_rate() -> Decimal {
    Decimal::from_scaled(50, 2)
}

/// Breakdown of one member's passive computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassiveOutcome {
    /// CV purchased this period by visited descendants.
    pub team_cv: Decimal,
    /// Deepest visited descendant that purchased.
    pub actual_depth: u32,
    /// Descendants visited before the cap or the subtree ran out.
    pub visited: usize,
    /// `max(actual_depth, min_depth)`.
    pub divisor: u32,
    pub payout: Decimal,
}

/// Applies commission rules to a network one batch at a time.
///
/// Holds no per-run state: results depend only on the network's tree,
/// sponsors and tiers plus the batch itself.
#[derive(Debug, Clone, Default)]
pub struct CommissionEngine {
    rules: RuleTable,
}

impl CommissionEngine {
    pub fn new(rules: RuleTable) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Pay out one period's transactions.
    ///
    /// The whole batch is validated before anything is written, and the run
    /// is committed only once every credit has succeeded, so an error leaves
    /// wallets, stats and ledger exactly as they were. On success the period
    /// stats and ledger describe this batch only.
    pub fn run_payouts(
        &self,
        network: &mut Network,
        transactions: &[Transaction],
    ) -> Result<(), EngineError> {
        self.validate(network, transactions)?;
        // Credits are range-checked one at a time, so a wallet overflowing
        // late in the run must not leave the earlier credits behind.
        let mut staged = network.clone();
        self.apply(&mut staged, transactions)?;
        *network = staged;
        Ok(())
    }

    /// Validate and pay straight into `network`.
    ///
    /// An error past validation can leave the batch half-applied; callers
    /// run this on a copy they discard on failure.
    pub(crate) fn run_payouts_in_place(
        &self,
        network: &mut Network,
        transactions: &[Transaction],
    ) -> Result<(), EngineError> {
        self.validate(network, transactions)?;
        self.apply(network, transactions)
    }

    fn apply(&self, network: &mut Network, transactions: &[Transaction]) -> Result<(), EngineError> {
        network.begin_period();

        for tx in transactions {
            network.record_volume(tx.amount, tx.cv);
            network.credit(tx.buyer, Channel::SelfRebate, tx.cv * self_rate())?;
            if let Some(sponsor) = network.sponsor(tx.buyer)? {
                network.credit(sponsor, Channel::Direct, tx.cv * direct_rate())?;
            }
        }

        // Passive needs the complete per-buyer volume, so it runs strictly
        // after the first pass.
        let volume = period_volume(transactions);
        let mut passive = Vec::new();
        if !volume.is_empty() {
            for member in network.members().filter(|m| m.has_children()) {
                if let Some(outcome) = self.passive_for(network, member.id, &volume)? {
                    tracing::debug!(
                        member = %member.id,
                        team_cv = %outcome.team_cv,
                        depth = outcome.actual_depth,
                        divisor = outcome.divisor,
                        payout = %outcome.payout,
                        "passive payout"
                    );
                    passive.push((member.id, outcome.payout));
                }
            }
        }
        for (id, payout) in passive {
            network.credit(id, Channel::Passive, payout)?;
        }

        let stats = network.period_stats();
        tracing::info!(
            transactions = transactions.len(),
            cv_volume = %stats.cv_volume,
            self_payout = %stats.self_payout,
            direct_payout = %stats.direct_payout,
            passive_payout = %stats.passive_payout,
            "payout run complete"
        );
        Ok(())
    }

    /// Passive computation for a single member against a volume map.
    ///
    /// Returns None when no visited descendant purchased.
    pub fn passive_for(
        &self,
        network: &Network,
        member: MemberId,
        volume: &HashMap<MemberId, Decimal>,
    ) -> Result<Option<PassiveOutcome>, EngineError> {
        let rule = self.rules.rule_for(network.tier(member)?)?;

        let mut team_cv = Decimal::zero();
        let mut actual_depth = 0;
        let visited = network.walk_descendants(member, rule.cap, |node, depth| {
            if let Some(cv) = volume.get(&node.id).filter(|cv| cv.is_positive()) {
                team_cv += *cv;
                actual_depth = actual_depth.max(depth);
            }
        })?;

        if !team_cv.is_positive() {
            return Ok(None);
        }

        let divisor = actual_depth.max(rule.min_depth);
        let payout = team_cv * pool_rate() / Decimal::from_int(i64::from(divisor));
        Ok(Some(PassiveOutcome {
            team_cv,
            actual_depth,
            visited,
            divisor,
            payout,
        }))
    }

    fn validate(&self, network: &Network, transactions: &[Transaction]) -> Result<(), EngineError> {
        for tx in transactions {
            check_amounts(tx)?;
            if !network.contains(tx.buyer) {
                return Err(EngineError::UnknownMember(tx.buyer));
            }
        }
        check_batch_totals(transactions)?;
        for member in network.members().filter(|m| m.has_children()) {
            self.rules.rule_for(member.tier)?;
        }
        Ok(())
    }
}

/// Total CV purchased per buyer.
pub fn period_volume(transactions: &[Transaction]) -> HashMap<MemberId, Decimal> {
    let mut volume: HashMap<MemberId, Decimal> = HashMap::new();
    for tx in transactions {
        *volume.entry(tx.buyer).or_default() += tx.cv;
    }
    volume
}

/// Reject negative sale amounts or CV.
pub(crate) fn check_amounts(tx: &Transaction) -> Result<(), EngineError> {
    if tx.cv.is_negative() {
        return Err(EngineError::InvalidTransaction {
            buyer: tx.buyer,
            reason: format!("negative cv {}", tx.cv),
        });
    }
    if tx.amount.is_negative() {
        return Err(EngineError::InvalidTransaction {
            buyer: tx.buyer,
            reason: format!("negative amount {}", tx.amount),
        });
    }
    Ok(())
}

/// Reject batches whose cv or amount total leaves the decimal range.
///
/// Expects amounts already checked non-negative: every per-buyer sum is then
/// bounded by the batch total.
pub(crate) fn check_batch_totals(transactions: &[Transaction]) -> Result<(), EngineError> {
    let mut cv = Decimal::zero();
    let mut amount = Decimal::zero();
    for tx in transactions {
        let overflow = |field: &str| EngineError::InvalidTransaction {
            buyer: tx.buyer,
            reason: format!("batch {} total leaves the decimal range", field),
        };
        cv = cv.checked_add(tx.cv).ok_or_else(|| overflow("cv"))?;
        amount = amount
            .checked_add(tx.amount)
            .ok_or_else(|| overflow("amount"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Tier;
    use crate::engine::TierRule;

    fn d(n: i64) -> Decimal {
        Decimal::from_int(n)
    }

    fn id(n: u64) -> MemberId {
        MemberId::new(n)
    }

    /// Root + A (under root) + B (under A), all on tier 100.
    fn chain() -> Network {
        let mut network = Network::with_root("root", Tier::new(100));
        let a = network.register("a", Tier::new(100), Some(id(1)));
        network.register("b", Tier::new(100), Some(a));
        network
    }

    #[test]
    fn test_self_and_direct() {
        let mut network = chain();
        let engine = CommissionEngine::default();
        engine
            .run_payouts(&mut network, &[Transaction::new(id(2), d(100))])
            .unwrap();

        assert_eq!(network.wallet(id(2)).unwrap().self_rebate, d(10));
        assert_eq!(network.wallet(id(1)).unwrap().direct, d(15));
    }

    #[test]
    fn test_root_purchase_pays_no_direct() {
        let mut network = chain();
        let engine = CommissionEngine::default();
        engine
            .run_payouts(&mut network, &[Transaction::new(id(1), d(100))])
            .unwrap();

        assert_eq!(network.wallet(id(1)).unwrap().self_rebate, d(10));
        assert!(network.period_stats().direct_payout.is_zero());
    }

    #[test]
    fn test_chain_round_trip() {
        let mut network = chain();
        let engine = CommissionEngine::default();
        engine
            .run_payouts(&mut network, &[Transaction::new(id(3), d(40))])
            .unwrap();

        assert_eq!(network.wallet(id(3)).unwrap().self_rebate, d(4));
        assert_eq!(network.wallet(id(2)).unwrap().direct, d(6));
        assert_eq!(network.wallet(id(1)).unwrap().passive, d(2));
        assert_eq!(network.wallet(id(2)).unwrap().passive, d(2));
        assert!(network.wallet(id(3)).unwrap().passive.is_zero());
        assert_eq!(network.period_stats().passive_payout, d(4));
        assert_eq!(network.period_stats().cv_volume, d(40));
    }

    #[test]
    fn test_passive_divisor_uses_actual_depth_when_deeper() {
        let mut rules = RuleTable::new();
        rules.insert(Tier::new(1), TierRule::new(100, 2));
        let engine = CommissionEngine::new(rules);

        let mut network = Network::with_root("root", Tier::new(1));
        let mut parent = id(1);
        for _ in 0..4 {
            parent = network.register("m", Tier::new(1), Some(parent));
        }

        let volume = period_volume(&[Transaction::new(id(5), d(80))]);
        let outcome = engine
            .passive_for(&network, id(1), &volume)
            .unwrap()
            .unwrap();
        assert_eq!(outcome.actual_depth, 4);
        assert_eq!(outcome.divisor, 4);
        assert_eq!(outcome.payout, d(10));
    }

    #[test]
    fn test_passive_none_without_team_volume() {
        let network = chain();
        let engine = CommissionEngine::default();
        let volume = period_volume(&[Transaction::new(id(1), d(50))]);
        assert_eq!(engine.passive_for(&network, id(1), &volume).unwrap(), None);
    }

    #[test]
    fn test_negative_values_rejected_before_any_write() {
        let mut network = chain();
        let engine = CommissionEngine::default();
        let batch = [
            Transaction::new(id(2), d(100)),
            Transaction::new(id(3), d(-1)),
        ];
        let err = engine.run_payouts(&mut network, &batch).unwrap_err();
        assert!(matches!(err, EngineError::InvalidTransaction { buyer, .. } if buyer == id(3)));
        assert!(network.wallet(id(2)).unwrap().is_empty());

        let negative_amount = [Transaction::new(id(2), d(1)).with_amount(d(-5))];
        assert!(matches!(
            engine.run_payouts(&mut network, &negative_amount),
            Err(EngineError::InvalidTransaction { .. })
        ));
    }

    #[test]
    fn test_batch_totals_past_decimal_range_rejected() {
        let near_max = Decimal::max_value();
        let cv_batch = [
            Transaction::new(id(2), near_max),
            Transaction::new(id(3), d(1)),
        ];
        assert!(matches!(
            check_batch_totals(&cv_batch),
            Err(EngineError::InvalidTransaction { buyer, .. }) if buyer == id(3)
        ));

        let amount_batch = [
            Transaction::new(id(2), d(1)).with_amount(near_max),
            Transaction::new(id(2), d(1)).with_amount(d(1)),
        ];
        assert!(check_batch_totals(&amount_batch).is_err());
        assert!(check_batch_totals(&[Transaction::new(id(2), near_max)]).is_ok());
    }

    #[test]
    fn test_unknown_buyer_rejected() {
        let mut network = chain();
        let engine = CommissionEngine::default();
        let err = engine
            .run_payouts(&mut network, &[Transaction::new(id(9), d(10))])
            .unwrap_err();
        assert_eq!(err, EngineError::UnknownMember(id(9)));
    }

    #[test]
    fn test_unknown_tier_rejected() {
        let mut network = Network::with_root("root", Tier::new(999));
        network.register("a", Tier::new(100), Some(id(1)));
        let engine = CommissionEngine::default();

        let err = engine
            .run_payouts(&mut network, &[Transaction::new(id(2), d(10))])
            .unwrap_err();
        assert_eq!(err, EngineError::UnknownTier(Tier::new(999)));
        assert!(network.wallet(id(2)).unwrap().is_empty());
    }

    #[test]
    fn test_period_volume_sums_per_buyer() {
        let volume = period_volume(&[
            Transaction::new(id(2), d(8)),
            Transaction::new(id(3), d(5)),
            Transaction::new(id(2), d(45)),
        ]);
        assert_eq!(volume[&id(2)], d(53));
        assert_eq!(volume[&id(3)], d(5));
    }
}
