//! Period driver: applies upgrades, registrations and purchases to a network,
//! runs payouts and appends the period to history.
//!
//! Inputs are plain data. How they are produced (random scenario generation,
//! recorded traffic, hand-written fixtures) is up to the caller.

use crate::domain::{Decimal, MemberId, PeriodSummary, Tier, Transaction};
use crate::engine::{
    commission::{check_amounts, check_batch_totals},
    CommissionEngine, EngineError, RuleTable,
};
use crate::network::{Network, NetworkError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// A new member joining this period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub name: String,
    pub tier: Tier,
    /// Unknown or missing sponsors fall back to the root.
    #[serde(default)]
    pub sponsor: Option<MemberId>,
}

/// A purchase made this period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    pub buyer: MemberId,
    #[serde(default)]
    pub amount: Decimal,
    pub cv: Decimal,
}

impl From<&Purchase> for Transaction {
    fn from(p: &Purchase) -> Self {
        Transaction::new(p.buyer, p.cv).with_amount(p.amount)
    }
}

/// Everything that happens in one period, applied in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeriodInput {
    /// Members moving one tier up. Top-tier members are skipped.
    pub upgrades: Vec<MemberId>,
    pub registrations: Vec<Registration>,
    /// May reference members registered earlier in this same input.
    pub purchases: Vec<Purchase>,
}

/// Owns one network and advances it period by period.
#[derive(Debug, Clone)]
pub struct Simulator {
    network: Network,
    engine: CommissionEngine,
    next_period: u32,
}

impl Simulator {
    /// Start a simulation with a fresh network holding only its root.
    pub fn new(rules: RuleTable, root_name: &str, root_tier: Tier) -> Result<Self, SimulationError> {
        rules.rule_for(root_tier)?;
        Ok(Self::from_network(
            Network::with_root(root_name, root_tier),
            rules,
        ))
    }

    /// Continue a simulation on an existing network.
    pub fn from_network(network: Network, rules: RuleTable) -> Self {
        let next_period = network.history().last().map_or(1, |h| h.period + 1);
        Simulator {
            network,
            engine: CommissionEngine::new(rules),
            next_period,
        }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn rules(&self) -> &RuleTable {
        self.engine.rules()
    }

    /// Number the next call to `run_period` will record.
    pub fn next_period(&self) -> u32 {
        self.next_period
    }

    /// Run one full period.
    ///
    /// The input is validated up front and the period is built on a copy of
    /// the network, committed only once it has fully succeeded. On error the
    /// network is unchanged.
    pub fn run_period(&mut self, input: &PeriodInput) -> Result<PeriodSummary, SimulationError> {
        self.validate(input)?;
        let period = self.next_period;
        let mut network = self.network.clone();

        let mut upgrades = 0;
        for &id in &input.upgrades {
            let current = network.tier(id)?;
            match self.rules().next_tier(current) {
                Some(next) => {
                    network.upgrade_tier(id, next)?;
                    upgrades += 1;
                }
                None => tracing::warn!(member = %id, tier = %current, "already on top tier"),
            }
        }

        for reg in &input.registrations {
            network.register(reg.name.as_str(), reg.tier, reg.sponsor);
        }

        let transactions: Vec<Transaction> = input.purchases.iter().map(Transaction::from).collect();
        self.engine.run_payouts_in_place(&mut network, &transactions)?;

        let summary =
            PeriodSummary::from_stats(period, network.len(), network.period_stats(), upgrades);
        network.append_history(summary.clone());
        self.network = network;
        self.next_period += 1;

        tracing::info!(
            period,
            members = summary.members,
            registrations = input.registrations.len(),
            upgrades,
            total_payout = %summary.total_payout,
            margin = %summary.margin,
            "period complete"
        );
        Ok(summary)
    }

    fn validate(&self, input: &PeriodInput) -> Result<(), SimulationError> {
        for &id in &input.upgrades {
            self.rules().rule_for(self.network.tier(id)?)?;
        }
        for reg in &input.registrations {
            self.rules().rule_for(reg.tier)?;
        }

        let members_after = (self.network.len() + input.registrations.len()) as u64;
        let transactions: Vec<Transaction> = input.purchases.iter().map(Transaction::from).collect();
        for tx in &transactions {
            check_amounts(tx)?;
            if tx.buyer.as_u64() == 0 || tx.buyer.as_u64() > members_after {
                return Err(EngineError::UnknownMember(tx.buyer).into());
            }
        }
        check_batch_totals(&transactions)?;
        Ok(())
    }
}
