//! Commission engine: rule table plus the batch payout run.

use crate::domain::{MemberId, Tier};
use crate::network::NetworkError;
use thiserror::Error;

pub mod commission;
pub mod rules;

pub use commission::{
    direct_rate, period_volume, pool_rate, self_rate, CommissionEngine, PassiveOutcome,
};
pub use rules::{RuleTable, RuleTableParseError, TierRule};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("transaction references unknown member {0}")]
    UnknownMember(MemberId),
    #[error("no payout rule for tier {0}")]
    UnknownTier(Tier),
    #[error("invalid transaction for member {buyer}: {reason}")]
    InvalidTransaction { buyer: MemberId, reason: String },
    #[error(transparent)]
    Network(#[from] NetworkError),
}
