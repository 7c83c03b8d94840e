//! Domain types for the compensation network.
//!
//! This module provides:
//! - Exact money handling via the Decimal wrapper
//! - Primitives: MemberId, Tier
//! - Member, Wallet and Channel
//! - Transactions and per-period aggregates

pub mod decimal;
pub mod member;
pub mod period;
pub mod primitives;
pub mod transaction;

pub use decimal::Decimal;
pub use member::{Channel, Member, Wallet};
pub use period::{PayoutLedger, PeriodStats, PeriodSummary};
pub use primitives::{MemberId, Tier};
pub use transaction::Transaction;
