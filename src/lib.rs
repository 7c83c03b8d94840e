pub mod api;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod network;
pub mod report;
pub mod simulation;

pub use config::Config;
pub use domain::{Channel, Decimal, Member, MemberId, PeriodSummary, Tier, Transaction, Wallet};
pub use engine::{CommissionEngine, EngineError, RuleTable, TierRule};
pub use error::AppError;
pub use network::{Network, NetworkError};
pub use simulation::{PeriodInput, Simulator, SimulationError};
