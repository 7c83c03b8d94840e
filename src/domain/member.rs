//! Network member and its commission wallet.

use crate::domain::{Decimal, MemberId, Tier};
use serde::{Deserialize, Serialize};

/// Commission channel a credit is paid through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Rebate on the member's own purchases.
    #[serde(rename = "self")]
    SelfRebate,
    /// Bonus on purchases of members the member sponsored.
    Direct,
    /// Depth-weighted share of the binary team's volume.
    Passive,
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::SelfRebate => write!(f, "self"),
            Channel::Direct => write!(f, "direct"),
            Channel::Passive => write!(f, "passive"),
        }
    }
}

/// Per-channel commission balances.
///
/// Used both for lifetime wallets and for single-period ledger entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    #[serde(rename = "self")]
    pub self_rebate: Decimal,
    pub direct: Decimal,
    pub passive: Decimal,
}

impl Wallet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, channel: Channel) -> Decimal {
        match channel {
            Channel::SelfRebate => self.self_rebate,
            Channel::Direct => self.direct,
            Channel::Passive => self.passive,
        }
    }

    /// Add `amount` to one channel. Callers guarantee `amount >= 0`.
    pub fn credit(&mut self, channel: Channel, amount: Decimal) {
        match channel {
            Channel::SelfRebate => self.self_rebate += amount,
            Channel::Direct => self.direct += amount,
            Channel::Passive => self.passive += amount,
        }
    }

    /// The wallet after crediting `amount`, or None if the channel or the
    /// wallet total would leave the decimal range.
    pub fn checked_credit(&self, channel: Channel, amount: Decimal) -> Option<Wallet> {
        let mut next = *self;
        let slot = match channel {
            Channel::SelfRebate => &mut next.self_rebate,
            Channel::Direct => &mut next.direct,
            Channel::Passive => &mut next.passive,
        };
        *slot = slot.checked_add(amount)?;
        next.self_rebate
            .checked_add(next.direct)?
            .checked_add(next.passive)?;
        Some(next)
    }

    pub fn total(&self) -> Decimal {
        self.self_rebate + self.direct + self.passive
    }

    pub fn is_empty(&self) -> bool {
        self.total().is_zero()
    }
}

/// A registered member of the network.
///
/// `sponsor` is the referral edge; `left` and `right` are binary placement
/// slots. The two structures are independent after placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub tier: Tier,
    /// None only for the root.
    pub sponsor: Option<MemberId>,
    pub left: Option<MemberId>,
    pub right: Option<MemberId>,
    pub wallet: Wallet,
}

impl Member {
    pub fn new(id: MemberId, name: String, tier: Tier, sponsor: Option<MemberId>) -> Self {
        Member {
            id,
            name,
            tier,
            sponsor,
            left: None,
            right: None,
            wallet: Wallet::new(),
        }
    }

    /// True when at least one binary slot is filled.
    pub fn has_children(&self) -> bool {
        self.left.is_some() || self.right.is_some()
    }

    /// Children in traversal order, left first.
    pub fn children(&self) -> impl Iterator<Item = MemberId> {
        self.left.into_iter().chain(self.right)
    }
}
