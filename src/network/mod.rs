//! In-memory compensation network.
//!
//! Members are stored densely by id, so the storage order is the
//! registration order. Everything that iterates members (payout runs,
//! reports, exports) relies on that order being stable.

use crate::domain::{
    Channel, Decimal, Member, MemberId, PayoutLedger, PeriodStats, PeriodSummary, Tier, Wallet,
};
use thiserror::Error;

mod placement;
mod walk;

use placement::Side;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    #[error("unknown member {0}")]
    UnknownMember(MemberId),
    #[error("member {member} is on tier {current}; {requested} is not an upgrade")]
    TierNotHigher {
        member: MemberId,
        current: Tier,
        requested: Tier,
    },
    #[error("credit to member {member} leaves the decimal range on {channel}")]
    Overflow { member: MemberId, channel: Channel },
}

#[derive(Debug, Clone, Default)]
pub struct Network {
    members: Vec<Member>,
    period_stats: PeriodStats,
    ledger: PayoutLedger,
    history: Vec<PeriodSummary>,
}

impl Network {
    /// An empty network. The first registration becomes the root.
    pub fn new() -> Self {
        Self::default()
    }

    /// A network seeded with its root member.
    pub fn with_root(name: impl Into<String>, tier: Tier) -> Self {
        let mut network = Self::new();
        network.register(name, tier, None);
        network
    }

    /// Register a member and place it in the binary tree.
    ///
    /// Placement searches breadth-first from the sponsor. An unknown (or
    /// missing) sponsor falls back to the root, which is then also recorded
    /// as the member's sponsor. Never fails.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        tier: Tier,
        sponsor: Option<MemberId>,
    ) -> MemberId {
        let id = MemberId::new(self.members.len() as u64 + 1);
        let name = name.into();

        let Some(root) = self.root() else {
            tracing::debug!(member = %id, tier = %tier, "registered network root");
            self.members.push(Member::new(id, name, tier, None));
            return id;
        };

        let sponsor = match sponsor.filter(|s| self.contains(*s)) {
            Some(known) => known,
            None => {
                tracing::warn!(
                    member = %id,
                    requested = ?sponsor,
                    "sponsor not in network, placing under root"
                );
                root
            }
        };

        let slot = self.open_slot_under(sponsor);
        self.members.push(Member::new(id, name, tier, Some(sponsor)));

        let parent = &mut self.members[index(slot.parent)];
        match slot.side {
            Side::Left => parent.left = Some(id),
            Side::Right => parent.right = Some(id),
        }

        tracing::debug!(
            member = %id,
            sponsor = %sponsor,
            parent = %slot.parent,
            side = ?slot.side,
            "placed member"
        );
        id
    }

    /// Move a member to a strictly higher tier.
    pub fn upgrade_tier(&mut self, id: MemberId, tier: Tier) -> Result<(), NetworkError> {
        let idx = checked_index(id, self.members.len())?;
        let member = &mut self.members[idx];

        if tier <= member.tier {
            return Err(NetworkError::TierNotHigher {
                member: id,
                current: member.tier,
                requested: tier,
            });
        }

        member.tier = tier;
        Ok(())
    }

    /// The first registered member.
    pub fn root(&self) -> Option<MemberId> {
        self.members.first().map(|m| m.id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: MemberId) -> bool {
        self.member(id).is_some()
    }

    pub fn member(&self, id: MemberId) -> Option<&Member> {
        checked_index(id, self.members.len())
            .ok()
            .and_then(|i| self.members.get(i))
    }

    pub fn get(&self, id: MemberId) -> Result<&Member, NetworkError> {
        self.member(id).ok_or(NetworkError::UnknownMember(id))
    }

    /// Members in registration order.
    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.members.iter()
    }

    /// Member ids in registration order.
    pub fn registration_order(&self) -> impl Iterator<Item = MemberId> + '_ {
        self.members.iter().map(|m| m.id)
    }

    pub fn wallet(&self, id: MemberId) -> Result<&Wallet, NetworkError> {
        self.get(id).map(|m| &m.wallet)
    }

    pub fn tier(&self, id: MemberId) -> Result<Tier, NetworkError> {
        self.get(id).map(|m| m.tier)
    }

    pub fn sponsor(&self, id: MemberId) -> Result<Option<MemberId>, NetworkError> {
        self.get(id).map(|m| m.sponsor)
    }

    /// Number of members this member personally sponsored.
    pub fn direct_recruits(&self, id: MemberId) -> Result<usize, NetworkError> {
        self.get(id)?;
        Ok(self.members.iter().filter(|m| m.sponsor == Some(id)).count())
    }

    /// Aggregates of the most recent payout run.
    pub fn period_stats(&self) -> &PeriodStats {
        &self.period_stats
    }

    /// Per-member credits of the most recent payout run.
    pub fn ledger(&self) -> &PayoutLedger {
        &self.ledger
    }

    pub fn history(&self) -> &[PeriodSummary] {
        &self.history
    }

    /// Append a period record. History is never rewritten.
    pub fn append_history(&mut self, summary: PeriodSummary) {
        self.history.push(summary);
    }

    /// Clear the period aggregates and ledger ahead of a payout run.
    pub(crate) fn begin_period(&mut self) {
        self.period_stats = PeriodStats::default();
        self.ledger.clear();
    }

    pub(crate) fn record_volume(&mut self, amount: Decimal, cv: Decimal) {
        self.period_stats.revenue += amount;
        self.period_stats.cv_volume += cv;
    }

    /// Credit a wallet and mirror it into the period ledger and aggregates.
    /// Zero amounts leave no trace. On overflow nothing is written.
    pub(crate) fn credit(
        &mut self,
        id: MemberId,
        channel: Channel,
        amount: Decimal,
    ) -> Result<(), NetworkError> {
        if amount.is_zero() {
            return Ok(());
        }
        let idx = checked_index(id, self.members.len())?;
        let overflow = || NetworkError::Overflow {
            member: id,
            channel,
        };

        let wallet = self.members[idx]
            .wallet
            .checked_credit(channel, amount)
            .ok_or_else(overflow)?;
        let stats = self
            .period_stats
            .checked_record_payout(channel, amount)
            .ok_or_else(overflow)?;

        self.members[idx].wallet = wallet;
        // A ledger entry never exceeds the wallet it mirrors.
        self.ledger.credit(id, channel, amount);
        self.period_stats = stats;
        Ok(())
    }
}

/// Storage index for an id already known to be present.
fn index(id: MemberId) -> usize {
    (id.as_u64() - 1) as usize
}

fn checked_index(id: MemberId, len: usize) -> Result<usize, NetworkError> {
    match id.as_u64() {
        0 => Err(NetworkError::UnknownMember(id)),
        n if (n as usize) <= len => Ok(n as usize - 1),
        _ => Err(NetworkError::UnknownMember(id)),
    }
}
