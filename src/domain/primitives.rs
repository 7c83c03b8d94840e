//! Domain primitives: MemberId, Tier.

use serde::{Deserialize, Serialize};
use std::num::ParseIntError;
use std::str::FromStr;

/// Stable member identifier.
///
/// Ids are handed out densely from 1 in registration order and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub u64);

impl MemberId {
    pub fn new(id: u64) -> Self {
        MemberId(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MemberId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(MemberId)
    }
}

/// Package level a member bought into (e.g. 100, 250, 500).
///
/// Ordering is by package value, so a higher tier compares greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tier(pub u32);

impl Tier {
    pub fn new(value: u32) -> Self {
        Tier(value)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Tier {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u32>().map(Tier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_id_display_and_parse() {
        let id = MemberId::new(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(" 42 ".parse::<MemberId>().unwrap(), id);
        assert!("u42".parse::<MemberId>().is_err());
    }

    #[test]
    fn test_tier_ordering() {
        assert!(Tier::new(100) < Tier::new(250));
        assert!(Tier::new(500) > Tier::new(250));
    }

    #[test]
    fn test_transparent_serialization() {
        assert_eq!(serde_json::to_string(&MemberId::new(7)).unwrap(), "7");
        let tier: Tier = serde_json::from_str("250").unwrap();
        assert_eq!(tier, Tier::new(250));
    }
}
