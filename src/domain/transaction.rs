//! Purchase transaction fed to the commission engine.

use crate::domain::{Decimal, MemberId};
use serde::{Deserialize, Serialize};

/// A single purchase in a payout batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Member who bought.
    pub buyer: MemberId,
    /// Sale price, counted towards period revenue only.
    #[serde(default)]
    pub amount: Decimal,
    /// Commissionable value every payout formula is applied to.
    pub cv: Decimal,
}

impl Transaction {
    /// Create a transaction carrying commissionable value only.
    pub fn new(buyer: MemberId, cv: Decimal) -> Self {
        Transaction {
            buyer,
            amount: Decimal::zero(),
            cv,
        }
    }

    /// Set the sale price.
    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = amount;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_defaults_to_zero() {
        let tx: Transaction = serde_json::from_str(r#"{"buyer": 3, "cv": 40}"#).unwrap();
        assert_eq!(tx.buyer, MemberId::new(3));
        assert_eq!(tx.cv, Decimal::from_int(40));
        assert!(tx.amount.is_zero());
    }

    #[test]
    fn test_with_amount() {
        let tx = Transaction::new(MemberId::new(1), Decimal::from_int(45))
            .with_amount(Decimal::from_int(150));
        assert_eq!(tx.amount, Decimal::from_int(150));
        assert_eq!(tx.cv, Decimal::from_int(45));
    }
}
