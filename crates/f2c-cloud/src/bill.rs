//! Normalized billing records

use crate::entity::Provider;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a billed resource is charged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillMode {
    /// Yearly or monthly subscription
    Monthly,
    /// Pay per use
    OnDemand,
    Other,
}

impl std::fmt::Display for BillMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BillMode::Monthly => write!(f, "MONTHLY"),
            BillMode::OnDemand => write!(f, "ON_DEMAND"),
            BillMode::Other => write!(f, "OTHER"),
        }
    }
}

/// One vendor billing line item
///
/// Immutable once built; `id` is random because vendor line items carry no
/// natural key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudBill {
    pub id: String,
    pub provider: Provider,
    pub region_id: Option<String>,
    pub region_name: Option<String>,
    pub project_id: Option<String>,
    pub project_name: Option<String>,
    pub bill_mode: BillMode,
    pub resource_id: Option<String>,
    pub resource_name: Option<String>,
    pub product_id: Option<String>,
    pub product_name: Option<String>,
    pub tags: BTreeMap<String, String>,

    /// List price
    pub total_cost: Decimal,

    /// Price after discounts
    pub real_total_cost: Decimal,

    pub usage_start_date: NaiveDateTime,
    pub usage_end_date: NaiveDateTime,
    pub billing_cycle: NaiveDateTime,
    pub pay_account_id: Option<String>,
}

/// Outcome of importing one billing cycle
///
/// Records are mapped independently; the ones that fail land in `rejected`
/// and the importer decides whether to skip or abort.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BillBatch {
    pub bills: Vec<CloudBill>,
    pub rejected: Vec<RejectedRecord>,
}

impl BillBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_complete(&self) -> bool {
        self.rejected.is_empty()
    }

    pub fn add_bill(&mut self, bill: CloudBill) {
        self.bills.push(bill);
    }

    pub fn add_rejected(&mut self, resource_id: Option<String>, reason: impl Into<String>) {
        self.rejected.push(RejectedRecord {
            resource_id,
            reason: reason.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.bills.len() + self.rejected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A vendor record that could not be turned into a [`CloudBill`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedRecord {
    pub resource_id: Option<String>,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bill_mode_serialization() {
        assert_eq!(
            serde_json::to_string(&BillMode::OnDemand).unwrap(),
            "\"ON_DEMAND\""
        );
        assert_eq!(BillMode::Monthly.to_string(), "MONTHLY");
    }

    #[test]
    fn test_batch_tracks_rejections() {
        let mut batch = BillBatch::new();
        assert!(batch.is_empty());
        assert!(batch.is_complete());

        batch.add_rejected(Some("res-1".to_string()), "bad date");
        assert_eq!(batch.len(), 1);
        assert!(!batch.is_complete());
        assert_eq!(batch.rejected[0].reason, "bad date");
    }
}
