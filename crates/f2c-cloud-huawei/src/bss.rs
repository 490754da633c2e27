//! Business Support System (BSS) billing records

use crate::error::Result;
use async_trait::async_trait;
use f2c_cloud::VendorSession;
use serde::{Deserialize, Serialize};

/// One resource fee line of `ListCustomerBillsFeeRecords`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResFeeRecord {
    /// `yyyy-MM-dd`
    pub bill_date: Option<String>,
    pub bill_type: Option<i32>,
    pub customer_id: Option<String>,
    pub region: Option<String>,
    pub region_name: Option<String>,
    pub cloud_service_type: Option<String>,
    pub resource_type: Option<String>,
    /// `yyyy-MM-ddTHH:mm:ssZ`
    pub effective_time: Option<String>,
    /// `yyyy-MM-ddTHH:mm:ssZ`
    pub expire_time: Option<String>,
    pub fee_id: Option<String>,
    pub product_id: Option<String>,
    pub product_name: Option<String>,
    pub order_id: Option<String>,
    pub resource_id: Option<String>,
    pub resource_name: Option<String>,
    /// `key:value;key2:value2`
    pub resource_tag: Option<String>,
    pub enterprise_project_id: Option<String>,
    pub enterprise_project_name: Option<String>,
    /// "1" yearly/monthly, "3" on demand, "10" reserved instance
    pub charge_mode: Option<String>,
    pub official_amount: Option<f64>,
    pub amount: Option<f64>,
}

/// Page of fee records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeRecordPage {
    pub total_count: Option<u32>,
    pub fee_records: Vec<ResFeeRecord>,
    pub currency: Option<String>,
}

/// Error body returned by BSS and IAM
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiErrorBody {
    pub error_code: String,
    pub error_msg: String,
}

impl std::fmt::Display for ApiErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code, self.error_msg)
    }
}

/// Session able to read customer bills
#[async_trait]
pub trait BssSession: VendorSession {
    /// One page of fee records for `cycle` (`yyyy-MM`)
    async fn list_fee_records(&self, cycle: &str, offset: u32, limit: u32) -> Result<FeeRecordPage>;
}
