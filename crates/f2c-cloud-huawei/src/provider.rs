//! Huawei Cloud billing provider

use crate::bss::{BssSession, ResFeeRecord};
use crate::credential::HuaweiCredential;
use crate::error::Result;
use crate::iam::IamConnector;
use crate::mapping;
use async_trait::async_trait;
use chrono::NaiveDate;
use f2c_cloud::{
    BillBatch, BillingAdapter, CloudBill, CloudError, Connector, Provider, with_session,
};

/// Largest page `ListCustomerBillsFeeRecords` accepts
pub const MAX_PAGE_LIMIT: u32 = 1000;

/// Billing import for one Huawei Cloud account
pub struct HuaweiBillingProvider<C = IamConnector> {
    connector: C,
    credential: HuaweiCredential,
    page_limit: u32,
}

impl<C> HuaweiBillingProvider<C>
where
    C: Connector<Credential = HuaweiCredential>,
    C::Session: BssSession,
{
    pub fn new(connector: C, credential: HuaweiCredential) -> Self {
        Self {
            connector,
            credential,
            page_limit: MAX_PAGE_LIMIT,
        }
    }

    pub fn with_page_limit(mut self, limit: u32) -> Self {
        self.page_limit = limit.clamp(1, MAX_PAGE_LIMIT);
        self
    }

    pub fn credential(&self) -> &HuaweiCredential {
        &self.credential
    }
}

fn validate_cycle(cycle: &str) -> f2c_cloud::Result<()> {
    NaiveDate::parse_from_str(&format!("{}-01", cycle), "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| CloudError::Validation(format!("billing cycle '{}' is not yyyy-MM", cycle)))
}

fn collect(batch: &mut BillBatch, records: &[ResFeeRecord]) {
    for record in records {
        match mapping::to_cloud_bill(record) {
            Ok(bill) => batch.add_bill(bill),
            Err(e) => {
                tracing::warn!(
                    resource_id = record.resource_id.as_deref().unwrap_or("-"),
                    error = %e,
                    "Skipping fee record"
                );
                batch.add_rejected(record.resource_id.clone(), e.to_string());
            }
        }
    }
}

/// Page through every fee record of `cycle`
async fn fee_records<S: BssSession>(session: &S, cycle: &str, limit: u32) -> Result<BillBatch> {
    let mut batch = BillBatch::new();
    let mut offset = 0u32;

    loop {
        let page = session.list_fee_records(cycle, offset, limit).await?;
        let fetched = page.fee_records.len() as u32;
        collect(&mut batch, &page.fee_records);
        offset += fetched;

        tracing::debug!(cycle, offset, total = ?page.total_count, "Fetched fee record page");

        let exhausted = page.total_count.is_some_and(|total| offset >= total);
        if fetched < limit || exhausted {
            break;
        }
    }

    Ok(batch)
}

#[async_trait]
impl<C> BillingAdapter for HuaweiBillingProvider<C>
where
    C: Connector<Credential = HuaweiCredential>,
    C::Session: BssSession,
{
    type Record = ResFeeRecord;

    fn provider(&self) -> Provider {
        Provider::Huawei
    }

    fn to_cloud_bill(&self, record: &ResFeeRecord) -> f2c_cloud::Result<CloudBill> {
        mapping::to_cloud_bill(record)
    }

    async fn fetch_bills(&self, cycle: &str) -> f2c_cloud::Result<BillBatch> {
        validate_cycle(cycle)?;

        let limit = self.page_limit;
        let batch = with_session(&self.connector, &self.credential, |session| async move {
            fee_records(&*session, cycle, limit)
                .await
                .map_err(CloudError::from)
        })
        .await?;

        tracing::info!(
            domain = %self.credential.domain_name,
            cycle,
            bills = batch.bills.len(),
            rejected = batch.rejected.len(),
            "Imported Huawei Cloud bills"
        );
        Ok(batch)
    }
}
