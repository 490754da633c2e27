//! Fee records to normalized bills

use crate::bss::ResFeeRecord;
use f2c_cloud::mapping::{new_record_id, parse_date, parse_tags, parse_timestamp, to_bill_mode};
use f2c_cloud::{CloudBill, CloudError, Provider, Result};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

fn to_decimal(amount: Option<f64>, field: &str) -> Result<Decimal> {
    let amount = amount.unwrap_or_default();
    Decimal::from_f64(amount)
        .ok_or_else(|| CloudError::Mapping(format!("{} '{}' is not a valid amount", field, amount)))
}

/// Map one fee record
///
/// Charge mode and tags never fail; a missing or malformed date fails the
/// record.
pub fn to_cloud_bill(record: &ResFeeRecord) -> Result<CloudBill> {
    Ok(CloudBill {
        id: new_record_id(),
        provider: Provider::Huawei,
        region_id: record.region.clone(),
        region_name: record.region_name.clone(),
        project_id: record.enterprise_project_id.clone(),
        project_name: record.enterprise_project_name.clone(),
        bill_mode: to_bill_mode(record.charge_mode.as_deref()),
        resource_id: record.resource_id.clone(),
        resource_name: record.resource_name.clone(),
        product_id: record.product_id.clone(),
        product_name: record.product_name.clone(),
        tags: parse_tags(record.resource_tag.as_deref()),
        total_cost: to_decimal(record.official_amount, "official_amount")?,
        real_total_cost: to_decimal(record.amount, "amount")?,
        usage_start_date: parse_timestamp(record.effective_time.as_deref(), "effective_time")?,
        usage_end_date: parse_timestamp(record.expire_time.as_deref(), "expire_time")?,
        billing_cycle: parse_date(record.bill_date.as_deref(), "bill_date")?,
        pay_account_id: record.customer_id.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use f2c_cloud::BillMode;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;
    use std::str::FromStr;

    fn record() -> ResFeeRecord {
        ResFeeRecord {
            bill_date: Some("2022-04-30".to_string()),
            customer_id: Some("0a8e3ea2d5".to_string()),
            region: Some("cn-north-4".to_string()),
            region_name: Some("CN North-Beijing4".to_string()),
            effective_time: Some("2022-04-30T14:00:00Z".to_string()),
            expire_time: Some("2022-04-30T15:00:00Z".to_string()),
            product_id: Some("00301-233043-0--0".to_string()),
            product_name: Some("ECS s6.large.2".to_string()),
            resource_id: Some("ecs-7f3a".to_string()),
            resource_name: Some("web-01".to_string()),
            resource_tag: Some("env:prod;team".to_string()),
            enterprise_project_id: Some("0".to_string()),
            enterprise_project_name: Some("default".to_string()),
            charge_mode: Some("1".to_string()),
            official_amount: Some(12.5),
            amount: Some(10.25),
            ..Default::default()
        }
    }

    #[test]
    fn test_subscription_record() {
        let bill = to_cloud_bill(&record()).unwrap();

        assert_eq!(bill.provider, Provider::Huawei);
        assert_eq!(bill.bill_mode, BillMode::Monthly);
        assert_eq!(
            bill.tags,
            BTreeMap::from([
                ("env".to_string(), "prod".to_string()),
                ("team".to_string(), String::new()),
            ])
        );
        assert_eq!(
            bill.usage_start_date,
            NaiveDate::from_ymd_opt(2022, 4, 30)
                .unwrap()
                .and_hms_opt(14, 0, 0)
                .unwrap()
        );
        assert_eq!(
            bill.billing_cycle,
            NaiveDate::from_ymd_opt(2022, 4, 30)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
        assert_eq!(bill.total_cost, Decimal::from_str("12.5").unwrap());
        assert_eq!(bill.real_total_cost, Decimal::from_str("10.25").unwrap());
        assert_eq!(bill.project_name.as_deref(), Some("default"));
        assert_eq!(bill.pay_account_id.as_deref(), Some("0a8e3ea2d5"));
        assert_eq!(bill.id.len(), 32);
    }

    #[test]
    fn test_ids_are_fresh() {
        let a = to_cloud_bill(&record()).unwrap();
        let b = to_cloud_bill(&record()).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_other_charge_modes() {
        let mut reserved = record();
        reserved.charge_mode = Some("10".to_string());
        assert_eq!(to_cloud_bill(&reserved).unwrap().bill_mode, BillMode::Other);

        let mut on_demand = record();
        on_demand.charge_mode = Some("3".to_string());
        on_demand.resource_tag = None;
        let bill = to_cloud_bill(&on_demand).unwrap();
        assert_eq!(bill.bill_mode, BillMode::OnDemand);
        assert!(bill.tags.is_empty());
    }

    #[test]
    fn test_bad_date_fails_record() {
        let mut bad = record();
        bad.effective_time = Some("2022/04/30 14:00".to_string());
        assert!(matches!(to_cloud_bill(&bad), Err(CloudError::Mapping(_))));

        let mut missing = record();
        missing.bill_date = None;
        assert!(matches!(to_cloud_bill(&missing), Err(CloudError::Mapping(_))));
    }

    #[test]
    fn test_missing_amount_is_zero() {
        let mut free = record();
        free.official_amount = None;
        assert_eq!(to_cloud_bill(&free).unwrap().total_cost, Decimal::ZERO);
    }
}
