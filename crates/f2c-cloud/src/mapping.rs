//! Pure translation helpers shared by every vendor adapter
//!
//! Bill mode and tag parsing never fail: unknown input degrades to
//! [`BillMode::Other`] or an empty map. Date parsing fails loudly because a
//! wrong usage window corrupts billing data.

use crate::bill::BillMode;
use crate::entity::{F2CImage, F2CNetwork};
use crate::error::{CloudError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::{BTreeMap, HashSet};

/// `2022-04-30T14:00:00Z`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// `2022-04-30`
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const BYTES_PER_GB: u64 = 1 << 30;
pub const KB_PER_GB: u64 = 1 << 20;
pub const MB_PER_GB: u64 = 1 << 10;

/// Map a vendor charge-mode code: "1" is a subscription, "3" is pay per use
pub fn to_bill_mode(charge_mode: Option<&str>) -> BillMode {
    match charge_mode {
        Some("1") => BillMode::Monthly,
        Some("3") => BillMode::OnDemand,
        _ => BillMode::Other,
    }
}

/// Parse a `key:value;key2:value2;flag;` tag string
///
/// A pair without a value maps to an empty string. Pairs with more than one
/// separator are dropped. A repeated key keeps its last value.
pub fn parse_tags(tag: Option<&str>) -> BTreeMap<String, String> {
    let mut tags = BTreeMap::new();
    let Some(tag) = tag else {
        return tags;
    };

    for pair in tag.split(';') {
        let mut parts: Vec<&str> = pair.split(':').collect();
        // "billing:" carries an empty value, not an empty third part
        while parts.last().is_some_and(|p| p.is_empty()) {
            parts.pop();
        }

        match parts.as_slice() {
            [key] => {
                tags.insert((*key).to_string(), String::new());
            }
            [key, value] => {
                tags.insert((*key).to_string(), (*value).to_string());
            }
            _ => {}
        }
    }

    tags
}

/// Parse a `yyyy-MM-ddTHH:mm:ssZ` timestamp
pub fn parse_timestamp(value: Option<&str>, field: &str) -> Result<NaiveDateTime> {
    let value = value.ok_or_else(|| CloudError::Mapping(format!("{} is missing", field)))?;
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|e| {
        CloudError::Mapping(format!("{} '{}' is not a valid timestamp: {}", field, value, e))
    })
}

/// Parse a `yyyy-MM-dd` date to midnight of that day
pub fn parse_date(value: Option<&str>, field: &str) -> Result<NaiveDateTime> {
    let value = value.ok_or_else(|| CloudError::Mapping(format!("{} is missing", field)))?;
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| {
            CloudError::Mapping(format!("{} '{}' is not a valid date: {}", field, value, e))
        })?
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| CloudError::Mapping(format!("{} '{}' has no midnight", field, value)))
}

/// Concatenate template and catalog images, ordered by name
///
/// Images whose name could not be resolved come first. The sort is stable so
/// identical input always paginates identically.
pub fn merge_images(templates: Vec<F2CImage>, catalog: Vec<F2CImage>) -> Vec<F2CImage> {
    let mut images = templates;
    images.extend(catalog);
    images.sort_by(|a, b| a.name.cmp(&b.name));
    images
}

/// Collapse structurally equal networks, keeping first-seen order
pub fn dedup_networks(networks: impl IntoIterator<Item = F2CNetwork>) -> Vec<F2CNetwork> {
    let mut seen = HashSet::new();
    networks
        .into_iter()
        .filter(|n| seen.insert(n.clone()))
        .collect()
}

pub fn bytes_to_gb(bytes: u64) -> u64 {
    bytes / BYTES_PER_GB
}

pub fn kb_to_gb(kb: u64) -> u64 {
    kb / KB_PER_GB
}

pub fn mb_to_gb(mb: u64) -> u64 {
    mb / MB_PER_GB
}

/// Fresh 32 hex character record id
pub fn new_record_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
