//! Huawei Cloud billing adapter for FIT2CLOUD
//!
//! Implements [`f2c_cloud::BillingAdapter`] over the BSS
//! `ListCustomerBillsFeeRecords` API.
//!
//! # Requirements
//!
//! - An IAM user allowed to read bills (`bss:bill:view`)
//! - `HUAWEICLOUD_DOMAIN_NAME`, `HUAWEICLOUD_USER_NAME`, `HUAWEICLOUD_PASSWORD`
//!   env vars when using [`HuaweiCredential::from_env`]
//!
//! # Example
//!
//! ```ignore
//! use f2c_cloud::{AdapterConfig, BillingAdapter};
//! use f2c_cloud_huawei::{HuaweiBillingProvider, HuaweiCredential, IamConnector};
//!
//! let config = AdapterConfig::from_env()?;
//! let connector = IamConnector::from_config(&config.http)?;
//! let provider = HuaweiBillingProvider::new(connector, HuaweiCredential::from_env()?);
//!
//! let batch = provider.fetch_bills("2022-04").await?;
//! for rejected in &batch.rejected {
//!     eprintln!("skipped {:?}: {}", rejected.resource_id, rejected.reason);
//! }
//! ```

pub mod bss;
pub mod credential;
pub mod error;
pub mod iam;
pub mod mapping;
pub mod provider;

pub use bss::{BssSession, FeeRecordPage, ResFeeRecord};
pub use credential::HuaweiCredential;
pub use error::{HuaweiError, Result};
pub use iam::{IamConnector, IamSession};
pub use provider::HuaweiBillingProvider;
