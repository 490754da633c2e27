//! Huawei Cloud IAM credential

use crate::error::{HuaweiError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_IAM_ENDPOINT: &str = "https://iam.myhuaweicloud.com";
pub const DEFAULT_BSS_ENDPOINT: &str = "https://bss.myhuaweicloud.com";

fn default_iam_endpoint() -> String {
    DEFAULT_IAM_ENDPOINT.to_string()
}

fn default_bss_endpoint() -> String {
    DEFAULT_BSS_ENDPOINT.to_string()
}

/// IAM user of a Huawei Cloud account, scoped to the whole domain
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HuaweiCredential {
    pub domain_name: String,
    pub user_name: String,
    pub password: String,

    #[serde(default = "default_iam_endpoint")]
    pub iam_endpoint: String,

    #[serde(default = "default_bss_endpoint")]
    pub bss_endpoint: String,
}

impl HuaweiCredential {
    pub fn new(
        domain_name: impl Into<String>,
        user_name: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            domain_name: domain_name.into(),
            user_name: user_name.into(),
            password: password.into(),
            iam_endpoint: default_iam_endpoint(),
            bss_endpoint: default_bss_endpoint(),
        }
    }

    /// Create HuaweiCredential from environment variables
    ///
    /// `HUAWEICLOUD_IAM_ENDPOINT` and `HUAWEICLOUD_BSS_ENDPOINT` are optional.
    pub fn from_env() -> Result<Self> {
        let required = |key: &str| {
            std::env::var(key).map_err(|_| HuaweiError::MissingEnvVar(key.to_string()))
        };

        let mut credential = Self::new(
            required("HUAWEICLOUD_DOMAIN_NAME")?,
            required("HUAWEICLOUD_USER_NAME")?,
            required("HUAWEICLOUD_PASSWORD")?,
        );
        if let Ok(endpoint) = std::env::var("HUAWEICLOUD_IAM_ENDPOINT") {
            credential.iam_endpoint = endpoint;
        }
        if let Ok(endpoint) = std::env::var("HUAWEICLOUD_BSS_ENDPOINT") {
            credential.bss_endpoint = endpoint;
        }
        Ok(credential)
    }
}

impl std::fmt::Debug for HuaweiCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HuaweiCredential")
            .field("domain_name", &self.domain_name)
            .field("user_name", &self.user_name)
            .field("password", &"***")
            .field("iam_endpoint", &self.iam_endpoint)
            .field("bss_endpoint", &self.bss_endpoint)
            .finish()
    }
}
