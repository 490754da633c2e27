//! vCenter credential

use serde::{Deserialize, Serialize};

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VsphereCredential {
    pub v_center_ip: String,
    pub v_user_name: String,
    pub v_password: String,

    /// Also list content-library items as images
    #[serde(default)]
    pub use_content_library: bool,
}

impl VsphereCredential {
    pub fn new(
        v_center_ip: impl Into<String>,
        v_user_name: impl Into<String>,
        v_password: impl Into<String>,
    ) -> Self {
        Self {
            v_center_ip: v_center_ip.into(),
            v_user_name: v_user_name.into(),
            v_password: v_password.into(),
            use_content_library: false,
        }
    }

    pub fn with_content_library(mut self) -> Self {
        self.use_content_library = true;
        self
    }

    /// SDK endpoint of the vCenter
    pub fn endpoint(&self) -> String {
        format!("https://{}/sdk", self.v_center_ip)
    }
}

impl std::fmt::Debug for VsphereCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VsphereCredential")
            .field("v_center_ip", &self.v_center_ip)
            .field("v_user_name", &self.v_user_name)
            .field("v_password", &"***")
            .field("use_content_library", &self.use_content_library)
            .finish()
    }
}
