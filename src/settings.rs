use std::fmt;

use serde::Deserialize;

use crate::error::Result;
use crate::token::{generate_sas_token, registration_resource_uri, DEFAULT_TTL_SECS};

fn default_policy_name() -> String {
    "registration".to_owned()
}

fn default_ttl_secs() -> i64 {
    DEFAULT_TTL_SECS
}

/// Injected values needed to sign a DPS registration token.
#[derive(Clone, Deserialize)]
pub struct ProvisioningSettings {
    pub scope_id: String,
    pub registration_id: String,
    /// Base64 primary or secondary key of the enrollment.
    pub device_key: String,
    #[serde(default = "default_policy_name")]
    pub policy_name: String,
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: i64,
}

impl ProvisioningSettings {
    pub fn resource_uri(&self) -> String {
        registration_resource_uri(&self.scope_id, &self.registration_id)
    }

    pub fn generate_token(&self) -> Result<String> {
        generate_sas_token(
            &self.resource_uri(),
            &self.device_key,
            &self.policy_name,
            self.ttl_secs,
        )
    }
}

impl fmt::Debug for ProvisioningSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProvisioningSettings")
            .field("scope_id", &self.scope_id)
            .field("registration_id", &self.registration_id)
            .field("device_key", &"<redacted>")
            .field("policy_name", &self.policy_name)
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}
