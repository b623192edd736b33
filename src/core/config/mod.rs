use serde::{Deserialize, Serialize};

/// Main omictl configuration loaded from config.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OmictlConfig {
    /// AWS account settings
    #[serde(default)]
    pub aws: AwsSettings,
}

/// AWS settings: region, staging bucket, service role, optional account id.
///
/// `region`, `bucket`, and `role` are required; the loader rejects a file
/// that omits any of them with a message naming the key. `account_id` is
/// only needed when launching runs (parameter templating and the container
/// registry host).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AwsSettings {
    #[serde(default)]
    pub region: Option<String>,

    #[serde(default)]
    pub bucket: Option<String>,

    #[serde(default)]
    pub role: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
}

impl OmictlConfig {
    pub fn region(&self) -> &str {
        self.aws.region.as_deref().unwrap_or_default()
    }

    pub fn bucket(&self) -> &str {
        self.aws.bucket.as_deref().unwrap_or_default()
    }

    pub fn role(&self) -> &str {
        self.aws.role.as_deref().unwrap_or_default()
    }

    /// Staging location prefix derived from the bucket name.
    pub fn staging_uri(&self) -> String {
        format!("s3://{}", self.bucket())
    }

    /// Account id, required only at run-launch time.
    pub fn require_account_id(&self) -> crate::Result<&str> {
        self.aws.account_id.as_deref().ok_or_else(|| {
            anyhow::anyhow!(
                "AWS account_id not found in config.toml; add account_id under [aws] to launch runs"
            )
        })
    }
}


pub mod loader;

pub use loader::ConfigLoader;
