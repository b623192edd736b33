use super::OmictlConfig;
use anyhow::{anyhow, Context};
use std::env;
use std::path::Path;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config from a file path, apply environment overrides, and
    /// validate the required keys. Missing required keys are fatal with a
    /// message naming the key, matching the startup contract.
    pub fn load(path: &Path) -> crate::Result<OmictlConfig> {
        if !path.exists() {
            return Err(anyhow!(
                "configuration file {} not found",
                path.display()
            ));
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        let mut config: OmictlConfig = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;

        Self::apply_env_overrides(&mut config);
        Self::validate(&config, path)?;

        Ok(config)
    }

    /// Environment variables take precedence over config file values.
    fn apply_env_overrides(config: &mut OmictlConfig) {
        if let Ok(region) = env::var("OMICTL_AWS_REGION") {
            config.aws.region = Some(region);
        }
        if let Ok(bucket) = env::var("OMICTL_AWS_BUCKET") {
            config.aws.bucket = Some(bucket);
        }
        if let Ok(role) = env::var("OMICTL_AWS_ROLE") {
            config.aws.role = Some(role);
        }
        if let Ok(account_id) = env::var("OMICTL_AWS_ACCOUNT_ID") {
            config.aws.account_id = Some(account_id);
        }
    }

    fn validate(config: &OmictlConfig, path: &Path) -> crate::Result<()> {
        for (value, key) in [
            (&config.aws.region, "region"),
            (&config.aws.bucket, "bucket"),
            (&config.aws.role, "role"),
        ] {
            match value {
                Some(v) if !v.is_empty() => {}
                _ => {
                    return Err(anyhow!(
                        "AWS {} not found in {}",
                        key,
                        path.display()
                    ))
                }
            }
        }
        Ok(())
    }

    /// Get documentation for supported environment variables
    pub fn env_var_documentation() -> &'static [&'static str] {
        &[
            "OMICTL_AWS_REGION - Override AWS region",
            "OMICTL_AWS_BUCKET - Override staging bucket name",
            "OMICTL_AWS_ROLE - Override HealthOmics service role name",
            "OMICTL_AWS_ACCOUNT_ID - Override AWS account id",
        ]
    }
}
