pub mod error;
pub mod iam;
pub mod omics;
pub mod s3;

#[cfg(test)]
pub mod fakes;

pub use error::{ProviderError, ResourceKind};
pub use iam::{IamApi, SdkIam};
pub use omics::{SdkWorkflowService, WorkflowApi};
pub use s3::{SdkStorage, StorageApi};

use aws_config::BehaviorVersion;

/// Handles for every remote service the tool talks to, built once per
/// invocation and passed down explicitly. No module-level client state.
pub struct AwsClients {
    pub iam: SdkIam,
    pub storage: SdkStorage,
    pub workflows: SdkWorkflowService,
}

impl AwsClients {
    /// Build all service clients from one shared SDK configuration.
    pub async fn connect(region: &str) -> AwsClients {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_string()))
            .load()
            .await;

        AwsClients {
            iam: SdkIam::new(aws_sdk_iam::Client::new(&sdk_config)),
            storage: SdkStorage::new(aws_sdk_s3::Client::new(&sdk_config), region),
            workflows: SdkWorkflowService::new(aws_sdk_omics::Client::new(&sdk_config)),
        }
    }
}
