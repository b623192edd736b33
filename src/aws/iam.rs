use async_trait::async_trait;
use aws_sdk_iam::error::SdkError;
use aws_sdk_iam::operation::get_role::GetRoleError;

use super::error::{ProviderError, ResourceKind};

/// Identity/access-management operations the provisioner and launcher need.
#[async_trait]
pub trait IamApi: Send + Sync {
    /// Resolve a role's ARN by name. `NotFound` when the role is absent.
    async fn get_role_arn(&self, role_name: &str) -> Result<String, ProviderError>;

    /// Create a role with the given trust policy, returning its ARN.
    async fn create_role(
        &self,
        role_name: &str,
        assume_role_policy: &str,
        description: &str,
    ) -> Result<String, ProviderError>;

    /// Create a customer-managed policy, returning its ARN.
    async fn create_policy(
        &self,
        policy_name: &str,
        description: &str,
        document: &str,
    ) -> Result<String, ProviderError>;

    /// Attach a policy to a role.
    async fn attach_role_policy(
        &self,
        role_name: &str,
        policy_arn: &str,
    ) -> Result<(), ProviderError>;
}

/// IAM backed by the AWS SDK.
#[derive(Debug, Clone)]
pub struct SdkIam {
    client: aws_sdk_iam::Client,
}

impl SdkIam {
    pub fn new(client: aws_sdk_iam::Client) -> Self {
        SdkIam { client }
    }
}

fn map_get_role_error(err: &SdkError<GetRoleError>, role_name: &str) -> ProviderError {
    if let SdkError::ServiceError(service_err) = err {
        if service_err.err().is_no_such_entity_exception() {
            return ProviderError::not_found(ResourceKind::Role, role_name);
        }
        return ProviderError::Service(service_err.err().to_string());
    }
    ProviderError::Service(err.to_string())
}

fn map_mutation_error<E: std::fmt::Display>(err: &SdkError<E>) -> ProviderError {
    if let SdkError::ServiceError(service_err) = err {
        return ProviderError::Service(service_err.err().to_string());
    }
    ProviderError::Service(err.to_string())
}

#[async_trait]
impl IamApi for SdkIam {
    async fn get_role_arn(&self, role_name: &str) -> Result<String, ProviderError> {
        let output = self
            .client
            .get_role()
            .role_name(role_name)
            .send()
            .await
            .map_err(|ref err| map_get_role_error(err, role_name))?;

        output
            .role()
            .map(|role| role.arn().to_string())
            .ok_or_else(|| {
                ProviderError::Service(format!("GetRole '{}' returned no role body", role_name))
            })
    }

    async fn create_role(
        &self,
        role_name: &str,
        assume_role_policy: &str,
        description: &str,
    ) -> Result<String, ProviderError> {
        let output = self
            .client
            .create_role()
            .role_name(role_name)
            .assume_role_policy_document(assume_role_policy)
            .description(description)
            .send()
            .await
            .map_err(|ref err| map_mutation_error(err))?;

        output
            .role()
            .map(|role| role.arn().to_string())
            .ok_or_else(|| {
                ProviderError::Service(format!("CreateRole '{}' returned no role body", role_name))
            })
    }

    async fn create_policy(
        &self,
        policy_name: &str,
        description: &str,
        document: &str,
    ) -> Result<String, ProviderError> {
        let output = self
            .client
            .create_policy()
            .policy_name(policy_name)
            .description(description)
            .policy_document(document)
            .send()
            .await
            .map_err(|ref err| map_mutation_error(err))?;

        output
            .policy()
            .and_then(|policy| policy.arn())
            .map(ToString::to_string)
            .ok_or_else(|| {
                ProviderError::Service(format!(
                    "CreatePolicy '{}' returned no policy ARN",
                    policy_name
                ))
            })
    }

    async fn attach_role_policy(
        &self,
        role_name: &str,
        policy_arn: &str,
    ) -> Result<(), ProviderError> {
        self.client
            .attach_role_policy()
            .role_name(role_name)
            .policy_arn(policy_arn)
            .send()
            .await
            .map_err(|ref err| map_mutation_error(err))?;
        Ok(())
    }
}
