use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::aws::{IamApi, StorageApi, WorkflowApi};
use crate::core::artifacts::ArtifactStore;
use crate::core::bundle::bundle_workflow;
use crate::core::stage::stage_definition;
use crate::core::types::{
    ActivationOutcome, CreateWorkflowRequest, EnsureOutcome, RoleDescriptor, WorkflowDescriptor,
    WorkflowLayout, WorkflowStatus,
};

/// Trust policy allowing the workflow service to assume the role.
const ASSUME_ROLE_POLICY: &str = r#"{
  "Version": "2012-10-17",
  "Statement": [
    {
      "Effect": "Allow",
      "Principal": {"Service": "omics.amazonaws.com"},
      "Action": "sts:AssumeRole"
    }
  ]
}"#;

/// Permissions the service role needs to run workflows: the workflow
/// service itself, resource-share acceptance, and staging-bucket access.
const ROLE_POLICY: &str = r#"{
  "Version": "2012-10-17",
  "Statement": [
    {"Effect": "Allow", "Action": ["omics:*"], "Resource": "*"},
    {
      "Effect": "Allow",
      "Action": [
        "ram:AcceptResourceShareInvitation",
        "ram:GetResourceShareInvitations"
      ],
      "Resource": "*"
    },
    {
      "Effect": "Allow",
      "Action": [
        "s3:GetBucketLocation",
        "s3:PutObject",
        "s3:GetObject",
        "s3:ListBucket",
        "s3:AbortMultipartUpload",
        "s3:ListMultipartUploadParts",
        "s3:GetObjectAcl",
        "s3:PutObjectAcl"
      ],
      "Resource": "*"
    }
  ]
}"#;

/// Registration metadata read from a workflow's cli-input.yaml.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RegistrationInput {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub engine: Option<String>,
    #[serde(default)]
    pub main: Option<String>,
}

/// Bounded poll parameters for the workflow activation wait.
#[derive(Debug, Clone, Copy)]
pub struct WaitPolicy {
    pub timeout: Duration,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        WaitPolicy {
            timeout: Duration::from_secs(600),
            initial_delay: Duration::from_secs(3),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl WaitPolicy {
    pub fn with_timeout_secs(timeout_secs: u64) -> Self {
        WaitPolicy {
            timeout: Duration::from_secs(timeout_secs),
            ..WaitPolicy::default()
        }
    }
}

/// Poll a workflow until it leaves CREATING, bounded by the policy timeout.
/// Delay doubles between polls up to `max_delay`.
pub async fn wait_for_active(
    workflows: &dyn WorkflowApi,
    workflow_id: &str,
    policy: &WaitPolicy,
) -> crate::Result<ActivationOutcome> {
    let started = Instant::now();
    let mut delay = policy.initial_delay;

    loop {
        let workflow = workflows
            .get_workflow(workflow_id)
            .await
            .with_context(|| format!("failed to poll workflow '{}'", workflow_id))?;

        match workflow.status {
            WorkflowStatus::Active => return Ok(ActivationOutcome::Active),
            WorkflowStatus::Failed | WorkflowStatus::Deleted => {
                return Ok(ActivationOutcome::Failed {
                    message: workflow.status_message.unwrap_or_default(),
                })
            }
            other => {
                tracing::debug!("workflow '{}' is {}", workflow_id, other);
            }
        }

        if started.elapsed() + delay > policy.timeout {
            return Ok(ActivationOutcome::TimedOut);
        }
        tokio::time::sleep(delay).await;
        delay = (delay * 2).min(policy.max_delay);
    }
}

/// Idempotent resource provisioner. Every ensure step looks the resource up
/// by name first and only creates it on a definite not-found; any other
/// lookup failure aborts the step. Handles are injected, never global.
pub struct Provisioner<'a> {
    iam: &'a dyn IamApi,
    storage: &'a dyn StorageApi,
    workflows: &'a dyn WorkflowApi,
    artifacts: &'a ArtifactStore,
}

impl<'a> Provisioner<'a> {
    pub fn new(
        iam: &'a dyn IamApi,
        storage: &'a dyn StorageApi,
        workflows: &'a dyn WorkflowApi,
        artifacts: &'a ArtifactStore,
    ) -> Self {
        Provisioner {
            iam,
            storage,
            workflows,
            artifacts,
        }
    }

    /// Ensure the service role exists, creating it with its scoped policy
    /// when absent. The role descriptor is persisted as a build artifact.
    pub async fn ensure_role(
        &self,
        role_name: &str,
    ) -> crate::Result<(RoleDescriptor, EnsureOutcome)> {
        let (arn, outcome) = match self.iam.get_role_arn(role_name).await {
            Ok(arn) => {
                tracing::info!("role {} already exists, skipping creation", role_name);
                (arn, EnsureOutcome::AlreadyExists)
            }
            Err(err) if err.is_not_found() => {
                let arn = self
                    .iam
                    .create_role(role_name, ASSUME_ROLE_POLICY, "HealthOmics service role")
                    .await
                    .with_context(|| format!("failed to create role '{}'", role_name))?;
                let policy_arn = self
                    .iam
                    .create_policy(
                        &format!("{}-policy", role_name),
                        "Policy for HealthOmics workflow runs",
                        ROLE_POLICY,
                    )
                    .await
                    .with_context(|| format!("failed to create policy for '{}'", role_name))?;
                self.iam
                    .attach_role_policy(role_name, &policy_arn)
                    .await
                    .with_context(|| format!("failed to attach policy to '{}'", role_name))?;
                tracing::info!("created service role {}", role_name);
                (arn, EnsureOutcome::Created)
            }
            Err(err) => {
                return Err(anyhow!(err).context(format!("failed to look up role '{}'", role_name)))
            }
        };

        let descriptor = RoleDescriptor {
            role_name: role_name.to_string(),
            arn,
        };
        self.artifacts
            .write_json(&self.artifacts.role_path(), &descriptor)?;
        Ok((descriptor, outcome))
    }

    /// Ensure the staging bucket exists.
    pub async fn ensure_bucket(&self, bucket: &str) -> crate::Result<EnsureOutcome> {
        let exists = self
            .storage
            .bucket_exists(bucket)
            .await
            .with_context(|| format!("failed to check bucket '{}'", bucket))?;

        if exists {
            tracing::info!("bucket {} already exists, skipping creation", bucket);
            return Ok(EnsureOutcome::AlreadyExists);
        }

        self.storage
            .create_bucket(bucket)
            .await
            .with_context(|| format!("failed to create bucket '{}'", bucket))?;
        tracing::info!("created bucket {}", bucket);
        Ok(EnsureOutcome::Created)
    }

    /// Ensure the workflow registration exists: bundle the definition
    /// directory, stage or inline it, register, and wait for ACTIVE. Skips
    /// everything when a same-named workflow is already registered.
    pub async fn ensure_workflow(
        &self,
        layout: &WorkflowLayout,
        staging_uri: &str,
        wait: &WaitPolicy,
    ) -> crate::Result<(WorkflowDescriptor, EnsureOutcome)> {
        if let Some(existing) = self
            .workflows
            .find_workflow_by_name(&layout.name)
            .await
            .with_context(|| format!("failed to list workflows for '{}'", layout.name))?
        {
            tracing::info!(
                "workflow {} already exists (id {}), skipping creation",
                layout.name,
                existing.id
            );
            let descriptor = self.workflows.get_workflow(&existing.id).await?;
            return Ok((descriptor, EnsureOutcome::AlreadyExists));
        }

        tracing::info!(
            "creating zip bundle for workflow '{}': {}",
            layout.name,
            self.artifacts.bundle_path(&layout.name).display()
        );
        let archive = bundle_workflow(&layout.root)?;
        self.artifacts
            .write_bytes(&self.artifacts.bundle_path(&layout.name), &archive)?;

        let definition =
            stage_definition(self.storage, archive, staging_uri, &layout.name).await?;

        let parameter_template: serde_json::Value = {
            let path = layout.parameter_template_path();
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("failed to parse {}", path.display()))?
        };

        let registration: RegistrationInput = {
            let path = layout.registration_input_path();
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_yaml::from_str(&content)
                .with_context(|| format!("failed to parse {}", path.display()))?
        };

        let workflow_id = self
            .workflows
            .create_workflow(CreateWorkflowRequest {
                name: layout.name.clone(),
                description: registration.description,
                engine: registration.engine,
                main: registration.main,
                parameter_template,
                definition,
            })
            .await
            .with_context(|| format!("failed to register workflow '{}'", layout.name))?;
        tracing::info!("registered workflow {} (id {})", layout.name, workflow_id);

        match wait_for_active(self.workflows, &workflow_id, wait).await? {
            ActivationOutcome::Active => {
                let descriptor = self.workflows.get_workflow(&workflow_id).await?;
                self.artifacts
                    .write_json(&self.artifacts.workflow_path(&layout.name), &descriptor)?;
                tracing::info!("workflow {} is active", layout.name);
                Ok((descriptor, EnsureOutcome::Created))
            }
            ActivationOutcome::Failed { message } => {
                tracing::error!(
                    "workflow {} failed to activate, cause: {}",
                    layout.name,
                    message
                );
                Err(anyhow!(
                    "workflow '{}' failed to activate: {}",
                    layout.name,
                    message
                ))
            }
            ActivationOutcome::TimedOut => {
                let diagnostic = self
                    .workflows
                    .get_workflow(&workflow_id)
                    .await
                    .map(|wf| wf.status.to_string())
                    .unwrap_or_else(|err| err.to_string());
                Err(anyhow!(
                    "timed out waiting for workflow '{}' to activate (last status: {})",
                    layout.name,
                    diagnostic
                ))
            }
        }
    }
}
