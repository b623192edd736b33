use anyhow::{anyhow, Context};
use serde_json::{Map, Value};

use crate::aws::{IamApi, WorkflowApi};
use crate::core::artifacts::ArtifactStore;
use crate::core::config::OmictlConfig;
use crate::core::params::{resolve_parameters, TemplateInputs};
use crate::core::types::{RunDescriptor, StartRunRequest, WorkflowLayout};

/// What the operator gets back from a run submission.
#[derive(Debug, Clone)]
pub struct LaunchReport {
    pub run: RunDescriptor,
    pub parameters: Map<String, Value>,
    /// Ready-to-run shell command for polling the run status.
    pub check_command: String,
}

/// Submits runs of an already-registered workflow. Fire-and-forget: the run
/// is started and a status-check command is reported, nothing is polled.
pub struct RunLauncher<'a> {
    iam: &'a dyn IamApi,
    workflows: &'a dyn WorkflowApi,
    artifacts: &'a ArtifactStore,
}

impl<'a> RunLauncher<'a> {
    pub fn new(
        iam: &'a dyn IamApi,
        workflows: &'a dyn WorkflowApi,
        artifacts: &'a ArtifactStore,
    ) -> Self {
        RunLauncher {
            iam,
            workflows,
            artifacts,
        }
    }

    pub async fn launch(
        &self,
        layout: &WorkflowLayout,
        config: &OmictlConfig,
        profile: Option<&str>,
    ) -> crate::Result<LaunchReport> {
        let workflow = self
            .workflows
            .find_workflow_by_name(&layout.name)
            .await
            .with_context(|| format!("failed to list workflows for '{}'", layout.name))?
            .ok_or_else(|| anyhow!("workflow '{}' not found; run setup first", layout.name))?;

        // A missing role here is a configuration error, not a transient
        // condition; no creation is attempted on the run path.
        let role_arn = self
            .iam
            .get_role_arn(config.role())
            .await
            .map_err(|err| match err {
                err if err.is_not_found() => anyhow!(
                    "role '{}' not found; check aws.role in the configuration",
                    config.role()
                ),
                err => anyhow!(err).context(format!("failed to resolve role '{}'", config.role())),
            })?;

        let account_id = config.require_account_id()?.to_string();
        let region = config.region().to_string();
        let inputs = TemplateInputs {
            registry_host: TemplateInputs::registry_host_for(&account_id, &region),
            staging_uri: config.staging_uri(),
            account_id,
            region: region.clone(),
        };

        let template_path = layout.run_parameters_path();
        let template_text = std::fs::read_to_string(&template_path)
            .with_context(|| format!("failed to read {}", template_path.display()))?;
        let parameters = resolve_parameters(&template_text, &inputs)?;

        let run = self
            .workflows
            .start_run(StartRunRequest {
                workflow_id: workflow.id.clone(),
                name: format!("test: {}", layout.name),
                role_arn,
                output_uri: config.staging_uri(),
                parameters: Value::Object(parameters.clone()),
            })
            .await
            .with_context(|| format!("failed to start run of workflow '{}'", layout.name))?;

        self.artifacts
            .write_json(&self.artifacts.parameters_path(&layout.name), &parameters)?;

        let mut check_command = format!(
            "aws omics get-run --id {} --region {}",
            run.id, region
        );
        if let Some(profile) = profile {
            check_command.push_str(&format!(" --profile {}", profile));
        }

        tracing::info!("successfully started run '{}'", run.id);
        tracing::info!(
            "using parameters: {}",
            serde_json::to_string(&parameters).unwrap_or_default()
        );

        Ok(LaunchReport {
            run,
            parameters,
            check_command,
        })
    }
}
