use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_omics::primitives::Blob;
use aws_sdk_omics::types::{WorkflowEngine, WorkflowParameter};
use aws_smithy_types::Document;

use super::error::{ProviderError, ResourceKind};
use crate::core::types::{
    CreateWorkflowRequest, DefinitionSource, RunDescriptor, StartRunRequest, WorkflowDescriptor,
    WorkflowStatus, WorkflowSummary,
};

/// Managed-workflow-service operations: list, register, inspect, start runs.
#[async_trait]
pub trait WorkflowApi: Send + Sync {
    /// Find a workflow by its name. The service keys workflows by id; name
    /// is this tool's dedup key, so the listing is scanned.
    async fn find_workflow_by_name(
        &self,
        name: &str,
    ) -> Result<Option<WorkflowSummary>, ProviderError>;

    async fn list_workflows(&self) -> Result<Vec<WorkflowSummary>, ProviderError>;

    /// Register a workflow definition, returning the new workflow id.
    async fn create_workflow(&self, request: CreateWorkflowRequest)
        -> Result<String, ProviderError>;

    async fn get_workflow(&self, id: &str) -> Result<WorkflowDescriptor, ProviderError>;

    async fn start_run(&self, request: StartRunRequest) -> Result<RunDescriptor, ProviderError>;
}

/// Workflow service backed by the AWS HealthOmics SDK.
#[derive(Debug, Clone)]
pub struct SdkWorkflowService {
    client: aws_sdk_omics::Client,
}

impl SdkWorkflowService {
    pub fn new(client: aws_sdk_omics::Client) -> Self {
        SdkWorkflowService { client }
    }
}

#[async_trait]
impl WorkflowApi for SdkWorkflowService {
    async fn find_workflow_by_name(
        &self,
        name: &str,
    ) -> Result<Option<WorkflowSummary>, ProviderError> {
        let workflows = self.list_workflows().await?;
        Ok(workflows.into_iter().find(|item| item.name == name))
    }

    async fn list_workflows(&self) -> Result<Vec<WorkflowSummary>, ProviderError> {
        let mut summaries = Vec::new();
        let mut pages = self.client.list_workflows().into_paginator().send();
        while let Some(page) = pages.next().await {
            let page = page
                .map_err(|err| ProviderError::Service(err.into_service_error().to_string()))?;
            for item in page.items() {
                summaries.push(WorkflowSummary {
                    id: item.id().unwrap_or_default().to_string(),
                    name: item.name().unwrap_or_default().to_string(),
                    status: map_status(item.status()),
                });
            }
        }
        Ok(summaries)
    }

    async fn create_workflow(
        &self,
        request: CreateWorkflowRequest,
    ) -> Result<String, ProviderError> {
        let mut call = self
            .client
            .create_workflow()
            .name(&request.name)
            .set_parameter_template(Some(parameter_template_from_json(
                &request.parameter_template,
            )?));

        if let Some(ref description) = request.description {
            call = call.description(description);
        }
        if let Some(ref engine) = request.engine {
            call = call.engine(WorkflowEngine::from(engine.as_str()));
        }
        if let Some(ref main) = request.main {
            call = call.main(main);
        }
        call = match request.definition {
            DefinitionSource::Inline(bytes) => call.definition_zip(Blob::new(bytes)),
            DefinitionSource::Staged(uri) => call.definition_uri(uri),
        };

        let output = call
            .send()
            .await
            .map_err(|err| ProviderError::Service(err.into_service_error().to_string()))?;

        output
            .id()
            .map(ToString::to_string)
            .ok_or_else(|| ProviderError::Service("CreateWorkflow returned no id".to_string()))
    }

    async fn get_workflow(&self, id: &str) -> Result<WorkflowDescriptor, ProviderError> {
        let output = self
            .client
            .get_workflow()
            .id(id)
            .send()
            .await
            .map_err(|err| {
                let service = err.into_service_error();
                if service.is_resource_not_found_exception() {
                    ProviderError::not_found(ResourceKind::Workflow, id)
                } else {
                    ProviderError::Service(service.to_string())
                }
            })?;

        Ok(WorkflowDescriptor {
            id: output.id().unwrap_or(id).to_string(),
            arn: output.arn().map(ToString::to_string),
            name: output.name().unwrap_or_default().to_string(),
            status: map_status(output.status()),
            status_message: output.status_message().map(ToString::to_string),
            creation_time: output.creation_time().and_then(|time| {
                chrono::DateTime::from_timestamp(time.secs(), time.subsec_nanos())
            }),
        })
    }

    async fn start_run(&self, request: StartRunRequest) -> Result<RunDescriptor, ProviderError> {
        let output = self
            .client
            .start_run()
            .workflow_id(&request.workflow_id)
            .name(&request.name)
            .role_arn(&request.role_arn)
            .output_uri(&request.output_uri)
            .parameters(json_to_document(&request.parameters))
            .send()
            .await
            .map_err(|err| ProviderError::Service(err.into_service_error().to_string()))?;

        Ok(RunDescriptor {
            id: output
                .id()
                .map(ToString::to_string)
                .ok_or_else(|| ProviderError::Service("StartRun returned no id".to_string()))?,
            arn: output.arn().map(ToString::to_string),
            status: output.status().map(|status| status.as_str().to_string()),
        })
    }
}

fn map_status(status: Option<&aws_sdk_omics::types::WorkflowStatus>) -> WorkflowStatus {
    match status.map(|status| status.as_str()) {
        Some("CREATING") => WorkflowStatus::Creating,
        Some("ACTIVE") => WorkflowStatus::Active,
        Some("UPDATING") => WorkflowStatus::Updating,
        Some("FAILED") => WorkflowStatus::Failed,
        Some("DELETED") => WorkflowStatus::Deleted,
        Some("INACTIVE") => WorkflowStatus::Inactive,
        Some(other) => WorkflowStatus::Other(other.to_string()),
        None => WorkflowStatus::Other("UNKNOWN".to_string()),
    }
}

/// Convert the on-disk parameter-template document (name -> {description,
/// optional}) into the service's typed map.
fn parameter_template_from_json(
    template: &serde_json::Value,
) -> Result<HashMap<String, WorkflowParameter>, ProviderError> {
    let object = template.as_object().ok_or_else(|| {
        ProviderError::Service("parameter-template.json must be a JSON object".to_string())
    })?;

    let mut map = HashMap::new();
    for (name, meta) in object {
        let mut builder = WorkflowParameter::builder();
        if let Some(description) = meta.get("description").and_then(|v| v.as_str()) {
            builder = builder.description(description);
        }
        if let Some(optional) = meta.get("optional").and_then(|v| v.as_bool()) {
            builder = builder.optional(optional);
        }
        map.insert(name.clone(), builder.build());
    }
    Ok(map)
}

/// Recursive serde_json -> smithy Document conversion for run parameters.
fn json_to_document(value: &serde_json::Value) -> Document {
    match value {
        serde_json::Value::Null => Document::Null,
        serde_json::Value::Bool(b) => Document::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                Document::Number(aws_smithy_types::Number::PosInt(v))
            } else if let Some(v) = n.as_i64() {
                Document::Number(aws_smithy_types::Number::NegInt(v))
            } else {
                Document::Number(aws_smithy_types::Number::Float(n.as_f64().unwrap_or(0.0)))
            }
        }
        serde_json::Value::String(s) => Document::String(s.clone()),
        serde_json::Value::Array(items) => {
            Document::Array(items.iter().map(json_to_document).collect())
        }
        serde_json::Value::Object(map) => Document::Object(
            map.iter()
                .map(|(key, item)| (key.clone(), json_to_document(item)))
                .collect(),
        ),
    }
}
