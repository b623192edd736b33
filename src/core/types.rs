use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Remote workflow status enumeration, as reported by the orchestration service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkflowStatus {
    Creating,
    Active,
    Updating,
    Failed,
    Deleted,
    Inactive,
    Other(String),
}

impl WorkflowStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WorkflowStatus::Active | WorkflowStatus::Failed | WorkflowStatus::Deleted
        )
    }
}

impl std::fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkflowStatus::Other(s) => f.write_str(s),
            other => write!(f, "{:?}", other),
        }
    }
}

/// Entry returned by a workflow list call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowSummary {
    pub id: String,
    pub name: String,
    pub status: WorkflowStatus,
}

/// Full descriptor of a registered workflow, persisted as a build artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowDescriptor {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,
    pub name: String,
    pub status: WorkflowStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<chrono::DateTime<chrono::Utc>>,
}

/// IAM role descriptor, persisted as a build artifact with its ARN.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RoleDescriptor {
    pub role_name: String,
    pub arn: String,
}

/// Where the workflow definition bytes end up in the registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionSource {
    /// Archive small enough to embed directly in the request.
    Inline(Vec<u8>),
    /// Archive staged to object storage, referenced by URI.
    Staged(String),
}

/// Registration request assembled by the provisioner.
#[derive(Debug, Clone)]
pub struct CreateWorkflowRequest {
    pub name: String,
    pub description: Option<String>,
    pub engine: Option<String>,
    pub main: Option<String>,
    /// Parameter name -> {description, optional} schema document.
    pub parameter_template: serde_json::Value,
    pub definition: DefinitionSource,
}

/// Run submission request assembled by the launcher.
#[derive(Debug, Clone)]
pub struct StartRunRequest {
    pub workflow_id: String,
    pub name: String,
    pub role_arn: String,
    pub output_uri: String,
    pub parameters: serde_json::Value,
}

/// Descriptor of a started run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunDescriptor {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Outcome of an idempotent ensure step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureOutcome {
    Created,
    AlreadyExists,
}

/// Outcome of the bounded wait for workflow activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationOutcome {
    Active,
    Failed { message: String },
    TimedOut,
}

/// On-disk layout of a single workflow definition directory.
#[derive(Debug, Clone)]
pub struct WorkflowLayout {
    pub name: String,
    pub root: PathBuf,
}

impl WorkflowLayout {
    pub fn new(workflows_dir: &Path, name: &str) -> Self {
        WorkflowLayout {
            name: name.to_string(),
            root: workflows_dir.join(name),
        }
    }

    pub fn parameter_template_path(&self) -> PathBuf {
        self.root.join("parameter-template.json")
    }

    pub fn registration_input_path(&self) -> PathBuf {
        self.root.join("cli-input.yaml")
    }

    pub fn run_parameters_path(&self) -> PathBuf {
        self.root.join("test.parameters.json")
    }
}
