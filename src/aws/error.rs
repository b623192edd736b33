use thiserror::Error;

/// Errors surfaced by the provider abstraction.
///
/// `NotFound` is the only variant the provisioner treats as recoverable; it
/// is what turns a lookup into a creation. Everything else aborts the step,
/// so a transient or auth failure can never be mistaken for "absent".
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// The looked-up resource does not exist (IAM NoSuchEntity, S3 404,
    /// HealthOmics ResourceNotFound).
    #[error("{kind} '{name}' not found")]
    NotFound { kind: ResourceKind, name: String },

    /// The caller is not allowed to touch the resource (HTTP 403).
    #[error("access denied to {kind} '{name}'")]
    AccessDenied { kind: ResourceKind, name: String },

    /// The service rejected the request for some other reason.
    #[error("{0}")]
    Service(String),
}

impl ProviderError {
    pub fn not_found(kind: ResourceKind, name: impl Into<String>) -> Self {
        ProviderError::NotFound {
            kind,
            name: name.into(),
        }
    }

    pub fn access_denied(kind: ResourceKind, name: impl Into<String>) -> Self {
        ProviderError::AccessDenied {
            kind,
            name: name.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::NotFound { .. })
    }
}

/// Resource kinds named in provider errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Role,
    Policy,
    Bucket,
    Object,
    Workflow,
    Run,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ResourceKind::Role => "role",
            ResourceKind::Policy => "policy",
            ResourceKind::Bucket => "bucket",
            ResourceKind::Object => "object",
            ResourceKind::Workflow => "workflow",
            ResourceKind::Run => "run",
        };
        f.write_str(label)
    }
}
