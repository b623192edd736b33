use anyhow::Context;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Local build-artifact store: JSON snapshots of remote resource state and
/// a copy of each definition bundle, kept under one build directory so
/// later invocations can reuse them without re-querying the service.
pub struct ArtifactStore {
    build_dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(build_dir: impl Into<PathBuf>) -> Self {
        ArtifactStore {
            build_dir: build_dir.into(),
        }
    }

    pub fn bundle_path(&self, workflow_name: &str) -> PathBuf {
        self.build_dir.join(format!("bundle-{}.zip", workflow_name))
    }

    pub fn workflow_path(&self, workflow_name: &str) -> PathBuf {
        self.build_dir.join(format!("workflow-{}", workflow_name))
    }

    pub fn role_path(&self) -> PathBuf {
        self.build_dir.join("iam-workflow-role")
    }

    pub fn parameters_path(&self, workflow_name: &str) -> PathBuf {
        self.build_dir
            .join(format!("parameters-{}.json", workflow_name))
    }

    /// Serialize `value` as pretty JSON and write it atomically.
    pub fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> crate::Result<()> {
        tracing::info!("creating build artifact: {}", path.display());
        let serialized = serde_json::to_vec_pretty(value)
            .with_context(|| format!("failed to serialize artifact {}", path.display()))?;
        atomic_write(path, &serialized)
    }

    pub fn write_bytes(&self, path: &Path, bytes: &[u8]) -> crate::Result<()> {
        tracing::info!("creating build artifact: {}", path.display());
        atomic_write(path, bytes)
    }

    /// Read a previously persisted JSON artifact.
    pub fn read_json<T: serde::de::DeserializeOwned>(&self, path: &Path) -> crate::Result<T> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read artifact {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse artifact {}", path.display()))
    }
}

fn atomic_write(path: &Path, data: &[u8]) -> crate::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, data).with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| {
        format!("failed to rename {} -> {}", tmp.display(), path.display())
    })?;
    Ok(())
}
