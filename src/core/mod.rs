pub mod artifacts;
pub mod bundle;
pub mod config;
pub mod launch;
pub mod params;
pub mod provision;
pub mod stage;
pub mod types;

pub use artifacts::ArtifactStore;
pub use config::{AwsSettings, ConfigLoader, OmictlConfig};
pub use launch::RunLauncher;
pub use provision::{Provisioner, WaitPolicy};
