use clap::Args;
use std::path::PathBuf;

#[derive(Args, Clone, Debug)]
pub struct SetupArgs {
    /// Workflow name, matching a directory under the workflows root
    #[arg(value_name = "NAME")]
    pub workflow: String,

    /// Path to the TOML configuration file
    #[arg(long, default_value = "config.toml", value_name = "FILE")]
    pub config: PathBuf,

    /// Directory containing workflow definition directories
    #[arg(long, default_value = "workflows", value_name = "DIR")]
    pub workflows_dir: PathBuf,

    /// Directory for build artifacts (bundles, descriptors, parameters)
    #[arg(long, default_value = "build", value_name = "DIR")]
    pub build_dir: PathBuf,

    /// Abort the activation wait after this many seconds
    #[arg(long, default_value = "600", value_name = "SECONDS")]
    pub activation_timeout: u64,
}

#[derive(Args, Clone, Debug)]
pub struct RunArgs {
    /// Workflow name, matching a directory under the workflows root
    #[arg(value_name = "NAME")]
    pub workflow: String,

    /// Path to the TOML configuration file
    #[arg(long, default_value = "config.toml", value_name = "FILE")]
    pub config: PathBuf,

    /// Directory containing workflow definition directories
    #[arg(long, default_value = "workflows", value_name = "DIR")]
    pub workflows_dir: PathBuf,

    /// Directory for build artifacts (bundles, descriptors, parameters)
    #[arg(long, default_value = "build", value_name = "DIR")]
    pub build_dir: PathBuf,
}

#[derive(Args, Clone, Debug)]
pub struct BundleArgs {
    /// Workflow name, matching a directory under the workflows root
    #[arg(value_name = "NAME")]
    pub workflow: String,

    /// Directory containing workflow definition directories
    #[arg(long, default_value = "workflows", value_name = "DIR")]
    pub workflows_dir: PathBuf,

    /// Directory for build artifacts (bundles, descriptors, parameters)
    #[arg(long, default_value = "build", value_name = "DIR")]
    pub build_dir: PathBuf,
}

#[derive(Args, Clone, Debug)]
pub struct ListArgs {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "config.toml", value_name = "FILE")]
    pub config: PathBuf,
}
