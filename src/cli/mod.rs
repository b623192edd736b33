pub mod args;
pub mod commands;

pub use args::{BundleArgs, ListArgs, RunArgs, SetupArgs};
use clap::{Parser, Subcommand};

const HELP_TEMPLATE: &str = "\
{name} {version}\n\
{about-with-newline}\n\
USAGE:\n    {usage}\n\
\nOPTIONS:\n{options}\n\
WORKFLOW COMMANDS:\n{subcommands}\n";

#[derive(Parser)]
#[command(name = "omictl")]
#[command(version = crate::VERSION)]
#[command(about = "Provision AWS HealthOmics workflows and launch runs")]
#[command(help_template = HELP_TEMPLATE)]
#[command(
    after_long_help = "Typical flow: bundle and register a workflow with setup, then start a parameterized run and poll it with the printed check command."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    #[command(
        about = "Provision everything a workflow needs and register it",
        long_about = "Setup creates the service role and staging bucket if absent, bundles the workflow directory, stages or inlines the definition archive, registers the workflow, and waits for it to become active. Re-running skips every resource that already exists.",
        after_help = "Example:\n    omictl setup to_bam --activation-timeout 900"
    )]
    Setup(SetupArgs),
    #[command(
        about = "Start a run of a registered workflow",
        long_about = "Run resolves the workflow id and role ARN by name, renders test.parameters.json with the configured region, staging URI, and account id, submits the run, and prints a copyable status-check command. The run is not polled.",
        after_help = "Example:\n    omictl run to_bam"
    )]
    Run(RunArgs),
    #[command(
        about = "Build the definition zip bundle without registering it",
        long_about = "Bundle walks the workflow directory, zips every regular file under a root-relative entry name, and writes the archive under the build directory for inspection.",
        after_help = "Example:\n    omictl bundle to_bam --build-dir build"
    )]
    Bundle(BundleArgs),
    #[command(
        about = "List workflows registered with the service",
        after_help = "Example:\n    omictl list"
    )]
    List(ListArgs),
}

pub async fn run(args: Args) -> crate::Result<()> {
    match args.command {
        Command::Setup(setup_args) => commands::setup(setup_args).await,
        Command::Run(run_args) => commands::run(run_args).await,
        Command::Bundle(bundle_args) => commands::bundle(bundle_args).await,
        Command::List(list_args) => commands::list(list_args).await,
    }
}
