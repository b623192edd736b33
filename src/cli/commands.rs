use crate::{
    aws::AwsClients,
    cli::args::{BundleArgs, ListArgs, RunArgs, SetupArgs},
    core::{
        bundle::bundle_workflow, types::WorkflowLayout, ArtifactStore, ConfigLoader, Provisioner,
        RunLauncher, WaitPolicy,
    },
    Result,
};
use std::env;

pub async fn setup(args: SetupArgs) -> Result<()> {
    let config = ConfigLoader::load(&args.config)?;
    tracing::info!("configuration file loaded");

    let clients = AwsClients::connect(config.region()).await;
    let artifacts = ArtifactStore::new(&args.build_dir);
    let provisioner = Provisioner::new(
        &clients.iam,
        &clients.storage,
        &clients.workflows,
        &artifacts,
    );

    let (role, _) = provisioner.ensure_role(config.role()).await?;
    provisioner.ensure_bucket(config.bucket()).await?;

    let layout = WorkflowLayout::new(&args.workflows_dir, &args.workflow);
    let wait = WaitPolicy::with_timeout_secs(args.activation_timeout);
    let (workflow, _) = provisioner
        .ensure_workflow(&layout, &config.staging_uri(), &wait)
        .await?;

    println!(
        "Workflow '{}' is ready (id {}, role {})",
        workflow.name, workflow.id, role.arn
    );
    Ok(())
}

pub async fn run(args: RunArgs) -> Result<()> {
    let config = ConfigLoader::load(&args.config)?;
    tracing::info!("configuration file loaded");

    let clients = AwsClients::connect(config.region()).await;
    let artifacts = ArtifactStore::new(&args.build_dir);
    let launcher = RunLauncher::new(&clients.iam, &clients.workflows, &artifacts);

    let layout = WorkflowLayout::new(&args.workflows_dir, &args.workflow);
    let profile = env::var("AWS_PROFILE").ok();
    let report = launcher
        .launch(&layout, &config, profile.as_deref())
        .await?;

    println!("Started run '{}'", report.run.id);
    println!("Check run status with: {}", report.check_command);
    Ok(())
}

pub async fn bundle(args: BundleArgs) -> Result<()> {
    let layout = WorkflowLayout::new(&args.workflows_dir, &args.workflow);
    let artifacts = ArtifactStore::new(&args.build_dir);

    let archive = bundle_workflow(&layout.root)?;
    let path = artifacts.bundle_path(&layout.name);
    artifacts.write_bytes(&path, &archive)?;

    println!(
        "Wrote {} ({:.1} KiB)",
        path.display(),
        archive.len() as f64 / 1024.0
    );
    Ok(())
}

pub async fn list(args: ListArgs) -> Result<()> {
    use crate::aws::WorkflowApi;

    let config = ConfigLoader::load(&args.config)?;
    let clients = AwsClients::connect(config.region()).await;

    let workflows = clients.workflows.list_workflows().await?;
    if workflows.is_empty() {
        println!("No workflows registered");
        return Ok(());
    }
    for workflow in workflows {
        println!("{}\t{}\t{}", workflow.id, workflow.status, workflow.name);
    }
    Ok(())
}
