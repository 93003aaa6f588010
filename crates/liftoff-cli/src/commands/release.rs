use liftoff_cloud::{FlyClient, Provisioning, ReleasePlan};
use liftoff_core::{FailurePolicy, LiftoffConfig};
use std::path::PathBuf;

/// Command-line overrides for `liftoff.toml`.
pub struct ReleaseOptions {
    pub key_file: Option<PathBuf>,
    pub strict_secrets: bool,
    pub app: Option<String>,
}

/// Provision the key secret if present, then deploy.
pub async fn release(opts: ReleaseOptions) -> anyhow::Result<()> {
    let project_dir = PathBuf::from(".");
    let mut config = LiftoffConfig::load(&project_dir)?;

    if let Some(key_file) = opts.key_file {
        config.secret.key_file = key_file;
    }
    if opts.strict_secrets {
        config.secret.on_failure = FailurePolicy::Abort;
    }
    if let Some(app) = opts.app {
        config.deploy.app = Some(app);
    }

    let plan = ReleasePlan::from_config(&project_dir, &config);
    let client = FlyClient::new(&config.deploy.program);

    let report = liftoff_cloud::release(&client, &plan).await?;

    match report.provisioning {
        Provisioning::Skipped => println!("Secret {}: skipped (no key file)", plan.secret_name),
        Provisioning::Provisioned => println!("Secret {}: set", plan.secret_name),
        Provisioning::Failed => println!("Secret {}: NOT set (see warning above)", plan.secret_name),
    }
    println!("Deployed.");

    Ok(())
}
