//! The release routine: provision the key secret if a key file is present,
//! then trigger a remote-only deploy.
//!
//! ```text
//! START → CHECK_KEY ─┬─ no file ──→ SKIP ──────┐
//!                    └─ file ────→ PROVISION ─┼─→ DEPLOY ─┬─→ DONE
//!                                  │ abort     │           └─→ FAILED
//!                                  └───────────┴─→ FAILED
//! ```
//!
//! Runs are independent: nothing is cached between invocations, so two runs
//! always produce two deploys.

use std::path::Path;
use std::time::Duration;

use liftoff_core::{DeployConfig, FailurePolicy, KeyFile, KeyFileError, LiftoffConfig};

use crate::client::{DeployError, FlyClient, SecretError};
use crate::executor::FlyctlExecutor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseState {
    Start,
    CheckKey,
    Skip,
    Provision,
    Deploy,
    Done,
    Failed,
}

/// How the provisioning step resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provisioning {
    /// No key file; nothing was sent.
    Skipped,
    Provisioned,
    /// Failed under [`FailurePolicy::Continue`]; the deploy went ahead.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseReport {
    pub provisioning: Provisioning,
    pub state: ReleaseState,
}

/// Everything one release needs, resolved from `liftoff.toml` and CLI flags.
#[derive(Debug, Clone)]
pub struct ReleasePlan {
    pub key_file: KeyFile,
    pub secret_name: String,
    pub on_failure: FailurePolicy,
    pub stage: bool,
    pub deploy: DeployConfig,
    pub secret_timeout: Duration,
    pub deploy_timeout: Duration,
}

impl ReleasePlan {
    /// The key file path is resolved against `project_dir`.
    pub fn from_config(project_dir: &Path, config: &LiftoffConfig) -> Self {
        Self {
            key_file: KeyFile::new(project_dir.join(&config.secret.key_file)),
            secret_name: config.secret.name.clone(),
            on_failure: config.secret.on_failure,
            stage: config.secret.stage,
            deploy: config.deploy.clone(),
            secret_timeout: config.timeouts.secret(),
            deploy_timeout: config.timeouts.deploy(),
        }
    }
}

/// Run one release.
pub async fn release<E: FlyctlExecutor>(
    client: &FlyClient<E>,
    plan: &ReleasePlan,
) -> Result<ReleaseReport, ReleaseError> {
    let mut state = ReleaseState::Start;
    advance(&mut state, ReleaseState::CheckKey);

    let provisioning = if plan.key_file.exists() {
        advance(&mut state, ReleaseState::Provision);
        match provision(client, plan).await {
            Ok(()) => Provisioning::Provisioned,
            Err(e) => match plan.on_failure {
                FailurePolicy::Continue => {
                    tracing::warn!(
                        step = "provision",
                        error = %error_chain(&e),
                        "secret provisioning failed; deploying anyway"
                    );
                    Provisioning::Failed
                }
                FailurePolicy::Abort => {
                    advance(&mut state, ReleaseState::Failed);
                    return Err(ReleaseError::Provision { source: e });
                }
            },
        }
    } else {
        advance(&mut state, ReleaseState::Skip);
        tracing::info!(
            path = %plan.key_file.path().display(),
            "no key file; skipping secret provisioning"
        );
        Provisioning::Skipped
    };

    advance(&mut state, ReleaseState::Deploy);
    match client.deploy(&plan.deploy, plan.deploy_timeout).await {
        Ok(()) => {
            advance(&mut state, ReleaseState::Done);
            Ok(ReleaseReport {
                provisioning,
                state,
            })
        }
        Err(e) => {
            advance(&mut state, ReleaseState::Failed);
            Err(ReleaseError::Deploy { source: e })
        }
    }
}

async fn provision<E: FlyctlExecutor>(
    client: &FlyClient<E>,
    plan: &ReleasePlan,
) -> Result<(), ProvisionError> {
    let key = plan.key_file.read()?;
    client
        .set_secret(
            &plan.secret_name,
            &key,
            plan.deploy.app.as_deref(),
            plan.stage,
            plan.secret_timeout,
        )
        .await?;
    Ok(())
}

fn advance(state: &mut ReleaseState, next: ReleaseState) {
    tracing::debug!(from = ?*state, to = ?next, "release state");
    *state = next;
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(e) = source {
        out.push_str(": ");
        out.push_str(&e.to_string());
        source = e.source();
    }
    out
}

#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    #[error(transparent)]
    KeyFile(#[from] KeyFileError),

    #[error(transparent)]
    Secret(#[from] SecretError),
}

#[derive(Debug, thiserror::Error)]
pub enum ReleaseError {
    #[error("secret provisioning failed")]
    Provision { source: ProvisionError },

    #[error("deployment failed")]
    Deploy { source: DeployError },
}

impl ReleaseError {
    /// Process exit code for this failure: the deploy tool's own code when it
    /// has one, otherwise 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Deploy { source } => source.exit_code().filter(|c| *c != 0).unwrap_or(1),
            Self::Provision { .. } => 1,
        }
    }
}
