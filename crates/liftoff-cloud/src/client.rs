use crate::executor::{FlyctlExecutor, RealExecutor};
use crate::flyctl::FlyctlError;
use liftoff_core::{DeployConfig, PrivateKey};
use std::fmt;
use std::time::Duration;

/// Timeout for the quick read-only calls made by `doctor`.
const PROBE_TIMEOUT: Duration = Duration::from_secs(30);

/// Fly.io operations client, parameterized over the executor for testability.
pub struct FlyClient<E: FlyctlExecutor = RealExecutor> {
    executor: E,
}

impl FlyClient<RealExecutor> {
    pub fn new(program: &str) -> Self {
        Self {
            executor: RealExecutor::new(program),
        }
    }
}

impl Default for FlyClient<RealExecutor> {
    fn default() -> Self {
        Self {
            executor: RealExecutor::default(),
        }
    }
}

impl<E: FlyctlExecutor> FlyClient<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }

    // ── Doctor ──

    /// Run the platform checks without early return.
    pub async fn doctor(&self) -> DoctorReport {
        let mut report = DoctorReport::default();

        match self.executor.exec(&args(["version"]), PROBE_TIMEOUT).await {
            Ok(v) => {
                // "flyctl v0.3.45 linux/amd64 Commit: ..." → "v0.3.45"
                let version = v
                    .split_whitespace()
                    .find(|w| w.starts_with('v'))
                    .unwrap_or(v.trim());
                report.flyctl = CheckResult::ok(version);
            }
            Err(e) => report.flyctl = CheckResult::fail(&e.to_string()),
        }

        match self
            .executor
            .exec(&args(["auth", "whoami"]), PROBE_TIMEOUT)
            .await
        {
            Ok(a) if !a.trim().is_empty() => report.account = CheckResult::ok(a.trim()),
            _ => report.account = CheckResult::fail("not logged in — run: flyctl auth login"),
        }

        report
    }

    // ── Secrets ──

    /// Set (or overwrite) a named secret on the app.
    ///
    /// The value travels on stdin via `flyctl secrets import`, so it never
    /// shows up in argv, the process list, or the command trace.
    pub async fn set_secret(
        &self,
        name: &str,
        key: &PrivateKey,
        app: Option<&str>,
        stage: bool,
        timeout: Duration,
    ) -> Result<(), SecretError> {
        let mut cmd = args(["secrets", "import"]);
        push_app(&mut cmd, app);
        if stage {
            cmd.push("--stage".to_owned());
        }

        let line = import_line(name, key.expose());
        self.executor
            .exec_with_stdin(&cmd, line.as_bytes(), timeout)
            .await
            .map_err(|e| SecretError::Import {
                name: name.to_owned(),
                source: redact_error(e, key),
            })?;

        tracing::info!(secret = %name, "secret set");
        Ok(())
    }

    // ── Deploy ──

    /// Deploy the current directory, building the image on Fly's remote builder.
    pub async fn deploy(&self, config: &DeployConfig, timeout: Duration) -> Result<(), DeployError> {
        self.executor
            .exec_streaming(&deploy_args(config), timeout)
            .await
            .map_err(|e| DeployError::Deploy { source: e })
    }
}

// ── Helper ──

fn args<const N: usize>(a: [&str; N]) -> Vec<String> {
    a.iter().map(|s| (*s).to_owned()).collect()
}

fn push_app(cmd: &mut Vec<String>, app: Option<&str>) {
    if let Some(app) = app {
        cmd.push("--app".to_owned());
        cmd.push(app.to_owned());
    }
}

/// Build the `flyctl deploy` argument list.
pub fn deploy_args(config: &DeployConfig) -> Vec<String> {
    let mut cmd = args(["deploy", "--remote-only"]);
    push_app(&mut cmd, config.app.as_deref());
    if let Some(path) = &config.config {
        cmd.push("--config".to_owned());
        cmd.push(path.display().to_string());
    }
    cmd.extend(config.extra_args.iter().cloned());
    cmd
}

/// One `NAME=VALUE` line in the format `flyctl secrets import` reads.
fn import_line(name: &str, value: &str) -> String {
    if value.contains('\n') {
        format!("{name}=\"\"\"{value}\"\"\"\n")
    } else {
        format!("{name}={value}\n")
    }
}

/// Scrub the secret from anything flyctl echoed back.
fn redact_error(err: FlyctlError, key: &PrivateKey) -> FlyctlError {
    match err {
        FlyctlError::CommandFailed {
            args,
            status,
            code,
            stderr,
        } => FlyctlError::CommandFailed {
            args,
            status,
            code,
            stderr: key.redact(&stderr),
        },
        other => other,
    }
}

// ── Doctor types ──

#[derive(Debug, Default)]
pub struct DoctorReport {
    pub flyctl: CheckResult,
    pub account: CheckResult,
    pub config_file: CheckResult,
    pub dockerfile: CheckResult,
    /// Informational only: a missing key file is a normal skip.
    pub key_file: CheckResult,
}

impl DoctorReport {
    pub fn all_passed(&self) -> bool {
        self.flyctl.passed && self.account.passed && self.config_file.passed && self.dockerfile.passed
    }
}

impl fmt::Display for DoctorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = [
            ("flyctl", &self.flyctl),
            ("Account", &self.account),
            ("liftoff.toml", &self.config_file),
            ("Dockerfile", &self.dockerfile),
            ("Key file", &self.key_file),
        ];
        for (label, check) in rows {
            writeln!(f, "  [{}] {label:<14}{}", check.icon(), check.detail)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct CheckResult {
    pub passed: bool,
    pub detail: String,
}

impl CheckResult {
    pub fn ok(detail: &str) -> Self {
        Self {
            passed: true,
            detail: detail.to_owned(),
        }
    }

    pub fn fail(detail: &str) -> Self {
        Self {
            passed: false,
            detail: detail.to_owned(),
        }
    }

    pub fn icon(&self) -> &'static str {
        if self.passed { "OK" } else { "NG" }
    }
}

// ── Error types ──

#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error("failed to set secret {name}")]
    Import { name: String, source: FlyctlError },
}

#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("fly deploy failed")]
    Deploy { source: FlyctlError },
}

impl DeployError {
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Deploy { source } => source.exit_code(),
        }
    }
}
