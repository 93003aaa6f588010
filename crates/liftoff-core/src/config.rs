use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::key::{DEFAULT_KEY_FILE, DEFAULT_SECRET_NAME};

/// Name of the configuration file looked up in the project directory.
pub const CONFIG_FILE: &str = "liftoff.toml";

/// liftoff.toml configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LiftoffConfig {
    #[serde(default)]
    pub secret: SecretConfig,
    #[serde(default)]
    pub deploy: DeployConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(default)]
    pub image: ImageConfig,
}

/// What to do when the secret-set call fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log the failure and deploy anyway.
    #[default]
    Continue,
    /// Stop the release before deploying.
    Abort,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretConfig {
    /// Key file, relative to the project directory
    #[serde(default = "default_key_file")]
    pub key_file: PathBuf,
    /// Secret name on the platform
    #[serde(default = "default_secret_name")]
    pub name: String,
    /// Behavior when provisioning fails
    #[serde(default)]
    pub on_failure: FailurePolicy,
    /// Set the secret without restarting running machines
    #[serde(default)]
    pub stage: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Platform CLI executable
    #[serde(default = "default_program")]
    pub program: String,
    /// Target app (defaults to the one in fly.toml)
    pub app: Option<String>,
    /// Path to an alternative fly.toml
    pub config: Option<PathBuf>,
    /// Additional arguments appended to `deploy`
    #[serde(default)]
    pub extra_args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    #[serde(default = "default_secret_secs")]
    pub secret_secs: u64,
    #[serde(default = "default_deploy_secs")]
    pub deploy_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Runtime base image
    #[serde(default = "default_runtime_image")]
    pub runtime_image: String,
    /// Binary name (defaults to Cargo.toml package name)
    pub binary: Option<String>,
    /// Path of the precompiled binary (defaults to target/release/<binary>)
    pub binary_path: Option<String>,
    /// Additional system packages to install via apt-get
    #[serde(default)]
    pub extra_packages: Vec<String>,
    /// Files copied next to the binary in the runtime image
    #[serde(default)]
    pub include: Vec<String>,
    /// Static environment variables baked into the image
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    /// Port exposed by the service, if any
    pub port: Option<u16>,
}

impl Default for SecretConfig {
    fn default() -> Self {
        Self {
            key_file: default_key_file(),
            name: default_secret_name(),
            on_failure: FailurePolicy::default(),
            stage: false,
        }
    }
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            app: None,
            config: None,
            extra_args: Vec::new(),
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            secret_secs: default_secret_secs(),
            deploy_secs: default_deploy_secs(),
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            runtime_image: default_runtime_image(),
            binary: None,
            binary_path: None,
            extra_packages: Vec::new(),
            include: Vec::new(),
            env: BTreeMap::new(),
            port: None,
        }
    }
}

impl TimeoutConfig {
    pub fn secret(&self) -> Duration {
        Duration::from_secs(self.secret_secs)
    }

    pub fn deploy(&self) -> Duration {
        Duration::from_secs(self.deploy_secs)
    }
}

impl LiftoffConfig {
    /// Load from liftoff.toml in the given directory, or return defaults if not found.
    pub fn load(project_dir: &Path) -> crate::Result<Self> {
        let config_path = project_dir.join(CONFIG_FILE);
        let config: Self = if config_path.exists() {
            let content =
                std::fs::read_to_string(&config_path).map_err(|e| crate::Error::ConfigLoad {
                    path: config_path.clone(),
                    source: e,
                })?;
            toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
                path: config_path,
                source: e,
            })?
        } else {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> crate::Result<()> {
        if !is_valid_secret_name(&self.secret.name) {
            return Err(crate::Error::InvalidSecretName {
                name: self.secret.name.clone(),
            });
        }

        if self.timeouts.secret_secs == 0 {
            return Err(crate::Error::ZeroTimeout {
                field: "secret_secs",
            });
        }
        if self.timeouts.deploy_secs == 0 {
            return Err(crate::Error::ZeroTimeout {
                field: "deploy_secs",
            });
        }

        for key in self.image.env.keys() {
            if !is_valid_env_key(key) {
                return Err(crate::Error::InvalidEnvKey { key: key.clone() });
            }
        }

        for path in &self.image.include {
            validate_include_path(path)?;
        }

        Ok(())
    }
}

/// Secret names are environment variable names inside the deployed machine.
fn is_valid_secret_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_uppercase() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

fn is_valid_env_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn validate_include_path(path: &str) -> crate::Result<()> {
    let invalid = |reason| crate::Error::InvalidIncludePath {
        path: path.to_owned(),
        reason,
    };

    if path.trim().is_empty() {
        return Err(invalid("path is empty"));
    }

    let p = Path::new(path);
    if p.is_absolute() {
        return Err(invalid("must be relative to the project directory"));
    }
    if p.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(invalid("must not contain `..`"));
    }

    Ok(())
}

fn default_key_file() -> PathBuf {
    PathBuf::from(DEFAULT_KEY_FILE)
}

fn default_secret_name() -> String {
    DEFAULT_SECRET_NAME.to_owned()
}

fn default_program() -> String {
    "flyctl".to_owned()
}

fn default_secret_secs() -> u64 {
    120
}

fn default_deploy_secs() -> u64 {
    1800
}

fn default_runtime_image() -> String {
    "debian:bookworm-slim".to_owned()
}
