use liftoff_core::{Error, FailurePolicy, LiftoffConfig};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn load_returns_defaults_when_no_config_file() {
    let tmp = TempDir::new().unwrap();
    let config = LiftoffConfig::load(tmp.path()).unwrap();

    assert_eq!(config.secret.key_file, PathBuf::from("private_key"));
    assert_eq!(config.secret.name, "AGE_PRIVATE_KEY");
    assert_eq!(config.secret.on_failure, FailurePolicy::Continue);
    assert!(!config.secret.stage);
    assert_eq!(config.deploy.program, "flyctl");
    assert!(config.deploy.app.is_none());
    assert!(config.deploy.config.is_none());
    assert!(config.deploy.extra_args.is_empty());
    assert_eq!(config.timeouts.secret(), Duration::from_secs(120));
    assert_eq!(config.timeouts.deploy(), Duration::from_secs(1800));
    assert_eq!(config.image.runtime_image, "debian:bookworm-slim");
    assert!(config.image.binary.is_none());
    assert!(config.image.include.is_empty());
    assert!(config.image.port.is_none());
}

#[test]
fn load_parses_full_config() {
    let tmp = TempDir::new().unwrap();
    let toml = r#"
[secret]
key_file = "keys/age.txt"
name = "SERVICE_KEY"
on_failure = "abort"
stage = true

[deploy]
program = "/opt/fly/bin/flyctl"
app = "warehouse-bot"
config = "deploy/fly.toml"
extra_args = ["--strategy", "immediate"]

[timeouts]
secret_secs = 30
deploy_secs = 600

[image]
runtime_image = "gcr.io/distroless/cc-debian12"
binary = "warehouse"
binary_path = "dist/warehouse"
extra_packages = ["ca-certificates"]
include = ["config.toml.enc", "credentials.json.enc"]
port = 8080

[image.env]
RUST_LOG = "info"
"#;
    std::fs::write(tmp.path().join("liftoff.toml"), toml).unwrap();

    let config = LiftoffConfig::load(tmp.path()).unwrap();

    assert_eq!(config.secret.key_file, PathBuf::from("keys/age.txt"));
    assert_eq!(config.secret.name, "SERVICE_KEY");
    assert_eq!(config.secret.on_failure, FailurePolicy::Abort);
    assert!(config.secret.stage);
    assert_eq!(config.deploy.program, "/opt/fly/bin/flyctl");
    assert_eq!(config.deploy.app.as_deref(), Some("warehouse-bot"));
    assert_eq!(config.deploy.config, Some(PathBuf::from("deploy/fly.toml")));
    assert_eq!(config.deploy.extra_args, vec!["--strategy", "immediate"]);
    assert_eq!(config.timeouts.secret(), Duration::from_secs(30));
    assert_eq!(config.timeouts.deploy(), Duration::from_secs(600));
    assert_eq!(config.image.runtime_image, "gcr.io/distroless/cc-debian12");
    assert_eq!(config.image.binary.as_deref(), Some("warehouse"));
    assert_eq!(config.image.binary_path.as_deref(), Some("dist/warehouse"));
    assert_eq!(config.image.extra_packages, vec!["ca-certificates"]);
    assert_eq!(
        config.image.include,
        vec!["config.toml.enc", "credentials.json.enc"]
    );
    assert_eq!(config.image.port, Some(8080));
    assert_eq!(config.image.env["RUST_LOG"], "info");
}

#[test]
fn load_partial_config_fills_defaults() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("liftoff.toml"),
        "[deploy]\napp = \"partial\"\n",
    )
    .unwrap();

    let config = LiftoffConfig::load(tmp.path()).unwrap();

    assert_eq!(config.deploy.app.as_deref(), Some("partial"));
    // Defaults preserved
    assert_eq!(config.deploy.program, "flyctl");
    assert_eq!(config.secret.name, "AGE_PRIVATE_KEY");
    assert_eq!(config.secret.on_failure, FailurePolicy::Continue);
}

#[test]
fn load_empty_config_returns_defaults() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("liftoff.toml"), "").unwrap();

    let config = LiftoffConfig::load(tmp.path()).unwrap();
    assert_eq!(config.secret.key_file, PathBuf::from("private_key"));
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("liftoff.toml"), "not valid {{{{ toml").unwrap();

    let err = LiftoffConfig::load(tmp.path()).unwrap_err();
    assert!(matches!(err, Error::ConfigParse { .. }));
    assert!(err.to_string().contains("parse"));
}

#[test]
fn load_rejects_unknown_failure_policy() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("liftoff.toml"),
        "[secret]\non_failure = \"retry\"\n",
    )
    .unwrap();

    let err = LiftoffConfig::load(tmp.path()).unwrap_err();
    assert!(matches!(err, Error::ConfigParse { .. }));
}

#[test]
fn load_rejects_lowercase_secret_name() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("liftoff.toml"),
        "[secret]\nname = \"age_private_key\"\n",
    )
    .unwrap();

    let err = LiftoffConfig::load(tmp.path()).unwrap_err();
    assert!(matches!(err, Error::InvalidSecretName { ref name } if name == "age_private_key"));
}

#[test]
fn load_rejects_zero_timeout() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("liftoff.toml"),
        "[timeouts]\ndeploy_secs = 0\n",
    )
    .unwrap();

    let err = LiftoffConfig::load(tmp.path()).unwrap_err();
    assert!(matches!(
        err,
        Error::ZeroTimeout {
            field: "deploy_secs"
        }
    ));
}

#[test]
fn load_rejects_include_outside_project() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("liftoff.toml"),
        "[image]\ninclude = [\"../private_key\"]\n",
    )
    .unwrap();

    let err = LiftoffConfig::load(tmp.path()).unwrap_err();
    assert!(matches!(err, Error::InvalidIncludePath { .. }));
}

#[test]
fn load_rejects_env_key_with_space() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("liftoff.toml"),
        "[image.env]\n\"APP MODE\" = \"prod\"\n",
    )
    .unwrap();

    let err = LiftoffConfig::load(tmp.path()).unwrap_err();
    assert!(matches!(err, Error::InvalidEnvKey { ref key } if key == "APP MODE"));
}
