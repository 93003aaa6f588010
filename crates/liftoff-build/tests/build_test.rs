use std::collections::BTreeMap;

use liftoff_build::dockerfile::DockerfileGenerator;
use liftoff_build::eject::{EjectError, has_dockerfile, write_dockerfile};
use liftoff_core::ImageConfig;
use tempfile::TempDir;

// ── Dockerfile Tests ──

#[test]
fn dockerfile_declares_binary_as_entrypoint() {
    let config = ImageConfig::default();
    let output = DockerfileGenerator::new(&config, "warehouse").render();

    assert!(output.starts_with("FROM debian:bookworm-slim\n"));
    assert!(output.contains("COPY target/release/warehouse /usr/local/bin/warehouse\n"));
    assert!(output.ends_with("ENTRYPOINT [\"/usr/local/bin/warehouse\"]\n"));
}

#[test]
fn dockerfile_uses_custom_binary_path() {
    let config = ImageConfig {
        binary_path: Some("dist/x86_64/warehouse".to_owned()),
        ..Default::default()
    };
    let output = DockerfileGenerator::new(&config, "warehouse").render();

    assert!(output.contains("COPY dist/x86_64/warehouse /usr/local/bin/warehouse\n"));
}

#[test]
fn dockerfile_includes_extra_packages() {
    let config = ImageConfig {
        extra_packages: vec!["ca-certificates".to_owned(), "libssl3".to_owned()],
        ..Default::default()
    };
    let output = DockerfileGenerator::new(&config, "svc").render();

    assert!(output.contains("apt-get install -y --no-install-recommends ca-certificates libssl3"));
}

#[test]
fn dockerfile_without_packages_has_no_apt() {
    let config = ImageConfig::default();
    let output = DockerfileGenerator::new(&config, "svc").render();

    assert!(!output.contains("apt-get"));
}

#[test]
fn dockerfile_copies_included_files() {
    let config = ImageConfig {
        include: vec![
            "config.toml.enc".to_owned(),
            "./credentials.json.enc".to_owned(),
        ],
        ..Default::default()
    };
    let output = DockerfileGenerator::new(&config, "svc").render();

    assert!(output.contains("COPY config.toml.enc ./config.toml.enc\n"));
    assert!(output.contains("COPY credentials.json.enc ./credentials.json.enc\n"));
}

#[test]
fn dockerfile_env_is_sorted() {
    let mut env = BTreeMap::new();
    env.insert("RUST_LOG".to_owned(), "info".to_owned());
    env.insert("APP_MODE".to_owned(), "prod".to_owned());
    let config = ImageConfig {
        env,
        ..Default::default()
    };
    let output = DockerfileGenerator::new(&config, "svc").render();

    let app = output.find("ENV APP_MODE=\"prod\"").unwrap();
    let log = output.find("ENV RUST_LOG=\"info\"").unwrap();
    assert!(app < log);
}

fn render_env(key: &str, value: &str) -> String {
    let mut env = BTreeMap::new();
    env.insert(key.to_owned(), value.to_owned());
    let config = ImageConfig {
        env,
        ..Default::default()
    };
    DockerfileGenerator::new(&config, "svc").render()
}

#[test]
fn dockerfile_env_value_with_space_stays_one_pair() {
    let output = render_env("GREETING", "hello world");

    assert!(output.contains("ENV GREETING=\"hello world\"\n"));
}

#[test]
fn dockerfile_env_value_quotes_are_escaped() {
    let output = render_env("MOTD", r#"say "hi""#);

    assert!(output.contains(r#"ENV MOTD="say \"hi\"""#));
}

#[test]
fn dockerfile_env_value_backslash_and_dollar_are_literal() {
    let output = render_env("PATTERN", r"C:\dir $HOME");

    assert!(output.contains(r#"ENV PATTERN="C:\\dir \$HOME""#));
}

#[test]
fn dockerfile_exposes_port_only_when_set() {
    let mut config = ImageConfig::default();
    let output = DockerfileGenerator::new(&config, "svc").render();
    assert!(!output.contains("EXPOSE"));

    config.port = Some(8080);
    let output = DockerfileGenerator::new(&config, "svc").render();
    assert!(output.contains("EXPOSE 8080\n"));
}

#[test]
fn dockerfile_entrypoint_is_last_line() {
    let config = ImageConfig {
        port: Some(3000),
        include: vec!["assets".to_owned()],
        ..Default::default()
    };
    let output = DockerfileGenerator::new(&config, "svc").render();

    assert_eq!(
        output.lines().last(),
        Some("ENTRYPOINT [\"/usr/local/bin/svc\"]")
    );
}

// ── Write Tests ──

#[test]
fn write_creates_dockerfile() {
    let tmp = TempDir::new().unwrap();
    assert!(!has_dockerfile(tmp.path()));

    let path = write_dockerfile(tmp.path(), "FROM scratch\n", false).unwrap();

    assert_eq!(path, tmp.path().join("Dockerfile"));
    assert!(has_dockerfile(tmp.path()));
    assert_eq!(std::fs::read_to_string(path).unwrap(), "FROM scratch\n");
}

#[test]
fn write_refuses_to_overwrite() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("Dockerfile"), "FROM hand-written\n").unwrap();

    let err = write_dockerfile(tmp.path(), "FROM scratch\n", false).unwrap_err();

    assert!(matches!(err, EjectError::AlreadyExists(_)));
    let content = std::fs::read_to_string(tmp.path().join("Dockerfile")).unwrap();
    assert_eq!(content, "FROM hand-written\n");
}

#[test]
fn write_force_overwrites() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("Dockerfile"), "FROM old\n").unwrap();

    write_dockerfile(tmp.path(), "FROM new\n", true).unwrap();

    let content = std::fs::read_to_string(tmp.path().join("Dockerfile")).unwrap();
    assert_eq!(content, "FROM new\n");
}
