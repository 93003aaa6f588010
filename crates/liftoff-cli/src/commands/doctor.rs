use liftoff_cloud::{CheckResult, FlyClient};
use liftoff_core::LiftoffConfig;
use liftoff_core::config::CONFIG_FILE;
use liftoff_core::key::DEFAULT_KEY_FILE;
use std::path::Path;

pub async fn doctor() -> anyhow::Result<()> {
    let project_dir = Path::new(".");
    let config = LiftoffConfig::load(project_dir);
    let loaded = config
        .as_ref()
        // arch-lint: allow(no-silent-result-drop) reason="a broken liftoff.toml is reported as a failed check below"
        .ok();

    let program = loaded.map_or("flyctl", |c| c.deploy.program.as_str());
    let mut report = FlyClient::new(program).doctor().await;

    report.config_file = match &config {
        Ok(_) if project_dir.join(CONFIG_FILE).exists() => CheckResult::ok("Found"),
        Ok(_) => CheckResult::fail("Not found"),
        Err(e) => CheckResult::fail(&e.to_string()),
    };

    report.dockerfile = if liftoff_build::eject::has_dockerfile(project_dir) {
        CheckResult::ok("Found")
    } else {
        CheckResult::fail("Not found — run: liftoff dockerfile")
    };

    let key_file = loaded.map_or_else(
        || project_dir.join(DEFAULT_KEY_FILE),
        |c| project_dir.join(&c.secret.key_file),
    );
    report.key_file = if key_file.is_file() {
        CheckResult::ok("Found — will be provisioned on release")
    } else {
        CheckResult::ok("Not found — release will skip secret provisioning")
    };

    println!();
    println!("{report}");

    if !report.all_passed() {
        anyhow::bail!("some checks failed — see above for details");
    }

    Ok(())
}
