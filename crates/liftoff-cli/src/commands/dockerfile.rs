use liftoff_build::DockerfileGenerator;
use liftoff_build::eject;
use liftoff_core::{LiftoffConfig, ProjectMeta};
use std::path::PathBuf;

pub fn dockerfile(force: bool, stdout: bool) -> anyhow::Result<()> {
    let project_dir = PathBuf::from(".");
    let config = LiftoffConfig::load(&project_dir)?;

    let binary = match &config.image.binary {
        Some(name) => name.clone(),
        None => ProjectMeta::from_cargo_toml(&project_dir)?.binary_name,
    };

    let content = DockerfileGenerator::new(&config.image, &binary).render();

    if stdout {
        print!("{content}");
        return Ok(());
    }

    let path = eject::write_dockerfile(&project_dir, &content, force)?;
    println!("Wrote {} (entrypoint: {binary})", path.display());
    Ok(())
}
