use std::path::{Path, PathBuf};

/// File name the platform's remote builder picks up by default.
pub const DOCKERFILE: &str = "Dockerfile";

/// Write the rendered Dockerfile into the project directory.
///
/// An existing file is left untouched unless `force` is set.
pub fn write_dockerfile(
    project_dir: &Path,
    content: &str,
    force: bool,
) -> Result<PathBuf, EjectError> {
    let path = project_dir.join(DOCKERFILE);
    if path.exists() && !force {
        return Err(EjectError::AlreadyExists(path));
    }

    std::fs::write(&path, content).map_err(|e| EjectError::Write {
        path: path.clone(),
        source: e,
    })?;

    tracing::info!(path = %path.display(), "dockerfile written");
    Ok(path)
}

/// Check if the project already has a Dockerfile.
pub fn has_dockerfile(project_dir: &Path) -> bool {
    project_dir.join(DOCKERFILE).is_file()
}

#[derive(Debug, thiserror::Error)]
pub enum EjectError {
    #[error("{0} already exists — pass --force to overwrite")]
    AlreadyExists(PathBuf),
    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
