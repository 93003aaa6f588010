use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load config from {path}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid secret name {name:?}: use upper-case letters, digits and underscores")]
    InvalidSecretName { name: String },

    #[error("invalid [image.env] key {key:?}: use letters, digits and underscores")]
    InvalidEnvKey { key: String },

    #[error("invalid include path {path:?}: {reason}")]
    InvalidIncludePath { path: String, reason: &'static str },

    #[error("timeout `{field}` must be greater than zero")]
    ZeroTimeout { field: &'static str },

    // ── Cargo.toml ──
    #[error("failed to read {path}")]
    CargoTomlRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}")]
    CargoTomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("no [package].name in {0} — set [image].binary in liftoff.toml")]
    MissingPackageName(PathBuf),
}
