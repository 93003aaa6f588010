//! Core types and configuration for liftoff.
//!
//! This crate defines the `liftoff.toml` schema ([`LiftoffConfig`]), the
//! private key file read before every release ([`KeyFile`]), Cargo package
//! metadata used by the image builder ([`ProjectMeta`]), and shared error types.

pub mod config;
pub mod error;
pub mod key;
pub mod project;

pub use config::{
    DeployConfig, FailurePolicy, ImageConfig, LiftoffConfig, SecretConfig, TimeoutConfig,
};
pub use error::{Error, Result};
pub use key::{KeyFile, KeyFileError, PrivateKey, REDACTED};
pub use project::ProjectMeta;
