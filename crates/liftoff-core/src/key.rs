//! The private key file provisioned as a platform secret.
//!
//! The key never leaves this module in a loggable form: [`PrivateKey`] wraps
//! a [`SecretString`], its `Debug` output is redacted, and the buffer is
//! zeroized on drop. The only way to the plaintext is [`PrivateKey::expose`].

use std::fmt;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};

/// Key file looked up in the working directory when none is configured.
pub const DEFAULT_KEY_FILE: &str = "private_key";

/// Secret name the deployed service reads its decryption key from.
pub const DEFAULT_SECRET_NAME: &str = "AGE_PRIVATE_KEY";

/// Placeholder substituted for secret values in diagnostics.
pub const REDACTED: &str = "[REDACTED]";

/// An optional key file on the local filesystem.
#[derive(Debug, Clone)]
pub struct KeyFile {
    path: PathBuf,
}

impl KeyFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True only for a regular file (directories and dangling links do not count).
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read the whole file and trim surrounding whitespace.
    pub fn read(&self) -> Result<PrivateKey, KeyFileError> {
        let contents = std::fs::read_to_string(&self.path).map_err(|e| KeyFileError::Read {
            path: self.path.clone(),
            source: e,
        })?;

        PrivateKey::from_contents(contents).ok_or_else(|| KeyFileError::Empty {
            path: self.path.clone(),
        })
    }
}

/// Trimmed key material.
pub struct PrivateKey(SecretString);

impl PrivateKey {
    /// Returns `None` when nothing but whitespace remains after trimming.
    pub fn from_contents(contents: String) -> Option<Self> {
        let raw = SecretString::from(contents);
        let trimmed = raw.expose_secret().trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(SecretString::from(trimmed.to_owned())))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Replace every occurrence of the key in `text` with [`REDACTED`].
    pub fn redact(&self, text: &str) -> String {
        text.replace(self.expose(), REDACTED)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PrivateKey").field(&REDACTED).finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum KeyFileError {
    #[error("failed to read key file {path}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("key file {path} is empty")]
    Empty { path: PathBuf },
}
