use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum FlyctlError {
    #[error("`{program}` could not be started — install flyctl: https://fly.io/docs/flyctl/install/")]
    NotFound {
        program: String,
        source: std::io::Error,
    },

    #[error("flyctl command failed: {args:?} ({status}){}", stderr_suffix(stderr))]
    CommandFailed {
        args: Vec<String>,
        status: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("flyctl command timed out after {}s: {args:?}", timeout.as_secs())]
    TimedOut { args: Vec<String>, timeout: Duration },

    #[error("flyctl output was not valid UTF-8")]
    InvalidUtf8 { source: std::string::FromUtf8Error },

    #[error("failed to write to flyctl stdin")]
    StdinWrite { source: std::io::Error },

    #[error("failed to wait for flyctl")]
    Wait { source: std::io::Error },
}

impl FlyctlError {
    /// Exit code reported by the process, when it exited on its own.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::CommandFailed { code, .. } => *code,
            _ => None,
        }
    }
}

fn stderr_suffix(stderr: &str) -> String {
    let stderr = stderr.trim_end();
    if stderr.is_empty() {
        String::new()
    } else {
        format!("\n{stderr}")
    }
}
