pub mod client;
pub mod executor;
pub mod flyctl;
pub mod release;

pub use client::{CheckResult, DeployError, DoctorReport, FlyClient, SecretError};
pub use executor::{FlyctlExecutor, RealExecutor};
pub use flyctl::FlyctlError;
pub use release::{
    Provisioning, ProvisionError, ReleaseError, ReleasePlan, ReleaseReport, ReleaseState, release,
};
