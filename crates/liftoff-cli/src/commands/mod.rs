mod dockerfile;
mod doctor;
mod release;

pub use dockerfile::dockerfile;
pub use doctor::doctor;
pub use release::{ReleaseOptions, release};
