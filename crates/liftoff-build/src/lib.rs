//! Image builder for liftoff.
//!
//! The service binary is compiled ahead of time; the image only has to carry
//! it and declare it as the entrypoint. The platform builds the image
//! remotely from the `Dockerfile` in the project directory.
//!
//! ```text
//! liftoff dockerfile
//!   1. Binary     ── [image].binary, else Cargo.toml package / first [[bin]]
//!   2. Render     ── DockerfileGenerator::render()
//!   3. Write      ── ./Dockerfile (refuses to overwrite without --force)
//! ```

pub mod dockerfile;
pub mod eject;

pub use dockerfile::DockerfileGenerator;
