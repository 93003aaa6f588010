use liftoff_core::ImageConfig;

/// Directory the binary is installed into inside the image.
const INSTALL_DIR: &str = "/usr/local/bin";

/// Generates a single-stage runtime Dockerfile around a precompiled binary.
pub struct DockerfileGenerator<'a> {
    config: &'a ImageConfig,
    binary: &'a str,
}

impl<'a> DockerfileGenerator<'a> {
    pub fn new(config: &'a ImageConfig, binary: &'a str) -> Self {
        Self { config, binary }
    }

    /// Absolute path of the entrypoint inside the image.
    pub fn entrypoint(&self) -> String {
        format!("{INSTALL_DIR}/{}", self.binary)
    }

    /// Location of the binary in the build context.
    pub fn binary_source(&self) -> String {
        self.config
            .binary_path
            .clone()
            .unwrap_or_else(|| format!("target/release/{}", self.binary))
    }

    pub fn render(&self) -> String {
        let mut out = format!("FROM {}\n", self.config.runtime_image);

        if !self.config.extra_packages.is_empty() {
            out.push_str(&format!(
                "RUN apt-get update && apt-get install -y --no-install-recommends {} && rm -rf /var/lib/apt/lists/*\n",
                self.config.extra_packages.join(" ")
            ));
        }

        out.push_str("WORKDIR /app\n");

        for (key, value) in &self.config.env {
            out.push_str(&format!("ENV {key}=\"{}\"\n", quote_env_value(value)));
        }

        out.push_str(&format!(
            "COPY {src} {dest}\n",
            src = self.binary_source(),
            dest = self.entrypoint(),
        ));

        for path in &self.config.include {
            let path = path.trim_start_matches("./");
            out.push_str(&format!("COPY {path} ./{path}\n"));
        }

        if let Some(port) = self.config.port {
            out.push_str(&format!("EXPOSE {port}\n"));
        }

        out.push_str(&format!("ENTRYPOINT [\"{}\"]\n", self.entrypoint()));
        out
    }
}

/// Escape a value for a double-quoted `ENV` instruction.
fn quote_env_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '"' | '$') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
