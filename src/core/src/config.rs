//! Declarative build files.
//!
//! A build file describes a Dockerfile either as explicit stages or as a
//! preset, optionally with a `.dockerignore`:
//!
//! ```yaml
//! stages:
//!   - from: { image: "rust:1.75", alias: builder }
//!     steps:
//!       - { kind: workdir, path: /src }
//!       - { kind: run, command: cargo build --release }
//!   - from: { image: "debian:bookworm-slim" }
//!     steps:
//!       - { kind: copy, src: /src/target/release/app, dst: /usr/local/bin/app, from_stage: builder }
//!       - { kind: entrypoint, args: [app] }
//! dockerignore:
//!   allow_patterns: [src/, Cargo.toml, Cargo.lock]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::directive::{Directive, FromImage};
use crate::dockerfile::{Dockerfile, DockerfileBuilder};
use crate::dockerignore::DockerignoreConfig;
use crate::error::{DockgenError, Result};
use crate::presets::{sls_dockerfile, SlsConfig};

/// One stage of a build file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageConfig {
    pub from: FromImage,
    #[serde(default)]
    pub steps: Vec<Directive>,
}

/// Build file contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildFile {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stages: Vec<StageConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sls: Option<SlsConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dockerignore: Option<DockerignoreConfig>,
}

/// Build file encodings, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildFileFormat {
    Yaml,
    Json,
}

impl BuildFileFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            other => Err(DockgenError::ConfigError(format!(
                "Unsupported build file extension {:?} for {} (expected .yaml, .yml or .json)",
                other.unwrap_or(""),
                path.display()
            ))),
        }
    }
}

impl BuildFile {
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a build file, picking the decoder from the file extension.
    pub fn from_file(path: &Path) -> Result<Self> {
        let format = BuildFileFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), ?format, "Loading build file");
        match format {
            BuildFileFormat::Yaml => Self::from_yaml_str(&content),
            BuildFileFormat::Json => Self::from_json_str(&content),
        }
    }

    /// Assemble the described Dockerfile.
    ///
    /// `stages` and `sls` are mutually exclusive. With neither, finalize
    /// reports the missing stage.
    pub fn to_dockerfile(&self) -> Result<Dockerfile> {
        if let Some(sls) = &self.sls {
            if !self.stages.is_empty() {
                tracing::warn!(
                    stages = self.stages.len(),
                    "Build file declares both stages and an SLS preset"
                );
                return Err(DockgenError::ConfigError(
                    "Build file must declare either `stages` or `sls`, not both".to_string(),
                ));
            }
            return sls_dockerfile(sls);
        }

        self.stages
            .iter()
            .fold(DockerfileBuilder::new(), |builder, stage| {
                stage
                    .steps
                    .iter()
                    .cloned()
                    .fold(builder.stage(stage.from.clone()), |b, step| b.directive(step))
            })
            .build()
    }

    /// Rendered `.dockerignore`, if the build file declares one.
    pub fn render_dockerignore(&self) -> Option<String> {
        self.dockerignore.as_ref().map(DockerignoreConfig::render)
    }
}
