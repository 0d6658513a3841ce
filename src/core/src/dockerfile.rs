//! Dockerfile assembly.
//!
//! [`DockerfileBuilder`] accumulates directives into stages; every `FROM`
//! starts a new stage and flushes the previous one. [`DockerfileBuilder::build`]
//! consumes the builder and returns an immutable [`Dockerfile`].
//!
//! Append calls never fail. The only check happens in `build`: at least one
//! stage must have been started.
//!
//! # Example
//!
//! ```
//! use dockgen_core::DockerfileBuilder;
//!
//! let dockerfile = DockerfileBuilder::new()
//!     .from_image_as("rust:1.75", "builder")
//!     .run("cargo build --release")
//!     .from_image("debian:bookworm-slim")
//!     .copy_from("builder", "/target/release/app", "/usr/local/bin/app")
//!     .entrypoint(["app"])
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(dockerfile.stages().len(), 2);
//! ```

use std::fmt;

use crate::directive::{
    Add, Arg, Cmd, Comment, CopyFiles, Directive, Entrypoint, Env, Expose, FromImage, HealthCheck,
    Label, Run, Shell, User, Volume, Workdir,
};
use crate::error::{DockgenError, Result};
use crate::labels::Labels;
use crate::stage::Stage;

/// An immutable, fully assembled Dockerfile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dockerfile {
    stages: Vec<Stage>,
}

impl Dockerfile {
    pub fn builder() -> DockerfileBuilder {
        DockerfileBuilder::new()
    }

    /// All stages in build order. Never empty.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn stage(&self, index: usize) -> Option<&Stage> {
        self.stages.get(index)
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Always `false`: `build` rejects documents without a stage.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// First stage whose `FROM` declares `AS <alias>`.
    pub fn stage_by_alias(&self, alias: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.alias() == Some(alias))
    }

    /// Render the full Dockerfile.
    ///
    /// Stages are separated by one blank line and the output always ends
    /// with a newline.
    pub fn render(&self) -> String {
        let rendered: Vec<String> = self.stages.iter().map(Stage::render).collect();
        let mut out = rendered.join("\n\n");
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Dockerfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Fluent builder for multi-stage Dockerfiles.
///
/// Methods take and return the builder by value, so a session is owned by
/// one caller from `new()` to `build()`.
#[derive(Debug, Default)]
pub struct DockerfileBuilder {
    stages: Vec<Stage>,
    current_from: Option<FromImage>,
    current: Vec<Directive>,
}

impl DockerfileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the in-progress stage, if it has a `FROM`, to the completed list.
    fn flush_stage(&mut self) {
        if let Some(from) = self.current_from.take() {
            let directives = std::mem::take(&mut self.current);
            tracing::debug!(
                stage = self.stages.len(),
                image = %from.image,
                instructions = directives.len(),
                "Flushed build stage"
            );
            self.stages.push(Stage::new(from, directives));
        }
    }

    fn start_stage(&mut self, from: FromImage) {
        self.flush_stage();
        if self.stages.is_empty() && !self.current.is_empty() {
            tracing::warn!(
                count = self.current.len(),
                image = %from.image,
                "Directives added before the first FROM are placed in the first stage"
            );
        }
        self.current_from = Some(from);
    }

    fn push(mut self, directive: impl Into<Directive>) -> Self {
        self.current.push(directive.into());
        self
    }

    /// Start a new stage from `image`.
    pub fn from_image(self, image: impl Into<String>) -> Self {
        self.stage(FromImage::new(image))
    }

    /// Start a new named stage (`FROM <image> AS <alias>`).
    pub fn from_image_as(self, image: impl Into<String>, alias: impl Into<String>) -> Self {
        self.stage(FromImage::new(image).alias(alias))
    }

    /// Start a new stage from a fully specified `FROM` (alias, platform).
    pub fn stage(mut self, from: FromImage) -> Self {
        self.start_stage(from);
        self
    }

    pub fn run(self, command: impl Into<String>) -> Self {
        self.push(Run::new(command))
    }

    pub fn copy(self, src: impl Into<String>, dst: impl Into<String>) -> Self {
        self.push(CopyFiles::new(src, dst))
    }

    /// `COPY --from=<stage> <src> <dst>`
    pub fn copy_from(
        self,
        stage: impl Into<String>,
        src: impl Into<String>,
        dst: impl Into<String>,
    ) -> Self {
        self.push(CopyFiles::new(src, dst).from_stage(stage))
    }

    pub fn add(self, src: impl Into<String>, dst: impl Into<String>) -> Self {
        self.push(Add::new(src, dst))
    }

    pub fn workdir(self, path: impl Into<String>) -> Self {
        self.push(Workdir::new(path))
    }

    pub fn user(self, user: impl Into<String>) -> Self {
        self.push(User::new(user))
    }

    pub fn user_group(self, user: impl Into<String>, group: impl Into<String>) -> Self {
        self.push(User::new(user).group(group))
    }

    pub fn expose(self, port: i32) -> Self {
        self.push(Expose::new(port))
    }

    pub fn expose_protocol(self, port: i32, protocol: impl Into<String>) -> Self {
        self.push(Expose::new(port).protocol(protocol))
    }

    pub fn entrypoint<I, S>(self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(Entrypoint::new(args))
    }

    pub fn cmd<I, S>(self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(Cmd::new(args))
    }

    pub fn arg(self, name: impl Into<String>) -> Self {
        self.push(Arg::new(name))
    }

    pub fn arg_default(self, name: impl Into<String>, default: impl Into<String>) -> Self {
        self.push(Arg::new(name).default_value(default))
    }

    pub fn env(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(Env::new(key, value))
    }

    /// `LABEL` with the given pairs, rendered in iteration order.
    pub fn label<I, K, V>(self, labels: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.push(Label::new(labels.into_iter().collect::<Labels>()))
    }

    pub fn volume<I, S>(self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(Volume::new(paths))
    }

    pub fn shell<I, S>(self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(Shell::new(args))
    }

    /// `HEALTHCHECK` with default timings.
    pub fn healthcheck(self, command: impl Into<String>) -> Self {
        self.push(HealthCheck::new(command))
    }

    pub fn healthcheck_with(self, check: HealthCheck) -> Self {
        self.push(check)
    }

    pub fn healthcheck_none(self) -> Self {
        self.push(Directive::HealthCheckNone)
    }

    pub fn comment(self, text: impl Into<String>) -> Self {
        self.push(Comment::new(text))
    }

    pub fn blank(self) -> Self {
        self.push(Directive::Blank)
    }

    /// Add a pre-built directive. A `FROM` directive starts a new stage,
    /// exactly like [`stage`](Self::stage).
    pub fn directive(mut self, directive: impl Into<Directive>) -> Self {
        match directive.into() {
            Directive::From(from) => {
                self.start_stage(from);
                self
            }
            other => self.push(other),
        }
    }

    /// Finalize the Dockerfile.
    ///
    /// Fails with [`DockgenError::InvalidState`] if no stage was ever started.
    pub fn build(mut self) -> Result<Dockerfile> {
        self.flush_stage();
        if self.stages.is_empty() {
            return Err(DockgenError::InvalidState(
                "Dockerfile must have at least one FROM stage".to_string(),
            ));
        }
        tracing::debug!(stages = self.stages.len(), "Built Dockerfile");
        Ok(Dockerfile {
            stages: self.stages,
        })
    }
}
