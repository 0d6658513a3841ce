//! dockgen Core - Typed Dockerfile Generation
//!
//! Builds multi-stage Dockerfiles from typed directives. Directives render
//! themselves, [`DockerfileBuilder`] groups them into stages, and the
//! finished [`Dockerfile`] renders to text as many times as needed.

pub mod config;
pub mod directive;
pub mod dockerfile;
pub mod dockerignore;
pub mod error;
pub mod labels;
pub mod presets;
pub mod stage;

// Re-export commonly used types
pub use config::{BuildFile, BuildFileFormat, StageConfig};
pub use directive::{
    Add, Arg, Cmd, Comment, CopyFiles, Directive, Entrypoint, Env, Expose, FromImage, HealthCheck,
    Label, Run, Shell, User, Volume, Workdir,
};
pub use dockerfile::{Dockerfile, DockerfileBuilder};
pub use dockerignore::{generate_dockerignore, DockerignoreConfig};
pub use error::{DockgenError, Result};
pub use labels::{Labels, OciLabels};
pub use presets::{sls_dockerfile, sls_dockerignore, SlsConfig};
pub use stage::Stage;

/// dockgen version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
