//! CLI command definitions and dispatch.

mod ignore;
mod render;
mod sls;
mod stages;
mod version;

use std::path::Path;

use clap::{Parser, Subcommand};
use dockgen_core::{BuildFile, Dockerfile};

/// dockgen — typed multi-stage Dockerfile generator.
#[derive(Parser)]
#[command(name = "dockgen", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Command {
    /// Render a Dockerfile from a YAML or JSON build file
    Render(render::RenderArgs),
    /// List the stages described by a build file
    Stages(stages::StagesArgs),
    /// Render the SLS distribution Dockerfile
    Sls(sls::SlsArgs),
    /// Render a .dockerignore that only allows the given patterns
    Ignore(ignore::IgnoreArgs),
    /// Show version information
    Version(version::VersionArgs),
}

/// Load a build file and assemble its Dockerfile.
pub(crate) fn load_dockerfile(
    path: &Path,
) -> Result<(BuildFile, Dockerfile), Box<dyn std::error::Error>> {
    let build_file = BuildFile::from_file(path)?;
    let dockerfile = build_file.to_dockerfile()?;
    Ok((build_file, dockerfile))
}

/// Dispatch a parsed CLI to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Render(args) => render::execute(args),
        Command::Stages(args) => stages::execute(args),
        Command::Sls(args) => sls::execute(args),
        Command::Ignore(args) => ignore::execute(args),
        Command::Version(args) => version::execute(args),
    }
}
