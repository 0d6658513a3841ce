//! `dockgen render` command — Render a Dockerfile from a build file.
//!
//! Loads a YAML/JSON build file, assembles its stages (or preset), and
//! writes the Dockerfile and, optionally, its `.dockerignore`.

use std::path::PathBuf;

use clap::Args;

use crate::output;

#[derive(Args)]
pub struct RenderArgs {
    /// Build file (.yaml, .yml or .json)
    pub file: PathBuf,

    /// Write the Dockerfile here instead of stdout
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Also write the build file's .dockerignore to this path
    #[arg(long = "ignore-file")]
    pub ignore_file: Option<PathBuf>,
}

pub fn execute(args: RenderArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (build_file, dockerfile) = super::load_dockerfile(&args.file)?;

    if let Some(ignore_path) = &args.ignore_file {
        let ignore = build_file.render_dockerignore().ok_or_else(|| {
            format!(
                "--ignore-file given but {} has no `dockerignore` section",
                args.file.display()
            )
        })?;
        output::emit(&ignore, Some(ignore_path))?;
    }

    output::emit(&dockerfile.render(), args.output.as_deref())?;
    Ok(())
}
