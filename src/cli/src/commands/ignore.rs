//! `dockgen ignore` command.

use std::path::PathBuf;

use clap::Args;
use dockgen_core::DockerignoreConfig;

use crate::output;

#[derive(Args)]
pub struct IgnoreArgs {
    /// Pattern to let through (`!<pattern>`), can be repeated
    #[arg(long = "allow")]
    pub allow: Vec<String>,

    /// Pattern to ignore explicitly, can be repeated
    #[arg(long = "deny")]
    pub deny: Vec<String>,

    /// Comment written at the top of the file
    #[arg(long)]
    pub comment: Option<String>,

    /// Do not ignore everything by default (omit `**`)
    #[arg(long)]
    pub no_ignore_all: bool,

    /// Write here instead of stdout
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

pub fn execute(args: IgnoreArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = DockerignoreConfig {
        ignore_all: !args.no_ignore_all,
        allow_patterns: args.allow,
        deny_patterns: args.deny,
        comment: args.comment,
    };
    output::emit(&config.render(), args.output.as_deref())?;
    Ok(())
}
