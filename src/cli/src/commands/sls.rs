//! `dockgen sls` command — Render the SLS distribution Dockerfile.

use std::path::PathBuf;

use clap::Args;
use dockgen_core::{sls_dockerfile, sls_dockerignore, SlsConfig};

use crate::output;

#[derive(Args)]
pub struct SlsArgs {
    /// Base image for the service
    #[arg(long)]
    pub base_image: String,

    /// Product name (image title label)
    #[arg(long)]
    pub product_name: String,

    /// Product version (image version label)
    #[arg(long)]
    pub product_version: String,

    /// Product group (image vendor label)
    #[arg(long)]
    pub product_group: String,

    /// Distribution directory name inside the tarball
    #[arg(long)]
    pub dist_name: String,

    /// Distribution tarball file name
    #[arg(long)]
    pub tarball_name: String,

    /// Directory the tarball is extracted into
    #[arg(long, default_value = "/opt/services")]
    pub install_path: String,

    /// SLS product type label value
    #[arg(long, default_value = "helm.v1")]
    pub product_type: String,

    /// Health check interval in seconds
    #[arg(long)]
    pub health_check_interval: Option<u32>,

    /// Health check timeout in seconds
    #[arg(long)]
    pub health_check_timeout: Option<u32>,

    /// Health check start period in seconds
    #[arg(long)]
    pub health_check_start_period: Option<u32>,

    /// Health check retries
    #[arg(long)]
    pub health_check_retries: Option<u32>,

    /// Use the hook-based init entrypoint
    #[arg(long)]
    pub hook_init: bool,

    /// Port to expose, can be repeated
    #[arg(long = "expose")]
    pub expose: Vec<i32>,

    /// Extra label (KEY=VALUE), can be repeated
    #[arg(long = "label")]
    pub label: Vec<String>,

    /// Write the Dockerfile here instead of stdout
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Also write the SLS .dockerignore to this path
    #[arg(long = "ignore-file")]
    pub ignore_file: Option<PathBuf>,
}

impl SlsArgs {
    fn to_config(&self) -> Result<SlsConfig, String> {
        let mut config = SlsConfig::new(
            &self.base_image,
            &self.product_name,
            &self.product_version,
            &self.product_group,
            &self.dist_name,
            &self.tarball_name,
        );
        config.install_path = self.install_path.clone();
        config.product_type = self.product_type.clone();
        config.health_check_interval = self.health_check_interval;
        config.health_check_timeout = self.health_check_timeout;
        config.health_check_start_period = self.health_check_start_period;
        config.health_check_retries = self.health_check_retries;
        config.use_hook_init = self.hook_init;
        config.expose_ports = self.expose.clone();
        config.labels = output::parse_key_values(&self.label)?;
        Ok(config)
    }
}

pub fn execute(args: SlsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.to_config()?;
    let dockerfile = sls_dockerfile(&config)?;

    if let Some(ignore_path) = &args.ignore_file {
        output::emit(&sls_dockerignore(), Some(ignore_path))?;
    }

    output::emit(&dockerfile.render(), args.output.as_deref())?;
    Ok(())
}
