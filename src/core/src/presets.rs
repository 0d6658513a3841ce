//! Ready-made Dockerfile layouts.
//!
//! The SLS preset packages an SLS distribution tarball: the tarball is added
//! under the install path, runtime directories are created inside the
//! distribution, and the service is started through its init script (or
//! through the hook-based entrypoint when `use_hook_init` is set).

use serde::{Deserialize, Serialize};

use crate::directive::HealthCheck;
use crate::dockerfile::{Dockerfile, DockerfileBuilder};
use crate::dockerignore::generate_dockerignore;
use crate::error::Result;
use crate::labels::{Labels, OciLabels};

const SLS_PRODUCT_TYPE_LABEL: &str = "com.palantir.sls.product-type";

const RUNTIME_DIRS_COMMAND: &str = "mkdir -p var/data/tmp var/log var/run var/conf var/state";

const HOOK_SETUP_COMMAND: &str = "chmod +x service/bin/entrypoint.sh && \\\n    \
    mkdir -p hooks/pre-configure.d hooks/configure.d \\\n    \
    hooks/pre-startup.d hooks/startup.d hooks/post-startup.d \\\n    \
    hooks/pre-shutdown.d hooks/shutdown.d";

const HEALTH_CHECK_COMMAND: &str = "service/monitoring/bin/check.sh || exit 1";

fn default_install_path() -> String {
    "/opt/services".to_string()
}

fn default_product_type() -> String {
    "helm.v1".to_string()
}

/// Inputs for [`sls_dockerfile`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlsConfig {
    pub base_image: String,
    pub product_name: String,
    pub product_version: String,
    pub product_group: String,
    pub dist_name: String,
    pub tarball_name: String,
    #[serde(default = "default_install_path")]
    pub install_path: String,
    #[serde(default = "default_product_type")]
    pub product_type: String,
    #[serde(default)]
    pub health_check_interval: Option<u32>,
    #[serde(default)]
    pub health_check_timeout: Option<u32>,
    #[serde(default)]
    pub health_check_start_period: Option<u32>,
    #[serde(default)]
    pub health_check_retries: Option<u32>,
    #[serde(default)]
    pub use_hook_init: bool,
    #[serde(default)]
    pub expose_ports: Vec<i32>,
    /// Extra labels, merged after the standard ones.
    #[serde(default)]
    pub labels: Labels,
}

impl SlsConfig {
    pub fn new(
        base_image: impl Into<String>,
        product_name: impl Into<String>,
        product_version: impl Into<String>,
        product_group: impl Into<String>,
        dist_name: impl Into<String>,
        tarball_name: impl Into<String>,
    ) -> Self {
        Self {
            base_image: base_image.into(),
            product_name: product_name.into(),
            product_version: product_version.into(),
            product_group: product_group.into(),
            dist_name: dist_name.into(),
            tarball_name: tarball_name.into(),
            install_path: default_install_path(),
            product_type: default_product_type(),
            health_check_interval: None,
            health_check_timeout: None,
            health_check_start_period: None,
            health_check_retries: None,
            use_hook_init: false,
            expose_ports: Vec::new(),
            labels: Labels::new(),
        }
    }

    fn image_labels(&self) -> OciLabels {
        let mut extra = Labels::new();
        extra.insert(SLS_PRODUCT_TYPE_LABEL, self.product_type.as_str());
        extra.extend(self.labels.iter());

        OciLabels {
            title: Some(self.product_name.clone()),
            version: Some(self.product_version.clone()),
            vendor: Some(self.product_group.clone()),
            extra,
            ..Default::default()
        }
    }

    /// A health check is emitted when an interval or a timeout is set.
    /// Unset timings fall back to the `HEALTHCHECK` defaults.
    fn health_check(&self) -> Option<HealthCheck> {
        if self.health_check_interval.is_none() && self.health_check_timeout.is_none() {
            return None;
        }

        let mut check = HealthCheck::new(HEALTH_CHECK_COMMAND);
        if let Some(interval) = self.health_check_interval {
            check = check.interval_seconds(interval);
        }
        if let Some(timeout) = self.health_check_timeout {
            check = check.timeout_seconds(timeout);
        }
        if let Some(start_period) = self.health_check_start_period {
            check = check.start_period_seconds(start_period);
        }
        if let Some(retries) = self.health_check_retries {
            check = check.retries(retries);
        }
        Some(check)
    }
}

/// Generate the Dockerfile for an SLS distribution.
pub fn sls_dockerfile(config: &SlsConfig) -> Result<Dockerfile> {
    let workdir = format!("{}/{}", config.install_path, config.dist_name);

    let mut builder = DockerfileBuilder::new()
        .from_image(&config.base_image)
        .blank()
        .directive(config.image_labels().to_label())
        .blank()
        .add(&config.tarball_name, format!("{}/", config.install_path))
        .workdir(workdir)
        .blank()
        .run(RUNTIME_DIRS_COMMAND)
        .blank();

    if config.use_hook_init {
        builder = builder
            .comment("Hook init system")
            .copy("hooks/entrypoint.sh", "service/bin/entrypoint.sh")
            .copy("hooks/hooks.sh", "service/lib/hooks.sh")
            .run(HOOK_SETUP_COMMAND)
            .blank();
    }

    for port in &config.expose_ports {
        builder = builder.expose(*port);
    }
    if !config.expose_ports.is_empty() {
        builder = builder.blank();
    }

    if let Some(check) = config.health_check() {
        builder = builder.healthcheck_with(check).blank();
    }

    builder = if config.use_hook_init {
        builder.entrypoint(["service/bin/entrypoint.sh"])
    } else {
        builder.entrypoint(["service/bin/init.sh", "start"])
    };

    builder.blank().build()
}

/// `.dockerignore` for SLS builds: only the tarball and hook files.
pub fn sls_dockerignore() -> String {
    generate_dockerignore(
        ["*.sls.tgz", "hooks/"],
        Some("Ignore everything except the tarball and hook files"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SlsConfig {
        SlsConfig::new(
            "python:3.11-slim",
            "my-service",
            "1.0.0",
            "com.example",
            "my-service-1.0.0",
            "my-service-1.0.0.sls.tgz",
        )
    }

    #[test]
    fn test_basic_output() {
        let df = sls_dockerfile(&config()).unwrap();
        let expected = "\
FROM python:3.11-slim

LABEL \\
      org.opencontainers.image.title=\"my-service\" \\
      org.opencontainers.image.version=\"1.0.0\" \\
      org.opencontainers.image.vendor=\"com.example\" \\
      com.palantir.sls.product-type=\"helm.v1\"

ADD my-service-1.0.0.sls.tgz /opt/services/
WORKDIR /opt/services/my-service-1.0.0

RUN mkdir -p var/data/tmp var/log var/run var/conf var/state

ENTRYPOINT [\"service/bin/init.sh\", \"start\"]
";
        assert_eq!(df.render(), expected);
    }

    #[test]
    fn test_custom_install_path() {
        let mut config = config();
        config.install_path = "/app".to_string();
        let result = sls_dockerfile(&config).unwrap().render();
        assert!(result.contains("ADD my-service-1.0.0.sls.tgz /app/"));
        assert!(result.contains("WORKDIR /app/my-service-1.0.0"));
    }

    #[test]
    fn test_hook_init() {
        let mut config = config();
        config.use_hook_init = true;
        let result = sls_dockerfile(&config).unwrap().render();
        assert!(result.contains("# Hook init system"));
        assert!(result.contains("COPY hooks/entrypoint.sh service/bin/entrypoint.sh"));
        assert!(result.contains("COPY hooks/hooks.sh service/lib/hooks.sh"));
        assert!(result.contains(
            "RUN chmod +x service/bin/entrypoint.sh && \\\n    mkdir -p hooks/pre-configure.d"
        ));
        assert!(result.contains(r#"ENTRYPOINT ["service/bin/entrypoint.sh"]"#));
        assert!(!result.contains("init.sh"));
    }

    #[test]
    fn test_no_hooks_by_default() {
        let result = sls_dockerfile(&config()).unwrap().render();
        assert!(!result.contains("hooks.sh"));
        assert!(!result.contains("entrypoint.sh"));
    }

    #[test]
    fn test_expose_ports() {
        let mut config = config();
        config.expose_ports = vec![8080, 8443];
        let result = sls_dockerfile(&config).unwrap().render();
        assert!(result.contains("EXPOSE 8080\nEXPOSE 8443\n\nENTRYPOINT"));
    }

    #[test]
    fn test_health_check() {
        let mut config = config();
        config.health_check_interval = Some(15);
        config.health_check_timeout = Some(10);
        let result = sls_dockerfile(&config).unwrap().render();
        assert!(result.contains(
            "HEALTHCHECK --interval=15s --timeout=10s --start-period=30s --retries=3 \\\n  \
             CMD service/monitoring/bin/check.sh || exit 1\n\nENTRYPOINT"
        ));
    }

    #[test]
    fn test_health_check_zero_timing_kept() {
        let mut config = config();
        config.health_check_timeout = Some(0);
        let result = sls_dockerfile(&config).unwrap().render();
        assert!(result.contains(
            "HEALTHCHECK --interval=10s --timeout=0s --start-period=30s --retries=3 \\\n"
        ));
    }

    #[test]
    fn test_health_check_needs_interval_or_timeout() {
        let mut config = config();
        config.health_check_retries = Some(9);
        config.health_check_start_period = Some(60);
        let result = sls_dockerfile(&config).unwrap().render();
        assert!(!result.contains("HEALTHCHECK"));
    }

    #[test]
    fn test_no_healthcheck_by_default() {
        let result = sls_dockerfile(&config()).unwrap().render();
        assert!(!result.contains("HEALTHCHECK"));
    }

    #[test]
    fn test_extra_labels() {
        let mut config = config();
        config.labels.insert("team", "platform");
        let result = sls_dockerfile(&config).unwrap().render();
        assert!(result.contains("com.palantir.sls.product-type=\"helm.v1\" \\\n      team=\"platform\"\n"));
    }

    #[test]
    fn test_extra_label_overrides_product_type() {
        let mut config = config();
        config.labels.insert(SLS_PRODUCT_TYPE_LABEL, "asset.v1");
        let result = sls_dockerfile(&config).unwrap().render();
        assert!(result.contains("com.palantir.sls.product-type=\"asset.v1\""));
        assert!(!result.contains("helm.v1"));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let yaml = r#"
base_image: eclipse-temurin:17-jre
product_name: api
product_version: 2.3.1
product_group: com.example
dist_name: api-2.3.1
tarball_name: api-2.3.1.sls.tgz
expose_ports: [8443]
"#;
        let config: SlsConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.install_path, "/opt/services");
        assert_eq!(config.product_type, "helm.v1");
        assert!(!config.use_hook_init);
        assert_eq!(config.expose_ports, vec![8443]);
    }

    #[test]
    fn test_sls_dockerignore() {
        assert_eq!(
            sls_dockerignore(),
            "# Ignore everything except the tarball and hook files\n**\n!*.sls.tgz\n!hooks/\n"
        );
    }
}
