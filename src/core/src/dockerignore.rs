//! `.dockerignore` generation.

use serde::{Deserialize, Serialize};

fn default_ignore_all() -> bool {
    true
}

/// Configuration for a `.dockerignore` file.
///
/// Rendered as: optional comment, deny patterns, `**` when `ignore_all` is
/// set, then one `!<pattern>` per allow pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockerignoreConfig {
    #[serde(default = "default_ignore_all")]
    pub ignore_all: bool,
    #[serde(default)]
    pub allow_patterns: Vec<String>,
    #[serde(default)]
    pub deny_patterns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Default for DockerignoreConfig {
    fn default() -> Self {
        Self {
            ignore_all: true,
            allow_patterns: Vec::new(),
            deny_patterns: Vec::new(),
            comment: None,
        }
    }
}

impl DockerignoreConfig {
    pub fn render(&self) -> String {
        let mut lines: Vec<String> = Vec::new();
        if let Some(comment) = self.comment.as_deref().filter(|c| !c.is_empty()) {
            lines.push(format!("# {comment}"));
        }
        lines.extend(self.deny_patterns.iter().cloned());
        if self.ignore_all {
            lines.push("**".to_string());
        }
        lines.extend(self.allow_patterns.iter().map(|p| format!("!{p}")));
        lines.push(String::new());
        lines.join("\n")
    }
}

/// Generate a `.dockerignore` that blocks everything except `allow`.
pub fn generate_dockerignore<I, S>(allow: I, comment: Option<&str>) -> String
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    DockerignoreConfig {
        ignore_all: true,
        allow_patterns: allow.into_iter().map(Into::into).collect(),
        deny_patterns: Vec::new(),
        comment: comment.map(str::to_string),
    }
    .render()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ignores_everything() {
        assert_eq!(DockerignoreConfig::default().render(), "**\n");
    }

    #[test]
    fn test_full_render_order() {
        let config = DockerignoreConfig {
            ignore_all: true,
            allow_patterns: vec!["dist/".to_string(), "*.tgz".to_string()],
            deny_patterns: vec![".git".to_string()],
            comment: Some("Build context".to_string()),
        };
        assert_eq!(config.render(), "# Build context\n.git\n**\n!dist/\n!*.tgz\n");
    }

    #[test]
    fn test_without_ignore_all() {
        let config = DockerignoreConfig {
            ignore_all: false,
            deny_patterns: vec!["target/".to_string(), "*.log".to_string()],
            ..Default::default()
        };
        assert_eq!(config.render(), "target/\n*.log\n");
    }

    #[test]
    fn test_generate_dockerignore() {
        let out = generate_dockerignore(["app.tgz", "hooks/"], Some("Only the artifact"));
        assert_eq!(out, "# Only the artifact\n**\n!app.tgz\n!hooks/\n");
    }

    #[test]
    fn test_generate_dockerignore_no_comment() {
        let out = generate_dockerignore(Vec::<String>::new(), None);
        assert_eq!(out, "**\n");
    }

    #[test]
    fn test_deserialize_defaults() {
        let config: DockerignoreConfig = serde_yaml::from_str("allow_patterns: [dist/]").unwrap();
        assert!(config.ignore_all);
        assert_eq!(config.render(), "**\n!dist/\n");
    }
}
