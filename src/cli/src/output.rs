//! Output helpers shared by CLI commands.

use std::path::Path;

use comfy_table::{ContentArrangement, Table};
use dockgen_core::Labels;

/// Create a styled table with the given headers.
pub fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.load_preset(comfy_table::presets::NOTHING);
    table.set_header(headers);
    table
}

/// Write rendered text to `path`, or to stdout when no path is given.
pub fn emit(content: &str, path: Option<&Path>) -> std::io::Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)?;
            tracing::info!(path = %path.display(), bytes = content.len(), "Wrote file");
        }
        None => print!("{content}"),
    }
    Ok(())
}

/// Parse repeated `KEY=VALUE` arguments, keeping their order.
pub fn parse_key_values(args: &[String]) -> Result<Labels, String> {
    let mut labels = Labels::new();
    for arg in args {
        let (key, value) = arg
            .split_once('=')
            .ok_or_else(|| format!("Invalid label (expected KEY=VALUE): {arg}"))?;
        labels.insert(key, value);
    }
    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_values_valid() {
        let args = vec!["team=platform".to_string(), "tier=backend".to_string()];
        let labels = parse_key_values(&args).unwrap();
        assert_eq!(
            labels.iter().collect::<Vec<_>>(),
            vec![("team", "platform"), ("tier", "backend")]
        );
    }

    #[test]
    fn test_parse_key_values_empty() {
        assert!(parse_key_values(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_parse_key_values_invalid() {
        let args = vec!["NOEQUALS".to_string()];
        assert!(parse_key_values(&args).is_err());
    }

    #[test]
    fn test_parse_key_values_value_with_equals() {
        let args = vec!["url=http://example.com?a=1".to_string()];
        let labels = parse_key_values(&args).unwrap();
        assert_eq!(labels.get("url"), Some("http://example.com?a=1"));
    }

    #[test]
    fn test_emit_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Dockerfile");
        emit("FROM alpine\n", Some(&path)).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "FROM alpine\n");
    }

    #[test]
    fn test_new_table_headers() {
        let table = new_table(&["INDEX", "IMAGE"]);
        let rendered = table.to_string();
        assert!(rendered.contains("INDEX"));
        assert!(rendered.contains("IMAGE"));
    }
}
