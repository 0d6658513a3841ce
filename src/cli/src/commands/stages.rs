//! `dockgen stages` command.

use std::path::PathBuf;

use clap::Args;
use dockgen_core::Stage;

use crate::output;

#[derive(Args)]
pub struct StagesArgs {
    /// Build file (.yaml, .yml or .json)
    pub file: PathBuf,

    /// Only show stage images (one per line)
    #[arg(short, long)]
    pub quiet: bool,

    /// Format output using placeholders: {{.Index}}, {{.Alias}}, {{.Image}},
    /// {{.Platform}}, {{.Instructions}}
    #[arg(long)]
    pub format: Option<String>,
}

pub fn execute(args: StagesArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (_, dockerfile) = super::load_dockerfile(&args.file)?;

    if args.quiet {
        for stage in dockerfile.stages() {
            println!("{}", stage.from_image().image);
        }
        return Ok(());
    }

    let rows: Vec<StageRow> = dockerfile
        .stages()
        .iter()
        .enumerate()
        .map(|(index, stage)| StageRow::new(index, stage))
        .collect();

    if let Some(ref fmt) = args.format {
        for row in &rows {
            println!("{}", row.apply_format(fmt));
        }
        return Ok(());
    }

    println!("{}", stage_table(&rows));
    Ok(())
}

fn stage_table(rows: &[StageRow]) -> comfy_table::Table {
    let mut table = output::new_table(&["INDEX", "ALIAS", "IMAGE", "PLATFORM", "INSTRUCTIONS"]);
    for row in rows {
        table.add_row(&[
            &row.index,
            &row.alias,
            &row.image,
            &row.platform,
            &row.instructions,
        ]);
    }
    table
}

/// Pre-computed display fields for a single stage row.
struct StageRow {
    index: String,
    alias: String,
    image: String,
    platform: String,
    instructions: String,
}

impl StageRow {
    fn new(index: usize, stage: &Stage) -> Self {
        let from = stage.from_image();
        // Comments and blank lines are not instructions
        let instructions = 1 + stage
            .directives()
            .iter()
            .filter(|d| d.keyword().is_some())
            .count();

        Self {
            index: index.to_string(),
            alias: stage.alias().unwrap_or("<none>").to_string(),
            image: from.image.clone(),
            platform: from
                .platform
                .as_deref()
                .filter(|p| !p.is_empty())
                .unwrap_or("<none>")
                .to_string(),
            instructions: instructions.to_string(),
        }
    }

    /// Apply a format template, replacing `{{.Field}}` placeholders.
    fn apply_format(&self, fmt: &str) -> String {
        fmt.replace("{{.Index}}", &self.index)
            .replace("{{.Alias}}", &self.alias)
            .replace("{{.Image}}", &self.image)
            .replace("{{.Platform}}", &self.platform)
            .replace("{{.Instructions}}", &self.instructions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dockgen_core::DockerfileBuilder;

    #[test]
    fn test_stage_row_counts_instructions_only() {
        let df = DockerfileBuilder::new()
            .from_image_as("golang:1.21", "builder")
            .comment("compile")
            .run("go build")
            .blank()
            .build()
            .unwrap();

        let row = StageRow::new(0, &df.stages()[0]);
        assert_eq!(row.alias, "builder");
        assert_eq!(row.image, "golang:1.21");
        assert_eq!(row.platform, "<none>");
        assert_eq!(row.instructions, "2");
    }

    #[test]
    fn test_apply_format() {
        let df = DockerfileBuilder::new()
            .stage(dockgen_core::FromImage::new("alpine").platform("linux/arm64"))
            .build()
            .unwrap();

        let row = StageRow::new(3, &df.stages()[0]);
        assert_eq!(
            row.apply_format("{{.Index}} {{.Alias}} {{.Image}} {{.Platform}}"),
            "3 <none> alpine linux/arm64"
        );
    }

    #[test]
    fn test_empty_alias_shown_as_none() {
        let df = DockerfileBuilder::new()
            .stage(dockgen_core::FromImage::new("alpine").alias("").platform(""))
            .build()
            .unwrap();

        let row = StageRow::new(0, &df.stages()[0]);
        assert_eq!(row.alias, "<none>");
        assert_eq!(row.platform, "<none>");
    }

    #[test]
    fn test_stage_table() {
        let df = DockerfileBuilder::new()
            .from_image_as("golang:1.21", "builder")
            .run("go build")
            .from_image("alpine:3.19")
            .build()
            .unwrap();

        let rows: Vec<StageRow> = df
            .stages()
            .iter()
            .enumerate()
            .map(|(index, stage)| StageRow::new(index, stage))
            .collect();
        let rendered = stage_table(&rows).to_string();
        let lines: Vec<&str> = rendered.lines().filter(|l| !l.trim().is_empty()).collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("INDEX"));
        assert!(lines[0].contains("INSTRUCTIONS"));
        assert!(lines[1].contains("builder"));
        assert!(lines[1].contains("golang:1.21"));
        assert!(lines[2].contains("<none>"));
        assert!(lines[2].contains("alpine:3.19"));
    }
}
