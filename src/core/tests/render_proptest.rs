//! Property-based tests for directive rendering and stage assembly.
//!
//! These hold for any input, not just hand-picked cases:
//! - exec-form instructions always render as a bracketed, quoted list
//!   (VOLUME uses the plain form for a single path)
//! - a label block has one line per entry, in insertion order
//! - N stage boundaries produce exactly N stages

use dockgen_core::{Cmd, DockerfileBuilder, Entrypoint, Label, Labels, Shell, Volume};
use proptest::prelude::*;

/// Generate exec-form arguments (no quotes, which pass through unescaped)
fn arg_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9/_. -]{0,12}"
}

fn args_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arg_strategy(), 0..6)
}

/// Generate label maps with distinct keys
fn labels_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::btree_set("[a-z][a-z0-9.-]{0,10}", 2..8).prop_flat_map(|keys| {
        let keys: Vec<String> = keys.into_iter().collect();
        let n = keys.len();
        (
            Just(keys),
            prop::collection::vec("[a-zA-Z0-9 ]{0,10}", n),
        )
            .prop_map(|(keys, values)| keys.into_iter().zip(values).collect())
    })
}

fn expected_exec_form(args: &[String]) -> String {
    let quoted: Vec<String> = args.iter().map(|a| format!("\"{}\"", a)).collect();
    format!("[{}]", quoted.join(", "))
}

proptest! {
    #[test]
    fn test_exec_form_always_bracketed(args in args_strategy()) {
        let form = expected_exec_form(&args);
        prop_assert_eq!(Entrypoint::new(args.clone()).render(), format!("ENTRYPOINT {}", form));
        prop_assert_eq!(Cmd::new(args.clone()).render(), format!("CMD {}", form));
        prop_assert_eq!(Shell::new(args).render(), format!("SHELL {}", form));
    }

    #[test]
    fn test_volume_list_bracketed_unless_single(paths in args_strategy()) {
        let rendered = Volume::new(paths.clone()).render();
        if paths.len() == 1 {
            prop_assert_eq!(rendered, format!("VOLUME {}", paths[0]));
        } else {
            prop_assert_eq!(rendered, format!("VOLUME {}", expected_exec_form(&paths)));
        }
    }

    #[test]
    fn test_label_block_keeps_count_and_order(entries in labels_strategy()) {
        let labels: Labels = entries.iter().cloned().collect();
        let rendered = Label::new(labels).render();
        let lines: Vec<&str> = rendered.lines().collect();

        prop_assert_eq!(lines.len(), entries.len() + 1);
        prop_assert_eq!(lines[0], "LABEL \\");
        for (i, (key, value)) in entries.iter().enumerate() {
            let suffix = if i + 1 < entries.len() { " \\" } else { "" };
            prop_assert_eq!(
                lines[i + 1].to_string(),
                format!("      {}=\"{}\"{}", key, value, suffix)
            );
        }
    }

    #[test]
    fn test_stage_boundaries_give_stage_count(images in prop::collection::vec("[a-z]{1,8}:[0-9]{1,3}", 1..10)) {
        let dockerfile = images
            .iter()
            .fold(DockerfileBuilder::new(), |builder, image| {
                builder.from_image(image.as_str()).run("true")
            })
            .build()
            .unwrap();

        prop_assert_eq!(dockerfile.len(), images.len());
        for (stage, image) in dockerfile.stages().iter().zip(&images) {
            prop_assert_eq!(&stage.from_image().image, image);
            prop_assert_eq!(stage.directives().len(), 1);
        }

        let rendered = dockerfile.render();
        prop_assert!(rendered.ends_with('\n'));
        prop_assert!(!rendered.ends_with("\n\n"));
        prop_assert_eq!(rendered.matches("FROM ").count(), images.len());
    }
}
