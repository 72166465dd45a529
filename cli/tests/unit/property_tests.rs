//! Property-based tests for artifact parsing and shell quoting.

use hb_deploy::domain::artifact::Artifact;
use hb_deploy::domain::shell::{join_args, quote_arg};
use proptest::prelude::*;

/// Split a command line into words the way a POSIX shell would for the
/// subset `quote_arg` produces: bare words, `'...'` strings and `\'`.
fn shell_words(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                in_word = true;
                for q in chars.by_ref() {
                    if q == '\'' {
                        break;
                    }
                    current.push(q);
                }
            }
            '\\' => {
                in_word = true;
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            ' ' if in_word => {
                words.push(std::mem::take(&mut current));
                in_word = false;
            }
            ' ' => {}
            other => {
                in_word = true;
                current.push(other);
            }
        }
    }
    if in_word {
        words.push(current);
    }
    words
}

proptest! {
    /// Any argument survives quoting as exactly one shell word.
    #[test]
    fn prop_quote_arg_is_single_word(arg in "[ -~]{0,40}") {
        let quoted = quote_arg(&arg);
        prop_assert_eq!(shell_words(&quoted), vec![arg]);
    }

    /// Joined arguments split back into the original vector.
    #[test]
    fn prop_join_args_round_trips(args in proptest::collection::vec("[ -~]{0,20}", 1..6)) {
        prop_assert_eq!(shell_words(&join_args(&args)), args);
    }

    /// The parsed artifact is the last non-empty line, whatever precedes it.
    #[test]
    fn prop_artifact_is_last_non_empty_line(
        noise in proptest::collection::vec("[a-z ]{0,20}", 0..5),
        name in "[a-z][a-z0-9-]{0,15}-[0-9]\\.[0-9]\\.[0-9]\\.tgz",
        trailing in 0usize..4,
    ) {
        let mut stdout = noise.join("\n");
        stdout.push('\n');
        stdout.push_str(&name);
        stdout.push_str(&"\n".repeat(trailing));
        let artifact = Artifact::from_pack_output(&stdout).unwrap();
        prop_assert_eq!(artifact.file_name(), name.as_str());
    }

    /// Output made only of whitespace never yields an artifact.
    #[test]
    fn prop_blank_output_has_no_artifact(blank in "[ \t\n]{0,20}") {
        prop_assert!(Artifact::from_pack_output(&blank).is_none());
    }
}
