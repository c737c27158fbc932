//! Metadata block parsing.
//!
//! The block runs from the first line up to the first blank line:
//!
//! ```text
//! Pedigree:  ped.csv
//! Phenotypes:  phen.csv
//! Trait:       sbp dbp            Individuals:  1023
//! ```
//!
//! A token ending in `:` opens a label; the following tokens on the same line
//! belong to it.

use std::io::BufRead;

use solar_tabulate_core::{Metadata, ParseError, TRAIT_LABEL};
use tracing::debug;

use crate::lines::LineSource;

/// First line of a report written by a run that did not finish.
pub const INCOMPLETE_RUN_SENTINEL: &str = "The last run of polygenic did not run to completion.";

/// Reads the metadata block, leaving `source` just past its blank line.
pub(crate) fn read_metadata_block<R: BufRead>(
    source: &mut LineSource<R>,
) -> Result<Metadata, ParseError> {
    let mut metadata = Metadata::new();

    let mut first = true;
    while let Some(line) = source.next_line()? {
        let line = line.trim();
        if first && line == INCOMPLETE_RUN_SENTINEL {
            return Err(ParseError::IncompleteRun);
        }
        first = false;

        if line.is_empty() {
            break;
        }
        collect_labels(&mut metadata, line);
    }

    if metadata.is_empty() {
        return Err(ParseError::NoMetadata);
    }
    if !metadata.contains_key(TRAIT_LABEL) {
        return Err(ParseError::MissingTraitLabel);
    }

    debug!(labels = metadata.len(), "Parsed metadata block");
    Ok(metadata)
}

/// Adds one line's labels and tokens to `metadata`.
///
/// Tokens before the first label on a line are dropped. A label seen again
/// keeps appending to its existing list.
fn collect_labels(metadata: &mut Metadata, line: &str) {
    let mut current: Option<&str> = None;
    for token in line.split_whitespace() {
        if let Some(label) = token.strip_suffix(':') {
            metadata.entry(label.to_string()).or_default();
            current = Some(label);
        } else if let Some(label) = current {
            if let Some(tokens) = metadata.get_mut(label) {
                tokens.push(token.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Metadata, ParseError> {
        read_metadata_block(&mut LineSource::new(text.as_bytes()))
    }

    #[test]
    fn test_labels_and_tokens() {
        let md = parse(
            "Pedigree:  ped.csv\n\
             Trait:  sbp dbp    Individuals:  1023\n\
             \n\
             \t\tH2r is 0.5\n",
        )
        .unwrap();

        let labels: Vec<_> = md.keys().map(String::as_str).collect();
        assert_eq!(labels, ["Pedigree", "Trait", "Individuals"]);
        assert_eq!(md["Trait"], ["sbp", "dbp"]);
        assert_eq!(md["Individuals"], ["1023"]);
    }

    #[test]
    fn test_repeated_label_appends() {
        let md = parse("Trait: a\nCovariates: age\nTrait: b c\n\n").unwrap();
        assert_eq!(md["Trait"], ["a", "b", "c"]);
    }

    #[test]
    fn test_tokens_before_label_are_dropped() {
        let md = parse("stray Trait: a\ncontinued\n").unwrap();
        assert_eq!(md.len(), 1);
        assert_eq!(md["Trait"], ["a"]);
    }

    #[test]
    fn test_label_does_not_carry_to_next_line() {
        let md = parse("Trait: a\nb\n").unwrap();
        assert_eq!(md["Trait"], ["a"]);
    }

    #[test]
    fn test_sentinel_first_line_is_incomplete_run() {
        let err = parse(&format!("{INCOMPLETE_RUN_SENTINEL}\nTrait: a\n\n")).unwrap_err();
        assert_eq!(err, ParseError::IncompleteRun);
    }

    #[test]
    fn test_sentinel_later_is_just_text() {
        let md = parse(&format!("Trait: a\n{INCOMPLETE_RUN_SENTINEL}\n")).unwrap();
        assert_eq!(md["Trait"], ["a"]);
    }

    #[test]
    fn test_no_labels_is_no_metadata() {
        assert_eq!(parse("").unwrap_err(), ParseError::NoMetadata);
        assert_eq!(parse("\nTrait: a\n").unwrap_err(), ParseError::NoMetadata);
        assert_eq!(parse("just words\n\n").unwrap_err(), ParseError::NoMetadata);
    }

    #[test]
    fn test_missing_trait_label() {
        let err = parse("Pedigree: ped.csv\n\n").unwrap_err();
        assert_eq!(err, ParseError::MissingTraitLabel);
    }

    #[test]
    fn test_stops_at_whitespace_only_line() {
        let mut source = LineSource::new("Trait: a\n   \t\nOther: x\n".as_bytes());
        let md = read_metadata_block(&mut source).unwrap();

        assert!(!md.contains_key("Other"));
        assert_eq!(source.next_line().unwrap(), Some("Other: x"));
    }
}
