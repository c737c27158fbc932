//! Assembly of a [`Report`] from one report stream.

use std::io::BufRead;

use solar_tabulate_core::{ParseError, Report, TRAIT_LABEL};
use tracing::debug;

use crate::lines::LineSource;
use crate::metadata::read_metadata_block;
use crate::statement::read_statements;

/// Parses one complete `polygenic.out` stream.
///
/// The stream is read to its end whether parsing succeeds or fails.
///
/// # Examples
///
/// ```
/// use solar_tabulate_parser::read_report;
///
/// let text = "Trait: bmi  Individuals: 812\n\n\t\tH2r is 0.41  p = 1e-05\n";
/// let report = read_report(text.as_bytes()).unwrap();
///
/// assert_eq!(report.traits, ["bmi"]);
/// assert_eq!(report.metadata["Individuals"], ["812"]);
/// assert_eq!(report.value("H2r", Some("bmi")).unwrap().value, "0.41");
/// ```
pub fn read_report<R: BufRead>(reader: R) -> Result<Report, ParseError> {
    let mut source = LineSource::new(reader);
    let result = parse_source(&mut source);
    if result.is_err() {
        source.drain();
    }
    result
}

fn parse_source<R: BufRead>(source: &mut LineSource<R>) -> Result<Report, ParseError> {
    let metadata = read_metadata_block(source)?;
    let traits = metadata.get(TRAIT_LABEL).cloned().unwrap_or_default();
    let values = read_statements(source, &traits)?;

    debug!(traits = ?traits, values = values.len(), "Assembled report");
    Report::new(metadata, values)
}
