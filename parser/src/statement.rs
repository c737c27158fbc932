//! Statement recognition for the indented result section.
//!
//! Results are indented twice, with tabs or four-space groups:
//!
//! ```text
//! 		H2r(sbp) is 0.4123456  p = 1.2000000e-05
//! 		H2r(sbp) Std. Error:  0.0812345
//! 		RhoG is 0.6012345
//! 		RhoG different from zero  p = 0.0012345
//! 		Derived Estimate of RhoP is 0.2712345
//! ```
//!
//! Three statement shapes are tried in a fixed order (see [`CLASSIFIERS`]).
//! Follow-up statements (standard errors, difference tests) attach to the
//! record created by an earlier assignment with the same key.

use std::io::BufRead;
use std::sync::LazyLock;

use regex::Regex;
use solar_tabulate_core::{Comparator, ParseError, StatKey, StatValues, ValueRecord};
use tracing::{debug, trace};

use crate::lines::LineSource;

/// Prefix marking a value as a derived estimate rather than a direct fit.
pub const DERIVED_ESTIMATE_PREFIX: &str = "Derived Estimate of ";

static PATTERNS: LazyLock<StatementPatterns> = LazyLock::new(StatementPatterns::new);

struct StatementPatterns {
    assignment: Regex,
    std_error: Regex,
    difference: Regex,
    name_and_trait: Regex,
}

impl StatementPatterns {
    fn new() -> Self {
        const NUM: &str = r"[-+\d.eE]+";
        Self {
            assignment: Regex::new(&format!(r"^(.+) is ({NUM})(?:\s+p\s+=\s+({NUM}))?"))
                .expect("static regex must compile"),
            std_error: Regex::new(&format!(r"^(.+)\s+Std\. Error:\s+({NUM})"))
                .expect("static regex must compile"),
            difference: Regex::new(&format!(r"^(.+) different from\s+(zero|1\.0)\s+p = ({NUM})"))
                .expect("static regex must compile"),
            name_and_trait: Regex::new(r"^(.+)\((.+)\)").expect("static regex must compile"),
        }
    }
}

/// One recognized result line. Names are trimmed but not yet resolved to a
/// trait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `<name> is <value>  [p = <pvalue>]`
    Assignment {
        name: String,
        value: String,
        pvalue: Option<String>,
    },
    /// `<name> Std. Error:  <value>`
    StdError { name: String, value: String },
    /// `<name> different from zero|1.0  p = <pvalue>`
    DifferenceTest {
        name: String,
        comparator: Comparator,
        pvalue: String,
    },
}

pub type Classifier = fn(&str) -> Option<Statement>;

/// Statement shapes in priority order; the first match wins.
pub const CLASSIFIERS: [(&str, Classifier); 3] = [
    ("assignment", parse_assignment),
    ("std-error", parse_std_error),
    ("difference-test", parse_difference_test),
];

/// Classifies a trimmed result line.
///
/// # Examples
///
/// ```
/// use solar_tabulate_parser::statement::{Statement, classify};
///
/// let stmt = classify("H2r is 0.4123  p = 0.0012  (Significant)").unwrap();
/// assert_eq!(
///     stmt,
///     Statement::Assignment {
///         name: "H2r".into(),
///         value: "0.4123".into(),
///         pvalue: Some("0.0012".into()),
///     }
/// );
/// assert!(classify("Loglikelihoods and chi's are in sbp/polygenic.logs.out").is_none());
/// ```
pub fn classify(line: &str) -> Option<Statement> {
    CLASSIFIERS.iter().find_map(|(_, classifier)| classifier(line))
}

pub fn parse_assignment(line: &str) -> Option<Statement> {
    let caps = PATTERNS.assignment.captures(line)?;
    Some(Statement::Assignment {
        name: caps[1].trim_end().to_string(),
        value: caps[2].to_string(),
        pvalue: caps.get(3).map(|m| m.as_str().to_string()),
    })
}

pub fn parse_std_error(line: &str) -> Option<Statement> {
    let caps = PATTERNS.std_error.captures(line)?;
    Some(Statement::StdError {
        name: caps[1].trim_end().to_string(),
        value: caps[2].to_string(),
    })
}

pub fn parse_difference_test(line: &str) -> Option<Statement> {
    let caps = PATTERNS.difference.captures(line)?;
    Some(Statement::DifferenceTest {
        name: caps[1].trim_end().to_string(),
        comparator: Comparator::from_report_text(&caps[2])?,
        pvalue: caps[3].to_string(),
    })
}

/// Resolves a raw statistic name to its `(name, trait)` key.
///
/// `base(trait)` always names `trait`. Otherwise a single-trait run assigns
/// the statistic to its sole trait, and a multi-trait run makes it global.
///
/// # Examples
///
/// ```
/// use solar_tabulate_core::StatKey;
/// use solar_tabulate_parser::statement::resolve_key;
///
/// let traits = vec!["sbp".to_string(), "dbp".to_string()];
/// assert_eq!(resolve_key("H2r(dbp)", &traits), StatKey::for_trait("H2r", "dbp"));
/// assert_eq!(resolve_key("RhoG", &traits), StatKey::global("RhoG"));
/// assert_eq!(resolve_key("H2r", &traits[..1]), StatKey::for_trait("H2r", "sbp"));
/// ```
pub fn resolve_key(name: &str, traits: &[String]) -> StatKey {
    if let Some(caps) = PATTERNS.name_and_trait.captures(name) {
        return StatKey::for_trait(&caps[1], &caps[2]);
    }
    match traits {
        [sole] => StatKey::for_trait(name, sole),
        _ => StatKey::global(name),
    }
}

/// Whether a raw line belongs to the result section.
///
/// Leading groups of four spaces count as tabs; the line must start with at
/// least two indentation units.
pub fn is_result_line(line: &str) -> bool {
    let mut rest = line;
    let mut depth = 0;
    while depth < 2 {
        if let Some(next) = rest.strip_prefix('\t') {
            rest = next;
        } else if let Some(next) = rest.strip_prefix("    ") {
            rest = next;
        } else {
            break;
        }
        depth += 1;
    }
    depth == 2
}

/// Consumes the rest of `source`, building the statistic records.
pub(crate) fn read_statements<R: BufRead>(
    source: &mut LineSource<R>,
    traits: &[String],
) -> Result<StatValues, ParseError> {
    let mut values = StatValues::new();
    let mut recognized = 0usize;

    while let Some(line) = source.next_line()? {
        if !is_result_line(line) {
            continue;
        }
        let Some(statement) = classify(line.trim()) else {
            continue;
        };
        let line_number = source.line_number();
        trace!(line = line_number, ?statement, "Recognized statement");
        apply_statement(&mut values, statement, traits, line_number)?;
        recognized += 1;
    }

    debug!(statements = recognized, values = values.len(), "Parsed result section");
    Ok(values)
}

/// Applies one statement to `values`.
///
/// An assignment creates or replaces its record (keeping the original
/// position); follow-ups fail when no record exists for their key.
pub fn apply_statement(
    values: &mut StatValues,
    statement: Statement,
    traits: &[String],
    line: usize,
) -> Result<(), ParseError> {
    match statement {
        Statement::Assignment {
            name,
            value,
            pvalue,
        } => {
            let mut key = resolve_key(&name, traits);
            let mut record = ValueRecord::new(&value, pvalue.as_deref());
            if let Some(stripped) = key.name.strip_prefix(DERIVED_ESTIMATE_PREFIX) {
                key.name = stripped.to_string();
                record = record.estimated();
            }
            values.insert(key, record);
        }
        Statement::StdError { name, value } => {
            let key = resolve_key(&name, traits);
            let record = values
                .get_mut(&key)
                .ok_or_else(|| ParseError::OrphanStdError {
                    key: key.to_string(),
                    line,
                })?;
            record.stderr = Some(value);
        }
        Statement::DifferenceTest {
            name,
            comparator,
            pvalue,
        } => {
            let key = resolve_key(&name, traits);
            let record = values
                .get_mut(&key)
                .ok_or_else(|| ParseError::OrphanDifferenceTest {
                    key: key.to_string(),
                    line,
                })?;
            record.push_difference_test(comparator, &pvalue);
        }
    }
    Ok(())
}
