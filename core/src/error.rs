//! Error types for report parsing and table assembly.

use thiserror::Error;

/// Reasons a single `polygenic.out` file cannot be turned into a
/// [`Report`](crate::Report).
///
/// Every variant is fatal for the file being processed; nothing is silently
/// corrected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The report starts with the failed-run sentinel line.
    #[error("the last run of polygenic did not run to completion")]
    IncompleteRun,

    /// No `label:` tokens were found before the first blank line.
    #[error("metadata not found; not a valid SOLAR file?")]
    NoMetadata,

    /// The metadata block has no `Trait:` label.
    #[error("required trait metadata not found; not a valid SOLAR file?")]
    MissingTraitLabel,

    /// A `Std. Error:` statement refers to a statistic never assigned.
    #[error("line {line}: standard error for undeclared statistic '{key}'")]
    OrphanStdError { key: String, line: usize },

    /// A `different from` statement refers to a statistic never assigned.
    #[error("line {line}: difference test for undeclared statistic '{key}'")]
    OrphanDifferenceTest { key: String, line: usize },

    /// The stream could not be read or decoded as text.
    #[error("not a valid text file: {0}")]
    UnreadableFile(String),
}

/// Convenience alias for results with [`ParseError`].
pub type Result<T> = std::result::Result<T, ParseError>;

/// Inconsistencies found while flattening reports into a table.
///
/// These are raised after all files were read and are never treated as a
/// skippable per-file failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// A statistic names a trait that is not in its report's trait list.
    #[error("statistic '{name}' refers to unknown trait '{trait_name}'")]
    UnknownTrait { name: String, trait_name: String },
}
