//! Report type definitions.
//!
//! A [`Report`] is the structured form of one `polygenic.out` file. All
//! numeric fields are carried as the verbatim text found in the report; they
//! are never parsed into floating point values or re-formatted.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ParseError, Result};

/// Metadata label holding the analyzed trait names.
pub const TRAIT_LABEL: &str = "Trait";

/// Label → tokens mapping recovered from the leading metadata block.
///
/// Insertion order is preserved; it decides the order of metadata columns in
/// the final table.
pub type Metadata = IndexMap<String, Vec<String>>;

/// Statistic records keyed by `(name, trait)`, in the order their assignment
/// statements first appeared.
pub type StatValues = IndexMap<StatKey, ValueRecord>;

/// Identity of one statistic within a report.
///
/// `trait_name` is `None` for statistics that are global to a multi-trait run
/// (e.g. a cross-trait correlation).
///
/// # Examples
///
/// ```
/// use solar_tabulate_core::StatKey;
///
/// let key = StatKey::for_trait("H2r", "bmi");
/// assert_eq!(key.to_string(), "H2r(bmi)");
///
/// let global = StatKey::global("RhoG");
/// assert_eq!(global.to_string(), "RhoG");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatKey {
    /// Statistic name with any trait suffix and estimate prefix removed.
    pub name: String,
    /// Trait the statistic belongs to, if any.
    #[serde(rename = "trait")]
    pub trait_name: Option<String>,
}

impl StatKey {
    /// Creates a key for a statistic attached to `trait_name`.
    pub fn for_trait(name: &str, trait_name: &str) -> Self {
        Self {
            name: name.to_string(),
            trait_name: Some(trait_name.to_string()),
        }
    }

    /// Creates a key for a statistic that belongs to no single trait.
    pub fn global(name: &str) -> Self {
        Self {
            name: name.to_string(),
            trait_name: None,
        }
    }
}

impl fmt::Display for StatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.trait_name {
            Some(trait_name) => write!(f, "{}({trait_name})", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Reference value a difference test compares a statistic against.
///
/// # Examples
///
/// ```
/// use solar_tabulate_core::Comparator;
///
/// assert_eq!(Comparator::from_report_text("zero"), Some(Comparator::Zero));
/// assert_eq!(Comparator::One.column_suffix(), "pNot1.0");
/// assert_eq!(Comparator::from_report_text("two"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparator {
    /// `different from zero`
    #[serde(rename = "zero")]
    Zero,
    /// `different from 1.0`
    #[serde(rename = "1.0")]
    One,
}

impl Comparator {
    /// Maps the comparator word used in the report to a variant.
    pub fn from_report_text(text: &str) -> Option<Self> {
        match text {
            "zero" => Some(Self::Zero),
            "1.0" => Some(Self::One),
            _ => None,
        }
    }

    /// Comparator as written in the report.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::One => "1.0",
        }
    }

    /// Column suffix (without leading dot) for the test's p-value.
    pub fn column_suffix(&self) -> &'static str {
        match self {
            Self::Zero => "pNotZero",
            Self::One => "pNot1.0",
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `<name> different from zero|1.0  p = <pvalue>` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifferenceTest {
    pub comparator: Comparator,
    pub pvalue: String,
}

/// One statistical finding.
///
/// Created by an assignment statement (`H2r is 0.41  p = 1.2e-05`); the
/// standard error and difference tests are attached by later statements that
/// reference the same [`StatKey`].
///
/// # Examples
///
/// ```
/// use solar_tabulate_core::{Comparator, ValueRecord};
///
/// let mut record = ValueRecord::new("0.41", None);
/// record.stderr = Some("0.05".into());
/// record.push_difference_test(Comparator::Zero, "0.001");
///
/// assert!(!record.estimated);
/// assert_eq!(record.difference_tests.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValueRecord {
    /// The value was reported as a `Derived Estimate of ...`.
    pub estimated: bool,
    pub value: String,
    pub pvalue: Option<String>,
    pub stderr: Option<String>,
    pub difference_tests: Vec<DifferenceTest>,
}

impl ValueRecord {
    /// Creates a directly fitted value with an optional inline p-value.
    pub fn new(value: &str, pvalue: Option<&str>) -> Self {
        Self {
            estimated: false,
            value: value.to_string(),
            pvalue: pvalue.map(String::from),
            stderr: None,
            difference_tests: Vec::new(),
        }
    }

    /// Marks the value as a derived estimate.
    pub fn estimated(mut self) -> Self {
        self.estimated = true;
        self
    }

    /// Appends a difference test, keeping report order.
    pub fn push_difference_test(&mut self, comparator: Comparator, pvalue: &str) {
        self.difference_tests.push(DifferenceTest {
            comparator,
            pvalue: pvalue.to_string(),
        });
    }
}

/// Structured result of one `polygenic.out` file.
///
/// The `Trait` metadata label is lifted into [`Report::traits`]; it never
/// appears in [`Report::metadata`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Metadata labels other than `Trait`.
    pub metadata: Metadata,
    /// Analyzed trait names in report order.
    pub traits: Vec<String>,
    /// Statistics in first-assignment order.
    #[serde(with = "stat_entries")]
    pub values: StatValues,
}

impl Report {
    /// Assembles a report, moving the `Trait` label out of `metadata`.
    ///
    /// Fails with [`ParseError::MissingTraitLabel`] when `metadata` has no
    /// `Trait` label. A `Trait` label with no tokens is accepted and yields an
    /// empty [`Report::traits`]; every statistic of such a report is global.
    ///
    /// # Examples
    ///
    /// ```
    /// use solar_tabulate_core::{Metadata, ParseError, Report, StatValues};
    ///
    /// let mut metadata = Metadata::new();
    /// metadata.insert("Trait".into(), vec!["sbp".into(), "dbp".into()]);
    /// let report = Report::new(metadata, StatValues::new()).unwrap();
    /// assert_eq!(report.traits, ["sbp", "dbp"]);
    /// assert!(report.metadata.is_empty());
    ///
    /// let err = Report::new(Metadata::new(), StatValues::new()).unwrap_err();
    /// assert_eq!(err, ParseError::MissingTraitLabel);
    /// ```
    pub fn new(mut metadata: Metadata, values: StatValues) -> Result<Self> {
        let traits = metadata
            .shift_remove(TRAIT_LABEL)
            .ok_or(ParseError::MissingTraitLabel)?;

        Ok(Self {
            metadata,
            traits,
            values,
        })
    }

    /// Position of `trait_name` in this report's trait list.
    pub fn trait_index(&self, trait_name: &str) -> Option<usize> {
        self.traits.iter().position(|t| t == trait_name)
    }

    /// Looks up a statistic by name and optional trait.
    pub fn value(&self, name: &str, trait_name: Option<&str>) -> Option<&ValueRecord> {
        let key = StatKey {
            name: name.to_string(),
            trait_name: trait_name.map(String::from),
        };
        self.values.get(&key)
    }
}

/// Serializes [`StatValues`] as an ordered list of `[key, record]` pairs,
/// since JSON object keys must be strings.
mod stat_entries {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{StatKey, StatValues, ValueRecord};

    pub fn serialize<S: Serializer>(values: &StatValues, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<StatValues, D::Error> {
        let entries = Vec::<(StatKey, ValueRecord)>::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}
