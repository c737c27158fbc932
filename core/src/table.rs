//! Flattening of reports into one column-consistent table.
//!
//! Each [`Report`] becomes one [`Row`]. Trait names are replaced by a shared
//! letter shorthand (`A`, `B`, ...) so that the same column means "first
//! trait", "second trait", ... in every row, whatever the traits are called.
//! The header is the first-seen ordered union of all row keys, minus keys that
//! are absent in every row.

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::TableError;
use crate::types::{Report, StatKey, ValueRecord};

/// Trait-letter alphabet shared by every row of a table.
///
/// Sized by the largest trait count over all reports. Letters past `Z`
/// continue as `AA`, `AB`, ...
///
/// # Examples
///
/// ```
/// use solar_tabulate_core::TraitLetters;
///
/// let letters = TraitLetters::new(3);
/// assert_eq!(letters.as_slice(), ["A", "B", "C"]);
/// assert_eq!(TraitLetters::new(28).get(27), Some("AB"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TraitLetters(Vec<String>);

impl TraitLetters {
    /// Creates an alphabet of `count` letters.
    pub fn new(count: usize) -> Self {
        Self((0..count).map(letter_for).collect())
    }

    /// Alphabet sized for the report with the most traits.
    pub fn for_reports(reports: &[Report]) -> Self {
        Self::new(reports.iter().map(|r| r.traits.len()).max().unwrap_or(0))
    }

    /// Letter of the trait at `index`.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

fn letter_for(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.iter().rev().map(|&b| b as char).collect()
}

/// One report flattened to `column key → cell`; `None` is an absent cell.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Row {
    cells: IndexMap<String, Option<String>>,
}

impl Row {
    /// Sets a cell. Re-setting a key keeps its original position.
    pub fn insert(&mut self, key: String, value: Option<String>) {
        self.cells.insert(key, value);
    }

    /// Present value of `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.cells.get(key).and_then(|v| v.as_deref())
    }

    /// Whether `key` was emitted for this row at all, even as absent.
    pub fn contains_key(&self, key: &str) -> bool {
        self.cells.contains_key(key)
    }

    /// Cells in emission order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Header plus rows, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    /// Renders the table as tab-separated text.
    ///
    /// One header line, then one line per row in header column order. Absent
    /// cells are written as `na_value` verbatim. Every line ends with `\n`.
    ///
    /// # Examples
    ///
    /// ```
    /// use solar_tabulate_core::{Row, Table};
    ///
    /// let mut first = Row::default();
    /// first.insert("A".into(), Some("bmi".into()));
    /// first.insert("H2r.A".into(), Some("0.4".into()));
    /// let mut second = Row::default();
    /// second.insert("A".into(), Some("sbp".into()));
    ///
    /// let table = Table { header: vec!["A".into(), "H2r.A".into()], rows: vec![first, second] };
    /// assert_eq!(table.to_tsv("NA"), "A\tH2r.A\nbmi\t0.4\nsbp\tNA\n");
    /// ```
    pub fn to_tsv(&self, na_value: &str) -> String {
        let mut out = self.header.join("\t");
        out.push('\n');

        for row in &self.rows {
            let cells: Vec<&str> = self
                .header
                .iter()
                .map(|key| row.get(key).unwrap_or(na_value))
                .collect();
            out.push_str(&cells.join("\t"));
            out.push('\n');
        }

        out
    }
}

/// Builds the table for `reports`, in input order.
///
/// # Errors
///
/// [`TableError::UnknownTrait`] when a statistic names a trait its report
/// does not list, since no trait letter can be assigned to it.
pub fn build_table(reports: &[Report]) -> Result<Table, TableError> {
    let letters = TraitLetters::for_reports(reports);
    let rows = reports
        .iter()
        .map(|report| build_row(report, &letters))
        .collect::<Result<Vec<_>, _>>()?;
    let header = build_header(&rows);

    Ok(Table { header, rows })
}

/// Flattens one report using the shared trait alphabet.
///
/// Column order: trait letters, metadata labels, then for each statistic its
/// value, `.stderr`, `.pvalue` and `.pNot*` columns.
pub fn build_row(report: &Report, letters: &TraitLetters) -> Result<Row, TableError> {
    let mut row = Row::default();

    for (index, letter) in letters.as_slice().iter().enumerate() {
        row.insert(letter.clone(), report.traits.get(index).cloned());
    }

    for (label, tokens) in &report.metadata {
        row.insert(label.clone(), Some(tokens.join(" ")));
    }

    for (key, record) in &report.values {
        let base = base_key(report, letters, key, record)?;

        row.insert(base.clone(), Some(record.value.clone()));
        row.insert(format!("{base}.stderr"), record.stderr.clone());
        row.insert(format!("{base}.pvalue"), record.pvalue.clone());

        for test in &record.difference_tests {
            row.insert(
                format!("{base}.{}", test.comparator.column_suffix()),
                Some(test.pvalue.clone()),
            );
        }
    }

    Ok(row)
}

/// Trait suffix takes precedence over the estimate suffix.
fn base_key(
    report: &Report,
    letters: &TraitLetters,
    key: &StatKey,
    record: &ValueRecord,
) -> Result<String, TableError> {
    let Some(trait_name) = &key.trait_name else {
        return Ok(if record.estimated {
            format!("{}.est", key.name)
        } else {
            key.name.clone()
        });
    };

    let letter = report
        .trait_index(trait_name)
        .and_then(|index| letters.get(index))
        .ok_or_else(|| TableError::UnknownTrait {
            name: key.name.clone(),
            trait_name: trait_name.clone(),
        })?;

    Ok(format!("{}.{letter}", key.name))
}

/// First-seen ordered union of row keys that have a value in at least one row.
///
/// # Examples
///
/// ```
/// use solar_tabulate_core::{Row, build_header};
///
/// let mut first = Row::default();
/// first.insert("A".into(), Some("bmi".into()));
/// first.insert("H2r.A.stderr".into(), None);
/// let mut second = Row::default();
/// second.insert("RhoG".into(), Some("0.2".into()));
/// second.insert("A".into(), None);
///
/// assert_eq!(build_header(&[first, second]), ["A", "RhoG"]);
/// ```
pub fn build_header(rows: &[Row]) -> Vec<String> {
    let mut seen: IndexMap<&str, bool> = IndexMap::new();
    for row in rows {
        for (key, value) in row.iter() {
            *seen.entry(key).or_insert(false) |= value.is_some();
        }
    }

    seen.into_iter()
        .filter(|(_, present)| *present)
        .map(|(key, _)| key.to_string())
        .collect()
}
