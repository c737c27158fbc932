//! Core report types and table assembly for SOLAR `polygenic.out` results.
//!
//! This crate defines the structured form of one parsed report and the
//! reconciliation of many reports into a single wide table:
//!
//! - [`Report`] — metadata, analyzed traits and statistical findings recovered
//!   from one `polygenic.out` file.
//! - [`ValueRecord`] — one statistic (value, p-value, standard error and
//!   difference tests) keyed by [`StatKey`].
//! - [`Table`] — the column-consistent table built by [`build_table`], with
//!   trait-letter shorthand columns and all-missing columns suppressed.
//!
//! Parsing lives in the `solar-tabulate-parser` crate; this crate only knows
//! about already-structured data.
//!
//! # Example
//!
//! ```
//! use solar_tabulate_core::*;
//!
//! let mut metadata = Metadata::new();
//! metadata.insert("Trait".into(), vec!["bmi".into()]);
//! metadata.insert("Individuals".into(), vec!["1200".into()]);
//!
//! let mut values = StatValues::new();
//! values.insert(
//!     StatKey::for_trait("H2r", "bmi"),
//!     ValueRecord::new("0.41", Some("1.2e-05")),
//! );
//!
//! let report = Report::new(metadata, values).unwrap();
//! let table = build_table(&[report]).unwrap();
//!
//! assert_eq!(table.header, ["A", "Individuals", "H2r.A", "H2r.A.pvalue"]);
//! assert_eq!(table.rows[0].get("H2r.A"), Some("0.41"));
//! ```

mod error;
mod table;
mod types;

pub use error::{ParseError, Result, TableError};
pub use table::{Row, Table, TraitLetters, build_header, build_row, build_table};
pub use types::*;
