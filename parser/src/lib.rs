//! Parsing of SOLAR `polygenic.out` reports.
//!
//! A report starts with a block of `label: value...` metadata terminated by a
//! blank line, followed by indented result statements:
//!
//! ```text
//! Pedigree:    ped.csv
//! Trait:       sbp dbp            Individuals:  1023
//!
//! 		H2r(sbp) is 0.4123456  p = 1.2000000e-05
//!         H2r(sbp) Std. Error:  0.0812345
//! 		RhoG is 0.6012345
//! 		RhoG different from zero  p = 0.0012345
//! ```
//!
//! # Main entry points
//!
//! - [`read_report`] — parse any buffered text stream.
//! - [`read_report_file`] — open and parse one file, classifying access
//!   failures separately from content failures ([`ReadError`]).
//! - [`resolve_input`] — map a SOLAR output directory to its
//!   `polygenic.out`.
//!
//! Parsed reports are combined into a table with
//! [`solar_tabulate_core::build_table`].

mod input;
mod lines;
pub mod metadata;
mod report;
pub mod statement;

pub use input::{REPORT_FILE_NAME, ReadError, read_report_file, resolve_input};
pub use metadata::INCOMPLETE_RUN_SENTINEL;
pub use report::read_report;
