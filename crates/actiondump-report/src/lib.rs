#![warn(clippy::unwrap_used, clippy::expect_used)]

//! Turns fetched Zabbix actions into report rows.
//!
//! The pipeline has two halves: [`lookup`] gathers every foreign identifier
//! referenced anywhere in the action set and resolves each category with a
//! single batched API call; [`render`] is a pure pass that formats
//! conditions and operations against the resulting tables. [`row`] flattens
//! one action into a CSV record and writes the file.

pub mod error;
pub mod lookup;
pub mod render;
pub mod row;

pub use error::{ReportError, Result};
pub use lookup::{IdSets, LookupKind, LookupTables};
pub use row::{render_all, write_csv, write_csv_file, ReportRow, COLUMNS};
