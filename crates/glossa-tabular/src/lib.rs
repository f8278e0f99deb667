//! Glossa Tabular Layer
//!
//! Parses row-oriented files (CSV/TSV, JSON, XLSX) into a uniform row set and
//! summarizes them into per-column profiles.
//!
//! # Architecture
//!
//! ```text
//! bytes → rows::parse_rows → RowSet → profiler::profile_rows → TableProfile
//!                                          │
//!                                          └─ detect::detect_type per column
//! ```
//!
//! # Key Behaviors
//!
//! - **Bounded inspection**: only the first `max_rows` rows are profiled; a
//!   warning records how many of how many rows were analyzed
//! - **Ordered recognizers**: type detection tests a fixed priority list of
//!   regular-expression recognizers; the order is part of the contract
//! - **Graceful absence**: an empty row set produces an empty profile list,
//!   not an error

#![warn(missing_docs)]

mod detect;
mod error;
mod profiler;
mod rows;
mod xlsx;

pub use detect::{detect_type, looks_like_date, recognize};
pub use error::TabularError;
pub use profiler::{profile_rows, ProfileLimits, TableProfile};
pub use rows::{parse_rows, RowSet};
