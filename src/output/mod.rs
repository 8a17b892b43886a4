//! Output module for reporting run results
//!
//! This module handles:
//! - Building the end-of-run report
//! - Printing it as text or JSON

mod report;

pub use report::{print_report, RunReport};
