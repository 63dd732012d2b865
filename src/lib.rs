//! Transition Report - client-facing portfolio transition PDFs
//!
//! This library reads a portfolio transition workbook export, derives the
//! allocation changes, largest trades and tax impact, and lays them out as a
//! two-page US Letter report.

pub mod access;
pub mod config;
pub mod error;
pub mod generator;
pub mod importers;
pub mod reports;
pub mod transition;
pub mod utils;

pub use error::{ReportError, Result};
pub use generator::{generate_report, ReportOutcome, ReportRequest, WorkbookSource};
