//! Error handling for report generation
//!
//! The library surfaces typed `ReportError`s so callers can tell a missing
//! sheet from a schema problem. The binary wraps them in anyhow for context
//! chaining.

use thiserror::Error;

/// Errors produced while loading, deriving, or rendering a transition report
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Missing sheet: {logical}. Check the workbook export.")]
    MissingSheet { logical: String },

    #[error("schema error in '{sheet}': {detail}")]
    Schema { sheet: String, detail: String },

    #[error("cannot compute {quantity}: {denominator} is zero")]
    Division {
        quantity: String,
        denominator: String,
    },

    #[error("could not decode logo image: {0}")]
    AssetDecode(String),

    #[error("access denied: {0}")]
    Unauthorized(String),

    #[error("invalid label rule '{pattern}': {source}")]
    InvalidRule {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("render error: {0}")]
    Render(#[from] lopdf::Error),

    #[error("cannot compute {quantity}: result is outside the decimal range")]
    Overflow { quantity: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReportError {
    /// Schema error for a required column that the sheet does not carry
    pub fn missing_column(sheet: &str, column: &str) -> Self {
        ReportError::Schema {
            sheet: sheet.to_string(),
            detail: format!("missing required column '{}'", column),
        }
    }
}

/// Result type alias for library operations
pub type Result<T> = std::result::Result<T, ReportError>;
