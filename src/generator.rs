//! Report generation entry point
//!
//! One call runs the whole chain: load the workbook, resolve the logo, build
//! the model, compose the pages, render. Every fatal error surfaces before any
//! bytes are produced.

use std::path::PathBuf;
use tracing::info;

use crate::access::AccessToken;
use crate::config::ReportConfig;
use crate::error::Result;
use crate::importers::{load_workbook, load_workbook_from_bytes, Workbook};
use crate::reports::{compose, resolve_logo, ComposeOptions, DocumentRenderer};
use crate::transition::{build_report_model, ReportModel};

/// Where the transition export comes from
#[derive(Debug, Clone)]
pub enum WorkbookSource {
    Path(PathBuf),
    /// Raw file contents, e.g. an upload
    Bytes(Vec<u8>),
}

impl WorkbookSource {
    pub fn load(self) -> Result<Workbook> {
        match self {
            WorkbookSource::Path(path) => load_workbook(path),
            WorkbookSource::Bytes(bytes) => load_workbook_from_bytes(bytes),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub workbook: WorkbookSource,
    pub client_name: String,
    /// Logo supplied with this request; takes precedence over the configured default
    pub logo: Option<PathBuf>,
}

impl ReportRequest {
    pub fn new(workbook: WorkbookSource, client_name: impl Into<String>) -> Self {
        Self {
            workbook,
            client_name: client_name.into(),
            logo: None,
        }
    }

    pub fn with_logo(mut self, logo: impl Into<PathBuf>) -> Self {
        self.logo = Some(logo.into());
        self
    }
}

/// Load the workbook and derive the report model without rendering
pub fn prepare_model(
    _token: &AccessToken,
    request: ReportRequest,
    config: &ReportConfig,
) -> Result<ReportModel> {
    let workbook = request.workbook.load()?;
    let logo = resolve_logo(request.logo.as_deref(), config.default_logo.as_deref());
    build_report_model(&workbook, &request.client_name, logo, config)
}

/// Generate the complete report document
pub fn generate_report<R: DocumentRenderer + ?Sized>(
    token: &AccessToken,
    request: ReportRequest,
    config: &ReportConfig,
    renderer: &R,
) -> Result<Vec<u8>> {
    let model = prepare_model(token, request, config)?;
    let composed = compose(&model, &ComposeOptions::from_config(config));
    let document = renderer.render(&composed)?;

    info!(
        "Generated report for '{}' ({} bytes)",
        model.client_name,
        document.len()
    );
    Ok(document)
}

/// Caller-facing result: either a document or a single message, never both
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOutcome(Outcome);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Outcome {
    Document(Vec<u8>),
    Failed(String),
}

impl ReportOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.0, Outcome::Document(_))
    }

    pub fn document(&self) -> Option<&[u8]> {
        match &self.0 {
            Outcome::Document(bytes) => Some(bytes),
            Outcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.0 {
            Outcome::Document(_) => None,
            Outcome::Failed(message) => Some(message),
        }
    }

    pub fn into_document(self) -> Option<Vec<u8>> {
        match self.0 {
            Outcome::Document(bytes) => Some(bytes),
            Outcome::Failed(_) => None,
        }
    }
}

impl From<Result<Vec<u8>>> for ReportOutcome {
    fn from(result: Result<Vec<u8>>) -> Self {
        match result {
            Ok(document) => Self(Outcome::Document(document)),
            Err(e) => Self(Outcome::Failed(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::AccessGate;
    use crate::error::ReportError;
    use crate::reports::PdfRenderer;

    #[test]
    fn test_outcome_from_success() {
        let outcome = ReportOutcome::from(Ok(b"%PDF-".to_vec()));
        assert!(outcome.is_success());
        assert_eq!(outcome.document(), Some(&b"%PDF-"[..]));
        assert!(outcome.error().is_none());
        assert_eq!(outcome.into_document(), Some(b"%PDF-".to_vec()));
    }

    #[test]
    fn test_outcome_from_failure() {
        let outcome = ReportOutcome::from(Err(ReportError::MissingSheet {
            logical: "Gain Loss Details".to_string(),
        }));
        assert!(!outcome.is_success());
        assert!(outcome.document().is_none());
        assert!(outcome.clone().into_document().is_none());
        assert_eq!(
            outcome.error(),
            Some("Missing sheet: Gain Loss Details. Check the workbook export.")
        );
    }

    #[test]
    fn test_unreadable_bytes_fail_before_rendering() {
        let token = AccessGate::open().authorize(None).unwrap();
        let request = ReportRequest::new(WorkbookSource::Bytes(b"not a workbook".to_vec()), "X");
        let result = generate_report(
            &token,
            request,
            &ReportConfig::default(),
            &PdfRenderer::default(),
        );
        assert!(result.is_err());
    }
}
