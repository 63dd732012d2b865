//! Command dispatcher that routes parsed clap commands to their handlers.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::cli::{formatters, Commands};
use transition_report::access::{AccessGate, AccessToken};
use transition_report::config::ReportConfig;
use transition_report::generator::{
    generate_report, prepare_model, ReportRequest, WorkbookSource,
};
use transition_report::importers::load_workbook;
use transition_report::reports::{PdfRenderer, REPORT_TITLE};

/// Route a parsed command to its handler
pub fn dispatch_command(command: Commands, config: &ReportConfig) -> Result<()> {
    match command {
        Commands::Generate {
            workbook,
            client,
            logo,
            output,
            password,
        } => dispatch_generate(config, workbook, client, logo, output, password.as_deref()),
        Commands::Preview {
            workbook,
            client,
            password,
            json,
        } => dispatch_preview(config, workbook, client, password.as_deref(), json),
        Commands::Sheets { workbook } => dispatch_sheets(config, &workbook),
    }
}

fn authorize(config: &ReportConfig, password: Option<&str>) -> Result<AccessToken> {
    let gate = AccessGate::new(config.access.password.clone());
    let token = gate.authorize(password)?;
    Ok(token)
}

/// "Jane Doe" -> "Jane_Doe_Transition_Analysis.pdf"
fn default_output_path(client: &str) -> PathBuf {
    let stem: String = client
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    let stem = if stem.is_empty() { "Client".to_string() } else { stem };
    PathBuf::from(format!("{}_Transition_Analysis.pdf", stem))
}

fn dispatch_generate(
    config: &ReportConfig,
    workbook: PathBuf,
    client: String,
    logo: Option<PathBuf>,
    output: Option<PathBuf>,
    password: Option<&str>,
) -> Result<()> {
    let token = authorize(config, password)?;
    let output = output.unwrap_or_else(|| default_output_path(&client));

    let mut request = ReportRequest::new(WorkbookSource::Path(workbook.clone()), client.clone());
    if let Some(logo) = logo {
        request = request.with_logo(logo);
    }

    let renderer = PdfRenderer::with_title(format!("{} - {}", REPORT_TITLE, client));
    let document = generate_report(&token, request, config, &renderer)
        .with_context(|| format!("Failed to generate report from {:?}", workbook))?;

    fs::write(&output, &document)
        .with_context(|| format!("Failed to write report to {:?}", output))?;
    info!("Wrote {} bytes to {:?}", document.len(), output);

    println!("{}", formatters::format_report_written(&output, document.len()));
    Ok(())
}

fn dispatch_preview(
    config: &ReportConfig,
    workbook: PathBuf,
    client: String,
    password: Option<&str>,
    json: bool,
) -> Result<()> {
    let token = authorize(config, password)?;
    let request = ReportRequest::new(WorkbookSource::Path(workbook.clone()), client);
    let model = prepare_model(&token, request, config)
        .with_context(|| format!("Failed to read transition data from {:?}", workbook))?;

    if json {
        println!("{}", formatters::format_preview_json(&model));
    } else {
        println!("{}", formatters::format_preview_table(&model));
    }
    Ok(())
}

fn dispatch_sheets(config: &ReportConfig, workbook: &Path) -> Result<()> {
    let loaded = load_workbook(workbook)
        .with_context(|| format!("Failed to open workbook {:?}", workbook))?;
    println!(
        "{}",
        formatters::format_sheet_resolution(&loaded, &config.sheets)
    );
    Ok(())
}
