use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod formatters;

#[derive(Parser)]
#[command(name = "transition-report")]
#[command(version, about = "Portfolio transition report generator")]
#[command(
    long_about = "Build a two-page client-facing PDF from a portfolio transition workbook export: asset allocation changes, realized gains and estimated tax, and the largest buys and sells."
)]
pub struct Cli {
    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Configuration file (defaults to $XDG_CONFIG_HOME/transition-report/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the PDF report for a client
    Generate {
        /// Path to the transition workbook (xlsx, xls, xlsb, ods)
        workbook: PathBuf,

        /// Client name printed in the report header
        #[arg(short, long)]
        client: String,

        /// PNG logo drawn in the header instead of the default
        #[arg(short, long, value_name = "PNG")]
        logo: Option<PathBuf>,

        /// Output file (defaults to "<client>_Transition_Analysis.pdf")
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Access password, when one is configured
        #[arg(long)]
        password: Option<String>,
    },

    /// Show the derived report data without rendering a PDF
    Preview {
        /// Path to the transition workbook
        workbook: PathBuf,

        /// Client name
        #[arg(short, long, default_value = "Client")]
        client: String,

        /// Access password, when one is configured
        #[arg(long)]
        password: Option<String>,

        /// Output results in JSON format
        #[arg(long)]
        json: bool,
    },

    /// List workbook sheets and which logical sheet each one resolves to
    Sheets {
        /// Path to the transition workbook
        workbook: PathBuf,
    },
}
