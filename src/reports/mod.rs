// Reports module - page composition and document rendering

pub mod composer;
pub mod layout;
pub mod logo;
pub mod pdf;

pub use composer::{compose, ComposeOptions, PAGE_COUNT, REPORT_TITLE};
pub use layout::ComposedReport;
pub use logo::{resolve_logo, LogoImage};
pub use pdf::{DocumentRenderer, PdfRenderer};
