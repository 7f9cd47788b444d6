//! Render sinks: where a computed report goes.
//!
//! A sink sees the report header once, then every section in dashboard
//! order with the view mode it should be drawn in, then `finish`.

mod console;
mod json;

pub use console::*;
pub use json::*;

use thiserror::Error;

use crate::models::enums::ViewMode;
use crate::report::{Report, ReportSection};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub trait ReportSink {
    fn begin(&mut self, _report: &Report) -> Result<(), RenderError> {
        Ok(())
    }

    fn render_section(&mut self, section: &ReportSection, mode: ViewMode)
        -> Result<(), RenderError>;

    fn finish(&mut self) -> Result<(), RenderError> {
        Ok(())
    }
}
