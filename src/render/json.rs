use std::io::Write;

use serde::Serialize;

use super::{RenderError, ReportSink};
use crate::config;
use crate::models::enums::ViewMode;
use crate::models::ReportFilter;
use crate::report::{Report, ReportSection};

#[derive(Debug, Serialize)]
struct JsonSection {
    view: ViewMode,
    #[serde(flatten)]
    section: ReportSection,
}

#[derive(Debug, Serialize)]
struct JsonDocument<'a> {
    app: &'static str,
    version: &'static str,
    generated_at: Option<&'a str>,
    filter: Option<&'a ReportFilter>,
    sections: &'a [JsonSection],
}

/// Buffers every section and writes one JSON document on `finish`, so a
/// reader never sees half a report.
pub struct JsonSink<W: Write> {
    out: W,
    header: Option<(String, ReportFilter)>,
    sections: Vec<JsonSection>,
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            header: None,
            sections: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for JsonSink<W> {
    fn begin(&mut self, report: &Report) -> Result<(), RenderError> {
        self.header = Some((report.generated_at.clone(), report.filter.clone()));
        self.sections.clear();
        Ok(())
    }

    fn render_section(&mut self, section: &ReportSection, mode: ViewMode) -> Result<(), RenderError> {
        self.sections.push(JsonSection {
            view: mode,
            section: section.clone(),
        });
        Ok(())
    }

    fn finish(&mut self) -> Result<(), RenderError> {
        let doc = JsonDocument {
            app: config::APP_NAME,
            version: config::APP_VERSION,
            generated_at: self.header.as_ref().map(|(at, _)| at.as_str()),
            filter: self.header.as_ref().map(|(_, filter)| filter),
            sections: &self.sections,
        };
        serde_json::to_writer_pretty(&mut self.out, &doc)?;
        writeln!(self.out)?;
        self.out.flush()?;
        self.sections.clear();
        Ok(())
    }
}
