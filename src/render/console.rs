use std::io::{self, Write};

use comfy_table::{presets::UTF8_FULL, Table};

use super::{RenderError, ReportSink};
use crate::config;
use crate::models::enums::ViewMode;
use crate::report::{ChartPoint, Report, ReportSection};

/// Prints sections as comfy-table tables or text bar charts.
pub struct ConsoleSink<W: Write> {
    out: W,
}

impl ConsoleSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for ConsoleSink<W> {
    fn begin(&mut self, report: &Report) -> Result<(), RenderError> {
        writeln!(self.out, "{} Operations Report", config::APP_NAME)?;
        writeln!(self.out, "Generated: {}", report.generated_at)?;
        writeln!(self.out, "Filters:   {}", report.filter)?;
        Ok(())
    }

    fn render_section(&mut self, section: &ReportSection, mode: ViewMode) -> Result<(), RenderError> {
        writeln!(self.out)?;
        writeln!(self.out, "{}", section.title)?;
        writeln!(self.out, "{}", "-".repeat(section.title.chars().count()))?;

        if section.data.is_empty() {
            writeln!(self.out, "(no data)")?;
        } else {
            match mode {
                ViewMode::Table => {
                    let mut table = Table::new();
                    table
                        .load_preset(UTF8_FULL)
                        .set_header(section.data.headers().iter().copied());
                    for row in section.data.cells() {
                        table.add_row(row);
                    }
                    writeln!(self.out, "{table}")?;
                }
                ViewMode::Chart => {
                    let points = section.data.chart_points();
                    for line in bar_chart(&points, config::CHART_BAR_WIDTH) {
                        writeln!(self.out, "{line}")?;
                    }
                }
            }
        }

        if section.excluded > 0 {
            writeln!(
                self.out,
                "({} rows left out: missing or unparseable values)",
                section.excluded
            )?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), RenderError> {
        self.out.flush()?;
        Ok(())
    }
}

/// Horizontal bars scaled so the largest value spans `width` cells.
fn bar_chart(points: &[ChartPoint], width: usize) -> Vec<String> {
    let label_width = points
        .iter()
        .map(|p| p.label.chars().count())
        .max()
        .unwrap_or(0);
    let max = points.iter().map(|p| p.value).fold(0.0_f64, f64::max);

    points
        .iter()
        .map(|p| {
            let len = if max > 0.0 {
                ((p.value.max(0.0) / max) * width as f64).round() as usize
            } else {
                0
            };
            format!(
                "{:<label_width$} │{} {}",
                p.label,
                "█".repeat(len),
                p.display
            )
        })
        .collect()
}
