use crate::classpath::{ClasspathEntry, ClasspathSummary};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::Path;

/// JSON reporter for programmatic output
pub struct JsonReporter {
    output_path: Option<std::path::PathBuf>,
}

impl JsonReporter {
    pub fn new(output_path: Option<std::path::PathBuf>) -> Self {
        Self { output_path }
    }

    pub fn report(&self, summary: &ClasspathSummary) -> Result<()> {
        let json = render(summary)?;

        if let Some(path) = &self.output_path {
            std::fs::write(path, &json).into_diagnostic()?;
            println!("Report written to: {}", path.display());
        } else {
            println!("{}", json);
        }

        Ok(())
    }
}

/// Pretty-printed JSON for a summary
pub fn render(summary: &ClasspathSummary) -> Result<String> {
    serde_json::to_string_pretty(&JsonReport::from_summary(summary)).into_diagnostic()
}

#[derive(Serialize)]
struct JsonReport<'a> {
    version: &'static str,
    output_directory: &'a Path,
    manifest: &'a Path,
    classpath: &'a [ClasspathEntry],
    minification: JsonMinification<'a>,
    totals: JsonTotals,
}

#[derive(Serialize)]
struct JsonMinification<'a> {
    units: usize,
    entry_points: usize,
    removable: &'a [String],
}

#[derive(Serialize)]
struct JsonTotals {
    archives: usize,
    removed_members: usize,
    transformed_members: usize,
}

impl<'a> JsonReport<'a> {
    fn from_summary(summary: &'a ClasspathSummary) -> Self {
        Self {
            version: "1.0",
            output_directory: &summary.output_directory,
            manifest: &summary.manifest,
            classpath: &summary.entries,
            minification: JsonMinification {
                units: summary.unit_count,
                entry_points: summary.entry_point_count,
                removable: &summary.removable,
            },
            totals: JsonTotals {
                archives: summary.entries.len(),
                removed_members: summary.removed_members(),
                transformed_members: summary.transformed_members(),
            },
        }
    }
}
