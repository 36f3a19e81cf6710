mod json;
mod terminal;

pub use json::JsonReporter;
pub use terminal::TerminalReporter;

use crate::classpath::ClasspathSummary;
use miette::Result;
use std::path::PathBuf;

/// Output format for run summaries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Terminal,
    Json,
}

/// Routes a run summary to the terminal, to stdout as JSON, or to a JSON file
pub struct Reporter {
    format: ReportFormat,
    output_path: Option<PathBuf>,
    show_removable: bool,
    quiet: bool,
}

impl Reporter {
    pub fn new(format: ReportFormat, output_path: Option<PathBuf>) -> Self {
        Self {
            format,
            output_path,
            show_removable: false,
            quiet: false,
        }
    }

    /// List removable units in the terminal summary
    pub fn with_removable(mut self, show: bool) -> Self {
        self.show_removable = show;
        self
    }

    /// Skip the terminal summary; a report file is still written
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn report(&self, summary: &ClasspathSummary) -> Result<()> {
        match self.format {
            ReportFormat::Terminal => {
                if !self.quiet {
                    TerminalReporter::new()
                        .with_removable(self.show_removable)
                        .report(summary)?;
                }
                if self.output_path.is_some() {
                    JsonReporter::new(self.output_path.clone()).report(summary)?;
                }
                Ok(())
            }
            ReportFormat::Json => JsonReporter::new(self.output_path.clone()).report(summary),
        }
    }
}
