use crate::classpath::{ClasspathEntry, ClasspathSummary, EntryAction};
use colored::Colorize;
use miette::Result;

/// Terminal reporter with colored output
pub struct TerminalReporter {
    /// List every removable unit, not just the count
    show_removable: bool,
}

impl TerminalReporter {
    pub fn new() -> Self {
        Self { show_removable: false }
    }

    pub fn with_removable(mut self, show: bool) -> Self {
        self.show_removable = show;
        self
    }

    pub fn report(&self, summary: &ClasspathSummary) -> Result<()> {
        if summary.entries.is_empty() {
            println!("{}", "No artifacts on the classpath.".yellow());
            return Ok(());
        }

        println!();
        println!(
            "{}",
            format!("Classpath of {} archives:", summary.entries.len())
                .bold()
        );

        for entry in &summary.entries {
            self.print_entry(entry);
        }
        println!();

        if summary.unit_count > 0 {
            println!(
                "{}",
                format!(
                    "{} units, {} entry points, {} removable",
                    summary.unit_count,
                    summary.entry_point_count,
                    summary.removable.len()
                )
                .cyan()
            );

            if self.show_removable {
                for name in &summary.removable {
                    println!("  {} {}", "-".red(), name.dimmed());
                }
            }
        }

        println!(
            "{} {}",
            "Manifest:".dimmed(),
            summary.manifest.display().to_string().green()
        );

        Ok(())
    }

    fn print_entry(&self, entry: &ClasspathEntry) {
        let action = match entry.action {
            EntryAction::Copied => "copied".blue(),
            EntryAction::Repackaged => "repackaged".green(),
        };

        let mut details = Vec::new();
        if let Some(stats) = entry.stats {
            if entry.minified {
                details.push(format!("-{} classes", stats.removed));
            }
            if entry.transformed {
                details.push(format!("{} transformed", stats.transformed));
            }
        }

        let details = if details.is_empty() {
            String::new()
        } else {
            format!(" ({})", details.join(", "))
        };

        println!(
            "  {:>10} {} {}{}",
            action,
            entry.file_name.bold(),
            entry.coordinates.dimmed(),
            details.yellow()
        );
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}
