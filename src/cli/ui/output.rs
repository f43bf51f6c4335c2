use console::style;

use crate::sync::SyncReport;

pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        println!("{} {}", style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", style("ℹ").blue(), message);
    }

    /// Counts line followed by one line per failure
    pub fn report(&self, report: &SyncReport) {
        let summary = format!(
            "{} processed, {} skipped, {} errors",
            style(report.processed).green(),
            style(report.skipped).dim(),
            if report.errors > 0 {
                style(report.errors).red()
            } else {
                style(report.errors).dim()
            }
        );

        if report.is_clean() {
            self.success(&summary);
            return;
        }

        self.warning(&summary);
        for failure in &report.failures {
            self.error(&format!("{}: {}", failure.path.display(), failure.reason));
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
