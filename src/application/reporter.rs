use std::path::Path;

use colored::Colorize;
use supports_color::Stream;

use crate::treemap::{MaterializeReport, Progress};

/// Enables colored output only when stdout can display it.
pub fn configure_colors() {
    colored::control::set_override(supports_color::on(Stream::Stdout).is_some());
}

/// User-facing progress output on stdout. Diagnostics go through `tracing` instead.
#[derive(Debug, Default)]
pub struct Reporter;

impl Reporter {
    pub fn parsing(&self) {
        println!("Parsing treemap...\n");
    }

    pub fn found(&self, count: usize) {
        println!("Found {count} items\n");
    }

    pub fn progress(&self, progress: Progress<'_>) {
        println!("{}", progress_line(progress));
    }

    pub fn done(&self, report: &MaterializeReport) {
        println!("\n{}", summary_lines(report).join("\n"));
    }

    pub fn saved(&self, path: &Path) {
        println!("Tree structure saved to '{}'", path.display());
    }
}

fn progress_line(progress: Progress<'_>) -> String {
    match progress {
        Progress::CreatedDirectory(path) => {
            format!("📁 Created directory: {}", path.display().to_string().blue())
        }
        Progress::CreatedFile(path) => format!("📄 Created file: {}", path.display()),
        Progress::SkippedFile(path) => format!(
            "{} {}",
            "⏭  Skipped existing file:".yellow(),
            path.display()
        ),
    }
}

fn summary_lines(report: &MaterializeReport) -> Vec<String> {
    let mut lines = vec![
        "✅ Done!".green().bold().to_string(),
        format!("   Created {} directories", report.directories_created),
        format!("   Created {} files", report.files_created),
    ];
    if report.files_skipped > 0 {
        lines.push(format!("   Skipped {} existing files", report.files_skipped));
    }
    lines
}
