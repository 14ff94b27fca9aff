//! Terminal report formatting.
//!
//! Renders the end-of-run summary and the folder statistics as colored
//! tables, or as JSON for scripts. Rendering returns strings so the tables
//! can be tested; the `print_*` helpers write them to stdout.

use crate::category::{Category, ExtensionTable};
use crate::organizer::OrganizeReport;
use crate::stats::format_size;
use colored::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Everything the JSON output contains.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub directory: String,
    pub dry_run: bool,
    pub elapsed_seconds: f64,
    #[serde(flatten)]
    pub report: &'a OrganizeReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_sizes: Option<&'a BTreeMap<String, u64>>,
}

pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Renders organized-file counts per category plus the run counters.
    pub fn summary_table(report: &OrganizeReport) -> String {
        let width = report
            .by_category
            .keys()
            .map(|c| c.dir_name().len())
            .max()
            .unwrap_or(0)
            .max(8);

        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = width
        );
        let _ = writeln!(out, "{}", "-".repeat(width + 10));

        for (category, count) in &report.by_category {
            let _ = writeln!(
                out,
                "{:<width$} | {} {}",
                category.dir_name(),
                count.to_string().green(),
                plural(*count),
                width = width
            );
        }

        let _ = writeln!(out, "{}", "-".repeat(width + 10));
        let _ = writeln!(
            out,
            "{:<width$} | {} {}",
            "Organized".bold(),
            report.organized_files.to_string().green().bold(),
            plural(report.organized_files),
            width = width
        );
        let _ = writeln!(
            out,
            "{:<width$} | {} {}",
            "Skipped".bold(),
            report.skipped_files.to_string().yellow(),
            plural(report.skipped_files),
            width = width
        );
        let _ = writeln!(
            out,
            "{:<width$} | {} {}",
            "Total".bold(),
            report.total_files,
            plural(report.total_files),
            width = width
        );
        out
    }

    /// Renders folder sizes with human-readable units.
    pub fn sizes_table(sizes: &BTreeMap<String, u64>) -> String {
        let width = sizes.keys().map(String::len).max().unwrap_or(0).max(6);

        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<width$} | {}",
            "Folder".bold(),
            "Size".bold(),
            width = width
        );
        let _ = writeln!(out, "{}", "-".repeat(width + 14));
        for (folder, size) in sizes {
            let _ = writeln!(
                out,
                "{:<width$} | {}",
                folder,
                format_size(*size).cyan(),
                width = width
            );
        }
        out
    }

    /// Renders the built-in extension table.
    pub fn categories_table(table: &ExtensionTable) -> String {
        let mut out = String::new();
        for category in Category::ALL {
            let extensions = table.extensions(category);
            let listed = if extensions.is_empty() {
                "(anything else)".dimmed().to_string()
            } else {
                extensions.join(" ")
            };
            let _ = writeln!(out, "{:<10} {}", category.dir_name().bold(), listed);
        }
        out
    }

    pub fn print_summary(report: &OrganizeReport) {
        Self::header("SUMMARY");
        print!("{}", Self::summary_table(report));
    }

    pub fn print_sizes(sizes: &BTreeMap<String, u64>) {
        Self::header("CATEGORY STATISTICS");
        if sizes.is_empty() {
            println!("No folders found.");
        } else {
            print!("{}", Self::sizes_table(sizes));
        }
    }

    pub fn print_json(report: &JsonReport<'_>) -> serde_json::Result<()> {
        println!("{}", serde_json::to_string_pretty(report)?);
        Ok(())
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}
