//! Output formatters for savestate reports.
//!
//! This module provides trait-based formatters for rendering a [`Report`]
//! in various output formats (human-readable, JSON, compact).

use crate::types::Report;

/// Trait for formatting savestate reports.
///
/// Implementors provide methods for rendering each component of a report,
/// plus a method to render the complete report.
pub trait ReportFormatter {
    /// Format the file path header.
    fn format_file(&self, report: &Report) -> String;

    /// Format the detected emulator and RAM view.
    fn format_detection(&self, report: &Report) -> Option<String>;

    /// Format the matched definitions entry.
    fn format_entry(&self, report: &Report) -> Option<String>;

    /// Format the written output file.
    fn format_output(&self, report: &Report) -> Option<String>;

    /// Format the complete report.
    ///
    /// Default implementation concatenates all component outputs.
    fn format_report(&self, report: &Report) -> String {
        let mut parts = vec![self.format_file(report)];

        if let Some(s) = self.format_detection(report) {
            parts.push(s);
        }
        if let Some(s) = self.format_entry(report) {
            parts.push(s);
        }
        if let Some(s) = self.format_output(report) {
            parts.push(s);
        }

        parts.join("")
    }
}

/// Human-readable output formatter.
#[derive(Debug, Clone, Default)]
pub struct HumanFormatter {
    /// Show verbose output (candidate systems, container)
    pub verbose: bool,
    /// Quiet mode (minimal output)
    pub quiet: bool,
}

impl HumanFormatter {
    /// Create a new human formatter with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a verbose formatter.
    pub fn verbose() -> Self {
        Self {
            verbose: true,
            quiet: false,
        }
    }

    /// Create a quiet formatter.
    pub fn quiet() -> Self {
        Self {
            verbose: false,
            quiet: true,
        }
    }
}

impl ReportFormatter for HumanFormatter {
    fn format_file(&self, report: &Report) -> String {
        format!("File: {}\n", report.file.display())
    }

    fn format_detection(&self, report: &Report) -> Option<String> {
        let mut s = format!("  Emulator:   {}\n", report.emulator);
        match (report.ram_size, &report.decode_error) {
            (Some(size), _) => s.push_str(&format!("  RAM:        {} bytes\n", size)),
            (None, Some(err)) => s.push_str(&format!("  RAM:        not extracted ({})\n", err)),
            (None, None) => {}
        }
        if self.verbose {
            s.push_str(&format!("  Systems:    {}\n", report.systems.join(", ")));
            if report.from_container {
                s.push_str("  Container:  zip\n");
            }
        }
        Some(s)
    }

    fn format_entry(&self, report: &Report) -> Option<String> {
        let key = report.entry.as_ref()?;
        Some(format!("  Entry:      {} ({} rows)\n", key, report.rows))
    }

    fn format_output(&self, report: &Report) -> Option<String> {
        let output = report.output.as_ref()?;
        Some(format!(
            "  Written:    {} ({} bytes)\n",
            output.display(),
            report.bytes_written
        ))
    }

    fn format_report(&self, report: &Report) -> String {
        if self.quiet {
            // Quiet mode: just the written file, or "path: emulator"
            return match &report.output {
                Some(output) => format!("{}\n", output.display()),
                None => format!("{}: {}\n", report.file.display(), report.emulator),
            };
        }

        let mut parts = vec![self.format_file(report)];
        parts.extend(self.format_detection(report));
        parts.extend(self.format_entry(report));
        parts.extend(self.format_output(report));
        parts.push(String::from("\n"));
        parts.join("")
    }
}

/// JSON output formatter.
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    /// Pretty-print JSON
    pub pretty: bool,
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl JsonFormatter {
    /// Create a new JSON formatter with pretty printing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a compact JSON formatter.
    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl ReportFormatter for JsonFormatter {
    fn format_file(&self, _report: &Report) -> String {
        String::new() // Handled in format_report
    }

    fn format_detection(&self, _report: &Report) -> Option<String> {
        None
    }

    fn format_entry(&self, _report: &Report) -> Option<String> {
        None
    }

    fn format_output(&self, _report: &Report) -> Option<String> {
        None
    }

    fn format_report(&self, report: &Report) -> String {
        let json = if self.pretty {
            serde_json::to_string_pretty(report)
        } else {
            serde_json::to_string(report)
        };
        let mut s = json.unwrap_or_else(|_| "{}".to_string());
        s.push('\n');
        s
    }
}

/// Compact single-line output formatter.
#[derive(Debug, Clone, Default)]
pub struct ShortFormatter;

impl ShortFormatter {
    /// Create a new short formatter.
    pub fn new() -> Self {
        Self
    }
}

impl ReportFormatter for ShortFormatter {
    fn format_file(&self, report: &Report) -> String {
        report.file.display().to_string()
    }

    fn format_detection(&self, report: &Report) -> Option<String> {
        let ram = report
            .ram_size
            .map_or_else(|| "-".to_string(), |size| size.to_string());
        Some(format!("\t{}\t{}", report.emulator, ram))
    }

    fn format_entry(&self, report: &Report) -> Option<String> {
        Some(format!("\t{}", report.entry.as_deref().unwrap_or("-")))
    }

    fn format_output(&self, report: &Report) -> Option<String> {
        let output = report
            .output
            .as_ref()
            .map_or_else(|| "-".to_string(), |p| p.display().to_string());
        Some(format!("\t{}\n", output))
    }
}
