//! Output formatting utilities

use std::time::Duration;

const KB: u64 = 1024;
const MB: u64 = 1024 * KB;
const GB: u64 = 1024 * MB;

/// Format a byte count in the largest binary unit below it, rounded to
/// the nearest whole unit ("0 B", "293 KB", "931 GB").
pub fn display_file_size(bytes: u64) -> String {
    if bytes < KB {
        return format!("{} B", bytes);
    }
    if bytes < MB {
        return format!("{} KB", rounded_units(bytes, KB));
    }
    if bytes < GB {
        return format!("{} MB", rounded_units(bytes, MB));
    }
    format!("{} GB", rounded_units(bytes, GB))
}

fn rounded_units(bytes: u64, unit: u64) -> u64 {
    (bytes as f64 / unit as f64).round() as u64
}

/// Format duration in human-readable format
pub fn format_duration(duration: Duration) -> String {
    format_duration_secs(duration.as_secs_f64())
}

/// Format duration from seconds
pub fn format_duration_secs(secs: f64) -> String {
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else if secs < 3600.0 {
        let mins = (secs / 60.0).floor();
        let remaining = secs - mins * 60.0;
        format!("{}m {:.0}s", mins as u64, remaining)
    } else {
        let hours = (secs / 3600.0).floor();
        let remaining = secs - hours * 3600.0;
        let mins = (remaining / 60.0).floor();
        format!("{}h {}m", hours as u64, mins as u64)
    }
}

/// Format a count with a unit
pub fn format_count(count: u64, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

/// Format a file count
pub fn format_files(count: u64) -> String {
    format_count(count, "file", "files")
}

/// Dry run report showing what a sync would upload
pub struct DryRunReport {
    pub files_scanned: u64,
    pub files_to_upload: u64,
    pub bytes_to_upload: u64,
    pub keys: Vec<String>,
}

impl DryRunReport {
    /// Format the dry run report
    pub fn format(&self) -> String {
        let mut lines = Vec::new();

        lines.push("=== Dry Run Report ===".to_string());
        lines.push(String::new());
        for key in &self.keys {
            lines.push(format!("  would upload {}", key));
        }
        if !self.keys.is_empty() {
            lines.push(String::new());
        }
        lines.push(format!("Scanned:      {}", format_files(self.files_scanned)));
        lines.push(format!("Would upload: {}", format_files(self.files_to_upload)));
        lines.push(format!(
            "Would skip:   {}",
            format_files(self.files_scanned.saturating_sub(self.files_to_upload))
        ));
        lines.push(format!(
            "Estimated transfer: {}",
            display_file_size(self.bytes_to_upload)
        ));

        lines.join("\n")
    }

    /// Print the report to stdout
    pub fn print(&self) {
        println!("{}", self.format());
    }
}

/// Sync completion report
pub struct SyncReport {
    pub duration_secs: f64,
    pub files_planned: u64,
    pub files_uploaded: u64,
    pub bytes_uploaded: u64,
    pub errors: u64,
}

impl SyncReport {
    /// Format the sync report
    pub fn format(&self) -> String {
        let mut lines = Vec::new();

        lines.push("=== Sync Complete ===".to_string());
        lines.push(String::new());
        lines.push(format!("Duration:     {}", format_duration_secs(self.duration_secs)));
        lines.push(format!(
            "Uploaded:     {} of {}",
            self.files_uploaded, self.files_planned
        ));
        if self.errors > 0 {
            lines.push(format!("Errors:       {}", self.errors));
        }

        lines.push(String::new());
        lines.push(format!("Data uploaded: {}", display_file_size(self.bytes_uploaded)));

        if self.duration_secs > 0.0 {
            let rate = (self.bytes_uploaded as f64 / self.duration_secs) as u64;
            lines.push(format!("Upload rate:   {}/s", display_file_size(rate)));
        }

        lines.join("\n")
    }

    /// Print the report to stdout
    pub fn print(&self) {
        println!("{}", self.format());
    }
}
