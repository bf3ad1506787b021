//! Output formatting and display for pdfdeck.
//!
//! This module handles all user-facing output including:
//! - Formatted status messages
//! - The page table, as text or JSON
//! - Load and export summaries
//!
//! # Examples
//!
//! ```no_run
//! use pdfdeck::output::OutputFormatter;
//! use pdfdeck::config::Config;
//!
//! # fn example(config: Config) {
//! let formatter = OutputFormatter::from_config(&config);
//! formatter.info("Loading documents");
//! formatter.success("Export completed successfully");
//! # }
//! ```

pub mod formatter;

pub use formatter::{MessageLevel, OutputFormatter, format_page_table};

use crate::collection::PageSummary;
use crate::error::{PdfDeckError, Result};
use crate::io::{LoadStatistics, WriteStatistics};
use crate::merge::ExportStatistics;

/// Display load statistics to the user.
pub fn display_load_statistics(formatter: &OutputFormatter, stats: &LoadStatistics) {
    if stats.failure_count > 0 {
        formatter.warning(&format!(
            "Warning: {} file(s) failed to load",
            stats.failure_count
        ));
    }

    formatter.info(&format!(
        "Loaded {} file(s) in {:.2}s: {} pages, {}",
        stats.success_count,
        stats.total_time.as_secs_f64(),
        stats.total_pages,
        stats.format_total_size()
    ));
}

/// Display the result of an export and write.
pub fn display_export_summary(
    formatter: &OutputFormatter,
    export: &ExportStatistics,
    write: &WriteStatistics,
) {
    formatter.success(&format!(
        "Wrote {} page(s) to {} ({})",
        export.total_pages,
        write.output_path.display(),
        write.format_file_size()
    ));
    formatter.detail("Sources", &export.sources.to_string());
    formatter.detail("Bookmarks", &export.bookmarks_added.to_string());
    formatter.detail("Compressed", if export.compressed { "yes" } else { "no" });
    formatter.detail(
        "Time",
        &format!(
            "{:.2}s export, {:.2}s write",
            export.export_time.as_secs_f64(),
            write.write_time.as_secs_f64()
        ),
    );
}

/// Serialize page table rows as pretty-printed JSON.
pub fn page_table_json(rows: &[PageSummary]) -> Result<String> {
    serde_json::to_string_pretty(rows)
        .map_err(|e| PdfDeckError::other(format!("Failed to serialize page table: {e}")))
}
