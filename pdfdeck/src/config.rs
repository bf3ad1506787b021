//! Configuration module for pdfdeck.
//!
//! This module holds the validated, normalized configuration that drives a
//! pdfdeck session: which documents to load, which edits to apply, and how
//! to export. It handles:
//! - Validation of argument combinations
//! - Page range parsing for edit commands
//! - Application of defaults

use anyhow::{Context, Result, bail};

use crate::PdfDeckError;
use crate::edit::EditCommand;
use std::{fmt, path::PathBuf, str::FromStr};

/// Compression level for the output PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionLevel {
    /// No compression - preserves exact quality and structure.
    None,
    /// Balanced compression - good trade-off between size and processing time.
    #[default]
    Standard,
    /// Maximum compression - smallest file size, longer processing time.
    Maximum,
}

impl FromStr for CompressionLevel {
    type Err = crate::PdfDeckError;
    /// Parse compression level from string.
    ///
    /// # Arguments
    ///
    /// * `s` - String representation: "none", "standard", or "maximum"
    ///
    /// # Errors
    ///
    /// Returns an error if the string doesn't match a valid compression level.
    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            "maximum" => Ok(Self::Maximum),
            _ => Err(PdfDeckError::InvalidConfig {
                message: format!(
                    "Invalid compression level: {s}. Must be one of: none, standard, maximum"
                ),
            }),
        }
    }
}

/// Set of one-based positions, as used by `select`.
///
/// Supports individual positions and ranges:
/// - "1" - single position
/// - "1-5" - range of positions (inclusive)
/// - "1,3,5" - multiple individual positions
/// - "1-5,10-15" - combination of ranges
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRange {
    ranges: Vec<PageRangeItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PageRangeItem {
    Single(u32),
    Range(u32, u32),
}

impl PageRange {
    /// Parse a page range string.
    ///
    /// # Arguments
    ///
    /// * `s` - Page range string (e.g., "1-5,10,15-20")
    ///
    /// # Errors
    ///
    /// Returns an error if the string format is invalid or contains invalid page numbers.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdfdeck::config::PageRange;
    ///
    /// let range = PageRange::parse("1-5,10").unwrap();
    /// assert!(range.contains(3));
    /// assert!(range.contains(10));
    /// assert!(!range.contains(7));
    /// assert_eq!(range.last_page(), 10);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let mut ranges = Vec::new();

        for part in s.split(',') {
            let part = part.trim();

            if part.contains('-') {
                let parts: Vec<&str> = part.split('-').collect();
                if parts.len() != 2 {
                    bail!("Invalid page range format: {part}. Expected format like '1-5'");
                }

                let start: u32 = parts[0]
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid page number: {}", parts[0]))?;

                let end: u32 = parts[1]
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid page number: {}", parts[1]))?;

                if start == 0 || end == 0 {
                    bail!("Page numbers must be positive (1-indexed)");
                }

                if start > end {
                    bail!(
                        "Invalid range {start}-{end}: start page must be less than or equal to end page"
                    );
                }

                ranges.push(PageRangeItem::Range(start, end));
            } else {
                let page: u32 = part
                    .parse()
                    .with_context(|| format!("Invalid page number: {part}"))?;

                if page == 0 {
                    bail!("Page numbers must be positive (1-indexed)");
                }

                ranges.push(PageRangeItem::Single(page));
            }
        }

        if ranges.is_empty() {
            bail!("Page range cannot be empty");
        }

        Ok(Self { ranges })
    }

    /// Check if a page number is included in this range.
    ///
    /// # Arguments
    ///
    /// * `page` - 1-indexed page number
    pub fn contains(&self, page: u32) -> bool {
        self.ranges.iter().any(|item| match item {
            PageRangeItem::Single(p) => *p == page,
            PageRangeItem::Range(start, end) => page >= *start && page <= *end,
        })
    }

    /// Highest page number named by this range.
    pub fn last_page(&self) -> u32 {
        self.ranges
            .iter()
            .map(|item| match item {
                PageRangeItem::Single(p) => *p,
                PageRangeItem::Range(_, end) => *end,
            })
            .max()
            .unwrap_or(0)
    }

    /// Get all page numbers included in this range up to a maximum.
    ///
    /// # Arguments
    ///
    /// * `max_pages` - Maximum page number to consider
    ///
    /// # Returns
    ///
    /// A sorted vector of 1-indexed page numbers.
    pub fn to_pages(&self, max_pages: u32) -> Vec<u32> {
        (1..=max_pages).filter(|p| self.contains(*p)).collect()
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, item) in self.ranges.iter().enumerate() {
            if idx > 0 {
                f.write_str(",")?;
            }
            match item {
                PageRangeItem::Single(p) => write!(f, "{p}")?,
                PageRangeItem::Range(start, end) => write!(f, "{start}-{end}")?,
            }
        }
        Ok(())
    }
}

impl FromStr for PageRange {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// PDF metadata to set on the output document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    /// Document title.
    pub title: Option<String>,
    /// Document author.
    pub author: Option<String>,
    /// Document subject.
    pub subject: Option<String>,
    /// Document keywords (comma-separated).
    pub keywords: Option<String>,
}

impl Metadata {
    /// Check if any metadata fields are set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.subject.is_none()
            && self.keywords.is_none()
    }

    /// Create metadata from optional strings, trimming whitespace.
    pub fn new(
        title: Option<String>,
        author: Option<String>,
        subject: Option<String>,
        keywords: Option<String>,
    ) -> Self {
        let to_string_opt = |opt: Option<String>| {
            opt.filter(|s| !s.trim().is_empty())
                .map(|s| s.trim().to_string())
        };

        Self {
            title: to_string_opt(title),
            author: to_string_opt(author),
            subject: to_string_opt(subject),
            keywords: to_string_opt(keywords),
        }
    }
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

/// Complete configuration for a pdfdeck session.
///
/// This structure contains all settings needed to load, edit and export,
/// derived and validated from CLI arguments.
#[derive(Debug, Clone)]
pub struct Config {
    /// Input PDF file paths (in load order).
    pub inputs: Vec<PathBuf>,

    /// Output PDF file path.
    pub output: PathBuf,

    /// Edit commands applied after loading, in order.
    pub edits: Vec<EditCommand>,

    /// Dry run mode - print the page table without creating output.
    pub dry_run: bool,

    /// Print the dry-run page table as JSON.
    pub json: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// Add a bookmark for each run of pages from the same source.
    pub bookmarks: bool,

    /// Compression level for output.
    pub compression: CompressionLevel,

    /// Metadata to set on output document.
    pub metadata: Metadata,

    /// Skip unreadable inputs instead of stopping.
    pub continue_on_error: bool,

    /// Number of parallel reads (None = auto-detect).
    pub jobs: Option<usize>,

    /// Preferences file to load and save.
    pub preferences: Option<PathBuf>,
}

impl Config {
    /// Create a configuration with defaults for everything but inputs and output.
    pub fn new(inputs: Vec<PathBuf>, output: PathBuf) -> Self {
        Self {
            inputs,
            output,
            edits: Vec::new(),
            dry_run: false,
            json: false,
            verbose: false,
            overwrite_mode: OverwriteMode::default(),
            quiet: false,
            bookmarks: false,
            compression: CompressionLevel::default(),
            metadata: Metadata::default(),
            continue_on_error: false,
            jobs: None,
            preferences: None,
        }
    }

    /// Returns a reference to inputs.
    pub fn inputs(&self) -> &[PathBuf] {
        self.inputs.as_ref()
    }

    /// Validate the configuration.
    ///
    /// Checks for logical inconsistencies and invalid combinations.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No input files are specified
    /// - Verbose and quiet modes are both enabled
    /// - Jobs count is zero
    /// - JSON output is requested outside a dry run
    /// - The output path is also an input
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            bail!("No input files specified");
        }

        if self.verbose && self.quiet {
            bail!("Cannot use both --verbose and --quiet");
        }

        if let Some(jobs) = self.jobs
            && jobs == 0
        {
            bail!("Number of jobs must be at least 1");
        }

        if self.json && !self.dry_run {
            bail!("--json is only supported together with --dry-run");
        }

        for input in &self.inputs {
            if input == &self.output {
                bail!(
                    "Output file cannot be the same as an input file: {}",
                    self.output.display()
                );
            }
        }

        Ok(())
    }

    /// Get the effective number of parallel jobs.
    ///
    /// Returns the configured job count, or the number of CPU cores if auto-detect.
    pub fn effective_jobs(&self) -> usize {
        self.jobs.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    /// Check if output should be displayed.
    ///
    /// Returns false if in quiet mode and not doing a dry run.
    pub fn should_print(&self) -> bool {
        !self.quiet || self.dry_run
    }
}
