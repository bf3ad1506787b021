//! CLI argument parsing for pdfdeck.
//!
//! This module defines the command-line interface structure using `clap`.
//! It handles argument parsing, edit script loading, and conversion into a
//! validated [`Config`].

use clap::Parser;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use pdfdeck::EditCommand;
use pdfdeck::config::{CompressionLevel, Config, Metadata, OverwriteMode};
use pdfdeck::error::{PdfDeckError, Result};

/// Load PDF files, edit their pages, and write one merged PDF.
///
/// Pages from every input are collected in order. Edit commands then
/// select, rotate, delete and move pages before the result is exported.
#[derive(Parser, Debug)]
#[command(name = "pdfdeck")]
#[command(version)]
#[command(about = "Load PDF files, edit their pages and write one merged PDF", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Input PDF files (loaded in order)
    ///
    /// Examples:
    ///   pdfdeck a.pdf b.pdf -o out.pdf
    ///   pdfdeck scan.pdf -e "select 2,4" -e rotate -o fixed.pdf
    #[arg(required = true, value_name = "FILE")]
    pub inputs: Vec<PathBuf>,

    /// Output PDF file path
    ///
    /// Use --force to overwrite existing files without confirmation.
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Edit command to apply after loading (repeatable)
    ///
    /// Commands run in the order given, after any --script commands.
    /// Positions are 1-based and refer to the collection at that point.
    ///
    ///   select RANGE     toggle selection of pages (e.g. "1-3,7")
    ///   select-all       select every page
    ///   deselect-all     clear the selection
    ///   rotate           rotate selected pages 90° clockwise
    ///   delete           delete selected pages
    ///   move FROM TO     move a page to a new position
    ///   clear            remove every page
    #[arg(short, long = "edit", value_name = "CMD")]
    pub edits: Vec<String>,

    /// Read edit commands from a file, one per line ('-' for stdin)
    ///
    /// Blank lines are skipped and '#' starts a comment.
    #[arg(long, value_name = "FILE")]
    pub script: Option<PathBuf>,

    /// Dry run - print the resulting page table without writing output
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Print the dry-run page table as JSON
    #[arg(long, requires = "dry_run")]
    pub json: bool,

    /// Verbose output - show page sizes and timing details
    #[arg(short, long)]
    pub verbose: bool,

    /// Force overwrite of existing output file without confirmation
    #[arg(short, long)]
    pub force: bool,

    /// Never overwrite existing output file
    #[arg(long, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Add a bookmark at each run of pages from the same input
    ///
    /// Bookmarks are titled with the input's file name.
    #[arg(short, long)]
    pub bookmarks: bool,

    /// Compression level for output PDF
    ///
    /// - none: No compression
    /// - standard: Compress content streams (default)
    /// - maximum: Compress and drop unreferenced objects
    #[arg(short, long, value_name = "LEVEL", default_value = "standard")]
    #[arg(value_parser = ["none", "standard", "maximum"])]
    pub compression: String,

    /// Set title metadata for output PDF
    #[arg(long, value_name = "TEXT")]
    pub title: Option<String>,

    /// Set author metadata for output PDF
    #[arg(long, value_name = "TEXT")]
    pub author: Option<String>,

    /// Set subject metadata for output PDF
    #[arg(long, value_name = "TEXT")]
    pub subject: Option<String>,

    /// Set keywords metadata for output PDF (comma-separated)
    #[arg(long, value_name = "TEXT")]
    pub keywords: Option<String>,

    /// Skip inputs that fail to load instead of stopping
    #[arg(long)]
    pub continue_on_error: bool,

    /// Number of files to read concurrently
    ///
    /// Default is number of CPU cores. Pages are always appended in input
    /// order.
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Preferences file to load at startup and save on exit
    #[arg(long, value_name = "FILE")]
    pub preferences: Option<PathBuf>,
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// Reads the edit script if one was given. Script commands come first,
    /// followed by `--edit` commands.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The compression level is invalid
    /// - The script cannot be read, or any edit command fails to parse
    /// - Configuration validation fails
    pub async fn to_config(&self) -> Result<Config> {
        let compression = CompressionLevel::from_str(&self.compression)
            .map_err(|e| PdfDeckError::invalid_config(e.to_string()))?;

        let overwrite_mode = if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        };

        let metadata = Metadata::new(
            self.title.clone(),
            self.author.clone(),
            self.subject.clone(),
            self.keywords.clone(),
        );

        let mut edits = match &self.script {
            Some(path) => EditCommand::parse_script(&read_script(path).await?)?,
            None => Vec::new(),
        };
        edits.extend(parse_edits(&self.edits)?);

        let config = Config {
            inputs: self.inputs.clone(),
            output: self.output.clone(),
            edits,
            dry_run: self.dry_run,
            json: self.json,
            verbose: self.verbose,
            overwrite_mode,
            quiet: self.quiet,
            bookmarks: self.bookmarks,
            compression,
            metadata,
            continue_on_error: self.continue_on_error,
            jobs: self.jobs,
            preferences: self.preferences.clone(),
        };

        config.validate().map_err(|e| {
            PdfDeckError::invalid_config(format!("Configuration validation failed: {e}"))
        })?;

        Ok(config)
    }
}

/// Parse `--edit` values. Errors report the flag's position as the line.
fn parse_edits(edits: &[String]) -> Result<Vec<EditCommand>> {
    let mut commands = Vec::with_capacity(edits.len());
    for (idx, text) in edits.iter().enumerate() {
        match EditCommand::parse_line(idx + 1, text)? {
            Some(command) => commands.push(command),
            None => {
                return Err(PdfDeckError::invalid_edit(
                    idx + 1,
                    text.trim(),
                    "empty command",
                ));
            }
        }
    }
    Ok(commands)
}

/// Read an edit script from `path`, or from stdin when `path` is `-`.
async fn read_script(path: &Path) -> Result<String> {
    let to_error = |source: std::io::Error| PdfDeckError::FailedToReadScript {
        path: path.to_path_buf(),
        source,
    };

    if path.as_os_str() == "-" {
        use tokio::io::AsyncReadExt;

        let mut script = String::new();
        tokio::io::stdin()
            .read_to_string(&mut script)
            .await
            .map_err(to_error)?;
        return Ok(script);
    }

    tokio::fs::read_to_string(path).await.map_err(to_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn create_test_cli(inputs: Vec<&str>, output: &str) -> Cli {
        Cli {
            inputs: inputs.iter().map(PathBuf::from).collect(),
            output: PathBuf::from(output),
            edits: Vec::new(),
            script: None,
            dry_run: false,
            json: false,
            verbose: false,
            force: false,
            no_clobber: false,
            quiet: false,
            bookmarks: false,
            compression: "standard".to_string(),
            title: None,
            author: None,
            subject: None,
            keywords: None,
            continue_on_error: false,
            jobs: None,
            preferences: None,
        }
    }

    #[tokio::test]
    async fn test_basic_cli_to_config() {
        let cli = create_test_cli(vec!["a.pdf", "b.pdf"], "out.pdf");
        let config = cli.to_config().await.unwrap();

        assert_eq!(config.inputs.len(), 2);
        assert_eq!(config.output, PathBuf::from("out.pdf"));
        assert!(config.edits.is_empty());
        assert!(!config.dry_run);
        assert!(!config.verbose);
    }

    #[rstest]
    #[case("none", CompressionLevel::None)]
    #[case("standard", CompressionLevel::Standard)]
    #[case("maximum", CompressionLevel::Maximum)]
    #[tokio::test]
    async fn test_cli_with_compression(#[case] level: &str, #[case] expected: CompressionLevel) {
        let mut cli = create_test_cli(vec!["a.pdf"], "out.pdf");
        cli.compression = level.to_string();

        let config = cli.to_config().await.unwrap();
        assert_eq!(config.compression, expected);
    }

    #[tokio::test]
    async fn test_cli_with_invalid_compression() {
        let mut cli = create_test_cli(vec!["a.pdf"], "out.pdf");
        cli.compression = "invalid".to_string();

        assert!(cli.to_config().await.is_err());
    }

    #[tokio::test]
    async fn test_cli_overwrite_modes() {
        let mut cli = create_test_cli(vec!["a.pdf"], "out.pdf");

        let config = cli.to_config().await.unwrap();
        assert_eq!(config.overwrite_mode, OverwriteMode::Prompt);

        cli.force = true;
        let config = cli.to_config().await.unwrap();
        assert_eq!(config.overwrite_mode, OverwriteMode::Force);

        cli.force = false;
        cli.no_clobber = true;
        let config = cli.to_config().await.unwrap();
        assert_eq!(config.overwrite_mode, OverwriteMode::NoClobber);
    }

    #[tokio::test]
    async fn test_cli_with_metadata() {
        let mut cli = create_test_cli(vec!["a.pdf"], "out.pdf");
        cli.title = Some("Test Title".to_string());
        cli.author = Some("Test Author".to_string());

        let config = cli.to_config().await.unwrap();
        assert_eq!(config.metadata.title, Some("Test Title".to_string()));
        assert_eq!(config.metadata.author, Some("Test Author".to_string()));
    }

    #[tokio::test]
    async fn test_cli_edits_in_order() {
        let mut cli = create_test_cli(vec!["a.pdf"], "out.pdf");
        cli.edits = vec!["select 1-2".into(), "ROTATE".into(), "move 3 1".into()];

        let config = cli.to_config().await.unwrap();
        assert_eq!(config.edits.len(), 3);
        assert_eq!(config.edits[1], EditCommand::Rotate);
        assert_eq!(config.edits[2], EditCommand::Move { from: 3, to: 1 });
    }

    #[tokio::test]
    async fn test_cli_invalid_edit_reports_position() {
        let mut cli = create_test_cli(vec!["a.pdf"], "out.pdf");
        cli.edits = vec!["rotate".into(), "flip".into()];

        let err = cli.to_config().await.unwrap_err();
        assert!(matches!(err, PdfDeckError::InvalidEditCommand { line: 2, .. }));
    }

    #[tokio::test]
    async fn test_cli_empty_edit_rejected() {
        let mut cli = create_test_cli(vec!["a.pdf"], "out.pdf");
        cli.edits = vec!["   ".into()];

        assert!(cli.to_config().await.is_err());
    }

    #[tokio::test]
    async fn test_cli_script_before_edits() {
        let temp_dir = tempfile::tempdir().unwrap();
        let script = temp_dir.path().join("edits.txt");
        tokio::fs::write(&script, "# prepare\nselect-all\n\ndelete\n")
            .await
            .unwrap();

        let mut cli = create_test_cli(vec!["a.pdf"], "out.pdf");
        cli.script = Some(script);
        cli.edits = vec!["clear".into()];

        let config = cli.to_config().await.unwrap();
        assert_eq!(
            config.edits,
            vec![EditCommand::SelectAll, EditCommand::Delete, EditCommand::Clear]
        );
    }

    #[tokio::test]
    async fn test_cli_missing_script() {
        let mut cli = create_test_cli(vec!["a.pdf"], "out.pdf");
        cli.script = Some(PathBuf::from("/nonexistent/edits.txt"));

        let err = cli.to_config().await.unwrap_err();
        assert!(matches!(err, PdfDeckError::FailedToReadScript { .. }));
    }

    #[tokio::test]
    async fn test_cli_json_requires_dry_run() {
        let mut cli = create_test_cli(vec!["a.pdf"], "out.pdf");
        cli.json = true;
        assert!(cli.to_config().await.is_err());

        cli.dry_run = true;
        assert!(cli.to_config().await.unwrap().json);
    }

    #[tokio::test]
    async fn test_cli_zero_jobs() {
        let mut cli = create_test_cli(vec!["a.pdf"], "out.pdf");
        cli.jobs = Some(0);

        assert!(cli.to_config().await.is_err());
    }

    #[test]
    fn test_cli_parses_arguments() {
        let cli = Cli::try_parse_from([
            "pdfdeck", "a.pdf", "b.pdf", "-o", "out.pdf", "-e", "select 1", "-e", "rotate",
            "--dry-run", "--json",
        ])
        .unwrap();

        assert_eq!(cli.inputs.len(), 2);
        assert_eq!(cli.edits, vec!["select 1", "rotate"]);
        assert!(cli.dry_run && cli.json);
    }

    #[test]
    fn test_cli_json_without_dry_run_rejected_by_clap() {
        let result = Cli::try_parse_from(["pdfdeck", "a.pdf", "-o", "out.pdf", "--json"]);
        assert!(result.is_err());
    }
}
