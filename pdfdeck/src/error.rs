//! Error types for pdfdeck.
//!
//! This module defines every error that can occur while loading documents,
//! editing the page collection, exporting, and writing output.
//!
//! # Error Categories
//!
//! - **Load Errors**: Malformed, encrypted, missing or unreadable inputs
//! - **Edit Errors**: Out-of-range positions, malformed edit commands
//! - **Export Errors**: Empty collection, source documents failing to reparse
//! - **Output Errors**: Existing output files, write failures

use std::io;
use std::path::PathBuf;

/// Result type alias for pdfdeck operations.
pub type Result<T> = std::result::Result<T, PdfDeckError>;

/// Main error type for pdfdeck operations.
#[derive(Debug, thiserror::Error)]
pub enum PdfDeckError {
    /// Input file was not found.
    #[error("File not found: {}", path.display())]
    FileNotFound {
        /// Path to the file that was not found.
        path: PathBuf,
    },

    /// Input file is not accessible (permission denied, etc.).
    #[error("Cannot access file: {}\n  Reason: {source}", path.display())]
    FileNotAccessible {
        /// Path to the inaccessible file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Input path exists but is not a regular file.
    #[error("Not a file: {}", path.display())]
    NotAFile {
        /// Path that is not a file.
        path: PathBuf,
    },

    /// Document bytes could not be parsed.
    #[error("Failed to load PDF: {name}\n  Reason: {reason}")]
    Load {
        /// Display name of the source document.
        name: String,
        /// Message from the PDF parser.
        reason: String,
    },

    /// Document is encrypted and cannot be processed.
    #[error(
        "PDF is encrypted and cannot be processed: {name}\n  \
         Hint: Decrypt the PDF first using 'qpdf --decrypt' or similar tools"
    )]
    EncryptedPdf {
        /// Display name of the source document.
        name: String,
    },

    /// A page position was outside the collection.
    #[error("Page position {index} is out of range (collection has {len} page(s))")]
    IndexOutOfBounds {
        /// Requested zero-based position.
        index: usize,
        /// Collection length at the time of the request.
        len: usize,
    },

    /// Export was requested for an empty collection.
    #[error("Nothing to export: the page collection is empty")]
    EmptyCollection,

    /// A source document failed while building the merged output.
    #[error("Export failed while processing {source_name}\n  Reason: {reason}")]
    Export {
        /// Display name of the source document being copied.
        source_name: String,
        /// Details about the failure.
        reason: String,
    },

    /// An edit command could not be parsed.
    #[error("Invalid edit command at line {line}: '{command}'\n  Details: {details}")]
    InvalidEditCommand {
        /// One-based line number (1 for commands given on the command line).
        line: usize,
        /// The offending command text.
        command: String,
        /// What is wrong with it.
        details: String,
    },

    /// Failed to read an edit script.
    #[error("Failed to read edit script: {}\n  Reason: {source}", path.display())]
    FailedToReadScript {
        /// Path to the script file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Output file already exists and overwrite is not allowed.
    #[error(
        "Output file already exists: {}\n  \
         Use --force to overwrite or choose a different output path",
        path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Failed to create output file.
    #[error("Failed to create output file: {}\n  Reason: {source}", path.display())]
    FailedToCreateOutput {
        /// Path where output should be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to write to output file.
    #[error("Failed to write to output file: {}\n  Reason: {source}", path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Preferences file could not be read or written.
    #[error("Preferences error: {}\n  Reason: {reason}", path.display())]
    Preferences {
        /// Path to the preferences file.
        path: PathBuf,
        /// Details about the failure.
        reason: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// User cancelled the operation.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<anyhow::Error> for PdfDeckError {
    fn from(err: anyhow::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl PdfDeckError {
    /// Create a FileNotFound error.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// Create a NotAFile error.
    pub fn not_a_file(path: PathBuf) -> Self {
        Self::NotAFile { path }
    }

    /// Create a Load error.
    pub fn load(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Load {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an EncryptedPdf error.
    pub fn encrypted_pdf(name: impl Into<String>) -> Self {
        Self::EncryptedPdf { name: name.into() }
    }

    /// Create an IndexOutOfBounds error.
    pub fn index_out_of_bounds(index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds { index, len }
    }

    /// Create an Export error.
    pub fn export(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Export {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidEditCommand error.
    pub fn invalid_edit(line: usize, command: impl Into<String>, details: impl Into<String>) -> Self {
        Self::InvalidEditCommand {
            line,
            command: command.into(),
            details: details.into(),
        }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: PathBuf) -> Self {
        Self::OutputExists { path }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Check if this error only concerns a single input document.
    ///
    /// Returns true for errors that `--continue-on-error` may skip.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound { .. }
                | Self::FileNotAccessible { .. }
                | Self::NotAFile { .. }
                | Self::Load { .. }
                | Self::EncryptedPdf { .. }
        )
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } => 2,
            Self::FileNotAccessible { .. } => 2,
            Self::NotAFile { .. } => 2,
            Self::Load { .. } => 3,
            Self::EncryptedPdf { .. } => 3,
            Self::IndexOutOfBounds { .. } => 1,
            Self::EmptyCollection => 1,
            Self::Export { .. } => 6,
            Self::InvalidEditCommand { .. } => 1,
            Self::FailedToReadScript { .. } => 2,
            Self::OutputExists { .. } => 4,
            Self::FailedToCreateOutput { .. } => 5,
            Self::FailedToWrite { .. } => 5,
            Self::Preferences { .. } => 5,
            Self::InvalidConfig { .. } => 1,
            Self::Cancelled => 130, // Standard exit code for SIGINT
            Self::Io { .. } => 5,
            Self::Other { .. } => 1,
        }
    }
}
