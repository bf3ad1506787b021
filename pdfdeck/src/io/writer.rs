//! Writing exported documents.
//!
//! This module provides safe PDF writing with:
//! - Atomic writes (write to temp file, then rename)
//! - Pre-flight checks on the output directory
//! - Write statistics
//!
//! # Examples
//!
//! ```no_run
//! use pdfdeck::io::writer::PdfWriter;
//! use std::path::Path;
//!
//! # async fn example(bytes: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
//! let writer = PdfWriter::new();
//! let stats = writer.save_bytes(bytes, Path::new("output.pdf")).await?;
//! println!("Wrote {}", stats.format_file_size());
//! # Ok(())
//! # }
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::task;

use crate::error::{PdfDeckError, Result};
use crate::io::format_file_size;

/// Buffer size for writing output files.
const WRITE_BUFFER_SIZE: usize = 8192;

/// Statistics about a write operation.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// Writes serialized documents to disk.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter;

impl PdfWriter {
    /// Create a new writer.
    pub fn new() -> Self {
        Self
    }

    /// Write `bytes` to `path` and return statistics about the operation.
    ///
    /// The bytes go to a sibling temp file which is then renamed over `path`,
    /// so readers never see a partial file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The output file cannot be created
    /// - Writing or renaming fails
    pub async fn save_bytes(&self, bytes: Vec<u8>, path: &Path) -> Result<WriteStatistics> {
        let path_buf = path.to_path_buf();

        task::spawn_blocking(move || write_file(&bytes, path_buf))
            .await
            .map_err(|e| PdfDeckError::other(format!("Write task failed: {e}")))?
    }

    /// Check if a file can be written to the given path.
    ///
    /// Performs pre-flight checks without actually writing.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory doesn't exist
    /// - Parent directory is not writable
    pub async fn can_write(&self, path: &Path) -> Result<()> {
        let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
            return Ok(());
        };

        let metadata = match tokio::fs::metadata(parent).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PdfDeckError::invalid_config(format!(
                    "Output directory does not exist: {}",
                    parent.display()
                )));
            }
            Err(e) => {
                return Err(PdfDeckError::FileNotAccessible {
                    path: parent.to_path_buf(),
                    source: e,
                });
            }
        };

        if !metadata.is_dir() {
            return Err(PdfDeckError::invalid_config(format!(
                "Output directory is not a directory: {}",
                parent.display()
            )));
        }

        if metadata.permissions().readonly() {
            return Err(PdfDeckError::invalid_config(format!(
                "Output directory is not writable: {}",
                parent.display()
            )));
        }

        Ok(())
    }

    /// Check if output file exists.
    pub async fn exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path).await.is_ok()
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_file(bytes: &[u8], path: PathBuf) -> Result<WriteStatistics> {
    let start = Instant::now();
    let write_path = temp_path(&path);

    let file =
        std::fs::File::create(&write_path).map_err(|e| PdfDeckError::FailedToCreateOutput {
            path: write_path.clone(),
            source: e,
        })?;

    let mut writer = std::io::BufWriter::with_capacity(WRITE_BUFFER_SIZE, file);
    let written = writer.write_all(bytes).and_then(|()| writer.flush());

    if let Err(e) = written {
        drop(writer);
        let _ = std::fs::remove_file(&write_path);
        return Err(PdfDeckError::FailedToWrite {
            path: write_path,
            source: e,
        });
    }
    drop(writer);

    if let Err(e) = std::fs::rename(&write_path, &path) {
        let _ = std::fs::remove_file(&write_path);
        return Err(PdfDeckError::FailedToWrite { path, source: e });
    }

    let write_time = start.elapsed();
    log::debug!("wrote {} bytes to {} in {:?}", bytes.len(), path.display(), write_time);

    Ok(WriteStatistics {
        write_time,
        file_size: bytes.len() as u64,
        output_path: path,
    })
}
