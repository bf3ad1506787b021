//! Integration tests for error handling and edge cases.

use pdfdeck::config::{Config, OverwriteMode};
use pdfdeck::error::PdfDeckError;
use pdfdeck::io::{PdfWriter, SourceReader};
use pdfdeck::merge::MergeExporter;
use pdfdeck::{EditCommand, PageCollection};
use std::path::PathBuf;

use crate::common::{Fixtures, page_widths};

#[tokio::test]
async fn test_error_nonexistent_input() {
    let mut collection = PageCollection::new();
    let result = SourceReader::new()
        .load_into(
            &mut collection,
            &[PathBuf::from("/nonexistent/file.pdf")],
            1,
            false,
        )
        .await;

    let err = result.unwrap_err();
    assert!(matches!(err, PdfDeckError::FileNotFound { .. }));
    assert_eq!(err.exit_code(), 2);
    assert!(collection.is_empty());
}

#[tokio::test]
async fn test_error_directory_input() {
    let fixtures = Fixtures::new();
    let mut collection = PageCollection::new();

    let err = SourceReader::new()
        .load_into(&mut collection, &[fixtures.dir().to_path_buf()], 1, false)
        .await
        .unwrap_err();

    assert!(matches!(err, PdfDeckError::NotAFile { .. }));
}

#[tokio::test]
async fn test_error_malformed_input_keeps_earlier_sources() {
    let fixtures = Fixtures::new();
    let good = fixtures.document("good.pdf", &[100, 200]);
    let bad = fixtures.raw("bad.pdf", b"this is not a pdf");
    let late = fixtures.document("late.pdf", &[300]);

    let mut collection = PageCollection::new();
    let err = SourceReader::new()
        .load_into(&mut collection, &[good, bad, late], 3, false)
        .await
        .unwrap_err();

    assert!(matches!(err, PdfDeckError::Load { .. }));
    assert_eq!(collection.len(), 2);
    assert!(collection.page_summaries().iter().all(|row| row.source == "good.pdf"));
}

#[tokio::test]
async fn test_continue_on_error_skips_bad_inputs() {
    let fixtures = Fixtures::new();
    let good = fixtures.document("good.pdf", &[100]);
    let bad = fixtures.raw("bad.pdf", b"not a pdf at all");
    let missing = fixtures.path("missing.pdf");
    let late = fixtures.document("late.pdf", &[300]);

    let mut collection = PageCollection::new();
    let report = SourceReader::new()
        .load_into(&mut collection, &[good, bad, missing, late], 2, true)
        .await
        .unwrap();

    assert_eq!(report.skipped.len(), 2);
    assert_eq!(report.statistics.failure_count, 2);

    let result = MergeExporter::default().export(&collection).await.unwrap();
    assert_eq!(page_widths(&result.bytes), vec![100, 300]);
}

#[tokio::test]
async fn test_error_export_empty_collection() {
    let collection = PageCollection::new();
    let err = MergeExporter::default().export(&collection).await.unwrap_err();
    assert!(matches!(err, PdfDeckError::EmptyCollection));
}

#[tokio::test]
async fn test_error_export_after_deleting_everything() {
    let fixtures = Fixtures::new();
    let input = fixtures.document("doc.pdf", &[100, 200]);

    let mut collection = PageCollection::new();
    SourceReader::new()
        .load_into(&mut collection, &[input], 1, false)
        .await
        .unwrap();

    let commands = EditCommand::parse_script("select-all\ndelete").unwrap();
    pdfdeck::edit::apply_all(&commands, &mut collection).unwrap();

    let err = MergeExporter::default().export(&collection).await.unwrap_err();
    assert!(matches!(err, PdfDeckError::EmptyCollection));
}

#[tokio::test]
async fn test_error_edit_out_of_range_leaves_collection() {
    let fixtures = Fixtures::new();
    let input = fixtures.document("doc.pdf", &[100, 200, 300]);

    let mut collection = PageCollection::new();
    SourceReader::new()
        .load_into(&mut collection, &[input], 1, false)
        .await
        .unwrap();
    let before: Vec<_> = collection.iter().map(|page| page.id()).collect();

    let move_err = "move 1 9"
        .parse::<EditCommand>()
        .unwrap()
        .apply(&mut collection)
        .unwrap_err();
    assert!(matches!(
        move_err,
        PdfDeckError::IndexOutOfBounds { index: 8, len: 3 }
    ));

    let select_err = "select 2-4"
        .parse::<EditCommand>()
        .unwrap()
        .apply(&mut collection)
        .unwrap_err();
    assert!(matches!(select_err, PdfDeckError::IndexOutOfBounds { .. }));

    let after: Vec<_> = collection.iter().map(|page| page.id()).collect();
    assert_eq!(before, after);
    assert_eq!(collection.selection_len(), 0);
}

#[test]
fn test_error_bad_script_reports_line() {
    let err = EditCommand::parse_script("select 1\n\nspin 3\n").unwrap_err();
    assert!(matches!(
        err,
        PdfDeckError::InvalidEditCommand { line: 3, .. }
    ));
}

#[test]
fn test_error_config_output_is_input() {
    let mut config = Config::new(
        vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")],
        PathBuf::from("a.pdf"),
    );
    config.overwrite_mode = OverwriteMode::Force;

    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("same as an input"));
}

#[tokio::test]
async fn test_error_write_into_missing_directory() {
    let fixtures = Fixtures::new();
    let output = fixtures.path("no/such/dir/out.pdf");

    let result = PdfWriter::new().save_bytes(b"%PDF-1.5".to_vec(), &output).await;
    assert!(result.is_err());
    assert!(!output.exists());
}
