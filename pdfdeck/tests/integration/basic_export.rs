//! Integration tests for loading files and exporting them unchanged.

use pdfdeck::PageCollection;
use pdfdeck::config::{CompressionLevel, Metadata};
use pdfdeck::io::{PdfWriter, SourceReader};
use pdfdeck::merge::{ExportOptions, MergeExporter};
use pdfdeck::merge::metadata::MetadataManager;

use crate::common::{Fixtures, page_rotations, page_widths};

#[tokio::test]
async fn test_export_two_documents_in_load_order() {
    let fixtures = Fixtures::new();
    let a = fixtures.document("a.pdf", &[101, 102]);
    let b = fixtures.document("b.pdf", &[201, 202, 203]);

    let mut collection = PageCollection::new();
    let report = SourceReader::new()
        .load_into(&mut collection, &[a, b], 2, false)
        .await
        .unwrap();

    assert_eq!(report.statistics.success_count, 2);
    assert_eq!(report.statistics.total_pages, 5);
    assert!(report.skipped.is_empty());

    let result = MergeExporter::default().export(&collection).await.unwrap();

    assert_eq!(result.statistics.total_pages, 5);
    assert_eq!(result.statistics.sources, 2);
    assert_eq!(page_widths(&result.bytes), vec![101, 102, 201, 202, 203]);
}

#[tokio::test]
async fn test_load_order_is_input_order_with_many_jobs() {
    let fixtures = Fixtures::new();
    let paths: Vec<_> = (0..8)
        .map(|i| fixtures.document(&format!("doc{i}.pdf"), &[300 + i]))
        .collect();

    let mut collection = PageCollection::new();
    SourceReader::new()
        .load_into(&mut collection, &paths, 8, false)
        .await
        .unwrap();

    let names: Vec<_> = collection
        .page_summaries()
        .into_iter()
        .map(|row| row.source)
        .collect();
    let expected: Vec<_> = (0..8).map(|i| format!("doc{i}.pdf")).collect();
    assert_eq!(names, expected);
}

#[tokio::test]
async fn test_inherited_attributes_survive_export() {
    let fixtures = Fixtures::new();
    let rotated = fixtures.rotated_document("rotated.pdf", &[150, 160], 90);

    let mut collection = PageCollection::new();
    SourceReader::new()
        .load_into(&mut collection, &[rotated], 1, false)
        .await
        .unwrap();

    let result = MergeExporter::default().export(&collection).await.unwrap();

    assert_eq!(page_rotations(&result.bytes), vec![90, 90]);

    let doc = lopdf::Document::load_mem(&result.bytes).unwrap();
    for page_id in doc.get_pages().values() {
        let page = doc.get_dictionary(*page_id).unwrap();
        assert!(page.has(b"Resources"), "Resources should be materialized");
    }
}

#[tokio::test]
async fn test_export_and_write_to_disk() {
    let fixtures = Fixtures::new();
    let input = fixtures.document("in.pdf", &[120, 130, 140]);
    let output = fixtures.path("out.pdf");

    let mut collection = PageCollection::new();
    SourceReader::new()
        .load_into(&mut collection, &[input], 1, false)
        .await
        .unwrap();

    let result = MergeExporter::default().export(&collection).await.unwrap();
    let stats = PdfWriter::new()
        .save_bytes(result.bytes.clone(), &output)
        .await
        .unwrap();

    assert_eq!(stats.output_path, output);
    assert_eq!(stats.file_size, result.bytes.len() as u64);

    let written = tokio::fs::read(&output).await.unwrap();
    assert_eq!(page_widths(&written), vec![120, 130, 140]);
    assert!(!fixtures.dir().join("out.pdf.tmp").exists());
}

#[tokio::test]
async fn test_export_options_applied() {
    let fixtures = Fixtures::new();
    let a = fixtures.document("first.pdf", &[100, 110]);
    let b = fixtures.document("second.pdf", &[200]);

    let mut collection = PageCollection::new();
    SourceReader::new()
        .load_into(&mut collection, &[a, b], 2, false)
        .await
        .unwrap();

    let options = ExportOptions {
        bookmarks: true,
        compression: CompressionLevel::Maximum,
        metadata: Metadata::new(Some("Deck".to_string()), Some("Tester".to_string()), None, None),
    };
    let result = MergeExporter::new(options).export(&collection).await.unwrap();

    assert_eq!(result.statistics.bookmarks_added, 2);
    assert!(result.statistics.compressed);

    let doc = lopdf::Document::load_mem(&result.bytes).unwrap();
    let metadata = MetadataManager::new().get_metadata(&doc);
    assert_eq!(metadata.title.as_deref(), Some("Deck"));
    assert_eq!(metadata.author.as_deref(), Some("Tester"));
    assert_eq!(page_widths(&result.bytes), vec![100, 110, 200]);
}

#[tokio::test]
async fn test_reexport_is_byte_identical() {
    let fixtures = Fixtures::new();
    let input = fixtures.document("same.pdf", &[100, 200]);

    let mut collection = PageCollection::new();
    SourceReader::new()
        .load_into(&mut collection, &[input], 1, false)
        .await
        .unwrap();

    let exporter = MergeExporter::default();
    let first = exporter.export(&collection).await.unwrap();
    let second = exporter.export(&collection).await.unwrap();

    assert_eq!(first.bytes, second.bytes);
}
