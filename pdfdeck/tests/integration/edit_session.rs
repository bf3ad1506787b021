//! Integration tests for edit sessions: load, edit, export.

use pdfdeck::io::SourceReader;
use pdfdeck::merge::MergeExporter;
use pdfdeck::{EditCommand, PageCollection, Rotation};
use rstest::rstest;

use crate::common::{Fixtures, page_rotations, page_widths};

async fn loaded(fixtures: &Fixtures) -> PageCollection {
    let a = fixtures.document("a.pdf", &[101, 102, 103]);
    let b = fixtures.document("b.pdf", &[201, 202]);

    let mut collection = PageCollection::new();
    SourceReader::new()
        .load_into(&mut collection, &[a, b], 2, false)
        .await
        .unwrap();
    collection
}

#[tokio::test]
async fn test_script_session_exports_edited_order() {
    let fixtures = Fixtures::new();
    let mut collection = loaded(&fixtures).await;

    let script = "\
# drop the second page of a.pdf
select 2
delete

# bring b.pdf's last page to the front and turn it
move 4 1
select 1
rotate
rotate
";
    let commands = EditCommand::parse_script(script).unwrap();
    pdfdeck::edit::apply_all(&commands, &mut collection).unwrap();

    assert_eq!(collection.len(), 4);
    assert_eq!(collection.selection_len(), 1);

    let result = MergeExporter::default().export(&collection).await.unwrap();
    assert_eq!(page_widths(&result.bytes), vec![202, 101, 103, 201]);
    assert_eq!(page_rotations(&result.bytes), vec![180, 0, 0, 0]);
}

#[tokio::test]
async fn test_interleaved_sources_are_grouped_and_restored() {
    let fixtures = Fixtures::new();
    let mut collection = loaded(&fixtures).await;

    // a1 b1 a2 b2 a3
    for (from, to) in [(4, 2), (5, 4)] {
        EditCommand::Move { from, to }.apply(&mut collection).unwrap();
    }

    let result = MergeExporter::default().export(&collection).await.unwrap();
    assert_eq!(result.statistics.sources, 2);
    assert_eq!(page_widths(&result.bytes), vec![101, 201, 102, 202, 103]);
}

#[tokio::test]
async fn test_same_page_duplicated_by_loading_twice() {
    let fixtures = Fixtures::new();
    let a = fixtures.document("twice.pdf", &[111, 222]);

    let mut collection = PageCollection::new();
    SourceReader::new()
        .load_into(&mut collection, &[a.clone(), a], 2, false)
        .await
        .unwrap();

    assert_eq!(collection.len(), 4);
    let result = MergeExporter::default().export(&collection).await.unwrap();
    assert_eq!(result.statistics.sources, 2);
    assert_eq!(page_widths(&result.bytes), vec![111, 222, 111, 222]);
}

#[rstest]
#[case(1, Rotation::Clockwise90, 90)]
#[case(2, Rotation::Rotate180, 180)]
#[case(3, Rotation::Clockwise270, 270)]
#[case(4, Rotation::None, 0)]
#[tokio::test]
async fn test_rotation_count_wraps(
    #[case] turns: usize,
    #[case] expected: Rotation,
    #[case] degrees: i64,
) {
    let fixtures = Fixtures::new();
    let mut collection = loaded(&fixtures).await;

    collection.select_all();
    for _ in 0..turns {
        collection.rotate_selected();
    }

    assert!(collection.iter().all(|page| page.rotation() == expected));

    let result = MergeExporter::default().export(&collection).await.unwrap();
    assert!(page_rotations(&result.bytes).iter().all(|&r| r == degrees));
}

#[tokio::test]
async fn test_rotation_composes_with_inherited_rotate() {
    let fixtures = Fixtures::new();
    let input = fixtures.rotated_document("turned.pdf", &[100, 200], 270);

    let mut collection = PageCollection::new();
    SourceReader::new()
        .load_into(&mut collection, &[input], 1, false)
        .await
        .unwrap();

    "select 1".parse::<EditCommand>().unwrap().apply(&mut collection).unwrap();
    EditCommand::Rotate.apply(&mut collection).unwrap();

    let result = MergeExporter::default().export(&collection).await.unwrap();
    assert_eq!(page_rotations(&result.bytes), vec![0, 270]);
}

#[tokio::test]
async fn test_clear_then_reload() {
    let fixtures = Fixtures::new();
    let mut collection = loaded(&fixtures).await;
    let old_ids: Vec<_> = collection.iter().map(|page| page.id()).collect();

    EditCommand::Clear.apply(&mut collection).unwrap();
    assert!(collection.is_empty());

    let again = fixtures.document("again.pdf", &[300]);
    SourceReader::new()
        .load_into(&mut collection, &[again], 1, false)
        .await
        .unwrap();

    let new_id = collection.id_at(0).unwrap();
    assert!(!old_ids.contains(&new_id));

    let result = MergeExporter::default().export(&collection).await.unwrap();
    assert_eq!(page_widths(&result.bytes), vec![300]);
}

#[tokio::test]
async fn test_page_table_reflects_edits() {
    let fixtures = Fixtures::new();
    let mut collection = loaded(&fixtures).await;

    let commands = EditCommand::parse_script("move 5 1\nselect 1,3\nrotate").unwrap();
    pdfdeck::edit::apply_all(&commands, &mut collection).unwrap();

    let rows = collection.page_summaries();
    assert_eq!(rows[0].source, "b.pdf");
    assert_eq!(rows[0].source_page, 2);
    assert!(rows[0].selected);
    assert_eq!(rows[0].rotation, Rotation::Clockwise90);
    assert_eq!(rows[2].source, "a.pdf");
    assert_eq!(rows[2].source_page, 2);

    let table = pdfdeck::output::format_page_table(&rows, true);
    assert!(table.contains("b.pdf"));
    assert!(table.contains("500x202"));
}
