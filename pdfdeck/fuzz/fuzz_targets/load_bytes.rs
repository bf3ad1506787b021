#![no_main]

use libfuzzer_sys::fuzz_target;
use pdfdeck::PageCollection;

fuzz_target!(|data: &[u8]| {
    let mut collection = PageCollection::new();

    // A failed load must leave the collection untouched.
    match collection.load(data.to_vec(), "fuzz.pdf") {
        Ok(pages) => {
            let appended = pages.len();
            assert_eq!(collection.len(), appended);
        }
        Err(_) => assert!(collection.is_empty()),
    }
});
