//! Fuzz target: JSON deserialization and validation of `WishInput`.
//!
//! Arbitrary request bodies must never panic, and every draft that passes
//! validation must respect the field limits.

#![no_main]

use libfuzzer_sys::fuzz_target;
use wish_core::{WishInput, TITLE_MAX_CHARS};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = serde_json::from_slice::<WishInput>(data) else {
        return;
    };
    if let Ok(draft) = input.validate() {
        let title = draft.title();
        assert!(!title.is_empty(), "accepted draft must have a title");
        assert!(title.chars().count() <= TITLE_MAX_CHARS);
        assert_eq!(title, title.trim(), "accepted title must be trimmed");
        if let Some(category) = draft.category() {
            assert_eq!(category, category.to_lowercase(), "category must be lower-cased");
        }
    }
});
