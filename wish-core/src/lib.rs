//! Core types for the wishlist service.
//!
//! Defines the wish record, its validated input form, the list query,
//! and the identifiers shared by the store, the upload pipeline and the
//! HTTP gateway.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod examples;
pub mod id;
pub mod query;
pub mod wish;

pub use error::{CoreError, FieldViolation};
pub use id::{CorrelationId, WishId};
pub use query::{SortKey, WishQuery, WishQueryParams};
pub use wish::{Wish, WishDraft, WishInput, CATEGORY_MAX_CHARS, NOTES_MAX_CHARS, TITLE_MAX_CHARS};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::examples::example_inputs;

    #[test]
    fn example_inputs_all_valid() {
        let inputs = example_inputs();
        assert_eq!(inputs.len(), 3);
        for input in inputs {
            let title = input.title.clone();
            assert!(input.validate().is_ok(), "example '{title}' must validate");
        }
    }

    #[test]
    fn wish_id_display_shows_number() {
        assert_eq!(WishId::new(42).to_string(), "42");
    }

    #[test]
    fn correlation_ids_are_unique() {
        let a = CorrelationId::new();
        let b = CorrelationId::new();
        assert_ne!(a, b, "two fresh correlation ids must differ");
    }

    #[test]
    fn correlation_id_serializes_as_plain_string() {
        let id = CorrelationId::new();
        let json = match serde_json::to_value(id) {
            Ok(v) => v,
            Err(e) => panic!("serialization failed: {e}"),
        };
        assert_eq!(json, serde_json::Value::String(id.to_string()));
    }

    #[test]
    fn core_error_display_lists_every_field() {
        let err = CoreError::Validation {
            violations: vec![
                FieldViolation::new("title", "must not be empty"),
                FieldViolation::new("notes", "too long"),
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("title: must not be empty"), "got {msg}");
        assert!(msg.contains("notes: too long"), "got {msg}");
    }
}
