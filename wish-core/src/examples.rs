//! Sample wish inputs shared by the workspace tests.

use crate::wish::WishInput;

/// Returns three valid inputs in distinct categories and price bands.
#[must_use]
pub fn example_inputs() -> Vec<WishInput> {
    vec![
        WishInput {
            price_estimate: Some(700.0),
            category: Some("Техника".to_owned()),
            ..WishInput::titled("Телефон")
        },
        WishInput {
            link: Some("https://example.com/trip".to_owned()),
            price_estimate: Some(1500.0),
            category: Some("Отдых".to_owned()),
            ..WishInput::titled("Путешествие")
        },
        WishInput {
            price_estimate: Some(20.0),
            notes: Some("Paperback is fine".to_owned()),
            category: Some("Развлечения".to_owned()),
            ..WishInput::titled("Книга")
        },
    ]
}
