//! List query: price ceiling, category filter and sort key.

use std::cmp::Ordering;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{CoreError, FieldViolation};
use crate::wish::Wish;

/// Field a wish listing may be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum SortKey {
    /// Ascending price, wishes without a price first.
    PriceEstimate,
    /// Ascending title, by Unicode scalar value.
    Title,
}

impl SortKey {
    /// Wire name of the key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PriceEstimate => "price_estimate",
            Self::Title => "title",
        }
    }

    /// Orders two wishes by this key. Absent values sort lowest.
    #[must_use]
    pub fn compare(self, a: &Wish, b: &Wish) -> Ordering {
        match self {
            Self::PriceEstimate => a.price_estimate.cmp(&b.price_estimate),
            Self::Title => a.title.cmp(&b.title),
        }
    }
}

impl FromStr for SortKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "price_estimate" => Ok(Self::PriceEstimate),
            "title" => Ok(Self::Title),
            other => Err(CoreError::invalid(
                "sort_by",
                format!("unsupported sort key '{other}'; expected 'price_estimate' or 'title'"),
            )),
        }
    }
}

/// Validated list query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WishQuery {
    /// Keep only wishes priced strictly below this value.
    pub max_price: Option<Decimal>,
    /// Keep only wishes in this category, compared case-insensitively.
    pub category: Option<String>,
    /// Stable ascending sort applied after filtering.
    pub sort_by: Option<SortKey>,
}

impl WishQuery {
    /// Returns `true` if `wish` passes both filters.
    ///
    /// A wish without a price never passes a `max_price` filter.
    #[must_use]
    pub fn admits(&self, wish: &Wish) -> bool {
        if let Some(max) = self.max_price {
            match wish.price_estimate {
                Some(price) if price < max => {}
                _ => return false,
            }
        }
        if let Some(wanted) = &self.category {
            match &wish.category {
                Some(category) if eq_ignore_case(category, wanted) => {}
                _ => return false,
            }
        }
        true
    }
}

/// Raw query-string parameters of a list request.
///
/// Empty values are treated as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WishQueryParams {
    pub max_price: Option<String>,
    pub category: Option<String>,
    pub sort_by: Option<String>,
}

impl WishQueryParams {
    /// Parses the parameters into a [`WishQuery`].
    ///
    /// # Errors
    /// Returns [`CoreError::Validation`] if `max_price` is not a positive
    /// decimal or `sort_by` names an unknown field.
    pub fn validate(self) -> Result<WishQuery, CoreError> {
        let mut violations = Vec::new();

        let max_price = match non_empty(self.max_price) {
            None => None,
            Some(raw) => match Decimal::from_str(raw.trim()) {
                Ok(price) if price > Decimal::ZERO => Some(price),
                Ok(_) => {
                    violations.push(FieldViolation::new("max_price", "must be greater than zero"));
                    None
                }
                Err(_) => {
                    violations.push(FieldViolation::new(
                        "max_price",
                        format!("'{raw}' is not a decimal number"),
                    ));
                    None
                }
            },
        };

        let sort_by = match non_empty(self.sort_by) {
            None => None,
            Some(raw) => match raw.parse::<SortKey>() {
                Ok(key) => Some(key),
                Err(err) => {
                    violations.extend(err.violations().iter().cloned());
                    None
                }
            },
        };

        if !violations.is_empty() {
            return Err(CoreError::Validation { violations });
        }

        Ok(WishQuery {
            max_price,
            category: non_empty(self.category).map(|c| c.to_lowercase()),
            sort_by,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars().flat_map(char::to_lowercase).eq(b.chars().flat_map(char::to_lowercase))
}
