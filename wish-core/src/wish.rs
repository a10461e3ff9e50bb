use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{CoreError, FieldViolation};
use crate::id::WishId;

/// Maximum length of a wish title, in characters.
pub const TITLE_MAX_CHARS: usize = 100;
/// Maximum length of the free-form notes, in characters.
pub const NOTES_MAX_CHARS: usize = 500;
/// Maximum length of a category label, in characters.
pub const CATEGORY_MAX_CHARS: usize = 50;

/// A stored wish record.
///
/// Only the store creates these, by attaching an id to a [`WishDraft`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Wish {
    /// Store-assigned identifier, immutable after creation.
    pub id: WishId,
    /// Trimmed, non-empty title.
    pub title: String,
    /// Optional `http`/`https` link to the item.
    pub link: Option<Url>,
    /// Optional positive price, held as a fixed-point decimal.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price_estimate: Option<Decimal>,
    /// Optional free-form notes.
    pub notes: Option<String>,
    /// Optional category, lower-cased on write.
    pub category: Option<String>,
}

impl Wish {
    /// Builds a record from a validated draft.
    #[must_use]
    pub fn from_draft(id: WishId, draft: WishDraft) -> Self {
        Self {
            id,
            title: draft.title,
            link: draft.link,
            price_estimate: draft.price_estimate,
            notes: draft.notes,
            category: draft.category,
        }
    }
}

/// Wish fields as received from a client, before any validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WishInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: Option<String>,
    /// Raw JSON number; converted to a decimal during validation.
    #[serde(default)]
    pub price_estimate: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl WishInput {
    /// Creates an input carrying only a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self { title: title.into(), ..Self::default() }
    }

    /// Checks every field and produces the normalised draft.
    ///
    /// All failing fields are reported together. On success the title is
    /// trimmed, the category lower-cased and the price normalised.
    ///
    /// # Errors
    /// Returns [`CoreError::Validation`] listing each field that broke a
    /// constraint.
    pub fn validate(self) -> Result<WishDraft, CoreError> {
        let mut violations = Vec::new();

        let title = self.title.trim().to_owned();
        if title.is_empty() {
            violations.push(FieldViolation::new("title", "must not be empty"));
        } else if title.chars().count() > TITLE_MAX_CHARS {
            violations.push(FieldViolation::new(
                "title",
                format!("must be at most {TITLE_MAX_CHARS} characters"),
            ));
        }

        let link = match self.link {
            None => None,
            Some(raw) => match parse_link(raw.trim()) {
                Ok(url) => Some(url),
                Err(message) => {
                    violations.push(FieldViolation::new("link", message));
                    None
                }
            },
        };

        let price_estimate = match self.price_estimate.map(to_price).transpose() {
            Ok(price) => price,
            Err(message) => {
                violations.push(FieldViolation::new("price_estimate", message));
                None
            }
        };

        if let Some(notes) = &self.notes {
            if notes.chars().count() > NOTES_MAX_CHARS {
                violations.push(FieldViolation::new(
                    "notes",
                    format!("must be at most {NOTES_MAX_CHARS} characters"),
                ));
            }
        }

        if let Some(category) = &self.category {
            if category.chars().count() > CATEGORY_MAX_CHARS {
                violations.push(FieldViolation::new(
                    "category",
                    format!("must be at most {CATEGORY_MAX_CHARS} characters"),
                ));
            }
        }

        if !violations.is_empty() {
            return Err(CoreError::Validation { violations });
        }

        Ok(WishDraft {
            title,
            link,
            price_estimate,
            notes: self.notes,
            category: self.category.map(|c| c.to_lowercase()),
        })
    }
}

/// A validated, normalised set of wish fields without an id.
///
/// Obtainable only through [`WishInput::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WishDraft {
    title: String,
    link: Option<Url>,
    price_estimate: Option<Decimal>,
    notes: Option<String>,
    category: Option<String>,
}

impl WishDraft {
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn price_estimate(&self) -> Option<Decimal> {
        self.price_estimate
    }

    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

fn parse_link(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw).map_err(|e| format!("must be a valid URL: {e}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}'; expected http or https", url.scheme()));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err("must include a host".to_owned());
    }
    Ok(url)
}

/// Converts a client price into a normalised positive decimal.
///
/// Positive values too small or too large for [`Decimal`] are reported as
/// such instead of being rounded to zero or rejected as malformed JSON.
fn to_price(raw: f64) -> Result<Decimal, String> {
    if raw.is_nan() || raw <= 0.0 {
        return Err("must be greater than zero".to_owned());
    }
    match Decimal::from_f64(raw) {
        Some(price) if !price.is_zero() => Ok(price.normalize()),
        _ if raw < 1.0 => Err(format!("{raw} is below the smallest supported price")),
        _ => Err(format!("{raw} exceeds the largest supported price")),
    }
}
