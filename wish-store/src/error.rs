//! Error types for the store crate.

use wish_core::WishId;

/// Errors returned by [`crate::WishStore`] lookups and mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum StoreError {
    /// No record with the given id exists.
    #[error("wish {0} not found")]
    NotFound(WishId),
}
