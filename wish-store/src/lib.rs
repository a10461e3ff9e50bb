//! In-memory wish collection.
//!
//! The store exclusively owns every wish record and the id counter for the
//! lifetime of the process. Handlers receive it by `Arc` handle.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod store;

pub use error::StoreError;
pub use store::WishStore;
