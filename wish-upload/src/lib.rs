//! Upload validation pipeline for the wishlist service.
//!
//! Checks an uploaded file's name, declared content type, size and leading
//! byte signature, in that order, and derives a storage-safe name for files
//! that pass. The pipeline neither logs nor persists anything.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod content_type;
pub mod error;
pub mod pipeline;

pub use config::{SignatureCheck, UploadConfig, DEFAULT_MAX_SIZE};
pub use content_type::AllowedType;
pub use error::{RejectReason, UploadRejection};
pub use pipeline::{Accepted, PendingUpload, UploadPipeline, UploadResult};
