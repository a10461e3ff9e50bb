//! HTTP API for the wishlist service.
//!
//! Exposes CRUD endpoints over the in-memory wish store, the validated
//! upload endpoint, and health and secret diagnostics.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
