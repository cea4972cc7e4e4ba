//! Core types and trait definitions for the Amity social-profile service.
//!
//! Everything here is transport- and storage-agnostic: the privacy model,
//! the visibility evaluator, and the store traits backends implement.

// Store trait impls use native `async fn` (stabilised in Rust 1.75); the
// advisory lint about `Send` bounds does not apply to how they are consumed.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod friend;
pub mod image;
pub mod message;
pub mod preferences;
pub mod privacy;
pub mod search;
pub mod status;
pub mod store;
pub mod visibility;

pub use error::{Error, Result};
