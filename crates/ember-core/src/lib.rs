//! Ember Core - Foundational types for the Ember particle engine
//!
//! This crate provides the pieces every other Ember crate depends on:
//! - `EmberError` - The shared error type
//! - `Result` - Result alias over `EmberError`

mod error;

pub use error::{EmberError, Result};
