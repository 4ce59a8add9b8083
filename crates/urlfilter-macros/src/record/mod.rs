//! Implementation of the `#[derive(Record)]` macro.
//!
//! This module generates the `Record` implementation that declares a
//! struct's fields to the urlfilter engine.

mod attrs;
mod derive;

pub use derive::record_derive_impl;
