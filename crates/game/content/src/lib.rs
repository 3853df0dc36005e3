//! Data-driven content loaders.
//!
//! This crate reads static game content from RON/TOML data files:
//! - Content definitions per kind (`items.ron`, `effects.ron`, ...) via RON
//! - Engine configuration (`config.toml`) via TOML
//!
//! Definitions are fray-core types deserialized directly; the resulting
//! [`fray_core::ContentRegistry`] is immutable and replaced wholesale on reload.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, LoadResult, RonContentSource};
