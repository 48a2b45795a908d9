//! Prelude module for biblio_format crate.
//!
//! Re-exports the derive_more macros shared by the date, markup and entity types.

#[allow(unused_imports)]
pub use derive_more::{Deref, Display};
