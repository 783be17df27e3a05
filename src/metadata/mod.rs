//! In-memory metadata model assembled by the mapping drivers.
//!
//! A [`ClassMetadata`] owns its properties, table, cache and callback
//! descriptors. Parents are shared through `Arc` and never mutated by the
//! child being built.

pub mod association;
pub mod class;
pub mod constants;
pub mod field;
pub mod property;
pub mod table;

pub use association::*;
pub use class::*;
pub use constants::*;
pub use field::*;
pub use property::*;
pub use table::*;
