//! Rill IR - interned names shared across the Rill runtime.
//!
//! The binder and its collaborators identify lexical names, named
//! arguments, type names, and method names by interned [`Name`] values
//! rather than strings, so comparisons and map lookups stay O(1).

mod interner;
mod name;

pub use interner::{InternError, SharedInterner, StringInterner, StringLookup};
pub use name::Name;
