//! Rill Value - runtime values and the nominal type model.
//!
//! This crate provides:
//! - [`Value`]: the cheaply clonable runtime value, with heap payloads
//!   behind [`Heap`] and mutable storage behind [`CellValue`] /
//!   [`InstanceValue`]
//! - [`Capture`]: the per-call bundle of positional and named argument
//!   values, read-only to the binder
//! - [`TypeSystem`]: the smart-match seam ("does value satisfy
//!   constraint"), with [`TypeRegistry`] as the concrete nominal
//!   implementation and [`RuntimeConfig`] carrying the top-type and
//!   junction-type identities
//! - [`EvalError`]: the error raised by user-supplied constraint,
//!   default, or coercion code

mod capture;
pub mod errors;
pub mod types;
mod value;

pub use capture::Capture;
pub use errors::{EvalError, EvalResult};
pub use types::{BuiltinTypes, CoerceFn, RuntimeConfig, TypeId, TypeRegistry, TypeSystem};
pub use value::{CellValue, Heap, InstanceValue, JunctionKind, JunctionValue, Value};

// Re-export from rill_ir for convenience
pub use rill_ir::{Name, SharedInterner, StringInterner, StringLookup};
