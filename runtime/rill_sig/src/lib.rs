//! Rill Sig - the parameter and signature model.
//!
//! A [`Signature`] is the ordered, immutable declaration of a routine's
//! formal parameters plus its return type, created once at
//! routine-definition time and shared (read-only) across arbitrarily
//! many concurrent calls. Each [`Parameter`] carries one parameter's
//! full binding contract: its role ([`ParamKind`]), orthogonal traits
//! ([`ParamTraits`]), nominal type, constraints, coercion, default, and
//! optional nested signature for destructuring.
//!
//! Structural invariants (slurpy placement and uniqueness, no required
//! positional after an optional one, ...) are validated by
//! [`Signature::new`], so a malformed signature is unrepresentable at
//! bind time.

mod param;
mod signature;

pub use param::{
    AttrTarget, AttrVisibility, Coercion, ConstraintFn, DefaultFn, Definedness, ParamKind,
    ParamTraits, Parameter, ParameterBuilder,
};
pub use signature::{Signature, SignatureError};
