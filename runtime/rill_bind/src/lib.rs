//! Rill Bind - the argument binder.
//!
//! This crate matches a call's [`Capture`](rill_value::Capture) against
//! a [`Signature`](rill_sig::Signature) and writes the resulting
//! bindings into an [`Environment`]. It is the per-call core of
//! dispatch: candidates are tried by binding, and a failed bind is the
//! dispatcher's signal to move on.
//!
//! This crate provides:
//! - [`Binder`]: the single-pass binding algorithm, with staged writes
//!   so a failed or deferred bind leaves the environment untouched
//! - [`BindOutcome`]: the tri-state result (bound, junction deferral,
//!   or failure with a structured [`BindFailure`])
//! - [`DispatchFlags`]: per-call fast paths for dispatchers that have
//!   already checked or already bound the arguments
//! - [`Environment`]: chained lexical scopes holding [`Slot`]s, which
//!   record how each binding stores its value (plain, aliased, copied)
//! - capture adaptation helpers ([`parcel_of`], [`iter_of`],
//!   [`list_of`]) for turning slices of argument values into the
//!   runtime's aggregate shapes

mod adapt;
mod binder;
mod environment;
mod outcome;

pub use adapt::{iter_of, list_of, parcel_of, Flatten, ValueIter};
pub use binder::Binder;
pub use environment::{AssignError, Environment, LocalScope, Scope, Slot};
pub use outcome::{BindFailure, BindFailureKind, BindOutcome, DispatchFlags};
