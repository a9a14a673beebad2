//! Bind results and failure taxonomy.
//!
//! A bind finishes in one of three ways: `Bound` (bindings written),
//! `Failed` (a recoverable mismatch the dispatch layer can react to by
//! trying the next candidate), or `Junction` (a control signal - the
//! caller re-runs the call once per junction alternative). Faults in
//! user-supplied constraint/default/coercion code are none of these;
//! they propagate as `EvalError` on the ordinary error channel.

use std::fmt;

/// Fast-path flags the dispatch layer sets per call attempt.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchFlags {
    /// The multi-dispatch cache already proved positional arity/type
    /// compatibility; junction, definedness, nominal, and post
    /// constraint checks are skipped.
    pub trust_checked: bool,
    /// Bindings were already written during a bindability probe; the
    /// bind is a no-op returning `Bound`.
    pub already_bound: bool,
}

impl DispatchFlags {
    /// Flags for a candidate the dispatch cache already validated.
    pub fn trusted() -> Self {
        DispatchFlags {
            trust_checked: true,
            already_bound: false,
        }
    }

    /// Flags for a call whose bindings a bindability probe already wrote.
    pub fn pre_bound() -> Self {
        DispatchFlags {
            trust_checked: false,
            already_bound: true,
        }
    }
}

/// Tri-state result of a bind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindOutcome {
    /// All parameters bound; the environment is populated.
    Bound,
    /// A junction hit a parameter that does not accept junctions. No
    /// bindings were written; the caller autothreads.
    Junction,
    /// The capture does not match the signature. No bindings were
    /// written.
    Failed(BindFailure),
}

impl BindOutcome {
    /// Whether the bind succeeded.
    pub fn is_bound(&self) -> bool {
        matches!(self, BindOutcome::Bound)
    }
}

/// Why a bind failed: the parameter at fault plus a typed reason.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindFailureKind {
    /// Ran out of positional arguments for a required parameter.
    NotEnoughPositionals { needed: usize, got: usize },
    /// Positional arguments remain and nothing slurps them.
    TooManyPositionals { max: usize, got: usize },
    /// A required named parameter matched none of its aliases.
    MissingRequiredNamed { parameter: String },
    /// Named arguments remain and nothing slurps them.
    UnexpectedNamed { names: Vec<String> },
    /// No positional argument available for an invocant parameter, or
    /// an attributive parameter bound without an object invocant.
    MissingInvocant { parameter: String },
    /// The argument does not satisfy the parameter's nominal type.
    TypeMismatch {
        parameter: String,
        expected: String,
        got: String,
    },
    /// The nominal check failed and the argument's type does not answer
    /// the declared coercion method.
    CoercionUnavailable { parameter: String, method: String },
    /// The argument violates the definedness requirement.
    DefinednessMismatch {
        parameter: String,
        required_defined: bool,
    },
    /// A post constraint rejected the argument.
    ConstraintFailed { parameter: String, index: usize },
    /// An `rw` parameter received a value instead of a container.
    RwRequiresContainer { parameter: String },
    /// A sub-signature parameter matched a value with no capture shape.
    NotDestructurable {
        parameter: String,
        shape: &'static str,
    },
}

impl fmt::Display for BindFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindFailureKind::NotEnoughPositionals { needed, got } => {
                write!(f, "not enough positional arguments: expected {needed}, got {got}")
            }
            BindFailureKind::TooManyPositionals { max, got } => {
                write!(f, "too many positional arguments: expected {max}, got {got}")
            }
            BindFailureKind::MissingRequiredNamed { parameter } => {
                write!(f, "missing required named parameter '{parameter}'")
            }
            BindFailureKind::UnexpectedNamed { names } => {
                write!(f, "unexpected named argument(s): {}", names.join(", "))
            }
            BindFailureKind::MissingInvocant { parameter } => {
                write!(f, "no invocant available for parameter '{parameter}'")
            }
            BindFailureKind::TypeMismatch {
                parameter,
                expected,
                got,
            } => write!(
                f,
                "parameter '{parameter}': type mismatch: expected {expected}, got {got}"
            ),
            BindFailureKind::CoercionUnavailable { parameter, method } => write!(
                f,
                "parameter '{parameter}': argument does not answer coercion method '{method}'"
            ),
            BindFailureKind::DefinednessMismatch {
                parameter,
                required_defined,
            } => {
                let req = if *required_defined {
                    "defined"
                } else {
                    "undefined"
                };
                write!(f, "parameter '{parameter}' requires a {req} argument")
            }
            BindFailureKind::ConstraintFailed { parameter, index } => {
                write!(f, "parameter '{parameter}': constraint #{index} failed")
            }
            BindFailureKind::RwRequiresContainer { parameter } => {
                write!(f, "rw parameter '{parameter}' requires a writable container")
            }
            BindFailureKind::NotDestructurable { parameter, shape } => {
                write!(f, "parameter '{parameter}': cannot destructure a {shape} value")
            }
        }
    }
}

/// A recoverable bind failure: typed kind plus the rendered message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BindFailure {
    kind: BindFailureKind,
    message: String,
}

impl BindFailure {
    /// Create a failure from its kind; the message is rendered once.
    pub fn new(kind: BindFailureKind) -> Self {
        let message = kind.to_string();
        BindFailure { kind, message }
    }

    /// The typed reason.
    pub fn kind(&self) -> &BindFailureKind {
        &self.kind
    }

    /// The rendered message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for BindFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for BindFailure {}

impl From<BindFailure> for BindOutcome {
    fn from(failure: BindFailure) -> Self {
        BindOutcome::Failed(failure)
    }
}
