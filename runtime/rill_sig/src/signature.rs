//! The ordered, immutable parameter sequence of a routine.

use std::fmt;
use std::sync::Arc;

use rill_value::TypeId;

use crate::param::{ParamKind, ParamTraits, Parameter};

/// Structural invariant violation detected at signature construction.
///
/// The binder never sees a malformed signature: construction is the
/// single validation point, and a violation here is a programming error
/// in the routine definition, not a recoverable bind failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignatureError {
    /// A positional-consuming parameter follows a slurpy positional.
    SlurpyNotLast,
    /// More than one slurpy positional (or tuple-of-tuples) parameter.
    DuplicateSlurpyPositional,
    /// More than one slurpy named parameter.
    DuplicateSlurpyNamed,
    /// A required positional parameter follows an optional one.
    RequiredAfterOptional,
    /// A named parameter declares no acceptable argument names.
    MissingNamedAliases,
    /// An attributive parameter has no binding name to write under.
    AttributiveWithoutName,
    /// An invocant parameter appears after a non-invocant parameter.
    InvocantNotFirst,
}

impl fmt::Display for SignatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureError::SlurpyNotLast => {
                write!(f, "slurpy positional must be the last positional parameter")
            }
            SignatureError::DuplicateSlurpyPositional => {
                write!(f, "signature has more than one slurpy positional parameter")
            }
            SignatureError::DuplicateSlurpyNamed => {
                write!(f, "signature has more than one slurpy named parameter")
            }
            SignatureError::RequiredAfterOptional => write!(
                f,
                "required positional parameter follows an optional or slurpy parameter"
            ),
            SignatureError::MissingNamedAliases => {
                write!(f, "named parameter declares no acceptable argument names")
            }
            SignatureError::AttributiveWithoutName => {
                write!(f, "attributive parameter has no binding name")
            }
            SignatureError::InvocantNotFirst => {
                write!(f, "invocant parameter must precede all other parameters")
            }
        }
    }
}

impl std::error::Error for SignatureError {}

/// Ordered sequence of parameters plus a declared return type.
///
/// Created once when a routine or block is defined; immutable and
/// safely shared across concurrent calls (`Arc` inside, closure
/// payloads are `Send + Sync`).
#[derive(Clone, Debug)]
pub struct Signature {
    params: Arc<[Parameter]>,
    return_type: Option<TypeId>,
}

impl Signature {
    /// Validate and build a signature.
    pub fn new(
        params: Vec<Parameter>,
        return_type: Option<TypeId>,
    ) -> Result<Self, SignatureError> {
        let mut seen_optional_positional = false;
        let mut seen_slurpy_positional = false;
        let mut seen_slurpy_named = false;
        let mut seen_non_invocant = false;

        for param in &params {
            let kind = param.kind();
            match kind {
                ParamKind::Invocant | ParamKind::MultiInvocant => {
                    if seen_non_invocant {
                        return Err(SignatureError::InvocantNotFirst);
                    }
                    if seen_slurpy_positional {
                        return Err(SignatureError::SlurpyNotLast);
                    }
                }
                ParamKind::Positional { optional } => {
                    seen_non_invocant = true;
                    if seen_slurpy_positional {
                        return Err(SignatureError::SlurpyNotLast);
                    }
                    if optional {
                        seen_optional_positional = true;
                    } else if seen_optional_positional {
                        return Err(SignatureError::RequiredAfterOptional);
                    }
                }
                ParamKind::SlurpyPositional | ParamKind::SlurpyTuples => {
                    seen_non_invocant = true;
                    if seen_slurpy_positional {
                        return Err(SignatureError::DuplicateSlurpyPositional);
                    }
                    seen_slurpy_positional = true;
                }
                ParamKind::SlurpyNamed => {
                    seen_non_invocant = true;
                    if seen_slurpy_named {
                        return Err(SignatureError::DuplicateSlurpyNamed);
                    }
                    seen_slurpy_named = true;
                }
                ParamKind::Named { .. } => {
                    seen_non_invocant = true;
                    if param.named_aliases().is_empty() {
                        return Err(SignatureError::MissingNamedAliases);
                    }
                }
            }

            // A capture parameter swallows everything that remains.
            if param.traits().contains(ParamTraits::IS_CAPTURE) {
                if seen_slurpy_positional && !kind.is_slurpy_positional() {
                    return Err(SignatureError::DuplicateSlurpyPositional);
                }
                seen_slurpy_positional = true;
                seen_slurpy_named = true;
            }

            if param.attr_target().is_some() && param.binding_name().is_none() {
                return Err(SignatureError::AttributiveWithoutName);
            }
        }

        Ok(Signature {
            params: params.into(),
            return_type,
        })
    }

    /// The parameters, in declaration (= positional matching) order.
    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    /// The declared return type; `None` is the top type.
    pub fn return_type(&self) -> Option<TypeId> {
        self.return_type
    }

    /// Minimum number of positional arguments a capture must supply.
    pub fn min_positional(&self) -> usize {
        self.params
            .iter()
            .filter(|p| {
                matches!(
                    p.kind(),
                    ParamKind::Positional { optional: false }
                        | ParamKind::Invocant
                        | ParamKind::MultiInvocant
                ) && p.default().is_none()
                    && !p
                        .traits()
                        .intersects(ParamTraits::OUTER_DEFAULT | ParamTraits::IS_CAPTURE)
            })
            .count()
    }

    /// Maximum number of positional arguments; `None` when a slurpy or
    /// capture parameter absorbs any surplus.
    pub fn max_positional(&self) -> Option<usize> {
        let mut count = 0;
        for param in self.params.iter() {
            if param.kind().is_slurpy_positional()
                || param.traits().contains(ParamTraits::IS_CAPTURE)
            {
                return None;
            }
            if param.kind().consumes_one_positional() {
                count += 1;
            }
        }
        Some(count)
    }

    /// Whether `n` positional arguments can possibly satisfy this
    /// signature. The dispatch layer uses this as a cheap pre-filter
    /// before attempting a full bind.
    pub fn accepts_arity(&self, n: usize) -> bool {
        n >= self.min_positional() && self.max_positional().is_none_or(|max| n <= max)
    }
}
