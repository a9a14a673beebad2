//! One formal parameter's binding contract.

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;
use rill_ir::Name;
use rill_value::{EvalError, EvalResult, TypeId, Value};
use smallvec::SmallVec;

use crate::Signature;

/// The role a parameter plays in matching. Exactly one per parameter.
///
/// Optionality is part of the role: a positional parameter is required
/// or optional, a named parameter is optional unless declared required.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ParamKind {
    /// Consumes the next positional argument.
    Positional {
        /// Whether the parameter may be omitted.
        optional: bool,
    },
    /// Matched by name against the capture's named arguments.
    Named {
        /// Whether omission is a bind failure.
        required: bool,
    },
    /// Absorbs all remaining positional arguments as a flat list.
    SlurpyPositional,
    /// Absorbs all remaining named arguments as a mapping.
    SlurpyNamed,
    /// Absorbs remaining positional arguments preserving per-call
    /// boundaries: a list of tuples, one per original call boundary.
    /// Used by curried/partial application chains.
    SlurpyTuples,
    /// The receiver in a method call; consumed ahead of ordinary
    /// positionals.
    Invocant,
    /// An invocant the multiple-dispatch layer considers when sorting
    /// candidates. Binds exactly like [`ParamKind::Invocant`].
    MultiInvocant,
}

impl ParamKind {
    /// Whether this role consumes exactly one positional argument.
    pub fn consumes_one_positional(self) -> bool {
        matches!(
            self,
            ParamKind::Positional { .. } | ParamKind::Invocant | ParamKind::MultiInvocant
        )
    }

    /// Whether this role absorbs the remaining positional arguments.
    pub fn is_slurpy_positional(self) -> bool {
        matches!(self, ParamKind::SlurpyPositional | ParamKind::SlurpyTuples)
    }

    /// Whether this role is an invocant.
    pub fn is_invocant(self) -> bool {
        matches!(self, ParamKind::Invocant | ParamKind::MultiInvocant)
    }
}

bitflags! {
    /// Orthogonal boolean parameter traits.
    ///
    /// Independent of [`ParamKind`]: any combination is representable,
    /// and the roles that make a trait meaningful are documented per
    /// flag.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct ParamTraits: u8 {
        /// Bind an alias to the caller's container; mutations are
        /// visible to the caller ("rw").
        const RW = 1 << 0;
        /// Bind a private mutable copy of the argument.
        const COPY = 1 << 1;
        /// Bind an immutable snapshot ("parcel").
        const PARCEL = 1 << 2;
        /// When no argument is supplied, read the default from the
        /// enclosing scope under the parameter's own name.
        const OUTER_DEFAULT = 1 << 3;
        /// The parameter swallows every remaining positional and named
        /// argument as a single capture value.
        const IS_CAPTURE = 1 << 4;
        /// Marks the implicit method-level named slurpy; binding
        /// behavior matches an ordinary named slurpy.
        const METHOD_SLURPY = 1 << 5;
        /// The nominal type is a generic type variable instantiated by
        /// an outer stage; the bind-time nominal check is skipped.
        const GENERIC = 1 << 6;
    }
}

/// Definedness requirement checked before the nominal type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Definedness {
    /// No requirement.
    #[default]
    Unchecked,
    /// The argument must be defined (not nil, not a type object).
    Defined,
    /// The argument must be undefined.
    Undefined,
}

/// Declared coercion: when the argument fails the nominal check, invoke
/// `method` on it and use the result (of at least `target`) instead.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Coercion {
    /// The type the coercion produces.
    pub target: TypeId,
    /// The method invoked on the argument to coerce it.
    pub method: Name,
}

/// Visibility of an attributive binding target.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AttrVisibility {
    /// Public attribute.
    Public,
    /// Private attribute.
    Private,
}

/// Attributive binding: the bound value is also written into an
/// attribute of the invocant, under the parameter's binding name.
///
/// The target object is resolved at bind time from the invocant bound
/// earlier in the same pass; an immutable shared signature cannot carry
/// a per-call object.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AttrTarget {
    /// Attribute visibility, recorded on the write.
    pub visibility: AttrVisibility,
}

/// Lazily evaluated default value closure.
pub type DefaultFn = Arc<dyn Fn() -> EvalResult + Send + Sync>;

/// Post constraint: a predicate evaluated after the nominal check.
pub type ConstraintFn = Arc<dyn Fn(&Value) -> Result<bool, EvalError> + Send + Sync>;

type NameList = SmallVec<[Name; 2]>;

/// One formal parameter's full binding contract. Immutable once built;
/// construct through [`ParameterBuilder`].
#[derive(Clone)]
pub struct Parameter {
    binding_name: Option<Name>,
    kind: ParamKind,
    named_aliases: NameList,
    type_captures: NameList,
    traits: ParamTraits,
    definedness: Definedness,
    nominal_type: Option<TypeId>,
    post_constraints: Vec<ConstraintFn>,
    coercion: Option<Coercion>,
    sub_signature: Option<Arc<Signature>>,
    default: Option<DefaultFn>,
    attr_target: Option<AttrTarget>,
}

impl Parameter {
    /// Builder for an arbitrary role, with no binding name.
    pub fn build(kind: ParamKind) -> ParameterBuilder {
        ParameterBuilder::new(kind)
    }

    /// Required positional parameter bound to `name`.
    pub fn positional(name: Name) -> ParameterBuilder {
        ParameterBuilder::new(ParamKind::Positional { optional: false }).name(name)
    }

    /// Optional positional parameter bound to `name`.
    pub fn optional(name: Name) -> ParameterBuilder {
        ParameterBuilder::new(ParamKind::Positional { optional: true }).name(name)
    }

    /// Optional named parameter; `name` doubles as its alias.
    pub fn named(name: Name) -> ParameterBuilder {
        ParameterBuilder::new(ParamKind::Named { required: false })
            .name(name)
            .alias(name)
    }

    /// Required named parameter; `name` doubles as its alias.
    pub fn required_named(name: Name) -> ParameterBuilder {
        ParameterBuilder::new(ParamKind::Named { required: true })
            .name(name)
            .alias(name)
    }

    /// Slurpy positional parameter bound to `name`.
    pub fn slurpy_positional(name: Name) -> ParameterBuilder {
        ParameterBuilder::new(ParamKind::SlurpyPositional).name(name)
    }

    /// Slurpy named parameter bound to `name`.
    pub fn slurpy_named(name: Name) -> ParameterBuilder {
        ParameterBuilder::new(ParamKind::SlurpyNamed).name(name)
    }

    /// Tuple-of-tuples slurpy parameter bound to `name`.
    pub fn slurpy_tuples(name: Name) -> ParameterBuilder {
        ParameterBuilder::new(ParamKind::SlurpyTuples).name(name)
    }

    /// Invocant parameter bound to `name`.
    pub fn invocant(name: Name) -> ParameterBuilder {
        ParameterBuilder::new(ParamKind::Invocant).name(name)
    }
}

// Read access
impl Parameter {
    /// The lexical name to bind to, if any. Absent for purely
    /// positional slots used only for type checking.
    pub fn binding_name(&self) -> Option<Name> {
        self.binding_name
    }

    /// The parameter's role.
    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    /// Acceptable argument names when the role is named.
    pub fn named_aliases(&self) -> &[Name] {
        &self.named_aliases
    }

    /// Names the matched value's runtime type is additionally bound to.
    pub fn type_captures(&self) -> &[Name] {
        &self.type_captures
    }

    /// The orthogonal trait set.
    pub fn traits(&self) -> ParamTraits {
        self.traits
    }

    /// The definedness requirement.
    pub fn definedness(&self) -> Definedness {
        self.definedness
    }

    /// The declared nominal type; `None` is the universal top type.
    pub fn nominal_type(&self) -> Option<TypeId> {
        self.nominal_type
    }

    /// Post constraints, evaluated in order after the nominal check.
    pub fn post_constraints(&self) -> &[ConstraintFn] {
        &self.post_constraints
    }

    /// The declared coercion, if any.
    pub fn coercion(&self) -> Option<Coercion> {
        self.coercion
    }

    /// Nested signature for destructuring the matched value.
    pub fn sub_signature(&self) -> Option<&Arc<Signature>> {
        self.sub_signature.as_ref()
    }

    /// The default value closure, if any.
    pub fn default(&self) -> Option<&DefaultFn> {
        self.default.as_ref()
    }

    /// The attributive binding target, if any.
    pub fn attr_target(&self) -> Option<AttrTarget> {
        self.attr_target
    }
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parameter")
            .field("binding_name", &self.binding_name)
            .field("kind", &self.kind)
            .field("traits", &self.traits)
            .field("definedness", &self.definedness)
            .field("nominal_type", &self.nominal_type)
            .field("constraints", &self.post_constraints.len())
            .field("has_default", &self.default.is_some())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Parameter`].
pub struct ParameterBuilder {
    param: Parameter,
}

impl ParameterBuilder {
    /// Start a parameter of the given role.
    pub fn new(kind: ParamKind) -> Self {
        ParameterBuilder {
            param: Parameter {
                binding_name: None,
                kind,
                named_aliases: NameList::new(),
                type_captures: NameList::new(),
                traits: ParamTraits::empty(),
                definedness: Definedness::Unchecked,
                nominal_type: None,
                post_constraints: Vec::new(),
                coercion: None,
                sub_signature: None,
                default: None,
                attr_target: None,
            },
        }
    }

    /// Set the lexical binding name.
    #[must_use]
    pub fn name(mut self, name: Name) -> Self {
        self.param.binding_name = Some(name);
        self
    }

    /// Add an acceptable argument name for a named parameter.
    #[must_use]
    pub fn alias(mut self, alias: Name) -> Self {
        self.param.named_aliases.push(alias);
        self
    }

    /// Add a type-capture name.
    #[must_use]
    pub fn type_capture(mut self, name: Name) -> Self {
        self.param.type_captures.push(name);
        self
    }

    /// Add traits to the parameter's trait set.
    #[must_use]
    pub fn traits(mut self, traits: ParamTraits) -> Self {
        self.param.traits |= traits;
        self
    }

    /// Set the definedness requirement.
    #[must_use]
    pub fn definedness(mut self, definedness: Definedness) -> Self {
        self.param.definedness = definedness;
        self
    }

    /// Set the nominal type.
    #[must_use]
    pub fn of_type(mut self, ty: TypeId) -> Self {
        self.param.nominal_type = Some(ty);
        self
    }

    /// Append a post constraint.
    #[must_use]
    pub fn constraint(mut self, f: ConstraintFn) -> Self {
        self.param.post_constraints.push(f);
        self
    }

    /// Declare a coercion.
    #[must_use]
    pub fn coerce(mut self, target: TypeId, method: Name) -> Self {
        self.param.coercion = Some(Coercion { target, method });
        self
    }

    /// Attach a nested signature for destructuring.
    #[must_use]
    pub fn destructure(mut self, sub: Signature) -> Self {
        self.param.sub_signature = Some(Arc::new(sub));
        self
    }

    /// Set the default value closure.
    #[must_use]
    pub fn default(mut self, f: DefaultFn) -> Self {
        self.param.default = Some(f);
        self
    }

    /// Set a constant default value.
    #[must_use]
    pub fn default_value(self, value: Value) -> Self {
        self.default(Arc::new(move || Ok(value.clone())))
    }

    /// Bind attributively into the invocant with the given visibility.
    #[must_use]
    pub fn attr(mut self, visibility: AttrVisibility) -> Self {
        self.param.attr_target = Some(AttrTarget { visibility });
        self
    }

    /// Finish the parameter.
    pub fn build(self) -> Parameter {
        self.param
    }
}
