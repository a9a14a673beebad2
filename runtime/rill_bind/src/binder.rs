//! The core binding algorithm.
//!
//! [`Binder::bind`] matches a [`Capture`] against a [`Signature`] in a
//! single pass over the parameters in declaration order, maintaining a
//! cursor into the positional arguments and a working copy of the named
//! mapping. Bindings are staged and committed only on success, so a
//! failed or deferred bind leaves the environment untouched and the
//! dispatch layer can move on to the next candidate.

use std::sync::Arc;

use rill_ir::{Name, SharedInterner};
use rill_sig::{Definedness, ParamKind, ParamTraits, Parameter, Signature};
use rill_value::{
    Capture, CellValue, EvalError, InstanceValue, RuntimeConfig, TypeRegistry, TypeSystem, Value,
};
use rustc_hash::FxHashMap;

use crate::adapt::{list_of, parcel_of, Flatten};
use crate::environment::{Environment, Slot};
use crate::outcome::{BindFailure, BindFailureKind, BindOutcome, DispatchFlags};

/// A binding waiting for the pass to succeed.
enum StagedWrite {
    /// Bind `name` in the target environment's current scope.
    Lexical { name: Name, slot: Slot },
    /// Write `value` into an attribute of the bound invocant.
    Attribute {
        object: InstanceValue,
        name: Name,
        value: Value,
    },
}

/// Shorthand for one step of the pass: `None` continues, `Some`
/// aborts with the given outcome, `Err` is a user-code fault.
type StepResult = Result<Option<BindOutcome>, EvalError>;

/// The argument binder.
///
/// Holds the runtime-wide type identities, the smart-match capability,
/// and the interner for rendering failure messages. Carries no mutable
/// state across calls: user closures evaluated during a bind may
/// recursively re-enter `bind` freely.
pub struct Binder {
    config: RuntimeConfig,
    types: Arc<dyn TypeSystem>,
    names: SharedInterner,
}

impl Binder {
    /// Create a binder over an explicit type system.
    pub fn new(config: RuntimeConfig, types: Arc<dyn TypeSystem>, names: SharedInterner) -> Self {
        Binder {
            config,
            types,
            names,
        }
    }

    /// Create a binder over a [`TypeRegistry`], taking the registry's
    /// own configuration.
    pub fn from_registry(registry: TypeRegistry, names: SharedInterner) -> Self {
        let config = registry.config();
        Binder::new(config, Arc::new(registry), names)
    }

    /// Match `capture` against `signature` and, on success, write the
    /// bindings into `env`.
    ///
    /// Returns the tri-state [`BindOutcome`]; errors raised by
    /// user-supplied constraint, default, or coercion code propagate
    /// unmodified as `Err`.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn bind(
        &self,
        env: &mut Environment,
        signature: &Signature,
        capture: &Capture,
        flags: DispatchFlags,
    ) -> Result<BindOutcome, EvalError> {
        if flags.already_bound {
            // The dispatcher already wrote the bindings during a
            // bindability probe.
            return Ok(BindOutcome::Bound);
        }

        let mut writes = Vec::new();
        let outcome = self.bind_signature(&mut writes, env, signature, capture, flags)?;
        if outcome.is_bound() {
            for write in writes {
                match write {
                    StagedWrite::Lexical { name, slot } => env.bind(name, slot),
                    StagedWrite::Attribute {
                        object,
                        name,
                        value,
                    } => object.set_attr(name, value),
                }
            }
        }
        Ok(outcome)
    }

    /// One pass over a signature's parameters, staging writes. Also the
    /// recursion point for sub-signature destructuring.
    fn bind_signature(
        &self,
        writes: &mut Vec<StagedWrite>,
        env: &Environment,
        signature: &Signature,
        capture: &Capture,
        flags: DispatchFlags,
    ) -> Result<BindOutcome, EvalError> {
        let positional = capture.positional();
        let mut cursor = 0usize;
        let mut named: FxHashMap<Name, Value> = capture.named().clone();
        let mut saw_slurpy_positional = false;
        let mut saw_slurpy_named = false;
        let mut invocant: Option<Value> = None;
        let run_checks = !flags.trust_checked;

        for (index, param) in signature.params().iter().enumerate() {
            // A capture parameter swallows everything that remains,
            // positional and named alike.
            if param.traits().contains(ParamTraits::IS_CAPTURE) {
                let rest = Capture::new(
                    positional[cursor..].to_vec(),
                    std::mem::take(&mut named),
                );
                cursor = positional.len();
                saw_slurpy_positional = true;
                saw_slurpy_named = true;
                let step = self.bind_collected(writes, param, Value::capture(rest), &invocant);
                if let Some(outcome) = step {
                    return Ok(outcome);
                }
                continue;
            }

            match param.kind() {
                ParamKind::Invocant | ParamKind::MultiInvocant => {
                    if cursor >= positional.len() {
                        return Ok(Self::fail(BindFailureKind::MissingInvocant {
                            parameter: self.param_label(param, index),
                        }));
                    }
                    let value = positional[cursor].clone();
                    cursor += 1;
                    if let Some(outcome) = self.bind_argument(
                        writes,
                        env,
                        param,
                        index,
                        value,
                        run_checks,
                        &mut invocant,
                    )? {
                        return Ok(outcome);
                    }
                }
                ParamKind::Positional { optional } => {
                    if cursor < positional.len() {
                        let value = positional[cursor].clone();
                        cursor += 1;
                        if let Some(outcome) = self.bind_argument(
                            writes,
                            env,
                            param,
                            index,
                            value,
                            run_checks,
                            &mut invocant,
                        )? {
                            return Ok(outcome);
                        }
                    } else if optional
                        || param.default().is_some()
                        || param.traits().contains(ParamTraits::OUTER_DEFAULT)
                    {
                        if let Some(outcome) =
                            self.bind_default(writes, env, param, &invocant)?
                        {
                            return Ok(outcome);
                        }
                    } else {
                        return Ok(Self::fail(BindFailureKind::NotEnoughPositionals {
                            needed: signature.min_positional(),
                            got: positional.len(),
                        }));
                    }
                }
                ParamKind::Named { required } => {
                    let mut matched = None;
                    for alias in param.named_aliases() {
                        if let Some(value) = named.remove(alias) {
                            matched = Some(value);
                            break;
                        }
                    }
                    match matched {
                        Some(value) => {
                            if let Some(outcome) = self.bind_argument(
                                writes,
                                env,
                                param,
                                index,
                                value,
                                run_checks,
                                &mut invocant,
                            )? {
                                return Ok(outcome);
                            }
                        }
                        None if required => {
                            return Ok(Self::fail(BindFailureKind::MissingRequiredNamed {
                                parameter: self.param_label(param, index),
                            }));
                        }
                        None => {
                            if let Some(outcome) =
                                self.bind_default(writes, env, param, &invocant)?
                            {
                                return Ok(outcome);
                            }
                        }
                    }
                }
                ParamKind::SlurpyPositional => {
                    let rest = &positional[cursor..];
                    cursor = positional.len();
                    saw_slurpy_positional = true;
                    // A parcel slurpy keeps the arguments as-is; the
                    // plain form flattens one level of sequence.
                    let value = if param.traits().contains(ParamTraits::PARCEL) {
                        parcel_of(rest)
                    } else {
                        Value::list(list_of(rest, Flatten::One))
                    };
                    if let Some(outcome) = self.bind_collected(writes, param, value, &invocant)
                    {
                        return Ok(outcome);
                    }
                }
                ParamKind::SlurpyTuples => {
                    // Preserve per-call boundaries: a nested capture or
                    // tuple keeps its own grouping, anything else
                    // becomes a singleton.
                    let mut groups = Vec::with_capacity(positional.len() - cursor);
                    for value in &positional[cursor..] {
                        groups.push(match value.deref_cell() {
                            Value::Capture(c) => Value::tuple(c.positional().to_vec()),
                            Value::Tuple(items) => Value::tuple(items.to_vec()),
                            other => Value::tuple(vec![other]),
                        });
                    }
                    cursor = positional.len();
                    saw_slurpy_positional = true;
                    if let Some(outcome) =
                        self.bind_collected(writes, param, Value::list(groups), &invocant)
                    {
                        return Ok(outcome);
                    }
                }
                ParamKind::SlurpyNamed => {
                    saw_slurpy_named = true;
                    let value = Value::map(std::mem::take(&mut named));
                    if let Some(outcome) = self.bind_collected(writes, param, value, &invocant)
                    {
                        return Ok(outcome);
                    }
                }
            }
        }

        if cursor < positional.len() && !saw_slurpy_positional {
            return Ok(Self::fail(BindFailureKind::TooManyPositionals {
                max: signature.max_positional().unwrap_or(cursor),
                got: positional.len(),
            }));
        }
        if !named.is_empty() && !saw_slurpy_named {
            let mut leftover: Vec<String> = named
                .keys()
                .map(|name| self.names.lookup(*name).to_string())
                .collect();
            leftover.sort_unstable();
            return Ok(Self::fail(BindFailureKind::UnexpectedNamed { names: leftover }));
        }
        Ok(BindOutcome::Bound)
    }

    /// Bind one supplied argument value: checks, coercion, optional
    /// destructuring, then staging.
    #[expect(
        clippy::too_many_arguments,
        reason = "One pass-state bundle per argument; a struct would obscure the flow"
    )]
    fn bind_argument(
        &self,
        writes: &mut Vec<StagedWrite>,
        env: &Environment,
        param: &Parameter,
        index: usize,
        value: Value,
        run_checks: bool,
        invocant: &mut Option<Value>,
    ) -> StepResult {
        let mut value = value;

        if run_checks {
            let payload = value.deref_cell();
            let nominal = param.nominal_type().unwrap_or(self.config.top_type);

            // Junction guard: a junction against a parameter that does
            // not accept junctions defers the whole bind to the caller.
            if self.types.type_of(&payload) == self.config.junction_type
                && nominal != self.config.top_type
                && nominal != self.config.junction_type
            {
                tracing::trace!("junction argument defers bind for autothreading");
                return Ok(Some(BindOutcome::Junction));
            }

            match param.definedness() {
                Definedness::Unchecked => {}
                Definedness::Defined if !payload.is_defined() => {
                    return Ok(Some(Self::fail(BindFailureKind::DefinednessMismatch {
                        parameter: self.param_label(param, index),
                        required_defined: true,
                    })));
                }
                Definedness::Undefined if payload.is_defined() => {
                    return Ok(Some(Self::fail(BindFailureKind::DefinednessMismatch {
                        parameter: self.param_label(param, index),
                        required_defined: false,
                    })));
                }
                Definedness::Defined | Definedness::Undefined => {}
            }

            // Nominal check, with declared coercion as the fallback.
            // A generic nominal type is instantiated by an outer stage
            // and not checked here.
            if !param.traits().contains(ParamTraits::GENERIC)
                && !self.types.accepts(&payload, nominal)
            {
                match param.coercion() {
                    // An argument that does not answer the coercion
                    // method is an ordinary failure: no user code ran,
                    // and the dispatcher may still have candidates.
                    Some(coercion) if !self.types.can_coerce(&payload, coercion.method) => {
                        return Ok(Some(Self::fail(BindFailureKind::CoercionUnavailable {
                            parameter: self.param_label(param, index),
                            method: self.names.lookup(coercion.method).to_string(),
                        })));
                    }
                    Some(coercion) => {
                        let coerced =
                            self.types.coerce(&payload, coercion.target, coercion.method)?;
                        if !self.types.accepts(&coerced, nominal)
                            && !self.types.accepts(&coerced, coercion.target)
                        {
                            return Ok(Some(self.type_mismatch(param, index, nominal, &coerced)));
                        }
                        // The coerced result replaces the original for
                        // all subsequent checks and for binding.
                        value = coerced;
                    }
                    None => {
                        return Ok(Some(self.type_mismatch(param, index, nominal, &payload)));
                    }
                }
            }

            for (constraint_index, constraint) in param.post_constraints().iter().enumerate() {
                let target = value.deref_cell();
                if !constraint(&target)? {
                    return Ok(Some(Self::fail(BindFailureKind::ConstraintFailed {
                        parameter: self.param_label(param, index),
                        index: constraint_index,
                    })));
                }
            }
        }

        if let Some(sub) = param.sub_signature() {
            let sub_capture = match self.destructure(param, index, &value, sub) {
                Ok(capture) => capture,
                Err(failure) => return Ok(Some(BindOutcome::Failed(failure))),
            };
            // A nested signature applies the identical contract; the
            // dispatch fast-path flags never extend into it.
            let outcome =
                self.bind_signature(writes, env, sub, &sub_capture, DispatchFlags::default())?;
            if !outcome.is_bound() {
                return Ok(Some(outcome));
            }
        }

        if let Some(outcome) = self.stage(writes, param, index, &value, false, invocant) {
            return Ok(Some(outcome));
        }
        if param.kind().is_invocant() {
            *invocant = Some(value.deref_cell());
        }
        Ok(None)
    }

    /// Bind a freshly collected slurpy value. Collections are built by
    /// the binder itself, so nominal/constraint checks do not apply.
    fn bind_collected(
        &self,
        writes: &mut Vec<StagedWrite>,
        param: &Parameter,
        value: Value,
        invocant: &Option<Value>,
    ) -> Option<BindOutcome> {
        self.stage_with_invocant(writes, param, &value, true, invocant)
    }

    /// Default path for a parameter that received no argument.
    fn bind_default(
        &self,
        writes: &mut Vec<StagedWrite>,
        env: &Environment,
        param: &Parameter,
        invocant: &Option<Value>,
    ) -> StepResult {
        if param.traits().contains(ParamTraits::OUTER_DEFAULT) {
            if let Some(name) = param.binding_name() {
                if let Some(value) = env.lookup(name) {
                    return Ok(self.stage_with_invocant(writes, param, &value, true, invocant));
                }
            }
        }
        if let Some(default) = param.default() {
            // Evaluated exactly once, and only because no argument was
            // supplied. A fault in the closure propagates unmodified.
            let value = default()?;
            return Ok(self.stage_with_invocant(writes, param, &value, true, invocant));
        }
        if matches!(param.kind(), ParamKind::Positional { .. }) {
            // No default: an optional positional binds the undefined
            // type object of its nominal type.
            let nominal = param.nominal_type().unwrap_or(self.config.top_type);
            return Ok(self.stage_with_invocant(
                writes,
                param,
                &Value::Type(nominal),
                true,
                invocant,
            ));
        }
        // An optional named parameter without a default stays unbound.
        Ok(None)
    }

    /// Determine the storage mode and stage the lexical, attributive,
    /// and type-capture writes for one parameter.
    fn stage(
        &self,
        writes: &mut Vec<StagedWrite>,
        param: &Parameter,
        index: usize,
        value: &Value,
        synthesized: bool,
        invocant: &Option<Value>,
    ) -> Option<BindOutcome> {
        let traits = param.traits();
        let slot = if traits.contains(ParamTraits::RW) {
            match value.as_cell() {
                Some(cell) => Slot::Alias(cell.clone()),
                // A synthesized value (default, collection) has no
                // caller-side container; give it a fresh one.
                None if synthesized => Slot::Copied(CellValue::new(value.clone())),
                None => {
                    return Some(Self::fail(BindFailureKind::RwRequiresContainer {
                        parameter: self.param_label(param, index),
                    }));
                }
            }
        } else if traits.contains(ParamTraits::COPY) {
            Slot::Copied(CellValue::new(value.deref_cell()))
        } else if traits.intersects(ParamTraits::PARCEL | ParamTraits::IS_CAPTURE) {
            Slot::Value(value.clone())
        } else {
            Slot::Value(value.deref_cell())
        };

        if let Some(name) = param.binding_name() {
            writes.push(StagedWrite::Lexical { name, slot });
        }

        // Signature validation guarantees an attributive parameter
        // carries a binding name, so the pair matches together.
        if let (Some(attr), Some(name)) = (param.attr_target(), param.binding_name()) {
            match invocant {
                Some(Value::Instance(object)) => {
                    tracing::trace!(visibility = ?attr.visibility, "staging attributive write");
                    writes.push(StagedWrite::Attribute {
                        object: object.clone(),
                        name,
                        value: value.deref_cell(),
                    });
                }
                _ => {
                    return Some(Self::fail(BindFailureKind::MissingInvocant {
                        parameter: self.param_label(param, index),
                    }));
                }
            }
        }

        for capture_name in param.type_captures() {
            writes.push(StagedWrite::Lexical {
                name: *capture_name,
                slot: Slot::Value(Value::Type(self.types.type_of(value))),
            });
        }
        None
    }

    /// `stage` for call sites without a parameter index on hand.
    fn stage_with_invocant(
        &self,
        writes: &mut Vec<StagedWrite>,
        param: &Parameter,
        value: &Value,
        synthesized: bool,
        invocant: &Option<Value>,
    ) -> Option<BindOutcome> {
        self.stage(writes, param, usize::MAX, value, synthesized, invocant)
    }

    /// Adapt a matched value to the capture shape its sub-signature
    /// destructures.
    fn destructure(
        &self,
        param: &Parameter,
        index: usize,
        value: &Value,
        sub: &Signature,
    ) -> Result<Capture, BindFailure> {
        match value.deref_cell() {
            Value::Capture(capture) => Ok((*capture).clone()),
            Value::Tuple(items) | Value::List(items) => Ok(Capture::of(items.to_vec())),
            Value::Instance(object) => {
                // Attribute destructuring: the nested signature's named
                // parameters pull matching attributes off the object.
                let mut attrs: FxHashMap<Name, Value> = FxHashMap::default();
                for sub_param in sub.params() {
                    if matches!(sub_param.kind(), ParamKind::Named { .. }) {
                        for alias in sub_param.named_aliases() {
                            if let Some(attr_value) = object.attr(*alias) {
                                attrs.insert(*alias, attr_value);
                                break;
                            }
                        }
                    }
                }
                Ok(Capture::new(Vec::new(), attrs))
            }
            other => Err(BindFailure::new(BindFailureKind::NotDestructurable {
                parameter: self.param_label(param, index),
                shape: other.shape_name(),
            })),
        }
    }

    fn type_mismatch(
        &self,
        param: &Parameter,
        index: usize,
        nominal: rill_value::TypeId,
        got: &Value,
    ) -> BindOutcome {
        Self::fail(BindFailureKind::TypeMismatch {
            parameter: self.param_label(param, index),
            expected: self
                .names
                .lookup(self.types.type_name(nominal))
                .to_string(),
            got: self
                .names
                .lookup(self.types.type_name(self.types.type_of(got)))
                .to_string(),
        })
    }

    /// Human-readable identity of a parameter for failure messages.
    fn param_label(&self, param: &Parameter, index: usize) -> String {
        if let Some(name) = param.binding_name() {
            return self.names.lookup(name).to_string();
        }
        if let Some(alias) = param.named_aliases().first() {
            return self.names.lookup(*alias).to_string();
        }
        if index == usize::MAX {
            return "<anonymous>".to_string();
        }
        format!("<parameter {index}>")
    }

    fn fail(kind: BindFailureKind) -> BindOutcome {
        let failure = BindFailure::new(kind);
        tracing::trace!(%failure, "bind failed");
        BindOutcome::Failed(failure)
    }
}
