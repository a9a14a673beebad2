use super::*;
use crate::Value;
use pretty_assertions::assert_eq;

fn registry() -> (SharedInterner, TypeRegistry) {
    let interner = SharedInterner::default();
    let registry = TypeRegistry::new(interner.clone());
    (interner, registry)
}

#[test]
fn test_builtin_type_of() {
    let (_, registry) = registry();
    let b = *registry.builtins();
    assert_eq!(registry.type_of(&Value::int(1)), b.int);
    assert_eq!(registry.type_of(&Value::str("x")), b.str);
    assert_eq!(registry.type_of(&Value::Nil), b.nil);
    assert_eq!(
        registry.type_of(&Value::junction(crate::JunctionKind::Any, vec![])),
        b.junction
    );
}

#[test]
fn test_cell_answers_for_contents() {
    let (_, registry) = registry();
    let b = *registry.builtins();
    assert_eq!(registry.type_of(&Value::cell(Value::int(1))), b.int);
}

#[test]
fn test_type_object_answers_own_type() {
    let (_, registry) = registry();
    let b = *registry.builtins();
    assert_eq!(registry.type_of(&Value::Type(b.str)), b.str);
}

#[test]
fn test_top_accepts_everything() {
    let (_, registry) = registry();
    let any = registry.builtins().any;
    assert!(registry.accepts(&Value::int(1), any));
    assert!(registry.accepts(&Value::Nil, any));
    assert!(registry.accepts(&Value::junction(crate::JunctionKind::One, vec![]), any));
}

#[test]
fn test_nominal_mismatch() {
    let (_, registry) = registry();
    let b = *registry.builtins();
    assert!(registry.accepts(&Value::int(1), b.int));
    assert!(!registry.accepts(&Value::str("x"), b.int));
}

#[test]
fn test_subtype_chain() {
    let (interner, mut registry) = registry();
    let any = registry.builtins().any;
    let animal = registry.register(interner.intern("Animal"), any);
    let dog = registry.register(interner.intern("Dog"), animal);

    let fido = Value::Instance(crate::InstanceValue::new(dog));
    assert!(registry.accepts(&fido, dog));
    assert!(registry.accepts(&fido, animal));
    assert!(registry.accepts(&fido, any));
    assert!(!registry.accepts(&fido, registry.builtins().int));
}

#[test]
fn test_config_identities() {
    let (_, registry) = registry();
    let config = registry.config();
    assert_eq!(config.top_type, registry.builtins().any);
    assert_eq!(config.junction_type, registry.builtins().junction);
}

#[test]
fn test_coercion_dispatch_and_inheritance() {
    let (interner, mut registry) = registry();
    let b = *registry.builtins();
    let to_int = interner.intern("Int");
    registry.register_coercion(b.any, to_int, |v| match v {
        Value::Str(s) => s
            .parse::<i64>()
            .map(Value::int)
            .map_err(|e| EvalError::new(e.to_string())),
        other => Ok(other.clone()),
    });

    // Registered on Any, resolved from Str via the parent chain.
    assert_eq!(
        registry.coerce(&Value::str("42"), b.int, to_int),
        Ok(Value::int(42))
    );
    // A faulty coercion is a user-code error.
    assert!(registry.coerce(&Value::str("nope"), b.int, to_int).is_err());
}

#[test]
fn test_can_coerce_resolves_the_parent_chain() {
    let (interner, mut registry) = registry();
    let b = *registry.builtins();
    let to_int = interner.intern("Int");
    registry.register_coercion(b.any, to_int, |v| Ok(v.clone()));
    let other = interner.intern("Other");

    // Inherited from Any through the chain; an unregistered method is
    // simply unanswered, no error involved.
    assert!(registry.can_coerce(&Value::str("x"), to_int));
    assert!(!registry.can_coerce(&Value::str("x"), other));
}

#[test]
fn test_missing_coercion_method() {
    let (interner, registry) = registry();
    let method = interner.intern("Widget");
    let err = registry
        .coerce(&Value::int(1), registry.builtins().int, method)
        .unwrap_err();
    assert!(err.message().contains("Widget"));
    assert!(err.message().contains("Int"));
}

#[test]
fn test_type_name_lookup() {
    let (interner, registry) = registry();
    let name = registry.type_name(registry.builtins().list);
    assert_eq!(interner.lookup(name), "List");
}
