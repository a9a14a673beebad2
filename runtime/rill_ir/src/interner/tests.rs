use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_intern_same_string_same_name() {
    let interner = StringInterner::new();
    let a = interner.intern("foo");
    let b = interner.intern("foo");
    assert_eq!(a, b);
}

#[test]
fn test_intern_different_strings_different_names() {
    let interner = StringInterner::new();
    let a = interner.intern("foo");
    let b = interner.intern("bar");
    assert_ne!(a, b);
}

#[test]
fn test_lookup_round_trip() {
    let interner = StringInterner::new();
    let n = interner.intern("rest");
    assert_eq!(interner.lookup(n), "rest");
}

#[test]
fn test_empty_pre_interned() {
    let interner = StringInterner::new();
    assert_eq!(interner.lookup(Name::EMPTY), "");
    assert_eq!(interner.intern(""), Name::EMPTY);
    assert!(interner.is_empty());
}

#[test]
fn test_unknown_name_lookup_is_empty() {
    let interner = StringInterner::new();
    assert_eq!(interner.lookup(Name::from_raw(999)), "");
}

#[test]
fn test_len_counts_distinct_strings() {
    let interner = StringInterner::new();
    interner.intern("a");
    interner.intern("b");
    interner.intern("a");
    assert_eq!(interner.len(), 3); // "" + "a" + "b"
}

#[test]
fn test_shared_interner_clones_share_table() {
    let shared = SharedInterner::default();
    let n = shared.intern("x");
    let clone = shared.clone();
    assert_eq!(clone.lookup(n), "x");
}

#[test]
fn test_string_lookup_trait_object() {
    let interner = StringInterner::new();
    let n = interner.intern("named");
    let dyn_lookup: &dyn StringLookup = &interner;
    assert_eq!(dyn_lookup.lookup(n), "named");
}
