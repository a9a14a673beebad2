use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_empty_is_zero() {
    assert_eq!(Name::EMPTY.raw(), 0);
    assert_eq!(Name::default(), Name::EMPTY);
}

#[test]
fn test_round_trip() {
    let n = Name::from_raw(42);
    assert_eq!(n.raw(), 42);
    assert_eq!(n.index(), 42);
}

#[test]
fn test_ordering_follows_raw() {
    assert!(Name::from_raw(1) < Name::from_raw(2));
}

#[test]
fn test_debug_format() {
    assert_eq!(format!("{:?}", Name::from_raw(7)), "Name(7)");
}
