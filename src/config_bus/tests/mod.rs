//! Unit tests for config_bus module
//! No filesystem or external dependencies.

#![allow(clippy::panic)]


use crate::config_bus::AccessMask;

#[test]
fn access_any_is_read_and_write() {
    assert_eq!(AccessMask::ANY, AccessMask::READ | AccessMask::WRITE);
    assert!(AccessMask::ANY.contains(AccessMask::READ));
    assert!(AccessMask::ANY.contains(AccessMask::WRITE));
}

#[test]
fn access_matches_on_intersection() {
    assert!(AccessMask::READ.matches(AccessMask::READ));
    assert!(!AccessMask::READ.matches(AccessMask::WRITE));
    assert!(AccessMask::ANY.matches(AccessMask::WRITE));
    assert!(!AccessMask::empty().matches(AccessMask::ANY));
}

#[test]
fn access_display() {
    assert_eq!(AccessMask::READ.to_string(), "read");
    assert_eq!(AccessMask::WRITE.to_string(), "write");
    assert_eq!(AccessMask::ANY.to_string(), "any");
    assert_eq!(AccessMask::empty().to_string(), "none");
}

#[test]
fn access_remove_clears_bits() {
    let mut mask = AccessMask::ANY;
    mask.remove(AccessMask::WRITE);
    assert_eq!(mask, AccessMask::READ);

    mask.remove(AccessMask::READ);
    assert!(mask.is_empty());
}
