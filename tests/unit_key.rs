/// Unit tests for TypeKey and ServiceIdentity

use ferrous_ioc::{key_of_type, ServiceIdentity, TypeKey};
use std::any::TypeId;
use std::collections::HashSet;

trait Greeter: Send + Sync {}

#[test]
fn test_key_display_name_type() {
    let key = key_of_type::<String>();
    assert_eq!(key.display_name(), "alloc::string::String");
    assert_eq!(key.to_string(), "alloc::string::String");
}

#[test]
fn test_key_display_name_trait() {
    let key = key_of_type::<dyn Greeter>();
    assert!(key.display_name().starts_with("dyn "));
    assert!(key.display_name().ends_with("Greeter"));
    assert_eq!(key.simple_name(), "Greeter");
}

#[test]
fn test_key_simple_name_strips_path_and_generics() {
    assert_eq!(key_of_type::<String>().simple_name(), "String");
    assert_eq!(key_of_type::<Vec<Option<u8>>>().simple_name(), "Vec");
    assert_eq!(key_of_type::<u64>().simple_name(), "u64");
}

#[test]
fn test_key_equality_ignores_name() {
    let a = TypeKey::new(TypeId::of::<u8>(), "first");
    let b = TypeKey::new(TypeId::of::<u8>(), "second");
    let c = key_of_type::<u16>();
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_key_hash() {
    let mut set = HashSet::new();
    set.insert(key_of_type::<u8>());
    set.insert(TypeKey::new(TypeId::of::<u8>(), "alias"));
    set.insert(key_of_type::<dyn Greeter>());
    assert_eq!(set.len(), 2);
}

#[test]
fn test_identity_empty_name_is_type_only() {
    let named = ServiceIdentity::named(key_of_type::<u8>(), "");
    assert_eq!(named, ServiceIdentity::of::<u8>());
    assert_eq!(named.name(), None);
    assert_eq!(named.to_string(), "u8");
}

#[test]
fn test_identity_same_named() {
    let a = ServiceIdentity::named(key_of_type::<u8>(), "counter");
    let b = ServiceIdentity::named(key_of_type::<String>(), "counter");
    let c = ServiceIdentity::named(key_of_type::<u8>(), "other");
    let unnamed = ServiceIdentity::of::<u8>();

    assert!(a.same_named(&b));
    assert!(!a.same_named(&c));
    assert!(!unnamed.same_named(&unnamed));
    assert_eq!(a.to_string(), "u8 (\"counter\")");
}
