/// Unit tests for DiError and DiResult types

use ferrous_ioc::{key_of_type, DiError, DiResult, NotFoundReason, ServiceIdentity};
use std::error::Error;

#[test]
fn test_error_display_not_found_by_type() {
    let error = DiError::ServiceNotFound {
        identity: ServiceIdentity::of::<String>(),
        reason: NotFoundReason::NotRegistered,
    };
    let display_str = format!("{}", error);
    assert_eq!(display_str, "Service not found: alloc::string::String (no matching registration)");
    assert!(error.is_not_found());
    assert!(!error.is_circular());
}

#[test]
fn test_error_display_not_found_by_name() {
    let error = DiError::ServiceNotFound {
        identity: ServiceIdentity::named(key_of_type::<u32>(), "port"),
        reason: NotFoundReason::IncompatibleType { declared: "alloc::string::String" },
    };
    let display_str = format!("{}", error);
    assert_eq!(
        display_str,
        concat!(
            "Service not found: u32 (\"port\") ",
            "(registered type alloc::string::String is not compatible)"
        )
    );
}

#[test]
fn test_error_display_type_mismatch() {
    let error = DiError::TypeMismatch("std::string::String");
    assert_eq!(format!("{}", error), "Type mismatch for: std::string::String");
}

#[test]
fn test_error_display_circular() {
    let error = DiError::CircularDependency {
        type_name: "ServiceA",
        path: vec!["ServiceA", "ServiceB", "ServiceA"],
    };
    let display_str = format!("{}", error);
    assert_eq!(display_str, "Circular dependency: ServiceA -> ServiceB -> ServiceA");
    assert!(error.is_circular());
}

#[test]
fn test_error_display_no_constructor() {
    let error = DiError::NoSuitableConstructor("Handle");
    assert_eq!(format!("{}", error), "No suitable constructor for: Handle");
}

#[test]
fn test_error_display_injection_failure() {
    let error = DiError::InjectionFailure {
        type_name: "UserService",
        field: "repository",
        reason: "field is already injected".to_string(),
    };
    assert_eq!(
        format!("{}", error),
        "Injection failed for UserService.repository: field is already injected"
    );
}

#[test]
fn test_error_display_depth_exceeded() {
    let error = DiError::DepthExceeded(1024);
    assert_eq!(format!("{}", error), "Max depth 1024 exceeded");
}

#[test]
fn test_error_debug_format() {
    let error = DiError::TypeMismatch("Test");
    let debug_str = format!("{:?}", error);
    assert!(debug_str.contains("TypeMismatch"));
    assert!(debug_str.contains("Test"));
}

#[test]
fn test_error_clone() {
    let error = DiError::CircularDependency {
        type_name: "A",
        path: vec!["A", "A"],
    };
    let cloned = error.clone();
    assert_eq!(format!("{}", error), format!("{}", cloned));
}

#[test]
fn test_error_trait_implementation() {
    let error = DiError::DepthExceeded(3);
    let error_trait: &dyn Error = &error;
    assert!(error_trait.source().is_none());
    assert_eq!(error_trait.to_string(), "Max depth 3 exceeded");
}

#[test]
fn test_di_result_propagation() {
    fn inner() -> DiResult<u32> {
        Err(DiError::NoSuitableConstructor("Inner"))
    }

    fn outer() -> DiResult<u32> {
        let value = inner()?;
        Ok(value + 1)
    }

    assert!(matches!(outer(), Err(DiError::NoSuitableConstructor("Inner"))));
}

#[test]
fn test_not_found_reason_display() {
    assert_eq!(NotFoundReason::NotRegistered.to_string(), "no matching registration");
    assert_eq!(NotFoundReason::UnknownName.to_string(), "no registration under that name");
}
