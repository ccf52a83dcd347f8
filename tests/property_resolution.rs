/// Property-based tests for service resolution
///
/// These tests verify that resolution behavior follows expected patterns
/// regardless of the names, values or cache settings used.

use ferrous_ioc::{
    Container, ContainerConfig, DiError, Injectable, Module, NotFoundReason, Resolver,
    TypeDescriptor,
};
use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone)]
struct ServiceA {
    value: String,
}

trait Shape: Send + Sync {
    fn sides(&self) -> u32;
}

trait Polygon: Shape {}

#[derive(Default)]
struct Square;

impl Shape for Square {
    fn sides(&self) -> u32 {
        4
    }
}

impl Polygon for Square {}

impl Injectable for Square {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>()
            .with_default()
            .implements::<dyn Polygon>(|s| s as Arc<dyn Polygon>)
            .build()
    }
}

fn polygon_is_a_shape() -> TypeDescriptor {
    TypeDescriptor::builder::<dyn Polygon>()
        .implements::<dyn Shape>(|p| p as Arc<dyn Shape>)
        .build()
}

fn shape_container(memoize: bool, declare_first: bool) -> Container {
    let config = ContainerConfig::default().with_memoized_assignability(memoize);
    let container = Container::with_config(config);
    let module = if declare_first {
        Module::new().declare(polygon_is_a_shape()).transient_component::<Square>()
    } else {
        Module::new().transient_component::<Square>().declare(polygon_is_a_shape())
    };
    container.load_module(module);
    container
}

// Property: singletons resolve to the same instance every time
proptest! {
    #[test]
    fn singleton_resolution_consistency(service_value in "\\PC{0,50}") {
        let value = service_value.clone();
        let container = Container::start([Module::new()
            .singleton::<ServiceA, _>(move |_| ServiceA { value: value.clone() })]);

        let resolved1 = container.get_required::<ServiceA>();
        let resolved2 = container.get_required::<ServiceA>();

        prop_assert!(Arc::ptr_eq(&resolved1, &resolved2));
        prop_assert_eq!(&resolved1.value, &service_value);
    }
}

// Property: transients never share an instance
proptest! {
    #[test]
    fn transient_resolutions_are_distinct(count in 2usize..20) {
        let container = Container::start([Module::new()
            .factory::<ServiceA, _>(|_| ServiceA { value: "t".to_string() })]);

        let instances: Vec<_> = (0..count).map(|_| container.get_required::<ServiceA>()).collect();
        for (i, a) in instances.iter().enumerate() {
            for b in &instances[i + 1..] {
                prop_assert!(!Arc::ptr_eq(a, b));
            }
        }
    }
}

// Property: the last definition under a name wins
proptest! {
    #[test]
    fn named_lookup_returns_last_definition(
        entries in prop::collection::vec(("[a-z]{1,3}", any::<u64>()), 1..20)
    ) {
        let mut module = Module::new();
        let mut expected = HashMap::new();
        for (name, value) in &entries {
            let value = *value;
            module = module.named_singleton::<u64, _>(name, move |_| value);
            expected.insert(name.clone(), value);
        }
        let container = Container::start([module]);

        for (name, value) in &expected {
            prop_assert_eq!(*container.get_named_required::<u64>(name), *value);
        }
        prop_assert_eq!(*container.get_required::<u64>(), entries[0].1);
    }
}

// Property: unknown names are reported as such, never as a type mismatch
proptest! {
    #[test]
    fn unknown_names_are_not_found(name in "[a-z]{1,8}") {
        let container =
            Container::start([Module::new().named_singleton::<u64, _>("known-name", |_| 1)]);
        let result = container.get_named::<u64>(&name);
        match result {
            Err(DiError::ServiceNotFound { reason, .. }) => {
                prop_assert_eq!(reason, NotFoundReason::UnknownName)
            }
            other => prop_assert!(false, "unexpected {:?}", other.map(|v| *v)),
        }
    }
}

// Property: memoization, declaration order and cache clearing never change outcomes
proptest! {
    #[test]
    fn capability_lookup_is_cache_independent(
        memoize in any::<bool>(),
        declare_first in any::<bool>(),
        clears in prop::collection::vec(any::<bool>(), 1..10)
    ) {
        let container = shape_container(memoize, declare_first);
        for clear in clears {
            if clear {
                container.clear_caches();
            }
            prop_assert_eq!(container.get_required::<dyn Shape>().sides(), 4);
            prop_assert_eq!(container.get_required::<dyn Polygon>().sides(), 4);
            prop_assert!(container.get::<String>().is_err());
        }
    }
}
