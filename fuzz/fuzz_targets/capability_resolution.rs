#![no_main]

use ferrous_ioc::{Container, ContainerConfig, Injectable, Module, Resolver, TypeDescriptor};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

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

fuzz_target!(|data: &[u8]| {
    let Some((&flags, ops)) = data.split_first() else {
        return;
    };

    let config = ContainerConfig::default().with_memoized_assignability(flags & 1 == 1);
    let container = Container::with_config(config);
    let mut registered = false;
    let mut declared = false;

    for op in ops {
        match op % 6 {
            0 => {
                container.load_module(Module::new().transient_component::<Square>());
                registered = true;
            }
            1 => {
                container.declare(polygon_is_a_shape());
                declared = true;
            }
            2 => container.clear_caches(),
            3 => assert_eq!(container.get::<dyn Polygon>().is_ok(), registered),
            4 => assert_eq!(container.get::<dyn Shape>().is_ok(), registered && declared),
            _ => {
                if let Ok(square) = container.get::<Square>() {
                    assert_eq!(square.sides(), 4);
                }
            }
        }
    }
});
