#![no_main]

use ferrous_ioc::{Container, DiError, Module, NotFoundReason, Resolver};
use libfuzzer_sys::fuzz_target;
use std::collections::HashMap;

fuzz_target!(|data: &[u8]| {
    let container = Container::new();
    let mut expected: HashMap<String, u8> = HashMap::new();

    // each chunk: one name byte pair plus a value, odd values registered as strings
    for chunk in data.chunks(3) {
        if chunk.len() < 3 {
            break;
        }
        let name = format!("svc-{}-{}", chunk[0] % 8, chunk[1] % 4);
        let value = chunk[2];
        if value % 2 == 0 {
            container.load_module(Module::new().named_singleton::<u8, _>(&name, move |_| value));
            expected.insert(name, value);
        } else {
            container.load_module(
                Module::new().named_factory::<String, _>(&name, move |_| value.to_string()),
            );
            expected.remove(&name);
        }
    }

    for (name, value) in &expected {
        assert_eq!(*container.get_named_required::<u8>(name), *value);
    }

    match container.get_named::<u8>("never-registered") {
        Err(DiError::ServiceNotFound { reason, .. }) => {
            assert_eq!(reason, NotFoundReason::UnknownName)
        }
        _ => panic!("unknown name resolved"),
    }
});
