/// Tests for the modular registration system
///
/// Covers the `Module` builder, the `ServiceModule` trait and how the two
/// compose when loaded into one container.

use ferrous_ioc::{
    Container, DiResult, Inject, Injectable, Module, Resolver, ServiceModule, TypeDescriptor,
};
use std::sync::Arc;

// ===== Test Services =====

#[derive(Debug, Clone)]
struct Config {
    name: String,
    value: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: "test-config".to_string(),
            value: 42,
        }
    }
}

#[derive(Debug)]
struct DatabaseService {
    config: Arc<Config>,
    connection_id: String,
}

impl DatabaseService {
    fn new(config: Arc<Config>) -> Self {
        Self {
            connection_id: format!("conn-{}", config.value),
            config,
        }
    }

    fn get_data(&self) -> String {
        format!("Data from {} ({})", self.config.name, self.connection_id)
    }
}

#[derive(Debug)]
struct CacheService {
    cache_size: usize,
}

impl CacheService {
    fn get(&self, key: &str) -> String {
        format!("Cached[{}]: {} (size: {})", key, "value", self.cache_size)
    }
}

#[derive(Default)]
struct BusinessService {
    db: Inject<DatabaseService>,
    cache: Inject<CacheService>,
}

impl BusinessService {
    fn process(&self) -> String {
        format!(
            "{} | {}",
            self.db.get_required().get_data(),
            self.cache.get_required().get("test")
        )
    }
}

impl Injectable for BusinessService {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>()
            .with_default()
            .field("db", |b| &b.db)
            .field("cache", |b| &b.cache)
            .build()
    }
}

// ===== Modules using ServiceModule trait =====

struct DatabaseModule;

impl ServiceModule for DatabaseModule {
    fn register_services(self, container: &Container) -> DiResult<()> {
        container.load_module(
            Module::new()
                .singleton::<Config, _>(|_| Config::default())
                .singleton::<DatabaseService, _>(|r| {
                    DatabaseService::new(r.get_required::<Config>())
                }),
        );
        Ok(())
    }
}

struct CacheModule {
    cache_size: usize,
}

impl CacheModule {
    fn with_size(cache_size: usize) -> Self {
        Self { cache_size }
    }
}

impl ServiceModule for CacheModule {
    fn register_services(self, container: &Container) -> DiResult<()> {
        let cache_size = self.cache_size;
        container.load_module(
            Module::new().singleton::<CacheService, _>(move |_| CacheService { cache_size }),
        );
        Ok(())
    }
}

struct BusinessModule;

impl ServiceModule for BusinessModule {
    fn register_services(self, container: &Container) -> DiResult<()> {
        // the database must already be wired
        container.get::<DatabaseService>()?;
        container.load_module(Module::new().transient_component::<BusinessService>());
        Ok(())
    }
}

// ===== Tests =====

#[test]
fn test_service_modules_compose() {
    let container = Container::new();
    container.install(DatabaseModule).unwrap();
    container.install(CacheModule::with_size(256)).unwrap();
    container.install(BusinessModule).unwrap();

    let business = container.get_required::<BusinessService>();
    assert_eq!(
        business.process(),
        "Data from test-config (conn-42) | Cached[test]: value (size: 256)"
    );
}

#[test]
fn test_module_failure_is_reported() {
    let container = Container::new();
    let err = container.install(BusinessModule).unwrap_err();
    assert!(err.is_not_found());
    assert!(!container.contains::<BusinessService>());
}

#[test]
fn test_plain_module_is_a_service_module() {
    let container = Container::new();
    container
        .install(Module::new().singleton::<Config, _>(|_| Config::default()))
        .unwrap();
    assert_eq!(container.get_required::<Config>().value, 42);
}

#[test]
fn test_module_entries_load_in_order() {
    let module = Module::new()
        .named_singleton::<u32, _>("first", |_| 1)
        .named_factory::<u32, _>("second", |_| 2)
        .singleton::<u32, _>(|_| 3);
    assert_eq!(module.len(), 3);

    let container = Container::start([module]);
    let names: Vec<_> = container
        .registrations()
        .iter()
        .map(|r| r.name().map(str::to_string))
        .collect();
    assert_eq!(names, vec![Some("first".to_string()), Some("second".to_string()), None]);
    assert_eq!(*container.get_required::<u32>(), 1);
}

#[test]
fn test_trait_factories() {
    trait Clock: Send + Sync {
        fn now(&self) -> u64;
    }

    struct Fixed(u64);

    impl Clock for Fixed {
        fn now(&self) -> u64 {
            self.0
        }
    }

    let container = Container::start([Module::new()
        .named_singleton_trait::<dyn Clock, _>("fixed", |_| Arc::new(Fixed(7)) as Arc<dyn Clock>)
        .factory_trait::<dyn Clock, _>(|_| Arc::new(Fixed(9)) as Arc<dyn Clock>)]);

    assert_eq!(container.get_named_required::<dyn Clock>("fixed").now(), 7);
    // the named singleton was registered first, so it also serves by type
    let a = container.get_required::<dyn Clock>();
    let b = container.get_required::<dyn Clock>();
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn test_injectable_factory_gets_fields_written() {
    let container = Container::new();
    container.install(DatabaseModule).unwrap();
    container.install(CacheModule::with_size(8)).unwrap();
    container.load_module(
        Module::new().injectable_factory::<BusinessService, _>(|_| BusinessService::default()),
    );

    let a = container.get_required::<BusinessService>();
    let b = container.get_required::<BusinessService>();
    assert!(!Arc::ptr_eq(&a, &b));
    assert!(Arc::ptr_eq(a.db.get_required(), b.db.get_required()));
}
