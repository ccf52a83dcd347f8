/// Example: component scanning, direct creation, named and factory services
///
/// Run with `RUST_LOG=debug` to see the container's own tracing output.

use ferrous_ioc::{
    component, Container, DiResult, Inject, Injectable, LoggingObserver, Module, Resolver,
    TypeDescriptor,
};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

pub mod service {
    use super::*;

    pub trait UserRepository: Send + Sync {
        fn users(&self) -> Vec<String>;
    }

    #[derive(Default)]
    pub struct InMemoryUserRepository;

    impl UserRepository for InMemoryUserRepository {
        fn users(&self) -> Vec<String> {
            vec!["Alice".to_string(), "Bob".to_string(), "Charlie".to_string()]
        }
    }

    impl Injectable for InMemoryUserRepository {
        fn descriptor() -> TypeDescriptor {
            TypeDescriptor::builder::<Self>()
                .with_default()
                .implements::<dyn UserRepository>(|r| r as Arc<dyn UserRepository>)
                .component_named("userRepository")
                .build()
        }
    }

    /// Not a component: only reachable once registered by hand.
    #[derive(Default)]
    pub struct PremiumUserRepository;

    impl UserRepository for PremiumUserRepository {
        fn users(&self) -> Vec<String> {
            vec!["VIP-Alice".to_string(), "VIP-Bob".to_string()]
        }
    }

    impl Injectable for PremiumUserRepository {
        fn descriptor() -> TypeDescriptor {
            TypeDescriptor::builder::<Self>()
                .with_default()
                .implements::<dyn UserRepository>(|r| r as Arc<dyn UserRepository>)
                .build()
        }
    }

    #[derive(Default)]
    pub struct UserService {
        repository: Inject<dyn UserRepository>,
    }

    impl UserService {
        pub fn all_users(&self) -> Vec<String> {
            self.repository.get_required().users()
        }
    }

    impl Injectable for UserService {
        fn descriptor() -> TypeDescriptor {
            TypeDescriptor::builder::<Self>()
                .with_default()
                .field("repository", |s| &s.repository)
                .component()
                .build()
        }
    }

    pub struct NotificationService {
        user_service: Arc<UserService>,
    }

    impl NotificationService {
        pub fn send_notification(&self, user: &str, message: &str) {
            if self.user_service.all_users().iter().any(|u| u == user) {
                println!("Sending notification to {user}: {message}");
            } else {
                println!("User not found: {user}");
            }
        }
    }

    impl Injectable for NotificationService {
        fn descriptor() -> TypeDescriptor {
            TypeDescriptor::builder::<Self>()
                .inject_constructor(|(user_service,): (Arc<UserService>,)| {
                    NotificationService { user_service }
                })
                .component()
                .build()
        }
    }

    component!(InMemoryUserRepository);
    component!(UserService);
    component!(NotificationService);
}

use service::{NotificationService, PremiumUserRepository, UserRepository, UserService};

#[derive(Default)]
struct Counter {
    value: AtomicU32,
}

impl Counter {
    fn increment(&self) {
        self.value.fetch_add(1, Ordering::SeqCst);
    }

    fn value(&self) -> u32 {
        self.value.load(Ordering::SeqCst)
    }
}

fn main() -> DiResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("Starting container demonstration...");

    let package = format!("{}::service", module_path!());
    let container = Container::start_with_scan(&[package.as_str()], [Module::new()]);
    container.add_observer(Arc::new(LoggingObserver::new()));

    let user_service = container.get::<UserService>()?;
    println!("Users from UserService: {:?}", user_service.all_users());

    let notifications = container.get::<NotificationService>()?;
    notifications.send_notification("Alice", "Your account has been created!");

    println!("\nDirect instance creation...");
    let another = container.create_instance::<UserService>()?;
    println!("Users from directly created service: {:?}", another.all_users());

    println!("\nNamed dependencies...");
    container.load_module(Module::new().named_component::<PremiumUserRepository>("premiumRepo"));
    let premium = container.get_named::<dyn UserRepository>("premiumRepo")?;
    println!("Premium users: {:?}", premium.users());

    println!("\nFactory definitions...");
    container
        .load_module(Module::new().named_factory::<Counter, _>("counter", |_| Counter::default()));
    let counter1 = container.get_named::<Counter>("counter")?;
    counter1.increment();
    counter1.increment();
    println!("Counter1 value: {}", counter1.value());

    let counter2 = container.get_named::<Counter>("counter")?;
    println!("Counter2 value: {}", counter2.value());

    println!("\nDemonstration completed.");
    Ok(())
}
