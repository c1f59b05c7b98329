use keel_composition::{BackingStore, CompositionContainer, CompositionError, RegistrationBuilder};
use keel_domain::{Construct, Contract, Factory, Lifetime, Resolver, Service, ServiceError, implements};
use keel_store::{ServiceCollection, ServiceProvider};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

#[derive(Debug)]
struct FixedClock;

impl Clock for FixedClock {
    fn now(&self) -> u64 {
        1_700_000_000
    }
}

impl Construct for FixedClock {
    fn construct(_: &dyn Resolver) -> Result<Self, ServiceError> {
        Ok(Self)
    }
}

implements!(FixedClock => dyn Clock);

trait Greeter: Send + Sync {
    fn greet(&self) -> String;
}

struct ClockedGreeter {
    clock: Arc<dyn Clock>,
}

impl Greeter for ClockedGreeter {
    fn greet(&self) -> String {
        format!("hello at {}", self.clock.now())
    }
}

impl Construct for ClockedGreeter {
    fn construct(resolver: &dyn Resolver) -> Result<Self, ServiceError> {
        Ok(Self { clock: resolver.resolve::<dyn Clock>()? })
    }
}

implements!(ClockedGreeter => dyn Greeter);

fn compose(builder: RegistrationBuilder) -> ServiceProvider {
    let container = CompositionContainer::new(ServiceCollection::new());
    container.register(builder.build()).unwrap();
    container.into_store().build()
}

#[test]
fn test_types_resolve_their_dependencies() {
    let mut builder = RegistrationBuilder::new();
    builder.add_singleton::<dyn Clock, FixedClock>().add_transient::<dyn Greeter, ClockedGreeter>();

    let provider = compose(builder);
    assert_eq!(provider.resolve::<dyn Greeter>().unwrap().greet(), "hello at 1700000000");
}

#[test]
fn test_transient_builds_fresh_instances() {
    let mut builder = RegistrationBuilder::new();
    builder.add_singleton::<dyn Clock, FixedClock>().add_transient::<dyn Greeter, ClockedGreeter>();

    let provider = compose(builder);
    let first = provider.resolve::<dyn Greeter>().unwrap();
    let second = provider.resolve::<dyn Greeter>().unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
}

#[test]
fn test_singleton_is_constructed_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let mut builder = RegistrationBuilder::new();
    builder.add_singleton_factory(move |_: &dyn Resolver| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(String::from("db")))
    });

    let provider = compose(builder);
    let first = provider.resolve::<String>().unwrap();
    let second = provider.clone().resolve::<String>().unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_concurrent_singleton_resolution_agrees() {
    let mut builder = RegistrationBuilder::new();
    builder.add_singleton_factory(|_: &dyn Resolver| Ok(Arc::new(vec![1_u8, 2, 3])));
    let provider = compose(builder);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let provider = provider.clone();
            thread::spawn(move || provider.resolve::<Vec<u8>>().unwrap())
        })
        .collect();
    let resolved: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert!(resolved.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
}

#[test]
fn test_singleton_instance_is_returned_as_is() {
    let instance = Arc::new(String::from("prebuilt"));
    let mut builder = RegistrationBuilder::new();
    builder.add_singleton_instance(instance.clone());

    let provider = compose(builder);
    assert!(Arc::ptr_eq(&provider.resolve::<String>().unwrap(), &instance));
}

#[test]
fn test_try_add_keeps_first_and_overwrite_keeps_last() {
    let mut builder = RegistrationBuilder::new();
    builder
        .try_add_singleton_instance(Arc::new(String::from("x")))
        .try_add_singleton_instance(Arc::new(String::from("y")))
        .add_singleton_instance(Arc::new(1_u32))
        .add_singleton_instance(Arc::new(2_u32));

    let provider = compose(builder);
    assert_eq!(*provider.resolve::<String>().unwrap(), "x");
    assert_eq!(*provider.resolve::<u32>().unwrap(), 2);
    assert_eq!(provider.contracts().collect::<Vec<_>>(), [Contract::of::<String>(), Contract::of::<u32>()]);
}

#[test]
fn test_overwrite_can_change_lifetime() {
    let mut builder = RegistrationBuilder::new();
    builder
        .add_singleton_factory(|_: &dyn Resolver| Ok(Arc::new(0_u64)))
        .add_transient_factory(|_: &dyn Resolver| Ok(Arc::new(1_u64)));

    let provider = compose(builder);
    assert_eq!(provider.lifetime(Contract::of::<u64>()), Some(Lifetime::Transient));
    assert_eq!(*provider.resolve::<u64>().unwrap(), 1);
}

#[test]
fn test_missing_dependency_surfaces_not_registered() {
    let mut builder = RegistrationBuilder::new();
    builder.add_transient::<dyn Greeter, ClockedGreeter>();

    let provider = compose(builder);
    let err = provider.resolve::<dyn Greeter>().err().unwrap();
    assert!(matches!(err, ServiceError::NotRegistered { contract, .. } if contract == Contract::of::<dyn Clock>()));
    assert!(provider.try_resolve::<dyn Clock>().unwrap().is_none());
}

#[test]
fn test_failed_singleton_is_not_cached() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&attempts);

    let mut builder = RegistrationBuilder::new();
    builder.add_singleton_factory(move |_: &dyn Resolver| {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            return Err(ServiceError::from("warming up"));
        }
        Ok(Arc::new(5_i32))
    });

    let provider = compose(builder);
    let err = provider.resolve::<i32>().unwrap_err();
    assert!(err.to_string().contains("warming up"), "{err}");
    assert_eq!(*provider.resolve::<i32>().unwrap(), 5);
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[test]
fn test_erased_factory_with_wrong_service_is_a_type_mismatch() {
    let mut services = ServiceCollection::new();
    let factory = Factory::erased(|_: &dyn Resolver| Ok(Service::new(Arc::new(1_u8))));
    services
        .add_transient(Contract::of::<u16>(), keel_composition::Activation::Factory(factory))
        .unwrap();

    let provider = services.build();
    assert!(matches!(provider.resolve::<u16>(), Err(ServiceError::TypeMismatch { .. })));
}

#[test]
fn test_rejected_registration_leaves_store_unchanged() {
    let mut builder = RegistrationBuilder::new();
    builder.add_singleton_instance(Arc::new(1_u8));

    let mut services = ServiceCollection::new();
    let mismatched = Factory::new(|_: &dyn Resolver| Ok(Arc::new(String::new())));
    let err = services
        .add_singleton(Contract::of::<u8>(), keel_composition::Activation::Factory(mismatched))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Rejected { .. }));

    let container = CompositionContainer::new(services);
    container.register(builder.build()).unwrap();
    assert!(matches!(
        container.register(Vec::new()),
        Err(CompositionError::AlreadyApplied { .. })
    ));
    assert_eq!(container.into_store().len(), 1);
}
