pub mod fixtures;

use fixtures::*;
use keel_composition::*;
use keel_domain::{Contract, Descriptor, Lifetime, Resolver, Service, ServiceError, Source};
use std::sync::{Arc, Barrier};
use std::thread;

fn transient_factory<C: Send + Sync + Default + 'static>() -> Descriptor {
    Descriptor::transient_factory(|_: &dyn Resolver| Ok(Arc::new(C::default())))
}

#[test]
fn test_call_table_in_order() {
    let sequence = vec![
        Descriptor::transient::<dyn Greeter, English>(),
        Descriptor::transient::<dyn Greeter, English>().try_add(),
        transient_factory::<u8>(),
        transient_factory::<u8>().try_add(),
        Descriptor::singleton::<dyn Greeter, English>(),
        Descriptor::singleton::<dyn Greeter, English>().try_add(),
        Descriptor::singleton_factory(|_: &dyn Resolver| Ok(Arc::new(1_u16))),
        Descriptor::singleton_factory(|_: &dyn Resolver| Ok(Arc::new(1_u16))).try_add(),
        Descriptor::singleton_instance(Arc::new(2_u32)),
        Descriptor::singleton_instance(Arc::new(2_u32)).try_add(),
    ];

    let container = CompositionContainer::new(RecordingStore::default());
    let report = container.register(sequence).unwrap();
    let store = container.into_store();

    assert_eq!(report, CompositionReport { applied: 10, skipped: 0 });
    assert_eq!(
        store.ops(),
        [
            "add_transient",
            "try_add_transient",
            "add_transient",
            "try_add_transient",
            "add_singleton",
            "try_add_singleton",
            "add_singleton",
            "try_add_singleton",
            "add_singleton",
            "try_add_singleton",
        ]
    );
    assert!(matches!(store.calls[0].activation, Activation::Type(_)));
    assert!(matches!(store.calls[2].activation, Activation::Factory(_)));
    assert!(matches!(store.calls[8].activation, Activation::Factory(_)));
}

#[test]
fn test_implementation_type_is_forwarded_for_activation() {
    let container = CompositionContainer::new(RecordingStore::default());
    container.register([Descriptor::singleton::<dyn Greeter, English>()]).unwrap();

    let store = container.into_store();
    assert_eq!(store.calls[0].contract, Contract::of::<dyn Greeter>());
    let service = activate(&store.calls[0].activation);
    assert_eq!(service.downcast::<dyn Greeter>().unwrap().greet(), "hello");
}

#[test]
fn test_singleton_instance_is_shared_by_constant_factory() {
    let instance = Arc::new("shared".to_owned());
    let container = CompositionContainer::new(RecordingStore::default());
    container.register([Descriptor::singleton_instance(instance.clone())]).unwrap();

    let store = container.into_store();
    let first = activate(&store.calls[0].activation).downcast::<String>().unwrap();
    let second = activate(&store.calls[0].activation).downcast::<String>().unwrap();
    assert!(Arc::ptr_eq(&first, &instance));
    assert!(Arc::ptr_eq(&second, &instance));
}

#[test]
fn test_second_register_fails_without_touching_the_store() {
    let container = CompositionContainer::new(RecordingStore::default());
    container.register([transient_factory::<u8>()]).unwrap();
    assert!(container.is_applied());

    let err = container.register([transient_factory::<u16>()]).unwrap_err();
    assert!(matches!(err, CompositionError::AlreadyApplied { .. }));

    let again = container.register(Registrations::default()).unwrap_err();
    assert!(matches!(again, CompositionError::AlreadyApplied { .. }));

    container.with_store(|store| {
        assert_eq!(store.calls.len(), 1);
        assert_eq!(store.calls[0].contract, Contract::of::<u8>());
    });
}

#[test]
fn test_empty_sequence_still_applies() {
    let container = CompositionContainer::new(RecordingStore::default());
    let report = container.register(Vec::new()).unwrap();

    assert_eq!(report, CompositionReport::default());
    assert!(container.is_applied());
    assert!(container.register(Vec::new()).is_err());
}

#[test]
fn test_concurrent_register_has_exactly_one_winner() {
    let container = Arc::new(CompositionContainer::new(RecordingStore::default()));
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let container = Arc::clone(&container);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                container.register([transient_factory::<u64>(), transient_factory::<i64>()])
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let winners = results.iter().filter(|r| r.is_ok()).count();
    let already_applied = results
        .iter()
        .filter(|r| matches!(r, Err(CompositionError::AlreadyApplied { .. })))
        .count();

    assert_eq!(winners, 1);
    assert_eq!(already_applied, 7);
    container.with_store(|store| assert_eq!(store.calls.len(), 2));
}

#[test]
fn test_temporary_never_reaches_the_store() {
    let sequence = vec![
        Descriptor::temporary(Arc::new("settings".to_owned())),
        transient_factory::<u8>(),
        Descriptor::temporary(Arc::new(1_u8)),
    ];

    let container = CompositionContainer::new(RecordingStore::default());
    let report = container.register(sequence).unwrap();

    assert_eq!(report, CompositionReport { applied: 1, skipped: 2 });
    container.with_store(|store| assert_eq!(store.ops(), ["add_transient"]));
}

#[test]
fn test_builder_temporary_roundtrip_and_not_found() {
    struct DatabaseUrl(&'static str);

    let mut builder = RegistrationBuilder::new();
    assert!(matches!(
        builder.get_temporary::<DatabaseUrl>(),
        Err(CompositionError::TemporaryNotFound { .. })
    ));

    let value = Arc::new(DatabaseUrl("postgres://localhost"));
    builder.add_temporary(value.clone());

    let fetched = builder.get_temporary::<DatabaseUrl>().unwrap();
    assert!(Arc::ptr_eq(&fetched, &value));
    assert_eq!(fetched.0, "postgres://localhost");

    let container = CompositionContainer::new(RecordingStore::default());
    container.register(builder.build()).unwrap();
    container.with_store(|store| assert!(store.calls.is_empty()));
}

#[test]
fn test_transient_instance_is_not_supported() {
    let descriptor = Descriptor::new(
        Contract::of::<String>(),
        Lifetime::Transient,
        Source::Instance(Service::new(Arc::new(String::from("x")))),
        true,
    );

    let container = CompositionContainer::new(RecordingStore::default());
    let err = container.register([transient_factory::<u8>(), descriptor]).unwrap_err();

    match &err {
        CompositionError::NotSupported { contract, lifetime, source_kind, .. } => {
            assert_eq!(*contract, Contract::of::<String>());
            assert_eq!(*lifetime, Lifetime::Transient);
            assert_eq!(*source_kind, "instance");
        },
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("alloc::string::String"), "{err}");

    // Earlier descriptors stay applied, and so does the container.
    container.with_store(|store| assert_eq!(store.ops(), ["add_transient"]));
    assert!(matches!(
        container.register(Vec::new()),
        Err(CompositionError::AlreadyApplied { .. })
    ));
}

#[test]
fn test_try_add_instances_forward_in_order() {
    let mut builder = RegistrationBuilder::new();
    builder
        .try_add_singleton_instance(Arc::new("x".to_owned()))
        .try_add_singleton_instance(Arc::new("y".to_owned()));

    let container = CompositionContainer::new(RecordingStore::default());
    container.register(builder.build()).unwrap();

    let store = container.into_store();
    assert_eq!(store.ops(), ["try_add_singleton", "try_add_singleton"]);
    let values: Vec<_> = store
        .calls
        .iter()
        .map(|call| activate(&call.activation).downcast::<String>().unwrap())
        .collect();
    assert_eq!(*values[0], "x");
    assert_eq!(*values[1], "y");
}

#[test]
fn test_overwrites_forward_in_order() {
    let mut builder = RegistrationBuilder::new();
    builder
        .add_singleton_instance(Arc::new(1_u32))
        .add_singleton_instance(Arc::new(2_u32));

    let container = CompositionContainer::new(RecordingStore::default());
    container.register(builder.build()).unwrap();

    let store = container.into_store();
    assert_eq!(store.ops(), ["add_singleton", "add_singleton"]);
    let last = store.calls.last().map(|call| activate(&call.activation)).unwrap();
    assert_eq!(*last.downcast::<u32>().unwrap(), 2);
}

#[test]
fn test_store_rejection_stops_the_sequence() {
    let sequence = vec![transient_factory::<u8>(), transient_factory::<u16>(), transient_factory::<u32>()];

    let container = CompositionContainer::new(RecordingStore::rejecting(Contract::of::<u16>()));
    let err = container.register(sequence).unwrap_err();

    match &err {
        CompositionError::Store { source: ServiceError::Rejected { contract, .. }, context } => {
            assert_eq!(*contract, Contract::of::<u16>());
            assert_eq!(context.as_deref(), Some("descriptor #1"));
        },
        other => panic!("unexpected error: {other}"),
    }
    container.with_store(|store| assert_eq!(store.ops(), ["add_transient"]));
    assert!(container.is_applied());
}

#[test]
fn test_modules_contribute_in_application_order() {
    fn defaults(builder: &mut RegistrationBuilder) -> Result<(), CompositionError> {
        builder.try_add_singleton_instance(Arc::new("default".to_owned()));
        Ok(())
    }

    struct Override;

    impl CompositionModule for Override {
        fn configure(&self, builder: &mut RegistrationBuilder) -> Result<(), CompositionError> {
            builder.add_singleton_instance(Arc::new("override".to_owned()));
            Ok(())
        }
    }

    let mut builder = RegistrationBuilder::new();
    builder.apply_module(&defaults).unwrap().apply_module(&Override).unwrap();

    let container = CompositionContainer::new(RecordingStore::default());
    container.register(builder.build()).unwrap();
    container.with_store(|store| assert_eq!(store.ops(), ["try_add_singleton", "add_singleton"]));
}

#[test]
fn test_module_errors_propagate() {
    let failing = |_: &mut RegistrationBuilder| -> Result<(), CompositionError> {
        Err("missing configuration".into())
    };

    let mut builder = RegistrationBuilder::new();
    let err = builder.apply_module(&failing).unwrap_err();
    assert!(matches!(err, CompositionError::Internal { .. }));
    assert!(err.to_string().contains("missing configuration"), "{err}");
}

#[test]
fn test_trace_descriptors_setting_is_honoured() {
    let settings = keel_domain::config::CompositionSettings { trace_descriptors: true };
    let container = CompositionContainer::with_settings(RecordingStore::default(), &settings);

    assert!(format!("{container:?}").contains("trace_descriptors: true"));
    container.register([transient_factory::<u8>()]).unwrap();
}
