use crate::error::{CompositionError, CompositionErrorExt};
use crate::store::{Activation, BackingStore};
use keel_domain::config::CompositionSettings;
use keel_domain::{Descriptor, Factory, Lifetime, Source};
use parking_lot::Mutex;
use std::any::type_name;
use std::fmt;
use tracing::{debug, info, trace, warn};

/// Outcome of a successful [`CompositionContainer::register`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompositionReport {
    /// Descriptors forwarded to the backing store.
    pub applied: usize,
    /// Temporary descriptors that never reach the store.
    pub skipped: usize,
}

#[derive(Debug)]
struct ContainerState<S> {
    store: S,
    applied: bool,
}

/// Applies a finalized registration sequence to a backing store, exactly once.
///
/// The applied flag is set as soon as a call passes the precondition, so a sequence that
/// fails halfway still leaves the container applied, with every earlier descriptor in the
/// store.
///
/// ```rust
/// use keel_composition::{Activation, BackingStore, CompositionContainer, CompositionError};
/// use keel_domain::{Contract, Descriptor, ServiceError};
/// use std::sync::Arc;
///
/// #[derive(Default)]
/// struct Count(usize);
///
/// impl BackingStore for Count {
///     fn add_transient(&mut self, _: Contract, _: Activation) -> Result<(), ServiceError> { self.0 += 1; Ok(()) }
///     fn try_add_transient(&mut self, _: Contract, _: Activation) -> Result<(), ServiceError> { self.0 += 1; Ok(()) }
///     fn add_singleton(&mut self, _: Contract, _: Activation) -> Result<(), ServiceError> { self.0 += 1; Ok(()) }
///     fn try_add_singleton(&mut self, _: Contract, _: Activation) -> Result<(), ServiceError> { self.0 += 1; Ok(()) }
/// }
///
/// let container = CompositionContainer::new(Count::default());
/// let report = container.register([Descriptor::singleton_instance(Arc::new(1_u8))]).unwrap();
/// assert_eq!(report.applied, 1);
///
/// let again = container.register(Vec::new());
/// assert!(matches!(again, Err(CompositionError::AlreadyApplied { .. })));
/// assert_eq!(container.into_store().0, 1);
/// ```
pub struct CompositionContainer<S> {
    state: Mutex<ContainerState<S>>,
    trace_descriptors: bool,
}

impl<S: BackingStore> CompositionContainer<S> {
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self {
            state: Mutex::new(ContainerState { store, applied: false }),
            trace_descriptors: false,
        }
    }

    #[must_use]
    pub const fn with_settings(store: S, settings: &CompositionSettings) -> Self {
        Self::new(store).trace_descriptors(settings.trace_descriptors)
    }

    /// Emit one trace event per applied descriptor.
    #[must_use = "builder methods return a new container"]
    pub const fn trace_descriptors(mut self, enabled: bool) -> Self {
        self.trace_descriptors = enabled;
        self
    }

    /// Applies `registrations` in order.
    ///
    /// The lock is held for the check-and-set and the whole iteration, so of two racing
    /// callers exactly one gets past the precondition.
    ///
    /// # Errors
    /// - [`CompositionError::AlreadyApplied`] if any earlier call passed the precondition.
    /// - [`CompositionError::NotSupported`] for a lifetime/source pair with no store call.
    /// - [`CompositionError::Store`] if the backing store rejects a registration.
    pub fn register<I>(&self, registrations: I) -> Result<CompositionReport, CompositionError>
    where
        I: IntoIterator<Item = Descriptor>,
    {
        let mut state = self.state.lock();
        if state.applied {
            return Err(CompositionError::AlreadyApplied { context: None });
        }
        state.applied = true;
        debug!(store = type_name::<S>(), "Composition started");

        let mut report = CompositionReport::default();
        for (position, descriptor) in registrations.into_iter().enumerate() {
            if self.trace_descriptors {
                trace!(position, %descriptor, "Applying descriptor");
            }
            if apply(&mut state.store, descriptor, position)? {
                report.applied += 1;
            } else {
                report.skipped += 1;
            }
        }

        info!(applied = report.applied, skipped = report.skipped, "Composition applied");
        Ok(report)
    }

    #[must_use]
    pub fn is_applied(&self) -> bool {
        self.state.lock().applied
    }

    /// Runs `f` with shared access to the backing store.
    pub fn with_store<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.state.lock().store)
    }

    #[must_use]
    pub fn into_store(self) -> S {
        self.state.into_inner().store
    }
}

/// Forwards one descriptor. Returns `false` when it was skipped.
fn apply<S: BackingStore>(
    store: &mut S,
    descriptor: Descriptor,
    position: usize,
) -> Result<bool, CompositionError> {
    let contract = descriptor.contract();
    let always_register = descriptor.always_register();

    let (singleton, activation) = match (descriptor.lifetime(), descriptor.into_source()) {
        (Lifetime::Temporary, _) => {
            warn!(%contract, position, "Temporary descriptor handed to the container, skipped");
            return Ok(false);
        },
        (Lifetime::Transient, Source::Type(implementation)) => {
            (false, Activation::Type(implementation))
        },
        (Lifetime::Transient, Source::Factory(factory)) => (false, Activation::Factory(factory)),
        (Lifetime::Singleton, Source::Type(implementation)) => {
            (true, Activation::Type(implementation))
        },
        (Lifetime::Singleton, Source::Factory(factory)) => (true, Activation::Factory(factory)),
        (Lifetime::Singleton, Source::Instance(instance)) => {
            (true, Activation::Factory(Factory::constant(instance)))
        },
        (lifetime, source) => {
            return Err(CompositionError::NotSupported {
                contract,
                lifetime,
                source_kind: source.kind(),
                context: Some(format!("descriptor #{position}").into()),
            });
        },
    };

    match (singleton, always_register) {
        (false, true) => store.add_transient(contract, activation),
        (false, false) => store.try_add_transient(contract, activation),
        (true, true) => store.add_singleton(contract, activation),
        (true, false) => store.try_add_singleton(contract, activation),
    }
    .context(format!("descriptor #{position}"))?;

    Ok(true)
}

impl<S> fmt::Debug for CompositionContainer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositionContainer")
            .field("store", &type_name::<S>())
            .field("applied", &self.state.try_lock().map(|state| state.applied))
            .field("trace_descriptors", &self.trace_descriptors)
            .finish()
    }
}
