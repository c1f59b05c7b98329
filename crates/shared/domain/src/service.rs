//! Type-erased services and the construction sources that produce them.

use crate::contract::Contract;
use crate::error::ServiceError;
use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

type ActivateFn = fn(&dyn Resolver) -> Result<Service, ServiceError>;
type FactoryFn = dyn Fn(&dyn Resolver) -> Result<Service, ServiceError> + Send + Sync;

/// A shared service instance with its contract type erased.
///
/// Internally holds an `Arc<C>` for contract `C`, so trait-object contracts survive the
/// round trip through `Any`.
#[derive(Clone)]
pub struct Service {
    contract: Contract,
    value: Arc<dyn Any + Send + Sync>,
}

impl Service {
    #[must_use]
    pub fn new<C: ?Sized + Send + Sync + 'static>(value: Arc<C>) -> Self {
        Self { contract: Contract::of::<C>(), value: Arc::new(value) }
    }

    #[must_use]
    pub const fn contract(&self) -> Contract {
        self.contract
    }

    /// Recovers the typed handle.
    ///
    /// # Errors
    /// Returns [`ServiceError::TypeMismatch`] if the service was created for another contract.
    pub fn downcast<C: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<C>, ServiceError> {
        self.value.downcast_ref::<Arc<C>>().cloned().ok_or_else(|| ServiceError::TypeMismatch {
            expected: type_name::<C>(),
            actual: self.contract.name(),
            context: None,
        })
    }

    /// Returns `true` when both handles point at the same instance.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl fmt::Debug for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Service").field("contract", &self.contract).finish_non_exhaustive()
    }
}

/// Resolution context handed to factories and constructors.
pub trait Resolver {
    /// Resolves the service registered for `contract`.
    ///
    /// # Errors
    /// Returns [`ServiceError::NotRegistered`] for unknown contracts, or whatever error the
    /// registered activation produced.
    fn resolve_service(&self, contract: Contract) -> Result<Service, ServiceError>;

    fn contains(&self, contract: Contract) -> bool;
}

impl dyn Resolver + '_ {
    /// Resolves a typed handle for contract `C`.
    ///
    /// # Errors
    /// See [`Resolver::resolve_service`] and [`Service::downcast`].
    pub fn resolve<C: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<C>, ServiceError> {
        self.resolve_service(Contract::of::<C>())?.downcast::<C>()
    }

    /// Like [`resolve`](Self::resolve), but treats an unregistered contract as `None`.
    ///
    /// # Errors
    /// Propagates activation failures of a registered contract.
    pub fn try_resolve<C: ?Sized + Send + Sync + 'static>(
        &self,
    ) -> Result<Option<Arc<C>>, ServiceError> {
        if self.contains(Contract::of::<C>()) { self.resolve::<C>().map(Some) } else { Ok(None) }
    }
}

/// Concrete types the backing store can build on its own.
pub trait Construct: Sized + Send + Sync + 'static {
    /// # Errors
    /// Returns an error if a dependency cannot be resolved or construction fails.
    fn construct(resolver: &dyn Resolver) -> Result<Self, ServiceError>;
}

/// Upcast from a concrete type to the contract it satisfies.
///
/// Every type implements its own contract; trait-object contracts are wired with
/// [`implements!`](crate::implements).
pub trait Implements<C: ?Sized>: Send + Sync + 'static {
    fn upcast(this: Arc<Self>) -> Arc<C>;
}

impl<T: Send + Sync + 'static> Implements<T> for T {
    fn upcast(this: Arc<Self>) -> Arc<Self> {
        this
    }
}

/// Declares that a concrete type satisfies one or more trait-object contracts.
///
/// ```rust
/// use keel_domain::{Implements, implements};
/// use std::sync::Arc;
///
/// trait Clock: Send + Sync {
///     fn now(&self) -> u64;
/// }
///
/// struct FixedClock;
/// impl Clock for FixedClock {
///     fn now(&self) -> u64 { 7 }
/// }
///
/// implements!(FixedClock => dyn Clock);
///
/// let clock: Arc<dyn Clock> = <FixedClock as Implements<dyn Clock>>::upcast(Arc::new(FixedClock));
/// assert_eq!(clock.now(), 7);
/// ```
#[macro_export]
macro_rules! implements {
    ($concrete:ty => $($contract:ty),+ $(,)?) => {
        $(
            impl $crate::Implements<$contract> for $concrete {
                fn upcast(this: ::std::sync::Arc<Self>) -> ::std::sync::Arc<$contract> {
                    this
                }
            }
        )+
    };
}

/// A concrete type the backing store constructs for a contract.
#[derive(Clone, Copy)]
pub struct ImplementationType {
    target: Contract,
    concrete: Contract,
    activate: ActivateFn,
}

impl ImplementationType {
    /// Binds implementation `I` to contract `C`.
    #[must_use]
    pub fn of<C, I>() -> Self
    where
        C: ?Sized + Send + Sync + 'static,
        I: Construct + Implements<C>,
    {
        Self { target: Contract::of::<C>(), concrete: Contract::of::<I>(), activate: activate::<C, I> }
    }

    /// The contract this implementation was bound to.
    #[must_use]
    pub const fn target(&self) -> Contract {
        self.target
    }

    #[must_use]
    pub const fn concrete(&self) -> Contract {
        self.concrete
    }

    /// Builds a fresh instance.
    ///
    /// # Errors
    /// Propagates the [`Construct::construct`] failure.
    pub fn activate(&self, resolver: &dyn Resolver) -> Result<Service, ServiceError> {
        (self.activate)(resolver)
    }
}

impl fmt::Debug for ImplementationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImplementationType")
            .field("target", &self.target)
            .field("concrete", &self.concrete)
            .finish_non_exhaustive()
    }
}

fn activate<C, I>(resolver: &dyn Resolver) -> Result<Service, ServiceError>
where
    C: ?Sized + Send + Sync + 'static,
    I: Construct + Implements<C>,
{
    let instance = Arc::new(I::construct(resolver)?);
    Ok(Service::new(<I as Implements<C>>::upcast(instance)))
}

/// A function producing a service from a resolution context.
#[derive(Clone)]
pub struct Factory {
    target: Option<Contract>,
    create: Arc<FactoryFn>,
}

impl Factory {
    /// Typed factory for contract `C`.
    #[must_use]
    pub fn new<C, F>(factory: F) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn Resolver) -> Result<Arc<C>, ServiceError> + Send + Sync + 'static,
    {
        let create = move |resolver: &dyn Resolver| factory(resolver).map(Service::new);
        Self { target: Some(Contract::of::<C>()), create: Arc::new(create) }
    }

    /// Untyped factory; the produced [`Service`] is trusted to match the contract.
    #[must_use]
    pub fn erased<F>(factory: F) -> Self
    where
        F: Fn(&dyn Resolver) -> Result<Service, ServiceError> + Send + Sync + 'static,
    {
        Self { target: None, create: Arc::new(factory) }
    }

    /// Factory that always hands out the same instance.
    #[must_use]
    pub fn constant(service: Service) -> Self {
        let target = Some(service.contract());
        let create = move |_: &dyn Resolver| Ok::<_, ServiceError>(service.clone());
        Self { target, create: Arc::new(create) }
    }

    /// The contract produced by this factory, when it is known statically.
    #[must_use]
    pub const fn target(&self) -> Option<Contract> {
        self.target
    }

    /// # Errors
    /// Returns whatever the wrapped function returns.
    pub fn create(&self, resolver: &dyn Resolver) -> Result<Service, ServiceError> {
        (self.create)(resolver)
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory").field("target", &self.target).finish_non_exhaustive()
    }
}
