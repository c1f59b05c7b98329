use crate::contract::Contract;
use crate::lifetime::Lifetime;
use crate::service::{Construct, Factory, ImplementationType, Implements, Resolver, Service};
use crate::error::ServiceError;
use std::fmt;
use std::sync::Arc;

/// How the backing store obtains an instance.
#[derive(Debug, Clone)]
pub enum Source {
    /// No construction source (Temporary placeholders).
    None,
    /// A concrete type built by the backing store.
    Type(ImplementationType),
    /// A function invoked with a resolution context.
    Factory(Factory),
    /// A pre-built value. Only legal for singletons.
    Instance(Service),
}

impl Source {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Type(_) => "type",
            Self::Factory(_) => "factory",
            Self::Instance(_) => "instance",
        }
    }
}

/// One desired service binding.
///
/// The typed constructors only produce shapes a container accepts and default to
/// `always_register = true`; chain [`Descriptor::try_add`] for first-write-wins semantics.
/// [`Descriptor::new`] accepts any combination and leaves validation to the container.
///
/// ```rust
/// use keel_domain::{Descriptor, Lifetime};
/// use std::sync::Arc;
///
/// let descriptor = Descriptor::singleton_instance(Arc::new("x".to_owned())).try_add();
/// assert_eq!(descriptor.lifetime(), Lifetime::Singleton);
/// assert!(!descriptor.always_register());
/// ```
#[derive(Debug, Clone)]
pub struct Descriptor {
    contract: Contract,
    lifetime: Lifetime,
    source: Source,
    always_register: bool,
    payload: Option<Service>,
}

impl Descriptor {
    #[must_use]
    pub const fn new(
        contract: Contract,
        lifetime: Lifetime,
        source: Source,
        always_register: bool,
    ) -> Self {
        Self { contract, lifetime, source, always_register, payload: None }
    }

    #[must_use]
    pub fn transient<C, I>() -> Self
    where
        C: ?Sized + Send + Sync + 'static,
        I: Construct + Implements<C>,
    {
        Self::typed::<C>(Lifetime::Transient, Source::Type(ImplementationType::of::<C, I>()))
    }

    #[must_use]
    pub fn transient_factory<C, F>(factory: F) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn Resolver) -> Result<Arc<C>, ServiceError> + Send + Sync + 'static,
    {
        Self::typed::<C>(Lifetime::Transient, Source::Factory(Factory::new(factory)))
    }

    #[must_use]
    pub fn singleton<C, I>() -> Self
    where
        C: ?Sized + Send + Sync + 'static,
        I: Construct + Implements<C>,
    {
        Self::typed::<C>(Lifetime::Singleton, Source::Type(ImplementationType::of::<C, I>()))
    }

    #[must_use]
    pub fn singleton_factory<C, F>(factory: F) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn Resolver) -> Result<Arc<C>, ServiceError> + Send + Sync + 'static,
    {
        Self::typed::<C>(Lifetime::Singleton, Source::Factory(Factory::new(factory)))
    }

    #[must_use]
    pub fn singleton_instance<C: ?Sized + Send + Sync + 'static>(instance: Arc<C>) -> Self {
        Self::typed::<C>(Lifetime::Singleton, Source::Instance(Service::new(instance)))
    }

    /// A builder-only placeholder carrying `value`, keyed by contract `C`.
    #[must_use]
    pub fn temporary<C: ?Sized + Send + Sync + 'static>(value: Arc<C>) -> Self {
        Self {
            contract: Contract::of::<C>(),
            lifetime: Lifetime::Temporary,
            source: Source::None,
            always_register: false,
            payload: Some(Service::new(value)),
        }
    }

    fn typed<C: ?Sized + 'static>(lifetime: Lifetime, source: Source) -> Self {
        Self::new(Contract::of::<C>(), lifetime, source, true)
    }

    /// Switches to try-add: register only if the contract has no registration yet.
    #[must_use]
    pub const fn try_add(mut self) -> Self {
        self.always_register = false;
        self
    }

    /// Switches to overwrite: replace any existing registration.
    #[must_use]
    pub const fn overwrite(mut self) -> Self {
        self.always_register = true;
        self
    }

    #[must_use]
    pub const fn contract(&self) -> Contract {
        self.contract
    }

    #[must_use]
    pub const fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    #[must_use]
    pub const fn source(&self) -> &Source {
        &self.source
    }

    #[must_use]
    pub const fn always_register(&self) -> bool {
        self.always_register
    }

    /// Consumes the descriptor, yielding its construction source.
    #[must_use]
    pub fn into_source(self) -> Source {
        self.source
    }

    /// Payload of a Temporary descriptor.
    #[must_use]
    pub const fn payload(&self) -> Option<&Service> {
        self.payload.as_ref()
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = if self.always_register { "overwrite" } else { "try-add" };
        write!(f, "{} {} <- {} ({mode})", self.lifetime, self.contract, self.source.kind())
    }
}
