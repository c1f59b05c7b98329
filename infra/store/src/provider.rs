use crate::collection::Registration;
use fxhash::FxHashMap;
use keel_composition::Activation;
use keel_domain::{Contract, Lifetime, Resolver, Service, ServiceError, ServiceErrorExt};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::trace;

#[derive(Debug)]
struct ProviderInner {
    registrations: FxHashMap<Contract, Registration>,
    order: Vec<Contract>,
    singletons: RwLock<FxHashMap<Contract, Service>>,
}

/// Read-only resolver over a finished [`ServiceCollection`](crate::ServiceCollection).
///
/// Cloning is cheap and clones share one singleton cache. Singletons are constructed outside
/// the cache lock; when two threads race on the first resolution, the first value cached is
/// the one every caller gets. Dependency cycles are not detected.
#[derive(Debug, Clone)]
pub struct ServiceProvider {
    inner: Arc<ProviderInner>,
}

impl ServiceProvider {
    pub(crate) fn new(registrations: FxHashMap<Contract, Registration>, order: Vec<Contract>) -> Self {
        Self {
            inner: Arc::new(ProviderInner {
                registrations,
                order,
                singletons: RwLock::new(FxHashMap::default()),
            }),
        }
    }

    /// Resolves a typed handle for contract `C`.
    ///
    /// # Errors
    /// Returns [`ServiceError::NotRegistered`] for unknown contracts, or the activation error.
    pub fn resolve<C: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<C>, ServiceError> {
        (self as &dyn Resolver).resolve::<C>()
    }

    /// Like [`resolve`](Self::resolve), but an unregistered contract yields `None`.
    ///
    /// # Errors
    /// Propagates activation failures of a registered contract.
    pub fn try_resolve<C: ?Sized + Send + Sync + 'static>(
        &self,
    ) -> Result<Option<Arc<C>>, ServiceError> {
        (self as &dyn Resolver).try_resolve::<C>()
    }

    #[must_use]
    pub fn lifetime(&self, contract: Contract) -> Option<Lifetime> {
        self.inner.registrations.get(&contract).map(Registration::lifetime)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.registrations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.registrations.is_empty()
    }

    /// Registered contracts in first-registration order.
    pub fn contracts(&self) -> impl Iterator<Item = Contract> + '_ {
        self.inner.order.iter().copied()
    }

    fn activate(&self, contract: Contract, activation: &Activation) -> Result<Service, ServiceError> {
        let service = match activation {
            Activation::Type(implementation) => implementation.activate(self),
            Activation::Factory(factory) => factory.create(self),
        }
        .context(contract.name())?;

        if service.contract() != contract {
            return Err(ServiceError::TypeMismatch {
                expected: contract.name(),
                actual: service.contract().name(),
                context: Some("activation result".into()),
            });
        }
        Ok(service)
    }

    fn singleton(&self, contract: Contract, activation: &Activation) -> Result<Service, ServiceError> {
        if let Some(service) = self.inner.singletons.read().get(&contract) {
            return Ok(service.clone());
        }

        let service = self.activate(contract, activation)?;
        let mut singletons = self.inner.singletons.write();
        let cached = singletons.entry(contract).or_insert(service);
        trace!(%contract, "Singleton cached");
        Ok(cached.clone())
    }
}

impl Resolver for ServiceProvider {
    fn resolve_service(&self, contract: Contract) -> Result<Service, ServiceError> {
        let registration = self
            .inner
            .registrations
            .get(&contract)
            .ok_or(ServiceError::NotRegistered { contract, context: None })?;

        match registration.lifetime() {
            Lifetime::Singleton => self.singleton(contract, registration.activation()),
            _ => self.activate(contract, registration.activation()),
        }
    }

    fn contains(&self, contract: Contract) -> bool {
        self.inner.registrations.contains_key(&contract)
    }
}
