use crate::provider::ServiceProvider;
use fxhash::FxHashMap;
use keel_composition::{Activation, BackingStore};
use keel_domain::{Contract, Lifetime, ServiceError};
use tracing::{debug, trace};

/// One resolvable binding held by the store.
#[derive(Debug, Clone)]
pub struct Registration {
    lifetime: Lifetime,
    activation: Activation,
}

impl Registration {
    #[must_use]
    pub const fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    #[must_use]
    pub const fn activation(&self) -> &Activation {
        &self.activation
    }
}

/// Mutable registration table, keyed by contract.
///
/// Overwrites keep the contract's original position in [`contracts`](Self::contracts).
///
/// ```rust
/// use keel_composition::{Activation, BackingStore};
/// use keel_domain::{Contract, Factory, Resolver};
/// use keel_store::ServiceCollection;
/// use std::sync::Arc;
///
/// let mut services = ServiceCollection::new();
/// let factory = |n: u32| Activation::Factory(Factory::new(move |_: &dyn Resolver| Ok(Arc::new(n))));
///
/// services.try_add_singleton(Contract::of::<u32>(), factory(1)).unwrap();
/// services.try_add_singleton(Contract::of::<u32>(), factory(2)).unwrap();
///
/// let provider = services.build();
/// assert_eq!(*provider.resolve::<u32>().unwrap(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ServiceCollection {
    registrations: FxHashMap<Contract, Registration>,
    order: Vec<Contract>,
}

impl ServiceCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, contract: Contract) -> bool {
        self.registrations.contains_key(&contract)
    }

    #[must_use]
    pub fn get(&self, contract: Contract) -> Option<&Registration> {
        self.registrations.get(&contract)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Registered contracts in first-registration order.
    pub fn contracts(&self) -> impl Iterator<Item = Contract> + '_ {
        self.order.iter().copied()
    }

    /// Freezes the table into a resolver.
    #[must_use]
    pub fn build(self) -> ServiceProvider {
        debug!(services = self.registrations.len(), "Service provider built");
        ServiceProvider::new(self.registrations, self.order)
    }

    fn insert(
        &mut self,
        contract: Contract,
        lifetime: Lifetime,
        activation: Activation,
    ) -> Result<(), ServiceError> {
        check_target(contract, &activation)?;

        let registration = Registration { lifetime, activation };
        match self.registrations.insert(contract, registration) {
            Some(previous) => {
                debug!(%contract, from = %previous.lifetime, to = %lifetime, "Registration replaced");
            },
            None => self.order.push(contract),
        }
        Ok(())
    }

    fn try_insert(
        &mut self,
        contract: Contract,
        lifetime: Lifetime,
        activation: Activation,
    ) -> Result<(), ServiceError> {
        check_target(contract, &activation)?;

        if self.contains(contract) {
            trace!(%contract, %lifetime, "Registration skipped: contract already registered");
            return Ok(());
        }
        self.registrations.insert(contract, Registration { lifetime, activation });
        self.order.push(contract);
        Ok(())
    }
}

fn check_target(contract: Contract, activation: &Activation) -> Result<(), ServiceError> {
    match activation.target() {
        Some(target) if target != contract => Err(ServiceError::Rejected {
            contract,
            message: format!("activation produces {target}").into(),
            context: None,
        }),
        _ => Ok(()),
    }
}

impl BackingStore for ServiceCollection {
    fn add_transient(&mut self, contract: Contract, activation: Activation) -> Result<(), ServiceError> {
        self.insert(contract, Lifetime::Transient, activation)
    }

    fn try_add_transient(&mut self, contract: Contract, activation: Activation) -> Result<(), ServiceError> {
        self.try_insert(contract, Lifetime::Transient, activation)
    }

    fn add_singleton(&mut self, contract: Contract, activation: Activation) -> Result<(), ServiceError> {
        self.insert(contract, Lifetime::Singleton, activation)
    }

    fn try_add_singleton(&mut self, contract: Contract, activation: Activation) -> Result<(), ServiceError> {
        self.try_insert(contract, Lifetime::Singleton, activation)
    }
}
