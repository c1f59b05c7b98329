use keel_domain::{Contract, Factory, ImplementationType, ServiceError};

/// What a backing store receives for a resolvable registration.
#[derive(Debug, Clone)]
pub enum Activation {
    /// Construct the implementation type on every activation.
    Type(ImplementationType),
    /// Invoke the factory on every activation.
    Factory(Factory),
}

impl Activation {
    /// The contract the activation produces, when it is known statically.
    #[must_use]
    pub const fn target(&self) -> Option<Contract> {
        match self {
            Self::Type(implementation) => Some(implementation.target()),
            Self::Factory(factory) => factory.target(),
        }
    }
}

/// The container the composition layer writes into.
///
/// `add_*` replaces any existing registration for the contract; `try_add_*` registers only
/// when the contract is still unregistered, so the first write wins.
pub trait BackingStore {
    /// # Errors
    /// Returns [`ServiceError::Rejected`] if the store refuses the registration.
    fn add_transient(&mut self, contract: Contract, activation: Activation) -> Result<(), ServiceError>;

    /// # Errors
    /// Returns [`ServiceError::Rejected`] if the store refuses the registration.
    fn try_add_transient(&mut self, contract: Contract, activation: Activation) -> Result<(), ServiceError>;

    /// # Errors
    /// Returns [`ServiceError::Rejected`] if the store refuses the registration.
    fn add_singleton(&mut self, contract: Contract, activation: Activation) -> Result<(), ServiceError>;

    /// # Errors
    /// Returns [`ServiceError::Rejected`] if the store refuses the registration.
    fn try_add_singleton(&mut self, contract: Contract, activation: Activation) -> Result<(), ServiceError>;
}

impl<S: BackingStore + ?Sized> BackingStore for &mut S {
    fn add_transient(&mut self, contract: Contract, activation: Activation) -> Result<(), ServiceError> {
        (**self).add_transient(contract, activation)
    }

    fn try_add_transient(&mut self, contract: Contract, activation: Activation) -> Result<(), ServiceError> {
        (**self).try_add_transient(contract, activation)
    }

    fn add_singleton(&mut self, contract: Contract, activation: Activation) -> Result<(), ServiceError> {
        (**self).add_singleton(contract, activation)
    }

    fn try_add_singleton(&mut self, contract: Contract, activation: Activation) -> Result<(), ServiceError> {
        (**self).try_add_singleton(contract, activation)
    }
}

impl<S: BackingStore + ?Sized> BackingStore for Box<S> {
    fn add_transient(&mut self, contract: Contract, activation: Activation) -> Result<(), ServiceError> {
        (**self).add_transient(contract, activation)
    }

    fn try_add_transient(&mut self, contract: Contract, activation: Activation) -> Result<(), ServiceError> {
        (**self).try_add_transient(contract, activation)
    }

    fn add_singleton(&mut self, contract: Contract, activation: Activation) -> Result<(), ServiceError> {
        (**self).add_singleton(contract, activation)
    }

    fn try_add_singleton(&mut self, contract: Contract, activation: Activation) -> Result<(), ServiceError> {
        (**self).try_add_singleton(contract, activation)
    }
}
