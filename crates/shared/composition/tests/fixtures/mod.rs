use keel_composition::{Activation, BackingStore};
use keel_domain::{Contract, Resolver, Service, ServiceError};
use std::collections::HashMap;

/// One observed backing store call.
#[derive(Debug, Clone)]
pub struct Call {
    pub op: &'static str,
    pub contract: Contract,
    pub activation: Activation,
}

/// Backing store double that records every call and can refuse one contract.
#[derive(Debug, Default)]
pub struct RecordingStore {
    pub calls: Vec<Call>,
    pub reject: Option<Contract>,
}

impl RecordingStore {
    #[must_use]
    pub fn rejecting(contract: Contract) -> Self {
        Self { calls: Vec::new(), reject: Some(contract) }
    }

    #[must_use]
    pub fn ops(&self) -> Vec<&'static str> {
        self.calls.iter().map(|call| call.op).collect()
    }

    fn record(
        &mut self,
        op: &'static str,
        contract: Contract,
        activation: Activation,
    ) -> Result<(), ServiceError> {
        if self.reject == Some(contract) {
            return Err(ServiceError::Rejected {
                contract,
                message: "refused by test store".into(),
                context: None,
            });
        }
        self.calls.push(Call { op, contract, activation });
        Ok(())
    }
}

impl BackingStore for RecordingStore {
    fn add_transient(&mut self, contract: Contract, activation: Activation) -> Result<(), ServiceError> {
        self.record("add_transient", contract, activation)
    }

    fn try_add_transient(&mut self, contract: Contract, activation: Activation) -> Result<(), ServiceError> {
        self.record("try_add_transient", contract, activation)
    }

    fn add_singleton(&mut self, contract: Contract, activation: Activation) -> Result<(), ServiceError> {
        self.record("add_singleton", contract, activation)
    }

    fn try_add_singleton(&mut self, contract: Contract, activation: Activation) -> Result<(), ServiceError> {
        self.record("try_add_singleton", contract, activation)
    }
}

/// Resolver with nothing registered, for activating recorded factories.
#[derive(Debug, Default)]
pub struct EmptyResolver(HashMap<Contract, Service>);

impl Resolver for EmptyResolver {
    fn resolve_service(&self, contract: Contract) -> Result<Service, ServiceError> {
        self.0.get(&contract).cloned().ok_or(ServiceError::NotRegistered { contract, context: None })
    }

    fn contains(&self, contract: Contract) -> bool {
        self.0.contains_key(&contract)
    }
}

/// Runs the activation the way a store would.
///
/// # Panics
/// Panics if activation fails.
#[must_use]
pub fn activate(activation: &Activation) -> Service {
    let resolver = EmptyResolver::default();
    match activation {
        Activation::Type(implementation) => implementation.activate(&resolver),
        Activation::Factory(factory) => factory.create(&resolver),
    }
    .expect("activation failed")
}

pub trait Greeter: Send + Sync {
    fn greet(&self) -> &'static str;
}

#[derive(Debug)]
pub struct English;

impl Greeter for English {
    fn greet(&self) -> &'static str {
        "hello"
    }
}

impl keel_domain::Construct for English {
    fn construct(_: &dyn Resolver) -> Result<Self, ServiceError> {
        Ok(Self)
    }
}

keel_domain::implements!(English => dyn Greeter);
