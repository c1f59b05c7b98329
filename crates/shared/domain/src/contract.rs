use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

/// The identity a consumer depends on.
///
/// Any `'static` type qualifies, including trait objects (`dyn Clock`), which is the usual
/// shape of a service contract.
///
/// ```rust
/// use keel_domain::Contract;
///
/// trait Clock: Send + Sync {}
///
/// let contract = Contract::of::<dyn Clock>();
/// assert_eq!(contract, Contract::of::<dyn Clock>());
/// assert_ne!(contract, Contract::of::<String>());
/// ```
#[derive(Clone, Copy)]
pub struct Contract {
    id: TypeId,
    name: &'static str,
}

impl Contract {
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self { id: TypeId::of::<T>(), name: type_name::<T>() }
    }

    #[must_use]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// Type name for diagnostics. Not guaranteed to be unique or stable across compilers.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for Contract {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Contract {}

impl Hash for Contract {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Contract").field(&self.name).finish()
    }
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
