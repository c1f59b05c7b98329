use crate::error::CompositionError;
use crate::module::CompositionModule;
use keel_domain::{Construct, Contract, Descriptor, Implements, Lifetime, Resolver, ServiceError};
use std::sync::Arc;
use tracing::trace;

/// Append-only log of descriptors, consumed once by [`build`](Self::build).
///
/// No de-duplication happens here: several descriptors per contract are expected, and their
/// order is the order the container applies them in.
///
/// ```rust
/// use keel_composition::RegistrationBuilder;
/// use std::sync::Arc;
///
/// let mut builder = RegistrationBuilder::new();
/// builder
///     .add_temporary(Arc::new("pre-built".to_owned()))
///     .try_add_singleton_instance(Arc::new(42_u32));
///
/// assert_eq!(*builder.get_temporary::<String>().unwrap(), "pre-built");
/// assert_eq!(builder.build().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct RegistrationBuilder {
    descriptors: Vec<Descriptor>,
}

impl RegistrationBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, descriptor: Descriptor) -> &mut Self {
        trace!(%descriptor, position = self.descriptors.len(), "Descriptor added");
        self.descriptors.push(descriptor);
        self
    }

    /// Stores a pre-built value under contract `C` without making it resolvable.
    pub fn add_temporary<C: ?Sized + Send + Sync + 'static>(&mut self, value: Arc<C>) -> &mut Self {
        self.add(Descriptor::temporary(value))
    }

    /// Returns the most recently added Temporary value for contract `C`.
    ///
    /// # Errors
    /// Returns [`CompositionError::TemporaryNotFound`] if no Temporary value was added for `C`.
    pub fn get_temporary<C: ?Sized + Send + Sync + 'static>(
        &self,
    ) -> Result<Arc<C>, CompositionError> {
        let contract = Contract::of::<C>();
        let payload = self
            .descriptors
            .iter()
            .rev()
            .filter(|d| d.lifetime() == Lifetime::Temporary && d.contract() == contract)
            .find_map(Descriptor::payload)
            .ok_or(CompositionError::TemporaryNotFound { contract, context: None })?;

        Ok(payload.downcast::<C>()?)
    }

    pub fn add_transient<C, I>(&mut self) -> &mut Self
    where
        C: ?Sized + Send + Sync + 'static,
        I: Construct + Implements<C>,
    {
        self.add(Descriptor::transient::<C, I>())
    }

    pub fn try_add_transient<C, I>(&mut self) -> &mut Self
    where
        C: ?Sized + Send + Sync + 'static,
        I: Construct + Implements<C>,
    {
        self.add(Descriptor::transient::<C, I>().try_add())
    }

    pub fn add_transient_factory<C, F>(&mut self, factory: F) -> &mut Self
    where
        C: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn Resolver) -> Result<Arc<C>, ServiceError> + Send + Sync + 'static,
    {
        self.add(Descriptor::transient_factory(factory))
    }

    pub fn try_add_transient_factory<C, F>(&mut self, factory: F) -> &mut Self
    where
        C: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn Resolver) -> Result<Arc<C>, ServiceError> + Send + Sync + 'static,
    {
        self.add(Descriptor::transient_factory(factory).try_add())
    }

    pub fn add_singleton<C, I>(&mut self) -> &mut Self
    where
        C: ?Sized + Send + Sync + 'static,
        I: Construct + Implements<C>,
    {
        self.add(Descriptor::singleton::<C, I>())
    }

    pub fn try_add_singleton<C, I>(&mut self) -> &mut Self
    where
        C: ?Sized + Send + Sync + 'static,
        I: Construct + Implements<C>,
    {
        self.add(Descriptor::singleton::<C, I>().try_add())
    }

    pub fn add_singleton_factory<C, F>(&mut self, factory: F) -> &mut Self
    where
        C: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn Resolver) -> Result<Arc<C>, ServiceError> + Send + Sync + 'static,
    {
        self.add(Descriptor::singleton_factory(factory))
    }

    pub fn try_add_singleton_factory<C, F>(&mut self, factory: F) -> &mut Self
    where
        C: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn Resolver) -> Result<Arc<C>, ServiceError> + Send + Sync + 'static,
    {
        self.add(Descriptor::singleton_factory(factory).try_add())
    }

    pub fn add_singleton_instance<C: ?Sized + Send + Sync + 'static>(
        &mut self,
        instance: Arc<C>,
    ) -> &mut Self {
        self.add(Descriptor::singleton_instance(instance))
    }

    pub fn try_add_singleton_instance<C: ?Sized + Send + Sync + 'static>(
        &mut self,
        instance: Arc<C>,
    ) -> &mut Self {
        self.add(Descriptor::singleton_instance(instance).try_add())
    }

    /// Lets `module` append its descriptors.
    ///
    /// # Errors
    /// Propagates the module failure, annotated with the module name.
    pub fn apply_module<M: CompositionModule + ?Sized>(
        &mut self,
        module: &M,
    ) -> Result<&mut Self, CompositionError> {
        use crate::error::CompositionErrorExt;

        let before = self.descriptors.len();
        module.configure(self).context(module.name())?;
        trace!(module = module.name(), added = self.descriptors.len() - before, "Module applied");
        Ok(self)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// All descriptors in insertion order, Temporary entries included.
    #[must_use]
    pub fn descriptors(&self) -> &[Descriptor] {
        &self.descriptors
    }

    /// Extracts the ordered, resolvable registrations. Temporary entries are dropped here.
    #[must_use]
    pub fn build(self) -> Registrations {
        let descriptors: Vec<_> =
            self.descriptors.into_iter().filter(|d| d.lifetime().is_resolvable()).collect();
        Registrations { descriptors }
    }
}

/// The finalized, ordered sequence handed to a composition container.
#[derive(Debug, Clone, Default)]
pub struct Registrations {
    descriptors: Vec<Descriptor>,
}

impl Registrations {
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'_, Descriptor> {
        self.descriptors.iter()
    }
}

impl IntoIterator for Registrations {
    type Item = Descriptor;
    type IntoIter = std::vec::IntoIter<Descriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.descriptors.into_iter()
    }
}

impl<'a> IntoIterator for &'a Registrations {
    type Item = &'a Descriptor;
    type IntoIter = std::slice::Iter<'a, Descriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.descriptors.iter()
    }
}

impl From<Vec<Descriptor>> for Registrations {
    fn from(descriptors: Vec<Descriptor>) -> Self {
        Self { descriptors }
    }
}
