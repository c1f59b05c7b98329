//! Facade crate for Keel.
//! Re-exports the registration model, the composition container, the in-memory store and the
//! kernel/logger infrastructure. Keep this crate thin: it should compose other crates, not
//! implement policy.
//!
//! ## Usage
//! Describe services in [`CompositionModule`](composition::CompositionModule)s, then call
//! [`compose`] once at startup and hand the resulting provider to the application.
//!
//! ```rust
//! use keel::prelude::*;
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! struct Polite;
//! impl Greeter for Polite {
//!     fn greet(&self) -> String { "good day".to_owned() }
//! }
//! impl Construct for Polite {
//!     fn construct(_: &dyn Resolver) -> Result<Self, ServiceError> { Ok(Self) }
//! }
//! implements!(Polite => dyn Greeter);
//!
//! fn greetings(builder: &mut RegistrationBuilder) -> Result<(), CompositionError> {
//!     builder.try_add_singleton::<dyn Greeter, Polite>();
//!     Ok(())
//! }
//!
//! let provider = keel::compose(&KeelConfig::default(), &[&greetings]).unwrap();
//! assert_eq!(provider.resolve::<dyn Greeter>().unwrap().greet(), "good day");
//! ```

use keel_composition::{CompositionContainer, CompositionError, CompositionModule, RegistrationBuilder};
use keel_domain::config::KeelConfig;
use keel_store::{ServiceCollection, ServiceProvider};
use std::sync::Arc;
use tracing::debug;

pub use keel_composition as composition;
pub use keel_domain as domain;
pub use keel_kernel as kernel;
pub use keel_logger as logger;
pub use keel_store as store;

pub mod prelude {
    pub use keel_composition::{
        Activation, BackingStore, CompositionContainer, CompositionError, CompositionModule,
        CompositionReport, RegistrationBuilder, Registrations,
    };
    pub use keel_kernel::prelude::*;
    pub use keel_store::{ServiceCollection, ServiceProvider};
}

/// Runs `modules` in order against one builder, applies the result to a fresh
/// [`ServiceCollection`] and returns its provider.
///
/// `config` is available to every module as a Temporary value:
/// `builder.get_temporary::<KeelConfig>()`.
///
/// # Errors
/// Returns the first module failure, or the [`CompositionError`] raised while applying the
/// registrations.
pub fn compose(
    config: &KeelConfig,
    modules: &[&dyn CompositionModule],
) -> Result<ServiceProvider, CompositionError> {
    let mut builder = RegistrationBuilder::new();
    builder.add_temporary(Arc::new(config.clone()));

    for module in modules {
        builder.apply_module(*module)?;
    }
    debug!(modules = modules.len(), descriptors = builder.len(), "Registrations collected");

    let container = CompositionContainer::with_settings(ServiceCollection::new(), &config.composition);
    container.register(builder.build())?;
    Ok(container.into_store().build())
}
