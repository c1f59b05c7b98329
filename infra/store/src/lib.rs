//! # Service Store
//!
//! An in-memory [`BackingStore`](keel_composition::BackingStore) and the resolver built from it.
//!
//! ## Overview
//!
//! [`ServiceCollection`] receives registrations from a composition container: `add_*` calls
//! replace, `try_add_*` calls keep the first registration. [`ServiceCollection::build`] freezes
//! it into a [`ServiceProvider`] that activates transients on every resolve and caches
//! singletons per contract.
//!
//! * **Type-keyed**: registrations are indexed by contract (`TypeId`).
//! * **Lean**: `FxHashMap` + `parking_lot::RwLock` for the singleton cache.
//!
//! # Example
//!
//! ```rust
//! use keel_composition::{CompositionContainer, RegistrationBuilder};
//! use keel_domain::Resolver;
//! use keel_store::ServiceCollection;
//! use std::sync::Arc;
//!
//! let mut builder = RegistrationBuilder::new();
//! builder
//!     .add_singleton_instance(Arc::new(40_u32))
//!     .add_transient_factory(|r: &dyn Resolver| Ok(Arc::new(u64::from(*r.resolve::<u32>()?) + 2)));
//!
//! let container = CompositionContainer::new(ServiceCollection::new());
//! container.register(builder.build()).unwrap();
//!
//! let provider = container.into_store().build();
//! assert_eq!(*provider.resolve::<u64>().unwrap(), 42);
//! ```

mod collection;
mod provider;

pub use collection::{Registration, ServiceCollection};
pub use provider::ServiceProvider;
