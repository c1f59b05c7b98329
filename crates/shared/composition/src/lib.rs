//! # Composition
//!
//! Turns declarative registrations into calls on a backing store, exactly once.
//!
//! ## Overview
//!
//! * [`RegistrationBuilder`] collects descriptors from independent [`CompositionModule`]s.
//!   Insertion order is application order; Temporary values stay in the builder.
//! * [`CompositionContainer`] applies the finalized [`Registrations`] to a [`BackingStore`],
//!   choosing overwrite or try-add per descriptor.
//!
//! # Example
//!
//! ```rust
//! use keel_composition::{Activation, BackingStore, CompositionContainer, RegistrationBuilder};
//! use keel_domain::{Contract, ServiceError};
//! use std::sync::Arc;
//!
//! #[derive(Default)]
//! struct Log(Vec<&'static str>);
//!
//! impl BackingStore for Log {
//!     fn add_transient(&mut self, _: Contract, _: Activation) -> Result<(), ServiceError> { self.0.push("add_transient"); Ok(()) }
//!     fn try_add_transient(&mut self, _: Contract, _: Activation) -> Result<(), ServiceError> { self.0.push("try_add_transient"); Ok(()) }
//!     fn add_singleton(&mut self, _: Contract, _: Activation) -> Result<(), ServiceError> { self.0.push("add_singleton"); Ok(()) }
//!     fn try_add_singleton(&mut self, _: Contract, _: Activation) -> Result<(), ServiceError> { self.0.push("try_add_singleton"); Ok(()) }
//! }
//!
//! let mut builder = RegistrationBuilder::new();
//! builder
//!     .add_temporary(Arc::new("connection string".to_owned()))
//!     .try_add_singleton_instance(Arc::new(8080_u16));
//!
//! let container = CompositionContainer::new(Log::default());
//! container.register(builder.build()).unwrap();
//! assert_eq!(container.into_store().0, ["try_add_singleton"]);
//! ```

mod builder;
mod container;
mod error;
mod module;
mod store;

pub use builder::{RegistrationBuilder, Registrations};
pub use container::{CompositionContainer, CompositionReport};
pub use error::{CompositionError, CompositionErrorExt};
pub use module::CompositionModule;
pub use store::{Activation, BackingStore};
