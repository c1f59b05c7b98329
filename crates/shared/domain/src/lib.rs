//! # Domain Models
//!
//! The registration model shared by the builder, the composition container and every
//! backing store: contracts, lifetimes, construction sources and descriptors.
//! Keep it lean: no I/O and no registration policy, just data and the type-erasure helpers.

pub mod config;
pub mod contract;
pub mod descriptor;
pub mod error;
pub mod lifetime;
pub mod service;

pub use contract::Contract;
pub use descriptor::{Descriptor, Source};
pub use error::{ServiceError, ServiceErrorExt};
pub use lifetime::Lifetime;
pub use service::{Construct, Factory, ImplementationType, Implements, Resolver, Service};
