use keel_domain::{Contract, Lifetime, ServiceError};
use std::borrow::Cow;

/// Errors surfaced while accumulating or applying registrations.
#[keel_derive::keel_error]
pub enum CompositionError {
    /// `register` was called on a container that already ran.
    #[error("Composition already applied{}", format_context(.context))]
    AlreadyApplied { context: Option<Cow<'static, str>> },

    /// The descriptor's lifetime and construction source form no supported registration.
    #[error(
        "Registration not supported{}: {lifetime} {contract} with {source_kind} source",
        format_context(.context)
    )]
    NotSupported {
        contract: Contract,
        lifetime: Lifetime,
        source_kind: &'static str,
        context: Option<Cow<'static, str>>,
    },

    /// The builder holds no Temporary value for the contract.
    #[error("Temporary value not found{}: {contract}", format_context(.context))]
    TemporaryNotFound { contract: Contract, context: Option<Cow<'static, str>> },

    /// The backing store rejected a registration call.
    #[error("Backing store error{}: {source}", format_context(.context))]
    Store { source: ServiceError, context: Option<Cow<'static, str>> },

    /// A composition module failed for reasons of its own.
    #[error("Composition module failed{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
