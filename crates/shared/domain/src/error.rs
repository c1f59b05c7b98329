use crate::contract::Contract;
use std::borrow::Cow;

/// Errors raised by backing stores while registering or resolving services.
#[keel_derive::keel_error]
pub enum ServiceError {
    /// No registration exists for the requested contract.
    #[error("Service not registered{}: {contract}", format_context(.context))]
    NotRegistered { contract: Contract, context: Option<Cow<'static, str>> },

    /// A type-erased value did not hold the requested contract type.
    #[error("Type mismatch{}: expected {expected}, found {actual}", format_context(.context))]
    TypeMismatch { expected: &'static str, actual: &'static str, context: Option<Cow<'static, str>> },

    /// The backing store refused a registration call.
    #[error("Registration rejected for {contract}{}: {message}", format_context(.context))]
    Rejected { contract: Contract, message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A factory or constructor failed.
    #[error("Service construction failed{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
