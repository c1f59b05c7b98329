use keel_derive::keel_error;
use std::borrow::Cow;

#[keel_error]
pub enum RegistryError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Duplicate contract{}: {name}", format_context(.context))]
    Duplicate { name: &'static str, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read() -> Result<Vec<u8>, RegistryError> {
    std::fs::read("missing.toml").context("Reading registrations")
}

fn main() {
    let err: RegistryError = "boom".into();
    assert!(matches!(err, RegistryError::Internal { .. }));

    let err = read().unwrap_err();
    assert!(err.to_string().contains("(Reading registrations)"));

    let dup: Result<(), RegistryError> =
        Err(RegistryError::Duplicate { name: "dyn Clock", context: None });
    let dup = dup.context("module order").unwrap_err();
    assert_eq!(dup.to_string(), "Duplicate contract (module order): dyn Clock");
}
