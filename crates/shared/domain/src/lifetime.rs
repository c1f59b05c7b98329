use serde::{Deserialize, Serialize};
use std::fmt;

/// How long a constructed instance is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifetime {
    /// New instance per resolution.
    Transient,
    /// One instance for the lifetime of the backing store.
    Singleton,
    /// Builder-only placeholder. Never forwarded to a backing store.
    Temporary,
}

impl Lifetime {
    #[must_use]
    pub const fn is_resolvable(self) -> bool {
        !matches!(self, Self::Temporary)
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Transient => "transient",
            Self::Singleton => "singleton",
            Self::Temporary => "temporary",
        })
    }
}
