pub use crate::config::{ConfigError, ConfigErrorExt, load_config, load_config_with_env};
pub use keel_domain::config::{CompositionSettings, KeelConfig, LoggerSettings};
pub use keel_domain::{
    Construct, Contract, Descriptor, Implements, Lifetime, Resolver, ServiceError, Source,
    implements,
};
