use config::{Config, Environment, File, Map};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Prefix of environment variables that override file settings.
pub const ENV_PREFIX: &str = "KEEL";
/// Separator between the prefix and nested keys (e.g., `KEEL__LOGGER__LEVEL`).
pub const ENV_SEPARATOR: &str = "__";
/// File stem looked up when no path is given; any supported extension matches.
pub const DEFAULT_CONFIG_FILE: &str = "keel";

/// Custom error type for config loading.
#[keel_derive::keel_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// A reusable configuration loader that combines file-based settings with environment overrides.
///
/// Layers, lowest precedence first:
/// 1. **Base File**: the file at `path`, or `keel.{toml,json,yaml,...}` in the working directory.
/// 2. **Environment Overrides**: variables prefixed with `KEEL__`. Nested structures are
///    separated by double underscores (`KEEL__COMPOSITION__TRACE_DESCRIPTORS=true` maps to
///    `composition.trace_descriptors`).
///
/// # Errors
/// Returns [`ConfigError::Config`] if the file cannot be found or its content, merged with the
/// environment, does not deserialize into `T`.
///
/// # Example
/// ```rust
/// use keel_domain::config::KeelConfig;
/// use keel_kernel::config::load_config;
///
/// let cfg: KeelConfig = load_config(Some("config/local")).unwrap_or_default();
/// assert!(!cfg.composition.trace_descriptors);
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    load(path, None)
}

/// Like [`load_config`], but reads overrides from `vars` instead of the process environment.
///
/// Keys must carry the prefix, exactly as they would appear in the environment.
///
/// # Errors
/// See [`load_config`].
pub fn load_config_with_env<T, I>(path: Option<impl AsRef<Path>>, vars: I) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
    I: IntoIterator<Item = (String, String)>,
{
    load(path, Some(vars.into_iter().collect()))
}

fn load<T>(path: Option<impl AsRef<Path>>, vars: Option<Map<String, String>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let effective_path =
        path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(true))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator(ENV_SEPARATOR)
                .try_parsing(true)
                .convert_case(config::Case::Snake)
                .source(vars),
        );

    info!("Loading config from {}", effective_path.display());

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
