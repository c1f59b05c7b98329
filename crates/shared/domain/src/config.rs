use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level settings shared by the logger and the composition container.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeelConfigInner {
    pub logger: LoggerSettings,
    pub composition: CompositionSettings,
}

/// Thin Arc-wrapped config for inexpensive cloning into modules.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct KeelConfig {
    #[serde(flatten, default)]
    inner: Arc<KeelConfigInner>,
}

impl Deref for KeelConfig {
    type Target = KeelConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for KeelConfig {
    fn deref_mut(&mut self) -> &mut KeelConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Global tracing subscriber settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggerSettings {
    pub name: String,
    /// One of `trace`, `debug`, `info`, `warn`, `error`, `off`.
    pub level: String,
    pub console: bool,
    /// Directory for rolling log files; file output is disabled when unset.
    pub path: Option<PathBuf>,
    pub json: bool,
    pub max_files: usize,
    pub env_filter: Option<String>,
}

/// Composition container behaviour.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CompositionSettings {
    /// Emit one trace event per applied descriptor.
    pub trace_descriptors: bool,
}

// --- Default ---

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            name: "keel".to_owned(),
            level: "info".to_owned(),
            console: true,
            path: None,
            json: false,
            max_files: 10,
            env_filter: None,
        }
    }
}
