//! # Logger
//!
//! Configures the process-wide `tracing` subscriber.
//! Console and rolling file output with non-blocking I/O, environment-based filtering, and
//! structured sinks that hand each event to a callback.
//!
//! * Use [`LoggerBuilder::env_filter`] to set module-directed filters
//!   (e.g., `"keel_composition=trace"`), in addition to `RUST_LOG`.
//! * Use [`LoggerBuilder::sink`] to observe events programmatically.
//! * [`Logger::from_settings`] builds everything from [`keel_domain::config::LoggerSettings`].
//!
//! ## Example
//!
//! ```rust
//! # use keel_logger::{Logger, LevelFilter};
//!
//! let _logger = Logger::builder()
//!     .name("my-app")
//!     .console(true)
//!     .level(LevelFilter::DEBUG)
//!     .sink(|record| assert!(!record.target.is_empty()))
//!     .init()
//!     .unwrap();
//! ```

mod builder;
mod error;
mod settings;
mod sink;

pub use crate::builder::{Logger, LoggerBuilder, NoFile, NoName, WithFile, WithName};
pub use crate::error::{LoggerError, LoggerErrorExt};
pub use crate::sink::{LogRecord, SinkLayer};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;
