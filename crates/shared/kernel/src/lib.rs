//! Kernel utilities shared by the composition crates.
//! Keep this crate lightweight; it re-exports the domain model and owns configuration loading.
//!
//! ## Config loading
//! ```rust,no_run
//! use keel_domain::config::KeelConfig;
//! use keel_kernel::config::load_config;
//!
//! // Reads ./keel.toml (or .json, .yaml, ...) and applies KEEL__* overrides.
//! let cfg: KeelConfig = load_config(None::<&str>).unwrap();
//! println!("{}", cfg.logger.level);
//! ```
pub mod config;
pub mod prelude;

pub use keel_domain as domain;
