//! Kernel utilities for the follower gauge: turning an external configuration source
//! into a validated [`DeviceConfig`](gauge_domain::DeviceConfig).
//!
//! ## Config loading
//! ```rust,no_run
//! use gauge_kernel::config::load_config;
//!
//! // Reads `device.toml` (or `.yaml`, `.json`, ...) plus `GAUGE__*` overrides.
//! let cfg = load_config(None::<&str>)?;
//! println!("publishing to {} every {:?}", cfg.broker_address(), cfg.report_interval());
//! # Ok::<(), gauge_kernel::ConfigError>(())
//! ```
//!
//! ## Legacy headers
//! Older firmware kept the same settings as `#define` constants in `user_config.h`;
//! [`legacy::import_header`] reads that format into a [`config::RawDeviceConfig`].

pub mod config;
mod error;
pub mod legacy;

pub use error::{ConfigError, ConfigErrorExt};
pub use gauge_domain as domain;
