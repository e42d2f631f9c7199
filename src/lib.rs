//! File-backed configuration and ambient locale selection for the bundlekit
//! resource resolver.
//!
//! The resolver itself lives in `bundlekit_common`; this crate reads
//! `bundlekit.toml`, turns it into a [`bundlekit_common::ResolverConfig`], and
//! chooses the locale used when a caller does not name one.

pub mod ambient;
pub mod config;

pub use ambient::ambient_locale;
pub use config::{
    CONFIG_FILE_NAME, CacheLifetimeSetting, ConfigError, LocaleOverrideConfig, SharedConfig,
};
