//! Cache lifetime policy.
//!
//! The resolver never caches anything itself. It hands a [`CacheLifetime`]
//! to whichever cache sits in front of it, and the cache uses
//! [`CacheLifetime::needs_reload`] to decide when an entry is stale.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use crate::error::{ResolveError, Result};
use crate::locale::Locale;

/// How long a resolved bundle may be reused.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CacheLifetime {
    /// Cache indefinitely once loaded.
    #[default]
    NeverExpire,
    /// Do not cache; every resolution reads the backing resource.
    NeverCache,
    /// Reload once the entry is at least this old.
    ExpireAfter(Duration),
}

impl CacheLifetime {
    /// Setting name for [`CacheLifetime::NeverExpire`].
    pub const NEVER_EXPIRE: &'static str = "never-expire";
    /// Setting name for [`CacheLifetime::NeverCache`].
    pub const NEVER_CACHE: &'static str = "never-cache";

    /// Expire after `millis` milliseconds.
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self::ExpireAfter(Duration::from_millis(millis))
    }

    /// Whether a cache may store a bundle under this lifetime.
    #[must_use]
    pub const fn is_cacheable(self) -> bool {
        !matches!(self, Self::NeverCache)
    }

    /// Whether an entry loaded at `loaded_at` must be reloaded at `now`.
    ///
    /// ```
    /// use std::time::{Duration, Instant};
    /// use bundlekit_common::CacheLifetime;
    ///
    /// let loaded = Instant::now();
    /// let later = loaded + Duration::from_millis(1_500);
    /// assert!(!CacheLifetime::NeverExpire.needs_reload(loaded, later));
    /// assert!(CacheLifetime::NeverCache.needs_reload(loaded, loaded));
    /// assert!(CacheLifetime::from_millis(1_000).needs_reload(loaded, later));
    /// assert!(!CacheLifetime::from_millis(2_000).needs_reload(loaded, later));
    /// ```
    #[must_use]
    pub fn needs_reload(self, loaded_at: Instant, now: Instant) -> bool {
        match self {
            Self::NeverExpire => false,
            Self::NeverCache => true,
            Self::ExpireAfter(lifetime) => now.saturating_duration_since(loaded_at) >= lifetime,
        }
    }
}

impl FromStr for CacheLifetime {
    type Err = ResolveError;

    /// Parse `never-expire`, `never-cache`, or a number of milliseconds
    /// with an optional `ms` suffix.
    fn from_str(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        match trimmed {
            Self::NEVER_EXPIRE => Ok(Self::NeverExpire),
            Self::NEVER_CACHE => Ok(Self::NeverCache),
            millis => millis
                .strip_suffix("ms")
                .unwrap_or(millis)
                .trim_end()
                .parse::<u64>()
                .map(Self::from_millis)
                .map_err(|_| ResolveError::InvalidCacheLifetime {
                    value: input.to_owned(),
                }),
        }
    }
}

impl fmt::Display for CacheLifetime {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NeverExpire => formatter.write_str(Self::NEVER_EXPIRE),
            Self::NeverCache => formatter.write_str(Self::NEVER_CACHE),
            Self::ExpireAfter(lifetime) => write!(formatter, "{}ms", lifetime.as_millis()),
        }
    }
}

/// Supplies the lifetime for each bundle a resolver loads.
///
/// The configured value applies to every bundle; the base name and locale
/// are accepted so a richer policy can specialise per bundle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheLifetimePolicy {
    lifetime: CacheLifetime,
}

impl CacheLifetimePolicy {
    /// Policy returning `lifetime` for every bundle.
    #[must_use]
    pub const fn new(lifetime: CacheLifetime) -> Self {
        Self { lifetime }
    }

    /// Lifetime for the bundle `base_name` in `locale`.
    #[must_use]
    pub const fn lifetime(&self, _base_name: &str, _locale: &Locale) -> CacheLifetime {
        self.lifetime
    }

    /// Whether the cached bundle `base_name` in `locale`, loaded at
    /// `loaded_at`, must be reloaded at `now`.
    #[must_use]
    pub fn needs_reload(
        &self,
        base_name: &str,
        locale: &Locale,
        loaded_at: Instant,
        now: Instant,
    ) -> bool {
        self.lifetime(base_name, locale).needs_reload(loaded_at, now)
    }
}
