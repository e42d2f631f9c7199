//! In-process cache of resolved bundles.
//!
//! Entries are keyed by base name and requested locale only; the resolver
//! configuration is not part of the key, so two resolvers sharing a cache
//! share what either of them loaded first. Each entry remembers the lifetime
//! that applied when it was stored and is reloaded through
//! [`ResourceResolver::resolve_fresh`] once that lifetime has elapsed.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use log::debug;

use crate::error::Result;
use crate::lifetime::CacheLifetime;
use crate::locale::Locale;
use crate::provider::StreamProvider;
use crate::resolver::{ResolvedResource, ResourceResolver};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct CacheKey {
    base_name: String,
    locale: Locale,
}

#[derive(Debug)]
struct CachedBundle {
    resource: Arc<ResolvedResource>,
    loaded_at: Instant,
    lifetime: CacheLifetime,
}

/// Thread-safe bundle cache honouring [`CacheLifetime`].
///
/// A single lock guards every entry and is held while a bundle loads, so
/// concurrent requests for a stale entry trigger a single reload. Loads for
/// unrelated keys are serialized behind the same lock.
///
/// ```
/// use bundlekit_common::testing::MemoryProvider;
/// use bundlekit_common::{BundleCache, Locale, ResolverConfig, ResourceResolver};
///
/// let provider = MemoryProvider::new().with_resource("message.properties", "k=v");
/// let resolver = ResourceResolver::new(&ResolverConfig::default(), provider)?;
/// let cache = BundleCache::new();
///
/// let first = cache.get_or_resolve(&resolver, "message", &Locale::root())?;
/// let second = cache.get_or_resolve(&resolver, "message", &Locale::root())?;
/// assert!(std::sync::Arc::ptr_eq(&first, &second));
/// # Ok::<(), bundlekit_common::ResolveError>(())
/// ```
#[derive(Debug, Default)]
pub struct BundleCache {
    entries: Mutex<HashMap<CacheKey, CachedBundle>>,
}

impl BundleCache {
    /// Empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached bundle for `base_name` in `locale`, resolving it on a miss or
    /// when the cached copy is stale.
    ///
    /// # Errors
    ///
    /// Propagates the resolver's error; a failed reload also evicts the stale
    /// entry.
    pub fn get_or_resolve<P: StreamProvider>(
        &self,
        resolver: &ResourceResolver<P>,
        base_name: &str,
        locale: &Locale,
    ) -> Result<Arc<ResolvedResource>> {
        self.get_or_resolve_at(resolver, base_name, locale, Instant::now())
    }

    /// As [`BundleCache::get_or_resolve`] with an explicit clock reading.
    ///
    /// # Errors
    ///
    /// As for [`BundleCache::get_or_resolve`].
    pub fn get_or_resolve_at<P: StreamProvider>(
        &self,
        resolver: &ResourceResolver<P>,
        base_name: &str,
        locale: &Locale,
        now: Instant,
    ) -> Result<Arc<ResolvedResource>> {
        let key = CacheKey {
            base_name: base_name.to_owned(),
            locale: locale.clone(),
        };
        let mut entries = self.lock();

        let stale = match entries.get(&key) {
            Some(cached) if !cached.lifetime.needs_reload(cached.loaded_at, now) => {
                debug!(target: "bundle::cache", "cache hit for `{base_name}` in `{locale}`");
                return Ok(Arc::clone(&cached.resource));
            }
            Some(_) => true,
            None => false,
        };

        let lifetime = resolver.cache_lifetime(base_name, locale);
        let result = if stale || !lifetime.is_cacheable() {
            debug!(
                target: "bundle::cache",
                "reloading `{base_name}` in `{locale}` (stale: {stale}, lifetime: {lifetime})",
            );
            resolver.resolve_fresh(base_name, locale)
        } else {
            resolver.resolve(base_name, locale)
        };

        match result {
            Ok(resource) => {
                let resource = Arc::new(resource);
                if lifetime.is_cacheable() {
                    entries.insert(
                        key,
                        CachedBundle {
                            resource: Arc::clone(&resource),
                            loaded_at: now,
                            lifetime,
                        },
                    );
                } else {
                    entries.remove(&key);
                }
                Ok(resource)
            }
            Err(error) => {
                entries.remove(&key);
                Err(error)
            }
        }
    }

    /// Whether a bundle is stored for `base_name` in `locale`, fresh or not.
    #[must_use]
    pub fn contains(&self, base_name: &str, locale: &Locale) -> bool {
        self.lock().contains_key(&CacheKey {
            base_name: base_name.to_owned(),
            locale: locale.clone(),
        })
    }

    /// Drop the entry for `base_name` in `locale`; returns whether one existed.
    #[must_use]
    pub fn invalidate(&self, base_name: &str, locale: &Locale) -> bool {
        self.lock()
            .remove(&CacheKey {
                base_name: base_name.to_owned(),
                locale: locale.clone(),
            })
            .is_some()
    }

    /// Number of stored bundles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, CachedBundle>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
