//! Normalized PV generation profiles and their providers.
//!
//! A [`PvProfile`] is one typical year of AC output per MW-DC installed,
//! hourly in site-local time, aligned to the calendar-year start. Where the
//! profile comes from (a TMY service, a cached file, a test fixture) is the
//! provider's business; the dispatch engine only sees the validated samples.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use helios_core::{HeliosError, HeliosResult, Site, HOURS_PER_YEAR};
use tracing::debug;

/// One normalized year of hourly AC output per MW-DC installed.
///
/// Validated on construction: exactly 8 760 samples, all finite and ≥ 0.
/// Shared across the 20 simulated years of a run (and across runs at the
/// same site), so it is handed around as `Arc<PvProfile>`.
#[derive(Debug, Clone, PartialEq)]
pub struct PvProfile {
    values: Vec<f64>,
}

impl PvProfile {
    pub fn new(values: Vec<f64>) -> HeliosResult<Self> {
        if values.len() != HOURS_PER_YEAR {
            return Err(HeliosError::Weather(format!(
                "PV profile must have {} hourly samples, got {}",
                HOURS_PER_YEAR,
                values.len()
            )));
        }
        if let Some((hour, value)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(HeliosError::Weather(format!(
                "PV profile sample at hour {hour} is invalid: {value}"
            )));
        }
        Ok(Self { values })
    }

    /// A flat profile at the given per-MW-DC output level. Physically
    /// unrealistic; intended for tests and capacity bounding.
    pub fn flat(value: f64) -> Self {
        Self::new(vec![value; HOURS_PER_YEAR]).expect("flat profile is valid")
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Capacity factor of the normalized year (mean sample).
    pub fn capacity_factor(&self) -> f64 {
        self.values.iter().sum::<f64>() / HOURS_PER_YEAR as f64
    }
}

/// Provider of normalized PV profiles, keyed by site.
///
/// Implementations must be deterministic per `(lat, lon)`. Failures (site
/// over water, unreachable service, malformed fixture) surface as
/// [`HeliosError::Weather`] and end the run.
pub trait PvProfileSource: Send + Sync {
    fn normalized_profile(&self, site: &Site) -> HeliosResult<Arc<PvProfile>>;
}

/// Memoizing decorator around another provider.
///
/// Keys are the exact bit patterns of the coordinates (no rounding), so two
/// ensemble cases hit the cache only when their sites are identical, and the
/// result is the same profile instance either way. The cache uses a
/// read-mostly `RwLock`: lookups take the read lock, a miss fetches outside
/// any lock and inserts under the write lock.
pub struct MemoizedProfiles<S> {
    inner: S,
    cache: RwLock<HashMap<(u64, u64), Arc<PvProfile>>>,
}

impl<S: PvProfileSource> MemoizedProfiles<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cache: RwLock::new(HashMap::new()),
        }
    }

    fn key(site: &Site) -> (u64, u64) {
        (
            site.latitude_deg.to_bits(),
            site.longitude_deg.to_bits(),
        )
    }

    /// Number of distinct sites currently cached.
    pub fn cached_sites(&self) -> usize {
        self.cache.read().expect("profile cache poisoned").len()
    }
}

impl<S: PvProfileSource> PvProfileSource for MemoizedProfiles<S> {
    fn normalized_profile(&self, site: &Site) -> HeliosResult<Arc<PvProfile>> {
        let key = Self::key(site);
        if let Some(profile) = self.cache.read().expect("profile cache poisoned").get(&key) {
            return Ok(Arc::clone(profile));
        }

        debug!(%site, "profile cache miss, fetching");
        let profile = self.inner.normalized_profile(site)?;

        let mut cache = self.cache.write().expect("profile cache poisoned");
        // A racing fetch for the same site may have inserted first; keep the
        // existing entry so every caller sees one instance.
        let entry = cache.entry(key).or_insert_with(|| Arc::clone(&profile));
        Ok(Arc::clone(entry))
    }
}

/// Provider that returns the same profile for every site.
///
/// Stands in for the weather collaborator in tests and in CLI runs fed from
/// a profile file.
pub struct FixedProfile(Arc<PvProfile>);

impl FixedProfile {
    pub fn new(profile: PvProfile) -> Self {
        Self(Arc::new(profile))
    }
}

impl PvProfileSource for FixedProfile {
    fn normalized_profile(&self, _site: &Site) -> HeliosResult<Arc<PvProfile>> {
        Ok(Arc::clone(&self.0))
    }
}
