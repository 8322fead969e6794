//! Year-keyed persistence for curve sets, and the process-wide cache that
//! loads them on first use.
//!
//! Packages live at `<basis-dir>/co2_curves<year>.json`. A missing package
//! is not a fault: it is logged and reported as `None` so callers decide
//! whether to abort or skip.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use gci_core::{CurveSet, GciError, GciResult};
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use tracing::{debug, error, info};

pub const FILE_PREFIX: &str = "co2_curves";
pub const FILE_EXTENSION: &str = "json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurveStore {
    basis_dir: PathBuf,
}

impl CurveStore {
    pub fn new(basis_dir: impl Into<PathBuf>) -> Self {
        Self {
            basis_dir: basis_dir.into(),
        }
    }

    pub fn basis_dir(&self) -> &Path {
        &self.basis_dir
    }

    pub fn path_for(&self, year: u16) -> PathBuf {
        self.basis_dir
            .join(format!("{FILE_PREFIX}{year}.{FILE_EXTENSION}"))
    }

    /// Persist `set` under its basis year, replacing any earlier package.
    pub fn save(&self, set: &CurveSet) -> GciResult<PathBuf> {
        let path = self.path_for(set.basis_year);
        fs::create_dir_all(&self.basis_dir)?;
        let staged = path.with_extension(format!("{FILE_EXTENSION}.tmp"));
        let bytes = serde_json::to_vec_pretty(set)?;
        fs::write(&staged, bytes)?;
        fs::rename(&staged, &path)?;
        info!(year = set.basis_year, path = %path.display(), "CO2 curves written");
        Ok(path)
    }

    /// Load the package for `year`; `Ok(None)` when it does not exist.
    pub fn load(&self, year: u16) -> GciResult<Option<CurveSet>> {
        let path = self.path_for(year);
        let bytes = match fs::read(&path) {
            Ok(bytes) if !bytes.is_empty() => bytes,
            Ok(_) => return Ok(not_found(year, path)),
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(not_found(year, path)),
            Err(e) => return Err(e.into()),
        };
        let set: CurveSet = serde_json::from_slice(&bytes)?;
        if set.basis_year != year {
            return Err(GciError::DataFormat(format!(
                "{} holds curves for {}, expected {year}",
                path.display(),
                set.basis_year
            )));
        }
        debug!(year, path = %path.display(), "CO2 curves loaded");
        Ok(Some(set))
    }
}

fn not_found(year: u16, path: PathBuf) -> Option<CurveSet> {
    let err = GciError::NotFound { year, path };
    error!("{err}");
    None
}

static GLOBAL: OnceCell<CurveCache> = OnceCell::new();

/// Read-mostly cache of curve sets keyed by basis year.
///
/// Entries are loaded on first request and only replaced by [`reload`] or
/// [`store`]. Writes hold the write lock across persist and insert, so two
/// writers never interleave.
///
/// [`reload`]: CurveCache::reload
/// [`store`]: CurveCache::store
#[derive(Debug)]
pub struct CurveCache {
    store: CurveStore,
    entries: RwLock<HashMap<u16, Arc<CurveSet>>>,
}

impl CurveCache {
    pub fn new(store: CurveStore) -> Self {
        Self {
            store,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Install the process-wide cache. Installing again with the same
    /// basis directory returns the existing instance.
    pub fn install(store: CurveStore) -> GciResult<&'static CurveCache> {
        let cache = GLOBAL.get_or_init(|| CurveCache::new(store.clone()));
        if cache.store != store {
            return Err(GciError::Config(format!(
                "curve cache already installed for {}",
                cache.store.basis_dir.display()
            )));
        }
        Ok(cache)
    }

    pub fn curve_store(&self) -> &CurveStore {
        &self.store
    }

    pub fn get(&self, year: u16) -> GciResult<Option<Arc<CurveSet>>> {
        {
            let entries = self.entries.read();
            if let Some(set) = entries.get(&year) {
                return Ok(Some(Arc::clone(set)));
            }
        }
        let mut entries = self.entries.write();
        if let Some(set) = entries.get(&year) {
            return Ok(Some(Arc::clone(set)));
        }
        Ok(self.store.load(year)?.map(|set| {
            let set = Arc::new(set);
            entries.insert(year, Arc::clone(&set));
            set
        }))
    }

    /// Drop any cached entry for `year` and read it from disk again.
    pub fn reload(&self, year: u16) -> GciResult<Option<Arc<CurveSet>>> {
        let mut entries = self.entries.write();
        entries.remove(&year);
        Ok(self.store.load(year)?.map(|set| {
            let set = Arc::new(set);
            entries.insert(year, Arc::clone(&set));
            set
        }))
    }

    /// Persist `set` and make it the cached entry for its year.
    pub fn store(&self, set: CurveSet) -> GciResult<Arc<CurveSet>> {
        let mut entries = self.entries.write();
        self.store.save(&set)?;
        let set = Arc::new(set);
        entries.insert(set.basis_year, Arc::clone(&set));
        Ok(set)
    }

    pub fn cached_years(&self) -> Vec<u16> {
        let mut years: Vec<u16> = self.entries.read().keys().copied().collect();
        years.sort_unstable();
        years
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gci_core::{CurvePoint, FuelCategory, FuelCategoryCurve};
    use tempfile::tempdir;

    fn sample_set(year: u16) -> CurveSet {
        let mut set = CurveSet::new(year);
        set.insert(
            FuelCategory::NaturalGas,
            FuelCategoryCurve::from_points(vec![
                CurvePoint::new(100.0 * 80.0 / 150.0, 400.0),
                CurvePoint::new(80.0, 1400.0 / 3.0),
            ])
            .unwrap(),
        );
        set.insert(
            FuelCategory::OtherFossilFuels,
            FuelCategoryCurve::from_points(vec![
                CurvePoint::new(0.1, 0.1),
                CurvePoint::new(0.30000000000000004, 812.123456789),
            ])
            .unwrap(),
        );
        set.insert(FuelCategory::Wind, FuelCategoryCurve::empty());
        set
    }

    #[test]
    fn path_is_templated_by_year() {
        let store = CurveStore::new("/data/basis");
        assert_eq!(
            store.path_for(2019),
            PathBuf::from("/data/basis/co2_curves2019.json")
        );
    }

    #[test]
    fn save_then_load_is_exact() {
        let dir = tempdir().unwrap();
        let store = CurveStore::new(dir.path());
        let set = sample_set(2019);
        let path = store.save(&set).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
        assert_eq!(store.load(2019).unwrap(), Some(set));
    }

    #[test]
    fn missing_year_is_absent() {
        let dir = tempdir().unwrap();
        let store = CurveStore::new(dir.path());
        assert_eq!(store.load(1999).unwrap(), None);
    }

    #[test]
    fn empty_package_is_absent() {
        let dir = tempdir().unwrap();
        let store = CurveStore::new(dir.path());
        fs::write(store.path_for(2020), b"").unwrap();
        assert_eq!(store.load(2020).unwrap(), None);
    }

    #[test]
    fn corrupt_package_is_an_error() {
        let dir = tempdir().unwrap();
        let store = CurveStore::new(dir.path());
        fs::write(store.path_for(2021), b"{not json").unwrap();
        assert!(matches!(store.load(2021), Err(GciError::Parse(_))));
    }

    #[test]
    fn mismatched_year_is_rejected() {
        let dir = tempdir().unwrap();
        let store = CurveStore::new(dir.path());
        let path = store.save(&sample_set(2019)).unwrap();
        fs::copy(&path, store.path_for(2018)).unwrap();
        assert!(matches!(store.load(2018), Err(GciError::DataFormat(_))));
    }

    #[test]
    fn cache_loads_once_until_reload() {
        let dir = tempdir().unwrap();
        let store = CurveStore::new(dir.path());
        store.save(&sample_set(2019)).unwrap();
        let cache = CurveCache::new(store.clone());

        let first = cache.get(2019).unwrap().unwrap();
        assert_eq!(cache.cached_years(), vec![2019]);

        // Changes on disk stay invisible until an explicit reload.
        let mut changed = sample_set(2019);
        changed.insert(FuelCategory::Hydro, FuelCategoryCurve::empty());
        store.save(&changed).unwrap();
        let again = cache.get(2019).unwrap().unwrap();
        assert!(Arc::ptr_eq(&first, &again));

        let reloaded = cache.reload(2019).unwrap().unwrap();
        assert_eq!(*reloaded, changed);
    }

    #[test]
    fn cache_miss_is_not_remembered() {
        let dir = tempdir().unwrap();
        let cache = CurveCache::new(CurveStore::new(dir.path()));
        assert_eq!(cache.curve_store().basis_dir(), dir.path());
        assert!(cache.get(2019).unwrap().is_none());
        assert!(cache.cached_years().is_empty());

        cache.store(sample_set(2019)).unwrap();
        assert!(cache.get(2019).unwrap().is_some());
        assert!(dir.path().join("co2_curves2019.json").exists());
    }
}
