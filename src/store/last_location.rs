//! Persistence of the most recently resolved location
//!
//! The record is four string entries (raw input, latitude, longitude and the
//! display label) written together after a place is chosen. Every failure is
//! logged and swallowed: the app works the same without persistence.

use super::{KeyValueStore, StoreError};
use crate::data::ResolvedLocation;

const KEY_RAW: &str = "last_raw";
const KEY_LAT: &str = "last_lat";
const KEY_LON: &str = "last_lon";
const KEY_DISPLAY: &str = "last_display";

/// What was found in the store at startup
#[derive(Debug, Clone, PartialEq)]
pub enum StoredLocation {
    /// A complete record with usable coordinates
    Resolved(ResolvedLocation),
    /// Only the raw search text survived; it must be resolved again
    RawOnly(String),
    /// Nothing stored, or the store is unavailable
    Empty,
}

/// Reads and writes the last-location record
#[derive(Debug, Clone)]
pub struct LastLocationStore {
    /// `None` when no data directory could be determined
    store: Option<KeyValueStore>,
}

impl LastLocationStore {
    /// Creates a store backed by the default data directory
    pub fn new() -> Self {
        let store = KeyValueStore::new();
        if store.is_none() {
            tracing::warn!("no data directory, last location will not be remembered");
        }
        Self { store }
    }

    /// Creates a store backed by `store`, or a no-op store for `None`
    pub fn with_store(store: Option<KeyValueStore>) -> Self {
        Self { store }
    }

    /// A store that never persists anything
    pub fn disabled() -> Self {
        Self { store: None }
    }

    /// Records the raw search text ahead of resolution
    pub fn save_raw(&self, raw: &str) {
        self.swallow("save raw", |store| store.set_many(&[(KEY_RAW, raw)]));
    }

    /// Overwrites the record with `resolved`
    pub fn save(&self, resolved: &ResolvedLocation) {
        let lat = resolved.latitude.to_string();
        let lon = resolved.longitude.to_string();
        self.swallow("save", |store| {
            store.set_many(&[
                (KEY_RAW, resolved.raw.as_str()),
                (KEY_LAT, lat.as_str()),
                (KEY_LON, lon.as_str()),
                (KEY_DISPLAY, resolved.display.as_str()),
            ])
        });
        tracing::info!(display = %resolved.display, "saved last location");
    }

    /// Loads the record
    ///
    /// Coordinates that are missing or not finite numbers degrade the
    /// result to `RawOnly` (if raw text exists) or `Empty`.
    pub fn load(&self) -> StoredLocation {
        let Some(store) = &self.store else {
            return StoredLocation::Empty;
        };
        let entries = match store.read_all() {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, "last location could not be read");
                return StoredLocation::Empty;
            }
        };

        let coordinate = |key: &str| {
            entries
                .get(key)
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite())
        };
        let raw = entries.get(KEY_RAW).filter(|r| !r.is_empty()).cloned();

        match (coordinate(KEY_LAT), coordinate(KEY_LON)) {
            (Some(latitude), Some(longitude)) => StoredLocation::Resolved(ResolvedLocation {
                raw: raw.unwrap_or_default(),
                latitude,
                longitude,
                display: entries.get(KEY_DISPLAY).cloned().unwrap_or_default(),
            }),
            _ => match raw {
                Some(raw) => StoredLocation::RawOnly(raw),
                None => StoredLocation::Empty,
            },
        }
    }

    /// Deletes the record
    pub fn clear(&self) {
        self.swallow("clear", |store| {
            store.remove_many(&[KEY_RAW, KEY_LAT, KEY_LON, KEY_DISPLAY])
        });
    }

    /// Runs a store operation, logging instead of propagating failures
    fn swallow(&self, op: &str, f: impl FnOnce(&KeyValueStore) -> Result<(), StoreError>) {
        let Some(store) = &self.store else {
            tracing::debug!(op, "storage unavailable, skipping");
            return;
        };
        if let Err(e) = f(store) {
            tracing::warn!(op, error = %e, "storage unavailable");
        }
    }
}

impl Default for LastLocationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_store() -> (LastLocationStore, KeyValueStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let kv = KeyValueStore::with_dir(temp_dir.path().to_path_buf());
        (LastLocationStore::with_store(Some(kv.clone())), kv, temp_dir)
    }

    fn austin() -> ResolvedLocation {
        ResolvedLocation {
            raw: "Austin, TX".to_string(),
            latitude: 30.26715,
            longitude: -97.74306,
            display: "Austin, TX".to_string(),
        }
    }

    #[test]
    fn test_load_empty_store() {
        let (store, _kv, _dir) = create_test_store();
        assert_eq!(store.load(), StoredLocation::Empty);
    }

    #[test]
    fn test_save_then_load_returns_resolved() {
        let (store, _kv, _dir) = create_test_store();
        store.save(&austin());
        assert_eq!(store.load(), StoredLocation::Resolved(austin()));
    }

    #[test]
    fn test_resave_of_loaded_record_is_byte_identical() {
        let (store, kv, _dir) = create_test_store();
        store.save(&austin());
        let before = fs::read(kv.path()).expect("read store");

        let StoredLocation::Resolved(loaded) = store.load() else {
            panic!("expected a resolved location");
        };
        store.save(&loaded);
        let after = fs::read(kv.path()).expect("read store");

        assert_eq!(before, after);
    }

    #[test]
    fn test_raw_only_when_coordinates_missing() {
        let (store, _kv, _dir) = create_test_store();
        store.save_raw("Boise");
        assert_eq!(store.load(), StoredLocation::RawOnly("Boise".to_string()));
    }

    #[test]
    fn test_raw_only_when_coordinates_not_numeric() {
        let (store, kv, _dir) = create_test_store();
        kv.set_many(&[(KEY_RAW, "Boise"), (KEY_LAT, "north"), (KEY_LON, "-116.2")])
            .expect("write");
        assert_eq!(store.load(), StoredLocation::RawOnly("Boise".to_string()));
    }

    #[test]
    fn test_non_finite_coordinates_are_rejected() {
        let (store, kv, _dir) = create_test_store();
        kv.set_many(&[(KEY_LAT, "NaN"), (KEY_LON, "inf")]).expect("write");
        assert_eq!(store.load(), StoredLocation::Empty);
    }

    #[test]
    fn test_coordinates_without_display_still_resolve() {
        let (store, kv, _dir) = create_test_store();
        kv.set_many(&[(KEY_LAT, "43.6"), (KEY_LON, "-116.2")]).expect("write");
        match store.load() {
            StoredLocation::Resolved(loc) => {
                assert_eq!(loc.display, "");
                assert_eq!(loc.raw, "");
            }
            other => panic!("expected resolved, got {:?}", other),
        }
    }

    #[test]
    fn test_save_raw_keeps_previous_coordinates() {
        let (store, _kv, _dir) = create_test_store();
        store.save(&austin());
        store.save_raw("Boise");
        match store.load() {
            StoredLocation::Resolved(loc) => {
                assert_eq!(loc.raw, "Boise");
                assert_eq!(loc.display, "Austin, TX");
            }
            other => panic!("expected resolved, got {:?}", other),
        }
    }

    #[test]
    fn test_save_overwrites_previous_record() {
        let (store, _kv, _dir) = create_test_store();
        store.save(&austin());
        let boise = ResolvedLocation {
            raw: "Boise ID".to_string(),
            latitude: 43.6135,
            longitude: -116.20345,
            display: "Boise, ID".to_string(),
        };
        store.save(&boise);
        assert_eq!(store.load(), StoredLocation::Resolved(boise));
    }

    #[test]
    fn test_clear_removes_record() {
        let (store, kv, _dir) = create_test_store();
        store.save(&austin());
        store.clear();
        assert_eq!(store.load(), StoredLocation::Empty);
        assert!(!kv.path().exists());
    }

    #[test]
    fn test_unreadable_store_degrades_to_empty() {
        let (store, kv, _dir) = create_test_store();
        fs::write(kv.path(), "{ not json").expect("write garbage");
        assert_eq!(store.load(), StoredLocation::Empty);
    }

    #[test]
    fn test_unwritable_directory_is_swallowed() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        // A regular file where the directory should be makes every write fail
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "x").expect("write blocker");
        let store = LastLocationStore::with_store(Some(KeyValueStore::with_dir(blocker)));

        store.save(&austin());
        store.save_raw("Austin");
        store.clear();
        assert_eq!(store.load(), StoredLocation::Empty);
    }

    #[test]
    fn test_disabled_store_is_a_no_op() {
        let store = LastLocationStore::disabled();
        store.save(&austin());
        assert_eq!(store.load(), StoredLocation::Empty);
    }
}
