//! Persisted local state
//!
//! A string key/value map kept in `<state_dir>/storage.json`. Every change is
//! written through immediately. Clones share the same map, so the auth store,
//! the API client and the UI preferences all see one consistent view.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use sentinel_core::{ConsoleError, ConsoleResult, UiVariant};

/// Keys used in the store
pub mod keys {
    pub const TOKEN: &str = "token";
    pub const USER: &str = "user";
    pub const REFRESH_TOKEN: &str = "refresh_token";
    pub const UI_VARIANT: &str = "ui_variant";
    pub const SIDEBAR_COLLAPSED: &str = "sidebar_collapsed";
}

#[derive(Debug, Default)]
struct StoreInner {
    path: Option<PathBuf>,
    values: BTreeMap<String, String>,
}

/// Shared, write-through key/value store
#[derive(Debug, Clone, Default)]
pub struct LocalStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl LocalStore {
    /// Open (or start) the store at `path`
    ///
    /// A missing file starts empty. A corrupt file is logged and replaced on
    /// the next write.
    pub fn open(path: impl Into<PathBuf>) -> ConsoleResult<Self> {
        let path = path.into();
        let values = if path.exists() {
            let text = std::fs::read_to_string(&path).map_err(|e| ConsoleError::StoreRead {
                path: path.clone(),
                message: e.to_string(),
            })?;
            match serde_json::from_str(&text) {
                Ok(values) => values,
                Err(e) => {
                    tracing::warn!("Ignoring unreadable store {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };

        tracing::debug!("Opened local store at {}", path.display());
        Ok(Self {
            inner: Arc::new(Mutex::new(StoreInner {
                path: Some(path),
                values,
            })),
        })
    }

    /// A store that never touches the disk
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Backing file, if any
    pub fn path(&self) -> Option<PathBuf> {
        self.lock().path.clone()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.lock().values.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().values.contains_key(key)
    }

    pub fn set(&self, key: &str, value: impl Into<String>) -> ConsoleResult<()> {
        let mut inner = self.lock();
        inner.values.insert(key.to_string(), value.into());
        Self::flush(&inner)
    }

    /// Set and remove several keys with a single write
    ///
    /// All or nothing: when the write fails the map is left as it was.
    pub fn update(&self, set: &[(&str, String)], remove: &[&str]) -> ConsoleResult<()> {
        let mut inner = self.lock();
        let before = inner.values.clone();
        for (key, value) in set {
            inner.values.insert(key.to_string(), value.clone());
        }
        for key in remove {
            inner.values.remove(*key);
        }
        if let Err(err) = Self::flush(&inner) {
            inner.values = before;
            return Err(err);
        }
        Ok(())
    }

    /// Remove several keys with a single write
    pub fn remove_all(&self, keys: &[&str]) -> ConsoleResult<()> {
        let mut inner = self.lock();
        let before = inner.values.len();
        for key in keys {
            inner.values.remove(*key);
        }
        if inner.values.len() != before {
            Self::flush(&inner)?;
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        // Poisoning is ignored: every write replaces whole values
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn flush(inner: &StoreInner) -> ConsoleResult<()> {
        let Some(path) = &inner.path else {
            return Ok(());
        };
        write_json(path, &inner.values)
    }
}

fn write_json(path: &Path, values: &BTreeMap<String, String>) -> ConsoleResult<()> {
    let store_err = |e: &dyn std::fmt::Display| ConsoleError::StoreWrite {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| store_err(&e))?;
    }
    let text = serde_json::to_string_pretty(values)?;
    std::fs::write(path, text).map_err(|e| store_err(&e))
}

// ============================================================================
// Preferences
// ============================================================================

/// UI preferences kept across sign-ins
#[derive(Debug, Clone)]
pub struct Preferences {
    store: LocalStore,
}

impl Preferences {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    /// Persisted variant, else `fallback`
    pub fn ui_variant(&self, fallback: UiVariant) -> UiVariant {
        self.store
            .get(keys::UI_VARIANT)
            .and_then(|v| v.parse().ok())
            .unwrap_or(fallback)
    }

    pub fn set_ui_variant(&self, variant: UiVariant) -> ConsoleResult<()> {
        self.store.set(keys::UI_VARIANT, variant.as_str())
    }

    pub fn sidebar_collapsed(&self) -> bool {
        self.store.get(keys::SIDEBAR_COLLAPSED).as_deref() == Some("true")
    }

    pub fn set_sidebar_collapsed(&self, collapsed: bool) -> ConsoleResult<()> {
        self.store
            .set(keys::SIDEBAR_COLLAPSED, if collapsed { "true" } else { "false" })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_in_memory_roundtrip() {
        let store = LocalStore::in_memory();
        assert_eq!(store.get("a"), None);
        store.set("a", "1").unwrap();
        assert!(store.contains("a"));
        store.remove_all(&["a"]).unwrap();
        assert!(!store.contains("a"));
        assert_eq!(store.path(), None);
    }

    #[test]
    fn test_clones_share_state() {
        let store = LocalStore::in_memory();
        let other = store.clone();
        store.set(keys::TOKEN, "t").unwrap();
        assert_eq!(other.get(keys::TOKEN).as_deref(), Some("t"));
    }

    #[test]
    fn test_write_through_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let store = LocalStore::open(&path).unwrap();
        store.set(keys::UI_VARIANT, "bootstrap").unwrap();
        store.set(keys::TOKEN, "abc").unwrap();
        assert!(path.exists());

        let reopened = LocalStore::open(&path).unwrap();
        assert_eq!(reopened.get(keys::UI_VARIANT).as_deref(), Some("bootstrap"));
        assert_eq!(reopened.get(keys::TOKEN).as_deref(), Some("abc"));
    }

    #[test]
    fn test_remove_all_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let store = LocalStore::open(&path).unwrap();
        store.set(keys::TOKEN, "abc").unwrap();
        store.set(keys::USER, "{}").unwrap();
        store.set(keys::UI_VARIANT, "material").unwrap();
        store.remove_all(&[keys::TOKEN, keys::USER]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(!text.contains("abc"));
        assert!(text.contains("material"));
    }

    #[test]
    fn test_update_writes_once_and_rolls_back_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("storage.json");
        let store = LocalStore::open(&path).unwrap();
        store.set(keys::REFRESH_TOKEN, "r").unwrap();

        let set = [(keys::TOKEN, "t".to_string()), (keys::USER, "{}".to_string())];
        store.update(&set, &[keys::REFRESH_TOKEN]).unwrap();
        let reopened = LocalStore::open(&path).unwrap();
        assert_eq!(reopened.get(keys::TOKEN).as_deref(), Some("t"));
        assert_eq!(reopened.get(keys::REFRESH_TOKEN), None);

        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path.parent().unwrap(), "").unwrap();
        assert!(store.update(&[(keys::TOKEN, "t2".to_string())], &[keys::USER]).is_err());
        assert_eq!(store.get(keys::TOKEN).as_deref(), Some("t"));
        assert_eq!(store.get(keys::USER).as_deref(), Some("{}"));
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = LocalStore::open(&path).unwrap();
        assert_eq!(store.get(keys::TOKEN), None);
        store.set(keys::TOKEN, "x").unwrap();
        assert_eq!(
            LocalStore::open(&path).unwrap().get(keys::TOKEN).as_deref(),
            Some("x")
        );
    }

    #[test]
    fn test_preferences() {
        let prefs = Preferences::new(LocalStore::in_memory());
        assert_eq!(prefs.ui_variant(UiVariant::Material), UiVariant::Material);
        prefs.set_ui_variant(UiVariant::Bootstrap).unwrap();
        assert_eq!(prefs.ui_variant(UiVariant::Material), UiVariant::Bootstrap);

        assert!(!prefs.sidebar_collapsed());
        prefs.set_sidebar_collapsed(true).unwrap();
        assert!(prefs.sidebar_collapsed());
    }
}
