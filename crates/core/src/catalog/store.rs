use std::sync::{Arc, RwLock};

use crate::errors::CatalogError;

use super::{Catalog, CatalogPaths};

/// Process-lifetime cache around [`Catalog::load`].
///
/// First access populates the slot under a write lock with a double check,
/// so concurrent first calls load the documents at most once. `reload` is
/// the operator hook; readers holding an `Arc` from before the reload keep
/// a consistent snapshot.
pub struct CatalogStore {
    paths: CatalogPaths,
    slot: RwLock<Option<Arc<Catalog>>>,
}

impl CatalogStore {
    pub fn new(paths: CatalogPaths) -> Self {
        Self { paths, slot: RwLock::new(None) }
    }

    pub fn paths(&self) -> &CatalogPaths {
        &self.paths
    }

    pub fn get(&self) -> Result<Arc<Catalog>, CatalogError> {
        if let Ok(guard) = self.slot.read() {
            if let Some(catalog) = guard.as_ref() {
                return Ok(Arc::clone(catalog));
            }
        }

        let mut guard = match self.slot.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(catalog) = guard.as_ref() {
            return Ok(Arc::clone(catalog));
        }

        let catalog = Arc::new(Catalog::load(&self.paths)?);
        *guard = Some(Arc::clone(&catalog));
        tracing::info!(
            span_entries = catalog.span_entry_count(),
            panel_prices = catalog.panel_price_count(),
            accessory_prices = catalog.accessory_price_count(),
            "reference catalog loaded"
        );
        Ok(catalog)
    }

    pub fn reload(&self) -> Result<Arc<Catalog>, CatalogError> {
        let catalog = Arc::new(Catalog::load(&self.paths)?);
        let mut guard = match self.slot.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Some(Arc::clone(&catalog));
        tracing::info!("reference catalog reloaded");
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;

    use tempfile::TempDir;

    use super::super::{CatalogPaths, FIXTURE_DEFAULTS, FIXTURE_PRICE_TABLE, FIXTURE_SPAN_TABLE};
    use super::CatalogStore;

    fn store_with_fixture_files(dir: &TempDir) -> CatalogStore {
        let paths = CatalogPaths {
            span_table: dir.path().join("span_table.toml"),
            price_table: dir.path().join("price_table.toml"),
            defaults: dir.path().join("defaults.toml"),
        };
        fs::write(&paths.span_table, FIXTURE_SPAN_TABLE).expect("write span table");
        fs::write(&paths.price_table, FIXTURE_PRICE_TABLE).expect("write price table");
        fs::write(&paths.defaults, FIXTURE_DEFAULTS).expect("write defaults");
        CatalogStore::new(paths)
    }

    #[test]
    fn get_memoizes_the_first_load() {
        let dir = TempDir::new().expect("temp dir");
        let store = store_with_fixture_files(&dir);

        let first = store.get().expect("first load");
        let second = store.get().expect("memoized load");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn reload_replaces_the_snapshot() {
        let dir = TempDir::new().expect("temp dir");
        let store = store_with_fixture_files(&dir);

        let before = store.get().expect("first load");
        let after = store.reload().expect("reload");
        assert!(!Arc::ptr_eq(&before, &after));
        assert!(Arc::ptr_eq(&after, &store.get().expect("post-reload get")));
    }

    #[test]
    fn concurrent_first_access_loads_once_per_snapshot() {
        let dir = TempDir::new().expect("temp dir");
        let store = Arc::new(store_with_fixture_files(&dir));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.get().expect("concurrent load"))
            })
            .collect();

        let snapshots: Vec<_> =
            handles.into_iter().map(|handle| handle.join().expect("thread join")).collect();
        for snapshot in &snapshots[1..] {
            assert!(Arc::ptr_eq(&snapshots[0], snapshot));
        }
    }
}
