//! Atomically swappable catalog snapshots.
//!
//! Readers call [`CatalogCell::snapshot`], which loads an `Arc<Catalog>` with
//! no lock contention. Refreshes build a complete new [`Catalog`] off to the
//! side and swap it in with [`CatalogCell::install`]; in-flight readers keep
//! the snapshot they already hold, so nobody ever observes a partially
//! updated catalog.
//!
//! Implementation notes:
//! - Readers and refreshes never block each other; a swap replaces one
//!   `Arc` pointer.
//! - A process-wide cell is available through [`global`]; it starts out as an
//!   empty catalog, so every query returns zero matches until a catalog is
//!   installed.

use std::{path::Path, sync::Arc};

use arc_swap::ArcSwap;
use once_cell::sync::Lazy;
use tracing::info;

use crate::catalog::{
    Catalog,
    config::load_catalog_path,
    normalize::{LoadPolicy, LoadReport},
};

/// Holder of the current catalog snapshot.
#[derive(Debug)]
pub struct CatalogCell {
    current: ArcSwap<Catalog>,
}

impl CatalogCell {
    /// A cell holding `catalog`.
    pub fn new(catalog: Catalog) -> Self {
        Self {
            current: ArcSwap::from_pointee(catalog),
        }
    }

    /// The current snapshot. Holding it pins that version of the catalog.
    pub fn snapshot(&self) -> Arc<Catalog> {
        self.current.load_full()
    }

    /// Atomically replace the catalog, returning the previous snapshot.
    pub fn install(&self, catalog: Catalog) -> Arc<Catalog> {
        self.current.swap(Arc::new(catalog))
    }

    /// Reload from a file and install the result.
    ///
    /// On any load error the current snapshot stays in place.
    pub fn refresh_from_path(&self, path: impl AsRef<Path>, policy: LoadPolicy) -> anyhow::Result<LoadReport> {
        let (catalog, report) = load_catalog_path(path.as_ref(), policy)?;
        self.install(catalog);
        info!(path = %path.as_ref().display(), offers = report.offers_loaded, "catalog installed");
        Ok(report)
    }

    /// Replace the catalog with an empty one. Useful for tests.
    pub fn clear(&self) {
        self.install(Catalog::empty());
    }
}

impl Default for CatalogCell {
    fn default() -> Self {
        Self::new(Catalog::empty())
    }
}

static GLOBAL: Lazy<CatalogCell> = Lazy::new(CatalogCell::default);

/// The process-wide catalog cell.
pub fn global() -> &'static CatalogCell {
    &GLOBAL
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::config::load_catalog_str;

    const ONE_OFFER: &str = r#"
        [[offers]]
        name = "CBIT"
        branch = "IT"
        category = "SC"
        gender = "Male"
        max_rank = 9500
    "#;

    #[test]
    fn readers_keep_their_snapshot_across_install() {
        let cell = CatalogCell::default();
        let before = cell.snapshot();
        assert!(before.is_empty());

        let (cat, _) = load_catalog_str(ONE_OFFER, LoadPolicy::Strict).unwrap();
        let previous = cell.install(cat);

        assert!(previous.is_empty());
        assert!(before.is_empty(), "old snapshot must not change");
        assert_eq!(cell.snapshot().len(), 1);

        cell.clear();
        assert!(cell.snapshot().is_empty());
    }

    #[test]
    fn failed_refresh_keeps_current_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.toml");
        let bad = dir.path().join("bad.toml");
        std::fs::write(&good, ONE_OFFER).unwrap();
        std::fs::write(&bad, ONE_OFFER.replace("9500", "\"closed\"")).unwrap();

        let cell = CatalogCell::default();
        cell.refresh_from_path(&good, LoadPolicy::Strict).unwrap();
        assert!(cell.refresh_from_path(&bad, LoadPolicy::Strict).is_err());
        assert_eq!(cell.snapshot().len(), 1);
    }
}
