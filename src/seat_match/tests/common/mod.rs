#![allow(dead_code)]

use std::path::{Path, PathBuf};

use seat_match::{Catalog, LoadPolicy, RawQuery, catalog::config::load_catalog_str, match_request};
use tempfile::TempDir;

/// Four offers from the 2024 Phase 1 / Phase 2 / Final Phase cutoff sheets.
pub const FOUR_OFFERS_TOML: &str = r#"
[[offers]]
name = "JNTU Hyderabad"
branch = "CSE"
phase = "Phase 1"
cutoffs = { "OC BOYS" = 1200, "OC GIRLS" = 1500, "BC_A BOYS" = 2500, "BC_A GIRLS" = 2800 }

[[offers]]
name = "OU College of Engineering"
branch = "ECE"
phase = "Phase 1"
eligibility = [
  { category = "BC-B", gender = "Male", min_rank = 1000, max_rank = 4000 },
  { category = "BC-B", gender = "Female", min_rank = 1000, max_rank = 4500 },
]

[[offers]]
name = "CBIT"
branch = "IT"
phase = "Phase 2"
eligibility = [
  { category = "SC", gender = "Female", min_rank = 3000, max_rank = 9000 },
  { category = "SC", gender = "Male", min_rank = 3200, max_rank = 9500 },
]

[[offers]]
name = "Vasavi College"
branch = "CSE"
phase = "Final Phase"
eligibility = [
  { category = "OC", gender = "Male", max_rank = 2000 },
  { category = "OC", gender = "Female", max_rank = 2200 },
]
"#;

pub fn four_offers() -> Catalog {
    load_catalog_str(FOUR_OFFERS_TOML, LoadPolicy::Strict)
        .expect("fixture loads")
        .0
}

/// Institution names matched by `query`, in result order.
pub fn names(query: &RawQuery, catalog: &Catalog) -> Vec<String> {
    match_request(query, catalog)
        .expect("valid query")
        .into_iter()
        .map(|m| m.offer.institution().to_string())
        .collect()
}

pub struct CatalogFiles {
    dir: TempDir, // keep alive for the life of the test
}

impl CatalogFiles {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("tempdir"),
        }
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Write `contents` to `<tmpdir>/<name>` and return the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).expect("write catalog");
        path
    }
}
