//! Catalog files: raw record shapes, parsing, and loading.
//!
//! A catalog file (TOML or JSON) optionally declares a `[schema]` vocabulary
//! and lists seat-offer records. Records arrive in one of four shapes, all of
//! which normalize to [`crate::model::SeatOffer`]:
//! - **nested**: `eligibility = [{ category, gender, min_rank, max_rank }, ...]`
//! - **flat**: one inline window (`category`, `gender`, `min_rank`,
//!   `max_rank` or `closing_rank`)
//! - **range**: `rank_range = [min, max]`
//! - **wide**: `cutoffs = { "OC BOYS" = 1200, "BC_A GIRLS" = 2800 }`, the
//!   column layout of the published cutoff spreadsheets
//!
//! ```toml
//! [[offers]]
//! name = "JNTU Hyderabad"
//! branch = "CSE"
//! phase = "Phase 1"
//! eligibility = [
//!   { category = "OC", gender = "Male", min_rank = 1, max_rank = 1200 },
//! ]
//! ```
//!
//! Entrypoints:
//! - Parse + normalize from a TOML string: [`load_catalog_str`]
//! - Parse + normalize from a JSON string: [`load_catalog_json`]
//! - Parse + normalize from a file path: [`load_catalog_path`]

use std::{fmt, path::Path};

use anyhow::Context;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, normalize::LoadPolicy, normalize::LoadReport};
use crate::vocab::VocabularyCfg;

/// A scalar cell as found in exported tables: integer, float, or text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawScalar {
    /// Integer cell.
    Int(i64),
    /// Float cell (spreadsheet exports often write `1500.0`).
    Float(f64),
    /// Text cell.
    Text(String),
}

impl RawScalar {
    /// True for text cells that are empty after trimming.
    pub fn is_blank(&self) -> bool {
        matches!(self, RawScalar::Text(s) if s.trim().is_empty())
    }

    /// The cell as an integer, if it is one.
    ///
    /// Integral floats (`1500.0`) and numeric text (`" 1500 "`, `"1500.0"`)
    /// convert; fractional or non-numeric values do not.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            RawScalar::Int(i) => Some(*i),
            RawScalar::Float(f) => float_to_integer(*f),
            RawScalar::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(float_to_integer))
            }
        }
    }
}

fn float_to_integer(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

impl fmt::Display for RawScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawScalar::Int(i) => write!(f, "{i}"),
            RawScalar::Float(x) => write!(f, "{x}"),
            RawScalar::Text(s) => f.write_str(s),
        }
    }
}

/// One window inside a nested record's `eligibility` list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawWindow {
    /// Reservation category.
    pub category: Option<String>,
    /// Gender.
    pub gender: Option<String>,
    /// Inclusive lower bound; defaults to 1.
    #[serde(alias = "minRank")]
    pub min_rank: Option<RawScalar>,
    /// Inclusive upper bound.
    #[serde(alias = "maxRank")]
    pub max_rank: Option<RawScalar>,
    /// Synonym for `max_rank`.
    #[serde(alias = "closingRank")]
    pub closing_rank: Option<RawScalar>,
}

/// A seat-offer record in any of the supported shapes.
///
/// Which shape a record is in is decided during normalization from the
/// fields present; combining fields of two shapes is an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawOffer {
    /// Opaque identifier, e.g. the institution code.
    #[serde(alias = "code", alias = "college_code", alias = "inst_code")]
    pub id: Option<RawScalar>,
    /// Institution name.
    #[serde(alias = "name", alias = "college_name", alias = "institution_name")]
    pub institution: Option<String>,
    /// Branch name.
    #[serde(alias = "branch_name")]
    pub branch: Option<String>,
    /// Counselling phase; absent applies to all phases.
    pub phase: Option<String>,
    /// Year; absent applies to all years.
    pub year: Option<RawScalar>,

    /// Nested shape.
    pub eligibility: Option<Vec<RawWindow>>,

    /// Flat shape: category of the single window.
    pub category: Option<String>,
    /// Flat shape: gender of the single window.
    pub gender: Option<String>,
    /// Flat shape: lower bound.
    #[serde(alias = "minRank")]
    pub min_rank: Option<RawScalar>,
    /// Flat shape: upper bound.
    #[serde(alias = "maxRank")]
    pub max_rank: Option<RawScalar>,
    /// Flat shape: synonym for `max_rank`.
    #[serde(alias = "closingRank")]
    pub closing_rank: Option<RawScalar>,

    /// Range shape: `[min, max]`.
    #[serde(alias = "rankRange")]
    pub rank_range: Option<Vec<RawScalar>>,

    /// Wide shape: `"<category> <gender>"` column → closing rank.
    pub cutoffs: Option<IndexMap<String, Option<RawScalar>>>,
}

/// Top-level catalog file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogFile {
    /// Declared vocabulary; the TS EAMCET default when absent.
    pub schema: Option<VocabularyCfg>,
    /// Records in curation order.
    #[serde(default, alias = "colleges")]
    pub offers: Vec<RawOffer>,
}

/// Parse and normalize a catalog from a TOML string.
///
/// Errors:
/// - TOML parse failures
/// - Normalization errors (see [`Catalog::load`])
pub fn load_catalog_str(toml_str: &str, policy: LoadPolicy) -> anyhow::Result<(Catalog, LoadReport)> {
    let file: CatalogFile = toml::from_str(toml_str).context("failed to parse catalog TOML")?;
    Catalog::load(file, policy).context("catalog normalization failed")
}

/// Parse and normalize a catalog from a JSON string.
///
/// Besides the [`CatalogFile`] object, a bare JSON array of records is
/// accepted and loaded with the default vocabulary.
pub fn load_catalog_json(json_str: &str, policy: LoadPolicy) -> anyhow::Result<(Catalog, LoadReport)> {
    let file = match serde_json::from_str::<CatalogFile>(json_str) {
        Ok(file) => file,
        Err(object_err) => {
            let offers: Vec<RawOffer> = serde_json::from_str(json_str)
                .map_err(|_| object_err)
                .context("failed to parse catalog JSON")?;
            CatalogFile {
                schema: None,
                offers,
            }
        }
    };
    Catalog::load(file, policy).context("catalog normalization failed")
}

/// Read a catalog file from disk, parse, and normalize it.
///
/// `.json` files are parsed as JSON; anything else as TOML.
pub fn load_catalog_path(
    path: impl AsRef<Path>,
    policy: LoadPolicy,
) -> anyhow::Result<(Catalog, LoadReport)> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read catalog file {}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let loaded = if is_json {
        load_catalog_json(&text, policy)
    } else {
        load_catalog_str(&text, policy)
    };
    loaded.with_context(|| format!("load catalog {}", path.display()))
}
