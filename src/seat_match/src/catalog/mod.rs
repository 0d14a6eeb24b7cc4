//! Catalog subsystem.
//!
//! A [`Catalog`] is the validated, immutable collection of seat offers a
//! matcher runs against. It is built once from a [`config::CatalogFile`]
//! (see [`config`] for the file model and record shapes, [`normalize`] for the
//! validation rules) and replaced wholesale on refresh (see [`snapshot`]).

pub mod config;
pub mod normalize;
pub mod snapshot;

use tracing::info;

use crate::error::SchemaError;
use crate::model::SeatOffer;
use crate::vocab::Vocabulary;

use self::config::CatalogFile;
use self::normalize::{LoadPolicy, LoadReport, normalize_offers};

pub use snapshot::CatalogCell;

/// Validated seat offers plus the vocabulary they were validated against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    vocabulary: Vocabulary,
    offers: Vec<SeatOffer>,
}

impl Catalog {
    /// An empty catalog with the default vocabulary.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Normalize a parsed catalog file.
    ///
    /// Records keep their source order. Under [`LoadPolicy::Strict`] the
    /// first bad record fails the load; under [`LoadPolicy::Lenient`] bad
    /// records are skipped and counted in the returned [`LoadReport`].
    pub fn load(file: CatalogFile, policy: LoadPolicy) -> Result<(Self, LoadReport), SchemaError> {
        let vocabulary = match &file.schema {
            Some(cfg) => Vocabulary::from_cfg(cfg)?,
            None => Vocabulary::eamcet(),
        };
        let (offers, report) = normalize_offers(file.offers, &vocabulary, policy)?;
        info!(
            offers = report.offers_loaded,
            windows = report.windows_loaded,
            skipped = report.records_skipped,
            %policy,
            "catalog loaded"
        );
        Ok((Self { vocabulary, offers }, report))
    }

    /// Offers in load order.
    pub fn all(&self) -> &[SeatOffer] {
        &self.offers
    }

    /// The vocabulary queries against this catalog are validated with.
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Number of offers.
    pub fn len(&self) -> usize {
        self.offers.len()
    }

    /// True when the catalog holds no offers.
    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }
}
