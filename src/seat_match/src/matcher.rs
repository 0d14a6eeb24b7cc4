//! The eligibility matcher.
//!
//! Matching is a pure filter over a [`Catalog`] snapshot:
//! 1. phase gate: the offer has no phase, or it equals the query's phase
//!    (skips the offer before any window is looked at);
//! 2. year gate, same rule;
//! 3. window filter: some window has the query's category and gender
//!    (compared only on participating axes) and admits the rank.
//!
//! Results keep catalog order and hold each matching offer once, paired with
//! the first window that admitted the query.

use std::sync::Arc;

use tracing::debug;

use crate::catalog::{Catalog, CatalogCell, snapshot};
use crate::error::MatchError;
use crate::model::{EligibilityWindow, SeatOffer};
use crate::query::{Query, RawQuery};
use crate::view::{MatchRequest, SeatOfferView, apply_order};

/// One eligible offer and the window that admitted the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'a> {
    /// The eligible offer.
    pub offer: &'a SeatOffer,
    /// First window of `offer` that admitted the query.
    pub window: &'a EligibilityWindow,
}

/// The first window of `offer` admitting `query`, ignoring phase and year.
pub fn admitting_window<'a>(query: &Query, offer: &'a SeatOffer) -> Option<&'a EligibilityWindow> {
    offer.windows().iter().find(|w| {
        w.category() == query.category() && w.gender() == query.gender() && w.admits(query.rank())
    })
}

/// Every offer in `catalog` the applicant is eligible for, in catalog order.
pub fn match_catalog<'c>(query: &Query, catalog: &'c Catalog) -> Vec<Match<'c>> {
    let matches: Vec<Match<'c>> = catalog
        .all()
        .iter()
        .filter(|offer| offer.applies_to_phase(query.phase()) && offer.applies_to_year(query.year()))
        .filter_map(|offer| admitting_window(query, offer).map(|window| Match { offer, window }))
        .collect();
    debug!(
        rank = query.rank().get(),
        scanned = catalog.len(),
        matched = matches.len(),
        "matched query"
    );
    matches
}

/// Validate `raw` against the catalog's vocabulary, then match.
pub fn match_request<'c>(raw: &RawQuery, catalog: &'c Catalog) -> Result<Vec<Match<'c>>, MatchError> {
    let query = Query::resolve(raw, catalog.vocabulary())?;
    Ok(match_catalog(&query, catalog))
}

/// Something that answers match requests.
///
/// [`LocalMatcher`] evaluates in-process; a remote scorer would be another
/// implementation behind the same trait.
pub trait SeatMatcher {
    /// Eligible offers for `request`, in the order the request asks for.
    fn find(&self, request: &MatchRequest) -> Result<Vec<SeatOfferView>, MatchError>;
}

/// In-process matcher over a [`CatalogCell`].
///
/// Each call evaluates against one snapshot, so a concurrent refresh never
/// splits a single request across two catalogs.
#[derive(Debug, Clone, Copy)]
pub struct LocalMatcher<'c> {
    cell: &'c CatalogCell,
}

impl<'c> LocalMatcher<'c> {
    /// Matcher reading from `cell`.
    pub fn new(cell: &'c CatalogCell) -> Self {
        Self { cell }
    }

    /// The catalog this matcher would evaluate against right now.
    pub fn catalog(&self) -> Arc<Catalog> {
        self.cell.snapshot()
    }
}

impl LocalMatcher<'static> {
    /// Matcher reading from the process-wide cell.
    pub fn global() -> Self {
        Self::new(snapshot::global())
    }
}

impl SeatMatcher for LocalMatcher<'_> {
    fn find(&self, request: &MatchRequest) -> Result<Vec<SeatOfferView>, MatchError> {
        let catalog = self.cell.snapshot();
        let mut views: Vec<SeatOfferView> = match_request(&request.query, &catalog)?
            .into_iter()
            .map(SeatOfferView::from)
            .collect();
        apply_order(&mut views, request.order);
        Ok(views)
    }
}
