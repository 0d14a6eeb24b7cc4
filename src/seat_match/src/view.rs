//! Boundary types: what goes in and out of the matcher at the edge.
//!
//! ```json
//! { "rank": 1300, "category": "OC", "gender": "Female", "phase": "Phase 1" }
//! { "matches": [ { "institution": "JNTU Hyderabad", "branch": "CSE", ... } ] }
//! { "error": "category is required" }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::MatchError;
use crate::matcher::Match;
use crate::model::Year;
use crate::query::RawQuery;

/// Presentation order of results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultOrder {
    /// Catalog order, as the matcher returns it.
    #[default]
    Catalog,
    /// Ascending closing rank; ties keep catalog order.
    ClosingRank,
}

/// A match request as received at the boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchRequest {
    /// The query fields.
    #[serde(flatten)]
    pub query: RawQuery,
    /// Presentation order.
    #[serde(default)]
    pub order: ResultOrder,
}

impl MatchRequest {
    /// A request in catalog order.
    pub fn new(query: RawQuery) -> Self {
        Self {
            query,
            order: ResultOrder::Catalog,
        }
    }

    /// Parse a JSON request body. Malformed bodies are invalid queries.
    pub fn from_json(body: &str) -> Result<Self, MatchError> {
        serde_json::from_str(body).map_err(|e| MatchError::invalid(format!("malformed request: {e}")))
    }
}

/// One eligible offer, flattened with the window that admitted it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatOfferView {
    /// Source identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Institution name.
    pub institution: String,
    /// Branch name.
    pub branch: String,
    /// Category of the admitting window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Gender of the admitting window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// Opening rank of the admitting window.
    pub min_rank: u32,
    /// Closing rank of the admitting window.
    pub closing_rank: u32,
    /// Offer phase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    /// Offer year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<Year>,
}

impl From<Match<'_>> for SeatOfferView {
    fn from(m: Match<'_>) -> Self {
        Self {
            id: m.offer.id().map(str::to_string),
            institution: m.offer.institution().to_string(),
            branch: m.offer.branch().to_string(),
            category: m.window.category().map(str::to_string),
            gender: m.window.gender().map(str::to_string),
            min_rank: m.window.min_rank().get(),
            closing_rank: m.window.max_rank().get(),
            phase: m.offer.phase().map(str::to_string),
            year: m.offer.year(),
        }
    }
}

/// Reorder `views` for presentation. The sort is stable.
pub fn apply_order(views: &mut [SeatOfferView], order: ResultOrder) {
    match order {
        ResultOrder::Catalog => {}
        ResultOrder::ClosingRank => views.sort_by_key(|v| v.closing_rank),
    }
}

/// Outcome class of a request, distinguishable by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    /// At least one offer matched.
    Matched,
    /// The query was valid and nothing matched.
    NoMatches,
    /// The query was rejected.
    InvalidInput,
}

impl ResponseStatus {
    /// Process exit code for the CLI.
    pub fn exit_code(self) -> u8 {
        match self {
            ResponseStatus::Matched | ResponseStatus::NoMatches => 0,
            ResponseStatus::InvalidInput => 2,
        }
    }

    /// Equivalent HTTP status, for callers that put this behind a server.
    pub fn http_status(self) -> u16 {
        match self {
            ResponseStatus::Matched | ResponseStatus::NoMatches => 200,
            ResponseStatus::InvalidInput => 400,
        }
    }
}

/// Response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MatchResponse {
    /// Success, possibly with zero matches.
    Matches {
        /// Eligible offers.
        matches: Vec<SeatOfferView>,
    },
    /// The request was rejected.
    Error {
        /// Human-readable reason.
        error: String,
    },
}

impl MatchResponse {
    /// Status class of this response.
    pub fn status(&self) -> ResponseStatus {
        match self {
            MatchResponse::Matches { matches } if matches.is_empty() => ResponseStatus::NoMatches,
            MatchResponse::Matches { .. } => ResponseStatus::Matched,
            MatchResponse::Error { .. } => ResponseStatus::InvalidInput,
        }
    }
}

impl From<Result<Vec<SeatOfferView>, MatchError>> for MatchResponse {
    fn from(result: Result<Vec<SeatOfferView>, MatchError>) -> Self {
        match result {
            Ok(matches) => MatchResponse::Matches { matches },
            Err(e) => MatchResponse::Error { error: e.to_string() },
        }
    }
}
