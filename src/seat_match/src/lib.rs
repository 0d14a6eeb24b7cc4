//! Seat eligibility matching.
//!
//! Given an applicant's rank, reservation category, gender and optional
//! counselling phase / year, find every seat offer in a curated
//! [`catalog::Catalog`] the applicant is eligible for.
//!
//! ```no_run
//! use seat_match::{LoadPolicy, RawQuery, catalog::config::load_catalog_path, match_request};
//!
//! let (catalog, _report) = load_catalog_path("catalog.toml", LoadPolicy::Strict)?;
//! let query = RawQuery::with_rank(1300).category("OC").gender("Female").phase("Phase 1");
//! for m in match_request(&query, &catalog)? {
//!     println!("{} / {}", m.offer.institution(), m.offer.branch());
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

#![deny(missing_docs)]

pub mod catalog;
pub mod error;
pub mod matcher;
pub mod model;
pub mod query;
pub mod settings;
pub mod view;
pub mod vocab;

pub use catalog::{Catalog, CatalogCell, normalize::LoadPolicy, normalize::LoadReport};
pub use error::{MatchError, RecordError, SchemaError};
pub use matcher::{LocalMatcher, Match, SeatMatcher, match_catalog, match_request};
pub use model::{EligibilityWindow, SeatOffer, Year};
pub use query::{Query, RawQuery};
pub use view::{MatchRequest, MatchResponse, ResponseStatus, ResultOrder, SeatOfferView};
pub use vocab::{Axis, Vocabulary};
