//! Error taxonomy for catalog loading and matching.
//!
//! Load-time problems are [`SchemaError`]s; query-time problems are
//! [`MatchError`]s. "No matching offers" is never an error.

use thiserror::Error;

use crate::vocab::Axis;

/// Why a single source record could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// A required text field is absent.
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    /// A required text field is present but blank.
    #[error("field `{0}` cannot be empty")]
    EmptyField(&'static str),
    /// No closing rank (`max_rank` / `closing_rank`) was supplied.
    #[error("missing closing rank")]
    MissingClosingRank,
    /// A rank cell is not an integer.
    #[error("non-numeric rank `{value}` in `{field}`")]
    NonNumericRank {
        /// Field or column the value came from.
        field: String,
        /// The offending value as written.
        value: String,
    },
    /// A rank cell is zero or negative.
    #[error("rank in `{field}` must be at least 1, got {value}")]
    RankBelowOne {
        /// Field or column the value came from.
        field: String,
        /// The offending value.
        value: i64,
    },
    /// `min_rank` exceeds `max_rank`.
    #[error("inverted rank range: min_rank {min} > max_rank {max}")]
    InvertedRange {
        /// Lower bound as given.
        min: u32,
        /// Upper bound as given.
        max: u32,
    },
    /// A category/gender/phase value is outside the declared vocabulary.
    #[error("unknown {axis} `{value}`")]
    UnknownTerm {
        /// Axis the value was looked up on.
        axis: Axis,
        /// The value as written.
        value: String,
    },
    /// A value was given for an axis the schema does not declare.
    #[error("{axis} is not part of this catalog's schema (got `{value}`)")]
    AxisNotDeclared {
        /// Undeclared axis.
        axis: Axis,
        /// The value as written.
        value: String,
    },
    /// A window lacks a value for a participating axis.
    #[error("{0} is required by this catalog's schema")]
    MissingTerm(Axis),
    /// The record normalizes to zero eligibility windows.
    #[error("record has no eligibility windows")]
    NoWindows,
    /// The record combines fields of more than one source shape.
    #[error("record mixes shapes: {0}")]
    MixedShapes(String),
    /// Another record already uses this id.
    #[error("duplicate id `{0}`")]
    DuplicateId(String),
    /// The year is not a positive integer that fits a calendar year.
    #[error("invalid year `{0}`")]
    InvalidYear(String),
    /// A `rank_range` that is not exactly `[min, max]`.
    #[error("rank_range must have exactly two elements, got {0}")]
    BadRankRange(usize),
    /// A wide-table column name that cannot be split into category and gender.
    #[error("cutoff column `{0}` is not `<category> <gender>`")]
    BadCutoffColumn(String),
}

/// A catalog failed to load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The `[schema]` table itself is inconsistent.
    #[error("invalid schema: {0}")]
    Vocabulary(String),
    /// A record failed normalization (strict policy).
    #[error("record {index}")]
    Record {
        /// Zero-based position of the record in the source.
        index: usize,
        /// What was wrong with it.
        #[source]
        reason: RecordError,
    },
}

/// A query could not be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// Rank missing, non-numeric or non-positive, a required selector
    /// missing, or a malformed request payload.
    #[error("{0}")]
    InvalidQuery(String),
    /// A selector value is not among the catalog's declared terms.
    #[error("unknown {axis} `{value}`")]
    UnknownEnumValue {
        /// Axis the value was looked up on.
        axis: Axis,
        /// The value as written.
        value: String,
    },
}

impl MatchError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        MatchError::InvalidQuery(msg.into())
    }
}
