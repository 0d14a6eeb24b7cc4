//! Query validation.
//!
//! A [`RawQuery`] is what arrives at the boundary (JSON or CLI flags); a
//! [`Query`] is the validated form the matcher evaluates, with every selector
//! resolved to its canonical spelling in the catalog's [`Vocabulary`].

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::catalog::config::RawScalar;
use crate::error::MatchError;
use crate::model::Year;
use crate::vocab::{Axis, Vocabulary};

/// An unvalidated query. Blank strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawQuery {
    /// Applicant rank; a JSON number or a numeric string.
    pub rank: Option<RawScalar>,
    /// Reservation category.
    pub category: Option<String>,
    /// Applicant gender.
    pub gender: Option<String>,
    /// Counselling phase.
    #[serde(alias = "phase_preference")]
    pub phase: Option<String>,
    /// Year.
    #[serde(alias = "year_preference")]
    pub year: Option<RawScalar>,
}

impl RawQuery {
    /// A query with only the rank set.
    pub fn with_rank(rank: i64) -> Self {
        Self {
            rank: Some(RawScalar::Int(rank)),
            ..Self::default()
        }
    }

    /// Sets the category.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the gender.
    pub fn gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    /// Sets the phase.
    pub fn phase(mut self, phase: impl Into<String>) -> Self {
        self.phase = Some(phase.into());
        self
    }

    /// Sets the year.
    pub fn year(mut self, year: i64) -> Self {
        self.year = Some(RawScalar::Int(year));
        self
    }
}

/// A validated query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    rank: NonZeroU32,
    category: Option<String>,
    gender: Option<String>,
    phase: Option<String>,
    year: Option<Year>,
}

impl Query {
    /// Validate `raw` against `vocab`.
    ///
    /// Category and gender are required exactly when their axis participates;
    /// phase and year are always optional.
    pub fn resolve(raw: &RawQuery, vocab: &Vocabulary) -> Result<Self, MatchError> {
        Ok(Self {
            rank: parse_rank(raw.rank.as_ref())?,
            category: selector(vocab, Axis::Category, raw.category.as_deref(), true)?,
            gender: selector(vocab, Axis::Gender, raw.gender.as_deref(), true)?,
            phase: selector(vocab, Axis::Phase, raw.phase.as_deref(), false)?,
            year: parse_year(raw.year.as_ref())?,
        })
    }

    /// Applicant rank.
    pub fn rank(&self) -> NonZeroU32 {
        self.rank
    }

    /// Canonical category; `None` when categories do not participate.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Canonical gender; `None` when genders do not participate.
    pub fn gender(&self) -> Option<&str> {
        self.gender.as_deref()
    }

    /// Canonical phase selector, if any.
    pub fn phase(&self) -> Option<&str> {
        self.phase.as_deref()
    }

    /// Year selector, if any.
    pub fn year(&self) -> Option<Year> {
        self.year
    }
}

fn present(raw: Option<&RawScalar>) -> Option<&RawScalar> {
    raw.filter(|r| !r.is_blank())
}

fn parse_rank(raw: Option<&RawScalar>) -> Result<NonZeroU32, MatchError> {
    let raw = present(raw).ok_or_else(|| MatchError::invalid("rank is required"))?;
    let value = raw
        .as_integer()
        .ok_or_else(|| MatchError::invalid(format!("rank must be a whole number, got `{raw}`")))?;
    if value < 1 {
        return Err(MatchError::invalid(format!("rank must be at least 1, got {value}")));
    }
    u32::try_from(value)
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or_else(|| MatchError::invalid(format!("rank {value} is out of range")))
}

fn parse_year(raw: Option<&RawScalar>) -> Result<Option<Year>, MatchError> {
    let Some(raw) = present(raw) else {
        return Ok(None);
    };
    raw.as_integer()
        .filter(|y| *y >= 1)
        .and_then(|y| Year::try_from(y).ok())
        .map(Some)
        .ok_or_else(|| MatchError::invalid(format!("year must be a positive integer, got `{raw}`")))
}

fn selector(
    vocab: &Vocabulary,
    axis: Axis,
    raw: Option<&str>,
    required: bool,
) -> Result<Option<String>, MatchError> {
    let terms = vocab.terms(axis);
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) => terms
            .resolve(value)
            .map(|canonical| Some(canonical.to_string()))
            .ok_or_else(|| MatchError::UnknownEnumValue {
                axis,
                value: value.to_string(),
            }),
        None if required && terms.participates() => {
            Err(MatchError::invalid(format!("{axis} is required")))
        }
        None => Ok(None),
    }
}
