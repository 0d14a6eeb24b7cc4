//! Raw record → [`SeatOffer`] normalization.
//!
//! What normalization does, per record:
//! - Trim names; reject blank institution/branch
//! - Detect the record shape (nested, flat, range, wide); reject mixtures
//! - Parse rank cells (integers, integral floats, numeric text); reject
//!   missing closing ranks, non-numeric or non-positive ranks, inverted ranges
//! - Resolve category/gender/phase through the [`Vocabulary`] to canonical
//!   spellings; reject unknown values and values on undeclared axes
//! - Reject duplicate non-empty ids
//!
//! Bad records either abort the load or are skipped, see [`LoadPolicy`].

use std::{collections::HashSet, fmt, num::NonZeroU32, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::config::{RawOffer, RawScalar, RawWindow};
use crate::error::{RecordError, SchemaError};
use crate::model::{EligibilityWindow, SeatOffer, Year};
use crate::vocab::{Axis, Vocabulary};

/// What to do with a record that fails normalization.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPolicy {
    /// Abort the whole load on the first bad record.
    #[default]
    Strict,
    /// Skip bad records with a logged warning.
    Lenient,
}

impl FromStr for LoadPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(LoadPolicy::Strict),
            "lenient" => Ok(LoadPolicy::Lenient),
            other => Err(format!("unknown load policy `{other}` (expected strict or lenient)")),
        }
    }
}

impl fmt::Display for LoadPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LoadPolicy::Strict => "strict",
            LoadPolicy::Lenient => "lenient",
        })
    }
}

/// Summary of a load.
///
/// All counters are additive for the processed records.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Offers kept.
    pub offers_loaded: usize,
    /// Windows across kept offers.
    pub windows_loaded: usize,
    /// Records dropped under [`LoadPolicy::Lenient`].
    pub records_skipped: usize,
    /// Category/gender/phase values in kept offers written differently from
    /// their canonical spelling.
    pub terms_aliased: usize,
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} offers, {} windows loaded; {} records skipped; {} aliased terms",
            self.offers_loaded, self.windows_loaded, self.records_skipped, self.terms_aliased
        )
    }
}

/// Normalize records in order, applying `policy` to failures.
pub(crate) fn normalize_offers(
    records: Vec<RawOffer>,
    vocab: &Vocabulary,
    policy: LoadPolicy,
) -> Result<(Vec<SeatOffer>, LoadReport), SchemaError> {
    let mut report = LoadReport::default();
    let mut offers = Vec::with_capacity(records.len());
    let mut seen_ids = HashSet::new();

    for (index, raw) in records.into_iter().enumerate() {
        let mut ctx = Ctx { vocab, aliased: 0 };
        let normalized = ctx.offer(raw).and_then(|offer| {
            if let Some(id) = offer.id() {
                if !seen_ids.insert(id.to_string()) {
                    return Err(RecordError::DuplicateId(id.to_string()));
                }
            }
            Ok(offer)
        });

        match normalized {
            Ok(offer) => {
                report.offers_loaded += 1;
                report.windows_loaded += offer.windows().len();
                report.terms_aliased += ctx.aliased;
                offers.push(offer);
            }
            Err(reason) => match policy {
                LoadPolicy::Strict => return Err(SchemaError::Record { index, reason }),
                LoadPolicy::Lenient => {
                    warn!(record = index, %reason, "skipping catalog record");
                    report.records_skipped += 1;
                }
            },
        }
    }

    Ok((offers, report))
}

struct Ctx<'v> {
    vocab: &'v Vocabulary,
    aliased: usize,
}

impl Ctx<'_> {
    fn offer(&mut self, raw: RawOffer) -> Result<SeatOffer, RecordError> {
        let institution = raw
            .institution
            .as_deref()
            .ok_or(RecordError::MissingField("institution"))?;
        let branch = raw.branch.as_deref().ok_or(RecordError::MissingField("branch"))?;
        let id = raw.id.as_ref().and_then(id_text);
        let phase = self.offer_phase(raw.phase.as_deref())?;
        let year = raw.year.as_ref().map(parse_year).transpose()?.flatten();
        let windows = self.windows(&raw)?;
        SeatOffer::new(id, institution, branch, phase, year, windows)
    }

    fn windows(&mut self, raw: &RawOffer) -> Result<Vec<EligibilityWindow>, RecordError> {
        let inline = raw.category.is_some()
            || raw.gender.is_some()
            || raw.min_rank.is_some()
            || raw.max_rank.is_some()
            || raw.closing_rank.is_some()
            || raw.rank_range.is_some();

        match (&raw.eligibility, &raw.cutoffs, inline) {
            (Some(_), Some(_), _) => Err(RecordError::MixedShapes("eligibility and cutoffs".into())),
            (Some(_), None, true) => Err(RecordError::MixedShapes(
                "eligibility and inline window fields".into(),
            )),
            (None, Some(_), true) => Err(RecordError::MixedShapes(
                "cutoffs and inline window fields".into(),
            )),
            (Some(list), None, false) => list.iter().map(|w| self.nested_window(w)).collect(),
            (None, Some(cols), false) => self.wide_windows(cols),
            (None, None, _) => Ok(vec![self.inline_window(raw)?]),
        }
    }

    fn nested_window(&mut self, w: &RawWindow) -> Result<EligibilityWindow, RecordError> {
        let category = self.window_term(Axis::Category, w.category.as_deref())?;
        let gender = self.window_term(Axis::Gender, w.gender.as_deref())?;
        let max = closing_rank(w.max_rank.as_ref(), w.closing_rank.as_ref())?;
        let min = optional_rank("min_rank", w.min_rank.as_ref())?;
        EligibilityWindow::new(category, gender, min.unwrap_or(NonZeroU32::MIN), max)
    }

    fn inline_window(&mut self, raw: &RawOffer) -> Result<EligibilityWindow, RecordError> {
        let category = self.window_term(Axis::Category, raw.category.as_deref())?;
        let gender = self.window_term(Axis::Gender, raw.gender.as_deref())?;

        let (min, max) = match &raw.rank_range {
            Some(_) if raw.min_rank.is_some() || raw.max_rank.is_some() || raw.closing_rank.is_some() => {
                return Err(RecordError::MixedShapes("rank_range and min/max rank fields".into()));
            }
            Some(range) => match range.as_slice() {
                [lo, hi] => (Some(rank("rank_range[0]", lo)?), rank("rank_range[1]", hi)?),
                other => return Err(RecordError::BadRankRange(other.len())),
            },
            None => (
                optional_rank("min_rank", raw.min_rank.as_ref())?,
                closing_rank(raw.max_rank.as_ref(), raw.closing_rank.as_ref())?,
            ),
        };
        EligibilityWindow::new(category, gender, min.unwrap_or(NonZeroU32::MIN), max)
    }

    fn wide_windows(
        &mut self,
        cols: &indexmap::IndexMap<String, Option<RawScalar>>,
    ) -> Result<Vec<EligibilityWindow>, RecordError> {
        let mut out = Vec::with_capacity(cols.len());
        for (column, cell) in cols {
            let Some(cell) = cell.as_ref().filter(|c| !c.is_blank()) else {
                continue;
            };
            let (category, gender) = self.split_column(column)?;
            let closing = rank(column, cell)?;
            out.push(EligibilityWindow::closing(category, gender, closing));
        }
        Ok(out)
    }

    /// `"BC_A GIRLS"` → (`BC-A`, `Female`). When only one axis participates
    /// the whole column names that axis.
    fn split_column(&mut self, column: &str) -> Result<(Option<String>, Option<String>), RecordError> {
        let by_category = self.vocab.terms(Axis::Category).participates();
        let by_gender = self.vocab.terms(Axis::Gender).participates();
        let column = column.trim();

        match (by_category, by_gender) {
            (true, true) => {
                let (category, gender) = column
                    .rsplit_once(char::is_whitespace)
                    .ok_or_else(|| RecordError::BadCutoffColumn(column.to_string()))?;
                Ok((
                    self.window_term(Axis::Category, Some(category))?,
                    self.window_term(Axis::Gender, Some(gender))?,
                ))
            }
            (true, false) => Ok((self.window_term(Axis::Category, Some(column))?, None)),
            (false, true) => Ok((None, self.window_term(Axis::Gender, Some(column))?)),
            (false, false) => Err(RecordError::BadCutoffColumn(column.to_string())),
        }
    }

    /// Window-level category/gender: required iff the axis participates.
    fn window_term(&mut self, axis: Axis, raw: Option<&str>) -> Result<Option<String>, RecordError> {
        let raw = raw.map(str::trim).filter(|s| !s.is_empty());
        match (raw, self.vocab.terms(axis).participates()) {
            (None, false) => Ok(None),
            (None, true) => Err(RecordError::MissingTerm(axis)),
            (Some(value), false) => Err(RecordError::AxisNotDeclared {
                axis,
                value: value.to_string(),
            }),
            (Some(value), true) => self.resolve(axis, value).map(Some),
        }
    }

    /// Offer-level phase: optional, but must be declared when present.
    fn offer_phase(&mut self, raw: Option<&str>) -> Result<Option<String>, RecordError> {
        let Some(value) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(None);
        };
        if !self.vocab.terms(Axis::Phase).participates() {
            return Err(RecordError::AxisNotDeclared {
                axis: Axis::Phase,
                value: value.to_string(),
            });
        }
        self.resolve(Axis::Phase, value).map(Some)
    }

    fn resolve(&mut self, axis: Axis, value: &str) -> Result<String, RecordError> {
        let vocab = self.vocab;
        let canonical = vocab
            .resolve(axis, value)
            .ok_or_else(|| RecordError::UnknownTerm {
                axis,
                value: value.to_string(),
            })?;
        if canonical != value {
            self.aliased += 1;
        }
        Ok(canonical.to_string())
    }
}

fn id_text(raw: &RawScalar) -> Option<String> {
    if raw.is_blank() {
        return None;
    }
    // Numeric codes exported as floats (`1234.0`) keep their integer spelling.
    let text = match raw {
        RawScalar::Float(_) => raw.as_integer().map_or_else(|| raw.to_string(), |i| i.to_string()),
        _ => raw.to_string(),
    };
    Some(text.trim().to_string())
}

fn parse_year(raw: &RawScalar) -> Result<Option<Year>, RecordError> {
    if raw.is_blank() {
        return Ok(None);
    }
    raw.as_integer()
        .filter(|y| *y >= 1)
        .and_then(|y| Year::try_from(y).ok())
        .map(Some)
        .ok_or_else(|| RecordError::InvalidYear(raw.to_string()))
}

fn rank(field: &str, raw: &RawScalar) -> Result<NonZeroU32, RecordError> {
    let value = raw.as_integer().ok_or_else(|| RecordError::NonNumericRank {
        field: field.to_string(),
        value: raw.to_string(),
    })?;
    if value < 1 {
        return Err(RecordError::RankBelowOne {
            field: field.to_string(),
            value,
        });
    }
    u32::try_from(value)
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or_else(|| RecordError::NonNumericRank {
            field: field.to_string(),
            value: raw.to_string(),
        })
}

fn optional_rank(field: &str, raw: Option<&RawScalar>) -> Result<Option<NonZeroU32>, RecordError> {
    match raw {
        None => Ok(None),
        Some(r) if r.is_blank() => Ok(None),
        Some(r) => rank(field, r).map(Some),
    }
}

fn closing_rank(
    max_rank: Option<&RawScalar>,
    closing: Option<&RawScalar>,
) -> Result<NonZeroU32, RecordError> {
    let max_rank = max_rank.filter(|r| !r.is_blank());
    let closing = closing.filter(|r| !r.is_blank());
    match (max_rank, closing) {
        (Some(_), Some(_)) => Err(RecordError::MixedShapes("max_rank and closing_rank".into())),
        (Some(r), None) => rank("max_rank", r),
        (None, Some(r)) => rank("closing_rank", r),
        (None, None) => Err(RecordError::MissingClosingRank),
    }
}
