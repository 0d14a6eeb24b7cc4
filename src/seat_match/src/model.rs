//! Seat-offer value types.
//!
//! A [`SeatOffer`] is one (institution, branch) combination, optionally scoped
//! to a counselling phase and/or year, owning one or more
//! [`EligibilityWindow`]s. Both types are immutable once built; constructors
//! enforce the invariants the matcher relies on:
//! - every offer has at least one window,
//! - every window has `1 <= min_rank <= max_rank`,
//! - institution and branch names are non-empty.
//!
//! Category, gender and phase values are stored in their canonical spelling
//! (see [`crate::vocab`]); `None` means the axis does not participate (for
//! windows) or that the offer applies to every phase/year (for offers).

use std::num::NonZeroU32;

use serde::Serialize;

use crate::error::RecordError;

/// A calendar year as it appears in cutoff tables.
pub type Year = u16;

/// One admission rule: (category, gender, inclusive rank range).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EligibilityWindow {
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    gender: Option<String>,
    min_rank: NonZeroU32,
    max_rank: NonZeroU32,
}

impl EligibilityWindow {
    /// Create a window; fails when `min_rank > max_rank`.
    pub fn new(
        category: Option<String>,
        gender: Option<String>,
        min_rank: NonZeroU32,
        max_rank: NonZeroU32,
    ) -> Result<Self, RecordError> {
        if min_rank > max_rank {
            return Err(RecordError::InvertedRange {
                min: min_rank.get(),
                max: max_rank.get(),
            });
        }
        Ok(Self {
            category,
            gender,
            min_rank,
            max_rank,
        })
    }

    /// A window that admits every rank from 1 through `closing_rank`.
    pub fn closing(category: Option<String>, gender: Option<String>, closing_rank: NonZeroU32) -> Self {
        Self {
            category,
            gender,
            min_rank: NonZeroU32::MIN,
            max_rank: closing_rank,
        }
    }

    /// Canonical category, if categories partition this catalog.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Canonical gender, if genders partition this catalog.
    pub fn gender(&self) -> Option<&str> {
        self.gender.as_deref()
    }

    /// Inclusive lower bound.
    pub fn min_rank(&self) -> NonZeroU32 {
        self.min_rank
    }

    /// Inclusive upper bound (closing rank).
    pub fn max_rank(&self) -> NonZeroU32 {
        self.max_rank
    }

    /// `min_rank <= rank <= max_rank`.
    pub fn admits(&self, rank: NonZeroU32) -> bool {
        self.min_rank <= rank && rank <= self.max_rank
    }
}

/// One (institution, branch) seat offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatOffer {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    institution: String,
    branch: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    phase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    year: Option<Year>,
    windows: Vec<EligibilityWindow>,
}

impl SeatOffer {
    /// Create an offer. Names are trimmed; blank names and an empty window
    /// list are rejected.
    pub fn new(
        id: Option<String>,
        institution: &str,
        branch: &str,
        phase: Option<String>,
        year: Option<Year>,
        windows: Vec<EligibilityWindow>,
    ) -> Result<Self, RecordError> {
        let institution = institution.trim();
        if institution.is_empty() {
            return Err(RecordError::EmptyField("institution"));
        }
        let branch = branch.trim();
        if branch.is_empty() {
            return Err(RecordError::EmptyField("branch"));
        }
        if windows.is_empty() {
            return Err(RecordError::NoWindows);
        }
        Ok(Self {
            id,
            institution: institution.to_string(),
            branch: branch.to_string(),
            phase,
            year,
            windows,
        })
    }

    /// Source identifier (e.g. institution code), if any.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Institution (college) name.
    pub fn institution(&self) -> &str {
        &self.institution
    }

    /// Branch name.
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Canonical phase; `None` applies to all phases.
    pub fn phase(&self) -> Option<&str> {
        self.phase.as_deref()
    }

    /// Year; `None` applies to all years.
    pub fn year(&self) -> Option<Year> {
        self.year
    }

    /// Windows in source order; never empty.
    pub fn windows(&self) -> &[EligibilityWindow] {
        &self.windows
    }

    /// Phase gate: no selector, no offer phase, or equal phases.
    pub fn applies_to_phase(&self, phase: Option<&str>) -> bool {
        match (phase, self.phase()) {
            (Some(wanted), Some(own)) => wanted == own,
            _ => true,
        }
    }

    /// Year gate, same rule as [`SeatOffer::applies_to_phase`].
    pub fn applies_to_year(&self, year: Option<Year>) -> bool {
        match (year, self.year) {
            (Some(wanted), Some(own)) => wanted == own,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nz(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let w = EligibilityWindow::closing(Some("OC".into()), Some("Male".into()), nz(1200));
        assert!(w.admits(nz(1)));
        assert!(w.admits(nz(1200)));
        assert!(!w.admits(nz(1201)));
    }

    #[test]
    fn inverted_window_is_rejected() {
        let err = EligibilityWindow::new(None, None, nz(500), nz(100)).unwrap_err();
        assert_eq!(err, RecordError::InvertedRange { min: 500, max: 100 });
    }

    #[test]
    fn single_rank_window_is_allowed() {
        let w = EligibilityWindow::new(None, None, nz(42), nz(42)).unwrap();
        assert!(w.admits(nz(42)));
        assert!(!w.admits(nz(41)));
    }

    #[test]
    fn offer_requires_names_and_windows() {
        let w = EligibilityWindow::closing(None, None, nz(10));
        assert_eq!(
            SeatOffer::new(None, "  ", "CSE", None, None, vec![w.clone()]).unwrap_err(),
            RecordError::EmptyField("institution")
        );
        assert_eq!(
            SeatOffer::new(None, "CBIT", "", None, None, vec![w]).unwrap_err(),
            RecordError::EmptyField("branch")
        );
        assert_eq!(
            SeatOffer::new(None, "CBIT", "IT", None, None, vec![]).unwrap_err(),
            RecordError::NoWindows
        );
    }

    #[test]
    fn absent_phase_and_year_apply_everywhere() {
        let w = EligibilityWindow::closing(None, None, nz(10));
        let open = SeatOffer::new(None, "CBIT", "IT", None, None, vec![w.clone()]).unwrap();
        assert!(open.applies_to_phase(Some("Phase 2")));
        assert!(open.applies_to_year(Some(2024)));

        let scoped =
            SeatOffer::new(None, "CBIT", "IT", Some("Phase 1".into()), Some(2024), vec![w]).unwrap();
        assert!(scoped.applies_to_phase(None));
        assert!(scoped.applies_to_phase(Some("Phase 1")));
        assert!(!scoped.applies_to_phase(Some("Phase 2")));
        assert!(!scoped.applies_to_year(Some(2023)));
    }
}
