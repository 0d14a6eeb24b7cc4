use proptest::prelude::*;

use seat_match::{
    Catalog, LoadPolicy, Query, RawQuery, SeatOffer, Vocabulary, match_catalog,
    catalog::config::{CatalogFile, RawOffer, RawScalar, RawWindow},
};

const CATEGORIES: &[&str] = &["OC", "SC", "BC-A"];
const GENDERS: &[&str] = &["Male", "Female"];
const PHASES: &[&str] = &["Phase 1", "Phase 2", "Final Phase"];

fn window() -> impl Strategy<Value = RawWindow> {
    (0..CATEGORIES.len(), 0..GENDERS.len(), 1u32..500, 0u32..500).prop_map(|(c, g, min, span)| {
        RawWindow {
            category: Some(CATEGORIES[c].to_string()),
            gender: Some(GENDERS[g].to_string()),
            min_rank: Some(RawScalar::Int(min.into())),
            max_rank: Some(RawScalar::Int((min + span).into())),
            closing_rank: None,
        }
    })
}

fn offer() -> impl Strategy<Value = RawOffer> {
    (
        prop::option::of(0..PHASES.len()),
        prop::option::of(2023i64..2025),
        prop::collection::vec(window(), 1..4),
    )
        .prop_map(|(phase, year, windows)| RawOffer {
            institution: Some("College".into()),
            branch: Some("CSE".into()),
            phase: phase.map(|p| PHASES[p].to_string()),
            year: year.map(RawScalar::Int),
            eligibility: Some(windows),
            ..RawOffer::default()
        })
}

fn catalog() -> impl Strategy<Value = Catalog> {
    prop::collection::vec(offer(), 0..12).prop_map(|offers| {
        Catalog::load(CatalogFile { schema: None, offers }, LoadPolicy::Strict)
            .expect("generated records are valid")
            .0
    })
}

fn query(vocab: Vocabulary) -> impl Strategy<Value = Query> {
    (
        1i64..1100,
        0..CATEGORIES.len(),
        0..GENDERS.len(),
        prop::option::of(0..PHASES.len()),
        prop::option::of(2023i64..2025),
    )
        .prop_map(move |(rank, c, g, phase, year)| {
            let mut raw = RawQuery::with_rank(rank).category(CATEGORIES[c]).gender(GENDERS[g]);
            if let Some(p) = phase {
                raw = raw.phase(PHASES[p]);
            }
            if let Some(y) = year {
                raw = raw.year(y);
            }
            Query::resolve(&raw, &vocab).expect("generated query is valid")
        })
}

fn catalog_and_query() -> impl Strategy<Value = (Catalog, Query)> {
    catalog().prop_flat_map(|cat| {
        let q = query(cat.vocabulary().clone());
        (Just(cat), q)
    })
}

/// Straight transcription of the eligibility rule.
fn eligible(q: &Query, o: &SeatOffer) -> bool {
    let phase_ok = q.phase().is_none() || o.phase().is_none() || q.phase() == o.phase();
    let year_ok = q.year().is_none() || o.year().is_none() || q.year() == o.year();
    phase_ok
        && year_ok
        && o.windows().iter().any(|w| {
            w.category() == q.category()
                && w.gender() == q.gender()
                && w.min_rank() <= q.rank()
                && q.rank() <= w.max_rank()
        })
}

proptest! {
    #[test]
    fn results_are_exactly_the_eligible_offers_in_catalog_order(
        (cat, q) in catalog_and_query()
    ) {
        let got: Vec<*const SeatOffer> = match_catalog(&q, &cat)
            .iter()
            .map(|m| m.offer as *const SeatOffer)
            .collect();
        let want: Vec<*const SeatOffer> = cat
            .all()
            .iter()
            .filter(|o| eligible(&q, o))
            .map(|o| o as *const SeatOffer)
            .collect();
        prop_assert_eq!(got, want);
    }

    #[test]
    fn reported_window_admits_the_query(
        (cat, q) in catalog_and_query()
    ) {
        for m in match_catalog(&q, &cat) {
            prop_assert!(m.window.admits(q.rank()));
            prop_assert_eq!(m.window.category(), q.category());
            prop_assert_eq!(m.window.gender(), q.gender());
            let first = m.offer.windows().iter().position(|w| std::ptr::eq(w, m.window));
            let earliest = m.offer.windows().iter().position(|w| {
                w.category() == q.category() && w.gender() == q.gender() && w.admits(q.rank())
            });
            prop_assert_eq!(first, earliest);
        }
    }

    #[test]
    fn matching_is_idempotent(
        (cat, q) in catalog_and_query()
    ) {
        prop_assert_eq!(match_catalog(&q, &cat), match_catalog(&q, &cat));
    }
}
