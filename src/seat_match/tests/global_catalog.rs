mod common;
use common::{CatalogFiles, FOUR_OFFERS_TOML, four_offers};

use std::thread;

use serial_test::serial;

use seat_match::{
    LoadPolicy, LocalMatcher, MatchRequest, RawQuery, SeatMatcher, catalog::snapshot,
};

fn oc_female_1300() -> MatchRequest {
    MatchRequest::new(RawQuery::with_rank(1300).category("OC").gender("Female"))
}

#[test]
#[serial]
fn global_cell_starts_empty_and_clears() {
    snapshot::global().clear();
    let matcher = LocalMatcher::global();
    assert!(matcher.find(&oc_female_1300()).unwrap().is_empty());

    snapshot::global().install(four_offers());
    assert_eq!(matcher.find(&oc_female_1300()).unwrap().len(), 2);

    snapshot::global().clear();
    assert!(matcher.catalog().is_empty());
}

#[test]
#[serial]
fn refresh_swaps_whole_catalog_under_concurrent_readers() {
    let files = CatalogFiles::new();
    let full = files.write("full.toml", FOUR_OFFERS_TOML);
    let jntu_only = files.write(
        "jntu.toml",
        &FOUR_OFFERS_TOML[..FOUR_OFFERS_TOML.find("[[offers]]\nname = \"OU").unwrap()],
    );

    let cell = snapshot::global();
    cell.refresh_from_path(&full, LoadPolicy::Strict).unwrap();

    thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                let matcher = LocalMatcher::global();
                for _ in 0..200 {
                    // JNTU and Vasavi in the full catalog, JNTU alone after the swap.
                    let n = matcher.find(&oc_female_1300()).unwrap().len();
                    assert!(n == 1 || n == 2, "saw a partial catalog: {n}");
                }
            });
        }
        for i in 0..50 {
            let path = if i % 2 == 0 { &jntu_only } else { &full };
            cell.refresh_from_path(path, LoadPolicy::Strict).unwrap();
        }
    });

    cell.refresh_from_path(&jntu_only, LoadPolicy::Strict).unwrap();
    assert_eq!(cell.snapshot().len(), 1);
    cell.clear();
}

#[test]
#[serial]
fn failed_refresh_leaves_global_catalog_in_place() {
    let files = CatalogFiles::new();
    let cell = snapshot::global();
    cell.install(four_offers());

    let bad = files.write("bad.toml", "[[offers]]\nname = \"No branch\"\nclosing_rank = 10\n");
    assert!(cell.refresh_from_path(&bad, LoadPolicy::Strict).is_err());
    assert_eq!(cell.snapshot().len(), 4);
    cell.clear();
}
