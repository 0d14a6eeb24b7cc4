mod common;
use common::{CatalogFiles, FOUR_OFFERS_TOML, names};

use seat_match::{
    LoadPolicy, RawQuery,
    catalog::config::load_catalog_path,
};

#[test]
fn toml_file_loads_in_record_order() {
    let files = CatalogFiles::new();
    let path = files.write("catalog.toml", FOUR_OFFERS_TOML);

    let (cat, report) = load_catalog_path(&path, LoadPolicy::Strict).unwrap();
    assert_eq!(report.offers_loaded, 4);
    assert_eq!(report.windows_loaded, 10);
    assert_eq!(report.records_skipped, 0);
    let order: Vec<_> = cat.all().iter().map(|o| o.institution()).collect();
    assert_eq!(
        order,
        ["JNTU Hyderabad", "OU College of Engineering", "CBIT", "Vasavi College"]
    );
}

#[test]
fn json_front_end_records_load() {
    let files = CatalogFiles::new();
    let path = files.write(
        "colleges.json",
        r#"{
          "colleges": [
            { "id": 1, "name": "JNTU Hyderabad", "branch": "CSE", "phase": "Phase 1",
              "eligibility": [
                { "category": "OC", "gender": "Male", "minRank": 1, "maxRank": 1200 },
                { "category": "OC", "gender": "Female", "minRank": 1, "maxRank": 1500 }
              ] },
            { "id": 2, "name": "CBIT", "branch": "IT", "phase": "Phase2",
              "category": "SC", "gender": "Girls", "rankRange": [3000, "9000"] }
          ]
        }"#,
    );

    let (cat, report) = load_catalog_path(&path, LoadPolicy::Strict).unwrap();
    assert_eq!(report.offers_loaded, 2);
    assert_eq!(cat.all()[1].phase(), Some("Phase 2"));
    assert_eq!(cat.all()[1].id(), Some("2"));

    let q = RawQuery::with_rank(8000).category("SC").gender("F").phase("Phase 2");
    assert_eq!(names(&q, &cat), ["CBIT"]);
}

#[test]
fn strict_load_names_the_bad_record() {
    let files = CatalogFiles::new();
    let path = files.write(
        "bad.toml",
        r#"
        [[offers]]
        name = "Fine"
        branch = "CSE"
        category = "OC"
        gender = "Male"
        closing_rank = 100

        [[offers]]
        name = "Broken"
        branch = "CSE"
        category = "OC"
        gender = "Male"
        closing_rank = "NA"
        "#,
    );

    let err = load_catalog_path(&path, LoadPolicy::Strict).unwrap_err();
    let chain = format!("{err:#}");
    assert!(chain.contains("bad.toml"), "{chain}");
    assert!(chain.contains("record 1"), "{chain}");
    assert_eq!(chain.matches("non-numeric rank `NA`").count(), 1, "{chain}");

    let (cat, report) = load_catalog_path(&path, LoadPolicy::Lenient).unwrap();
    assert_eq!(cat.len(), 1);
    assert_eq!(report.records_skipped, 1);
}

#[test]
fn missing_file_is_reported_with_path() {
    let files = CatalogFiles::new();
    let err = load_catalog_path(files.write("x.toml", "").with_file_name("absent.toml"), LoadPolicy::Strict)
        .unwrap_err();
    assert!(format!("{err:#}").contains("absent.toml"));
}

#[test]
fn empty_catalog_file_matches_nothing() {
    let files = CatalogFiles::new();
    let (cat, _) = load_catalog_path(files.write("empty.toml", ""), LoadPolicy::Strict).unwrap();
    assert!(cat.is_empty());
    assert!(names(&RawQuery::with_rank(1).category("OC").gender("Male"), &cat).is_empty());
}
