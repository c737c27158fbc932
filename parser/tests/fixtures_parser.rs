use std::fs;
use std::path::PathBuf;

use solar_tabulate_core::{Comparator, ParseError, build_table};
use solar_tabulate_parser::{ReadError, read_report, read_report_file, resolve_input};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn fixture(name: &str) -> String {
    fs::read_to_string(fixture_path(name)).expect("fixture should exist")
}

#[test]
fn test_parse_univariate_fixture() {
    let report = read_report(fixture("univariate.out").as_bytes()).expect("fixture should parse");

    assert_eq!(report.traits, ["bmi"]);
    let labels: Vec<_> = report.metadata.keys().map(String::as_str).collect();
    assert_eq!(labels, ["Pedigree", "Phenotypes", "Individuals"]);

    assert_eq!(report.values.len(), 1);
    let h2r = report.value("H2r", Some("bmi")).expect("H2r should be keyed to bmi");
    assert_eq!(h2r.value, "0.4123456");
    assert_eq!(h2r.pvalue.as_deref(), Some("1.2000000e-05"));
    assert_eq!(h2r.stderr.as_deref(), Some("0.0812345"));
    assert!(!h2r.estimated);
}

#[test]
fn test_parse_bivariate_fixture() {
    let report = read_report(fixture("bivariate.out").as_bytes()).expect("fixture should parse");

    assert_eq!(report.traits, ["sbp", "dbp"]);

    let keys: Vec<_> = report.values.keys().map(|k| k.to_string()).collect();
    assert_eq!(keys, ["H2r(sbp)", "H2r(dbp)", "RhoE", "RhoG", "RhoP"]);

    let dbp = report.value("H2r", Some("dbp")).unwrap();
    assert_eq!(dbp.stderr.as_deref(), Some("0.0765432"));

    let rhog = report.value("RhoG", None).unwrap();
    assert_eq!(rhog.pvalue, None);
    let comparators: Vec<_> = rhog.difference_tests.iter().map(|t| t.comparator).collect();
    assert_eq!(comparators, [Comparator::Zero, Comparator::One]);

    let rhop = report.value("RhoP", None).unwrap();
    assert!(rhop.estimated);
    assert_eq!(rhop.difference_tests[0].pvalue, "0.0000123");
}

#[test]
fn test_incomplete_fixture_fails() {
    let err = read_report_file(&fixture_path("incomplete.out")).unwrap_err();
    assert!(matches!(err, ReadError::Parse(ParseError::IncompleteRun)));
}

#[test]
fn test_directory_input_reads_polygenic_out() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("polygenic.out"), fixture("univariate.out")).unwrap();

    let report = read_report_file(&resolve_input(dir.path())).expect("directory should resolve");
    assert_eq!(report.traits, ["bmi"]);
}

#[test]
fn test_fixture_table_columns() {
    let bivariate = read_report(fixture("bivariate.out").as_bytes()).unwrap();
    let univariate = read_report(fixture("univariate.out").as_bytes()).unwrap();

    let table = build_table(&[bivariate, univariate]).unwrap();
    assert_eq!(
        table.header,
        [
            "A",
            "B",
            "Pedigree",
            "Phenotypes",
            "Individuals",
            "H2r.A",
            "H2r.A.stderr",
            "H2r.A.pvalue",
            "H2r.B",
            "H2r.B.stderr",
            "H2r.B.pvalue",
            "RhoE",
            "RhoE.stderr",
            "RhoE.pvalue",
            "RhoG",
            "RhoG.stderr",
            "RhoG.pNotZero",
            "RhoG.pNot1.0",
            "RhoP.est",
            "RhoP.est.pNotZero",
        ]
    );

    let univariate_row = &table.rows[1];
    assert_eq!(univariate_row.get("A"), Some("bmi"));
    assert_eq!(univariate_row.get("B"), None);
    assert_eq!(univariate_row.get("H2r.A"), Some("0.4123456"));
    assert_eq!(univariate_row.get("RhoG"), None);

    let tsv = table.to_tsv("NA");
    let second = tsv.lines().nth(2).unwrap();
    assert!(second.starts_with("bmi\tNA\tped.csv\tphen.csv\t1200\t0.4123456\t0.0812345\t1.2000000e-05\tNA"));
}
