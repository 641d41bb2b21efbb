// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chesscal::commands::exporter;
use chesscal::models::{BudgetSource, Currency, ExpenseItem, Tournament};
use chesscal::rates::{RateInfo, RateSource, RateTable};
use chesscal::{cli, db, store};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use tempfile::tempdir;

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn seeded_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    let info = RateInfo {
        rates: RateTable::from_rates(d("42.5"), d("44.5")),
        last_updated: 1_750_000_000_000,
        source: RateSource::Live,
    };
    store::save_json(&conn, store::RATES_KEY, &info).unwrap();

    let mut basic = Tournament::new("Spring Open", day("2025-04-10"), day("2025-04-12"));
    basic.country = Some("Turkey".into());
    basic.rounds = Some(7);
    basic.budget = Some(d("4250"));
    basic.link = Some("https://example.org/spring".into());
    store::add_tournament(&conn, basic).unwrap();

    let mut detailed = Tournament::new("Sitges", day("2025-12-12"), day("2025-12-21"));
    detailed.country = Some("Spain".into());
    detailed.budget_source = BudgetSource::Detailed;
    detailed.is_going = true;
    detailed.expenses = vec![
        ExpenseItem::new("1", "Hotel", d("100"), Currency::EUR),
        ExpenseItem::new("2", "Flight", d("50"), Currency::USD),
    ];
    store::add_tournament(&conn, detailed).unwrap();

    let mut empty = Tournament::new("Empty plan", day("2025-08-01"), day("2025-08-03"));
    empty.budget_source = BudgetSource::Detailed;
    empty.budget = Some(d("999"));
    store::add_tournament(&conn, empty).unwrap();
    conn
}

fn export(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["chesscal", "export"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(conn, export_m)
    } else {
        panic!("no export subcommand");
    }
}

#[test]
fn export_tournaments_json_has_converted_totals() {
    let conn = seeded_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    let out_str = out_path.to_string_lossy().to_string();

    export(
        &conn,
        &["tournaments", "--format", "json", "--out", &out_str, "--currency", "USD"],
    )
    .unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    let rows = parsed.as_array().unwrap();
    let titles: Vec<&str> = rows.iter().map(|r| r["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["Spring Open", "Empty plan", "Sitges"]);

    let total = |i: usize| d(rows[i]["total"].as_str().unwrap());
    assert_eq!(total(0), d("100"));
    assert_eq!(rows[0]["currency"], "USD");
    assert_eq!(rows[0]["quarter"], 2);
    assert_eq!(rows[0]["type"], "");
    assert_eq!(total(1), Decimal::ZERO);
    // 100 EUR + 50 USD, in USD
    assert_eq!(total(2), d("154.71"));
    assert_eq!(rows[2]["budget_source"], "detailed");
    assert_eq!(rows[2]["going"], true);
}

#[test]
fn export_tournaments_csv_writes_header_and_rows() {
    let conn = seeded_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.csv");
    let out_str = out_path.to_string_lossy().to_string();

    export(
        &conn,
        &["tournaments", "--format", "CSV", "--out", &out_str, "--year", "2025"],
    )
    .unwrap();

    let mut rdr = csv::Reader::from_path(&out_path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(&headers[0], "id");
    assert_eq!(&headers[1], "title");
    assert!(headers.iter().any(|h| h == "total"));
    let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 3);
    assert_eq!(&records[0][1], "Spring Open");
}

#[test]
fn export_tournaments_rejects_unknown_format() {
    let conn = seeded_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.unknown");
    let out_str = out_path.to_string_lossy().to_string();

    assert!(export(&conn, &["tournaments", "--format", "xml", "--out", &out_str]).is_err());
    assert!(!out_path.exists());
}

#[test]
fn export_workbook_writes_xlsx() {
    let conn = seeded_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("plan.xlsx");
    let out_str = out_path.to_string_lossy().to_string();

    export(&conn, &["workbook", "--out", &out_str, "--currency", "EUR"]).unwrap();

    let bytes = std::fs::read(&out_path).unwrap();
    assert!(bytes.len() > 100);
    assert_eq!(&bytes[..2], b"PK");
}

#[test]
fn export_workbook_with_no_tournaments_still_writes() {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("empty.xlsx");
    let out_str = out_path.to_string_lossy().to_string();

    export(&conn, &["workbook", "--out", &out_str, "--year", "2026"]).unwrap();
    assert!(out_path.exists());
}

#[test]
fn confirmed_flag_limits_both_exports_to_going_tournaments() {
    let conn = seeded_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("going.json");
    let out_str = out_path.to_string_lossy().to_string();

    export(
        &conn,
        &["tournaments", "--format", "json", "--out", &out_str, "--confirmed"],
    )
    .unwrap();

    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out_path).unwrap()).unwrap();
    let rows = parsed.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["title"], "Sitges");
    assert_eq!(rows[0]["going"], true);

    let xlsx = dir.path().join("going.xlsx");
    let xlsx_str = xlsx.to_string_lossy().to_string();
    export(&conn, &["workbook", "--out", &xlsx_str, "--confirmed"]).unwrap();
    assert_eq!(&std::fs::read(&xlsx).unwrap()[..2], b"PK");
}
