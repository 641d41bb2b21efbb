// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chesscal::models::{BudgetSource, Currency, ExpenseItem, Tournament};
use chesscal::rates::RateTable;
use chesscal::schedule::{
    self, FilterMode, ScheduleError, aggregate_by_country, aggregate_by_quarter, budget_in,
    effective_budget, financial_overview, intervals_intersect, overlaps, quarter_of, summarize,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn tour(id: &str, start: &str, end: &str) -> Tournament {
    let mut t = Tournament::new(id, day(start), day(end));
    t.id = id.to_string();
    t
}

fn rates() -> RateTable {
    RateTable::from_rates(d("42.5"), d("44.5"))
}

#[test]
fn intersection_matches_closed_interval_rule() {
    let days: Vec<NaiveDate> = (1..=6)
        .map(|n| NaiveDate::from_ymd_opt(2025, 3, n).unwrap())
        .collect();
    for &a in &days {
        for &b in days.iter().filter(|b| **b >= a) {
            for &c in &days {
                for &e in days.iter().filter(|e| **e >= c) {
                    let expected = a <= e && b >= c;
                    assert_eq!(intervals_intersect(a, b, c, e), expected);
                }
            }
        }
    }
}

#[test]
fn adjacent_ranges_do_not_overlap_but_single_days_do() {
    let a = tour("a", "2025-04-10", "2025-04-12");
    let next = tour("b", "2025-04-13", "2025-04-15");
    assert!(overlaps(&next, std::slice::from_ref(&a)).is_none());

    let one = tour("x", "2025-06-01", "2025-06-01");
    let same = tour("y", "2025-06-01", "2025-06-01");
    assert_eq!(overlaps(&same, &[one]).map(|t| t.id.as_str()), Some("x"));
}

#[test]
fn overlap_check_skips_the_candidate_itself() {
    let a = tour("a", "2025-04-10", "2025-04-12");
    let mut moved = a.clone();
    moved.end_date = day("2025-04-14");
    assert!(overlaps(&moved, &[a]).is_none());
}

#[test]
fn shared_boundary_day_is_rejected() {
    let a = tour("a", "2025-04-10", "2025-04-12");
    let b = tour("b", "2025-04-12", "2025-04-15");
    match schedule::validate(&b, &[a]) {
        Err(ScheduleError::Overlap { id, .. }) => assert_eq!(id, "a"),
        other => panic!("expected overlap, got {:?}", other),
    }
}

#[test]
fn validate_rejects_inverted_range_and_blank_title() {
    let bad = tour("a", "2025-05-10", "2025-05-09");
    assert!(matches!(
        schedule::validate(&bad, &[]),
        Err(ScheduleError::InvertedRange { .. })
    ));
    let mut blank = tour("b", "2025-05-10", "2025-05-11");
    blank.title = "   ".into();
    assert_eq!(schedule::validate(&blank, &[]), Err(ScheduleError::EmptyTitle));
}

#[test]
fn quarters_follow_calendar_months() {
    assert_eq!(quarter_of(day("2025-01-01")), 1);
    assert_eq!(quarter_of(day("2025-03-31")), 1);
    assert_eq!(quarter_of(day("2025-04-01")), 2);
    assert_eq!(quarter_of(day("2025-09-30")), 3);
    assert_eq!(quarter_of(day("2025-12-31")), 4);
}

#[test]
fn quarterly_totals_add_up_to_grand_total() {
    let ts: Vec<Tournament> = (1..=12)
        .map(|m| {
            let start = NaiveDate::from_ymd_opt(2025, m, 3).unwrap();
            let mut t = Tournament::new("monthly", start, start);
            t.id = format!("m{}", m);
            t.budget = Some(Decimal::from(m * 100));
            t.currency = Some(Currency::TRY);
            t.rounds = Some(9);
            t
        })
        .collect();
    let q = aggregate_by_quarter(&ts, Currency::TRY, &rates());
    assert_eq!(q.get(1), d("600"));
    assert_eq!(q.get(2), d("1500"));
    assert_eq!(q.get(3), d("2400"));
    assert_eq!(q.get(4), d("3300"));
    assert_eq!(q.total(), d("7800"));

    let s = summarize(&ts, Currency::TRY, &rates());
    assert_eq!(s.total_tournaments, 12);
    assert_eq!(s.total_rounds, 108);
    assert_eq!(s.total_budget, q.total());
}

#[test]
fn detailed_budget_sums_in_summary_currency() {
    let r = rates();
    let mut t = tour("t", "2025-07-01", "2025-07-09");
    t.budget_source = BudgetSource::Detailed;
    t.summary_currency = Some(Currency::EUR);
    t.budget = Some(d("99999"));
    t.expenses = vec![
        ExpenseItem::new("1", "Hotel", d("100"), Currency::EUR),
        ExpenseItem::new("2", "Flight", d("50"), Currency::USD),
    ];
    let m = effective_budget(&t, &r).unwrap();
    assert_eq!(m.currency, Currency::EUR);
    assert_eq!(
        m.amount,
        d("100") + r.convert(d("50"), Currency::USD, Currency::EUR)
    );
}

#[test]
fn empty_detailed_budget_is_zero_not_the_basic_amount() {
    let mut t = tour("t", "2025-07-01", "2025-07-09");
    t.budget_source = BudgetSource::Detailed;
    t.budget = Some(d("500"));
    assert_eq!(budget_in(&t, Currency::TRY, &rates()), Decimal::ZERO);
    assert_eq!(effective_budget(&t, &rates()).unwrap().amount, Decimal::ZERO);
}

#[test]
fn missing_budget_counts_zero_but_still_counts() {
    let mut t = tour("t", "2025-02-01", "2025-02-05");
    t.rounds = Some(7);
    assert!(effective_budget(&t, &rates()).is_none());
    let s = summarize(&[t], Currency::USD, &rates());
    assert_eq!(s.total_tournaments, 1);
    assert_eq!(s.total_rounds, 7);
    assert_eq!(s.total_budget, Decimal::ZERO);
}

#[test]
fn countries_aggregate_in_requested_currency() {
    let mut a = tour("a", "2025-05-01", "2025-05-05");
    a.country = Some("Turkey".into());
    a.rounds = Some(9);
    a.budget = Some(d("1000"));
    let mut b = tour("b", "2025-02-01", "2025-02-03");
    b.country = Some("Turkey".into());
    b.rounds = Some(5);
    b.budget = Some(d("10"));
    b.currency = Some(Currency::USD);
    let mut c = tour("c", "2025-03-01", "2025-03-02");
    c.country = Some("Spain".into());
    let nowhere = tour("n", "2025-08-01", "2025-08-02");

    let stats = aggregate_by_country(&[a, b, c, nowhere], Currency::TRY, &rates());
    assert_eq!(stats.len(), 2);
    let tr = &stats["Turkey"];
    assert_eq!(tr.count, 2);
    assert_eq!(tr.total_rounds, 14);
    assert_eq!(tr.total_budget, d("1425"));
    assert_eq!(tr.tournaments, vec!["b".to_string(), "a".to_string()]);
    assert_eq!(stats["Spain"].total_budget, Decimal::ZERO);
}

#[test]
fn confirmed_filter_and_overview_split() {
    let mut going = tour("g", "2025-01-10", "2025-01-12");
    going.is_going = true;
    going.budget = Some(d("100"));
    going.currency = Some(Currency::EUR);
    let mut maybe = tour("m", "2025-10-10", "2025-10-12");
    maybe.budget = Some(d("4250"));

    let all = vec![going.clone(), maybe.clone()];
    let kept = FilterMode::Confirmed.apply(all.clone());
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].id, "g");
    assert_eq!(FilterMode::All.apply(all.clone()).len(), 2);
    assert_eq!("confirmed".parse::<FilterMode>().unwrap(), FilterMode::Confirmed);

    let fo = financial_overview(&all, Currency::USD, &rates());
    assert_eq!(fo.confirmed_count, 1);
    assert_eq!(fo.unknown_count, 1);
    assert_eq!(fo.total_count(), 2);
    assert_eq!(fo.quarter(4).unknown, d("100"));
    assert_eq!(fo.quarter(4).confirmed, Decimal::ZERO);
    assert_eq!(fo.quarter(1).confirmed, fo.confirmed_total);
    assert_eq!(fo.unknown_total, d("100"));
}

#[test]
fn huge_amounts_saturate_instead_of_panicking() {
    let big = d("50000000000000000000000000000");
    let mut detailed = tour("huge", "2025-02-01", "2025-02-03");
    detailed.budget_source = BudgetSource::Detailed;
    detailed.summary_currency = Some(Currency::TRY);
    detailed.rounds = Some(u32::MAX);
    detailed.expenses = vec![
        ExpenseItem::new("1", "Hotel", big, Currency::TRY),
        ExpenseItem::new("2", "Flight", big, Currency::TRY),
        ExpenseItem::new("3", "Fee", d("10000000000000000000000000000"), Currency::EUR),
    ];
    assert_eq!(effective_budget(&detailed, &rates()).unwrap().amount, Decimal::MAX);
    // the EUR line overflows on the way into TRY and counts 0
    assert_eq!(budget_in(&detailed, Currency::TRY, &rates()), Decimal::MAX);
    assert!(budget_in(&detailed, Currency::EUR, &rates()) > Decimal::ZERO);

    let mut basic = tour("also-huge", "2025-03-01", "2025-03-02");
    basic.country = Some("Spain".into());
    basic.budget = Some(big);
    basic.rounds = Some(9);
    basic.is_going = true;
    let mut twin = tour("twin", "2025-03-05", "2025-03-06");
    twin.country = Some("Spain".into());
    twin.budget = Some(big);
    twin.rounds = Some(u32::MAX);
    twin.is_going = true;
    let ts = vec![detailed, basic, twin];

    let s = summarize(&ts, Currency::TRY, &rates());
    assert_eq!(s.total_rounds, u32::MAX);
    assert_eq!(s.quarters.get(1), Decimal::MAX);
    assert_eq!(s.total_budget, Decimal::MAX);

    let by_country = aggregate_by_country(&ts, Currency::TRY, &rates());
    assert_eq!(by_country["Spain"].total_budget, Decimal::MAX);
    assert_eq!(by_country["Spain"].total_rounds, u32::MAX);

    let fo = financial_overview(&ts, Currency::TRY, &rates());
    assert_eq!(fo.confirmed_total, Decimal::MAX);
    assert_eq!(fo.quarter(1).unknown, Decimal::MAX);
}
