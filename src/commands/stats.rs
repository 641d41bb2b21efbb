// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{currency_or_display, year_filter};
use crate::models::Tournament;
use crate::rates::{RateTable, format_for_display, load_rate_info};
use crate::schedule::{self, FilterMode};
use crate::store::{self, KvStore};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(store: &dyn KvStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(store, sub)?,
        Some(("countries", sub)) => countries(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn selected(store: &dyn KvStore, sub: &clap::ArgMatches) -> Result<Vec<Tournament>> {
    let all = store::load_tournaments(store);
    let ts = schedule::in_year(all, year_filter(sub)?);
    Ok(FilterMode::from_flag(sub.get_flag("confirmed")).apply(ts))
}

fn warn_if_unrated(rates: &RateTable) {
    if !rates.is_complete() {
        eprintln!("Exchange rates unavailable; converted amounts are 0. Run `chesscal fx refresh`.");
    }
}

fn summary(store: &dyn KvStore, sub: &clap::ArgMatches) -> Result<()> {
    let ts = selected(store, sub)?;
    let ccy = currency_or_display(store, sub)?;
    let rates = load_rate_info(store).rates;
    let s = schedule::summarize(&ts, ccy, &rates);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        return Ok(());
    }
    warn_if_unrated(&rates);

    let mut rows = vec![
        vec!["Tournaments".into(), s.total_tournaments.to_string()],
        vec!["Rounds".into(), s.total_rounds.to_string()],
    ];
    for q in 1..=4u8 {
        rows.push(vec![
            format!("Q{}", q),
            format_for_display(s.quarters.get(q), ccy),
        ]);
    }
    rows.push(vec![
        format!("Total ({})", ccy),
        format_for_display(s.total_budget, ccy),
    ]);
    println!("{}", pretty_table(&["Metric", "Value"], rows));
    Ok(())
}

#[derive(Debug, Serialize)]
struct CountryRow {
    country: String,
    count: usize,
    rounds: u32,
    budget: Decimal,
    currency: String,
    tournaments: Vec<String>,
}

fn countries(store: &dyn KvStore, sub: &clap::ArgMatches) -> Result<()> {
    let ts = selected(store, sub)?;
    let ccy = currency_or_display(store, sub)?;
    let rates = load_rate_info(store).rates;
    let data: Vec<CountryRow> = schedule::aggregate_by_country(&ts, ccy, &rates)
        .into_iter()
        .map(|(country, st)| CountryRow {
            country,
            count: st.count,
            rounds: st.total_rounds,
            budget: st.total_budget,
            currency: ccy.to_string(),
            tournaments: st.tournaments,
        })
        .collect();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    warn_if_unrated(&rates);

    let titles: std::collections::HashMap<&str, &str> =
        ts.iter().map(|t| (t.id.as_str(), t.title.as_str())).collect();
    let rows = data
        .iter()
        .map(|r| {
            vec![
                r.country.clone(),
                r.count.to_string(),
                r.rounds.to_string(),
                format_for_display(r.budget, ccy),
                r.tournaments
                    .iter()
                    .filter_map(|id| titles.get(id.as_str()).copied())
                    .collect::<Vec<_>>()
                    .join(", "),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Country", "Tournaments", "Rounds", "Budget", "Events"],
            rows
        )
    );
    Ok(())
}
