// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{currency_or_display, year_filter};
use crate::models::{BudgetSource, ExpenseItem, Tournament, default_expenses};
use crate::rates::{format_for_display, load_rate_info};
use crate::schedule::{self, FilterMode, effective_budget, sorted_by_start};
use crate::store::{self, KvStore};
use crate::utils::{
    maybe_print_json, parse_currency, parse_date, parse_decimal, parse_expense, pretty_table,
};
use anyhow::{Result, anyhow};

pub fn handle(store: &dyn KvStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("edit", sub)) => edit(store, sub)?,
        Some(("rm", sub)) => rm(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("show", sub)) => show(store, sub)?,
        Some(("on", sub)) => on(store, sub)?,
        _ => {}
    }
    Ok(())
}

/// Full id, or a prefix matching exactly one stored tournament.
pub fn resolve_id(store: &dyn KvStore, needle: &str) -> Result<String> {
    let needle = needle.trim();
    let all = store::load_tournaments(store);
    if all.iter().any(|t| t.id == needle) {
        return Ok(needle.to_string());
    }
    let hits: Vec<&Tournament> = all.iter().filter(|t| t.id.starts_with(needle)).collect();
    match hits.as_slice() {
        [one] => Ok(one.id.clone()),
        [] => Err(store::StoreError::NotFound(needle.to_string()).into()),
        _ => Err(anyhow!("Id prefix '{}' matches {} tournaments", needle, hits.len())),
    }
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// Folds `--expense` items into `list`: same title (case-insensitive) updates
/// the line, anything else is appended.
fn merge_expenses(list: &mut Vec<ExpenseItem>, items: Vec<ExpenseItem>) {
    for item in items {
        if let Some(existing) = list
            .iter_mut()
            .find(|e| e.title.eq_ignore_ascii_case(&item.title))
        {
            existing.amount = item.amount;
            existing.currency = item.currency;
            if item.link.is_some() {
                existing.link = item.link;
            }
            continue;
        }
        let next = list
            .iter()
            .filter_map(|e| e.id.parse::<usize>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        list.push(ExpenseItem {
            id: next.to_string(),
            ..item
        });
    }
}

/// Applies every option present on the command line to `t`.
fn apply_fields(t: &mut Tournament, sub: &clap::ArgMatches) -> Result<()> {
    if let Some(title) = sub.get_one::<String>("title") {
        t.title = title.trim().to_string();
    }
    if let Some(s) = sub.get_one::<String>("start") {
        t.start_date = parse_date(s)?;
    }
    if let Some(s) = sub.get_one::<String>("end") {
        t.end_date = parse_date(s)?;
    }
    if let Some(c) = sub.get_one::<String>("country") {
        t.country = Some(c.clone());
    }
    if let Some(k) = sub.get_one::<String>("type") {
        t.kind = Some(k.parse()?);
    }
    if let Some(r) = sub.get_one::<u32>("rounds") {
        t.rounds = Some(*r);
    }
    if let Some(b) = sub.get_one::<String>("budget") {
        t.budget = Some(parse_decimal(b)?);
    }
    if let Some(c) = sub.get_one::<String>("budget-currency") {
        t.currency = Some(parse_currency(c)?);
    }
    if let Some(c) = sub.get_one::<String>("summary-currency") {
        t.summary_currency = Some(parse_currency(c)?);
    }
    if let Some(l) = sub.get_one::<String>("link") {
        t.link = Some(l.clone());
    }
    if sub.get_flag("default-expenses") && t.expenses.is_empty() {
        t.expenses = default_expenses();
    }
    let items = sub
        .get_many::<String>("expense")
        .map(|vals| {
            vals.enumerate()
                .map(|(i, v)| parse_expense(v, i + 1))
                .collect::<Result<Vec<_>>>()
        })
        .transpose()?
        .unwrap_or_default();
    merge_expenses(&mut t.expenses, items);
    if sub.get_flag("detailed") {
        t.budget_source = BudgetSource::Detailed;
    }
    if sub.get_flag("going") {
        t.is_going = true;
    }
    Ok(())
}

fn add(store: &dyn KvStore, sub: &clap::ArgMatches) -> Result<()> {
    let title = sub.get_one::<String>("title").unwrap();
    let start = parse_date(sub.get_one::<String>("start").unwrap())?;
    let end = parse_date(sub.get_one::<String>("end").unwrap())?;
    let mut draft = Tournament::new(title, start, end);
    apply_fields(&mut draft, sub)?;
    // Itemized costs without a lump sum mean the user budgets in detail.
    if !draft.expenses.is_empty() && draft.budget.is_none() {
        draft.budget_source = BudgetSource::Detailed;
    }
    let t = store::add_tournament(store, draft)?;
    println!(
        "Added '{}' {} to {} (id {})",
        t.title, t.start_date, t.end_date, t.id
    );
    Ok(())
}

fn edit(store: &dyn KvStore, sub: &clap::ArgMatches) -> Result<()> {
    let id = resolve_id(store, sub.get_one::<String>("id").unwrap())?;
    let mut t = store::find_tournament(store, &id)?;
    if sub.get_flag("clear-expenses") {
        t.expenses.clear();
    }
    apply_fields(&mut t, sub)?;
    if sub.get_flag("basic") {
        t.budget_source = BudgetSource::Basic;
    }
    if sub.get_flag("not-going") {
        t.is_going = false;
    }
    let t = store::update_tournament(store, t)?;
    println!("Updated '{}' ({})", t.title, short_id(&t.id));
    Ok(())
}

fn rm(store: &dyn KvStore, sub: &clap::ArgMatches) -> Result<()> {
    let id = resolve_id(store, sub.get_one::<String>("id").unwrap())?;
    if store::delete_tournament(store, &id)? {
        println!("Removed tournament {}", short_id(&id));
    }
    Ok(())
}

fn query(store: &dyn KvStore, sub: &clap::ArgMatches) -> Result<Vec<Tournament>> {
    let all = store::load_tournaments(store);
    let mut ts = schedule::in_year(all, year_filter(sub)?);
    ts = FilterMode::from_flag(sub.get_flag("confirmed")).apply(ts);
    if let Some(c) = sub.get_one::<String>("country") {
        ts.retain(|t| {
            t.country
                .as_deref()
                .is_some_and(|tc| tc.eq_ignore_ascii_case(c.trim()))
        });
    }
    Ok(sorted_by_start(ts))
}

fn list(store: &dyn KvStore, sub: &clap::ArgMatches) -> Result<()> {
    let ts = query(store, sub)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &ts)? {
        return Ok(());
    }
    let rates = load_rate_info(store).rates;
    let rows = ts
        .iter()
        .map(|t| {
            let budget = effective_budget(t, &rates)
                .map(|m| format_for_display(m.amount, m.currency))
                .unwrap_or_default();
            vec![
                short_id(&t.id).to_string(),
                t.start_date.to_string(),
                t.end_date.to_string(),
                t.title.clone(),
                t.country.clone().unwrap_or_default(),
                t.kind.map(|k| k.to_string()).unwrap_or_default(),
                t.rounds.map(|r| r.to_string()).unwrap_or_default(),
                budget,
                if t.is_going { "yes".into() } else { String::new() },
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Id", "Start", "End", "Title", "Country", "Type", "Rounds", "Budget", "Going"],
            rows
        )
    );
    Ok(())
}

fn show(store: &dyn KvStore, sub: &clap::ArgMatches) -> Result<()> {
    let id = resolve_id(store, sub.get_one::<String>("id").unwrap())?;
    let t = store::find_tournament(store, &id)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &t)? {
        return Ok(());
    }
    let rates = load_rate_info(store).rates;
    let target = currency_or_display(store, sub)?;

    let source = match t.budget_source {
        BudgetSource::Basic => "basic",
        BudgetSource::Detailed => "detailed",
    };
    let native = effective_budget(&t, &rates);
    let mut rows = vec![
        vec!["Id".into(), t.id.clone()],
        vec!["Title".into(), t.title.clone()],
        vec![
            "Dates".into(),
            format!("{} to {} ({} days)", t.start_date, t.end_date, t.duration_days()),
        ],
        vec![
            "Quarter".into(),
            format!("Q{} {}", schedule::quarter_of(t.start_date), t.year()),
        ],
        vec!["Country".into(), t.country.clone().unwrap_or_default()],
        vec![
            "Type".into(),
            t.kind.map(|k| k.to_string()).unwrap_or_default(),
        ],
        vec![
            "Rounds".into(),
            t.rounds.map(|r| r.to_string()).unwrap_or_default(),
        ],
        vec!["Budget source".into(), source.into()],
        vec![
            "Budget".into(),
            native
                .map(|m| format_for_display(m.amount, m.currency))
                .unwrap_or_else(|| "-".into()),
        ],
        vec![
            format!("Budget ({})", target),
            format_for_display(schedule::budget_in(&t, target, &rates), target),
        ],
        vec![
            "Going".into(),
            if t.is_going { "yes" } else { "no" }.into(),
        ],
        vec!["Link".into(), t.link.clone().unwrap_or_default()],
    ];
    if !rates.is_complete() {
        rows.push(vec![
            "Note".into(),
            "exchange rates not fetched yet; converted amounts show 0".into(),
        ]);
    }
    println!("{}", pretty_table(&["Field", "Value"], rows));

    if !t.expenses.is_empty() {
        let summary = t.summary_currency();
        let lines = t
            .expenses
            .iter()
            .map(|e| {
                vec![
                    e.title.clone(),
                    format_for_display(e.amount, e.currency),
                    format_for_display(rates.convert(e.amount, e.currency, summary), summary),
                    e.link.clone().unwrap_or_default(),
                ]
            })
            .collect();
        let hdr = format!("In {}", summary);
        println!(
            "{}",
            pretty_table(&["Expense", "Amount", hdr.as_str(), "Link"], lines)
        );
    }
    Ok(())
}

fn on(store: &dyn KvStore, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let all = store::load_tournaments(store);
    match schedule::tournament_on(&all, date) {
        Some(t) => println!(
            "{}: '{}' ({} to {}, id {})",
            date,
            t.title,
            t.start_date,
            t.end_date,
            short_id(&t.id)
        ),
        None => println!("{}: no tournament", date),
    }
    Ok(())
}
