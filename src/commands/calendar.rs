// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::year_filter;
use crate::models::Tournament;
use crate::schedule::{self, FilterMode, sorted_by_start};
use crate::selection::{Action, Click, Mode, Selection};
use crate::store::{self, KvStore};
use crate::utils::{parse_date, pretty_table};
use anyhow::{Result, anyhow};
use chrono::{Datelike, Local, NaiveDate};

pub fn handle(store: &dyn KvStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(store, sub)?,
        Some(("pick", sub)) => pick(store, sub)?,
        _ => {}
    }
    Ok(())
}

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

fn marker(i: usize) -> char {
    const MARKS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
    MARKS.get(i).map(|b| *b as char).unwrap_or('#')
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next.and_then(|n| n.pred_opt()).map(|d| d.day()).unwrap_or(31)
}

/// One text line per month; free days are `.`, occupied days carry the
/// tournament's marker.
pub fn render_year(year: i32, ts: &[Tournament]) -> Vec<String> {
    let mut lines = Vec::with_capacity(13);
    let ruler: String = (1..=31).map(|d| char::from(b'0' + (d % 10) as u8)).collect();
    lines.push(format!("     {}", ruler));
    for (mi, name) in MONTHS.iter().enumerate() {
        let month = mi as u32 + 1;
        let mut row = String::with_capacity(31);
        for day in 1..=days_in_month(year, month) {
            let c = NaiveDate::from_ymd_opt(year, month, day)
                .and_then(|d| ts.iter().position(|t| schedule::contains_date(t, d)))
                .map(marker)
                .unwrap_or('.');
            row.push(c);
        }
        lines.push(format!("{}  {}", name, row));
    }
    lines
}

fn show(store: &dyn KvStore, sub: &clap::ArgMatches) -> Result<()> {
    let year = year_filter(sub)?.unwrap_or_else(|| Local::now().year());
    let all = store::load_tournaments(store);
    let ts = sorted_by_start(FilterMode::from_flag(sub.get_flag("confirmed")).apply(all));
    let visible: Vec<Tournament> = ts
        .into_iter()
        .filter(|t| t.start_date.year() <= year && t.end_date.year() >= year)
        .collect();

    println!("{}", year);
    for line in render_year(year, &visible) {
        println!("{}", line);
    }
    if visible.is_empty() {
        return Ok(());
    }
    let colors = store::load_colors(store);
    let rows = visible
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let color = t
                .country
                .as_deref()
                .map(|c| store::color_for(&colors, c))
                .unwrap_or_else(|| store::DEFAULT_COLOR.to_string());
            vec![
                marker(i).to_string(),
                t.title.clone(),
                format!("{} to {}", t.start_date, t.end_date),
                t.country.clone().unwrap_or_default(),
                color,
                if t.is_going { "yes".into() } else { String::new() },
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["", "Title", "Dates", "Country", "Color", "Going"], rows)
    );
    Ok(())
}

fn pick(store: &dyn KvStore, sub: &clap::ArgMatches) -> Result<()> {
    let mode: Mode = sub.get_one::<String>("mode").unwrap().parse()?;
    let all = store::load_tournaments(store);
    let mut sel = Selection::new();
    sel.enter(mode);

    for raw in sub.get_many::<String>("click").into_iter().flatten() {
        let date = parse_date(raw)?;
        match sel.click(date, &all) {
            Click::Started(d) => println!("{}: start of new range", d),
            Click::Completed { start, end } => println!("{}: range {} to {}", date, start, end),
            Click::Marked { id } => println!("{}: marked {} for removal", date, id),
            Click::Opened { id } => {
                let t = store::find_tournament(store, &id)?;
                println!(
                    "{}: '{}' ({} to {}, id {})",
                    date, t.title, t.start_date, t.end_date, t.id
                );
            }
            Click::Ignored => println!("{}: nothing to do", date),
        }
    }

    if !sub.get_flag("confirm") {
        if let Some((start, end)) = sel.range() {
            println!("Selected {} to {}; pass --confirm to apply", start, end);
        }
        return Ok(());
    }
    match sel.confirm() {
        Some(Action::Create { start, end }) => {
            let title = sub
                .get_one::<String>("title")
                .ok_or_else(|| anyhow!("--title is required to create a tournament"))?;
            let t = store::add_tournament(store, Tournament::new(title, start, end))?;
            println!("Added '{}' {} to {} (id {})", t.title, t.start_date, t.end_date, t.id);
        }
        Some(Action::Delete { id }) => {
            if store::delete_tournament(store, &id)? {
                println!("Removed tournament {}", id);
            }
        }
        None => println!("Nothing selected"),
    }
    Ok(())
}
