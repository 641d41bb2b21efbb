// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Currency, ExpenseItem};
use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

const UA: &str = concat!(
    "chesscal/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/chesscal)"
);

pub fn http_client() -> Result<reqwest::blocking::Client> {
    let c = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .user_agent(UA)
        .build()?;
    Ok(c)
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn parse_currency(s: &str) -> Result<Currency> {
    s.parse::<Currency>()
}

pub fn parse_year(s: &str) -> Result<i32> {
    let y: i32 = s
        .trim()
        .parse()
        .with_context(|| format!("Invalid year '{}'", s))?;
    if !(1900..=2200).contains(&y) {
        return Err(anyhow!("Year {} out of range", y));
    }
    Ok(y)
}

// "Title=Amount CCY" with an optional trailing link
static EXPENSE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?P<title>[^=]+?)\s*=\s*(?P<amount>-?[0-9]+(?:\.[0-9]+)?)\s*(?P<ccy>[A-Za-z]{3})(?:\s+(?P<link>\S+))?\s*$")
        .expect("static expense pattern")
});

/// Parses an `--expense` value; `seq` becomes the item id.
pub fn parse_expense(s: &str, seq: usize) -> Result<ExpenseItem> {
    let caps = EXPENSE_RE
        .captures(s)
        .with_context(|| format!("Invalid expense '{}', expected \"Title=Amount CCY [link]\"", s))?;
    let amount = parse_decimal(&caps["amount"])?;
    let ccy = parse_currency(&caps["ccy"])?;
    let mut item = ExpenseItem::new(&seq.to_string(), &caps["title"], amount, ccy);
    item.link = caps.name("link").map(|m| m.as_str().to_string());
    Ok(item)
}

pub fn fmt_amount(d: Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
