// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::rates::{RateService, RateSource, format_for_display};
use crate::store::{self, KvStore};
use crate::utils::{fmt_amount, maybe_print_json, parse_currency, parse_decimal, pretty_table};
use anyhow::Result;

pub fn handle(store: &dyn KvStore, service: &mut RateService, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(store, service, sub)?,
        Some(("refresh", sub)) => refresh(service, sub.get_flag("auto")),
        Some(("convert", sub)) => convert_amount(service, sub)?,
        Some(("set-display", sub)) => {
            let ccy = parse_currency(sub.get_one::<String>("currency").unwrap())?;
            store::set_display_currency(store, ccy)?;
            println!("Display currency set to {}", ccy);
        }
        _ => {}
    }
    Ok(())
}

fn show(store: &dyn KvStore, service: &RateService, sub: &clap::ArgMatches) -> Result<()> {
    let info = service.get();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), info)? {
        return Ok(());
    }
    let rows = info
        .rates
        .iter()
        .map(|(ccy, rate)| {
            let shown = if rate.is_zero() {
                "-".to_string()
            } else {
                format!("{:.4}", rate)
            };
            vec![ccy.to_string(), shown]
        })
        .collect();
    println!("{}", pretty_table(&["Currency", "TRY per unit"], rows));
    let updated = info
        .last_updated_at()
        .map(|d| d.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "never".into());
    let source = match info.source {
        RateSource::Default => "defaults",
        RateSource::Live => "live",
    };
    println!("Source: {}, last updated: {}", source, updated);
    println!("Display currency: {}", store::get_display_currency(store));
    Ok(())
}

fn refresh(service: &mut RateService, auto: bool) {
    if service.refresh(auto) {
        println!("Exchange rates updated.");
    } else if auto && service.is_fresh() {
        println!("Exchange rates are less than a day old; nothing to do.");
    } else {
        println!("Could not update exchange rates; keeping the cached values.");
    }
}

fn convert_amount(service: &RateService, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let from = parse_currency(sub.get_one::<String>("from").unwrap())?;
    let to = parse_currency(sub.get_one::<String>("to").unwrap())?;
    let res = service.convert(amount, from, to);
    println!(
        "{} {} -> {} {} ({})",
        fmt_amount(amount),
        from,
        fmt_amount(res),
        to,
        format_for_display(res, to)
    );
    Ok(())
}
