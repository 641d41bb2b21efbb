// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::countries;
use crate::store::{self, KvStore};
use crate::utils::pretty_table;
use anyhow::Result;

pub fn handle(store: &dyn KvStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let country = sub.get_one::<String>("country").unwrap();
            let color = sub.get_one::<String>("color").unwrap();
            if countries::canonical(country).is_none() {
                let hints = countries::suggest(country);
                if hints.is_empty() {
                    eprintln!("Note: '{}' is not a known country name", country.trim());
                } else {
                    eprintln!("Note: '{}' is not a known country; did you mean {}?", country.trim(), hints.join(", "));
                }
            }
            store::set_color(store, country, color)?;
            println!("Color for {} set to {}", country.trim(), color.trim().to_lowercase());
        }
        Some(("list", _)) => list(store),
        Some(("rm", sub)) => {
            let country = sub.get_one::<String>("country").unwrap();
            if store::remove_color(store, country)? {
                println!("Removed color for {}", country.trim());
            } else {
                println!("No color stored for {}; it uses {}", country.trim(), store::DEFAULT_COLOR);
            }
        }
        _ => {}
    }
    Ok(())
}

fn list(store: &dyn KvStore) {
    let colors = store::load_colors(store);
    let mut names: Vec<String> = store::load_tournaments(store)
        .into_iter()
        .filter_map(|t| t.country)
        .collect();
    names.extend(colors.keys().cloned());
    names.sort();
    names.dedup();
    let rows = names
        .into_iter()
        .map(|c| {
            let code = countries::code_for(&c).unwrap_or("").to_string();
            let color = store::color_for(&colors, &c);
            let origin = if colors.contains_key(&c) { "custom" } else { "default" };
            vec![c, code, color, origin.to_string()]
        })
        .collect();
    println!("{}", pretty_table(&["Country", "Code", "Color", ""], rows));
}
