// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::UserStats;
use crate::store::{self, KvStore};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle(store: &dyn KvStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => {
            let stats = store::load_user_stats(store);
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &stats)? {
                print_stats(&stats);
            }
        }
        Some(("set", sub)) => {
            let mut stats = store::load_user_stats(store);
            if let Some(n) = sub.get_one::<i64>("gm-norms") {
                stats.gm_norms = *n;
            }
            if let Some(n) = sub.get_one::<i64>("im-norms") {
                stats.im_norms = *n;
            }
            if let Some(r) = sub.get_one::<i64>("rating") {
                stats.fide_rating = *r;
            }
            let saved = store::save_user_stats(store, stats)?;
            if saved != stats {
                eprintln!(
                    "Values adjusted: norms are at least 0, rating is kept within {}..{}",
                    UserStats::MIN_RATING,
                    UserStats::MAX_RATING
                );
            }
            print_stats(&saved);
        }
        _ => {}
    }
    Ok(())
}

fn print_stats(stats: &UserStats) {
    let rating = if stats.fide_rating == 0 {
        "-".to_string()
    } else {
        stats.fide_rating.to_string()
    };
    let rows = vec![
        vec!["GM norms".to_string(), stats.gm_norms.to_string()],
        vec!["IM norms".to_string(), stats.im_norms.to_string()],
        vec!["FIDE rating".to_string(), rating],
    ];
    println!("{}", pretty_table(&["", ""], rows));
}
