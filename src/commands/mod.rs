// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod calendar;
pub mod colors;
pub mod exporter;
pub mod fx;
pub mod profile;
pub mod stats;
pub mod tournaments;

use crate::models::Currency;
use crate::store::{self, KvStore};
use crate::utils::parse_currency;
use anyhow::Result;

/// `--currency` when given, otherwise the stored display currency.
pub fn currency_or_display(store: &dyn KvStore, sub: &clap::ArgMatches) -> Result<Currency> {
    match sub.get_one::<String>("currency") {
        Some(c) => parse_currency(c),
        None => Ok(store::get_display_currency(store)),
    }
}

pub fn year_filter(sub: &clap::ArgMatches) -> Result<Option<i32>> {
    sub.get_one::<String>("year")
        .map(|y| crate::utils::parse_year(y))
        .transpose()
}
