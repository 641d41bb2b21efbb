// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::env;
use std::path::PathBuf;

pub const DEFAULT_RATES_URL: &str = "https://api.fxratesapi.com/latest";

/// Runtime settings taken from the environment.
///
/// * `CHESSCAL_DB` overrides the SQLite file location.
/// * `FXRATES_API_KEY` is appended to rate requests when set.
/// * `CHESSCAL_RATES_URL` points rate requests at another endpoint.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub db_path: Option<PathBuf>,
    pub api_key: Option<String>,
    pub rates_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            db_path: non_empty_var("CHESSCAL_DB").map(PathBuf::from),
            api_key: non_empty_var("FXRATES_API_KEY")
                .filter(|k| k != "YOUR_ACCESS_TOKEN_HERE"),
            rates_url: non_empty_var("CHESSCAL_RATES_URL"),
        }
    }

    pub fn rates_url(&self) -> &str {
        self.rates_url.as_deref().unwrap_or(DEFAULT_RATES_URL)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
