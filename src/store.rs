// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! JSON blobs in the `kv` table and the tournament writes built on them.
//!
//! Reads never fail: a missing or unreadable blob is the default value. Each
//! write replaces a whole blob.

use crate::countries;
use crate::models::{Currency, Tournament, UserStats};
use crate::schedule;
use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use thiserror::Error;

pub const TOURNAMENTS_KEY: &str = "tournaments_data";
pub const RATES_KEY: &str = "exchangeRatesInfo";
pub const COLORS_KEY: &str = "country_colors";
pub const USER_STATS_KEY: &str = "userChessStats";
pub const DISPLAY_CURRENCY_KEY: &str = "display_currency";

pub const DEFAULT_COLOR: &str = "#646cff";

static COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("static color pattern"));

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("Tournament '{0}' not found")]
    NotFound(String),
    #[error("Invalid color '{0}', expected #RRGGBB")]
    InvalidColor(String),
}

pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

impl KvStore for Connection {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let v = self
            .query_row("SELECT value FROM kv WHERE key=?1", params![key], |r| {
                r.get(0)
            })
            .optional()?;
        Ok(v)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.execute(
            "INSERT INTO kv(key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value, updated_at=datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }
}

pub fn load_json<T: DeserializeOwned + Default>(store: &dyn KvStore, key: &str) -> T {
    let raw = match store.get(key) {
        Ok(Some(s)) => s,
        Ok(None) => return T::default(),
        Err(e) => {
            log::warn!("failed to read '{}', using defaults: {:#}", key, e);
            return T::default();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(v) => v,
        Err(e) => {
            log::warn!("failed to parse cached '{}', using defaults: {}", key, e);
            T::default()
        }
    }
}

pub fn save_json<T: Serialize + ?Sized>(store: &dyn KvStore, key: &str, value: &T) -> Result<()> {
    let s = serde_json::to_string(value).with_context(|| format!("Serialize '{}'", key))?;
    store
        .set(key, &s)
        .with_context(|| format!("Failed to persist '{}'", key))
}

pub fn load_tournaments(store: &dyn KvStore) -> Vec<Tournament> {
    load_json(store, TOURNAMENTS_KEY)
}

pub fn find_tournament(store: &dyn KvStore, id: &str) -> Result<Tournament> {
    load_tournaments(store)
        .into_iter()
        .find(|t| t.id == id)
        .ok_or_else(|| StoreError::NotFound(id.to_string()).into())
}

/// Trims text fields, matches the country against the known list and drops
/// negative money.
fn normalize(mut t: Tournament) -> Tournament {
    t.title = t.title.trim().to_string();
    t.country = t
        .country
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .map(|c| match countries::canonical(&c) {
            Some(known) => known.to_string(),
            None => {
                log::warn!("country '{}' is not in the known list", c);
                c
            }
        });
    t.link = t
        .link
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty());
    t.budget = t.budget.map(|b| b.max(Decimal::ZERO));
    for e in &mut t.expenses {
        e.amount = e.counted_amount();
    }
    t
}

/// Validates against everything stored, assigns a fresh id and appends.
pub fn add_tournament(store: &dyn KvStore, draft: Tournament) -> Result<Tournament> {
    let mut all = load_tournaments(store);
    let mut t = normalize(draft);
    t.id = uuid::Uuid::new_v4().simple().to_string();
    schedule::validate(&t, &all)?;
    all.push(t.clone());
    save_json(store, TOURNAMENTS_KEY, &all)?;
    log::info!("added tournament {} ({} to {})", t.id, t.start_date, t.end_date);
    Ok(t)
}

/// Replaces the stored tournament with the same id.
pub fn update_tournament(store: &dyn KvStore, t: Tournament) -> Result<Tournament> {
    let mut all = load_tournaments(store);
    let t = normalize(t);
    let idx = all
        .iter()
        .position(|x| x.id == t.id)
        .ok_or_else(|| StoreError::NotFound(t.id.clone()))?;
    schedule::validate(&t, &all)?;
    all[idx] = t.clone();
    save_json(store, TOURNAMENTS_KEY, &all)?;
    log::info!("updated tournament {}", t.id);
    Ok(t)
}

/// Returns whether anything was removed.
pub fn delete_tournament(store: &dyn KvStore, id: &str) -> Result<bool> {
    let mut all = load_tournaments(store);
    let before = all.len();
    all.retain(|t| t.id != id);
    let removed = all.len() != before;
    save_json(store, TOURNAMENTS_KEY, &all)?;
    if removed {
        log::info!("deleted tournament {}", id);
    }
    Ok(removed)
}

pub fn load_colors(store: &dyn KvStore) -> BTreeMap<String, String> {
    load_json(store, COLORS_KEY)
}

pub fn color_for(colors: &BTreeMap<String, String>, country: &str) -> String {
    colors
        .get(country)
        .cloned()
        .unwrap_or_else(|| DEFAULT_COLOR.to_string())
}

pub fn set_color(store: &dyn KvStore, country: &str, color: &str) -> Result<()> {
    let color = color.trim();
    if !COLOR_RE.is_match(color) {
        return Err(StoreError::InvalidColor(color.to_string()).into());
    }
    let country = countries::canonical(country)
        .map(str::to_string)
        .unwrap_or_else(|| country.trim().to_string());
    let mut colors = load_colors(store);
    colors.insert(country, color.to_lowercase());
    save_json(store, COLORS_KEY, &colors)
}

pub fn remove_color(store: &dyn KvStore, country: &str) -> Result<bool> {
    let mut colors = load_colors(store);
    let key = countries::canonical(country).unwrap_or(country.trim());
    let removed = colors.remove(key).is_some();
    save_json(store, COLORS_KEY, &colors)?;
    Ok(removed)
}

pub fn load_user_stats(store: &dyn KvStore) -> UserStats {
    load_json(store, USER_STATS_KEY)
}

pub fn save_user_stats(store: &dyn KvStore, stats: UserStats) -> Result<UserStats> {
    let stats = stats.clamped();
    save_json(store, USER_STATS_KEY, &stats)?;
    Ok(stats)
}

pub fn get_display_currency(store: &dyn KvStore) -> Currency {
    match store.get(DISPLAY_CURRENCY_KEY) {
        Ok(Some(s)) => s.parse::<Currency>().unwrap_or_else(|e| {
            log::warn!("ignoring stored display currency: {:#}", e);
            Currency::BASE
        }),
        Ok(None) => Currency::BASE,
        Err(e) => {
            log::warn!("failed to read display currency: {:#}", e);
            Currency::BASE
        }
    }
}

pub fn set_display_currency(store: &dyn KvStore, ccy: Currency) -> Result<()> {
    store.set(DISPLAY_CURRENCY_KEY, ccy.code())
}
