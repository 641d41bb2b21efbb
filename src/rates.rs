// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Exchange rates against the base currency and the service that keeps them fresh.
//!
//! Internally a rate reads "1 unit of X = rate TRY". The upstream API quotes the
//! other way round ("1 TRY = x units of X"), so fetched values are inverted once,
//! in [`reciprocal_rates`], and nowhere else.

use crate::config::Config;
use crate::models::Currency;
use crate::store::{self, KvStore};
use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

pub const ONE_DAY_MS: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateTable(BTreeMap<Currency, Decimal>);

impl Default for RateTable {
    /// Base at 1, everything else 0 until the first successful fetch.
    fn default() -> Self {
        RateTable::from_rates(Decimal::ZERO, Decimal::ZERO)
    }
}

impl RateTable {
    /// Table from the TRY value of one USD and one EUR.
    pub fn from_rates(usd: Decimal, eur: Decimal) -> Self {
        let mut m = BTreeMap::new();
        m.insert(Currency::TRY, Decimal::ONE);
        m.insert(Currency::USD, usd);
        m.insert(Currency::EUR, eur);
        RateTable(m)
    }

    pub fn rate(&self, ccy: Currency) -> Option<Decimal> {
        self.0.get(&ccy).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Currency, Decimal)> + '_ {
        self.0.iter().map(|(c, r)| (*c, *r))
    }

    /// Forces the base currency back to exactly 1.
    pub fn normalized(mut self) -> Self {
        self.0.insert(Currency::BASE, Decimal::ONE);
        self
    }

    /// True once every supported currency has a usable rate.
    pub fn is_complete(&self) -> bool {
        Currency::ALL
            .iter()
            .all(|c| self.rate(*c).is_some_and(|r| r > Decimal::ZERO))
    }

    /// Pivot through the base currency. Missing or zero rates and overflow give 0
    /// instead of an error.
    pub fn convert(&self, amount: Decimal, from: Currency, to: Currency) -> Decimal {
        if from == to {
            return amount;
        }
        let (Some(rate_from), Some(rate_to)) = (self.rate(from), self.rate(to)) else {
            return Decimal::ZERO;
        };
        if rate_from.is_zero() || rate_to.is_zero() {
            return Decimal::ZERO;
        }
        amount
            .checked_mul(rate_from)
            .and_then(|in_base| in_base.checked_div(rate_to))
            .unwrap_or(Decimal::ZERO)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RateSource {
    #[default]
    Default,
    Live,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateInfo {
    pub rates: RateTable,
    /// Milliseconds since the Unix epoch; 0 means never fetched.
    pub last_updated: i64,
    pub source: RateSource,
}

impl RateInfo {
    pub fn last_updated_at(&self) -> Option<DateTime<Utc>> {
        if self.last_updated <= 0 {
            return None;
        }
        Utc.timestamp_millis_opt(self.last_updated).single()
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum RateError {
    #[error("rate API reported failure")]
    Unsuccessful,
    #[error("rate API response has no rate for {0}")]
    Missing(Currency),
    #[error("rate API returned unusable rate {rate} for {currency}")]
    Unusable { currency: Currency, rate: f64 },
}

pub trait Clock {
    fn now_millis(&self) -> i64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Source of "1 base = x quote" rates keyed by ISO code.
pub trait RateProvider {
    fn latest(&self, base: Currency) -> Result<HashMap<String, f64>>;
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    success: bool,
    #[serde(default)]
    rates: Option<HashMap<String, f64>>,
}

/// fxratesapi.com `latest` endpoint.
pub struct FxRatesApi {
    client: reqwest::blocking::Client,
    url: String,
    api_key: Option<String>,
}

impl FxRatesApi {
    pub fn new(config: &Config) -> Result<Self> {
        if config.api_key.is_none() {
            log::warn!("FXRATES_API_KEY not set; rates may be limited or cached upstream");
        }
        Ok(FxRatesApi {
            client: crate::utils::http_client()?,
            url: config.rates_url().to_string(),
            api_key: config.api_key.clone(),
        })
    }
}

impl RateProvider for FxRatesApi {
    fn latest(&self, base: Currency) -> Result<HashMap<String, f64>> {
        let mut query = vec![("base", base.code().to_string())];
        if let Some(key) = &self.api_key {
            query.push(("api_key", key.clone()));
        }
        log::info!("fetching live currency rates from {}", self.url);
        let resp = self
            .client
            .get(&self.url)
            .query(&query)
            .send()?
            .error_for_status()?;
        let body: LatestResponse = resp.json().context("Unexpected rate API response")?;
        if !body.success {
            return Err(RateError::Unsuccessful.into());
        }
        body.rates.ok_or_else(|| anyhow!(RateError::Unsuccessful))
    }
}

/// Turns API quotes (1 TRY = x X) into table rates (1 X = 1/x TRY).
pub fn reciprocal_rates(api: &HashMap<String, f64>) -> Result<RateTable, RateError> {
    let invert = |ccy: Currency| -> Result<Decimal, RateError> {
        let raw = *api.get(ccy.code()).ok_or(RateError::Missing(ccy))?;
        let unusable = RateError::Unusable {
            currency: ccy,
            rate: raw,
        };
        if !raw.is_finite() || raw <= 0.0 {
            return Err(unusable);
        }
        let quote = Decimal::try_from(raw).map_err(|_| RateError::Unusable {
            currency: ccy,
            rate: raw,
        })?;
        Decimal::ONE.checked_div(quote).ok_or(unusable)
    };
    let usd = invert(Currency::USD)?;
    let eur = invert(Currency::EUR)?;
    Ok(RateTable::from_rates(usd, eur))
}

/// Owns the cached [`RateInfo`]. Loaded from the store on construction and only
/// replaced by a successful [`RateService::refresh`].
pub struct RateService<'a> {
    store: &'a dyn KvStore,
    clock: Box<dyn Clock + 'a>,
    provider: Box<dyn RateProvider + 'a>,
    info: RateInfo,
}

impl<'a> RateService<'a> {
    pub fn new(
        store: &'a dyn KvStore,
        clock: Box<dyn Clock + 'a>,
        provider: Box<dyn RateProvider + 'a>,
    ) -> Self {
        let info = load_rate_info(store);
        RateService {
            store,
            clock,
            provider,
            info,
        }
    }

    pub fn get(&self) -> &RateInfo {
        &self.info
    }

    pub fn convert(&self, amount: Decimal, from: Currency, to: Currency) -> Decimal {
        self.info.rates.convert(amount, from, to)
    }

    pub fn is_fresh(&self) -> bool {
        self.clock.now_millis() - self.info.last_updated < ONE_DAY_MS
    }

    /// Fetches live rates. In auto mode a cache younger than a day is kept and
    /// nothing is requested. Returns whether the cache was replaced; failures
    /// leave the previous rates in place.
    pub fn refresh(&mut self, auto: bool) -> bool {
        if auto && self.is_fresh() {
            log::info!(
                "currency rates are fresh (updated {}), skipping auto-fetch",
                self.info
                    .last_updated_at()
                    .map(|d| d.to_rfc3339())
                    .unwrap_or_else(|| "never".into())
            );
            return false;
        }

        let quotes = match self.provider.latest(Currency::BASE) {
            Ok(q) => q,
            Err(e) => {
                log::error!("failed to fetch exchange rates: {:#}", e);
                return false;
            }
        };
        let rates = match reciprocal_rates(&quotes) {
            Ok(r) => r,
            Err(e) => {
                log::warn!("ignoring rate API response: {}", e);
                return false;
            }
        };

        let next = RateInfo {
            rates,
            last_updated: self.clock.now_millis(),
            source: RateSource::Live,
        };
        if let Err(e) = store::save_json(self.store, store::RATES_KEY, &next) {
            log::error!("failed to cache exchange rates: {:#}", e);
            return false;
        }
        log::info!("currency rates updated: {:?}", next.rates);
        self.info = next;
        true
    }
}

pub fn load_rate_info(store: &dyn KvStore) -> RateInfo {
    let mut info: RateInfo = store::load_json(store, store::RATES_KEY);
    info.rates = info.rates.normalized();
    info
}

/// Whole units, en-US grouping, currency symbol in front. Independent of the
/// user's locale so exported figures always look the same.
pub fn format_for_display(amount: Decimal, ccy: Currency) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    match ccy {
        Currency::TRY => format!("{}{} {}", sign, ccy.symbol(), grouped),
        _ => format!("{}{}{}", sign, ccy.symbol(), grouped),
    }
}
