// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::anyhow;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported currencies. TRY is the base every rate is expressed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[allow(clippy::upper_case_acronyms)]
pub enum Currency {
    TRY,
    USD,
    EUR,
}

impl Currency {
    pub const BASE: Currency = Currency::TRY;
    pub const ALL: [Currency; 3] = [Currency::TRY, Currency::USD, Currency::EUR];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::TRY => "TRY",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
        }
    }

    /// Symbol as rendered by en-US currency formatting; TRY has none there.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::TRY => "TRY",
            Currency::USD => "$",
            Currency::EUR => "€",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "TRY" => Ok(Currency::TRY),
            "USD" => Ok(Currency::USD),
            "EUR" => Ok(Currency::EUR),
            other => Err(anyhow!("Unknown currency '{}', expected TRY|USD|EUR", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TournamentType {
    Standart,
    Rapid,
    Blitz,
}

impl fmt::Display for TournamentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TournamentType::Standart => "standart",
            TournamentType::Rapid => "rapid",
            TournamentType::Blitz => "blitz",
        };
        f.write_str(s)
    }
}

impl FromStr for TournamentType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standart" | "standard" | "classical" => Ok(TournamentType::Standart),
            "rapid" => Ok(TournamentType::Rapid),
            "blitz" => Ok(TournamentType::Blitz),
            other => Err(anyhow!(
                "Unknown tournament type '{}', expected standart|rapid|blitz",
                other
            )),
        }
    }
}

/// Which budget representation of a tournament is authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetSource {
    #[default]
    Basic,
    Detailed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseItem {
    pub id: String,
    pub title: String,
    pub amount: Decimal,
    pub currency: Currency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl ExpenseItem {
    pub fn new(id: &str, title: &str, amount: Decimal, currency: Currency) -> Self {
        ExpenseItem {
            id: id.to_string(),
            title: title.to_string(),
            amount: amount.max(Decimal::ZERO),
            currency,
            link: None,
        }
    }

    /// Amount as it counts toward totals; negative values never reduce a budget.
    pub fn counted_amount(&self) -> Decimal {
        self.amount.max(Decimal::ZERO)
    }
}

/// The fixed categories a new detailed budget starts from.
pub fn default_expenses() -> Vec<ExpenseItem> {
    [
        ("1", "Plane tickets", Currency::TRY),
        ("2", "Entry fee", Currency::EUR),
        ("3", "Hotel/booking", Currency::EUR),
        ("4", "Food", Currency::TRY),
        ("5", "Transportation", Currency::TRY),
    ]
    .into_iter()
    .map(|(id, title, ccy)| ExpenseItem::new(id, title, Decimal::ZERO, ccy))
    .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub id: String,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<TournamentType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rounds: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
    #[serde(default)]
    pub expenses: Vec<ExpenseItem>,
    #[serde(default)]
    pub budget_source: BudgetSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_currency: Option<Currency>,
    #[serde(default)]
    pub is_going: bool,
}

impl Tournament {
    /// A bare tournament over `[start, end]`; the id is assigned when it is stored.
    pub fn new(title: &str, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Tournament {
            id: String::new(),
            title: title.to_string(),
            start_date,
            end_date,
            link: None,
            country: None,
            kind: None,
            rounds: None,
            budget: None,
            currency: None,
            expenses: Vec::new(),
            budget_source: BudgetSource::Basic,
            summary_currency: None,
            is_going: false,
        }
    }

    pub fn budget_currency(&self) -> Currency {
        self.currency.unwrap_or(Currency::BASE)
    }

    pub fn summary_currency(&self) -> Currency {
        self.summary_currency.unwrap_or(Currency::EUR)
    }

    pub fn year(&self) -> i32 {
        self.start_date.year()
    }

    pub fn rounds_or_zero(&self) -> u32 {
        self.rounds.unwrap_or(0)
    }

    /// Number of calendar days covered, both ends included.
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

/// Personal numbers shown next to the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    #[serde(default)]
    pub gm_norms: i64,
    #[serde(default)]
    pub im_norms: i64,
    #[serde(default)]
    pub fide_rating: i64,
}

impl UserStats {
    pub const MIN_RATING: i64 = 1000;
    pub const MAX_RATING: i64 = 3000;

    pub fn clamped(self) -> Self {
        UserStats {
            gm_norms: self.gm_norms.max(0),
            im_norms: self.im_norms.max(0),
            fide_rating: self.fide_rating.clamp(Self::MIN_RATING, Self::MAX_RATING),
        }
    }
}
