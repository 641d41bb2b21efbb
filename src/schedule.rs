// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Tournaments as closed date intervals: overlap checks, budget resolution and
//! the aggregations behind the stats and export views.

use crate::models::{BudgetSource, Currency, Tournament};
use crate::rates::RateTable;
use anyhow::anyhow;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ScheduleError {
    #[error("Tournament title must not be empty")]
    EmptyTitle,
    #[error("End date {end} cannot be earlier than start date {start}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
    #[error("Dates overlap with existing tournament \"{title}\" ({start} to {end})")]
    Overlap {
        id: String,
        title: String,
        start: NaiveDate,
        end: NaiveDate,
    },
}

/// `[a_start, a_end]` and `[b_start, b_end]` share at least one day.
pub fn intervals_intersect(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start <= b_end && a_end >= b_start
}

/// First tournament in `existing` sharing a day with `candidate`. An entry with
/// the candidate's own id is skipped so edits don't collide with themselves.
pub fn overlaps<'a>(candidate: &Tournament, existing: &'a [Tournament]) -> Option<&'a Tournament> {
    existing.iter().find(|t| {
        t.id != candidate.id
            && intervals_intersect(candidate.start_date, candidate.end_date, t.start_date, t.end_date)
    })
}

pub fn contains_date(t: &Tournament, date: NaiveDate) -> bool {
    date >= t.start_date && date <= t.end_date
}

pub fn tournament_on(tournaments: &[Tournament], date: NaiveDate) -> Option<&Tournament> {
    tournaments.iter().find(|t| contains_date(t, date))
}

/// Write-time checks. Nothing is persisted unless this passes.
pub fn validate(candidate: &Tournament, existing: &[Tournament]) -> Result<(), ScheduleError> {
    if candidate.title.trim().is_empty() {
        return Err(ScheduleError::EmptyTitle);
    }
    if candidate.end_date < candidate.start_date {
        return Err(ScheduleError::InvertedRange {
            start: candidate.start_date,
            end: candidate.end_date,
        });
    }
    if let Some(conflict) = overlaps(candidate, existing) {
        return Err(ScheduleError::Overlap {
            id: conflict.id.clone(),
            title: conflict.title.clone(),
            start: conflict.start_date,
            end: conflict.end_date,
        });
    }
    Ok(())
}

/// 1..=4
pub fn quarter_of(date: NaiveDate) -> u8 {
    (date.month0() / 3 + 1) as u8
}

pub fn sorted_by_start(mut tournaments: Vec<Tournament>) -> Vec<Tournament> {
    tournaments.sort_by(|a, b| a.start_date.cmp(&b.start_date).then(a.id.cmp(&b.id)));
    tournaments
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Money {
    pub amount: Decimal,
    pub currency: Currency,
}

/// Budget in its native currency, following `budget_source`.
///
/// Detailed budgets are the expense lines converted into the summary currency;
/// an empty list is a zero budget and does not fall back to the basic amount.
/// A basic budget without an amount is `None`.
pub fn effective_budget(t: &Tournament, rates: &RateTable) -> Option<Money> {
    match t.budget_source {
        BudgetSource::Detailed => {
            let currency = t.summary_currency();
            let amount = t
                .expenses
                .iter()
                .map(|e| rates.convert(e.counted_amount(), e.currency, currency))
                .fold(Decimal::ZERO, Decimal::saturating_add);
            Some(Money { amount, currency })
        }
        BudgetSource::Basic => t.budget.map(|b| Money {
            amount: b.max(Decimal::ZERO),
            currency: t.budget_currency(),
        }),
    }
}

/// Effective budget converted to `target`; no budget counts as 0.
pub fn budget_in(t: &Tournament, target: Currency, rates: &RateTable) -> Decimal {
    effective_budget(t, rates)
        .map(|m| rates.convert(m.amount, m.currency, target))
        .unwrap_or(Decimal::ZERO)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    #[default]
    All,
    Confirmed,
}

impl FilterMode {
    pub fn from_flag(confirmed_only: bool) -> Self {
        if confirmed_only {
            FilterMode::Confirmed
        } else {
            FilterMode::All
        }
    }

    pub fn apply(self, mut tournaments: Vec<Tournament>) -> Vec<Tournament> {
        if self == FilterMode::Confirmed {
            tournaments.retain(|t| t.is_going);
        }
        tournaments
    }
}

impl FromStr for FilterMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(FilterMode::All),
            "confirmed" => Ok(FilterMode::Confirmed),
            other => Err(anyhow!("Unknown filter '{}', expected all|confirmed", other)),
        }
    }
}

pub fn in_year(mut tournaments: Vec<Tournament>, year: Option<i32>) -> Vec<Tournament> {
    if let Some(y) = year {
        tournaments.retain(|t| t.year() == y);
    }
    tournaments
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct CountryStats {
    pub count: usize,
    pub total_rounds: u32,
    /// In the base currency passed to [`aggregate_by_country`].
    pub total_budget: Decimal,
    /// Ids ordered by start date.
    pub tournaments: Vec<String>,
}

pub fn aggregate_by_country(
    tournaments: &[Tournament],
    base: Currency,
    rates: &RateTable,
) -> BTreeMap<String, CountryStats> {
    let mut out: BTreeMap<String, CountryStats> = BTreeMap::new();
    let mut order: BTreeMap<String, Vec<(NaiveDate, String)>> = BTreeMap::new();
    for t in tournaments {
        let Some(country) = t.country.as_deref().filter(|c| !c.trim().is_empty()) else {
            continue;
        };
        let entry = out.entry(country.to_string()).or_default();
        entry.count += 1;
        entry.total_rounds = entry.total_rounds.saturating_add(t.rounds_or_zero());
        entry.total_budget = entry.total_budget.saturating_add(budget_in(t, base, rates));
        order
            .entry(country.to_string())
            .or_default()
            .push((t.start_date, t.id.clone()));
    }
    for (country, mut dated) in order {
        dated.sort();
        if let Some(stats) = out.get_mut(&country) {
            stats.tournaments = dated.into_iter().map(|(_, id)| id).collect();
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
pub struct QuarterTotals([Decimal; 4]);

impl QuarterTotals {
    /// `quarter` is 1..=4; anything else reads as 0.
    pub fn get(&self, quarter: u8) -> Decimal {
        match quarter {
            1..=4 => self.0[(quarter - 1) as usize],
            _ => Decimal::ZERO,
        }
    }

    fn add(&mut self, quarter: u8, amount: Decimal) {
        if let 1..=4 = quarter {
            let slot = &mut self.0[(quarter - 1) as usize];
            *slot = slot.saturating_add(amount);
        }
    }

    pub fn total(&self) -> Decimal {
        self.0.iter().copied().fold(Decimal::ZERO, Decimal::saturating_add)
    }
}

pub fn aggregate_by_quarter(
    tournaments: &[Tournament],
    display: Currency,
    rates: &RateTable,
) -> QuarterTotals {
    let mut q = QuarterTotals::default();
    for t in tournaments {
        q.add(quarter_of(t.start_date), budget_in(t, display, rates));
    }
    q
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_tournaments: usize,
    pub total_rounds: u32,
    pub total_budget: Decimal,
    pub currency: Currency,
    pub quarters: QuarterTotals,
}

pub fn summarize(tournaments: &[Tournament], display: Currency, rates: &RateTable) -> Summary {
    let quarters = aggregate_by_quarter(tournaments, display, rates);
    Summary {
        total_tournaments: tournaments.len(),
        total_rounds: tournaments
            .iter()
            .map(Tournament::rounds_or_zero)
            .fold(0, u32::saturating_add),
        total_budget: quarters.total(),
        currency: display,
        quarters,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
pub struct SplitTotals {
    pub confirmed: Decimal,
    pub unknown: Decimal,
}

/// Budget split by participation status, as printed next to the export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialOverview {
    pub currency: Currency,
    pub quarters: [SplitTotals; 4],
    pub confirmed_total: Decimal,
    pub unknown_total: Decimal,
    pub confirmed_count: usize,
    pub unknown_count: usize,
}

impl FinancialOverview {
    pub fn quarter(&self, q: u8) -> SplitTotals {
        match q {
            1..=4 => self.quarters[(q - 1) as usize],
            _ => SplitTotals::default(),
        }
    }

    pub fn total_count(&self) -> usize {
        self.confirmed_count + self.unknown_count
    }
}

pub fn financial_overview(
    tournaments: &[Tournament],
    currency: Currency,
    rates: &RateTable,
) -> FinancialOverview {
    let mut fo = FinancialOverview {
        currency,
        quarters: [SplitTotals::default(); 4],
        confirmed_total: Decimal::ZERO,
        unknown_total: Decimal::ZERO,
        confirmed_count: 0,
        unknown_count: 0,
    };
    for t in tournaments {
        let cost = budget_in(t, currency, rates);
        let slot = &mut fo.quarters[(quarter_of(t.start_date) - 1) as usize];
        if t.is_going {
            slot.confirmed = slot.confirmed.saturating_add(cost);
            fo.confirmed_total = fo.confirmed_total.saturating_add(cost);
            fo.confirmed_count += 1;
        } else {
            slot.unknown = slot.unknown.saturating_add(cost);
            fo.unknown_total = fo.unknown_total.saturating_add(cost);
            fo.unknown_count += 1;
        }
    }
    fo
}
