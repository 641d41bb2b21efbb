// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Date picking on the year grid.
//!
//! `View` is where every interaction starts and ends. `Add` collects a start
//! and an end day on free dates, `Delete` marks an existing tournament.
//! `cancel` always goes back to `View`.

use crate::models::Tournament;
use crate::schedule::tournament_on;
use anyhow::anyhow;
use chrono::NaiveDate;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    View,
    Add,
    Delete,
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "view" => Ok(Mode::View),
            "add" => Ok(Mode::Add),
            "delete" => Ok(Mode::Delete),
            other => Err(anyhow!("Unknown mode '{}', expected view|add|delete", other)),
        }
    }
}

/// What a single click did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Click {
    Started(NaiveDate),
    Completed { start: NaiveDate, end: NaiveDate },
    Marked { id: String },
    Opened { id: String },
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Create { start: NaiveDate, end: NaiveDate },
    Delete { id: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    mode: Mode,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    delete_id: Option<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn range(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.start.map(|s| (s, self.end.unwrap_or(s)))
    }

    pub fn marked(&self) -> Option<&str> {
        self.delete_id.as_deref()
    }

    /// Switching mode drops whatever was selected before.
    pub fn enter(&mut self, mode: Mode) {
        *self = Selection {
            mode,
            ..Selection::default()
        };
    }

    pub fn cancel(&mut self) {
        self.enter(Mode::View);
    }

    pub fn click(&mut self, date: NaiveDate, tournaments: &[Tournament]) -> Click {
        if let Some(t) = tournament_on(tournaments, date) {
            return match self.mode {
                Mode::Delete => {
                    self.start = Some(t.start_date);
                    self.end = Some(t.end_date);
                    self.delete_id = Some(t.id.clone());
                    Click::Marked { id: t.id.clone() }
                }
                Mode::View => Click::Opened { id: t.id.clone() },
                Mode::Add => Click::Ignored,
            };
        }

        if self.mode != Mode::Add {
            return Click::Ignored;
        }
        match (self.start, self.end) {
            (Some(start), None) => {
                let (start, end) = if date < start { (date, start) } else { (start, date) };
                self.start = Some(start);
                self.end = Some(end);
                Click::Completed { start, end }
            }
            _ => {
                self.start = Some(date);
                self.end = None;
                Click::Started(date)
            }
        }
    }

    /// Hands out the pending action and returns to `View`. Add needs both ends
    /// picked (click a day twice for a one-day event). With nothing to apply
    /// the mode is kept and `None` comes back.
    pub fn confirm(&mut self) -> Option<Action> {
        let action = match self.mode {
            Mode::Add => match (self.start, self.end) {
                (Some(start), Some(end)) => Some(Action::Create { start, end }),
                _ => None,
            },
            Mode::Delete => self.delete_id.clone().map(|id| Action::Delete { id }),
            Mode::View => None,
        }?;
        self.cancel();
        Some(action)
    }
}
