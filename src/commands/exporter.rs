// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{currency_or_display, year_filter};
use crate::models::{BudgetSource, Currency, Tournament};
use crate::rates::{RateTable, load_rate_info};
use crate::schedule::{self, FilterMode, financial_overview, quarter_of, sorted_by_start};
use crate::store::{self, KvStore};
use anyhow::{Context, Result, bail};
use chrono::{Datelike, Local};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use serde::Serialize;
use std::path::Path;

pub fn handle(store: &dyn KvStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("workbook", sub)) => export_workbook(store, sub),
        Some(("tournaments", sub)) => export_tournaments(store, sub),
        _ => Ok(()),
    }
}

fn selected(store: &dyn KvStore, sub: &clap::ArgMatches) -> Result<(Vec<Tournament>, Option<i32>)> {
    let year = year_filter(sub)?;
    let ts = schedule::in_year(store::load_tournaments(store), year);
    let ts = FilterMode::from_flag(sub.get_flag("confirmed")).apply(ts);
    Ok((sorted_by_start(ts), year))
}

fn export_workbook(store: &dyn KvStore, sub: &clap::ArgMatches) -> Result<()> {
    let out = sub.get_one::<String>("out").unwrap();
    let ccy = currency_or_display(store, sub)?;
    let rates = load_rate_info(store).rates;
    let (ts, year) = selected(store, sub)?;
    let year = year
        .or_else(|| ts.first().map(Tournament::year))
        .unwrap_or_else(|| Local::now().year());
    write_workbook(Path::new(out), &ts, year, ccy, &rates)?;
    println!("Exported {} tournaments to {}", ts.len(), out);
    Ok(())
}

const Q_COLORS: [u32; 4] = [0xBDD7EE, 0xC6EFCE, 0xFFEB9C, 0xF8CBAD];
const NAME_FILL: u32 = 0x9BC2E6;
const CONFIRMED_FILL: u32 = 0x92D050;
const UNKNOWN_FILL: u32 = 0xD9D9D9;

fn quarter_color(q: u8) -> Color {
    match q {
        1..=4 => Color::RGB(Q_COLORS[(q - 1) as usize]),
        _ => Color::White,
    }
}

fn num(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

fn cell_date(d: chrono::NaiveDate) -> String {
    d.format("%-d.%m.%Y").to_string()
}

fn write_link(ws: &mut Worksheet, row: u32, col: u16, url: &str, text: &str) -> Result<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        ws.write_url_with_text(row, col, url, text)?;
    } else {
        ws.write_string(row, col, url)?;
    }
    Ok(())
}

/// Draws one bordered block in columns A..D starting at `row` and returns the
/// first row after it.
fn draw_block(
    ws: &mut Worksheet,
    t: &Tournament,
    row: u32,
    ccy: Currency,
    rates: &RateTable,
) -> Result<u32> {
    let boxed = Format::new().set_border(FormatBorder::Thin);
    let q = quarter_of(t.start_date);

    ws.write_string_with_format(
        row,
        0,
        &cell_date(t.start_date),
        &boxed.clone().set_align(FormatAlign::Right),
    )?;
    ws.write_string_with_format(
        row + 1,
        0,
        &cell_date(t.end_date),
        &boxed.clone().set_align(FormatAlign::Right),
    )?;
    ws.merge_range(
        row,
        1,
        row + 1,
        1,
        &format!("Q{} {}", q, t.year()),
        &boxed
            .clone()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_background_color(quarter_color(q)),
    )?;
    let name = match &t.country {
        Some(c) => format!("{} ({})", c, t.title),
        None => t.title.clone(),
    };
    ws.merge_range(
        row,
        2,
        row + 1,
        2,
        &name,
        &boxed
            .clone()
            .set_bold()
            .set_align(FormatAlign::VerticalCenter)
            .set_background_color(Color::RGB(NAME_FILL)),
    )?;
    let games = t.rounds.map(|r| format!("{} games", r)).unwrap_or_default();
    ws.merge_range(
        row,
        3,
        row + 1,
        3,
        &games,
        &boxed.clone().set_align(FormatAlign::VerticalCenter),
    )?;

    let mut r = row + 2;
    let money = boxed.clone().set_num_format("0").set_align(FormatAlign::Right);
    let mut total = Decimal::ZERO;
    match t.budget_source {
        BudgetSource::Detailed if t.expenses.is_empty() => {
            ws.write_blank(r, 0, &boxed)?;
            ws.write_string_with_format(r, 1, "No itemized expenses", &boxed)?;
            ws.write_number_with_format(r, 2, 0.0, &money)?;
            ws.write_blank(r, 3, &boxed)?;
            r += 1;
        }
        BudgetSource::Detailed => {
            for e in &t.expenses {
                let converted = rates.convert(e.counted_amount(), e.currency, ccy);
                total = total.saturating_add(converted);
                ws.write_blank(r, 0, &boxed)?;
                ws.write_string_with_format(r, 1, &e.title, &boxed)?;
                ws.write_number_with_format(r, 2, num(converted), &money)?;
                match &e.link {
                    Some(l) => write_link(ws, r, 3, l, "Link")?,
                    None => {
                        ws.write_blank(r, 3, &boxed)?;
                    }
                }
                r += 1;
            }
        }
        BudgetSource::Basic => {
            total = schedule::budget_in(t, ccy, rates);
            ws.write_blank(r, 0, &boxed)?;
            ws.write_string_with_format(r, 1, "Estimated Budget", &boxed)?;
            ws.write_number_with_format(r, 2, num(total), &money)?;
            ws.write_blank(r, 3, &boxed)?;
            r += 1;
        }
    }

    let big = boxed.clone().set_bold().set_font_size(14);
    ws.write_blank(r, 0, &boxed)?;
    ws.write_string_with_format(r, 1, &format!("TOTAL EXPENSE ({})", ccy), &big)?;
    ws.write_number_with_format(
        r,
        2,
        num(total),
        &big.clone().set_num_format("0").set_align(FormatAlign::Right),
    )?;
    ws.write_blank(r, 3, &boxed)?;
    r += 1;

    match &t.link {
        Some(l) => {
            ws.write_string_with_format(
                r,
                0,
                "Tournament Link:",
                &boxed.clone().set_align(FormatAlign::Right),
            )?;
            write_link(ws, r, 1, l, "Tournament link")?;
        }
        None => {
            ws.write_blank(r, 0, &boxed)?;
            ws.write_blank(r, 1, &boxed)?;
        }
    }
    let (status, fill) = if t.is_going {
        ("PLAY_STATUS = CONFIRMED", CONFIRMED_FILL)
    } else {
        ("PLAY_STATUS = UNKNOWN", UNKNOWN_FILL)
    };
    ws.write_string_with_format(r, 2, status, &big.clone().set_background_color(Color::RGB(fill)))?;
    ws.write_blank(r, 3, &boxed)?;
    Ok(r + 1)
}

/// The overview panel in columns F..H.
fn draw_overview(
    ws: &mut Worksheet,
    ts: &[Tournament],
    row: u32,
    year: i32,
    ccy: Currency,
    rates: &RateTable,
) -> Result<()> {
    let fo = financial_overview(ts, ccy, rates);
    let (lbl, unk, conf) = (5u16, 6u16, 7u16);
    let big = Format::new()
        .set_bold()
        .set_font_size(16)
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);
    let money = big.clone().set_num_format("0");

    ws.merge_range(
        row,
        lbl,
        row + 1,
        conf,
        "FINANCIAL OVERVIEW",
        &big.clone()
            .set_font_color(Color::White)
            .set_background_color(Color::Black),
    )?;
    let mut r = row + 2;
    ws.write_blank(r, lbl, &big)?;
    ws.write_string_with_format(
        r,
        unk,
        "UNKNOWN TOURNAMENTS",
        &big.clone().set_background_color(Color::RGB(UNKNOWN_FILL)),
    )?;
    ws.write_string_with_format(
        r,
        conf,
        "CONFIRMED TOURNAMENTS",
        &big.clone().set_background_color(Color::RGB(CONFIRMED_FILL)),
    )?;
    r += 1;

    for q in 1..=4u8 {
        let split = fo.quarter(q);
        ws.merge_range(
            r,
            lbl,
            r + 1,
            lbl,
            &format!("Q{} {}", q, year),
            &big.clone().set_background_color(quarter_color(q)),
        )?;
        // merged cells take their value from the top-left cell
        ws.merge_range(r, unk, r + 1, unk, "", &money)?;
        ws.write_number_with_format(r, unk, num(split.unknown), &money)?;
        ws.merge_range(r, conf, r + 1, conf, "", &money)?;
        ws.write_number_with_format(r, conf, num(split.confirmed), &money)?;
        r += 2;
    }

    ws.write_string_with_format(
        r,
        lbl,
        &format!("TOTAL ESTIMATED BUDGET ({})", ccy),
        &big.clone().set_align(FormatAlign::Left),
    )?;
    ws.write_number_with_format(
        r,
        unk,
        num(fo.unknown_total),
        &money.clone().set_background_color(Color::RGB(UNKNOWN_FILL)),
    )?;
    ws.write_number_with_format(
        r,
        conf,
        num(fo.confirmed_total),
        &money.clone().set_background_color(Color::RGB(CONFIRMED_FILL)),
    )?;
    r += 1;

    let plain = Format::new().set_bold().set_font_size(12);
    ws.write_string_with_format(
        r,
        lbl,
        &format!("NUMBER OF TOURNAMENTS: {}", fo.total_count()),
        &plain,
    )?;
    ws.write_string_with_format(r, unk, &format!("UNKNOWN: {}", fo.unknown_count), &plain)?;
    ws.write_string_with_format(r, conf, &format!("CONFIRMED: {}", fo.confirmed_count), &plain)?;
    r += 1;
    ws.write_string_with_format(
        r,
        lbl,
        &format!("Printed at: {}", Local::now().format("%-d.%m.%Y")),
        &Format::new().set_italic(),
    )?;
    Ok(())
}

/// Writes the planning workbook: one block per tournament in start order and
/// the financial overview beside them.
pub fn write_workbook(
    out: &Path,
    ts: &[Tournament],
    year: i32,
    ccy: Currency,
    rates: &RateTable,
) -> Result<()> {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.set_name(format!("Tournaments {}", year))?;
    for (col, width) in [(0u16, 14.0), (1, 30.0), (2, 36.0), (3, 16.0), (5, 38.0), (6, 32.0), (7, 34.0)] {
        ws.set_column_width(col, width)?;
    }

    draw_overview(ws, ts, 1, year, ccy, rates)?;
    let mut row = 1u32;
    for t in ts {
        row = draw_block(ws, t, row, ccy, rates)? + 2;
    }
    wb.save(out)
        .with_context(|| format!("Failed to write workbook '{}'", out.display()))?;
    log::info!("wrote workbook {} ({} tournaments)", out.display(), ts.len());
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportRow {
    pub id: String,
    pub title: String,
    pub start_date: String,
    pub end_date: String,
    pub quarter: u8,
    pub country: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub rounds: Option<u32>,
    pub budget_source: String,
    pub going: bool,
    pub total: Decimal,
    pub currency: Currency,
    pub link: String,
}

pub fn export_rows(ts: &[Tournament], ccy: Currency, rates: &RateTable) -> Vec<ExportRow> {
    ts.iter()
        .map(|t| ExportRow {
            id: t.id.clone(),
            title: t.title.clone(),
            start_date: t.start_date.to_string(),
            end_date: t.end_date.to_string(),
            quarter: quarter_of(t.start_date),
            country: t.country.clone().unwrap_or_default(),
            kind: t.kind.map(|k| k.to_string()).unwrap_or_default(),
            rounds: t.rounds,
            budget_source: match t.budget_source {
                BudgetSource::Basic => "basic".into(),
                BudgetSource::Detailed => "detailed".into(),
            },
            going: t.is_going,
            total: schedule::budget_in(t, ccy, rates).round_dp(2),
            currency: ccy,
            link: t.link.clone().unwrap_or_default(),
        })
        .collect()
}

fn export_tournaments(store: &dyn KvStore, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().trim().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format '{}' (use csv|json)", fmt);
    }
    let ccy = currency_or_display(store, sub)?;
    let rates = load_rate_info(store).rates;
    let (ts, _) = selected(store, sub)?;
    let rows = export_rows(&ts, ccy, &rates);

    if fmt == "csv" {
        let mut wtr = csv::Writer::from_path(out)?;
        for r in &rows {
            wtr.serialize(r)?;
        }
        wtr.flush()?;
    } else {
        std::fs::write(out, serde_json::to_string_pretty(&rows)?)
            .with_context(|| format!("Failed to write '{}'", out))?;
    }
    println!("Exported {} tournaments to {}", rows.len(), out);
    Ok(())
}
