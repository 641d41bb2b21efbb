// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use chesscal::config::Config;
use chesscal::rates::{FxRatesApi, RateService, SystemClock};
use chesscal::{cli, commands, db};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let config = Config::from_env();
    let conn = db::open_or_init(&config)?;
    let mut rates = RateService::new(
        &conn,
        Box::new(SystemClock),
        Box::new(FxRatesApi::new(&config)?),
    );

    // Anything that shows converted money gets rates no older than a day.
    let wants_rates = matches!(
        matches.subcommand_name(),
        Some("tournament" | "stats" | "export")
    );
    if wants_rates && !matches.get_flag("offline") {
        rates.refresh(true);
    }

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path(&config)?.display());
        }
        Some(("tournament", sub)) => commands::tournaments::handle(&conn, sub)?,
        Some(("stats", sub)) => commands::stats::handle(&conn, sub)?,
        Some(("fx", sub)) => commands::fx::handle(&conn, &mut rates, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub)?,
        Some(("color", sub)) => commands::colors::handle(&conn, sub)?,
        Some(("profile", sub)) => commands::profile::handle(&conn, sub)?,
        Some(("calendar", sub)) => commands::calendar::handle(&conn, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
