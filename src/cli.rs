// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON Lines"),
    )
}

fn currency_arg() -> Arg {
    Arg::new("currency")
        .long("currency")
        .value_name("CCY")
        .help("TRY, USD or EUR (defaults to the display currency)")
}

fn year_arg() -> Arg {
    Arg::new("year").long("year").value_name("YYYY")
}

fn confirmed_arg() -> Arg {
    Arg::new("confirmed")
        .long("confirmed")
        .action(ArgAction::SetTrue)
        .help("Only tournaments marked as going")
}

/// Fields shared by `tournament add` and `tournament edit`.
fn tournament_fields(cmd: Command, required: bool) -> Command {
    cmd.arg(Arg::new("title").long("title").required(required))
        .arg(
            Arg::new("start")
                .long("start")
                .value_name("YYYY-MM-DD")
                .required(required),
        )
        .arg(
            Arg::new("end")
                .long("end")
                .value_name("YYYY-MM-DD")
                .required(required),
        )
        .arg(Arg::new("country").long("country"))
        .arg(
            Arg::new("type")
                .long("type")
                .value_name("standart|rapid|blitz"),
        )
        .arg(
            Arg::new("rounds")
                .long("rounds")
                .value_parser(value_parser!(u32)),
        )
        .arg(Arg::new("budget").long("budget").value_name("AMOUNT"))
        .arg(
            Arg::new("budget-currency")
                .long("budget-currency")
                .value_name("CCY"),
        )
        .arg(
            Arg::new("expense")
                .long("expense")
                .value_name("TITLE=AMOUNT CCY [LINK]")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("default-expenses")
                .long("default-expenses")
                .action(ArgAction::SetTrue)
                .help("Start the detailed budget from the standard categories"),
        )
        .arg(
            Arg::new("summary-currency")
                .long("summary-currency")
                .value_name("CCY"),
        )
        .arg(Arg::new("link").long("link").value_name("URL"))
        .arg(
            Arg::new("detailed")
                .long("detailed")
                .action(ArgAction::SetTrue)
                .help("Use the itemized expenses as the budget"),
        )
        .arg(
            Arg::new("going")
                .long("going")
                .action(ArgAction::SetTrue)
                .help("Mark as confirmed to attend"),
        )
}

pub fn build_cli() -> Command {
    Command::new("chesscal")
        .about("Chess tournament planning calendar with multi-currency budgets")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("offline")
                .long("offline")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Do not fetch exchange rates; use the cached ones"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("tournament")
                .about("Manage tournaments")
                .subcommand(tournament_fields(Command::new("add"), true))
                .subcommand(
                    tournament_fields(Command::new("edit"), false)
                        .arg(Arg::new("id").long("id").required(true))
                        .arg(
                            Arg::new("basic")
                                .long("basic")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("detailed"),
                        )
                        .arg(
                            Arg::new("not-going")
                                .long("not-going")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("going"),
                        )
                        .arg(
                            Arg::new("clear-expenses")
                                .long("clear-expenses")
                                .action(ArgAction::SetTrue),
                        ),
                )
                .subcommand(Command::new("rm").arg(Arg::new("id").long("id").required(true)))
                .subcommand(json_args(
                    Command::new("list")
                        .arg(year_arg())
                        .arg(Arg::new("country").long("country"))
                        .arg(confirmed_arg()),
                ))
                .subcommand(json_args(
                    Command::new("show")
                        .arg(Arg::new("id").long("id").required(true))
                        .arg(currency_arg()),
                ))
                .subcommand(
                    Command::new("on").arg(
                        Arg::new("date")
                            .long("date")
                            .value_name("YYYY-MM-DD")
                            .required(true),
                    ),
                ),
        )
        .subcommand(
            Command::new("stats")
                .about("Totals by quarter and by country")
                .subcommand(json_args(
                    Command::new("summary")
                        .arg(year_arg())
                        .arg(currency_arg())
                        .arg(confirmed_arg()),
                ))
                .subcommand(json_args(
                    Command::new("countries")
                        .arg(year_arg())
                        .arg(currency_arg())
                        .arg(confirmed_arg()),
                )),
        )
        .subcommand(
            Command::new("fx")
                .about("Exchange rates")
                .subcommand(json_args(Command::new("show")))
                .subcommand(
                    Command::new("refresh").arg(
                        Arg::new("auto")
                            .long("auto")
                            .action(ArgAction::SetTrue)
                            .help("Skip when the cached rates are less than a day old"),
                    ),
                )
                .subcommand(
                    Command::new("convert")
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("from").long("from").required(true))
                        .arg(Arg::new("to").long("to").required(true)),
                )
                .subcommand(
                    Command::new("set-display")
                        .arg(Arg::new("currency").long("currency").required(true)),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Write tournaments to a file")
                .subcommand(
                    Command::new("workbook")
                        .arg(Arg::new("out").long("out").required(true))
                        .arg(currency_arg())
                        .arg(year_arg())
                        .arg(confirmed_arg()),
                )
                .subcommand(
                    Command::new("tournaments")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .value_name("csv|json")
                                .required(true),
                        )
                        .arg(Arg::new("out").long("out").required(true))
                        .arg(currency_arg())
                        .arg(year_arg())
                        .arg(confirmed_arg()),
                ),
        )
        .subcommand(
            Command::new("color")
                .about("Country colors on the calendar")
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("country").long("country").required(true))
                        .arg(
                            Arg::new("color")
                                .long("color")
                                .value_name("#RRGGBB")
                                .required(true),
                        ),
                )
                .subcommand(Command::new("list"))
                .subcommand(
                    Command::new("rm").arg(Arg::new("country").long("country").required(true)),
                ),
        )
        .subcommand(
            Command::new("profile")
                .about("Norm counts and rating")
                .subcommand(json_args(Command::new("show")))
                .subcommand(
                    Command::new("set")
                        .arg(
                            Arg::new("gm-norms")
                                .long("gm-norms")
                                .allow_negative_numbers(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("im-norms")
                                .long("im-norms")
                                .allow_negative_numbers(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("rating")
                                .long("rating")
                                .value_parser(value_parser!(i64)),
                        ),
                ),
        )
        .subcommand(
            Command::new("calendar")
                .about("Year grid")
                .subcommand(Command::new("show").arg(year_arg()).arg(confirmed_arg()))
                .subcommand(
                    Command::new("pick")
                        .arg(
                            Arg::new("mode")
                                .long("mode")
                                .value_name("view|add|delete")
                                .required(true),
                        )
                        .arg(
                            Arg::new("click")
                                .long("click")
                                .value_name("YYYY-MM-DD")
                                .action(ArgAction::Append)
                                .required(true),
                        )
                        .arg(
                            Arg::new("confirm")
                                .long("confirm")
                                .action(ArgAction::SetTrue),
                        )
                        .arg(Arg::new("title").long("title")),
                ),
        )
}
