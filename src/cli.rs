// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version};

fn flag(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id).long(id).action(ArgAction::SetTrue).help(help)
}

fn opt(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id).long(id).help(help)
}

fn with_json(cmd: Command) -> Command {
    cmd.arg(flag("json", "Print as pretty JSON"))
        .arg(flag("jsonl", "Print as JSON lines").conflicts_with("json"))
}

fn id_arg() -> Arg {
    opt("id", "Subscription id").required(true)
}

fn value_arg(help: &'static str) -> Arg {
    Arg::new("value").required(true).help(help)
}

fn sub_cmd() -> Command {
    Command::new("sub")
        .about("Add, list, edit and remove subscriptions")
        .subcommand(
            Command::new("add")
                .about("Track a new subscription")
                .arg(opt("name", "Service name").required_unless_present("preset"))
                .arg(opt("preset", "Start from a known service (see `sub presets`)"))
                .arg(
                    opt("price", "Price per billing cycle")
                        .required_unless_present("preset")
                        .allow_hyphen_values(true),
                )
                .arg(opt("currency", "Currency symbol or code (default: display currency)"))
                .arg(opt("cycle", "weekly|monthly|yearly").default_value("monthly"))
                .arg(opt("category", "Entertainment|Personal|Utilities|Work|Other"))
                .arg(opt("start", "Start date YYYY-MM-DD (default: today)"))
                .arg(opt("trial-end", "Marks a free trial ending on YYYY-MM-DD"))
                .arg(flag("no-remind", "Do not schedule trial reminders"))
                .arg(opt("cancel-url", "Where to cancel"))
                .arg(opt("color", "Theme color #RRGGBB")),
        )
        .subcommand(with_json(
            Command::new("list")
                .about("List subscriptions")
                .arg(opt("sort", "name|price|date (default: saved preference)"))
                .arg(opt("category", "Category or All (default: saved preference)")),
        ))
        .subcommand(with_json(
            Command::new("show")
                .about("Show one subscription")
                .arg(id_arg()),
        ))
        .subcommand(
            Command::new("edit")
                .about("Change fields of a subscription")
                .arg(id_arg())
                .arg(opt("name", "Service name"))
                .arg(opt("price", "Price per billing cycle").allow_hyphen_values(true))
                .arg(opt("currency", "Currency symbol or code"))
                .arg(opt("cycle", "weekly|monthly|yearly"))
                .arg(opt("category", "Entertainment|Personal|Utilities|Work|Other"))
                .arg(opt("start", "Start date YYYY-MM-DD"))
                .arg(opt("trial-end", "Free trial ending on YYYY-MM-DD"))
                .arg(flag("end-trial", "No longer a free trial").conflicts_with("trial-end"))
                .arg(flag("remind", "Schedule trial reminders"))
                .arg(flag("no-remind", "Cancel trial reminders").conflicts_with("remind"))
                .arg(opt("cancel-url", "Where to cancel"))
                .arg(flag("clear-cancel-url", "Forget the cancellation URL").conflicts_with("cancel-url"))
                .arg(opt("color", "Theme color #RRGGBB"))
                .arg(flag("clear-color", "Forget the theme color").conflicts_with("color")),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete a subscription and its reminders")
                .arg(id_arg()),
        )
        .subcommand(with_json(
            Command::new("presets").about("List well-known services"),
        ))
}

pub fn build_cli() -> Command {
    Command::new("subtracker")
        .version(crate_version!())
        .about("Subscription tracker: monthly and yearly totals across currencies")
        .subcommand(Command::new("init").about("Create the data store and finish onboarding"))
        .subcommand(sub_cmd())
        .subcommand(with_json(
            Command::new("summary")
                .about("Monthly and yearly totals with a category breakdown")
                .arg(opt("currency", "Display currency (default: saved preference)"))
                .arg(flag("refresh", "Refresh exchange rates first")),
        ))
        .subcommand(
            Command::new("settings")
                .about("View and change preferences")
                .subcommand(with_json(Command::new("show").about("Show preferences")))
                .subcommand(
                    Command::new("currency")
                        .about("Set the display currency")
                        .arg(value_arg("Symbol or code")),
                )
                .subcommand(
                    Command::new("language")
                        .about("Set the language (also picks its currency)")
                        .arg(value_arg("en|tr|de|es|fr")),
                )
                .subcommand(
                    Command::new("biometric")
                        .about("Turn the app lock on or off")
                        .arg(value_arg("on|off")),
                )
                .subcommand(Command::new("onboarding").about("Mark onboarding as done"))
                .subcommand(
                    Command::new("sort")
                        .about("Default list order")
                        .arg(value_arg("name|price|date")),
                )
                .subcommand(
                    Command::new("filter")
                        .about("Default list category filter")
                        .arg(value_arg("Category or All")),
                ),
        )
        .subcommand(
            Command::new("fx")
                .about("Exchange rates")
                .subcommand(Command::new("fetch").about("Replace the rate table with a fresh snapshot"))
                .subcommand(with_json(Command::new("list").about("Show the rate table")))
                .subcommand(
                    Command::new("convert")
                        .about("Convert an amount with the stored rates")
                        .arg(opt("amount", "Amount").required(true).allow_hyphen_values(true))
                        .arg(opt("from", "Source symbol or code").required(true))
                        .arg(opt("to", "Target symbol or code").required(true)),
                ),
        )
        .subcommand(
            Command::new("backup")
                .about("Export or restore subscriptions")
                .subcommand(
                    Command::new("export")
                        .about("Write all subscriptions (stdout unless --out)")
                        .arg(opt("format", "json|csv").default_value("json"))
                        .arg(opt("out", "Output file")),
                )
                .subcommand(
                    Command::new("restore")
                        .about("Replace all subscriptions from a JSON backup")
                        .arg(opt("path", "Backup file, or - for stdin").required(true)),
                ),
        )
        .subcommand(
            Command::new("remind")
                .about("Trial reminders")
                .subcommand(with_json(Command::new("list").about("Pending reminders")))
                .subcommand(with_json(
                    Command::new("due").about("Deliver and clear reminders that are due"),
                )),
        )
        .subcommand(Command::new("doctor").about("Check stored data for problems"))
}
