// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use subtracker::config::Config;
use subtracker::store::{KeyValueStore, PREFERENCES_KEY, SqliteStore, load_preferences};
use subtracker::{cli, commands, db};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let config = Config::from_env()?;
    let conn = db::open_or_init(&config.db_path)?;
    let mut store = SqliteStore::new(conn);
    store.subscribe(
        PREFERENCES_KEY,
        Box::new(|_: &str| log::debug!("preferences changed")),
    );

    if !matches!(matches.subcommand_name(), Some("init") | None)
        && !load_preferences(&store)?.has_completed_onboarding
    {
        eprintln!("Welcome! Run `subtracker init` to finish setting up.");
    }

    match matches.subcommand() {
        Some(("init", _)) => {
            commands::settings::complete_onboarding(&mut store)?;
            println!("Database initialized at {}", config.db_path.display());
            println!("Add a subscription with `subtracker sub add --name Netflix --price 15.49`");
            println!("or start from a preset: `subtracker sub add --preset netflix`.");
        }
        Some(("sub", sub)) => commands::subs::handle(&mut store, sub)?,
        Some(("summary", sub)) => commands::summary::handle(&mut store, sub, &config)?,
        Some(("settings", sub)) => commands::settings::handle(&mut store, sub)?,
        Some(("fx", sub)) => commands::fx::handle(&mut store, sub, &config)?,
        Some(("backup", sub)) => commands::backup::handle(&mut store, sub)?,
        Some(("remind", sub)) => commands::remind::handle(&mut store, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&mut store)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
