// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::io::Read;

use anyhow::{Context, Result, anyhow};

use crate::backup::{export_csv, export_json, restore_from_json};
use crate::store::{KeyValueStore, load_subscriptions};
use crate::utils::{arg, opt_arg};

pub fn handle(store: &mut dyn KeyValueStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("export", sub)) => export(store, sub),
        Some(("restore", sub)) => restore(store, sub),
        _ => Ok(()),
    }
}

fn export(store: &mut dyn KeyValueStore, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = opt_arg(sub, "format").unwrap_or("json").to_lowercase();
    let out = opt_arg(sub, "out");
    let records = load_subscriptions(&*store)?;

    match fmt.as_str() {
        "json" => {
            let text = export_json(&records)?;
            match out {
                Some(path) => {
                    std::fs::write(path, text).with_context(|| format!("Write {}", path))?
                }
                None => println!("{}", text),
            }
        }
        "csv" => match out {
            Some(path) => {
                let file =
                    std::fs::File::create(path).with_context(|| format!("Create {}", path))?;
                export_csv(&records, file)?;
            }
            None => export_csv(&records, std::io::stdout().lock())?,
        },
        other => return Err(anyhow!("Unknown format: {} (use json|csv)", other)),
    }
    if let Some(path) = out {
        println!("Exported {} subscription(s) to {}", records.len(), path);
    }
    Ok(())
}

fn restore(store: &mut dyn KeyValueStore, sub: &clap::ArgMatches) -> Result<()> {
    let path = arg(sub, "path")?;
    let text = if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Read backup from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Read {}", path))?
    };
    let n = restore_from_json(store, &text)?;
    println!("Restored {} subscription(s)", n);
    Ok(())
}
