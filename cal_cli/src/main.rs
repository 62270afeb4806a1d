//! # Off-Day Calendar CLI
//!
//! Terminal client for cal_core. It plays the part of the calendar view:
//! it asks the store for a reconciled year, renders month grids, and sends
//! the user's edits back to the store.

mod cli;
mod config;
mod logging;
mod render;

use std::process;

use anyhow::{bail, Result};
use cal_core::{CalError, CalendarSettings, OffDayRecord, OffDayStore};
use clap::Parser;
use serde::Serialize;
use tracing::info;

use crate::cli::{Cli, Command, ListArgs, MonthArgs, RecordArgs, RemoveArgs, YearArgs};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        if let Some(cal_error) = e.downcast_ref::<CalError>() {
            if let Ok(json) = serde_json::to_string_pretty(cal_error) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
        }
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = config::load(&cli.config, cli.file)?;
    let store = OffDayStore::from_settings(&settings);
    info!(file = %store.path().display(), "using record file");

    match cli.command {
        Command::Holidays(args) => holidays(&store, args),
        Command::Month(args) => month(&store, &settings, args),
        Command::List(args) => list(&store, args),
        Command::Add(args) => {
            store.add(record_from(args))?;
            println!("Added.");
            Ok(())
        }
        Command::Update(args) => {
            store.update(record_from(args))?;
            println!("Updated.");
            Ok(())
        }
        Command::Remove(args) => remove(&store, args),
    }
}

fn record_from(args: RecordArgs) -> OffDayRecord {
    OffDayRecord::new(args.year, args.month, args.day, args.kind, args.name).with_note(args.note)
}

fn holidays(store: &OffDayStore, args: YearArgs) -> Result<()> {
    let list = store.build_year_list(args.year)?;
    let year_records: Vec<&OffDayRecord> = list.iter().filter(|r| r.year == args.year).collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&year_records)?);
    } else {
        print!("{}", render::records(year_records));
    }
    Ok(())
}

#[derive(Serialize)]
struct MonthView<'a> {
    grid: &'a cal_core::MonthGrid,
    offdays: Vec<&'a OffDayRecord>,
}

fn month(store: &OffDayStore, settings: &CalendarSettings, args: MonthArgs) -> Result<()> {
    let list = store.build_year_list(args.year)?;
    let include_overflow = settings.include_overflow && !args.no_overflow;
    let grid = cal_core::MonthGrid::build(args.year, args.month, include_overflow, &list)?;

    let offdays: Vec<&OffDayRecord> = list
        .iter()
        .filter(|r| r.year == args.year && r.month == args.month)
        .collect();

    if args.json {
        let view = MonthView { grid: &grid, offdays };
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        println!("{}", render::month(&grid));
        println!("{}", render::legend());
        if !offdays.is_empty() {
            println!();
            print!("{}", render::records(offdays));
        }
    }
    Ok(())
}

fn list(store: &OffDayStore, args: ListArgs) -> Result<()> {
    let records = store.read()?;
    let shown = records.iter().filter(|r| args.year.map_or(true, |y| r.year == y));
    print!("{}", render::records(shown));
    Ok(())
}

fn remove(store: &OffDayStore, args: RemoveArgs) -> Result<()> {
    let removed = match (args.name, args.year, args.month, args.day) {
        (Some(name), ..) => store.remove_by_name(&name)?,
        (None, Some(year), Some(month), Some(day)) => store.remove(year, month, day)?,
        _ => bail!("give a date (YEAR MONTH DAY) or --name"),
    };
    println!("Removed {removed} record(s).");
    Ok(())
}
