use std::path::PathBuf;

use cal_core::OffDayKind;
use clap::{Parser, Subcommand, ValueEnum};

/// Japanese holiday calendar and off-day list.
#[derive(Parser)]
#[command(name = "cal_cli", version, about = "Japanese holiday calendar and off-day list")]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to TOML configuration file.
    #[arg(short, long, global = true, default_value = "cal.toml")]
    pub config: PathBuf,

    /// Override the off-day record file from config.
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Merge a year's holidays into the record file and print them.
    Holidays(YearArgs),
    /// Print a month calendar.
    Month(MonthArgs),
    /// Print the records in the file.
    List(ListArgs),
    /// Add a record.
    Add(RecordArgs),
    /// Replace the records on a date with a new one.
    Update(RecordArgs),
    /// Remove records by date or by name.
    Remove(RemoveArgs),
}

#[derive(clap::Args)]
pub struct YearArgs {
    pub year: i32,

    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args)]
pub struct MonthArgs {
    pub year: i32,
    pub month: u32,

    /// Leave the cells outside the month blank.
    #[arg(long)]
    pub no_overflow: bool,

    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args)]
pub struct ListArgs {
    /// Only records of this year.
    #[arg(short, long)]
    pub year: Option<i32>,
}

#[derive(clap::Args)]
pub struct RecordArgs {
    pub year: i32,
    pub month: u32,
    pub day: u32,

    /// Kind of off-day: a name or its file code (0-4).
    #[arg(short, long, value_parser = parse_kind, default_value = "leave")]
    pub kind: OffDayKind,

    /// Name shown for the day.
    #[arg(short, long)]
    pub name: String,

    /// Free-form note.
    #[arg(long, default_value = "")]
    pub note: String,
}

#[derive(clap::Args)]
pub struct RemoveArgs {
    #[arg(requires_all = ["month", "day"])]
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,

    /// Remove every record with this name instead of a date.
    #[arg(long, conflicts_with = "year")]
    pub name: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum KindArg {
    None,
    Holiday,
    Substitute,
    National,
    Leave,
}

impl From<KindArg> for OffDayKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::None => OffDayKind::None,
            KindArg::Holiday => OffDayKind::Holiday,
            KindArg::Substitute => OffDayKind::SubstituteHoliday,
            KindArg::National => OffDayKind::NationalHoliday,
            KindArg::Leave => OffDayKind::PersonalOffDay,
        }
    }
}

/// Accept either a kind name or the numeric code used in the record file.
fn parse_kind(value: &str) -> Result<OffDayKind, String> {
    if let Ok(code) = value.parse::<i64>() {
        return OffDayKind::try_from_code(code).ok_or_else(|| format!("kind code must be 0-4, got {code}"));
    }
    <KindArg as ValueEnum>::from_str(value, true).map(OffDayKind::from)
}
