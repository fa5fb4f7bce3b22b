use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use chrono::SecondsFormat;
use clap::{Parser, Subcommand, ValueEnum};
use tz_shift::{
    calendar::now_ms, parse_instant, resolve_offset, scan, tz_name, Interval, ZoneNameStyle,
    ZonedInstant,
};

#[derive(Parser)]
#[command(name = "tzshift", version, about = "Inspect UTC offsets and offset transitions of time zones")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the UTC offset of a zone in minutes
    Offset {
        /// IANA identifier or fixed offset such as +05:30
        #[arg(allow_hyphen_values = true)]
        zone: String,
        /// Instant to resolve at (defaults to now)
        #[arg(long)]
        at: Option<String>,
    },
    /// List the offset changes of a zone within [start, end)
    Scan {
        #[arg(allow_hyphen_values = true)]
        zone: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        /// Print a JSON array instead of one line per change
        #[arg(long)]
        json: bool,
    },
    /// Print the display name of a zone
    Name {
        #[arg(allow_hyphen_values = true)]
        zone: String,
        #[arg(long)]
        at: Option<String>,
        #[arg(long, value_enum, default_value_t = Style::Long)]
        style: Style,
    },
    /// Print an instant as seen in a zone
    Show {
        #[arg(allow_hyphen_values = true)]
        zone: String,
        #[arg(long)]
        at: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Style {
    Short,
    Long,
    ShortGeneric,
    LongGeneric,
}

impl From<Style> for ZoneNameStyle {
    fn from(style: Style) -> Self {
        match style {
            Style::Short => ZoneNameStyle::Short,
            Style::Long => ZoneNameStyle::Long,
            Style::ShortGeneric => ZoneNameStyle::ShortGeneric,
            Style::LongGeneric => ZoneNameStyle::LongGeneric,
        }
    }
}

fn main() -> ExitCode {
    // RUST_LOG=debug surfaces formatter compiles and scan progress.
    env_logger::init();
    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Offset { zone, at } => {
            let time = instant(at.as_deref())?;
            let offset = resolve_offset(Some(zone.as_str()), &time);
            if offset.is_nan() {
                bail!("cannot resolve time zone {zone:?}");
            }
            println!("{offset}");
        }
        Command::Scan {
            zone,
            start,
            end,
            json,
        } => {
            let interval = Interval::parse(&start, &end).context("invalid interval")?;
            let changes = scan(&zone, &interval).with_context(|| format!("scanning {zone}"))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&changes)?);
            } else {
                for change in &changes {
                    println!(
                        "{} {:+} {}",
                        change.date.to_rfc3339_opts(SecondsFormat::Secs, true),
                        change.change,
                        change.offset
                    );
                }
            }
        }
        Command::Name { zone, at, style } => {
            let time = instant(at.as_deref())?;
            let name = tz_name(Some(zone.as_str()), &time, style.into());
            if name.is_empty() {
                bail!("cannot resolve time zone {zone:?}");
            }
            println!("{name}");
        }
        Command::Show { zone, at } => {
            let time = instant(at.as_deref())?;
            let date = ZonedInstant::from_timestamp(time, zone.as_str());
            if !date.is_valid() {
                bail!("cannot resolve time zone {zone:?}");
            }
            println!("{}", date.to_iso_string());
            println!("{date}");
        }
    }
    Ok(())
}

fn instant(at: Option<&str>) -> Result<f64> {
    let Some(at) = at else {
        return Ok(now_ms());
    };
    let time = parse_instant(at);
    if time.is_nan() {
        bail!("invalid datetime {at:?}");
    }
    Ok(time)
}
