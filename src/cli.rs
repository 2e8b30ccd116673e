use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::NaiveDate;
use clap::{ArgAction, Parser};
use color_eyre::eyre::{eyre, Result, WrapErr};
use tracing_subscriber::EnvFilter;

use crate::config::APP_NAME;
use crate::layout::CalendarMonth;

#[derive(Parser, Debug, Clone)]
#[command(name = APP_NAME, version, about = "Monthly calendar of Hostex bookings")]
pub struct Cli {
    /// Month to open, as YYYY-MM. Defaults to the current month.
    #[arg(short, long, value_parser = parse_month)]
    pub month: Option<CalendarMonth>,

    /// Print the month as text and exit instead of starting the TUI.
    #[arg(short, long)]
    pub print: bool,

    /// Read reservations from a JSON file instead of the network.
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Config file (default: <config dir>/hostex-calendar/config.toml).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

pub fn parse_month(s: &str) -> Result<CalendarMonth, String> {
    let date = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .map_err(|_| format!("expected YYYY-MM, got `{s}`"))?;
    Ok(CalendarMonth::containing(date))
}

/// Log to a file under the cache dir; the terminal belongs to the UI.
///
/// `RUST_LOG` wins over `-v`. Returns the log file path.
pub fn init_tracing(verbose: u8) -> Result<Option<PathBuf>> {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| eyre!("invalid RUST_LOG / log filter: {e}"))?;

    let Some(dir) = dirs::cache_dir().map(|d| d.join(APP_NAME)) else {
        return Ok(None);
    };
    fs::create_dir_all(&dir).wrap_err_with(|| format!("creating {}", dir.display()))?;
    let path = dir.join(format!("{APP_NAME}.log"));
    let file = File::create(&path).wrap_err_with(|| format!("creating {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| eyre!("tracing subscriber already set: {e}"))?;

    Ok(Some(path))
}
