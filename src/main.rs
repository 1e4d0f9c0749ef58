mod analysis;
mod config;
mod domain;
mod error;
mod formulas;
mod interpolate;
mod logfile;
mod predict;
mod report;
mod series;
mod smoothing;
mod tdee;
mod watcher;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::{Duration, Local, NaiveDate};
use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::analysis::Model;
use crate::config::{CONFIG_FILE, DataPaths, INPUT_FILE, OPTIONS, Settings, WEIGHT_FILE};
use crate::domain::{IntakeEntry, Origin, WeightObservation, intake_day, parse_energy_term};
use crate::error::ParseError;
use crate::report::{DayLedger, EnergyBalance, Quantizer, StatValue, StreakStats};
use crate::watcher::{WatcherConfig, watch_files};

/// Weight tracking with a self-calibrating energy budget.
#[derive(Parser, Debug)]
#[command(name = "energymodel")]
#[command(about = "Track weight and food intake against an adaptive daily energy budget")]
#[command(version)]
struct Args {
    /// Directory holding the weight and intake logs and config.toml.
    /// Can also be set via ENERGYMODEL_DIR environment variable.
    #[arg(long, value_name = "DIR", env = "ENERGYMODEL_DIR")]
    dir: Option<PathBuf>,

    /// Weekly rate override (kg per week).
    #[arg(long, value_name = "KG")]
    rate: Option<f64>,

    /// Goal weight override.
    #[arg(long, value_name = "KG")]
    goal: Option<f64>,

    /// Evaluate as if today were this date (yyyy-mm-dd).
    #[arg(long, value_name = "DATE")]
    today: Option<NaiveDate>,

    /// Print reports as JSON.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Progress summary and the ledgers of yesterday and today (default).
    Status,
    /// Ledgers of every day in the analysis window.
    Log,
    /// Search intake descriptions.
    Grep {
        #[arg(required = true)]
        term: Vec<String>,
    },
    /// Streaks and statistics.
    Stats,
    /// Enter today's weight.
    Weight { value: f64 },
    /// Log food eaten today: DESCRIPTION... TERM, e.g. `nom apple pie 2x150+30`.
    Nom {
        #[arg(required = true, num_args = 2.., value_name = "DESCRIPTION... TERM")]
        words: Vec<String>,
    },
    /// Log food eaten yesterday.
    Yesterday {
        #[arg(required = true, num_args = 2.., value_name = "DESCRIPTION... TERM")]
        words: Vec<String>,
    },
    /// Per-day weight, trend and budget including the projection.
    Series,
    /// Rebuild and print the status whenever the logs change.
    Watch,
    /// Show the available configuration options.
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let mut args = Args::parse();
    let paths = DataPaths::new(args.dir.clone().unwrap_or_else(DataPaths::default_dir));
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let command = args.command.take().unwrap_or(Command::Status);

    log::debug!("Data directory: {}", paths.dir.display());

    match command {
        Command::Config => {
            print_config_usage(&paths);
            Ok(())
        }
        Command::Weight { value } => {
            enter_weight(&paths, value, today)?;
            let session = Session::load(&paths, &args, today)?;
            session.print_status(args.json)
        }
        Command::Nom { words } => {
            let now = Local::now().naive_local();
            let date = args.today.unwrap_or_else(|| intake_day(now));
            log_food(&paths, &args, &words, date)?;
            Session::load(&paths, &args, today)?.print_status(args.json)
        }
        Command::Yesterday { words } => {
            log_food(&paths, &args, &words, today - Duration::days(1))?;
            Session::load(&paths, &args, today)?.print_status(args.json)
        }
        Command::Status => Session::load(&paths, &args, today)?.print_status(args.json),
        Command::Log => Session::load(&paths, &args, today)?.print_log(args.json),
        Command::Grep { term } => {
            Session::load(&paths, &args, today)?.print_grep(&term.join(" "), args.json)
        }
        Command::Stats => Session::load(&paths, &args, today)?.print_stats(args.json),
        Command::Series => Session::load(&paths, &args, today)?.print_series(args.json),
        Command::Watch => watch(&paths, &args).await,
    }
}

// === Loading ===

/// Settings plus the model built from the logs.
struct Session {
    settings: Settings,
    model: Model,
    quantizer: Quantizer,
}

impl Session {
    fn load(paths: &DataPaths, args: &Args, today: NaiveDate) -> Result<Self> {
        let settings = load_settings(paths, args)?;
        let model_config = settings.to_model_config()?;

        let weights = logfile::read_weights(paths.weights())
            .with_context(|| format!("Failed to read {}", paths.weights().display()))?;
        let intake = logfile::read_intake(paths.intake())
            .with_context(|| format!("Failed to read {}", paths.intake().display()))?;

        if weights.is_empty() {
            bail!(
                "No weights recorded yet. Start with `energymodel weight <kg>` (log: {})",
                paths.weights().display()
            );
        }

        let model = Model::build(&weights, intake, &model_config, today)
            .context("Failed to build the model")?;

        Ok(Self {
            quantizer: Quantizer::new(settings.unit),
            settings,
            model,
        })
    }
}

fn load_settings(paths: &DataPaths, args: &Args) -> Result<Settings> {
    let settings = Settings::from_file(paths.config())
        .with_context(|| format!("Failed to load {}", paths.config().display()))?;
    Ok(settings.with_overrides(args.rate, args.goal))
}

// === Input Commands ===

fn enter_weight(paths: &DataPaths, value: f64, today: NaiveDate) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        bail!("Weight must be a positive number, got {}", value);
    }

    let weights = logfile::read_weights(paths.weights())?;
    if weights.iter().any(|w| w.date == today) {
        bail!(
            "You already entered a weight for today. Edit {} to change it.",
            paths.weights().display()
        );
    }

    logfile::append_weight(paths.weights(), &WeightObservation::new(today, value))?;
    log::info!("Recorded {} kg for {}", value, today);
    Ok(())
}

fn log_food(paths: &DataPaths, args: &Args, words: &[String], date: NaiveDate) -> Result<()> {
    let Some((term, description)) = words.split_last() else {
        bail!("Expected a description followed by an energy term");
    };
    if description.is_empty() {
        bail!("Expected a description before the energy term");
    }

    let settings = load_settings(paths, args)?;
    let number = parse_energy_term(term)?;
    let kcal = Quantizer::new(settings.unit).dequantize(number);
    if kcal == 0 {
        return Err(ParseError::ZeroEnergy.into());
    }

    let last_date = logfile::read_intake(paths.intake())?
        .last()
        .map(|e| e.date);
    let entry = IntakeEntry::new(date, kcal, description.join(" "));
    logfile::append_intake(paths.intake(), &entry, last_date)?;
    log::info!("Logged {} kcal on {}", kcal, date);
    Ok(())
}

// === Rendering ===

const SEPARATOR: &str = "---------------------";

/// Prints an energy amount in parentheses, right-aligned, followed by text.
fn entry(value: i64, text: &str) {
    println!("{:>8} {}", format!("({})", value), text);
}

fn format_date(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "Today".to_string()
    } else if date == today - Duration::days(1) {
        "Yesterday".to_string()
    } else {
        date.to_string()
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Serialize)]
struct StatusReport<'a> {
    summary: &'a report::StatusSummary,
    days: &'a [DayLedger],
    balance: Option<&'a EnergyBalance>,
}

impl Session {
    fn balance(&self) -> Option<EnergyBalance> {
        let start = self.settings.balance_start?;
        Some(report::energy_balance(
            &self.model,
            start,
            self.settings.balance_factor,
            &self.quantizer,
        ))
    }

    fn print_status(&self, json: bool) -> Result<()> {
        let summary =
            report::status_summary(&self.model).context("No status available for today")?;
        let days = report::log_since(&self.model, self.model.status_start());
        let balance = self.balance();

        if json {
            return print_json(&StatusReport {
                summary: &summary,
                days: &days,
                balance: balance.as_ref(),
            });
        }

        print!("{:.1} kg down", summary.kg_lost);
        if let Some(percent) = summary.progress_percent {
            print!(" ({:.0}%)", percent);
        }
        print!(", {:.1} kg to go!", summary.kg_to_go);
        println!(
            " You'll reach your goal in approximately {}.",
            report::format_duration(summary.days_to_go)
        );
        if !summary.weight_entered_today {
            println!("(no weight entered for today yet)");
        }
        if self.model.intake().is_empty() {
            println!("(nothing eaten logged yet, try `energymodel nom <description> <kcal>`)");
        }

        self.print_days(&days);
        self.print_balance(balance.as_ref());
        Ok(())
    }

    fn print_log(&self, json: bool) -> Result<()> {
        let days = report::log_since(&self.model, self.model.first());
        if json {
            return print_json(&days);
        }
        self.print_days(&days);
        self.print_balance(self.balance().as_ref());
        Ok(())
    }

    fn print_days(&self, days: &[DayLedger]) {
        let q = &self.quantizer;
        for day in days {
            println!();
            println!(
                "{}: ({})",
                format_date(day.date, self.model.today()),
                q.quantize(day.allowed)
            );
            println!();
            for e in &day.entries {
                entry(q.quantize(e.kcal as f64), &e.description);
            }
            println!("{}", SEPARATOR);
            let used = day.percent_used(q).unwrap_or_default();
            entry(
                q.quantize(day.remaining),
                &format!("remaining ({:.0}% used)", used),
            );
        }
    }

    fn print_balance(&self, balance: Option<&EnergyBalance>) {
        let Some(balance) = balance.filter(|b| b.balance > 0.0) else {
            return;
        };
        let cost = balance
            .cost
            .map(|c| format!(" (cost: {:.2})", c))
            .unwrap_or_default();
        entry(
            self.quantizer.quantize(balance.balance),
            &format!("too much since {}{}", balance.start, cost),
        );
    }

    fn print_grep(&self, term: &str, json: bool) -> Result<()> {
        let result = report::grep(self.model.intake(), term);
        if json {
            return print_json(&result);
        }

        if result.entries.is_empty() {
            println!("(no matching entries found)");
        }
        for e in &result.entries {
            entry(
                self.quantizer.quantize(e.kcal as f64),
                &format!("{} {}", e.date, e.description),
            );
        }
        println!("{}", SEPARATOR);
        entry(self.quantizer.quantize(result.total as f64), "total");
        Ok(())
    }

    fn print_stats(&self, json: bool) -> Result<()> {
        let stats = report::statistics(&self.model);
        if json {
            return print_json(&stats);
        }
        if stats.is_empty() {
            println!("Not enough days observed for statistics yet.");
            return Ok(());
        }

        for stat in &stats {
            println!("{}", stat.name);
            match &stat.value {
                StatValue::Streaks(streaks) => print_streaks(streaks),
                StatValue::Numbers(None) => println!("(no data)"),
                StatValue::Numbers(Some(n)) => {
                    let show = |v: f64| match stat.quantity {
                        report::Quantity::Energy => self.quantizer.quantize(v).to_string(),
                        report::Quantity::Weight => format!("{:.2}", v),
                    };
                    println!("Max: {} on {}", show(n.max), n.max_date);
                    println!("Min: {} on {}", show(n.min), n.min_date);
                    println!("Avg: {}/day, {}/week", show(n.avg), show(n.avg_per_week()));
                }
            }
            println!();
        }
        Ok(())
    }

    fn print_series(&self, json: bool) -> Result<()> {
        let rows = report::timeline(&self.model);
        if json {
            return print_json(&rows);
        }

        println!(
            "{:10}  {:>7}  {:>7}  {:>9}  {:>7}  {:>7}  origin",
            "date", "weight", "level", "trend/wk", "allowed", "eaten"
        );
        for row in &rows {
            let allowed = row
                .allowed
                .map(|a| self.quantizer.quantize(a).to_string())
                .unwrap_or_else(|| "-".to_string());
            let eaten = if row.consumed == 0 {
                "-".to_string()
            } else {
                self.quantizer.quantize(row.consumed as f64).to_string()
            };
            println!(
                "{:10}  {:>7.2}  {:>7.2}  {:>+9.2}  {:>7}  {:>7}  {}",
                row.date,
                row.weight,
                row.level.unwrap_or(row.weight),
                row.trend.unwrap_or_default() * 7.0,
                allowed,
                eaten,
                row.origin
            );
        }

        let series = self.model.series();
        println!();
        println!(
            "{} observed, {} interpolated, {} predicted days",
            series.count(Origin::Real),
            series.count(Origin::Interpolated),
            series.count(Origin::Predicted)
        );
        Ok(())
    }
}

fn print_streaks(streaks: &StreakStats) {
    for (label, streak) in [("Longest", streaks.longest), ("Current", streaks.current)] {
        match streak {
            Some(s) => println!("{} streak: {} - {} ({} days)", label, s.start, s.end(), s.days),
            None => println!("{} streak: (0 days)", label),
        }
    }
}

fn print_config_usage(paths: &DataPaths) {
    println!(
        "Configuration options (put these in {}):",
        paths.config().display()
    );
    for (key, description, default) in OPTIONS {
        let mut line = format!("{:34}{}", format!("      {}", key), capitalize(description));
        if let Some(default) = default {
            line.push_str(&format!(" (default: '{}')", default));
        }
        println!("{}", line);
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// === Watch Mode ===

async fn watch(paths: &DataPaths, args: &Args) -> Result<()> {
    std::fs::create_dir_all(&paths.dir)
        .with_context(|| format!("Failed to create {}", paths.dir.display()))?;

    let config = WatcherConfig::default();
    rebuild_with_retry(paths, args, &config).await;

    println!();
    println!("Watching for changes - press Ctrl-C to stop");

    watch_files(
        &paths.dir,
        &[WEIGHT_FILE, INPUT_FILE, CONFIG_FILE],
        &config,
        || rebuild_with_retry(paths, args, &config),
    )
    .await?;
    Ok(())
}

/// Rebuilds the model with retry for half-written files, then prints it.
async fn rebuild_with_retry(paths: &DataPaths, args: &Args, config: &WatcherConfig) {
    let mut last_error = None;

    for attempt in 0..config.retry_attempts {
        let today = args.today.unwrap_or_else(|| Local::now().date_naive());
        match Session::load(paths, args, today) {
            Ok(session) => {
                println!();
                println!("=== {} ===", Local::now().format("%Y-%m-%d %H:%M:%S"));
                if let Err(e) = session.print_status(args.json) {
                    log::error!("Failed to print status: {:#}", e);
                }
                return;
            }
            Err(e) => {
                log::warn!("Rebuild attempt {} failed: {:#}", attempt + 1, e);
                last_error = Some(e);
                tokio::time::sleep(config.retry_delay).await;
            }
        }
    }

    if let Some(e) = last_error {
        log::error!(
            "Failed to rebuild after {} attempts: {:#}",
            config.retry_attempts,
            e
        );
        eprintln!("Error: {:#}", e);
    }
}
