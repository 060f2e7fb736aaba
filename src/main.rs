use anyhow::{Context, Result};
use bodytrack::aggregation::{Aggregation, AggregationWindow, RangeSelector};
use bodytrack::config::AppConfig;
use bodytrack::error::BodyTrackError;
use bodytrack::export::{ExportFormat, ExportManager};
use bodytrack::logging::{init_logging, LogFormat};
use bodytrack::models::{MeasurementEntry, MeasurementKind, NutritionLogEntry, UnitSystem};
use bodytrack::nutrition::{daily_totals, reconcile, total_calories};
use bodytrack::preference::resolve_preferred_unit;
use bodytrack::units::{format_value, UnitConverter};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

/// bodytrack - body measurement and nutrition tracking CLI
///
/// Converts measurements between metric and imperial units, summarizes
/// progress over a date range and totals logged calories.
#[derive(Parser)]
#[command(name = "bodytrack")]
#[command(version)]
#[command(about = "Body measurement and nutrition tracking CLI", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log output format (pretty, json, compact)
    #[arg(long, value_name = "FORMAT", global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

/// Date selection shared by reporting commands
#[derive(clap::Args, Debug)]
struct WindowArgs {
    /// Relative range ending today (7d, 30d, 90d, 365d)
    #[arg(short, long)]
    range: Option<RangeSelector>,

    /// Window start (YYYY-MM-DD), overrides the range start
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Window end (YYYY-MM-DD), defaults to today
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Treat this date as today
    #[arg(long, value_name = "DATE")]
    today: Option<NaiveDate>,
}

/// Display unit selection shared by measurement commands
#[derive(clap::Args, Debug)]
struct UnitArgs {
    /// Show values in this unit system
    #[arg(short, long)]
    unit: Option<UnitSystem>,

    /// Unit preference from the user's profile
    #[arg(long, value_name = "UNIT")]
    profile_unit: Option<UnitSystem>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a single value between unit systems
    Convert {
        /// Value to convert
        value: Decimal,

        /// Measurement kind (weight, linear_measurement, body_fat_percentage)
        #[arg(short, long, default_value = "weight")]
        kind: MeasurementKind,

        /// Unit system of the value
        #[arg(long)]
        from: UnitSystem,

        /// Unit system to convert to
        #[arg(long)]
        to: UnitSystem,
    },

    /// Summarize a measurement series over a date range
    Summary {
        /// Entry file (JSON or CSV)
        #[arg(short, long)]
        file: PathBuf,

        /// Measurement kind to summarize
        #[arg(short, long)]
        kind: Option<MeasurementKind>,

        #[command(flatten)]
        window: WindowArgs,

        #[command(flatten)]
        units: UnitArgs,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Total logged calories and check them against a reported figure
    Nutrition {
        /// Food log file (JSON or CSV)
        #[arg(short, long)]
        file: PathBuf,

        /// Only this day
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Total reported by the backend, in kcal
        #[arg(long)]
        reported: Option<Decimal>,

        #[command(flatten)]
        window: WindowArgs,
    },

    /// Write a report to a file
    Export {
        /// Entry file (JSON or CSV)
        #[arg(short, long)]
        file: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Export format (csv, json, text); guessed from the output extension
        #[arg(long)]
        format: Option<ExportFormat>,

        /// Measurement kind to export
        #[arg(short, long)]
        kind: Option<MeasurementKind>,

        /// Treat the input as a food log
        #[arg(long)]
        nutrition: bool,

        #[command(flatten)]
        window: WindowArgs,

        #[command(flatten)]
        units: UnitArgs,
    },

    /// Configure application settings
    Config {
        /// List all configuration options
        #[arg(short, long)]
        list: bool,

        /// Set a configuration value (KEY=VALUE)
        #[arg(short, long)]
        set: Option<String>,

        /// Get a configuration value
        #[arg(short, long)]
        get: Option<String>,
    },
}

#[derive(Tabled)]
struct SeriesRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct NutritionRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Items")]
    items: u32,
    #[tabled(rename = "kcal")]
    calories: Decimal,
    #[tabled(rename = "Protein (g)")]
    protein: Decimal,
    #[tabled(rename = "Carbs (g)")]
    carbs: Decimal,
    #[tabled(rename = "Fat (g)")]
    fat: Decimal,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        report_error(&e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(AppConfig::default_config_path);
    let mut config = AppConfig::load_or_default(&config_path)?;

    let mut log_config = config.logging.clone();
    log_config.level = log_config.level.raised_by(cli.verbose);
    if let Some(format) = cli.log_format {
        log_config.format = format;
    }
    init_logging(&log_config)?;

    match cli.command {
        Commands::Convert {
            value,
            kind,
            from,
            to,
        } => {
            let converted = UnitConverter::new()
                .convert(value, kind, from, to)
                .map_err(BodyTrackError::from)?;
            println!(
                "{} = {}",
                format_value(value, kind, from),
                format_value(converted, kind, to).green().bold()
            );
        }

        Commands::Summary {
            file,
            kind,
            window,
            units,
            format,
        } => {
            let kind = kind.unwrap_or(config.display.default_kind);
            let entries = load_measurements(&config, &file, kind)?;
            let window = resolve_window(&window, config.display.default_range)?;
            let unit = resolve_display_unit(&units, &config, &entries);

            let aggregation = config
                .aggregator()
                .aggregate(&entries, &window, unit)
                .map_err(BodyTrackError::from)?;

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&aggregation)?),
                OutputFormat::Table => print_summary(kind, &aggregation),
            }
        }

        Commands::Nutrition {
            file,
            date,
            reported,
            window,
        } => {
            let entries = config
                .import_manager()
                .import_nutrition(&file)
                .map_err(BodyTrackError::from)?;

            let window = match date {
                Some(date) => AggregationWindow::single_day(date),
                None => resolve_window(&window, config.display.default_range)?,
            };
            let in_window: Vec<NutritionLogEntry> = entries
                .into_iter()
                .filter(|entry| window.contains(entry.date))
                .collect();

            print_nutrition(&window, &in_window, reported);
        }

        Commands::Export {
            file,
            output,
            format,
            kind,
            nutrition,
            window,
            units,
        } => {
            let format = match format {
                Some(format) => format,
                None => ExportFormat::from_path(&output).unwrap_or(ExportFormat::Json),
            };
            let window = resolve_window(&window, config.display.default_range)?;
            let manager = ExportManager::with_aggregator(config.aggregator());

            if nutrition {
                let entries = config
                    .import_manager()
                    .import_nutrition(&file)
                    .map_err(BodyTrackError::from)?;
                let report = manager.build_nutrition_report(&entries, &window);
                manager
                    .export_nutrition(&report, format, &output)
                    .map_err(BodyTrackError::from)?;
            } else {
                let kind = kind.unwrap_or(config.display.default_kind);
                let entries = load_measurements(&config, &file, kind)?;
                let unit = resolve_display_unit(&units, &config, &entries);
                let report = manager
                    .build_report(&entries, kind, &window, unit)
                    .map_err(BodyTrackError::from)?;
                manager
                    .export(&report, format, &output)
                    .map_err(BodyTrackError::from)?;
            }

            println!(
                "{} {}",
                "✓ Exported".green(),
                output.display().to_string().bold()
            );
        }

        Commands::Config { list, set, get } => {
            if let Some(key_value) = set {
                let (key, value) = key_value
                    .split_once('=')
                    .with_context(|| format!("Expected KEY=VALUE, got '{}'", key_value))?;
                config.set(key.trim(), value.trim())?;
                config.save_to_file(&config_path)?;
                println!("{} {} = {}", "✓ Set".green(), key.trim(), value.trim());
            } else if let Some(key) = get {
                println!("{}", config.get(&key)?);
            } else if list {
                for (key, value) in config.list()? {
                    println!("{} = {}", key.cyan(), value);
                }
            } else {
                println!("Config file: {}", config_path.display());
            }
        }
    }

    Ok(())
}

/// Import a measurement file and keep one kind
fn load_measurements(
    config: &AppConfig,
    file: &Path,
    kind: MeasurementKind,
) -> Result<Vec<MeasurementEntry>> {
    let entries = config
        .import_manager()
        .import_measurements(file)
        .map_err(BodyTrackError::from)?;

    Ok(entries
        .into_iter()
        .filter(|entry| entry.kind() == kind)
        .collect())
}

/// Explicit dates win over the relative range
fn resolve_window(args: &WindowArgs, default_range: RangeSelector) -> Result<AggregationWindow> {
    let today = args
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let end = args.to.unwrap_or(today);
    let start = match args.from {
        Some(from) => from,
        None => args.range.unwrap_or(default_range).window_ending(end).start(),
    };

    let window = AggregationWindow::new(start, end).map_err(BodyTrackError::from)?;
    Ok(window)
}

/// Flag, then profile, then history, then the configured default
fn resolve_display_unit(
    args: &UnitArgs,
    config: &AppConfig,
    entries: &[MeasurementEntry],
) -> UnitSystem {
    if let Some(unit) = args.unit {
        return unit;
    }

    let profile_unit = args.profile_unit.or_else(|| config.profile_units());
    if profile_unit.is_none() && entries.is_empty() {
        return config.display.default_units;
    }

    resolve_preferred_unit(profile_unit, entries)
}

fn print_summary(kind: MeasurementKind, aggregation: &Aggregation) {
    let unit = aggregation.display_unit;

    println!(
        "{} {}",
        kind.display_name().bold(),
        format!("({}, {})", aggregation.window, unit).dimmed()
    );

    if aggregation.is_empty() {
        println!("{}", "No entries in this period.".yellow());
        return;
    }

    let rows: Vec<SeriesRow> = aggregation
        .normalized
        .iter()
        .map(|entry| SeriesRow {
            date: entry.date().format("%Y-%m-%d").to_string(),
            value: format_value(entry.value(), kind, unit),
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::rounded()));

    let summary = &aggregation.summary;
    println!("Average: {}", format_value(summary.average_value, kind, unit).bold());
    println!("Change:  {}", colored_delta(summary.change_value, kind, unit));
    println!("Trend:   {}", colored_delta(summary.trend_value, kind, unit));
}

fn colored_delta(value: Decimal, kind: MeasurementKind, unit: UnitSystem) -> ColoredString {
    let text = format_value(value, kind, unit);
    if value > Decimal::ZERO {
        format!("+{}", text).yellow()
    } else if value < Decimal::ZERO {
        text.cyan()
    } else {
        text.normal()
    }
}

fn print_nutrition(
    window: &AggregationWindow,
    entries: &[NutritionLogEntry],
    reported: Option<Decimal>,
) {
    let total = total_calories(entries);

    println!("{} {}", "Nutrition".bold(), format!("({})", window).dimmed());
    println!(
        "Total: {} kcal from {} items",
        total.rounded.to_string().bold(),
        total.item_count
    );

    if let Some(reported) = reported {
        let check = reconcile(entries, reported);
        if check.matches {
            println!("{}", "✓ Matches reported total".green());
        } else {
            println!(
                "{} computed {} kcal, reported {} kcal (off by {})",
                "⚠ Mismatch:".yellow().bold(),
                check.computed,
                check.reported,
                check.difference
            );
        }
    }

    let rows: Vec<NutritionRow> = daily_totals(entries)
        .into_values()
        .map(|day| NutritionRow {
            date: day.date.format("%Y-%m-%d").to_string(),
            items: day.item_count,
            calories: day.rounded_calories(),
            protein: day.protein_g,
            carbs: day.carbs_g,
            fat: day.fat_g,
        })
        .collect();

    if !rows.is_empty() {
        println!("{}", Table::new(rows).with(Style::rounded()));
    }
}

fn report_error(error: &anyhow::Error) {
    match error.downcast_ref::<BodyTrackError>() {
        Some(err) => {
            if err.severity().to_tracing_level() == tracing::Level::ERROR {
                tracing::error!(error = %err, severity = ?err.severity(), "Command failed");
            } else {
                tracing::warn!(error = %err, "Command failed");
            }
            eprintln!("{} {}", "Error:".red().bold(), err.user_message());
        }
        None => eprintln!("{} {:#}", "Error:".red().bold(), error),
    }
}
