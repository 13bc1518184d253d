use chrono::{DateTime, Local, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};
use tracing::{debug, info, trace};

use freight::analytics::{
    aggregate_lane, matches_allowed_with, ros_band, summarize_by_customer, CustomerQuery, Lane,
    LaneQuery,
};
use freight::config::{
    clamp_months, config_dir, load_bookings, load_config, load_quotations, resolve_data_path,
    save_snapshot, Config, CONFIG_TEMPLATE,
};
use freight::error::{FreightError, Result};
use freight::records::Quotation;
use freight::seed::demo_snapshot;

#[derive(Parser)]
#[command(name = "freight")]
#[command(version, about = "Freight quotation rate history and lane analytics", long_about = None)]
struct Cli {
    /// Path to config directory (default: ~/.freight or XDG config)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with template files
    Init {
        /// Seed seven months of demo quotations and bookings
        #[arg(long)]
        demo: bool,

        /// Demo lane origin
        #[arg(long, default_value = "Shanghai")]
        origin: String,

        /// Demo lane destination
        #[arg(long, default_value = "Rotterdam")]
        destination: String,
    },

    /// Monthly average sell, cost and booked volume for a lane
    Lane {
        /// Origin filter (substring, case-insensitive)
        #[arg(short, long, default_value = "")]
        origin: String,

        /// Destination filter (substring, case-insensitive)
        #[arg(short, long, default_value = "")]
        destination: String,

        /// Trailing months to show (clamped to 3-24)
        #[arg(short, long)]
        months: Option<i32>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Quote counts and average sell per customer for a lane
    Customers {
        /// Origin filter (substring, case-insensitive)
        #[arg(short, long, default_value = "")]
        origin: String,

        /// Destination filter (substring, case-insensitive)
        #[arg(short, long, default_value = "")]
        destination: String,

        /// Trailing months to cover (clamped to 3-24)
        #[arg(short, long)]
        months: Option<i32>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List quotations for allowed customers with totals and ROS band
    Quotes {
        /// Allowed customer (can be repeated; default: config allowed list)
        #[arg(short, long)]
        customer: Vec<String>,

        /// Number of quotations to show (default: all)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// List ROS bands, or classify a ROS percentage
    Bands {
        /// ROS percentage to classify (negative for loss-making quotes)
        #[arg(allow_negative_numbers = true)]
        value: Option<f64>,
    },

    /// Show config location and snapshot counts
    Status,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2)
        .init();

    debug!("freight started with verbosity level: {}", verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());
}

fn run(cli: Cli) -> Result<()> {
    // Determine config directory
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init {
            demo,
            origin,
            destination,
        } => cmd_init(&cfg_dir, demo.then(|| Lane::new(origin, destination))),
        Commands::Lane {
            origin,
            destination,
            months,
            json,
        } => cmd_lane(&cfg_dir, Lane::new(origin, destination), months, json),
        Commands::Customers {
            origin,
            destination,
            months,
            json,
        } => cmd_customers(&cfg_dir, Lane::new(origin, destination), months, json),
        Commands::Quotes { customer, limit } => cmd_quotes(&cfg_dir, &customer, limit),
        Commands::Bands { value } => cmd_bands(&cfg_dir, value),
        Commands::Status => cmd_status(&cfg_dir),
    }
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &Path, demo_lane: Option<Lane>) -> Result<()> {
    if cfg_dir.exists() {
        return Err(FreightError::AlreadyInitialized(cfg_dir.to_path_buf()));
    }

    fs::create_dir_all(cfg_dir)?;
    fs::write(cfg_dir.join("config.toml"), CONFIG_TEMPLATE)?;

    let config = load_config(cfg_dir)?;
    let quotations_path = resolve_data_path(&config.data.quotations, cfg_dir);
    let bookings_path = resolve_data_path(&config.data.bookings, cfg_dir);

    let (quotations, bookings) = match &demo_lane {
        Some(lane) => demo_snapshot(&Local::now(), lane),
        None => (Vec::new(), Vec::new()),
    };
    save_snapshot(&quotations_path, &quotations)?;
    save_snapshot(&bookings_path, &bookings)?;
    info!(
        quotations = quotations.len(),
        bookings = bookings.len(),
        "wrote initial snapshots"
    );

    println!("Initialized freight config at: {}", cfg_dir.display());
    if let Some(lane) = demo_lane {
        println!(
            "Seeded {} demo quotations and {} bookings on {}",
            quotations.len(),
            bookings.len(),
            lane
        );
    }
    println!();
    println!("Next steps:");
    println!("  1. Review settings:        $EDITOR {}/config.toml", cfg_dir.display());
    println!("  2. Export quotations to:   {}", quotations_path.display());
    println!("  3. Export bookings to:     {}", bookings_path.display());
    println!();
    println!("Then view a lane:");
    println!("  freight lane --origin <origin> --destination <destination>");

    Ok(())
}

// Table row structs for tabled
#[derive(Tabled)]
struct LaneRow {
    #[tabled(rename = "MONTH")]
    month: String,
    #[tabled(rename = "AVG SELL")]
    avg_sell: String,
    #[tabled(rename = "AVG COST")]
    avg_cost: String,
    #[tabled(rename = "VOLUME")]
    volume: String,
}

#[derive(Tabled)]
struct CustomerTableRow {
    #[tabled(rename = "CUSTOMER")]
    customer: String,
    #[tabled(rename = "QUOTES")]
    quotes: usize,
    #[tabled(rename = "AVG SELL")]
    avg_sell: String,
    #[tabled(rename = "LAST QUOTED")]
    last_quoted: String,
}

#[derive(Tabled)]
struct QuoteRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "CUSTOMER")]
    customer: String,
    #[tabled(rename = "SELL")]
    sell: String,
    #[tabled(rename = "MARGIN")]
    margin: String,
    #[tabled(rename = "ROS")]
    ros: String,
    #[tabled(rename = "BAND")]
    band: String,
}

#[derive(Tabled)]
struct BandRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "LABEL")]
    label: String,
    #[tabled(rename = "RANGE")]
    range: String,
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn format_date(at: &DateTime<Utc>, format: &str) -> String {
    at.with_timezone(&Local).format(format).to_string()
}

/// Monthly lane history
fn cmd_lane(cfg_dir: &Path, lane: Lane, months: Option<i32>, json: bool) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let quotations = load_quotations(cfg_dir, &config)?;
    let bookings = load_bookings(cfg_dir, &config)?;
    let months = clamp_months(months.unwrap_or(config.dashboard.months));

    let points = aggregate_lane(&LaneQuery {
        quotations: &quotations,
        bookings: &bookings,
        lane: &lane,
        months,
        reference: Local::now(),
        unlabeled_bookings: config.lanes.unlabeled_bookings,
    });

    if json {
        return print_json(&points);
    }

    let symbol = &config.dashboard.currency_symbol;
    let rows: Vec<LaneRow> = points
        .iter()
        .map(|p| LaneRow {
            month: p.month.clone(),
            avg_sell: format_money(p.avg_sell, symbol),
            avg_cost: format_money(p.avg_cost, symbol),
            volume: format_quantity(p.volume),
        })
        .collect();

    println!("Lane {} (last {} months)", lane, months);
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    Ok(())
}

/// Per-customer summary for a lane
fn cmd_customers(cfg_dir: &Path, lane: Lane, months: Option<i32>, json: bool) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let quotations = load_quotations(cfg_dir, &config)?;
    let months = clamp_months(months.unwrap_or(config.dashboard.months));

    let rows = summarize_by_customer(&CustomerQuery {
        quotations: &quotations,
        lane: &lane,
        months,
        reference: Local::now(),
        identity: config.customers.summary_identity,
    });

    if json {
        return print_json(&rows);
    }

    if rows.is_empty() {
        println!("No quotations on {} in the last {} months.", lane, months);
        return Ok(());
    }

    let symbol = &config.dashboard.currency_symbol;
    let table_rows: Vec<CustomerTableRow> = rows
        .iter()
        .map(|r| CustomerTableRow {
            customer: r.customer.clone(),
            quotes: r.quotes,
            avg_sell: format_money(r.avg_sell, symbol),
            last_quoted: format_date(&r.last_quoted, &config.dashboard.date_format),
        })
        .collect();

    println!("Customers on {} (last {} months)", lane, months);
    let table = Table::new(table_rows).with(Style::rounded()).to_string();
    println!("{table}");

    Ok(())
}

/// Quotations for allowed customers, newest first
fn cmd_quotes(cfg_dir: &Path, customers: &[String], limit: Option<usize>) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let quotations = load_quotations(cfg_dir, &config)?;

    let allowed: &[String] = if customers.is_empty() {
        &config.customers.allowed
    } else {
        customers
    };
    let rules = config.customers.match_rules();

    let mut matching: Vec<&Quotation> = quotations
        .iter()
        .filter(|q| matches_allowed_with(q, allowed, rules))
        .collect();
    // Undated quotations sort last
    matching.sort_by(|a, b| b.recorded_at().cmp(&a.recorded_at()));
    let shown = &matching[..limit.unwrap_or(matching.len()).min(matching.len())];

    if shown.is_empty() {
        if allowed.is_empty() {
            println!("No customers selected. Use --customer or set [customers] allowed in config.toml.");
        } else {
            println!("No quotations found for: {}", allowed.join(", "));
        }
        return Ok(());
    }

    let symbol = &config.dashboard.currency_symbol;
    let rows: Vec<QuoteRow> = shown
        .iter()
        .enumerate()
        .map(|(idx, q)| {
            let totals = q.totals();
            QuoteRow {
                index: idx + 1,
                id: q.id.clone().unwrap_or_else(|| "-".to_string()),
                date: q
                    .recorded_at()
                    .map(|at| format_date(&at, &config.dashboard.date_format))
                    .unwrap_or_else(|| "-".to_string()),
                customer: freight::resolve_customer_identity(q),
                sell: format_money(totals.sell, symbol),
                margin: format_money(totals.margin, symbol),
                ros: totals
                    .ros
                    .map(|r| format!("{r:.1}%"))
                    .unwrap_or_else(|| "-".to_string()),
                band: ros_band(totals.ros, Some(&config.ros_bands[..]))
                    .map(|b| b.name().to_string())
                    .unwrap_or_else(|| "-".to_string()),
            }
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");
    println!();
    println!("Showing {} of {} matching quotations", shown.len(), matching.len());

    Ok(())
}

/// List or apply ROS bands
fn cmd_bands(cfg_dir: &Path, value: Option<f64>) -> Result<()> {
    let config = load_config(cfg_dir)?;

    if let Some(value) = value {
        if !value.is_finite() {
            return Err(FreightError::InvalidRosValue(value));
        }
        match ros_band(Some(value), Some(&config.ros_bands[..])) {
            Some(band) => println!("{value:.2}% -> {} ({})", band.name(), band.id),
            None => println!("{value:.2}% -> no band"),
        }
        return Ok(());
    }

    if config.ros_bands.is_empty() {
        println!("No ROS bands configured.");
        return Ok(());
    }

    let rows: Vec<BandRow> = config
        .ros_bands
        .iter()
        .map(|b| BandRow {
            id: b.id.clone(),
            label: b.name().to_string(),
            range: format_band_range(b.min, b.max),
        })
        .collect();
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    Ok(())
}

/// Show config and snapshot status
fn cmd_status(cfg_dir: &Path) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let quotations = load_quotations(cfg_dir, &config)?;
    let bookings = load_bookings(cfg_dir, &config)?;

    println!("Freight Status");
    println!("{}", "-".repeat(50));
    println!("Config directory: {}", cfg_dir.display());
    println!("Quotations:       {}", quotations.len());
    println!("Bookings:         {}", bookings.len());
    println!("Default months:   {}", clamp_months(config.dashboard.months));
    println!("ROS bands:        {}", config.ros_bands.len());
    println!("Allowed customers: {}", allowed_summary(&config));

    let latest = quotations.iter().filter_map(Quotation::recorded_at).max();
    if let Some(at) = latest {
        println!(
            "Latest quotation: {}",
            format_date(&at, &config.dashboard.date_format)
        );
    }

    Ok(())
}

fn allowed_summary(config: &Config) -> String {
    if config.customers.allowed.is_empty() {
        "none".to_string()
    } else {
        config.customers.allowed.join(", ")
    }
}

fn format_band_range(min: Option<f64>, max: Option<f64>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("{min:.1}% - <{max:.1}%"),
        (Some(min), None) => format!(">= {min:.1}%"),
        (None, Some(max)) => format!("< {max:.1}%"),
        (None, None) => "any".to_string(),
    }
}

fn format_quantity(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value:.2}")
    }
}

fn format_grouped_int(value: i64) -> String {
    let negative = value < 0;
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    let mut grouped: String = out.chars().rev().collect();
    if negative {
        grouped.insert(0, '-');
    }
    grouped
}

/// Format a money amount with two decimal places and thousands separators
fn format_money(value: f64, currency_symbol: &str) -> String {
    let rounded = format!("{:.2}", value.abs());
    let (whole, frac) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));
    let grouped = format_grouped_int(whole.parse::<i64>().unwrap_or(0));
    let sign = if value < 0.0 && rounded != "0.00" { "-" } else { "" };
    format!("{sign}{currency_symbol}{grouped}.{frac}")
}
