//! TrendScope CLI — technical analysis and trade signals from OHLCV data.
//!
//! Commands:
//! - `analyze` — indicator snapshot, buy/sell score and trade plan for one symbol
//! - `position` — hold/exit review of an open LONG, SHORT or SPOT position
//! - `scan` — analyze every watchlist symbol in parallel and rank by score
//!
//! Data comes from CSV kline exports (`--csv FILE|DIR`) or a seeded synthetic
//! random walk (`--synthetic`). Logs go to stderr; `--json` output on stdout.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use serde::Serialize;
use std::path::PathBuf;
use trendscope_core::data::{CsvSource, MarketDataSource, SyntheticSource};
use trendscope_core::domain::Timeframe;
use trendscope_core::pipeline::{analyze_symbol, review_position, PositionRequest};
use trendscope_core::signals::{parse_price, PlanVerdict, PositionSide};
use trendscope_core::{AnalysisReport, PositionReport, TrendScopeConfig};

#[derive(Parser)]
#[command(
    name = "trendscope",
    about = "TrendScope CLI — technical analysis and trade signals"
)]
struct Cli {
    /// Path to a TOML config file. Defaults are used when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter (e.g. "debug", "trendscope_core=trace"). Overrides RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// CSV kline file, or a directory of <SYMBOL>_<timeframe>.csv files.
    #[arg(long, conflicts_with = "synthetic")]
    csv: Option<PathBuf>,

    /// Use seeded synthetic data instead of CSV files.
    #[arg(long, default_value_t = false)]
    synthetic: bool,

    /// Seed for synthetic data.
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one symbol: indicators, score and trade plan.
    Analyze {
        /// Symbol, e.g. BTC/USDT.
        #[arg(long, default_value = "BTC/USDT")]
        symbol: String,

        /// Timeframe: 15m, 1h, 4h, 1d, 3d, 1w, 1M.
        #[arg(long, default_value = "4h")]
        timeframe: Timeframe,

        #[command(flatten)]
        source: SourceArgs,

        /// Print the report as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Review an open position.
    Position {
        #[arg(long, default_value = "BTC/USDT")]
        symbol: String,

        #[arg(long, default_value = "1h")]
        timeframe: Timeframe,

        /// long, short or spot.
        #[arg(long)]
        side: PositionSide,

        /// Entry price; "," is accepted as decimal separator.
        #[arg(long)]
        entry: String,

        /// Current price. Defaults to the source's last price.
        #[arg(long)]
        current: Option<String>,

        #[command(flatten)]
        source: SourceArgs,

        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Analyze every watchlist symbol and rank by buy score.
    Scan {
        #[arg(long, default_value = "4h")]
        timeframe: Timeframe,

        /// Symbols to scan. Defaults to the config watchlist.
        symbols: Vec<String>,

        #[command(flatten)]
        source: SourceArgs,

        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    let config = match &cli.config {
        Some(path) => TrendScopeConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => TrendScopeConfig::default(),
    };

    match cli.command {
        Commands::Analyze {
            symbol,
            timeframe,
            source,
            json,
        } => run_analyze(&config, &symbol, timeframe, &source, json),
        Commands::Position {
            symbol,
            timeframe,
            side,
            entry,
            current,
            source,
            json,
        } => {
            let request = PositionRequest {
                symbol,
                timeframe,
                side,
                entry_price: parse_price(&entry).context("--entry")?,
                current_price: current
                    .as_deref()
                    .map(parse_price)
                    .transpose()
                    .context("--current")?,
            };
            run_position(&config, &request, &source, json)
        }
        Commands::Scan {
            timeframe,
            symbols,
            source,
            json,
        } => {
            let symbols = if symbols.is_empty() {
                config.data.watchlist.clone()
            } else {
                symbols
            };
            run_scan(&config, &symbols, timeframe, &source, json)
        }
    }
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => tracing_subscriber::EnvFilter::new(level),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_source(args: &SourceArgs) -> Result<Box<dyn MarketDataSource>> {
    match (&args.csv, args.synthetic) {
        (Some(path), _) if path.is_dir() => Ok(Box::new(CsvSource::directory(path))),
        (Some(path), _) if path.is_file() => Ok(Box::new(CsvSource::file(path))),
        (Some(path), _) => bail!("CSV path does not exist: {}", path.display()),
        (None, true) => {
            tracing::info!(seed = args.seed, "using synthetic data");
            Ok(Box::new(SyntheticSource::new(args.seed)))
        }
        (None, false) => bail!("no data source: pass --csv <FILE|DIR> or --synthetic"),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Serialized name of a status enum, e.g. `STRONG_LONG`.
fn label<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => s,
        _ => "?".to_string(),
    }
}

/// Precision scaled to the magnitude, so sub-cent coins stay readable.
fn price(value: f64) -> String {
    if value.abs() >= 1000.0 {
        format!("{value:.0}")
    } else if value.abs() >= 1.0 {
        format!("{value:.2}")
    } else {
        format!("{value:.6}")
    }
}

fn minutes(total: u32) -> String {
    match total {
        m if m >= 1440 && m % 1440 == 0 => format!("{}d", m / 1440),
        m if m >= 60 && m % 60 == 0 => format!("{}h", m / 60),
        m => format!("{m}m"),
    }
}

fn run_analyze(
    config: &TrendScopeConfig,
    symbol: &str,
    timeframe: Timeframe,
    source_args: &SourceArgs,
    json: bool,
) -> Result<()> {
    let source = build_source(source_args)?;
    let report = analyze_symbol(source.as_ref(), symbol, timeframe, config)
        .with_context(|| format!("analyzing {symbol} {timeframe}"))?;

    if json {
        return print_json(&report);
    }
    print_analysis(&report);
    Ok(())
}

fn print_analysis(report: &AnalysisReport) {
    let s = &report.snapshot;
    let ma = &s.moving_averages;

    println!("{} {}  [{}]", report.symbol, report.timeframe, report.source);
    println!("Data:    {}  hash {}", s.data_quality, report.dataset_hash.short());
    if !report.sanitize.is_clean() {
        println!(
            "         dropped {} non-finite, {} duplicate rows",
            report.sanitize.dropped_non_finite, report.sanitize.dropped_duplicates
        );
    }
    println!("Price:   {}", price(s.current_price));
    println!();
    println!("{}", "-".repeat(50));
    println!("RSI:     {:.1}", s.rsi);
    println!(
        "EMA:     fast {}  slow {}  sma {}  {}",
        price(ma.ema_fast),
        price(ma.ema_slow),
        price(ma.sma),
        label(&ma.cross_status)
    );
    println!("         price vs slow {:+.2}%", ma.price_vs_slow_pct);
    println!("Volume:  {} ({:.2}x)", label(&s.volume.trend), s.volume.ratio);
    println!(
        "Trend:   {} / {}  ({:+.2}% window, {:+.2}% medium)",
        label(&s.trend.label),
        label(&s.trend.strength),
        s.trend.pct_change,
        s.trend.medium_pct_change
    );
    println!(
        "Squeeze: {} {}  ({:.4})",
        label(&s.squeeze.status),
        label(&s.squeeze.momentum_trend),
        s.squeeze.value
    );
    println!(
        "ADX:     {:.1} {}  +DI {:.1}  -DI {:.1}  {}",
        s.adx.adx,
        label(&s.adx.strength),
        s.adx.plus_di,
        s.adx.minus_di,
        label(&s.adx.direction)
    );
    println!("{}", "-".repeat(50));

    let o = &report.outcome;
    println!();
    println!(
        "Signal:  {}  buy {:.0}%  sell {:.0}%",
        label(&o.side),
        o.buy_score_pct,
        o.sell_score_pct
    );
    if let Some(bias) = &o.bias {
        println!("         bias {}", label(bias));
    }
    if let Some(missing) = &o.missing_confirmation {
        println!("         missing {}", label(missing));
    }
    for criterion in &o.satisfied_criteria {
        println!("  + {criterion}");
    }

    println!();
    match &report.plan {
        PlanVerdict::Long(plan) => {
            println!(
                "Plan:    LONG  {} momentum, {} entry ({})",
                label(&plan.momentum_tier),
                label(&plan.entry_tier),
                label(&plan.entry_rationale)
            );
            println!("         entry  {}", price(plan.entry_price));
            if plan.current_price_is_entry {
                println!("         current price is a valid entry");
            } else {
                println!("         current price {:.1}% away", plan.entry_gap_pct);
            }
            println!("         stop   {}", price(plan.stop_price));
            println!("         target {} / {}", price(plan.target1), price(plan.target2));
            println!("         reward:risk {}", label(&plan.risk_reward_class));
        }
        PlanVerdict::Short(plan) => {
            println!("Plan:    SHORT");
            println!("         entry  {}", price(plan.entry_price));
            println!("         stop   {}", price(plan.stop_price));
            println!("         target {}", price(plan.target));
            println!("         reward:risk {}", label(&plan.risk_reward_class));
        }
        PlanVerdict::Wait(reason) => println!("Plan:    WAIT ({})", label(reason)),
    }
    if let Some(h) = &report.holding {
        println!(
            "Holding: {}  {} to {}, review after {}",
            label(&h.style),
            minutes(h.min_hold_minutes),
            minutes(h.max_hold_minutes),
            minutes(h.review_after_minutes)
        );
    }
}

fn run_position(
    config: &TrendScopeConfig,
    request: &PositionRequest,
    source_args: &SourceArgs,
    json: bool,
) -> Result<()> {
    let source = build_source(source_args)?;
    let report = review_position(source.as_ref(), request, config)
        .with_context(|| format!("reviewing {} position on {}", request.side, request.symbol))?;

    if json {
        return print_json(&report);
    }
    print_position(&report);
    Ok(())
}

fn print_position(report: &PositionReport) {
    let r = &report.review;
    println!("{} {} {}  [{}]", report.symbol, report.timeframe, r.side, report.source);
    println!("Entry:   {}", price(r.entry_price));
    println!("Current: {}", price(r.current_price));
    println!("PnL:     {:+.2} ({:+.2}%)", r.pnl, r.pnl_pct);
    println!("Data:    {}", report.snapshot.data_quality);
    println!();
    println!("Action:  {}", label(&r.action));
    if let Some(stop) = r.stop_price {
        println!("         move stop to {}", price(stop));
    }
    if let Some(target) = r.target_price {
        println!("         target {}", price(target));
    }
    match (r.trigger_price, r.sell_fraction) {
        (Some(trigger), Some(fraction)) => {
            println!("         sell {:.0}% at {}", fraction * 100.0, price(trigger))
        }
        (Some(trigger), None) => println!("         sell at {}", price(trigger)),
        _ => {}
    }
}

#[derive(Serialize)]
struct ScanRow {
    symbol: String,
    report: Option<AnalysisReport>,
    error: Option<String>,
}

fn run_scan(
    config: &TrendScopeConfig,
    symbols: &[String],
    timeframe: Timeframe,
    source_args: &SourceArgs,
    json: bool,
) -> Result<()> {
    let source = build_source(source_args)?;
    let source = source.as_ref();

    let mut rows: Vec<ScanRow> = symbols
        .par_iter()
        .map(|symbol| match analyze_symbol(source, symbol, timeframe, config) {
            Ok(report) => ScanRow {
                symbol: symbol.clone(),
                report: Some(report),
                error: None,
            },
            Err(err) => {
                tracing::warn!(%symbol, %err, "scan skipped symbol");
                ScanRow {
                    symbol: symbol.clone(),
                    report: None,
                    error: Some(err.to_string()),
                }
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        let score = |row: &ScanRow| row.report.as_ref().map_or(-1.0, |r| r.outcome.buy_score_pct);
        score(b).total_cmp(&score(a)).then_with(|| a.symbol.cmp(&b.symbol))
    });

    if json {
        return print_json(&rows);
    }

    println!(
        "{:<12} {:>10} {:>6} {:>6} {:<14} {:<8}",
        "Symbol", "Price", "Buy", "Sell", "Signal", "Plan"
    );
    println!("{}", "-".repeat(62));
    for row in &rows {
        match &row.report {
            Some(r) => {
                let plan = match &r.plan {
                    PlanVerdict::Long(p) => format!("LONG {}", label(&p.entry_tier)),
                    PlanVerdict::Short(_) => "SHORT".to_string(),
                    PlanVerdict::Wait(_) => "WAIT".to_string(),
                };
                println!(
                    "{:<12} {:>10} {:>5.0}% {:>5.0}% {:<14} {:<8}",
                    row.symbol,
                    price(r.snapshot.current_price),
                    r.outcome.buy_score_pct,
                    r.outcome.sell_score_pct,
                    label(&r.outcome.side),
                    plan
                );
            }
            None => println!(
                "{:<12} error: {}",
                row.symbol,
                row.error.as_deref().unwrap_or("unknown")
            ),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_precision_follows_magnitude() {
        assert_eq!(price(110816.4), "110816");
        assert_eq!(price(12.346), "12.35");
        assert_eq!(price(0.0114), "0.011400");
    }

    #[test]
    fn minutes_pick_largest_whole_unit() {
        assert_eq!(minutes(90), "90m");
        assert_eq!(minutes(120), "2h");
        assert_eq!(minutes(4320), "3d");
    }

    #[test]
    fn labels_use_serialized_names() {
        assert_eq!(label(&PositionSide::Spot), "SPOT");
        assert_eq!(label(&Timeframe::OneMonth), "1M");
    }

    #[test]
    fn cli_parses_position_command() {
        let cli = Cli::try_parse_from([
            "trendscope",
            "position",
            "--side",
            "Spot",
            "--entry",
            "0,0114",
            "--synthetic",
        ])
        .unwrap();
        match cli.command {
            Commands::Position { side, entry, .. } => {
                assert_eq!(side, PositionSide::Spot);
                assert_eq!(entry, "0,0114");
            }
            _ => panic!("expected position command"),
        }
    }

    #[test]
    fn csv_and_synthetic_conflict() {
        assert!(Cli::try_parse_from([
            "trendscope",
            "analyze",
            "--csv",
            "data.csv",
            "--synthetic",
        ])
        .is_err());
    }
}
