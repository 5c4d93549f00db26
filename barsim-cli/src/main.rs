//! barsim CLI: run backtests, list strategies, generate synthetic bars.
//!
//! Commands:
//! - `run`: execute one or more backtests from TOML config files
//! - `strategies`: list registered strategy names
//! - `synth`: write deterministic synthetic bars as CSV

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use tracing::info;

use barsim_core::data::{synthetic_bars, write_bars, Timeframe};
use barsim_core::strategy::StrategyRegistry;
use barsim_runner::{run_batch, save_artifacts, BacktestConfig, BacktestResult};

#[derive(Parser)]
#[command(name = "barsim", about = "barsim: bar replay backtesting simulator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute backtests from TOML config files. Several configs run in parallel.
    Run {
        /// Path to a TOML config file. Repeat for a batch.
        #[arg(long, required = true)]
        config: Vec<PathBuf>,

        /// Output directory for artifacts. Nothing is written when omitted.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// List registered strategy names.
    Strategies,
    /// Write synthetic bars to a CSV file.
    Synth {
        #[arg(long, default_value = "BTCUSDT")]
        symbol: String,

        /// Start date (YYYY-MM-DD).
        #[arg(long)]
        start: NaiveDate,

        /// End date (YYYY-MM-DD), inclusive.
        #[arg(long)]
        end: NaiveDate,

        /// Bar size: 1m, 5m, 15m, 1h, 4h, 1d, 1w.
        #[arg(long, default_value = "1d")]
        timeframe: Timeframe,

        /// Destination CSV path.
        #[arg(long)]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, output_dir } => run_cmd(config, output_dir),
        Commands::Strategies => {
            for name in StrategyRegistry::with_builtins().names() {
                println!("{name}");
            }
            Ok(())
        }
        Commands::Synth {
            symbol,
            start,
            end,
            timeframe,
            out,
        } => synth_cmd(&symbol, start, end, timeframe, out),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

fn run_cmd(config_paths: Vec<PathBuf>, output_dir: Option<PathBuf>) -> Result<()> {
    let configs = config_paths
        .iter()
        .map(|path| {
            BacktestConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    let registry = StrategyRegistry::with_builtins();
    let mut failures = 0;

    for (path, outcome) in config_paths.iter().zip(run_batch(&configs, &registry)) {
        match outcome {
            Ok(result) => {
                print_summary(&result);
                if let Some(dir) = &output_dir {
                    let paths = save_artifacts(dir, &result)?;
                    println!("Artifacts saved to: {}", paths.dir.display());
                }
            }
            Err(err) => {
                failures += 1;
                eprintln!("Error for {}: {err}", path.display());
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} backtests failed", configs.len());
    }
    Ok(())
}

fn print_summary(result: &BacktestResult) {
    let r = &result.report;
    println!();
    println!("Run:            {}", result.run_id);
    println!("Strategy:       {} {}", result.strategy, format_params(result));
    println!("Symbol:         {}", result.symbol);
    println!("Bars:           {}", result.bar_count);
    println!("{}", "-".repeat(40));
    println!("Final equity:   {:.2}", result.final_equity());
    println!("Total return:   {:.2}%", r.total_return * 100.0);
    println!("Annualized:     {:.2}%", r.annualized_return * 100.0);
    println!("Max drawdown:   {:.2}%", r.max_drawdown * 100.0);
    println!("Volatility:     {:.2}%", r.volatility * 100.0);
    println!("Sharpe (step):  {:.4}", r.sharpe_ratio);
    println!("Orders:         {}", r.total_trades);
    println!("Win/Loss:       {}/{}", r.winning_trades, r.losing_trades);
    println!("Win rate:       {:.2}%", r.win_rate * 100.0);
    println!("Profit factor:  {:.2}", r.profit_factor);
}

fn format_params(result: &BacktestResult) -> String {
    if result.parameters.is_empty() {
        return String::new();
    }
    let inner: Vec<String> = result
        .parameters
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect();
    format!("({})", inner.join(", "))
}

fn synth_cmd(
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
    timeframe: Timeframe,
    out: PathBuf,
) -> Result<()> {
    if start > end {
        bail!("--start {start} is after --end {end}");
    }
    let start = start.and_time(NaiveTime::MIN).and_utc();
    let end = end
        .and_hms_opt(23, 59, 59)
        .map(|dt| dt.and_utc())
        .context("invalid end date")?;

    let bars = synthetic_bars(symbol, start, end, timeframe);
    let file = File::create(&out).with_context(|| format!("creating {}", out.display()))?;
    write_bars(BufWriter::new(file), &bars)?;

    info!(symbol, bars = bars.len(), path = %out.display(), "synthetic bars written");
    println!("Wrote {} bars to {}", bars.len(), out.display());
    Ok(())
}
