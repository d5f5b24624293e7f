//! Carhart CLI binary.
//!
//! Momentum baskets, UMD factor construction and four-factor regressions
//! over the S&P 500 from the command line.

mod integration;

use carhart::SymbolUniverse;
use carhart_data::Interval;
use carhart_data::cache::CacheStats;
use carhart_data::yahoo::YahooQuoteProvider;
use carhart_factors::UmdConfig;
use carhart_output::{
    BacktestReport, ExportFormat, Exporter, FetchSummary, MomentumReport, RegressionReport, Report,
};
use carhart_regression::{four_factor_regression, umd_regression};
use carhart_strategy::{MomentumConfig, MomentumStrategy};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use integration::cache_manager;
use integration::data_pipeline::{FetchConfig, UniverseData, fetch_universe_data_with_progress};
use integration::factor_data::{asset_returns, load_fama_french, umd_returns};
use polars::prelude::IntoLazy;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration as StdDuration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "carhart")]
#[command(about = "Carhart: momentum strategy and four-factor research toolkit", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Directory of the quote cache database
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Where quotes come from.
#[derive(Args, Debug, Clone)]
struct DataArgs {
    /// First date of the quote history (YYYY-MM-DD)
    #[arg(long, default_value = "2015-01-01")]
    start: NaiveDate,

    /// Last date of the quote history (YYYY-MM-DD, default: today)
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Bar size: 1d, 1wk or 1mo
    #[arg(long, default_value = "1mo")]
    interval: Interval,

    /// Comma-separated symbols to use instead of the S&P 500 universe
    #[arg(long, value_delimiter = ',')]
    symbols: Option<Vec<String>>,

    /// Disable caching (always fetch fresh data)
    #[arg(long)]
    no_cache: bool,

    /// Force refresh cached data
    #[arg(long)]
    refresh: bool,
}

/// How results are written.
#[derive(Args, Debug, Clone)]
struct OutputArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Also write the result as JSON to this file
    #[arg(long)]
    output: Option<PathBuf>,

    /// JSON layout: pretty or json (compact)
    #[arg(long, default_value = "pretty")]
    json_style: ExportFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Markdown,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and cache quotes for the universe
    Fetch {
        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Rank the universe by trailing return and pick long/short baskets
    Momentum {
        #[command(flatten)]
        data: DataArgs,

        /// Trailing return window in bars
        #[arg(long, default_value_t = 12)]
        lookback: usize,

        /// Most recent bars skipped
        #[arg(long, default_value_t = 1)]
        lag: usize,

        /// Securities in each basket
        #[arg(long, default_value_t = 10)]
        num_stocks: usize,

        /// Simulate the strategy period by period
        #[arg(long)]
        backtest: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Build the UMD factor and regress it on the Fama-French factors
    Umd {
        #[command(flatten)]
        data: DataArgs,

        /// Share of the cross-section in each portfolio
        #[arg(long, default_value_t = 0.3)]
        percentile: f64,

        /// Local Fama-French research factors CSV (default: download)
        #[arg(long)]
        ff_file: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Four-factor regression of one security's monthly excess return
    Regress {
        /// Stock symbol
        symbol: String,

        #[command(flatten)]
        data: DataArgs,

        /// Share of the cross-section in each UMD portfolio
        #[arg(long, default_value_t = 0.3)]
        percentile: f64,

        /// Local Fama-French research factors CSV (default: download)
        #[arg(long)]
        ff_file: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show cache statistics or clear the cache
    Cache {
        /// Remove cached quotes
        #[arg(long)]
        clear: bool,

        /// Limit clearing to one symbol
        #[arg(long, requires = "clear")]
        symbol: Option<String>,
    },
}

/// Terminal renderings shared by every report.
trait Render {
    fn to_ascii_table(&self) -> String;
    fn to_markdown(&self) -> String;
}

macro_rules! impl_render {
    ($($report:ty),* $(,)?) => {
        $(impl Render for $report {
            fn to_ascii_table(&self) -> String {
                <$report>::to_ascii_table(self)
            }

            fn to_markdown(&self) -> String {
                <$report>::to_markdown(self)
            }
        })*
    };
}

impl_render!(FetchSummary, MomentumReport, BacktestReport, RegressionReport);

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cache_dir = cli.cache_dir.as_deref();

    match cli.command {
        Commands::Fetch { data, output } => {
            let loaded = load_quotes(&data, cache_dir, None).await?;
            emit("fetch", &loaded.summary, &output)?;
        }
        Commands::Momentum {
            data,
            lookback,
            lag,
            num_stocks,
            backtest,
            output,
        } => {
            let config = MomentumConfig {
                lookback,
                lag,
                num_stocks,
            };
            run_momentum(&data, config, backtest, cache_dir, &output).await?;
        }
        Commands::Umd {
            data,
            percentile,
            ff_file,
            output,
        } => {
            run_umd(&data, UmdConfig { percentile }, ff_file.as_deref(), cache_dir, &output)
                .await?;
        }
        Commands::Regress {
            symbol,
            data,
            percentile,
            ff_file,
            output,
        } => {
            run_regression(
                &symbol,
                &data,
                UmdConfig { percentile },
                ff_file.as_deref(),
                cache_dir,
                &output,
            )
            .await?;
        }
        Commands::Cache { clear, symbol } => {
            manage_cache(clear, symbol.as_deref(), cache_dir)?;
        }
    }

    Ok(())
}

/// Install the log subscriber; `RUST_LOG` overrides the verbosity flag.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Print a report in the requested format, optionally saving it as JSON.
fn emit<T>(kind: &str, report: &T, output: &OutputArgs) -> Result<(), Box<dyn std::error::Error>>
where
    T: Render + serde::Serialize,
{
    match output.format {
        OutputFormat::Text => println!("{}", report.to_ascii_table()),
        OutputFormat::Markdown => println!("{}", report.to_markdown()),
        OutputFormat::Json => {
            let envelope = Report::new(kind, report)?;
            println!("{}", envelope.export_to_string(output.json_style)?);
        }
    }

    if let Some(path) = &output.output {
        Report::new(kind, report)?.export_to_file(path, output.json_style)?;
        tracing::info!(path = %path.display(), "wrote {kind} report");
    }

    Ok(())
}

/// Start of the first day.
fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Ticker in the form the universe and the cache store it.
fn normalized_symbol(symbol: &str) -> Option<String> {
    SymbolUniverse::from_symbols([symbol])
        .symbols()
        .first()
        .cloned()
}

/// First and last bar dates of the loaded quotes.
fn date_span(summary: &FetchSummary) -> Result<(NaiveDate, NaiveDate), Box<dyn std::error::Error>> {
    summary
        .first_date
        .zip(summary.last_date)
        .ok_or_else(|| "loaded quotes carry no dates".into())
}

/// Symbols to load: the explicit list, or the S&P 500, plus any extra symbol.
fn resolve_universe(data: &DataArgs, extra: Option<&str>) -> SymbolUniverse {
    let mut symbols: Vec<String> = match &data.symbols {
        Some(list) => list.clone(),
        None => SymbolUniverse::sp500().symbols().to_vec(),
    };
    symbols.extend(extra.map(str::to_string));
    SymbolUniverse::from_symbols(symbols)
}

/// Load quotes for the universe through the cache with a progress bar.
async fn load_quotes(
    data: &DataArgs,
    cache_dir: Option<&Path>,
    extra: Option<&str>,
) -> Result<UniverseData, Box<dyn std::error::Error>> {
    let universe = resolve_universe(data, extra);
    if universe.is_empty() {
        return Err("no symbols to fetch".into());
    }

    let start = start_of_day(data.start);
    let end = data.end.map_or_else(Utc::now, start_of_day);

    let config = FetchConfig {
        use_cache: !data.no_cache,
        force_refresh: data.refresh,
        interval: data.interval,
        cache_dir: cache_dir.map(Path::to_path_buf),
    };

    tracing::info!(
        symbols = universe.len(),
        start = %start.date_naive(),
        end = %end.date_naive(),
        interval = %config.interval,
        "loading quotes"
    );

    let provider = YahooQuoteProvider::new()?;

    let pb = ProgressBar::new(universe.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("█▓░"),
    );
    pb.enable_steady_tick(StdDuration::from_millis(100));
    pb.set_message("Fetching universe data...");

    let result =
        fetch_universe_data_with_progress(&provider, universe.symbols(), start, end, &config, Some(&pb))
            .await;

    match result {
        Ok(loaded) => {
            pb.finish_with_message(format!(
                "Loaded {} of {} symbols",
                loaded.summary.fetched, loaded.summary.requested
            ));
            Ok(loaded)
        }
        Err(e) => {
            pb.finish_with_message("Failed!");
            Err(e.into())
        }
    }
}

async fn run_momentum(
    data: &DataArgs,
    config: MomentumConfig,
    backtest: bool,
    cache_dir: Option<&Path>,
    output: &OutputArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let strategy = MomentumStrategy::new(config)?;
    let loaded = load_quotes(data, cache_dir, None).await?;

    let selection = strategy.select(loaded.quotes.clone().lazy())?;
    emit("momentum", &MomentumReport::new(config, selection), output)?;

    if backtest {
        let result = strategy.backtest(loaded.quotes.lazy(), data.interval)?;
        let backtest_output = OutputArgs {
            format: output.format,
            output: output.output.as_ref().map(|path| path.with_extension("backtest.json")),
            json_style: output.json_style,
        };
        emit("backtest", &BacktestReport::new(config, result), &backtest_output)?;
    }

    Ok(())
}

async fn run_umd(
    data: &DataArgs,
    config: UmdConfig,
    ff_file: Option<&Path>,
    cache_dir: Option<&Path>,
    output: &OutputArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let loaded = load_quotes(data, cache_dir, None).await?;
    let umd = umd_returns(&loaded.quotes, config)?;

    let (first, last) = date_span(&loaded.summary)?;
    let factors = load_fama_french(ff_file, first, last).await?.to_frame()?;

    let results = umd_regression(&umd, &factors)?;
    let report = RegressionReport::new("UMD on Fama-French three factors", "UMD", results);
    emit("umd_regression", &report, output)
}

async fn run_regression(
    symbol: &str,
    data: &DataArgs,
    config: UmdConfig,
    ff_file: Option<&Path>,
    cache_dir: Option<&Path>,
    output: &OutputArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let symbol = normalized_symbol(symbol).ok_or("empty symbol")?;

    let loaded = load_quotes(data, cache_dir, Some(&symbol)).await?;
    let asset = asset_returns(&loaded.quotes, &symbol)?;
    let umd = umd_returns(&loaded.quotes, config)?;

    let (first, last) = date_span(&loaded.summary)?;
    let factors = load_fama_french(ff_file, first, last).await?.to_frame()?;

    let results = four_factor_regression(&asset, &umd, &factors)?;
    let title = format!("Carhart four-factor regression: {symbol}");
    let report = RegressionReport::new(title, format!("{symbol} excess return"), results);
    emit("four_factor_regression", &report, output)
}

fn manage_cache(
    clear: bool,
    symbol: Option<&str>,
    cache_dir: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = cache_manager::cache_path(cache_dir);
    let cache = cache_manager::open_cache(cache_dir)?;

    if clear {
        match symbol {
            Some(symbol) => {
                let symbol = normalized_symbol(symbol).ok_or("empty symbol")?;
                cache.clear_symbol(&symbol)?;
                println!("Cleared cached quotes for {symbol}");
            }
            None => {
                cache.clear_all()?;
                println!("Cleared all cached quotes");
            }
        }
        return Ok(());
    }

    print_cache_stats(&path, &cache.get_stats()?);
    Ok(())
}

fn print_cache_stats(path: &Path, stats: &CacheStats) {
    println!("\nQuote Cache");
    println!("{}", "=".repeat(80));
    println!("  Location:          {}", path.display());
    println!("  Symbols:           {}", stats.unique_symbols);
    println!("  Total bars:        {}", stats.total_quotes);
    println!("    Daily:           {}", stats.daily_quotes);
    println!("    Weekly:          {}", stats.weekly_quotes);
    println!("    Monthly:         {}", stats.monthly_quotes);
}
