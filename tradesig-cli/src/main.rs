//! TradeSig CLI: build feature tables and evaluate signals.
//!
//! Commands:
//! - `features`: build the feature table for a symbol and print it as CSV or JSON
//! - `signal`: evaluate one RSI signal variant and print the decision
//!
//! Candles come from a CSV file or the synthetic random walk; trades from an
//! optional JSON trade log. Logs go to stderr, filtered by `RUST_LOG`.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tradesig_core::data::{
    CandleSource, CsvCandleSource, JsonTradeLog, MemoryTradeLog, SyntheticCandleSource,
    TradeLogSource,
};
use tradesig_core::domain::MarketConditions;
use tradesig_core::{FeatureBuilder, PipelineConfig, RsiSignalGenerator, Strategy};

#[derive(Parser)]
#[command(
    name = "tradesig",
    about = "TradeSig CLI: market features and RSI trading signals"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the feature table for a symbol.
    Features {
        #[command(flatten)]
        input: InputArgs,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,
    },
    /// Evaluate a signal variant for a symbol.
    Signal {
        #[command(flatten)]
        input: InputArgs,

        /// Variant: momentum, trend or volatility.
        #[arg(long, default_value = "trend")]
        strategy: Strategy,

        /// Externally computed success probability in [0, 1].
        #[arg(long)]
        success_prob: Option<f64>,

        /// Market-wide average volatility (used by the volatility variant).
        #[arg(long)]
        avg_volatility: Option<f64>,

        /// Market-wide average drop.
        #[arg(long)]
        avg_drop: Option<f64>,

        /// Evaluate over the built feature table instead of the raw candles.
        #[arg(long, default_value_t = false)]
        use_features: bool,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Symbol, e.g. BTC/USDT.
    #[arg(long)]
    symbol: String,

    /// CSV file with timestamp,open,high,low,close,volume[,symbol].
    #[arg(long, conflicts_with = "synthetic")]
    candles: Option<PathBuf>,

    /// Use the seeded synthetic random walk instead of a candle file.
    #[arg(long, default_value_t = false)]
    synthetic: bool,

    /// Seed for the synthetic walk.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Last synthetic candle time (RFC 3339). Defaults to now.
    #[arg(long)]
    end: Option<String>,

    /// JSON trade log. Without it the symbol has no trade history.
    #[arg(long)]
    trades: Option<PathBuf>,

    /// Pipeline TOML config. Defaults apply to anything not set.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Features { input, format } => run_features(&input, format),
        Commands::Signal {
            input,
            strategy,
            success_prob,
            avg_volatility,
            avg_drop,
            use_features,
        } => {
            let market = MarketConditions {
                avg_volatility,
                avg_drop,
            };
            run_signal(&input, strategy, &market, success_prob, use_features)
        }
    }
}

fn load_config(input: &InputArgs) -> Result<PipelineConfig> {
    match &input.config {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(PipelineConfig::default()),
    }
}

fn candle_source(input: &InputArgs) -> Result<Box<dyn CandleSource>> {
    if let Some(path) = &input.candles {
        return Ok(Box::new(CsvCandleSource::new(path)));
    }
    if !input.synthetic {
        bail!("provide --candles <file.csv> or --synthetic");
    }
    let end = match &input.end {
        Some(s) => DateTime::parse_from_rfc3339(s)
            .with_context(|| format!("invalid --end '{s}'"))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };
    Ok(Box::new(SyntheticCandleSource::new(input.seed, end)))
}

fn trade_source(input: &InputArgs) -> Box<dyn TradeLogSource> {
    match &input.trades {
        Some(path) => Box::new(JsonTradeLog::new(path)),
        None => Box::new(MemoryTradeLog::empty()),
    }
}

fn run_features(input: &InputArgs, format: OutputFormat) -> Result<()> {
    let config = load_config(input)?;
    let builder = FeatureBuilder::new(candle_source(input)?, trade_source(input), config.features);

    let table = builder
        .try_build(&input.symbol)
        .with_context(|| format!("building features for {}", input.symbol))?;
    info!(
        symbol = %input.symbol,
        rows = table.len(),
        trade_columns = table.has_trade_features(),
        fingerprint = %table.fingerprint(),
        "feature table built"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Csv => table.write_csv(&mut out)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &table)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn run_signal(
    input: &InputArgs,
    strategy: Strategy,
    market: &MarketConditions,
    success_prob: Option<f64>,
    use_features: bool,
) -> Result<()> {
    let config = load_config(input)?;
    let generator = RsiSignalGenerator::for_strategy(strategy).with_params(config.signals);
    let candles = candle_source(input)?;

    let evaluation = if use_features {
        let builder = FeatureBuilder::new(candles, trade_source(input), config.features);
        let table = builder
            .try_build(&input.symbol)
            .with_context(|| format!("building features for {}", input.symbol))?;
        generator.evaluate(&table, Some(market), success_prob)
    } else {
        let raw = candles
            .fetch_candles(
                &input.symbol,
                config.features.timeframe,
                config.features.candle_limit,
            )
            .with_context(|| format!("fetching candles for {}", input.symbol))?;
        generator.evaluate(raw.as_slice(), Some(market), success_prob)
    };

    let report = match evaluation {
        Ok(eval) => serde_json::json!({
            "symbol": input.symbol,
            "strategy": strategy,
            "signal": eval.signal.value(),
            "evaluation": eval,
        }),
        Err(err) => serde_json::json!({
            "symbol": input.symbol,
            "strategy": strategy,
            "signal": 0,
            "reason": err.to_string(),
        }),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
