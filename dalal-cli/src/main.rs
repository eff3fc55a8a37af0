//! Dalal CLI: technical analysis of daily stock CSVs.
//!
//! Commands:
//! - `analyze`: summary, votes, levels and trade plan for one series
//! - `indicators`: export every indicator series as CSV
//! - `scan`: rank many series by their vote sum
//! - `news`: keyword sentiment over a file of headlines

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use dalal_core::cache::{DiskStore, SummaryCache};
use dalal_core::config::AnalysisConfig;
use dalal_core::data::{load_csv, write_indicators};
use dalal_core::domain::{Period, PriceSeries};
use dalal_core::levels::Level;
use dalal_core::news::{analyze_batch, trending_topics, NewsDigest, NewsItem};
use dalal_core::overview::PriceOverview;
use dalal_core::plan::TradePlan;
use dalal_core::signals::SignalVote;
use dalal_core::summary::{TechnicalAnalyzer, TechnicalSummary};

#[derive(Parser)]
#[command(
    name = "dalal",
    about = "Dalal CLI: technical indicators and signal votes for daily stock data"
)]
struct Cli {
    /// Log at debug level unless RUST_LOG is set.
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Technical summary for one CSV series.
    Analyze {
        /// CSV with date,open,high,low,close,volume columns.
        csv: PathBuf,

        /// Symbol to report. Defaults to the file name without extension.
        #[arg(long)]
        symbol: Option<String>,

        /// TOML analysis config.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Lookback: 1mo, 3mo, 6mo, 1y, 2y, 5y or max.
        #[arg(long, default_value = "1y")]
        period: Period,

        /// Print JSON instead of the text report.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Memoize summaries as JSON files in this directory.
        #[arg(long)]
        cache_dir: Option<PathBuf>,
    },
    /// Export every indicator series as CSV.
    Indicators {
        csv: PathBuf,

        #[arg(long)]
        symbol: Option<String>,

        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long, default_value = "1y")]
        period: Period,

        /// Output file. Defaults to stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Rank several CSV series by signal strength.
    Scan {
        #[arg(required = true)]
        csvs: Vec<PathBuf>,

        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long, default_value = "1y")]
        period: Period,

        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Keyword sentiment over a file with one headline per line.
    News {
        file: PathBuf,

        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Analyze {
            csv,
            symbol,
            config,
            period,
            json,
            cache_dir,
        } => run_analyze(&csv, symbol, config.as_deref(), period, json, cache_dir),
        Commands::Indicators {
            csv,
            symbol,
            config,
            period,
            out,
        } => run_indicators(&csv, symbol, config.as_deref(), period, out),
        Commands::Scan {
            csvs,
            config,
            period,
            json,
        } => run_scan(&csvs, config.as_deref(), period, json),
        Commands::News { file, json } => run_news(&file, json),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    match path {
        Some(p) => AnalysisConfig::from_file(p)
            .with_context(|| format!("failed to load config {}", p.display())),
        None => Ok(AnalysisConfig::default()),
    }
}

fn symbol_for(path: &Path, symbol: Option<String>) -> Result<String> {
    if let Some(s) = symbol {
        return Ok(s);
    }
    match path.file_stem().and_then(|s| s.to_str()) {
        Some(stem) if !stem.is_empty() => Ok(stem.to_string()),
        _ => bail!("cannot derive a symbol from {}; pass --symbol", path.display()),
    }
}

fn load_series(path: &Path, symbol: &str) -> Result<PriceSeries> {
    let series =
        load_csv(path, symbol).with_context(|| format!("failed to load {}", path.display()))?;
    info!(symbol, bars = series.len(), path = %path.display(), "loaded series");
    Ok(series)
}

// ─── analyze ────────────────────────────────────────────────────────

#[derive(Serialize)]
struct AnalysisReport {
    summary: TechnicalSummary,
    overview: Option<PriceOverview>,
    plan: TradePlan,
}

fn run_analyze(
    csv: &Path,
    symbol: Option<String>,
    config_path: Option<&Path>,
    period: Period,
    json: bool,
    cache_dir: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let symbol = symbol_for(csv, symbol)?;
    let full = load_series(csv, &symbol)?;

    let summary = match cache_dir {
        Some(dir) => {
            let cache = SummaryCache::new(DiskStore::new(&dir).with_context(|| {
                format!("failed to open summary cache {}", dir.display())
            })?);
            cache.get_or_compute(&full, period, &config)?
        }
        None => TechnicalAnalyzer::new(config.clone()).summary(&full.trailing(period)),
    };

    let series = full.trailing(period);
    let overview = PriceOverview::from_series(&series);
    let plan = match &overview {
        Some(ov) => TradePlan::for_recommendation(summary.recommendation, ov.last_close, &config.plan),
        None => TradePlan::Hold,
    };

    let report = AnalysisReport {
        summary,
        overview,
        plan,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, period);
    }
    Ok(())
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map_or_else(|| "n/a".to_string(), |x| format!("{x:.2}"))
}

fn fmt_levels(levels: &[Level]) -> String {
    if levels.is_empty() {
        return "none".to_string();
    }
    levels
        .iter()
        .map(|l| format!("{:.2} ({})", l.price, l.date))
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_report(report: &AnalysisReport, period: Period) {
    let s = &report.summary;
    let as_of = s.as_of.map_or_else(|| "no data".to_string(), |d| d.to_string());

    println!("{} ({period}, {} bars, as of {as_of})", s.symbol, s.bar_count);
    println!("{}", "-".repeat(60));

    if let Some(ov) = &report.overview {
        println!(
            "Close:          {:.2}  {:+.2} ({:+.2}%)",
            ov.last_close, ov.change, ov.change_pct
        );
        println!("Day range:      {:.2} - {:.2}", ov.day_low, ov.day_high);
        println!("Period range:   {:.2} - {:.2}", ov.period_low, ov.period_high);
        println!("Volume:         {}", ov.volume);
        println!();
    }

    println!("Recommendation: {}  (confidence {:.0}%)", s.recommendation, s.confidence);
    for (name, vote) in s.votes.named() {
        println!("  {name:<14}{vote}");
    }
    println!();
    println!("RSI:            {}", fmt_opt(s.rsi));
    println!(
        "MACD:           {}  signal {}  histogram {}",
        fmt_opt(s.macd),
        fmt_opt(s.macd_signal),
        fmt_opt(s.macd_histogram)
    );
    println!(
        "SMA fast/slow:  {} / {}",
        fmt_opt(s.snapshot.sma_fast),
        fmt_opt(s.snapshot.sma_slow)
    );
    println!(
        "Bollinger:      {} / {} / {}",
        fmt_opt(s.snapshot.bollinger_upper),
        fmt_opt(s.snapshot.bollinger_middle),
        fmt_opt(s.snapshot.bollinger_lower)
    );
    println!(
        "Stochastic:     %K {}  %D {}",
        fmt_opt(s.snapshot.stochastic_k),
        fmt_opt(s.snapshot.stochastic_d)
    );
    println!();
    println!("Support:        {}", fmt_levels(&s.support_levels));
    println!("Resistance:     {}", fmt_levels(&s.resistance_levels));
    println!();

    match report.plan {
        TradePlan::Enter {
            entry,
            stop_loss,
            target_1,
            target_2,
        } => {
            println!("Plan:           enter at {entry:.2}");
            println!("  stop loss     {stop_loss:.2}");
            println!("  target 1      {target_1:.2}");
            println!("  target 2      {target_2:.2}");
        }
        TradePlan::Exit => println!("Plan:           exit or avoid; wait for support before re-entry"),
        TradePlan::Hold => println!("Plan:           hold; wait for a clearer signal"),
    }
}

// ─── indicators ─────────────────────────────────────────────────────

fn run_indicators(
    csv: &Path,
    symbol: Option<String>,
    config_path: Option<&Path>,
    period: Period,
    out: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let symbol = symbol_for(csv, symbol)?;
    let series = load_series(csv, &symbol)?.trailing(period);
    let overlays = TechnicalAnalyzer::new(config).overlays(&series);

    match out {
        Some(path) => {
            let file = std::fs::File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            write_indicators(file, &series, &overlays)?;
            info!(path = %path.display(), series = overlays.len(), "wrote indicators");
        }
        None => write_indicators(std::io::stdout().lock(), &series, &overlays)?,
    }
    Ok(())
}

// ─── scan ───────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ScanRow {
    symbol: String,
    vote_sum: i32,
    summary: TechnicalSummary,
}

fn run_scan(csvs: &[PathBuf], config_path: Option<&Path>, period: Period, json: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let analyzer = TechnicalAnalyzer::new(config);

    let results: Vec<(PathBuf, Result<ScanRow>)> = csvs
        .par_iter()
        .map(|path| {
            let row = symbol_for(path, None).and_then(|symbol| {
                let series = load_series(path, &symbol)?.trailing(period);
                let summary = analyzer.summary(&series);
                Ok(ScanRow {
                    symbol,
                    vote_sum: summary.votes.sum(),
                    summary,
                })
            });
            (path.clone(), row)
        })
        .collect();

    let mut rows = Vec::with_capacity(results.len());
    for (path, result) in results {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => warn!(path = %path.display(), error = %format!("{e:#}"), "skipping series"),
        }
    }
    if rows.is_empty() {
        bail!("no series could be analyzed");
    }

    rows.sort_by(|a, b| {
        b.vote_sum
            .cmp(&a.vote_sum)
            .then_with(|| a.symbol.cmp(&b.symbol))
    });

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!(
        "{:<16} {:<12} {:>6} {:>8} {:>8}  {:<12} {:<12} {:<12}",
        "Symbol", "Call", "Conf", "Close", "RSI", "MA", "RSI vote", "MACD"
    );
    println!("{}", "-".repeat(94));
    for row in &rows {
        let s = &row.summary;
        println!(
            "{:<16} {:<12} {:>5.0}% {:>8} {:>8}  {:<12} {:<12} {:<12}",
            row.symbol,
            s.recommendation.as_str(),
            s.confidence,
            fmt_opt(s.snapshot.close),
            fmt_opt(s.rsi),
            s.votes.ma_crossover.to_string(),
            s.votes.rsi.to_string(),
            s.votes.macd.to_string(),
        );
    }
    Ok(())
}

// ─── news ───────────────────────────────────────────────────────────

#[derive(Serialize)]
struct NewsReport {
    digest: NewsDigest,
    trending: Vec<(String, usize)>,
}

fn run_news(file: &Path, json: bool) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let headlines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let items: Vec<NewsItem> = headlines.iter().map(|h| NewsItem::headline(*h)).collect();
    let report = NewsReport {
        digest: analyze_batch(&items),
        trending: trending_topics(&headlines, 10),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let d = &report.digest;
    if d.total == 0 {
        println!("No headlines to analyze.");
        return Ok(());
    }

    let pct = |n: usize| n as f64 / d.total as f64 * 100.0;
    println!("Headlines analyzed: {}", d.total);
    println!(
        "Positive {} ({:.1}%), negative {} ({:.1}%), neutral {} ({:.1}%)",
        d.distribution.positive,
        pct(d.distribution.positive),
        d.distribution.negative,
        pct(d.distribution.negative),
        d.distribution.neutral,
        pct(d.distribution.neutral),
    );
    let impact = match d.impact {
        SignalVote::Bullish => "bullish",
        SignalVote::Neutral => "mixed",
        SignalVote::Bearish => "bearish",
    };
    println!(
        "Overall: {} (average score {:+.2}, {impact})",
        d.overall, d.average_score
    );

    println!();
    println!("Categories:");
    for (category, count) in &d.categories {
        println!("  {category:<22}{count}");
    }

    if !d.top_symbols.is_empty() {
        println!();
        println!("Most mentioned:");
        for (symbol, count) in &d.top_symbols {
            println!("  {symbol:<16}{count}");
        }
    }

    if !report.trending.is_empty() {
        println!();
        let topics: Vec<String> = report
            .trending
            .iter()
            .map(|(word, n)| format!("{word} ({n})"))
            .collect();
        println!("Trending: {}", topics.join(", "));
    }
    Ok(())
}
