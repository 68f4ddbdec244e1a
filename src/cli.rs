//! CLI definition and dispatch.

use chrono::{Duration, Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};

use crate::adapters::csv_adapter::CsvMarketData;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::analysis::{AnalysisConfig, TickerAnalysis, TickerOutcome};
use crate::domain::batch::{BatchControl, BatchProgress, BatchSummary, run_batch};
use crate::domain::config_validation::{
    ANALYSIS, FILTER, parse_optional_date, read_flow_threshold, read_range, read_reporting_unit,
    read_verify_days, read_windows, validate_analysis_config, validate_filter_config,
};
use crate::domain::error::FlowcrossError;
use crate::domain::performance::SignalOutcome;
use crate::domain::universe::{Market, parse_market_filter, parse_tickers};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::{MarketCapPort, MarketDataPort};
use crate::ports::report_port::ReportPort;

/// Calendar days in the default analysis window.
pub const DEFAULT_WINDOW_DAYS: i64 = 365;
pub const DEFAULT_REPORT_PATH: &str = "flowcross_report.csv";

#[derive(Parser, Debug)]
#[command(
    name = "flowcross",
    about = "Moving-average crossover screener confirmed by investor net flow"
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze tickers and write a CSV report
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        /// Analyze a single ticker instead of the configured list
        #[arg(long)]
        ticker: Option<String>,
        /// Market filter for the ticker listing: KOSPI, KOSDAQ or ALL
        #[arg(long)]
        market: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List tickers available in the data directory
    ListTickers {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        market: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Analyze {
            config,
            ticker,
            market,
            output,
        } => run_analyze(&config, ticker.as_deref(), market.as_deref(), output.as_deref()),
        Command::Validate { config } => run_validate(&config),
        Command::ListTickers { config, market } => run_list_tickers(&config, market.as_deref()),
    }
}

fn fail(err: &FlowcrossError) -> ExitCode {
    error!("{err}");
    ExitCode::from(err)
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| fail(&e))
}

/// Build the analysis parameters from `[analysis]` and `[filter]`.
///
/// A missing `end_date` defaults to `today`; a missing `start_date` to
/// 365 days before the end date.
pub fn build_analysis_config(
    config: &dyn ConfigPort,
    today: NaiveDate,
) -> Result<AnalysisConfig, FlowcrossError> {
    let end_date = parse_optional_date(config, "end_date")?.unwrap_or(today);
    let start_date = parse_optional_date(config, "start_date")?
        .unwrap_or(end_date - Duration::days(DEFAULT_WINDOW_DAYS));

    if start_date >= end_date {
        return Err(FlowcrossError::ConfigInvalid {
            section: ANALYSIS.into(),
            key: "start_date".into(),
            reason: "start_date must be before end_date".into(),
        });
    }

    let (short_window, long_window, flow_window) = read_windows(config)?;

    Ok(AnalysisConfig {
        start_date,
        end_date,
        short_window,
        long_window,
        flow_window,
        flow_threshold: read_flow_threshold(config)?,
        verify_days: read_verify_days(config)?,
        reporting_unit: read_reporting_unit(config)?,
        turnover_range: read_range(config, "turnover_min", "turnover_max")?,
        market_cap_range: read_range(config, "market_cap_min", "market_cap_max")?,
        show_all: config.get_bool(FILTER, "show_all", false),
        show_recent_only: config.get_bool(FILTER, "show_recent_only", false),
    })
}

fn data_dir(config: &dyn ConfigPort) -> Result<PathBuf, FlowcrossError> {
    config
        .get_string(ANALYSIS, "data_dir")
        .filter(|s| !s.trim().is_empty())
        .map(|s| PathBuf::from(s.trim()))
        .ok_or_else(|| FlowcrossError::ConfigMissing {
            section: ANALYSIS.into(),
            key: "data_dir".into(),
        })
}

/// The CLI override wins over `[analysis] market`.
pub fn resolve_market(
    market_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<Option<Market>, FlowcrossError> {
    let raw = market_override
        .map(str::to_string)
        .or_else(|| config.get_string(ANALYSIS, "market"))
        .unwrap_or_default();
    parse_market_filter(&raw).map_err(|e| FlowcrossError::ConfigInvalid {
        section: ANALYSIS.into(),
        key: "market".into(),
        reason: e.to_string(),
    })
}

/// Tickers to analyze: the `--ticker` override, else `[analysis] tickers`,
/// else every listed ticker in `market`.
pub fn resolve_tickers(
    ticker_override: Option<&str>,
    market: Option<Market>,
    config: &dyn ConfigPort,
    data_port: &dyn MarketDataPort,
) -> Result<Vec<String>, FlowcrossError> {
    let invalid = |e: crate::domain::universe::UniverseError| FlowcrossError::ConfigInvalid {
        section: ANALYSIS.into(),
        key: "tickers".into(),
        reason: e.to_string(),
    };

    if let Some(t) = ticker_override {
        return parse_tickers(t).map_err(invalid);
    }

    if let Some(list) = config
        .get_string(ANALYSIS, "tickers")
        .filter(|s| !s.trim().is_empty())
    {
        return parse_tickers(&list).map_err(invalid);
    }

    let listed: Vec<String> = data_port
        .list_tickers(market)?
        .into_iter()
        .map(|t| t.code)
        .collect();
    if listed.is_empty() {
        return Err(FlowcrossError::ConfigMissing {
            section: ANALYSIS.into(),
            key: "tickers".into(),
        });
    }
    Ok(listed)
}

fn run_analyze(
    config_path: &Path,
    ticker_override: Option<&str>,
    market_override: Option<&str>,
    output_override: Option<&Path>,
) -> ExitCode {
    info!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_analysis_config(&adapter).and(validate_filter_config(&adapter)) {
        return fail(&e);
    }

    let today = Local::now().date_naive();
    let prepared = build_analysis_config(&adapter, today).and_then(|config| {
        let data_port = CsvMarketData::new(data_dir(&adapter)?);
        let market = resolve_market(market_override, &adapter)?;
        let tickers = resolve_tickers(ticker_override, market, &adapter, &data_port)?;
        Ok((config, data_port, tickers))
    });
    let (config, data_port, tickers) = match prepared {
        Ok(p) => p,
        Err(e) => return fail(&e),
    };

    let output = output_override
        .map(Path::to_path_buf)
        .or_else(|| adapter.get_string("report", "output").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_PATH));

    run_analysis_pipeline(
        &data_port,
        &data_port,
        &tickers,
        &config,
        &CsvReportAdapter::new(),
        &output,
    )
}

/// One line per displayed ticker.
pub fn format_analysis(analysis: &TickerAnalysis) -> String {
    let p = &analysis.performance;
    let recent = if analysis.series.has_recent_signal() {
        " (recent signal)"
    } else {
        ""
    };
    format!(
        "{}: {} signals, {:.1}% success ({} won / {} lost), avg gain {:+.2}%, max gain {:+.2}%, \
         avg loss {:+.2}%, max loss {:+.2}%, avg {}d return {:+.2}%{}",
        analysis.ticker,
        p.total_signals,
        p.success_rate,
        p.success_count,
        p.fail_count,
        p.avg_gain,
        p.max_gain,
        p.avg_loss,
        p.max_loss,
        p.verify_days,
        p.avg_return_at_horizon,
        recent,
    )
}

fn print_summary(summary: &BatchSummary, total: usize) {
    println!("\n=== Summary ===");
    println!("Analyzed:       {}", total);
    println!("Displayed:      {}", summary.displayed);
    println!("Not qualified:  {}", summary.not_qualified);
    println!("Failed:         {}", summary.failures.len());
    for failure in &summary.failures {
        println!("  {}: {}", failure.ticker, failure.reason);
    }
}

/// Run the batch over `tickers`, print results and write the report.
///
/// Exits non-zero when the report cannot be written, or when every ticker
/// failed (with the first failure's code).
pub fn run_analysis_pipeline(
    data_port: &dyn MarketDataPort,
    cap_port: &dyn MarketCapPort,
    tickers: &[String],
    config: &AnalysisConfig,
    report_port: &dyn ReportPort,
    output_path: &Path,
) -> ExitCode {
    info!(
        tickers = tickers.len(),
        start = %config.start_date,
        end = %config.end_date,
        "running analysis"
    );

    let progress = run_batch(
        data_port,
        cap_port,
        tickers,
        config,
        BatchProgress::new(),
        |_, _| BatchControl::Continue,
    );

    println!("=== Results ===");
    for analysis in progress.displayed() {
        println!("{}", format_analysis(analysis));
        for e in &analysis.performance.evaluations {
            let mark = match e.outcome {
                SignalOutcome::Success => "success",
                SignalOutcome::Failure => "failure",
            };
            println!(
                "    {} entry {:.2} max {:.2} ({:+.2}%) {}",
                e.date, e.entry_price, e.max_price, e.return_pct, mark
            );
        }
    }

    let summary = progress.summary();
    print_summary(&summary, tickers.len());

    let output = output_path.display().to_string();
    if let Err(e) = report_port.write(&progress.results_so_far, &output) {
        return fail(&e);
    }
    info!("Report written to: {}", output);

    if !tickers.is_empty() && summary.failures.len() == tickers.len() {
        warn!("every ticker failed");
        let first = progress.results_so_far.iter().find_map(|o| match o {
            TickerOutcome::Failed { error, .. } => Some(ExitCode::from(error)),
            _ => None,
        });
        return first.unwrap_or(ExitCode::FAILURE);
    }

    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    info!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_analysis_config(&adapter).and(validate_filter_config(&adapter)) {
        return fail(&e);
    }

    let config = match build_analysis_config(&adapter, Local::now().date_naive()) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };

    println!("Window:          {} to {}", config.start_date, config.end_date);
    println!(
        "Moving averages: {} / {}",
        config.short_window, config.long_window
    );
    println!(
        "Net flow:        {}-day mean >= {}",
        config.flow_window, config.flow_threshold
    );
    println!("Verify days:     {}", config.verify_days);
    println!("Turnover range:  {}", config.turnover_range);
    println!("Market cap:      {}", config.market_cap_range);
    println!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_list_tickers(config_path: &Path, market_override: Option<&str>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let listed = data_dir(&adapter).and_then(|dir| {
        let market = resolve_market(market_override, &adapter)?;
        CsvMarketData::new(dir).list_tickers(market)
    });
    let tickers = match listed {
        Ok(t) => t,
        Err(e) => return fail(&e),
    };

    if tickers.is_empty() {
        warn!("No tickers found");
    } else {
        for t in &tickers {
            println!("{}", t.label());
        }
        info!("{} tickers found", tickers.len());
    }
    ExitCode::SUCCESS
}
