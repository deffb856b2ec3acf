//! SignalBoard CLI: inspect the signal data file and emit chart annotations.
//!
//! Commands:
//! - `symbols`: list symbols present in the data file
//! - `info`: record count, symbols, last update, content hash
//! - `annotate`: run the annotation pipeline for one symbol and signal set
//! - `sample`: write a synthetic data file for demos

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use signalboard_core::annotate::annotate_chart;
use signalboard_core::data::{write_sample_file, SampleSpec};
use signalboard_core::{AppConfig, Catalog, ChartAnnotations, ChartOutcome, JsonSignalStore, Period};

#[derive(Parser)]
#[command(
    name = "signalboard",
    about = "SignalBoard CLI: buy/sell signal annotations for price charts"
)]
struct Cli {
    /// TOML config file. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Signal data file, overriding `data_file` from the config.
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List symbols available in the data file with their display names.
    Symbols,
    /// Show record count, symbols, last update and content hash of the data file.
    Info {
        /// Print as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Compute markers and highlights for one symbol.
    Annotate {
        /// Symbol, e.g. SPY or ^GSPC.
        #[arg(long)]
        symbol: String,

        /// Signal group key or name (short, mid, long).
        #[arg(long, conflicts_with = "signals", required_unless_present = "signals")]
        group: Option<String>,

        /// Explicit comma-separated signal ids.
        #[arg(long, value_delimiter = ',')]
        signals: Vec<String>,

        /// Trailing window: 6mo, 1y, 3y, 5y, max. Defaults to the config value.
        #[arg(long)]
        period: Option<Period>,

        /// Include sell markers.
        #[arg(long, default_value_t = false)]
        sells: bool,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Write to this file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Write a deterministic synthetic data file.
    Sample {
        #[arg(long)]
        output: PathBuf,

        /// Business days per symbol.
        #[arg(long, default_value_t = 750)]
        days: usize,

        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Last date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Csv,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(cli, &mut out)
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli, out: &mut dyn Write) -> Result<()> {
    let mut config = AppConfig::load_or_default(cli.config.as_deref())
        .context("loading configuration")?;
    if let Some(data) = cli.data {
        config.data_file = data;
    }

    match cli.command {
        Commands::Symbols => run_symbols(&config, out),
        Commands::Info { json } => run_info(&config, json, out),
        Commands::Annotate {
            symbol,
            group,
            signals,
            period,
            sells,
            format,
            output,
        } => {
            if sells {
                config.annotation.render_sell_markers = true;
            }
            let request = AnnotateRequest {
                symbol,
                group,
                signals,
                period: period.unwrap_or(config.default_period),
            };
            match output {
                Some(path) => {
                    let file = File::create(&path)
                        .with_context(|| format!("creating {}", path.display()))?;
                    let mut writer = BufWriter::new(file);
                    run_annotate(&config, &request, format, &mut writer)?;
                    writer.flush()?;
                    writeln!(out, "Annotations written to: {}", path.display())?;
                    Ok(())
                }
                None => run_annotate(&config, &request, format, out),
            }
        }
        Commands::Sample {
            output,
            days,
            seed,
            end,
        } => run_sample(&output, days, seed, end.as_deref(), out),
    }
}

fn open_store(config: &AppConfig) -> Result<JsonSignalStore> {
    JsonSignalStore::open(&config.data_file)
        .with_context(|| format!("opening data file {}", config.data_file.display()))
}

fn load_catalog(config: &AppConfig) -> Result<Catalog> {
    Catalog::load_or_builtin(config.catalog_file.as_deref()).context("loading symbol catalog")
}

// ── symbols / info ──────────────────────────────────────────────────

fn run_symbols(config: &AppConfig, out: &mut dyn Write) -> Result<()> {
    let store = open_store(config)?;
    let catalog = load_catalog(config)?;
    let symbols = store.symbols();
    if symbols.is_empty() {
        writeln!(out, "No symbols in {}", config.data_file.display())?;
        return Ok(());
    }
    for symbol in &symbols {
        writeln!(out, "{symbol:<10} {}", catalog.display_name(symbol))?;
    }
    Ok(())
}

fn run_info(config: &AppConfig, json: bool, out: &mut dyn Write) -> Result<()> {
    let store = open_store(config)?;
    let info = store.info();
    if json {
        serde_json::to_writer_pretty(&mut *out, &info)?;
        writeln!(out)?;
        return Ok(());
    }
    writeln!(out, "Data file:     {}", config.data_file.display())?;
    writeln!(out, "Records:       {}", info.total_records)?;
    writeln!(out, "Symbols:       {} ({})", info.symbols.len(), info.symbols.join(", "))?;
    writeln!(
        out,
        "Last updated:  {}",
        info.last_updated.as_deref().unwrap_or("-")
    )?;
    writeln!(out, "BLAKE3:        {}", info.data_hash)?;
    Ok(())
}

// ── annotate ────────────────────────────────────────────────────────

struct AnnotateRequest {
    symbol: String,
    group: Option<String>,
    signals: Vec<String>,
    period: Period,
}

/// Signal ids for a group key/name, or the explicit list.
fn resolve_signals(catalog: &Catalog, request: &AnnotateRequest) -> Result<Vec<String>> {
    match &request.group {
        Some(key) => match catalog.group(key) {
            Some(group) => Ok(group.signals.clone()),
            None => {
                let known: Vec<&str> = catalog.groups.iter().map(|g| g.key.as_str()).collect();
                bail!("unknown signal group '{key}'. Valid: {}", known.join(", "))
            }
        },
        None => Ok(request
            .signals
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()),
    }
}

fn run_annotate(
    config: &AppConfig,
    request: &AnnotateRequest,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    let store = open_store(config)?;
    let catalog = load_catalog(config)?;
    let signals = resolve_signals(&catalog, request)?;
    let ids: Vec<&str> = signals.iter().map(String::as_str).collect();

    let dataset = store.dataset(&request.symbol, request.period);
    let outcome = annotate_chart(&dataset, &ids, &config.annotation);

    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &outcome)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => write_csv(&outcome, out)?,
        OutputFormat::Text => write_text(&catalog, request.period, &ids, &outcome, out)?,
    }
    Ok(())
}

fn write_text(
    catalog: &Catalog,
    period: Period,
    ids: &[&str],
    outcome: &ChartOutcome,
    out: &mut dyn Write,
) -> Result<()> {
    let chart = match outcome {
        ChartOutcome::Ready(chart) => chart,
        ChartOutcome::Empty { symbol, reason } => {
            writeln!(out, "{symbol} is not supported yet ({reason})")?;
            return Ok(());
        }
    };

    print_summary(catalog, period, ids, chart, out)?;

    writeln!(out, "\nMarkers ({}):", chart.markers.len())?;
    for m in &chart.markers {
        writeln!(
            out,
            "  {}  {:<18} {:<22} {:>10.2}",
            m.date,
            m.style_class.label(),
            m.signal_id,
            m.price
        )?;
    }

    writeln!(out, "\nHighlights ({}):", chart.highlights.len())?;
    for h in &chart.highlights {
        writeln!(out, "  {} .. {}  {}", h.start, h.end, h.polarity.label())?;
    }

    let legend: Vec<&str> = chart.legend.iter().map(|e| e.text).collect();
    writeln!(out, "\nLegend: {}", legend.join(" | "))?;
    if let Some(updated) = &chart.last_updated {
        writeln!(out, "Data as of {updated}")?;
    }
    Ok(())
}

fn print_summary(
    catalog: &Catalog,
    period: Period,
    ids: &[&str],
    chart: &ChartAnnotations,
    out: &mut dyn Write,
) -> Result<()> {
    let range = match (chart.bars.first(), chart.bars.last()) {
        (Some(first), Some(last)) => format!("{} to {}", first.date, last.date),
        _ => "-".to_string(),
    };
    writeln!(out, "=== {} ===", catalog.display_name(&chart.symbol))?;
    writeln!(out, "Period:   {period} ({} bars, {range})", chart.bars.len())?;
    writeln!(out, "Signals:  {}", ids.join(", "))?;
    Ok(())
}

/// One CSV row: either a marker or a highlight interval.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    kind: &'static str,
    date: NaiveDate,
    end: Option<NaiveDate>,
    signal_id: Option<&'a str>,
    style: Option<&'static str>,
    price: Option<f64>,
    polarity: Option<&'static str>,
}

fn write_csv(outcome: &ChartOutcome, out: &mut dyn Write) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    let Some(chart) = outcome.annotations() else {
        wtr.write_record(["kind", "date", "end", "signal_id", "style", "price", "polarity"])?;
        wtr.flush()?;
        return Ok(());
    };

    let mut wrote_any = false;
    for m in &chart.markers {
        wtr.serialize(CsvRow {
            kind: "marker",
            date: m.date,
            end: None,
            signal_id: Some(&m.signal_id),
            style: Some(m.style_class.label()),
            price: Some(m.price),
            polarity: None,
        })?;
        wrote_any = true;
    }
    for h in &chart.highlights {
        wtr.serialize(CsvRow {
            kind: "highlight",
            date: h.start,
            end: Some(h.end),
            signal_id: None,
            style: None,
            price: None,
            polarity: Some(h.polarity.label()),
        })?;
        wrote_any = true;
    }
    if !wrote_any {
        wtr.write_record(["kind", "date", "end", "signal_id", "style", "price", "polarity"])?;
    }
    wtr.flush()?;
    Ok(())
}

// ── sample ──────────────────────────────────────────────────────────

fn run_sample(
    output: &Path,
    days: usize,
    seed: u64,
    end: Option<&str>,
    out: &mut dyn Write,
) -> Result<()> {
    if days == 0 {
        bail!("--days must be at least 1");
    }
    let end = end
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .context("parsing --end (expected YYYY-MM-DD)")?
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let spec = SampleSpec::new(end, days, seed);
    let count = write_sample_file(output, &spec)
        .with_context(|| format!("writing sample data to {}", output.display()))?;
    writeln!(out, "Wrote {count} records to {}", output.display())?;
    Ok(())
}
