use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgGroup, Args, Parser, Subcommand};

mod config;
mod dataset;
mod models;
mod narrative;
mod redact;
mod report;
mod risk;
mod scenario;
mod source;

use config::Config;
use scenario::Scenario;
use source::SignalSource;

const DEFAULT_CONFIG: &str = "aegis.toml";
const DEFAULT_SIMULATED_ROWS: u32 = 30;
const MAX_SIMULATED_ROWS: i64 = 1_000_000;

#[derive(Parser)]
#[command(name = "aegis-risk")]
#[command(about = "Risk signal scoring, anomaly flags and decision cards", version, long_about = None)]
struct Cli {
    /// TOML config file (falls back to $AEGIS_CONFIG, then ./aegis.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("source")
        .args(["csv", "sample", "scenario"])
        .multiple(false)
))]
struct SourceArgs {
    /// Signals table with timestamp, category, severity_score, description
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Use the bundled sample table
    #[arg(long)]
    sample: bool,
    /// Simulate signals for a named scenario (the default, as "general")
    #[arg(long)]
    scenario: Option<String>,
    /// Rows to simulate
    #[arg(
        long,
        conflicts_with_all = ["csv", "sample"],
        value_parser = clap::value_parser!(u32).range(..=MAX_SIMULATED_ROWS)
    )]
    count: Option<u32>,
}

impl SourceArgs {
    fn resolve(&self) -> SignalSource {
        if let Some(path) = &self.csv {
            SignalSource::Csv(path.clone())
        } else if self.sample {
            SignalSource::Sample
        } else {
            SignalSource::Simulated {
                scenario: Scenario::from_name(self.scenario.as_deref().unwrap_or("general")),
                count: self.count.unwrap_or(DEFAULT_SIMULATED_ROWS) as usize,
            }
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Check that a CSV has the required columns and parses cleanly
    Validate {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Generate a deterministic simulated signals table
    Simulate {
        #[arg(long, default_value = "general")]
        scenario: String,
        #[arg(
            long,
            default_value_t = DEFAULT_SIMULATED_ROWS,
            value_parser = clap::value_parser!(u32).range(..=MAX_SIMULATED_ROWS)
        )]
        count: u32,
        /// Write CSV here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Add risk_level, anomaly_flag and confidence_score to every row
    Enrich {
        #[command(flatten)]
        source: SourceArgs,
        /// Emit JSON instead of CSV
        #[arg(long)]
        json: bool,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Show the decision card for one row (rows ranked by severity, highest first)
    Card {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, default_value_t = 0)]
        row: usize,
        #[arg(long)]
        json: bool,
    },
    /// Print the executive summary, top alerts and action queue
    Summary {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Generate a markdown report
    Report {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// `--config` and `$AEGIS_CONFIG` must name a readable file; only the implicit
/// `./aegis.toml` may be absent.
fn load_config(explicit: Option<PathBuf>) -> anyhow::Result<Config> {
    let named = explicit.or_else(|| std::env::var_os("AEGIS_CONFIG").map(PathBuf::from));
    let config = match named {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(DEFAULT_CONFIG)?,
    };
    Ok(config)
}

fn output_sink(out: Option<&PathBuf>) -> anyhow::Result<Box<dyn Write>> {
    match out {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(std::io::stdout().lock())),
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(cli.config)?;

    match cli.command {
        Commands::Validate { csv } => {
            let signals = dataset::load_csv(&csv)
                .with_context(|| format!("validation failed for {}", csv.display()))?;
            println!(
                "{} is valid: {} rows, all required columns present.",
                csv.display(),
                signals.len()
            );
        }
        Commands::Simulate {
            scenario,
            count,
            out,
        } => {
            let scenario = Scenario::from_name(&scenario);
            let signals =
                scenario::generate(count as usize, scenario, config.seed, config.base_time);
            dataset::write_signals(output_sink(out.as_ref())?, &signals)?;
            if let Some(path) = out {
                println!(
                    "Wrote {} {} signals to {}.",
                    signals.len(),
                    scenario.as_str(),
                    path.display()
                );
            }
        }
        Commands::Enrich { source, json, out } => {
            let signals = source.resolve().load(&config)?;
            let enriched = risk::enrich_all(&signals);
            let mut sink = output_sink(out.as_ref())?;
            if json {
                serde_json::to_writer_pretty(&mut sink, &enriched)?;
                writeln!(sink)?;
            } else {
                dataset::write_enriched(sink, &enriched)?;
            }
        }
        Commands::Card { source, row, json } => {
            let signals = source.resolve().load(&config)?;
            let ranked = report::by_severity_desc(&risk::enrich_all(&signals));
            let selected = ranked.get(row).with_context(|| {
                format!("row {row} out of range (table has {} rows)", ranked.len())
            })?;
            let card = narrative::decision_card(selected);
            let audit = report::AuditStamp::now();
            tracing::info!(event_id = %audit.event_id, row, "decision card generated");

            if json {
                let payload = serde_json::json!({ "card": card, "audit": audit });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                print!("{}", report::render_decision_card(row, &card, &audit));
            }
        }
        Commands::Summary { source } => {
            let resolved = source.resolve();
            let enriched = risk::enrich_all(&resolved.load(&config)?);
            if enriched.is_empty() {
                println!("No signals found for {}.", resolved.label(&config));
                return Ok(());
            }

            let summary = report::summarize(&enriched);
            println!("Source: {}", resolved.label(&config));
            println!("{}", report::executive_summary(&summary));
            println!("Primary categories: {}", report::primary_categories(&summary));
            println!();
            println!("Top alerts:");
            for row in report::top_alerts(&enriched, config.top_alerts) {
                println!(
                    "- {} severity {:.2} ({}, confidence {:.2}) owner {} within {}: {}",
                    row.signal.category.label(),
                    row.signal.severity_score,
                    row.risk_level,
                    row.confidence_score,
                    risk::owner_team(&row.signal.category),
                    risk::sla(row.risk_level),
                    row.signal.description
                );
            }
            println!();
            println!("Action queue:");
            for item in report::action_queue(&enriched, config.top_alerts, config.action_width) {
                println!("- [{}] {} ({}, {})", item.status, item.action, item.owner, item.sla);
            }
        }
        Commands::Report { source, out } => {
            let resolved = source.resolve();
            let enriched = risk::enrich_all(&resolved.load(&config)?);
            let markdown = report::build_report(
                &resolved.label(&config),
                &enriched,
                config.top_alerts,
                config.action_width,
            );
            std::fs::write(&out, markdown)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
