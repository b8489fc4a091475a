// roiwatch/src/main.rs
//
// roiwatch: actual / projected ROI for a scored, labeled batch.
//
// Three operational modes:
//   eval            evaluate one batch file against a deployment config
//   check-config    load + validate a config and print what it resolves to
//   example-config  print the reference credit-risk config as JSON
//
// Usage:
//   roiwatch --config roi.json --batch scored.jsonl
//   roiwatch --config roi.json --batch scored.jsonl --format markdown
//   roiwatch --mode check-config --config roi.json
//   roiwatch --mode example-config > roi.json

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use roiwatch::config::{Convention, RoiConfig};
use roiwatch::eval::{report, RoiEvaluator};
use roiwatch::loader;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name    = "roiwatch",
    about   = "Actual and projected ROI for scored binary classifiers",
    version = env!("CARGO_PKG_VERSION"),
)]
struct Cli {
    #[arg(long, value_enum, default_value = "eval")]
    mode: Mode,

    #[arg(long, help = "Deployment config (JSON)")]
    config: Option<PathBuf>,

    #[arg(long, help = "Batch file: JSON Lines or a JSON array of rows")]
    batch: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "json", help = "Report format")]
    format: Format,

    #[arg(long, help = "Override the config's polarity convention (A or B)")]
    convention: Option<Convention>,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    Eval,
    CheckConfig,
    ExampleConfig,
}

#[derive(Clone, ValueEnum)]
enum Format {
    Json,
    Markdown,
}

fn load_config(cli: &Cli) -> Result<RoiConfig> {
    let path = match &cli.config {
        Some(p) => p,
        None    => bail!("--config is required for this mode"),
    };
    let mut cfg = RoiConfig::load(path).with_context(|| format!("loading {}", path.display()))?;
    if let Some(convention) = cli.convention {
        cfg.convention = convention;
    }
    info!(
        "Config {}: amount_field={} convention={} baseline={} formula={}",
        path.display(),
        cfg.fields.amount_field,
        cfg.convention,
        cfg.baseline_rates.is_some(),
        cfg.projection_formula.map(|f| f.as_str()).unwrap_or("none"),
    );
    Ok(cfg)
}

// ── Main ──────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env()
            .add_directive("roiwatch=info".parse()?))
        .with_writer(std::io::stderr)
        .compact().init();

    let cli = Cli::parse();

    match cli.mode {
        Mode::ExampleConfig => {
            println!("{}", RoiConfig::credit_example().to_json_pretty()?);
        }

        Mode::CheckConfig => {
            let cfg = load_config(&cli)?;
            println!("{}", cfg.to_json_pretty()?);
        }

        Mode::Eval => {
            let cfg   = load_config(&cli)?;
            let batch = match &cli.batch {
                Some(p) => p,
                None    => bail!("--batch is required in eval mode"),
            };
            let rows    = loader::load_rows(batch).await?;
            let summary = RoiEvaluator::new(&cfg)
                .evaluate_rows(&rows)
                .with_context(|| format!("evaluating {}", batch.display()))?;

            match cli.format {
                Format::Json     => println!("{}", report::to_json(&summary, &cfg)),
                Format::Markdown => print!("{}", report::render_markdown(&summary)),
            }
        }
    }

    Ok(())
}
