use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};

use metriconvert_rs::batch::{self, BatchConfig};
use metriconvert_rs::priors::{FitConfig, PriorModel, PriorSummary};

#[derive(Debug, Clone, ValueEnum)]
enum Conversion {
    /// Threshold scores into hard classifications
    Classify,
    /// Turn hard classifications back into scores using fitted priors
    Soften,
    /// Derive recall from precision rows
    Recall,
    /// Derive precision from recall rows
    Precision,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Classifier metric conversions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Estimate score priors from a labeled holdout file (JSONL)
    FitPriors {
        /// Input holdout JSONL path ({"score": f, "label": 0|1} rows)
        #[arg(long)]
        input: String,
        /// Output priors JSON path ('-' for stdout)
        #[arg(long)]
        output: String,
        /// Classification threshold applied to holdout scores
        #[arg(long, default_value_t = 0.5)]
        threshold: f64,
        /// Maximum rows to read (for quick experiments)
        #[arg(long)]
        max_rows: Option<usize>,
    },
    /// Apply a conversion to each row of a JSONL stream
    Apply {
        /// Conversion: classify|soften|recall|precision
        #[arg(long, value_enum)]
        conversion: Conversion,
        /// Input JSONL path ('-' for stdin)
        #[arg(long)]
        input: String,
        /// Output JSONL path ('-' for stdout)
        #[arg(long)]
        output: String,
        /// Classification threshold (classify only)
        #[arg(long, default_value_t = 0.5)]
        threshold: f64,
        /// Priors JSON path (required for soften)
        #[arg(long)]
        priors: Option<String>,
        /// Maximum rows to read (for quick experiments)
        #[arg(long)]
        max_rows: Option<usize>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::FitPriors { input, output, threshold, max_rows } => {
            let cfg = FitConfig { threshold, max_rows };
            let model = PriorModel::fit_from_file(&input, cfg)
                .with_context(|| "failed to fit priors")?;
            if output == "-" {
                serde_json::to_writer_pretty(std::io::stdout(), &model)?;
                println!();
            } else {
                model.save(&output)?;
            }
            let summary = PriorSummary::from(&model);
            eprintln!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Apply { conversion, input, output, threshold, priors, max_rows } => {
            // Support streaming via '-' for stdin/stdout
            let reader: Box<dyn BufRead> = if input == "-" {
                Box::new(BufReader::new(std::io::stdin()))
            } else {
                Box::new(BufReader::new(
                    File::open(&input).with_context(|| "open input JSONL")?,
                ))
            };
            let writer: Box<dyn Write> = if output == "-" {
                Box::new(BufWriter::new(std::io::stdout()))
            } else {
                Box::new(BufWriter::new(
                    File::create(&output).with_context(|| "create output JSONL")?,
                ))
            };
            let cfg = BatchConfig { threshold, max_rows };
            match conversion {
                Conversion::Classify => batch::classify_scores(reader, writer, cfg)?,
                Conversion::Soften => {
                    let path = priors
                        .ok_or_else(|| anyhow::anyhow!("--priors is required for soften"))?;
                    let model = PriorModel::load(&path)
                        .with_context(|| "failed to load priors json")?;
                    batch::soften_classifications(&model, reader, writer, cfg)?;
                }
                Conversion::Recall => batch::recall_from_precision_rows(reader, writer, cfg)?,
                Conversion::Precision => batch::precision_from_recall_rows(reader, writer, cfg)?,
            }
        }
    }
    Ok(())
}
