use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use paper_digest::config::{self, APP_VERSION};
use paper_digest::{BatchRunner, DocumentExtractor, DocumentRef, ExtractionConfig};

#[derive(Parser)]
#[command(name = "paper-digest", version = APP_VERSION, about = "Fetch and bound research paper full text")]
struct Cli {
    /// JSON file overriding extraction defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract bounded full text for one or more document references
    Extract {
        /// Document references, e.g. 2602.01234
        #[arg(required = true)]
        refs: Vec<String>,

        /// Print the batch report as JSON instead of plain text
        #[arg(long)]
        json: bool,

        /// Override the pause between documents, in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<ExtractionConfig, String> {
    let Some(path) = path else {
        return Ok(ExtractionConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    ExtractionConfig::from_json_str(&raw).map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    config::init_tracing();
    let cli = Cli::parse();

    let Command::Extract {
        refs,
        json,
        delay_ms,
    } = cli.command;

    let mut extraction_config = match load_config(cli.config.as_ref()) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::from(2);
        }
    };
    if let Some(ms) = delay_ms {
        extraction_config.inter_item_delay_ms = ms;
    }

    let runner = BatchRunner::new(extraction_config.inter_item_delay());
    let extractor = match DocumentExtractor::over_http(extraction_config) {
        Ok(e) => e,
        Err(e) => {
            tracing::error!(error = %e, "Cannot build extractor");
            return ExitCode::from(2);
        }
    };

    let refs: Vec<DocumentRef> = refs.into_iter().map(DocumentRef::new).collect();
    let report = runner.run(&extractor, &refs);

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                tracing::error!(error = %e, "Cannot serialize report");
                return ExitCode::FAILURE;
            }
        }
    } else {
        for result in &report.extracted {
            println!(
                "===== {} ({:?}, {} words{}) =====",
                result.document_ref,
                result.source,
                result.word_count,
                if result.truncated { ", truncated" } else { "" }
            );
            println!("{}\n", result.text);
        }
    }

    if report.all_failed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
