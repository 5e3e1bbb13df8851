//! Inkpilot CLI
//!
//! Drives the writing-assistant operations from the command line. All
//! completion traffic runs through the process-wide interceptor so the
//! diagnostic log always shows what the upstream returned.

use clap::{Parser, Subcommand};
use inkpilot::{Assistant, HttpTransport, InkpilotConfig, Interceptor};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Inkpilot - AI-assisted novel writing
#[derive(Parser, Debug)]
#[command(name = "inkpilot")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the inkpilot config directory
    #[arg(long)]
    config: Option<PathBuf>,

    /// Verbose output (interceptor diagnostics at debug level)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Draft prose from a premise
    Generate {
        /// Story premise
        premise: String,

        /// Approximate word count
        #[arg(long, default_value_t = 500)]
        words: u32,
    },

    /// Continue an existing passage
    Continue {
        /// File holding the passage to continue
        file: PathBuf,

        /// Approximate word count
        #[arg(long, default_value_t = 300)]
        words: u32,
    },

    /// Rewrite AI-sounding prose as natural human prose
    Humanize {
        /// File holding the passage to rewrite
        file: PathBuf,
    },

    /// Report on a passage's narrative style
    Analyze {
        /// File holding the passage to analyze
        file: PathBuf,
    },

    /// Judge whether a passage reads as machine-generated
    Detect {
        /// File holding the passage to judge
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("inkpilot={default_level}"))),
        )
        .with_writer(std::io::stderr)
        .init();

    let home = match cli.config {
        Some(path) => path,
        None => InkpilotConfig::default_home()?,
    };
    let config = InkpilotConfig::load(&home).await?;

    // Install the interceptor once; every assistant call routes through it.
    let transport = Interceptor::install(
        Arc::new(HttpTransport::new()),
        config.completion_endpoint(),
    );
    let assistant = Assistant::new(transport, config);

    match cli.command {
        Command::Generate { premise, words } => {
            let prose = assistant.generate(&premise, words).await?;
            println!("{prose}");
        }
        Command::Continue { file, words } => {
            let text = tokio::fs::read_to_string(&file).await?;
            let prose = assistant.continue_story(&text, words).await?;
            println!("{prose}");
        }
        Command::Humanize { file } => {
            let text = tokio::fs::read_to_string(&file).await?;
            let rewritten = assistant.humanize(&text).await?;
            println!("{rewritten}");
        }
        Command::Analyze { file } => {
            let text = tokio::fs::read_to_string(&file).await?;
            let report = assistant.analyze_style(&text).await?;
            println!("{report}");
        }
        Command::Detect { file } => {
            let text = tokio::fs::read_to_string(&file).await?;
            let report = assistant.detect(&text).await?;
            info!("AI likelihood: {:.2}", report.ai_likelihood);
            println!("{:.2}\t{}", report.ai_likelihood, report.assessment);
        }
    }

    Ok(())
}
