//! hotelquiz CLI: hotel English quiz and pronunciation practice.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use hotelquiz_core::model::CategoryFilter;

mod commands;
mod i18n;
mod render;

#[derive(Parser)]
#[command(name = "hotelquiz", version, about = "Hotel English quiz and pronunciation practice")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take an interactive quiz
    Quiz {
        /// Category to draw from: all, checkin, checkout, roomservice, pronunciation, situation
        #[arg(long, default_value = "all")]
        category: CategoryFilter,

        /// Question bank file or directory (default: built-in bank)
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Shuffle seed for a reproducible question order
        #[arg(long)]
        seed: Option<u64>,

        /// Seconds per question
        #[arg(long)]
        time_limit: Option<u32>,

        /// Write the session summary as JSON
        #[arg(long)]
        save_summary: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Score a pronunciation attempt
    Score {
        /// Phrase the learner was asked to say
        #[arg(long)]
        target: String,

        /// What the recognizer heard
        #[arg(long)]
        transcript: String,

        /// Recognizer confidence, 0 to 1
        #[arg(long)]
        confidence: f64,

        /// Additional hypotheses as TRANSCRIPT:CONFIDENCE
        #[arg(long = "alt")]
        alternatives: Vec<String>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate question bank TOML files
    Validate {
        /// Path to bank file or directory
        #[arg(long)]
        bank: PathBuf,
    },

    /// Show saved learning progress
    Progress {
        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Review the answers of a saved quiz summary
    Review {
        /// Summary JSON written by `quiz --save-summary`
        #[arg(long)]
        summary: PathBuf,

        /// Question bank the quiz was taken from (default: built-in bank)
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and question bank
    Init,
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();
    let filter = match "hotelquiz=info".parse() {
        Ok(directive) if std::env::var_os("RUST_LOG").is_none() => filter.add_directive(directive),
        _ => filter,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Quiz {
            category,
            bank,
            seed,
            time_limit,
            save_summary,
            config,
        } => {
            commands::quiz::execute(commands::quiz::QuizArgs {
                category,
                bank,
                seed,
                time_limit,
                save_summary,
                config,
            })
            .await
        }
        Commands::Score {
            target,
            transcript,
            confidence,
            alternatives,
            format,
            config,
        } => commands::score::execute(target, transcript, confidence, alternatives, format, config),
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::Progress { format, config } => commands::progress::execute(format, config),
        Commands::Review {
            summary,
            bank,
            config,
        } => commands::review::execute(summary, bank, config),
        Commands::Init => commands::init::execute(),
    };

    // Exit directly so a pending stdin read cannot hold up runtime shutdown.
    match result {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    }
}
