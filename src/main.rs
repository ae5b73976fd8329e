use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use articleweave::cli::{GenerateOptions, Output};
use articleweave::{OutputFormat, WeaveError};

#[derive(Parser)]
#[command(name = "articleweave")]
#[command(
    version,
    about = "Research-grounded SEO article generator",
    subcommand_negates_reqs = true,
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(long, required = true, help = "Topic or keyword for the article")]
    topic: Option<String>,

    #[arg(long, required = true, help = "H1 article title")]
    heading: Option<String>,

    #[arg(long = "word-count", required = true, help = "Target word count")]
    word_count: Option<usize>,

    #[arg(long, help = "Deep research (advanced search, more sources)")]
    deep: bool,

    #[arg(long, short = 'f', help = "Output format: txt, json, all")]
    format: Option<OutputFormat>,

    #[arg(long, help = "Target audience")]
    audience: Option<String>,

    #[arg(long, help = "Enable polish and micro-refinement")]
    polish: bool,

    #[arg(long, help = "Similarity threshold for paraphrasing (0.0-1.0]")]
    threshold: Option<f32>,

    #[arg(long, short, help = "Output directory")]
    output: Option<PathBuf>,

    #[arg(long, short, global = true, help = "Project config file")]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(
            short = 'f',
            long,
            default_value = "toml",
            help = "Output format: toml, json, yaml"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31marticleweave encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Call default hook for backtrace (if RUST_BACKTRACE=1)
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let out = Output::new();
            match e.downcast_ref::<WeaveError>() {
                Some(err) if err.failure_kind().is_some() => {
                    out.error(&err.user_message());
                    eprintln!("Aborting.");
                }
                Some(err) => out.error(&err.user_message()),
                None => out.error(&e.to_string()),
            }
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    // A missing .env is fine; keys may come from the shell
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Some(Commands::Config { action }) => match action {
            ConfigAction::Show { format } => {
                articleweave::cli::commands::config::show(cli.config.as_deref(), &format)?;
            }
            ConfigAction::Path => {
                articleweave::cli::commands::config::path()?;
            }
        },
        None => {
            articleweave::cli::commands::generate::run(GenerateOptions {
                topic: cli.topic.unwrap_or_default(),
                heading: cli.heading.unwrap_or_default(),
                word_count: cli.word_count.unwrap_or_default(),
                audience: cli.audience,
                deep: cli.deep,
                polish: cli.polish,
                format: cli.format,
                threshold: cli.threshold,
                output: cli.output,
                config: cli.config,
                quiet: cli.quiet,
            })?;
        }
    }

    Ok(())
}
