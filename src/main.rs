use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docsync::cli::commands;

#[derive(Parser)]
#[command(name = "docsync")]
#[command(
    version,
    about = "Incremental documentation sync for TypeScript/React components"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize docsync in the current project
    Init {
        #[arg(long, short, help = "Overwrite existing configuration and hook")]
        force: bool,
        #[arg(long, help = "Install a git pre-commit hook")]
        hook: bool,
    },

    /// Extract component metadata and write documentation
    Sync {
        #[arg(help = "Only sync these files (default: scan the components root)")]
        files: Vec<PathBuf>,
        #[arg(long, conflicts_with = "files", help = "Only sync files staged in git")]
        staged: bool,
        #[arg(long, help = "Ignore the cache and re-analyze every file")]
        force: bool,
        #[arg(long, help = "Write extended pages with usage examples")]
        ai: bool,
    },

    /// Pre-commit entry point (always succeeds)
    #[command(hide = true)]
    Hook,

    /// Show project status
    Status {
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
        #[arg(short = 'd', long, help = "List every stale component")]
        detailed: bool,
    },

    /// Clear the incremental cache
    Clean,

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
            default_value = "text",
            help = "Output format: text, json"
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
        // Extract panic message
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mdocsync encountered an unexpected error:\x1b[0m");
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
    // Install panic handler first
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let is_hook = matches!(cli.command, Commands::Hook);

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || is_hook {
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
        Commands::Init { force, hook } => {
            commands::init::run(force, hook)?;
        }
        Commands::Sync {
            files,
            staged,
            force,
            ai,
        } => {
            commands::sync::run(commands::sync::SyncOptions {
                files,
                staged,
                force,
                enrich: ai,
            })?;
        }
        Commands::Hook => {
            // The commit must go through even if the runtime cannot start
            match Runtime::new() {
                Ok(rt) => {
                    rt.block_on(commands::hook::run());
                    // Do not wait for a worker abandoned by the timeout
                    rt.shutdown_background();
                }
                Err(e) => tracing::debug!("Hook skipped: {}", e),
            }
        }
        Commands::Status { format, detailed } => {
            commands::status::run(&format, detailed)?;
        }
        Commands::Clean => {
            commands::clean::run()?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => {
                commands::config::show(&format)?;
            }
            ConfigAction::Path => {
                commands::config::path()?;
            }
        },
    }

    Ok(())
}
