mod commands;
mod diagnostics;
mod watch;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "quickref",
    version,
    about = "Quick-reference shortcodes for developer documentation"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report shortcodes that would render as nothing (exit 2 if any)
    Check,
    /// Expand every shortcode in a document
    Expand {
        /// Document to expand
        file: String,
        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
    /// List every resolvable reference with its URL
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the base path and archive registered for each kind
    Paths,
    /// Re-run check whenever a document changes
    Watch,
}

/// Log to stderr, filtered by `RUST_LOG`, quiet by default so command
/// output stays clean.
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| return tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check => commands::check(),
        Commands::Expand { file, output } => {
            commands::expand(&file, output.as_deref()).map(|()| return ExitCode::SUCCESS)
        },
        Commands::List { json } => commands::list(json).map(|()| return ExitCode::SUCCESS),
        Commands::Paths => commands::paths().map(|()| return ExitCode::SUCCESS),
        Commands::Watch => watch::run(),
    };

    return match result {
        Ok(code) => code,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::FAILURE
        },
    };
}
