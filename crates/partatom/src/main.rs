//! partatom - extract embedded family metadata from vendor container
//! files into validated JSON records.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use partatom::cli;

#[derive(Parser, Debug)]
#[command(name = "partatom", about = "Family container metadata extractor")]
struct Cli {
    /// Enable verbose logging
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract container files to JSON records
    Extract {
        /// Container file or directory to process
        path: PathBuf,

        /// Output root; mirrors the input directory structure beneath it
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Walk subdirectories
        #[arg(short, long)]
        recursive: bool,

        /// Overwrite existing JSON outputs
        #[arg(short, long)]
        force: bool,

        /// Run extraction and validation but write nothing
        #[arg(long)]
        dry_run: bool,

        /// Also process backup files (e.g. Door.0001.rfa)
        #[arg(long)]
        include_backups: bool,

        /// Print the batch summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate already-emitted JSON records
    Validate {
        /// Directory containing JSON records
        directory: PathBuf,

        /// Walk subdirectories (default: true)
        #[arg(short, long, default_value = "true", action = clap::ArgAction::Set)]
        recursive: bool,
    },

    /// Show one extracted record in detail
    Info {
        /// JSON record to display
        file: PathBuf,
    },

    /// Summary statistics and ad-hoc filtering over extracted records
    Analyze {
        /// Directory containing JSON records
        directory: PathBuf,

        /// Filter query, e.g. 'Param:name=Width' or 'Cat:name=Doors'
        #[arg(short, long)]
        query: Option<String>,

        /// Walk subdirectories (default: true)
        #[arg(short, long, default_value = "true", action = clap::ArgAction::Set)]
        recursive: bool,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },
}

fn command_wants_json(command: &Commands) -> bool {
    match command {
        Commands::Extract { json, .. } => *json,
        Commands::Analyze { json, .. } => *json,
        _ => false,
    }
}

fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Extract {
            path,
            output,
            recursive,
            force,
            dry_run,
            include_backups,
            json,
        } => cli::extract::run(cli::extract::ExtractArgs {
            path,
            output,
            recursive,
            force,
            dry_run,
            include_backups,
            json,
        }),
        Commands::Validate { directory, recursive } => {
            cli::validate::run(cli::validate::ValidateArgs { directory, recursive })
        }
        Commands::Info { file } => cli::info::run(cli::info::InfoArgs { file }),
        Commands::Analyze {
            directory,
            query,
            recursive,
            json,
        } => cli::analyze::run(cli::analyze::AnalyzeArgs {
            directory,
            query,
            recursive,
            json,
        }),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Keep stdout clean for machine-readable output: logs move to stderr
    // whenever a command emits JSON.
    let json_mode = command_wants_json(&cli.command);
    let default_filter = if cli.verbose {
        "partatom=debug"
    } else {
        "partatom=info"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let mut _log_guard: Option<tracing_appender::non_blocking::WorkerGuard> = None;
    let file_layer = cli.log_file.as_ref().map(|path| {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| std::path::Path::new("."));
        let name = path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "partatom.log".into());
        let appender = tracing_appender::rolling::never(dir, name);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        _log_guard = Some(guard);
        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
    });

    let console_writer = if json_mode {
        tracing_subscriber::fmt::writer::BoxMakeWriter::new(std::io::stderr)
    } else {
        tracing_subscriber::fmt::writer::BoxMakeWriter::new(std::io::stdout)
    };
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(console_writer)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
