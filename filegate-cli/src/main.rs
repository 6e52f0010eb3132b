use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use filegate_core::{BatchResult, DirectoryOptions, FileGate, LoadError, SecurityConfig};

#[derive(Parser, Debug)]
#[command(name = "filegate")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Bounded, policy-checked file reads for AI tooling")]
struct Args {
    /// Directory the gate is rooted at (defaults to the working directory)
    #[arg(long)]
    base: Option<PathBuf>,

    /// Confine reads to these directories (repeatable; empty = unrestricted)
    #[arg(long = "allow-dir")]
    allowed_directories: Vec<PathBuf>,

    /// Extra sensitive-file globs, merged with the built-in defaults
    #[arg(long = "sensitive-pattern")]
    sensitive_patterns: Vec<String>,

    /// Per-file size ceiling in bytes
    #[arg(long, default_value_t = 1_048_576)]
    max_file_size: u64,

    /// Maximum number of files a scan may yield
    #[arg(long, default_value_t = 500)]
    max_files: u32,

    /// Permit reads through symbolic links
    #[arg(long)]
    allow_symlinks: bool,

    /// Emit results as JSON instead of delimited plain text
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read one or more files
    Read {
        /// Paths to read, relative to the base directory
        paths: Vec<String>,
    },
    /// Read every matching file under a directory
    Scan {
        /// Directory to scan, relative to the base directory
        root: String,

        /// Include globs (default: everything)
        #[arg(long)]
        include: Vec<String>,

        /// Exclude globs, merged with the built-in defaults
        #[arg(long)]
        exclude: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_tracing();
    let args = Args::parse();

    let config = SecurityConfig {
        allowed_directories: args.allowed_directories.clone(),
        sensitive_patterns: args.sensitive_patterns.clone(),
        max_file_size: args.max_file_size,
        max_files: args.max_files,
        allow_symlinks: args.allow_symlinks,
    };

    let gate = match &args.base {
        Some(base) => FileGate::new(base, config),
        None => FileGate::current_dir(config),
    }
    .map_err(user_facing)?;

    info!(base = %gate.base().display(), "filegate ready");

    let result = match &args.command {
        Command::Read { paths } => gate.read_files(paths.clone()).await,
        Command::Scan {
            root,
            include,
            exclude,
        } => {
            let options = DirectoryOptions {
                include: include.clone(),
                exclude: exclude.clone(),
                max_files: None,
            };
            gate.read_directory(root, &options)
                .await
                .map_err(user_facing)?
        }
    };

    print_result(&result, args.json)
}

fn print_result(result: &BatchResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    for file in &result.files {
        println!("=== {} ===", file.path);
        println!("{}", file.content);
    }
    for diagnostic in &result.diagnostics {
        eprintln!("skipped {}: {}", diagnostic.path, diagnostic.message);
    }
    Ok(())
}

/// Security rejections surface as a plain access-denied message; the
/// underlying filesystem detail is only carried for environmental failures.
fn user_facing(error: LoadError) -> anyhow::Error {
    match error {
        LoadError::Security(security) => anyhow::anyhow!("access denied: {security}"),
        other => anyhow::Error::new(other),
    }
}

fn setup_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .with_target(true),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}
