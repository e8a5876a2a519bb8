//! Keycommit CLI - canonical text, content keys and stub summaries.

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

mod commands;
mod input;
mod output;

use commands::{canonicalize, fingerprint, hash, summarize};
use keycommit_canonical::{DuplicateKeyPolicy, OpaquePolicy};

#[derive(Parser)]
#[command(name = "keycommit")]
#[command(about = "Deterministic canonicalization and content fingerprints")]
struct Cli {
    /// JSON file with canonicalization options
    #[arg(long, global = true)]
    config: Option<String>,
    /// Override how values outside the recognized set are handled
    #[arg(long, global = true, value_enum)]
    opaque: Option<OpaqueArg>,
    /// Override how keys that coerce to the same text are handled
    #[arg(long, global = true, value_enum)]
    duplicate_keys: Option<DuplicateKeysArg>,
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show canonical text for input JSON
    Canonicalize {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
        /// Print the hygiene report to stderr as JSON
        #[arg(long)]
        report: bool,
    },
    /// Show the content key of input JSON
    Fingerprint {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
    },
    /// SHA-256 hex digest of raw input text
    Hash {
        /// Input file (or stdin if not provided)
        input: Option<String>,
    },
    /// Build a deterministic stub summary of raw input text
    Summarize {
        /// Input file (or stdin if not provided)
        input: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OpaqueArg {
    Reject,
    Stringify,
}

impl From<OpaqueArg> for OpaquePolicy {
    fn from(value: OpaqueArg) -> Self {
        match value {
            OpaqueArg::Reject => OpaquePolicy::Reject,
            OpaqueArg::Stringify => OpaquePolicy::Stringify,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum DuplicateKeysArg {
    Reject,
    KeepLeast,
}

impl From<DuplicateKeysArg> for DuplicateKeyPolicy {
    fn from(value: DuplicateKeysArg) -> Self {
        match value {
            DuplicateKeysArg::Reject => DuplicateKeyPolicy::Reject,
            DuplicateKeysArg::KeepLeast => DuplicateKeyPolicy::KeepLeast,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = input::load_options(
        cli.config.as_deref(),
        cli.opaque.map(Into::into),
        cli.duplicate_keys.map(Into::into),
    );

    let result = options.and_then(|options| match cli.command {
        Commands::Canonicalize { input, report } => canonicalize::run(input, report, options),
        Commands::Fingerprint { input } => fingerprint::run(input, options),
        Commands::Hash { input } => hash::run(input),
        Commands::Summarize { input } => summarize::run(input),
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
