//! quill: browse the Telegram RPC catalog, build and check its docs, and
//! show the session parameters a client would announce.
//!
//!   quill catalog --namespace account
//!   quill docs build --out docs/
//!   quill docs check docs/
//!   quill session --config quill.toml --device-model "PC"
//!
//! Logging: `RUST_LOG=quill=debug,quill_catalog=debug quill docs check docs/`

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "quill")]
#[command(about = "Telegram RPC catalog and session parameters", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the catalog grouped by namespace
    Catalog {
        /// TL schema to read instead of the bundled one
        #[arg(long, value_name = "FILE")]
        schema: Option<PathBuf>,
        /// Only this namespace (`""` for the top level)
        #[arg(short, long)]
        namespace: Option<String>,
        /// List constructors instead of functions
        #[arg(long)]
        types: bool,
    },
    /// Generate or verify the Markdown reference
    Docs {
        #[command(subcommand)]
        command: DocsCommand,
    },
    /// Print the resolved session parameters
    Session(SessionOpts),
}

#[derive(Subcommand, Debug)]
enum DocsCommand {
    /// Render one page per entry plus the indexes
    Build {
        #[arg(short, long, value_name = "DIR")]
        out: PathBuf,
        #[arg(long, value_name = "FILE")]
        schema: Option<PathBuf>,
    },
    /// Check that every index entry has exactly one page
    Check {
        #[arg(value_name = "DIR")]
        dir: PathBuf,
    },
}

#[derive(Args, Debug, Default)]
struct SessionOpts {
    /// Settings file with a `[client]` section
    #[arg(short, long, value_name = "FILE", env = "QUILL_CONFIG")]
    config: Option<PathBuf>,
    #[arg(long)]
    app_version: Option<String>,
    #[arg(long)]
    device_model: Option<String>,
    #[arg(long)]
    system_version: Option<String>,
    #[arg(long)]
    lang_code: Option<String>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("quill=info,quill_catalog=warn")).init();

    let cli = Cli::parse();
    let mut out = std::io::stdout().lock();
    match commands::run(cli.command, &mut out) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("✗ {e}");
            ExitCode::FAILURE
        }
    }
}
