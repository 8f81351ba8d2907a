// folha CLI - compares the payroll exports of two systems

mod compare;
mod exit_codes;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use compare::{cmd_compare, cmd_validate, CompareArgs};
use exit_codes::EXIT_SUCCESS;

#[derive(Parser)]
#[command(name = "folha")]
#[command(about = "Compare payroll totals exported by two systems")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare a Sistema 1 export (branch blocks) with a Sistema 2 export (flat table)
    #[command(after_help = "\
Examples:
  folha compare 'Folha Pag_04-2025 (Sistema 1).xlsx' 'Folha Pag_04-2025 (Sistema 2).xlsx'
  folha compare sis1.xlsx sis2.xlsx -o abril.xlsx
  folha compare sis1.xlsx sis2.xlsx --config folha.toml --json > abril.json
  folha compare sis1.xls sis2.xlsx --sheet-b Lancamentos")]
    Compare {
        /// Sistema 1 workbook (one block per branch)
        sistema1: PathBuf,

        /// Sistema 2 workbook (one posting per row)
        sistema2: PathBuf,

        /// Report file to write
        #[arg(long, short = 'o', default_value = compare::DEFAULT_OUTPUT)]
        output: PathBuf,

        /// TOML config overriding layout and report defaults
        #[arg(long, env = "FOLHA_CONFIG")]
        config: Option<PathBuf>,

        /// Sheet to read from the Sistema 1 workbook (default: first)
        #[arg(long)]
        sheet_a: Option<String>,

        /// Sheet to read from the Sistema 2 workbook (default: first)
        #[arg(long)]
        sheet_b: Option<String>,

        /// Print the full result as JSON on stdout
        #[arg(long)]
        json: bool,

        /// Only log errors and skip the summary line
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Validate a config file without running a comparison
    #[command(after_help = "\
Examples:
  folha validate folha.toml")]
    Validate {
        /// Path to the TOML config file
        config: PathBuf,
    },
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            "\nengine:  folha-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   debug",
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            "\nengine:  folha-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   release",
        )
    }
}

/// Route `log` records from the library crates to stderr.
///
/// `RUST_LOG` selects the level (default `warn`); `--quiet` forces `error`.
fn init_logging(quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compare {
            sistema1,
            sistema2,
            output,
            config,
            sheet_a,
            sheet_b,
            json,
            quiet,
        } => {
            init_logging(quiet);
            cmd_compare(CompareArgs {
                sistema1,
                sistema2,
                output,
                config,
                sheet_a,
                sheet_b,
                json,
                quiet,
            })
        }
        Commands::Validate { config } => {
            init_logging(false);
            cmd_validate(config)
        }
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}
