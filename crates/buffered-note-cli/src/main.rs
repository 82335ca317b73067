mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::note::{PaymentArgs, TableArgs, ValidateArgs};

/// Payment-at-maturity calculations for contingent income buffered notes
#[derive(Parser)]
#[command(
    name = "bnote",
    version,
    about = "Payment-at-maturity calculations for contingent income buffered notes",
    long_about = "Computes payment at maturity for a buffered structured note with \
                  decimal precision: a single scenario return, or the hypothetical \
                  payment table over an ordered list of scenario returns."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute payment at maturity for a single underlying return
    Payment(PaymentArgs),
    /// Generate the hypothetical payment-at-maturity table
    Table(TableArgs),
    /// Validate a note parameter set
    Validate(ValidateArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Payment(args) => commands::note::run_payment(args),
        Commands::Table(args) => commands::note::run_table(args),
        Commands::Validate(args) => commands::note::run_validate(args),
        Commands::Version => {
            println!("bnote {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
