mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    cells, fields, normalize, placeholders, CellsArgs, FieldsArgs, NormalizeArgs, PlaceholdersArgs,
};

/// Lexform CLI - inspect and transform legal template documents
#[derive(Parser, Debug)]
#[command(name = "lexform")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Drop blank text and split hard line breaks
    Normalize(NormalizeArgs),

    /// Convert {{fieldKey}} markup to placeholder nodes (or back with --reverse)
    Placeholders(PlaceholdersArgs),

    /// List every table cell with its ID and bound fields
    Cells(CellsArgs),

    /// List the field keys a template references
    Fields(FieldsArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Normalize(args) => normalize(args),
        Command::Placeholders(args) => placeholders(args),
        Command::Cells(args) => cells(args),
        Command::Fields(args) => fields(args),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
