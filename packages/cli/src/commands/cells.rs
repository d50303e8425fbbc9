use super::load_document;
use anyhow::Result;
use clap::{Args, ValueEnum};
use colored::Colorize;
use lexform_template::{extract_all_cells, text_to_placeholder, CellInfo};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Args)]
pub struct CellsArgs {
    /// Input document (JSON)
    pub input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

pub fn cells(args: CellsArgs) -> Result<()> {
    let document = load_document(&args.input)?;
    let cells = extract_all_cells(&text_to_placeholder(&document));

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&cells)?),
        OutputFormat::Text => {
            if cells.is_empty() {
                println!("{}", "No table cells found".yellow());
            }
            for cell in &cells {
                println!("{}", describe(cell));
            }
        }
    }
    Ok(())
}

fn describe(cell: &CellInfo) -> String {
    if cell.placeholders.is_empty() {
        format!("{}", cell.cell_id.bright_white())
    } else {
        format!(
            "{}  {}",
            cell.cell_id.bright_white(),
            cell.placeholders.join(", ").cyan()
        )
    }
}
