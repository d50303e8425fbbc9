use super::load_document;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use lexform_template::{collect_field_keys, text_to_placeholder};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct FieldsArgs {
    /// Input document (JSON)
    pub input: PathBuf,
}

pub fn fields(args: FieldsArgs) -> Result<()> {
    let document = load_document(&args.input)?;
    let keys = collect_field_keys(&text_to_placeholder(&document));

    if keys.is_empty() {
        println!("{}", "No fields referenced".yellow());
        return Ok(());
    }

    for key in &keys {
        println!("{}", key);
    }
    eprintln!("{} {} fields", "✓".green(), keys.len());
    Ok(())
}
