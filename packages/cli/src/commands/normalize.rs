use super::{emit_document, load_document};
use anyhow::Result;
use clap::Args;
use lexform_template::{normalize_content, DocumentNode};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct NormalizeArgs {
    /// Input document (JSON)
    pub input: PathBuf,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn normalize(args: NormalizeArgs) -> Result<()> {
    let document = load_document(&args.input)?;
    let normalized = normalize_content(&document).unwrap_or_else(DocumentNode::empty_doc);
    emit_document(&normalized, args.output.as_deref())
}
