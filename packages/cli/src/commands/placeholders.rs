use super::{emit_document, load_document};
use anyhow::Result;
use clap::Args;
use lexform_template::{normalize_content, placeholder_to_text, text_to_placeholder, DocumentNode};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct PlaceholdersArgs {
    /// Input document (JSON)
    pub input: PathBuf,

    /// Turn placeholder nodes back into {{fieldKey}} text
    #[arg(short, long)]
    pub reverse: bool,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn placeholders(args: PlaceholdersArgs) -> Result<()> {
    let document = load_document(&args.input)?;
    let transformed = transform(&document, args.reverse);
    emit_document(&transformed, args.output.as_deref())
}

fn transform(document: &DocumentNode, reverse: bool) -> DocumentNode {
    if reverse {
        placeholder_to_text(document)
    } else {
        let normalized = normalize_content(document).unwrap_or_else(DocumentNode::empty_doc);
        text_to_placeholder(&normalized)
    }
}
