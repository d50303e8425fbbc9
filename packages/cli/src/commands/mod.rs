pub mod cells;
pub mod fields;
pub mod normalize;
pub mod placeholders;

pub use cells::{cells, CellsArgs};
pub use fields::{fields, FieldsArgs};
pub use normalize::{normalize, NormalizeArgs};
pub use placeholders::{placeholders, PlaceholdersArgs};

use anyhow::{Context, Result};
use colored::Colorize;
use lexform_template::DocumentNode;
use std::fs;
use std::path::Path;

/// Read a JSON document tree from disk
pub fn load_document(path: &Path) -> Result<DocumentNode> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let document = DocumentNode::from_json(&source)
        .with_context(|| format!("{} is not a document tree", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded document");
    Ok(document)
}

/// Write a document as pretty JSON to `output`, or stdout when absent
pub fn emit_document(document: &DocumentNode, output: Option<&Path>) -> Result<()> {
    let json = document.to_json_pretty()?;
    match output {
        Some(path) => {
            fs::write(path, json + "\n")
                .with_context(|| format!("cannot write {}", path.display()))?;
            eprintln!("  {} wrote {}", "✓".green(), path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
