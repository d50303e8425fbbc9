//! # Cell Addressing
//!
//! Derives identifiers for every table cell from its traversal position and
//! indexes the placeholders each cell contains.
//!
//! ```text
//! table-{tableIndex}-row-{rowIndex}-cell-{cellIndex}
//! ```
//!
//! IDs are re-derived on every call. Inserting or moving a row shifts the
//! IDs of every cell after it; nothing is persisted on the nodes.

use serde::Serialize;

use crate::form::FormData;
use crate::node::DocumentNode;
use crate::visibility::{render_visibility, ConditionEvaluator, ConditionalRule};
use crate::visitor::collect_field_keys;

/// Which tree the index runs over
///
/// `Rendered` drops regions hidden with `remove` before indexing, so their
/// tables no longer take a `tableIndex`. Regions hidden any other way stay
/// in both views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellView {
    #[default]
    Authored,
    Rendered,
}

/// One table cell and the fields it references
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellInfo {
    pub cell_id: String,
    pub table_index: usize,
    pub row_index: usize,
    pub cell_index: usize,
    pub cell_node: DocumentNode,
    /// Field keys in document order, duplicates kept
    pub placeholders: Vec<String>,
}

pub fn cell_id(table_index: usize, row_index: usize, cell_index: usize) -> String {
    format!("table-{}-row-{}-cell-{}", table_index, row_index, cell_index)
}

/// Every cell of every table in `doc`, in document order
pub fn extract_all_cells(doc: &DocumentNode) -> Vec<CellInfo> {
    let mut cells = Vec::new();
    let mut table_index = 0;
    walk(doc, &mut table_index, &mut cells);
    cells
}

/// `extract_all_cells` over the authored or the rendered tree
pub fn extract_cells_in_view<C, E>(
    doc: &DocumentNode,
    view: CellView,
    rules: &[ConditionalRule<C>],
    form: &FormData,
    evaluator: &E,
) -> Vec<CellInfo>
where
    E: ConditionEvaluator<C> + ?Sized,
{
    match view {
        CellView::Authored => extract_all_cells(doc),
        CellView::Rendered => extract_all_cells(&render_visibility(doc, rules, form, evaluator)),
    }
}

fn walk(node: &DocumentNode, table_index: &mut usize, cells: &mut Vec<CellInfo>) {
    if node.is_table() {
        index_table(node, *table_index, cells);
        *table_index += 1;
        // rows were consumed above; nested content is not revisited
        return;
    }

    for child in node.children() {
        walk(child, table_index, cells);
    }
}

fn index_table(table: &DocumentNode, table_index: usize, cells: &mut Vec<CellInfo>) {
    // rows are numbered by position in the table's content, stray children included
    for (row_index, row) in table.children().iter().enumerate() {
        if !row.is_table_row() {
            continue;
        }
        let row_cells = row.children().iter().filter(|n| n.is_table_cell());

        for (cell_index, cell) in row_cells.enumerate() {
            cells.push(CellInfo {
                cell_id: cell_id(table_index, row_index, cell_index),
                table_index,
                row_index,
                cell_index,
                cell_node: cell.clone(),
                placeholders: collect_field_keys(cell),
            });
        }
    }
}

pub fn find_cell_by_id<'a>(cells: &'a [CellInfo], cell_id: &str) -> Option<&'a CellInfo> {
    cells.iter().find(|cell| cell.cell_id == cell_id)
}

pub fn find_cell_by_position(
    cells: &[CellInfo],
    table_index: usize,
    row_index: usize,
    cell_index: usize,
) -> Option<&CellInfo> {
    cells.iter().find(|cell| {
        cell.table_index == table_index
            && cell.row_index == row_index
            && cell.cell_index == cell_index
    })
}
