use lexform_template::{
    cell_id, collect_field_keys, extract_all_cells, normalize_content, placeholder_to_text,
    text_to_placeholder, DocumentNode, TemplateError,
};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn to_js_error(err: TemplateError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn normalize(source: &str) -> Result<String, TemplateError> {
    let doc = DocumentNode::from_json(source)?;
    normalize_content(&doc)
        .unwrap_or_else(DocumentNode::empty_doc)
        .to_json()
}

fn to_placeholders(source: &str) -> Result<String, TemplateError> {
    text_to_placeholder(&DocumentNode::from_json(source)?).to_json()
}

fn to_text(source: &str) -> Result<String, TemplateError> {
    placeholder_to_text(&DocumentNode::from_json(source)?).to_json()
}

fn cells(source: &str) -> Result<String, TemplateError> {
    let doc = DocumentNode::from_json(source)?;
    Ok(serde_json::to_string(&extract_all_cells(&doc))?)
}

fn field_keys(source: &str) -> Result<String, TemplateError> {
    let doc = DocumentNode::from_json(source)?;
    Ok(serde_json::to_string(&collect_field_keys(&doc))?)
}

/// Drop blank text nodes and split hard line breaks
#[wasm_bindgen(js_name = normalizeContent)]
pub fn normalize_content_js(doc_json: &str) -> Result<String, JsValue> {
    normalize(doc_json).map_err(to_js_error)
}

/// Convert `{{fieldKey}}` markup into placeholder nodes
#[wasm_bindgen(js_name = textToPlaceholder)]
pub fn text_to_placeholder_js(doc_json: &str) -> Result<String, JsValue> {
    to_placeholders(doc_json).map_err(to_js_error)
}

/// Convert placeholder nodes back into `{{fieldKey}}` text
#[wasm_bindgen(js_name = placeholderToText)]
pub fn placeholder_to_text_js(doc_json: &str) -> Result<String, JsValue> {
    to_text(doc_json).map_err(to_js_error)
}

/// Every table cell as `{ cellId, tableIndex, rowIndex, cellIndex, cellNode, placeholders }`
#[wasm_bindgen(js_name = extractAllCells)]
pub fn extract_all_cells_js(doc_json: &str) -> Result<String, JsValue> {
    cells(doc_json).map_err(to_js_error)
}

#[wasm_bindgen(js_name = collectFieldKeys)]
pub fn collect_field_keys_js(doc_json: &str) -> Result<String, JsValue> {
    field_keys(doc_json).map_err(to_js_error)
}

#[wasm_bindgen(js_name = cellId)]
pub fn cell_id_js(table_index: usize, row_index: usize, cell_index: usize) -> String {
    cell_id(table_index, row_index, cell_index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    const LETTER: &str = r#"{
        "type": "doc",
        "content": [
            { "type": "paragraph", "content": [
                { "type": "text", "text": "Dear {{ client }},\nPlease sign." }
            ]},
            { "type": "table", "content": [
                { "type": "tableRow", "content": [
                    { "type": "tableCell", "content": [
                        { "type": "paragraph", "content": [{ "type": "text", "text": "{{fee}}" }] }
                    ]}
                ]}
            ]}
        ]
    }"#;

    #[test]
    fn test_pipeline_through_json() {
        let normalized = normalize_content_js(LETTER).unwrap();
        let converted = text_to_placeholder_js(&normalized).unwrap();

        let keys: Value = serde_json::from_str(&collect_field_keys_js(&converted).unwrap()).unwrap();
        assert_eq!(keys, json!(["client", "fee"]));

        let cells: Value = serde_json::from_str(&extract_all_cells_js(&converted).unwrap()).unwrap();
        assert_eq!(cells[0]["cellId"], json!("table-0-row-0-cell-0"));
        assert_eq!(cells[0]["placeholders"], json!(["fee"]));
    }

    #[test]
    fn test_reverse_restores_markup() {
        let converted = text_to_placeholder_js(LETTER).unwrap();
        let text = placeholder_to_text_js(&converted).unwrap();
        assert!(text.contains("{{client}}"));
        assert!(!text.contains("placeholder"));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(normalize("{"), Err(TemplateError::Json(_))));
    }

    #[test]
    fn test_cell_id_format() {
        assert_eq!(cell_id_js(2, 0, 3), "table-2-row-0-cell-3");
    }
}
