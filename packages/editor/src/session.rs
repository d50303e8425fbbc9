//! # Template Session
//!
//! One user's editing state for a template instance: the authored
//! document, the form being filled in, the conditional rules, and the
//! autosave coordinator persisting the `(document, formData)` pair.
//!
//! Every edit to form data or content goes through the session so the
//! placeholder model stays normalized and a save is (re)scheduled.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use lexform_template::{
    collect_field_keys, extract_cells_in_view, normalize_content, placeholder_to_text,
    render_visibility, text_to_placeholder, CellInfo, CellView, ConditionEvaluator,
    ConditionalRule, DocumentNode, FieldValue, FormData,
};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::watch;

use crate::autosave::{AutosaveCoordinator, SaveHandler, SaveStatus};
use crate::config::AutosaveConfig;
use crate::errors::SaveError;
use crate::form_state::FormState;

/// What gets persisted on every autosave
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePayload {
    pub document: DocumentNode,
    pub form_data: FormData,
}

/// Forwards saves and records the saved form data as persisted
struct PersistingHandler<H> {
    inner: H,
    form: Arc<Mutex<FormState>>,
}

#[async_trait]
impl<H: SaveHandler<SavePayload>> SaveHandler<SavePayload> for PersistingHandler<H> {
    async fn save(&self, payload: SavePayload) -> Result<(), SaveError> {
        let saved = payload.form_data.clone();
        self.inner.save(payload).await?;
        lock(&self.form).mark_persisted(saved);
        Ok(())
    }
}

fn lock(form: &Mutex<FormState>) -> MutexGuard<'_, FormState> {
    form.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Prepare editor content for the placeholder model
fn prepare(document: &DocumentNode) -> DocumentNode {
    let normalized = normalize_content(document).unwrap_or_else(DocumentNode::empty_doc);
    text_to_placeholder(&normalized)
}

pub struct TemplateSession<C = Value> {
    /// Unique session identifier
    pub id: String,

    document: DocumentNode,
    form: Arc<Mutex<FormState>>,
    rules: Vec<ConditionalRule<C>>,
    autosave: AutosaveCoordinator<SavePayload>,
}

impl<C> TemplateSession<C> {
    /// Start a session on a template with an empty form
    pub fn new<H>(id: impl Into<String>, document: &DocumentNode, handler: H, config: AutosaveConfig) -> Self
    where
        H: SaveHandler<SavePayload>,
    {
        Self::with_form_data(id, document, FormData::new(), handler, config)
    }

    /// Resume a session whose form data was already persisted
    pub fn with_form_data<H>(
        id: impl Into<String>,
        document: &DocumentNode,
        persisted: FormData,
        handler: H,
        config: AutosaveConfig,
    ) -> Self
    where
        H: SaveHandler<SavePayload>,
    {
        let id = id.into();
        let document = prepare(document);
        let form = Arc::new(Mutex::new(FormState::from_persisted(persisted)));
        let autosave = AutosaveCoordinator::new(
            PersistingHandler {
                inner: handler,
                form: Arc::clone(&form),
            },
            config,
        );

        tracing::info!(
            session = %id,
            fields = collect_field_keys(&document).len(),
            "template session started"
        );

        Self {
            id,
            document,
            form,
            rules: Vec::new(),
            autosave,
        }
    }

    pub fn set_rules(&mut self, rules: Vec<ConditionalRule<C>>) {
        self.rules = rules;
    }

    pub fn rules(&self) -> &[ConditionalRule<C>] {
        &self.rules
    }

    /// The authored template, with placeholders as nodes
    pub fn document(&self) -> &DocumentNode {
        &self.document
    }

    /// Field keys referenced by the template, in document order
    pub fn field_keys(&self) -> Vec<String> {
        collect_field_keys(&self.document)
    }

    pub fn form_data(&self) -> FormData {
        lock(&self.form).data().clone()
    }

    pub fn is_dirty(&self) -> bool {
        lock(&self.form).is_dirty()
    }

    pub fn dirty_fields(&self) -> Vec<String> {
        lock(&self.form).dirty_fields()
    }

    /// Set a form value and schedule a save if it changed
    pub fn set_field(&self, key: impl Into<String>, value: impl Into<FieldValue>) {
        let changed = lock(&self.form).set(key, value.into());
        if changed {
            self.schedule_save();
        }
    }

    pub fn remove_field(&self, key: &str) {
        let removed = lock(&self.form).remove(key);
        if removed {
            self.schedule_save();
        }
    }

    /// Replace the content with a new editor snapshot
    pub fn replace_document(&mut self, document: &DocumentNode) {
        let prepared = prepare(document);
        if prepared != self.document {
            self.document = prepared;
            self.schedule_save();
        }
    }

    /// Template with placeholders turned back into `{{key}}` text
    pub fn export_text(&self) -> DocumentNode {
        placeholder_to_text(&self.document)
    }

    /// Document as the current form data shows it
    pub fn render<E>(&self, evaluator: &E) -> DocumentNode
    where
        E: ConditionEvaluator<C> + ?Sized,
    {
        render_visibility(&self.document, &self.rules, &self.form_data(), evaluator)
    }

    pub fn cells<E>(&self, view: CellView, evaluator: &E) -> Vec<CellInfo>
    where
        E: ConditionEvaluator<C> + ?Sized,
    {
        extract_cells_in_view(&self.document, view, &self.rules, &self.form_data(), evaluator)
    }

    pub fn save_status(&self) -> SaveStatus {
        self.autosave.status()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<SaveStatus> {
        self.autosave.subscribe()
    }

    pub fn last_save_error(&self) -> Option<String> {
        self.autosave.last_error()
    }

    /// Save the current state now instead of waiting for the debounce
    pub async fn flush(&self) {
        self.autosave.perform_save(self.payload()).await
    }

    /// Stop reporting and cancel any scheduled save
    pub fn teardown(&self) {
        tracing::info!(session = %self.id, "template session closed");
        self.autosave.reset_status();
    }

    fn payload(&self) -> SavePayload {
        SavePayload {
            document: self.document.clone(),
            form_data: self.form_data(),
        }
    }

    fn schedule_save(&self) {
        self.autosave.trigger_save(self.payload());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoopHandler;

    #[async_trait]
    impl SaveHandler<SavePayload> for NoopHandler {
        async fn save(&self, _payload: SavePayload) -> Result<(), SaveError> {
            Ok(())
        }
    }

    fn template() -> DocumentNode {
        DocumentNode::doc(vec![DocumentNode::container(
            "paragraph",
            vec![
                DocumentNode::text("Client: {{client}}\nMatter: {{ matter }}"),
                DocumentNode::text("  "),
            ],
        )])
    }

    #[tokio::test]
    async fn test_session_creation() {
        let session: TemplateSession =
            TemplateSession::new("client-1", &template(), NoopHandler, AutosaveConfig::default());

        assert_eq!(session.id, "client-1");
        assert_eq!(session.field_keys(), vec!["client", "matter"]);
        assert!(!session.is_dirty());
        assert_eq!(session.save_status(), SaveStatus::Idle);

        let paragraph = &session.document().children()[0];
        assert!(paragraph.children().iter().any(|n| n.node_type == "hardBreak"));
    }

    #[tokio::test]
    async fn test_export_text_restores_markers() {
        let session: TemplateSession =
            TemplateSession::new("s", &template(), NoopHandler, AutosaveConfig::default());

        let exported = session.export_text();
        let texts: Vec<_> = exported.children()[0]
            .children()
            .iter()
            .filter_map(|n| n.text.as_deref())
            .collect();
        assert_eq!(texts, vec!["Client: ", "{{client}}", "Matter: ", "{{matter}}"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_clears_dirty_state() {
        let session: TemplateSession =
            TemplateSession::new("s", &template(), NoopHandler, AutosaveConfig::default());

        session.set_field("client", "Acme Corp");
        assert!(session.is_dirty());

        session.flush().await;
        assert!(!session.is_dirty());
        assert_eq!(session.save_status(), SaveStatus::Saved);
    }
}
