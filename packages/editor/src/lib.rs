//! # Lexform Editor
//!
//! Stateful side of template editing.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ template: pure tree operations              │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: TemplateSession                     │
//! │  - form state with dirty tracking           │
//! │  - conditional rendering, cell bindings     │
//! │  - debounced autosave, one save in flight   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ SaveHandler: caller-provided persistence    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use lexform_editor::{Config, TemplateSession};
//!
//! let config = Config::load(&project_dir)?;
//! let session: TemplateSession =
//!     TemplateSession::new("draft-42", &template, HttpSaver::new(url), config.autosave);
//!
//! session.set_field("client_name", "Acme Corp"); // save scheduled
//! let rendered = session.render(&my_condition_language);
//!
//! session.teardown();
//! ```

mod autosave;
mod config;
mod errors;
mod form_state;
mod session;

pub use autosave::{AutosaveCoordinator, SaveHandler, SaveStatus};
pub use config::{AutosaveConfig, Config, DEFAULT_CONFIG_NAME};
pub use errors::{EditorError, SaveError};
pub use form_state::FormState;
pub use session::{SavePayload, TemplateSession};

// Re-export common types for convenience
pub use lexform_template::{CellView, DocumentNode, FieldValue, FormData};
