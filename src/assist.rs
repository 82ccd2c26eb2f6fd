//! Boundary to an external writing assistant (a local LLM server or a hosted chat API).
//! The catalog only supplies a prompt plus the active form as key/value context, and
//! writes the returned text back into one form field if the user has not moved on.

use crate::record::{FormData, Record};
use crate::schema::EntitySchema;
use crate::selection::{Editor, SelectionTicket};
use crate::statics;
use crate::value::FieldValue;
use indexmap::IndexMap;

pub type AssistContext = IndexMap<String, FieldValue>;

#[derive(Debug, Clone, PartialEq)]
pub struct AssistRequest {
    pub prompt: String,
    pub context: AssistContext,
}

impl AssistRequest {
    /// Context holds the entity kind and every non-empty form field, keyed by label.
    pub fn for_form(schema: &EntitySchema, form: &FormData, instruction: &str) -> Self {
        let mut context = AssistContext::new();
        context.insert(
            "kind".to_string(),
            FieldValue::Text(schema.display_label().to_string()),
        );
        for field in &schema.fields {
            let text = form.get(&field.key).trim();
            if text.is_empty() {
                continue;
            }
            context.insert(
                field.display_label().to_string(),
                FieldValue::Text(text.to_string()),
            );
        }
        Self {
            prompt: instruction.to_string(),
            context,
        }
    }
}

pub trait Assistant {
    fn generate(&self, request: &AssistRequest) -> anyhow::Result<String>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssistOutcome {
    Applied,
    /// The selection changed while the request was in flight; the result was dropped.
    Stale,
    Failed(String),
}

/// A request issued for one selection, waiting for its answer.
#[derive(Debug, Clone)]
pub struct PendingAssist {
    pub ticket: SelectionTicket,
    pub field: String,
    pub request: AssistRequest,
}

impl PendingAssist {
    /// `None` when nothing is being edited.
    pub fn issue<R: Record>(
        editor: &Editor<R>,
        schema: &EntitySchema,
        field: &str,
        instruction: &str,
    ) -> Option<Self> {
        let ticket = editor.ticket();
        if !editor.is_current(ticket) {
            return None;
        }
        Some(Self {
            ticket,
            field: field.to_string(),
            request: AssistRequest::for_form(schema, editor.form(), instruction),
        })
    }

    pub fn resolve<R: Record>(
        self,
        editor: &mut Editor<R>,
        result: anyhow::Result<String>,
    ) -> AssistOutcome {
        match result {
            Ok(text) => {
                if editor.apply_if_current(self.ticket, &self.field, text.trim()) {
                    AssistOutcome::Applied
                } else {
                    tracing::debug!(
                        target: statics::LOG_CATALOG,
                        field = %self.field,
                        "assist.stale_result_dropped"
                    );
                    AssistOutcome::Stale
                }
            }
            Err(err) => AssistOutcome::Failed(format!("{err:#}")),
        }
    }

    /// Issue-and-wait for synchronous assistants.
    pub fn run<R: Record, A: Assistant + ?Sized>(
        self,
        assistant: &A,
        editor: &mut Editor<R>,
    ) -> AssistOutcome {
        let result = assistant.generate(&self.request);
        self.resolve(editor, result)
    }
}
