//! The active record of one catalog view and its editable form.
//!
//! States: `NoSelection`, `EditingExisting`, `EditingNew`. Starting a new edit from
//! either editing state replaces the previous one; commit and cancel return to
//! `NoSelection`. The form is a working copy: nothing reaches the store until commit.

use crate::record::{FormData, Record, RecordId, TRANSIENT_ID};
use crate::schema::EntitySchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    NoSelection,
    EditingExisting,
    EditingNew,
}

/// What a commit would write to.
#[derive(Debug, Clone, PartialEq)]
pub enum ActiveRecord<'a, R> {
    None,
    Existing(RecordId),
    New(&'a R),
}

/// Identifies one selection. Results of asynchronous work are only applied while the
/// ticket they were issued with is still current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionTicket(u64);

#[derive(Debug, Clone)]
enum Active<R> {
    Existing(RecordId),
    New(R),
}

#[derive(Debug, Clone)]
pub struct Editor<R> {
    active: Option<Active<R>>,
    form: FormData,
    generation: u64,
}

impl<R> Default for Editor<R> {
    fn default() -> Self {
        Self {
            active: None,
            form: FormData::default(),
            generation: 0,
        }
    }
}

impl<R: Record> Editor<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SelectionState {
        match self.active {
            None => SelectionState::NoSelection,
            Some(Active::Existing(_)) => SelectionState::EditingExisting,
            Some(Active::New(_)) => SelectionState::EditingNew,
        }
    }

    pub fn select_existing(&mut self, record: &R, schema: &EntitySchema) {
        self.active = Some(Active::Existing(record.id()));
        self.form = record.form(schema);
        self.bump();
    }

    /// Begin editing a transient record. The draft's id is forced to the sentinel.
    pub fn start_new(&mut self, mut draft: R, schema: &EntitySchema) {
        draft.set_id(TRANSIENT_ID);
        self.form = draft.form(schema);
        self.active = Some(Active::New(draft));
        self.bump();
    }

    pub fn clear(&mut self) {
        self.active = None;
        self.form = FormData::default();
        self.bump();
    }

    pub fn active(&self) -> ActiveRecord<'_, R> {
        match &self.active {
            None => ActiveRecord::None,
            Some(Active::Existing(id)) => ActiveRecord::Existing(*id),
            Some(Active::New(draft)) => ActiveRecord::New(draft),
        }
    }

    /// Id of the stored record being edited; `None` when idle or editing a new record.
    pub fn active_id(&self) -> Option<RecordId> {
        match self.active {
            Some(Active::Existing(id)) => Some(id),
            _ => None,
        }
    }

    pub fn form(&self) -> &FormData {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormData {
        &mut self.form
    }

    pub fn set_field(&mut self, key: &str, value: impl Into<String>) {
        self.form.set(key, value);
    }

    pub fn ticket(&self) -> SelectionTicket {
        SelectionTicket(self.generation)
    }

    pub fn is_current(&self, ticket: SelectionTicket) -> bool {
        self.active.is_some() && ticket == self.ticket()
    }

    /// Write a late result into the form, unless the user has moved on since `ticket`.
    pub fn apply_if_current(&mut self, ticket: SelectionTicket, key: &str, text: &str) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.form.set(key, text);
        true
    }

    fn bump(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}
