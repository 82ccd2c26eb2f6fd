use crate::schema::{EntitySchema, FieldKind};
use crate::statics;
use crate::value::FieldValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

pub type RecordId = u64;
pub type ProjectId = u64;

/// Id of a record that has not been committed to a store yet.
pub const TRANSIENT_ID: RecordId = 0;

/// Scope of records that do not belong to a project (the projects themselves).
pub const GLOBAL_PROJECT: ProjectId = 0;

/// Anything a catalog can hold.
pub trait Record: Clone {
    fn id(&self) -> RecordId;

    fn set_id(&mut self, id: RecordId);

    fn name(&self) -> &str;

    /// Text of a field for searching and categorical filtering; `None` if unset.
    fn field_text(&self, key: &str) -> Option<Cow<'_, str>>;

    /// Load the record into an edit form laid out by `schema`.
    fn form(&self, schema: &EntitySchema) -> FormData {
        let mut form = FormData::default();
        for field in &schema.fields {
            let text = self
                .field_text(&field.key)
                .map(Cow::into_owned)
                .unwrap_or_default();
            form.set(&field.key, text);
        }
        form
    }

    /// Copy validated form data onto the record, overwriting in place.
    fn apply(&mut self, form: &ValidatedForm);

    fn is_transient(&self) -> bool {
        self.id() == TRANSIENT_ID
    }
}

/// Raw text as typed into an edit form, keyed by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    values: IndexMap<String, String>,
}

impl FormData {
    /// Empty string for fields the form does not carry.
    pub fn get(&self, key: &str) -> &str {
        self.values.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn get_mut(&mut self, key: &str) -> &mut String {
        self.values.entry(key.to_string()).or_default()
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Form data that passed validation. Only the validator builds these, so a commit
/// cannot be attempted with unchecked input.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedForm {
    // `None` marks an optional field the user left empty.
    values: IndexMap<String, Option<FieldValue>>,
}

impl ValidatedForm {
    pub(crate) fn new(values: IndexMap<String, Option<FieldValue>>) -> Self {
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.values.get(key).and_then(Option::as_ref)
    }

    pub fn text(&self, key: &str) -> &str {
        self.get(key).and_then(FieldValue::as_str).unwrap_or("")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&FieldValue>)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }
}

/// Schema-driven record used by every catalog in the desktop shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: RecordId,
    pub project_id: ProjectId,
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub attributes: IndexMap<String, FieldValue>,
}

impl Entry {
    pub fn new(kind: &str, project_id: ProjectId, name: &str) -> Self {
        Self {
            id: TRANSIENT_ID,
            project_id,
            kind: kind.to_string(),
            name: name.to_string(),
            description: String::new(),
            attributes: IndexMap::new(),
        }
    }

    /// A transient entry pre-filled with the schema's declared defaults.
    pub fn draft(schema: &EntitySchema, project_id: ProjectId) -> Self {
        let mut entry = Self::new(&schema.kind, project_id, "");
        for field in &schema.fields {
            let Some(default) = field.default.as_deref() else {
                continue;
            };
            match field.key.as_str() {
                statics::FIELD_NAME => entry.name = default.to_string(),
                statics::FIELD_DESCRIPTION => entry.description = default.to_string(),
                key => {
                    let value = match field.kind {
                        FieldKind::Integer => default.trim().parse().ok().map(FieldValue::Integer),
                        FieldKind::Decimal => default.trim().parse().ok().map(FieldValue::Decimal),
                        _ => Some(FieldValue::Text(default.to_string())),
                    };
                    if let Some(value) = value {
                        entry.attributes.insert(key.to_string(), value);
                    }
                }
            }
        }
        entry
    }

    pub fn with_id(mut self, id: RecordId) -> Self {
        self.id = id;
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_attr(mut self, key: &str, value: impl Into<FieldValue>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&FieldValue> {
        self.attributes.get(key)
    }
}

impl Record for Entry {
    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn field_text(&self, key: &str) -> Option<Cow<'_, str>> {
        match key {
            statics::FIELD_NAME => Some(Cow::Borrowed(self.name.as_str())),
            statics::FIELD_DESCRIPTION => Some(Cow::Borrowed(self.description.as_str())),
            _ => self.attributes.get(key).map(FieldValue::to_form_text),
        }
    }

    fn apply(&mut self, form: &ValidatedForm) {
        for (key, value) in form.iter() {
            match key {
                statics::FIELD_NAME => self.name = form.text(key).to_string(),
                statics::FIELD_DESCRIPTION => self.description = form.text(key).to_string(),
                _ => match value {
                    Some(value) => {
                        self.attributes.insert(key.to_string(), value.clone());
                    }
                    None => {
                        self.attributes.shift_remove(key);
                    }
                },
            }
        }
    }
}
