//! Per-entity configuration: which fields a catalog edits, which of them are
//! required or numeric, which act as filter dimensions and which are searched.

use crate::statics;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

pub const BUILTIN_SCHEMAS: &str = include_str!("data/schemas.json5");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    #[default]
    Text,
    Multiline,
    Choice,
    Integer,
    Decimal,
}

impl FieldKind {
    pub fn is_numeric(self) -> bool {
        matches!(self, FieldKind::Integer | FieldKind::Decimal)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub key: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    /// Numeric fields only: value must be `> 0` (counts, sizes).
    #[serde(default)]
    pub positive: bool,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub options: Vec<String>,
    /// Choice fields only: accept values outside `options`.
    #[serde(default)]
    pub free_values: bool,
}

impl FieldSpec {
    pub fn text(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind: FieldKind::Text,
            required: false,
            positive: false,
            default: None,
            options: Vec::new(),
            free_values: false,
        }
    }

    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.key
        } else {
            &self.label
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySchema {
    pub kind: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
    /// Field keys used as exact-match filter dimensions.
    #[serde(default)]
    pub filters: Vec<String>,
    /// Field keys searched by the free-text query.
    #[serde(default = "default_search")]
    pub search: Vec<String>,
}

fn default_search() -> Vec<String> {
    vec![
        statics::FIELD_NAME.to_string(),
        statics::FIELD_DESCRIPTION.to_string(),
    ]
}

impl EntitySchema {
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.kind
        } else {
            &self.label
        }
    }

    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn field_label<'a>(&'a self, key: &'a str) -> &'a str {
        self.field(key).map(FieldSpec::display_label).unwrap_or(key)
    }

    /// Parse a single schema and apply the implicit `name`/`description` fields.
    pub fn from_json5_str(text: &str) -> Result<Self, SchemaError> {
        let mut schema: EntitySchema =
            json5::from_str(text).map_err(|e| SchemaError::Parse(e.to_string()))?;
        schema.normalize();
        schema.check()?;
        Ok(schema)
    }

    /// `name` is always present, first and required; `description` is always present
    /// (last unless declared elsewhere).
    fn normalize(&mut self) {
        match self
            .fields
            .iter()
            .position(|f| f.key == statics::FIELD_NAME)
        {
            Some(idx) => {
                let mut name = self.fields.remove(idx);
                name.required = true;
                self.fields.insert(0, name);
            }
            None => {
                let mut name = FieldSpec::text(statics::FIELD_NAME, "Name");
                name.required = true;
                self.fields.insert(0, name);
            }
        }

        if self.field(statics::FIELD_DESCRIPTION).is_none() {
            let mut description = FieldSpec::text(statics::FIELD_DESCRIPTION, "Description");
            description.kind = FieldKind::Multiline;
            self.fields.push(description);
        }
    }

    fn check(&self) -> Result<(), SchemaError> {
        let invalid = |message: String| SchemaError::Invalid {
            kind: self.kind.clone(),
            message,
        };

        if self.kind.trim().is_empty() {
            return Err(invalid("kind must not be empty".to_string()));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.key.trim().is_empty() {
                return Err(invalid("field key must not be empty".to_string()));
            }
            if !seen.insert(field.key.as_str()) {
                return Err(invalid(format!("duplicate field '{}'", field.key)));
            }
            if field.kind == FieldKind::Choice && field.options.is_empty() && !field.free_values {
                return Err(invalid(format!(
                    "choice field '{}' has no options",
                    field.key
                )));
            }
            let implicit =
                field.key == statics::FIELD_NAME || field.key == statics::FIELD_DESCRIPTION;
            if implicit && !matches!(field.kind, FieldKind::Text | FieldKind::Multiline) {
                return Err(invalid(format!(
                    "field '{}' must be text or multiline",
                    field.key
                )));
            }
            if field.positive && !field.kind.is_numeric() {
                return Err(invalid(format!(
                    "field '{}' is marked positive but is not numeric",
                    field.key
                )));
            }
        }

        for key in self.filters.iter().chain(self.search.iter()) {
            if self.field(key).is_none() {
                return Err(invalid(format!("unknown field '{key}'")));
            }
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("parsing schema JSON5: {0}")]
    Parse(String),
    #[error("reading {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("schema '{kind}': {message}")]
    Invalid { kind: String, message: String },
    #[error("schema kind '{0}' declared twice")]
    DuplicateKind(String),
}

#[derive(Debug, Deserialize)]
struct SchemaFile {
    schemas: Vec<EntitySchema>,
}

/// All entity schemas, in declaration order (which is also the order catalogs are listed).
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaSet {
    schemas: Vec<EntitySchema>,
}

impl SchemaSet {
    pub fn builtin() -> Result<Self, SchemaError> {
        Self::from_json5_str(BUILTIN_SCHEMAS)
    }

    pub fn from_json5_str(text: &str) -> Result<Self, SchemaError> {
        let file: SchemaFile =
            json5::from_str(text).map_err(|e| SchemaError::Parse(e.to_string()))?;
        Self::from_schemas(file.schemas)
    }

    pub fn from_schemas(schemas: Vec<EntitySchema>) -> Result<Self, SchemaError> {
        let mut kinds = HashSet::new();
        let mut out = Vec::with_capacity(schemas.len());
        for mut schema in schemas {
            schema.normalize();
            schema.check()?;
            if !kinds.insert(schema.kind.clone()) {
                return Err(SchemaError::DuplicateKind(schema.kind));
            }
            out.push(schema);
        }
        Ok(Self { schemas: out })
    }

    pub fn from_path(path: &Path) -> Result<Self, SchemaError> {
        let text = fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json5_str(&text)
    }

    /// Load from `LOREBOOK_SCHEMAS` if set, falling back to the built-in set.
    pub fn load() -> Result<Self, SchemaError> {
        let override_path = std::env::var_os(statics::ENV_SCHEMAS).map(PathBuf::from);
        Self::load_from(override_path.as_deref())
    }

    /// A broken override file is logged and ignored; only a broken built-in set is an error.
    pub fn load_from(override_path: Option<&Path>) -> Result<Self, SchemaError> {
        if let Some(path) = override_path {
            match Self::from_path(path) {
                Ok(set) => {
                    tracing::info!(
                        target: statics::LOG_SCHEMA,
                        path = %path.display(),
                        kinds = set.len(),
                        "schemas.loaded=file"
                    );
                    return Ok(set);
                }
                Err(err) => {
                    tracing::warn!(
                        target: statics::LOG_SCHEMA,
                        path = %path.display(),
                        error = %err,
                        "schemas.load_failed"
                    );
                }
            }
        }

        let set = Self::builtin()?;
        tracing::info!(
            target: statics::LOG_SCHEMA,
            kinds = set.len(),
            "schemas.loaded=builtin"
        );
        Ok(set)
    }

    pub fn get(&self, kind: &str) -> Option<&EntitySchema> {
        self.schemas.iter().find(|s| s.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntitySchema> {
        self.schemas.iter()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
