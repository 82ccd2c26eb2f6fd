//! Visible-subset computation for catalog lists: free-text search plus exact-match
//! categorical filters. Always recomputed over the full record slice; never cached.

use crate::record::Record;
use crate::schema::EntitySchema;
use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DimensionChoice {
    /// No constraint on this dimension.
    #[default]
    All,
    Exactly(String),
}

/// Search text and per-dimension choices, straight from the filter inputs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub query: String,
    pub dimensions: IndexMap<String, DimensionChoice>,
}

impl FilterState {
    /// Every dimension the schema declares, set to `All`.
    pub fn for_schema(schema: &EntitySchema) -> Self {
        Self {
            query: String::new(),
            dimensions: schema
                .filters
                .iter()
                .map(|key| (key.clone(), DimensionChoice::All))
                .collect(),
        }
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    pub fn set_dimension(&mut self, key: &str, choice: DimensionChoice) {
        self.dimensions.insert(key.to_string(), choice);
    }

    pub fn dimension(&self, key: &str) -> &DimensionChoice {
        self.dimensions.get(key).unwrap_or(&DimensionChoice::All)
    }

    pub fn reset(&mut self) {
        self.query.clear();
        for choice in self.dimensions.values_mut() {
            *choice = DimensionChoice::All;
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        self.query.trim().is_empty()
            && self
                .dimensions
                .values()
                .all(|c| *c == DimensionChoice::All)
    }

    pub fn matches<R: Record>(&self, record: &R, search_fields: &[String]) -> bool {
        self.matches_lowered(record, search_fields, &self.query.trim().to_lowercase())
    }

    fn matches_lowered<R: Record>(
        &self,
        record: &R,
        search_fields: &[String],
        query_lower: &str,
    ) -> bool {
        let text_ok = query_lower.is_empty()
            || search_fields.iter().any(|key| {
                record
                    .field_text(key)
                    .is_some_and(|text| text.to_lowercase().contains(query_lower))
            });
        if !text_ok {
            return false;
        }

        self.dimensions.iter().all(|(key, choice)| match choice {
            DimensionChoice::All => true,
            DimensionChoice::Exactly(wanted) => record
                .field_text(key)
                .is_some_and(|value| value.as_ref() == wanted.as_str()),
        })
    }
}

/// Records passing `state`, in store order.
pub fn apply<'a, R: Record>(
    records: &'a [R],
    state: &FilterState,
    search_fields: &[String],
) -> Vec<&'a R> {
    let query_lower = state.query.trim().to_lowercase();
    records
        .iter()
        .filter(|r| state.matches_lowered(*r, search_fields, &query_lower))
        .collect()
}

/// Distinct non-empty values of a dimension, in first-seen order (for filter pickers).
pub fn dimension_values<R: Record>(records: &[R], key: &str) -> Vec<String> {
    let mut values: Vec<String> = Vec::new();
    for record in records {
        let Some(value) = record.field_text(key) else {
            continue;
        };
        if value.trim().is_empty() || values.iter().any(|v| v.as_str() == value.as_ref()) {
            continue;
        }
        values.push(value.into_owned());
    }
    values
}
