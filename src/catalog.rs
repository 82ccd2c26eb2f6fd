//! One management view's worth of state: a schema, its record store, the filter inputs
//! and the editor. The GUI binds widgets to this; nothing here knows about egui.

use crate::commit::{CommitError, commit};
use crate::filter::{self, DimensionChoice, FilterState};
use crate::record::{Entry, ProjectId, Record, RecordId};
use crate::schema::{EntitySchema, FieldKind};
use crate::selection::{Editor, SelectionState};
use crate::statics;
use crate::store::{RecordStore, StoreError};
use crate::validate::{ValidationError, validate};

/// A store mutation, reported back so the caller can show a status line and forward
/// the change to the persistence collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogEvent<R> {
    Created(R),
    Updated(R),
    Deleted(R),
}

impl<R: Record> CatalogEvent<R> {
    pub fn record(&self) -> &R {
        match self {
            CatalogEvent::Created(r) | CatalogEvent::Updated(r) | CatalogEvent::Deleted(r) => r,
        }
    }

    pub fn describe(&self) -> String {
        let verb = match self {
            CatalogEvent::Created(_) => statics::EN_STATUS_CREATED,
            CatalogEvent::Updated(_) => statics::EN_STATUS_UPDATED,
            CatalogEvent::Deleted(_) => statics::EN_STATUS_DELETED,
        };
        let record = self.record();
        format!("{verb} {} (ID {})", record.name(), record.id())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Commit(#[from] CommitError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone)]
pub struct Catalog<R> {
    schema: EntitySchema,
    store: RecordStore<R>,
    filter: FilterState,
    editor: Editor<R>,
}

impl<R: Record> Catalog<R> {
    pub fn new(schema: EntitySchema) -> Self {
        let filter = FilterState::for_schema(&schema);
        Self {
            schema,
            store: RecordStore::new(),
            filter,
            editor: Editor::new(),
        }
    }

    pub fn schema(&self) -> &EntitySchema {
        &self.schema
    }

    pub fn store(&self) -> &RecordStore<R> {
        &self.store
    }

    pub fn editor(&self) -> &Editor<R> {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor<R> {
        &mut self.editor
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut FilterState {
        &mut self.filter
    }

    pub fn state(&self) -> SelectionState {
        self.editor.state()
    }

    /// Replace the store contents (e.g. after opening a project). Any edit in progress
    /// is dropped; filter inputs are kept.
    pub fn seed(&mut self, records: Vec<R>) -> Result<(), StoreError> {
        self.store.seed(records)?;
        self.editor.clear();
        tracing::info!(
            target: statics::LOG_CATALOG,
            kind = %self.schema.kind,
            count = self.store.len(),
            "catalog.seeded"
        );
        Ok(())
    }

    pub fn set_query(&mut self, query: &str) {
        self.filter.set_query(query);
    }

    pub fn set_dimension(&mut self, key: &str, choice: DimensionChoice) {
        self.filter.set_dimension(key, choice);
    }

    pub fn reset_filters(&mut self) {
        self.filter.reset();
    }

    /// The records the list should show, recomputed from the store on every call.
    pub fn visible(&self) -> Vec<&R> {
        filter::apply(self.store.all(), &self.filter, &self.schema.search)
    }

    /// Picker values for a filter dimension: declared options first, then any other
    /// values present in the store.
    pub fn dimension_choices(&self, key: &str) -> Vec<String> {
        let mut choices = self
            .schema
            .field(key)
            .filter(|f| f.kind == FieldKind::Choice)
            .map(|f| f.options.clone())
            .unwrap_or_default();
        for value in filter::dimension_values(self.store.all(), key) {
            if !choices.contains(&value) {
                choices.push(value);
            }
        }
        choices
    }

    pub fn select(&mut self, id: RecordId) -> Result<(), StoreError> {
        let record = self.store.get(id).ok_or(StoreError::NotFound(id))?;
        self.editor.select_existing(record, &self.schema);
        Ok(())
    }

    pub fn start_new(&mut self, draft: R) {
        self.editor.start_new(draft, &self.schema);
    }

    pub fn cancel(&mut self) {
        self.editor.clear();
    }

    pub fn set_field(&mut self, key: &str, value: impl Into<String>) {
        self.editor.set_field(key, value);
    }

    /// Validate the form, then commit it. A validation failure leaves store and editor
    /// untouched and names the field to focus.
    pub fn save(&mut self) -> Result<CatalogEvent<R>, CatalogError> {
        let form = match validate(&self.schema, self.editor.form()) {
            Ok(form) => form,
            Err(err) => {
                tracing::debug!(
                    target: statics::LOG_CATALOG,
                    kind = %self.schema.kind,
                    field = %err.field,
                    "catalog.validation_failed"
                );
                return Err(err.into());
            }
        };

        let outcome = commit(&mut self.store, &mut self.editor, &form)?;
        let record = self
            .store
            .get(outcome.id)
            .cloned()
            .ok_or(StoreError::NotFound(outcome.id))?;
        Ok(if outcome.created {
            CatalogEvent::Created(record)
        } else {
            CatalogEvent::Updated(record)
        })
    }

    /// Remove a record; an edit of that record in progress is abandoned.
    pub fn delete(&mut self, id: RecordId) -> Result<CatalogEvent<R>, CatalogError> {
        let record = self.store.remove(id)?;
        if self.editor.active_id() == Some(id) {
            self.editor.clear();
        }
        tracing::info!(
            target: statics::LOG_CATALOG,
            kind = %self.schema.kind,
            id,
            "catalog.deleted"
        );
        Ok(CatalogEvent::Deleted(record))
    }
}

impl Catalog<Entry> {
    /// Start a new entry pre-filled with the schema defaults.
    pub fn start_new_entry(&mut self, project_id: ProjectId) {
        let draft = Entry::draft(&self.schema, project_id);
        self.start_new(draft);
    }
}

#[cfg(test)]
mod tests {
    use super::{Catalog, CatalogError, CatalogEvent};
    use crate::filter::DimensionChoice;
    use crate::record::{Entry, Record};
    use crate::schema::EntitySchema;
    use crate::selection::SelectionState;
    use crate::store::StoreError;
    use pretty_assertions::assert_eq;

    fn factions() -> Catalog<Entry> {
        let schema = EntitySchema::from_json5_str(
            r#"{
  kind: "faction",
  fields: [
    { key: "type", kind: "choice", options: ["Sect", "Clan"], required: true },
    { key: "member_count", kind: "integer", positive: true },
  ],
  filters: ["type"],
}"#,
        )
        .unwrap();
        Catalog::new(schema)
    }

    #[test]
    fn save_creates_then_updates() {
        let mut catalog = factions();
        catalog.start_new_entry(3);
        catalog.set_field("name", "Azure Cloud Sect");
        catalog.set_field("type", "Sect");
        let event = catalog.save().unwrap();
        assert!(matches!(&event, CatalogEvent::Created(e) if e.id == 1 && e.project_id == 3));
        assert_eq!(event.describe(), "Created Azure Cloud Sect (ID 1)");
        assert_eq!(catalog.state(), SelectionState::NoSelection);

        catalog.select(1).unwrap();
        catalog.set_field("member_count", "300");
        let event = catalog.save().unwrap();
        assert!(matches!(event, CatalogEvent::Updated(_)));
        assert_eq!(catalog.store().len(), 1);
        assert_eq!(
            catalog.store().get(1).and_then(|e| e.attribute("member_count")),
            Some(&crate::value::FieldValue::Integer(300))
        );
    }

    #[test]
    fn validation_failure_changes_nothing() {
        let mut catalog = factions();
        catalog.start_new_entry(3);
        catalog.set_field("name", "Blood Clan");
        let err = catalog.save().unwrap_err();
        match err {
            CatalogError::Validation(v) => assert_eq!(v.field, "type"),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(catalog.store().is_empty());
        assert_eq!(catalog.state(), SelectionState::EditingNew);
        assert_eq!(catalog.editor().form().get("name"), "Blood Clan");
    }

    #[test]
    fn delete_clears_matching_edit_only() {
        let mut catalog = factions();
        catalog
            .seed(vec![
                Entry::new("faction", 3, "A").with_id(1).with_attr("type", "Sect"),
                Entry::new("faction", 3, "B").with_id(2).with_attr("type", "Clan"),
            ])
            .unwrap();

        catalog.select(1).unwrap();
        catalog.delete(2).unwrap();
        assert_eq!(catalog.state(), SelectionState::EditingExisting);

        let event = catalog.delete(1).unwrap();
        assert_eq!(event.record().name(), "A");
        assert_eq!(catalog.state(), SelectionState::NoSelection);

        assert!(matches!(
            catalog.delete(1),
            Err(CatalogError::Store(StoreError::NotFound(1)))
        ));
        assert!(matches!(catalog.select(5), Err(StoreError::NotFound(5))));
    }

    #[test]
    fn visible_tracks_filters_and_store() {
        let mut catalog = factions();
        catalog
            .seed(vec![
                Entry::new("faction", 3, "Azure Cloud Sect").with_id(1).with_attr("type", "Sect"),
                Entry::new("faction", 3, "Iron Clan").with_id(2).with_attr("type", "Clan"),
                Entry::new("faction", 3, "Hidden Order").with_id(3).with_attr("type", "Order"),
            ])
            .unwrap();

        catalog.set_dimension("type", DimensionChoice::Exactly("Clan".to_string()));
        let names: Vec<_> = catalog.visible().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["Iron Clan"]);

        catalog.delete(2).unwrap();
        assert!(catalog.visible().is_empty());

        catalog.reset_filters();
        catalog.set_query("SECT");
        let names: Vec<_> = catalog.visible().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["Azure Cloud Sect"]);

        assert_eq!(
            catalog.dimension_choices("type"),
            vec!["Sect".to_string(), "Clan".to_string(), "Order".to_string()]
        );
    }
}
