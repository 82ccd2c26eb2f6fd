//! Core library for Lorebook, a world-building catalog editor for long-form fiction.
//! Provides schema-driven records, an in-memory record store, filtered list views and a
//! validated edit/commit workflow shared by every catalog (projects, characters, maps, ...).

pub mod assist;
pub mod catalog;
pub mod commit;
pub mod filter;
mod gui;
pub mod record;
pub mod repository;
pub mod schema;
pub mod selection;
pub mod statics;
pub mod store;
pub mod validate;
mod value;

pub use catalog::{Catalog, CatalogError, CatalogEvent};
pub use gui::run_gui;
pub use record::{Entry, FormData, ProjectId, Record, RecordId, ValidatedForm};
pub use repository::{MemoryRepository, Repository};
pub use schema::{EntitySchema, FieldKind, FieldSpec, SchemaError, SchemaSet};
pub use store::{RecordStore, StoreError};
pub use validate::ValidationError;
pub use value::{FieldValue, format_decimal};
