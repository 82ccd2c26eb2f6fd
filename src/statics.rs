// Central place for UI strings and other non-localized constants.
// Keep these out of gui.rs to reduce duplication and make tweaks safer.

// Implicit field keys present on every entity schema.
pub const FIELD_NAME: &str = "name";
pub const FIELD_DESCRIPTION: &str = "description";

// Kind of the project catalog; every other catalog is scoped to one project.
pub const KIND_PROJECT: &str = "project";

// Environment override for the schema configuration file.
pub const ENV_SCHEMAS: &str = "LOREBOOK_SCHEMAS";

// Log targets.
pub const LOG_STORE: &str = "lorebook::store";
pub const LOG_CATALOG: &str = "lorebook::catalog";
pub const LOG_SCHEMA: &str = "lorebook::schema";
pub const LOG_GUI: &str = "lorebook::gui";

// English UI strings (EN_ prefix to make future localization easier)
pub const EN_APP_TITLE: &str = "Lorebook";

pub const EN_BTN_ABOUT: &str = "About";
pub const EN_BTN_TOGGLE_THEME: &str = "Theme";
pub const EN_BTN_NEW: &str = "New";
pub const EN_BTN_SAVE: &str = "Save";
pub const EN_BTN_CANCEL: &str = "Cancel";
pub const EN_BTN_DELETE: &str = "Delete";
pub const EN_BTN_OK: &str = "OK";
pub const EN_BTN_CLEAR: &str = "Clear";
pub const EN_BTN_RESET_FILTERS: &str = "Reset";

pub const EN_WINDOW_ABOUT: &str = "About";
pub const EN_WINDOW_VALIDATION: &str = "Check input";
pub const EN_WINDOW_CONFIRM_DELETE: &str = "Delete record";

pub const EN_ABOUT_HEADING: &str = "Lorebook";
pub const EN_ABOUT_VERSION: &str = "Version:";
pub const EN_ABOUT_BLURB: &str =
    "World-building catalogs for long-form fiction: projects, chapters, characters, factions and setting systems.";
pub const EN_ABOUT_SCHEMAS: &str = "Entity schemas:";

pub const EN_HEADING_KINDS: &str = "Catalogs";
pub const EN_HEADING_RECORDS: &str = "Records";
pub const EN_HEADING_DETAIL: &str = "Details";

pub const EN_LABEL_PROJECT: &str = "Project:";
pub const EN_LABEL_SEARCH: &str = "Search:";
pub const EN_HINT_SEARCH: &str = "name or description";
pub const EN_CHOICE_ALL: &str = "All";
pub const EN_CHOICE_NONE: &str = "(none)";
pub const EN_NO_PROJECT: &str = "No project";

pub const EN_COL_ID: &str = "ID";
pub const EN_COL_NAME: &str = "Name";

pub const EN_SELECT_KIND: &str = "Select a catalog from the left.";
pub const EN_SELECT_PROJECT_FIRST: &str = "Open or create a project first.";
pub const EN_SELECT_RECORD: &str = "Select a record, or press New.";
pub const EN_EMPTY_CATALOG: &str = "No records yet.";
pub const EN_NO_MATCHES: &str = "No matches.";
pub const EN_BADGE_NEW: &str = "new";
pub const EN_HINT_INTEGER: &str = "whole number";
pub const EN_HINT_DECIMAL: &str = "number";
pub const EN_REQUIRED_MARK: &str = "*";

pub const EN_CONFIRM_DELETE_PREFIX: &str = "Delete";
pub const EN_STATUS_CREATED: &str = "Created";
pub const EN_STATUS_UPDATED: &str = "Saved";
pub const EN_STATUS_DELETED: &str = "Deleted";
pub const EN_STATUS_PROJECT_OPENED: &str = "Opened project";

// Validation messages (the field label is prepended).
pub const EN_RULE_REQUIRED: &str = "is required.";
pub const EN_RULE_INTEGER: &str = "must be a whole number.";
pub const EN_RULE_DECIMAL: &str = "must be a number.";
pub const EN_RULE_POSITIVE: &str = "must be greater than 0.";
pub const EN_RULE_CHOICE: &str = "must be one of:";

pub const EN_ERR_PERSIST: &str = "Saved in this session, but the repository rejected the change";
pub const EN_ERR_LOAD_PROJECT: &str = "Failed to load project records";
pub const EN_ERR_NOTHING_SELECTED: &str = "Nothing is being edited.";
