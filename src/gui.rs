use crate::catalog::{Catalog, CatalogError, CatalogEvent};
use crate::filter::DimensionChoice;
use crate::record::{Entry, GLOBAL_PROJECT, ProjectId, Record, RecordId};
use crate::repository::{self, MemoryRepository, Repository};
use crate::schema::{FieldKind, FieldSpec, SchemaSet};
use crate::selection::SelectionState;
use crate::statics;
use crate::validate::ValidationError;
use eframe::egui;
use egui_extras::{Column, TableBuilder};
use indexmap::IndexMap;

pub fn run_gui() -> eframe::Result {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 860.0]),
        ..Default::default()
    };
    let title = format!("{} {}", statics::EN_APP_TITLE, env!("CARGO_PKG_VERSION"));
    eframe::run_native(
        &title,
        options,
        Box::new(|_cc| {
            let schemas = SchemaSet::load()?;
            Ok(Box::new(LorebookApp::new(schemas)))
        }),
    )
}

/// User intents collected while drawing a frame and applied afterwards, so panels only
/// need shared access to the catalogs they render.
#[derive(Clone, Debug, PartialEq)]
enum UiAction {
    SelectKind(String),
    Select(String, RecordId),
    New(String),
    Save(String),
    Cancel(String),
    RequestDelete(String, RecordId),
    Delete(String, RecordId),
    OpenProject(Option<RecordId>),
}

#[derive(Clone, Debug)]
struct PendingDelete {
    kind: String,
    id: RecordId,
    name: String,
}

/// The main application state: one catalog and one repository per entity kind,
/// plus the open project and dialog state.
struct LorebookApp {
    schemas: SchemaSet,
    catalogs: IndexMap<String, Catalog<Entry>>,
    repositories: IndexMap<String, MemoryRepository<Entry>>,
    project: Option<RecordId>,
    selected_kind: Option<String>,
    status: String,
    last_error: Option<String>,

    // Blocking validation warning; on dismissal focus returns to the offending field.
    validation: Option<ValidationError>,
    focus_field: Option<String>,
    pending_delete: Option<PendingDelete>,

    about_open: bool,
    theme_dark: bool,
}

impl LorebookApp {
    fn new(schemas: SchemaSet) -> Self {
        let repositories = schemas
            .iter()
            .map(|s| (s.kind.clone(), MemoryRepository::new()))
            .collect();
        Self::with_repositories(schemas, repositories)
    }

    fn with_repositories(
        schemas: SchemaSet,
        repositories: IndexMap<String, MemoryRepository<Entry>>,
    ) -> Self {
        let catalogs = schemas
            .iter()
            .map(|s| (s.kind.clone(), Catalog::new(s.clone())))
            .collect();
        let selected_kind = schemas.iter().next().map(|s| s.kind.clone());
        let mut app = Self {
            selected_kind,
            schemas,
            catalogs,
            repositories,
            project: None,
            status: String::new(),
            last_error: None,
            validation: None,
            focus_field: None,
            pending_delete: None,
            about_open: false,
            theme_dark: true,
        };
        app.load_scope(statics::KIND_PROJECT, GLOBAL_PROJECT);
        app
    }

    /// The project new records of `kind` belong to; `None` while no project is open.
    fn scope_for(&self, kind: &str) -> Option<ProjectId> {
        if kind == statics::KIND_PROJECT {
            Some(GLOBAL_PROJECT)
        } else {
            self.project
        }
    }

    fn project_name(&self, id: RecordId) -> Option<&str> {
        self.catalogs
            .get(statics::KIND_PROJECT)?
            .store()
            .get(id)
            .map(|p| p.name.as_str())
    }

    fn load_scope(&mut self, kind: &str, project_id: ProjectId) {
        let records = match self.repositories.get(kind) {
            Some(repo) => match repo.get_all_by_project(project_id) {
                Ok(records) => records,
                Err(e) => {
                    self.last_error = Some(format!("{}: {e:#}", statics::EN_ERR_LOAD_PROJECT));
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        if let Some(catalog) = self.catalogs.get_mut(kind)
            && let Err(e) = catalog.seed(records)
        {
            self.last_error = Some(format!("{}: {e}", statics::EN_ERR_LOAD_PROJECT));
        }
    }

    fn scoped_kinds(&self) -> Vec<String> {
        self.catalogs
            .keys()
            .filter(|k| k.as_str() != statics::KIND_PROJECT)
            .cloned()
            .collect()
    }

    fn open_project(&mut self, project_id: RecordId) {
        for kind in self.scoped_kinds() {
            self.load_scope(&kind, project_id);
        }
        self.project = Some(project_id);
        let name = self.project_name(project_id).unwrap_or_default().to_string();
        tracing::info!(target: statics::LOG_GUI, project_id, "project.opened");
        self.status = format!("{} {name}", statics::EN_STATUS_PROJECT_OPENED);
    }

    fn close_project(&mut self) {
        for kind in self.scoped_kinds() {
            if let Some(catalog) = self.catalogs.get_mut(&kind)
                && let Err(e) = catalog.seed(Vec::new())
            {
                self.last_error = Some(e.to_string());
            }
        }
        self.project = None;
    }

    /// Drop every record that belonged to a deleted project.
    fn purge_project(&mut self, project_id: RecordId) {
        for kind in self.scoped_kinds() {
            let Some(repo) = self.repositories.get_mut(&kind) else {
                continue;
            };
            let ids: Vec<RecordId> = match repo.get_all_by_project(project_id) {
                Ok(records) => records.iter().map(Record::id).collect(),
                Err(e) => {
                    self.last_error = Some(format!("{e:#}"));
                    continue;
                }
            };
            for id in ids {
                if let Err(e) = repo.delete(project_id, id) {
                    self.last_error = Some(format!("{e:#}"));
                }
            }
        }
    }

    fn persist(&mut self, kind: &str, event: &CatalogEvent<Entry>) {
        let Some(repo) = self.repositories.get_mut(kind) else {
            return;
        };
        if let Err(e) = repository::push(repo, event) {
            tracing::warn!(target: statics::LOG_GUI, kind, error = %e, "persist_failed");
            self.last_error = Some(format!("{}: {e:#}", statics::EN_ERR_PERSIST));
        }
    }

    fn save_active(&mut self, kind: &str) {
        let Some(catalog) = self.catalogs.get_mut(kind) else {
            return;
        };
        match catalog.save() {
            Ok(event) => {
                self.status = event.describe();
                self.last_error = None;
                self.persist(kind, &event);
                // A first project opens itself so the other catalogs become usable.
                if kind == statics::KIND_PROJECT
                    && self.project.is_none()
                    && let CatalogEvent::Created(project) = &event
                {
                    self.open_project(project.id);
                }
            }
            Err(CatalogError::Validation(err)) => {
                self.validation = Some(err);
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
            }
        }
    }

    fn delete_record(&mut self, kind: &str, id: RecordId) {
        let Some(catalog) = self.catalogs.get_mut(kind) else {
            return;
        };
        match catalog.delete(id) {
            Ok(event) => {
                self.status = event.describe();
                self.last_error = None;
                self.persist(kind, &event);
                if kind == statics::KIND_PROJECT {
                    self.purge_project(id);
                    if self.project == Some(id) {
                        self.close_project();
                    }
                }
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
            }
        }
    }

    fn handle(&mut self, action: UiAction) {
        match action {
            UiAction::SelectKind(kind) => {
                self.selected_kind = Some(kind);
            }
            UiAction::Select(kind, id) => {
                if let Some(catalog) = self.catalogs.get_mut(&kind)
                    && let Err(e) = catalog.select(id)
                {
                    self.last_error = Some(e.to_string());
                }
            }
            UiAction::New(kind) => {
                let Some(scope) = self.scope_for(&kind) else {
                    self.last_error = Some(statics::EN_SELECT_PROJECT_FIRST.to_string());
                    return;
                };
                if let Some(catalog) = self.catalogs.get_mut(&kind) {
                    catalog.start_new_entry(scope);
                    self.focus_field = Some(statics::FIELD_NAME.to_string());
                }
            }
            UiAction::Save(kind) => self.save_active(&kind),
            UiAction::Cancel(kind) => {
                if let Some(catalog) = self.catalogs.get_mut(&kind) {
                    catalog.cancel();
                }
            }
            UiAction::RequestDelete(kind, id) => {
                let name = self
                    .catalogs
                    .get(&kind)
                    .and_then(|c| c.store().get(id))
                    .map(|e| e.name.clone())
                    .unwrap_or_default();
                self.pending_delete = Some(PendingDelete { kind, id, name });
            }
            UiAction::Delete(kind, id) => self.delete_record(&kind, id),
            UiAction::OpenProject(Some(id)) => self.open_project(id),
            UiAction::OpenProject(None) => self.close_project(),
        }
    }

    fn selectable_row_left(
        ui: &mut egui::Ui,
        selected: bool,
        text: &str,
        row_h: f32,
    ) -> egui::Response {
        let w = ui.available_width();
        let (rect, response) = ui.allocate_exact_size(egui::vec2(w, row_h), egui::Sense::click());
        let response = response.on_hover_cursor(egui::CursorIcon::PointingHand);

        let visuals = ui.style().interact_selectable(&response, selected);
        if ui.is_rect_visible(rect) {
            ui.painter()
                .rect_filled(rect, visuals.corner_radius, visuals.bg_fill);
            ui.painter().rect_stroke(
                rect,
                visuals.corner_radius,
                visuals.bg_stroke,
                egui::StrokeKind::Inside,
            );

            let font_id = egui::TextStyle::Button.resolve(ui.style());
            let text_pos = rect.left_center() + egui::vec2(6.0, 0.0);
            ui.painter().text(
                text_pos,
                egui::Align2::LEFT_CENTER,
                text,
                font_id,
                visuals.text_color(),
            );
        }

        response
    }

    fn choice_label(value: &str) -> &str {
        if value.is_empty() {
            statics::EN_CHOICE_NONE
        } else {
            value
        }
    }

    fn render_field(ui: &mut egui::Ui, spec: &FieldSpec, value: &mut String) -> egui::Response {
        match spec.kind {
            FieldKind::Text => ui.add(egui::TextEdit::singleline(value).desired_width(f32::INFINITY)),
            FieldKind::Multiline => ui.add(
                egui::TextEdit::multiline(value)
                    .desired_rows(4)
                    .desired_width(f32::INFINITY),
            ),
            FieldKind::Integer => ui.add(
                egui::TextEdit::singleline(value)
                    .hint_text(statics::EN_HINT_INTEGER)
                    .desired_width(160.0),
            ),
            FieldKind::Decimal => ui.add(
                egui::TextEdit::singleline(value)
                    .hint_text(statics::EN_HINT_DECIMAL)
                    .desired_width(160.0),
            ),
            FieldKind::Choice => {
                ui.horizontal(|ui| {
                    let text_resp = spec
                        .free_values
                        .then(|| ui.add(egui::TextEdit::singleline(value).desired_width(160.0)));
                    let combo = egui::ComboBox::from_id_salt(("field_choice", spec.key.as_str()))
                        .selected_text(Self::choice_label(value.as_str()).to_string())
                        .show_ui(ui, |ui| {
                            ui.selectable_value(value, String::new(), statics::EN_CHOICE_NONE);
                            for option in &spec.options {
                                ui.selectable_value(value, option.clone(), option.as_str());
                            }
                        });
                    text_resp.unwrap_or(combo.response)
                })
                .inner
            }
        }
    }

    fn render_records_panel(
        &mut self,
        ui: &mut egui::Ui,
        kind: &str,
        actions: &mut Vec<UiAction>,
    ) {
        ui.heading(statics::EN_HEADING_RECORDS);
        ui.separator();

        if self.scope_for(kind).is_none() {
            ui.label(statics::EN_SELECT_PROJECT_FIRST);
            return;
        }
        let Some(catalog) = self.catalogs.get_mut(kind) else {
            return;
        };

        ui.horizontal(|ui| {
            ui.label(statics::EN_LABEL_SEARCH);
            ui.add(
                egui::TextEdit::singleline(&mut catalog.filter_mut().query)
                    .hint_text(statics::EN_HINT_SEARCH),
            );
        });

        let filters = catalog.schema().filters.clone();
        for key in &filters {
            let choices = catalog.dimension_choices(key);
            let mut current = catalog.filter().dimension(key).clone();
            let before = current.clone();
            ui.horizontal(|ui| {
                ui.label(catalog.schema().field_label(key));
                let selected_text = match &current {
                    DimensionChoice::All => statics::EN_CHOICE_ALL.to_string(),
                    DimensionChoice::Exactly(v) => v.clone(),
                };
                egui::ComboBox::from_id_salt(("filter", kind, key.as_str()))
                    .selected_text(selected_text)
                    .show_ui(ui, |ui| {
                        ui.selectable_value(&mut current, DimensionChoice::All, statics::EN_CHOICE_ALL);
                        for choice in &choices {
                            ui.selectable_value(
                                &mut current,
                                DimensionChoice::Exactly(choice.clone()),
                                choice.as_str(),
                            );
                        }
                    });
            });
            if current != before {
                catalog.set_dimension(key, current);
            }
        }

        ui.horizontal(|ui| {
            if ui.button(statics::EN_BTN_NEW).clicked() {
                actions.push(UiAction::New(kind.to_string()));
            }
            if ui
                .add_enabled(
                    !catalog.filter().is_unconstrained(),
                    egui::Button::new(statics::EN_BTN_RESET_FILTERS),
                )
                .clicked()
            {
                catalog.reset_filters();
            }
        });
        ui.separator();

        let visible = catalog.visible();
        if visible.is_empty() {
            ui.label(if catalog.store().is_empty() {
                statics::EN_EMPTY_CATALOG
            } else {
                statics::EN_NO_MATCHES
            });
            return;
        }

        let active_id = catalog.editor().active_id();
        let row_h = ui.text_style_height(&egui::TextStyle::Body) + 6.0;
        ui.push_id(("records_table", kind), |ui| {
            TableBuilder::new(ui)
                .striped(true)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .column(Column::initial(48.0).resizable(false))
                .column(Column::initial(200.0).resizable(true))
                .columns(Column::auto().resizable(true), filters.len())
                .header(row_h, |mut header| {
                    header.col(|ui| {
                        ui.strong(statics::EN_COL_ID);
                    });
                    header.col(|ui| {
                        ui.strong(statics::EN_COL_NAME);
                    });
                    for key in &filters {
                        header.col(|ui| {
                            ui.strong(catalog.schema().field_label(key));
                        });
                    }
                })
                .body(|mut body| {
                    for record in &visible {
                        body.row(row_h, |mut row| {
                            let selected = active_id == Some(record.id);
                            row.col(|ui| {
                                ui.monospace(record.id.to_string());
                            });
                            row.col(|ui| {
                                if ui.selectable_label(selected, record.name.as_str()).clicked() {
                                    actions.push(UiAction::Select(kind.to_string(), record.id));
                                }
                            });
                            for key in &filters {
                                row.col(|ui| {
                                    let text = record.field_text(key).unwrap_or_default();
                                    ui.label(text.as_ref());
                                });
                            }
                        });
                    }
                });
        });
    }

    fn render_detail_panel(
        &mut self,
        ui: &mut egui::Ui,
        kind: &str,
        actions: &mut Vec<UiAction>,
    ) {
        if self.scope_for(kind).is_none() {
            ui.label(statics::EN_SELECT_PROJECT_FIRST);
            return;
        }
        let focus = self.focus_field.take();
        let Some(catalog) = self.catalogs.get_mut(kind) else {
            return;
        };

        let state = catalog.state();
        if state == SelectionState::NoSelection {
            ui.label(statics::EN_SELECT_RECORD);
            return;
        }

        ui.horizontal(|ui| {
            ui.heading(catalog.schema().display_label());
            ui.separator();
            match catalog.editor().active_id() {
                Some(id) => {
                    ui.label(format!("{} {id}", statics::EN_COL_ID));
                }
                None => {
                    ui.colored_label(egui::Color32::YELLOW, statics::EN_BADGE_NEW);
                }
            }
        });
        ui.separator();

        let fields = catalog.schema().fields.clone();
        egui::ScrollArea::vertical()
            .auto_shrink([false, true])
            .max_height((ui.available_height() - 48.0).max(120.0))
            .show(ui, |ui| {
                egui::Grid::new(("detail_form", kind))
                    .num_columns(2)
                    .striped(false)
                    .spacing([12.0, 8.0])
                    .show(ui, |ui| {
                        for spec in &fields {
                            let label = if spec.required {
                                format!("{} {}", spec.display_label(), statics::EN_REQUIRED_MARK)
                            } else {
                                spec.display_label().to_string()
                            };
                            ui.label(label);
                            let value = catalog.editor_mut().form_mut().get_mut(&spec.key);
                            let resp = Self::render_field(ui, spec, value);
                            if focus.as_deref() == Some(spec.key.as_str()) {
                                resp.request_focus();
                            }
                            ui.end_row();
                        }
                    });
            });

        ui.separator();
        ui.horizontal(|ui| {
            if ui.button(statics::EN_BTN_SAVE).clicked() {
                actions.push(UiAction::Save(kind.to_string()));
            }
            if ui.button(statics::EN_BTN_CANCEL).clicked() {
                actions.push(UiAction::Cancel(kind.to_string()));
            }
            if let Some(id) = catalog.editor().active_id()
                && ui.button(statics::EN_BTN_DELETE).clicked()
            {
                actions.push(UiAction::RequestDelete(kind.to_string(), id));
            }
        });
    }
}

impl eframe::App for LorebookApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut actions: Vec<UiAction> = Vec::new();

        let save_shortcut = ctx.input_mut(|i| i.consume_key(egui::Modifiers::COMMAND, egui::Key::S));
        if save_shortcut
            && let Some(kind) = self.selected_kind.clone()
            && self
                .catalogs
                .get(&kind)
                .is_some_and(|c| c.state() != SelectionState::NoSelection)
        {
            actions.push(UiAction::Save(kind));
        }

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                if ui.button(statics::EN_BTN_ABOUT).clicked() {
                    self.about_open = true;
                }

                if ui.button(statics::EN_BTN_TOGGLE_THEME).clicked() {
                    self.theme_dark = !self.theme_dark;
                    if self.theme_dark {
                        ctx.set_visuals(egui::Visuals::dark());
                    } else {
                        ctx.set_visuals(egui::Visuals::light());
                    }
                }

                ui.separator();
                ui.label(statics::EN_LABEL_PROJECT);
                let projects: Vec<(RecordId, String)> = self
                    .catalogs
                    .get(statics::KIND_PROJECT)
                    .map(|c| c.store().all().iter().map(|p| (p.id, p.name.clone())).collect())
                    .unwrap_or_default();
                let current_name = self
                    .project
                    .and_then(|id| self.project_name(id))
                    .unwrap_or(statics::EN_NO_PROJECT)
                    .to_string();
                let mut chosen = self.project;
                egui::ComboBox::from_id_salt("project_picker")
                    .selected_text(current_name)
                    .show_ui(ui, |ui| {
                        ui.selectable_value(&mut chosen, None, statics::EN_NO_PROJECT);
                        for (id, name) in &projects {
                            ui.selectable_value(&mut chosen, Some(*id), name.as_str());
                        }
                    });
                if chosen != self.project {
                    actions.push(UiAction::OpenProject(chosen));
                }

                if !self.status.is_empty() {
                    ui.separator();
                    ui.label(&self.status);
                }
            });
        });

        if self.about_open {
            let mut open = self.about_open;
            egui::Window::new(statics::EN_WINDOW_ABOUT)
                .collapsible(false)
                .open(&mut open)
                .show(ctx, |ui| {
                    ui.heading(statics::EN_ABOUT_HEADING);
                    ui.label(format!(
                        "{} {}",
                        statics::EN_ABOUT_VERSION,
                        env!("CARGO_PKG_VERSION")
                    ));
                    ui.label(statics::EN_ABOUT_BLURB);
                    ui.separator();
                    ui.label(statics::EN_ABOUT_SCHEMAS);
                    for schema in self.schemas.iter() {
                        ui.label(format!("- {} ({})", schema.display_label(), schema.kind));
                    }
                });
            self.about_open = open;
        }

        if let Some(err) = self.last_error.clone() {
            egui::TopBottomPanel::top("error_bar").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(egui::Color32::RED, err);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button(statics::EN_BTN_CLEAR).clicked() {
                            self.last_error = None;
                        }
                    });
                });
            });
        }

        if let Some(err) = self.validation.clone() {
            let modal = egui::Modal::new(egui::Id::new("validation_modal")).show(ctx, |ui| {
                ui.heading(statics::EN_WINDOW_VALIDATION);
                ui.label(&err.message);
                ui.separator();
                ui.button(statics::EN_BTN_OK).clicked()
            });
            if modal.inner || modal.should_close() {
                self.validation = None;
                self.focus_field = Some(err.field);
            }
        }

        if let Some(pending) = self.pending_delete.clone() {
            let modal = egui::Modal::new(egui::Id::new("delete_modal")).show(ctx, |ui| {
                ui.heading(statics::EN_WINDOW_CONFIRM_DELETE);
                ui.label(format!(
                    "{} {} (ID {})?",
                    statics::EN_CONFIRM_DELETE_PREFIX,
                    pending.name,
                    pending.id
                ));
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button(statics::EN_BTN_DELETE).clicked() {
                        Some(true)
                    } else if ui.button(statics::EN_BTN_CANCEL).clicked() {
                        Some(false)
                    } else {
                        None
                    }
                })
                .inner
            });
            match modal.inner {
                Some(true) => {
                    actions.push(UiAction::Delete(pending.kind, pending.id));
                    self.pending_delete = None;
                }
                Some(false) => self.pending_delete = None,
                None if modal.should_close() => self.pending_delete = None,
                None => {}
            }
        }

        // The bottom status bar must be shown before side/central panels so it reserves
        // space across the full window width.
        egui::TopBottomPanel::bottom("bottom_status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let project = self
                    .project
                    .and_then(|id| self.project_name(id))
                    .unwrap_or(statics::EN_NO_PROJECT);
                ui.label(project);
                ui.separator();
                ui.label(format!("catalogs: {}", self.catalogs.len()));
                if let Some(catalog) = self
                    .selected_kind
                    .as_ref()
                    .and_then(|k| self.catalogs.get(k))
                {
                    ui.separator();
                    ui.label(format!(
                        "records: {} shown / {}",
                        catalog.visible().len(),
                        catalog.store().len()
                    ));
                }
            });
        });

        egui::SidePanel::left("kinds_panel")
            .resizable(true)
            .default_width(200.0)
            .show(ctx, |ui| {
                ui.heading(statics::EN_HEADING_KINDS);
                ui.separator();
                let row_h = ui.text_style_height(&egui::TextStyle::Body) + 4.0;
                ui.push_id("kinds_scroll", |ui| {
                    egui::ScrollArea::vertical()
                        .auto_shrink([false, false])
                        .show(ui, |ui| {
                            for (kind, catalog) in &self.catalogs {
                                let selected = self.selected_kind.as_deref() == Some(kind.as_str());
                                let text = format!(
                                    "{} ({})",
                                    catalog.schema().display_label(),
                                    catalog.store().len()
                                );
                                let resp = Self::selectable_row_left(ui, selected, &text, row_h);
                                if resp.clicked() {
                                    actions.push(UiAction::SelectKind(kind.clone()));
                                }
                            }
                        });
                });
            });

        let Some(kind) = self.selected_kind.clone() else {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.label(statics::EN_SELECT_KIND);
            });
            for action in actions {
                self.handle(action);
            }
            return;
        };

        egui::SidePanel::left("records_panel")
            .resizable(true)
            .default_width(420.0)
            .show(ctx, |ui| {
                self.render_records_panel(ui, &kind, &mut actions);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(statics::EN_HEADING_DETAIL);
            ui.separator();
            self.render_detail_panel(ui, &kind, &mut actions);
        });

        for action in actions {
            self.handle(action);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LorebookApp, UiAction};
    use crate::record::{Entry, Record};
    use crate::repository::{MemoryRepository, Repository};
    use crate::schema::SchemaSet;
    use crate::selection::SelectionState;
    use crate::statics;
    use indexmap::IndexMap;

    fn app() -> LorebookApp {
        LorebookApp::new(SchemaSet::builtin().unwrap())
    }

    fn create_project(app: &mut LorebookApp, name: &str) {
        app.handle(UiAction::New(statics::KIND_PROJECT.to_string()));
        let catalog = app.catalogs.get_mut(statics::KIND_PROJECT).unwrap();
        catalog.set_field("name", name);
        app.handle(UiAction::Save(statics::KIND_PROJECT.to_string()));
    }

    #[test]
    fn scoped_catalogs_need_an_open_project() {
        let mut app = app();
        app.handle(UiAction::New("faction".to_string()));
        assert_eq!(
            app.last_error.as_deref(),
            Some(statics::EN_SELECT_PROJECT_FIRST)
        );
        assert_eq!(app.catalogs["faction"].state(), SelectionState::NoSelection);
    }

    #[test]
    fn first_project_opens_itself_and_is_persisted() {
        let mut app = app();
        create_project(&mut app, "Sword of the Abyss");
        assert_eq!(app.project, Some(1));
        assert_eq!(app.repositories[statics::KIND_PROJECT].len(), 1);
        assert!(app.status.contains("Sword of the Abyss"));
    }

    #[test]
    fn validation_error_is_held_for_the_modal() {
        let mut app = app();
        create_project(&mut app, "P");
        app.handle(UiAction::New("faction".to_string()));
        app.catalogs
            .get_mut("faction")
            .unwrap()
            .set_field("name", "Azure Cloud Sect");
        app.handle(UiAction::Save("faction".to_string()));

        let err = app.validation.as_ref().expect("type is required");
        assert_eq!(err.field, "type");
        assert!(app.catalogs["faction"].store().is_empty());
        assert!(app.repositories["faction"].is_empty());
    }

    #[test]
    fn switching_projects_reseeds_catalogs() {
        let mut app = app();
        create_project(&mut app, "First");
        app.handle(UiAction::New("treasure".to_string()));
        {
            let catalog = app.catalogs.get_mut("treasure").unwrap();
            catalog.set_field("name", "Nine Dragon Cauldron");
            catalog.set_field("category", "Artifact");
        }
        app.handle(UiAction::Save("treasure".to_string()));
        assert_eq!(app.catalogs["treasure"].store().len(), 1);

        create_project(&mut app, "Second");
        app.handle(UiAction::OpenProject(Some(2)));
        assert!(app.catalogs["treasure"].store().is_empty());

        app.handle(UiAction::OpenProject(Some(1)));
        let names: Vec<_> = app.catalogs["treasure"]
            .store()
            .all()
            .iter()
            .map(|e| e.name().to_string())
            .collect();
        assert_eq!(names, vec!["Nine Dragon Cauldron"]);

        app.handle(UiAction::OpenProject(None));
        assert!(app.catalogs["treasure"].store().is_empty());
        assert_eq!(app.project, None);
    }

    #[test]
    fn deleting_a_project_purges_its_records() {
        let mut app = app();
        create_project(&mut app, "Doomed");
        app.handle(UiAction::New("map".to_string()));
        {
            let catalog = app.catalogs.get_mut("map").unwrap();
            catalog.set_field("name", "Eastern Continent");
            catalog.set_field("type", "Continent");
        }
        app.handle(UiAction::Save("map".to_string()));
        assert_eq!(app.repositories["map"].len(), 1);

        app.handle(UiAction::RequestDelete(statics::KIND_PROJECT.to_string(), 1));
        assert_eq!(app.pending_delete.as_ref().map(|p| p.name.as_str()), Some("Doomed"));
        app.handle(UiAction::Delete(statics::KIND_PROJECT.to_string(), 1));

        assert_eq!(app.project, None);
        assert!(app.repositories["map"].is_empty());
        assert!(app.catalogs["map"].store().is_empty());
    }

    #[test]
    fn catalogs_are_seeded_from_injected_repositories() {
        let schemas = SchemaSet::builtin().unwrap();
        let mut repositories: IndexMap<String, MemoryRepository<Entry>> = schemas
            .iter()
            .map(|s| (s.kind.clone(), MemoryRepository::new()))
            .collect();
        repositories[statics::KIND_PROJECT]
            .create(&Entry::new(statics::KIND_PROJECT, 0, "Seeded").with_id(4))
            .unwrap();
        repositories["character"]
            .create(&Entry::new("character", 4, "Lin Feng").with_id(1))
            .unwrap();

        let mut app = LorebookApp::with_repositories(schemas, repositories);
        assert_eq!(app.catalogs[statics::KIND_PROJECT].store().len(), 1);
        assert!(app.catalogs["character"].store().is_empty());

        app.handle(UiAction::OpenProject(Some(4)));
        assert_eq!(
            app.catalogs["character"].store().get(1).map(Record::name),
            Some("Lin Feng")
        );
    }
}
