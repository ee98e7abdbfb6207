use crate::handlers::tasks::{Task, TaskEvent};
use crate::models::folder::{parent_path, FolderTree, SidebarItem};
use crate::models::snippet::{parse_tags, sort_by_title};
use crate::models::Snippet;
use crate::search::{SearchEngine, SearchMode};
use crate::ui::input::TextField;
use crate::ui::layout::{self, Geometry};
use crate::ui::theme::Theme;
use crate::ui::{browser, form, start_page};
use ratatui::Frame;

/// Screen the application is currently showing.
///
/// `Welcome` is only ever the initial screen. Every modal screen returns to
/// `Home` on cancel or on a successful store operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Welcome,
    Home,
    Create,
    Edit,
    ConfirmDelete,
}

/// Form fields in focus order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Field {
    #[default]
    Title,
    Category,
    Tags,
    Language,
    Content,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Title,
        Field::Category,
        Field::Tags,
        Field::Language,
        Field::Content,
    ];

    fn index(self) -> usize {
        self as usize
    }

    fn from_index(index: usize) -> Self {
        Self::ALL[index.min(Self::ALL.len() - 1)]
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Title => "Title*",
            Field::Category => "Category*",
            Field::Tags => "Tags",
            Field::Language => "Language",
            Field::Content => "Content*",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Category => "category e.g. backend/express",
            Field::Tags => "tags comma-separated",
            Field::Language => "language e.g. js, ts, go",
            Field::Content => "content...",
        }
    }

    /// Error shown when a required field is left blank
    pub fn required_message(self) -> Option<&'static str> {
        match self {
            Field::Title => Some("Title is required"),
            Field::Category => Some("Category is required"),
            Field::Content => Some("Content is required"),
            Field::Tags | Field::Language => None,
        }
    }
}

/// Create/Edit form state
#[derive(Debug, Clone)]
pub struct SnippetForm {
    fields: [TextField; 5],
    errors: [Option<&'static str>; 5],
    pub focus: Field,
}

impl Default for SnippetForm {
    fn default() -> Self {
        Self {
            fields: [
                TextField::new(),
                TextField::new(),
                TextField::new(),
                TextField::new(),
                TextField::multiline(),
            ],
            errors: [None; 5],
            focus: Field::Title,
        }
    }
}

impl SnippetForm {
    pub fn from_snippet(snippet: &Snippet) -> Self {
        let mut form = Self::default();
        form.field_mut(Field::Title).set_value(snippet.title.clone());
        form.field_mut(Field::Category).set_value(snippet.category.clone());
        form.field_mut(Field::Tags).set_value(snippet.tags_display());
        form.field_mut(Field::Language).set_value(snippet.language.clone());
        form.field_mut(Field::Content).set_value(snippet.content.clone());
        form
    }

    pub fn field(&self, field: Field) -> &TextField {
        &self.fields[field.index()]
    }

    pub fn field_mut(&mut self, field: Field) -> &mut TextField {
        &mut self.fields[field.index()]
    }

    pub fn focused_mut(&mut self) -> &mut TextField {
        self.field_mut(self.focus)
    }

    pub fn error(&self, field: Field) -> Option<&'static str> {
        self.errors[field.index()]
    }

    fn missing(&self, field: Field) -> Option<&'static str> {
        field
            .required_message()
            .filter(|_| self.field(field).is_blank())
    }

    /// Moves focus forward, refusing to leave a blank required field.
    /// Returns false when blocked.
    pub fn focus_next(&mut self) -> bool {
        if let Some(message) = self.missing(self.focus) {
            self.errors[self.focus.index()] = Some(message);
            return false;
        }
        self.errors[self.focus.index()] = None;
        self.focus = Field::from_index(self.focus.index() + 1);
        true
    }

    pub fn focus_prev(&mut self) {
        self.focus = Field::from_index(self.focus.index().saturating_sub(1));
    }

    /// Checks every required field and focuses the first invalid one
    pub fn validate(&mut self) -> bool {
        self.errors = [None; 5];
        let mut first_invalid = None;
        for field in Field::ALL {
            if let Some(message) = self.missing(field) {
                self.errors[field.index()] = Some(message);
                first_invalid.get_or_insert(field);
            }
        }
        match first_invalid {
            Some(field) => {
                self.focus = field;
                false
            }
            None => true,
        }
    }

    /// Copies the form values onto a snippet record
    pub fn apply_to(&self, snippet: &mut Snippet) {
        snippet.title = self.field(Field::Title).value().trim().to_string();
        snippet.category = self.field(Field::Category).value().trim().to_string();
        snippet.language = self.field(Field::Language).value().trim().to_string();
        snippet.tags = parse_tags(self.field(Field::Tags).value());
        snippet.content = self.field(Field::Content).value().to_string();
    }
}

#[derive(Debug)]
pub struct App {
    pub screen: Screen,
    pub snippets: Vec<Snippet>,
    pub tree: FolderTree,
    pub current_path: String,

    pub search: TextField,
    pub search_active: bool,
    pub search_mode: SearchMode,
    pub visible_items: Vec<SidebarItem>,
    pub selected: usize,

    pub error_message: Option<String>,
    pub success_message: Option<String>,

    pub form: SnippetForm,
    /// Snippet being edited or deleted
    pub target: Option<Snippet>,

    pub theme: Theme,
    pub width: u16,
    pub height: u16,
    pub geometry: Geometry,
    pub preview_scroll: u16,

    /// A store task is in flight; further ones are refused until it reports
    pub store_busy: bool,
    /// Bumped whenever a modal opens or closes
    modal_generation: u64,
    /// Modal generation that queued the pending store task
    pending_generation: Option<u64>,
    engine: SearchEngine,
    outbox: Vec<Task>,
}

impl App {
    pub fn new(mut snippets: Vec<Snippet>) -> Self {
        sort_by_title(&mut snippets);
        let tree = FolderTree::build(&snippets);

        let mut app = Self {
            screen: Screen::Welcome,
            snippets,
            tree,
            current_path: String::new(),
            search: TextField::new(),
            search_active: false,
            search_mode: SearchMode::Substring,
            visible_items: Vec::new(),
            selected: 0,
            error_message: None,
            success_message: None,
            form: SnippetForm::default(),
            target: None,
            theme: Theme::default(),
            width: 0,
            height: 0,
            geometry: layout::compute(0, 0),
            preview_scroll: 0,
            store_busy: false,
            modal_generation: 0,
            pending_generation: None,
            engine: SearchEngine::default(),
            outbox: Vec::new(),
        };
        app.apply_filter();
        app
    }

    /// Applies user preferences on top of a fresh state
    pub fn with_preferences(mut self, mode: SearchMode, accent: usize) -> Self {
        self.search_mode = mode;
        self.theme.set_accent(accent);
        self.apply_filter();
        self
    }

    pub fn set_error_message(&mut self, message: String) {
        self.error_message = Some(message);
        self.success_message = None;
    }

    pub fn set_success_message(&mut self, message: String) {
        self.success_message = Some(message);
        self.error_message = None;
    }

    pub fn clear_messages(&mut self) {
        self.error_message = None;
        self.success_message = None;
    }

    pub fn status_message(&self) -> Option<&str> {
        self.error_message
            .as_deref()
            .or(self.success_message.as_deref())
    }

    pub fn query(&self) -> &str {
        self.search.value().trim()
    }

    /// Recomputes the sidebar: folder contents when the query is empty,
    /// otherwise a flat list of matches.
    pub fn apply_filter(&mut self) {
        let query = self.search.value().trim().to_string();
        self.visible_items = if query.is_empty() {
            self.tree.children_of(&self.current_path, &self.snippets)
        } else {
            self.engine.apply(&self.snippets, &query, self.search_mode)
        };

        if self.selected >= self.visible_items.len() {
            self.selected = 0;
            self.preview_scroll = 0;
        }
    }

    pub fn selected_item(&self) -> Option<&SidebarItem> {
        self.visible_items.get(self.selected)
    }

    pub fn selected_snippet(&self) -> Option<&Snippet> {
        self.selected_item()
            .and_then(SidebarItem::snippet_index)
            .and_then(|i| self.snippets.get(i))
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.visible_items.len() {
            self.selected += 1;
            self.preview_scroll = 0;
        }
    }

    pub fn select_previous(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.preview_scroll = 0;
        }
    }

    pub fn scroll_preview_down(&mut self) {
        let max = self
            .selected_snippet()
            .map_or(0, |s| s.line_count().saturating_sub(1));
        let step = self.geometry.pane_height.max(1) as usize;
        let next = (self.preview_scroll as usize + step).min(max);
        self.preview_scroll = u16::try_from(next).unwrap_or(u16::MAX);
    }

    pub fn scroll_preview_up(&mut self) {
        self.preview_scroll = self
            .preview_scroll
            .saturating_sub(self.geometry.pane_height.max(1));
    }

    /// Descends into the selected folder. Snippet rows are left alone.
    pub fn enter_folder(&mut self) {
        if !self.query().is_empty() {
            return;
        }
        if let Some(SidebarItem::Folder { path, .. }) = self.selected_item() {
            self.current_path = path.clone();
            self.selected = 0;
            self.preview_scroll = 0;
            self.apply_filter();
            tracing::debug!(path = %self.current_path, "entered folder");
        }
    }

    /// Ascends to the parent folder; no-op at the root or while filtering
    pub fn go_back(&mut self) {
        if !self.query().is_empty() || self.current_path.is_empty() {
            return;
        }
        self.current_path = parent_path(&self.current_path);
        self.selected = 0;
        self.preview_scroll = 0;
        self.apply_filter();
    }

    pub fn breadcrumb(&self) -> &str {
        if self.current_path.is_empty() {
            "/"
        } else {
            &self.current_path
        }
    }

    pub fn start_search(&mut self) {
        self.search_active = true;
    }

    /// Clears the query and returns to folder browsing at the current path
    pub fn cancel_search(&mut self) {
        self.search.clear();
        self.search_active = false;
        self.apply_filter();
    }

    pub fn toggle_search_mode(&mut self) {
        self.search_mode = self.search_mode.toggled();
        self.apply_filter();
        let message = if self.search_mode.is_fuzzy() {
            "Fuzzy search ON"
        } else {
            "Fuzzy search OFF"
        };
        self.set_success_message(message.to_string());
    }

    pub fn cycle_accent(&mut self) {
        let next = self.theme.next_accent();
        self.theme.set_accent(next);
        self.set_success_message("Border color changed".to_string());
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.geometry = layout::compute(width, height);
    }

    /// Queues work for the main loop. Only one store task may be pending.
    fn dispatch(&mut self, task: Task) {
        if task.touches_store() {
            if self.store_busy {
                self.set_error_message("busy: previous operation still running".to_string());
                return;
            }
            self.store_busy = true;
            self.pending_generation = Some(self.modal_generation);
        }
        self.outbox.push(task);
    }

    /// Hands queued tasks to the caller
    pub fn take_tasks(&mut self) -> Vec<Task> {
        std::mem::take(&mut self.outbox)
    }

    pub fn copy_selected(&mut self) {
        if let Some(content) = self.selected_snippet().map(|s| s.content.clone()) {
            self.dispatch(Task::Copy(content));
        }
    }

    pub fn edit_selected_externally(&mut self) {
        let Some(snippet) = self.selected_snippet() else {
            return;
        };
        match snippet.path.clone() {
            Some(path) => self.dispatch(Task::Edit(path)),
            None => self.set_error_message("error: snippet has no backing file".to_string()),
        }
    }

    pub fn open_create(&mut self) {
        self.form = SnippetForm::default();
        self.target = None;
        self.clear_messages();
        self.modal_generation += 1;
        self.screen = Screen::Create;
    }

    pub fn open_edit(&mut self) {
        if let Some(snippet) = self.selected_snippet().cloned() {
            self.form = SnippetForm::from_snippet(&snippet);
            self.target = Some(snippet);
            self.clear_messages();
            self.modal_generation += 1;
            self.screen = Screen::Edit;
        }
    }

    pub fn open_delete(&mut self) {
        if let Some(snippet) = self.selected_snippet().cloned() {
            self.target = Some(snippet);
            self.clear_messages();
            self.modal_generation += 1;
            self.screen = Screen::ConfirmDelete;
        }
    }

    /// Leaves any modal screen without touching the store
    pub fn close_modal(&mut self) {
        self.screen = Screen::Home;
        self.target = None;
        self.modal_generation += 1;
    }

    pub fn focus_next_field(&mut self) {
        if !self.form.focus_next() {
            self.set_error_message("Please fill required field".to_string());
        }
    }

    pub fn focus_previous_field(&mut self) {
        self.form.focus_prev();
    }

    /// Validates the form and queues a create or update
    pub fn submit_form(&mut self) {
        if !self.form.validate() {
            self.set_error_message("Please fix validation errors".to_string());
            return;
        }

        match (self.screen, &self.target) {
            (Screen::Edit, Some(target)) => {
                let mut snippet = target.clone();
                self.form.apply_to(&mut snippet);
                self.dispatch(Task::Update(snippet));
            }
            (Screen::Create, _) => {
                let mut snippet = Snippet::new(String::new(), String::new(), String::new());
                self.form.apply_to(&mut snippet);
                self.dispatch(Task::Create(snippet));
            }
            _ => {}
        }
    }

    pub fn confirm_delete(&mut self) {
        if let Some(target) = self.target.clone() {
            self.dispatch(Task::Delete(target));
        }
    }

    /// Replaces the collection, keeping the navigation path where possible
    pub fn reload(&mut self, mut snippets: Vec<Snippet>) {
        sort_by_title(&mut snippets);
        self.snippets = snippets;
        self.tree = FolderTree::build(&self.snippets);

        while !self.current_path.is_empty() && self.tree.node(&self.current_path).is_none() {
            self.current_path = parent_path(&self.current_path);
        }

        self.apply_filter();
    }

    pub fn handle_task_event(&mut self, event: TaskEvent) {
        match event {
            TaskEvent::Reloaded { snippets, message } => {
                self.store_busy = false;
                tracing::debug!(count = snippets.len(), "collection reloaded");
                self.reload(snippets);

                // A modal opened after the task was queued belongs to the user
                let origin = self.pending_generation.take();
                if origin.is_none_or(|generation| generation == self.modal_generation) {
                    self.screen = Screen::Home;
                    self.target = None;
                }
                self.set_success_message(message);
            }
            TaskEvent::Failed(message) => {
                self.store_busy = false;
                self.pending_generation = None;
                self.set_error_message(message);
            }
            TaskEvent::Copied => self.set_success_message("copied to clipboard".to_string()),
            TaskEvent::CopyFailed(message) => self.set_error_message(message),
        }
    }

    /// Header summary: visible snippet count, mode, filter and status
    pub fn header_status(&self) -> String {
        let count = self
            .visible_items
            .iter()
            .filter(|item| matches!(item, SidebarItem::Snippet { .. }))
            .count();

        let mut parts = vec![format!("{} snippets", count)];
        if self.search_mode.is_fuzzy() {
            parts.push("[fuzzy]".to_string());
        }
        if !self.query().is_empty() {
            parts.push(format!("filter: {}", self.query()));
        }
        if let Some(status) = self.status_message() {
            parts.push(status.to_string());
        }
        parts.join("  ·  ")
    }

    pub fn render(&self, frame: &mut Frame) {
        match self.screen {
            Screen::Welcome => start_page::render(frame, self),
            Screen::Home => browser::render(frame, self),
            Screen::Create | Screen::Edit => {
                browser::render(frame, self);
                form::render_form(frame, self);
            }
            Screen::ConfirmDelete => {
                browser::render(frame, self);
                form::render_confirm_delete(frame, self);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn snippet(title: &str, category: &str) -> Snippet {
        let mut s = Snippet::new(title.into(), category.into(), format!("// {}", title));
        s.id = title.to_lowercase().replace(' ', "-");
        s.path = Some(PathBuf::from(format!("/data/{}/{}.json", category, s.id)));
        s
    }

    fn app() -> App {
        let mut app = App::new(vec![
            snippet("Router", "backend/express"),
            snippet("useFetch", "frontend/react"),
            snippet("Centering", "frontend"),
        ]);
        app.screen = Screen::Home;
        app
    }

    fn select_folder(app: &mut App, path: &str) {
        app.selected = app
            .visible_items
            .iter()
            .position(|item| matches!(item, SidebarItem::Folder { path: p, .. } if p == path))
            .unwrap();
    }

    #[test]
    fn starts_on_welcome_with_sorted_collection() {
        let app = App::new(vec![snippet("b", "x"), snippet("A", "x")]);
        assert_eq!(app.screen, Screen::Welcome);
        assert_eq!(app.snippets[0].title, "A");
        assert_eq!(app.visible_items.len(), 1);
    }

    #[test]
    fn folder_navigation_round_trip() {
        let mut app = app();
        select_folder(&mut app, "frontend");
        app.enter_folder();
        assert_eq!(app.current_path, "frontend");
        assert_eq!(app.selected, 0);
        assert_eq!(app.visible_items.len(), 2);

        app.go_back();
        assert_eq!(app.current_path, "");
        app.go_back();
        assert_eq!(app.current_path, "");
        assert_eq!(app.breadcrumb(), "/");
    }

    #[test]
    fn entering_a_snippet_row_is_a_noop() {
        let mut app = app();
        select_folder(&mut app, "frontend");
        app.enter_folder();
        app.selected = 1;
        app.enter_folder();
        assert_eq!(app.current_path, "frontend");
    }

    #[test]
    fn validation_focuses_first_invalid_field() {
        let mut app = app();
        app.open_create();
        app.form.field_mut(Field::Title).set_value("Title");
        app.form.focus = Field::Language;

        app.submit_form();
        assert_eq!(app.form.focus, Field::Category);
        assert_eq!(app.form.error(Field::Category), Some("Category is required"));
        assert_eq!(app.form.error(Field::Content), Some("Content is required"));
        assert_eq!(app.form.error(Field::Title), None);
        assert_eq!(app.error_message.as_deref(), Some("Please fix validation errors"));
        assert!(app.take_tasks().is_empty());
    }

    #[test]
    fn create_builds_trimmed_record() {
        let mut app = app();
        app.open_create();
        app.form.field_mut(Field::Title).set_value("  Debounce ");
        app.form.field_mut(Field::Category).set_value(" frontend/utils ");
        app.form.field_mut(Field::Tags).set_value("js, timing,,");
        app.form.field_mut(Field::Language).set_value(" js ");
        app.form.field_mut(Field::Content).set_value("  let t;\n");

        app.submit_form();
        let tasks = app.take_tasks();
        let [Task::Create(created)] = tasks.as_slice() else {
            panic!("expected a create task, got {tasks:?}");
        };
        assert_eq!(created.title, "Debounce");
        assert_eq!(created.category, "frontend/utils");
        assert_eq!(created.language, "js");
        assert_eq!(created.tags, vec!["js", "timing"]);
        assert_eq!(created.content, "  let t;\n");
        assert!(app.store_busy);
        assert_eq!(app.screen, Screen::Create);
    }

    #[test]
    fn edit_keeps_identity_and_prefills_tags() {
        let mut app = app();
        let router = app.snippets.iter().position(|s| s.title == "Router").unwrap();
        app.snippets[router].tags = vec!["api".into(), "node".into()];
        app.current_path = "backend/express".into();
        app.apply_filter();

        app.open_edit();
        assert_eq!(app.screen, Screen::Edit);
        assert_eq!(app.form.field(Field::Tags).value(), "api, node");

        app.form.field_mut(Field::Title).set_value("Express Router");
        app.submit_form();
        let tasks = app.take_tasks();
        let [Task::Update(updated)] = tasks.as_slice() else {
            panic!("expected an update task, got {tasks:?}");
        };
        assert_eq!(updated.id, "router");
        assert_eq!(updated.path, app.snippets[router].path);
        assert_eq!(updated.created_at, app.snippets[router].created_at);
        assert_eq!(updated.title, "Express Router");
    }

    #[test]
    fn store_failure_keeps_screen() {
        let mut app = app();
        app.open_create();
        app.store_busy = true;
        app.handle_task_event(TaskEvent::Failed("error: snippet exists: x".into()));
        assert_eq!(app.screen, Screen::Create);
        assert!(!app.store_busy);
        assert_eq!(app.error_message.as_deref(), Some("error: snippet exists: x"));
    }

    #[test]
    fn reload_returns_home_and_keeps_valid_path() {
        let mut app = app();
        select_folder(&mut app, "frontend");
        app.enter_folder();
        app.selected = 1;
        app.open_delete();
        assert_eq!(app.screen, Screen::ConfirmDelete);

        app.handle_task_event(TaskEvent::Reloaded {
            snippets: vec![snippet("Router", "backend/express")],
            message: "snippet deleted".into(),
        });
        assert_eq!(app.screen, Screen::Home);
        assert!(app.target.is_none());
        assert_eq!(app.current_path, "");
        assert_eq!(app.success_message.as_deref(), Some("snippet deleted"));
    }

    #[test]
    fn only_one_store_task_at_a_time() {
        let mut app = app();
        app.current_path = "frontend".into();
        app.apply_filter();
        app.selected = 1;

        app.open_delete();
        app.confirm_delete();
        app.confirm_delete();
        assert_eq!(app.take_tasks().len(), 1);
        assert!(app.error_message.as_deref().unwrap().starts_with("busy"));

        app.copy_selected();
        assert!(matches!(app.take_tasks().as_slice(), [Task::Copy(_)]));
    }

    #[test]
    fn clipboard_failure_keeps_store_gate_closed() {
        let mut app = app();
        app.current_path = "frontend".into();
        app.apply_filter();
        app.selected = 1;

        app.open_delete();
        app.confirm_delete();
        app.copy_selected();
        assert_eq!(app.take_tasks().len(), 2);

        app.handle_task_event(TaskEvent::CopyFailed("error: no display".into()));
        assert!(app.store_busy);
        assert_eq!(app.error_message.as_deref(), Some("error: no display"));

        app.confirm_delete();
        assert!(app.take_tasks().is_empty());
    }

    #[test]
    fn late_reload_keeps_a_newer_form() {
        let mut app = app();
        app.open_create();
        app.form.field_mut(Field::Title).set_value("First");
        app.form.field_mut(Field::Category).set_value("misc");
        app.form.field_mut(Field::Content).set_value("body");
        app.submit_form();
        assert_eq!(app.take_tasks().len(), 1);

        app.close_modal();
        app.open_create();
        app.form.field_mut(Field::Title).set_value("half typed");

        app.handle_task_event(TaskEvent::Reloaded {
            snippets: vec![snippet("First", "misc")],
            message: "snippet created".into(),
        });
        assert_eq!(app.screen, Screen::Create);
        assert_eq!(app.form.field(Field::Title).value(), "half typed");
        assert_eq!(app.snippets.len(), 1);
        assert!(!app.store_busy);
    }

    #[test]
    fn reload_closes_the_modal_that_queued_it() {
        let mut app = app();
        app.current_path = "frontend".into();
        app.apply_filter();
        app.selected = 1;
        app.open_delete();
        app.confirm_delete();
        app.take_tasks();

        app.handle_task_event(TaskEvent::Reloaded {
            snippets: vec![snippet("Router", "backend/express")],
            message: "snippet deleted".into(),
        });
        assert_eq!(app.screen, Screen::Home);
        assert!(app.target.is_none());
    }

    #[test]
    fn header_status_lists_parts() {
        let mut app = app();
        app.search.set_value("rout");
        app.search_mode = SearchMode::Fuzzy;
        app.apply_filter();
        app.set_success_message("reloaded".into());
        assert_eq!(app.header_status(), "1 snippets  ·  [fuzzy]  ·  filter: rout  ·  reloaded");
    }

    #[test]
    fn resize_recomputes_geometry() {
        let mut app = app();
        app.resize(120, 40);
        assert_eq!(app.geometry, layout::compute(120, 40));
        assert_eq!(app.geometry.sidebar_width, 35);
    }
}
