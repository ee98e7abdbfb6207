//! Keyboard dispatch
//!
//! Routes each key event to the handler for the current screen. Handlers
//! return `true` when the program should exit.

use crate::app::{App, Field, Screen};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub fn handle_key_events(key: KeyEvent, app: &mut App) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }

    // Interrupt: raw mode swallows SIGINT, so Ctrl+C arrives as a key
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    match app.screen {
        Screen::Welcome => handle_welcome_keys(key, app),
        Screen::Home if app.search_active => handle_search_keys(key, app),
        Screen::Home => return handle_home_keys(key, app),
        Screen::Create | Screen::Edit => handle_form_keys(key, app),
        Screen::ConfirmDelete => handle_confirm_keys(key, app),
    }
    false
}

fn handle_welcome_keys(key: KeyEvent, app: &mut App) {
    app.screen = Screen::Home;
    if key.code == KeyCode::Char('/') {
        app.start_search();
    }
}

/// Live filtering: every key except Esc edits the query
fn handle_search_keys(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Esc => app.cancel_search(),
        KeyCode::Up => app.select_previous(),
        KeyCode::Down => app.select_next(),
        _ => {
            if app.search.handle_key(key) {
                app.apply_filter();
            }
        }
    }
}

fn handle_home_keys(key: KeyEvent, app: &mut App) -> bool {
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('/') => app.start_search(),
        KeyCode::Right | KeyCode::Char('l') => app.enter_folder(),
        KeyCode::Left | KeyCode::Char('h') => app.go_back(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::PageDown => app.scroll_preview_down(),
        KeyCode::PageUp => app.scroll_preview_up(),
        KeyCode::Esc => {
            if !app.query().is_empty() {
                app.cancel_search();
            }
        }
        KeyCode::Char('t') => app.cycle_accent(),
        KeyCode::Char('f') => app.toggle_search_mode(),
        KeyCode::Enter => app.copy_selected(),
        KeyCode::Char('E') => app.edit_selected_externally(),
        KeyCode::Char('n') => app.open_create(),
        KeyCode::Char('e') => app.open_edit(),
        KeyCode::Char('d') => app.open_delete(),
        _ => {}
    }
    false
}

fn handle_form_keys(key: KeyEvent, app: &mut App) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => app.close_modal(),
        KeyCode::Char('s') if ctrl => app.submit_form(),
        // Enter is a literal newline inside the content field
        KeyCode::Enter if app.form.focus != Field::Content => app.submit_form(),
        KeyCode::BackTab => app.focus_previous_field(),
        KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => app.focus_previous_field(),
        KeyCode::Tab => app.focus_next_field(),
        _ => {
            app.form.focused_mut().handle_key(key);
        }
    }
}

fn handle_confirm_keys(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_delete(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.close_modal(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::tasks::{Task, TaskEvent};
    use crate::models::{SidebarItem, Snippet};
    use crate::search::SearchMode;
    use std::path::PathBuf;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_key_events(key(code), app)
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn snippet(title: &str, category: &str, tags: &[&str], content: &str) -> Snippet {
        let mut s = Snippet::new(title.into(), category.into(), content.into());
        s.id = title.to_lowercase().replace(' ', "-");
        s.tags = tags.iter().map(|t| t.to_string()).collect();
        s.path = Some(PathBuf::from(format!("/data/{}.json", s.id)));
        s
    }

    fn app() -> App {
        App::new(vec![
            snippet("React Hooks", "frontend/react", &[], "useState()"),
            snippet("Component props", "frontend", &["react"], "props"),
            snippet("Render loop", "frontend", &[], "// react reconciler"),
            snippet("Express router", "backend", &[], "app.get()"),
        ])
    }

    fn visible_titles(app: &App) -> Vec<String> {
        app.visible_items
            .iter()
            .filter_map(SidebarItem::snippet_index)
            .map(|i| app.snippets[i].title.clone())
            .collect()
    }

    #[test]
    fn any_key_leaves_welcome() {
        let mut app = app();
        assert!(!press(&mut app, KeyCode::Char('x')));
        assert_eq!(app.screen, Screen::Home);
        assert!(!app.search_active);
    }

    #[test]
    fn slash_on_welcome_starts_searching() {
        let mut app = app();
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.screen, Screen::Home);
        assert!(app.search_active);
    }

    #[test]
    fn live_filter_then_fuzzy_toggle() {
        let mut app = app();
        press(&mut app, KeyCode::Char('/'));
        type_str(&mut app, "react");
        assert_eq!(
            visible_titles(&app),
            vec!["Component props", "React Hooks", "Render loop"]
        );

        // q and f are query text while searching
        type_str(&mut app, "fq");
        assert!(app.visible_items.is_empty());
        press(&mut app, KeyCode::Esc);
        assert!(!app.search_active);
        assert_eq!(app.query(), "");

        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.search_mode, SearchMode::Fuzzy);
        assert_eq!(app.success_message.as_deref(), Some("Fuzzy search ON"));

        press(&mut app, KeyCode::Char('/'));
        type_str(&mut app, "rct");
        assert!(visible_titles(&app).contains(&"React Hooks".to_string()));
    }

    #[test]
    fn escape_restores_folder_listing() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.current_path, "backend");

        press(&mut app, KeyCode::Char('/'));
        type_str(&mut app, "hooks");
        assert_eq!(visible_titles(&app), vec!["React Hooks"]);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.current_path, "backend");
        assert_eq!(visible_titles(&app), vec!["Express router"]);
    }

    #[test]
    fn back_from_folder_reaches_root_then_stops() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.current_path, "frontend");

        press(&mut app, KeyCode::Left);
        assert_eq!(app.current_path, "");
        press(&mut app, KeyCode::Char('h'));
        assert_eq!(app.current_path, "");
    }

    #[test]
    fn tab_is_blocked_on_empty_title() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.screen, Screen::Create);

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.form.focus, Field::Title);
        assert_eq!(app.form.error(Field::Title), Some("Title is required"));
        assert_eq!(app.error_message.as_deref(), Some("Please fill required field"));

        type_str(&mut app, "Debounce");
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.form.focus, Field::Category);
        assert_eq!(app.form.error(Field::Title), None);
    }

    #[test]
    fn focus_is_clamped_at_both_ends() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.form.focus, Field::Title);

        for (text, expected) in [
            ("t", Field::Category),
            ("c", Field::Tags),
            ("", Field::Language),
            ("", Field::Content),
        ] {
            type_str(&mut app, text);
            press(&mut app, KeyCode::Tab);
            assert_eq!(app.form.focus, expected);
        }
        type_str(&mut app, "body");
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.form.focus, Field::Content);
    }

    #[test]
    fn enter_in_content_is_a_newline_and_ctrl_s_saves() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('n'));
        type_str(&mut app, "Title");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "misc");
        app.form.focus = Field::Content;

        type_str(&mut app, "a");
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "b");
        assert_eq!(app.form.field(Field::Content).value(), "a\nb");
        assert!(app.take_tasks().is_empty());

        handle_key_events(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL), &mut app);
        let tasks = app.take_tasks();
        assert!(matches!(tasks.as_slice(), [Task::Create(s)] if s.content == "a\nb"));
    }

    #[test]
    fn enter_on_other_fields_submits() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('n'));
        type_str(&mut app, "Only title");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.form.focus, Field::Category);
        assert_eq!(app.error_message.as_deref(), Some("Please fix validation errors"));
        assert_eq!(app.screen, Screen::Create);
    }

    #[test]
    fn escape_cancels_form() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('n'));
        type_str(&mut app, "draft");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen, Screen::Home);
        assert!(app.take_tasks().is_empty());
    }

    #[test]
    fn delete_confirmation_flow() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected_snippet().unwrap().title, "Express router");

        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.screen, Screen::ConfirmDelete);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.screen, Screen::Home);
        assert!(app.target.is_none());

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('Y'));
        let tasks = app.take_tasks();
        assert!(matches!(tasks.as_slice(), [Task::Delete(s)] if s.title == "Express router"));

        app.handle_task_event(TaskEvent::Reloaded {
            snippets: Vec::new(),
            message: "snippet deleted".into(),
        });
        assert_eq!(app.screen, Screen::Home);
        assert!(app.visible_items.is_empty());
    }

    #[test]
    fn home_actions_queue_tasks() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Down);

        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('E'));
        let tasks = app.take_tasks();
        assert_eq!(
            tasks,
            vec![
                Task::Copy("app.get()".into()),
                Task::Edit(PathBuf::from("/data/express-router.json"))
            ]
        );

        app.handle_task_event(TaskEvent::Copied);
        assert_eq!(app.success_message.as_deref(), Some("copied to clipboard"));
    }

    #[test]
    fn accent_cycles_and_quit_exits() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.theme.accent_index(), 1);
        assert_eq!(app.success_message.as_deref(), Some("Border color changed"));

        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn ctrl_c_quits_from_any_screen() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('n'));
        assert!(handle_key_events(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            &mut app
        ));
    }
}
