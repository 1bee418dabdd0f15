use std::collections::VecDeque;

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crm_api::{AdminAction, LoadOrigin};
use crm_core::domain::CustomerCollection;
use crm_core::dto::CustomerRowDto;
use crm_core::query::{run_query, BirthdayMode, QueryParams, SortKey};

use crate::actions::{Action, AdminOutcome};

const ADMIN_BUSY: &str = "An admin action is already running";
const CLOCK_REFRESH_SECS: i64 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    List,
    SearchEditing,
    Admin,
    Confirm(ConfirmState),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmState {
    pub message: String,
    pub action: AdminAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminMessage {
    pub text: String,
    pub success: bool,
}

pub struct App {
    pub mode: Mode,
    pub show_help: bool,
    pub should_quit: bool,
    pub query: QueryParams,
    pub rows: Vec<CustomerRowDto>,
    pub selected: usize,
    pub origin: Option<LoadOrigin>,
    pub loaded_at: Option<i64>,
    pub status: Option<String>,
    pub error: Option<String>,
    pub admin_running: Option<AdminAction>,
    pub admin_message: Option<AdminMessage>,
    customers: Option<CustomerCollection>,
    today: NaiveDate,
    now: i64,
    actions: VecDeque<Action>,
}

impl App {
    pub fn new(query: QueryParams, today: NaiveDate, now: i64) -> Self {
        let mut app = Self {
            mode: Mode::List,
            show_help: false,
            should_quit: false,
            query,
            rows: Vec::new(),
            selected: 0,
            origin: None,
            loaded_at: None,
            status: None,
            error: None,
            admin_running: None,
            admin_message: None,
            customers: None,
            today,
            now,
            actions: VecDeque::new(),
        };
        app.enqueue(Action::LoadCustomers);
        app
    }

    pub fn enqueue(&mut self, action: Action) {
        self.actions.push_back(action);
    }

    pub fn next_action(&mut self) -> Option<Action> {
        self.actions.pop_front()
    }

    pub fn has_pending_actions(&self) -> bool {
        !self.actions.is_empty()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.error = None;
        self.status = Some(message.into());
    }

    pub fn set_clock(&mut self, today: NaiveDate, now: i64) {
        self.today = today;
        self.now = now;
    }

    /// Rebuilds the rows once the date changes or a minute has passed, so
    /// birthday badges and relative times follow the wall clock.
    pub fn advance_clock(&mut self, today: NaiveDate, now: i64) {
        if today == self.today && now - self.now < CLOCK_REFRESH_SECS {
            return;
        }
        self.set_clock(today, now);
        self.refresh_view();
    }

    pub fn is_loading(&self) -> bool {
        self.customers.is_none()
    }

    pub fn apply_customers(&mut self, collection: CustomerCollection, origin: LoadOrigin) {
        self.customers = Some(collection);
        self.origin = Some(origin);
        self.loaded_at = Some(self.now);
        self.refresh_view();
    }

    pub fn apply_load_failure(&mut self, message: String) {
        self.customers = Some(CustomerCollection::default());
        self.origin = None;
        self.set_error(message);
        self.refresh_view();
    }

    /// Recomputes the visible rows from the loaded customers and the query.
    pub fn refresh_view(&mut self) {
        let Some(customers) = &self.customers else {
            self.rows.clear();
            self.selected = 0;
            return;
        };
        self.rows = run_query(customers.as_slice(), &self.query, self.today)
            .into_iter()
            .map(|customer| CustomerRowDto::from_customer(customer, self.today, self.now))
            .collect();
        if self.selected >= self.rows.len() {
            self.selected = self.rows.len().saturating_sub(1);
        }
    }

    /// Marks `action` as in flight. Returns false when another one is running.
    pub fn begin_admin(&mut self, action: AdminAction) -> bool {
        if self.admin_running.is_some() {
            self.set_error(ADMIN_BUSY);
            return false;
        }
        self.admin_running = Some(action);
        self.admin_message = Some(AdminMessage {
            text: action.progress_message().to_string(),
            success: true,
        });
        true
    }

    pub fn finish_admin(&mut self, outcome: AdminOutcome) {
        if self.admin_running == Some(outcome.action) {
            self.admin_running = None;
        }
        self.clear_error();
        self.admin_message = Some(match outcome.result {
            Ok(text) => AdminMessage {
                text,
                success: true,
            },
            Err(text) => AdminMessage {
                text,
                success: false,
            },
        });
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press && key.kind != KeyEventKind::Repeat {
            return;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
                self.show_help = false;
            }
            return;
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        // Search text takes every printable key, including q and ?.
        if self.mode == Mode::SearchEditing {
            if let Some(next) = self.handle_search_key(key) {
                self.mode = next;
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('?') => {
                self.show_help = true;
                return;
            }
            _ => {}
        }

        let mut mode = std::mem::replace(&mut self.mode, Mode::List);
        match &mut mode {
            Mode::List => {
                if let Some(next) = self.handle_list_key(key) {
                    mode = next;
                }
            }
            Mode::Admin => {
                if let Some(next) = self.handle_admin_key(key) {
                    mode = next;
                }
            }
            Mode::Confirm(state) => {
                if let Some(next) = self.handle_confirm_key(state, key) {
                    mode = next;
                }
            }
            Mode::SearchEditing => {}
        }
        self.mode = mode;
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> Option<Mode> {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::PageDown => self.move_selection(5),
            KeyCode::PageUp => self.move_selection(-5),
            KeyCode::Home | KeyCode::Char('g') => self.selected = 0,
            KeyCode::End | KeyCode::Char('G') => {
                self.selected = self.rows.len().saturating_sub(1);
            }
            KeyCode::Char(ch @ '1'..='4') => {
                let idx = ch as usize - '1' as usize;
                self.sort_by(SortKey::ALL[idx]);
            }
            KeyCode::Char('/') => return Some(Mode::SearchEditing),
            KeyCode::Char('b') => {
                self.query.birthdays = self.query.birthdays.toggled();
                let status = match self.query.birthdays {
                    BirthdayMode::All => "Showing all birthdays",
                    BirthdayMode::ThisWeek => "Showing birthdays this week",
                };
                self.set_status(status);
                self.refresh_view();
            }
            KeyCode::Char('c') => {
                self.query.search.clear();
                self.query.birthdays = BirthdayMode::All;
                self.set_status("Filters cleared");
                self.refresh_view();
            }
            KeyCode::Tab => return Some(Mode::Admin),
            _ => {}
        }
        None
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Option<Mode> {
        match key.code {
            KeyCode::Enter => return Some(Mode::List),
            KeyCode::Esc => {
                self.query.search.clear();
                self.refresh_view();
                return Some(Mode::List);
            }
            _ => {
                if apply_text_input(&mut self.query.search, key) {
                    self.refresh_view();
                }
            }
        }
        None
    }

    fn handle_admin_key(&mut self, key: KeyEvent) -> Option<Mode> {
        match key.code {
            KeyCode::Tab | KeyCode::Esc => return Some(Mode::List),
            KeyCode::Char('g') => {
                if self.admin_running.is_some() {
                    self.set_error(ADMIN_BUSY);
                } else {
                    self.enqueue(Action::RunAdmin(AdminAction::GenerateData));
                }
            }
            KeyCode::Char('r') => {
                if self.admin_running.is_some() {
                    self.set_error(ADMIN_BUSY);
                } else {
                    return Some(Mode::Confirm(ConfirmState {
                        message: "Delete ALL customer data? (y/n)".to_string(),
                        action: AdminAction::ResetDatabase,
                    }));
                }
            }
            _ => {}
        }
        None
    }

    fn handle_confirm_key(&mut self, state: &mut ConfirmState, key: KeyEvent) -> Option<Mode> {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.enqueue(Action::RunAdmin(state.action));
                Some(Mode::Admin)
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Mode::Admin),
            _ => None,
        }
    }

    fn sort_by(&mut self, key: SortKey) {
        self.query.sort = self.query.sort.toggle(key);
        self.refresh_view();
    }

    fn move_selection(&mut self, delta: i32) {
        if self.rows.is_empty() {
            self.selected = 0;
            return;
        }
        let last = self.rows.len() as i64 - 1;
        let next = (self.selected as i64 + i64::from(delta)).clamp(0, last);
        self.selected = next as usize;
    }
}

/// Applies an editing key to `target`. Returns true when the text changed.
fn apply_text_input(target: &mut String, key: KeyEvent) -> bool {
    let before = target.len();
    match key.code {
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            target.clear();
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            delete_last_word(target);
        }
        KeyCode::Char(ch) => {
            if !key.modifiers.contains(KeyModifiers::CONTROL) {
                target.push(ch);
            }
        }
        KeyCode::Backspace => {
            target.pop();
        }
        _ => {}
    }
    target.len() != before
}

fn delete_last_word(value: &mut String) {
    while value.ends_with(char::is_whitespace) {
        value.pop();
    }
    while value.ends_with(|ch: char| !ch.is_whitespace()) {
        value.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::{App, Mode};
    use crate::actions::{Action, AdminOutcome};
    use chrono::NaiveDate;
    use crm_api::{AdminAction, LoadOrigin};
    use crm_core::domain::CustomerCollection;
    use crm_core::fixtures::fallback_customers;
    use crm_core::query::{BirthdayMode, QueryParams, SortDirection, SortKey};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn loaded_app() -> App {
        let today = NaiveDate::from_ymd_opt(2025, 6, 28).unwrap();
        let mut app = App::new(QueryParams::default(), today, 1_751_112_000);
        assert_eq!(app.next_action(), Some(Action::LoadCustomers));
        let collection = CustomerCollection::new(fallback_customers()).unwrap();
        app.apply_customers(collection, LoadOrigin::Primary { source: "fixtures" });
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch));
        }
    }

    fn names(app: &App) -> Vec<&str> {
        app.rows.iter().map(|row| row.full_name.as_str()).collect()
    }

    #[test]
    fn starts_loading_until_customers_arrive() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 28).unwrap();
        let app = App::new(QueryParams::default(), today, 0);
        assert!(app.is_loading());
        assert!(app.has_pending_actions());
        assert!(app.rows.is_empty());
    }

    #[test]
    fn number_keys_sort_and_repeat_toggles_direction() {
        let mut app = loaded_app();
        assert_eq!(names(&app)[0], "Ana García");

        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.query.sort.key, SortKey::Company);
        assert_eq!(app.query.sort.direction, SortDirection::Asc);
        assert_eq!(app.rows[0].company, "Enterprise Co.");

        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.query.sort.direction, SortDirection::Desc);
        assert_eq!(app.rows[0].company, "TechCorp S.A.");

        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.query.sort.key, SortKey::Birthday);
        assert_eq!(app.query.sort.direction, SortDirection::Asc);
        assert_eq!(names(&app)[0], "Carlos Rodríguez");
    }

    #[test]
    fn live_search_filters_while_typing() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.mode, Mode::SearchEditing);

        type_text(&mut app, "garc");
        assert_eq!(names(&app), vec!["Ana García"]);

        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.query.search, "g");

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::List);
        assert_eq!(app.query.search, "g");

        press(&mut app, KeyCode::Char('/'));
        press(&mut app, KeyCode::Esc);
        assert!(app.query.search.is_empty());
        assert_eq!(app.rows.len(), 5);
    }

    #[test]
    fn search_accepts_quit_and_help_keys_as_text() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "q?");
        assert!(!app.should_quit);
        assert!(!app.show_help);
        assert_eq!(app.query.search, "q?");
        assert!(app.rows.is_empty());
    }

    #[test]
    fn birthday_toggle_and_clear() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('b'));
        assert_eq!(app.query.birthdays, BirthdayMode::ThisWeek);
        assert_eq!(names(&app), vec!["Carlos Rodríguez", "Juan Pérez"]);

        app.query.search = "juan".to_string();
        app.refresh_view();
        assert_eq!(names(&app), vec!["Juan Pérez"]);

        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.query.birthdays, BirthdayMode::All);
        assert!(app.query.search.is_empty());
        assert_eq!(app.rows.len(), 5);
    }

    #[test]
    fn selection_is_clamped_when_view_shrinks() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::End);
        assert_eq!(app.selected, 4);
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.selected, 4);

        press(&mut app, KeyCode::Char('b'));
        assert_eq!(app.selected, 1);

        press(&mut app, KeyCode::Char('k'));
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn reset_requires_confirmation() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.mode, Mode::Admin);

        press(&mut app, KeyCode::Char('r'));
        assert!(matches!(app.mode, Mode::Confirm(_)));
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.mode, Mode::Admin);
        assert!(!app.has_pending_actions());

        press(&mut app, KeyCode::Char('r'));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.mode, Mode::Admin);
        assert_eq!(
            app.next_action(),
            Some(Action::RunAdmin(AdminAction::ResetDatabase))
        );
    }

    #[test]
    fn admin_actions_are_refused_while_one_is_running() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('g'));
        assert_eq!(
            app.next_action(),
            Some(Action::RunAdmin(AdminAction::GenerateData))
        );
        assert!(app.begin_admin(AdminAction::GenerateData));
        assert_eq!(
            app.admin_message.as_ref().map(|m| m.text.as_str()),
            Some("Starting data load...")
        );

        press(&mut app, KeyCode::Char('g'));
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.mode, Mode::Admin);
        assert!(!app.has_pending_actions());
        assert!(!app.begin_admin(AdminAction::ResetDatabase));
        assert!(app.error.is_some());

        app.finish_admin(AdminOutcome {
            action: AdminAction::GenerateData,
            result: Err("Error loading data: timed out".to_string()),
        });
        assert!(app.admin_running.is_none());
        let message = app.admin_message.clone().unwrap();
        assert!(!message.success);
        assert_eq!(message.text, "Error loading data: timed out");
        assert_eq!(app.rows.len(), 5);
    }

    #[test]
    fn load_failure_leaves_empty_view_with_error() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 28).unwrap();
        let mut app = App::new(QueryParams::default(), today, 0);
        app.apply_load_failure("Error loading customers: status 503".to_string());
        assert!(!app.is_loading());
        assert!(app.rows.is_empty());
        assert_eq!(
            app.error.as_deref(),
            Some("Error loading customers: status 503")
        );
    }

    #[test]
    fn busy_error_clears_after_admin_finishes_and_on_new_status() {
        let mut app = loaded_app();
        assert!(app.begin_admin(AdminAction::GenerateData));
        assert!(!app.begin_admin(AdminAction::GenerateData));
        assert!(app.error.is_some());

        app.finish_admin(AdminOutcome {
            action: AdminAction::GenerateData,
            result: Ok("Data loaded successfully".to_string()),
        });
        assert!(app.error.is_none());

        app.set_error("An admin action is already running");
        press(&mut app, KeyCode::Char('b'));
        assert!(app.error.is_none());
        assert_eq!(app.status.as_deref(), Some("Showing birthdays this week"));

        app.set_error("stale");
        press(&mut app, KeyCode::Char('c'));
        assert!(app.error.is_none());
        assert_eq!(app.status.as_deref(), Some("Filters cleared"));
    }

    #[test]
    fn clock_advance_refreshes_birthday_window() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('b'));
        assert_eq!(names(&app), vec!["Carlos Rodríguez", "Juan Pérez"]);
        assert_eq!(app.rows[0].last_interaction, "4 days ago");

        let start = 1_751_112_000;
        let today = NaiveDate::from_ymd_opt(2025, 6, 28).unwrap();
        app.advance_clock(today, start + 30);
        assert_eq!(app.rows[0].last_interaction, "4 days ago");

        let later = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        app.advance_clock(later, start + 3 * 86_400);
        assert_eq!(names(&app), vec!["Carlos Rodríguez"]);
        assert_eq!(app.rows[0].last_interaction, "7 days ago");
    }
}
