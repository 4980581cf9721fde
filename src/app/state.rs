use crate::config::AppConfig;
use crate::form::counter::BindError;
use crate::form::document::Element;
use crate::form::{CounterBindings, CounterId, ElementKind, FormDocument, SubmissionId, SubmitControl};
use crate::nav::{NavigationController, Route};
use crate::prefs::theme::{DocumentRoot, ThemeController};
use crate::prefs::{PreferenceStore, CURRENT_EVENT_KEY, TEAM_NUMBER_KEY};
use crate::table_filter::{ColumnSet, TableFilterOptions};
use std::time::Instant;

/// Something the form page can focus: a control, or one of the two buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFocus {
    Field(usize),
    Submit,
    Reset,
}

pub struct FormPage {
    pub document: FormDocument,
    pub counters: CounterBindings,
    pub submit: SubmitControl,
    focus_order: Vec<FormFocus>,
    focus: usize,
    /// Counter whose display was typed into and not yet committed.
    pending_edit: Option<CounterId>,
}

impl FormPage {
    pub fn new() -> Result<Self, BindError> {
        let document = FormDocument::scouting_form();
        let counters = CounterBindings::bind(&document)?;
        let mut focus_order: Vec<FormFocus> =
            document.focusable().into_iter().map(FormFocus::Field).collect();
        focus_order.push(FormFocus::Submit);
        focus_order.push(FormFocus::Reset);
        Ok(Self {
            document,
            counters,
            submit: SubmitControl::new(),
            focus_order,
            focus: 0,
            pending_edit: None,
        })
    }

    pub fn focus_order(&self) -> &[FormFocus] {
        &self.focus_order
    }

    pub fn focused(&self) -> FormFocus {
        self.focus_order
            .get(self.focus)
            .copied()
            .unwrap_or(FormFocus::Submit)
    }

    pub fn focused_element(&self) -> Option<&Element> {
        match self.focused() {
            FormFocus::Field(i) => self.document.element(i),
            _ => None,
        }
    }

    fn focused_index(&self) -> Option<usize> {
        match self.focused() {
            FormFocus::Field(i) => Some(i),
            _ => None,
        }
    }

    /// The counter bound to the focused control, if any.
    pub fn focused_counter(&self) -> Option<CounterId> {
        self.focused_index().and_then(|i| self.counters.counter_at(i))
    }

    pub fn focus_next(&mut self) {
        self.commit_edit();
        self.focus = (self.focus + 1) % self.focus_order.len();
    }

    pub fn focus_prev(&mut self) {
        self.commit_edit();
        self.focus = if self.focus == 0 {
            self.focus_order.len() - 1
        } else {
            self.focus - 1
        };
    }

    pub fn focus_element(&mut self, id: &str) -> bool {
        let Some(index) = self.document.index_of(id) else {
            return false;
        };
        match self.focus_order.iter().position(|f| *f == FormFocus::Field(index)) {
            Some(pos) => {
                self.commit_edit();
                self.focus = pos;
                true
            }
            None => false,
        }
    }

    /// Type into the focused control. Characters the control refuses (anything
    /// but a digit in a numeric input) are dropped and `false` is returned.
    pub fn type_char(&mut self, c: char) -> bool {
        let Some(index) = self.focused_index() else {
            return false;
        };
        let counter = self.counters.counter_at(index);
        let Some(el) = self.document.element_mut(index) else {
            return false;
        };
        if !el.is_editable_text() || !el.accepts_char(c) {
            return false;
        }
        el.value.push(c);
        if counter.is_some() {
            self.pending_edit = counter;
        }
        true
    }

    pub fn backspace(&mut self) {
        let Some(index) = self.focused_index() else {
            return;
        };
        let counter = self.counters.counter_at(index);
        if let Some(el) = self.document.element_mut(index) {
            if el.is_editable_text() && el.value.pop().is_some() && counter.is_some() {
                self.pending_edit = counter;
            }
        }
    }

    /// Commit a manual counter edit: reparse, clamp and re-sync.
    pub fn commit_edit(&mut self) {
        if let Some(counter) = self.pending_edit.take() {
            self.counters.normalize(&mut self.document, counter);
        }
    }

    /// Step the focused counter. Returns the new value, or `None` when the
    /// focused control is not a counter.
    pub fn step_counter(&mut self, up: bool) -> Option<u32> {
        let counter = self.focused_counter()?;
        self.pending_edit = None;
        Some(if up {
            self.counters.increment(&mut self.document, counter)
        } else {
            self.counters.decrement(&mut self.document, counter)
        })
    }

    pub fn toggle_checkbox(&mut self) -> bool {
        let Some(el) = self.focused_index().and_then(|i| self.document.element_mut(i)) else {
            return false;
        };
        match &mut el.kind {
            ElementKind::Checkbox { checked } => {
                *checked = !*checked;
                true
            }
            _ => false,
        }
    }

    pub fn cycle_radio(&mut self, forward: bool) -> bool {
        let Some(el) = self.focused_index().and_then(|i| self.document.element_mut(i)) else {
            return false;
        };
        match &mut el.kind {
            ElementKind::Radio { options, selected } if !options.is_empty() => {
                let len = options.len();
                *selected = Some(match (*selected, forward) {
                    (None, true) => 0,
                    (None, false) => len - 1,
                    (Some(i), true) => (i + 1) % len,
                    (Some(i), false) => (i + len - 1) % len,
                });
                true
            }
            _ => false,
        }
    }

    /// Clear the form and zero every coral and algae counter.
    pub fn reset_all(&mut self) {
        self.pending_edit = None;
        self.document.reset();
        self.counters.reset(&mut self.document, &CounterId::CORAL);
        self.counters.reset(&mut self.document, &CounterId::ALGAE);
    }
}

pub struct ViewDataPage {
    pub column_set: ColumnSet,
    pub show_options: bool,
    pub team_number: Option<String>,
    pub current_event: Option<String>,
}

impl ViewDataPage {
    pub fn new(prefs: &dyn PreferenceStore) -> Self {
        Self {
            column_set: ColumnSet::Reduced,
            show_options: false,
            team_number: prefs.get(TEAM_NUMBER_KEY),
            current_event: prefs.get(CURRENT_EVENT_KEY),
        }
    }

    pub fn filter_options(&self) -> TableFilterOptions {
        TableFilterOptions::for_columns(self.column_set)
    }

    pub fn toggle_columns(&mut self) {
        self.column_set = self.column_set.toggled();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    DarkTheme,
    TeamNumber,
    EventKey,
}

impl SettingsField {
    pub const ALL: [SettingsField; 3] = [
        SettingsField::DarkTheme,
        SettingsField::TeamNumber,
        SettingsField::EventKey,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SettingsField::DarkTheme => "Dark Theme",
            SettingsField::TeamNumber => "Team Number",
            SettingsField::EventKey => "Event",
        }
    }
}

pub struct SettingsPage {
    pub focus: SettingsField,
    pub team_number: String,
    pub event_key: String,
}

impl SettingsPage {
    pub fn new(prefs: &dyn PreferenceStore) -> Self {
        Self {
            focus: SettingsField::DarkTheme,
            team_number: prefs.get(TEAM_NUMBER_KEY).unwrap_or_default(),
            event_key: prefs.get(CURRENT_EVENT_KEY).unwrap_or_default(),
        }
    }

    pub fn move_focus(&mut self, forward: bool) {
        let all = SettingsField::ALL;
        let pos = all.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (pos + 1) % all.len()
        } else {
            (pos + all.len() - 1) % all.len()
        };
        self.focus = all[next];
    }
}

pub enum Page {
    AddData(FormPage),
    ViewData(ViewDataPage),
    Settings(SettingsPage),
}

impl Page {
    /// Build fresh state for `route`, the way a full page load would.
    pub fn load(route: Route, prefs: &dyn PreferenceStore) -> Result<Self, BindError> {
        Ok(match route {
            Route::AddData => Page::AddData(FormPage::new()?),
            Route::ViewData => Page::ViewData(ViewDataPage::new(prefs)),
            Route::Settings => Page::Settings(SettingsPage::new(prefs)),
        })
    }

    pub fn route(&self) -> Route {
        match self {
            Page::AddData(_) => Route::AddData,
            Page::ViewData(_) => Route::ViewData,
            Page::Settings(_) => Route::Settings,
        }
    }
}

/// A blocking message box; dismissed with Enter or Esc.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub message: String,
}

impl Alert {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub struct AppState {
    pub config: AppConfig,
    pub prefs: Box<dyn PreferenceStore>,
    pub document_root: DocumentRoot,
    pub nav: NavigationController,
    pub page: Page,
    pub alert: Option<Alert>,
    pub should_quit: bool,
    pub dirty: bool,
    pub tick_count: u64,
    pub status_message: Option<String>,
    pub next_submission_id: SubmissionId,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        prefs: Box<dyn PreferenceStore>,
        now: Instant,
    ) -> Result<Self, BindError> {
        let location = config.ui.start_location().to_string();
        let route = Route::from_path(&location).unwrap_or(Route::AddData);
        let nav = NavigationController::new(
            location,
            config.ui.fade_duration(),
            config.ui.fade_in_delay(),
            now,
        );
        let page = Page::load(route, prefs.as_ref())?;
        Ok(Self {
            config,
            prefs,
            document_root: DocumentRoot::new(),
            nav,
            page,
            alert: None,
            should_quit: false,
            dirty: true,
            tick_count: 0,
            status_message: None,
            next_submission_id: 0,
        })
    }

    /// Submission ids are unique for the whole session, across page loads.
    pub fn allocate_submission_id(&mut self) -> SubmissionId {
        let id = self.next_submission_id;
        self.next_submission_id += 1;
        id
    }

    pub fn themes(&mut self) -> ThemeController<'_> {
        ThemeController::new(&mut *self.prefs, &mut self.document_root)
    }

    pub fn show_alert(&mut self, message: impl Into<String>) {
        self.alert = Some(Alert::new(message));
        self.dirty = true;
    }

    pub fn status_line(&self) -> String {
        if let Some(ref msg) = self.status_message {
            return msg.clone();
        }
        match &self.page {
            Page::AddData(form) => form
                .submit
                .last_outcome()
                .map(|phase| format!("Last submission: {:?}", phase))
                .unwrap_or_else(|| "Ready".to_string()),
            Page::ViewData(view) => format!("{} columns", view.column_set.columns().len()),
            Page::Settings(_) => format!("Preferences: {}", self.document_root.mode().as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn focus_id(page: &mut FormPage, id: &str) {
        assert!(page.focus_element(id), "{id} not focusable");
    }

    #[test]
    fn test_focus_order_skips_hidden_and_ends_with_buttons() {
        let page = FormPage::new().unwrap();
        let order = page.focus_order();
        assert_eq!(order[order.len() - 2], FormFocus::Submit);
        assert_eq!(order[order.len() - 1], FormFocus::Reset);
        for focus in order {
            if let FormFocus::Field(i) = focus {
                assert_ne!(page.document.element(*i).unwrap().kind, ElementKind::Hidden);
            }
        }
    }

    #[test]
    fn test_typed_counter_edit_commits_on_blur() {
        let mut page = FormPage::new().unwrap();
        focus_id(&mut page, "coralL3Count");
        page.backspace();
        for c in "40".chars() {
            assert!(page.type_char(c));
        }
        assert_eq!(page.document.value("coralL3Input"), Some("0"));
        page.focus_next();
        assert_eq!(page.document.value("coralL3Count"), Some("12"));
        assert_eq!(page.document.value("coralL3Input"), Some("12"));
    }

    #[test]
    fn test_garbage_counter_edit_becomes_zero() {
        let mut page = FormPage::new().unwrap();
        focus_id(&mut page, "algaeBargeCount");
        page.backspace();
        assert!(!page.type_char('x'));
        page.commit_edit();
        assert_eq!(page.document.value("algaeBargeCount"), Some("0"));
        assert_eq!(page.document.value("algaeBargeInput"), Some("0"));
    }

    #[test]
    fn test_minus_rejected_in_auto_inputs() {
        let mut page = FormPage::new().unwrap();
        focus_id(&mut page, "autoCoral");
        assert!(!page.type_char('-'));
        assert_eq!(page.document.value("autoCoral"), Some("0"));
    }

    #[test]
    fn test_step_counter_only_on_counters() {
        let mut page = FormPage::new().unwrap();
        focus_id(&mut page, "scoutName");
        assert_eq!(page.step_counter(true), None);
        focus_id(&mut page, "coralL1Count");
        assert_eq!(page.step_counter(true), Some(1));
        assert_eq!(page.document.value("coralL1Input"), Some("1"));
    }

    #[test]
    fn test_radio_cycles_both_ways() {
        let mut page = FormPage::new().unwrap();
        focus_id(&mut page, "climb");
        assert!(page.cycle_radio(false));
        assert_eq!(page.document.payload().get("args[climb]"), Some("Not Attempted"));
        assert!(page.cycle_radio(true));
        assert_eq!(page.document.payload().get("args[climb]"), Some("Shallow"));
    }

    #[test]
    fn test_reset_all_zeroes_counters_and_clears_fields() {
        let mut page = FormPage::new().unwrap();
        focus_id(&mut page, "scoutName");
        page.type_char('A');
        focus_id(&mut page, "coralDroppedCount");
        page.step_counter(true);
        focus_id(&mut page, "defenseBot");
        page.toggle_checkbox();

        page.reset_all();
        assert_eq!(page.document.value("scoutName"), Some(""));
        for counter in CounterId::ALL {
            assert_eq!(page.counters.value(&page.document, counter), 0);
        }
        assert_eq!(page.document.payload().get("args[defense_bot]"), None);
    }

    #[test]
    fn test_settings_focus_wraps() {
        let prefs = crate::prefs::MemoryPreferenceStore::new();
        let mut page = SettingsPage::new(&prefs);
        page.move_focus(false);
        assert_eq!(page.focus, SettingsField::EventKey);
        page.move_focus(true);
        assert_eq!(page.focus, SettingsField::DarkTheme);
    }
}
