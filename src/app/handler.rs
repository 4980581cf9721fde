use crate::app::action::Action;
use crate::app::event::{AppEvent, TimerKind};
use crate::app::state::*;
use crate::form::submit::SubmitPhase;
use crate::form::{FormPayload, SubmissionId, SubmitError};
use crate::nav::Route;
use crate::prefs::{CURRENT_EVENT_KEY, TEAM_NUMBER_KEY};
use crossterm::event::{Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Instant;
use tracing::{debug, error, info, warn};

pub fn handle_event(state: &mut AppState, event: AppEvent) -> Vec<Action> {
    match event {
        AppEvent::Terminal(cevent) => {
            state.dirty = true;
            handle_terminal(state, cevent)
        }
        AppEvent::SubmitFinished { id, payload, outcome } => {
            handle_submit_finished(state, id, payload, outcome);
            vec![]
        }
        AppEvent::TimerFired(kind) => {
            state.dirty = true;
            handle_timer(state, kind, Instant::now())
        }
        AppEvent::Tick => {
            handle_tick(state, Instant::now());
            vec![]
        }
    }
}

fn handle_tick(state: &mut AppState, now: Instant) {
    state.tick_count = state.tick_count.wrapping_add(1);
    let submitting = matches!(
        &state.page,
        Page::AddData(form) if form.submit.phase() == SubmitPhase::Submitting
    );
    if submitting || state.nav.is_animating(now) {
        state.dirty = true;
    }
}

fn handle_timer(state: &mut AppState, kind: TimerKind, now: Instant) -> Vec<Action> {
    match kind {
        TimerKind::FadeIn => {
            state.nav.fade_in(now);
            vec![]
        }
        TimerKind::Navigate(route) => {
            let page = match Page::load(route, state.prefs.as_ref()) {
                Ok(page) => page,
                Err(e) => {
                    error!(error = %e, route = route.path(), "failed to build page");
                    state.show_alert(format!("Could not open {}: {}", route.label(), e));
                    return vec![];
                }
            };
            info!(from = state.page.route().path(), to = route.path(), "navigated");
            state.page = page;
            state.alert = None;
            state.status_message = None;
            let timer = state.nav.arrive(route, now);
            vec![Action::StartTimer(timer)]
        }
    }
}

fn handle_submit_finished(
    state: &mut AppState,
    id: SubmissionId,
    payload: FormPayload,
    outcome: Result<(), SubmitError>,
) {
    // Only the form that started this submission may react to its result.
    let applied = match &mut state.page {
        Page::AddData(form) => form.submit.finish(id, &outcome).map(|_| form),
        _ => None,
    };
    let Some(form) = applied else {
        debug!(
            id,
            fields = payload.pairs().len(),
            "submission finished after the form that sent it was unloaded"
        );
        return;
    };

    match outcome {
        Ok(()) => {
            info!("form submitted");
            form.reset_all();
            state.status_message = Some("Entry saved".to_string());
        }
        Err(e) => {
            warn!(error = %e, "form submission failed");
            state.status_message = None;
            state.show_alert(format!("Error submitting form: {}", e));
        }
    }
    state.dirty = true;
}

fn handle_terminal(state: &mut AppState, event: CEvent) -> Vec<Action> {
    match event {
        CEvent::Key(key) if key.kind != KeyEventKind::Release => handle_key(state, key),
        CEvent::Resize(_, _) => {
            state.dirty = true;
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Global keybindings
    if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
        return vec![Action::Quit];
    }

    // The alert blocks everything else until dismissed
    if state.alert.is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            state.alert = None;
        }
        return vec![];
    }

    if ctrl && key.code == KeyCode::Char('t') {
        let mode = state.themes().toggle();
        state.status_message = Some(format!("Theme: {}", mode.as_str()));
        return vec![];
    }

    let dock_target = match key.code {
        KeyCode::F(1) => Some(Route::AddData),
        KeyCode::F(2) => Some(Route::ViewData),
        KeyCode::F(3) => Some(Route::Settings),
        _ => None,
    };
    if let Some(route) = dock_target {
        return navigate(state, route, Instant::now());
    }

    match state.page {
        Page::AddData(_) => handle_form_key(state, key),
        Page::ViewData(_) => handle_view_data_key(state, key),
        Page::Settings(_) => handle_settings_key(state, key),
    }
}

/// Dock activation: fade out and schedule the page change, unless `route` is
/// already showing.
pub fn navigate(state: &mut AppState, route: Route, now: Instant) -> Vec<Action> {
    match state.nav.fade_and_navigate(route, now) {
        Some(timer) => {
            debug!(route = route.path(), "navigation started");
            vec![Action::StartTimer(timer)]
        }
        None => vec![],
    }
}

fn handle_form_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    let Page::AddData(form) = &mut state.page else {
        return vec![];
    };
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl {
        match key.code {
            KeyCode::Char('s') => return submit_form(state),
            KeyCode::Char('r') => {
                form.reset_all();
                state.status_message = Some("Form cleared".to_string());
            }
            _ => {}
        }
        return vec![];
    }

    match key.code {
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
        KeyCode::Enter => match form.focused() {
            FormFocus::Submit => return submit_form(state),
            FormFocus::Reset => form.reset_all(),
            FormFocus::Field(_) => {
                form.commit_edit();
                form.focus_next();
            }
        },
        KeyCode::Right => {
            if form.step_counter(true).is_none() {
                form.cycle_radio(true);
            }
        }
        KeyCode::Left => {
            if form.step_counter(false).is_none() {
                form.cycle_radio(false);
            }
        }
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(' ') => {
            if !form.toggle_checkbox() && !form.cycle_radio(true) {
                form.type_char(' ');
            }
        }
        KeyCode::Char(c) => {
            if !form.type_char(c) {
                debug!(key = %c, "keystroke rejected");
            }
        }
        _ => {}
    }
    vec![]
}

/// Validate and post the form. Nothing happens while a submission is in
/// flight.
pub fn submit_form(state: &mut AppState) -> Vec<Action> {
    let id = state.allocate_submission_id();
    let Page::AddData(form) = &mut state.page else {
        return vec![];
    };
    if form.submit.is_disabled() {
        return vec![];
    }
    form.commit_edit();

    if let Some(missing) = form.document.first_missing_required() {
        let (id, label) = (missing.id, missing.label);
        form.focus_element(id);
        state.status_message = Some(format!("Please fill out this field: {}", label));
        return vec![];
    }

    if !form.submit.begin(id) {
        return vec![];
    }
    let payload = form.document.payload();
    state.status_message = None;
    info!(id, url = %state.config.server.action_url, "submitting form");
    vec![Action::SubmitForm {
        id,
        action_url: state.config.server.action_url.clone(),
        payload,
    }]
}

fn handle_view_data_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    let Page::ViewData(view) = &mut state.page else {
        return vec![];
    };
    match key.code {
        KeyCode::Char('f') => {
            view.toggle_columns();
            debug!(columns = view.column_set.columns().len(), "column set changed");
        }
        KeyCode::Char('o') => view.show_options = !view.show_options,
        _ => {}
    }
    vec![]
}

fn handle_settings_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    let Page::Settings(settings) = &mut state.page else {
        return vec![];
    };

    match key.code {
        KeyCode::Tab | KeyCode::Down => {
            settings.move_focus(true);
            return vec![];
        }
        KeyCode::BackTab | KeyCode::Up => {
            settings.move_focus(false);
            return vec![];
        }
        _ => {}
    }

    let persist = match (settings.focus, key.code) {
        (SettingsField::DarkTheme, KeyCode::Enter | KeyCode::Char(' ')) => {
            let mode = state.themes().toggle();
            state.status_message = Some(format!("Theme: {}", mode.as_str()));
            None
        }
        (SettingsField::TeamNumber, KeyCode::Char(c)) if c.is_ascii_digit() => {
            settings.team_number.push(c);
            Some((TEAM_NUMBER_KEY, settings.team_number.clone()))
        }
        (SettingsField::TeamNumber, KeyCode::Backspace) => {
            settings.team_number.pop();
            Some((TEAM_NUMBER_KEY, settings.team_number.clone()))
        }
        (SettingsField::EventKey, KeyCode::Char(c)) if !c.is_control() => {
            settings.event_key.push(c);
            Some((CURRENT_EVENT_KEY, settings.event_key.clone()))
        }
        (SettingsField::EventKey, KeyCode::Backspace) => {
            settings.event_key.pop();
            Some((CURRENT_EVENT_KEY, settings.event_key.clone()))
        }
        _ => None,
    };

    if let Some((key, value)) = persist {
        if let Err(e) = state.prefs.set(key, &value) {
            warn!(key, error = %e, "failed to save preference");
            state.status_message = Some(format!("Could not save {}: {}", key, e));
        }
    }
    vec![]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::event::Timer;
    use crate::config::AppConfig;
    use crate::form::CounterId;
    use crate::prefs::theme::ThemeMode;
    use crate::prefs::{MemoryPreferenceStore, PreferenceStore, THEME_KEY};
    use std::time::Duration;

    fn state() -> AppState {
        AppState::new(
            AppConfig::default(),
            Box::new(MemoryPreferenceStore::new()),
            Instant::now(),
        )
        .unwrap()
    }

    fn press(state: &mut AppState, code: KeyCode) -> Vec<Action> {
        handle_event(state, AppEvent::Terminal(CEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))))
    }

    fn ctrl(state: &mut AppState, c: char) -> Vec<Action> {
        handle_event(
            state,
            AppEvent::Terminal(CEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))),
        )
    }

    fn form(state: &mut AppState) -> &mut FormPage {
        match &mut state.page {
            Page::AddData(form) => form,
            _ => panic!("not on the form page"),
        }
    }

    fn fill_required(state: &mut AppState) {
        let form = form(state);
        form.document.set_value("scoutName", "Ada");
        form.document.set_value("matchNumber", "7");
        form.document.set_value("teamNumber", "4682");
        form.focus_element("climb");
        form.cycle_radio(true);
    }

    fn deliver(state: &mut AppState, id: SubmissionId, outcome: Result<(), SubmitError>) {
        handle_event(
            state,
            AppEvent::SubmitFinished {
                id,
                payload: FormPayload::default(),
                outcome,
            },
        );
    }

    /// Deliver the result of whatever the form currently has in flight.
    fn finish(state: &mut AppState, outcome: Result<(), SubmitError>) {
        let id = match &state.page {
            Page::AddData(form) => form.submit.in_flight().unwrap_or(SubmissionId::MAX),
            _ => SubmissionId::MAX,
        };
        deliver(state, id, outcome);
    }

    fn submitted_id(actions: &[Action]) -> SubmissionId {
        match actions {
            [Action::SubmitForm { id, .. }] => *id,
            other => panic!("expected one submission: {:?}", other),
        }
    }

    #[test]
    fn test_counter_bounds_hold_under_key_sequences() {
        let mut state = state();
        form(&mut state).focus_element("coralL4Count");
        for _ in 0..20 {
            press(&mut state, KeyCode::Right);
        }
        assert_eq!(form(&mut state).document.value("coralL4Input"), Some("12"));
        for _ in 0..30 {
            press(&mut state, KeyCode::Left);
        }
        assert_eq!(form(&mut state).document.value("coralL4Count"), Some("0"));
        assert_eq!(form(&mut state).document.value("coralL4Input"), Some("0"));
    }

    #[test]
    fn test_minus_key_does_not_reach_auto_input() {
        let mut state = state();
        form(&mut state).focus_element("autoAlgae");
        press(&mut state, KeyCode::Char('-'));
        assert_eq!(form(&mut state).document.value("autoAlgae"), Some("0"));
    }

    #[test]
    fn test_submit_requires_required_fields() {
        let mut state = state();
        let actions = ctrl(&mut state, 's');
        assert!(actions.is_empty());
        assert!(state.status_message.as_deref().unwrap().contains("Name"));
        assert_eq!(form(&mut state).focused_element().unwrap().id, "scoutName");
    }

    #[test]
    fn test_submit_disables_control_and_ignores_repeat() {
        let mut state = state();
        fill_required(&mut state);
        let actions = ctrl(&mut state, 's');
        match actions.as_slice() {
            [Action::SubmitForm { action_url, payload, .. }] => {
                assert_eq!(action_url, &state.config.server.action_url);
                assert_eq!(payload.get("args[name]"), Some("Ada"));
                assert_eq!(payload.get("args[climb]"), Some("Shallow"));
            }
            other => panic!("unexpected actions: {:?}", other),
        }
        assert!(form(&mut state).submit.is_disabled());
        assert_eq!(form(&mut state).submit.label(), "Submitting...");
        assert!(ctrl(&mut state, 's').is_empty());
    }

    #[test]
    fn test_successful_submission_resets_everything() {
        let mut state = state();
        fill_required(&mut state);
        form(&mut state).focus_element("coralL2Count");
        press(&mut state, KeyCode::Right);
        press(&mut state, KeyCode::Right);
        ctrl(&mut state, 's');

        finish(&mut state, Ok(()));
        let form = form(&mut state);
        assert!(!form.submit.is_disabled());
        assert_eq!(form.submit.label(), "Submit");
        assert_eq!(form.document.value("scoutName"), Some(""));
        for counter in CounterId::CORAL.iter().chain(CounterId::ALGAE.iter()) {
            assert_eq!(form.counters.value(&form.document, *counter), 0);
        }
        assert!(state.alert.is_none());
    }

    #[test]
    fn test_rejected_submission_alerts_and_keeps_values() {
        let mut state = state();
        fill_required(&mut state);
        ctrl(&mut state, 's');

        finish(
            &mut state,
            Err(SubmitError::Rejected {
                body: "\"ok\"".into(),
            }),
        );
        assert_eq!(
            state.alert.as_ref().unwrap().message,
            "Error submitting form: Form submission returned an error status"
        );
        let form = form(&mut state);
        assert_eq!(form.document.value("scoutName"), Some("Ada"));
        assert!(!form.submit.is_disabled());
    }

    #[test]
    fn test_http_error_alert_names_status() {
        let mut state = state();
        fill_required(&mut state);
        ctrl(&mut state, 's');
        finish(
            &mut state,
            Err(SubmitError::Http {
                status: 500,
                body: "db down".into(),
            }),
        );
        let message = &state.alert.as_ref().unwrap().message;
        assert!(message.contains("500"), "{message}");
        assert_eq!(form(&mut state).submit.label(), "Submit");
    }

    #[test]
    fn test_result_from_unloaded_form_does_not_touch_new_submission() {
        let mut state = state();
        fill_required(&mut state);
        let first = submitted_id(&ctrl(&mut state, 's'));

        handle_event(&mut state, AppEvent::TimerFired(TimerKind::Navigate(Route::ViewData)));
        handle_event(&mut state, AppEvent::TimerFired(TimerKind::Navigate(Route::AddData)));
        fill_required(&mut state);
        let second = submitted_id(&ctrl(&mut state, 's'));
        assert_ne!(first, second);

        deliver(&mut state, first, Ok(()));
        let page = form(&mut state);
        assert!(page.submit.is_disabled());
        assert_eq!(page.submit.in_flight(), Some(second));
        assert_eq!(page.document.value("scoutName"), Some("Ada"));
        assert!(ctrl(&mut state, 's').is_empty());

        deliver(
            &mut state,
            second,
            Err(SubmitError::Http {
                status: 500,
                body: "db down".into(),
            }),
        );
        assert!(state.alert.as_ref().unwrap().message.contains("500"));
        let form = form(&mut state);
        assert!(!form.submit.is_disabled());
        assert_eq!(form.document.value("scoutName"), Some("Ada"));
    }

    #[test]
    fn test_settings_switch_flips_theme() {
        let mut state = state();
        state.themes().load(true);
        handle_event(&mut state, AppEvent::TimerFired(TimerKind::Navigate(Route::Settings)));
        press(&mut state, KeyCode::Char(' '));
        assert_eq!(state.document_root.mode(), ThemeMode::Light);
        press(&mut state, KeyCode::Enter);
        assert_eq!(state.prefs.get(THEME_KEY).as_deref(), Some("dark"));
    }

    #[test]
    fn test_alert_swallows_keys_until_dismissed() {
        let mut state = state();
        state.show_alert("boom");
        assert!(press(&mut state, KeyCode::F(2)).is_empty());
        assert!(state.alert.is_some());
        press(&mut state, KeyCode::Esc);
        assert!(state.alert.is_none());
    }

    #[test]
    fn test_dock_to_current_route_is_noop() {
        let mut state = state();
        assert!(press(&mut state, KeyCode::F(1)).is_empty());
    }

    #[test]
    fn test_dock_navigation_round_trip() {
        let mut state = state();
        let actions = press(&mut state, KeyCode::F(3));
        let [Action::StartTimer(Timer { after, kind })] = actions.as_slice() else {
            panic!("expected a navigation timer: {:?}", actions);
        };
        assert_eq!(*after, Duration::from_millis(300));
        assert_eq!(*kind, TimerKind::Navigate(Route::Settings));
        assert_eq!(state.page.route(), Route::AddData);

        let actions = handle_event(&mut state, AppEvent::TimerFired(*kind));
        assert_eq!(state.page.route(), Route::Settings);
        assert_eq!(state.nav.current_route(), Some(Route::Settings));
        assert!(matches!(
            actions.as_slice(),
            [Action::StartTimer(Timer { kind: TimerKind::FadeIn, .. })]
        ));
    }

    #[test]
    fn test_late_submit_result_is_ignored_on_other_page() {
        let mut state = state();
        handle_event(&mut state, AppEvent::TimerFired(TimerKind::Navigate(Route::ViewData)));
        finish(&mut state, Err(SubmitError::Transport("reset".into())));
        assert!(state.alert.is_none());
    }

    #[test]
    fn test_theme_toggle_persists() {
        let mut state = state();
        state.themes().load(true);
        ctrl(&mut state, 't');
        assert_eq!(state.document_root.mode(), ThemeMode::Light);
        assert_eq!(state.prefs.get(THEME_KEY).as_deref(), Some("light"));
    }

    #[test]
    fn test_settings_team_number_digits_only() {
        let mut state = state();
        handle_event(&mut state, AppEvent::TimerFired(TimerKind::Navigate(Route::Settings)));
        press(&mut state, KeyCode::Down);
        for c in ['4', '-', '6', 'x', '8'] {
            press(&mut state, KeyCode::Char(c));
        }
        assert_eq!(state.prefs.get(TEAM_NUMBER_KEY).as_deref(), Some("468"));
    }

    #[test]
    fn test_view_data_toggles_columns() {
        let mut state = state();
        handle_event(&mut state, AppEvent::TimerFired(TimerKind::Navigate(Route::ViewData)));
        press(&mut state, KeyCode::Char('f'));
        let Page::ViewData(view) = &state.page else {
            panic!("not on the data page");
        };
        assert_eq!(view.column_set, crate::table_filter::ColumnSet::Full);
    }
}
