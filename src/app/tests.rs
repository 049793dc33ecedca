use std::time::{Duration, Instant};

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::layout::Rect;
use tempfile::tempdir;

use crate::calc::{CalcError, CalcOptions};
use crate::prefs::{DARK_MODE_KEY, PreferenceStore};

use super::input::button_message;
use super::{App, Message, Model, ToastLevel, poll_timeout, update};

fn create_test_model() -> Model {
    Model::new(CalcOptions::default(), (40, 30))
}

fn create_full_model() -> Model {
    Model::new(
        CalcOptions {
            supports_parentheses: true,
            supports_memory: true,
            ..CalcOptions::default()
        },
        (40, 30),
    )
}

fn create_test_app() -> App {
    App::new(CalcOptions::default())
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn key_with(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent::new(code, modifiers)
}

fn click(column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

fn run(model: Model, messages: impl IntoIterator<Item = Message>) -> Model {
    messages.into_iter().fold(model, update)
}

fn typed(model: Model, keys: &str) -> Model {
    let app = create_test_app();
    let mut model = model;
    for c in keys.chars() {
        let msg = app
            .handle_key(key(KeyCode::Char(c)), &model)
            .unwrap_or_else(|| panic!("no message for {c:?}"));
        model = update(model, msg);
    }
    model
}

#[test]
fn test_digits_and_operators_build_expression() {
    let model = typed(create_test_model(), "1234+5");
    assert_eq!(model.buffer.raw(), "1234+5");
    assert_eq!(model.buffer.display(), "1.234+5");
}

#[test]
fn test_evaluate_sets_trail_and_result() {
    let model = typed(create_test_model(), "1500*2=");
    assert_eq!(model.buffer.raw(), "3000");
    assert_eq!(model.buffer.display(), "3.000");
    assert_eq!(model.buffer.trail(), Some("1.500*2 = "));
}

#[test]
fn test_comma_is_a_decimal_key() {
    let model = typed(create_test_model(), "2,5*2=");
    assert_eq!(model.buffer.raw(), "5");
}

#[test]
fn test_divide_by_zero_schedules_error_clear() {
    let model = typed(create_test_model(), "8/0=");
    assert_eq!(model.buffer.error(), Some(CalcError::DivisionByZero));
    let deadline = model.error_deadline().expect("error deadline");

    let mut model = model;
    assert!(!model.expire_error(deadline - Duration::from_millis(1)));
    assert!(model.buffer.is_errored());
    assert!(model.expire_error(deadline));
    assert!(!model.buffer.is_errored());
    assert_eq!(model.buffer.raw(), "");
    assert_eq!(model.error_deadline(), None);
}

#[test]
fn test_error_timeout_is_configurable() {
    let model = create_test_model().with_error_timeout(Duration::from_millis(300));
    let before = Instant::now();
    let model = typed(model, "8/0=");
    let deadline = model.error_deadline().expect("error deadline");
    assert!(deadline >= before + Duration::from_millis(300));
    assert!(deadline <= Instant::now() + Duration::from_millis(300));
}

#[test]
fn test_new_error_replaces_pending_deadline() {
    let mut model = typed(create_test_model(), "1.");
    model = update(model, Message::AppendDecimal);
    let first = model.error_deadline().expect("first deadline");

    // Next keystroke clears the error; the one after fails again.
    model = typed(model, "1.");
    assert_eq!(model.error_deadline(), None);
    std::thread::sleep(Duration::from_millis(5));
    model = update(model, Message::AppendDecimal);
    let second = model.error_deadline().expect("second deadline");
    assert!(second > first);
}

#[test]
fn test_resize_keeps_error_deadline() {
    let model = typed(create_test_model(), "8/0=");
    let deadline = model.error_deadline();
    let model = update(model, Message::Resize(100, 40));
    assert_eq!(model.error_deadline(), deadline);
    assert!(model.buffer.is_errored());
}

#[test]
fn test_view_keys_clear_error() {
    for view_key in ["t", "?"] {
        let model = typed(create_test_model(), "8/0=");
        let model = typed(model, view_key);
        assert!(!model.buffer.is_errored(), "{view_key} left the error");
        assert_eq!(model.buffer.raw(), "");
        assert_eq!(model.error_deadline(), None);
    }
}

#[test]
fn test_unmapped_key_dismisses_error() {
    let app = create_test_app();
    let model = typed(create_test_model(), "8/0=");
    let msg = app.handle_key(key(KeyCode::Char('x')), &model);
    assert_eq!(msg, Some(Message::DismissError));
    let model = update(model, Message::DismissError);
    assert!(!model.buffer.is_errored());
    assert_eq!(model.error_deadline(), None);

    assert_eq!(app.handle_key(key(KeyCode::Char('x')), &model), None);
}

#[test]
fn test_next_key_clears_error_first() {
    let model = typed(create_test_model(), "8/0=7");
    assert!(!model.buffer.is_errored());
    assert_eq!(model.buffer.raw(), "7");
    assert_eq!(model.error_deadline(), None);
}

#[test]
fn test_percentage_key() {
    let model = typed(create_test_model(), "50+10%");
    assert_eq!(model.buffer.raw(), "55");
}

#[test]
fn test_toggle_sign_key_twice() {
    let model = typed(create_test_model(), "5nn");
    assert_eq!(model.buffer.raw(), "5");
}

#[test]
fn test_alt_shortcuts() {
    let app = create_test_app();
    let model = typed(create_test_model(), "12");
    assert_eq!(
        app.handle_key(key_with(KeyCode::Char('n'), KeyModifiers::ALT), &model),
        Some(Message::ToggleSign)
    );
    assert_eq!(
        app.handle_key(key_with(KeyCode::Char('c'), KeyModifiers::ALT), &model),
        Some(Message::Clear)
    );
    assert_eq!(
        app.handle_key(key_with(KeyCode::Char('C'), KeyModifiers::ALT | KeyModifiers::SHIFT), &model),
        Some(Message::Clear)
    );
}

#[test]
fn test_special_keys() {
    let app = create_test_app();
    let model = create_test_model();
    assert_eq!(app.handle_key(key(KeyCode::Enter), &model), Some(Message::Evaluate));
    assert_eq!(app.handle_key(key(KeyCode::Backspace), &model), Some(Message::DeleteLast));
    assert_eq!(app.handle_key(key(KeyCode::Esc), &model), Some(Message::Clear));
    assert_eq!(app.handle_key(key(KeyCode::Delete), &model), Some(Message::Clear));
    assert_eq!(app.handle_key(key(KeyCode::F(1)), &model), Some(Message::ToggleGuide));
    assert_eq!(app.handle_key(key(KeyCode::Char('t')), &model), Some(Message::ToggleTheme));
    assert_eq!(app.handle_key(key(KeyCode::Char('q')), &model), Some(Message::Quit));
    assert_eq!(
        app.handle_key(key_with(KeyCode::Char('c'), KeyModifiers::CONTROL), &model),
        Some(Message::Quit)
    );
    assert_eq!(app.handle_key(key(KeyCode::Char('x')), &model), None);
}

#[test]
fn test_key_release_is_ignored() {
    let app = create_test_app();
    let release = KeyEvent {
        code: KeyCode::Char('5'),
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Release,
        state: KeyEventState::NONE,
    };
    assert_eq!(app.handle_key(release, &create_test_model()), None);
}

#[test]
fn test_variant_keys_only_when_enabled() {
    let app = create_test_app();
    let basic = create_test_model();
    assert_eq!(app.handle_key(key(KeyCode::Char('(')), &basic), None);
    assert_eq!(app.handle_key(key(KeyCode::Char('m')), &basic), None);

    let full = create_full_model();
    assert_eq!(
        app.handle_key(key(KeyCode::Char('(')), &full),
        Some(Message::AppendOperator('('))
    );
    assert_eq!(app.handle_key(key(KeyCode::Char('m')), &full), Some(Message::MemoryAdd));
    assert_eq!(app.handle_key(key(KeyCode::Char('M')), &full), Some(Message::MemorySubtract));
    assert_eq!(app.handle_key(key(KeyCode::Char('r')), &full), Some(Message::MemoryRecall));
    assert_eq!(app.handle_key(key(KeyCode::Char('R')), &full), Some(Message::MemoryClear));

    let no_percent = Model::new(
        CalcOptions {
            supports_percentage: false,
            ..CalcOptions::default()
        },
        (40, 30),
    );
    assert_eq!(app.handle_key(key(KeyCode::Char('%')), &no_percent), None);
}

#[test]
fn test_parentheses_expression() {
    let model = typed(create_full_model(), "2*(3+4)=");
    assert_eq!(model.buffer.raw(), "14");
}

#[test]
fn test_memory_round_trip() {
    let model = typed(create_full_model(), "12m");
    assert_eq!(model.memory.value(), Some(12.0));
    let model = run(model, [Message::Clear]);
    let model = typed(model, "3*r=");
    assert_eq!(model.buffer.raw(), "36");
    let model = typed(model, "R");
    assert!(model.memory.is_empty());
}

#[test]
fn test_memory_recall_when_empty_shows_error() {
    let model = typed(create_full_model(), "r");
    assert_eq!(model.buffer.error(), Some(CalcError::MemoryOperationFailed));
    assert!(model.error_deadline().is_some());
}

#[test]
fn test_guide_toggles_and_any_key_hides_it() {
    let app = create_test_app();
    let model = update(create_test_model(), Message::ToggleGuide);
    assert!(model.guide_visible);
    assert_eq!(app.handle_key(key(KeyCode::Char('5')), &model), Some(Message::HideGuide));
    assert_eq!(
        app.handle_key(key_with(KeyCode::Char('c'), KeyModifiers::CONTROL), &model),
        Some(Message::Quit)
    );
    let model = update(model, Message::HideGuide);
    assert!(!model.guide_visible);
}

#[test]
fn test_click_outside_guide_hides_it() {
    let app = create_test_app();
    let model = update(create_test_model(), Message::ToggleGuide);
    let area = Rect::new(0, 0, model.terminal_size.0, model.terminal_size.1);
    let popup = crate::ui::guide_rect(&model, area);

    assert_eq!(app.handle_mouse(click(popup.x + 2, popup.y + 1), &model), None);
    assert_eq!(app.handle_mouse(click(0, 0), &model), Some(Message::HideGuide));
}

#[test]
fn test_click_on_keypad_buttons() {
    let app = create_test_app();
    let model = create_test_model();
    let area = Rect::new(0, 0, model.terminal_size.0, model.terminal_size.1);
    let [_, keypad, _] = crate::ui::split_frame(area);

    for (cell, button) in crate::ui::keypad::keypad_cells(keypad, model.buffer.options()) {
        let msg = app.handle_mouse(click(cell.x + 1, cell.y + 1), &model);
        assert_eq!(msg, Some(button_message(button)), "click on {}", button.label());
    }
}

#[test]
fn test_clicks_compute_result() {
    let app = create_test_app();
    let mut model = create_test_model();
    let area = Rect::new(0, 0, model.terminal_size.0, model.terminal_size.1);
    let [_, keypad, _] = crate::ui::split_frame(area);
    let cells = crate::ui::keypad::keypad_cells(keypad, model.buffer.options());

    for label in ["7", "*", "6", "="] {
        let (cell, _) = cells
            .iter()
            .find(|(_, button)| button.label() == label)
            .copied()
            .expect("button on keypad");
        let msg = app
            .handle_mouse(click(cell.x + 1, cell.y + 1), &model)
            .expect("button message");
        model = update(model, msg);
    }
    assert_eq!(model.buffer.raw(), "42");
}

#[test]
fn test_mouse_moves_are_ignored() {
    let app = create_test_app();
    let model = create_test_model();
    let moved = MouseEvent {
        kind: MouseEventKind::Moved,
        ..click(5, 10)
    };
    assert_eq!(app.handle_mouse(moved, &model), None);
}

#[test]
fn test_resize_event_updates_model() {
    let app = create_test_app();
    let model = create_test_model();
    let msg = app.handle_event(Event::Resize(100, 50), &model);
    assert_eq!(msg, Some(Message::Resize(100, 50)));
    let model = update(model, Message::Resize(100, 50));
    assert_eq!(model.terminal_size, (100, 50));
}

#[test]
fn test_quit_sets_flag() {
    let model = update(create_test_model(), Message::Quit);
    assert!(model.should_quit);
}

#[test]
fn test_toggle_theme_persists_preference() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("prefs.json");
    let mut app = create_test_app().with_preferences(PreferenceStore::load(&path).unwrap());
    let mut model = app.initial_model((40, 30));
    assert!(model.dark_mode);

    model = update(model, Message::ToggleTheme);
    app.handle_message_side_effects(&mut model, &Message::ToggleTheme);
    assert!(!model.dark_mode);
    assert_eq!(model.active_toast(), Some(("Light mode", ToastLevel::Info)));

    let stored = PreferenceStore::load(&path).unwrap();
    assert_eq!(stored.get_bool(DARK_MODE_KEY), Some(false));
}

#[test]
fn test_toggle_theme_save_failure_warns() {
    let dir = tempdir().unwrap();
    // A plain file where the preference directory should be makes the write fail.
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "").unwrap();
    let store = PreferenceStore::load(blocker.join("prefs.json")).unwrap();

    let mut app = create_test_app().with_preferences(store);
    let mut model = app.initial_model((40, 30));
    model = update(model, Message::ToggleTheme);
    app.handle_message_side_effects(&mut model, &Message::ToggleTheme);

    let (message, level) = model.active_toast().expect("toast");
    assert_eq!(level, ToastLevel::Warning);
    assert!(message.starts_with("Theme not saved"));
    assert!(!model.dark_mode);
}

#[test]
fn test_toggle_theme_without_store_still_toggles() {
    let mut app = create_test_app();
    let mut model = app.initial_model((40, 30));
    model = update(model, Message::ToggleTheme);
    app.handle_message_side_effects(&mut model, &Message::ToggleTheme);
    assert!(!model.dark_mode);
    assert_eq!(model.active_toast(), Some(("Light mode", ToastLevel::Info)));
}

#[test]
fn test_initial_model_uses_app_settings() {
    let app = App::new(CalcOptions {
        supports_memory: true,
        ..CalcOptions::default()
    })
    .with_dark_mode(false)
    .with_error_timeout(Duration::from_millis(900));
    let model = app.initial_model((60, 20));
    assert!(!model.dark_mode);
    assert!(model.buffer.options().supports_memory);
    assert_eq!(model.error_timeout(), Duration::from_millis(900));
    assert_eq!(model.terminal_size, (60, 20));
}

#[test]
fn test_toast_expires() {
    let mut model = create_test_model();
    model.show_toast(ToastLevel::Info, "hello");
    assert!(!model.expire_toast(Instant::now()));
    assert!(model.expire_toast(Instant::now() + Duration::from_secs(10)));
    assert_eq!(model.active_toast(), None);
}

#[test]
fn test_next_deadline_is_earliest_timer() {
    let mut model = typed(
        create_test_model().with_error_timeout(Duration::from_secs(60)),
        "8/0=",
    );
    let error_deadline = model.error_deadline().expect("error deadline");
    assert_eq!(model.next_deadline(), Some(error_deadline));
    model.show_toast(ToastLevel::Info, "soon");
    assert!(model.next_deadline().expect("deadline") < error_deadline);
}

#[test]
fn test_poll_timeout_tracks_deadline() {
    let now = Instant::now();
    assert_eq!(poll_timeout(None, now), Duration::from_millis(250));
    assert_eq!(
        poll_timeout(Some(now + Duration::from_millis(40)), now),
        Duration::from_millis(40)
    );
    assert_eq!(
        poll_timeout(Some(now + Duration::from_secs(5)), now),
        Duration::from_millis(250)
    );
    assert_eq!(poll_timeout(Some(now - Duration::from_millis(5)), now), Duration::ZERO);
}
