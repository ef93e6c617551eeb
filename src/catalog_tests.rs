use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::dispatcher::ShortcutCore;
use crate::event::KeyEvent;

fn counting_handler(counter: Arc<AtomicUsize>) -> HandlerFn {
    Arc::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        true
    })
}

#[test]
fn combo_formatting_golden() {
    assert_eq!(format_key_combo_parts("s", true, false, false, false), "Ctrl+s");
    assert_eq!(format_key_combo_parts("Enter", false, false, false, false), "↵");
    assert_eq!(
        format_key_combo_parts("Delete", true, false, true, false),
        "Ctrl+Shift+Del"
    );
    assert_eq!(
        format_key_combo_parts("k", true, true, true, true),
        "Ctrl+Alt+Shift+Meta+k"
    );
    assert_eq!(format_key_combo_parts(" ", false, false, false, false), "Space");
    assert_eq!(format_key_combo_parts("Escape", false, false, false, false), "Esc");
    assert_eq!(format_key_combo_parts("Backspace", false, false, false, false), "⌫");
    assert_eq!(format_key_combo_parts("ArrowUp", false, false, false, false), "↑");
}

#[test]
fn format_key_combo_matches_the_parts_helper() {
    let config = ShortcutConfig::new("c", Arc::new(|_e, _c| Ok(true)))
        .ctrl()
        .shift();
    assert_eq!(format_key_combo(&config), "Ctrl+Shift+c");
}

#[test]
fn default_table_registers_cleanly() {
    let mut core = ShortcutCore::new();
    let shortcuts = default_shortcuts(&TodoHandlers::noop());
    assert_eq!(shortcuts.len(), 12);
    for config in shortcuts {
        let outcome = core.register(config);
        assert!(outcome.is_ok(), "rejected: {:?}", outcome.errors);
    }
    assert_eq!(core.list_all().len(), 12);
}

#[test]
fn default_table_routes_to_handlers() {
    let new_todo = Arc::new(AtomicUsize::new(0));
    let save = Arc::new(AtomicUsize::new(0));

    let mut handlers = TodoHandlers::noop();
    handlers.focus_new_todo = counting_handler(new_todo.clone());
    handlers.save_edit = counting_handler(save.clone());

    let mut core = ShortcutCore::new();
    for config in default_shortcuts(&handlers) {
        core.register(config);
    }

    assert!(core.handle(&KeyEvent::new("n").ctrl()).matched);
    assert_eq!(new_todo.load(Ordering::SeqCst), 1);

    // Ctrl+S is bound in the editing context only.
    assert!(!core.handle(&KeyEvent::new("s").ctrl()).matched);
    core.set_context_probe(Arc::new(|| vec![Context::Editing]));
    assert!(core.handle(&KeyEvent::new("s").ctrl()).matched);
    assert_eq!(save.load(Ordering::SeqCst), 1);
}

#[test]
fn slash_matches_without_modifiers() {
    let search = Arc::new(AtomicUsize::new(0));
    let mut handlers = TodoHandlers::noop();
    handlers.focus_search = counting_handler(search.clone());

    let mut core = ShortcutCore::new();
    for config in default_shortcuts(&handlers) {
        core.register(config);
    }

    assert!(core.handle(&KeyEvent::new("/")).matched);
    // '/' is typed with shift on some layouts; the binding still fires.
    assert!(core.handle(&KeyEvent::new("/").shift()).matched);
    assert_eq!(search.load(Ordering::SeqCst), 2);
}

#[test]
fn grouping_preserves_order_within_a_category() {
    let mut core = ShortcutCore::new();
    for config in default_shortcuts(&TodoHandlers::noop()) {
        core.register(config);
    }

    let grouped = core.list_by_category();
    assert_eq!(grouped[&Category::Navigation].len(), 3);
    assert_eq!(grouped[&Category::Todos].len(), 4);
    assert_eq!(grouped[&Category::Editing].len(), 2);
    assert_eq!(grouped[&Category::View].len(), 2);
    assert_eq!(grouped[&Category::Help].len(), 1);

    let navigation: Vec<&str> = grouped[&Category::Navigation]
        .iter()
        .map(|info| info.combo.as_str())
        .collect();
    assert_eq!(navigation, ["Ctrl+n", "Ctrl+f", "/"]);
}

#[test]
fn handler_result_flows_into_the_action() {
    let handlers = TodoHandlers::noop();
    let configs = default_shortcuts(&handlers);
    let event = KeyEvent::new("n").ctrl();
    // Noop handlers report "did nothing"; that is still a successful dispatch.
    let handled = (configs[0].action)(&event, &[]).unwrap();
    assert!(!handled);
}
