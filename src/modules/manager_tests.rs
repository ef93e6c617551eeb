use super::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::config::{ActionFn, Category};
use crate::context::Context;
use crate::dispatcher::ShortcutCore;
use crate::event::KeyEvent;
use crate::modules::{
    ActionModule, ContextAwareModule, DoFn, FocusHost, FocusOptions, NavigationModule, Scheduler,
    UndoFn,
};

fn action() -> ActionFn {
    Arc::new(|_event, _contexts| Ok(true))
}

fn event(key: &str) -> KeyEvent {
    KeyEvent::new(key)
}

// ----------------------------------------------------------------------
// Undoable actions
// ----------------------------------------------------------------------

/// Do/undo pair over a shared counter: do increments, undo decrements.
fn counter_pair(counter: Arc<AtomicUsize>) -> (DoFn, UndoFn) {
    let up = counter.clone();
    let down = counter;
    (
        Arc::new(move || {
            up.fetch_add(1, Ordering::SeqCst);
            Ok(true)
        }),
        Arc::new(move || {
            down.fetch_sub(1, Ordering::SeqCst);
            true
        }),
    )
}

#[test]
fn undo_reverses_the_latest_action_once() {
    let counter = Arc::new(AtomicUsize::new(0));
    let module = ActionModule::new();
    let (do_fn, undo_fn) = counter_pair(counter.clone());
    let wrapped = module.create_undoable_action(do_fn, undo_fn, "increment");

    wrapped(&event("t"), &[]).unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), 1);

    assert!(module.undo());
    assert_eq!(counter.load(Ordering::SeqCst), 0);
    // Nothing left to undo.
    assert!(!module.undo());
    assert_eq!(counter.load(Ordering::SeqCst), 0);
}

#[test]
fn redo_reapplies_and_is_cleared_by_a_new_action() {
    let counter = Arc::new(AtomicUsize::new(0));
    let module = ActionModule::new();
    let (do_fn, undo_fn) = counter_pair(counter.clone());
    let wrapped = module.create_undoable_action(do_fn, undo_fn, "increment");

    wrapped(&event("t"), &[]).unwrap();
    assert!(module.undo());
    assert!(module.redo());
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    // The redo landed back on the undo stack.
    assert!(module.undo());
    assert_eq!(counter.load(Ordering::SeqCst), 0);

    // A fresh action empties the redo stack.
    wrapped(&event("t"), &[]).unwrap();
    assert!(!module.redo());
}

#[test]
fn failed_actions_never_reach_the_undo_stack() {
    let module = ActionModule::new();
    let noop_undo: UndoFn = Arc::new(|| true);

    let failing = module.create_undoable_action(
        Arc::new(|| anyhow::bail!("no such todo")),
        noop_undo.clone(),
        "delete",
    );
    let ineffective =
        module.create_undoable_action(Arc::new(|| Ok(false)), noop_undo, "toggle");

    assert!(failing(&event("d"), &[]).is_err());
    assert!(!ineffective(&event("t"), &[]).unwrap());
    assert!(!module.undo());

    let stats = module.action_stats();
    assert_eq!(stats.total_actions, 2);
    assert_eq!(stats.successful_actions, 0);
    assert_eq!(stats.failed_actions, 2);
    assert_eq!(stats.success_rate, 0.0);
}

#[test]
fn undo_stack_is_bounded() {
    let counter = Arc::new(AtomicUsize::new(0));
    let module = ActionModule::new();
    let (do_fn, undo_fn) = counter_pair(counter.clone());
    let wrapped = module.create_undoable_action(do_fn, undo_fn, "increment");

    for _ in 0..30 {
        wrapped(&event("t"), &[]).unwrap();
    }
    assert_eq!(module.action_stats().undo_depth, 25);

    let mut undone = 0;
    while module.undo() {
        undone += 1;
    }
    assert_eq!(undone, 25);
    assert_eq!(counter.load(Ordering::SeqCst), 5);
}

#[test]
fn undo_handle_outlives_the_boxed_module() {
    let counter = Arc::new(AtomicUsize::new(0));
    let module = ActionModule::new();
    let (do_fn, undo_fn) = counter_pair(counter.clone());
    let wrapped = module.create_undoable_action(do_fn, undo_fn, "increment");
    let handle = module.undo_handle();

    let mut manager = ModuleManager::new();
    assert!(manager.register_module(Box::new(module)));

    wrapped(&event("t"), &[]).unwrap();
    assert!(handle.undo());
    assert_eq!(counter.load(Ordering::SeqCst), 0);
    assert_eq!(handle.stats().successful_actions, 1);
}

// ----------------------------------------------------------------------
// Navigation
// ----------------------------------------------------------------------

/// Focus host double: knows a fixed set of selectors and records calls.
struct FakeHost {
    known: Vec<String>,
    focused: Mutex<Vec<(String, bool)>>,
    flashed: AtomicUsize,
}

impl FakeHost {
    fn new(known: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            known: known.iter().map(|s| s.to_string()).collect(),
            focused: Mutex::new(Vec::new()),
            flashed: AtomicUsize::new(0),
        })
    }
}

impl FocusHost for FakeHost {
    fn focus(&self, selector: &str, select_text: bool) -> bool {
        if !self.known.iter().any(|s| s == selector) {
            return false;
        }
        self.focused
            .lock()
            .unwrap()
            .push((selector.to_string(), select_text));
        true
    }

    fn flash(&self, _selector: &str) {
        self.flashed.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn focus_action_moves_focus_and_records_history() {
    let host = FakeHost::new(&["#new-todo"]);
    let mut module = NavigationModule::new(host.clone());
    module.add_focus_target(
        "new-todo",
        "#new-todo",
        FocusOptions {
            select_text: true,
            visual_feedback: false,
        },
    );

    let focus = module.create_focus_action("new-todo").unwrap();
    assert!(focus(&event("n"), &[]).unwrap());

    assert_eq!(
        host.focused.lock().unwrap().as_slice(),
        [("#new-todo".to_string(), true)]
    );
    let history = module.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].target, "new-todo");
    assert_eq!(module.navigation_stats().total, 1);
}

#[test]
fn unknown_focus_target_yields_no_action() {
    let module = NavigationModule::new(FakeHost::new(&[]));
    assert!(module.create_focus_action("missing").is_none());
}

#[test]
fn missing_element_reports_false_and_records_nothing() {
    let host = FakeHost::new(&[]);
    let mut module = NavigationModule::new(host);
    module.add_focus_target("search", "#search", FocusOptions::default());

    let focus = module.create_focus_action("search").unwrap();
    assert!(!focus(&event("f"), &[]).unwrap());
    assert!(module.history().is_empty());
    assert_eq!(module.navigation_stats().total, 0);
}

#[test]
fn visual_feedback_runs_through_the_scheduler() {
    let host = FakeHost::new(&["#search"]);
    let mut module = NavigationModule::new(host.clone());
    module.add_focus_target(
        "search",
        "#search",
        FocusOptions {
            select_text: false,
            visual_feedback: true,
        },
    );

    let focus = module.create_focus_action("search").unwrap();
    focus(&event("f"), &[]).unwrap();
    // InlineScheduler runs the flash before the action returns.
    assert_eq!(host.flashed.load(Ordering::SeqCst), 1);
}

#[test]
fn navigation_history_is_bounded_but_totals_keep_counting() {
    let host = FakeHost::new(&["#new-todo"]);
    let mut module = NavigationModule::new(host);
    module.add_focus_target("new-todo", "#new-todo", FocusOptions::default());

    let focus = module.create_focus_action("new-todo").unwrap();
    for _ in 0..60 {
        focus(&event("n"), &[]).unwrap();
    }

    assert_eq!(module.history().len(), 50);
    let stats = module.navigation_stats();
    assert_eq!(stats.total, 60);
    assert_eq!(stats.per_target["new-todo"], 50);
}

#[test]
fn teardown_cancels_pending_feedback() {
    struct CancellingScheduler {
        cancelled: Arc<AtomicBool>,
    }
    impl Scheduler for CancellingScheduler {
        fn schedule(&self, _task: Box<dyn FnOnce() + Send>) {}
        fn cancel_all(&self) {
            self.cancelled.store(true, Ordering::SeqCst);
        }
    }

    let cancelled = Arc::new(AtomicBool::new(false));
    let module = NavigationModule::with_scheduler(
        FakeHost::new(&[]),
        Arc::new(CancellingScheduler {
            cancelled: cancelled.clone(),
        }),
    );
    drop(module);
    assert!(cancelled.load(Ordering::SeqCst));
}

// ----------------------------------------------------------------------
// Context-aware branching
// ----------------------------------------------------------------------

fn branch(hits: Arc<AtomicUsize>) -> ActionFn {
    Arc::new(move |_event, _contexts| {
        hits.fetch_add(1, Ordering::SeqCst);
        Ok(true)
    })
}

#[test]
fn most_specific_branch_wins() {
    let editing_hits = Arc::new(AtomicUsize::new(0));
    let global_hits = Arc::new(AtomicUsize::new(0));

    let module = ContextAwareModule::new();
    let mut branches = HashMap::new();
    branches.insert(Context::Editing, branch(editing_hits.clone()));
    branches.insert(Context::Global, branch(global_hits.clone()));
    let action = module.create_context_aware_action(branches);

    // Contexts arrive ordered most specific first, global appended.
    action(&event("Escape"), &[Context::Editing, Context::Global]).unwrap();
    assert_eq!(editing_hits.load(Ordering::SeqCst), 1);
    assert_eq!(global_hits.load(Ordering::SeqCst), 0);

    action(&event("Escape"), &[Context::Global]).unwrap();
    assert_eq!(global_hits.load(Ordering::SeqCst), 1);
}

#[test]
fn global_branch_is_the_fallback() {
    let global_hits = Arc::new(AtomicUsize::new(0));
    let module = ContextAwareModule::new();
    let mut branches = HashMap::new();
    branches.insert(Context::Global, branch(global_hits.clone()));
    let action = module.create_context_aware_action(branches);

    // No listed context carries a branch; global catches it.
    action(&event("x"), &[Context::Modal]).unwrap();
    assert_eq!(global_hits.load(Ordering::SeqCst), 1);
}

#[test]
fn no_branch_is_a_quiet_noop() {
    let module = ContextAwareModule::new();
    let action = module.create_context_aware_action(HashMap::new());

    assert!(!action(&event("x"), &[Context::Editing]).unwrap());

    let log = module.learning_log();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].branch, "noop");
    assert_eq!(module.context_stats().per_branch["noop"], 1);
}

#[test]
fn branch_choices_are_logged() {
    let module = ContextAwareModule::new();
    let mut branches = HashMap::new();
    branches.insert(Context::Editing, action());
    branches.insert(Context::Global, action());
    let aware = module.create_context_aware_action(branches);

    aware(&event("s"), &[Context::Editing, Context::Global]).unwrap();
    aware(&event("s"), &[Context::Global]).unwrap();
    aware(&event("s"), &[Context::Global]).unwrap();

    let stats = module.context_stats();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.per_branch["editing"], 1);
    assert_eq!(stats.per_branch["global"], 2);
}

// ----------------------------------------------------------------------
// Manager
// ----------------------------------------------------------------------

#[test]
fn duplicate_module_names_are_rejected() {
    let mut manager = ModuleManager::new();
    assert!(manager.register_module(Box::new(ActionModule::new())));
    assert!(!manager.register_module(Box::new(ActionModule::new())));
    assert_eq!(manager.module_names(), ["action"]);
}

#[test]
fn all_shortcuts_skips_disabled_modules() {
    let mut nav = NavigationModule::new(FakeHost::new(&[]));
    nav.register_shortcut(ShortcutConfig::new("n", action()).ctrl());
    let mut undoable = ActionModule::new();
    undoable.register_shortcut(ShortcutConfig::new("t", action()).ctrl());

    let mut manager = ModuleManager::new();
    manager.register_module(Box::new(nav));
    manager.register_module(Box::new(undoable));
    assert_eq!(manager.all_shortcuts().len(), 2);

    assert!(manager.set_module_enabled("navigation", false));
    let shortcuts = manager.all_shortcuts();
    assert_eq!(shortcuts.len(), 1);
    assert_eq!(shortcuts[0].module.as_deref(), Some("action"));

    assert!(!manager.set_module_enabled("no-such-module", false));
}

#[test]
fn plugins_apply_in_registration_order() {
    let mut nav = NavigationModule::new(FakeHost::new(&[]));
    nav.register_shortcut(ShortcutConfig::new("n", action()).ctrl());

    let mut manager = ModuleManager::new();
    manager.register_module(Box::new(nav));
    manager.register_plugin(
        "describe",
        Arc::new(|config| config.description("first")),
    );
    manager.register_plugin(
        "redescribe",
        Arc::new(|config| {
            let text = format!("{}, then second", config.description);
            config.description(text)
        }),
    );

    let shortcuts = manager.all_shortcuts();
    assert_eq!(shortcuts[0].description, "first, then second");
}

#[test]
fn stamped_shortcuts_carry_the_module_name() {
    let mut nav = NavigationModule::new(FakeHost::new(&[]));
    nav.register_shortcut(ShortcutConfig::new("n", action()).ctrl().category(Category::Navigation));

    let shortcuts = nav.all_shortcuts();
    assert_eq!(shortcuts[0].module.as_deref(), Some("navigation"));
    assert!(shortcuts[0].module_enabled);
}

#[test]
fn all_module_stats_reports_every_module() {
    let mut manager = ModuleManager::new();
    manager.register_module(Box::new(NavigationModule::new(FakeHost::new(&[]))));
    manager.register_module(Box::new(ActionModule::new()));
    manager.register_module(Box::new(ContextAwareModule::new()));

    let stats = manager.all_module_stats();
    assert_eq!(stats.len(), 3);
    assert_eq!(stats["navigation"]["kind"], "navigation");
    assert_eq!(stats["action"]["kind"], "action");
    assert_eq!(stats["context-aware"]["kind"], "context-aware");
}

#[test]
fn install_modules_registers_into_the_core() {
    let host = FakeHost::new(&["#new-todo"]);
    let mut nav = NavigationModule::new(host);
    nav.add_focus_target("new-todo", "#new-todo", FocusOptions::default());
    let focus = nav.create_focus_action("new-todo").unwrap();
    nav.register_shortcut(ShortcutConfig::new("n", focus).ctrl());

    let mut manager = ModuleManager::new();
    manager.register_module(Box::new(nav));

    let mut core = ShortcutCore::new();
    let outcomes = core.install_modules(&manager);
    assert!(outcomes.iter().all(|outcome| outcome.is_ok()));

    assert!(core.handle(&KeyEvent::new("n").ctrl()).matched);

    // Module-level disable keeps the entry but stops matching.
    assert_eq!(core.set_module_enabled("navigation", false), 1);
    assert!(!core.handle(&KeyEvent::new("n").ctrl()).matched);
    assert_eq!(core.list_all().len(), 1);
}
