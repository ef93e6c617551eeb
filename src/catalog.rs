//! Default shortcut table and display helpers.
//!
//! The catalog is a static factory: given the application's handler slots
//! it produces the default configs, ready for `ShortcutCore::register`.
//! Display formatting here is stable and covered by golden tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::{ActionFn, Category, ShortcutConfig, ShortcutInfo};
use crate::context::Context;
use crate::handlers::{HandlerFn, TodoHandlers};
use crate::key;

fn action(handler: &HandlerFn) -> ActionFn {
    let handler = handler.clone();
    Arc::new(move |_event, _contexts| Ok(handler()))
}

/// The default shortcut table for the todo application.
pub fn default_shortcuts(handlers: &TodoHandlers) -> Vec<ShortcutConfig> {
    vec![
        ShortcutConfig::new("n", action(&handlers.focus_new_todo))
            .ctrl()
            .description("Focus the new-todo input")
            .category(Category::Navigation),
        ShortcutConfig::new("f", action(&handlers.focus_search))
            .ctrl()
            .description("Focus the search field")
            .category(Category::Navigation),
        ShortcutConfig::new("/", action(&handlers.focus_search))
            .description("Focus the search field")
            .category(Category::Navigation),
        ShortcutConfig::new("Enter", action(&handlers.add_todo))
            .ctrl()
            .description("Add the typed todo")
            .category(Category::Todos),
        ShortcutConfig::new("t", action(&handlers.toggle_first_todo))
            .ctrl()
            .description("Toggle the first todo")
            .category(Category::Todos),
        ShortcutConfig::new("d", action(&handlers.delete_first_todo))
            .ctrl()
            .description("Delete the first todo")
            .category(Category::Todos),
        ShortcutConfig::new("Escape", action(&handlers.cancel_edit))
            .context(Context::Editing)
            .description("Cancel the current edit")
            .category(Category::Editing),
        ShortcutConfig::new("s", action(&handlers.save_edit))
            .ctrl()
            .context(Context::Editing)
            .description("Save the current edit")
            .category(Category::Editing),
        ShortcutConfig::new("h", action(&handlers.show_help))
            .ctrl()
            .description("Show keyboard shortcuts")
            .category(Category::Help),
        ShortcutConfig::new("m", action(&handlers.toggle_theme))
            .ctrl()
            .description("Toggle the theme")
            .category(Category::View),
        ShortcutConfig::new("a", action(&handlers.select_all))
            .ctrl()
            .description("Select all todos (visual)")
            .category(Category::View),
        ShortcutConfig::new("c", action(&handlers.clear_completed))
            .ctrl()
            .shift()
            .description("Clear completed todos")
            .category(Category::Todos),
    ]
}

/// Group introspection snapshots by category, preserving registration
/// order within each group.
pub fn group_by_category(
    shortcuts: impl IntoIterator<Item = ShortcutInfo>,
) -> BTreeMap<Category, Vec<ShortcutInfo>> {
    let mut grouped: BTreeMap<Category, Vec<ShortcutInfo>> = BTreeMap::new();
    for info in shortcuts {
        grouped.entry(info.category).or_default().push(info);
    }
    grouped
}

/// User-facing display string for a config's chord, modifiers in fixed
/// `Ctrl+Alt+Shift+Meta` order with special-key glyphs.
pub fn format_key_combo(config: &ShortcutConfig) -> String {
    config.combo()
}

/// Same formatting from raw parts, for callers without a full config.
pub fn format_key_combo_parts(
    key: &str,
    ctrl: bool,
    alt: bool,
    shift: bool,
    meta: bool,
) -> String {
    key::format_combo(ctrl, alt, shift, meta, key)
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
