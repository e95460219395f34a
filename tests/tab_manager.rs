//! Tab manager tests: invocation order, restore rules and document tabs

mod common;

use std::cell::Cell;
use std::rc::Rc;

use common::{floating_area, headless, live_tab_types, main_layout, register_counting, register_panels};
use dockspace::config::FALLBACK_WINDOW_SIZE;
use dockspace::geometry::Vec2;
use dockspace::layout::{Area, Layout, Stack, TabId, TabState, WindowPlacement};
use dockspace::search::{LiveTabSearch, RequireClosedTab};
use dockspace::tab::DockTab;
use dockspace::tab_manager::ManagerId;
use dockspace::window::WindowProvider;

const GLOBAL: ManagerId = ManagerId::GLOBAL;

// ========================================================================
// Invocation
// ========================================================================

#[test]
fn test_invoke_twice_returns_same_tab() {
    let (mut global, root) = headless();
    register_panels(&mut global, GLOBAL, &["Outliner", "Details"]);
    let spawns = register_counting(&mut global, GLOBAL, "Log");
    global.restore_from(GLOBAL, main_layout(), Some(root), false);

    let first = global.invoke_tab(GLOBAL, "Log");
    let second = global.invoke_tab(GLOBAL, "Log");

    assert_eq!(first, second);
    assert_eq!(spawns.get(), 1);
}

#[test]
fn test_invoke_reopens_closed_entry_in_place() {
    let (mut global, root) = headless();
    register_panels(&mut global, GLOBAL, &["Outliner", "Details", "Log"]);
    global.restore_from(GLOBAL, main_layout(), Some(root), false);

    let details = global.invoke_tab(GLOBAL, "Details");
    let log = global.invoke_tab(GLOBAL, "Log");

    let stack = global.tab(log).and_then(|tab| tab.parent_stack());
    assert_eq!(stack, global.tab(details).and_then(|tab| tab.parent_stack()));
    assert_eq!(global.window_of_tab(log), Some(root));

    // The closed entry was reused, not duplicated
    let entries = global.tree().stack(stack.unwrap()).unwrap().entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(global.tree().stack(stack.unwrap()).unwrap().foreground(), Some(log));
}

#[test]
fn test_live_instance_wins_and_collapsed_area_stays_collapsed() {
    let (mut global, root) = headless();
    let spawns = register_counting(&mut global, GLOBAL, "Log");

    let layout = Layout::new("Main")
        .add_area(Area::primary().split(Stack::new().add_tab("Log", TabState::Opened)))
        .add_area(floating_area("Log", TabState::Closed));
    global.restore_from(GLOBAL, layout, Some(root), false);
    assert_eq!(global.manager(GLOBAL).unwrap().collapsed_areas().len(), 1);

    let handle = global.invoke_tab(GLOBAL, "Log");

    assert_eq!(spawns.get(), 1);
    assert_eq!(global.window_of_tab(handle), Some(root));
    assert_eq!(global.manager(GLOBAL).unwrap().collapsed_areas().len(), 1);
    assert_eq!(global.windows().live_windows().len(), 1);
}

#[test]
fn test_collapsed_area_is_restored_on_invoke() {
    let (mut global, root) = headless();
    register_panels(&mut global, GLOBAL, &["Outliner", "Details", "Log"]);

    let layout = Layout::new("Main")
        .add_area(Area::primary().split(Stack::new().add_tab("Outliner", TabState::Opened)))
        .add_area(floating_area("Log", TabState::Closed));
    global.restore_from(GLOBAL, layout, Some(root), false);

    let handle = global.invoke_tab(GLOBAL, "Log");

    let window = global.window_of_tab(handle).unwrap();
    assert_ne!(window, root);
    assert_eq!(global.windows().parent(window), Some(root));
    assert!(global.manager(GLOBAL).unwrap().collapsed_areas().is_empty());
    assert_eq!(global.manager(GLOBAL).unwrap().dock_areas().len(), 2);
}

#[test]
fn test_fallback_creates_one_window_one_stack_one_tab() {
    let (mut global, root) = headless();
    register_panels(&mut global, GLOBAL, &["Log"]);

    let handle = global.invoke_tab(GLOBAL, "Log");

    let areas = global.manager(GLOBAL).unwrap().dock_areas().to_vec();
    assert_eq!(areas.len(), 1);
    assert_eq!(global.tree().stacks_under(areas[0]).len(), 1);
    assert_eq!(global.tree().live_tabs_under(areas[0]), vec![handle]);

    let windows = global.windows().live_windows();
    assert_eq!(windows.len(), 2);
    let window = global.window_of_tab(handle).unwrap();
    assert_ne!(window, root);
    assert_eq!(global.windows().screen_rect(window).unwrap().size(), FALLBACK_WINDOW_SIZE);
}

#[test]
fn test_fallback_uses_configured_window_size() {
    let (mut global, _root) = headless();
    register_panels(&mut global, GLOBAL, &["Log"]);
    global.set_default_tab_window_size("Log", Vec2::new(300.0, 200.0));

    let handle = global.invoke_tab(GLOBAL, "Log");

    let window = global.window_of_tab(handle).unwrap();
    assert_eq!(
        global.windows().screen_rect(window).unwrap().size(),
        Vec2::new(300.0, 200.0)
    );
}

#[test]
fn test_unregistered_type_spawns_placeholder() {
    let (mut global, _root) = headless();

    let handle = global.invoke_tab(GLOBAL, "Mystery");

    let tab = global.tab(handle).unwrap();
    assert!(tab.is_placeholder());
    assert_eq!(tab.layout_id(), &TabId::new("Mystery"));
    assert_eq!(tab.label(), "Mystery");
}

#[test]
fn test_reuse_method_overrides_spawned_tab() {
    let (mut global, root) = headless();
    register_panels(&mut global, GLOBAL, &["Outliner", "Details"]);
    global.restore_from(GLOBAL, main_layout(), Some(root), false);
    let details = global.invoke_tab(GLOBAL, "Details");

    let spawns = Rc::new(Cell::new(0));
    let counter = Rc::clone(&spawns);
    global
        .register_tab_spawner(GLOBAL, "Log", move |_| {
            counter.set(counter.get() + 1);
            DockTab::default()
        })
        .set_reuse_tab_method(move |_| Some(details));

    assert_eq!(global.invoke_tab(GLOBAL, "Log"), details);
    assert_eq!(spawns.get(), 0);
}

#[test]
fn test_reuse_method_returning_none_spawns_new_instance_each_time() {
    let (mut global, root) = headless();
    let spawns = Rc::new(Cell::new(0));
    let counter = Rc::clone(&spawns);
    global
        .register_tab_spawner(GLOBAL, "Viewer", move |_| {
            counter.set(counter.get() + 1);
            DockTab::new("Viewer")
        })
        .set_reuse_tab_method(|_| None);
    let layout = Layout::new("Main")
        .add_area(Area::primary().split(Stack::new().add_tab("Viewer", TabState::Opened)));
    global.restore_from(GLOBAL, layout, Some(root), false);
    let restored = global.live_tabs(GLOBAL);
    assert_eq!(restored.len(), 1);
    let after_restore = spawns.get();

    let first = global.invoke_tab(GLOBAL, "Viewer");
    let second = global.invoke_tab(GLOBAL, "Viewer");

    assert_ne!(first, second);
    assert!(!restored.contains(&first) && !restored.contains(&second));
    assert_eq!(spawns.get(), after_restore + 2);
    assert_eq!(global.live_tabs(GLOBAL).len(), 3);
    assert_eq!(
        global.tab(first).and_then(|tab| tab.parent_stack()),
        global.tab(restored[0]).and_then(|tab| tab.parent_stack())
    );
}

#[test]
fn test_nomad_tab_invoked_on_sub_manager_lands_in_global() {
    let (mut global, root) = headless();
    register_panels(&mut global, GLOBAL, &["Outliner", "Details"]);
    global.restore_from(GLOBAL, main_layout(), Some(root), false);
    let owner = global.invoke_tab(GLOBAL, "Outliner");
    let sub = global.new_tab_manager(owner);
    global.register_nomad_tab_spawner("Output", |_| DockTab::default());

    let handle = global.invoke_tab(sub, "Output");

    assert_eq!(global.tab(handle).unwrap().manager(), Some(GLOBAL));
    assert!(global.manager(sub).unwrap().dock_areas().is_empty());
}

#[test]
fn test_spawner_display_name_labels_tab() {
    let (mut global, _root) = headless();
    global
        .register_tab_spawner(GLOBAL, "Log", |_| DockTab::default())
        .set_display_name("Output Log")
        .set_icon("log.png");

    let handle = global.invoke_tab(GLOBAL, "Log");

    let tab = global.tab(handle).unwrap();
    assert_eq!(tab.label(), "Output Log");
    assert_eq!(tab.icon(), Some("log.png"));
    assert!(global.is_sole_tab_instance_spawned(GLOBAL, "Log"));
}

// ========================================================================
// Restore
// ========================================================================

#[test]
fn test_restore_primary_area_into_parent_window() {
    let (mut global, root) = headless();
    register_panels(&mut global, GLOBAL, &["Outliner", "Details"]);

    let primary = global.restore_from(GLOBAL, main_layout(), Some(root), true);

    let primary = primary.unwrap();
    let info = global.tree().area_info(primary).unwrap();
    assert_eq!(info.window, Some(root));
    assert!(!info.owns_window);
    assert!(info.embed_title_area);
    assert_eq!(live_tab_types(&global, GLOBAL), vec!["Outliner", "Details"]);
    assert_eq!(global.manager(GLOBAL).unwrap().active_layout_name(), "Main");
}

#[test]
fn test_restore_collapses_areas_without_spawnable_tabs() {
    let (mut global, root) = headless();
    register_panels(&mut global, GLOBAL, &["Outliner", "Details", "Log"]);

    let layout = main_layout()
        .add_area(floating_area("Ghost", TabState::Opened))
        .add_area(floating_area("Log", TabState::Closed))
        .add_area(floating_area("Log", TabState::Opened));
    global.restore_from(GLOBAL, layout, Some(root), false);

    let manager = global.manager(GLOBAL).unwrap();
    assert_eq!(manager.collapsed_areas().len(), 2);
    assert_eq!(manager.dock_areas().len(), 2);
    assert_eq!(global.windows().live_windows().len(), 2);
}

#[test]
fn test_restore_specified_placement_uses_exact_rect() {
    let (mut global, root) = headless();
    register_panels(&mut global, GLOBAL, &["Log"]);

    let area = floating_area("Log", TabState::Opened).with_placement(WindowPlacement::Specified {
        position: Vec2::new(50.0, 60.0),
        size: Vec2::new(700.0, 500.0),
        maximized: true,
    });
    global.restore_from(GLOBAL, Layout::new("Main").add_area(area), Some(root), false);

    let handle = global.invoke_tab(GLOBAL, "Log");
    let window = global.window_of_tab(handle).unwrap();
    let rect = global.windows().screen_rect(window).unwrap();
    assert_eq!(rect.position(), Vec2::new(50.0, 60.0));
    assert_eq!(rect.size(), Vec2::new(700.0, 500.0));
    assert!(global.windows().is_maximized(window));
}

#[test]
fn test_restore_extra_primary_area_is_collapsed() {
    let (mut global, root) = headless();
    register_panels(&mut global, GLOBAL, &["Outliner", "Details", "Log"]);

    let mut layout = main_layout();
    layout.push_area(Area::primary().split(Stack::new().add_tab("Log", TabState::Opened)));
    global.restore_from(GLOBAL, layout, Some(root), false);

    assert_eq!(global.manager(GLOBAL).unwrap().dock_areas().len(), 1);
    assert_eq!(global.manager(GLOBAL).unwrap().collapsed_areas().len(), 1);
}

#[test]
fn test_restore_honours_foreground_tab() {
    let (mut global, root) = headless();
    register_panels(&mut global, GLOBAL, &["Details", "Log"]);

    let layout = Layout::new("Main").add_area(
        Area::primary().split(
            Stack::new()
                .add_tab("Details", TabState::Opened)
                .add_tab("Log", TabState::Opened)
                .with_foreground_tab("Log"),
        ),
    );
    global.restore_from(GLOBAL, layout, Some(root), false);

    let log = global.invoke_tab(GLOBAL, "Log");
    let stack = global.tab(log).unwrap().parent_stack().unwrap();
    assert_eq!(global.tree().stack(stack).unwrap().foreground(), Some(log));
}

#[test]
fn test_restore_redirects_legacy_tab_types() {
    let (mut global, root) = headless();
    register_panels(&mut global, GLOBAL, &["Log"]);
    global.add_legacy_tab_type("OutputLog", "Log");

    let layout = Layout::new("Main")
        .add_area(Area::primary().split(Stack::new().add_tab("OutputLog", TabState::Opened)));
    global.restore_from(GLOBAL, layout, Some(root), false);

    assert_eq!(live_tab_types(&global, GLOBAL), vec!["Log"]);
}

#[test]
fn test_persist_after_restore_matches_layout() {
    let (mut global, root) = headless();
    register_panels(&mut global, GLOBAL, &["Outliner", "Details"]);
    global.restore_from(GLOBAL, main_layout(), Some(root), false);

    let persisted = global.persist_layout(GLOBAL);

    assert_eq!(persisted.name, "Main");
    assert_eq!(persisted.primary_area_index, Some(0));
    let stacks = persisted.areas[0].stacks();
    assert_eq!(stacks.len(), 2);
    assert_eq!(stacks[0].tabs[0].tab_id, TabId::new("Outliner"));
    assert_eq!(stacks[1].tabs.len(), 2);
    assert_eq!(stacks[1].tabs[1].state, TabState::Closed);
    assert_eq!(stacks[1].foreground_tab, Some(TabId::new("Details")));
}

// ========================================================================
// Document tabs
// ========================================================================

fn layout_with_empty_second_primary() -> Layout {
    main_layout().add_area(Area::primary())
}

fn layout_with_document_well() -> Layout {
    Layout::new("Main").add_area(
        Area::primary()
            .split(Stack::new().add_tab("Outliner", TabState::Opened))
            .split(Stack::new().add_tab("Docs", TabState::Closed)),
    )
}

#[test]
fn test_document_goes_to_stack_remembering_placeholder() {
    let (mut global, root) = headless();
    register_panels(&mut global, GLOBAL, &["Outliner"]);
    global.restore_from(GLOBAL, layout_with_document_well(), Some(root), false);

    let doc = global.insert_new_document_tab(GLOBAL, "Docs", &RequireClosedTab, DockTab::new("a.txt"));

    let tab = global.tab(doc).unwrap();
    assert_eq!(tab.layout_id(), &TabId::with_instance("Docs", 0));
    assert_eq!(tab.spawn_animations(), 1);
    assert_eq!(tab.attention_count(), 1);

    let stack = tab.parent_stack().unwrap();
    let entries = global.tree().stack(stack).unwrap().entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].tab.tab_id, TabId::new("Docs"));
    assert_eq!(entries[0].live, None);
}

#[test]
fn test_second_document_joins_first() {
    let (mut global, root) = headless();
    register_panels(&mut global, GLOBAL, &["Outliner"]);
    global.restore_from(GLOBAL, layout_with_document_well(), Some(root), false);

    let first = global.insert_new_document_tab(GLOBAL, "Docs", &RequireClosedTab, DockTab::new("a.txt"));
    let second = global.restore_document_tab(GLOBAL, "Docs", &LiveTabSearch::new(), DockTab::new("b.txt"));

    let second_tab = global.tab(second).unwrap();
    assert_eq!(second_tab.layout_id(), &TabId::with_instance("Docs", 1));
    assert_eq!(second_tab.spawn_animations(), 0);
    assert_eq!(
        second_tab.parent_stack(),
        global.tab(first).unwrap().parent_stack()
    );
}

#[test]
fn test_document_without_home_invokes_placeholder() {
    let (mut global, _root) = headless();

    let doc = global.insert_new_document_tab(GLOBAL, "Docs", &LiveTabSearch::new(), DockTab::new("a.txt"));

    let stack = global.tab(doc).unwrap().parent_stack().unwrap();
    let live: Vec<_> = global.tree().stack(stack).unwrap().live_tabs().collect();
    assert_eq!(live.len(), 2);
    assert!(global.tab(live[0]).unwrap().is_placeholder());
    assert_eq!(live[1], doc);
}

#[test]
fn test_document_tabs_are_not_persisted() {
    let (mut global, root) = headless();
    register_panels(&mut global, GLOBAL, &["Outliner"]);
    global.restore_from(GLOBAL, layout_with_document_well(), Some(root), false);
    global.insert_new_document_tab(GLOBAL, "Docs", &RequireClosedTab, DockTab::new("a.txt"));

    let persisted = global.persist_layout(GLOBAL);

    let ids: Vec<String> = persisted.all_tab_ids().iter().map(|id| id.to_string()).collect();
    assert_eq!(ids, vec!["Outliner", "Docs"]);
}

#[test]
fn test_empty_extra_primary_area_is_parked() {
    let (mut global, root) = headless();
    register_panels(&mut global, GLOBAL, &["Outliner", "Details"]);

    global.restore_from(GLOBAL, layout_with_empty_second_primary(), Some(root), false);

    assert_eq!(global.manager(GLOBAL).unwrap().dock_areas().len(), 1);
    assert_eq!(global.manager(GLOBAL).unwrap().collapsed_areas().len(), 1);
}
