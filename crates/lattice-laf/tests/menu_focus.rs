//! Integration tests for focus coordination while menus are open.

use std::sync::Arc;

use lattice_laf::focus::CoordinatorPhase;
use lattice_laf::{
    ComponentId, ComponentKind, FocusChange, FocusReason, Key, KeyChord, KeyEvent,
    LookAndFeelConfig, MenuBar, MenuElement, Toolkit,
};
use parking_lot::Mutex;

struct Scene {
    toolkit: Arc<Toolkit>,
    window: ComponentId,
    field: ComponentId,
    other: ComponentId,
    bar: ComponentId,
    popup: ComponentId,
    item: ComponentId,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn scene(config: LookAndFeelConfig) -> Scene {
    init_tracing();
    let toolkit = Toolkit::with_config(config);
    let window = toolkit.create_window("main");
    let field = toolkit.create_focusable(window, "field").unwrap();
    let other = toolkit.create_focusable(window, "other").unwrap();
    let bar = toolkit
        .create_child(window, ComponentKind::MenuBar, "bar")
        .unwrap();
    let popup = toolkit
        .create_child(bar, ComponentKind::PopupMenu, "file")
        .unwrap();
    let item = toolkit
        .create_child(popup, ComponentKind::MenuItem, "open")
        .unwrap();
    assert!(toolkit.set_focus(field));
    Scene {
        toolkit,
        window,
        field,
        other,
        bar,
        popup,
        item,
    }
}

fn path(toolkit: &Toolkit, ids: &[ComponentId]) -> Vec<MenuElement> {
    toolkit.with_tree(|tree| {
        ids.iter()
            .map(|&id| MenuElement::new(id, tree.kind(id).unwrap().into()))
            .collect()
    })
}

#[test]
fn test_menu_bar_round_trip_restores_focus() {
    let s = scene(LookAndFeelConfig::default());
    s.toolkit.set_menu_bar(s.window, MenuBar::new()).unwrap();
    let _laf = s.toolkit.install_look_and_feel();

    let changes = Arc::new(Mutex::new(Vec::new()));
    let changes_clone = changes.clone();
    s.toolkit
        .focus_changed
        .connect(move |change: &FocusChange| changes_clone.lock().push(*change));

    let selection = s.toolkit.selection_manager();
    selection.set_selected_path(path(&s.toolkit, &[s.bar, s.popup]));
    assert_eq!(s.toolkit.focus_owner(), Some(s.window));
    assert_eq!(s.toolkit.focus_coordinator().previous_focus_owner(), Some(s.field));
    assert!(!s.toolkit.focus_coordinator().has_key_forwarder());

    selection.set_selected_path(path(&s.toolkit, &[s.bar, s.popup, s.item]));
    selection.clear_selected_path();

    assert_eq!(s.toolkit.focus_owner(), Some(s.field));
    let changes = changes.lock();
    assert_eq!(changes.len(), 2);
    assert_eq!(changes[0].reason, FocusReason::ActiveWindow);
    assert_eq!(changes[1].reason, FocusReason::MenuRestore);
    assert_eq!(changes[1].new, Some(s.field));
}

#[test]
fn test_escape_through_forwarder_closes_menu() {
    let s = scene(LookAndFeelConfig::default());
    let _laf = s.toolkit.install_look_and_feel();
    let selection = s.toolkit.selection_manager();

    // A popup opened on a window without a menu bar.
    selection.set_selected_path(path(&s.toolkit, &[s.popup, s.item]));
    assert!(s.toolkit.focus_coordinator().has_key_forwarder());
    assert_eq!(s.toolkit.key_listener_count(), 1);

    let forwarded = Arc::new(Mutex::new(Vec::new()));
    let forwarded_clone = forwarded.clone();
    selection
        .key_forwarded
        .connect(move |event: &KeyEvent| forwarded_clone.lock().push(event.key()));

    let target = s.toolkit.key_target().unwrap();
    assert_eq!(target, s.window);

    let mut down = KeyEvent::new(KeyChord::key_only(Key::ArrowDown), target);
    assert!(s.toolkit.dispatch_key_event(&mut down));
    assert_eq!(*forwarded.lock(), vec![Key::ArrowDown]);

    let mut escape = KeyEvent::new(KeyChord::key_only(Key::Escape), target);
    assert!(s.toolkit.dispatch_key_event(&mut escape));

    assert!(!selection.is_active());
    assert_eq!(s.toolkit.focus_coordinator().phase(), CoordinatorPhase::Idle);
    assert_eq!(s.toolkit.key_listener_count(), 0);
    assert_eq!(s.toolkit.focus_owner(), Some(s.field));
}

#[test]
fn test_restore_falls_back_when_previous_owner_disabled() {
    let s = scene(LookAndFeelConfig::default());
    let _laf = s.toolkit.install_look_and_feel();
    let selection = s.toolkit.selection_manager();

    selection.set_selected_path(path(&s.toolkit, &[s.bar, s.popup]));
    s.toolkit
        .with_tree_mut(|tree| tree.set_enabled(s.field, false))
        .unwrap();
    selection.clear_selected_path();

    assert_eq!(s.toolkit.focus_owner(), Some(s.other));
}

#[test]
fn test_restore_falls_back_when_previous_owner_destroyed() {
    let s = scene(LookAndFeelConfig::default());
    let _laf = s.toolkit.install_look_and_feel();
    let selection = s.toolkit.selection_manager();

    selection.set_selected_path(path(&s.toolkit, &[s.bar, s.popup]));
    s.toolkit.destroy(s.field).unwrap();
    selection.clear_selected_path();

    assert_eq!(s.toolkit.focus_owner(), Some(s.other));
}

#[test]
fn test_shared_between_installations() {
    let s = scene(LookAndFeelConfig::default());
    let coordinator = s.toolkit.focus_coordinator().clone();

    let first = s.toolkit.install_look_and_feel();
    let second = s.toolkit.install_look_and_feel();
    assert_eq!(coordinator.install_count(), 2);

    drop(first);
    assert!(coordinator.is_attached());
    s.toolkit
        .selection_manager()
        .set_selected_path(path(&s.toolkit, &[s.popup]));
    assert_eq!(coordinator.phase(), CoordinatorPhase::Grabbed);

    // The last uninstall releases the grab and its forwarder.
    drop(second);
    assert!(!coordinator.is_attached());
    assert_eq!(coordinator.phase(), CoordinatorPhase::Idle);
    assert_eq!(s.toolkit.key_listener_count(), 0);
    assert_eq!(s.toolkit.focus_owner(), Some(s.field));

    // Detaching again is harmless.
    coordinator.detach();
    assert_eq!(coordinator.install_count(), 0);
}

#[test]
fn test_hidden_window_refuses_grab() {
    let s = scene(LookAndFeelConfig::default());
    let _laf = s.toolkit.install_look_and_feel();
    s.toolkit
        .with_tree_mut(|tree| tree.set_visible(s.window, false))
        .unwrap();

    s.toolkit
        .selection_manager()
        .set_selected_path(path(&s.toolkit, &[s.bar, s.popup]));
    assert_eq!(s.toolkit.focus_coordinator().phase(), CoordinatorPhase::Idle);
    assert_eq!(s.toolkit.key_listener_count(), 0);
}

#[test]
fn test_config_disables_forwarding_and_restore() {
    let config = LookAndFeelConfig::new()
        .with_forward_keys_to_menus(false)
        .with_restore_focus_on_menu_close(false);
    let s = scene(config);
    let _laf = s.toolkit.install_look_and_feel();
    let selection = s.toolkit.selection_manager();

    selection.set_selected_path(path(&s.toolkit, &[s.popup]));
    assert!(!s.toolkit.focus_coordinator().has_key_forwarder());
    selection.clear_selected_path();
    assert_eq!(s.toolkit.focus_owner(), Some(s.window));
}

#[test]
fn test_focus_listener_closing_menu_leaves_nothing_grabbed() {
    let s = scene(LookAndFeelConfig::default());
    let _laf = s.toolkit.install_look_and_feel();
    let selection = s.toolkit.selection_manager().clone();

    let closer = Arc::downgrade(&selection);
    s.toolkit.focus_changed.connect(move |change: &FocusChange| {
        if change.reason == FocusReason::ActiveWindow
            && let Some(selection) = closer.upgrade()
        {
            selection.clear_selected_path();
        }
    });

    // A popup on a window without a menu bar would get a key forwarder.
    selection.set_selected_path(path(&s.toolkit, &[s.popup]));

    assert!(!selection.is_active());
    assert_eq!(s.toolkit.focus_coordinator().phase(), CoordinatorPhase::Idle);
    assert_eq!(s.toolkit.key_listener_count(), 0);
    assert_eq!(s.toolkit.focus_owner(), Some(s.field));
}
