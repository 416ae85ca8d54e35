//! Integration tests for menu accelerator routing through the toolkit.

use std::sync::{Arc, Weak};

use lattice_laf::{
    Action, ComponentId, Key, KeyChord, KeyEvent, MenuBar, MenuItem, SubMenu, Toolkit,
};
use parking_lot::Mutex;

type Log = Arc<Mutex<Vec<String>>>;

fn action(name: &str, log: &Log) -> Arc<Action> {
    let action = Arc::new(Action::new(name));
    let log = log.clone();
    let name = name.to_string();
    action
        .triggered
        .connect(move |event| log.lock().push(format!("{name}:{}", event.item_text)));
    action
}

fn item(text: &str, chord: &str, action: Arc<Action>) -> MenuItem {
    MenuItem::new(text)
        .with_accelerator(chord.parse::<KeyChord>().unwrap())
        .with_action(action)
}

struct Editor {
    toolkit: Arc<Toolkit>,
    main: ComponentId,
    dialog: ComponentId,
    dialog_field: ComponentId,
}

fn editor() -> Editor {
    let toolkit = Toolkit::new();
    let main = toolkit.create_window("main");
    toolkit.create_focusable(main, "text").unwrap();
    let dialog = toolkit.create_owned_window(main, "find").unwrap();
    let dialog_field = toolkit.create_focusable(dialog, "query").unwrap();
    Editor {
        toolkit,
        main,
        dialog,
        dialog_field,
    }
}

#[test]
fn test_owned_window_falls_back_to_owner_menu_bar() {
    let log: Log = Arc::default();
    let e = editor();
    e.toolkit
        .set_menu_bar(
            e.main,
            MenuBar::new().with_menu(
                SubMenu::new("File").with_item(item("New", "Ctrl+Shift+N", action("new", &log))),
            ),
        )
        .unwrap();

    let mut event = KeyEvent::new(KeyChord::ctrl_shift(Key::N), e.dialog_field);
    assert!(e.toolkit.dispatch_key_event(&mut event));
    assert!(event.is_consumed());
    assert_eq!(*log.lock(), vec!["new:New".to_string()]);
}

#[test]
fn test_inner_window_shadows_owner_until_disabled() {
    let log: Log = Arc::default();
    let e = editor();
    let find_close = action("dialog", &log);
    e.toolkit
        .set_menu_bar(
            e.main,
            MenuBar::new()
                .with_menu(SubMenu::new("File").with_item(item("Close", "Ctrl+W", action("main", &log)))),
        )
        .unwrap();
    e.toolkit
        .set_menu_bar(
            e.dialog,
            MenuBar::new()
                .with_menu(SubMenu::new("Find").with_item(item("Close Find", "Ctrl+W", find_close.clone()))),
        )
        .unwrap();

    let mut event = KeyEvent::new(KeyChord::ctrl(Key::W), e.dialog_field);
    assert!(e.toolkit.dispatch_key_event(&mut event));

    find_close.set_enabled(false);
    let mut event = KeyEvent::new(KeyChord::ctrl(Key::W), e.dialog_field);
    assert!(e.toolkit.dispatch_key_event(&mut event));

    assert_eq!(
        *log.lock(),
        vec!["dialog:Close Find".to_string(), "main:Close".to_string()]
    );
}

#[test]
fn test_released_chord_does_not_match_pressed_binding() {
    let log: Log = Arc::default();
    let e = editor();
    e.toolkit
        .set_menu_bar(
            e.main,
            MenuBar::new().with_menu(SubMenu::new("File").with_item(item("Save", "Ctrl+S", action("save", &log)))),
        )
        .unwrap();

    let mut event = KeyEvent::new(KeyChord::ctrl(Key::S).on_release(), e.main);
    assert!(!e.toolkit.dispatch_key_event(&mut event));

    let mut event = KeyEvent::new("released Ctrl+S".parse().unwrap(), e.main);
    assert!(!event.is_consumed());
    assert!(!e.toolkit.dispatch_key_event(&mut event));
    assert!(log.lock().is_empty());
}

#[test]
fn test_action_may_reenter_toolkit() {
    let e = editor();
    let opened = Arc::new(Mutex::new(None));

    let new_window = Arc::new(Action::new("New Window"));
    let weak: Weak<Toolkit> = Arc::downgrade(&e.toolkit);
    let opened_clone = opened.clone();
    new_window.triggered.connect(move |_| {
        if let Some(toolkit) = weak.upgrade() {
            let window = toolkit.create_window("second");
            toolkit.request_window_focus(window);
            *opened_clone.lock() = Some(window);
        }
    });
    e.toolkit
        .set_menu_bar(
            e.main,
            MenuBar::new().with_menu(
                SubMenu::new("Window").with_item(
                    MenuItem::new("New Window")
                        .with_accelerator(KeyChord::ctrl(Key::N))
                        .with_action(new_window),
                ),
            ),
        )
        .unwrap();

    let mut event = KeyEvent::new(KeyChord::ctrl(Key::N), e.main);
    assert!(e.toolkit.dispatch_key_event(&mut event));

    let window = opened.lock().expect("action ran");
    assert_eq!(e.toolkit.active_window(), Some(window));
}

#[test]
fn test_unmatched_event_reaches_listeners() {
    let e = editor();
    let heard = Arc::new(Mutex::new(Vec::new()));
    let heard_clone = heard.clone();
    e.toolkit.on_key(e.dialog, move |event: &mut KeyEvent| {
        heard_clone.lock().push(event.key());
        event.consume();
    });

    let mut event = KeyEvent::pressed(Key::F3, Default::default(), e.dialog_field);
    assert!(e.toolkit.dispatch_key_event(&mut event));
    assert_eq!(*heard.lock(), vec![Key::F3]);
}
