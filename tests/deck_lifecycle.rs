mod common;

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use common::*;
use deck_extensions::{BuiltinCommand, DeckError, DeckEvent, InputEvent, Propagation, Topic};
use serde_json::json;

fn recorder(deck: &mut deck_extensions::Deck) -> Arc<Mutex<Vec<(usize, usize)>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    deck.subscribe(Topic::Change, move |_, ev| {
        if let DeckEvent::Change { from, to } = ev {
            sink.lock().unwrap().push((*from, *to));
        }
        Ok(())
    });
    seen
}

#[test]
fn init_marks_states_and_classifies_roots() {
    let deck = started(json!({}));
    assert_eq!(deck.len(), 6);
    assert_eq!(deck.current_index(), 0);
    assert!(has_class(&deck, "#intro", "deck-current"));
    assert!(has_class(&deck, "#two", "deck-next"));
    assert!(has_class(&deck, "#four", "deck-after"));
    assert!(deck.container_has_class("on-slide-0"));

    let roots = deck.classification();
    assert_eq!(roots.root_count(), 4);
    assert!(roots.is_nested(2));
    assert!(roots.is_nested(3));
    assert_eq!(roots.root_position(4), Some(3));
}

#[test]
fn init_runs_once() {
    let mut deck = started(json!({}));
    assert!(matches!(deck.init(), Err(DeckError::AlreadyInitialized)));
}

#[test]
fn init_subscribers_see_classification() {
    let mut deck = deck(json!({}));
    let roots = Arc::new(AtomicUsize::new(usize::MAX));
    let sink = Arc::clone(&roots);
    deck.subscribe(Topic::Init, move |deck, _| {
        sink.store(deck.classification().root_count(), Ordering::SeqCst);
        Ok(())
    });
    deck.init().unwrap();
    assert_eq!(roots.load(Ordering::SeqCst), 4);
}

#[test]
fn navigation_before_init_is_ignored() {
    let mut deck = deck(json!({}));
    assert!(!deck.go(2));
    assert_eq!(deck.current_index(), 0);
}

#[test]
fn change_carries_from_and_to() {
    let mut deck = started(json!({}));
    let seen = recorder(&mut deck);

    assert!(deck.go(2));
    assert!(!deck.go(99));
    assert!(!deck.go(-1));
    assert!(!deck.go("nowhere"));
    assert!(deck.go("four"));
    assert!(!deck.next());
    assert!(deck.prev());

    assert_eq!(*seen.lock().unwrap(), vec![(0, 2), (2, 5), (5, 4)]);
    assert_eq!(deck.current_index(), 4);
}

#[test]
fn current_slide_marks_its_enclosing_slide() {
    let mut deck = started(json!({}));
    deck.go("two-b");
    assert!(has_class(&deck, "#two-b", "deck-current"));
    assert!(has_class(&deck, "#two", "deck-child-current"));
    assert!(has_class(&deck, "#two-a", "deck-previous"));
    assert!(deck.container_has_class("on-slide-3"));
    assert!(!deck.container_has_class("on-slide-0"));
}

#[test]
fn key_navigation_uses_core_bindings() {
    let mut deck = started(json!({}));
    deck.dispatch(InputEvent::KeyDown { code: 39, target: None });
    deck.dispatch(InputEvent::KeyDown { code: 32, target: None });
    assert_eq!(deck.current_index(), 2);
    deck.dispatch(InputEvent::KeyDown { code: 37, target: None });
    assert_eq!(deck.current_index(), 1);
}

#[test]
fn nested_publish_is_delivered_after_current_handlers() {
    let mut deck = started(json!({}));
    deck.subscribe(Topic::Change, |deck, ev| {
        if let DeckEvent::Change { to: 1, .. } = ev {
            deck.go(2);
        }
        Ok(())
    });
    let seen = recorder(&mut deck);

    deck.go(1);
    assert_eq!(*seen.lock().unwrap(), vec![(0, 1), (1, 2)]);
    assert_eq!(deck.current_index(), 2);
}

#[test]
fn failing_handler_does_not_stop_the_rest() {
    let mut deck = started(json!({}));
    deck.subscribe(Topic::Change, |_, _| Err(DeckError::command("test", "boom")));
    deck.subscribe(Topic::Change, |_, _| panic!("handler blew up"));
    let seen = recorder(&mut deck);

    deck.go(1);
    assert_eq!(*seen.lock().unwrap(), vec![(0, 1)]);
}

#[test]
fn unknown_command_is_an_error() {
    let mut deck = started(json!({}));
    match deck.invoke("fly", &[]) {
        Err(DeckError::CommandNotFound(name)) => assert_eq!(name, "fly"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn bundled_commands_are_registered() {
    let deck = started(json!({}));
    for cmd in [
        BuiltinCommand::ShowGoTo,
        BuiltinCommand::ToggleMenu,
        BuiltinCommand::DisableScale,
    ] {
        assert!(deck.has_command(cmd.as_ref()), "{cmd} missing");
    }
}

#[test]
fn re_registering_a_command_replaces_it() {
    let mut deck = started(json!({}));
    let ran = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&ran);
    let previous = deck.register_command("toggleMenu", move |_, _| {
        flag.store(true, Ordering::SeqCst);
        Ok(())
    });
    assert!(previous.is_some());

    // The menu key dispatches by name, so it reaches the replacement.
    deck.dispatch(InputEvent::KeyDown { code: 77, target: None });
    assert!(ran.load(Ordering::SeqCst));
    assert!(!deck.container_has_class("deck-menu"));
}

#[test]
fn host_options_win_over_defaults() {
    let mut deck = started(json!({
        "classes": { "goto": "my-goto" },
        "keys": { "goto": 80 }
    }));
    assert_eq!(deck.options().classes.goto(), "my-goto");
    assert_eq!(deck.options().classes.menu(), "deck-menu");

    deck.dispatch(InputEvent::KeyDown { code: 71, target: None });
    assert!(!deck.container_has_class("my-goto"));
    assert!(!deck.container_has_class("deck-goto"));

    let stop = deck.dispatch(InputEvent::KeyDown { code: 80, target: None });
    assert_eq!(stop, Propagation::Continue);
    assert!(deck.container_has_class("my-goto"));
}

#[test]
fn timers_run_in_due_order() {
    let mut deck = started(json!({}));
    let order = Arc::new(Mutex::new(Vec::new()));
    for (name, ms) in [("late", 30), ("early", 10), ("mid", 20)] {
        let sink = Arc::clone(&order);
        deck.set_timeout(std::time::Duration::from_millis(ms), move |_| {
            sink.lock().unwrap().push(name);
            Ok(())
        });
    }
    let cancelled = deck.set_timeout(std::time::Duration::from_millis(15), |_| {
        panic!("cancelled timer ran")
    });
    assert!(deck.clear_timeout(cancelled));

    deck.advance(std::time::Duration::from_millis(25));
    assert_eq!(*order.lock().unwrap(), ["early", "mid"]);
    deck.advance(std::time::Duration::from_millis(25));
    assert_eq!(*order.lock().unwrap(), ["early", "mid", "late"]);
}
