mod common;

use std::time::Duration;

use common::*;
use deck_extensions::{
    Deck, Features, InputEvent, Propagation,
    extensions::{ASSIGNED_ID, Scale},
};
use serde_json::json;

fn submit_goto(deck: &mut Deck, value: &str) -> Propagation {
    let input = el(deck, "#goto-slide");
    deck.document_mut().set_value(input, value);
    let form = el(deck, ".goto-form");
    deck.dispatch(InputEvent::Submit { form })
}

fn key(deck: &mut Deck, code: u16) -> Propagation {
    deck.dispatch(InputEvent::KeyDown { code, target: None })
}

// ---- goto -------------------------------------------------------------

#[test]
fn goto_counts_roots_when_nested_slides_are_excluded() {
    let mut deck = started(json!({ "countNested": false }));
    key(&mut deck, 71);
    assert!(deck.container_has_class("deck-goto"));

    assert_eq!(submit_goto(&mut deck, "3"), Propagation::Stop);
    assert_eq!(deck.current_index(), 4);
    assert_eq!(deck.slide_id(4), Some("three"));
    assert!(!deck.container_has_class("deck-goto"));
    assert_eq!(deck.document().value(el(&deck, "#goto-slide")), "");
}

#[test]
fn goto_past_last_root_keeps_form_open() {
    let mut deck = started(json!({ "countNested": false }));
    deck.invoke("showGoTo", &[]).unwrap();

    submit_goto(&mut deck, "5");
    assert_eq!(deck.current_index(), 0);
    assert!(deck.container_has_class("deck-goto"));
    assert_eq!(deck.document().value(el(&deck, "#goto-slide")), "5");
}

#[test]
fn goto_uses_flat_numbers_by_default() {
    let mut deck = started(json!({}));
    submit_goto(&mut deck, "3");
    assert_eq!(deck.slide_id(deck.current_index()), Some("two-a"));
}

#[test]
fn goto_accepts_slide_ids() {
    let mut deck = started(json!({}));
    submit_goto(&mut deck, "two-b");
    assert_eq!(deck.current_index(), 3);

    submit_goto(&mut deck, "no-such-slide");
    assert_eq!(deck.current_index(), 3);
}

#[test]
fn goto_show_focuses_the_field() {
    let mut deck = started(json!({}));
    let input = el(&deck, "#goto-slide");
    deck.invoke("showGoTo", &[]).unwrap();
    assert_eq!(deck.document().focused(), Some(input));
    deck.invoke("toggleGoTo", &[]).unwrap();
    assert_eq!(deck.document().focused(), None);
    assert!(!deck.container_has_class("deck-goto"));
}

#[test]
fn typing_in_goto_field_does_not_navigate() {
    let mut deck = started(json!({}));
    let input = el(&deck, "#goto-slide");
    let outcome = deck.dispatch(InputEvent::KeyDown {
        code: 39,
        target: Some(input),
    });
    assert_eq!(outcome, Propagation::Stop);
    assert_eq!(deck.current_index(), 0);
}

#[test]
fn goto_datalist_lists_every_slide_id() {
    let deck = started(json!({}));
    let list = el(&deck, "#goto-datalist");
    let values: Vec<&str> = deck
        .document()
        .node(list)
        .children()
        .iter()
        .map(|o| deck.document().value(*o))
        .collect();
    assert_eq!(values, ["intro", "two", "two-a", "two-b", "three", "four"]);
}

// ---- hash -------------------------------------------------------------

#[test]
fn hash_follows_current_slide() {
    let mut deck = started(json!({}));
    assert!(deck.container_has_class("on-slide-intro"));

    deck.go(4);
    assert_eq!(deck.location().href(), format!("{URL}#three"));
    assert_eq!(
        deck.document().attr(el(&deck, ".deck-permalink"), "href"),
        Some(format!("{URL}#three").as_str())
    );
    assert!(deck.container_has_class("on-slide-three"));
    assert!(!deck.container_has_class("on-slide-intro"));
}

#[test]
fn hash_without_history_leaves_location_alone() {
    let features = Features {
        history: false,
        ..Features::default()
    };
    let mut deck = started_with(json!({}), features, URL);
    deck.go(1);
    assert_eq!(deck.location().href(), URL);
}

#[test]
fn hash_deep_link_selects_slide_on_init() {
    let deck = started_with(json!({}), Features::default(), &format!("{URL}#three"));
    assert_eq!(deck.current_index(), 4);
    assert!(deck.container_has_class("on-slide-three"));
    assert_eq!(text(&deck, ".deck-status-current"), "5");
}

#[test]
fn hash_change_navigates_and_resets_scroll() {
    let mut deck = started(json!({}));
    let container = deck.container();
    deck.document_mut().set_scroll_top(container, 50.0);

    deck.dispatch(InputEvent::HashChange {
        url: format!("{URL}#two-b"),
    });
    assert_eq!(deck.current_index(), 3);
    assert_eq!(deck.document().scroll(container).top, 0.0);
}

#[test]
fn empty_fragment_still_resets_scroll() {
    let mut deck = started(json!({}));
    deck.go(2);
    let container = deck.container();
    deck.document_mut().set_scroll_top(container, 50.0);
    deck.document_mut().set_scroll_left(container, 20.0);

    deck.dispatch(InputEvent::HashChange {
        url: format!("{URL}#"),
    });
    assert_eq!(deck.current_index(), 2);
    assert_eq!(deck.document().scroll(container).top, 0.0);
    assert_eq!(deck.document().scroll(container).left, 0.0);
}

#[test]
fn hash_assigns_missing_ids() {
    let doc = document(json!({
        "children": [{ "class": ["deck-container"], "children": [
            { "class": ["slide"], "id": "first" },
            { "class": ["slide"] }
        ]}]
    }));
    let mut deck = builder(json!({ "hashPrefix": "s" })).build(doc).unwrap();
    deck.init().unwrap();

    assert_eq!(deck.slide_id(1), Some("s1"));
    let second = deck.slide(1).unwrap();
    assert_eq!(deck.document().data(second, ASSIGNED_ID), Some("s1"));
    assert!(deck.go("s1"));
}

#[test]
fn internal_links_navigate_without_hashchange_support() {
    let features = Features {
        hashchange: false,
        ..Features::default()
    };
    let mut deck = started_with(json!({}), features, URL);
    let anchor = el(&deck, "#to-four");
    let outcome = deck.dispatch(InputEvent::Click { target: anchor });
    assert_eq!(outcome, Propagation::Stop);
    assert_eq!(deck.current_index(), 5);
}

// ---- menu -------------------------------------------------------------

#[test]
fn menu_lays_out_root_slides_in_a_grid() {
    let mut deck = started(json!({}));
    deck.go(4);
    deck.invoke("showMenu", &[]).unwrap();
    assert!(deck.container_has_class("deck-menu"));
    assert!(deck.container_has_class("deck-loading"));

    let four = el(&deck, "#four");
    let style = deck.document().style(four);
    assert_eq!(style.get("position").map(String::as_str), Some("absolute"));
    assert_eq!(style.get("left").map(String::as_str), Some("75%"));
    assert_eq!(style.get("top").map(String::as_str), Some("0%"));
    assert!(deck.document().style(el(&deck, "#two-a")).is_empty());

    deck.advance(Duration::ZERO);
    assert!(!deck.container_has_class("deck-loading"));
    assert_eq!(deck.document().scroll(deck.container()).top, 1400.0);

    deck.invoke("hideMenu", &[]).unwrap();
    assert!(!deck.container_has_class("deck-menu"));
    assert!(deck.document().style(four).is_empty());
    deck.advance(Duration::ZERO);
    assert!(!deck.container_has_class("deck-loading"));
    assert_eq!(deck.document().scroll(deck.container()).top, 0.0);
}

#[test]
fn menu_click_picks_innermost_slide() {
    let mut deck = started(json!({}));
    key(&mut deck, 77);
    assert!(deck.container_has_class("deck-menu"));

    let target = el(&deck, "#two-a");
    let outcome = deck.dispatch(InputEvent::Click { target });
    assert_eq!(outcome, Propagation::Stop);
    assert_eq!(deck.current_index(), 2);
    assert!(!deck.container_has_class("deck-menu"));
}

#[test]
fn menu_double_tap_toggles() {
    let mut deck = started(json!({}));
    let target = el(&deck, "#intro");
    let tap = |deck: &mut Deck| {
        deck.dispatch(InputEvent::TouchStart { target });
        deck.dispatch(InputEvent::TouchEnd { target });
    };

    tap(&mut deck);
    assert!(!deck.container_has_class("deck-menu"));
    deck.advance(Duration::from_millis(100));
    tap(&mut deck);
    assert!(deck.container_has_class("deck-menu"));

    deck.advance(Duration::from_millis(1000));
    tap(&mut deck);
    assert!(deck.container_has_class("deck-menu"));
}

#[test]
fn menu_ignores_swipes() {
    let mut deck = started(json!({}));
    let target = el(&deck, "#intro");
    deck.dispatch(InputEvent::TouchStart { target });
    deck.dispatch(InputEvent::TouchEnd { target });
    deck.advance(Duration::from_millis(50));

    deck.dispatch(InputEvent::TouchStart { target });
    deck.go(1);
    deck.dispatch(InputEvent::TouchEnd { target });
    assert!(!deck.container_has_class("deck-menu"));
}

// ---- navigation -------------------------------------------------------

#[test]
fn nav_links_track_position() {
    let mut deck = started(json!({}));
    let prev = el(&deck, ".deck-prev-link");
    let next = el(&deck, ".deck-next-link");
    assert!(deck.document().has_class(prev, "deck-nav-disabled"));
    assert!(!deck.document().has_class(next, "deck-nav-disabled"));
    assert_eq!(
        deck.document().attr(next, "href"),
        Some(format!("{URL}#two").as_str())
    );
    assert_eq!(deck.document().attr(prev, "href"), Some(format!("{URL}#").as_str()));

    deck.go(5);
    assert!(!deck.document().has_class(prev, "deck-nav-disabled"));
    assert!(deck.document().has_class(next, "deck-nav-disabled"));
    assert_eq!(
        deck.document().attr(prev, "href"),
        Some(format!("{URL}#three").as_str())
    );
}

#[test]
fn nav_link_clicks_move_one_slide() {
    let mut deck = started(json!({}));
    let prev = el(&deck, ".deck-prev-link");
    let next = el(&deck, ".deck-next-link");

    assert_eq!(deck.dispatch(InputEvent::Click { target: next }), Propagation::Stop);
    assert_eq!(deck.current_index(), 1);
    deck.dispatch(InputEvent::Click { target: prev });
    deck.dispatch(InputEvent::Click { target: prev });
    assert_eq!(deck.current_index(), 0);
}

// ---- scale ------------------------------------------------------------

#[test]
fn scale_wraps_root_slides_and_shrinks_tall_ones() {
    let mut deck = started(json!({}));
    assert!(deck.container_has_class("deck-scale"));

    let three = el(&deck, "#three");
    let scaler = deck.document().node(three).children()[0];
    assert!(deck.document().has_class(scaler, "deck-slide-scaler"));
    // Nested slides are not wrapped on their own.
    assert!(deck.document().node(el(&deck, "#two-a")).children().is_empty());

    let layout = deck.document().layout(three);
    deck.document_mut().set_layout(
        three,
        deck_extensions::Layout {
            height: 1200.0,
            ..layout
        },
    );
    deck.invoke("enableScale", &[]).unwrap();
    let transform = |deck: &Deck| deck.document().style(scaler).get("transform").cloned();
    assert_eq!(transform(&deck).as_deref(), Some("scale(0.5)"));

    deck.invoke("toggleScale", &[]).unwrap();
    assert!(!deck.container_has_class("deck-scale"));
    assert_eq!(transform(&deck), None);
}

#[test]
fn scale_never_enlarges() {
    let mut deck = started(json!({ "baseHeight": 2000.0 }));
    let three = el(&deck, "#three");
    deck.document_mut().set_layout(
        three,
        deck_extensions::Layout {
            height: 500.0,
            offset_top: 0.0,
        },
    );
    deck.dispatch(InputEvent::Load);
    let scaler = deck.document().node(three).children()[0];
    assert!(deck.document().style(scaler).is_empty());
}

#[test]
fn resize_bursts_recompute_once() {
    let mut deck = started(json!({}));
    for i in 0..50 {
        if i > 0 {
            deck.advance(Duration::from_millis(10));
        }
        deck.dispatch(InputEvent::Resize);
    }
    assert_eq!(Scale::recomputes(&deck), 0);

    deck.advance(Duration::from_millis(199));
    assert_eq!(Scale::recomputes(&deck), 0);
    deck.advance(Duration::from_millis(1));
    assert_eq!(Scale::recomputes(&deck), 1);
    assert_eq!(deck.timers().pending(), 0);

    deck.advance(Duration::from_millis(1000));
    assert_eq!(Scale::recomputes(&deck), 1);
}

// ---- status -----------------------------------------------------------

#[test]
fn status_counts_every_slide_by_default() {
    let mut deck = started(json!({}));
    assert_eq!(text(&deck, ".deck-status-total"), "6");
    assert_eq!(text(&deck, ".deck-status-current"), "1");
    deck.go(3);
    assert_eq!(text(&deck, ".deck-status-current"), "4");
}

#[test]
fn status_shows_owning_root_for_nested_slides() {
    let mut deck = started(json!({ "countNested": false }));
    assert_eq!(text(&deck, ".deck-status-total"), "4");
    deck.go(3);
    assert_eq!(text(&deck, ".deck-status-current"), "2");
    deck.go(4);
    assert_eq!(text(&deck, ".deck-status-current"), "3");
}

// ---- edge cases -------------------------------------------------------

#[test]
fn empty_deck_initializes_every_extension() {
    let mut deck = builder(json!({}))
        .build(document(json!({
            "tag": "body",
            "children": [
                { "class": ["deck-container"], "height": 600.0 },
                { "tag": "a", "class": ["deck-prev-link"] },
                { "tag": "a", "class": ["deck-next-link"] },
                { "tag": "a", "class": ["deck-permalink"] },
                { "tag": "span", "class": ["deck-status-current"] },
                { "tag": "span", "class": ["deck-status-total"] }
            ]
        })))
        .unwrap();
    deck.init().unwrap();

    assert!(deck.is_empty());
    assert_eq!(deck.classification().root_count(), 0);
    assert_eq!(text(&deck, ".deck-status-total"), "0");
    assert_eq!(text(&deck, ".deck-status-current"), "");
    assert!(has_class(&deck, ".deck-prev-link", "deck-nav-disabled"));
    assert!(has_class(&deck, ".deck-next-link", "deck-nav-disabled"));
    assert_eq!(deck.location().href(), URL);

    assert!(!deck.next());
    key(&mut deck, 77);
    deck.advance(Duration::from_millis(10));
    assert!(deck.container_has_class("deck-menu"));
    assert_eq!(deck.document().scroll(deck.container()).top, 0.0);
}

#[test]
fn non_ascii_selector_override_is_usable() {
    let mut deck = started(json!({ "selectors": { "gotoInput": "#saut-é" } }));
    let container = deck.container();
    let outcome = deck.dispatch(InputEvent::KeyDown {
        code: 39,
        target: Some(container),
    });
    assert_eq!(outcome, Propagation::Continue);
    assert_eq!(deck.current_index(), 1);
}
