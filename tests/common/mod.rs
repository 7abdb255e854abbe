#![allow(dead_code)]

use deck_extensions::{Deck, DeckBuilder, Document, ElementSpec, Features, NodeId, Options};
use serde_json::{Value, json};

pub const URL: &str = "https://talks.example/deck.html";

/// Six slides; `two` holds two nested slides, so there are four roots:
/// intro(0) two(1) [two-a(2) two-b(3)] three(4) four(5).
pub fn talk_json() -> Value {
    json!({
        "tag": "body",
        "children": [
            { "class": ["deck-container"], "height": 600.0, "children": [
                { "tag": "section", "class": ["slide"], "id": "intro", "children": [
                    { "tag": "a", "id": "to-four", "attrs": { "href": "#four" } }
                ]},
                { "tag": "section", "class": ["slide"], "id": "two", "offsetTop": 700.0, "children": [
                    { "tag": "div", "class": ["slide"], "id": "two-a" },
                    { "tag": "div", "class": ["slide"], "id": "two-b" }
                ]},
                { "tag": "section", "class": ["slide"], "id": "three", "offsetTop": 1400.0 },
                { "tag": "section", "class": ["slide"], "id": "four", "offsetTop": 2100.0 }
            ]},
            { "tag": "form", "class": ["goto-form"], "children": [
                { "tag": "input", "id": "goto-slide" },
                { "tag": "datalist", "id": "goto-datalist" }
            ]},
            { "tag": "a", "class": ["deck-prev-link"] },
            { "tag": "a", "class": ["deck-next-link"] },
            { "tag": "a", "class": ["deck-permalink"] },
            { "tag": "span", "class": ["deck-status-current"] },
            { "tag": "span", "class": ["deck-status-total"] }
        ]
    })
}

pub fn document(v: Value) -> Document {
    let spec: ElementSpec = serde_json::from_value(v).unwrap();
    Document::from_spec(&spec)
}

pub fn builder(options: Value) -> DeckBuilder {
    DeckBuilder::new()
        .options(Options::from_value(options).unwrap())
        .location(URL)
        .with_bundled_extensions()
}

/// Built but not yet initialized.
pub fn deck(options: Value) -> Deck {
    builder(options).build(document(talk_json())).unwrap()
}

pub fn started(options: Value) -> Deck {
    let mut d = deck(options);
    d.init().unwrap();
    d
}

pub fn started_with(options: Value, features: Features, href: &str) -> Deck {
    let mut d = DeckBuilder::new()
        .options(Options::from_value(options).unwrap())
        .features(features)
        .location(href)
        .with_bundled_extensions()
        .build(document(talk_json()))
        .unwrap();
    d.init().unwrap();
    d
}

pub fn el(deck: &Deck, selector: &str) -> NodeId {
    deck.select_one(selector)
        .unwrap()
        .unwrap_or_else(|| panic!("no element for {selector}"))
}

pub fn text(deck: &Deck, selector: &str) -> String {
    deck.document().text(el(deck, selector)).to_string()
}

pub fn has_class(deck: &Deck, selector: &str, class: &str) -> bool {
    deck.document().has_class(el(deck, selector), class)
}
