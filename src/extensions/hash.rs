//! Per-slide URL fragments: every slide gets an id, the location follows the
//! current slide, and fragment changes drive navigation.

use tracing::debug;

use crate::{
    deck::Deck,
    dom::NodeId,
    error::DeckError,
    events::{DeckEvent, Topic},
    extension::{Extension, ExtensionStatic},
    input::{InputEvent, Phase, Propagation},
    options::{Options, Selectors},
};

/// Data key marking an id the extension generated itself.
pub const ASSIGNED_ID: &str = "deckAssignedId";

#[derive(Debug, Default, Clone, Copy)]
pub struct Hash;

impl ExtensionStatic for Hash {
    const NAME: &'static str = "hash";
}

/// Anchors inside the deck that point at a slide fragment.
#[derive(Debug, Default)]
struct HashState {
    internals: Vec<NodeId>,
}

impl Extension for Hash {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn defaults(&self) -> Options {
        Options {
            selectors: Selectors {
                hash_link: Some(".deck-permalink".into()),
                ..Selectors::default()
            },
            hash_prefix: Some("slide-".into()),
            prevent_fragment_scroll: Some(true),
            ..Options::default()
        }
    }

    fn install(&self, deck: &mut Deck) {
        deck.subscribe(Topic::Init, |deck, _| on_init(deck));
        deck.subscribe(Topic::Change, |deck, ev| match ev {
            DeckEvent::Change { from, to } => on_change(deck, *from, *to),
            DeckEvent::Init => Ok(()),
        });

        deck.on_input(Phase::Target, |deck, ev| {
            let InputEvent::Click { target } = ev else {
                return Ok(Propagation::Continue);
            };
            // Without native fragment events the anchors navigate themselves.
            if deck.features().hashchange {
                return Ok(Propagation::Continue);
            }
            let anchor = deck
                .exts()
                .get::<HashState>()
                .and_then(|s| s.internals.iter().copied().find(|a| deck.document().contains(*a, *target)));
            let Some(anchor) = anchor else {
                return Ok(Propagation::Continue);
            };
            let href = deck.document().attr(anchor, "href").unwrap_or_default().to_string();
            go_by_hash(deck, &href);
            Ok(Propagation::Stop)
        });

        deck.on_input(Phase::Document, |deck, ev| {
            match ev {
                InputEvent::HashChange { url } => go_by_hash(deck, url),
                InputEvent::Load if deck.options().prevent_fragment_scroll() => reset_scroll(deck),
                _ => {}
            }
            Ok(Propagation::Continue)
        });
    }
}

fn on_init(deck: &mut Deck) -> Result<(), DeckError> {
    let prefix = deck.options().hash_prefix().to_string();
    let location_hash = deck.location().hash().to_string();
    let anchors = deck.select("a")?;

    let mut internals = Vec::new();
    let mut deep_link = None;
    for (i, slide) in deck.slides().to_vec().into_iter().enumerate() {
        let doc = deck.document_mut();
        let assigned = doc.data(slide, ASSIGNED_ID).map(str::to_string);
        let id = match doc.id_of(slide) {
            Some(id) if !id.is_empty() && assigned.as_deref() != Some(id) => id.to_string(),
            _ => {
                let id = format!("{prefix}{i}");
                doc.set_attr(slide, "id", id.as_str());
                doc.set_data(slide, ASSIGNED_ID, id.as_str());
                id
            }
        };

        let fragment = format!("#{id}");
        if fragment == location_hash {
            deep_link = Some(i);
        }
        internals.extend(
            anchors
                .iter()
                .copied()
                .filter(|a| doc.attr(*a, "href") == Some(fragment.as_str())),
        );
    }
    debug!(anchors = internals.len(), "internal slide links");
    deck.exts_mut().entry::<HashState>().internals = internals;

    if let Some(i) = deep_link {
        deck.go(i);
    }

    let on_prefix = deck.options().classes.on_prefix().to_string();
    if let Some(id) = deck.slide_id(deck.current_index()).map(str::to_string) {
        let container = deck.container();
        deck.document_mut()
            .add_class(container, &format!("{on_prefix}{id}"));
    }
    Ok(())
}

fn on_change(deck: &mut Deck, from: usize, to: usize) -> Result<(), DeckError> {
    let on_prefix = deck.options().classes.on_prefix().to_string();
    let from_id = deck.slide_id(from).unwrap_or_default().to_string();
    let to_id = deck.slide_id(to).unwrap_or_default().to_string();

    let container = deck.container();
    let doc = deck.document_mut();
    doc.remove_class(container, &format!("{on_prefix}{from_id}"));
    doc.add_class(container, &format!("{on_prefix}{to_id}"));

    let permalink = format!("{}#{to_id}", deck.location().base());
    for link in deck.select(deck.options().selectors.hash_link())? {
        deck.document_mut().set_attr(link, "href", permalink.as_str());
    }
    if deck.features().history {
        deck.location_mut().replace(permalink);
    }
    Ok(())
}

/// Navigate to the slide whose id follows the `#` in `url`.
fn go_by_hash(deck: &mut Deck, url: &str) {
    let id = url.split_once('#').map_or(url, |(_, id)| id);
    if !id.is_empty() {
        let id = id.to_string();
        deck.go(id);
    }
    reset_scroll(deck);
}

fn reset_scroll(deck: &mut Deck) {
    let container = deck.container();
    let doc = deck.document_mut();
    doc.set_scroll_left(container, 0.0);
    doc.set_scroll_top(container, 0.0);
}
