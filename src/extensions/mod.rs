//! Bundled deck extensions.

mod goto;
mod hash;
mod menu;
mod navigation;
mod scale;
mod status;

pub use goto::GoTo;
pub use hash::{ASSIGNED_ID, Hash};
pub use menu::Menu;
pub use navigation::Navigation;
pub use scale::Scale;
pub use status::Status;

use std::sync::Arc;

use tracing::debug;

use crate::{
    commands::BuiltinCommand,
    deck::Deck,
    dom::NodeId,
    error::DeckError,
    extension::Extension,
    input::{
        InputEvent, Phase, Propagation,
        key::{KeyBinding, describe, pressed},
    },
    options::Keys,
};

/// Every bundled extension, in load order.
pub fn bundled() -> Vec<Arc<dyn Extension>> {
    vec![
        Arc::new(GoTo),
        Arc::new(Hash),
        Arc::new(Menu),
        Arc::new(Navigation),
        Arc::new(Scale),
        Arc::new(Status),
    ]
}

/// Element nodes of the top-level slides, in order.
pub(crate) fn root_nodes(deck: &Deck) -> Vec<NodeId> {
    deck.classification()
        .root_slides()
        .iter()
        .filter_map(|i| deck.slide(*i))
        .collect()
}

/// Toggle `cmd` whenever a key matching `binding` goes down.
pub(crate) fn bind_key(
    deck: &mut Deck,
    binding: fn(&Keys) -> Option<&KeyBinding>,
    cmd: BuiltinCommand,
) {
    deck.on_input(Phase::Document, move |deck, ev| {
        if let InputEvent::KeyDown { code, .. } = ev {
            if pressed(binding(&deck.options().keys), *code) {
                debug!(key = %describe(*code), command = %cmd, "key binding");
                deck.invoke(cmd.as_ref(), &[])?;
            }
        }
        Ok(Propagation::Continue)
    });
}

/// True when `target` is, or lies inside, an element matching `selector`.
pub(crate) fn hits(deck: &Deck, selector: &str, target: NodeId) -> Result<bool, DeckError> {
    Ok(deck
        .select(selector)?
        .into_iter()
        .any(|el| deck.document().contains(el, target)))
}

/// Set the text of every element matching `selector`.
pub(crate) fn set_text_all(deck: &mut Deck, selector: &str, text: &str) -> Result<(), DeckError> {
    for el in deck.select(selector)? {
        deck.document_mut().set_text(el, text);
    }
    Ok(())
}
