//! Previous/next links kept in sync with the current slide.

use crate::{
    deck::Deck,
    error::DeckError,
    events::{DeckEvent, Topic},
    extension::{Extension, ExtensionStatic},
    input::{InputEvent, Phase, Propagation},
    options::{Classes, Options, Selectors},
};

use super::hits;

#[derive(Debug, Default, Clone, Copy)]
pub struct Navigation;

impl ExtensionStatic for Navigation {
    const NAME: &'static str = "navigation";
}

impl Extension for Navigation {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn defaults(&self) -> Options {
        Options {
            classes: Classes {
                nav_disabled: Some("deck-nav-disabled".into()),
                ..Classes::default()
            },
            selectors: Selectors {
                next_link: Some(".deck-next-link".into()),
                previous_link: Some(".deck-prev-link".into()),
                ..Selectors::default()
            },
            ..Options::default()
        }
    }

    fn install(&self, deck: &mut Deck) {
        deck.subscribe(Topic::Init, |deck, _| {
            let current = deck.current_index();
            update_links(deck, current)
        });
        deck.subscribe(Topic::Change, |deck, ev| match ev {
            DeckEvent::Change { to, .. } => update_links(deck, *to),
            DeckEvent::Init => Ok(()),
        });

        deck.on_input(Phase::Target, |deck, ev| {
            let InputEvent::Click { target } = ev else {
                return Ok(Propagation::Continue);
            };
            if hits(deck, deck.options().selectors.previous_link(), *target)? {
                deck.prev();
                Ok(Propagation::Stop)
            } else if hits(deck, deck.options().selectors.next_link(), *target)? {
                deck.next();
                Ok(Propagation::Stop)
            } else {
                Ok(Propagation::Continue)
            }
        });
    }
}

/// Disable the link that would leave the deck and point both links at the
/// neighbouring slides.
fn update_links(deck: &mut Deck, to: usize) -> Result<(), DeckError> {
    let disabled = deck.options().classes.nav_disabled().to_string();
    let base = deck.location().base().to_string();
    let prev_href = format!(
        "{base}#{}",
        to.checked_sub(1)
            .and_then(|i| deck.slide_id(i))
            .unwrap_or_default()
    );
    let next_href = format!("{base}#{}", deck.slide_id(to + 1).unwrap_or_default());
    let at_end = to + 1 >= deck.len();

    for link in deck.select(deck.options().selectors.previous_link())? {
        let doc = deck.document_mut();
        doc.toggle_class(link, &disabled, to == 0);
        doc.set_attr(link, "href", prev_href.as_str());
    }
    for link in deck.select(deck.options().selectors.next_link())? {
        let doc = deck.document_mut();
        doc.toggle_class(link, &disabled, at_end);
        doc.set_attr(link, "href", next_href.as_str());
    }
    Ok(())
}
