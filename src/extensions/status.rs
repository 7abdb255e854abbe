//! "current / total" counters.

use tracing::debug;

use crate::{
    deck::Deck,
    error::DeckError,
    events::{DeckEvent, Topic},
    extension::{Extension, ExtensionStatic},
    options::{Options, Selectors},
};

use super::set_text_all;

#[derive(Debug, Default, Clone, Copy)]
pub struct Status;

impl ExtensionStatic for Status {
    const NAME: &'static str = "status";
}

impl Extension for Status {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn defaults(&self) -> Options {
        Options {
            selectors: Selectors {
                status_current: Some(".deck-status-current".into()),
                status_total: Some(".deck-status-total".into()),
                ..Selectors::default()
            },
            count_nested: Some(true),
            ..Options::default()
        }
    }

    fn install(&self, deck: &mut Deck) {
        deck.subscribe(Topic::Init, |deck, _| {
            let total = if deck.options().count_nested() {
                deck.len()
            } else {
                deck.classification().root_count()
            };
            let selector = deck.options().selectors.status_total().to_string();
            set_text_all(deck, &selector, &total.to_string())?;
            let current = deck.current_index();
            update_current(deck, current)
        });
        deck.subscribe(Topic::Change, |deck, ev| match ev {
            DeckEvent::Change { to, .. } => update_current(deck, *to),
            DeckEvent::Init => Ok(()),
        });
    }
}

/// One-based number shown for slide `index`. Nested slides show the
/// number of their root when nested slides are not counted.
pub(crate) fn display_number(deck: &Deck, index: usize) -> usize {
    if deck.options().count_nested() {
        return index + 1;
    }
    deck.classification().root_of(index).unwrap_or_else(|e| {
        debug!("{e}; showing flat position");
        index + 1
    })
}

fn update_current(deck: &mut Deck, index: usize) -> Result<(), DeckError> {
    if deck.is_empty() {
        return Ok(());
    }
    let n = display_number(deck, index);
    let selector = deck.options().selectors.status_current().to_string();
    set_text_all(deck, &selector, &n.to_string())
}
