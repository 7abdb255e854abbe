//! Shrinks slides that are taller than the viewport so they fit.

use tracing::{debug, trace};

use crate::{
    commands::BuiltinCommand,
    deck::Deck,
    dom::Selector,
    error::DeckError,
    events::Topic,
    extension::{Extension, ExtensionStatic},
    input::{InputEvent, KeyBinding, KeyCode, Phase, Propagation},
    options::{Classes, Keys, Options},
    timers::TimerId,
};

use super::{bind_key, root_nodes};

/// Style properties that carry the transform, prefixed ones first.
pub const TRANSFORM_PROPERTIES: [&str; 5] = [
    "-webkit-transform",
    "-moz-transform",
    "-ms-transform",
    "-o-transform",
    "transform",
];

#[derive(Debug, Default, Clone, Copy)]
pub struct Scale;

impl ExtensionStatic for Scale {
    const NAME: &'static str = "scale";
}

#[derive(Debug, Default)]
struct ScaleState {
    pending: Option<TimerId>,
    /// Debounced recomputes run so far.
    recomputes: usize,
}

impl Scale {
    /// Number of resize-triggered recomputes that have run.
    pub fn recomputes(deck: &Deck) -> usize {
        deck.exts().get::<ScaleState>().map_or(0, |s| s.recomputes)
    }
}

fn scale_key(keys: &Keys) -> Option<&KeyBinding> {
    keys.scale.as_ref()
}

impl Extension for Scale {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn defaults(&self) -> Options {
        Options {
            classes: Classes {
                scale: Some("deck-scale".into()),
                scale_slide_wrapper: Some("deck-slide-scaler".into()),
                ..Classes::default()
            },
            keys: Keys {
                scale: Some(KeyCode::S.into()),
                ..Keys::default()
            },
            scale_debounce: Some(200),
            ..Options::default()
        }
    }

    fn install(&self, deck: &mut Deck) {
        deck.register_command(BuiltinCommand::EnableScale.as_ref(), |deck, _| {
            set_enabled(deck, true);
            scale_deck(deck)
        });
        deck.register_command(BuiltinCommand::DisableScale.as_ref(), |deck, _| {
            set_enabled(deck, false);
            scale_deck(deck)
        });
        deck.register_command(BuiltinCommand::ToggleScale.as_ref(), |deck, _| {
            let enabled = is_enabled(deck);
            set_enabled(deck, !enabled);
            scale_deck(deck)
        });

        deck.subscribe(Topic::Init, |deck, _| {
            let wrapper = deck.options().classes.scale_slide_wrapper().to_string();
            for slide in root_nodes(deck) {
                deck.document_mut().wrap_children(slide, "div", &wrapper);
            }
            deck.invoke(BuiltinCommand::EnableScale.as_ref(), &[])
        });

        bind_key(deck, scale_key, BuiltinCommand::ToggleScale);

        deck.on_input(Phase::Document, |deck, ev| {
            match ev {
                InputEvent::Resize => schedule_rescale(deck),
                InputEvent::Load => scale_deck(deck)?,
                _ => {}
            }
            Ok(Propagation::Continue)
        });
    }
}

fn is_enabled(deck: &Deck) -> bool {
    deck.container_has_class(deck.options().classes.scale())
}

fn set_enabled(deck: &mut Deck, on: bool) {
    let class = deck.options().classes.scale().to_string();
    let container = deck.container();
    deck.document_mut().toggle_class(container, &class, on);
}

/// Restart the quiet-period timer; only the last resize of a burst
/// recomputes.
fn schedule_rescale(deck: &mut Deck) {
    if let Some(old) = deck.exts_mut().entry::<ScaleState>().pending.take() {
        deck.clear_timeout(old);
    }
    let delay = deck.options().scale_debounce();
    let id = deck.set_timeout(delay, |deck| {
        let state = deck.exts_mut().entry::<ScaleState>();
        state.pending = None;
        state.recomputes += 1;
        scale_deck(deck)
    });
    trace!(?id, ?delay, "rescale scheduled");
    deck.exts_mut().entry::<ScaleState>().pending = Some(id);
}

/// Apply (or clear) the scale transform on every root slide's wrapper.
fn scale_deck(deck: &mut Deck) -> Result<(), DeckError> {
    let wrapper = deck.options().classes.scale_slide_wrapper().to_string();
    if wrapper.is_empty() {
        return Ok(());
    }
    let wrapper_sel = Selector::parse(&format!(".{wrapper}"))?;
    let enabled = is_enabled(deck);
    let container = deck.container();
    let base = deck
        .options()
        .base_height()
        .unwrap_or_else(|| deck.document().layout(container).height);

    for slide in root_nodes(deck) {
        let height = deck.document().layout(slide).height;
        let factor = if enabled && height > 0.0 {
            (base / height).min(1.0)
        } else {
            1.0
        };
        let doc = deck.document_mut();
        let Some(scaler) = doc.query_within(slide, &wrapper_sel).first().copied() else {
            continue;
        };
        for prop in TRANSFORM_PROPERTIES {
            if factor < 1.0 {
                doc.set_style(scaler, prop, format!("scale({factor})"));
            } else {
                doc.remove_style(scaler, prop);
            }
        }
    }
    debug!(enabled, base, "deck scaled");
    Ok(())
}
