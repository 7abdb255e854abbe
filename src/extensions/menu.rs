//! Overview grid: shows every root slide at once and lets the user pick one.

use std::{mem, time::Duration};

use crate::{
    commands::BuiltinCommand,
    deck::Deck,
    dom::{NodeId, Style},
    error::DeckError,
    events::{DeckEvent, Topic},
    extension::{Extension, ExtensionStatic},
    input::{InputEvent, KeyBinding, KeyCode, Phase, Propagation},
    options::{Classes, Keys, Options, Touch},
};

use super::{bind_key, root_nodes};

/// Grid width of the overview, in slides.
const COLUMNS: usize = 4;

#[derive(Debug, Default, Clone, Copy)]
pub struct Menu;

impl ExtensionStatic for Menu {
    const NAME: &'static str = "menu";
}

#[derive(Debug, Default)]
struct MenuState {
    /// Inline styles of the root slides before the grid was laid out.
    saved: Vec<(NodeId, Style)>,
    touch_start_slide: Option<usize>,
    last_touch_end: Option<Duration>,
}

fn menu_key(keys: &Keys) -> Option<&KeyBinding> {
    keys.menu.as_ref()
}

impl Extension for Menu {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn defaults(&self) -> Options {
        Options {
            classes: Classes {
                menu: Some("deck-menu".into()),
                ..Classes::default()
            },
            keys: Keys {
                menu: Some(KeyCode::M.into()),
                ..Keys::default()
            },
            touch: Touch {
                doubletap_window: Some(400),
            },
            ..Options::default()
        }
    }

    fn install(&self, deck: &mut Deck) {
        deck.register_command(BuiltinCommand::ShowMenu.as_ref(), |deck, _| show(deck));
        deck.register_command(BuiltinCommand::HideMenu.as_ref(), |deck, _| hide(deck));
        deck.register_command(BuiltinCommand::ToggleMenu.as_ref(), |deck, _| {
            let next = if is_shown(deck) {
                BuiltinCommand::HideMenu
            } else {
                BuiltinCommand::ShowMenu
            };
            deck.invoke(next.as_ref(), &[])
        });

        deck.subscribe(Topic::Change, |deck, ev| {
            if let DeckEvent::Change { to, .. } = ev {
                if is_shown(deck) {
                    scroll_to_slide(deck, *to);
                }
            }
            Ok(())
        });

        bind_key(deck, menu_key, BuiltinCommand::ToggleMenu);
        deck.on_input(Phase::Target, on_target);
    }
}

fn is_shown(deck: &Deck) -> bool {
    deck.container_has_class(deck.options().classes.menu())
}

fn scroll_to_slide(deck: &mut Deck, index: usize) {
    let top = deck
        .slide(index)
        .map(|s| deck.document().layout(s).offset_top)
        .unwrap_or_default();
    let container = deck.container();
    deck.document_mut().set_scroll_top(container, top);
}

fn show(deck: &mut Deck) -> Result<(), DeckError> {
    if is_shown(deck) {
        return Ok(());
    }
    let classes = deck.options().classes.clone();
    let container = deck.container();
    deck.document_mut().add_class(container, classes.loading());
    deck.document_mut().add_class(container, classes.menu());

    if deck.features().csstransforms {
        let roots = root_nodes(deck);
        let doc = deck.document_mut();
        let mut saved = Vec::with_capacity(roots.len());
        for (i, slide) in roots.into_iter().enumerate() {
            saved.push((slide, doc.style(slide).clone()));
            doc.set_style(slide, "position", "absolute");
            doc.set_style(slide, "left", format!("{}%", (i % COLUMNS) * 25));
            doc.set_style(slide, "top", format!("{}%", (i / COLUMNS) * 25));
        }
        deck.exts_mut().entry::<MenuState>().saved = saved;
    }

    deck.set_timeout(Duration::ZERO, |deck| {
        let loading = deck.options().classes.loading().to_string();
        let container = deck.container();
        deck.document_mut().remove_class(container, &loading);
        let current = deck.current_index();
        scroll_to_slide(deck, current);
        Ok(())
    });
    Ok(())
}

fn hide(deck: &mut Deck) -> Result<(), DeckError> {
    if !is_shown(deck) {
        return Ok(());
    }
    let classes = deck.options().classes.clone();
    let container = deck.container();
    deck.document_mut().remove_class(container, classes.menu());
    deck.document_mut().add_class(container, classes.loading());

    if deck.features().csstransforms {
        let saved = mem::take(&mut deck.exts_mut().entry::<MenuState>().saved);
        for (slide, style) in saved {
            deck.document_mut().replace_style(slide, style);
        }
    }

    deck.set_timeout(Duration::ZERO, |deck| {
        let loading = deck.options().classes.loading().to_string();
        let container = deck.container();
        deck.document_mut().remove_class(container, &loading);
        deck.document_mut().set_scroll_top(container, 0.0);
        Ok(())
    });
    Ok(())
}

fn on_target(deck: &mut Deck, ev: &InputEvent) -> Result<Propagation, DeckError> {
    match ev {
        InputEvent::TouchStart { target } if in_container(deck, *target) => {
            let current = deck.current_index();
            deck.exts_mut().entry::<MenuState>().touch_start_slide = Some(current);
            Ok(Propagation::Continue)
        }
        InputEvent::TouchEnd { target } if in_container(deck, *target) => {
            let now = deck.now();
            let current = deck.current_index();
            let window = deck.options().touch.doubletap_window();
            let state = deck.exts_mut().entry::<MenuState>();
            // A swipe that changed slides is not a tap.
            if state.touch_start_slide != Some(current) {
                return Ok(Propagation::Continue);
            }
            let double = state
                .last_touch_end
                .is_some_and(|last| now.saturating_sub(last) < window);
            state.last_touch_end = Some(now);
            if double {
                deck.invoke(BuiltinCommand::ToggleMenu.as_ref(), &[])?;
            }
            Ok(Propagation::Continue)
        }
        InputEvent::Click { target } if is_shown(deck) => {
            let picked = deck
                .document()
                .closest(*target, |n| deck.index_of(n).is_some())
                .and_then(|n| deck.index_of(n));
            let Some(index) = picked else {
                return Ok(Propagation::Continue);
            };
            deck.go(index);
            deck.invoke(BuiltinCommand::HideMenu.as_ref(), &[])?;
            Ok(Propagation::Stop)
        }
        _ => Ok(Propagation::Continue),
    }
}

fn in_container(deck: &Deck, target: NodeId) -> bool {
    deck.document().contains(deck.container(), target)
}
