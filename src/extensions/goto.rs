//! Go-to form: a container class shows a form where the user types a slide
//! number or id.

use tracing::debug;

use super::{bind_key, hits};
use crate::{
    commands::BuiltinCommand,
    deck::{Deck, SlideRef},
    error::DeckError,
    events::Topic,
    extension::{Extension, ExtensionStatic},
    input::{InputEvent, KeyBinding, KeyCode, Phase, Propagation},
    options::{Classes, Keys, Options, Selectors},
};

#[derive(Debug, Default, Clone, Copy)]
pub struct GoTo;

impl ExtensionStatic for GoTo {
    const NAME: &'static str = "goto";
}

fn goto_key(keys: &Keys) -> Option<&KeyBinding> {
    keys.goto.as_ref()
}

impl Extension for GoTo {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn defaults(&self) -> Options {
        Options {
            classes: Classes {
                goto: Some("deck-goto".into()),
                ..Classes::default()
            },
            selectors: Selectors {
                goto_datalist: Some("#goto-datalist".into()),
                goto_form: Some(".goto-form".into()),
                goto_input: Some("#goto-slide".into()),
                ..Selectors::default()
            },
            keys: Keys {
                goto: Some(KeyCode::G.into()),
                ..Keys::default()
            },
            count_nested: Some(true),
            ..Options::default()
        }
    }

    fn install(&self, deck: &mut Deck) {
        deck.register_command(BuiltinCommand::ShowGoTo.as_ref(), |deck, _| show(deck));
        deck.register_command(BuiltinCommand::HideGoTo.as_ref(), |deck, _| hide(deck));
        deck.register_command(BuiltinCommand::ToggleGoTo.as_ref(), |deck, _| {
            let next = if deck.container_has_class(deck.options().classes.goto()) {
                BuiltinCommand::HideGoTo
            } else {
                BuiltinCommand::ShowGoTo
            };
            deck.invoke(next.as_ref(), &[])
        });

        deck.subscribe(Topic::Init, |deck, _| fill_datalist(deck));
        bind_key(deck, goto_key, BuiltinCommand::ToggleGoTo);
        deck.on_input(Phase::Target, on_target);
    }
}

fn show(deck: &mut Deck) -> Result<(), DeckError> {
    let class = deck.options().classes.goto().to_string();
    let container = deck.container();
    deck.document_mut().add_class(container, &class);
    if let Some(input) = deck.select_one(deck.options().selectors.goto_input())? {
        deck.document_mut().focus(input);
    }
    Ok(())
}

fn hide(deck: &mut Deck) -> Result<(), DeckError> {
    if let Some(input) = deck.select_one(deck.options().selectors.goto_input())? {
        deck.document_mut().blur(input);
    }
    let class = deck.options().classes.goto().to_string();
    let container = deck.container();
    deck.document_mut().remove_class(container, &class);
    Ok(())
}

/// One `option` per slide id, for browsers that offer datalist completion.
fn fill_datalist(deck: &mut Deck) -> Result<(), DeckError> {
    let Some(datalist) = deck.select_one(deck.options().selectors.goto_datalist())? else {
        return Ok(());
    };
    let ids: Vec<String> = (0..deck.len())
        .filter_map(|i| deck.slide_id(i).map(str::to_string))
        .collect();
    let doc = deck.document_mut();
    for id in ids {
        let opt = doc.element(datalist, "option", None, &[]);
        doc.set_value(opt, id);
    }
    Ok(())
}

fn on_target(deck: &mut Deck, ev: &InputEvent) -> Result<Propagation, DeckError> {
    match ev {
        InputEvent::Submit { form } if hits(deck, deck.options().selectors.goto_form(), *form)? => {
            submit(deck)?;
            Ok(Propagation::Stop)
        }
        // Typing in the field must not drive the deck.
        InputEvent::KeyDown {
            target: Some(target),
            ..
        } if hits(deck, deck.options().selectors.goto_input(), *target)? => Ok(Propagation::Stop),
        _ => Ok(Propagation::Continue),
    }
}

fn submit(deck: &mut Deck) -> Result<(), DeckError> {
    let field = deck.select_one(deck.options().selectors.goto_input())?;
    let value = field
        .map(|f| deck.document().value(f).to_string())
        .unwrap_or_default();

    let target = match parse_int(&value) {
        Some(n) if !deck.options().count_nested() => {
            let roots = deck.classification().root_count();
            if usize::try_from(n).is_ok_and(|n| n > roots) {
                debug!(n, roots, "go-to root number out of range");
                return Ok(());
            }
            match usize::try_from(n)
                .ok()
                .and_then(|pos| deck.classification().slide_for_root(pos))
            {
                Some(i) => SlideRef::from(i),
                None => SlideRef::Index(n.saturating_sub(1)),
            }
        }
        Some(n) => SlideRef::Index(n.saturating_sub(1)),
        None => SlideRef::Id(value),
    };

    deck.go(target);
    deck.invoke(BuiltinCommand::HideGoTo.as_ref(), &[])?;
    if let Some(f) = field {
        deck.document_mut().set_value(f, "");
    }
    Ok(())
}

/// Leading-integer parse: optional whitespace and sign, then digits.
/// Trailing garbage is ignored; no digits means no number.
fn parse_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (neg, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    if digits == 0 {
        return None;
    }
    let n = rest[..digits].parse::<i64>().unwrap_or(i64::MAX);
    Some(if neg { -n } else { n })
}
