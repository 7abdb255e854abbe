// extension.rs
use crate::{deck::Deck, options::Options};

/// Compile-time helper (NOT a supertrait) for naming extensions.
pub trait ExtensionStatic {
    const NAME: &'static str;
}

/// Implement this per optional deck behaviour (go-to form, menu, …).
///
/// The builder merges every extension's [`defaults`](Extension::defaults)
/// before the deck exists, then calls [`install`](Extension::install) in
/// load order. `install` registers commands, lifecycle subscribers and
/// input listeners; it must not assume the deck is initialized.
pub trait Extension: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    fn defaults(&self) -> Options {
        Options::default()
    }

    fn install(&self, deck: &mut Deck);
}
