// hooks.rs
use std::sync::Arc;

use tracing::error;

use crate::{
    deck::Deck,
    error::DeckError,
    input::{InputEvent, Phase, Propagation},
};

pub type InputFn =
    dyn Fn(&mut Deck, &InputEvent) -> Result<Propagation, DeckError> + Send + Sync;

/// A tiny bus of input listeners, split by phase.
#[derive(Clone, Default)]
pub struct InputHooks {
    target: Vec<Arc<InputFn>>,
    document: Vec<Arc<InputFn>>,
}

impl InputHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<F>(&mut self, phase: Phase, f: F)
    where
        F: Fn(&mut Deck, &InputEvent) -> Result<Propagation, DeckError> + Send + Sync + 'static,
    {
        let list = match phase {
            Phase::Target => &mut self.target,
            Phase::Document => &mut self.document,
        };
        list.push(Arc::new(f));
    }

    pub fn len(&self) -> usize {
        self.target.len() + self.document.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the listeners so they can run against `&mut Deck`.
    pub(crate) fn snapshot(&self, phase: Phase) -> Vec<Arc<InputFn>> {
        match phase {
            Phase::Target => self.target.clone(),
            Phase::Document => self.document.clone(),
        }
    }
}

/// Run target listeners, then document listeners unless one of the former
/// stopped propagation. A failing listener is logged and skipped.
pub(crate) fn fire(deck: &mut Deck, ev: &InputEvent) -> Propagation {
    let mut outcome = Propagation::Continue;
    for phase in [Phase::Target, Phase::Document] {
        if outcome.is_stopped() {
            break;
        }
        let listeners = deck.input_hooks().snapshot(phase);
        for l in listeners {
            match l(deck, ev) {
                Ok(Propagation::Stop) => outcome = Propagation::Stop,
                Ok(Propagation::Continue) => {}
                Err(e) => error!(?ev, "input listener failed: {e}"),
            }
        }
    }
    outcome
}
