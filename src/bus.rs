// bus.rs
use std::{
    panic::{AssertUnwindSafe, catch_unwind},
    sync::Arc,
};

use crossbeam_channel::{Receiver, Sender, unbounded};
use tracing::{error, trace};

use crate::{
    deck::Deck,
    error::DeckError,
    events::{DeckEvent, Topic},
};

pub type HandlerFn = dyn Fn(&mut Deck, &DeckEvent) -> Result<(), DeckError> + Send + Sync;

/// Ordered subscribers for the two lifecycle topics, plus the queue that
/// serialises events published while handlers are still running.
pub struct EventBus {
    init: Vec<Arc<HandlerFn>>,
    change: Vec<Arc<HandlerFn>>,
    tx: Sender<DeckEvent>,
    rx: Receiver<DeckEvent>,
    dispatching: bool,
}

impl Default for EventBus {
    fn default() -> Self {
        let (tx, rx) = unbounded();
        Self {
            init: Vec::new(),
            change: Vec::new(),
            tx,
            rx,
            dispatching: false,
        }
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, topic: Topic, f: F)
    where
        F: Fn(&mut Deck, &DeckEvent) -> Result<(), DeckError> + Send + Sync + 'static,
    {
        self.list_mut(topic).push(Arc::new(f));
    }

    pub fn subscribers(&self, topic: Topic) -> usize {
        match topic {
            Topic::Init => self.init.len(),
            Topic::Change => self.change.len(),
        }
    }

    fn list_mut(&mut self, topic: Topic) -> &mut Vec<Arc<HandlerFn>> {
        match topic {
            Topic::Init => &mut self.init,
            Topic::Change => &mut self.change,
        }
    }

    fn snapshot(&self, topic: Topic) -> Vec<Arc<HandlerFn>> {
        match topic {
            Topic::Init => self.init.clone(),
            Topic::Change => self.change.clone(),
        }
    }
}

/// Deliver `ev` to its subscribers in subscription order.
///
/// If a handler publishes, the new event is queued and delivered once every
/// handler of the current event has returned. Handler errors and panics are
/// logged; the remaining handlers still run.
pub(crate) fn publish(deck: &mut Deck, ev: DeckEvent) {
    let _ = deck.bus().tx.send(ev);
    if deck.bus().dispatching {
        trace!(?ev, "queued behind running handlers");
        return;
    }

    deck.bus_mut().dispatching = true;
    loop {
        let Ok(ev) = deck.bus().rx.try_recv() else {
            break;
        };
        let topic = ev.topic();
        let handlers = deck.bus().snapshot(topic);
        for (i, h) in handlers.into_iter().enumerate() {
            match catch_unwind(AssertUnwindSafe(|| h(deck, &ev))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!(%topic, handler = i, "handler failed: {e}"),
                Err(p) => error!(%topic, handler = i, "handler panicked: {:?}", p),
            }
        }
    }
    deck.bus_mut().dispatching = false;
}
