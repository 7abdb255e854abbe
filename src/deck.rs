// deck.rs
//! The core deck: slide list, current-slide pointer and the extension
//! points (commands, lifecycle bus, input hooks, timers) extensions use.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::{
    bus::{self, EventBus},
    classify::Classification,
    commands::{Command, CommandRegistry},
    context::{Extensions, Features, Location},
    dom::{Document, NodeId, Selector},
    error::DeckError,
    events::{DeckEvent, Topic},
    hooks::{self, InputHooks},
    input::{InputEvent, Phase, Propagation, key::pressed},
    options::Options,
    timers::{TimerId, Timers},
};

/// Navigation target: a flat index or a slide id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SlideRef {
    Index(i64),
    Id(String),
}

impl From<usize> for SlideRef {
    fn from(i: usize) -> Self {
        Self::Index(i64::try_from(i).unwrap_or(i64::MAX))
    }
}

impl From<i64> for SlideRef {
    fn from(i: i64) -> Self {
        Self::Index(i)
    }
}

impl From<i32> for SlideRef {
    fn from(i: i32) -> Self {
        Self::Index(i64::from(i))
    }
}

impl From<&str> for SlideRef {
    fn from(id: &str) -> Self {
        Self::Id(id.to_string())
    }
}

impl From<String> for SlideRef {
    fn from(id: String) -> Self {
        Self::Id(id)
    }
}

pub struct Deck {
    doc: Document,
    options: Options,
    container: NodeId,
    slides: Vec<NodeId>,
    current: usize,
    classification: Classification,
    initialized: bool,

    commands: CommandRegistry,
    bus: EventBus,
    input: InputHooks,
    timers: Timers,
    exts: Extensions,

    location: Location,
    features: Features,
}

impl Deck {
    pub(crate) fn new(
        doc: Document,
        options: Options,
        container: NodeId,
        slides: Vec<NodeId>,
        location: Location,
        features: Features,
    ) -> Self {
        let mut deck = Self {
            doc,
            options,
            container,
            slides,
            current: 0,
            classification: Classification::default(),
            initialized: false,
            commands: CommandRegistry::new(),
            bus: EventBus::new(),
            input: InputHooks::new(),
            timers: Timers::new(),
            exts: Extensions::new(),
            location,
            features,
        };

        // Core key navigation.
        deck.on_input(Phase::Document, |deck, ev| {
            if let InputEvent::KeyDown { code, .. } = ev {
                if pressed(deck.options().keys.next.as_ref(), *code) {
                    deck.next();
                } else if pressed(deck.options().keys.previous.as_ref(), *code) {
                    deck.prev();
                }
            }
            Ok(Propagation::Continue)
        });

        deck
    }

    // ---- state ----------------------------------------------------------

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn slides(&self) -> &[NodeId] {
        &self.slides
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn slide(&self, index: usize) -> Option<NodeId> {
        self.slides.get(index).copied()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_slide(&self) -> Option<NodeId> {
        self.slide(self.current)
    }

    pub fn index_of(&self, node: NodeId) -> Option<usize> {
        self.slides.iter().position(|s| *s == node)
    }

    pub fn slide_id(&self, index: usize) -> Option<&str> {
        self.slide(index).and_then(|s| self.doc.id_of(s))
    }

    /// Root-slide classification; empty until [`init`](Deck::init).
    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn location_mut(&mut self) -> &mut Location {
        &mut self.location
    }

    pub fn features(&self) -> Features {
        self.features
    }

    pub fn exts(&self) -> &Extensions {
        &self.exts
    }

    pub fn exts_mut(&mut self) -> &mut Extensions {
        &mut self.exts
    }

    /// Every element matching `selector`, in document order.
    pub fn select(&self, selector: &str) -> Result<Vec<NodeId>, DeckError> {
        Ok(self.doc.query_all(&Selector::parse(selector)?))
    }

    pub fn select_one(&self, selector: &str) -> Result<Option<NodeId>, DeckError> {
        Ok(self.doc.query(&Selector::parse(selector)?))
    }

    pub fn container_has_class(&self, class: &str) -> bool {
        !class.is_empty() && self.doc.has_class(self.container, class)
    }

    /// True when `node` carries one of the slide state markers.
    pub fn is_marked(&self, node: NodeId) -> bool {
        self.options
            .state_classes()
            .iter()
            .any(|c| !c.is_empty() && self.doc.has_class(node, c))
    }

    // ---- navigation -----------------------------------------------------

    /// Move to `target`. Out-of-range indices and unknown ids are ignored.
    /// Returns whether the pointer moved (and `change` was published).
    pub fn go(&mut self, target: impl Into<SlideRef>) -> bool {
        let target = target.into();
        if !self.initialized {
            debug!(?target, "navigation before init ignored");
            return false;
        }
        let to = match &target {
            SlideRef::Index(i) => usize::try_from(*i).ok().filter(|i| *i < self.slides.len()),
            SlideRef::Id(id) => self
                .slides
                .iter()
                .position(|s| self.doc.id_of(*s) == Some(id.as_str())),
        };
        let Some(to) = to else {
            debug!(?target, "navigation target out of range");
            return false;
        };

        let from = self.current;
        self.current = to;
        self.update_states(Some(from), to);
        debug!(from, to, "slide change");
        bus::publish(self, DeckEvent::Change { from, to });
        true
    }

    pub fn next(&mut self) -> bool {
        if self.current + 1 < self.slides.len() {
            self.go(self.current + 1)
        } else {
            false
        }
    }

    pub fn prev(&mut self) -> bool {
        match self.current.checked_sub(1) {
            Some(i) => self.go(i),
            None => false,
        }
    }

    /// Put the state markers on every slide relative to `to`, mark the
    /// slides enclosing it, and move the container's `onPrefix` class.
    fn update_states(&mut self, from: Option<usize>, to: usize) {
        let classes = &self.options.classes;
        let markers = [
            classes.before(),
            classes.previous(),
            classes.current(),
            classes.next(),
            classes.after(),
            classes.child_current(),
        ];

        for (i, slide) in self.slides.iter().enumerate() {
            for m in markers {
                self.doc.remove_class(*slide, m);
            }
            let state = if i + 1 < to {
                classes.before()
            } else if i + 1 == to {
                classes.previous()
            } else if i == to {
                classes.current()
            } else if i == to + 1 {
                classes.next()
            } else {
                classes.after()
            };
            self.doc.add_class(*slide, state);
        }

        if let Some(current) = self.slides.get(to).copied() {
            let enclosing: Vec<NodeId> = self
                .doc
                .ancestors(current)
                .take_while(|a| *a != self.container)
                .filter(|a| self.slides.contains(a))
                .collect();
            for s in enclosing {
                self.doc.add_class(s, classes.child_current());
            }
        }

        let prefix = classes.on_prefix();
        if !prefix.is_empty() {
            if let Some(from) = from {
                self.doc.remove_class(self.container, &format!("{prefix}{from}"));
            }
            self.doc.add_class(self.container, &format!("{prefix}{to}"));
        }
    }

    // ---- extension points -----------------------------------------------

    /// Add (or replace) a named command.
    pub fn register_command<F>(&mut self, name: impl Into<String>, f: F) -> Option<Command>
    where
        F: Fn(&mut Deck, &[Value]) -> Result<(), DeckError> + Send + Sync + 'static,
    {
        self.commands.register(Command::new(name, f))
    }

    pub fn has_command(&self, name: &str) -> bool {
        self.commands.contains(name)
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    /// Run the command registered under `name`.
    pub fn invoke(&mut self, name: &str, args: &[Value]) -> Result<(), DeckError> {
        let cmd = self.commands.get(name)?;
        (cmd.run)(self, args)
    }

    pub fn subscribe<F>(&mut self, topic: Topic, f: F)
    where
        F: Fn(&mut Deck, &DeckEvent) -> Result<(), DeckError> + Send + Sync + 'static,
    {
        self.bus.subscribe(topic, f);
    }

    pub fn on_input<F>(&mut self, phase: Phase, f: F)
    where
        F: Fn(&mut Deck, &InputEvent) -> Result<Propagation, DeckError> + Send + Sync + 'static,
    {
        self.input.push(phase, f);
    }

    /// Deliver a host input event to the listeners.
    pub fn dispatch(&mut self, ev: InputEvent) -> Propagation {
        hooks::fire(self, &ev)
    }

    pub(crate) fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub(crate) fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    pub(crate) fn input_hooks(&self) -> &InputHooks {
        &self.input
    }

    // ---- timers ---------------------------------------------------------

    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn set_timeout<F>(&mut self, delay: Duration, f: F) -> TimerId
    where
        F: FnOnce(&mut Deck) -> Result<(), DeckError> + Send + 'static,
    {
        self.timers.schedule(delay, Box::new(f))
    }

    pub fn clear_timeout(&mut self, id: TimerId) -> bool {
        self.timers.cancel(id)
    }

    /// Move the virtual clock forward, running every timer that falls due.
    pub fn advance(&mut self, dt: Duration) {
        let deadline = self.timers.now() + dt;
        loop {
            let Some((id, run)) = self.timers.pop_due(deadline) else {
                break;
            };
            if let Err(e) = run(self) {
                error!(?id, "timer failed: {e}");
            }
        }
        self.timers.set_now(deadline);
    }

    // ---- lifecycle ------------------------------------------------------

    /// Finalize the slide list: mark states, classify root slides, then
    /// publish `init`. Classification happens before any `init` subscriber
    /// runs.
    pub fn init(&mut self) -> Result<(), DeckError> {
        if self.initialized {
            return Err(DeckError::AlreadyInitialized);
        }
        self.initialized = true;
        self.current = 0;
        if !self.slides.is_empty() {
            self.update_states(None, 0);
        }

        let classification = Classification::compute(&self.doc, self.container, &self.slides, |n| {
            self.is_marked(n)
        });
        self.classification = classification;

        info!(
            slides = self.slides.len(),
            roots = self.classification.root_count(),
            "deck initialized"
        );
        bus::publish(self, DeckEvent::Init);
        Ok(())
    }
}

impl std::fmt::Debug for Deck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deck")
            .field("slides", &self.slides.len())
            .field("current", &self.current)
            .field("initialized", &self.initialized)
            .finish_non_exhaustive()
    }
}
