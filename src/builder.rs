// builder.rs
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::{
    context::{Features, Location},
    deck::Deck,
    dom::{Document, Selector},
    error::DeckError,
    extension::Extension,
    extensions,
    options::Options,
};

pub const DEFAULT_SLIDE_SELECTOR: &str = ".slide";

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("no element matches container selector '{0}'")]
    MissingContainer(String),
    #[error(transparent)]
    Deck(#[from] DeckError),
}

/// Collects host options and extensions, then assembles a [`Deck`].
#[derive(Default)]
pub struct DeckBuilder {
    options: Options,
    features: Features,
    location: Location,
    slide_selector: Option<String>,
    extensions: Vec<Arc<dyn Extension>>,
}

impl DeckBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host overrides. These win over every default.
    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    pub fn features(mut self, features: Features) -> Self {
        self.features = features;
        self
    }

    pub fn location(mut self, href: impl Into<String>) -> Self {
        self.location = Location::new(href);
        self
    }

    /// Selector for slide elements inside the container (default `.slide`).
    pub fn slide_selector(mut self, selector: impl Into<String>) -> Self {
        self.slide_selector = Some(selector.into());
        self
    }

    /// Add an extension by value (chainable). Load order is call order.
    pub fn add_extension<E: Extension>(mut self, ext: E) -> Self {
        self.extensions.push(Arc::new(ext));
        self
    }

    pub fn add_extension_arc(mut self, ext: Arc<dyn Extension>) -> Self {
        self.extensions.push(ext);
        self
    }

    /// Add every bundled extension in their usual load order.
    pub fn with_bundled_extensions(mut self) -> Self {
        self.extensions.extend(extensions::bundled());
        self
    }

    pub fn build(self, doc: Document) -> Result<Deck, BuildError> {
        let mut options = self.options;
        options.extend_defaults(Options::core_defaults());
        for ext in &self.extensions {
            debug!(extension = ext.name(), "merging defaults");
            options.extend_defaults(ext.defaults());
        }

        let container_sel = Selector::parse(options.selectors.container())?;
        let container = doc
            .query(&container_sel)
            .ok_or_else(|| BuildError::MissingContainer(options.selectors.container().to_string()))?;
        let slide_sel = Selector::parse(
            self.slide_selector
                .as_deref()
                .unwrap_or(DEFAULT_SLIDE_SELECTOR),
        )?;
        let slides = doc.query_within(container, &slide_sel);

        let mut deck = Deck::new(doc, options, container, slides, self.location, self.features);
        for ext in &self.extensions {
            ext.install(&mut deck);
            info!(extension = ext.name(), "extension installed");
        }
        Ok(deck)
    }
}
