// classify.rs
//! Top-level vs nested slide classification.
//!
//! A slide is nested when one of its ancestors, below the deck container,
//! carries a slide state marker. Top-level slides get dense 1-based root
//! positions in slide list order.

use std::collections::HashMap;

use crate::{
    dom::{Document, NodeId},
    error::DeckError,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlideClass {
    Root(usize),
    /// `owner` is the root position of the outermost enclosing slide, when
    /// that slide is itself a root.
    Nested { owner: Option<usize> },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Classification {
    classes: Vec<SlideClass>,
    roots: Vec<usize>,
}

impl Classification {
    pub fn compute<F>(doc: &Document, container: NodeId, slides: &[NodeId], is_marked: F) -> Self
    where
        F: Fn(NodeId) -> bool,
    {
        let index_of: HashMap<NodeId, usize> =
            slides.iter().enumerate().map(|(i, n)| (*n, i)).collect();

        let mut classes = Vec::with_capacity(slides.len());
        let mut roots = Vec::new();

        for slide in slides {
            let marked: Vec<NodeId> = doc
                .ancestors(*slide)
                .take_while(|a| *a != container)
                .filter(|a| is_marked(*a))
                .collect();

            let class = match marked.last() {
                None => {
                    roots.push(classes.len());
                    SlideClass::Root(roots.len())
                }
                Some(outer) => {
                    // Ancestors precede descendants in document order, so the
                    // owner is already classified.
                    let owner = index_of.get(outer).and_then(|i| match classes.get(*i) {
                        Some(SlideClass::Root(pos)) => Some(*pos),
                        _ => None,
                    });
                    SlideClass::Nested { owner }
                }
            };
            classes.push(class);
        }

        Self { classes, roots }
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    pub fn class_of(&self, slide: usize) -> Option<SlideClass> {
        self.classes.get(slide).copied()
    }

    pub fn is_nested(&self, slide: usize) -> bool {
        matches!(self.class_of(slide), Some(SlideClass::Nested { .. }))
    }

    /// Root position of a top-level slide; `None` for nested or unknown ones.
    pub fn root_position(&self, slide: usize) -> Option<usize> {
        match self.class_of(slide)? {
            SlideClass::Root(pos) => Some(pos),
            SlideClass::Nested { .. } => None,
        }
    }

    /// Root number to display for `slide`: its own position, or its owning
    /// root's when nested.
    pub fn root_of(&self, slide: usize) -> Result<usize, DeckError> {
        match self.class_of(slide) {
            Some(SlideClass::Root(pos)) | Some(SlideClass::Nested { owner: Some(pos) }) => Ok(pos),
            _ => Err(DeckError::ClassificationMiss(slide)),
        }
    }

    /// Flat index of the slide holding root position `pos` (1-based).
    pub fn slide_for_root(&self, pos: usize) -> Option<usize> {
        pos.checked_sub(1).and_then(|i| self.roots.get(i)).copied()
    }

    /// Flat indices of top-level slides, in order.
    pub fn root_slides(&self) -> &[usize] {
        &self.roots
    }
}
