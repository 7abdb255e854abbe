pub mod key;
pub use key::{KeyBinding, KeyCode};

use crate::dom::NodeId;

/// Host events the deck reacts to.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    /// `target` is the focused element, if any.
    KeyDown { code: u16, target: Option<NodeId> },
    Click { target: NodeId },
    TouchStart { target: NodeId },
    TouchEnd { target: NodeId },
    Submit { form: NodeId },
    Resize,
    Load,
    HashChange { url: String },
}

impl InputEvent {
    /// Element the event was delivered to, if it has one.
    pub fn target(&self) -> Option<NodeId> {
        match self {
            Self::KeyDown { target, .. } => *target,
            Self::Click { target } | Self::TouchStart { target } | Self::TouchEnd { target } => {
                Some(*target)
            }
            Self::Submit { form } => Some(*form),
            Self::Resize | Self::Load | Self::HashChange { .. } => None,
        }
    }
}

/// Where a listener is bound. Target listeners see an event before
/// document listeners do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Target,
    Document,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Propagation {
    #[default]
    Continue,
    /// Skip listeners of later phases.
    Stop,
}

impl Propagation {
    #[inline]
    pub fn is_stopped(self) -> bool {
        self == Self::Stop
    }
}
