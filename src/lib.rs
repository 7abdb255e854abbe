// lib.rs

mod builder;
mod bus;
mod classify;
mod commands;
mod context;
mod deck;
mod dom;
mod error;
mod events;
mod extension;
pub mod extensions;
mod hooks;
pub mod input;
pub mod launch;
pub mod logger;
mod options;
pub mod replay;
mod timers;

// Public surface (root-level re-exports)
pub use crate::builder::{BuildError, DEFAULT_SLIDE_SELECTOR, DeckBuilder};
pub use crate::bus::{EventBus, HandlerFn};
pub use crate::classify::{Classification, SlideClass};
pub use crate::commands::{BuiltinCommand, Command, CommandFn, CommandRegistry};
pub use crate::context::{Extensions, Features, Location};
pub use crate::deck::{Deck, SlideRef};
pub use crate::dom::{Document, ElementSpec, Layout, Node, NodeId, Scroll, Selector, Style};
pub use crate::error::DeckError;
pub use crate::events::{DeckEvent, Topic};
pub use crate::extension::{Extension, ExtensionStatic};
pub use crate::hooks::{InputFn, InputHooks};
pub use crate::input::{InputEvent, KeyBinding, KeyCode, Phase, Propagation};
pub use crate::launch::{LaunchArgError, ReplayArgs, parse_from, parse_launch_args};
pub use crate::options::{Classes, Keys, Options, Selectors, Touch};
pub use crate::timers::{TimerFn, TimerId, Timers};

// Prelude stays minimal and user-friendly
pub mod prelude {
    pub use crate::builder::{BuildError, DeckBuilder};
    pub use crate::commands::BuiltinCommand;
    pub use crate::context::Features;
    pub use crate::deck::{Deck, SlideRef};
    pub use crate::dom::{Document, ElementSpec, NodeId};
    pub use crate::error::DeckError;
    pub use crate::events::{DeckEvent, Topic};
    pub use crate::extension::{Extension, ExtensionStatic};
    pub use crate::extensions::{GoTo, Hash, Menu, Navigation, Scale, Status};
    pub use crate::input::{InputEvent, KeyCode, Phase, Propagation};
    pub use crate::options::Options;
}
