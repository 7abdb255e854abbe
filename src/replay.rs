// replay.rs
//! Scripted deck sessions: load a scene, feed its steps through the deck and
//! report where it ended up.

use std::{
    fs,
    panic::{AssertUnwindSafe, catch_unwind},
    path::Path,
    time::Duration,
};

use anyhow::{Context as _, anyhow};
use crossbeam_channel::unbounded;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::{
    builder::DeckBuilder,
    context::Features,
    deck::{Deck, SlideRef},
    dom::{Document, ElementSpec, Layout, NodeId},
    input::InputEvent,
    options::Options,
};

/// A replayable session.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub document: ElementSpec,
    #[serde(default)]
    pub options: Options,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub features: Features,
    #[serde(default)]
    pub slide_selector: Option<String>,
    #[serde(default)]
    pub script: Vec<Step>,
}

/// One scripted host action. Targets are selectors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Step {
    Key {
        code: u16,
        #[serde(default)]
        target: Option<String>,
    },
    Click {
        target: String,
    },
    TouchStart {
        target: String,
    },
    TouchEnd {
        target: String,
    },
    /// Type into a form field.
    Input {
        target: String,
        value: String,
    },
    Submit {
        form: String,
    },
    /// Host relayout of one element.
    Layout {
        target: String,
        height: f64,
        #[serde(default, rename = "offsetTop")]
        offset_top: f64,
    },
    Resize,
    Load,
    HashChange {
        url: String,
    },
    Advance {
        ms: u64,
    },
    Invoke {
        command: String,
        #[serde(default)]
        args: Vec<Value>,
    },
    Go {
        to: SlideRef,
    },
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub current: usize,
    pub slide_id: Option<String>,
    pub slides: usize,
    pub roots: usize,
    pub container_classes: Vec<String>,
    pub location: String,
    pub steps: usize,
    /// Steps that could not be applied, as `"<step#>: <reason>"`.
    pub errors: Vec<String>,
    pub document: ElementSpec,
}

pub fn load_scene(path: &Path) -> anyhow::Result<Scene> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing scene {}", path.display()))
}

pub fn run_file(path: &Path) -> anyhow::Result<Report> {
    run(load_scene(path)?)
}

/// Build a deck with every bundled extension, initialize it and play the
/// script. Failing steps are reported and skipped.
pub fn run(scene: Scene) -> anyhow::Result<Report> {
    let mut builder = DeckBuilder::new()
        .options(scene.options)
        .features(scene.features)
        .location(scene.location)
        .with_bundled_extensions();
    if let Some(sel) = scene.slide_selector {
        builder = builder.slide_selector(sel);
    }
    let mut deck = builder.build(Document::from_spec(&scene.document))?;
    deck.init()?;

    let (tx, rx) = unbounded::<Step>();
    for step in scene.script {
        tx.send(step)?;
    }
    drop(tx);

    let mut steps = 0;
    let mut errors = Vec::new();
    for step in rx.iter() {
        steps += 1;
        let outcome = catch_unwind(AssertUnwindSafe(|| apply(&mut deck, &step)))
            .unwrap_or_else(|_| Err(anyhow!("step panicked")));
        if let Err(e) = outcome {
            warn!(step = steps, ?step, "replay step failed: {e:#}");
            errors.push(format!("{steps}: {e:#}"));
        }
    }

    info!(steps, failed = errors.len(), current = deck.current_index(), "replay finished");
    Ok(report(&deck, steps, errors))
}

fn target(deck: &Deck, selector: &str) -> anyhow::Result<NodeId> {
    deck.select_one(selector)?
        .ok_or_else(|| anyhow!("no element matches '{selector}'"))
}

fn apply(deck: &mut Deck, step: &Step) -> anyhow::Result<()> {
    let ev = match step {
        Step::Key { code, target: sel } => {
            let target = sel.as_deref().map(|s| target(deck, s)).transpose()?;
            InputEvent::KeyDown {
                code: *code,
                target,
            }
        }
        Step::Click { target: sel } => InputEvent::Click {
            target: target(deck, sel)?,
        },
        Step::TouchStart { target: sel } => InputEvent::TouchStart {
            target: target(deck, sel)?,
        },
        Step::TouchEnd { target: sel } => InputEvent::TouchEnd {
            target: target(deck, sel)?,
        },
        Step::Input { target: sel, value } => {
            let field = target(deck, sel)?;
            deck.document_mut().set_value(field, value.as_str());
            return Ok(());
        }
        Step::Submit { form } => InputEvent::Submit {
            form: target(deck, form)?,
        },
        Step::Layout {
            target: sel,
            height,
            offset_top,
        } => {
            let node = target(deck, sel)?;
            deck.document_mut().set_layout(
                node,
                Layout {
                    height: *height,
                    offset_top: *offset_top,
                },
            );
            return Ok(());
        }
        Step::Resize => InputEvent::Resize,
        Step::Load => InputEvent::Load,
        Step::HashChange { url } => InputEvent::HashChange { url: url.clone() },
        Step::Advance { ms } => {
            deck.advance(Duration::from_millis(*ms));
            return Ok(());
        }
        Step::Invoke { command, args } => {
            deck.invoke(command, args)?;
            return Ok(());
        }
        Step::Go { to } => {
            deck.go(to.clone());
            return Ok(());
        }
    };
    deck.dispatch(ev);
    Ok(())
}

fn report(deck: &Deck, steps: usize, errors: Vec<String>) -> Report {
    let doc = deck.document();
    Report {
        current: deck.current_index(),
        slide_id: deck.slide_id(deck.current_index()).map(str::to_string),
        slides: deck.len(),
        roots: deck.classification().root_count(),
        container_classes: doc.node(deck.container()).classes().to_vec(),
        location: deck.location().href().to_string(),
        steps,
        errors,
        document: doc.to_spec(doc.root()),
    }
}
