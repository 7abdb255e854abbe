// dom.rs
//! A small element tree standing in for the page.
//!
//! Nodes live in an arena owned by [`Document`] and are addressed by
//! [`NodeId`]. Only the pieces the deck touches are modelled: classes,
//! attributes, inline style, text, a string data map, layout metrics
//! supplied by the host, and scroll offsets.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::DeckError;

/// Handle to a node inside one [`Document`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Layout metrics reported by the host renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Layout {
    pub height: f64,
    pub offset_top: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Scroll {
    pub top: f64,
    pub left: f64,
}

/// Inline style declarations, property -> value.
pub type Style = BTreeMap<String, String>;

#[derive(Clone, Debug, Default)]
pub struct Node {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    style: Style,
    text: String,
    data: BTreeMap<String, String>,
    layout: Layout,
    scroll: Scroll,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
    pub fn classes(&self) -> &[String] {
        &self.classes
    }
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }
    pub fn id(&self) -> Option<&str> {
        self.attr("id").filter(|s| !s.is_empty())
    }
    pub fn style(&self) -> &Style {
        &self.style
    }
    pub fn text(&self) -> &str {
        &self.text
    }
    pub fn data(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }
    pub fn layout(&self) -> Layout {
        self.layout
    }
    pub fn scroll(&self) -> Scroll {
        self.scroll
    }
}

#[derive(Clone, Debug)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    focused: Option<NodeId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Empty document with a `body` root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new("body")],
            root: NodeId(0),
            focused: None,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    // ---- construction ---------------------------------------------------

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.push(Node::new(tag));
        NodeId(self.nodes.len() - 1)
    }

    /// Append `child` to `parent`, detaching it from any previous parent.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(old) = self.node(child).parent {
            self.node_mut(old).children.retain(|c| *c != child);
        }
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
    }

    /// Create an element under `parent` with an optional id and classes.
    pub fn element(
        &mut self,
        parent: NodeId,
        tag: &str,
        id: Option<&str>,
        classes: &[&str],
    ) -> NodeId {
        let el = self.create_element(tag);
        if let Some(id) = id {
            self.set_attr(el, "id", id);
        }
        for c in classes {
            self.add_class(el, c);
        }
        self.append_child(parent, el);
        el
    }

    /// Move every child of `parent` into a new wrapper element that becomes
    /// the only child of `parent`.
    pub fn wrap_children(&mut self, parent: NodeId, tag: &str, class: &str) -> NodeId {
        let wrapper = self.create_element(tag);
        self.add_class(wrapper, class);
        let children = std::mem::take(&mut self.node_mut(parent).children);
        for c in &children {
            self.node_mut(*c).parent = Some(wrapper);
        }
        self.node_mut(wrapper).children = children;
        self.node_mut(wrapper).parent = Some(parent);
        self.node_mut(parent).children.push(wrapper);
        wrapper
    }

    // ---- tree walking ---------------------------------------------------

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Ancestors of `id`, closest first, not including `id` itself.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |n| self.parent(*n))
    }

    /// Descendants of `id` in document order, not including `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.node(id).children.iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.node(n).children.iter().rev().copied());
        }
        out
    }

    /// True when `node` is `ancestor` or lies beneath it.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    /// First node, starting at `id` and walking up, for which `pred` holds.
    pub fn closest<F>(&self, id: NodeId, pred: F) -> Option<NodeId>
    where
        F: Fn(NodeId) -> bool,
    {
        std::iter::once(id).chain(self.ancestors(id)).find(|n| pred(*n))
    }

    // ---- classes --------------------------------------------------------

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.node(id).has_class(class)
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if class.is_empty() || self.has_class(id, class) {
            return;
        }
        self.node_mut(id).classes.push(class.to_string());
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        self.node_mut(id).classes.retain(|c| c != class);
    }

    pub fn toggle_class(&mut self, id: NodeId, class: &str, on: bool) {
        if on {
            self.add_class(id, class);
        } else {
            self.remove_class(id, class);
        }
    }

    // ---- attributes / data / text ----------------------------------------

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id).attr(name)
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        self.node_mut(id).attrs.insert(name.to_string(), value.into());
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        self.node_mut(id).attrs.remove(name);
    }

    pub fn id_of(&self, id: NodeId) -> Option<&str> {
        self.node(id).id()
    }

    pub fn data(&self, id: NodeId, key: &str) -> Option<&str> {
        self.node(id).data(key)
    }

    pub fn set_data(&mut self, id: NodeId, key: &str, value: impl Into<String>) {
        self.node_mut(id).data.insert(key.to_string(), value.into());
    }

    pub fn remove_data(&mut self, id: NodeId, key: &str) {
        self.node_mut(id).data.remove(key);
    }

    pub fn text(&self, id: NodeId) -> &str {
        self.node(id).text()
    }

    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        self.node_mut(id).text = text.into();
    }

    /// Form field value.
    pub fn value(&self, id: NodeId) -> &str {
        self.attr(id, "value").unwrap_or_default()
    }

    pub fn set_value(&mut self, id: NodeId, value: impl Into<String>) {
        self.set_attr(id, "value", value);
    }

    // ---- style ----------------------------------------------------------

    pub fn style(&self, id: NodeId) -> &Style {
        self.node(id).style()
    }

    pub fn set_style(&mut self, id: NodeId, prop: &str, value: impl Into<String>) {
        self.node_mut(id).style.insert(prop.to_string(), value.into());
    }

    pub fn remove_style(&mut self, id: NodeId, prop: &str) {
        self.node_mut(id).style.remove(prop);
    }

    pub fn replace_style(&mut self, id: NodeId, style: Style) {
        self.node_mut(id).style = style;
    }

    // ---- layout / scroll / focus ------------------------------------------

    pub fn layout(&self, id: NodeId) -> Layout {
        self.node(id).layout
    }

    pub fn set_layout(&mut self, id: NodeId, layout: Layout) {
        self.node_mut(id).layout = layout;
    }

    pub fn scroll(&self, id: NodeId) -> Scroll {
        self.node(id).scroll
    }

    pub fn set_scroll_top(&mut self, id: NodeId, top: f64) {
        self.node_mut(id).scroll.top = top;
    }

    pub fn set_scroll_left(&mut self, id: NodeId, left: f64) {
        self.node_mut(id).scroll.left = left;
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    pub fn focus(&mut self, id: NodeId) {
        self.focused = Some(id);
    }

    pub fn blur(&mut self, id: NodeId) {
        if self.focused == Some(id) {
            self.focused = None;
        }
    }

    // ---- selection ------------------------------------------------------

    pub fn matches(&self, id: NodeId, selector: &Selector) -> bool {
        selector.matches(self.node(id))
    }

    /// Every node matching `selector`, in document order.
    pub fn query_all(&self, selector: &Selector) -> Vec<NodeId> {
        std::iter::once(self.root)
            .chain(self.descendants(self.root))
            .filter(|n| self.matches(*n, selector))
            .collect()
    }

    pub fn query(&self, selector: &Selector) -> Option<NodeId> {
        self.query_all(selector).into_iter().next()
    }

    /// Matching descendants of `scope`, in document order.
    pub fn query_within(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|n| self.matches(*n, selector))
            .collect()
    }

    // ---- serde bridge ---------------------------------------------------

    /// Build a document whose root is `spec`.
    pub fn from_spec(spec: &ElementSpec) -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            focused: None,
        };
        let root = doc.insert_spec(spec);
        doc.root = root;
        doc
    }

    fn insert_spec(&mut self, spec: &ElementSpec) -> NodeId {
        let el = self.create_element(&spec.tag);
        {
            let node = self.node_mut(el);
            node.attrs = spec.attrs.clone();
            if let Some(id) = &spec.id {
                node.attrs.insert("id".into(), id.clone());
            }
            node.style = spec.style.clone();
            node.text = spec.text.clone();
            node.layout = Layout {
                height: spec.height,
                offset_top: spec.offset_top,
            };
        }
        for c in &spec.class {
            self.add_class(el, c);
        }
        for child in &spec.children {
            let c = self.insert_spec(child);
            self.append_child(el, c);
        }
        el
    }

    /// Dump the subtree at `id`.
    pub fn to_spec(&self, id: NodeId) -> ElementSpec {
        let node = self.node(id);
        let mut attrs = node.attrs.clone();
        let el_id = attrs.remove("id");
        ElementSpec {
            tag: node.tag.clone(),
            id: el_id,
            class: node.classes.clone(),
            attrs,
            style: node.style.clone(),
            text: node.text.clone(),
            height: node.layout.height,
            offset_top: node.layout.offset_top,
            children: node.children.iter().map(|c| self.to_spec(*c)).collect(),
        }
    }
}

// =========================
// Selectors
// =========================

/// Comma separated list of compound selectors (`tag#id.class.class`).
///
/// Combinators and attribute selectors are not supported. The empty
/// selector matches nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Compound>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Compound {
    fn matches(&self, node: &Node) -> bool {
        self.tag.as_deref().is_none_or(|t| t == node.tag())
            && self.id.as_deref().is_none_or(|id| node.id() == Some(id))
            && self.classes.iter().all(|c| node.has_class(c))
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || c >= '\u{80}'
}

impl Selector {
    pub fn parse(s: &str) -> Result<Self, DeckError> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::default());
        }
        let alternatives = s
            .split(',')
            .map(|part| parse_compound(part.trim()).ok_or_else(|| DeckError::InvalidSelector(s.to_string())))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { alternatives })
    }

    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }

    pub fn matches(&self, node: &Node) -> bool {
        self.alternatives.iter().any(|c| c.matches(node))
    }
}

fn parse_compound(part: &str) -> Option<Compound> {
    if part.is_empty() {
        return None;
    }
    let mut out = Compound::default();
    let mut rest = part;

    let tag_len = rest.find(|c: char| !is_ident_char(c)).unwrap_or(rest.len());
    if tag_len > 0 {
        out.tag = Some(rest[..tag_len].to_ascii_lowercase());
        rest = &rest[tag_len..];
    }

    while let Some(sigil) = rest.chars().next() {
        if sigil != '#' && sigil != '.' {
            return None;
        }
        let body = &rest[sigil.len_utf8()..];
        let len = body.find(|c: char| !is_ident_char(c)).unwrap_or(body.len());
        if len == 0 {
            return None;
        }
        let name = body[..len].to_string();
        if sigil == '#' {
            out.id = Some(name);
        } else {
            out.classes.push(name);
        }
        rest = &body[len..];
    }
    Some(out)
}

impl FromStr for Selector {
    type Err = DeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.alternatives.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            if let Some(t) = &c.tag {
                write!(f, "{t}")?;
            }
            if let Some(id) = &c.id {
                write!(f, "#{id}")?;
            }
            for class in &c.classes {
                write!(f, ".{class}")?;
            }
        }
        Ok(())
    }
}

// =========================
// Serialized element tree
// =========================

fn default_tag() -> String {
    "div".into()
}

fn is_zero(v: &f64) -> bool {
    *v == 0.0
}

/// Serialized form of an element subtree (scene files, replay reports).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementSpec {
    #[serde(default = "default_tag")]
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub class: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub style: Style,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub height: f64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub offset_top: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementSpec>,
}

impl Default for ElementSpec {
    fn default() -> Self {
        Self {
            tag: default_tag(),
            id: None,
            class: Vec::new(),
            attrs: BTreeMap::new(),
            style: Style::new(),
            text: String::new(),
            height: 0.0,
            offset_top: 0.0,
            children: Vec::new(),
        }
    }
}
