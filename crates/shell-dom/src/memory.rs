//! Deterministic in-memory document.
//!
//! Elements keep a natural height supplied by the host (no real box layout
//! happens here); widths fill the parent unless fixed. Inline styles are
//! recorded but never feed back into measurements.

use std::collections::BTreeMap;
use std::fmt;

use selectors::attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint};
use selectors::matching::{ElementSelectorFlags, MatchingContext};
use selectors::parser::SelectorImpl;
use selectors::{Element as ServoElement, OpaqueElement};
use tracing::debug;

use crate::fixture::{DocumentFixture, NodeSpec, WindowMetrics};
use crate::selector::{SelectorList, ShellSelectors};
use crate::{Dom, ElementId};

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    height: f64,
    width: Option<f64>,
    complete: bool,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl Node {
    fn from_spec(spec: &NodeSpec, parent: Option<ElementId>) -> Self {
        Self {
            tag: spec.tag.to_ascii_lowercase(),
            id: spec.id.clone(),
            classes: spec.classes.clone(),
            attributes: spec.attributes.clone(),
            styles: spec.styles.clone(),
            height: spec.height,
            width: spec.width,
            complete: spec.complete,
            parent,
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MemoryDom {
    nodes: Vec<Node>,
    body: ElementId,
    window: WindowMetrics,
    referrer: String,
    host: String,
    navigations: Vec<String>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::from_fixture(&DocumentFixture::default())
    }
}

impl MemoryDom {
    /// Empty `body` with default window metrics and host `localhost`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fixture(fixture: &DocumentFixture) -> Self {
        let mut dom = Self {
            nodes: vec![Node::from_spec(&NodeSpec::new("body"), None)],
            body: ElementId(0),
            window: fixture.window,
            referrer: fixture.referrer.clone(),
            host: fixture.host.clone(),
            navigations: Vec::new(),
        };
        let body = dom.body;
        for spec in &fixture.body {
            dom.append(body, spec);
        }
        dom
    }

    pub fn body(&self) -> ElementId {
        self.body
    }

    /// Build `spec` (recursively) as the last child of `parent`.
    pub fn append(&mut self, parent: ElementId, spec: &NodeSpec) -> ElementId {
        let element = ElementId(self.nodes.len());
        self.nodes.push(Node::from_spec(spec, Some(parent)));
        if let Some(node) = self.nodes.get_mut(parent.0) {
            node.children.push(element);
        }
        for child in &spec.children {
            self.append(element, child);
        }
        element
    }

    pub fn set_window_size(&mut self, width: f64, height: f64) {
        self.window = WindowMetrics { width, height };
    }

    pub fn set_referrer(&mut self, referrer: impl Into<String>) {
        self.referrer = referrer.into();
    }

    pub fn set_host(&mut self, host: impl Into<String>) {
        self.host = host.into();
    }

    /// Change the natural height of `element`, as content or image loads would.
    pub fn set_content_height(&mut self, element: ElementId, height: f64) {
        if let Some(node) = self.nodes.get_mut(element.0) {
            node.height = height;
        }
    }

    pub fn set_image_complete(&mut self, element: ElementId, complete: bool) {
        if let Some(node) = self.nodes.get_mut(element.0) {
            node.complete = complete;
        }
    }

    /// Every URL passed to [`Dom::navigate`], oldest first.
    pub fn navigations(&self) -> &[String] {
        &self.navigations
    }

    pub fn classes(&self, element: ElementId) -> &[String] {
        self.nodes
            .get(element.0)
            .map(|node| node.classes.as_slice())
            .unwrap_or(&[])
    }

    /// Whether `element` is still reachable from `body`.
    pub fn is_attached(&self, element: ElementId) -> bool {
        let mut current = Some(element);
        while let Some(candidate) = current {
            if candidate == self.body {
                return true;
            }
            current = self.nodes.get(candidate.0).and_then(|node| node.parent);
        }
        false
    }

    fn descendants(&self, root: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = match self.nodes.get(root.0) {
            Some(node) => node.children.iter().rev().copied().collect(),
            None => return out,
        };
        while let Some(element) = stack.pop() {
            out.push(element);
            if let Some(node) = self.nodes.get(element.0) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// Selector-matching view of `element`.
    pub fn element(&self, element: ElementId) -> MemoryElement<'_> {
        MemoryElement { dom: self, element }
    }

    fn parse(&self, selector: &str) -> Option<SelectorList> {
        let parsed = SelectorList::parse(selector);
        if parsed.is_none() {
            debug!(selector, "unsupported selector matches nothing");
        }
        parsed
    }
}

/// Element view handed to the selector matcher.
#[derive(Clone, Copy)]
pub struct MemoryElement<'a> {
    dom: &'a MemoryDom,
    element: ElementId,
}

impl fmt::Debug for MemoryElement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemoryElement({})", self.element)
    }
}

impl<'a> MemoryElement<'a> {
    fn node(&self) -> Option<&'a Node> {
        self.dom.nodes.get(self.element.0)
    }

    fn wrap(&self, element: ElementId) -> Self {
        Self {
            dom: self.dom,
            element,
        }
    }

    fn siblings(&self) -> &'a [ElementId] {
        self.node()
            .and_then(|node| node.parent)
            .and_then(|parent| self.dom.nodes.get(parent.0))
            .map(|parent| parent.children.as_slice())
            .unwrap_or(&[])
    }

    fn sibling_index(&self) -> Option<usize> {
        self.siblings().iter().position(|child| *child == self.element)
    }
}

impl ServoElement for MemoryElement<'_> {
    type Impl = ShellSelectors;

    fn opaque(&self) -> OpaqueElement {
        match self.node() {
            Some(node) => OpaqueElement::new(node),
            None => OpaqueElement::new(self.dom),
        }
    }

    fn parent_element(&self) -> Option<Self> {
        self.node().and_then(|node| node.parent).map(|parent| self.wrap(parent))
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        let index = self.sibling_index()?;
        let previous = index.checked_sub(1)?;
        self.siblings().get(previous).map(|sibling| self.wrap(*sibling))
    }

    fn next_sibling_element(&self) -> Option<Self> {
        let index = self.sibling_index()?;
        self.siblings().get(index + 1).map(|sibling| self.wrap(*sibling))
    }

    fn first_element_child(&self) -> Option<Self> {
        self.node()
            .and_then(|node| node.children.first())
            .map(|child| self.wrap(*child))
    }

    fn is_html_element_in_html_document(&self) -> bool {
        true
    }

    fn has_local_name(&self, name: &<Self::Impl as SelectorImpl>::BorrowedLocalName) -> bool {
        self.node().is_some_and(|node| node.tag.eq_ignore_ascii_case(name))
    }

    fn has_namespace(&self, _ns: &<Self::Impl as SelectorImpl>::BorrowedNamespaceUrl) -> bool {
        true
    }

    fn is_same_type(&self, other: &Self) -> bool {
        match (self.node(), other.node()) {
            (Some(a), Some(b)) => a.tag.eq_ignore_ascii_case(&b.tag),
            _ => false,
        }
    }

    fn attr_matches(
        &self,
        _ns: &NamespaceConstraint<&<Self::Impl as SelectorImpl>::NamespaceUrl>,
        local_name: &<Self::Impl as SelectorImpl>::LocalName,
        operation: &AttrSelectorOperation<&<Self::Impl as SelectorImpl>::AttrValue>,
    ) -> bool {
        let Some(node) = self.node() else {
            return false;
        };
        let name = local_name.as_ref();
        if name == "id" {
            return node.id.as_deref().is_some_and(|id| operation.eval_str(id));
        }
        if name == "class" {
            return !node.classes.is_empty() && operation.eval_str(&node.classes.join(" "));
        }
        node.attributes
            .get(name)
            .is_some_and(|value| operation.eval_str(value))
    }

    fn match_non_ts_pseudo_class(
        &self,
        _pc: &<Self::Impl as SelectorImpl>::NonTSPseudoClass,
        _context: &mut MatchingContext<Self::Impl>,
    ) -> bool {
        false
    }

    fn match_pseudo_element(
        &self,
        _pe: &<Self::Impl as SelectorImpl>::PseudoElement,
        _context: &mut MatchingContext<Self::Impl>,
    ) -> bool {
        false
    }

    fn apply_selector_flags(&self, _flags: ElementSelectorFlags) {}

    fn is_link(&self) -> bool {
        self.node()
            .is_some_and(|node| node.tag == "a" && node.attributes.contains_key("href"))
    }

    fn is_html_slot_element(&self) -> bool {
        false
    }

    fn has_id(&self, id: &<Self::Impl as SelectorImpl>::Identifier, case: CaseSensitivity) -> bool {
        self.node()
            .and_then(|node| node.id.as_deref())
            .is_some_and(|value| case.eq(value.as_bytes(), id.as_ref().as_bytes()))
    }

    fn has_class(
        &self,
        name: &<Self::Impl as SelectorImpl>::Identifier,
        case: CaseSensitivity,
    ) -> bool {
        self.node().is_some_and(|node| {
            node.classes
                .iter()
                .any(|class| case.eq(class.as_bytes(), name.as_ref().as_bytes()))
        })
    }

    fn imported_part(
        &self,
        _name: &<Self::Impl as SelectorImpl>::Identifier,
    ) -> Option<<Self::Impl as SelectorImpl>::Identifier> {
        None
    }

    fn is_part(&self, _name: &<Self::Impl as SelectorImpl>::Identifier) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        self.node().is_none_or(|node| node.children.is_empty())
    }

    fn is_root(&self) -> bool {
        self.element == self.dom.body
    }
}

impl Dom for MemoryDom {
    fn select(&self, selector: &str) -> Vec<ElementId> {
        let Some(list) = self.parse(selector) else {
            return Vec::new();
        };
        std::iter::once(self.body)
            .chain(self.descendants(self.body))
            .filter(|element| list.matches(&self.element(*element)))
            .collect()
    }

    fn select_within(&self, root: ElementId, selector: &str) -> Vec<ElementId> {
        let Some(list) = self.parse(selector) else {
            return Vec::new();
        };
        if !self.is_attached(root) {
            return Vec::new();
        }
        self.descendants(root)
            .into_iter()
            .filter(|element| list.matches(&self.element(*element)))
            .collect()
    }

    fn matches(&self, element: ElementId, selector: &str) -> bool {
        element.0 < self.nodes.len()
            && self
                .parse(selector)
                .is_some_and(|list| list.matches(&self.element(element)))
    }

    fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.nodes.get(element.0).and_then(|node| node.parent)
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.classes(element).iter().any(|c| c == class)
    }

    fn add_class(&mut self, element: ElementId, class: &str) {
        if let Some(node) = self.nodes.get_mut(element.0)
            && !node.classes.iter().any(|c| c == class)
        {
            node.classes.push(class.to_string());
        }
    }

    fn remove_class(&mut self, element: ElementId, class: &str) {
        if let Some(node) = self.nodes.get_mut(element.0) {
            node.classes.retain(|c| c != class);
        }
    }

    fn style(&self, element: ElementId, property: &str) -> Option<String> {
        self.nodes
            .get(element.0)
            .and_then(|node| node.styles.get(property).cloned())
    }

    fn set_style(&mut self, element: ElementId, property: &str, value: &str) {
        let Some(node) = self.nodes.get_mut(element.0) else {
            return;
        };
        // An empty value clears the inline declaration.
        if value.is_empty() {
            node.styles.remove(property);
        } else {
            node.styles.insert(property.to_string(), value.to_string());
        }
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.nodes
            .get(element.0)
            .and_then(|node| node.attributes.get(name).cloned())
    }

    fn remove(&mut self, element: ElementId) {
        if element == self.body {
            return;
        }
        let Some(parent) = self.nodes.get_mut(element.0).and_then(|node| node.parent.take()) else {
            return;
        };
        if let Some(node) = self.nodes.get_mut(parent.0) {
            node.children.retain(|child| *child != element);
        }
    }

    fn image_complete(&self, element: ElementId) -> bool {
        self.nodes.get(element.0).is_none_or(|node| node.complete)
    }

    fn measure_height(&self, element: ElementId) -> f64 {
        self.nodes.get(element.0).map_or(0.0, |node| node.height)
    }

    fn measure_width(&self, element: ElementId) -> f64 {
        let mut current = Some(element);
        while let Some(candidate) = current {
            if candidate == self.body {
                return self.window.width;
            }
            let Some(node) = self.nodes.get(candidate.0) else {
                return 0.0;
            };
            if let Some(width) = node.width {
                return width;
            }
            current = node.parent;
        }
        0.0
    }

    fn window_height(&self) -> f64 {
        self.window.height
    }

    fn window_width(&self) -> f64 {
        self.window.width
    }

    fn referrer(&self) -> String {
        self.referrer.clone()
    }

    fn location_host(&self) -> String {
        self.host.clone()
    }

    fn navigate(&mut self, url: &str) {
        self.navigations.push(url.to_string());
    }
}
