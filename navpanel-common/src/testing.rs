//! In-memory [`NavHost`] for tests
//!
//! `FakeDom` keeps a small element tree and a listener registry. Dispatch
//! follows DOM order: document capture listeners, element capture listeners
//! from the root down to the target, element bubble listeners from the target
//! up, then document bubble listeners. Listeners are collected per stage when
//! the event reaches that stage, and a listener removed mid-dispatch is
//! skipped.
//!
//! Supported selectors: `#id`, `.class`, `[attr]`, and bare tag names.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use crate::host::{EventKind, Handler, ListenTarget, NavEvent, NavHost, Phase};
use crate::MountError;

/// Handle to an element in a [`FakeDom`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

struct FakeElement {
    tag: String,
    parent: Option<NodeId>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
}

struct Registration {
    id: u64,
    target: Option<NodeId>,
    kind: EventKind,
    phase: Phase,
    handler: Rc<RefCell<Handler<NodeId>>>,
}

/// Callback run after every attribute write
type AttributeHook = Rc<RefCell<Box<dyn FnMut(&FakeDom, NodeId, &str)>>>;

#[derive(Default)]
struct Tree {
    elements: Vec<FakeElement>,
    listeners: Vec<Registration>,
    next_listener_id: u64,
    /// Total handler invocations, for asserting inert mounts
    invocations: usize,
    attribute_hooks: Vec<AttributeHook>,
}

impl Tree {
    fn element(&self, id: NodeId) -> &FakeElement {
        &self.elements[id.0]
    }

    fn element_mut(&mut self, id: NodeId) -> &mut FakeElement {
        &mut self.elements[id.0]
    }

    fn is_registered(&self, id: u64) -> bool {
        self.listeners.iter().any(|l| l.id == id)
    }

    fn collect(
        &self,
        target: Option<NodeId>,
        kind: EventKind,
        phase: Phase,
    ) -> Vec<(u64, Rc<RefCell<Handler<NodeId>>>)> {
        self.listeners
            .iter()
            .filter(|l| l.target == target && l.kind == kind && l.phase == phase)
            .map(|l| (l.id, l.handler.clone()))
            .collect()
    }

    /// Target first, root last.
    fn path(&self, target: NodeId) -> Vec<NodeId> {
        let mut path = vec![target];
        let mut current = self.element(target).parent;
        while let Some(id) = current {
            path.push(id);
            current = self.element(id).parent;
        }
        path
    }
}

/// Selector forms the fake understands
enum Selector<'a> {
    Id(&'a str),
    Class(&'a str),
    Attribute(&'a str),
    Tag(&'a str),
}

fn parse_selector(selector: &str) -> Option<Selector<'_>> {
    let selector = selector.trim();
    let is_name = |s: &str| {
        !s.is_empty()
            && s.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    };

    if let Some(id) = selector.strip_prefix('#') {
        return is_name(id).then_some(Selector::Id(id));
    }
    if let Some(class) = selector.strip_prefix('.') {
        return is_name(class).then_some(Selector::Class(class));
    }
    if let Some(attr) = selector
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
    {
        return is_name(attr).then_some(Selector::Attribute(attr));
    }
    is_name(selector).then_some(Selector::Tag(selector))
}

impl Selector<'_> {
    fn matches(&self, element: &FakeElement) -> bool {
        match self {
            Selector::Id(id) => element.attributes.get("id").map(String::as_str) == Some(*id),
            Selector::Class(class) => element.classes.iter().any(|c| c == class),
            Selector::Attribute(attr) => element.attributes.contains_key(*attr),
            Selector::Tag(tag) => element.tag.eq_ignore_ascii_case(tag),
        }
    }
}

/// Shared in-memory document. Clones refer to the same tree.
#[derive(Clone)]
pub struct FakeDom {
    tree: Rc<RefCell<Tree>>,
}

impl Default for FakeDom {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeDom {
    /// A document containing `html > body`.
    pub fn new() -> Self {
        let dom = Self {
            tree: Rc::new(RefCell::new(Tree::default())),
        };
        let html = dom.create("html", None, &[]);
        dom.create("body", Some(html), &[]);
        dom
    }

    pub fn body(&self) -> NodeId {
        NodeId(1)
    }

    /// Append a child element. A `class` attribute is split into the class list.
    pub fn append(&self, parent: NodeId, tag: &str, attributes: &[(&str, &str)]) -> NodeId {
        self.create(tag, Some(parent), attributes)
    }

    fn create(&self, tag: &str, parent: Option<NodeId>, attributes: &[(&str, &str)]) -> NodeId {
        let mut classes = Vec::new();
        let mut attrs = BTreeMap::new();
        for (name, value) in attributes {
            if *name == "class" {
                classes.extend(value.split_whitespace().map(str::to_string));
            } else {
                attrs.insert(name.to_string(), value.to_string());
            }
        }

        let mut tree = self.tree.borrow_mut();
        tree.elements.push(FakeElement {
            tag: tag.to_string(),
            parent,
            classes,
            attributes: attrs,
        });
        NodeId(tree.elements.len() - 1)
    }

    /// First element in creation order matching `selector`.
    pub fn find(&self, selector: &str) -> Option<NodeId> {
        let selector = parse_selector(selector)?;
        let tree = self.tree.borrow();
        tree.elements
            .iter()
            .position(|e| selector.matches(e))
            .map(NodeId)
    }

    pub fn attribute(&self, element: NodeId, name: &str) -> Option<String> {
        self.tree
            .borrow()
            .element(element)
            .attributes
            .get(name)
            .cloned()
    }

    pub fn classes(&self, element: NodeId) -> Vec<String> {
        self.tree.borrow().element(element).classes.clone()
    }

    /// Number of registered listeners of any kind.
    pub fn listener_count(&self) -> usize {
        self.tree.borrow().listeners.len()
    }

    /// Number of document-level listeners for `kind`, across both phases.
    pub fn document_listener_count(&self, kind: EventKind) -> usize {
        self.tree
            .borrow()
            .listeners
            .iter()
            .filter(|l| l.target.is_none() && l.kind == kind)
            .count()
    }

    /// Number of times any handler has run.
    pub fn invocations(&self) -> usize {
        self.tree.borrow().invocations
    }

    /// Register a listener that records every event it sees, returning the guard
    /// and the shared log. Useful for checking propagation order.
    pub fn record(
        &self,
        target: ListenTarget<'_, NodeId>,
        kind: EventKind,
        phase: Phase,
    ) -> (FakeListener, Rc<RefCell<Vec<NavEvent<NodeId>>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        let listener = self.listen(
            target,
            kind,
            phase,
            Box::new(move |event: NavEvent<NodeId>| sink.borrow_mut().push(event)),
        );
        (listener, log)
    }

    /// Run `hook` synchronously after every attribute write, with the element
    /// and attribute name. Stands in for script reacting to DOM mutations
    /// before control returns to the writer. A hook already running is not
    /// re-entered.
    pub fn on_attribute_set(&self, hook: impl FnMut(&FakeDom, NodeId, &str) + 'static) {
        let hook: Box<dyn FnMut(&FakeDom, NodeId, &str)> = Box::new(hook);
        self.tree
            .borrow_mut()
            .attribute_hooks
            .push(Rc::new(RefCell::new(hook)));
    }

    /// Dispatch a click on `target` through capture and bubble phases.
    pub fn click(&self, target: NodeId) {
        let path = self.tree.borrow().path(target);
        let event = || NavEvent::Click {
            target: Some(target),
        };

        self.run_stage(None, EventKind::Click, Phase::Capture, event());
        for node in path.iter().rev() {
            self.run_stage(Some(*node), EventKind::Click, Phase::Capture, event());
        }
        for node in path.iter() {
            self.run_stage(Some(*node), EventKind::Click, Phase::Bubble, event());
        }
        self.run_stage(None, EventKind::Click, Phase::Bubble, event());
    }

    /// Dispatch a click on the document itself (target is not an element).
    pub fn click_document(&self) {
        let event = || NavEvent::Click { target: None };
        self.run_stage(None, EventKind::Click, Phase::Capture, event());
        self.run_stage(None, EventKind::Click, Phase::Bubble, event());
    }

    /// Dispatch a keydown. Focus is not modelled, so only document listeners see it.
    pub fn key_down(&self, key: &str) {
        let event = || NavEvent::KeyDown {
            key: key.to_string(),
        };
        self.run_stage(None, EventKind::KeyDown, Phase::Capture, event());
        self.run_stage(None, EventKind::KeyDown, Phase::Bubble, event());
    }

    fn run_stage(
        &self,
        target: Option<NodeId>,
        kind: EventKind,
        phase: Phase,
        event: NavEvent<NodeId>,
    ) {
        let handlers = self.tree.borrow().collect(target, kind, phase);
        for (id, handler) in handlers {
            if !self.tree.borrow().is_registered(id) {
                continue;
            }
            self.tree.borrow_mut().invocations += 1;
            let mut callback = handler.borrow_mut();
            (*callback)(event.clone());
        }
    }
}

impl NavHost for FakeDom {
    type Element = NodeId;
    type Listener = FakeListener;

    fn query_selector(&self, selector: &str) -> Result<Option<NodeId>, MountError> {
        if parse_selector(selector).is_none() {
            return Err(MountError::InvalidSelector {
                selector: selector.to_string(),
                message: "unsupported selector".to_string(),
            });
        }
        Ok(self.find(selector))
    }

    fn contains(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        self.tree.borrow().path(*node).contains(ancestor)
    }

    fn has_class(&self, element: &NodeId, class: &str) -> bool {
        self.tree
            .borrow()
            .element(*element)
            .classes
            .iter()
            .any(|c| c == class)
    }

    fn set_class(&self, element: &NodeId, class: &str, present: bool) {
        let mut tree = self.tree.borrow_mut();
        let classes = &mut tree.element_mut(*element).classes;
        let has = classes.iter().any(|c| c == class);
        if present && !has {
            classes.push(class.to_string());
        } else if !present {
            classes.retain(|c| c != class);
        }
    }

    fn set_attribute(&self, element: &NodeId, name: &str, value: &str) {
        self.tree
            .borrow_mut()
            .element_mut(*element)
            .attributes
            .insert(name.to_string(), value.to_string());

        let hooks = self.tree.borrow().attribute_hooks.clone();
        for hook in hooks {
            if let Ok(mut hook) = hook.try_borrow_mut() {
                (*hook)(self, *element, name);
            }
        }
    }

    fn listen(
        &self,
        target: ListenTarget<'_, NodeId>,
        kind: EventKind,
        phase: Phase,
        handler: Handler<NodeId>,
    ) -> FakeListener {
        let mut tree = self.tree.borrow_mut();
        let id = tree.next_listener_id;
        tree.next_listener_id += 1;
        tree.listeners.push(Registration {
            id,
            target: match target {
                ListenTarget::Document => None,
                ListenTarget::Element(element) => Some(*element),
            },
            kind,
            phase,
            handler: Rc::new(RefCell::new(handler)),
        });

        FakeListener {
            tree: Rc::downgrade(&self.tree),
            id,
        }
    }
}

/// Registration guard for a [`FakeDom`] listener
pub struct FakeListener {
    tree: Weak<RefCell<Tree>>,
    id: u64,
}

impl Drop for FakeListener {
    fn drop(&mut self) {
        if let Some(tree) = self.tree.upgrade() {
            tree.borrow_mut().listeners.retain(|l| l.id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selectors() {
        let dom = FakeDom::new();
        let body = dom.body();
        let nav = dom.append(body, "nav", &[("id", "main"), ("class", "menu wide")]);
        let button = dom.append(nav, "button", &[("data-nav-toggle", "")]);

        assert_eq!(dom.find("#main"), Some(nav));
        assert_eq!(dom.find(".wide"), Some(nav));
        assert_eq!(dom.find("[data-nav-toggle]"), Some(button));
        assert_eq!(dom.find("button"), Some(button));
        assert_eq!(dom.find("#missing"), None);
        assert!(dom.query_selector("nav > button").is_err());
    }

    #[test]
    fn test_contains_is_inclusive() {
        let dom = FakeDom::new();
        let body = dom.body();
        let nav = dom.append(body, "nav", &[]);
        let link = dom.append(nav, "a", &[]);

        assert!(dom.contains(&nav, &nav));
        assert!(dom.contains(&nav, &link));
        assert!(!dom.contains(&link, &nav));
        assert!(!dom.contains(&nav, &body));
    }

    #[test]
    fn test_dispatch_order() {
        let dom = FakeDom::new();
        let body = dom.body();
        let button = dom.append(body, "button", &[]);

        let order = Rc::new(RefCell::new(Vec::new()));
        let mut guards = Vec::new();
        for (label, target, phase) in [
            ("doc-bubble", None, Phase::Bubble),
            ("button", Some(button), Phase::Bubble),
            ("doc-capture", None, Phase::Capture),
        ] {
            let order = order.clone();
            let target = match target {
                Some(ref id) => ListenTarget::Element(id),
                None => ListenTarget::Document,
            };
            guards.push(dom.listen(
                target,
                EventKind::Click,
                phase,
                Box::new(move |_: NavEvent<NodeId>| order.borrow_mut().push(label)),
            ));
        }

        dom.click(button);
        assert_eq!(*order.borrow(), vec!["doc-capture", "button", "doc-bubble"]);
    }

    #[test]
    fn test_drop_unregisters() {
        let dom = FakeDom::new();
        let (listener, log) = dom.record(ListenTarget::Document, EventKind::KeyDown, Phase::Bubble);
        dom.key_down("a");
        drop(listener);
        dom.key_down("b");

        assert_eq!(dom.listener_count(), 0);
        assert_eq!(
            *log.borrow(),
            vec![NavEvent::KeyDown {
                key: "a".to_string()
            }]
        );
    }

    #[test]
    fn test_listener_added_mid_dispatch_not_run_for_passed_stage() {
        let dom = FakeDom::new();
        let body = dom.body();
        let button = dom.append(body, "button", &[]);

        let late: Rc<RefCell<Option<FakeListener>>> = Rc::new(RefCell::new(None));
        let hits = Rc::new(RefCell::new(0));
        let registrar = {
            let inner_dom = dom.clone();
            let late = late.clone();
            let hits = hits.clone();
            dom.listen(
                ListenTarget::Element(&button),
                EventKind::Click,
                Phase::Bubble,
                Box::new(move |_: NavEvent<NodeId>| {
                    let hits = hits.clone();
                    *late.borrow_mut() = Some(inner_dom.listen(
                        ListenTarget::Document,
                        EventKind::Click,
                        Phase::Capture,
                        Box::new(move |_: NavEvent<NodeId>| *hits.borrow_mut() += 1),
                    ));
                }),
            )
        };

        dom.click(button);
        assert_eq!(*hits.borrow(), 0);
        drop(registrar);
        dom.click(body);
        assert_eq!(*hits.borrow(), 1);
    }
}
