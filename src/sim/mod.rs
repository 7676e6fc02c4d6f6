//! In-memory host for running page behaviors without a browser.
//!
//! `MemoryHost` models just enough of a document to drive the behaviors:
//! an element tree with attributes, classes, inline styles and fixed layout
//! boxes, event dispatch with bubbling, a virtual clock, a log of modal
//! notifications, and clipboard writes that stay pending until the test
//! resolves them.

mod clock;
mod tree;

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use tracing::trace;

use crate::error::ClipboardError;
use crate::host::{
    Clipboard, ClipboardCallback, Dom, DomEvent, EventHandler, EventKind, EventSource,
    ListenerId, Notifier, Rect, TimerId, Timers,
};
use crate::selector::Selector;

use clock::Clock;
pub use clock::PendingTimer;
pub use tree::{NodeId, SIM_CHAR_WIDTH_PX};
use tree::Tree;

struct Listener {
    id: ListenerId,
    node: NodeId,
    kind: EventKind,
    handler: Rc<RefCell<EventHandler>>,
}

pub struct MemoryHost {
    tree: RefCell<Tree>,
    listeners: RefCell<Vec<Listener>>,
    next_listener: Cell<u64>,
    clock: RefCell<Clock>,
    notifications: RefCell<Vec<String>>,
    clipboard_writes: RefCell<Vec<String>>,
    clipboard_pending: RefCell<VecDeque<ClipboardCallback>>,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    pub fn new() -> Self {
        Self {
            tree: RefCell::new(Tree::new()),
            listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(0),
            clock: RefCell::new(Clock::default()),
            notifications: RefCell::new(Vec::new()),
            clipboard_writes: RefCell::new(Vec::new()),
            clipboard_pending: RefCell::new(VecDeque::new()),
        }
    }

    // ---- building the document ----

    pub fn root(&self) -> NodeId {
        self.tree.borrow().root()
    }

    pub fn body(&self) -> NodeId {
        self.tree.borrow().body()
    }

    /// Create an element under `parent` with the given attributes.
    pub fn add(&self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let mut tree = self.tree.borrow_mut();
        let node = tree.create(tag);
        for (name, value) in attrs {
            tree.set_attribute(node, name, value);
        }
        tree.append(parent, node);
        node
    }

    pub fn append(&self, parent: NodeId, child: NodeId) {
        self.tree.borrow_mut().append(parent, child);
    }

    pub fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        self.tree.borrow_mut().set_attribute(node, name, value);
    }

    pub fn remove_attribute(&self, node: NodeId, name: &str) {
        self.tree.borrow_mut().remove_attribute(node, name);
    }

    pub fn set_rect(&self, node: NodeId, rect: Rect) {
        self.tree.borrow_mut().set_rect(node, rect);
    }

    pub fn set_offset_width(&self, node: NodeId, width: f64) {
        self.tree.borrow_mut().set_offset_width(node, width);
    }

    // ---- inspecting the document ----

    pub fn tag(&self, node: NodeId) -> String {
        self.tree.borrow().tag(node).to_string()
    }

    pub fn text(&self, node: NodeId) -> String {
        self.tree.borrow().text_content(node)
    }

    pub fn html(&self, node: NodeId) -> String {
        self.tree.borrow().inner_html(node)
    }

    pub fn classes(&self, node: NodeId) -> Vec<String> {
        self.tree.borrow().classes(node)
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.tree.borrow().style(node, property).map(str::to_string)
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.tree.borrow().children(node)
    }

    pub fn is_attached(&self, node: NodeId) -> bool {
        self.tree.borrow().is_attached(node)
    }

    pub fn notifications(&self) -> Vec<String> {
        self.notifications.borrow().clone()
    }

    pub fn clipboard_writes(&self) -> Vec<String> {
        self.clipboard_writes.borrow().clone()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    // ---- driving events ----

    /// Dispatch `kind` at `target`, running target listeners then (for
    /// bubbling kinds) ancestor listeners. Returns the finished event.
    pub fn dispatch(&self, target: NodeId, kind: EventKind) -> DomEvent {
        let mut path = vec![target];
        if bubbles(kind) {
            path.extend(self.tree.borrow().ancestors(target));
        }

        let mut event = DomEvent::new(kind);
        for node in path {
            // Snapshot so handlers may add or remove listeners while running.
            let handlers: Vec<Rc<RefCell<EventHandler>>> = self
                .listeners
                .borrow()
                .iter()
                .filter(|l| l.node == node && l.kind == kind)
                .map(|l| Rc::clone(&l.handler))
                .collect();
            for handler in handlers {
                let mut h = handler.borrow_mut();
                (*h)(&mut event);
            }
        }
        trace!(
            kind = kind.as_str(),
            prevented = event.default_prevented(),
            "sim dispatch"
        );
        event
    }

    pub fn click(&self, node: NodeId) -> DomEvent {
        self.dispatch(node, EventKind::Click)
    }

    /// Returns `true` if the submission would go ahead.
    pub fn submit(&self, form: NodeId) -> bool {
        !self.dispatch(form, EventKind::Submit).default_prevented()
    }

    pub fn hover(&self, node: NodeId) {
        self.dispatch(node, EventKind::MouseEnter);
    }

    pub fn unhover(&self, node: NodeId) {
        self.dispatch(node, EventKind::MouseLeave);
    }

    /// Replace the input's file list and fire `change`.
    pub fn select_files(&self, input: NodeId, names: &[&str]) {
        self.set_files(input, names);
        self.dispatch(input, EventKind::Change);
    }

    /// Replace the input's file list without firing anything.
    pub fn set_files(&self, input: NodeId, names: &[&str]) {
        self.tree
            .borrow_mut()
            .set_files(input, names.iter().map(|s| s.to_string()).collect());
    }

    // ---- time ----

    pub fn now_ms(&self) -> u64 {
        self.clock.borrow().now_ms()
    }

    pub fn pending_timers(&self) -> Vec<PendingTimer> {
        self.clock.borrow().pending()
    }

    /// Move virtual time forward, firing every timer that comes due on the
    /// way, including ones scheduled by earlier callbacks in this window.
    pub fn advance(&self, ms: u64) {
        let target = self.now_ms() + ms;
        loop {
            let next = self.clock.borrow_mut().pop_due(target);
            let Some((due_at, callback)) = next else {
                break;
            };
            self.clock.borrow_mut().set_now(due_at);
            callback();
        }
        self.clock.borrow_mut().set_now(target);
    }

    // ---- clipboard ----

    pub fn pending_clipboard_writes(&self) -> usize {
        self.clipboard_pending.borrow().len()
    }

    /// Settle the oldest outstanding clipboard write. Returns `false` if none
    /// was pending.
    pub fn resolve_clipboard(&self, result: Result<(), ClipboardError>) -> bool {
        let next = self.clipboard_pending.borrow_mut().pop_front();
        match next {
            Some(done) => {
                done(result);
                true
            }
            None => false,
        }
    }
}

fn bubbles(kind: EventKind) -> bool {
    !matches!(kind, EventKind::MouseEnter | EventKind::MouseLeave)
}

impl Dom for MemoryHost {
    type Node = NodeId;

    fn query_first(&self, scope: &NodeId, selector: &Selector) -> Option<NodeId> {
        self.tree
            .borrow()
            .query_all(*scope, selector)
            .into_iter()
            .next()
    }

    fn query_all(&self, scope: &NodeId, selector: &Selector) -> Vec<NodeId> {
        self.tree.borrow().query_all(*scope, selector)
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.tree.borrow().parent(*node)
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.tree.borrow().attribute(*node, name).map(str::to_string)
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.tree.borrow().has_class(*node, class)
    }

    fn add_class(&self, node: &NodeId, class: &str) {
        self.tree.borrow_mut().add_class(*node, class);
    }

    fn remove_class(&self, node: &NodeId, class: &str) {
        self.tree.borrow_mut().remove_class(*node, class);
    }

    fn toggle_class(&self, node: &NodeId, class: &str) -> bool {
        let mut tree = self.tree.borrow_mut();
        if tree.has_class(*node, class) {
            tree.remove_class(*node, class);
            false
        } else {
            tree.add_class(*node, class);
            true
        }
    }

    fn set_class_name(&self, node: &NodeId, class_name: &str) {
        self.tree
            .borrow_mut()
            .set_attribute(*node, "class", class_name);
    }

    fn set_text(&self, node: &NodeId, text: &str) {
        self.tree.borrow_mut().set_text(*node, text);
    }

    fn inner_html(&self, node: &NodeId) -> String {
        self.tree.borrow().inner_html(*node)
    }

    fn set_inner_html(&self, node: &NodeId, html: &str) {
        self.tree.borrow_mut().set_inner_html(*node, html);
    }

    fn set_style(&self, node: &NodeId, property: &str, value: &str) {
        self.tree.borrow_mut().set_style(*node, property, value);
    }

    fn create_element(&self, tag: &str) -> Option<NodeId> {
        Some(self.tree.borrow_mut().create(tag))
    }

    fn append_to_body(&self, node: &NodeId) {
        let mut tree = self.tree.borrow_mut();
        let body = tree.body();
        tree.append(body, *node);
    }

    fn remove(&self, node: &NodeId) {
        self.tree.borrow_mut().detach(*node);
    }

    fn bounding_rect(&self, node: &NodeId) -> Rect {
        self.tree.borrow().rect(*node)
    }

    fn offset_width(&self, node: &NodeId) -> f64 {
        self.tree.borrow().offset_width(*node)
    }

    fn selected_files(&self, input: &NodeId) -> Vec<String> {
        self.tree.borrow().files(*input).to_vec()
    }
}

impl EventSource for MemoryHost {
    fn listen(&self, node: &NodeId, kind: EventKind, handler: EventHandler) -> ListenerId {
        let id = ListenerId(self.next_listener.get() + 1);
        self.next_listener.set(id.0);
        self.listeners.borrow_mut().push(Listener {
            id,
            node: *node,
            kind,
            handler: Rc::new(RefCell::new(handler)),
        });
        id
    }

    fn unlisten(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|l| l.id != id);
    }
}

impl Timers for MemoryHost {
    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerId {
        self.clock.borrow_mut().schedule(delay_ms, callback)
    }

    fn clear_timeout(&self, id: TimerId) {
        self.clock.borrow_mut().cancel(id);
    }
}

impl Notifier for MemoryHost {
    fn notify(&self, message: &str) {
        self.notifications.borrow_mut().push(message.to_string());
    }
}

impl Clipboard for MemoryHost {
    fn write_text(&self, text: &str, done: ClipboardCallback) {
        self.clipboard_writes.borrow_mut().push(text.to_string());
        self.clipboard_pending.borrow_mut().push_back(done);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_bubbles_to_ancestor_listeners() {
        let host = MemoryHost::new();
        let btn = host.add(host.body(), "button", &[]);
        let icon = host.add(btn, "i", &[]);
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        host.listen(&btn, EventKind::Click, Box::new(move |_: &mut DomEvent| h.set(h.get() + 1)));

        host.click(icon);
        host.click(btn);
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn hover_does_not_bubble() {
        let host = MemoryHost::new();
        let outer = host.add(host.body(), "div", &[]);
        let inner = host.add(outer, "span", &[]);
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        host.listen(&outer, EventKind::MouseEnter, Box::new(move |_: &mut DomEvent| h.set(h.get() + 1)));

        host.hover(inner);
        assert_eq!(hits.get(), 0);
        host.hover(outer);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn unlisten_stops_delivery() {
        let host = MemoryHost::new();
        let form = host.add(host.body(), "form", &[]);
        let id = host.listen(&form, EventKind::Submit, Box::new(|ev: &mut DomEvent| ev.prevent_default()));
        assert!(!host.submit(form));
        host.unlisten(id);
        assert!(host.submit(form));
        assert_eq!(host.listener_count(), 0);
    }

    #[test]
    fn advance_fires_in_due_order_and_sets_now() {
        let host = Rc::new(MemoryHost::new());
        let seen = Rc::new(RefCell::new(Vec::new()));
        for delay in [30u32, 10, 20] {
            let (s, h) = (Rc::clone(&seen), Rc::clone(&host));
            host.set_timeout(delay, Box::new(move || s.borrow_mut().push(h.now_ms())));
        }
        host.advance(25);
        assert_eq!(*seen.borrow(), vec![10, 20]);
        assert_eq!(host.now_ms(), 25);
        host.advance(5);
        assert_eq!(*seen.borrow(), vec![10, 20, 30]);
    }

    #[test]
    fn clipboard_writes_wait_for_resolution() {
        let host = MemoryHost::new();
        let result = Rc::new(RefCell::new(None));
        let r = Rc::clone(&result);
        host.write_text("abc", Box::new(move |res| *r.borrow_mut() = Some(res)));
        assert_eq!(host.clipboard_writes(), vec!["abc".to_string()]);
        assert!(result.borrow().is_none());

        assert!(host.resolve_clipboard(Err(ClipboardError::new("denied"))));
        assert_eq!(
            *result.borrow(),
            Some(Err(ClipboardError::new("denied")))
        );
        assert!(!host.resolve_clipboard(Ok(())));
    }
}
