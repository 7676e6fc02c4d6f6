//! Capabilities the page behaviors are written against.
//!
//! A browser host backs these with `web-sys`; [`crate::sim::MemoryHost`]
//! backs them with an in-memory tree so the behaviors run under `cargo test`.
//! Everything here is single-threaded: handlers are `'static` closures that
//! run on the host's one event loop.

use std::fmt;

use crate::error::ClipboardError;
use crate::selector::Selector;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }
}

/// Element tree access.
///
/// Mutators take `&self`; hosts use interior mutability the way the browser
/// does. Operating on a node that is no longer attached is never an error.
pub trait Dom: 'static {
    type Node: Clone + PartialEq + fmt::Debug + 'static;

    fn query_first(&self, scope: &Self::Node, selector: &Selector) -> Option<Self::Node>;
    fn query_all(&self, scope: &Self::Node, selector: &Selector) -> Vec<Self::Node>;
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn has_class(&self, node: &Self::Node, class: &str) -> bool;
    fn add_class(&self, node: &Self::Node, class: &str);
    fn remove_class(&self, node: &Self::Node, class: &str);
    /// Returns whether the class is present afterwards.
    fn toggle_class(&self, node: &Self::Node, class: &str) -> bool;
    fn set_class_name(&self, node: &Self::Node, class_name: &str);

    fn set_text(&self, node: &Self::Node, text: &str);
    fn inner_html(&self, node: &Self::Node) -> String;
    fn set_inner_html(&self, node: &Self::Node, html: &str);
    fn set_style(&self, node: &Self::Node, property: &str, value: &str);

    fn create_element(&self, tag: &str) -> Option<Self::Node>;
    fn append_to_body(&self, node: &Self::Node);
    fn remove(&self, node: &Self::Node);

    fn bounding_rect(&self, node: &Self::Node) -> Rect;
    fn offset_width(&self, node: &Self::Node) -> f64;

    /// Names of the files currently selected in a file input, in order.
    fn selected_files(&self, input: &Self::Node) -> Vec<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Change,
    Submit,
    MouseEnter,
    MouseLeave,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::Change => "change",
            EventKind::Submit => "submit",
            EventKind::MouseEnter => "mouseenter",
            EventKind::MouseLeave => "mouseleave",
        }
    }
}

/// The part of a dispatched event a handler can see or affect.
#[derive(Debug)]
pub struct DomEvent {
    kind: EventKind,
    default_prevented: bool,
}

impl DomEvent {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            default_prevented: false,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

pub type EventHandler = Box<dyn FnMut(&mut DomEvent)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

pub trait EventSource: Dom {
    fn listen(&self, node: &Self::Node, kind: EventKind, handler: EventHandler) -> ListenerId;
    /// Unknown ids are ignored.
    fn unlisten(&self, id: ListenerId);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

pub trait Timers: 'static {
    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerId;
    /// Clearing a fired or unknown timer is a no-op.
    fn clear_timeout(&self, id: TimerId);
}

pub trait Notifier: 'static {
    /// Blocking, modal notification.
    fn notify(&self, message: &str);
}

pub type ClipboardCallback = Box<dyn FnOnce(Result<(), ClipboardError>)>;

pub trait Clipboard: 'static {
    /// Start an asynchronous write. `done` runs later on the event loop, never
    /// re-entrantly from inside this call.
    fn write_text(&self, text: &str, done: ClipboardCallback);
}

/// Everything [`crate::mount`] needs from its environment.
pub trait Host: EventSource + Timers + Notifier + Clipboard {}

impl<T> Host for T where T: EventSource + Timers + Notifier + Clipboard {}
