use std::cell::{Cell, RefCell};

use convertpro::host::{
    Clipboard, ClipboardCallback, Dom, DomEvent, EventHandler, EventKind, EventSource,
    ListenerId, Notifier, Rect, TimerId, Timers,
};
use convertpro::{ClipboardError, Error, Result, Selector};
use hashbrown::HashMap;
use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};

struct Registered {
    target: web_sys::Element,
    kind: EventKind,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

pub(crate) struct WebHost {
    window: web_sys::Window,
    document: web_sys::Document,
    listeners: RefCell<HashMap<u64, Registered>>,
    next_listener: Cell<u64>,
}

impl WebHost {
    pub(crate) fn new() -> Result<Self> {
        let window = web_sys::window().ok_or(Error::MissingDocument)?;
        let document = window.document().ok_or(Error::MissingDocument)?;
        Ok(Self {
            window,
            document,
            listeners: RefCell::new(HashMap::new()),
            next_listener: Cell::new(0),
        })
    }

    pub(crate) fn document(&self) -> &web_sys::Document {
        &self.document
    }

    pub(crate) fn document_element(&self) -> Result<web_sys::Element> {
        self.document
            .document_element()
            .ok_or(Error::MissingDocument)
    }
}

pub(crate) fn js_error_message(v: &JsValue) -> String {
    if let Some(e) = v.dyn_ref::<js_sys::Error>() {
        return String::from(e.message());
    }
    v.as_string().unwrap_or_else(|| "unknown error".to_string())
}

impl Dom for WebHost {
    type Node = web_sys::Element;

    fn query_first(&self, scope: &web_sys::Element, selector: &Selector) -> Option<web_sys::Element> {
        scope.query_selector(&selector.to_css()).ok().flatten()
    }

    fn query_all(&self, scope: &web_sys::Element, selector: &Selector) -> Vec<web_sys::Element> {
        let Ok(list) = scope.query_selector_all(&selector.to_css()) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|n| n.dyn_into::<web_sys::Element>().ok())
            .collect()
    }

    fn parent(&self, node: &web_sys::Element) -> Option<web_sys::Element> {
        node.parent_element()
    }

    fn attribute(&self, node: &web_sys::Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn has_class(&self, node: &web_sys::Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn add_class(&self, node: &web_sys::Element, class: &str) {
        let _ = node.class_list().add_1(class);
    }

    fn remove_class(&self, node: &web_sys::Element, class: &str) {
        let _ = node.class_list().remove_1(class);
    }

    fn toggle_class(&self, node: &web_sys::Element, class: &str) -> bool {
        node.class_list().toggle(class).unwrap_or(false)
    }

    fn set_class_name(&self, node: &web_sys::Element, class_name: &str) {
        node.set_class_name(class_name);
    }

    fn set_text(&self, node: &web_sys::Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn inner_html(&self, node: &web_sys::Element) -> String {
        node.inner_html()
    }

    fn set_inner_html(&self, node: &web_sys::Element, html: &str) {
        node.set_inner_html(html);
    }

    fn set_style(&self, node: &web_sys::Element, property: &str, value: &str) {
        if let Some(el) = node.dyn_ref::<web_sys::HtmlElement>() {
            let _ = el.style().set_property(property, value);
        }
    }

    fn create_element(&self, tag: &str) -> Option<web_sys::Element> {
        self.document.create_element(tag).ok()
    }

    fn append_to_body(&self, node: &web_sys::Element) {
        if let Some(body) = self.document.body() {
            let _ = body.append_child(node);
        }
    }

    fn remove(&self, node: &web_sys::Element) {
        node.remove();
    }

    fn bounding_rect(&self, node: &web_sys::Element) -> Rect {
        let r = node.get_bounding_client_rect();
        Rect {
            top: r.top(),
            left: r.left(),
            width: r.width(),
            height: r.height(),
        }
    }

    fn offset_width(&self, node: &web_sys::Element) -> f64 {
        node.dyn_ref::<web_sys::HtmlElement>()
            .map(|el| f64::from(el.offset_width()))
            .unwrap_or(0.0)
    }

    fn selected_files(&self, input: &web_sys::Element) -> Vec<String> {
        let Some(files) = input
            .dyn_ref::<web_sys::HtmlInputElement>()
            .and_then(|i| i.files())
        else {
            return Vec::new();
        };
        (0..files.length())
            .filter_map(|i| files.get(i))
            .map(|f| f.name())
            .collect()
    }
}

impl EventSource for WebHost {
    fn listen(&self, node: &web_sys::Element, kind: EventKind, handler: EventHandler) -> ListenerId {
        let mut handler = handler;
        let closure = Closure::wrap(Box::new(move |ev: web_sys::Event| {
            let mut event = DomEvent::new(kind);
            handler(&mut event);
            if event.default_prevented() {
                ev.prevent_default();
            }
        }) as Box<dyn FnMut(web_sys::Event)>);

        let id = self.next_listener.get() + 1;
        self.next_listener.set(id);
        if node
            .add_event_listener_with_callback(kind.as_str(), closure.as_ref().unchecked_ref())
            .is_err()
        {
            warn!(event = kind.as_str(), "addEventListener failed");
        }
        self.listeners.borrow_mut().insert(
            id,
            Registered {
                target: node.clone(),
                kind,
                closure,
            },
        );
        ListenerId(id)
    }

    fn unlisten(&self, id: ListenerId) {
        let Some(reg) = self.listeners.borrow_mut().remove(&id.0) else {
            return;
        };
        let _ = reg.target.remove_event_listener_with_callback(
            reg.kind.as_str(),
            reg.closure.as_ref().unchecked_ref(),
        );
    }
}

impl Timers for WebHost {
    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerId {
        // Freed by wasm-bindgen when it runs; a cleared timer leaks one small
        // JS function.
        let cb = Closure::once_into_js(move || callback());
        let timeout = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), timeout)
        {
            Ok(handle) => TimerId(u64::from(handle as u32)),
            Err(e) => {
                warn!(error = %js_error_message(&e), "setTimeout failed");
                TimerId(0)
            }
        }
    }

    fn clear_timeout(&self, id: TimerId) {
        if id.0 != 0 {
            self.window.clear_timeout_with_handle(id.0 as u32 as i32);
        }
    }
}

impl Notifier for WebHost {
    fn notify(&self, message: &str) {
        let _ = self.window.alert_with_message(message);
    }
}

impl Clipboard for WebHost {
    fn write_text(&self, text: &str, done: ClipboardCallback) {
        let navigator = self.window.navigator();
        // `navigator.clipboard` is undefined outside secure contexts.
        let available = js_sys::Reflect::get(&navigator, &JsValue::from_str("clipboard"))
            .map(|v| !v.is_undefined() && !v.is_null())
            .unwrap_or(false);
        if !available {
            spawn_local(async move {
                done(Err(ClipboardError::new("clipboard API unavailable")));
            });
            return;
        }

        let promise = navigator.clipboard().write_text(text);
        spawn_local(async move {
            let result = JsFuture::from(promise)
                .await
                .map(|_| ())
                .map_err(|e| ClipboardError::new(js_error_message(&e)));
            done(result);
        });
    }
}
