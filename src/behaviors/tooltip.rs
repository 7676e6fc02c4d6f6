use std::cell::RefCell;
use std::rc::Rc;

use hashbrown::HashMap;

use crate::config::TooltipConfig;
use crate::float_fmt::fmt_px;
use crate::host::{Dom, DomEvent, EventKind, Host, ListenerId, Rect};
use crate::selector::Selector;

/// Active overlays keyed by the anchor's binding slot.
///
/// Slots are assigned at mount, one per titled element, so ownership lives
/// here instead of on the DOM node.
pub(crate) struct TooltipRegistry<N> {
    active: HashMap<usize, N>,
}

impl<N> TooltipRegistry<N> {
    fn new() -> Self {
        Self {
            active: HashMap::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.active.len()
    }

    fn insert(&mut self, slot: usize, overlay: N) -> Option<N> {
        self.active.insert(slot, overlay)
    }

    fn take(&mut self, slot: usize) -> Option<N> {
        self.active.remove(&slot)
    }

    fn drain(&mut self) -> Vec<N> {
        self.active.drain().map(|(_, n)| n).collect()
    }
}

pub(crate) type SharedRegistry<N> = Rc<RefCell<TooltipRegistry<N>>>;

pub(crate) fn bind<H: Host>(
    host: &Rc<H>,
    root: &H::Node,
    cfg: &TooltipConfig,
) -> (Vec<ListenerId>, SharedRegistry<H::Node>) {
    let registry = Rc::new(RefCell::new(TooltipRegistry::new()));
    let cfg = Rc::new(cfg.clone());
    let mut listeners = Vec::new();

    let anchors = host.query_all(root, &Selector::has_attr(cfg.title_attr.as_str()));
    for (slot, anchor) in anchors.into_iter().enumerate() {
        let (h, reg, c, a) = (
            Rc::clone(host),
            Rc::clone(&registry),
            Rc::clone(&cfg),
            anchor.clone(),
        );
        listeners.push(host.listen(
            &anchor,
            EventKind::MouseEnter,
            Box::new(move |_: &mut DomEvent| {
                show(&*h, &reg, slot, &a, &c);
            }),
        ));

        let (h, reg) = (Rc::clone(host), Rc::clone(&registry));
        listeners.push(host.listen(
            &anchor,
            EventKind::MouseLeave,
            Box::new(move |_: &mut DomEvent| {
                hide(&*h, &reg, slot);
            }),
        ));
    }

    (listeners, registry)
}

/// `(top, left)` placing an overlay of `overlay_width` centred above `anchor`.
pub fn overlay_position(anchor: Rect, overlay_width: f64, offset_px: f64) -> (f64, f64) {
    let top = anchor.top - offset_px;
    let left = anchor.left + anchor.width / 2.0 - overlay_width / 2.0;
    (top, left)
}

/// Create and place the overlay for `slot`, replacing any it already owns.
pub(crate) fn show<D: Dom + ?Sized>(
    dom: &D,
    registry: &RefCell<TooltipRegistry<D::Node>>,
    slot: usize,
    anchor: &D::Node,
    cfg: &TooltipConfig,
) -> Option<D::Node> {
    let stale = registry.borrow_mut().take(slot);
    if let Some(stale) = stale {
        dom.remove(&stale);
    }

    let text = dom.attribute(anchor, &cfg.title_attr).unwrap_or_default();
    let overlay = dom.create_element(&cfg.overlay_tag)?;
    dom.set_class_name(&overlay, &cfg.overlay_class);
    dom.set_text(&overlay, &text);
    // Must be attached before it has a width to centre on.
    dom.append_to_body(&overlay);

    let (top, left) = overlay_position(
        dom.bounding_rect(anchor),
        dom.offset_width(&overlay),
        cfg.offset_px,
    );
    dom.set_style(&overlay, "top", &fmt_px(top));
    dom.set_style(&overlay, "left", &fmt_px(left));

    registry.borrow_mut().insert(slot, overlay.clone());
    Some(overlay)
}

pub(crate) fn hide<D: Dom + ?Sized>(
    dom: &D,
    registry: &RefCell<TooltipRegistry<D::Node>>,
    slot: usize,
) -> bool {
    let owned = registry.borrow_mut().take(slot);
    match owned {
        Some(overlay) => {
            dom.remove(&overlay);
            true
        }
        None => false,
    }
}

pub(crate) fn hide_all<D: Dom + ?Sized>(dom: &D, registry: &RefCell<TooltipRegistry<D::Node>>) {
    let overlays = registry.borrow_mut().drain();
    for overlay in overlays {
        dom.remove(&overlay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{MemoryHost, NodeId, SIM_CHAR_WIDTH_PX};

    fn page() -> (Rc<MemoryHost>, NodeId) {
        let host = Rc::new(MemoryHost::new());
        let toolbar = host.add(host.body(), "div", &[]);
        let save = host.add(toolbar, "button", &[("title", "Save file")]);
        host.set_rect(save, Rect::new(100.0, 200.0, 40.0, 24.0));
        (host, save)
    }

    fn overlays(host: &MemoryHost) -> Vec<NodeId> {
        host.children(host.body())
            .into_iter()
            .filter(|&n| host.classes(n).contains(&"z-50".to_string()))
            .collect()
    }

    #[test]
    fn hover_creates_one_overlay_and_leave_removes_it() {
        let (host, save) = page();
        let root = host.root();
        let (listeners, registry) = bind(&host, &root, &TooltipConfig::default());
        assert_eq!(listeners.len(), 2);

        host.hover(save);
        let shown = overlays(&host);
        assert_eq!(shown.len(), 1);
        assert_eq!(host.text(shown[0]), "Save file");
        assert_eq!(host.tag(shown[0]), "div");
        assert_eq!(registry.borrow().len(), 1);

        host.unhover(save);
        assert!(overlays(&host).is_empty());
        assert!(!host.is_attached(shown[0]));
        assert_eq!(registry.borrow().len(), 0);

        host.hover(save);
        assert_eq!(overlays(&host).len(), 1);
    }

    #[test]
    fn reentering_before_leave_keeps_a_single_overlay() {
        let (host, save) = page();
        let root = host.root();
        let (_, registry) = bind(&host, &root, &TooltipConfig::default());

        host.hover(save);
        host.hover(save);
        host.hover(save);
        assert_eq!(overlays(&host).len(), 1);
        assert_eq!(registry.borrow().len(), 1);

        host.unhover(save);
        assert!(overlays(&host).is_empty());
    }

    #[test]
    fn overlay_is_centred_above_anchor_using_measured_width() {
        let (host, save) = page();
        let root = host.root();
        bind(&host, &root, &TooltipConfig::default());

        host.hover(save);
        let overlay = overlays(&host)[0];
        let width = "Save file".len() as f64 * SIM_CHAR_WIDTH_PX;
        assert_eq!(host.style(overlay, "top").as_deref(), Some("160px"));
        let expected_left = fmt_px(100.0 + 20.0 - width / 2.0);
        assert_eq!(host.style(overlay, "left"), Some(expected_left));
    }

    #[test]
    fn position_math() {
        let anchor = Rect::new(10.0, 50.0, 30.0, 20.0);
        assert_eq!(overlay_position(anchor, 60.0, 40.0), (10.0, -5.0));
    }

    #[test]
    fn leaving_without_overlay_is_a_no_op() {
        let (host, save) = page();
        let registry = RefCell::new(TooltipRegistry::new());
        assert!(!hide(&*host, &registry, 0));
        host.unhover(save);
    }

    #[test]
    fn overlays_are_tracked_per_anchor() {
        let (host, save) = page();
        let open = host.add(host.body(), "a", &[("title", "Open")]);
        let root = host.root();
        let (_, registry) = bind(&host, &root, &TooltipConfig::default());

        host.hover(save);
        host.hover(open);
        assert_eq!(overlays(&host).len(), 2);
        host.unhover(save);
        let left = overlays(&host);
        assert_eq!(left.len(), 1);
        assert_eq!(host.text(left[0]), "Open");

        hide_all(&*host, &registry);
        assert!(overlays(&host).is_empty());
    }
}
