use std::cell::{Cell, RefCell};
use std::rc::Rc;

use hashbrown::HashMap;
use tracing::{debug, warn};

use crate::config::CopyConfig;
use crate::host::{Dom, DomEvent, EventKind, Host, ListenerId, Timers};
use crate::selector::Selector;
use crate::timers::TimerToken;

struct Showing<N> {
    node: N,
    original: String,
    restore: TimerToken,
}

/// Controls currently showing feedback, keyed by binding slot.
pub(crate) struct CopyFeedback<N> {
    showing: RefCell<HashMap<usize, Showing<N>>>,
}

impl<N: Clone + 'static> CopyFeedback<N> {
    fn new() -> Self {
        Self {
            showing: RefCell::new(HashMap::new()),
        }
    }

    pub(crate) fn active(&self) -> usize {
        self.showing.borrow().len()
    }

    /// Swap in `html` for `delay_ms`, then put the original back.
    ///
    /// If the control is already showing feedback, the first snapshot is kept
    /// and the restore timer restarts.
    fn flash<H>(self: &Rc<Self>, host: &Rc<H>, slot: usize, node: &N, html: &str, delay_ms: u32)
    where
        H: Dom<Node = N> + Timers,
    {
        let previous = self.showing.borrow_mut().remove(&slot);
        let original = match previous {
            Some(prev) => {
                prev.restore.cancel(&**host);
                prev.original
            }
            None => host.inner_html(node),
        };
        host.set_inner_html(node, html);

        let restore = TimerToken::new();
        self.showing.borrow_mut().insert(
            slot,
            Showing {
                node: node.clone(),
                original,
                restore: restore.clone(),
            },
        );

        let (this, h) = (Rc::clone(self), Rc::clone(host));
        restore.schedule(host, delay_ms, move || {
            this.restore(&*h, slot);
        });
    }

    fn restore<D: Dom<Node = N> + ?Sized>(&self, dom: &D, slot: usize) {
        let entry = self.showing.borrow_mut().remove(&slot);
        if let Some(entry) = entry {
            dom.set_inner_html(&entry.node, &entry.original);
        }
    }

    /// Cancel every pending restore and put original content back now.
    pub(crate) fn restore_all<D>(&self, dom: &D)
    where
        D: Dom<Node = N> + Timers,
    {
        let entries: Vec<Showing<N>> = self.showing.borrow_mut().drain().map(|(_, s)| s).collect();
        for entry in entries {
            entry.restore.cancel(dom);
            dom.set_inner_html(&entry.node, &entry.original);
        }
    }
}

pub(crate) fn bind<H: Host>(
    host: &Rc<H>,
    root: &H::Node,
    cfg: &CopyConfig,
    live: &Rc<Cell<bool>>,
) -> (Vec<ListenerId>, Rc<CopyFeedback<H::Node>>) {
    let feedback = Rc::new(CopyFeedback::new());
    let cfg = Rc::new(cfg.clone());

    let controls = host.query_all(root, &Selector::class(cfg.control_class.as_str()));
    let listeners = controls
        .into_iter()
        .enumerate()
        .map(|(slot, control)| {
            let (h, fb, c, live, target) = (
                Rc::clone(host),
                Rc::clone(&feedback),
                Rc::clone(&cfg),
                Rc::clone(live),
                control.clone(),
            );
            host.listen(
                &control,
                EventKind::Click,
                Box::new(move |_: &mut DomEvent| {
                    copy(&h, &fb, &c, &live, slot, &target);
                }),
            )
        })
        .collect();

    (listeners, feedback)
}

fn copy<H: Host>(
    host: &Rc<H>,
    feedback: &Rc<CopyFeedback<H::Node>>,
    cfg: &Rc<CopyConfig>,
    live: &Rc<Cell<bool>>,
    slot: usize,
    control: &H::Node,
) {
    let Some(payload) = host.attribute(control, &cfg.payload_attr) else {
        debug!(attr = %cfg.payload_attr, "copy control has no payload");
        return;
    };

    let (h, fb, c, live, target) = (
        Rc::clone(host),
        Rc::clone(feedback),
        Rc::clone(cfg),
        Rc::clone(live),
        control.clone(),
    );
    host.write_text(
        &payload,
        Box::new(move |result| {
            if !live.get() {
                return;
            }
            match result {
                Ok(()) => fb.flash(&h, slot, &target, &c.copied_html, c.feedback_ms),
                Err(err) => {
                    warn!(error = %err, "copy to clipboard failed");
                    if let Some(html) = &c.copy_failed_html {
                        fb.flash(&h, slot, &target, html, c.feedback_ms);
                    }
                }
            }
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClipboardError;
    use crate::sim::{MemoryHost, NodeId};

    const ORIGINAL: &str = r#"<i class="fas fa-copy mr-2"></i>Copy link"#;
    const COPIED: &str = r#"<i class="fas fa-check mr-2"></i>Copied!"#;

    fn page(cfg: &CopyConfig) -> (Rc<MemoryHost>, NodeId, Rc<CopyFeedback<NodeId>>, Rc<Cell<bool>>) {
        let host = Rc::new(MemoryHost::new());
        let btn = host.add(
            host.body(),
            "button",
            &[("class", "copy-btn btn"), ("data-copy", "abc123")],
        );
        host.set_inner_html(&btn, ORIGINAL);
        let live = Rc::new(Cell::new(true));
        let root = host.root();
        let (_, feedback) = bind(&host, &root, cfg, &live);
        (host, btn, feedback, live)
    }

    #[test]
    fn writes_payload_and_flashes_confirmation_for_2000ms() {
        let (host, btn, feedback, _live) = page(&CopyConfig::default());

        host.click(btn);
        assert_eq!(host.clipboard_writes(), vec!["abc123".to_string()]);
        assert_eq!(host.html(btn), ORIGINAL);

        host.advance(50);
        assert!(host.resolve_clipboard(Ok(())));
        assert_eq!(host.html(btn), COPIED);
        assert_eq!(feedback.active(), 1);

        host.advance(1999);
        assert_eq!(host.html(btn), COPIED);
        host.advance(1);
        assert_eq!(host.html(btn), ORIGINAL);
        assert_eq!(feedback.active(), 0);
    }

    #[test]
    fn rejected_write_leaves_control_alone_by_default() {
        let (host, btn, feedback, _live) = page(&CopyConfig::default());
        host.click(btn);
        host.resolve_clipboard(Err(ClipboardError::new("NotAllowedError")));
        assert_eq!(host.html(btn), ORIGINAL);
        assert_eq!(feedback.active(), 0);
        assert!(host.pending_timers().is_empty());
    }

    #[test]
    fn rejected_write_can_show_failure_label() {
        let cfg = CopyConfig {
            copy_failed_html: Some("Copy failed".to_string()),
            ..CopyConfig::default()
        };
        let (host, btn, _feedback, _live) = page(&cfg);
        host.click(btn);
        host.resolve_clipboard(Err(ClipboardError::new("NotAllowedError")));
        assert_eq!(host.html(btn), "Copy failed");
        host.advance(2000);
        assert_eq!(host.html(btn), ORIGINAL);
    }

    #[test]
    fn second_copy_during_confirmation_restores_true_original() {
        let (host, btn, _feedback, _live) = page(&CopyConfig::default());

        host.click(btn);
        host.resolve_clipboard(Ok(()));
        host.advance(1500);
        host.click(btn);
        host.resolve_clipboard(Ok(()));
        assert_eq!(host.html(btn), COPIED);

        host.advance(1999);
        assert_eq!(host.html(btn), COPIED);
        host.advance(1);
        assert_eq!(host.html(btn), ORIGINAL);
    }

    #[test]
    fn control_without_payload_is_ignored() {
        let (host, btn, _feedback, _live) = page(&CopyConfig::default());
        host.remove_attribute(btn, "data-copy");
        host.click(btn);
        assert!(host.clipboard_writes().is_empty());
    }

    #[test]
    fn resolution_after_teardown_is_dropped() {
        let (host, btn, feedback, live) = page(&CopyConfig::default());
        host.click(btn);
        live.set(false);
        host.resolve_clipboard(Ok(()));
        assert_eq!(host.html(btn), ORIGINAL);
        assert_eq!(feedback.active(), 0);
    }

    #[test]
    fn restore_all_puts_content_back_immediately() {
        let (host, btn, feedback, _live) = page(&CopyConfig::default());
        host.click(btn);
        host.resolve_clipboard(Ok(()));
        feedback.restore_all(&*host);
        assert_eq!(host.html(btn), ORIGINAL);
        assert!(host.pending_timers().is_empty());
    }
}
