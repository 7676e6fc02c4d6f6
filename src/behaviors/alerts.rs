use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::config::AlertConfig;
use crate::host::{Dom, Host, Timers};
use crate::selector::Selector;
use crate::timers::TimerToken;

/// Pending auto-dismissals, one token per alert found at mount.
pub(crate) struct AlertDismissal<N> {
    entries: RefCell<Vec<(N, TimerToken)>>,
}

impl<N: Clone + PartialEq + 'static> AlertDismissal<N> {
    fn new() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
        }
    }

    /// Alerts whose fade or removal has not run yet.
    pub(crate) fn pending(&self) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|(_, token)| token.is_pending())
            .count()
    }

    /// Cancel the schedule for `alert` and remove it now.
    pub(crate) fn dismiss<D>(&self, dom: &D, alert: &N) -> bool
    where
        D: Dom<Node = N> + Timers,
    {
        let entry = {
            let mut entries = self.entries.borrow_mut();
            let idx = entries.iter().position(|(n, _)| n == alert);
            idx.map(|i| entries.remove(i))
        };
        match entry {
            Some((node, token)) => {
                token.cancel(dom);
                dom.remove(&node);
                true
            }
            None => false,
        }
    }

    pub(crate) fn cancel_all<T: Timers + ?Sized>(&self, timers: &T) {
        let entries = std::mem::take(&mut *self.entries.borrow_mut());
        let cancelled = entries
            .iter()
            .filter(|(_, token)| token.cancel(timers))
            .count();
        if cancelled > 0 {
            debug!(cancelled, "alert timers cancelled");
        }
    }
}

pub(crate) fn bind<H: Host>(
    host: &Rc<H>,
    root: &H::Node,
    cfg: &AlertConfig,
) -> Rc<AlertDismissal<H::Node>> {
    let dismissal = Rc::new(AlertDismissal::new());
    for alert in host.query_all(root, &Selector::attr_eq("role", cfg.role.as_str())) {
        let token = TimerToken::new();
        schedule(host, &alert, &token, cfg);
        dismissal.entries.borrow_mut().push((alert, token));
    }
    dismissal
}

/// Fade after `fade_after_ms`, then remove `remove_after_fade_ms` later.
fn schedule<H: Host>(host: &Rc<H>, alert: &H::Node, token: &TimerToken, cfg: &AlertConfig) {
    let h = Rc::clone(host);
    let node = alert.clone();
    let next = token.clone();
    let remove_after = cfg.remove_after_fade_ms;
    token.schedule(host, cfg.fade_after_ms, move || {
        h.set_style(&node, "opacity", "0");
        let remover = Rc::clone(&h);
        next.schedule(&h, remove_after, move || remover.remove(&node));
    });
}
