//! Mounting the page behaviors onto a document subtree.

use std::cell::Cell;
use std::rc::Rc;

use tracing::{debug, info};

use crate::behaviors::alerts::{self, AlertDismissal};
use crate::behaviors::copy_button::{self, CopyFeedback};
use crate::behaviors::tooltip::{self, SharedRegistry};
use crate::behaviors::{file_display, menu, upload_guard};
use crate::config::InteractionConfig;
use crate::host::{Host, ListenerId};

/// Everything wired by [`mount`]. Dropping it leaves listeners in place;
/// call [`MountedPage::unmount`] to tear down.
pub struct MountedPage<H: Host> {
    host: Rc<H>,
    live: Rc<Cell<bool>>,
    listeners: Vec<ListenerId>,
    alerts: Rc<AlertDismissal<H::Node>>,
    tooltips: SharedRegistry<H::Node>,
    copies: Rc<CopyFeedback<H::Node>>,
}

/// Discover elements under `root` and bind every behavior.
///
/// Elements are looked up once, here. Anything added to the page later is not
/// covered until the page is mounted again.
pub fn mount<H: Host>(host: Rc<H>, root: &H::Node, config: &InteractionConfig) -> MountedPage<H> {
    let live = Rc::new(Cell::new(true));
    let mut listeners = Vec::new();

    let menu_bound = menu::bind(&host, root, &config.menu);
    listeners.extend(menu_bound);

    let file_inputs = file_display::bind(&host, root, &config.file_display);
    let forms = upload_guard::bind(&host, root, &config.upload_guard);
    let (tooltip_listeners, tooltips) = tooltip::bind(&host, root, &config.tooltip);
    let (copy_listeners, copies) = copy_button::bind(&host, root, &config.copy, &live);
    let alerts = alerts::bind(&host, root, &config.alerts);

    info!(
        menu = menu_bound.is_some(),
        file_inputs = file_inputs.len(),
        forms = forms.len(),
        tooltips = tooltip_listeners.len() / 2,
        copy_controls = copy_listeners.len(),
        alerts = alerts.pending(),
        "page interactions mounted"
    );

    listeners.extend(file_inputs);
    listeners.extend(forms);
    listeners.extend(tooltip_listeners);
    listeners.extend(copy_listeners);

    MountedPage {
        host,
        live,
        listeners,
        alerts,
        tooltips,
        copies,
    }
}

impl<H: Host> MountedPage<H> {
    pub fn host(&self) -> &Rc<H> {
        &self.host
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Alerts still waiting to fade or be removed.
    pub fn pending_alerts(&self) -> usize {
        self.alerts.pending()
    }

    pub fn active_tooltips(&self) -> usize {
        self.tooltips.borrow().len()
    }

    /// Copy controls currently showing feedback.
    pub fn active_copy_feedback(&self) -> usize {
        self.copies.active()
    }

    /// Remove one alert now and cancel its scheduled fade/removal.
    /// Returns `false` if it was not scheduled by this mount.
    pub fn dismiss_alert(&self, alert: &H::Node) -> bool {
        self.alerts.dismiss(&*self.host, alert)
    }

    /// Unregister every listener, cancel every timer, drop live overlays and
    /// restore copy controls. Clipboard writes still in flight are ignored
    /// when they settle.
    pub fn unmount(self) {
        self.live.set(false);
        for id in &self.listeners {
            self.host.unlisten(*id);
        }
        self.alerts.cancel_all(&*self.host);
        tooltip::hide_all(&*self.host, &self.tooltips);
        self.copies.restore_all(&*self.host);
        debug!(listeners = self.listeners.len(), "page interactions unmounted");
    }
}
