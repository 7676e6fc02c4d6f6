use std::rc::Rc;

use tracing::debug;

use crate::config::MenuConfig;
use crate::host::{Dom, DomEvent, EventKind, Host, ListenerId};
use crate::selector::Selector;

/// Wire the trigger to the menu container. Nothing is bound unless both exist.
pub(crate) fn bind<H: Host>(host: &Rc<H>, root: &H::Node, cfg: &MenuConfig) -> Option<ListenerId> {
    let trigger = host.query_first(root, &Selector::id(cfg.trigger_id.as_str()));
    let menu = host.query_first(root, &Selector::id(cfg.container_id.as_str()));
    let (Some(trigger), Some(menu)) = (trigger, menu) else {
        debug!(
            trigger = %cfg.trigger_id,
            container = %cfg.container_id,
            "mobile menu not on page"
        );
        return None;
    };

    let h = Rc::clone(host);
    let cfg = cfg.clone();
    let target = trigger.clone();
    Some(host.listen(
        &trigger,
        EventKind::Click,
        Box::new(move |_: &mut DomEvent| {
            toggle(&*h, &target, &menu, &cfg);
        }),
    ))
}

/// Flip the menu and swap the trigger's glyph. Returns `true` if the menu is
/// now open.
pub(crate) fn toggle<D: Dom + ?Sized>(
    dom: &D,
    trigger: &D::Node,
    menu: &D::Node,
    cfg: &MenuConfig,
) -> bool {
    let hidden = dom.toggle_class(menu, &cfg.hidden_class);
    if let Some(icon) = dom.query_first(trigger, &Selector::tag(cfg.icon_tag.as_str())) {
        let (stale, fresh) = if hidden {
            (&cfg.open_icon_class, &cfg.closed_icon_class)
        } else {
            (&cfg.closed_icon_class, &cfg.open_icon_class)
        };
        dom.remove_class(&icon, stale);
        dom.add_class(&icon, fresh);
    }
    !hidden
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{MemoryHost, NodeId};

    struct Page {
        host: Rc<MemoryHost>,
        trigger: NodeId,
        icon: NodeId,
        menu: NodeId,
    }

    fn page() -> Page {
        let host = Rc::new(MemoryHost::new());
        let nav = host.add(host.body(), "nav", &[]);
        let trigger = host.add(nav, "button", &[("id", "mobileMenuBtn")]);
        let icon = host.add(trigger, "i", &[("class", "fas fa-bars")]);
        let menu = host.add(nav, "div", &[("id", "mobileMenu"), ("class", "md:hidden hidden")]);
        Page {
            host,
            trigger,
            icon,
            menu,
        }
    }

    #[test]
    fn click_opens_and_swaps_glyph() {
        let p = page();
        let root = p.host.root();
        assert!(bind(&p.host, &root, &MenuConfig::default()).is_some());

        p.host.click(p.trigger);
        assert!(!p.host.classes(p.menu).contains(&"hidden".to_string()));
        let icon = p.host.classes(p.icon);
        assert!(icon.contains(&"fa-times".to_string()));
        assert!(!icon.contains(&"fa-bars".to_string()));
    }

    #[test]
    fn even_toggles_restore_odd_toggles_invert() {
        let p = page();
        let root = p.host.root();
        bind(&p.host, &root, &MenuConfig::default());
        let menu_before = p.host.classes(p.menu);
        let icon_before = p.host.classes(p.icon);

        for n in 1..=6 {
            // Clicks on the glyph bubble to the trigger.
            p.host.click(if n % 2 == 0 { p.icon } else { p.trigger });
            let menu_hidden = p.host.classes(p.menu).contains(&"hidden".to_string());
            let bars = p.host.classes(p.icon).contains(&"fa-bars".to_string());
            if n % 2 == 0 {
                assert!(menu_hidden && bars, "toggle #{n}");
            } else {
                assert!(!menu_hidden && !bars, "toggle #{n}");
            }
        }

        let mut menu_after = p.host.classes(p.menu);
        let mut icon_after = p.host.classes(p.icon);
        let (mut mb, mut ib) = (menu_before, icon_before);
        for v in [&mut menu_after, &mut icon_after, &mut mb, &mut ib] {
            v.sort();
        }
        assert_eq!(menu_after, mb);
        assert_eq!(icon_after, ib);
    }

    #[test]
    fn missing_container_binds_nothing() {
        let host = Rc::new(MemoryHost::new());
        let trigger = host.add(host.body(), "button", &[("id", "mobileMenuBtn")]);
        let root = host.root();
        assert!(bind(&host, &root, &MenuConfig::default()).is_none());
        assert_eq!(host.listener_count(), 0);
        host.click(trigger);
    }

    #[test]
    fn trigger_without_glyph_still_toggles() {
        let host = MemoryHost::new();
        let trigger = host.add(host.body(), "button", &[]);
        let menu = host.add(host.body(), "div", &[("class", "hidden")]);
        let cfg = MenuConfig::default();
        assert!(toggle(&host, &trigger, &menu, &cfg));
        assert!(!toggle(&host, &trigger, &menu, &cfg));
        assert_eq!(host.classes(menu), vec!["hidden".to_string()]);
    }
}
