use std::rc::Rc;

use crate::config::FileDisplayConfig;
use crate::host::{Dom, DomEvent, EventKind, Host, ListenerId};
use crate::selector::Selector;

/// One `change` listener per file input present at mount.
pub(crate) fn bind<H: Host>(
    host: &Rc<H>,
    root: &H::Node,
    cfg: &FileDisplayConfig,
) -> Vec<ListenerId> {
    let cfg = Rc::new(cfg.clone());
    host.query_all(root, &Selector::input_type("file"))
        .into_iter()
        .map(|input| {
            let h = Rc::clone(host);
            let cfg = Rc::clone(&cfg);
            let target = input.clone();
            host.listen(
                &input,
                EventKind::Change,
                Box::new(move |_: &mut DomEvent| {
                    show_selection(&*h, &target, &cfg);
                }),
            )
        })
        .collect()
}

/// Label text for a selection: the first file's name, or the placeholder.
pub(crate) fn display_text<'a>(files: &'a [String], cfg: &'a FileDisplayConfig) -> &'a str {
    files
        .first()
        .map(String::as_str)
        .filter(|name| !name.is_empty())
        .unwrap_or(&cfg.empty_text)
}

/// Update the input's sibling label. Returns `false` when there is no label.
pub(crate) fn show_selection<D: Dom + ?Sized>(
    dom: &D,
    input: &D::Node,
    cfg: &FileDisplayConfig,
) -> bool {
    let Some(parent) = dom.parent(input) else {
        return false;
    };
    let Some(display) = dom.query_first(&parent, &Selector::class(cfg.display_class.as_str()))
    else {
        return false;
    };

    let files = dom.selected_files(input);
    dom.set_text(&display, display_text(&files, cfg));
    for class in &cfg.idle_classes {
        dom.remove_class(&display, class);
    }
    for class in &cfg.selected_classes {
        dom.add_class(&display, class);
    }
    true
}
