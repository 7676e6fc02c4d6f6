use std::rc::Rc;

use tracing::info;

use crate::config::UploadGuardConfig;
use crate::host::{Dom, DomEvent, EventKind, Host, ListenerId};
use crate::selector::Selector;

pub(crate) fn bind<H: Host>(
    host: &Rc<H>,
    root: &H::Node,
    cfg: &UploadGuardConfig,
) -> Vec<ListenerId> {
    let message = Rc::new(cfg.missing_file_message.clone());
    host.query_all(root, &Selector::tag("form"))
        .into_iter()
        .map(|form| {
            let h = Rc::clone(host);
            let message = Rc::clone(&message);
            let target = form.clone();
            host.listen(
                &form,
                EventKind::Submit,
                Box::new(move |ev: &mut DomEvent| {
                    if !submission_allowed(&*h, &target) {
                        ev.prevent_default();
                        info!("upload blocked: no file selected");
                        h.notify(&message);
                    }
                }),
            )
        })
        .collect()
}

/// A form may submit unless its first file input has nothing selected.
/// The input is looked up at submit time.
pub(crate) fn submission_allowed<D: Dom + ?Sized>(dom: &D, form: &D::Node) -> bool {
    match dom.query_first(form, &Selector::input_type("file")) {
        Some(input) => !dom.selected_files(&input).is_empty(),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::MemoryHost;

    #[test]
    fn empty_file_input_blocks_with_one_notification() {
        let host = Rc::new(MemoryHost::new());
        let form = host.add(host.body(), "form", &[("method", "post")]);
        let input = host.add(form, "input", &[("type", "file")]);
        let root = host.root();
        bind(&host, &root, &UploadGuardConfig::default());

        assert!(!host.submit(form));
        assert_eq!(
            host.notifications(),
            vec!["Please select a file to upload.".to_string()]
        );

        host.set_files(input, &["report.pdf"]);
        assert!(host.submit(form));
        assert_eq!(host.notifications().len(), 1);
    }

    #[test]
    fn forms_without_file_inputs_are_untouched() {
        let host = Rc::new(MemoryHost::new());
        let form = host.add(host.body(), "form", &[]);
        host.add(form, "input", &[("type", "text"), ("name", "q")]);
        let root = host.root();
        bind(&host, &root, &UploadGuardConfig::default());

        assert!(host.submit(form));
        assert!(host.notifications().is_empty());
    }

    #[test]
    fn only_the_first_file_input_is_checked() {
        let host = MemoryHost::new();
        let form = host.add(host.body(), "form", &[]);
        let first = host.add(form, "input", &[("type", "file")]);
        let second = host.add(form, "input", &[("type", "file")]);
        host.set_files(second, &["b.pdf"]);
        assert!(!submission_allowed(&host, &form));
        host.set_files(first, &["a.pdf"]);
        host.set_files(second, &[]);
        assert!(submission_allowed(&host, &form));
    }

    #[test]
    fn file_input_added_after_mount_is_still_checked() {
        let host = Rc::new(MemoryHost::new());
        let form = host.add(host.body(), "form", &[]);
        let root = host.root();
        bind(&host, &root, &UploadGuardConfig::default());
        host.add(form, "input", &[("type", "file")]);
        assert!(!host.submit(form));
    }
}
