use std::cell::RefCell;
use std::rc::Rc;

use convertpro::{mount, InteractionConfig, MountedPage};
use tracing::{error, info};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::boot::{self, MountMode};

mod host;
mod logging;

use host::{js_error_message, WebHost};

thread_local! {
    static AUTO_PAGE: RefCell<Option<MountedPage<WebHost>>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    logging::init();
    if let Err(e) = boot_document() {
        error!("page interactions not started: {e}");
    }
}

fn boot_document() -> convertpro::Result<()> {
    let host = WebHost::new()?;
    if host.document().ready_state() == "loading" {
        let cb = Closure::once_into_js(move || {
            if let Err(e) = auto_mount() {
                error!("page interactions not mounted: {e}");
            }
        });
        host.document()
            .add_event_listener_with_callback("DOMContentLoaded", cb.unchecked_ref())
            .map_err(|e| convertpro::Error::Host(js_error_message(&e)))?;
        Ok(())
    } else {
        auto_mount()
    }
}

fn auto_mount() -> convertpro::Result<()> {
    let host = Rc::new(WebHost::new()?);
    let mode = MountMode::from_attr(
        host.document()
            .body()
            .and_then(|b| b.get_attribute(boot::MOUNT_MODE_ATTR))
            .as_deref(),
    );
    if mode == MountMode::Manual {
        info!("manual mount requested; waiting for mountPage");
        return Ok(());
    }

    let config = embedded_config(&host);
    let root = host.document_element()?;
    let page = mount(Rc::clone(&host), &root, &config);
    AUTO_PAGE.with(|slot| {
        if let Some(previous) = slot.borrow_mut().replace(page) {
            previous.unmount();
        }
    });
    Ok(())
}

fn embedded_config(host: &WebHost) -> InteractionConfig {
    let raw = host
        .document()
        .get_element_by_id(boot::CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content());
    boot::config_from_script(raw.as_deref())
}

/// A page mounted by the embedding application.
#[wasm_bindgen]
pub struct PageHandle {
    page: Option<MountedPage<WebHost>>,
}

#[wasm_bindgen]
impl PageHandle {
    pub fn unmount(&mut self) {
        if let Some(page) = self.page.take() {
            page.unmount();
        }
    }

    #[wasm_bindgen(js_name = dismissAlert)]
    pub fn dismiss_alert(&self, alert: &web_sys::Element) -> bool {
        self.page
            .as_ref()
            .map(|p| p.dismiss_alert(alert))
            .unwrap_or(false)
    }

    #[wasm_bindgen(getter, js_name = listenerCount)]
    pub fn listener_count(&self) -> usize {
        self.page.as_ref().map(|p| p.listener_count()).unwrap_or(0)
    }
}

/// Mount under `root`. `config_json` overrides the embedded config.
#[wasm_bindgen(js_name = mountPage)]
pub fn mount_page(root: web_sys::Element, config_json: Option<String>) -> Result<PageHandle, JsValue> {
    let host = Rc::new(WebHost::new().map_err(|e| JsValue::from_str(&e.to_string()))?);
    let config = match config_json {
        Some(raw) => InteractionConfig::from_json(&raw)
            .map_err(|e| JsValue::from_str(&e.to_string()))?,
        None => embedded_config(&host),
    };
    Ok(PageHandle {
        page: Some(mount(host, &root, &config)),
    })
}

/// Tear down the page mounted at start-up, if any.
#[wasm_bindgen(js_name = unmountPage)]
pub fn unmount_page() {
    AUTO_PAGE.with(|slot| {
        if let Some(page) = slot.borrow_mut().take() {
            page.unmount();
        }
    });
}
