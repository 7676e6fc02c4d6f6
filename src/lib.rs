//! Page interaction behaviors for the converter site.
//!
//! The behaviors (mobile menu, file-name labels, upload guard, alert
//! auto-dismiss, tooltips, copy buttons) are written against the capability
//! traits in [`host`], so the same code runs in the browser (see the
//! `convertpro_web` crate) and against [`sim::MemoryHost`] in tests.
//!
//! ```
//! use std::rc::Rc;
//! use convertpro::{mount, sim::MemoryHost, InteractionConfig};
//!
//! let host = Rc::new(MemoryHost::new());
//! let btn = host.add(host.body(), "button", &[("class", "copy-btn"), ("data-copy", "abc123")]);
//! let root = host.root();
//! let page = mount(Rc::clone(&host), &root, &InteractionConfig::default());
//!
//! host.click(btn);
//! assert_eq!(host.clipboard_writes(), vec!["abc123".to_string()]);
//! page.unmount();
//! ```

pub mod behaviors;
pub mod config;
pub mod error;
pub mod float_fmt;
pub mod host;
pub mod page;
pub mod selector;
pub mod sim;
pub mod timers;

pub use config::InteractionConfig;
pub use error::{ClipboardError, Error, Result};
pub use host::{Host, Rect};
pub use page::{mount, MountedPage};
pub use selector::Selector;
