//! The six page behaviors. Each module binds independently against a
//! [`crate::host::Host`] and knows nothing about the others.

pub(crate) mod alerts;
pub(crate) mod copy_button;
pub(crate) mod file_display;
pub(crate) mod menu;
pub(crate) mod tooltip;
pub(crate) mod upload_guard;

pub use tooltip::overlay_position;
