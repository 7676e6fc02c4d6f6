//! Browser host for the converter's page interactions.
//!
//! This crate is a stub by default so native builds and `cargo test` work
//! without a wasm toolchain. Enable the real host with `--features web` on a
//! wasm32 target.

pub mod boot;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
mod web;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use web::{mount_page, start, unmount_page, PageHandle};
