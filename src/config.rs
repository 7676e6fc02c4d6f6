//! Page interaction settings.
//!
//! Every field has a default matching the site's markup, so a page can ship a
//! partial JSON object (or nothing at all) and only override what differs.

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionConfig {
    #[serde(default)]
    pub menu: MenuConfig,
    #[serde(default)]
    pub file_display: FileDisplayConfig,
    #[serde(default)]
    pub upload_guard: UploadGuardConfig,
    #[serde(default)]
    pub alerts: AlertConfig,
    #[serde(default)]
    pub tooltip: TooltipConfig,
    #[serde(default)]
    pub copy: CopyConfig,
}

impl InteractionConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuConfig {
    #[serde(default = "default_menu_trigger_id")]
    pub trigger_id: String,
    #[serde(default = "default_menu_container_id")]
    pub container_id: String,
    #[serde(default = "default_hidden_class")]
    pub hidden_class: String,
    #[serde(default = "default_icon_tag")]
    pub icon_tag: String,
    #[serde(default = "default_closed_icon_class")]
    pub closed_icon_class: String,
    #[serde(default = "default_open_icon_class")]
    pub open_icon_class: String,
}

fn default_menu_trigger_id() -> String {
    "mobileMenuBtn".to_string()
}

fn default_menu_container_id() -> String {
    "mobileMenu".to_string()
}

fn default_hidden_class() -> String {
    "hidden".to_string()
}

fn default_icon_tag() -> String {
    "i".to_string()
}

fn default_closed_icon_class() -> String {
    "fa-bars".to_string()
}

fn default_open_icon_class() -> String {
    "fa-times".to_string()
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            trigger_id: default_menu_trigger_id(),
            container_id: default_menu_container_id(),
            hidden_class: default_hidden_class(),
            icon_tag: default_icon_tag(),
            closed_icon_class: default_closed_icon_class(),
            open_icon_class: default_open_icon_class(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileDisplayConfig {
    #[serde(default = "default_display_class")]
    pub display_class: String,
    #[serde(default = "default_empty_text")]
    pub empty_text: String,
    #[serde(default = "default_idle_classes")]
    pub idle_classes: Vec<String>,
    #[serde(default = "default_selected_classes")]
    pub selected_classes: Vec<String>,
}

fn default_display_class() -> String {
    "file-name".to_string()
}

fn default_empty_text() -> String {
    "No file selected".to_string()
}

fn default_idle_classes() -> Vec<String> {
    vec!["text-gray-500".to_string()]
}

fn default_selected_classes() -> Vec<String> {
    vec!["text-green-600".to_string(), "font-medium".to_string()]
}

impl Default for FileDisplayConfig {
    fn default() -> Self {
        Self {
            display_class: default_display_class(),
            empty_text: default_empty_text(),
            idle_classes: default_idle_classes(),
            selected_classes: default_selected_classes(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadGuardConfig {
    #[serde(default = "default_missing_file_message")]
    pub missing_file_message: String,
}

fn default_missing_file_message() -> String {
    "Please select a file to upload.".to_string()
}

impl Default for UploadGuardConfig {
    fn default() -> Self {
        Self {
            missing_file_message: default_missing_file_message(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertConfig {
    #[serde(default = "default_alert_role")]
    pub role: String,
    #[serde(default = "default_fade_after_ms")]
    pub fade_after_ms: u32,
    #[serde(default = "default_remove_after_fade_ms")]
    pub remove_after_fade_ms: u32,
}

fn default_alert_role() -> String {
    "alert".to_string()
}

fn default_fade_after_ms() -> u32 {
    5000
}

fn default_remove_after_fade_ms() -> u32 {
    300
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            role: default_alert_role(),
            fade_after_ms: default_fade_after_ms(),
            remove_after_fade_ms: default_remove_after_fade_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipConfig {
    #[serde(default = "default_title_attr")]
    pub title_attr: String,
    #[serde(default = "default_overlay_tag")]
    pub overlay_tag: String,
    #[serde(default = "default_overlay_class")]
    pub overlay_class: String,
    #[serde(default = "default_offset_px")]
    pub offset_px: f64,
}

fn default_title_attr() -> String {
    "title".to_string()
}

fn default_overlay_tag() -> String {
    "div".to_string()
}

fn default_overlay_class() -> String {
    "absolute bg-gray-800 text-white text-sm px-3 py-1 rounded-lg shadow-lg z-50".to_string()
}

fn default_offset_px() -> f64 {
    40.0
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            title_attr: default_title_attr(),
            overlay_tag: default_overlay_tag(),
            overlay_class: default_overlay_class(),
            offset_px: default_offset_px(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CopyConfig {
    #[serde(default = "default_copy_class")]
    pub control_class: String,
    #[serde(default = "default_payload_attr")]
    pub payload_attr: String,
    #[serde(default = "default_copied_html")]
    pub copied_html: String,
    /// Shown for `feedback_ms` when the clipboard rejects the write.
    #[serde(default)]
    pub copy_failed_html: Option<String>,
    #[serde(default = "default_feedback_ms")]
    pub feedback_ms: u32,
}

fn default_copy_class() -> String {
    "copy-btn".to_string()
}

fn default_payload_attr() -> String {
    "data-copy".to_string()
}

fn default_copied_html() -> String {
    r#"<i class="fas fa-check mr-2"></i>Copied!"#.to_string()
}

fn default_feedback_ms() -> u32 {
    2000
}

impl Default for CopyConfig {
    fn default() -> Self {
        Self {
            control_class: default_copy_class(),
            payload_attr: default_payload_attr(),
            copied_html: default_copied_html(),
            copy_failed_html: None,
            feedback_ms: default_feedback_ms(),
        }
    }
}
