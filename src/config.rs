//! Site configuration module.
//!
//! Every selector, class name, threshold and URL the client script relies on
//! lives here, so the markup can change without recompiling. The host page
//! may embed a sparse TOML document that overrides the stock defaults:
//!
//! ```html
//! <script type="application/toml" id="site-config">
//! posts_url = "/data/posts.json"
//!
//! [blog]
//! preview_count = 3
//! </script>
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! posts_url = "posts.json"          # Static JSON document with the posts
//!
//! [scripture]
//! slot_id = "scripture-text"        # Element that receives the daily verse
//! verses = ["John 1:5 - ...", ...]  # Rotation list, must not be empty
//!
//! [blog]
//! container_id = "blog-posts"
//! preview_count = 2                 # Latest posts shown on the home page
//! listing_href = "blog.html"
//! listing_link_text = "Read more reflections →"
//!
//! [reveal]
//! show_class = "show"
//! once_threshold = 0.2              # Visible ratio for one-shot reveals
//! section_threshold = 0.15          # Visible ratio for section reveals
//! min_candidates = 10               # Below this, reveal everything at once
//! scroll_slack = 200.0              # Pages shorter than viewport + slack reveal at once
//! section_selector = "section, .card, article, .hero-text"
//! transition_selector = ".transition"
//!
//! [nav]
//! menu_toggle_id = "menu-toggle"
//! links_id = "nav-links"
//! open_class = "open"
//! link_selector = ".nav-link"
//! active_class = "active"
//! section_selector = "section[id]"
//! scroll_offset = 120.0             # Header allowance when matching sections
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::scripture;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration.
///
/// All fields have defaults matching the stock markup. User config needs
/// only the values it wants to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// URL of the posts document, relative to the current page.
    pub posts_url: String,
    /// Daily scripture slot and rotation list.
    pub scripture: ScriptureConfig,
    /// Blog container, preview size and listing link.
    pub blog: BlogConfig,
    /// Reveal animation policies.
    pub reveal: RevealConfig,
    /// Mobile menu and active-link highlighting.
    pub nav: NavConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            posts_url: "posts.json".to_string(),
            scripture: ScriptureConfig::default(),
            blog: BlogConfig::default(),
            reveal: RevealConfig::default(),
            nav: NavConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scripture.verses.is_empty() {
            return Err(ConfigError::Validation(
                "scripture.verses must not be empty".into(),
            ));
        }
        for (name, value) in [
            ("reveal.once_threshold", self.reveal.once_threshold),
            ("reveal.section_threshold", self.reveal.section_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Validation(format!(
                    "{name} must be between 0 and 1"
                )));
            }
        }
        if self.reveal.show_class.trim().is_empty() {
            return Err(ConfigError::Validation(
                "reveal.show_class must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScriptureConfig {
    /// Id of the element whose text becomes today's verse.
    pub slot_id: String,
    /// Rotation list, indexed by day-of-year.
    pub verses: Vec<String>,
}

impl Default for ScriptureConfig {
    fn default() -> Self {
        Self {
            slot_id: "scripture-text".to_string(),
            verses: scripture::STOCK_VERSES.iter().map(|v| v.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlogConfig {
    /// Id of the element the cards are appended to.
    pub container_id: String,
    /// Number of latest posts shown in preview mode.
    pub preview_count: usize,
    /// Target of the "read more" link appended after the preview.
    pub listing_href: String,
    pub listing_link_text: String,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            container_id: "blog-posts".to_string(),
            preview_count: 2,
            listing_href: "blog.html".to_string(),
            listing_link_text: "Read more reflections →".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealConfig {
    /// Class added to an element once it is revealed.
    pub show_class: String,
    /// Visible ratio that triggers a one-shot reveal (cards, transitions).
    pub once_threshold: f64,
    /// Visible ratio that triggers a section reveal.
    pub section_threshold: f64,
    /// Fewer candidates than this are revealed immediately.
    pub min_candidates: usize,
    /// Pages whose scroll height is within this many pixels of the viewport
    /// are revealed immediately.
    pub scroll_slack: f64,
    /// Generic reveal candidates.
    pub section_selector: String,
    /// Decorative elements that slide in once.
    pub transition_selector: String,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            show_class: "show".to_string(),
            once_threshold: 0.2,
            section_threshold: 0.15,
            min_candidates: 10,
            scroll_slack: 200.0,
            section_selector: "section, .card, article, .hero-text".to_string(),
            transition_selector: ".transition".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavConfig {
    pub menu_toggle_id: String,
    pub links_id: String,
    /// Class toggled on the links container by the menu button.
    pub open_class: String,
    pub link_selector: String,
    pub active_class: String,
    /// Sections tracked for active-link highlighting.
    pub section_selector: String,
    /// Pixels subtracted from a section's top before matching the scroll offset.
    pub scroll_offset: f64,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            menu_toggle_id: "menu-toggle".to_string(),
            links_id: "nav-links".to_string(),
            open_class: "open".to_string(),
            link_selector: ".nav-link".to_string(),
            active_class: "active".to_string(),
            section_selector: "section[id]".to_string(),
            scroll_offset: 120.0,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// Base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("stock config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Parse a (possibly sparse) TOML document on top of the stock defaults.
///
/// Blank input yields the defaults.
pub fn load_config_str(source: &str) -> Result<SiteConfig, ConfigError> {
    if source.trim().is_empty() {
        return resolve_config(None);
    }
    let overlay: toml::Value = toml::from_str(source)?;
    resolve_config(Some(overlay))
}

/// Returns a fully-commented stock config with all keys and explanations.
pub fn stock_config_toml() -> &'static str {
    r##"# daily-light configuration
# =========================
# Embed in the page as <script type="application/toml" id="site-config">.
# All settings are optional; values shown are the defaults.
# Unknown keys cause an error and the stock defaults are used instead.

# Static JSON document holding the posts (array of
# {title, date, excerpt, fullText}).
posts_url = "posts.json"

# ---------------------------------------------------------------------------
# Daily scripture
# ---------------------------------------------------------------------------
[scripture]
# Element whose text is replaced by today's verse.
slot_id = "scripture-text"
# verses = ["John 1:5 - The light shines in darkness...", "..."]

# ---------------------------------------------------------------------------
# Blog
# ---------------------------------------------------------------------------
[blog]
container_id = "blog-posts"
# Number of latest posts on the home page preview.
preview_count = 2
listing_href = "blog.html"
listing_link_text = "Read more reflections →"

# ---------------------------------------------------------------------------
# Reveal animations
# ---------------------------------------------------------------------------
[reveal]
show_class = "show"
# Visible ratio (0-1) that reveals cards and transitions once.
once_threshold = 0.2
# Visible ratio (0-1) that reveals general sections.
section_threshold = 0.15
# Short pages (few candidates or barely scrollable) reveal everything at once.
min_candidates = 10
scroll_slack = 200.0
section_selector = "section, .card, article, .hero-text"
transition_selector = ".transition"

# ---------------------------------------------------------------------------
# Navigation
# ---------------------------------------------------------------------------
[nav]
menu_toggle_id = "menu-toggle"
links_id = "nav-links"
open_class = "open"
link_selector = ".nav-link"
active_class = "active"
section_selector = "section[id]"
# Header allowance subtracted from each section's top.
scroll_offset = 120.0
"##
}
