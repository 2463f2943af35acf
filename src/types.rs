//! Shared types used across the loader, renderer and bootstrapper.
//!
//! `Post` mirrors one entry of `posts.json` exactly, so the same struct is
//! what the repository parses and what the renderer consumes.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// A blog post as published in `posts.json`.
///
/// Every field is optional in the source document. A missing or unusable
/// field renders as empty text instead of failing the whole load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Post {
    #[serde(deserialize_with = "lenient_text")]
    pub title: String,
    /// ISO-8601 date (`2024-05-01`, or a full timestamp whose date part is used)
    #[serde(deserialize_with = "lenient_text")]
    pub date: String,
    #[serde(deserialize_with = "lenient_text")]
    pub excerpt: String,
    #[serde(deserialize_with = "lenient_text")]
    pub full_text: String,
}

/// Read any JSON value as post text.
///
/// Strings pass through, numbers and booleans keep their literal form, and
/// `null`, arrays and objects become empty.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    })
}

impl Post {
    /// Calendar date the post was published, if `date` parses.
    pub fn published(&self) -> Option<NaiveDate> {
        let day = self.date.trim();
        let day = day.split_once('T').map_or(day, |(d, _)| d);
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }

    /// Human-readable date in the `Sat Oct 17 2026` style.
    ///
    /// Falls back to the raw string when the date doesn't parse.
    pub fn display_date(&self) -> String {
        match self.published() {
            Some(date) => date.format("%a %b %d %Y").to_string(),
            None => self.date.clone(),
        }
    }
}

/// Which page the script is running on.
///
/// The host page declares this itself (`<body data-page="blog">`), so the
/// content logic never has to inspect URLs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PageMode {
    /// Landing page: blog preview plus section reveals.
    Home,
    /// Full blog listing with expandable posts.
    BlogListing,
    /// Any other page: section reveals only.
    #[default]
    Generic,
}

impl FromStr for PageMode {
    type Err = std::convert::Infallible;

    /// Unknown names fall back to `Generic`, so parsing never fails.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "home" | "index" => PageMode::Home,
            "blog" | "blog-listing" => PageMode::BlogListing,
            _ => PageMode::Generic,
        })
    }
}
