//! Daily scripture rotation.
//!
//! The verse for a day is `verses[day_of_year % verses.len()]`, with
//! January 1st counted as day 1. Everyone visiting on the same calendar
//! date sees the same verse.

use crate::config::ConfigError;
use chrono::{Datelike, NaiveDate};

/// Built-in rotation used when the site config doesn't supply its own.
pub const STOCK_VERSES: &[&str] = &[
    "John 1:5 - The light shines in darkness, and the darkness has not overcome it.",
    "Psalm 34:18 - The LORD is close to the brokenhearted and saves those who are crushed in spirit.",
    "2 Corinthians 4:6 - For God, who said 'Let light shine out of darkness,' made his light shine in our hearts to give us the light of the knowledge of God's glory displayed in the face of Christ.",
    "Isaiah 41:10 - Fear not, for I am with you; be not dismayed, for I am your God. I will strengthen you and help you; I will uphold you with my righteous right hand.",
    "Romans 8:38-39 - Nothing in all creation can separate us from the love of God that is in Christ Jesus our Lord.",
    "2 Corinthians 12:9 - 'My grace is sufficient for you, for my power is made perfect in weakness.'",
];

/// A non-empty, immutable verse rotation.
#[derive(Debug, Clone)]
pub struct ScriptureList {
    verses: Vec<String>,
}

impl ScriptureList {
    pub fn new(verses: Vec<String>) -> Result<Self, ConfigError> {
        if verses.is_empty() {
            return Err(ConfigError::Validation(
                "scripture list must not be empty".into(),
            ));
        }
        Ok(Self { verses })
    }

    pub fn len(&self) -> usize {
        self.verses.len()
    }

    /// Always false: construction rejects an empty list.
    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }

    /// The verse for `date`.
    pub fn pick(&self, date: NaiveDate) -> &str {
        let day = date.ordinal() as usize;
        &self.verses[day % self.verses.len()]
    }
}

impl Default for ScriptureList {
    fn default() -> Self {
        Self {
            verses: STOCK_VERSES.iter().map(|v| v.to_string()).collect(),
        }
    }
}
