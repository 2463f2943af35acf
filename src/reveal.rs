//! Scroll-triggered reveal animations.
//!
//! Revealing an element means adding the configured show class; the CSS does
//! the actual animation. There are two policies:
//!
//! - **Once** ([`RevealAnimator::reveal_once`]): blog cards and decorative
//!   `.transition` elements. The element is revealed the first time it is
//!   sufficiently visible, then unobserved.
//! - **Sections** ([`RevealAnimator::reveal_sections`]): general page content.
//!   Short pages reveal everything immediately, because nothing would ever
//!   scroll into view. Longer pages keep observing after a reveal, so an
//!   element that leaves and re-enters gets the (already present) class again.

use crate::config::RevealConfig;
use crate::dom::{Dom, Watch};

/// How [`RevealAnimator::reveal_sections`] handled its candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionReveal {
    /// Everything was revealed synchronously.
    Immediate,
    /// Candidates are being observed.
    Observed,
}

pub struct RevealAnimator<'a, D: Dom> {
    dom: &'a D,
    config: &'a RevealConfig,
}

impl<'a, D: Dom> RevealAnimator<'a, D> {
    pub fn new(dom: &'a D, config: &'a RevealConfig) -> Self {
        Self { dom, config }
    }

    pub fn reveal_once(&self, elements: &[D::Element]) {
        if elements.is_empty() {
            return;
        }
        let dom = self.dom.clone();
        let class = self.config.show_class.clone();
        self.dom.observe(
            elements,
            self.config.once_threshold,
            Box::new(move |el| {
                dom.add_class(el, &class);
                Watch::Stop
            }),
        );
    }

    pub fn reveal_sections(&self, candidates: &[D::Element]) -> SectionReveal {
        if self.is_short_page(candidates.len()) {
            for el in candidates {
                self.dom.add_class(el, &self.config.show_class);
            }
            tracing::debug!(count = candidates.len(), "short page, revealed all sections");
            return SectionReveal::Immediate;
        }

        let dom = self.dom.clone();
        let class = self.config.show_class.clone();
        self.dom.observe(
            candidates,
            self.config.section_threshold,
            Box::new(move |el| {
                dom.add_class(el, &class);
                Watch::Keep
            }),
        );
        SectionReveal::Observed
    }

    /// [`Self::reveal_sections`] over every element matching the configured
    /// section selector.
    pub fn reveal_page_sections(&self) -> SectionReveal {
        let candidates = self.dom.query_all(&self.config.section_selector);
        self.reveal_sections(&candidates)
    }

    fn is_short_page(&self, candidates: usize) -> bool {
        candidates < self.config.min_candidates
            || self.dom.scroll_height() <= self.dom.viewport_height() + self.config.scroll_slack
    }
}
