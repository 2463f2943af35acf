//! Navigation UX: the mobile menu toggle and active-link highlighting.

use crate::config::NavConfig;
use crate::dom::Dom;

/// Vertical extent of a page section, already shifted by the header offset.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionBounds {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl SectionBounds {
    /// Whether `scroll_y` lies in `[top, top + height]`.
    pub fn contains(&self, scroll_y: f64) -> bool {
        scroll_y >= self.top && scroll_y <= self.top + self.height
    }
}

/// Index of the section the scroll offset falls into.
///
/// Sections are checked in order and the last match wins.
pub fn active_section(scroll_y: f64, sections: &[SectionBounds]) -> Option<usize> {
    sections.iter().rposition(|s| s.contains(scroll_y))
}

pub struct Navigation<'a, D: Dom> {
    dom: &'a D,
    config: &'a NavConfig,
}

impl<'a, D: Dom> Navigation<'a, D> {
    pub fn new(dom: &'a D, config: &'a NavConfig) -> Self {
        Self { dom, config }
    }

    /// Wire both behaviors. Each is skipped when its elements are missing.
    pub fn wire(&self) {
        self.wire_menu_toggle();
        self.wire_active_links();
    }

    /// Toggle the open class on the links container on every button click.
    ///
    /// Returns false when either element is absent.
    pub fn wire_menu_toggle(&self) -> bool {
        let (Some(button), Some(links)) = (
            self.dom.element_by_id(&self.config.menu_toggle_id),
            self.dom.element_by_id(&self.config.links_id),
        ) else {
            tracing::debug!("no menu toggle on this page");
            return false;
        };
        let dom = self.dom.clone();
        let class = self.config.open_class.clone();
        self.dom.on_click(
            &button,
            Box::new(move || {
                dom.toggle_class(&links, &class);
            }),
        );
        true
    }

    /// Highlight the nav link for whichever section is scrolled into view.
    ///
    /// Sections and links are captured now; layout is re-read on every
    /// scroll event.
    pub fn wire_active_links(&self) {
        let sections = self.dom.query_all(&self.config.section_selector);
        let links = self.dom.query_all(&self.config.link_selector);
        let dom = self.dom.clone();
        let config = self.config.clone();
        self.dom.on_scroll(Box::new(move || {
            highlight(&dom, &config, &sections, &links);
        }));
    }
}

fn highlight<D: Dom>(dom: &D, config: &NavConfig, sections: &[D::Element], links: &[D::Element]) {
    let bounds: Vec<SectionBounds> = sections
        .iter()
        .filter_map(|section| {
            let id = dom.attribute(section, "id")?;
            Some(SectionBounds {
                id,
                top: dom.offset_top(section) - config.scroll_offset,
                height: dom.offset_height(section),
            })
        })
        .collect();

    let Some(index) = active_section(dom.scroll_y(), &bounds) else {
        return;
    };
    let id = &bounds[index].id;
    for link in links {
        dom.remove_class(link, &config.active_class);
        let targets_section = dom
            .attribute(link, "href")
            .is_some_and(|href| href.contains(id.as_str()));
        if targets_section {
            dom.add_class(link, &config.active_class);
        }
    }
}
