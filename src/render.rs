//! Blog card rendering.
//!
//! Two presentations of the same posts:
//!
//! - **Full** (`blog.html`): every post as an `article.blog-card` with its
//!   excerpt visible and the full text hidden behind a Read More toggle.
//! - **Preview** (home page): the latest posts as `article.blog-preview`
//!   cards, followed by a link to the full listing.
//!
//! Card bodies are built with [maud](https://maud.lambda.xyz/), so post
//! content is escaped before it reaches `innerHTML`.

use crate::config::BlogConfig;
use crate::dom::Dom;
use crate::types::Post;
use maud::{Markup, html};
use std::cmp::Reverse;

pub const READ_MORE: &str = "Read More";
pub const READ_LESS: &str = "Read Less";

/// Inner markup of a full-mode card.
pub fn card_markup(post: &Post) -> Markup {
    html! {
        h3 { (post.title) }
        time datetime=(post.date) { (post.display_date()) }
        p.excerpt { (post.excerpt) }
        p.full-text hidden { (post.full_text) }
        button.read-more { (READ_MORE) }
    }
}

/// Inner markup of a preview card.
pub fn preview_markup(post: &Post) -> Markup {
    html! {
        h3 { (post.title) }
        time datetime=(post.date) { (post.display_date()) }
        p { (post.excerpt) }
    }
}

/// The `count` most recent posts, newest first.
///
/// Undated posts sort after dated ones; ties keep document order.
pub fn latest(posts: &[Post], count: usize) -> Vec<&Post> {
    let mut sorted: Vec<&Post> = posts.iter().collect();
    sorted.sort_by_key(|p| Reverse(p.published()));
    sorted.truncate(count);
    sorted
}

pub struct PostRenderer<'a, D: Dom> {
    dom: &'a D,
    config: &'a BlogConfig,
}

impl<'a, D: Dom> PostRenderer<'a, D> {
    pub fn new(dom: &'a D, config: &'a BlogConfig) -> Self {
        Self { dom, config }
    }

    /// Render every post as an expandable card. Returns the cards.
    pub fn render_full(&self, container: &D::Element, posts: &[Post]) -> Vec<D::Element> {
        let cards: Vec<D::Element> = posts
            .iter()
            .filter_map(|post| self.append_card(container, "blog-card", card_markup(post)))
            .collect();
        for card in &cards {
            self.bind_toggle(card);
        }
        tracing::debug!(count = cards.len(), "rendered blog cards");
        cards
    }

    /// Render the latest posts plus the listing link. Returns the cards.
    pub fn render_preview(&self, container: &D::Element, posts: &[Post]) -> Vec<D::Element> {
        let cards: Vec<D::Element> = latest(posts, self.config.preview_count)
            .into_iter()
            .filter_map(|post| self.append_card(container, "blog-preview", preview_markup(post)))
            .collect();

        if let Some(link) = self.dom.create_element("a") {
            self.dom.set_attribute(&link, "href", &self.config.listing_href);
            self.dom.add_class(&link, "read-more-link");
            self.dom.set_text(&link, &self.config.listing_link_text);
            self.dom.append_child(container, &link);
        }
        tracing::debug!(count = cards.len(), "rendered blog preview");
        cards
    }

    fn append_card(&self, container: &D::Element, class: &str, body: Markup) -> Option<D::Element> {
        let card = self.dom.create_element("article")?;
        self.dom.add_class(&card, class);
        self.dom.set_inner_html(&card, &body.into_string());
        self.dom.append_child(container, &card);
        Some(card)
    }

    /// Wire the card's Read More button to its full-text block.
    fn bind_toggle(&self, card: &D::Element) {
        let (Some(button), Some(full_text)) = (
            self.dom.query_within(card, ".read-more"),
            self.dom.query_within(card, ".full-text"),
        ) else {
            return;
        };
        let dom = self.dom.clone();
        let label = button.clone();
        self.dom.on_click(
            &button,
            Box::new(move || toggle_full_text(&dom, &full_text, &label)),
        );
    }
}

/// Flip a full-text block and relabel its button to match.
pub fn toggle_full_text<D: Dom>(dom: &D, full_text: &D::Element, button: &D::Element) {
    let was_hidden = dom.is_hidden(full_text);
    dom.set_hidden(full_text, !was_hidden);
    dom.set_text(button, if was_hidden { READ_LESS } else { READ_MORE });
}

// ============================================================================
// Tests
// ============================================================================
