//! Page bootstrap.
//!
//! [`Site`] owns everything a page needs (document handle, fetcher, config,
//! verse rotation) and wires the components for one [`PageMode`]:
//!
//! ```text
//! attach_transitions()          at script evaluation
//! boot(mode, today)             on DOM ready
//!   ├── scripture slot          ScriptureList::pick(today)
//!   ├── Home                    load → preview → reveal sections
//!   ├── BlogListing             load → full cards → reveal cards once
//!   ├── Generic                 reveal sections
//!   └── navigation              menu toggle + active links
//! ```
//!
//! The post load is the only asynchronous step. `boot` performs everything
//! else before returning and hands the load back as a future for the caller
//! to spawn on its executor.

use crate::config::{ConfigError, SiteConfig};
use crate::dom::Dom;
use crate::nav::Navigation;
use crate::posts::{Fetch, PostRepository};
use crate::render::PostRenderer;
use crate::reveal::RevealAnimator;
use crate::scripture::ScriptureList;
use crate::types::{PageMode, Post};
use chrono::NaiveDate;
use std::future::Future;
use std::rc::Rc;

pub struct Site<D, F> {
    dom: D,
    fetch: F,
    config: Rc<SiteConfig>,
    scriptures: Rc<ScriptureList>,
}

impl<D, F> Site<D, F>
where
    D: Dom,
    F: Fetch + Clone + 'static,
{
    pub fn new(dom: D, fetch: F, config: SiteConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let scriptures = ScriptureList::new(config.scripture.verses.clone())?;
        Ok(Self {
            dom,
            fetch,
            config: Rc::new(config),
            scriptures: Rc::new(scriptures),
        })
    }

    /// Slide in the decorative transition elements present right now.
    ///
    /// Returns how many were found.
    pub fn attach_transitions(&self) -> usize {
        let transitions = self.dom.query_all(&self.config.reveal.transition_selector);
        RevealAnimator::new(&self.dom, &self.config.reveal).reveal_once(&transitions);
        transitions.len()
    }

    /// Set today's verse if the page has a slot for it.
    pub fn show_scripture(&self, today: NaiveDate) -> bool {
        let Some(slot) = self.dom.element_by_id(&self.config.scripture.slot_id) else {
            return false;
        };
        self.dom.set_text(&slot, self.scriptures.pick(today));
        true
    }

    /// Wire the page for `mode`.
    ///
    /// Returns the post load for Home and BlogListing pages.
    pub fn boot(
        &self,
        mode: PageMode,
        today: NaiveDate,
    ) -> Option<impl Future<Output = ()> + use<D, F>> {
        self.show_scripture(today);

        let pending = match mode {
            PageMode::Home | PageMode::BlogListing => Some(load_blog(
                self.dom.clone(),
                self.fetch.clone(),
                Rc::clone(&self.config),
                mode,
            )),
            PageMode::Generic => {
                RevealAnimator::new(&self.dom, &self.config.reveal).reveal_page_sections();
                None
            }
        };

        Navigation::new(&self.dom, &self.config.nav).wire();
        tracing::debug!(?mode, "page wired");
        pending
    }
}

/// Fetch the posts and render them for `mode`.
///
/// A failed load is logged and leaves the container empty. On the home page
/// the section reveal runs regardless, so the rest of the page still shows.
async fn load_blog<D: Dom, F: Fetch>(dom: D, fetch: F, config: Rc<SiteConfig>, mode: PageMode) {
    match dom.element_by_id(&config.blog.container_id) {
        Some(container) => {
            let repo = PostRepository::new(fetch, config.posts_url.clone());
            match repo.load().await {
                Ok(posts) => render_posts(&dom, &config, mode, &container, &posts),
                Err(e) => {
                    tracing::error!(error = %e, url = %config.posts_url, "error loading blog posts");
                }
            }
        }
        None => {
            tracing::debug!(id = %config.blog.container_id, "no blog container on this page");
        }
    }

    if mode == PageMode::Home {
        RevealAnimator::new(&dom, &config.reveal).reveal_page_sections();
    }
}

fn render_posts<D: Dom>(
    dom: &D,
    config: &SiteConfig,
    mode: PageMode,
    container: &D::Element,
    posts: &[Post],
) {
    let renderer = PostRenderer::new(dom, &config.blog);
    match mode {
        PageMode::BlogListing => {
            let cards = renderer.render_full(container, posts);
            RevealAnimator::new(dom, &config.reveal).reveal_once(&cards);
        }
        PageMode::Home => {
            renderer.render_preview(container, posts);
        }
        PageMode::Generic => {}
    }
}
