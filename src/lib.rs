//! # Daily Light
//!
//! The interactive layer of a small devotional blog, compiled to WebAssembly.
//! The site itself is static HTML; this crate adds the parts that need a
//! script: a verse of the day, blog posts fetched from a JSON file, reveal
//! animations as sections scroll into view, and navigation UX.
//!
//! # Page Lifecycle
//!
//! ```text
//! 1. Module load      →  transition elements start observing
//! 2. DOM ready        →  nav wiring, verse of the day, blog load kicked off
//! 3. Posts arrive     →  cards or previews rendered, then revealed on scroll
//! ```
//!
//! Everything after step 2 is asynchronous: the page is fully usable while
//! the post payload is in flight, and a failed fetch leaves it so.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`site`] | Page bootstrap: picks what runs for each [`types::PageMode`] |
//! | [`scripture`] | Day-of-year verse rotation |
//! | [`posts`] | Fetches and parses the post list behind the [`posts::Fetch`] seam |
//! | [`render`] | Blog cards and previews rendered with Maud, plus the read-more toggle |
//! | [`reveal`] | One-shot and threshold-based reveal animations |
//! | [`nav`] | Mobile menu toggle and scroll-driven active-link highlighting |
//! | [`dom`] | The [`dom::Dom`] trait every DOM touch goes through |
//! | [`config`] | Stock defaults, inline TOML overrides, validation |
//! | [`types`] | `Post` and `PageMode` |
//! | `web` | `web-sys` implementations and the WASM entry point (wasm32 only) |
//!
//! # Design Decisions
//!
//! ## A DOM Trait, Not Direct `web-sys` Calls
//!
//! Feature code is generic over [`dom::Dom`]. The browser build plugs in
//! `web::WebDom`; unit tests plug in an in-memory document. That keeps the
//! interesting behavior (which verse, which posts, which link is active,
//! when a section reveals) testable with plain `cargo test` on the host,
//! with no headless browser in the loop.
//!
//! ## Maud For Post Markup
//!
//! Post fields come from a JSON file anyone with repo access can edit. Cards
//! are rendered with [Maud](https://maud.lambda.xyz/), so every interpolated
//! field is escaped and a stray `<` in a title stays text.
//!
//! ## Explicit Page Modes
//!
//! The page declares what it is with `<body data-page="…">` instead of the
//! script guessing from which containers happen to exist. The home page
//! shows previews and reveals sections; the blog page shows full cards.
//!
//! ## Two Reveal Policies
//!
//! Cards and `.transition` elements reveal once and stop being watched.
//! Home page sections keep being watched, and short pages (few sections, or
//! barely scrollable) reveal everything up front so nothing stays invisible
//! below a fold that never scrolls.

pub mod config;
pub mod dom;
pub mod nav;
pub mod posts;
pub mod render;
pub mod reveal;
pub mod scripture;
pub mod site;
pub mod types;

#[cfg(target_arch = "wasm32")]
mod logging;
#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(test)]
pub(crate) mod test_helpers;
