//! Shared test utilities for the daily-light test suite.
//!
//! Provides an in-memory [`Dom`] over a `scraper` tree, scripted
//! interaction (clicks, scrolling, intersections), and a canned [`Fetch`].
//! Queries go through `scraper::Selector`, so any selector a config may
//! carry behaves as it would in the browser.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let dom = MemoryDom::from_html(r#"<div id="blog-posts"></div>"#);
//! dom.set_viewport(800.0, 3000.0);
//!
//! let button = dom.first(".read-more");
//! dom.click(button);
//! assert_eq!(dom.text(&button), "Read Less");
//! ```
//!
//! Layout is declared in markup: `data-top` and `data-height` attributes
//! become an element's `offset_top` and `offset_height`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;

pub use ego_tree::NodeId;
use ego_tree::NodeRef;
use scraper::node::Text;
use scraper::{ElementRef, Html, Node, Selector};

use crate::dom::{ClickHandler, Dom, IntersectHandler, ScrollHandler, Watch};
use crate::posts::{Fetch, LoadError};

// =========================================================================
// Document model
// =========================================================================

struct Observer {
    threshold: f64,
    targets: Vec<NodeId>,
    handler: IntersectHandler<NodeId>,
}

/// A `scraper` tree plus the window state and listeners a page has.
///
/// Removed nodes stay in the tree as orphans, so queries rooted at `body`
/// never see them.
struct Document {
    html: Html,
    body: NodeId,
    scroll_y: f64,
    scroll_height: f64,
    viewport_height: f64,
    clicks: HashMap<NodeId, Vec<ClickHandler>>,
    scrolls: Vec<ScrollHandler>,
    observers: Vec<Observer>,
}

impl Document {
    fn element(&self, id: NodeId) -> ElementRef<'_> {
        self.html
            .tree
            .get(id)
            .and_then(ElementRef::wrap)
            .unwrap_or_else(|| panic!("{id:?} is not an element"))
    }

    /// Elements below `scope` matching `selector`, in document order.
    ///
    /// An unparseable selector matches nothing, as `querySelectorAll` would
    /// throw and the browser binding logs and returns empty.
    fn select(&self, scope: NodeId, selector: &str) -> Vec<NodeId> {
        let Ok(selector) = Selector::parse(selector) else {
            return Vec::new();
        };
        self.element(scope)
            .descendants()
            .skip(1)
            .filter(|node| ElementRef::wrap(*node).is_some_and(|el| selector.matches(&el)))
            .map(|node| node.id())
            .collect()
    }

    fn append(&mut self, parent: NodeId, value: Node) -> NodeId {
        let child = self.html.tree.orphan(value).id();
        if let Some(mut node) = self.html.tree.get_mut(parent) {
            node.append_id(child);
        }
        child
    }

    fn clear_children(&mut self, id: NodeId) {
        let children: Vec<NodeId> = self.element(id).children().map(|c| c.id()).collect();
        for child in children {
            if let Some(mut node) = self.html.tree.get_mut(child) {
                node.detach();
            }
        }
    }

    fn import_html(&mut self, parent: NodeId, markup: &str) {
        let fragment = Html::parse_fragment(markup);
        self.graft(parent, *fragment.root_element());
    }

    /// Copy the children of `source` under `parent`, dropping
    /// whitespace-only text and comments.
    fn graft(&mut self, parent: NodeId, source: NodeRef<'_, Node>) {
        for child in source.children() {
            match child.value() {
                Node::Element(_) => {
                    let id = self.append(parent, child.value().clone());
                    self.graft(id, child);
                }
                Node::Text(text) if !text.trim().is_empty() => {
                    self.append(parent, child.value().clone());
                }
                _ => {}
            }
        }
    }

    /// A fresh, childless element parsed from its opening tag.
    fn parse_element(name: &str, attrs: &[(String, String)]) -> Node {
        let rendered: String = attrs
            .iter()
            .map(|(k, v)| format!(r#" {k}="{}""#, v.replace('&', "&amp;").replace('"', "&quot;")))
            .collect();
        let fragment = Html::parse_fragment(&format!("<{name}{rendered}></{name}>"));
        fragment
            .root_element()
            .first_child()
            .map(|node| node.value().clone())
            .unwrap_or_else(|| panic!("<{name}> does not parse in a body context"))
    }

    /// Replace an element's attributes, keeping its children.
    fn edit_attrs(&mut self, id: NodeId, edit: impl FnOnce(&mut Vec<(String, String)>)) {
        let element = self.element(id).value();
        let name = element.name().to_string();
        let mut attrs: Vec<(String, String)> = element
            .attrs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        edit(&mut attrs);
        let fresh = Self::parse_element(&name, &attrs);
        if let Some(mut node) = self.html.tree.get_mut(id) {
            *node.value() = fresh;
        }
    }

    fn classes(&self, id: NodeId) -> Vec<String> {
        self.element(id).value().classes().map(str::to_string).collect()
    }

    fn set_classes(&mut self, id: NodeId, classes: &[String]) {
        let joined = classes.join(" ");
        self.edit_attrs(id, |attrs| upsert(attrs, "class", &joined));
    }

    fn layout(&self, id: NodeId, attr: &str) -> f64 {
        self.element(id)
            .value()
            .attr(attr)
            .and_then(|v| v.parse().ok())
            .unwrap_or(0.0)
    }
}

fn upsert(attrs: &mut Vec<(String, String)>, name: &str, value: &str) {
    match attrs.iter_mut().find(|(n, _)| n == name) {
        Some((_, v)) => *v = value.to_string(),
        None => attrs.push((name.to_string(), value.to_string())),
    }
}

// =========================================================================
// MemoryDom
// =========================================================================

/// An in-memory document with scripted events.
#[derive(Clone)]
pub struct MemoryDom {
    doc: Rc<RefCell<Document>>,
}

impl MemoryDom {
    /// Build a document whose body holds `html`.
    ///
    /// The viewport defaults to 800px tall over a 4000px page.
    pub fn from_html(markup: &str) -> Self {
        let html = Html::parse_fragment("");
        let body = html.root_element().id();
        let mut doc = Document {
            html,
            body,
            scroll_y: 0.0,
            scroll_height: 4000.0,
            viewport_height: 800.0,
            clicks: HashMap::new(),
            scrolls: Vec::new(),
            observers: Vec::new(),
        };
        doc.import_html(body, markup);
        Self {
            doc: Rc::new(RefCell::new(doc)),
        }
    }

    pub fn set_viewport(&self, viewport_height: f64, scroll_height: f64) {
        let mut doc = self.doc.borrow_mut();
        doc.viewport_height = viewport_height;
        doc.scroll_height = scroll_height;
    }

    /// First element matching `selector`. Panics if none.
    pub fn first(&self, selector: &str) -> NodeId {
        self.query_all(selector)
            .into_iter()
            .next()
            .unwrap_or_else(|| panic!("no element matches '{selector}'"))
    }

    /// Text of every element matching `selector`, trimmed.
    pub fn texts(&self, selector: &str) -> Vec<String> {
        self.query_all(selector)
            .iter()
            .map(|id| self.text(id).trim().to_string())
            .collect()
    }

    pub fn tag(&self, id: NodeId) -> String {
        self.doc.borrow().element(id).value().name().to_string()
    }

    /// Dispatch a click to every handler registered on `id`.
    pub fn click(&self, id: NodeId) {
        let mut handlers = self.doc.borrow_mut().clicks.remove(&id).unwrap_or_default();
        for handler in handlers.iter_mut() {
            handler();
        }
        let mut doc = self.doc.borrow_mut();
        let added = doc.clicks.remove(&id).unwrap_or_default();
        handlers.extend(added);
        doc.clicks.insert(id, handlers);
    }

    pub fn click_handler_count(&self) -> usize {
        self.doc.borrow().clicks.values().map(Vec::len).sum()
    }

    /// Move the window and dispatch a scroll event.
    pub fn scroll_to(&self, y: f64) {
        let mut handlers = {
            let mut doc = self.doc.borrow_mut();
            doc.scroll_y = y;
            std::mem::take(&mut doc.scrolls)
        };
        for handler in handlers.iter_mut() {
            handler();
        }
        let mut doc = self.doc.borrow_mut();
        handlers.append(&mut doc.scrolls);
        doc.scrolls = handlers;
    }

    /// Report that `id` is now `ratio` visible.
    ///
    /// Returns how many observer handlers fired.
    pub fn intersect(&self, id: NodeId, ratio: f64) -> usize {
        let mut observers = std::mem::take(&mut self.doc.borrow_mut().observers);
        let mut fired = 0;
        for observer in observers.iter_mut() {
            if ratio < observer.threshold || !observer.targets.contains(&id) {
                continue;
            }
            fired += 1;
            if (observer.handler)(&id) == Watch::Stop {
                observer.targets.retain(|t| *t != id);
            }
        }
        let mut doc = self.doc.borrow_mut();
        observers.append(&mut doc.observers);
        doc.observers = observers;
        fired
    }

    pub fn is_observed(&self, id: NodeId) -> bool {
        self.doc
            .borrow()
            .observers
            .iter()
            .any(|o| o.targets.contains(&id))
    }

    pub fn observer_count(&self) -> usize {
        self.doc.borrow().observers.len()
    }

    /// Threshold of the observer watching `id`, if any.
    pub fn observed_threshold(&self, id: NodeId) -> Option<f64> {
        self.doc
            .borrow()
            .observers
            .iter()
            .find(|o| o.targets.contains(&id))
            .map(|o| o.threshold)
    }
}

impl Dom for MemoryDom {
    type Element = NodeId;

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let doc = self.doc.borrow();
        doc.element(doc.body)
            .descendants()
            .skip(1)
            .find(|node| {
                ElementRef::wrap(*node).is_some_and(|el| el.value().id() == Some(id))
            })
            .map(|node| node.id())
    }

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        let doc = self.doc.borrow();
        doc.select(doc.body, selector)
    }

    fn query_within(&self, scope: &NodeId, selector: &str) -> Option<NodeId> {
        self.doc.borrow().select(*scope, selector).into_iter().next()
    }

    fn create_element(&self, tag: &str) -> Option<NodeId> {
        let mut doc = self.doc.borrow_mut();
        let element = Document::parse_element(tag, &[]);
        Some(doc.html.tree.orphan(element).id())
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) {
        if let Some(mut node) = self.doc.borrow_mut().html.tree.get_mut(*parent) {
            node.append_id(*child);
        }
    }

    fn set_inner_html(&self, el: &NodeId, html: &str) {
        let mut doc = self.doc.borrow_mut();
        doc.clear_children(*el);
        doc.import_html(*el, html);
    }

    fn set_text(&self, el: &NodeId, text: &str) {
        let mut doc = self.doc.borrow_mut();
        doc.clear_children(*el);
        doc.append(*el, Node::Text(Text { text: text.into() }));
    }

    fn text(&self, el: &NodeId) -> String {
        self.doc.borrow().element(*el).text().collect()
    }

    fn set_attribute(&self, el: &NodeId, name: &str, value: &str) {
        self.doc
            .borrow_mut()
            .edit_attrs(*el, |attrs| upsert(attrs, name, value));
    }

    fn attribute(&self, el: &NodeId, name: &str) -> Option<String> {
        self.doc
            .borrow()
            .element(*el)
            .value()
            .attr(name)
            .map(str::to_string)
    }

    fn set_hidden(&self, el: &NodeId, hidden: bool) {
        self.doc.borrow_mut().edit_attrs(*el, |attrs| {
            attrs.retain(|(n, _)| n != "hidden");
            if hidden {
                attrs.push(("hidden".to_string(), String::new()));
            }
        });
    }

    fn is_hidden(&self, el: &NodeId) -> bool {
        self.attribute(el, "hidden").is_some()
    }

    fn add_class(&self, el: &NodeId, class: &str) {
        let mut doc = self.doc.borrow_mut();
        let mut classes = doc.classes(*el);
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
            doc.set_classes(*el, &classes);
        }
    }

    fn remove_class(&self, el: &NodeId, class: &str) {
        let mut doc = self.doc.borrow_mut();
        let mut classes = doc.classes(*el);
        classes.retain(|c| c != class);
        doc.set_classes(*el, &classes);
    }

    fn toggle_class(&self, el: &NodeId, class: &str) -> bool {
        if self.has_class(el, class) {
            self.remove_class(el, class);
            false
        } else {
            self.add_class(el, class);
            true
        }
    }

    fn has_class(&self, el: &NodeId, class: &str) -> bool {
        self.doc.borrow().classes(*el).iter().any(|c| c == class)
    }

    fn offset_top(&self, el: &NodeId) -> f64 {
        self.doc.borrow().layout(*el, "data-top")
    }

    fn offset_height(&self, el: &NodeId) -> f64 {
        self.doc.borrow().layout(*el, "data-height")
    }

    fn scroll_y(&self) -> f64 {
        self.doc.borrow().scroll_y
    }

    fn scroll_height(&self) -> f64 {
        self.doc.borrow().scroll_height
    }

    fn viewport_height(&self) -> f64 {
        self.doc.borrow().viewport_height
    }

    fn on_click(&self, el: &NodeId, handler: ClickHandler) {
        self.doc
            .borrow_mut()
            .clicks
            .entry(*el)
            .or_default()
            .push(handler);
    }

    fn on_scroll(&self, handler: ScrollHandler) {
        self.doc.borrow_mut().scrolls.push(handler);
    }

    fn observe(&self, targets: &[NodeId], threshold: f64, handler: IntersectHandler<NodeId>) {
        self.doc.borrow_mut().observers.push(Observer {
            threshold,
            targets: targets.to_vec(),
            handler,
        });
    }
}

// =========================================================================
// Canned fetch
// =========================================================================

/// A [`Fetch`] that answers every request with the same canned result and
/// records the URLs it was asked for.
#[derive(Clone)]
pub struct StubFetch {
    response: Result<String, String>,
    requested: Rc<RefCell<Vec<String>>>,
}

impl StubFetch {
    pub fn ok(body: &str) -> Self {
        Self {
            response: Ok(body.to_string()),
            requested: Rc::default(),
        }
    }

    pub fn fail(reason: &str) -> Self {
        Self {
            response: Err(reason.to_string()),
            requested: Rc::default(),
        }
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }
}

impl Fetch for StubFetch {
    fn fetch_text(&self, url: &str) -> impl Future<Output = Result<String, LoadError>> {
        self.requested.borrow_mut().push(url.to_string());
        std::future::ready(self.response.clone().map_err(LoadError::Fetch))
    }
}

// =========================================================================
// Fixtures
// =========================================================================

/// A `posts.json` body with three posts, deliberately out of date order.
pub const THREE_POSTS: &str = r#"[
    {"title": "Middle", "date": "2024-03-10", "excerpt": "m-ex", "fullText": "m-full"},
    {"title": "Newest", "date": "2024-06-01", "excerpt": "n-ex", "fullText": "n-full"},
    {"title": "Oldest", "date": "2023-12-25", "excerpt": "o-ex", "fullText": "o-full"}
]"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_markup_into_queryable_nodes() {
        let dom = MemoryDom::from_html(
            r##"<nav id="nav-links"><a class="nav-link" href="#about">About</a></nav>
               <section id="about" data-top="300" data-height="500"><p>Hi</p></section>"##,
        );
        let link = dom.first(".nav-link");
        assert_eq!(dom.attribute(&link, "href").as_deref(), Some("#about"));
        assert_eq!(dom.texts("section[id]"), vec!["Hi"]);
        let section = dom.element_by_id("about").unwrap();
        assert_eq!(dom.offset_top(&section), 300.0);
        assert_eq!(dom.offset_height(&section), 500.0);
    }

    #[test]
    fn comma_selectors_keep_document_order() {
        let dom = MemoryDom::from_html(
            r#"<div class="card">1</div><section>2</section><article>3</article>"#,
        );
        let found = dom.query_all("section, .card, article");
        let tags: Vec<String> = found.iter().map(|id| dom.tag(*id)).collect();
        assert_eq!(tags, vec!["div", "section", "article"]);
    }

    #[test]
    fn descendant_combinators_match() {
        let dom = MemoryDom::from_html(
            r#"<section><p class="a">in</p></section><p class="b">out</p>"#,
        );
        assert_eq!(dom.texts("section p"), vec!["in"]);
        assert_eq!(dom.texts("section > .a, p.b"), vec!["in", "out"]);
    }

    #[test]
    fn invalid_selector_matches_nothing() {
        let dom = MemoryDom::from_html(r#"<p>x</p>"#);
        assert!(dom.query_all("[[not a selector").is_empty());
    }

    #[test]
    fn attribute_edits_keep_children_and_selector_state() {
        let dom = MemoryDom::from_html(r#"<ul id="nav-links"><li>Home</li></ul>"#);
        let links = dom.element_by_id("nav-links").unwrap();
        dom.add_class(&links, "open");
        assert_eq!(dom.query_all("ul.open"), vec![links]);
        assert_eq!(dom.text(&links), "Home");
        dom.set_hidden(&links, true);
        assert_eq!(dom.query_all("[hidden]"), vec![links]);
        dom.remove_class(&links, "open");
        assert!(dom.query_all(".open").is_empty());
    }

    #[test]
    fn inner_html_replaces_children() {
        let dom = MemoryDom::from_html(r#"<div id="slot"><span>old</span></div>"#);
        let slot = dom.element_by_id("slot").unwrap();
        dom.set_inner_html(&slot, r#"<p class="full-text" hidden>new</p>"#);
        let p = dom.query_within(&slot, ".full-text").unwrap();
        assert!(dom.is_hidden(&p));
        assert_eq!(dom.text(&slot), "new");
    }

    #[test]
    fn handlers_may_reenter_the_document() {
        let dom = MemoryDom::from_html(r#"<button id="b">x</button>"#);
        let button = dom.element_by_id("b").unwrap();
        let inner = dom.clone();
        dom.on_click(
            &button,
            Box::new(move || {
                inner.toggle_class(&button, "on");
            }),
        );
        dom.click(button);
        assert!(dom.has_class(&button, "on"));
        dom.click(button);
        assert!(!dom.has_class(&button, "on"));
    }
}
