//! The document seam.
//!
//! Every component reaches the page through [`Dom`]: element lookups, the few
//! mutations the site needs, layout reads, and explicit event subscription.
//! The browser build implements it with `web-sys`; tests use an in-memory
//! document, so the behavior is exercised natively.
//!
//! Handlers are `'static` boxed closures. Implementations clone themselves
//! into a handler when it needs to touch the document again, which is why
//! `Dom: Clone` and is expected to be a cheap handle.

/// What an intersection handler wants to happen to the element it just saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Watch {
    /// Keep observing; the handler fires again on the next entry.
    Keep,
    /// Unobserve the element.
    Stop,
}

pub type ClickHandler = Box<dyn FnMut()>;
pub type ScrollHandler = Box<dyn FnMut()>;
pub type IntersectHandler<E> = Box<dyn FnMut(&E) -> Watch>;

pub trait Dom: Clone + 'static {
    type Element: Clone + 'static;

    // -- lookups ----------------------------------------------------------

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// All elements matching a CSS selector, in document order.
    fn query_all(&self, selector: &str) -> Vec<Self::Element>;

    /// First descendant of `scope` matching `selector`.
    fn query_within(&self, scope: &Self::Element, selector: &str) -> Option<Self::Element>;

    // -- construction -----------------------------------------------------

    fn create_element(&self, tag: &str) -> Option<Self::Element>;
    fn append_child(&self, parent: &Self::Element, child: &Self::Element);
    /// Replace the children of `el` with already-escaped markup.
    fn set_inner_html(&self, el: &Self::Element, html: &str);

    // -- content and attributes -------------------------------------------

    fn set_text(&self, el: &Self::Element, text: &str);
    fn text(&self, el: &Self::Element) -> String;
    fn set_attribute(&self, el: &Self::Element, name: &str, value: &str);
    fn attribute(&self, el: &Self::Element, name: &str) -> Option<String>;
    fn set_hidden(&self, el: &Self::Element, hidden: bool);
    fn is_hidden(&self, el: &Self::Element) -> bool;

    // -- classes ----------------------------------------------------------

    fn add_class(&self, el: &Self::Element, class: &str);
    fn remove_class(&self, el: &Self::Element, class: &str);
    /// Flip `class`; returns whether it is now present.
    fn toggle_class(&self, el: &Self::Element, class: &str) -> bool;
    fn has_class(&self, el: &Self::Element, class: &str) -> bool;

    // -- layout -----------------------------------------------------------

    fn offset_top(&self, el: &Self::Element) -> f64;
    fn offset_height(&self, el: &Self::Element) -> f64;
    /// Current vertical scroll offset of the window.
    fn scroll_y(&self) -> f64;
    /// Total scrollable height of the document body.
    fn scroll_height(&self) -> f64;
    fn viewport_height(&self) -> f64;

    // -- events -----------------------------------------------------------

    fn on_click(&self, el: &Self::Element, handler: ClickHandler);
    fn on_scroll(&self, handler: ScrollHandler);

    /// Watch `targets`; call `handler` whenever one of them becomes at least
    /// `threshold` visible. Returning [`Watch::Stop`] unobserves that element.
    fn observe(
        &self,
        targets: &[Self::Element],
        threshold: f64,
        handler: IntersectHandler<Self::Element>,
    );
}
