//! Browser bindings.
//!
//! [`WebDom`] and [`WebFetch`] implement the crate's seams over `web-sys`,
//! and [`start`] is the module entry point run when the WASM module loads:
//!
//! ```html
//! <body data-page="home">
//!   ...
//!   <script type="module">
//!     import init from "./pkg/daily_light.js";
//!     init();
//!   </script>
//! </body>
//! ```
//!
//! `data-page` selects the [`PageMode`] (`home`, `blog`, anything else is
//! generic). An optional `<script type="application/toml" id="site-config">`
//! overrides the stock [`SiteConfig`].

use crate::config::{self, SiteConfig};
use crate::dom::{ClickHandler, Dom, IntersectHandler, ScrollHandler, Watch};
use crate::logging;
use crate::posts::{Fetch, LoadError};
use crate::site::Site;
use crate::types::PageMode;
use chrono::NaiveDate;
use js_sys::{Array, Reflect};
use std::future::Future;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Document, Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, Response, Window,
};

/// Id of the optional inline config block.
pub const CONFIG_ELEMENT_ID: &str = "site-config";

// ============================================================================
// Dom
// ============================================================================

#[derive(Clone)]
pub struct WebDom {
    window: Window,
    document: Document,
}

impl WebDom {
    /// The current window's document, if running in a page.
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self { window, document })
    }

    /// Page mode declared on `<body data-page="…">`.
    pub fn page_mode(&self) -> PageMode {
        self.document
            .body()
            .and_then(|body| body.get_attribute("data-page"))
            .and_then(|name| name.parse().ok())
            .unwrap_or_default()
    }

    fn is_loading(&self) -> bool {
        Reflect::get(&self.document, &JsValue::from_str("readyState"))
            .ok()
            .and_then(|state| state.as_string())
            .is_some_and(|state| state == "loading")
    }

    /// Run `f` once the DOM is parsed; immediately if it already is.
    fn when_ready(&self, f: impl FnOnce() + 'static) {
        if !self.is_loading() {
            f();
            return;
        }
        let callback = Closure::once_into_js(f);
        if let Err(e) = self
            .document
            .add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref())
        {
            tracing::error!(error = ?e, "cannot listen for DOMContentLoaded");
        }
    }
}

fn as_html(el: &Element) -> Option<&HtmlElement> {
    el.dyn_ref::<HtmlElement>()
}

/// Log a rejected DOM call. The page carries on without that mutation.
fn warn_on_err<T>(result: Result<T, JsValue>, call: &str) {
    if let Err(e) = result {
        tracing::warn!(call, error = ?e, "DOM call failed");
    }
}

impl Dom for WebDom {
    type Element = Element;

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn query_all(&self, selector: &str) -> Vec<Element> {
        let list = match self.document.query_selector_all(selector) {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!(selector, error = ?e, "invalid selector");
                return Vec::new();
            }
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn query_within(&self, scope: &Element, selector: &str) -> Option<Element> {
        scope.query_selector(selector).ok().flatten()
    }

    fn create_element(&self, tag: &str) -> Option<Element> {
        self.document.create_element(tag).ok()
    }

    fn append_child(&self, parent: &Element, child: &Element) {
        warn_on_err(parent.append_child(child), "appendChild");
    }

    fn set_inner_html(&self, el: &Element, html: &str) {
        el.set_inner_html(html);
    }

    fn set_text(&self, el: &Element, text: &str) {
        el.set_text_content(Some(text));
    }

    fn text(&self, el: &Element) -> String {
        el.text_content().unwrap_or_default()
    }

    fn set_attribute(&self, el: &Element, name: &str, value: &str) {
        warn_on_err(el.set_attribute(name, value), "setAttribute");
    }

    fn attribute(&self, el: &Element, name: &str) -> Option<String> {
        el.get_attribute(name)
    }

    fn set_hidden(&self, el: &Element, hidden: bool) {
        warn_on_err(el.toggle_attribute_with_force("hidden", hidden), "toggleAttribute");
    }

    fn is_hidden(&self, el: &Element) -> bool {
        el.has_attribute("hidden")
    }

    fn add_class(&self, el: &Element, class: &str) {
        warn_on_err(el.class_list().add_1(class), "classList.add");
    }

    fn remove_class(&self, el: &Element, class: &str) {
        warn_on_err(el.class_list().remove_1(class), "classList.remove");
    }

    fn toggle_class(&self, el: &Element, class: &str) -> bool {
        match el.class_list().toggle(class) {
            Ok(present) => present,
            Err(e) => {
                tracing::warn!(call = "classList.toggle", error = ?e, "DOM call failed");
                false
            }
        }
    }

    fn has_class(&self, el: &Element, class: &str) -> bool {
        el.class_list().contains(class)
    }

    fn offset_top(&self, el: &Element) -> f64 {
        as_html(el).map_or(0.0, |h| f64::from(h.offset_top()))
    }

    fn offset_height(&self, el: &Element) -> f64 {
        as_html(el).map_or(0.0, |h| f64::from(h.offset_height()))
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn scroll_height(&self) -> f64 {
        self.document
            .body()
            .map_or(0.0, |body| f64::from(body.scroll_height()))
    }

    fn viewport_height(&self) -> f64 {
        self.window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or(0.0)
    }

    fn on_click(&self, el: &Element, handler: ClickHandler) {
        let closure = Closure::<dyn FnMut()>::wrap(handler);
        if let Err(e) = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref()) {
            tracing::warn!(error = ?e, "cannot listen for clicks");
        }
        closure.forget();
    }

    fn on_scroll(&self, handler: ScrollHandler) {
        let closure = Closure::<dyn FnMut()>::wrap(handler);
        if let Err(e) = self
            .window
            .add_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref())
        {
            tracing::warn!(error = ?e, "cannot listen for scrolling");
        }
        closure.forget();
    }

    fn observe(&self, targets: &[Element], threshold: f64, mut handler: IntersectHandler<Element>) {
        let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |entries: Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    if !entry.is_intersecting() {
                        continue;
                    }
                    let target = entry.target();
                    if handler(&target) == Watch::Stop {
                        observer.unobserve(&target);
                    }
                }
            },
        );

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(threshold));
        match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options) {
            Ok(observer) => {
                for target in targets {
                    observer.observe(target);
                }
                callback.forget();
            }
            Err(e) => tracing::warn!(error = ?e, "IntersectionObserver unavailable"),
        }
    }
}

// ============================================================================
// Fetch
// ============================================================================

#[derive(Clone)]
pub struct WebFetch {
    window: Window,
}

impl WebFetch {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

fn js_error(value: JsValue) -> LoadError {
    LoadError::Fetch(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}

impl Fetch for WebFetch {
    fn fetch_text(&self, url: &str) -> impl Future<Output = Result<String, LoadError>> {
        let request = self.window.fetch_with_str(url);
        async move {
            let response = JsFuture::from(request).await.map_err(js_error)?;
            let response: Response = response.dyn_into().map_err(js_error)?;
            let body = JsFuture::from(response.text().map_err(js_error)?)
                .await
                .map_err(js_error)?;
            body.as_string()
                .ok_or_else(|| LoadError::Fetch("response body is not text".into()))
        }
    }
}

// ============================================================================
// Entry point
// ============================================================================

/// Today's calendar date in the visitor's local time zone.
fn local_today() -> Option<NaiveDate> {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(now.get_full_year() as i32, now.get_month() + 1, now.get_date())
}

/// The page's inline config, or the stock defaults.
///
/// A broken inline config is logged and ignored.
fn inline_config(dom: &WebDom) -> SiteConfig {
    let Some(source) = dom
        .element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content())
    else {
        return SiteConfig::default();
    };
    config::load_config_str(&source).unwrap_or_else(|e| {
        tracing::error!(error = %e, "ignoring inline site config");
        SiteConfig::default()
    })
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    logging::init();

    let Some(dom) = WebDom::new() else {
        return;
    };
    let fetch = WebFetch::new(dom.window.clone());
    let site = match Site::new(dom.clone(), fetch, inline_config(&dom)) {
        Ok(site) => site,
        Err(e) => {
            tracing::error!(error = %e, "invalid site configuration");
            return;
        }
    };

    // Transitions present at evaluation time animate regardless of DOM readiness.
    site.attach_transitions();

    let page = dom.clone();
    dom.when_ready(move || {
        let Some(today) = local_today() else {
            tracing::error!("cannot determine today's date");
            return;
        };
        if let Some(load) = site.boot(page.page_mode(), today) {
            wasm_bindgen_futures::spawn_local(load);
        }
    });
}

/// The fully commented stock configuration, for page authors.
#[wasm_bindgen(js_name = stockConfig)]
pub fn stock_config() -> String {
    config::stock_config_toml().to_string()
}
