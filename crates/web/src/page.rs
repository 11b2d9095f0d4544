//! The page surface the storefront draws on.
//!
//! [`Page`] is the imperative attachment step: renderers produce markup strings and hand
//! them to a page by element id. [`DocumentPage`] is an in-memory page used by the CLI
//! host and by tests.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::dom;

pub trait Page {
    fn has_element(&self, id: &str) -> bool;

    /// Replaces an element's children. Returns `false` when the element is absent.
    fn replace_inner_html(&mut self, id: &str, html: &str) -> bool;

    /// Replaces an element's text. Returns `false` when the element is absent.
    fn set_text(&mut self, id: &str, text: &str) -> bool;

    /// Current value of a form control.
    fn value(&self, id: &str) -> Option<String>;

    fn set_value(&mut self, id: &str, value: &str);

    fn set_label(&mut self, id: &str, label: &str);

    /// Sets `label` now and restores `restore` after `delay`. Fire-and-forget.
    fn flash_label(&mut self, id: &str, label: &str, restore: &str, delay: Duration);

    /// Blocking notice shown to the shopper.
    fn alert(&mut self, message: &str);

    fn navigate(&mut self, href: &str);

    fn print(&mut self);
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    pub inner_html: String,
    pub value: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelReset {
    pub element_id: String,
    pub restore: String,
    pub delay: Duration,
}

/// In-memory page. Containers must be declared up front; per-product controls created by
/// rendered markup are tracked on demand through values and labels.
#[derive(Clone, Debug, Default)]
pub struct DocumentPage {
    elements: BTreeMap<String, Element>,
    control_values: BTreeMap<String, String>,
    labels: BTreeMap<String, String>,
    pending_resets: Vec<LabelReset>,
    alerts: Vec<String>,
    location: Option<String>,
    print_requests: usize,
}

impl DocumentPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog page: section selector, product list, navigation, and both count badges.
    pub fn shop(selected_section: &str) -> Self {
        Self::new()
            .with_element(dom::PRODUCTS_ROW)
            .with_value(dom::SECTION_SELECT, selected_section)
            .with_element(dom::VIEW_CART_BUTTON)
            .with_element(dom::PRINT_BUTTON)
            .with_element(dom::CART_COUNT_BADGES[0])
            .with_element(dom::CART_COUNT_BADGES[1])
    }

    /// Cart page: cart contents, subtotal display, print button, and the header badge.
    pub fn cart() -> Self {
        Self::new()
            .with_element(dom::CART_CONTENTS)
            .with_element(dom::CART_SUBTOTAL)
            .with_element(dom::PRINT_BUTTON)
            .with_element(dom::CART_COUNT_BADGES[1])
    }

    pub fn with_element(mut self, id: &str) -> Self {
        self.elements.entry(id.to_string()).or_default();
        self
    }

    pub fn with_value(mut self, id: &str, value: &str) -> Self {
        self.elements.entry(id.to_string()).or_default().value = Some(value.to_string());
        self
    }

    pub fn inner_html(&self, id: &str) -> Option<&str> {
        self.elements.get(id).map(|element| element.inner_html.as_str())
    }

    pub fn label(&self, id: &str) -> Option<&str> {
        self.labels.get(id).map(String::as_str)
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn print_requests(&self) -> usize {
        self.print_requests
    }

    pub fn pending_resets(&self) -> &[LabelReset] {
        &self.pending_resets
    }

    /// Applies every scheduled label reset, as if their delays had elapsed.
    pub fn run_timers(&mut self) -> usize {
        let resets = std::mem::take(&mut self.pending_resets);
        let fired = resets.len();
        for reset in resets {
            self.labels.insert(reset.element_id, reset.restore);
        }
        fired
    }
}

impl Page for DocumentPage {
    fn has_element(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    fn replace_inner_html(&mut self, id: &str, html: &str) -> bool {
        match self.elements.get_mut(id) {
            Some(element) => {
                element.inner_html = html.to_string();
                true
            }
            None => false,
        }
    }

    fn set_text(&mut self, id: &str, text: &str) -> bool {
        match self.elements.get_mut(id) {
            Some(element) => {
                element.inner_html = tera::escape_html(text);
                true
            }
            None => false,
        }
    }

    fn value(&self, id: &str) -> Option<String> {
        self.elements
            .get(id)
            .and_then(|element| element.value.clone())
            .or_else(|| self.control_values.get(id).cloned())
    }

    fn set_value(&mut self, id: &str, value: &str) {
        match self.elements.get_mut(id) {
            Some(element) => element.value = Some(value.to_string()),
            None => {
                self.control_values.insert(id.to_string(), value.to_string());
            }
        }
    }

    fn set_label(&mut self, id: &str, label: &str) {
        self.labels.insert(id.to_string(), label.to_string());
    }

    fn flash_label(&mut self, id: &str, label: &str, restore: &str, delay: Duration) {
        self.set_label(id, label);
        self.pending_resets.push(LabelReset {
            element_id: id.to_string(),
            restore: restore.to_string(),
            delay,
        });
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }

    fn navigate(&mut self, href: &str) {
        self.location = Some(href.to_string());
    }

    fn print(&mut self) {
        self.print_requests += 1;
    }
}
