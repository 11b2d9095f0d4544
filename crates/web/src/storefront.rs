//! Page bootstrap and event handling.
//!
//! Every handler runs to completion against the page it is given; nothing here returns an
//! error to the host. Invalid input is rejected at the boundary and render failures are
//! logged.

use std::time::Duration;

use pearlshop_core::config::StorefrontConfig;
use pearlshop_core::errors::{parse_edited_quantity, parse_selected_quantity};
use pearlshop_core::{CartStore, CartUpdate, DomainError, KeyValueStorage, ProductId, Section};
use tracing::{debug, error, info};

use crate::dom;
use crate::page::{DocumentPage, Page};
use crate::render::{RenderError, RenderOutcome, Renderer};
use crate::view::{CartView, CatalogView};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorefrontSettings {
    pub currency: String,
    pub default_section: Section,
    pub max_selectable_quantity: u32,
    pub confirmation_delay: Duration,
    pub cart_page: String,
}

impl Default for StorefrontSettings {
    fn default() -> Self {
        Self {
            currency: pearlshop_core::pricing::DEFAULT_CURRENCY.to_string(),
            default_section: Section::Necklaces,
            max_selectable_quantity: 10,
            confirmation_delay: Duration::from_millis(900),
            cart_page: "cart.html".to_string(),
        }
    }
}

impl From<&StorefrontConfig> for StorefrontSettings {
    fn from(config: &StorefrontConfig) -> Self {
        Self {
            currency: config.currency.clone(),
            default_section: config.default_section,
            max_selectable_quantity: config.max_selectable_quantity,
            confirmation_delay: config.confirmation_delay(),
            cart_page: config.cart_page.clone(),
        }
    }
}

/// Interactions a page can raise.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageEvent {
    SectionChanged { section: String },
    /// "Add" clicked; `selected` is the card's quantity selector value.
    AddToCart { product_id: ProductId, selected: String },
    /// A cart quantity input changed to `raw`.
    QuantityEdited { product_id: ProductId, raw: String },
    RemoveFromCart { product_id: ProductId },
    ViewCart,
    Print,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventOutcome {
    Rendered(RenderOutcome),
    CartChanged(CartUpdate),
    Rejected(DomainError),
    Navigated(String),
    PrintRequested,
    /// The control that raises this event is not on the page.
    Ignored,
}

pub struct Storefront<S> {
    cart: CartStore<S>,
    renderer: Renderer,
    settings: StorefrontSettings,
}

impl<S: KeyValueStorage> Storefront<S> {
    pub fn new(cart: CartStore<S>, settings: StorefrontSettings) -> Result<Self, RenderError> {
        Ok(Self { cart, renderer: Renderer::new()?, settings })
    }

    pub fn cart(&self) -> &CartStore<S> {
        &self.cart
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn settings(&self) -> &StorefrontSettings {
        &self.settings
    }

    pub fn into_cart(self) -> CartStore<S> {
        self.cart
    }

    /// Page-ready: load the cart, refresh badges, render whatever this page hosts.
    pub fn boot<P: Page>(&mut self, page: &mut P) {
        self.cart.load();
        self.refresh_badges(page, self.cart.count());

        let catalog = if page.has_element(dom::SECTION_SELECT) {
            let selected = page.value(dom::SECTION_SELECT);
            self.render_catalog(page, selected.as_deref())
        } else {
            let fallback = self.settings.default_section.as_str();
            self.render_catalog(page, Some(fallback))
        };

        let cart = if page.has_element(dom::CART_CONTENTS) {
            self.render_cart(page)
        } else {
            RenderOutcome::Skipped
        };

        info!(
            event_name = "storefront.boot.completed",
            item_count = self.cart.count(),
            catalog = ?catalog,
            cart = ?cart,
            "storefront ready"
        );
    }

    pub fn dispatch<P: Page>(&mut self, page: &mut P, event: PageEvent) -> EventOutcome {
        debug!(event_name = "storefront.event.received", event = ?event, "page event");

        match event {
            PageEvent::SectionChanged { section } => {
                EventOutcome::Rendered(self.render_catalog(page, Some(&section)))
            }
            PageEvent::AddToCart { product_id, selected } => {
                self.add_to_cart(page, product_id, &selected)
            }
            PageEvent::QuantityEdited { product_id, raw } => {
                self.edit_quantity(page, product_id, &raw)
            }
            PageEvent::RemoveFromCart { product_id } => {
                let update = self.cart.remove(product_id);
                self.refresh_badges(page, update.item_count);
                self.render_cart(page);
                EventOutcome::CartChanged(update)
            }
            PageEvent::ViewCart => {
                if !page.has_element(dom::VIEW_CART_BUTTON) {
                    return EventOutcome::Ignored;
                }
                page.navigate(&self.settings.cart_page);
                EventOutcome::Navigated(self.settings.cart_page.clone())
            }
            PageEvent::Print => {
                if !page.has_element(dom::PRINT_BUTTON) {
                    return EventOutcome::Ignored;
                }
                page.print();
                EventOutcome::PrintRequested
            }
        }
    }

    /// Renders the product list for `section`. `None` or a missing container does nothing;
    /// an unrecognised section renders the empty placeholder.
    pub fn render_catalog<P: Page>(&self, page: &mut P, section: Option<&str>) -> RenderOutcome {
        let Some(raw) = section else {
            return RenderOutcome::Skipped;
        };
        if !page.has_element(dom::PRODUCTS_ROW) {
            return RenderOutcome::Skipped;
        }

        let section = raw.parse::<Section>().ok();
        let view = CatalogView::build(
            self.cart.catalog(),
            section,
            &self.settings.currency,
            self.settings.max_selectable_quantity,
        );

        self.renderer.attach_catalog(page, &view).unwrap_or_else(|error| {
            error!(
                event_name = "storefront.render.catalog_failed",
                section = raw,
                error = %error,
                "catalog render failed"
            );
            RenderOutcome::Skipped
        })
    }

    pub fn render_cart<P: Page>(&self, page: &mut P) -> RenderOutcome {
        let lines = self.cart.list();
        let view = CartView::build(&lines, &self.settings.currency);

        self.renderer.attach_cart(page, &view).unwrap_or_else(|error| {
            error!(event_name = "storefront.render.cart_failed", error = %error, "cart render failed");
            RenderOutcome::Skipped
        })
    }

    pub fn refresh_badges<P: Page>(&self, page: &mut P, count: u64) {
        let text = count.to_string();
        for badge in dom::CART_COUNT_BADGES {
            page.set_text(badge, &text);
        }
    }

    fn add_to_cart<P: Page>(
        &mut self,
        page: &mut P,
        product_id: ProductId,
        selected: &str,
    ) -> EventOutcome {
        let quantity = match parse_selected_quantity(selected) {
            Ok(quantity) => quantity,
            Err(rejection) => {
                page.alert(rejection.user_message());
                return EventOutcome::Rejected(rejection);
            }
        };

        if self.cart.catalog().find(product_id).is_none() {
            let rejection = DomainError::UnknownProduct(product_id);
            page.alert(rejection.user_message());
            return EventOutcome::Rejected(rejection);
        }

        let update = match self.cart.add(product_id, i64::from(quantity)) {
            Ok(update) => update,
            Err(rejection) => {
                page.alert(rejection.user_message());
                return EventOutcome::Rejected(rejection);
            }
        };
        self.refresh_badges(page, update.item_count);
        page.flash_label(
            &dom::add_button_id(product_id),
            dom::ADDED_LABEL,
            dom::ADD_LABEL,
            self.settings.confirmation_delay,
        );

        EventOutcome::CartChanged(update)
    }

    fn edit_quantity<P: Page>(
        &mut self,
        page: &mut P,
        product_id: ProductId,
        raw: &str,
    ) -> EventOutcome {
        let edited = parse_edited_quantity(raw)
            .and_then(|quantity| self.cart.set(product_id, i64::from(quantity)));

        match edited {
            Ok(update) => {
                self.refresh_badges(page, update.item_count);
                self.render_cart(page);
                EventOutcome::CartChanged(update)
            }
            Err(rejection) => {
                let previous = self.cart.quantity(product_id).unwrap_or(0);
                page.set_value(&dom::cart_quantity_input_id(product_id), &previous.to_string());
                debug!(
                    event_name = "storefront.cart.edit_reverted",
                    product_id = product_id.0,
                    raw = raw,
                    previous = previous,
                    "invalid quantity edit reverted"
                );
                EventOutcome::Rejected(rejection)
            }
        }
    }
}

pub const SHOP_TITLE: &str = "Pearl Shop";
pub const CART_TITLE: &str = "Your Cart";

impl<S: KeyValueStorage> Storefront<S> {
    /// Full catalog document built from a booted in-memory page.
    pub fn shop_document(&self, page: &DocumentPage) -> Result<String, RenderError> {
        let selected =
            page.value(dom::SECTION_SELECT).and_then(|raw| raw.parse::<Section>().ok());
        let products = page.inner_html(dom::PRODUCTS_ROW).unwrap_or_default();
        self.renderer.shop_document(SHOP_TITLE, selected, products, self.cart.count())
    }

    /// Full cart document built from a booted in-memory page.
    pub fn cart_document(&self, page: &DocumentPage) -> Result<String, RenderError> {
        let contents = page.inner_html(dom::CART_CONTENTS).unwrap_or_default();
        let subtotal = page.inner_html(dom::CART_SUBTOTAL).unwrap_or_default();
        self.renderer.cart_document(CART_TITLE, contents, subtotal, self.cart.count())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use pearlshop_core::{
        CartStore, Catalog, DisabledStorage, DomainError, KeyValueStorage, MemoryStorage, ProductId,
    };

    use super::{EventOutcome, PageEvent, Storefront, StorefrontSettings};
    use crate::dom;
    use crate::page::{DocumentPage, Page};
    use crate::render::RenderOutcome;

    fn storefront_with(storage: MemoryStorage) -> Storefront<MemoryStorage> {
        let cart = CartStore::new(storage, Arc::new(Catalog::sample()));
        Storefront::new(cart, StorefrontSettings::default()).expect("templates should load")
    }

    fn add(product_id: u32, selected: &str) -> PageEvent {
        PageEvent::AddToCart { product_id: ProductId(product_id), selected: selected.to_string() }
    }

    #[test]
    fn boot_renders_selected_section_and_badges() {
        let storage = MemoryStorage::new().with_item("pearlCart", r#"{"2":1,"4":2}"#);
        let mut storefront = storefront_with(storage);
        let mut page = DocumentPage::shop("bracelets");

        storefront.boot(&mut page);

        let products = page.inner_html(dom::PRODUCTS_ROW).expect("products row");
        assert!(products.contains("Rose Gold Bracelet"));
        assert!(products.contains("Pearl Cuff Bracelet"));
        assert!(!products.contains("Multi-Strand Necklace"));
        assert_eq!(page.inner_html("cartCount"), Some("3"));
        assert_eq!(page.inner_html("cartCountTop"), Some("3"));
    }

    #[test]
    fn boot_on_cart_page_renders_rows_and_subtotal() {
        let storage = MemoryStorage::new().with_item("pearlCart", r#"{"2":1,"4":2,"99":1}"#);
        let mut storefront = storefront_with(storage);
        let mut page = DocumentPage::cart();

        storefront.boot(&mut page);

        let contents = page.inner_html(dom::CART_CONTENTS).expect("cart contents");
        assert_eq!(contents.matches("class=\"cart-row\"").count(), 2);
        assert_eq!(
            page.inner_html(dom::CART_SUBTOTAL),
            Some("<strong>Subtotal: SAR 1615.00</strong>")
        );
        assert_eq!(page.inner_html("cartCountTop"), Some("4"));
    }

    #[test]
    fn adding_twice_accumulates_and_flashes_confirmation() {
        let mut storefront = storefront_with(MemoryStorage::new());
        let mut page = DocumentPage::shop("earrings");
        storefront.boot(&mut page);

        let _ = storefront.dispatch(&mut page, add(1, "2"));
        let outcome = storefront.dispatch(&mut page, add(1, "3"));

        let EventOutcome::CartChanged(update) = outcome else {
            panic!("expected a cart change, got {outcome:?}");
        };
        assert_eq!(update.quantity, Some(5));
        assert_eq!(update.item_count, 5);
        assert!(update.persisted);
        assert_eq!(page.inner_html("cartCount"), Some("5"));
        assert_eq!(page.label("add-btn-1"), Some(dom::ADDED_LABEL));

        let reset = page.pending_resets().last().expect("a label reset is scheduled");
        assert_eq!(reset.delay, Duration::from_millis(900));
        page.run_timers();
        assert_eq!(page.label("add-btn-1"), Some(dom::ADD_LABEL));

        let stored = storefront.cart().storage().get_item("pearlCart").expect("read");
        assert_eq!(stored.as_deref(), Some(r#"{"1":5}"#));
    }

    #[test]
    fn zero_selection_alerts_and_leaves_cart_alone() {
        let mut storefront = storefront_with(MemoryStorage::new());
        let mut page = DocumentPage::shop("sets");
        storefront.boot(&mut page);

        let outcome = storefront.dispatch(&mut page, add(5, "0"));

        assert_eq!(
            outcome,
            EventOutcome::Rejected(DomainError::QuantityNotPositive { quantity: 0 })
        );
        assert_eq!(page.alerts(), ["Please select at least one item to add."]);
        assert_eq!(storefront.cart().count(), 0);
        assert!(storefront.cart().storage().items().is_empty());
    }

    #[test]
    fn negative_edit_reverts_the_input() {
        let storage = MemoryStorage::new().with_item("pearlCart", r#"{"4":2}"#);
        let mut storefront = storefront_with(storage);
        let mut page = DocumentPage::cart();
        storefront.boot(&mut page);

        let outcome = storefront.dispatch(
            &mut page,
            PageEvent::QuantityEdited { product_id: ProductId(4), raw: "-1".to_string() },
        );

        assert!(matches!(outcome, EventOutcome::Rejected(DomainError::InvalidQuantity { .. })));
        assert_eq!(page.value("cart-qty-4").as_deref(), Some("2"));
        assert_eq!(storefront.cart().quantity(ProductId(4)), Some(2));
        assert!(page.alerts().is_empty());
    }

    #[test]
    fn documents_wrap_rendered_fragments() {
        let storage = MemoryStorage::new().with_item("pearlCart", r#"{"5":1}"#);
        let mut storefront = storefront_with(storage);
        let mut shop = DocumentPage::shop("sets");
        let mut cart = DocumentPage::cart();
        storefront.boot(&mut shop);
        storefront.boot(&mut cart);

        let shop_html = storefront.shop_document(&shop).expect("shop document");
        let cart_html = storefront.cart_document(&cart).expect("cart document");

        assert!(shop_html.contains("Luxury Pearl Set"));
        assert!(shop_html.contains("<option value=\"sets\" selected>Sets</option>"));
        assert!(shop_html.contains("<span id=\"cartCount\">1</span>"));
        assert!(cart_html.contains("Subtotal: SAR 2450.00"));
    }

    #[test]
    fn oversized_edit_reverts_instead_of_clamping() {
        let storage = MemoryStorage::new().with_item("pearlCart", r#"{"2":3}"#);
        let mut storefront = storefront_with(storage);
        let mut page = DocumentPage::cart();
        storefront.boot(&mut page);

        let outcome = storefront.dispatch(
            &mut page,
            PageEvent::QuantityEdited { product_id: ProductId(2), raw: "5000000000".to_string() },
        );

        assert!(matches!(outcome, EventOutcome::Rejected(DomainError::InvalidQuantity { .. })));
        assert_eq!(page.value("cart-qty-2").as_deref(), Some("3"));
        assert_eq!(storefront.cart().count(), 3);
        let stored = storefront.cart().storage().get_item("pearlCart").expect("read");
        assert_eq!(stored.as_deref(), Some(r#"{"2":3}"#));
    }

    #[test]
    fn adding_past_the_largest_quantity_alerts() {
        let storage = MemoryStorage::new().with_item("pearlCart", r#"{"5":4294967295}"#);
        let mut storefront = storefront_with(storage);
        let mut page = DocumentPage::shop("sets");
        storefront.boot(&mut page);

        let outcome = storefront.dispatch(&mut page, add(5, "1"));

        assert!(matches!(outcome, EventOutcome::Rejected(DomainError::QuantityOutOfRange { .. })));
        assert_eq!(page.alerts(), ["That quantity is too large."]);
        assert_eq!(storefront.cart().quantity(ProductId(5)), Some(u32::MAX));
    }

    #[test]
    fn cleared_edit_removes_the_row() {
        let storage = MemoryStorage::new().with_item("pearlCart", r#"{"2":1,"4":3}"#);
        let mut storefront = storefront_with(storage);
        let mut page = DocumentPage::cart();
        storefront.boot(&mut page);

        let outcome = storefront.dispatch(
            &mut page,
            PageEvent::QuantityEdited { product_id: ProductId(4), raw: String::new() },
        );

        assert!(matches!(outcome, EventOutcome::CartChanged(_)));
        assert_eq!(storefront.cart().quantity(ProductId(4)), None);
        assert_eq!(page.inner_html("cartCountTop"), Some("1"));
    }

    #[test]
    fn zero_edit_removes_the_row() {
        let storage = MemoryStorage::new().with_item("pearlCart", r#"{"2":1,"4":2}"#);
        let mut storefront = storefront_with(storage);
        let mut page = DocumentPage::cart();
        storefront.boot(&mut page);

        let _ = storefront.dispatch(
            &mut page,
            PageEvent::QuantityEdited { product_id: ProductId(4), raw: "0".to_string() },
        );

        let contents = page.inner_html(dom::CART_CONTENTS).expect("cart contents");
        assert!(!contents.contains("Pearl Cuff Bracelet"));
        assert_eq!(
            page.inner_html(dom::CART_SUBTOTAL),
            Some("<strong>Subtotal: SAR 485.00</strong>")
        );
        assert_eq!(page.inner_html("cartCountTop"), Some("1"));
    }

    #[test]
    fn removing_the_last_item_shows_empty_cart() {
        let storage = MemoryStorage::new().with_item("pearlCart", r#"{"2":1}"#);
        let mut storefront = storefront_with(storage);
        let mut page = DocumentPage::cart();
        storefront.boot(&mut page);

        let _ = storefront
            .dispatch(&mut page, PageEvent::RemoveFromCart { product_id: ProductId(2) });

        let contents = page.inner_html(dom::CART_CONTENTS).expect("cart contents");
        assert!(contents.contains("Your cart is empty."));
        assert_eq!(page.inner_html(dom::CART_SUBTOTAL), Some(""));
        assert_eq!(page.inner_html("cartCountTop"), Some("0"));
    }

    #[test]
    fn section_change_rerenders_and_unknown_section_shows_placeholder() {
        let mut storefront = storefront_with(MemoryStorage::new());
        let mut page = DocumentPage::shop("necklaces");
        storefront.boot(&mut page);

        let outcome = storefront
            .dispatch(&mut page, PageEvent::SectionChanged { section: "bracelets".to_string() });
        assert_eq!(outcome, EventOutcome::Rendered(RenderOutcome::Rendered(2)));

        let outcome = storefront
            .dispatch(&mut page, PageEvent::SectionChanged { section: "Bracelets".to_string() });
        assert_eq!(outcome, EventOutcome::Rendered(RenderOutcome::Rendered(2)));

        let outcome = storefront
            .dispatch(&mut page, PageEvent::SectionChanged { section: "rings".to_string() });
        assert_eq!(outcome, EventOutcome::Rendered(RenderOutcome::Placeholder));
        let products = page.inner_html(dom::PRODUCTS_ROW).expect("products row");
        assert!(products.contains("No items in this section."));
    }

    #[test]
    fn navigation_and_print_need_their_buttons() {
        let mut storefront = storefront_with(MemoryStorage::new());
        let mut shop = DocumentPage::shop("sets");
        let mut cart = DocumentPage::cart();

        assert_eq!(
            storefront.dispatch(&mut shop, PageEvent::ViewCart),
            EventOutcome::Navigated("cart.html".to_string())
        );
        assert_eq!(shop.location(), Some("cart.html"));
        assert_eq!(storefront.dispatch(&mut cart, PageEvent::ViewCart), EventOutcome::Ignored);
        assert_eq!(storefront.dispatch(&mut cart, PageEvent::Print), EventOutcome::PrintRequested);
        assert_eq!(cart.print_requests(), 1);
        assert_eq!(
            storefront.dispatch(&mut DocumentPage::new(), PageEvent::Print),
            EventOutcome::Ignored
        );
    }

    #[test]
    fn unknown_product_is_rejected() {
        let mut storefront = storefront_with(MemoryStorage::new());
        let mut page = DocumentPage::shop("sets");

        let outcome = storefront.dispatch(&mut page, add(99, "1"));

        assert_eq!(outcome, EventOutcome::Rejected(DomainError::UnknownProduct(ProductId(99))));
        assert_eq!(storefront.cart().count(), 0);
    }

    #[test]
    fn disabled_storage_keeps_the_session_working() {
        let cart = CartStore::new(DisabledStorage, Arc::new(Catalog::sample()));
        let mut storefront =
            Storefront::new(cart, StorefrontSettings::default()).expect("templates should load");
        let mut page = DocumentPage::shop("sets");
        storefront.boot(&mut page);

        let outcome = storefront.dispatch(&mut page, add(5, "1"));

        let EventOutcome::CartChanged(update) = outcome else {
            panic!("expected a cart change, got {outcome:?}");
        };
        assert!(!update.persisted);
        assert_eq!(page.inner_html("cartCount"), Some("1"));
    }
}
