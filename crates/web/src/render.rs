//! Markup projection and page attachment for the catalog and cart views.

use pearlshop_core::Section;
use tera::{Context, Tera};
use thiserror::Error;

use crate::dom;
use crate::page::Page;
use crate::templates;
use crate::view::{section_options, CartView, CatalogView};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template `{template}` failed to render: {source}")]
    Template { template: &'static str, source: tera::Error },
    #[error("templates failed to load: {0}")]
    Load(#[source] tera::Error),
}

/// What a render call did to the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The target container is not on this page, or there was nothing to render.
    Skipped,
    /// The view was empty and a placeholder was rendered.
    Placeholder,
    /// `n` cards or rows were rendered.
    Rendered(usize),
}

#[derive(Debug)]
pub struct CartMarkup {
    pub contents: String,
    pub subtotal: String,
}

pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    pub fn new() -> Result<Self, RenderError> {
        let tera = templates::load_templates().map_err(RenderError::Load)?;
        Ok(Self { tera })
    }

    pub fn catalog_markup(&self, view: &CatalogView) -> Result<String, RenderError> {
        let context = Context::from_serialize(view).map_err(|source| RenderError::Template {
            template: templates::PRODUCT_LIST,
            source,
        })?;
        self.render(templates::PRODUCT_LIST, &context)
    }

    pub fn cart_markup(&self, view: &CartView) -> Result<CartMarkup, RenderError> {
        let context = Context::from_serialize(view).map_err(|source| RenderError::Template {
            template: templates::CART_CONTENTS,
            source,
        })?;

        Ok(CartMarkup {
            contents: self.render(templates::CART_CONTENTS, &context)?,
            subtotal: self.render(templates::SUBTOTAL, &context)?.trim().to_string(),
        })
    }

    /// Replaces the product list with `view`. Skipped when the page has no product list.
    pub fn attach_catalog<P: Page>(
        &self,
        page: &mut P,
        view: &CatalogView,
    ) -> Result<RenderOutcome, RenderError> {
        if !page.has_element(dom::PRODUCTS_ROW) {
            return Ok(RenderOutcome::Skipped);
        }

        let markup = self.catalog_markup(view)?;
        page.replace_inner_html(dom::PRODUCTS_ROW, &markup);

        Ok(if view.is_empty() {
            RenderOutcome::Placeholder
        } else {
            RenderOutcome::Rendered(view.cards.len())
        })
    }

    /// Replaces the cart contents and subtotal display. Skipped when the page has no cart.
    pub fn attach_cart<P: Page>(
        &self,
        page: &mut P,
        view: &CartView,
    ) -> Result<RenderOutcome, RenderError> {
        if !page.has_element(dom::CART_CONTENTS) {
            return Ok(RenderOutcome::Skipped);
        }

        let markup = self.cart_markup(view)?;
        page.replace_inner_html(dom::CART_CONTENTS, &markup.contents);
        page.replace_inner_html(dom::CART_SUBTOTAL, &markup.subtotal);

        Ok(if view.is_empty() {
            RenderOutcome::Placeholder
        } else {
            RenderOutcome::Rendered(view.rows.len())
        })
    }

    pub fn shop_document(
        &self,
        title: &str,
        selected: Option<Section>,
        products_html: &str,
        cart_count: u64,
    ) -> Result<String, RenderError> {
        let mut context = Context::new();
        context.insert("title", title);
        context.insert("sections", &section_options(selected));
        context.insert("products_html", products_html);
        context.insert("cart_count", &cart_count);
        context.insert("cart_count_top", &cart_count);
        self.render(templates::SHOP_PAGE, &context)
    }

    pub fn cart_document(
        &self,
        title: &str,
        cart_html: &str,
        subtotal_html: &str,
        cart_count: u64,
    ) -> Result<String, RenderError> {
        let mut context = Context::new();
        context.insert("title", title);
        context.insert("cart_html", cart_html);
        context.insert("subtotal_html", subtotal_html);
        context.insert("cart_count_top", &cart_count);
        self.render(templates::CART_PAGE, &context)
    }

    fn render(&self, template: &'static str, context: &Context) -> Result<String, RenderError> {
        self.tera
            .render(template, context)
            .map_err(|source| RenderError::Template { template, source })
    }
}
