//! View models: plain data projected from the catalog and cart, ready for templates.

use pearlshop_core::{CartLine, Catalog, Product, ProductId, Section};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::dom;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProductCard {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub image: String,
    pub price: Decimal,
    pub select_id: String,
    pub button_id: String,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            description: product.description.clone(),
            image: product.image.clone(),
            price: product.price,
            select_id: dom::quantity_select_id(product.id),
            button_id: dom::add_button_id(product.id),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CatalogView {
    pub section: Option<Section>,
    pub currency: String,
    pub quantity_options: Vec<u32>,
    pub cards: Vec<ProductCard>,
}

impl CatalogView {
    /// Cards for every product in `section`. `None` (an unrecognised section) yields no cards.
    pub fn build(
        catalog: &Catalog,
        section: Option<Section>,
        currency: &str,
        max_selectable_quantity: u32,
    ) -> Self {
        let cards = match section {
            Some(section) => catalog.in_section(section).map(ProductCard::from).collect(),
            None => Vec::new(),
        };

        Self {
            section,
            currency: currency.to_string(),
            quantity_options: (0..=max_selectable_quantity).collect(),
            cards,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CartRow {
    pub id: ProductId,
    pub title: String,
    pub image: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub input_id: String,
    pub remove_id: String,
}

impl From<&CartLine<'_>> for CartRow {
    fn from(line: &CartLine<'_>) -> Self {
        Self {
            id: line.product.id,
            title: line.product.title.clone(),
            image: line.product.image.clone(),
            unit_price: line.product.price,
            quantity: line.quantity,
            input_id: dom::cart_quantity_input_id(line.product.id),
            remove_id: dom::remove_button_id(line.product.id),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub currency: String,
    pub rows: Vec<CartRow>,
    /// `None` when the cart has no renderable lines, which clears the subtotal display.
    pub subtotal: Option<Decimal>,
}

impl CartView {
    pub fn build(lines: &[CartLine<'_>], currency: &str) -> Self {
        let rows: Vec<CartRow> = lines.iter().map(CartRow::from).collect();
        let subtotal = if rows.is_empty() {
            None
        } else {
            Some(pearlshop_core::pricing::subtotal(lines))
        };

        Self { currency: currency.to_string(), rows, subtotal }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SectionOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

pub fn section_options(selected: Option<Section>) -> Vec<SectionOption> {
    Section::ALL
        .iter()
        .map(|section| SectionOption {
            value: section.as_str(),
            label: section.label(),
            selected: Some(*section) == selected,
        })
        .collect()
}
