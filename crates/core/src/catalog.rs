use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::product::{Product, ProductId, Section};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read catalog file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse catalog: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("product ids must be positive (found 0 for `{title}`)")]
    ZeroId { title: String },
    #[error("duplicate product id {0}")]
    DuplicateId(ProductId),
    #[error("product {id} has a negative price {price}")]
    NegativePrice { id: ProductId, price: Decimal },
}

/// Read-only, ordered product list fixed at startup.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if product.id.0 == 0 {
                return Err(CatalogError::ZeroId { title: product.title.clone() });
            }
            if !seen.insert(product.id) {
                return Err(CatalogError::DuplicateId(product.id));
            }
            if product.price.is_sign_negative() && !product.price.is_zero() {
                return Err(CatalogError::NegativePrice { id: product.id, price: product.price });
            }
        }

        Ok(Self { products })
    }

    /// The built-in pearl catalog.
    pub fn sample() -> Self {
        Self {
            products: vec![
                Product::new(
                    1,
                    "Classic Pearl Studs",
                    Decimal::new(29_500, 2),
                    Section::Earrings,
                    "images/image1.jpg",
                    "7-8mm AAA-grade Akoya pearls in 14k white gold.",
                ),
                Product::new(
                    2,
                    "Rose Gold Bracelet",
                    Decimal::new(48_500, 2),
                    Section::Bracelets,
                    "images/image2.jpg",
                    "Freshwater pearls interwoven with rose gold links. Adjustable 6.5–7.5 inches.",
                ),
                Product::new(
                    3,
                    "Multi-Strand Necklace",
                    Decimal::new(79_500, 2),
                    Section::Necklaces,
                    "images/image3.jpg",
                    "Three strands of graduated South Sea pearls, 9–11mm, 18k gold clasp.",
                ),
                Product::new(
                    4,
                    "Pearl Cuff Bracelet",
                    Decimal::new(56_500, 2),
                    Section::Bracelets,
                    "images/image4.jpg",
                    "Five-row cultured pearl cuff with rose-gold plated brass.",
                ),
                Product::new(
                    5,
                    "Luxury Pearl Set",
                    Decimal::new(245_000, 2),
                    Section::Sets,
                    "images/image5.jpg",
                    "Matching necklace and earrings in 18k gold, presented in silk box.",
                ),
            ],
        }
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(raw)?;
        Self::new(file.products)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| CatalogError::ReadFile { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&raw)
    }

    pub fn find(&self, product_id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == product_id)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Products tagged with `section`, in catalog order.
    pub fn in_section(&self, section: Section) -> impl Iterator<Item = &Product> + '_ {
        self.products.iter().filter(move |product| product.section == section)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rust_decimal::Decimal;
    use tempfile::TempDir;

    use super::{Catalog, CatalogError};
    use crate::domain::product::{ProductId, Section};

    #[test]
    fn bracelets_section_keeps_catalog_order() {
        let catalog = Catalog::sample();
        let ids: Vec<ProductId> =
            catalog.in_section(Section::Bracelets).map(|product| product.id).collect();

        assert_eq!(ids, vec![ProductId(2), ProductId(4)]);
    }

    #[test]
    fn find_resolves_known_ids_only() {
        let catalog = Catalog::sample();
        assert_eq!(catalog.find(ProductId(5)).map(|p| p.title.as_str()), Some("Luxury Pearl Set"));
        assert!(catalog.find(ProductId(42)).is_none());
    }

    #[test]
    fn toml_catalog_parses_string_and_integer_prices() {
        let catalog = Catalog::from_toml_str(
            r#"
[[products]]
id = 10
title = "Baroque Drop"
price = "120.50"
section = "earrings"
image = "images/drop.jpg"

[[products]]
id = 11
title = "Seed Pearl Choker"
price = 300
section = "necklaces"
image = "images/choker.jpg"
description = "Hand-knotted."
"#,
        )
        .expect("catalog should parse");

        assert_eq!(catalog.len(), 2);
        let drop = catalog.find(ProductId(10)).expect("product 10");
        assert_eq!(drop.price, Decimal::new(12_050, 2));
        assert_eq!(drop.description, "");
        assert_eq!(catalog.find(ProductId(11)).map(|p| p.section), Some(Section::Necklaces));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let error = Catalog::from_toml_str(
            r#"
[[products]]
id = 1
title = "A"
price = "1.00"
section = "sets"
image = "a.jpg"

[[products]]
id = 1
title = "B"
price = "2.00"
section = "sets"
image = "b.jpg"
"#,
        )
        .expect_err("duplicate id must fail");

        assert!(matches!(error, CatalogError::DuplicateId(ProductId(1))));
    }

    #[test]
    fn negative_prices_are_rejected() {
        let error = Catalog::from_toml_str(
            r#"
[[products]]
id = 7
title = "Refund"
price = "-5.00"
section = "sets"
image = "r.jpg"
"#,
        )
        .expect_err("negative price must fail");

        assert!(matches!(error, CatalogError::NegativePrice { id: ProductId(7), .. }));
    }

    #[test]
    fn load_reads_catalog_from_disk() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("catalog.toml");
        fs::write(
            &path,
            "[[products]]\nid = 3\ntitle = \"Strand\"\nprice = \"10\"\nsection = \"necklaces\"\nimage = \"s.jpg\"\n",
        )
        .expect("write catalog");

        let catalog = Catalog::load(&path).expect("catalog should load");
        assert_eq!(catalog.products()[0].title, "Strand");

        let missing = Catalog::load(&dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(CatalogError::ReadFile { .. })));
    }
}
