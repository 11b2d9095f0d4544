use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u32);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProductId {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().parse::<u32>() {
            Ok(id) if id > 0 => Ok(Self(id)),
            _ => Err(DomainError::InvalidProductId(value.to_string())),
        }
    }
}

/// Category tag partitioning the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Necklaces,
    Bracelets,
    Earrings,
    Sets,
}

impl Section {
    pub const ALL: [Section; 4] =
        [Section::Necklaces, Section::Bracelets, Section::Earrings, Section::Sets];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Necklaces => "necklaces",
            Self::Bracelets => "bracelets",
            Self::Earrings => "earrings",
            Self::Sets => "sets",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Necklaces => "Necklaces",
            Self::Bracelets => "Bracelets",
            Self::Earrings => "Earrings",
            Self::Sets => "Sets",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts any letter case and surrounding whitespace, for config files, env vars and
/// CLI flags as well as selector values.
impl FromStr for Section {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "necklaces" => Ok(Self::Necklaces),
            "bracelets" => Ok(Self::Bracelets),
            "earrings" => Ok(Self::Earrings),
            "sets" => Ok(Self::Sets),
            other => Err(DomainError::UnknownSection(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Decimal,
    pub section: Section,
    pub image: String,
    #[serde(default)]
    pub description: String,
}

impl Product {
    pub fn new(
        id: u32,
        title: impl Into<String>,
        price: Decimal,
        section: Section,
        image: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: ProductId(id),
            title: title.into(),
            price,
            section,
            image: image.into(),
            description: description.into(),
        }
    }
}
