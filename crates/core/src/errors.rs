use std::num::IntErrorKind;

use thiserror::Error;

use crate::domain::product::ProductId;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid product id `{0}` (expected a positive integer)")]
    InvalidProductId(String),
    #[error("unknown section `{0}` (expected necklaces|bracelets|earrings|sets)")]
    UnknownSection(String),
    #[error("product {0} is not in the catalog")]
    UnknownProduct(ProductId),
    #[error("quantity `{raw}` is not a non-negative whole number")]
    InvalidQuantity { raw: String },
    #[error("quantity must be at least one, got {quantity}")]
    QuantityNotPositive { quantity: i64 },
    #[error("quantity {quantity} exceeds the largest storable quantity ({max})", max = u32::MAX)]
    QuantityOutOfRange { quantity: i64 },
}

impl DomainError {
    /// Text suitable for a blocking notice shown to the shopper.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::QuantityNotPositive { .. } => "Please select at least one item to add.",
            Self::InvalidQuantity { .. } => "Please enter a whole number of zero or more.",
            Self::QuantityOutOfRange { .. } => "That quantity is too large.",
            Self::UnknownProduct(_) | Self::InvalidProductId(_) => {
                "That item is no longer available."
            }
            Self::UnknownSection(_) => "That section does not exist.",
        }
    }
}

/// Parses a catalog selector value into a quantity that can be added to the cart.
/// Text that is not a number counts as zero; numbers beyond `u32` are rejected.
pub fn parse_selected_quantity(raw: &str) -> Result<u32, DomainError> {
    let quantity = match raw.trim().parse::<i64>() {
        Ok(quantity) => quantity,
        Err(error) if matches!(error.kind(), IntErrorKind::PosOverflow) => {
            return Err(DomainError::InvalidQuantity { raw: raw.to_string() });
        }
        Err(_) => 0,
    };
    if quantity <= 0 {
        return Err(DomainError::QuantityNotPositive { quantity });
    }
    u32::try_from(quantity).map_err(|_| DomainError::InvalidQuantity { raw: raw.to_string() })
}

/// Parses a cart quantity edit. Zero, or a cleared input, means "remove".
pub fn parse_edited_quantity(raw: &str) -> Result<u32, DomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed.parse::<u32>().map_err(|_| DomainError::InvalidQuantity { raw: raw.to_string() })
}

#[cfg(test)]
mod tests {
    use crate::errors::{parse_edited_quantity, parse_selected_quantity, DomainError};

    #[test]
    fn zero_selection_maps_to_select_at_least_one_notice() {
        let error = parse_selected_quantity("0").expect_err("zero must be rejected");

        assert_eq!(error, DomainError::QuantityNotPositive { quantity: 0 });
        assert_eq!(error.user_message(), "Please select at least one item to add.");
    }

    #[test]
    fn unparsable_selection_is_treated_as_zero() {
        let error = parse_selected_quantity("lots").expect_err("text must be rejected");
        assert_eq!(error, DomainError::QuantityNotPositive { quantity: 0 });
    }

    #[test]
    fn selection_accepts_positive_values() {
        assert_eq!(parse_selected_quantity(" 3 "), Ok(3));
    }

    #[test]
    fn edits_accept_zero_and_reject_negative_or_text() {
        assert_eq!(parse_edited_quantity("0"), Ok(0));
        assert_eq!(parse_edited_quantity("12"), Ok(12));
        assert!(matches!(parse_edited_quantity("-1"), Err(DomainError::InvalidQuantity { .. })));
        assert!(matches!(parse_edited_quantity("two"), Err(DomainError::InvalidQuantity { .. })));
        assert!(matches!(parse_edited_quantity("1.5"), Err(DomainError::InvalidQuantity { .. })));
    }

    #[test]
    fn cleared_edit_means_zero() {
        assert_eq!(parse_edited_quantity(""), Ok(0));
        assert_eq!(parse_edited_quantity("   "), Ok(0));
    }

    #[test]
    fn quantities_beyond_u32_are_rejected() {
        assert_eq!(parse_edited_quantity("4294967295"), Ok(u32::MAX));
        assert!(matches!(
            parse_edited_quantity("5000000000"),
            Err(DomainError::InvalidQuantity { .. })
        ));
        assert!(matches!(
            parse_selected_quantity("5000000000"),
            Err(DomainError::InvalidQuantity { .. })
        ));
        assert!(matches!(
            parse_selected_quantity("99999999999999999999"),
            Err(DomainError::InvalidQuantity { .. })
        ));
    }
}
