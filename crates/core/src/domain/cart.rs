use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::domain::product::{Product, ProductId};
use crate::errors::DomainError;

/// Requested quantities keyed by product id.
///
/// Every stored quantity is strictly positive: operations whose result would be zero or
/// negative drop the entry instead. Iteration is in ascending product id order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CartItems {
    entries: BTreeMap<ProductId, u32>,
}

impl CartItems {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quantity(&self, product_id: ProductId) -> Option<u32> {
        self.entries.get(&product_id).copied()
    }

    /// Adds `delta` to the stored quantity, returning the resulting quantity if the entry
    /// survives. A result beyond `u32::MAX` leaves the cart untouched.
    pub fn add(&mut self, product_id: ProductId, delta: i64) -> Result<Option<u32>, DomainError> {
        let current = i64::from(self.quantity(product_id).unwrap_or(0));
        let quantity = current
            .checked_add(delta)
            .ok_or(DomainError::QuantityOutOfRange { quantity: delta })?;
        self.set(product_id, quantity)
    }

    /// Overwrites the stored quantity; `quantity <= 0` removes the entry.
    pub fn set(
        &mut self,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<Option<u32>, DomainError> {
        if quantity <= 0 {
            self.entries.remove(&product_id);
            return Ok(None);
        }

        let quantity =
            u32::try_from(quantity).map_err(|_| DomainError::QuantityOutOfRange { quantity })?;
        self.entries.insert(product_id, quantity);
        Ok(Some(quantity))
    }

    pub fn remove(&mut self, product_id: ProductId) -> Option<u32> {
        self.entries.remove(&product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProductId, u32)> + '_ {
        self.entries.iter().map(|(id, quantity)| (*id, *quantity))
    }

    /// Sum of all stored quantities, including ids the catalog no longer knows.
    pub fn count(&self) -> u64 {
        self.entries.values().map(|quantity| u64::from(*quantity)).sum()
    }
}

impl FromIterator<(ProductId, u32)> for CartItems {
    fn from_iter<T: IntoIterator<Item = (ProductId, u32)>>(iter: T) -> Self {
        let entries = iter.into_iter().filter(|(_, quantity)| *quantity > 0).collect();
        Self { entries }
    }
}

/// A cart entry joined with its catalog product.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CartLine<'a> {
    pub product: &'a Product,
    pub quantity: u32,
}

impl CartLine<'_> {
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::CartItems;
    use crate::cart::{decode_items, encode_items};
    use crate::domain::product::ProductId;
    use crate::errors::DomainError;

    #[test]
    fn add_accumulates_quantities() {
        let mut items = CartItems::new();
        assert_eq!(items.add(ProductId(1), 2), Ok(Some(2)));
        assert_eq!(items.add(ProductId(1), 3), Ok(Some(5)));
        assert_eq!(items.count(), 5);
    }

    #[test]
    fn negative_add_that_reaches_zero_drops_entry() {
        let mut items = CartItems::new();
        assert_eq!(items.add(ProductId(3), 2), Ok(Some(2)));

        assert_eq!(items.add(ProductId(3), -2), Ok(None));
        assert!(items.is_empty());

        assert_eq!(items.add(ProductId(4), -1), Ok(None));
        assert_eq!(items.quantity(ProductId(4)), None);
    }

    #[test]
    fn set_to_zero_or_negative_matches_remove() {
        let mut via_set_zero = CartItems::new();
        let mut via_set_negative = CartItems::new();
        let mut via_remove = CartItems::new();
        for items in [&mut via_set_zero, &mut via_set_negative, &mut via_remove] {
            assert_eq!(items.set(ProductId(2), 1), Ok(Some(1)));
            assert_eq!(items.set(ProductId(5), 4), Ok(Some(4)));
        }

        assert_eq!(via_set_zero.set(ProductId(5), 0), Ok(None));
        assert_eq!(via_set_negative.set(ProductId(5), -7), Ok(None));
        via_remove.remove(ProductId(5));

        assert_eq!(via_set_zero, via_remove);
        assert_eq!(via_set_negative, via_remove);
    }

    #[test]
    fn set_beyond_u32_is_rejected_without_clamping() {
        let mut items: CartItems = [(ProductId(2), 3)].into_iter().collect();

        assert_eq!(
            items.set(ProductId(2), 5_000_000_000),
            Err(DomainError::QuantityOutOfRange { quantity: 5_000_000_000 })
        );
        assert_eq!(items.quantity(ProductId(2)), Some(3));

        assert_eq!(items.set(ProductId(2), i64::from(u32::MAX)), Ok(Some(u32::MAX)));
    }

    #[test]
    fn add_past_u32_is_rejected_and_keeps_the_stored_quantity() {
        let mut items: CartItems = [(ProductId(1), u32::MAX - 1)].into_iter().collect();

        assert!(matches!(
            items.add(ProductId(1), 2),
            Err(DomainError::QuantityOutOfRange { .. })
        ));
        assert!(matches!(
            items.add(ProductId(1), i64::MAX),
            Err(DomainError::QuantityOutOfRange { .. })
        ));
        assert_eq!(items.quantity(ProductId(1)), Some(u32::MAX - 1));
        assert_eq!(items.add(ProductId(1), 1), Ok(Some(u32::MAX)));
    }

    #[test]
    fn iteration_follows_ascending_product_id() {
        let items: CartItems =
            [(ProductId(4), 2), (ProductId(2), 1), (ProductId(9), 1)].into_iter().collect();
        let ids: Vec<u32> = items.iter().map(|(id, _)| id.0).collect();
        assert_eq!(ids, vec![2, 4, 9]);
    }

    #[derive(Clone, Debug)]
    enum Operation {
        Add(u32, i64),
        Set(u32, i64),
        Remove(u32),
    }

    fn amount() -> impl Strategy<Value = i64> {
        prop_oneof![
            4 => -20i64..=20,
            1 => any::<i64>(),
            1 => Just(i64::from(u32::MAX)),
        ]
    }

    fn operation() -> impl Strategy<Value = Operation> {
        let id = 1u32..=6;
        prop_oneof![
            (id.clone(), amount()).prop_map(|(id, amount)| Operation::Add(id, amount)),
            (id.clone(), amount()).prop_map(|(id, amount)| Operation::Set(id, amount)),
            id.prop_map(Operation::Remove),
        ]
    }

    proptest! {
        #[test]
        fn any_operation_sequence_keeps_quantities_positive(
            operations in prop::collection::vec(operation(), 0..40)
        ) {
            let mut items = CartItems::new();

            for operation in operations {
                let before = items.clone();
                let outcome = match operation {
                    Operation::Add(id, delta) => items.add(ProductId(id), delta),
                    Operation::Set(id, quantity) => items.set(ProductId(id), quantity),
                    Operation::Remove(id) => Ok(items.remove(ProductId(id))),
                };
                if outcome.is_err() {
                    prop_assert_eq!(&items, &before);
                }

                prop_assert!(items.iter().all(|(_, quantity)| quantity > 0));
                let sum: u64 = items.iter().map(|(_, quantity)| u64::from(quantity)).sum();
                prop_assert_eq!(items.count(), sum);
            }
        }

        #[test]
        fn encoded_items_decode_to_the_same_mapping(
            entries in prop::collection::btree_map(1u32..=500, 1u32..=u32::MAX, 0..12)
        ) {
            let items: CartItems =
                entries.into_iter().map(|(id, quantity)| (ProductId(id), quantity)).collect();

            let decoded = decode_items(&encode_items(&items));

            prop_assert_eq!(decoded.ok(), Some(items));
        }
    }
}
