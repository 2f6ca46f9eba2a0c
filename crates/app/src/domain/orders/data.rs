//! Orders Data

use rustc_hash::FxHashMap;

use crate::domain::{
    orders::{
        errors::OrdersServiceError,
        records::{OrderUuid, PaymentMethod, ShippingAddress},
    },
    products::records::ProductUuid,
};

/// New Order Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub items: Vec<NewOrderItem>,

    /// Total the caller expects to pay, in minor units. Checked against catalog prices.
    pub total_amount: u64,
    pub payment_method: PaymentMethod,
    pub shipping_address: ShippingAddress,
}

/// New Order Item Data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewOrderItem {
    pub product_uuid: ProductUuid,
    pub quantity: u32,
}

impl NewOrder {
    /// Checks the parts of the request that need no storage access.
    ///
    /// # Errors
    ///
    /// Returns the first failed precondition: no items, a zero quantity, or a blank
    /// shipping address field.
    pub fn validate(&self) -> Result<(), OrdersServiceError> {
        if self.items.is_empty() {
            return Err(OrdersServiceError::EmptyOrder);
        }

        if let Some(item) = self.items.iter().find(|item| item.quantity == 0) {
            return Err(OrdersServiceError::InvalidQuantity(item.product_uuid));
        }

        if let Some(field) = self.shipping_address.missing_field() {
            return Err(OrdersServiceError::IncompleteShippingAddress(field));
        }

        Ok(())
    }

    /// Total quantity requested per product, in order of first appearance.
    #[must_use]
    pub fn requested_quantities(&self) -> Vec<(ProductUuid, u32)> {
        let mut positions: FxHashMap<ProductUuid, usize> = FxHashMap::default();
        let mut requested: Vec<(ProductUuid, u32)> = Vec::with_capacity(self.items.len());

        for item in &self.items {
            if let Some(entry) = positions
                .get(&item.product_uuid)
                .and_then(|position| requested.get_mut(*position))
            {
                entry.1 = entry.1.saturating_add(item.quantity);
            } else {
                positions.insert(item.product_uuid, requested.len());
                requested.push((item.product_uuid, item.quantity));
            }
        }

        requested
    }
}
