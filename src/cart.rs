//! Cart

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    items::{LineItem, LineItemError},
    pricing::{PricingError, items_subtotal},
};

/// Errors related to cart construction or mutation.
#[derive(Debug, Error)]
pub enum CartError {
    /// An item's currency differs from the cart currency (id, item currency, cart currency).
    #[error("Item {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(String, &'static str, &'static str),

    /// No line item with the given id exists in the cart.
    #[error("Item {0} not found")]
    ItemNotFound(String),

    /// Invalid quantity or overflowing line arithmetic.
    #[error(transparent)]
    Item(#[from] LineItemError),
}

/// The cart aggregate: an ordered list of line items in a single currency.
///
/// Passed to the pricing engine by value or reference, never held as ambient shared state.
/// Item order is display order only and has no pricing significance.
#[derive(Clone, Debug)]
pub struct Cart<'a> {
    items: Vec<LineItem<'a>>,
    currency: &'static Currency,
}

impl<'a> Cart<'a> {
    /// Create a new empty cart in the given currency.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            items: Vec::new(),
            currency,
        }
    }

    /// Create a new cart with the given items.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if an item's currency differs from the cart currency.
    pub fn with_items(
        items: impl Into<Vec<LineItem<'a>>>,
        currency: &'static Currency,
    ) -> Result<Self, CartError> {
        let items = items.into();

        items.iter().try_for_each(|item| {
            let item_currency = item.unit_price().currency();

            if item_currency == currency {
                Ok(())
            } else {
                Err(CartError::CurrencyMismatch(
                    item.id().to_string(),
                    item_currency.iso_alpha_code,
                    currency.iso_alpha_code,
                ))
            }
        })?;

        Ok(Cart { items, currency })
    }

    /// Calculate the subtotal of the cart.
    ///
    /// # Errors
    ///
    /// Returns a `PricingError` if a line total overflows.
    pub fn subtotal(&self) -> Result<Money<'a, Currency>, PricingError> {
        if self.is_empty() {
            return Ok(Money::from_minor(0, self.currency));
        }

        items_subtotal(&self.items)
    }

    /// Add an item to the cart.
    ///
    /// If a line with the same id already exists, its quantity is increased instead of
    /// appending a duplicate line.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if the item's currency differs from the cart currency, or the
    /// merged quantity overflows.
    pub fn add_item(&mut self, item: LineItem<'a>) -> Result<(), CartError> {
        let item_currency = item.unit_price().currency();

        if item_currency != self.currency {
            return Err(CartError::CurrencyMismatch(
                item.id().to_string(),
                item_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if let Some(existing) = self.items.iter_mut().find(|line| line.id() == item.id()) {
            existing.add_quantity(item.quantity())?;
        } else {
            self.items.push(item);
        }

        Ok(())
    }

    /// Replace the quantity of a line item.
    ///
    /// The minimum quantity is 1; a zero quantity is rejected and the prior quantity is
    /// retained. Dropping a line is an explicit [`Cart::remove_item`], never a side effect.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if the id is unknown or the quantity is zero.
    pub fn set_quantity(&mut self, id: &str, quantity: u32) -> Result<(), CartError> {
        let item = self
            .items
            .iter_mut()
            .find(|line| line.id() == id)
            .ok_or_else(|| CartError::ItemNotFound(id.to_string()))?;

        item.set_quantity(quantity)?;

        Ok(())
    }

    /// Remove a line item from the cart entirely, returning it.
    ///
    /// # Errors
    ///
    /// Returns a `CartError::ItemNotFound` if the id is unknown.
    pub fn remove_item(&mut self, id: &str) -> Result<LineItem<'a>, CartError> {
        let position = self
            .items
            .iter()
            .position(|line| line.id() == id)
            .ok_or_else(|| CartError::ItemNotFound(id.to_string()))?;

        Ok(self.items.remove(position))
    }

    /// Remove every line item from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Get an item from the cart by id.
    ///
    /// # Errors
    ///
    /// Returns a `CartError::ItemNotFound` if the id is unknown.
    pub fn get_item(&self, id: &str) -> Result<&LineItem<'a>, CartError> {
        self.items
            .iter()
            .find(|line| line.id() == id)
            .ok_or_else(|| CartError::ItemNotFound(id.to_string()))
    }

    /// Iterate over the items in the cart.
    pub fn iter(&self) -> impl Iterator<Item = &LineItem<'a>> {
        self.items.iter()
    }

    /// Get the number of line items in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the currency of the cart.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
