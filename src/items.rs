//! Line items

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Errors related to line item construction or arithmetic.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LineItemError {
    /// A quantity of zero was supplied; a cart line always holds at least one unit.
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    /// A line total or quantity overflowed its representable range.
    #[error("line arithmetic overflowed")]
    Overflow,
}

/// A product entry in the cart with a unit price and quantity.
#[derive(Clone, Debug, PartialEq)]
pub struct LineItem<'a> {
    id: String,
    name: String,
    unit_price: Money<'a, Currency>,
    quantity: u32,
}

impl<'a> LineItem<'a> {
    /// Creates a new line item holding a single unit.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        unit_price: Money<'a, Currency>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit_price,
            quantity: 1,
        }
    }

    /// Creates a new line item with the given quantity.
    ///
    /// # Errors
    ///
    /// Returns [`LineItemError::ZeroQuantity`] if `quantity` is zero.
    pub fn with_quantity(
        id: impl Into<String>,
        name: impl Into<String>,
        unit_price: Money<'a, Currency>,
        quantity: u32,
    ) -> Result<Self, LineItemError> {
        if quantity == 0 {
            return Err(LineItemError::ZeroQuantity);
        }

        Ok(Self {
            id: id.into(),
            name: name.into(),
            unit_price,
            quantity,
        })
    }

    /// Returns the id of the item.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the display name of the item.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the unit price of the item.
    pub fn unit_price(&self) -> &Money<'a, Currency> {
        &self.unit_price
    }

    /// Returns the quantity of the item.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Replace the quantity, rejecting zero so the prior value is retained on error.
    pub(crate) fn set_quantity(&mut self, quantity: u32) -> Result<(), LineItemError> {
        if quantity == 0 {
            return Err(LineItemError::ZeroQuantity);
        }

        self.quantity = quantity;

        Ok(())
    }

    /// Add units to the line, as when the same product is added to the cart again.
    pub(crate) fn add_quantity(&mut self, extra: u32) -> Result<(), LineItemError> {
        self.quantity = self
            .quantity
            .checked_add(extra)
            .ok_or(LineItemError::Overflow)?;

        Ok(())
    }

    /// Calculates the line total (`unit_price * quantity`).
    ///
    /// # Errors
    ///
    /// Returns [`LineItemError::Overflow`] if the total exceeds the minor-unit range.
    pub fn line_total(&self) -> Result<Money<'a, Currency>, LineItemError> {
        let minor = self
            .unit_price
            .to_minor_units()
            .checked_mul(i64::from(self.quantity))
            .ok_or(LineItemError::Overflow)?;

        Ok(Money::from_minor(minor, self.unit_price.currency()))
    }
}
