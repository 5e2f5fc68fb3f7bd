//! Pricing
//!
//! Deterministic, side-effect-free transformation of cart state into a displayable price
//! breakdown. All policy knobs (free-shipping threshold, flat fee, point-earning rate) live
//! in [`PricingPolicy`]; the same inputs always yield the same breakdown.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::{
    cart::Cart,
    coupons::{Coupon, CouponKind},
    items::{LineItem, LineItemError},
    points::{self, PointsRequest},
};

/// Errors that can occur while calculating totals.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// No items were provided, so currency could not be determined.
    #[error("no items provided; cannot determine currency")]
    NoItems,

    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// Wrapped line item arithmetic error.
    #[error(transparent)]
    Item(#[from] LineItemError),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Calculates the subtotal of a list of line items.
///
/// # Errors
///
/// - [`PricingError::NoItems`]: No items were provided, so currency could not be determined.
/// - [`PricingError::Item`]: A line total overflowed.
/// - [`PricingError::Money`]: Wrapped money arithmetic or currency mismatch error.
pub fn items_subtotal<'a>(items: &[LineItem<'a>]) -> Result<Money<'a, Currency>, PricingError> {
    let first = items.first().ok_or(PricingError::NoItems)?;

    let total = items.iter().try_fold(
        Money::from_minor(0, first.unit_price().currency()),
        |acc, item| -> Result<Money<'a, Currency>, PricingError> {
            Ok(acc.add(item.line_total()?)?)
        },
    )?;

    Ok(total)
}

/// Storefront pricing policy, in cart-currency minor units.
///
/// Defaults to a flat 3,000-won fee below a 50,000-won free-shipping threshold, with 3% of
/// the payable total earned back as loyalty points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PricingPolicy {
    /// Subtotals at or above this amount ship for free.
    pub free_shipping_threshold: i64,

    /// Flat fee charged to ship a non-empty cart below the threshold.
    pub flat_shipping_fee: i64,

    /// Percentage of the final payable total earned back as loyalty points.
    pub points_earn_percent: u8,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            free_shipping_threshold: 50_000,
            flat_shipping_fee: 3_000,
            points_earn_percent: 3,
        }
    }
}

impl PricingPolicy {
    /// Calculate the shipping fee for a subtotal.
    ///
    /// An empty cart ships nothing and costs nothing. Otherwise the fee is waived when the
    /// subtotal reaches the free-shipping threshold or a free-shipping coupon is applied.
    pub fn shipping_fee<'a>(
        &self,
        subtotal: &Money<'a, Currency>,
        line_count: usize,
        coupon: Option<&Coupon>,
    ) -> Money<'a, Currency> {
        let currency = subtotal.currency();

        if line_count == 0 {
            return Money::from_minor(0, currency);
        }

        let waived = subtotal.to_minor_units() >= self.free_shipping_threshold
            || coupon.is_some_and(Coupon::is_free_shipping);

        if waived {
            Money::from_minor(0, currency)
        } else {
            Money::from_minor(self.flat_shipping_fee, currency)
        }
    }

    /// Calculate the coupon discount on a subtotal.
    ///
    /// Percent-off coupons deduct `subtotal * percent / 100`, rounded down. Free-shipping
    /// coupons and the absence of a coupon discount nothing.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::PercentConversion`] if the percentage calculation cannot be
    /// safely represented in minor units.
    pub fn discount<'a>(
        &self,
        subtotal: &Money<'a, Currency>,
        coupon: Option<&Coupon>,
    ) -> Result<Money<'a, Currency>, PricingError> {
        let currency = subtotal.currency();

        match coupon.map(Coupon::kind) {
            Some(CouponKind::PercentOff { percent }) => {
                let minor = percent_of_minor(subtotal.to_minor_units(), *percent)?;

                Ok(Money::from_minor(minor, currency))
            }
            Some(CouponKind::FreeShipping) | None => Ok(Money::from_minor(0, currency)),
        }
    }

    /// Price a cart with an optional coupon and a points request.
    ///
    /// The order of operations matters: subtotal, then coupon discount, then shipping, then
    /// the points clamp against whatever remains payable. An empty cart prices to an all-zero
    /// breakdown.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if a line total overflows or the percentage calculation
    /// cannot be represented.
    pub fn quote<'a>(
        &self,
        cart: &Cart<'a>,
        coupon: Option<&Coupon>,
        points: PointsRequest,
    ) -> Result<PriceBreakdown<'a>, PricingError> {
        let currency = cart.currency();

        if cart.is_empty() {
            return Ok(PriceBreakdown::zero(currency));
        }

        let subtotal = cart.subtotal()?;
        let discount = self.discount(&subtotal, coupon)?;
        let shipping_fee = self.shipping_fee(&subtotal, cart.len(), coupon);

        let payable = subtotal.sub(discount)?.add(shipping_fee)?;
        let points_used = points::clamp_redemption(points, payable.to_minor_units());
        let total = payable.sub(Money::from_minor(points_used, currency))?;

        debug_assert!(
            total.to_minor_units() >= 0,
            "points clamp must keep the total non-negative"
        );

        Ok(PriceBreakdown {
            subtotal,
            discount,
            shipping_fee,
            points_used: Money::from_minor(points_used, currency),
            total,
        })
    }
}

/// A displayable price breakdown derived from a cart, coupon and points request.
///
/// Derived data only: recompute whenever the cart, the coupon or the points request change.
/// `total = subtotal - discount - points_used + shipping_fee`, and `total >= 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PriceBreakdown<'a> {
    subtotal: Money<'a, Currency>,
    discount: Money<'a, Currency>,
    shipping_fee: Money<'a, Currency>,
    points_used: Money<'a, Currency>,
    total: Money<'a, Currency>,
}

impl<'a> PriceBreakdown<'a> {
    /// An all-zero breakdown in the given currency (the empty cart price).
    #[must_use]
    pub fn zero(currency: &'static Currency) -> Self {
        let zero = Money::from_minor(0, currency);

        Self {
            subtotal: zero,
            discount: zero,
            shipping_fee: zero,
            points_used: zero,
            total: zero,
        }
    }

    /// Goods total before any discount, points or shipping.
    #[must_use]
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Amount deducted by the applied coupon.
    #[must_use]
    pub fn discount(&self) -> Money<'a, Currency> {
        self.discount
    }

    /// Shipping fee charged for this order.
    #[must_use]
    pub fn shipping_fee(&self) -> Money<'a, Currency> {
        self.shipping_fee
    }

    /// Loyalty points redeemed against the payable amount.
    #[must_use]
    pub fn points_used(&self) -> Money<'a, Currency> {
        self.points_used
    }

    /// Final payable total.
    #[must_use]
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }
}

/// Calculate the floored percentage of a minor unit amount.
fn percent_of_minor(minor: i64, percent: u8) -> Result<i64, PricingError> {
    let applied = Decimal::from(minor)
        .checked_mul(Decimal::from(percent))
        .ok_or(PricingError::PercentConversion)?;

    let divided = applied
        .checked_div(Decimal::ONE_HUNDRED)
        .ok_or(PricingError::PercentConversion)?;

    // Round toward zero: a 10% discount on 99,999 is 9,999, never 10,000.
    let rounded = divided.round_dp_with_strategy(0, RoundingStrategy::ToZero);

    rounded.to_i64().ok_or(PricingError::PercentConversion)
}
