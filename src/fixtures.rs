//! Fixtures
//!
//! Demo storefront data, used by the checkout example and the integration tests.

use rusty_money::{Money, iso};

use crate::{
    cart::{Cart, CartError},
    items::LineItem,
    session::MemorySessions,
};

/// The demo cart: a cordless vacuum and two pedestal fans, priced in won.
///
/// # Errors
///
/// Returns a [`CartError`] if the fixture data cannot form a valid cart.
pub fn demo_cart() -> Result<Cart<'static>, CartError> {
    let vacuum = LineItem::new("1", "Cordless Vacuum", Money::from_minor(120_000, iso::KRW));
    let fan = LineItem::with_quantity("2", "Pedestal Fan", Money::from_minor(29_000, iso::KRW), 2)?;

    Cart::with_items([vacuum, fan], iso::KRW)
}

/// A session provider holding the demo account and its point balance.
#[must_use]
pub fn demo_sessions() -> MemorySessions {
    MemorySessions::new().with_account("demo", "demo", 103_788)
}
