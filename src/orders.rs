//! Orders
//!
//! An order draft captures everything the storefront collects before payment: a cart
//! snapshot taken at checkout time, customer and delivery details, a payment method, a
//! coupon choice and a points request. Placement validates the draft, prices it through the
//! pricing engine and hands the result to the external payment redirect.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::{
    cart::Cart,
    coupons::Coupon,
    points::{self, PointsRequest},
    pricing::{PriceBreakdown, PricingError, PricingPolicy},
    session::SessionProvider,
};

/// Errors preventing an order draft from being placed.
#[derive(Debug, Error)]
pub enum OrderError {
    /// No signed-in user; the storefront sends the visitor to login instead.
    #[error("not signed in")]
    NotSignedIn,

    /// The draft's cart has no items.
    #[error("cart is empty")]
    EmptyCart,

    /// No payment method was selected.
    #[error("no payment method selected")]
    NoPaymentMethod,

    /// The delivery recipient name is blank.
    #[error("delivery recipient is required")]
    MissingRecipient,

    /// Wrapped pricing error.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// How the customer will pay; the gateway itself is an external redirect.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Direct bank transfer.
    BankTransfer,

    /// Credit or debit card.
    Card,

    /// Deposit to the shop's account without a passbook.
    DirectDeposit,

    /// Mobile wallet payment.
    MobilePay,
}

/// Contact details for the ordering customer or the delivery recipient.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct ContactDetails {
    /// Full name.
    pub name: String,

    /// Email address.
    pub email: String,

    /// Phone number.
    pub phone: String,

    /// Postal code.
    pub postcode: String,

    /// Street address.
    pub address: String,

    /// Apartment, suite or other detail line.
    pub address_detail: String,
}

/// Where and how the order should be delivered.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct DeliveryDetails {
    /// Recipient contact details.
    pub recipient: ContactDetails,

    /// Free-form message for the courier.
    pub message: String,
}

/// An order in progress: a cart snapshot plus the choices collected at checkout.
#[derive(Debug)]
pub struct OrderDraft<'a> {
    cart: Cart<'a>,
    customer: ContactDetails,
    delivery: DeliveryDetails,
    payment: Option<PaymentMethod>,
    coupon: Option<Coupon>,
    points_requested: i64,
}

impl<'a> OrderDraft<'a> {
    /// Start a draft from a cart snapshot taken at checkout time.
    #[must_use]
    pub fn new(cart: Cart<'a>) -> Self {
        Self {
            cart,
            customer: ContactDetails::default(),
            delivery: DeliveryDetails::default(),
            payment: None,
            coupon: None,
            points_requested: 0,
        }
    }

    /// Set the ordering customer's contact details.
    #[must_use]
    pub fn customer(mut self, customer: ContactDetails) -> Self {
        self.customer = customer;
        self
    }

    /// Set the delivery details.
    #[must_use]
    pub fn delivery(mut self, delivery: DeliveryDetails) -> Self {
        self.delivery = delivery;
        self
    }

    /// Copy the customer's details into the delivery slot, keeping the courier message.
    #[must_use]
    pub fn deliver_to_customer(mut self) -> Self {
        self.delivery.recipient = self.customer.clone();
        self
    }

    /// Choose a payment method.
    #[must_use]
    pub fn payment(mut self, method: PaymentMethod) -> Self {
        self.payment = Some(method);
        self
    }

    /// Apply a coupon previously looked up from a registry.
    #[must_use]
    pub fn coupon(mut self, coupon: Coupon) -> Self {
        self.coupon = Some(coupon);
        self
    }

    /// Request a points redemption; out-of-range requests are clamped at placement.
    #[must_use]
    pub fn points(mut self, requested: i64) -> Self {
        self.points_requested = requested;
        self
    }

    /// The cart this draft was opened with.
    pub fn cart(&self) -> &Cart<'a> {
        &self.cart
    }

    /// Validate the draft, price it and place the order.
    ///
    /// # Errors
    ///
    /// - [`OrderError::NotSignedIn`]: no current session.
    /// - [`OrderError::EmptyCart`]: the cart has no items.
    /// - [`OrderError::NoPaymentMethod`]: no payment method chosen.
    /// - [`OrderError::MissingRecipient`]: the delivery recipient name is blank.
    /// - [`OrderError::Pricing`]: the final quote could not be calculated.
    pub fn place(
        &self,
        session: &dyn SessionProvider,
        policy: &PricingPolicy,
    ) -> Result<PlacedOrder<'a>, OrderError> {
        let user = session.current_user().ok_or(OrderError::NotSignedIn)?;

        if self.cart.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let payment = self.payment.ok_or(OrderError::NoPaymentMethod)?;

        if self.delivery.recipient.name.trim().is_empty() {
            return Err(OrderError::MissingRecipient);
        }

        let points = PointsRequest {
            requested: self.points_requested,
            available: user.points_balance,
        };

        let breakdown = policy.quote(&self.cart, self.coupon.as_ref(), points)?;

        let points_earned =
            points::earned_points(breakdown.total().to_minor_units(), policy.points_earn_percent);

        info!(
            customer = %user.username,
            total = breakdown.total().to_minor_units(),
            points_earned,
            "order placed"
        );

        Ok(PlacedOrder {
            payment,
            breakdown,
            points_earned,
        })
    }
}

/// A priced, validated order ready for the external payment redirect.
#[derive(Debug)]
pub struct PlacedOrder<'a> {
    payment: PaymentMethod,
    breakdown: PriceBreakdown<'a>,
    points_earned: i64,
}

impl<'a> PlacedOrder<'a> {
    /// The payment method the customer chose.
    pub fn payment(&self) -> PaymentMethod {
        self.payment
    }

    /// The final price breakdown for the order.
    pub fn breakdown(&self) -> &PriceBreakdown<'a> {
        &self.breakdown
    }

    /// Loyalty points projected to be earned on this order.
    pub fn points_earned(&self) -> i64 {
        self.points_earned
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::KRW};
    use testresult::TestResult;

    use crate::{
        coupons::CouponRegistry,
        items::LineItem,
        session::{MemorySessions, SessionProvider},
    };

    use super::*;

    fn demo_cart() -> TestResult<Cart<'static>> {
        Ok(Cart::with_items(
            [
                LineItem::new("1", "Cordless Vacuum", Money::from_minor(120_000, KRW)),
                LineItem::with_quantity("2", "Pedestal Fan", Money::from_minor(29_000, KRW), 2)?,
            ],
            KRW,
        )?)
    }

    fn signed_in_sessions() -> TestResult<MemorySessions> {
        let mut sessions = MemorySessions::new().with_account("demo", "hunter2", 103_788);

        sessions.login("demo", "hunter2")?;

        Ok(sessions)
    }

    fn valid_draft(cart: Cart<'static>) -> OrderDraft<'static> {
        OrderDraft::new(cart)
            .customer(ContactDetails {
                name: "Demo Customer".to_string(),
                ..ContactDetails::default()
            })
            .deliver_to_customer()
            .payment(PaymentMethod::Card)
    }

    #[test]
    fn placing_without_a_session_is_rejected() -> TestResult {
        let sessions = MemorySessions::new();
        let draft = valid_draft(demo_cart()?);

        let result = draft.place(&sessions, &PricingPolicy::default());

        assert!(
            matches!(result, Err(OrderError::NotSignedIn)),
            "expected NotSignedIn, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn placing_an_empty_cart_is_rejected() -> TestResult {
        let sessions = signed_in_sessions()?;
        let draft = valid_draft(Cart::new(KRW));

        let result = draft.place(&sessions, &PricingPolicy::default());

        assert!(
            matches!(result, Err(OrderError::EmptyCart)),
            "expected EmptyCart, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn placing_without_a_payment_method_is_rejected() -> TestResult {
        let sessions = signed_in_sessions()?;

        let draft = OrderDraft::new(demo_cart()?)
            .customer(ContactDetails {
                name: "Demo Customer".to_string(),
                ..ContactDetails::default()
            })
            .deliver_to_customer();

        let result = draft.place(&sessions, &PricingPolicy::default());

        assert!(
            matches!(result, Err(OrderError::NoPaymentMethod)),
            "expected NoPaymentMethod, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn placing_without_a_recipient_is_rejected() -> TestResult {
        let sessions = signed_in_sessions()?;

        let draft = OrderDraft::new(demo_cart()?).payment(PaymentMethod::Card);

        let result = draft.place(&sessions, &PricingPolicy::default());

        assert!(
            matches!(result, Err(OrderError::MissingRecipient)),
            "expected MissingRecipient, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn deliver_to_customer_copies_details_and_keeps_message() {
        let customer = ContactDetails {
            name: "Demo Customer".to_string(),
            address: "12 Harbor Road".to_string(),
            ..ContactDetails::default()
        };

        let draft = OrderDraft::new(Cart::new(KRW))
            .delivery(DeliveryDetails {
                recipient: ContactDetails::default(),
                message: "Leave at the door".to_string(),
            })
            .customer(customer.clone())
            .deliver_to_customer();

        assert_eq!(draft.delivery.recipient, customer);
        assert_eq!(draft.delivery.message, "Leave at the door");
    }

    #[test]
    fn placed_order_carries_breakdown_and_earned_points() -> TestResult {
        let sessions = signed_in_sessions()?;
        let registry = CouponRegistry::standard();

        let draft = valid_draft(demo_cart()?)
            .coupon(registry.lookup("DISCOUNT10")?.clone())
            .points(200);

        let placed = draft.place(&sessions, &PricingPolicy::default())?;

        // 178,000 - 17,800 discount - 200 points, free shipping over the threshold.
        assert_eq!(placed.breakdown().total(), Money::from_minor(160_000, KRW));
        assert_eq!(placed.payment(), PaymentMethod::Card);

        // 3% of the payable total, rounded down.
        assert_eq!(placed.points_earned(), 4_800);

        Ok(())
    }

    #[test]
    fn points_request_is_bounded_by_the_session_balance() -> TestResult {
        let mut sessions = MemorySessions::new().with_account("demo", "hunter2", 1_500);
        sessions.login("demo", "hunter2")?;

        let draft = valid_draft(demo_cart()?).points(50_000);

        let placed = draft.place(&sessions, &PricingPolicy::default())?;

        assert_eq!(
            placed.breakdown().points_used(),
            Money::from_minor(1_500, KRW)
        );
        assert_eq!(placed.breakdown().total(), Money::from_minor(176_500, KRW));

        Ok(())
    }
}
