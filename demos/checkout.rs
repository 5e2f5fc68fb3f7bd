//! Checkout Demo
//!
//! Walks the demo cart through coupon application, point redemption and order
//! placement, then prints the resulting receipt.
//!
//! Run with: `cargo run --example checkout -- --coupon DISCOUNT10 --points 2000`

use anyhow::Result;
use clap::Parser;

use trolley::{
    coupons::CouponRegistry,
    fixtures::{demo_cart, demo_sessions},
    orders::{ContactDetails, OrderDraft, PaymentMethod},
    pricing::PricingPolicy,
    receipt::Receipt,
    session::SessionProvider,
    utils::CheckoutDemoArgs,
};

/// Checkout Demo
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    let args = CheckoutDemoArgs::parse();

    let cart = demo_cart()?;
    let registry = CouponRegistry::standard();
    let policy = PricingPolicy::default();

    let mut sessions = demo_sessions();
    sessions.login("demo", "demo")?;

    let coupon = match args.coupon.as_deref() {
        Some(code) => Some(registry.lookup(code)?.clone()),
        None => None,
    };

    let mut draft = OrderDraft::new(cart)
        .customer(ContactDetails {
            name: "Demo Customer".to_string(),
            email: "demo@example.com".to_string(),
            ..ContactDetails::default()
        })
        .deliver_to_customer()
        .payment(PaymentMethod::Card)
        .points(args.points);

    if let Some(coupon) = coupon {
        draft = draft.coupon(coupon);
    }

    let placed = draft.place(&sessions, &policy)?;

    let receipt = Receipt::new(draft.cart(), *placed.breakdown())?;

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    receipt.write_to(&mut handle)?;

    println!("\nPoints earned: {}", placed.points_earned());

    Ok(())
}
