//! Integration tests for the cart handoff between storefront pages.
//!
//! The storefront saves the cart before navigating to the order page and loads it
//! back there. These tests drive the same flow through the stores, then place the restored
//! cart as an order with a mocked session provider.

use rusty_money::{Money, iso::KRW};
use testresult::TestResult;

use trolley::{
    fixtures::demo_cart,
    orders::{ContactDetails, OrderDraft, OrderError, PaymentMethod},
    pricing::PricingPolicy,
    session::{MockSessionProvider, UserSession},
    storage::{CartSnapshot, CartStore, JsonFileCartStore, MemoryCartStore},
};

fn demo_user() -> UserSession {
    UserSession {
        username: "demo".to_string(),
        points_balance: 103_788,
    }
}

#[test]
fn file_store_round_trips_a_cart() -> TestResult {
    let dir = tempfile::tempdir()?;
    let mut store = JsonFileCartStore::new(dir.path().join("cart.json"));

    assert!(store.load()?.is_none());

    let cart = demo_cart()?;
    let snapshot = CartSnapshot::capture(&cart);

    store.save(&snapshot)?;

    let loaded = store.load()?.ok_or("expected a stored snapshot")?;
    assert_eq!(loaded, snapshot);

    let restored = loaded.restore()?;
    assert_eq!(restored.subtotal()?, Money::from_minor(178_000, KRW));

    store.clear()?;
    assert!(store.load()?.is_none());

    Ok(())
}

#[test]
fn clearing_a_missing_file_is_not_an_error() -> TestResult {
    let dir = tempfile::tempdir()?;
    let mut store = JsonFileCartStore::new(dir.path().join("cart.json"));

    store.clear()?;

    Ok(())
}

#[test]
fn handoff_through_memory_store_preserves_the_order_total() -> TestResult {
    // Cart page: snapshot the cart before navigating away.
    let cart = demo_cart()?;
    let mut store = MemoryCartStore::new();

    store.save(&CartSnapshot::capture(&cart))?;

    // Order page: load it back and place the order.
    let restored = store.load()?.ok_or("expected a stored snapshot")?.restore()?;

    let mut session = MockSessionProvider::new();
    session.expect_current_user().returning(|| Some(demo_user()));

    let draft = OrderDraft::new(restored)
        .customer(ContactDetails {
            name: "Demo Customer".to_string(),
            ..ContactDetails::default()
        })
        .deliver_to_customer()
        .payment(PaymentMethod::BankTransfer);

    let placed = draft.place(&session, &PricingPolicy::default())?;

    assert_eq!(placed.breakdown().total(), Money::from_minor(178_000, KRW));
    assert_eq!(placed.points_earned(), 5_340);

    Ok(())
}

#[test]
fn signed_out_visitor_cannot_place_the_restored_cart() -> TestResult {
    let mut session = MockSessionProvider::new();
    session.expect_current_user().returning(|| None);

    let draft = OrderDraft::new(demo_cart()?)
        .customer(ContactDetails {
            name: "Demo Customer".to_string(),
            ..ContactDetails::default()
        })
        .deliver_to_customer()
        .payment(PaymentMethod::Card);

    let result = draft.place(&session, &PricingPolicy::default());

    assert!(
        matches!(result, Err(OrderError::NotSignedIn)),
        "expected NotSignedIn, got {result:?}"
    );

    Ok(())
}

#[test]
fn session_balance_bounds_the_redemption_after_handoff() -> TestResult {
    let mut session = MockSessionProvider::new();
    session.expect_current_user().returning(|| {
        Some(UserSession {
            username: "demo".to_string(),
            points_balance: 1_500,
        })
    });

    let draft = OrderDraft::new(demo_cart()?)
        .customer(ContactDetails {
            name: "Demo Customer".to_string(),
            ..ContactDetails::default()
        })
        .deliver_to_customer()
        .payment(PaymentMethod::Card)
        .points(50_000);

    let placed = draft.place(&session, &PricingPolicy::default())?;

    assert_eq!(
        placed.breakdown().points_used(),
        Money::from_minor(1_500, KRW)
    );
    assert_eq!(placed.breakdown().total(), Money::from_minor(176_500, KRW));

    Ok(())
}
