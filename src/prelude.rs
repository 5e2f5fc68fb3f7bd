//! Trolley prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError},
    coupons::{Coupon, CouponError, CouponKind, CouponRegistry},
    items::{LineItem, LineItemError},
    orders::{
        ContactDetails, DeliveryDetails, OrderDraft, OrderError, PaymentMethod, PlacedOrder,
    },
    points::{PointsRequest, clamp_redemption, earned_points},
    pricing::{PriceBreakdown, PricingError, PricingPolicy, items_subtotal},
    receipt::{Receipt, ReceiptError},
    session::{MemorySessions, SessionError, SessionProvider, UserSession},
    storage::{CartSnapshot, CartStore, JsonFileCartStore, MemoryCartStore, StoreError},
};
