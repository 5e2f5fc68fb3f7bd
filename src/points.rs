//! Loyalty points
//!
//! Points are a won-denominated balance redeemable against the payable total. Redemption is
//! bounded by the available balance and the remaining payable amount; out-of-range requests
//! are clamped, never rejected.

/// A request to redeem loyalty points against an order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PointsRequest {
    /// Points the customer asked to redeem.
    pub requested: i64,

    /// Points available on the customer's balance.
    pub available: i64,
}

/// Clamp a redemption request against the available balance and the payable total.
///
/// The redeemed amount is `requested` bounded to `[0, min(available, payable)]`, so the
/// total can never go negative and a negative or oversized request silently redeems what it
/// can.
pub fn clamp_redemption(request: PointsRequest, payable: i64) -> i64 {
    let ceiling = request.available.min(payable).max(0);

    request.requested.clamp(0, ceiling)
}

/// Points earned on a completed order: a flat percentage of the final payable total,
/// rounded down.
pub fn earned_points(total: i64, percent: u8) -> i64 {
    if total <= 0 {
        return 0;
    }

    let earned = i128::from(total) * i128::from(percent) / 100;

    i64::try_from(earned).unwrap_or(i64::MAX)
}
