//! Utils

use clap::Parser;

/// Arguments for the checkout demo
#[derive(Debug, Parser)]
pub struct CheckoutDemoArgs {
    /// Coupon code to apply at checkout
    #[clap(short, long)]
    pub coupon: Option<String>,

    /// Loyalty points to redeem against the total
    #[clap(short, long, default_value_t = 0)]
    pub points: i64,
}
