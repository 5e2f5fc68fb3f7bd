//! Receipt

use std::io;

use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::Cart,
    pricing::{PriceBreakdown, PricingError},
};

/// Errors that can occur when building or rendering a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Error calculating a line total.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// One rendered cart line.
#[derive(Debug, Clone)]
struct ReceiptLine {
    name: String,
    unit_price: String,
    quantity: u32,
    line_total: String,
}

/// Final receipt for a priced cart: display rows plus the price breakdown.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    lines: SmallVec<[ReceiptLine; 10]>,
    breakdown: PriceBreakdown<'a>,
}

impl<'a> Receipt<'a> {
    /// Capture the cart's display rows alongside its price breakdown.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if a line total cannot be calculated.
    pub fn new(cart: &Cart<'a>, breakdown: PriceBreakdown<'a>) -> Result<Self, ReceiptError> {
        let mut lines = SmallVec::new();

        for item in cart.iter() {
            let line_total = item.line_total().map_err(PricingError::from)?;

            lines.push(ReceiptLine {
                name: item.name().to_string(),
                unit_price: format!("{}", item.unit_price()),
                quantity: item.quantity(),
                line_total: format!("{line_total}"),
            });
        }

        Ok(Self { lines, breakdown })
    }

    /// The price breakdown this receipt was captured from.
    pub fn breakdown(&self) -> &PriceBreakdown<'a> {
        &self.breakdown
    }

    /// Amount knocked off the goods price by the coupon and redeemed points together.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the addition fails.
    pub fn savings(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.breakdown.discount().add(self.breakdown.points_used())
    }

    /// Prints the receipt.
    ///
    /// # Errors
    ///
    /// Returns an error if the receipt cannot be printed.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["Item", "Unit Price", "Qty", "Line Total"]);

        for line in &self.lines {
            builder.push_record([
                line.name.clone(),
                line.unit_price.clone(),
                line.quantity.to_string(),
                line.line_total.clone(),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(1..4), Alignment::right());

        writeln!(out, "\n{table}").map_err(|_err| ReceiptError::IO)?;

        self.write_summary(&mut out)
    }

    /// Writes the aligned summary block below the item table.
    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        let rows = [
            ("Subtotal:", format!("{}", self.breakdown.subtotal())),
            ("Discount:", format!("-{}", self.breakdown.discount())),
            ("Shipping:", format!("{}", self.breakdown.shipping_fee())),
            ("Points:", format!("-{}", self.breakdown.points_used())),
            ("Total:", format!("{}", self.breakdown.total())),
        ];

        let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        let value_width = rows.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

        for (label, value) in &rows {
            writeln!(out, " {label:>label_width$}  {value:>value_width$}")
                .map_err(|_err| ReceiptError::IO)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::KRW;
    use testresult::TestResult;

    use crate::{
        coupons::CouponRegistry, items::LineItem, points::PointsRequest, pricing::PricingPolicy,
    };

    use super::*;

    fn demo_receipt() -> TestResult<Receipt<'static>> {
        let cart = Cart::with_items(
            [
                LineItem::new("1", "Cordless Vacuum", Money::from_minor(120_000, KRW)),
                LineItem::with_quantity("2", "Pedestal Fan", Money::from_minor(29_000, KRW), 2)?,
            ],
            KRW,
        )?;

        let breakdown = PricingPolicy::default().quote(&cart, None, PointsRequest::default())?;

        Ok(Receipt::new(&cart, breakdown)?)
    }

    #[test]
    fn breakdown_accessor_returns_captured_values() -> TestResult {
        let receipt = demo_receipt()?;

        assert_eq!(
            receipt.breakdown().subtotal(),
            Money::from_minor(178_000, KRW)
        );
        assert_eq!(receipt.breakdown().total(), Money::from_minor(178_000, KRW));

        Ok(())
    }

    #[test]
    fn savings_adds_discount_and_points() -> TestResult {
        let cart = Cart::with_items(
            [LineItem::new(
                "1",
                "Cordless Vacuum",
                Money::from_minor(120_000, KRW),
            )],
            KRW,
        )?;

        let points = PointsRequest {
            requested: 2_000,
            available: 103_788,
        };

        let registry = CouponRegistry::standard();
        let coupon = registry.lookup("DISCOUNT10")?;

        let breakdown = PricingPolicy::default().quote(&cart, Some(coupon), points)?;
        let receipt = Receipt::new(&cart, breakdown)?;

        // 12,000 coupon discount plus 2,000 redeemed points.
        assert_eq!(receipt.savings()?, Money::from_minor(14_000, KRW));

        Ok(())
    }

    #[test]
    fn write_to_renders_items_and_summary() -> TestResult {
        let receipt = demo_receipt()?;

        let mut out = Vec::new();
        receipt.write_to(&mut out)?;

        let output = String::from_utf8(out)?;
        assert!(output.contains("Cordless Vacuum"));
        assert!(output.contains("Pedestal Fan"));
        assert!(output.contains("Subtotal:"));
        assert!(output.contains("Shipping:"));
        assert!(output.contains("Total:"));

        Ok(())
    }

    #[test]
    fn write_to_renders_quantities() -> TestResult {
        let receipt = demo_receipt()?;

        let mut out = Vec::new();
        receipt.write_to(&mut out)?;

        let output = String::from_utf8(out)?;
        assert!(output.contains('2'), "fan quantity should be rendered");

        Ok(())
    }
}
