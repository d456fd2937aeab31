//! Order pricing: line totals, subtotal, tax and discount.

use crate::Amount;
use crate::cart::Cart;
use crate::model::OrderLine;

/// Tax rate in ten-thousandths (`825` is 8.25%).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxRate(u32);

impl TaxRate {
    const DENOMINATOR: i64 = 10_000;

    pub const fn from_basis_points(bps: u32) -> Self {
        TaxRate(bps)
    }

    pub fn apply(self, amount: Amount) -> Amount {
        amount.scale_by(self.0 as i64, Self::DENOMINATOR)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TAX_RATE
    }
}

/// Sales tax charged on every order.
pub const TAX_RATE: TaxRate = TaxRate::from_basis_points(825);

/// How monetary intermediates are rounded while totals are aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundingPolicy {
    /// Keep full fixed-point precision until display.
    #[default]
    Exact,
    /// Floor every intermediate to the cent before it is summed further.
    FloorToCent,
}

/// Breakdown of what an order costs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    pub subtotal: Amount,
    pub discount: Amount,
    pub discounted_subtotal: Amount,
    pub tax: Amount,
    pub total: Amount,
}

/// Pure pricing rules. Every function here is side effect free and independent
/// of line order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pricing {
    tax_rate: TaxRate,
    rounding: RoundingPolicy,
}

impl Pricing {
    pub fn new(tax_rate: TaxRate, rounding: RoundingPolicy) -> Self {
        Self { tax_rate, rounding }
    }

    pub fn rounding(&self) -> RoundingPolicy {
        self.rounding
    }

    /// Price of one unit of a line: base drink plus each topping once.
    pub fn line_total(&self, line: &OrderLine) -> Amount {
        let toppings: Amount = line.toppings.iter().map(|t| self.settle(t.price)).sum();
        self.settle(self.settle(line.item.price) + toppings)
    }

    /// Price of a line across its whole quantity.
    pub fn line_extension(&self, line: &OrderLine) -> Amount {
        self.settle(self.line_total(line) * line.qty)
    }

    pub fn subtotal(&self, cart: &Cart) -> Amount {
        let sum: Amount = cart.lines().iter().map(|l| self.line_extension(l)).sum();
        self.settle(sum)
    }

    pub fn tax(&self, subtotal: Amount) -> Amount {
        self.settle(self.tax_rate.apply(subtotal))
    }

    /// Discounted subtotal plus the tax on it. The discount can never push the
    /// taxable amount below zero.
    pub fn total_due(&self, subtotal: Amount, discount: Amount) -> Amount {
        self.totals(subtotal, discount).total
    }

    pub fn totals(&self, subtotal: Amount, discount: Amount) -> Totals {
        let subtotal = self.settle(subtotal);
        let discount = self.settle(discount.max(Amount::ZERO));
        let discounted_subtotal = self.settle(subtotal.sub_or_zero(discount));
        let tax = self.tax(discounted_subtotal);
        Totals {
            subtotal,
            discount,
            discounted_subtotal,
            tax,
            total: self.settle(discounted_subtotal + tax),
        }
    }

    pub fn cart_totals(&self, cart: &Cart, discount: Amount) -> Totals {
        self.totals(self.subtotal(cart), discount)
    }

    fn settle(&self, amount: Amount) -> Amount {
        match self.rounding {
            RoundingPolicy::Exact => amount,
            RoundingPolicy::FloorToCent => amount.floor_to_cent(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MenuItem, Selection};

    fn classic() -> MenuItem {
        MenuItem::drink("1", "Classic Milk Tea", Amount::from_cents(450), "Milk Tea")
    }

    fn honey() -> MenuItem {
        MenuItem::topping("t1", "Honey Boba", Amount::from_cents(75))
    }

    fn two_classics_with_honey() -> Cart {
        let mut cart = Cart::new();
        let selection = Selection::plain(classic()).with_toppings([honey()]);
        cart.add(selection.clone());
        cart.add(selection);
        cart
    }

    #[test]
    fn line_total_adds_toppings_once() {
        let cart = two_classics_with_honey();
        let pricing = Pricing::default();
        assert_eq!(pricing.line_total(&cart.lines()[0]), Amount::from_cents(525));
        assert_eq!(pricing.subtotal(&cart), Amount::from_cents(1050));
    }

    #[test]
    fn exact_policy_keeps_sub_cent_tax() {
        let cart = two_classics_with_honey();
        let totals = Pricing::default().cart_totals(&cart, Amount::ZERO);
        assert_eq!(totals.tax, Amount::from_scaled(8_663));
        assert_eq!(totals.total, Amount::from_scaled(113_663));
        assert_eq!(totals.total.to_string(), "11.37");
    }

    #[test]
    fn floor_policy_floors_tax() {
        let cart = two_classics_with_honey();
        let pricing = Pricing::new(TAX_RATE, RoundingPolicy::FloorToCent);
        let totals = pricing.cart_totals(&cart, Amount::ZERO);
        assert_eq!(totals.tax, Amount::from_cents(86));
        assert_eq!(totals.total, Amount::from_cents(1136));
    }

    #[test]
    fn floor_policy_floors_each_line() {
        let mut cart = Cart::new();
        let odd = MenuItem::drink("9", "Odd Tea", Amount::from_scaled(33_335), "Milk Tea");
        cart.add(Selection::plain(odd.clone()));
        cart.add(Selection::plain(odd));
        let pricing = Pricing::new(TAX_RATE, RoundingPolicy::FloorToCent);
        // 3.3335 floors to 3.33 before being multiplied
        assert_eq!(pricing.subtotal(&cart), Amount::from_cents(666));
        assert_eq!(Pricing::default().subtotal(&cart), Amount::from_scaled(66_670));
    }

    #[test]
    fn discount_reduces_taxable_amount() {
        let totals = Pricing::default().totals(Amount::from_cents(1050), Amount::from_cents(200));
        assert_eq!(totals.discounted_subtotal, Amount::from_cents(850));
        assert_eq!(totals.tax, Amount::from_scaled(7_013));
        assert_eq!(totals.total, Amount::from_scaled(92_013));
    }

    #[test]
    fn discount_larger_than_subtotal_clamps_to_zero() {
        let pricing = Pricing::default();
        let total = pricing.total_due(Amount::from_cents(300), Amount::from_cents(1000));
        assert_eq!(total, Amount::ZERO);
    }

    #[test]
    fn empty_cart_costs_nothing() {
        let totals = Pricing::default().cart_totals(&Cart::new(), Amount::ZERO);
        assert_eq!(totals, Totals::default());
    }

    #[test]
    fn subtotal_is_independent_of_line_order() {
        let jelly = MenuItem::topping("t2", "Crystal Jelly", Amount::from_cents(65));
        let taro = MenuItem::drink("2", "Taro Milk Tea", Amount::from_cents(500), "Milk Tea");

        let mut forward = Cart::new();
        forward.add(Selection::plain(classic()).with_toppings([honey()]));
        forward.add(Selection::plain(taro.clone()).with_toppings([jelly.clone()]));

        let mut backward = Cart::new();
        backward.add(Selection::plain(taro).with_toppings([jelly]));
        backward.add(Selection::plain(classic()).with_toppings([honey()]));

        let pricing = Pricing::default();
        assert_eq!(pricing.subtotal(&forward), pricing.subtotal(&backward));
        assert_eq!(pricing.subtotal(&forward), Amount::from_cents(1090));
    }
}
